//! Lead Minder - provider-orchestration core for contact email enrichment.
//!
//! For a record lacking a contact email, this crate decides which of the
//! known paid lookup providers (Hunter.io, Anymail Finder, Apollo.io) may
//! usefully be tried, and in what order, given per-session provider health
//! and the data the record actually carries. It performs no network I/O, no
//! persistence, and no retries: the HTTP clients and the batch loop are
//! external collaborators.
//!
//! # Architecture
//!
//! - **Record view** (`record`) - narrow projection of heterogeneous record
//!   JSON onto the handful of fields this core reads
//! - **Domain deriver** (`domain`) - best-effort domain plus confidence tag
//!   (explicit / inferred / none)
//! - **Contract table** (`providers`) - static per-provider requirements
//!   and trial priorities
//! - **Session state** (`session`) - per-provider health for one batch run,
//!   with the failure classifier that drives its transitions
//! - **Eligibility** (`eligibility`) - per-record input sufficiency checks
//! - **Router** (`router`) - composes the above into the ordered provider
//!   list for one record
//!
//! # Usage
//!
//! ```
//! use lead_minder::{
//!     config::Credentials, derive_domain, eligible_providers, CallError, ProviderSession,
//!     RecordView,
//! };
//! use serde_json::json;
//!
//! let credentials = Credentials {
//!     hunter_api_key: Some("key".to_string()),
//!     ..Default::default()
//! };
//! let mut session = ProviderSession::new(&credentials);
//!
//! let record = json!({"company": "Acme", "website": "https://www.acme.com"});
//! let derived = derive_domain(&record);
//! let view = RecordView::from_value(&record);
//!
//! for provider in eligible_providers(&mut session, &derived, &view) {
//!     // call the provider (external), then feed the outcome back:
//!     session.record_failure(provider, &CallError::status(429));
//! }
//! ```

pub mod config;
pub mod domain;
pub mod eligibility;
pub mod providers;
pub mod record;
pub mod router;
pub mod session;

pub use domain::{
    DerivedDomain, DomainSource, InferenceMethod, clean_domain, derive_domain, derive_domains,
    domain_from_company_name, domain_from_permalink,
};
pub use eligibility::{Eligibility, IneligibleReason, check_record_eligibility};
pub use providers::{AlternativeInputs, Provider, ProviderContract, contracts};
pub use record::RecordView;
pub use router::{UseDecision, can_use_provider, eligible_providers};
pub use session::{CallError, FailureKind, ProviderSession, ProviderState, ProviderStatus};
