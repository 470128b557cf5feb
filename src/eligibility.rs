//! Per-record, per-provider eligibility evaluation.
//!
//! Decides whether a specific provider has sufficient input data to be
//! attempted for a specific record. Provider health is not consulted here;
//! the router combines both.

use crate::domain::DerivedDomain;
use crate::providers::{AlternativeInputs, Provider};
use crate::record::RecordView;

/// Why a record is ineligible for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    /// The record already has an email; no lookup is needed.
    HasEmail,
    /// The provider needs a domain (possibly with an unsatisfied
    /// alternative) and none was derived.
    MissingDomain,
    /// Reserved for contracts that require a company name directly.
    MissingCompany,
    /// Reserved for contracts that require a person name directly.
    MissingPersonName,
}

impl IneligibleReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IneligibleReason::HasEmail => "has_email",
            IneligibleReason::MissingDomain => "missing_domain",
            IneligibleReason::MissingCompany => "missing_company",
            IneligibleReason::MissingPersonName => "missing_person_name",
        }
    }
}

/// Result of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    pub eligible: bool,
    /// Set only when ineligible.
    pub reason: Option<IneligibleReason>,
    /// The specific inputs that are missing, when ineligible for lack of
    /// data.
    pub missing: Vec<&'static str>,
}

impl Eligibility {
    fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
            missing: Vec::new(),
        }
    }

    fn ineligible(reason: IneligibleReason, missing: Vec<&'static str>) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
            missing,
        }
    }
}

/// Check whether a record carries the inputs a provider's contract requires.
///
/// A record that already has an email is ineligible for every provider,
/// regardless of contract or derived domain. Otherwise a domain satisfies a
/// domain-requiring contract; a contract with an alternative input set is
/// also satisfied by a company name plus any person name. A missing domain
/// with an unsatisfied alternative reports `MissingDomain` and lists every
/// absent input.
pub fn check_record_eligibility(
    provider: Provider,
    derived: &DerivedDomain,
    record: &RecordView,
) -> Eligibility {
    if record.has_email() {
        return Eligibility::ineligible(IneligibleReason::HasEmail, Vec::new());
    }

    let contract = provider.contract();
    if !contract.requires_domain {
        return Eligibility::eligible();
    }
    if derived.has_domain() {
        return Eligibility::eligible();
    }

    match contract.alternative {
        Some(AlternativeInputs::CompanyAndPersonName) => {
            let has_company = record.company.is_some();
            let has_name = record.person_name().is_some();
            if has_company && has_name {
                Eligibility::eligible()
            } else {
                let mut missing = vec!["domain"];
                if !has_company {
                    missing.push("company");
                }
                if !has_name {
                    missing.push("person name");
                }
                Eligibility::ineligible(IneligibleReason::MissingDomain, missing)
            }
        }
        None => Eligibility::ineligible(IneligibleReason::MissingDomain, vec!["domain"]),
    }
}
