//! Priority-ordered provider selection.
//!
//! Composes session health, per-record eligibility, and the static contract
//! priorities into the ordered list of providers the batch driver should
//! attempt for one record. A provider never makes the list while
//! unconfigured, unauthorized, rate-limited, or short of the inputs its
//! contract requires, so no paid call is wasted.

use chrono::{DateTime, Utc};

use crate::domain::DerivedDomain;
use crate::eligibility::{IneligibleReason, check_record_eligibility};
use crate::providers::Provider;
use crate::record::RecordView;
use crate::session::{ProviderSession, ProviderStatus};

/// Whether a provider is worth calling for a record, with a human-readable
/// reason for telemetry and operator display when it is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseDecision {
    pub usable: bool,
    /// Set only when unusable.
    pub reason: Option<String>,
}

impl UseDecision {
    fn usable() -> Self {
        Self {
            usable: true,
            reason: None,
        }
    }

    fn blocked(reason: String) -> Self {
        Self {
            usable: false,
            reason: Some(reason),
        }
    }
}

/// Session readiness AND record eligibility for one provider.
pub fn can_use_provider(
    session: &mut ProviderSession,
    provider: Provider,
    derived: &DerivedDomain,
    record: &RecordView,
) -> UseDecision {
    can_use_provider_at(session, provider, derived, record, Utc::now())
}

/// [`can_use_provider`] with an explicit current time.
pub fn can_use_provider_at(
    session: &mut ProviderSession,
    provider: Provider,
    derived: &DerivedDomain,
    record: &RecordView,
    now: DateTime<Utc>,
) -> UseDecision {
    let name = provider.display_name();
    match session.status_at(provider, now) {
        ProviderStatus::NotConfigured => {
            return UseDecision::blocked(format!("{name} not configured (no API key)"));
        }
        ProviderStatus::Unauthorized => {
            return UseDecision::blocked(format!("{name} unauthorized (401)"));
        }
        ProviderStatus::RateLimited { remaining_secs } => {
            return UseDecision::blocked(format!(
                "{name} rate-limited (429), retry in {remaining_secs}s"
            ));
        }
        ProviderStatus::Ready => {}
    }

    let eligibility = check_record_eligibility(provider, derived, record);
    if eligibility.eligible {
        UseDecision::usable()
    } else if eligibility.reason == Some(IneligibleReason::HasEmail) {
        UseDecision::blocked("record already has an email".to_string())
    } else {
        UseDecision::blocked(format!("Missing: {}", eligibility.missing.join(", ")))
    }
}

/// Providers worth trying for one record, sorted ascending by contract
/// priority. Ties (none among the current contracts) break on provider
/// name ordering.
///
/// This ordered list is the router's complete output: the sequence in which
/// the batch driver should attempt providers.
pub fn eligible_providers(
    session: &mut ProviderSession,
    derived: &DerivedDomain,
    record: &RecordView,
) -> Vec<Provider> {
    eligible_providers_at(session, derived, record, Utc::now())
}

/// [`eligible_providers`] with an explicit current time.
pub fn eligible_providers_at(
    session: &mut ProviderSession,
    derived: &DerivedDomain,
    record: &RecordView,
    now: DateTime<Utc>,
) -> Vec<Provider> {
    let mut usable: Vec<Provider> = Provider::ALL
        .into_iter()
        .filter(|&provider| can_use_provider_at(session, provider, derived, record, now).usable)
        .collect();
    usable.sort_by_key(|provider| (provider.contract().priority, provider.as_str()));
    usable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::domain::derive_domain;
    use crate::session::CallError;
    use chrono::Duration;
    use serde_json::json;

    fn all_keys() -> Credentials {
        Credentials {
            hunter_api_key: Some("hk".to_string()),
            anymail_api_key: Some("ak".to_string()),
            apollo_api_key: Some("pk".to_string()),
        }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn record_with_domain() -> (DerivedDomain, RecordView) {
        let value = json!({"domain": "acme.com", "company": "Acme", "first_name": "Jo"});
        (derive_domain(&value), RecordView::from_value(&value))
    }

    #[test]
    fn test_all_ready_returns_priority_order() {
        let mut session = ProviderSession::new_at(&all_keys(), t0());
        let (derived, record) = record_with_domain();
        assert_eq!(
            eligible_providers_at(&mut session, &derived, &record, t0()),
            vec![Provider::Hunter, Provider::Anymail, Provider::Apollo]
        );
    }

    #[test]
    fn test_existing_email_empties_the_list() {
        let mut session = ProviderSession::new_at(&all_keys(), t0());
        let value = json!({"email": "jo@acme.com", "domain": "acme.com"});
        let derived = derive_domain(&value);
        let record = RecordView::from_value(&value);
        assert!(eligible_providers_at(&mut session, &derived, &record, t0()).is_empty());

        let decision =
            can_use_provider_at(&mut session, Provider::Hunter, &derived, &record, t0());
        assert_eq!(decision.reason.as_deref(), Some("record already has an email"));
    }

    #[test]
    fn test_unconfigured_provider_is_skipped_with_reason() {
        let creds = Credentials {
            hunter_api_key: Some("hk".to_string()),
            ..Default::default()
        };
        let mut session = ProviderSession::new_at(&creds, t0());
        let (derived, record) = record_with_domain();

        assert_eq!(
            eligible_providers_at(&mut session, &derived, &record, t0()),
            vec![Provider::Hunter]
        );
        let decision =
            can_use_provider_at(&mut session, Provider::Apollo, &derived, &record, t0());
        assert_eq!(
            decision.reason.as_deref(),
            Some("Apollo.io not configured (no API key)")
        );
    }

    #[test]
    fn test_no_domain_leaves_only_the_alternative_path() {
        let mut session = ProviderSession::new_at(&all_keys(), t0());
        let value = json!({"company": "Acme", "first_name": "Jo"});
        // Acme alone infers a domain; force the no-domain case explicitly
        let derived = DerivedDomain::none();
        let record = RecordView::from_value(&value);

        assert_eq!(
            eligible_providers_at(&mut session, &derived, &record, t0()),
            vec![Provider::Apollo]
        );
        let decision =
            can_use_provider_at(&mut session, Provider::Hunter, &derived, &record, t0());
        assert_eq!(decision.reason.as_deref(), Some("Missing: domain"));
    }

    #[test]
    fn test_end_to_end_session_lifecycle() {
        // Only Hunter configured
        let creds = Credentials {
            hunter_api_key: Some("hk".to_string()),
            ..Default::default()
        };
        let mut session = ProviderSession::new_at(&creds, t0());
        let (derived, record) = record_with_domain();

        assert_eq!(
            eligible_providers_at(&mut session, &derived, &record, t0()),
            vec![Provider::Hunter]
        );

        // Hunter returns a 401: gone for the rest of the session
        session.record_failure_at(Provider::Hunter, &CallError::status(401), t0());
        for minutes in [0, 1, 60] {
            let now = t0() + Duration::minutes(minutes);
            assert!(eligible_providers_at(&mut session, &derived, &record, now).is_empty());
        }
        let decision =
            can_use_provider_at(&mut session, Provider::Hunter, &derived, &record, t0());
        assert_eq!(decision.reason.as_deref(), Some("Hunter.io unauthorized (401)"));
    }

    #[test]
    fn test_rate_limit_drops_provider_until_cooldown_expires() {
        let mut session =
            ProviderSession::new_at(&all_keys(), t0()).with_cooldown(Duration::milliseconds(5_000));
        let (derived, record) = record_with_domain();

        session.record_failure_at(Provider::Anymail, &CallError::status(429), t0());
        assert_eq!(
            eligible_providers_at(&mut session, &derived, &record, t0()),
            vec![Provider::Hunter, Provider::Apollo]
        );

        let decision = can_use_provider_at(
            &mut session,
            Provider::Anymail,
            &derived,
            &record,
            t0() + Duration::milliseconds(2_000),
        );
        assert_eq!(
            decision.reason.as_deref(),
            Some("Anymail Finder rate-limited (429), retry in 3s")
        );

        // Past the cooldown the provider rejoins the list
        let after = t0() + Duration::milliseconds(5_001);
        assert_eq!(
            eligible_providers_at(&mut session, &derived, &record, after),
            vec![Provider::Hunter, Provider::Anymail, Provider::Apollo]
        );
    }
}
