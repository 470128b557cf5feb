//! Domain derivation from loosely structured records.
//!
//! Turns a record into a best-effort company domain plus a confidence tag.
//! Explicit sources (structured domain/website fields) are trusted as-is;
//! inferred domains (guessed from an organization permalink or a company
//! name) must be verified by the caller before spending provider credits.
//!
//! Derivation is total: any input, including null or malformed JSON,
//! resolves to a [`DerivedDomain`] rather than an error.

use serde_json::Value;

use crate::record::RecordView;

/// Domains that are never a company's own domain. A social-profile URL in a
/// website field is noise; the candidate is discarded and the next source
/// tried.
pub const SOCIAL_DOMAINS: &[&str] = &["twitter.com", "x.com", "linkedin.com", "facebook.com"];

/// Trailing legal-entity suffixes stripped by the company-name heuristic.
const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "llc", "ltd", "corp", "co", "company", "lp", "llp", "plc", "gmbh",
];

/// Where a derived domain came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainSource {
    /// Read directly from a structured field; trusted without verification.
    Explicit,
    /// Guessed from indirect text; must be verified before use.
    Inferred,
    /// No domain could be derived.
    None,
}

impl DomainSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainSource::Explicit => "explicit",
            DomainSource::Inferred => "inferred",
            DomainSource::None => "none",
        }
    }
}

/// Which heuristic produced an inferred domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceMethod {
    /// Organization permalink slug.
    Permalink,
    /// Company display name.
    CompanyName,
}

impl InferenceMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceMethod::Permalink => "permalink",
            InferenceMethod::CompanyName => "company_name",
        }
    }
}

/// Result of domain derivation for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedDomain {
    /// The derived domain, if any.
    pub domain: Option<String>,
    pub source: DomainSource,
    /// Set only when `source` is `Inferred`.
    pub inference: Option<InferenceMethod>,
    /// The raw source value the domain was derived from, for diagnostics.
    pub raw_value: Option<String>,
}

impl DerivedDomain {
    /// The "nothing derivable" result.
    pub fn none() -> Self {
        Self {
            domain: None,
            source: DomainSource::None,
            inference: None,
            raw_value: None,
        }
    }

    fn explicit(domain: String, raw: &str) -> Self {
        Self {
            domain: Some(domain),
            source: DomainSource::Explicit,
            inference: None,
            raw_value: Some(raw.to_string()),
        }
    }

    fn inferred(domain: String, method: InferenceMethod, raw: &str) -> Self {
        Self {
            domain: Some(domain),
            source: DomainSource::Inferred,
            inference: Some(method),
            raw_value: Some(raw.to_string()),
        }
    }

    pub fn has_domain(&self) -> bool {
        self.domain.is_some()
    }
}

/// Normalize a domain-ish string: strip `http(s)://`, a leading `www.`,
/// any path/query/fragment, and a trailing port, then lowercase.
///
/// Returns `None` unless the cleaned value contains at least one `.` and
/// no whitespace.
///
/// ```
/// use lead_minder::domain::clean_domain;
/// assert_eq!(
///     clean_domain("https://www.Example.com/path?x=1"),
///     Some("example.com".to_string())
/// );
/// assert_eq!(clean_domain("not a domain"), None);
/// ```
pub fn clean_domain(input: &str) -> Option<String> {
    let mut s = input.trim();

    for scheme in ["https://", "http://"] {
        if let Some(rest) = strip_prefix_ci(s, scheme) {
            s = rest;
            break;
        }
    }
    if let Some(rest) = strip_prefix_ci(s, "www.") {
        s = rest;
    }
    if let Some(idx) = s.find(['/', '?', '#']) {
        s = &s[..idx];
    }
    if let Some((host, _port)) = s.split_once(':') {
        s = host;
    }

    let cleaned = s.to_lowercase();
    if cleaned.contains('.') && !cleaned.chars().any(char::is_whitespace) {
        Some(cleaned)
    } else {
        None
    }
}

/// Case-insensitive ASCII prefix strip. `None` if the prefix isn't there.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Whether a cleaned domain is a social/profile site rather than a company
/// domain.
pub fn is_social_domain(domain: &str) -> bool {
    SOCIAL_DOMAINS.contains(&domain)
}

/// Guess a domain from an organization permalink slug.
///
/// `"prosper-marketplace"` becomes `"prospermarketplace.com"`. Rejected if
/// fewer than 2 characters remain before the `.com` suffix.
pub fn domain_from_permalink(permalink: &str) -> Option<String> {
    let slug: String = permalink
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if slug.len() < 2 {
        None
    } else {
        Some(format!("{slug}.com"))
    }
}

/// Guess a domain from a company display name.
///
/// Strips one trailing legal-entity suffix (`Inc`, `LLC`, `Ltd`, ...) and
/// all whitespace/punctuation: `"Prosper Marketplace, Inc."` becomes
/// `"prospermarketplace.com"`. Rejected if fewer than 2 characters remain
/// before the `.com` suffix, or if the name is nothing but a suffix.
pub fn domain_from_company_name(name: &str) -> Option<String> {
    let trimmed = name.trim().trim_end_matches(['.', ',', ' ']);
    if is_legal_suffix(trimmed) {
        return None;
    }

    let base = match trimmed.rsplit_once([' ', ',']) {
        Some((head, tail)) if is_legal_suffix(tail) => head,
        _ => trimmed,
    };

    let slug: String = base
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if slug.len() < 2 {
        None
    } else {
        Some(format!("{slug}.com"))
    }
}

fn is_legal_suffix(token: &str) -> bool {
    let token = token.trim_matches(['.', ',', ' ']);
    LEGAL_SUFFIXES
        .iter()
        .any(|suffix| token.eq_ignore_ascii_case(suffix))
}

/// Derive a domain from an arbitrary record-like JSON value.
pub fn derive_domain(value: &Value) -> DerivedDomain {
    derive_from_view(&RecordView::from_value(value))
}

/// Derive a domain from an already-projected record view.
///
/// Sources are tried in order, first match wins: the explicit fields
/// (direct domain, website, raw domain, raw website, company URL), then the
/// permalink heuristic, then the company-name heuristic.
pub fn derive_from_view(record: &RecordView) -> DerivedDomain {
    let explicit_sources = [
        &record.domain,
        &record.website,
        &record.raw_domain,
        &record.raw_website,
        &record.company_url,
    ];
    for raw in explicit_sources.into_iter().flatten() {
        if let Some(cleaned) = clean_domain(raw)
            && !is_social_domain(&cleaned)
        {
            return DerivedDomain::explicit(cleaned, raw);
        }
    }

    if let Some(permalink) = &record.permalink
        && let Some(domain) = domain_from_permalink(permalink)
    {
        return DerivedDomain::inferred(domain, InferenceMethod::Permalink, permalink);
    }
    if let Some(company) = &record.company
        && let Some(domain) = domain_from_company_name(company)
    {
        return DerivedDomain::inferred(domain, InferenceMethod::CompanyName, company);
    }

    DerivedDomain::none()
}

/// Derive domains for a batch of records.
///
/// Results are keyed by position in the input slice. The positional keying
/// is local to this derivation step; it is not a stable record identifier.
pub fn derive_domains(records: &[Value]) -> Vec<DerivedDomain> {
    records.iter().map(derive_domain).collect()
}
