//! Narrow read-only projection of heterogeneous lead records.
//!
//! Records arrive from scraped and imported sources in no canonical shape.
//! Rather than duck-typing field access throughout the crate, all shape
//! uncertainty is isolated here: [`RecordView::from_value`] maps whatever
//! JSON the caller has onto the handful of named fields this core reads,
//! and every downstream function consumes the typed view.
//!
//! The projection is total: null, non-object, and malformed input all yield
//! a (possibly empty) view rather than an error.

use serde_json::Value;

/// The fields of a lead record this core reads.
///
/// All fields are optional; absent, null, non-string, and whitespace-only
/// source values are treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordView {
    /// Existing contact email, if the record already has one.
    pub email: Option<String>,
    /// Company name.
    pub company: Option<String>,
    pub first_name: Option<String>,
    pub full_name: Option<String>,
    pub display_name: Option<String>,
    /// Direct domain field.
    pub domain: Option<String>,
    /// Website URL field.
    pub website: Option<String>,
    /// Nested `raw.domain` field.
    pub raw_domain: Option<String>,
    /// Nested `raw.website`, either a string or an object with a `value`.
    pub raw_website: Option<String>,
    /// `company_url` / `companyUrl`, direct or nested under `raw`.
    pub company_url: Option<String>,
    /// Organization permalink (primary, or first of `current_organizations`).
    pub permalink: Option<String>,
}

impl RecordView {
    /// Project an arbitrary JSON value onto the record fields.
    pub fn from_value(value: &Value) -> Self {
        let raw = value.get("raw");

        Self {
            email: str_field(value, "email"),
            company: str_field(value, "company").or_else(|| str_field(value, "company_name")),
            first_name: str_field(value, "first_name").or_else(|| str_field(value, "firstName")),
            full_name: str_field(value, "full_name").or_else(|| str_field(value, "name")),
            display_name: str_field(value, "display_name")
                .or_else(|| str_field(value, "displayName")),
            domain: str_field(value, "domain"),
            website: str_field(value, "website"),
            raw_domain: raw.and_then(|r| str_field(r, "domain")),
            raw_website: raw.and_then(website_field),
            company_url: company_url_field(value).or_else(|| raw.and_then(company_url_field)),
            permalink: permalink_field(value),
        }
    }

    /// Whether the record already carries a contact email.
    pub fn has_email(&self) -> bool {
        self.email.is_some()
    }

    /// First usable person name: first name, full name, or display name.
    pub fn person_name(&self) -> Option<&str> {
        self.first_name
            .as_deref()
            .or(self.full_name.as_deref())
            .or(self.display_name.as_deref())
    }
}

/// Read a string field, treating empty/whitespace-only values as absent.
fn str_field(value: &Value, key: &str) -> Option<String> {
    let s = value.get(key)?.as_str()?.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// `website` as a plain string, or as an object carrying a `value` string.
fn website_field(raw: &Value) -> Option<String> {
    str_field(raw, "website").or_else(|| {
        let obj = raw.get("website")?;
        str_field(obj, "value")
    })
}

fn company_url_field(value: &Value) -> Option<String> {
    str_field(value, "company_url").or_else(|| str_field(value, "companyUrl"))
}

/// Primary organization permalink, falling back to the first entry of a
/// `current_organizations` list.
fn permalink_field(value: &Value) -> Option<String> {
    value
        .get("organization")
        .and_then(|org| str_field(org, "permalink"))
        .or_else(|| {
            let orgs = value.get("current_organizations")?.as_array()?;
            orgs.first().and_then(|org| str_field(org, "permalink"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_input_yields_empty_view() {
        let view = RecordView::from_value(&Value::Null);
        assert_eq!(view, RecordView::default());
    }

    #[test]
    fn test_non_object_input_yields_empty_view() {
        assert_eq!(
            RecordView::from_value(&json!([1, 2, 3])),
            RecordView::default()
        );
        assert_eq!(RecordView::from_value(&json!(42)), RecordView::default());
    }

    #[test]
    fn test_whitespace_fields_treated_as_missing() {
        let view = RecordView::from_value(&json!({"email": "  ", "company": ""}));
        assert!(!view.has_email());
        assert!(view.company.is_none());
    }

    #[test]
    fn test_direct_fields() {
        let view = RecordView::from_value(&json!({
            "email": "jo@acme.com",
            "company": "Acme",
            "first_name": "Jo",
            "domain": "acme.com",
            "website": "https://acme.com",
        }));
        assert_eq!(view.email.as_deref(), Some("jo@acme.com"));
        assert_eq!(view.company.as_deref(), Some("Acme"));
        assert_eq!(view.domain.as_deref(), Some("acme.com"));
        assert_eq!(view.website.as_deref(), Some("https://acme.com"));
    }

    #[test]
    fn test_camel_case_fallbacks() {
        let view = RecordView::from_value(&json!({
            "firstName": "Jo",
            "displayName": "Jo Smith",
            "companyUrl": "acme.com",
        }));
        assert_eq!(view.first_name.as_deref(), Some("Jo"));
        assert_eq!(view.display_name.as_deref(), Some("Jo Smith"));
        assert_eq!(view.company_url.as_deref(), Some("acme.com"));
    }

    #[test]
    fn test_nested_raw_fields() {
        let view = RecordView::from_value(&json!({
            "raw": {
                "domain": "acme.io",
                "website": "https://www.acme.io",
                "company_url": "acme.io/about",
            }
        }));
        assert_eq!(view.raw_domain.as_deref(), Some("acme.io"));
        assert_eq!(view.raw_website.as_deref(), Some("https://www.acme.io"));
        assert_eq!(view.company_url.as_deref(), Some("acme.io/about"));
    }

    #[test]
    fn test_raw_website_object_form() {
        let view = RecordView::from_value(&json!({
            "raw": {"website": {"value": "https://acme.dev", "label": "main"}}
        }));
        assert_eq!(view.raw_website.as_deref(), Some("https://acme.dev"));
    }

    #[test]
    fn test_permalink_primary_then_list() {
        let primary = RecordView::from_value(&json!({
            "organization": {"permalink": "acme-corp"},
            "current_organizations": [{"permalink": "other-org"}],
        }));
        assert_eq!(primary.permalink.as_deref(), Some("acme-corp"));

        let from_list = RecordView::from_value(&json!({
            "current_organizations": [{"permalink": "first-org"}, {"permalink": "second-org"}],
        }));
        assert_eq!(from_list.permalink.as_deref(), Some("first-org"));
    }

    #[test]
    fn test_person_name_preference_order() {
        let view = RecordView {
            full_name: Some("Jo Smith".to_string()),
            display_name: Some("jsmith".to_string()),
            ..Default::default()
        };
        assert_eq!(view.person_name(), Some("Jo Smith"));

        let first = RecordView {
            first_name: Some("Jo".to_string()),
            full_name: Some("Jo Smith".to_string()),
            ..Default::default()
        };
        assert_eq!(first.person_name(), Some("Jo"));
    }
}
