//! Form binding and validation
//!
//! Submissions arrive as `application/x-www-form-urlencoded` bodies. Every
//! field is optional at the binding stage so a missing field becomes a field
//! error on the re-rendered form instead of a rejected request.

use serde::Deserialize;
use std::fmt;

use controversy_common::slug::{slugify, validate_slug};
use controversy_common::{Category, Controversy, NewControversy, NewDataPoint};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_URL: &str = "Enter a valid URL.";

pub const MAX_CONTROVERSY_NAME_LEN: usize = 200;
pub const MAX_POINT_NAME_LEN: usize = 32;
pub const MAX_URL_LEN: usize = 200;

const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Raw data point form fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPointSubmission {
    /// Parent controversy id; only honoured by the admin form
    pub controversy: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub data_set: Option<String>,
    /// Checkbox value; absent when unchecked
    pub boolean: Option<String>,
}

impl From<&controversy_common::DataPoint> for DataPointSubmission {
    fn from(point: &controversy_common::DataPoint) -> Self {
        Self {
            controversy: Some(point.controversy_id.to_string()),
            name: Some(point.name.clone()),
            description: Some(point.description.clone()),
            url: Some(point.url.clone()),
            data_set: Some(point.category.as_str().to_string()),
            boolean: point.boolean.then(|| "on".to_string()),
        }
    }
}

/// Raw controversy form fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControversySubmission {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
}

impl From<&Controversy> for ControversySubmission {
    fn from(controversy: &Controversy) -> Self {
        Self {
            name: Some(controversy.name.clone()),
            description: Some(controversy.description.clone()),
            slug: Some(controversy.slug.clone()),
        }
    }
}

/// Field errors collected while cleaning a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<(&'static str, String)>,
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First error for `field`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|(f, _)| *f)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Clean a public submission for the controversy identified by the URL
///
/// The submitted `controversy` field is never read: the point always
/// belongs to `controversy_id`.
pub fn clean_data_point(
    submission: &DataPointSubmission,
    controversy_id: i64,
) -> Result<NewDataPoint, FormErrors> {
    let mut errors = FormErrors::default();
    let point = clean_point_fields(submission, controversy_id, &mut errors);
    finish(point, errors)
}

/// Clean an admin submission, where the controversy is a free choice
pub fn clean_admin_data_point(
    submission: &DataPointSubmission,
    choices: &[Controversy],
) -> Result<NewDataPoint, FormErrors> {
    let mut errors = FormErrors::default();

    let controversy_id = match trimmed(&submission.controversy) {
        None => {
            errors.add("controversy", REQUIRED);
            None
        }
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) if choices.iter().any(|c| c.id == id) => Some(id),
            _ => {
                errors.add(
                    "controversy",
                    "Select a valid choice. That choice is not one of the available choices.",
                );
                None
            }
        },
    };

    let point = clean_point_fields(submission, controversy_id.unwrap_or_default(), &mut errors);
    finish(point.filter(|_| controversy_id.is_some()), errors)
}

/// Clean a controversy submission; a blank slug is derived from the name
pub fn clean_controversy(submission: &ControversySubmission) -> Result<NewControversy, FormErrors> {
    let mut errors = FormErrors::default();

    let name = required_text(
        &submission.name,
        "name",
        MAX_CONTROVERSY_NAME_LEN,
        &mut errors,
    );
    let description = required_text(&submission.description, "description", usize::MAX, &mut errors);

    let slug = match (trimmed(&submission.slug), name.as_deref()) {
        (Some(slug), _) => Some(slug.to_string()),
        (None, Some(name)) => Some(slugify(name)),
        (None, None) => None,
    };

    let slug = match slug {
        Some(slug) if slug.is_empty() => {
            errors.add("slug", "Could not derive a slug from the name; enter one.");
            None
        }
        Some(slug) => match validate_slug(&slug) {
            Ok(()) => Some(slug),
            Err(e) => {
                errors.add("slug", strip_prefix(&e.to_string()));
                None
            }
        },
        None => {
            if name.is_some() {
                errors.add("slug", REQUIRED);
            }
            None
        }
    };

    match (name, description, slug) {
        (Some(name), Some(description), Some(slug)) if errors.is_empty() => Ok(NewControversy {
            name,
            description,
            slug,
        }),
        _ => Err(errors),
    }
}

/// Interpret an HTML checkbox value
///
/// An unchecked box sends nothing, so absence means false.
pub fn parse_checkbox(value: Option<&str>) -> Result<bool, String> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("false") | Some("off") | Some("0") => Ok(false),
        Some("true") | Some("on") | Some("1") => Ok(true),
        Some(other) => Err(format!("'{}' is not a valid boolean.", other)),
    }
}

/// Check that `raw` is an absolute http(s)/ftp(s) URL with a host
pub fn validate_url(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw).map_err(|_| INVALID_URL.to_string())?;

    if !URL_SCHEMES.contains(&parsed.scheme()) {
        return Err(INVALID_URL.to_string());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(INVALID_URL.to_string()),
    }
}

fn clean_point_fields(
    submission: &DataPointSubmission,
    controversy_id: i64,
    errors: &mut FormErrors,
) -> Option<NewDataPoint> {
    let name = required_text(&submission.name, "name", MAX_POINT_NAME_LEN, errors);
    let description = required_text(&submission.description, "description", usize::MAX, errors);

    let url = required_text(&submission.url, "url", MAX_URL_LEN, errors).and_then(|url| {
        match validate_url(&url) {
            Ok(()) => Some(url),
            Err(message) => {
                errors.add("url", message);
                None
            }
        }
    });

    let category = match trimmed(&submission.data_set) {
        None => {
            errors.add("data_set", REQUIRED);
            None
        }
        Some(raw) => match raw.parse::<Category>() {
            Ok(category) => Some(category),
            Err(_) => {
                errors.add(
                    "data_set",
                    format!(
                        "Select a valid choice. {} is not one of the available choices.",
                        raw
                    ),
                );
                None
            }
        },
    };

    let boolean = match parse_checkbox(submission.boolean.as_deref()) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add("boolean", message);
            None
        }
    };

    Some(NewDataPoint {
        controversy_id,
        name: name?,
        description: description?,
        url: url?,
        category: category?,
        boolean: boolean?,
    })
}

fn required_text(
    value: &Option<String>,
    field: &'static str,
    max_len: usize,
    errors: &mut FormErrors,
) -> Option<String> {
    let Some(text) = trimmed(value) else {
        errors.add(field, REQUIRED);
        return None;
    };

    let length = text.chars().count();
    if length > max_len {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max_len, length
            ),
        );
        return None;
    }

    Some(text.to_string())
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn finish(point: Option<NewDataPoint>, errors: FormErrors) -> Result<NewDataPoint, FormErrors> {
    match point {
        Some(point) if errors.is_empty() => Ok(point),
        _ => Err(errors),
    }
}

fn strip_prefix(message: &str) -> String {
    message
        .strip_prefix("Invalid input: ")
        .unwrap_or(message)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> DataPointSubmission {
        DataPointSubmission {
            controversy: None,
            name: Some("temp-rise".to_string()),
            description: Some("Global mean temperature is rising".to_string()),
            url: Some("https://example.org".to_string()),
            data_set: Some("data".to_string()),
            boolean: Some("on".to_string()),
        }
    }

    fn controversy(id: i64) -> Controversy {
        Controversy {
            id,
            name: format!("C{}", id),
            description: String::new(),
            slug: format!("c{}", id),
        }
    }

    #[test]
    fn test_valid_submission_cleans() {
        let point = clean_data_point(&valid_submission(), 7).unwrap();
        assert_eq!(point.controversy_id, 7);
        assert_eq!(point.name, "temp-rise");
        assert_eq!(point.category, Category::Data);
        assert!(point.boolean);
    }

    #[test]
    fn test_submitted_controversy_is_ignored() {
        let mut submission = valid_submission();
        submission.controversy = Some("999".to_string());

        let point = clean_data_point(&submission, 7).unwrap();
        assert_eq!(point.controversy_id, 7);
    }

    #[test]
    fn test_missing_fields_reported() {
        let errors = clean_data_point(&DataPointSubmission::default(), 1).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["name", "description", "url", "data_set"]);
        assert_eq!(errors.get("name"), Some(REQUIRED));
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let mut submission = valid_submission();
        submission.name = Some("   ".to_string());
        let errors = clean_data_point(&submission, 1).unwrap_err();
        assert_eq!(errors.get("name"), Some(REQUIRED));
    }

    #[test]
    fn test_name_length_limit() {
        let mut submission = valid_submission();
        submission.name = Some("x".repeat(33));
        let errors = clean_data_point(&submission, 1).unwrap_err();
        assert!(errors.get("name").unwrap().contains("at most 32"));

        submission.name = Some("x".repeat(32));
        assert!(clean_data_point(&submission, 1).is_ok());
    }

    #[test]
    fn test_url_validation() {
        assert!(validate_url("https://example.org").is_ok());
        assert!(validate_url("http://example.org/path?q=1").is_ok());
        assert!(validate_url("ftp://files.example.org/a.txt").is_ok());
        assert!(validate_url("example.org").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("mailto:someone@example.org").is_err());
        assert!(validate_url("https://").is_err());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut submission = valid_submission();
        submission.data_set = Some("rumour".to_string());
        let errors = clean_data_point(&submission, 1).unwrap_err();
        assert!(errors.get("data_set").unwrap().contains("rumour"));
    }

    #[test]
    fn test_checkbox_semantics() {
        assert_eq!(parse_checkbox(None), Ok(false));
        assert_eq!(parse_checkbox(Some("")), Ok(false));
        assert_eq!(parse_checkbox(Some("false")), Ok(false));
        assert_eq!(parse_checkbox(Some("on")), Ok(true));
        assert_eq!(parse_checkbox(Some("TRUE")), Ok(true));
        assert!(parse_checkbox(Some("maybe")).is_err());
    }

    #[test]
    fn test_unchecked_box_is_false() {
        let mut submission = valid_submission();
        submission.boolean = None;
        assert!(!clean_data_point(&submission, 1).unwrap().boolean);
    }

    #[test]
    fn test_admin_requires_known_controversy() {
        let choices = vec![controversy(1), controversy(2)];

        let mut submission = valid_submission();
        submission.controversy = Some("2".to_string());
        assert_eq!(clean_admin_data_point(&submission, &choices).unwrap().controversy_id, 2);

        submission.controversy = Some("3".to_string());
        let errors = clean_admin_data_point(&submission, &choices).unwrap_err();
        assert!(errors.get("controversy").is_some());

        submission.controversy = None;
        let errors = clean_admin_data_point(&submission, &choices).unwrap_err();
        assert_eq!(errors.get("controversy"), Some(REQUIRED));
    }

    #[test]
    fn test_controversy_slug_prepopulated_from_name() {
        let submission = ControversySubmission {
            name: Some("Climate Change".to_string()),
            description: Some("Is it happening?".to_string()),
            slug: Some("".to_string()),
        };
        let cleaned = clean_controversy(&submission).unwrap();
        assert_eq!(cleaned.slug, "climate-change");
    }

    #[test]
    fn test_controversy_explicit_slug_validated() {
        let submission = ControversySubmission {
            name: Some("Climate".to_string()),
            description: Some("d".to_string()),
            slug: Some("not a slug".to_string()),
        };
        let errors = clean_controversy(&submission).unwrap_err();
        assert!(errors.get("slug").unwrap().starts_with("Slug may only contain"));
    }

    #[test]
    fn test_controversy_unsluggable_name() {
        let submission = ControversySubmission {
            name: Some("???".to_string()),
            description: Some("d".to_string()),
            slug: None,
        };
        let errors = clean_controversy(&submission).unwrap_err();
        assert!(errors.get("slug").is_some());
    }
}
