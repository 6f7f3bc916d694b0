//! Field validation rules for the vendor form

use super::captcha::CaptchaChallenge;
use super::field::{ContactField, ContactRole, FieldPath, ScalarField};
use super::values::FormValues;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use url::Url;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";
pub const INVALID_PHONE_MESSAGE: &str = "Invalid phone number";
pub const INVALID_ZIP_MESSAGE: &str = "Invalid zip code";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL";
pub const CAPTCHA_MESSAGE: &str = "CAPTCHA text is incorrect";

// Patterns are literals; a compile failure is a programming error
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone pattern compiles"));

static ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("zip pattern compiles"));

/// Field path → error message
///
/// Each validation run produces a fresh map; an empty map means the form
/// can be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, path: impl ToString, message: &str) {
        self.0.insert(path.to_string(), message.to_string());
    }
}

/// Ambient state the rules depend on besides the values themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    /// Scheduling contact is declared identical to the principal
    pub same_as_principals: bool,
    /// Challenge to check `captchaInput` against; `None` skips the check
    pub captcha: Option<&'a CaptchaChallenge>,
}

/// Run every rule against `values`
///
/// Rules never short-circuit each other; a field can only carry one
/// message because format checks apply to non-empty values only.
pub fn validate(values: &FormValues, ctx: &ValidationContext<'_>) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    for field in ScalarField::REQUIRED {
        let path = FieldPath::Scalar(field);
        if values.get(path).is_empty() {
            errors.insert(path, REQUIRED_MESSAGE);
        }
    }

    if !values.email.is_empty() && !is_valid_email(&values.email) {
        errors.insert(ScalarField::Email.key(), INVALID_EMAIL_MESSAGE);
    }
    if !values.telephone.is_empty() && !is_valid_phone(&values.telephone) {
        errors.insert(ScalarField::Telephone.key(), INVALID_PHONE_MESSAGE);
    }
    if !values.zip.is_empty() && !is_valid_zip(&values.zip) {
        errors.insert(ScalarField::Zip.key(), INVALID_ZIP_MESSAGE);
    }
    if !values.website.is_empty() && !is_valid_url(&values.website) {
        errors.insert(ScalarField::Website.key(), INVALID_URL_MESSAGE);
    }

    require_contact(values, ContactRole::Principals, &mut errors);
    if !ctx.same_as_principals {
        require_contact(values, ContactRole::Scheduling, &mut errors);
    }

    if let Some(challenge) = ctx.captcha {
        if !challenge.matches(&values.captcha_input) {
            errors.insert(ScalarField::CaptchaInput.key(), CAPTCHA_MESSAGE);
        }
    }

    errors
}

fn require_contact(values: &FormValues, role: ContactRole, errors: &mut ValidationErrors) {
    for field in ContactField::REQUIRED {
        let path = FieldPath::Contact(role, field);
        if values.get(path).is_empty() {
            errors.insert(path, REQUIRED_MESSAGE);
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

pub fn is_valid_zip(value: &str) -> bool {
    ZIP.is_match(value)
}

/// Absolute URL check, parsed the way browsers parse `new URL(..)`
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}
