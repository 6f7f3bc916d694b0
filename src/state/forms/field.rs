//! Form field addressing
//!
//! Fields are addressed by dotted paths such as `"city"` or
//! `"principals.email"`. Paths double as the keys of the validation-error
//! map, so the presentation layer can look up an error with the same string
//! it used to edit the field.

use crate::error::FieldError;
use std::fmt;
use std::str::FromStr;

/// Top-level string fields of the vendor form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    LegalName,
    DoingBusinessAs,
    Address1,
    Address2,
    City,
    Zip,
    Website,
    Telephone,
    Email,
    State,
    Country,
    Topics,
    IndependentInstructor,
    ReferenceContact,
    OtherServiceDetail,
    CaptchaInput,
}

impl ScalarField {
    pub const ALL: [ScalarField; 16] = [
        Self::LegalName,
        Self::DoingBusinessAs,
        Self::Address1,
        Self::Address2,
        Self::City,
        Self::Zip,
        Self::Website,
        Self::Telephone,
        Self::Email,
        Self::State,
        Self::Country,
        Self::Topics,
        Self::IndependentInstructor,
        Self::ReferenceContact,
        Self::OtherServiceDetail,
        Self::CaptchaInput,
    ];

    /// Fields that must be non-empty before the form can be submitted
    pub const REQUIRED: [ScalarField; 10] = [
        Self::LegalName,
        Self::Address1,
        Self::City,
        Self::Zip,
        Self::Telephone,
        Self::Email,
        Self::State,
        Self::Country,
        Self::Topics,
        Self::IndependentInstructor,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::LegalName => "legalName",
            Self::DoingBusinessAs => "doingBusinessAs",
            Self::Address1 => "address1",
            Self::Address2 => "address2",
            Self::City => "city",
            Self::Zip => "zip",
            Self::Website => "website",
            Self::Telephone => "telephone",
            Self::Email => "email",
            Self::State => "state",
            Self::Country => "country",
            Self::Topics => "topics",
            Self::IndependentInstructor => "independentInstructor",
            Self::ReferenceContact => "referenceContact",
            Self::OtherServiceDetail => "otherServiceDetail",
            Self::CaptchaInput => "captchaInput",
        }
    }
}

/// The three contact sections of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactRole {
    Principals,
    Scheduling,
    Finance,
}

impl ContactRole {
    pub const ALL: [ContactRole; 3] = [Self::Principals, Self::Scheduling, Self::Finance];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Principals => "principals",
            Self::Scheduling => "schedulingContact",
            Self::Finance => "financeContact",
        }
    }
}

/// Fields of a single contact section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    JobTitle,
    Email,
    AlternateEmail,
    Telephone,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::JobTitle,
        Self::Email,
        Self::AlternateEmail,
        Self::Telephone,
    ];

    /// Contact fields that must be filled for a validated contact section
    pub const REQUIRED: [ContactField; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::JobTitle,
        Self::Email,
        Self::Telephone,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::JobTitle => "jobTitle",
            Self::Email => "email",
            Self::AlternateEmail => "alternateEmail",
            Self::Telephone => "telephone",
        }
    }
}

/// A parsed dotted field path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Scalar(ScalarField),
    Contact(ContactRole, ContactField),
}

impl FieldPath {
    /// All addressable paths, in form order
    pub fn all() -> impl Iterator<Item = FieldPath> {
        ScalarField::ALL
            .into_iter()
            .map(FieldPath::Scalar)
            .chain(ContactRole::ALL.into_iter().flat_map(|role| {
                ContactField::ALL
                    .into_iter()
                    .map(move |field| FieldPath::Contact(role, field))
            }))
    }
}

impl FromStr for FieldPath {
    type Err = FieldError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || FieldError::UnknownField(path.to_string());

        match path.split_once('.') {
            None => ScalarField::ALL
                .into_iter()
                .find(|f| f.key() == path)
                .map(FieldPath::Scalar)
                .ok_or_else(unknown),
            Some((section, field)) => {
                let role = ContactRole::ALL
                    .into_iter()
                    .find(|r| r.key() == section)
                    .ok_or_else(unknown)?;
                let field = ContactField::ALL
                    .into_iter()
                    .find(|f| f.key() == field)
                    .ok_or_else(unknown)?;
                Ok(FieldPath::Contact(role, field))
            }
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Scalar(field) => f.write_str(field.key()),
            FieldPath::Contact(role, field) => write!(f, "{}.{}", role.key(), field.key()),
        }
    }
}
