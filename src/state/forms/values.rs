//! Vendor form values

use super::field::{ContactField, ContactRole, FieldPath, ScalarField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Service tag that reveals the free-text detail field
pub const OTHER_SERVICE: &str = "Other";

/// One contact section (principal, scheduling or finance)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub email: String,
    pub alternate_email: String,
    pub telephone: String,
}

impl ContactInfo {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::JobTitle => &self.job_title,
            ContactField::Email => &self.email,
            ContactField::AlternateEmail => &self.alternate_email,
            ContactField::Telephone => &self.telephone,
        }
    }

    fn get_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::JobTitle => &mut self.job_title,
            ContactField::Email => &mut self.email,
            ContactField::AlternateEmail => &mut self.alternate_email,
            ContactField::Telephone => &mut self.telephone,
        }
    }
}

/// Everything the user has entered into the vendor form
///
/// The default value is the pristine, empty form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormValues {
    pub legal_name: String,
    pub doing_business_as: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub zip: String,
    pub website: String,
    pub telephone: String,
    pub email: String,
    pub state: String,
    pub country: String,
    pub topics: String,
    pub independent_instructor: String,
    pub reference_contact: String,
    pub principals: ContactInfo,
    pub scheduling_contact: ContactInfo,
    pub finance_contact: ContactInfo,
    pub services: BTreeSet<String>,
    pub other_service_detail: String,
    pub captcha_input: String,
}

impl FormValues {
    pub fn contact(&self, role: ContactRole) -> &ContactInfo {
        match role {
            ContactRole::Principals => &self.principals,
            ContactRole::Scheduling => &self.scheduling_contact,
            ContactRole::Finance => &self.finance_contact,
        }
    }

    fn contact_mut(&mut self, role: ContactRole) -> &mut ContactInfo {
        match role {
            ContactRole::Principals => &mut self.principals,
            ContactRole::Scheduling => &mut self.scheduling_contact,
            ContactRole::Finance => &mut self.finance_contact,
        }
    }

    /// Read a field by path
    pub fn get(&self, path: FieldPath) -> &str {
        match path {
            FieldPath::Scalar(field) => self.scalar(field),
            FieldPath::Contact(role, field) => self.contact(role).get(field),
        }
    }

    /// Overwrite a field by path, without any cross-field bookkeeping
    pub(crate) fn set(&mut self, path: FieldPath, value: String) {
        let slot = match path {
            FieldPath::Scalar(field) => self.scalar_mut(field),
            FieldPath::Contact(role, field) => self.contact_mut(role).get_mut(field),
        };
        *slot = value;
    }

    /// Whether the free-text detail for the "Other" service is shown
    pub fn shows_other_service_detail(&self) -> bool {
        self.services.contains(OTHER_SERVICE)
    }

    fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::LegalName => &self.legal_name,
            ScalarField::DoingBusinessAs => &self.doing_business_as,
            ScalarField::Address1 => &self.address1,
            ScalarField::Address2 => &self.address2,
            ScalarField::City => &self.city,
            ScalarField::Zip => &self.zip,
            ScalarField::Website => &self.website,
            ScalarField::Telephone => &self.telephone,
            ScalarField::Email => &self.email,
            ScalarField::State => &self.state,
            ScalarField::Country => &self.country,
            ScalarField::Topics => &self.topics,
            ScalarField::IndependentInstructor => &self.independent_instructor,
            ScalarField::ReferenceContact => &self.reference_contact,
            ScalarField::OtherServiceDetail => &self.other_service_detail,
            ScalarField::CaptchaInput => &self.captcha_input,
        }
    }

    fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::LegalName => &mut self.legal_name,
            ScalarField::DoingBusinessAs => &mut self.doing_business_as,
            ScalarField::Address1 => &mut self.address1,
            ScalarField::Address2 => &mut self.address2,
            ScalarField::City => &mut self.city,
            ScalarField::Zip => &mut self.zip,
            ScalarField::Website => &mut self.website,
            ScalarField::Telephone => &mut self.telephone,
            ScalarField::Email => &mut self.email,
            ScalarField::State => &mut self.state,
            ScalarField::Country => &mut self.country,
            ScalarField::Topics => &mut self.topics,
            ScalarField::IndependentInstructor => &mut self.independent_instructor,
            ScalarField::ReferenceContact => &mut self.reference_contact,
            ScalarField::OtherServiceDetail => &mut self.other_service_detail,
            ScalarField::CaptchaInput => &mut self.captcha_input,
        }
    }
}
