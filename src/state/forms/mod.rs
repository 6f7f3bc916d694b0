//! Form domain layer
//!
//! Typed field addressing, the vendor form's values, its validation rules
//! and the engine that ties them to a submission lifecycle.

mod captcha;
mod field;
mod form_state;
mod validation;
mod values;

pub use captcha::{CaptchaChallenge, CAPTCHA_LENGTH};
pub use field::{ContactField, ContactRole, FieldPath, ScalarField};
pub use form_state::{FormOptions, FormSnapshot, FormStateEngine, SubmissionStatus};
pub use validation::{
    validate, ValidationContext, ValidationErrors, CAPTCHA_MESSAGE, INVALID_EMAIL_MESSAGE,
    INVALID_PHONE_MESSAGE, INVALID_URL_MESSAGE, INVALID_ZIP_MESSAGE, REQUIRED_MESSAGE,
};
pub use values::{ContactInfo, FormValues, OTHER_SERVICE};
