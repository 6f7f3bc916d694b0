//! Vendor form state engine
//!
//! The engine owns the form values, the derived state list, the last
//! validation result and the submission lifecycle. The presentation layer
//! forwards edits through [`FormStateEngine::set_field`] and
//! [`FormStateEngine::toggle_service`], then renders a [`FormSnapshot`].

use super::captcha::CaptchaChallenge;
use super::field::{FieldPath, ScalarField};
use super::validation::{validate, ValidationContext, ValidationErrors};
use super::values::FormValues;
use crate::config::default_services;
use crate::delivery::{SubmissionReceipt, SubmissionSink};
use crate::error::{FieldError, SubmitError};
use crate::regions::{Country, Region, RegionLookup};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Where the form is in its submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Validating,
    Invalid,
    Submitting,
    Success,
    Failure,
}

/// Per-form settings injected at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    /// Check `captchaInput` against a generated challenge
    pub captcha_enabled: bool,
    /// Service tags the user may select
    pub services: Vec<String>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            captcha_enabled: true,
            services: default_services(),
        }
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub values: FormValues,
    pub errors: ValidationErrors,
    pub state_options: Vec<Region>,
    pub show_other_service_detail: bool,
    pub same_as_principals: bool,
    pub status: SubmissionStatus,
    pub captcha: Option<CaptchaChallenge>,
}

#[derive(Debug)]
struct EngineState {
    values: FormValues,
    errors: ValidationErrors,
    same_as_principals: bool,
    state_options: Vec<Region>,
    status: SubmissionStatus,
    captcha: Option<CaptchaChallenge>,
}

impl EngineState {
    fn pristine(captcha: Option<CaptchaChallenge>) -> Self {
        Self {
            values: FormValues::default(),
            errors: ValidationErrors::default(),
            same_as_principals: false,
            state_options: Vec::new(),
            status: SubmissionStatus::Idle,
            captcha,
        }
    }

    fn validate(&self) -> ValidationErrors {
        let ctx = ValidationContext {
            same_as_principals: self.same_as_principals,
            captcha: self.captcha.as_ref(),
        };
        validate(&self.values, &ctx)
    }

    /// Back to the empty form with a fresh challenge; status is left to the caller
    fn clear(&mut self) {
        let captcha = self.captcha.as_ref().map(CaptchaChallenge::regenerate);
        let status = self.status;
        *self = Self::pristine(captcha);
        self.status = status;
    }
}

/// Moves a delivery dropped before the sink answered to `Failure`
struct InFlight<'a> {
    inner: &'a Mutex<EngineState>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.status == SubmissionStatus::Submitting {
            warn!("Vendor form submission abandoned before delivery finished");
            state.status = SubmissionStatus::Failure;
        }
    }
}

/// State and validation engine for one mounted vendor form
///
/// Methods take `&self`; the lock is never held across the delivery await,
/// so edits made while a submission is in flight are accepted without
/// affecting the values being delivered.
pub struct FormStateEngine {
    regions: Arc<dyn RegionLookup>,
    sink: Arc<dyn SubmissionSink>,
    options: FormOptions,
    inner: Mutex<EngineState>,
}

impl FormStateEngine {
    pub fn new(
        regions: Arc<dyn RegionLookup>,
        sink: Arc<dyn SubmissionSink>,
        options: FormOptions,
    ) -> Self {
        let captcha = options
            .captcha_enabled
            .then(|| CaptchaChallenge::generate(0));
        Self {
            regions,
            sink,
            options,
            inner: Mutex::new(EngineState::pristine(captcha)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Countries for the country selector
    pub fn countries(&self) -> Vec<Country> {
        self.regions.countries()
    }

    /// Current state of the form for rendering
    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.lock();
        FormSnapshot {
            values: state.values.clone(),
            errors: state.errors.clone(),
            state_options: state.state_options.clone(),
            show_other_service_detail: state.values.shows_other_service_detail(),
            same_as_principals: state.same_as_principals,
            status: state.status,
            captcha: state.captcha.clone(),
        }
    }

    /// Set a field by dotted path
    ///
    /// Selecting a country recomputes the state list and clears the state.
    /// A state must belong to the selected country's list unless that list
    /// is empty.
    pub fn set_field(&self, path: &str, value: impl Into<String>) -> Result<(), FieldError> {
        let field = path
            .parse::<FieldPath>()
            .inspect_err(|err| warn!("{err}"))?;
        let value = value.into();
        let mut state = self.lock();

        match field {
            FieldPath::Scalar(ScalarField::Country) => {
                state.state_options = self.regions.regions_of(&value);
                state.values.state.clear();
                debug!(
                    country = %value,
                    states = state.state_options.len(),
                    "Country changed"
                );
                state.values.country = value;
            }
            FieldPath::Scalar(ScalarField::State)
                if !value.is_empty()
                    && !state.state_options.is_empty()
                    && !state.state_options.iter().any(|r| r.code == value) =>
            {
                let err = FieldError::UnknownRegion {
                    country: state.values.country.clone(),
                    region: value,
                };
                warn!("{err}");
                return Err(err);
            }
            _ => {
                debug!(field = %field, "Field updated");
                state.values.set(field, value);
            }
        }
        Ok(())
    }

    /// Select or deselect a service tag; repeating either is a no-op
    pub fn toggle_service(&self, tag: &str, selected: bool) -> Result<(), FieldError> {
        if !self.options.services.iter().any(|s| s == tag) {
            let err = FieldError::UnknownService(tag.to_string());
            warn!("{err}");
            return Err(err);
        }

        let mut state = self.lock();
        if selected {
            state.values.services.insert(tag.to_string());
        } else {
            state.values.services.remove(tag);
        }
        debug!(service = tag, selected, "Service toggled");
        Ok(())
    }

    /// Declare the scheduling contact identical to the principal
    ///
    /// Only suppresses validation of the scheduling contact; no values are
    /// copied.
    pub fn set_same_as_principals(&self, same: bool) {
        self.lock().same_as_principals = same;
    }

    /// Issue a new CAPTCHA challenge; no-op when CAPTCHA is disabled
    pub fn refresh_captcha(&self) {
        let mut state = self.lock();
        if let Some(captcha) = state.captcha.as_mut() {
            *captcha = captcha.regenerate();
            debug!(generation = captcha.generation(), "CAPTCHA refreshed");
        }
    }

    /// Run all validation rules against the current values
    ///
    /// Does not touch the stored error map; only `submit()` records errors.
    pub fn validate(&self) -> ValidationErrors {
        self.lock().validate()
    }

    /// Discard everything the user entered
    pub fn reset(&self) {
        let mut state = self.lock();
        if state.status == SubmissionStatus::Submitting {
            warn!("Reset requested while a delivery is in flight; ignoring");
            return;
        }
        state.clear();
        state.status = SubmissionStatus::Idle;
    }

    /// Validate and, when valid, deliver the form once
    ///
    /// On success the form returns to its empty shape with a fresh CAPTCHA.
    /// On delivery failure every entered value is kept for a retry. Dropping
    /// the returned future before delivery finishes counts as a failure.
    pub async fn submit(&self) -> Result<SubmissionReceipt, SubmitError> {
        let values = {
            let mut state = self.lock();
            if state.status == SubmissionStatus::Submitting {
                warn!("Submit requested while a delivery is in flight");
                return Err(SubmitError::AlreadySubmitting);
            }

            state.status = SubmissionStatus::Validating;
            let errors = state.validate();
            if !errors.is_empty() {
                info!(error_count = errors.len(), "Vendor form has errors");
                state.errors = errors.clone();
                state.status = SubmissionStatus::Invalid;
                return Err(SubmitError::Invalid(errors));
            }

            state.errors = ValidationErrors::default();
            state.status = SubmissionStatus::Submitting;
            state.values.clone()
        };

        info!(legal_name = %values.legal_name, "Submitting vendor form");
        let mut in_flight = InFlight {
            inner: &self.inner,
            settled: false,
        };
        let outcome = self.sink.deliver(&values).await;
        in_flight.settled = true;

        let mut state = self.lock();
        match outcome {
            Ok(receipt) => {
                info!(id = %receipt.id, "Vendor form submitted successfully");
                state.clear();
                state.status = SubmissionStatus::Success;
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "Vendor form submission failed");
                state.status = SubmissionStatus::Failure;
                Err(SubmitError::Delivery(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::MockSubmissionSink;
    use crate::regions::{MockRegionLookup, StaticRegions};
    use crate::state::forms::captcha::CAPTCHA_LENGTH;
    use crate::state::forms::field::{ContactField, ContactRole};
    use crate::state::forms::validation::{CAPTCHA_MESSAGE, REQUIRED_MESSAGE};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready};

    // Sink that holds every delivery until released
    #[derive(Default)]
    struct GatedSink {
        release: Notify,
        delivered: Mutex<Vec<FormValues>>,
    }

    #[async_trait]
    impl SubmissionSink for GatedSink {
        async fn deliver(&self, values: &FormValues) -> anyhow::Result<SubmissionReceipt> {
            self.delivered.lock().unwrap().push(values.clone());
            self.release.notified().await;
            Ok(SubmissionReceipt::now())
        }
    }

    fn succeeding_sink(times: usize) -> Arc<MockSubmissionSink> {
        let mut sink = MockSubmissionSink::new();
        sink.expect_deliver()
            .times(times)
            .returning(|_| Ok(SubmissionReceipt::now()));
        Arc::new(sink)
    }

    fn engine_with(sink: Arc<dyn SubmissionSink>, captcha_enabled: bool) -> FormStateEngine {
        FormStateEngine::new(
            Arc::new(StaticRegions::new()),
            sink,
            FormOptions {
                captcha_enabled,
                ..Default::default()
            },
        )
    }

    fn fill_valid(engine: &FormStateEngine) {
        let fields = [
            ("legalName", "Northwind Learning LLC"),
            ("address1", "12 Harbor Way"),
            ("city", "Anchorage"),
            ("zip", "99501"),
            ("telephone", "+19075550100"),
            ("email", "info@northwind.example"),
            ("country", "US"),
            ("state", "AK"),
            ("topics", "Cloud, Networking"),
            ("independentInstructor", "No"),
        ];
        for (path, value) in fields {
            engine.set_field(path, value).unwrap();
        }
        for role in [ContactRole::Principals, ContactRole::Scheduling] {
            for field in ContactField::REQUIRED {
                let value = match field {
                    ContactField::Email => "person@northwind.example",
                    ContactField::Telephone => "9075550101",
                    _ => "Sam",
                };
                engine
                    .set_field(&FieldPath::Contact(role, field).to_string(), value)
                    .unwrap();
            }
        }
        if let Some(captcha) = engine.snapshot().captcha {
            engine.set_field("captchaInput", captcha.text()).unwrap();
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn test_new_engine_is_pristine() {
            let engine = engine_with(succeeding_sink(0), true);
            let snapshot = engine.snapshot();

            assert_eq!(snapshot.values, FormValues::default());
            assert!(snapshot.errors.is_empty());
            assert!(snapshot.state_options.is_empty());
            assert!(!snapshot.show_other_service_detail);
            assert!(!snapshot.same_as_principals);
            assert_eq!(snapshot.status, SubmissionStatus::Idle);
        }

        #[test]
        fn test_captcha_generated_on_creation() {
            let engine = engine_with(succeeding_sink(0), true);
            let captcha = engine.snapshot().captcha.unwrap();
            assert_eq!(captcha.text().len(), CAPTCHA_LENGTH);
            assert_eq!(captcha.generation(), 0);
        }

        #[test]
        fn test_captcha_absent_when_disabled() {
            let engine = engine_with(succeeding_sink(0), false);
            assert!(engine.snapshot().captcha.is_none());
        }

        #[test]
        fn test_countries_come_from_lookup() {
            let engine = engine_with(succeeding_sink(0), true);
            assert_eq!(engine.countries().len(), 3);
        }

        #[test]
        fn test_snapshot_serializes_camel_case() {
            let engine = engine_with(succeeding_sink(0), false);
            let json = serde_json::to_value(engine.snapshot()).unwrap();
            assert_eq!(json["status"], "idle");
            assert!(json["stateOptions"].as_array().unwrap().is_empty());
            assert_eq!(json["showOtherServiceDetail"], false);
            assert!(json["captcha"].is_null());
        }
    }

    mod set_field {
        use super::*;

        #[test]
        fn test_sets_scalar_and_contact_fields() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.set_field("city", "Boston").unwrap();
            engine.set_field("financeContact.email", "ap@vendor.example").unwrap();

            let values = engine.snapshot().values;
            assert_eq!(values.city, "Boston");
            assert_eq!(values.finance_contact.email, "ap@vendor.example");
        }

        #[test]
        fn test_unknown_path_rejected() {
            let engine = engine_with(succeeding_sink(0), true);
            assert_eq!(
                engine.set_field("faxNumber", "555"),
                Err(FieldError::UnknownField("faxNumber".to_string()))
            );
            assert_eq!(engine.snapshot().values, FormValues::default());
        }

        #[test]
        fn test_does_not_validate() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.set_field("email", "not-an-email").unwrap();
            assert!(engine.snapshot().errors.is_empty());
        }

        #[test]
        fn test_country_change_resets_state_and_options() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.set_field("country", "US").unwrap();
            engine.set_field("state", "CA").unwrap();
            assert_eq!(engine.snapshot().values.state, "CA");

            engine.set_field("country", "AU").unwrap();
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.values.country, "AU");
            assert_eq!(snapshot.values.state, "");
            assert_eq!(snapshot.state_options, StaticRegions::new().regions_of("AU"));
        }

        #[test]
        fn test_reselecting_same_country_still_clears_state() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.set_field("country", "IN").unwrap();
            engine.set_field("state", "AS").unwrap();
            engine.set_field("country", "IN").unwrap();
            assert_eq!(engine.snapshot().values.state, "");
        }

        #[test]
        fn test_clearing_country_empties_options() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.set_field("country", "US").unwrap();
            engine.set_field("country", "").unwrap();
            assert!(engine.snapshot().state_options.is_empty());
        }

        #[test]
        fn test_state_outside_country_rejected() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.set_field("country", "US").unwrap();
            assert_eq!(
                engine.set_field("state", "NSW"),
                Err(FieldError::UnknownRegion {
                    country: "US".to_string(),
                    region: "NSW".to_string(),
                })
            );
            assert_eq!(engine.snapshot().values.state, "");
        }

        #[test]
        fn test_state_can_be_cleared() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.set_field("country", "US").unwrap();
            engine.set_field("state", "AZ").unwrap();
            engine.set_field("state", "").unwrap();
            assert_eq!(engine.snapshot().values.state, "");
        }

        #[test]
        fn test_free_text_state_when_country_has_no_subdivisions() {
            let mut regions = MockRegionLookup::new();
            regions
                .expect_regions_of()
                .times(1)
                .returning(|_| Vec::new());
            let engine =
                FormStateEngine::new(Arc::new(regions), succeeding_sink(0), FormOptions::default());

            engine.set_field("country", "SG").unwrap();
            engine.set_field("state", "Central").unwrap();
            assert_eq!(engine.snapshot().values.state, "Central");
        }

        #[test]
        fn test_lookup_consulted_with_country_code() {
            let mut regions = MockRegionLookup::new();
            regions.expect_regions_of().times(1).returning(|code| {
                if code == "CA" {
                    vec![Region::new("ON", "Ontario")]
                } else {
                    Vec::new()
                }
            });
            let engine =
                FormStateEngine::new(Arc::new(regions), succeeding_sink(0), FormOptions::default());

            engine.set_field("country", "CA").unwrap();
            assert_eq!(
                engine.snapshot().state_options,
                vec![Region::new("ON", "Ontario")]
            );
        }
    }

    mod services {
        use super::*;

        #[test]
        fn test_other_round_trip_restores_set() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.toggle_service("Training", true).unwrap();
            let before = engine.snapshot().values.services;

            engine.toggle_service("Other", true).unwrap();
            assert!(engine.snapshot().show_other_service_detail);
            engine.toggle_service("Other", false).unwrap();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.values.services, before);
            assert!(!snapshot.show_other_service_detail);
        }

        #[test]
        fn test_toggle_is_idempotent() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.toggle_service("Mentoring", true).unwrap();
            engine.toggle_service("Mentoring", true).unwrap();
            assert_eq!(engine.snapshot().values.services.len(), 1);

            engine.toggle_service("Consulting", false).unwrap();
            assert_eq!(engine.snapshot().values.services.len(), 1);
        }

        #[test]
        fn test_unknown_service_rejected() {
            let engine = engine_with(succeeding_sink(0), true);
            assert_eq!(
                engine.toggle_service("Catering", true),
                Err(FieldError::UnknownService("Catering".to_string()))
            );
            assert!(engine.snapshot().values.services.is_empty());
        }

        #[test]
        fn test_catalog_comes_from_options() {
            let engine = FormStateEngine::new(
                Arc::new(StaticRegions::new()),
                succeeding_sink(0),
                FormOptions {
                    captcha_enabled: false,
                    services: vec!["Facilities".to_string()],
                },
            );
            assert!(engine.toggle_service("Facilities", true).is_ok());
            assert!(engine.toggle_service("Training", true).is_err());
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn test_filled_form_is_valid() {
            let engine = engine_with(succeeding_sink(0), true);
            fill_valid(&engine);
            assert_eq!(engine.validate(), ValidationErrors::default());
        }

        #[test]
        fn test_validate_does_not_store_errors() {
            let engine = engine_with(succeeding_sink(0), true);
            assert!(!engine.validate().is_empty());
            assert!(engine.snapshot().errors.is_empty());
        }

        #[test]
        fn test_refresh_invalidates_previous_answer() {
            let engine = engine_with(succeeding_sink(0), true);
            fill_valid(&engine);
            let old = engine.snapshot().captcha.unwrap();

            engine.refresh_captcha();
            let new = engine.snapshot().captcha.unwrap();
            assert_eq!(new.generation(), old.generation() + 1);

            if new.text() != old.text() {
                assert_eq!(engine.validate().get("captchaInput"), Some(CAPTCHA_MESSAGE));
            }
        }

        #[test]
        fn test_refresh_is_noop_without_captcha() {
            let engine = engine_with(succeeding_sink(0), false);
            engine.refresh_captcha();
            assert!(engine.snapshot().captcha.is_none());
        }

        #[test]
        fn test_same_as_principals_suppresses_scheduling_errors() {
            let engine = engine_with(succeeding_sink(0), false);
            fill_valid(&engine);
            engine.set_field("schedulingContact.firstName", "").unwrap();
            assert_eq!(
                engine.validate().get("schedulingContact.firstName"),
                Some(REQUIRED_MESSAGE)
            );

            engine.set_same_as_principals(true);
            assert!(engine.validate().is_empty());
            assert_eq!(engine.snapshot().values.scheduling_contact.first_name, "");
        }
    }

    mod submit {
        use super::*;

        #[tokio::test]
        async fn test_invalid_form_is_not_delivered() {
            let engine = engine_with(succeeding_sink(0), true);
            engine.set_field("legalName", "Northwind").unwrap();

            let errors = match engine.submit().await {
                Err(SubmitError::Invalid(errors)) => errors,
                other => panic!("expected validation failure, got {other:?}"),
            };

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.status, SubmissionStatus::Invalid);
            assert_eq!(snapshot.errors, errors);
            assert!(!errors.contains("legalName"));
            assert_eq!(errors.get("city"), Some(REQUIRED_MESSAGE));
            assert_eq!(snapshot.values.legal_name, "Northwind");
        }

        #[tokio::test]
        async fn test_success_resets_form() {
            let engine = engine_with(succeeding_sink(1), true);
            fill_valid(&engine);
            engine.toggle_service("Other", true).unwrap();
            engine.set_same_as_principals(true);
            let used = engine.snapshot().captcha.unwrap();

            engine.submit().await.unwrap();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.status, SubmissionStatus::Success);
            assert_eq!(snapshot.values, FormValues::default());
            assert!(snapshot.errors.is_empty());
            assert!(snapshot.state_options.is_empty());
            assert!(!snapshot.same_as_principals);
            assert!(!snapshot.show_other_service_detail);
            assert_eq!(
                snapshot.captcha.unwrap().generation(),
                used.generation() + 1
            );
        }

        #[tokio::test]
        async fn test_errors_cleared_after_corrected_submit() {
            let engine = engine_with(succeeding_sink(1), false);
            assert!(engine.submit().await.is_err());
            assert!(!engine.snapshot().errors.is_empty());

            fill_valid(&engine);
            engine.submit().await.unwrap();
            assert!(engine.snapshot().errors.is_empty());
        }

        #[tokio::test]
        async fn test_delivery_failure_preserves_values() {
            let mut sink = MockSubmissionSink::new();
            sink.expect_deliver()
                .times(1)
                .returning(|_| Err(anyhow!("connection reset")));
            let engine = engine_with(Arc::new(sink), true);
            fill_valid(&engine);
            let before = engine.snapshot();

            let result = engine.submit().await;
            assert_eq!(
                result,
                Err(SubmitError::Delivery("connection reset".to_string()))
            );

            let after = engine.snapshot();
            assert_eq!(after.status, SubmissionStatus::Failure);
            assert_eq!(after.values, before.values);
            assert_eq!(after.captcha, before.captcha);
            assert_eq!(after.state_options, before.state_options);
        }

        #[tokio::test]
        async fn test_retry_after_failure_restarts_cycle() {
            let mut sink = MockSubmissionSink::new();
            let mut seq = mockall::Sequence::new();
            sink.expect_deliver()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Err(anyhow!("gateway timeout")));
            sink.expect_deliver()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(SubmissionReceipt::now()));
            let engine = engine_with(Arc::new(sink), true);
            fill_valid(&engine);

            assert!(engine.submit().await.is_err());
            assert!(engine.submit().await.is_ok());
            assert_eq!(engine.snapshot().status, SubmissionStatus::Success);
        }

        #[test]
        fn test_second_submit_while_submitting_is_rejected() {
            let sink = Arc::new(GatedSink::default());
            let engine = engine_with(sink.clone(), true);
            fill_valid(&engine);

            let mut first = tokio_test::task::spawn(engine.submit());
            assert_pending!(first.poll());
            assert_eq!(engine.snapshot().status, SubmissionStatus::Submitting);

            let second = tokio_test::block_on(engine.submit());
            assert_eq!(second, Err(SubmitError::AlreadySubmitting));
            assert_eq!(engine.snapshot().status, SubmissionStatus::Submitting);

            sink.release.notify_one();
            let result = assert_ready!(first.poll());
            assert!(result.is_ok());
            assert_eq!(sink.delivered.lock().unwrap().len(), 1);
        }

        #[test]
        fn test_edits_during_submission_do_not_affect_delivery() {
            let sink = Arc::new(GatedSink::default());
            let engine = engine_with(sink.clone(), true);
            fill_valid(&engine);

            let mut first = tokio_test::task::spawn(engine.submit());
            assert_pending!(first.poll());

            engine.set_field("city", "Juneau").unwrap();
            assert_eq!(engine.snapshot().values.city, "Juneau");

            sink.release.notify_one();
            assert!(assert_ready!(first.poll()).is_ok());
            assert_eq!(sink.delivered.lock().unwrap()[0].city, "Anchorage");
        }

        #[test]
        fn test_reset_ignored_while_submitting() {
            let sink = Arc::new(GatedSink::default());
            let engine = engine_with(sink.clone(), false);
            fill_valid(&engine);

            let mut first = tokio_test::task::spawn(engine.submit());
            assert_pending!(first.poll());
            engine.reset();
            assert_eq!(engine.snapshot().status, SubmissionStatus::Submitting);

            sink.release.notify_one();
            assert!(assert_ready!(first.poll()).is_ok());
        }

        #[tokio::test(start_paused = true)]
        async fn test_timed_out_submit_can_be_retried() {
            let sink = Arc::new(GatedSink::default());
            let engine = engine_with(sink.clone(), true);
            fill_valid(&engine);
            let before = engine.snapshot();

            let timed_out = tokio::time::timeout(Duration::from_millis(10), engine.submit()).await;
            assert!(timed_out.is_err());

            let after = engine.snapshot();
            assert_eq!(after.status, SubmissionStatus::Failure);
            assert_eq!(after.values, before.values);
            assert_eq!(after.captcha, before.captcha);

            sink.release.notify_one();
            assert!(engine.submit().await.is_ok());
            assert_eq!(engine.snapshot().status, SubmissionStatus::Success);
            assert_eq!(sink.delivered.lock().unwrap().len(), 2);
        }

        #[test]
        fn test_dropped_submit_allows_reset() {
            let sink = Arc::new(GatedSink::default());
            let engine = engine_with(sink.clone(), false);
            fill_valid(&engine);

            let mut first = tokio_test::task::spawn(engine.submit());
            assert_pending!(first.poll());
            drop(first);
            assert_eq!(engine.snapshot().status, SubmissionStatus::Failure);

            engine.reset();
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.status, SubmissionStatus::Idle);
            assert_eq!(snapshot.values, FormValues::default());
        }
    }

    mod reset {
        use super::*;

        #[test]
        fn test_reset_restores_pristine_form() {
            let engine = engine_with(succeeding_sink(0), true);
            fill_valid(&engine);
            engine.toggle_service("Translation", true).unwrap();
            let generation = engine.snapshot().captcha.unwrap().generation();

            engine.reset();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.values, FormValues::default());
            assert!(snapshot.state_options.is_empty());
            assert_eq!(snapshot.status, SubmissionStatus::Idle);
            assert_eq!(snapshot.captcha.unwrap().generation(), generation + 1);
        }
    }
}
