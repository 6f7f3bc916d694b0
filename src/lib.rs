//! Vendor funnel - state and validation engine for the training-vendor
//! sign-up form
//!
//! The presentation layer forwards field edits and submit events into a
//! [`FormStateEngine`] and renders the [`FormSnapshot`] it returns. Country
//! and state data come from a [`RegionLookup`]; completed forms go to a
//! [`SubmissionSink`].

pub mod config;
pub mod delivery;
pub mod error;
pub mod regions;
pub mod state;

pub use config::FunnelConfig;
pub use delivery::{SimulatedSink, SubmissionReceipt, SubmissionSink};
pub use error::{FieldError, SubmitError};
pub use regions::{ReferenceRegions, RegionLookup, StaticRegions};
pub use state::{FormOptions, FormSnapshot, FormStateEngine, FormValues, SubmissionStatus};
