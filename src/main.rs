//! Vendor funnel driver
//!
//! Applies a JSON script of field edits to a fresh vendor form, submits it
//! and prints the resulting snapshot. Without a script argument it prints
//! the pristine form.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vendor_funnel::config::RegionSource;
use vendor_funnel::{
    FormStateEngine, FunnelConfig, ReferenceRegions, RegionLookup, SimulatedSink, StaticRegions,
    SubmitError,
};

/// Edits to replay against the form, in the order a user would make them
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FormScript {
    /// Dotted field path → value
    fields: BTreeMap<String, String>,
    /// Service tags to select
    services: Vec<String>,
    same_as_principals: bool,
    /// Type the current CAPTCHA challenge into `captchaInput`
    solve_captcha: bool,
}

fn apply(engine: &FormStateEngine, script: &FormScript) -> Result<()> {
    // Country first: selecting it clears the state
    if let Some(country) = script.fields.get("country") {
        engine.set_field("country", country.as_str())?;
    }
    for (path, value) in script.fields.iter().filter(|(path, _)| *path != "country") {
        engine.set_field(path, value.as_str())?;
    }
    for tag in &script.services {
        engine.toggle_service(tag, true)?;
    }
    engine.set_same_as_principals(script.same_as_principals);

    if script.solve_captcha {
        if let Some(captcha) = engine.snapshot().captcha {
            engine.set_field("captchaInput", captcha.text())?;
        }
    }
    Ok(())
}

fn build_engine(config: &FunnelConfig) -> Result<FormStateEngine> {
    let regions: Arc<dyn RegionLookup> = match config.region_source() {
        RegionSource::Static => Arc::new(StaticRegions::new()),
        RegionSource::Reference => Arc::new(ReferenceRegions::load()?),
    };
    let sink = Arc::new(SimulatedSink::new(config.submission_delay()));
    Ok(FormStateEngine::new(regions, sink, config.form_options()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendor_funnel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = FunnelConfig::load()?;
    let engine = build_engine(&config)?;

    let Some(path) = std::env::args().nth(1) else {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        return Ok(());
    };

    let content =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    let script: FormScript =
        serde_json::from_str(&content).with_context(|| format!("Invalid form script {path}"))?;
    apply(&engine, &script)?;

    let result = engine.submit().await;
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);

    match result {
        Ok(receipt) => {
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(())
        }
        Err(SubmitError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
