//! Secret loading at startup.
//!
//! # Supported Backends
//!
//! - Env file (`SECRETS_SOURCE=dotenv`, the default)
//! - AWS Systems Manager Parameter Store (`SECRETS_SOURCE=ssm`)
//!
//! Loading never fails: configuration problems and fetch errors are logged,
//! recorded on the [`LoadReport`] and degrade to a smaller (possibly empty)
//! store.

pub mod dotenv;
pub mod ssm;

pub use ssm::{fetch_all, local_key, FetchOutcome, ParameterStore};

use crate::config::{BackendConfig, SecretsSource};
use crate::error::{FetchError, LoadError};
use crate::store::SecretStore;
use std::future::Future;
use tracing::{error, info, warn};

/// A parameter that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterFailure {
    pub name: String,
    pub error: FetchError,
}

/// Everything the loader produced.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Backend that was selected
    pub source: SecretsSource,

    /// Secrets to serve
    pub store: SecretStore,

    /// Parameters skipped by the remote backend
    pub failures: Vec<ParameterFailure>,

    /// Set when the backend could not load anything at all
    pub error: Option<LoadError>,
}

impl LoadReport {
    fn loaded(source: SecretsSource, store: SecretStore) -> Self {
        Self {
            source,
            store,
            failures: Vec::new(),
            error: None,
        }
    }

    fn failed(source: SecretsSource, error: LoadError) -> Self {
        Self {
            source,
            store: SecretStore::empty(),
            failures: Vec::new(),
            error: Some(error),
        }
    }

    fn from_outcomes(source: SecretsSource, outcomes: Vec<FetchOutcome>) -> Self {
        let mut secrets = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for outcome in outcomes {
            match outcome {
                FetchOutcome::Loaded { key, value, .. } => secrets.push((key, value)),
                FetchOutcome::Failed { name, error } => {
                    failures.push(ParameterFailure { name, error })
                }
            }
        }

        Self {
            source,
            store: secrets.into_iter().collect(),
            failures,
            error: None,
        }
    }
}

/// Load secrets from the configured backend.
pub async fn load(config: &BackendConfig) -> LoadReport {
    load_with(config, ssm::connect).await
}

/// Load secrets, building the parameter store client with `connect`.
///
/// `connect` is only called for the `ssm` backend once its settings are
/// valid.
pub async fn load_with<F, Fut>(config: &BackendConfig, connect: F) -> LoadReport
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Box<dyn ParameterStore>, LoadError>>,
{
    let report = match &config.source {
        SecretsSource::Ssm => load_ssm(config, connect).await,
        SecretsSource::Dotenv => {
            LoadReport::loaded(SecretsSource::Dotenv, dotenv::load(&config.dotenv))
        }
        SecretsSource::Unrecognized(value) => {
            warn!(
                selector = %value,
                "SECRETS_SOURCE not set correctly, using .env as default"
            );
            LoadReport::loaded(config.source.clone(), dotenv::load(&config.dotenv))
        }
    };

    info!(
        source = %report.source,
        keys = ?report.store.keys(),
        "Secrets loaded"
    );

    report
}

async fn load_ssm<F, Fut>(config: &BackendConfig, connect: F) -> LoadReport
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Box<dyn ParameterStore>, LoadError>>,
{
    let settings = match config.ssm_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Parameter store settings incomplete");
            return LoadReport::failed(SecretsSource::Ssm, e);
        }
    };

    let client = match connect(settings.region.clone()).await {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Parameter store loading disabled");
            return LoadReport::failed(SecretsSource::Ssm, e);
        }
    };

    let outcomes = fetch_all(client.as_ref(), &settings.parameter_names).await;
    LoadReport::from_outcomes(SecretsSource::Ssm, outcomes)
}
