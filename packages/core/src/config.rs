// Secret Sidecar Configuration Module
//
// This module reads the backend selection and its parameters from the
// process environment.

use crate::error::LoadError;
use std::fmt;
use std::path::PathBuf;

/// Selects the secrets backend.
pub const SOURCE_VAR: &str = "SECRETS_SOURCE";
/// Region of the parameter store.
pub const REGION_VAR: &str = "AWS_REGION_NAME";
/// Comma-separated parameter names to fetch.
pub const PARAMETER_NAMES_VAR: &str = "SSM_PARAMETER_NAMES";
/// Path of the env file.
pub const DOTENV_PATH_VAR: &str = "SECRETS_DOTENV_PATH";
/// Whether the process environment is layered over the env file.
pub const DOTENV_INHERIT_VAR: &str = "SECRETS_DOTENV_INHERIT_ENV";

pub const DEFAULT_DOTENV_PATH: &str = ".env";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Backend selected by `SECRETS_SOURCE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SecretsSource {
    /// Local env file. Also the default when the selector is unset.
    #[default]
    Dotenv,
    /// AWS Systems Manager Parameter Store.
    Ssm,
    /// Any other value; loads exactly like `Dotenv` but is reported.
    Unrecognized(String),
}

impl SecretsSource {
    /// Parse the selector. `None` means the variable is unset.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("dotenv") => Self::Dotenv,
            Some("ssm") => Self::Ssm,
            Some(other) => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Dotenv => "dotenv",
            Self::Ssm => "ssm",
            Self::Unrecognized(value) => value,
        }
    }
}

impl fmt::Display for SecretsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Env file backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotenvSettings {
    /// Path to the env file (default: `.env`)
    pub path: PathBuf,

    /// Layer the process environment over the file's entries
    pub inherit_env: bool,
}

impl Default for DotenvSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DOTENV_PATH),
            inherit_env: true,
        }
    }
}

/// Validated parameter store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsmSettings {
    pub region: String,

    /// Parameter names, trimmed, in the order given
    pub parameter_names: Vec<String>,
}

/// Backend selection plus backend-specific parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    pub source: SecretsSource,
    pub dotenv: DotenvSettings,
    pub region: Option<String>,
    pub parameter_names: Option<String>,
}

impl BackendConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = SecretsSource::parse(lookup(SOURCE_VAR).as_deref());

        let mut dotenv = DotenvSettings::default();
        if let Some(path) = lookup(DOTENV_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            dotenv.path = PathBuf::from(path);
        }
        if let Some(flag) = lookup(DOTENV_INHERIT_VAR) {
            dotenv.inherit_env = parse_flag(&flag);
        }

        Self {
            source,
            dotenv,
            region: lookup(REGION_VAR),
            parameter_names: lookup(PARAMETER_NAMES_VAR),
        }
    }

    /// Override the env file path.
    pub fn with_dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv.path = path.into();
        self
    }

    /// Validate the parameter store settings.
    ///
    /// Both the region and the parameter list must be set and non-blank.
    pub fn ssm_settings(&self) -> Result<SsmSettings, LoadError> {
        let region = self
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(LoadError::MissingSetting(REGION_VAR))?;

        let names = self
            .parameter_names
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or(LoadError::MissingSetting(PARAMETER_NAMES_VAR))?;

        Ok(SsmSettings {
            region: region.to_string(),
            parameter_names: names.split(',').map(|n| n.trim().to_string()).collect(),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
