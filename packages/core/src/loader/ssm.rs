//! AWS Systems Manager Parameter Store backend.
//!
//! # Behavior
//!
//! - **One request per parameter**: each name is fetched with decryption
//! - **Short keys**: values are stored under the last `/` segment of the name
//! - **Partial results**: a failed parameter is logged and skipped
//!
//! The AWS client is compiled in with the `ssm` feature. Without it,
//! [`connect`] reports the client as unavailable.

use crate::error::{FetchError, LoadError};
use async_trait::async_trait;
use std::fmt;
use tracing::error;

/// Remote store answering fetch-by-name requests.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch the decrypted value of a single parameter.
    async fn get_parameter(&self, name: &str) -> Result<String, FetchError>;
}

/// Result of fetching one parameter.
#[derive(Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded {
        name: String,
        key: String,
        value: String,
    },
    Failed {
        name: String,
        error: FetchError,
    },
}

impl FetchOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Loaded { name, .. } | Self::Failed { name, .. } => name,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

impl fmt::Debug for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { name, key, .. } => f
                .debug_struct("Loaded")
                .field("name", name)
                .field("key", key)
                .finish_non_exhaustive(),
            Self::Failed { name, error } => f
                .debug_struct("Failed")
                .field("name", name)
                .field("error", error)
                .finish(),
        }
    }
}

/// Reduce a hierarchical parameter name to its final path segment.
///
/// `/app/db/password` becomes `password`; a name without `/` is unchanged.
pub fn local_key(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Fetch every parameter in order, one request each.
///
/// Never fails as a whole: each name yields exactly one outcome.
pub async fn fetch_all(store: &dyn ParameterStore, names: &[String]) -> Vec<FetchOutcome> {
    let mut outcomes = Vec::with_capacity(names.len());

    for name in names {
        let name = name.trim();

        let result = if name.is_empty() {
            Err(FetchError::EmptyName)
        } else {
            store.get_parameter(name).await
        };

        match result {
            Ok(value) => outcomes.push(FetchOutcome::Loaded {
                name: name.to_string(),
                key: local_key(name).to_string(),
                value,
            }),
            Err(e) => {
                error!(parameter = name, error = %e, "Error fetching parameter");
                outcomes.push(FetchOutcome::Failed {
                    name: name.to_string(),
                    error: e,
                });
            }
        }
    }

    outcomes
}

/// Whether this build carries the AWS client.
pub const fn client_available() -> bool {
    cfg!(feature = "ssm")
}

/// Build a parameter store client for `region`.
#[cfg(feature = "ssm")]
pub async fn connect(region: String) -> Result<Box<dyn ParameterStore>, LoadError> {
    Ok(Box::new(AwsParameterStore::connect(region).await))
}

/// Build a parameter store client for `region`.
#[cfg(not(feature = "ssm"))]
pub async fn connect(_region: String) -> Result<Box<dyn ParameterStore>, LoadError> {
    Err(LoadError::ClientUnavailable(
        "built without the `ssm` feature".to_string(),
    ))
}

#[cfg(feature = "ssm")]
pub use aws::AwsParameterStore;

#[cfg(feature = "ssm")]
mod aws {
    use super::ParameterStore;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use aws_config::BehaviorVersion;
    use aws_sdk_ssm::config::Region;
    use aws_sdk_ssm::error::DisplayErrorContext;

    /// Parameter store backed by `aws-sdk-ssm`.
    ///
    /// Credentials come from the standard AWS provider chain.
    #[derive(Debug, Clone)]
    pub struct AwsParameterStore {
        client: aws_sdk_ssm::Client,
    }

    impl AwsParameterStore {
        pub async fn connect(region: String) -> Self {
            let config = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region))
                .load()
                .await;

            Self::from_client(aws_sdk_ssm::Client::new(&config))
        }

        pub fn from_client(client: aws_sdk_ssm::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl ParameterStore for AwsParameterStore {
        async fn get_parameter(&self, name: &str) -> Result<String, FetchError> {
            let output = self
                .client
                .get_parameter()
                .name(name)
                .with_decryption(true)
                .send()
                .await
                .map_err(|e| FetchError::Remote(DisplayErrorContext(&e).to_string()))?;

            output
                .parameter()
                .and_then(|parameter| parameter.value())
                .map(str::to_string)
                .ok_or(FetchError::MissingValue)
        }
    }
}
