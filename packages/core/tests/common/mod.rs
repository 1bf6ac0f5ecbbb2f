//! Common testing utilities for Secret Sidecar integration tests.

use async_trait::async_trait;
use secret_sidecar::config::{BackendConfig, DotenvSettings, SecretsSource};
use secret_sidecar::error::FetchError;
use secret_sidecar::loader::ParameterStore;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Test context that manages temporary files and directories.
pub struct TestContext {
    /// Path to temporary directory
    pub temp_path: PathBuf,
    /// The temporary directory (kept to prevent early deletion)
    _temp_dir: TempDir,
}

impl TestContext {
    /// Create a new test context with a temporary directory.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let temp_path = temp_dir.path().to_path_buf();

        Ok(Self {
            temp_path,
            _temp_dir: temp_dir,
        })
    }

    /// Create a test file with content.
    pub fn create_file(&self, name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let file_path = self.temp_path.join(name);
        let mut file = fs::File::create(&file_path)?;
        file.write_all(content.as_bytes())?;
        Ok(file_path)
    }

    /// Create an env file from key/value pairs.
    #[allow(dead_code)]
    pub fn create_env_file(
        &self,
        name: &str,
        secrets: &[(impl AsRef<str>, impl AsRef<str>)],
    ) -> anyhow::Result<PathBuf> {
        let content = secrets
            .iter()
            .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
            .collect::<Vec<_>>()
            .join("\n");

        self.create_file(name, &content)
    }

    /// Get the path to a file in the temp directory.
    #[allow(dead_code)]
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_path.join(name)
    }

    /// Dotenv config over a file in this context, without the process
    /// environment layered on top.
    #[allow(dead_code)]
    pub fn isolated_dotenv_config(&self, name: &str) -> BackendConfig {
        BackendConfig {
            source: SecretsSource::Dotenv,
            dotenv: DotenvSettings {
                path: self.path(name),
                inherit_env: false,
            },
            region: None,
            parameter_names: None,
        }
    }
}

/// In-memory parameter store that counts requests.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockParameterStore {
    values: HashMap<String, String>,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockParameterStore {
    pub fn with(values: &[(&str, &str)]) -> Self {
        Self {
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterStore for MockParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.values.get(name).cloned().ok_or_else(|| {
            FetchError::Remote(format!("ParameterNotFound: parameter {} not found", name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_context_create_env_file() {
        let ctx = TestContext::new().unwrap();
        let file_path = ctx
            .create_env_file(".env", &[("KEY1", "value1"), ("KEY2", "value2")])
            .unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert!(content.contains("KEY1=value1"));
        assert!(content.contains("KEY2=value2"));
    }
}
