//! Settings model

use crate::error::ValidationError;
use crate::scan::{DirectoryIgnorePolicy, FileExtensionPolicy};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "https://ollama.com";
pub const DEFAULT_MODEL: &str = "gpt-oss:120b";
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub intake: IntakeSettings,
    pub discover: DiscoverSettings,
    pub render: RenderSettings,
    pub server: ServerSettings,
}

/// External generation service connection. Read-only after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub host: String,
    pub model: String,
    pub api_key: Option<String>,
    pub connect_timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            connect_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeSettings {
    pub max_payload_bytes: u64,
    pub extensions: Vec<String>,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            extensions: [".ts", ".js", ".tsx", ".jsx"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IntakeSettings {
    pub fn extension_policy(&self) -> Result<FileExtensionPolicy, ValidationError> {
        FileExtensionPolicy::new(&self.extensions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverSettings {
    pub extensions: Vec<String>,
    pub ignored_directories: Vec<String>,
    pub follow_symlinks: bool,
}

impl Default for DiscoverSettings {
    fn default() -> Self {
        Self {
            extensions: [".tsx", ".jsx", ".js", ".ts"].iter().map(|s| s.to_string()).collect(),
            ignored_directories: ["node_modules", "__tests__", "dist", "build"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            follow_symlinks: false,
        }
    }
}

impl DiscoverSettings {
    pub fn extension_policy(&self) -> Result<FileExtensionPolicy, ValidationError> {
        FileExtensionPolicy::new(&self.extensions)
    }

    pub fn ignore_policy(&self) -> DirectoryIgnorePolicy {
        DirectoryIgnorePolicy::new(&self.ignored_directories)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Re-render the accumulated markdown every N chunks; 0 renders once at the end.
    pub snapshot_every: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "127.0.0.1:5000".to_string() }
    }
}

impl Settings {
    /// Copy safe to print: the credential is masked.
    pub fn redacted(&self) -> Settings {
        let mut copy = self.clone();
        if copy.service.api_key.is_some() {
            copy.service.api_key = Some("[REDACTED]".to_string());
        }
        copy
    }
}
