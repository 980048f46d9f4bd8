use std::time::Duration;

use clap::Parser;

use crate::explain::{DEFAULT_MODEL, GEMINI_BASE_URL};
use crate::policy::{AcceptMap, UploadPolicy};

#[derive(Parser, Debug, Clone)]
#[command(name = "file-explainer", about = "Drag-and-drop file explanations via Gemini")]
pub struct Config {
    /// Address to bind, e.g. 0.0.0.0:3000
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GEMINI_API_BASE_URL", default_value = GEMINI_BASE_URL)]
    pub api_base_url: String,

    /// Files a selection may hold
    #[arg(long, env = "MAX_FILES", default_value_t = 1)]
    pub max_files: usize,

    /// Largest file accepted into a selection, in MB
    #[arg(long, env = "MAX_SIZE_MB", default_value_t = 20)]
    pub max_size_mb: usize,

    /// Largest file forwarded for explanation, in MB
    #[arg(long, env = "SUBMISSION_LIMIT_MB", default_value_t = 5)]
    pub submission_limit_mb: usize,

    /// Cosmetic upload progress timer period
    #[arg(long, env = "PROGRESS_INTERVAL_MS", default_value_t = 100)]
    pub progress_interval_ms: u64,

    /// Idle sessions older than this are dropped
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 3600)]
    pub session_ttl_secs: u64,
}

impl Config {
    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy {
            accept: AcceptMap::default(),
            max_files: self.max_files,
            max_size_mb: self.max_size_mb,
            submission_limit_mb: self.submission_limit_mb,
        }
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
