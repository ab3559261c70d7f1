//! # page-verify
//!
//! Headless page render verification. Define checks in YAML, capture an
//! artifact on success.
//!
//! A run navigates to a target URL, executes an ordered list of bounded
//! waits (visibility, presence, text, URL, network idle), and only once
//! every check has passed writes a PNG screenshot to the configured
//! artifact path. A check that misses its deadline fails the run and
//! leaves any artifact from a previous run untouched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use page_verify::{Runner, VerifyConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> page_verify::Result<()> {
//! let config = VerifyConfig::load("configs/map.yaml")?;
//! let mut runner = Runner::new(&config.browser).await?;
//! let result = runner.run(&config).await?;
//! println!("Success: {}", result.success);
//! runner.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod runner;

pub use config::{
    ArtifactConfig, BrowserConfig, Check, Condition, ExpectCondition, ParamDef, Params, TargetUrl,
    VerifyConfig,
};
pub use runner::{RunResult, Runner};

/// Result type for page-verify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or verification.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("check failed: {0}")]
    CheckFailed(String),
}
