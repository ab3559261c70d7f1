mod executor;

use crate::config::schema::Condition;
use crate::config::{BrowserConfig, VerifyConfig};
use crate::Result;
use eoka::{Browser, Page};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Result of running a verification.
#[derive(Debug, Serialize)]
pub struct RunResult {
    /// Whether the verification succeeded.
    pub success: bool,
    /// Failure message when `success` is false.
    pub error: Option<String>,
    /// Number of checks that passed.
    pub checks_passed: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
    /// Retry attempts consumed beyond the first try.
    pub retries: u32,
    /// Artifact path, present only when the screenshot was written.
    pub artifact: Option<PathBuf>,
}

/// Drives a browser through a verification config.
pub struct Runner {
    browser: Browser,
    page: Page,
}

impl Runner {
    /// Launch a browser and open an empty page.
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        let (width, height) = match config.viewport {
            Some(ref v) => (v.width, v.height),
            None => (1280, 720),
        };
        debug!(
            headless = config.headless,
            proxy = config.proxy.as_deref(),
            "launching browser"
        );
        let browser = Browser::launch_with_config(eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: width,
            viewport_height: height,
            ..Default::default()
        })
        .await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self { browser, page })
    }

    /// Get a reference to the page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Run the verification with retry support.
    ///
    /// The artifact is written only when every check and every expect
    /// condition passes; a failed run leaves any artifact from a previous
    /// run untouched.
    pub async fn run(&mut self, config: &VerifyConfig) -> Result<RunResult> {
        let started = Instant::now();
        let retry = config.on_failure.as_ref().and_then(|f| f.retry.as_ref());
        let attempts = retry.map_or(1, |r| r.attempts.max(1));
        let delay = Duration::from_millis(retry.map_or(0, |r| r.delay_ms));

        let mut checks_passed = 0;
        let mut failure = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                info!("retrying ({}/{})", attempt, attempts);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            match self.run_once(config, &mut checks_passed).await {
                Ok(()) => {
                    let artifact = self.capture_artifact(config).await?;
                    return Ok(RunResult {
                        success: true,
                        error: None,
                        checks_passed,
                        duration_ms: started.elapsed().as_millis() as u64,
                        retries: attempt - 1,
                        artifact,
                    });
                }
                Err(e) => {
                    warn!("attempt {}/{} failed: {}", attempt, attempts, e);
                    failure = Some(e.to_string());
                }
            }
        }

        self.capture_failure_screenshot(config).await;

        Ok(RunResult {
            success: false,
            error: failure,
            checks_passed,
            duration_ms: started.elapsed().as_millis() as u64,
            retries: attempts - 1,
            artifact: None,
        })
    }

    async fn run_once(&mut self, config: &VerifyConfig, checks_passed: &mut usize) -> Result<()> {
        info!("navigate: {}", config.target.url);
        self.page.goto(&config.target.url).await?;

        *checks_passed = 0;
        for (i, check) in config.checks.iter().enumerate() {
            debug!("Executing check {}: {}", i + 1, check.name());
            executor::execute(&self.page, check).await?;
            *checks_passed += 1;
        }

        self.check_expectations(config).await
    }

    async fn check_expectations(&self, config: &VerifyConfig) -> Result<()> {
        let Some(ref expect) = config.expect else {
            return Ok(());
        };

        if let Some(ref any) = expect.any {
            for cond in any {
                if self.check_condition(cond).await? {
                    return Ok(());
                }
            }
            return Err(crate::Error::CheckFailed(
                "no expect condition was met".into(),
            ));
        }

        if let Some(ref all) = expect.all {
            for cond in all {
                if !self.check_condition(cond).await? {
                    return Err(crate::Error::CheckFailed(format!(
                        "expect condition not met: {}",
                        describe(cond)
                    )));
                }
            }
        }

        Ok(())
    }

    async fn check_condition(&self, condition: &Condition) -> Result<bool> {
        match condition {
            Condition::UrlContains(pattern) => {
                let url = self.page.url().await?;
                Ok(url.contains(pattern))
            }
            Condition::TextContains(pattern) => {
                let text = self.page.text().await?;
                Ok(text.contains(pattern))
            }
        }
    }

    /// Capture the success artifact, creating parent directories as needed.
    async fn capture_artifact(&self, config: &VerifyConfig) -> Result<Option<PathBuf>> {
        let Some(ref artifact) = config.artifact else {
            return Ok(None);
        };

        let path = PathBuf::from(&artifact.path);
        info!("Writing artifact: {}", path.display());
        let data = self.page.screenshot().await?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&path, data)?;
        Ok(Some(path))
    }

    /// Diagnostic screenshot after the final failed attempt. Goes to the
    /// `on_failure.screenshot` path, never the artifact path.
    async fn capture_failure_screenshot(&self, config: &VerifyConfig) {
        let Some(template) = config
            .on_failure
            .as_ref()
            .and_then(|f| f.screenshot.as_deref())
        else {
            return;
        };

        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let path = template.replace("{timestamp}", &seconds.to_string());

        match self.page.screenshot().await {
            Ok(data) => match std::fs::write(&path, data) {
                Ok(()) => info!("Failure screenshot: {}", path),
                Err(e) => warn!("Could not write failure screenshot {}: {}", path, e),
            },
            Err(e) => warn!("Could not capture failure screenshot: {}", e),
        }
    }

    /// Shut the browser down, releasing its process.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

fn describe(condition: &Condition) -> String {
    match condition {
        Condition::UrlContains(p) => format!("url_contains '{}'", p),
        Condition::TextContains(p) => format!("text_contains '{}'", p),
    }
}
