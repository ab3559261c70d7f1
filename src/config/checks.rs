use serde::Deserialize;

/// A bounded wait for a DOM condition.
///
/// Checks are executed in order; the first one that misses its deadline
/// fails the whole run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Unconditional pause.
    Wait(WaitCheck),
    /// Element attached to the DOM.
    WaitFor(SelectorCheck),
    /// Element attached, rendered, and non-zero size.
    WaitForVisible(SelectorCheck),
    /// Element absent or no longer rendered.
    WaitForHidden(SelectorCheck),
    /// Page text contains a substring.
    WaitForText(TextCheck),
    /// Page URL contains a substring.
    WaitForUrl(UrlCheck),
    /// No in-flight network requests for a quiet window.
    WaitForNetworkIdle(NetworkIdleCheck),
}

impl Check {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wait(_) => "wait",
            Self::WaitFor(_) => "wait_for",
            Self::WaitForVisible(_) => "wait_for_visible",
            Self::WaitForHidden(_) => "wait_for_hidden",
            Self::WaitForText(_) => "wait_for_text",
            Self::WaitForUrl(_) => "wait_for_url",
            Self::WaitForNetworkIdle(_) => "wait_for_network_idle",
        }
    }
}

fn default_idle_ms() -> u64 {
    500
}
fn default_timeout_ms() -> u64 {
    10000
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaitCheck {
    pub ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectorCheck {
    pub selector: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextCheck {
    pub text: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlCheck {
    pub contains: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkIdleCheck {
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}
