use crate::config::Check;
use crate::{Error, Result};
use eoka::Page;
use tracing::debug;

/// Execute a single check against the page.
///
/// Each wait suspends until the condition is observed or its deadline
/// elapses; a missed deadline is reported as [`Error::Timeout`].
pub async fn execute(page: &Page, check: &Check) -> Result<()> {
    match check {
        Check::Wait(c) => {
            debug!("wait: {}ms", c.ms);
            page.wait(c.ms).await;
        }
        Check::WaitFor(c) => {
            debug!("wait_for: {}", c.selector);
            page.wait_for(&c.selector, c.timeout_ms)
                .await
                .map_err(|e| timeout(&format!("'{}' not found", c.selector), c.timeout_ms, e))?;
        }
        Check::WaitForVisible(c) => {
            debug!("wait_for_visible: {}", c.selector);
            page.wait_for_visible(&c.selector, c.timeout_ms)
                .await
                .map_err(|e| {
                    timeout(&format!("'{}' not visible", c.selector), c.timeout_ms, e)
                })?;
        }
        Check::WaitForHidden(c) => {
            debug!("wait_for_hidden: {}", c.selector);
            page.wait_for_hidden(&c.selector, c.timeout_ms)
                .await
                .map_err(|e| {
                    timeout(&format!("'{}' still visible", c.selector), c.timeout_ms, e)
                })?;
        }
        Check::WaitForText(c) => {
            debug!("wait_for_text: '{}'", c.text);
            page.wait_for_text(&c.text, c.timeout_ms)
                .await
                .map_err(|e| timeout(&format!("text '{}' not found", c.text), c.timeout_ms, e))?;
        }
        Check::WaitForUrl(c) => {
            debug!("wait_for_url: contains '{}'", c.contains);
            page.wait_for_url_contains(&c.contains, c.timeout_ms)
                .await
                .map_err(|e| {
                    timeout(
                        &format!("url does not contain '{}'", c.contains),
                        c.timeout_ms,
                        e,
                    )
                })?;
        }
        Check::WaitForNetworkIdle(c) => {
            debug!(
                "wait_for_network_idle: idle={}ms, timeout={}ms",
                c.idle_ms, c.timeout_ms
            );
            page.wait_for_network_idle(c.idle_ms, c.timeout_ms)
                .await
                .map_err(|e| timeout("network not idle", c.timeout_ms, e))?;
        }
    }
    Ok(())
}

fn timeout(what: &str, timeout_ms: u64, source: eoka::Error) -> Error {
    Error::Timeout(format!("{} within {}ms ({})", what, timeout_ms, source))
}
