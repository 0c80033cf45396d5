use std::time::Duration;

use thiserror::Error;

use crate::scrapers::types::Suggestion;

/// Failures a browser interaction can surface to the session.
///
/// Wait timeouts are recovered per query; a stale element is retried by the
/// session; anything else aborts the remaining chunk.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("timed out waiting for element {0:?}")]
    WaitTimeout(String),
    #[error("element {0:?} went stale mid-interaction")]
    Stale(String),
    #[error(transparent)]
    Browser(#[from] anyhow::Error),
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Browser capabilities the scrape session needs
///
/// Keeping the session behind this seam lets it run against a scripted fake
/// in tests instead of a live browser.
pub trait SearchDriver {
    /// Open a URL and block until navigation settles
    fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// Block until an element matching `selector` is present, or time out
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> DriverResult<()>;

    /// Clear the element matching `selector` and type `text` into it
    fn type_into(&mut self, selector: &str, text: &str) -> DriverResult<()>;

    /// Extract the label pair from every suggestion currently in the dropdown
    fn list_suggestions(&mut self) -> DriverResult<Vec<Suggestion>>;

    /// Click the dropdown suggestion at `index` (same ordering as
    /// `list_suggestions`)
    fn click_suggestion(&mut self, index: usize) -> DriverResult<()>;

    /// Inner text of every element matching `selector`, in document order
    fn read_texts(&mut self, selector: &str) -> DriverResult<Vec<String>>;

    /// Tear the browser down; must be safe to call exactly once at session end
    fn shutdown(&mut self);
}
