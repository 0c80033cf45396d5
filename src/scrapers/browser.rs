use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use scraper::{Html, Selector};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{debug, info};

use crate::scrapers::traits::{DriverError, DriverResult, SearchDriver};
use crate::scrapers::types::{
    Suggestion, SUGGESTION_ENTRY, SUGGESTION_REGION, SUGGESTION_SUBURB,
};

/// `SearchDriver` backed by a headless Chrome instance
///
/// Each driver owns its own browser process and tab; nothing is shared
/// across sessions.
pub struct ChromeDriver {
    browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    /// Launch the browser binary at `driver_path` and open one tab
    pub fn new(driver_path: &Path) -> Result<Self> {
        info!("Launching headless Chrome from {:?}...", driver_path);

        let options = LaunchOptions::default_builder()
            .headless(true)
            .path(Some(driver_path.to_path_buf()))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open a tab")?;

        Ok(Self { browser, tab })
    }

    /// Parse one dropdown entry's HTML into its label pair
    ///
    /// A missing sub-element yields an empty string, not an error.
    fn parse_suggestion(html: &str) -> Suggestion {
        let fragment = Html::parse_fragment(html);
        let suburb_selector = Selector::parse(SUGGESTION_SUBURB).unwrap();
        let region_selector = Selector::parse(SUGGESTION_REGION).unwrap();

        let text_of = |selector: &Selector| {
            fragment
                .select(selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default()
        };

        Suggestion::new(text_of(&suburb_selector), text_of(&region_selector))
    }
}

impl SearchDriver for ChromeDriver {
    fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.tab.navigate_to(url)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> DriverResult<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_| DriverError::WaitTimeout(selector.to_string()))?;
        Ok(())
    }

    fn type_into(&mut self, selector: &str, text: &str) -> DriverResult<()> {
        // The session only types into elements it has already waited for, so
        // any failure here means the page re-rendered and invalidated the node.
        let stale = |_| DriverError::Stale(selector.to_string());

        let element = self.tab.find_element(selector).map_err(stale)?;
        element.click().map_err(stale)?;
        element
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .map_err(stale)?;
        element.type_into(text).map_err(stale)?;
        Ok(())
    }

    fn list_suggestions(&mut self) -> DriverResult<Vec<Suggestion>> {
        let entries = self.tab.find_elements(SUGGESTION_ENTRY).unwrap_or_default();

        let mut suggestions = Vec::with_capacity(entries.len());
        for entry in &entries {
            let html = entry.get_content()?;
            suggestions.push(Self::parse_suggestion(&html));
        }
        Ok(suggestions)
    }

    fn click_suggestion(&mut self, index: usize) -> DriverResult<()> {
        // Re-query instead of holding element handles; the dropdown may have
        // re-rendered since listing.
        let entries = self.tab.find_elements(SUGGESTION_ENTRY).unwrap_or_default();
        let entry = entries
            .get(index)
            .ok_or_else(|| DriverError::Stale(SUGGESTION_ENTRY.to_string()))?;
        entry.click()?;
        Ok(())
    }

    fn read_texts(&mut self, selector: &str) -> DriverResult<Vec<String>> {
        let elements = self.tab.find_elements(selector).unwrap_or_default();

        let mut texts = Vec::with_capacity(elements.len());
        for element in &elements {
            texts.push(element.get_inner_text()?.trim().to_string());
        }
        Ok(texts)
    }

    fn shutdown(&mut self) {
        let Some(pid) = self.browser.get_process_id() else {
            debug!("Browser process already gone, nothing to tear down");
            return;
        };
        let root = Pid::from_u32(pid);

        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        for child in descendants_of(&sys, root) {
            match sys.process(child) {
                Some(process) => {
                    debug!(
                        "Killing child process ({}) - {:?} [{}]",
                        child,
                        process.name(),
                        process.status()
                    );
                    if !process.kill() {
                        debug!("Couldn't kill process ({}). May be already gone!", child);
                    }
                }
                None => debug!("Child process ({}) already exited", child),
            }
        }

        if let Some(process) = sys.process(root) {
            debug!("Killing main process ({}) - {:?}", root, process.name());
            process.kill();
        }
        // Dropping the handle closes the automation connection gracefully.
    }
}

/// All transitive child processes of `root`, breadth-first
fn descendants_of(sys: &System, root: Pid) -> Vec<Pid> {
    let mut found = Vec::new();
    let mut frontier = vec![root];

    while let Some(parent) = frontier.pop() {
        for (pid, process) in sys.processes() {
            if process.parent() == Some(parent) {
                found.push(*pid);
                frontier.push(*pid);
            }
        }
    }
    found
}
