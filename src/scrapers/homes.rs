use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::models::{Query, ResultRecord, NA};
use crate::scrapers::traits::{DriverError, DriverResult, SearchDriver};
use crate::scrapers::types::{
    Suggestion, HERO_BANNER, SEARCH_INPUT, SITE_URL, STAT_CAPTION, STAT_VALUE, SUGGESTION_LIST,
};

const STALE_RETRY_LIMIT: u32 = 5;
const STALE_RETRY_BASE: Duration = Duration::from_secs(1);

/// One scrape session: drives a single browser through the homes.co.nz
/// search flow, one query at a time, accumulating a record per query.
pub struct HomesScraper<D: SearchDriver> {
    driver: D,
    timeout: Duration,
    stale_backoff: Duration,
    output: Vec<ResultRecord>,
}

impl<D: SearchDriver> HomesScraper<D> {
    pub fn new(driver: D, page_load_timeout: Duration) -> Self {
        Self {
            driver,
            timeout: page_load_timeout,
            stale_backoff: STALE_RETRY_BASE,
            output: Vec::new(),
        }
    }

    #[cfg(test)]
    fn with_stale_backoff(mut self, backoff: Duration) -> Self {
        self.stale_backoff = backoff;
        self
    }

    /// Process every query in order and return the accumulated records.
    ///
    /// A wait timeout skips that query; any other error abandons the rest of
    /// the batch. The browser is torn down on every exit path, and whatever
    /// was accumulated up to that point is returned.
    pub fn run(mut self, queries: &[Query]) -> Vec<ResultRecord> {
        let total = queries.len();
        let mut processed = 0;

        for query in queries {
            match self.fetch(query) {
                Ok(()) => {}
                Err(DriverError::WaitTimeout(selector)) => {
                    error!(
                        "NOT FOUND. Couldn't fetch data for {} - {} (never saw {})",
                        query.suburb, query.region, selector
                    );
                }
                Err(err) => {
                    error!("Unexpected browser error, abandoning batch: {err}");
                    break;
                }
            }
            processed += 1;
        }

        if processed < total {
            warn!(
                "Session ended early: processed {} of {} queries",
                processed, total
            );
        }

        self.driver.shutdown();
        self.output
    }

    /// Run the full navigate / search / select / scrape sequence for one query
    fn fetch(&mut self, query: &Query) -> DriverResult<()> {
        info!("Fetching for {} - {}", query.suburb, query.region);

        self.driver.navigate(SITE_URL)?;
        self.driver.wait_for(HERO_BANNER, self.timeout)?;
        self.driver.wait_for(SEARCH_INPUT, self.timeout)?;

        self.type_with_retry(&query.suburb)?;
        self.driver.wait_for(SUGGESTION_LIST, self.timeout)?;

        let suggestions = self.driver.list_suggestions()?;
        match choose(&suggestions, &query.suburb, &query.region) {
            None => {
                info!("Skipped {} - {} ...", query.suburb, query.region);
                self.output.push(ResultRecord::skipped(query));
            }
            Some(index) => {
                let chosen = suggestions[index].clone();
                self.driver.click_suggestion(index)?;
                self.driver.wait_for(STAT_VALUE, self.timeout)?;

                let values = self.driver.read_texts(STAT_VALUE)?;
                let captions = self.driver.read_texts(STAT_CAPTION)?;

                // The stats card lists a handful of figures; the first and
                // last are the median estimate and the capital growth.
                self.output.push(ResultRecord {
                    suburb: query.suburb.clone(),
                    region: query.region.clone(),
                    median_estimate: first_or_na(&values),
                    period1: first_or_na(&captions),
                    capital_growth: last_or_na(&values),
                    period2: last_or_na(&captions),
                    chosen_area: chosen.label(),
                });
            }
        }
        Ok(())
    }

    /// Type the suburb into the search box, retrying a bounded number of
    /// times with doubling backoff when the input goes stale under us
    fn type_with_retry(&mut self, text: &str) -> DriverResult<()> {
        let mut backoff = self.stale_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.driver.type_into(SEARCH_INPUT, text) {
                Err(DriverError::Stale(selector)) => {
                    if attempt >= STALE_RETRY_LIMIT {
                        return Err(DriverError::Stale(selector));
                    }
                    warn!(
                        "Search input went stale (attempt {attempt}), retrying in {:?}",
                        backoff
                    );
                    thread::sleep(backoff);
                    backoff *= 2;
                }
                other => return other,
            }
        }
    }
}

/// Pick which dropdown entry to select for the entered suburb/region.
///
/// An exact case-insensitive match on both labels wins; failing that, the
/// first entry in the Auckland region is the default; failing that, nothing.
fn choose(suggestions: &[Suggestion], suburb: &str, region: &str) -> Option<usize> {
    let suburb = suburb.to_lowercase();
    let region = region.to_lowercase();

    let mut fallback = None;
    for (index, entry) in suggestions.iter().enumerate() {
        let entry_suburb = entry.suburb.to_lowercase();
        let entry_region = entry.region.to_lowercase();

        if entry_suburb == suburb && entry_region == region {
            return Some(index);
        }
        if fallback.is_none() && entry_region == "auckland" {
            fallback = Some(index);
        }
    }
    fallback
}

fn first_or_na(texts: &[String]) -> String {
    texts.first().cloned().unwrap_or_else(|| NA.to_string())
}

fn last_or_na(texts: &[String]) -> String {
    texts.last().cloned().unwrap_or_else(|| NA.to_string())
}
