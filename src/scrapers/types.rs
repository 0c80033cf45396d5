/// homes.co.nz page anatomy
pub const SITE_URL: &str = "https://homes.co.nz/";
pub const HERO_BANNER: &str = ".heroImage";
pub const SEARCH_INPUT: &str = "#autocomplete-search";
pub const SUGGESTION_LIST: &str = ".addressResults";
pub const SUGGESTION_ENTRY: &str = ".addressResult";
pub const SUGGESTION_SUBURB: &str = ".addressResultStreet";
pub const SUGGESTION_REGION: &str = ".addressResultSuburb";
pub const STAT_VALUE: &str = ".statValue";
pub const STAT_CAPTION: &str = ".statNote";

/// Label pair extracted from one dropdown suggestion
///
/// Either part may be empty when the entry lacks the sub-element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub suburb: String,
    pub region: String,
}

impl Suggestion {
    pub fn new(suburb: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            suburb: suburb.into(),
            region: region.into(),
        }
    }

    /// Display label in the site's "<suburb> - <region>" shape
    pub fn label(&self) -> String {
        format!("{} - {}", self.suburb, self.region)
    }
}
