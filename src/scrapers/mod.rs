pub mod browser;
pub mod homes;
pub mod traits;
pub mod types;

pub use browser::ChromeDriver;
pub use homes::HomesScraper;
pub use traits::SearchDriver;
