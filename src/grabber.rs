use url::Url;
use log::{error, info};

use crate::extractor::{Extractor, Vacancy};
use crate::fetcher::{FetchError, Fetcher};

/// Fetch-then-extract facade. Stateless between calls; a caller that wants
/// several result pages simply invokes it once per page URL.
pub struct Grabber {
    fetcher: Fetcher,
    extractor: Extractor,
}

impl Grabber {
    pub fn new() -> Self {
        Grabber {
            fetcher: Fetcher::new(),
            extractor: Extractor::new(),
        }
    }

    /// Grabs all vacancies from one search results page. Returns either
    /// the complete record sequence or the single terminal fetch error;
    /// malformed listings are dropped silently along the way.
    pub fn grab_vacancies(&self, url: &str, timeout_ms: u64) -> Result<Vec<Vacancy>, FetchError> {
        // Normalize the page URL up front; it doubles as the base for
        // resolving relative vacancy links.
        let base_url = Url::parse(url).map_err(|e| {
            error!("Invalid URL {}: {}", url, e);
            FetchError::Other(format!("invalid url: {}", e))
        })?;

        let document = self.fetcher.fetch(url, timeout_ms)?;
        let vacancies = self.extractor.extract(&document, &base_url);

        info!("Grabbed {} vacancies from {}", vacancies.len(), url);
        Ok(vacancies)
    }
}

impl Default for Grabber {
    fn default() -> Self {
        Self::new()
    }
}
