pub mod fetcher;
pub mod extractor;
pub mod grabber;
pub mod logger;

// Exporting types for convenience
pub use fetcher::{FetchError, Fetcher};
pub use extractor::{Extractor, Vacancy};
pub use grabber::Grabber;
