mod extractor;

pub use extractor::{Extractor, WebExtractor};
