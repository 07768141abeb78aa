//! Summary generation for extracted article text.

mod claude;
mod extractive;

use async_trait::async_trait;

use crate::error::Result;

pub use claude::ClaudeSummarizer;
pub use extractive::ExtractiveSummarizer;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a short summary of `content`. `title` may be used to weight
    /// the result towards the headline topic.
    async fn summarize(&self, title: &str, content: &str) -> Result<String>;

    fn name(&self) -> &str;
}
