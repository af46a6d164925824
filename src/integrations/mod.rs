use async_trait::async_trait;

use crate::error::Result;

pub mod summarizer;

pub use summarizer::HttpSummarizer;

/// External text-summarization service. Strictly best-effort enrichment:
/// callers log failures and carry on without a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;
    fn is_enabled(&self) -> bool;
    async fn health_check(&self) -> Result<()>;
    async fn summarize(&self, text: &str) -> Result<String>;
}
