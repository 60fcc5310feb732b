pub mod config;
pub mod errors;
pub mod research;
pub mod shutdown;

pub use config::TavilyConfig;
pub use errors::{ConfigError, ResearchError, ResearchResult};
pub use research::client::TavilyClient;
pub use research::options::StreamResearchOptions;
pub use research::types::{
    CitationFormat, OutputSchema, ResearchModel, ResearchProgress, ResearchRequest, Source,
};
