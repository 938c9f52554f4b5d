//! Web search backends

mod disabled;
mod retrying;
mod tavily;

pub use disabled::DisabledWebSearch;
pub use retrying::RetryingWebSearch;
pub use tavily::{TavilySearch, DEFAULT_TAVILY_BASE_URL};
