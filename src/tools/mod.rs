mod current_date;
mod web_search;

use crate::search::SearchProvider;
use crate::types::{ToolSet, ToolSetCreationError};

pub use current_date::GetCurrentDate;
pub use web_search::{MAX_RESULTS_LIMIT, NO_RESULTS, WebSearch};

/// What the tools need from the outside world.
pub struct ToolContext {
    pub search: Box<dyn SearchProvider>,
    pub default_max_results: u32,
}

impl ToolContext {
    pub fn new(search: impl SearchProvider + 'static, default_max_results: u32) -> Self {
        Self {
            search: Box::new(search),
            default_max_results,
        }
    }
}

pub fn default_toolset() -> Result<ToolSet<ToolContext>, ToolSetCreationError> {
    ToolSet::new()
        .add_tool::<GetCurrentDate>()?
        .add_tool::<WebSearch>()
}
