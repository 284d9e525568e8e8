//! Auxiliary tools for askrelay.
//!
//! Two search-grounded tools the model can route a question to:
//! - `get_general_response`: web search for general topics
//! - `get_quran_response`: search scoped to quran.com

pub mod declarations;
pub mod search;
pub mod types;

pub use declarations::function_declarations;
pub use search::SearchTools;
pub use types::{ToolInvocation, ToolName, ToolResult};
