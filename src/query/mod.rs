pub mod engine;
pub mod parser;
pub mod vector;

pub use engine::{SIMILARITY_THRESHOLD, SearchEngine, SearchStrategy};
pub use parser::parse_query;
// Re-exports for public API
#[allow(unused_imports)]
pub use parser::{Operator, QueryToken, query_terms};
