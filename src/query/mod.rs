pub mod builder;
pub mod context;
pub mod executor;
pub mod fuzzy;
pub mod merge;

pub use builder::{MatchField, MatchQuery, QueryBuilder, QueryTree};
pub use context::SearchContext;
pub use executor::{QueryExecutor, Window};
pub use merge::merge_results;
