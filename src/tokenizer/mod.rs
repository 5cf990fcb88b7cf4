pub mod analyzer;
pub mod char_tokenizer;
pub mod config;
pub mod filters;
pub mod registry;
pub mod token;

pub use analyzer::Analyzer;
pub use config::{AnalyzerConfig, AnalyzerConfigMap, FilterKind, Language, Options, TokenizerKind};
pub use registry::{AnalyzerRegistry, ALL_FIELD, WILDCARD};
pub use token::{Token, TokenType};
