use crate::tokenizer::token::{Token, TokenType};
use std::collections::HashMap;

/// Expands a term into the other members of every synonym group it belongs to.
#[derive(Debug, Clone)]
pub struct SynonymFilter {
    expansions: HashMap<String, Vec<String>>,
}

impl SynonymFilter {
    pub fn new(groups: &[Vec<String>]) -> Self {
        let mut expansions: HashMap<String, Vec<String>> = HashMap::new();
        for group in groups {
            for member in group {
                let entry = expansions.entry(member.clone()).or_default();
                for other in group {
                    if other != member && !entry.contains(other) {
                        entry.push(other.clone());
                    }
                }
            }
        }
        SynonymFilter { expansions }
    }

    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            let synonyms = self.expansions.get(&token.term).cloned();
            let base = token.clone();
            out.push(token);
            for synonym in synonyms.into_iter().flatten() {
                let mut variant = base.variant(synonym);
                variant.token_type = TokenType::Synonym;
                variant.keyword = true;
                out.push(variant);
            }
        }
        out
    }
}
