use super::normalize::normalize_german;
use crate::tokenizer::config::Language;
use crate::tokenizer::token::Token;
use std::collections::HashSet;
use std::sync::Arc;

const MIN_WORD_SIZE: usize = 3;
const MIN_SUBWORD_SIZE: usize = 3;
const MAX_SUBWORD_SIZE: usize = 15;

// Household and kitchen vocabulary for splitting common German compounds.
const GERMAN_DICTIONARY: &[&str] = &[
    "auflauf", "back", "becher", "besteck", "blech", "brat", "brett", "brot", "dose", "eis",
    "essig", "form", "gabel", "garten", "gemüse", "geschirr", "glas", "grill", "hand", "haus",
    "herd", "kaffee", "kanne", "kasten", "kessel", "kinder", "kirsch", "koch", "korb", "kuchen",
    "küche", "löffel", "maschine", "messer", "milch", "mixer", "mühle", "müsli", "obst", "öl",
    "pfanne", "pfeffer", "platte", "reibe", "rühr", "rüst", "salat", "salz", "schale", "schäler",
    "schere", "schneide", "schüssel", "schweizer", "set", "sieb", "silber", "spül", "stab",
    "steak", "suppe", "tasse", "tee", "teig", "teller", "topf", "tuch", "waage", "wasser",
    "wein", "würz", "zange", "zucker",
];

/// Dictionary-driven compound splitter.
///
/// For every start offset the longest dictionary word is emitted as a subword
/// token directly after the original token, at the same position.
#[derive(Debug, Clone)]
pub struct CompoundFilter {
    dictionary: Arc<HashSet<String>>,
}

impl CompoundFilter {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        CompoundFilter {
            dictionary: Arc::new(words.iter().map(|w| w.as_ref().to_lowercase()).collect()),
        }
    }

    /// Dictionary splitter for `language`. German dictionaries also hold the
    /// normalized spelling of every word (`gemüse` and `gemuse`) so splitting
    /// still works after the normalize filter.
    pub fn with_language<S: AsRef<str>>(words: &[S], language: Language) -> Self {
        let mut dictionary: HashSet<String> =
            words.iter().map(|w| w.as_ref().to_lowercase()).collect();
        if language == Language::German {
            let normalized: Vec<String> = dictionary.iter().map(|w| normalize_german(w)).collect();
            dictionary.extend(normalized);
        }
        CompoundFilter {
            dictionary: Arc::new(dictionary),
        }
    }

    /// Built-in dictionary for languages that have one.
    pub fn for_language(language: Language) -> Option<Self> {
        match language {
            Language::German => Some(Self::with_language(GERMAN_DICTIONARY, language)),
            _ => None,
        }
    }

    fn subwords(&self, term: &str) -> Vec<String> {
        let chars: Vec<char> = term.to_lowercase().chars().collect();
        if chars.len() < MIN_WORD_SIZE {
            return Vec::new();
        }

        let mut parts = Vec::new();
        for start in 0..=chars.len().saturating_sub(MIN_SUBWORD_SIZE) {
            let mut longest = None;
            for size in MIN_SUBWORD_SIZE..=MAX_SUBWORD_SIZE {
                if start + size > chars.len() {
                    break;
                }
                let candidate: String = chars[start..start + size].iter().collect();
                if self.dictionary.contains(&candidate) {
                    longest = Some(candidate);
                }
            }
            if let Some(part) = longest {
                if part.chars().count() < chars.len() {
                    parts.push(part);
                }
            }
        }
        parts
    }

    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            let parts = if token.keyword {
                Vec::new()
            } else {
                self.subwords(&token.term)
            };
            let base = token.clone();
            out.push(token);
            out.extend(parts.into_iter().map(|p| base.variant(p)));
        }
        out
    }
}
