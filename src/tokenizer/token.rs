/// Lexical class of a token, set by the tokenizer and kept by most filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Alpha,
    Numeric,
    AlphaNumeric,
    /// Inserted by the synonym filter.
    Synonym,
}

impl TokenType {
    pub fn classify(term: &str) -> Self {
        let mut has_alpha = false;
        let mut has_numeric = false;
        for c in term.chars() {
            if c.is_numeric() {
                has_numeric = true;
            } else {
                has_alpha = true;
            }
        }
        match (has_alpha, has_numeric) {
            (false, true) => TokenType::Numeric,
            (true, true) => TokenType::AlphaNumeric,
            _ => TokenType::Alpha,
        }
    }
}

/// A unit of analyzed text.
///
/// Offsets are byte offsets into the original input. Tokens inserted by
/// filters share the position (and offsets) of the token they derive from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub position: usize,
    pub offset_from: usize,
    pub offset_to: usize,
    pub token_type: TokenType,
    /// Keyword tokens are exempt from stemming.
    pub keyword: bool,
}

impl Token {
    pub fn new(term: impl Into<String>, position: usize, offset_from: usize, offset_to: usize) -> Self {
        let term = term.into();
        let token_type = TokenType::classify(&term);
        Token {
            term,
            position,
            offset_from,
            offset_to,
            token_type,
            keyword: false,
        }
    }

    /// A token derived from `self` with a different term at the same position.
    pub fn variant(&self, term: impl Into<String>) -> Self {
        Token {
            term: term.into(),
            ..self.clone()
        }
    }
}
