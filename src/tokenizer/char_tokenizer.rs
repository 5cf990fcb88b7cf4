use super::config::TokenizerKind;
use super::token::Token;

/// Splits text into maximal runs of characters accepted by a predicate.
#[derive(Clone, Copy)]
pub struct CharTokenizer {
    is_token_char: fn(char) -> bool,
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

fn is_digit(c: char) -> bool {
    c.is_numeric()
}

fn is_letter_or_number(c: char) -> bool {
    c.is_alphanumeric()
}

fn is_not_whitespace(c: char) -> bool {
    !c.is_whitespace()
}

impl CharTokenizer {
    pub fn new(is_token_char: fn(char) -> bool) -> Self {
        CharTokenizer { is_token_char }
    }

    pub fn for_kind(kind: TokenizerKind) -> Self {
        match kind {
            TokenizerKind::Digit => Self::new(is_digit),
            TokenizerKind::Letter => Self::new(is_letter),
            TokenizerKind::AlphaNumeric => Self::new(is_letter_or_number),
            TokenizerKind::Whitespace => Self::new(is_not_whitespace),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;

        for (byte_offset, c) in text.char_indices() {
            if (self.is_token_char)(c) {
                if start.is_none() {
                    start = Some(byte_offset);
                }
            } else if let Some(from) = start.take() {
                let position = tokens.len();
                tokens.push(Token::new(&text[from..byte_offset], position, from, byte_offset));
            }
        }
        if let Some(from) = start {
            let position = tokens.len();
            tokens.push(Token::new(&text[from..], position, from, text.len()));
        }

        tokens
    }
}

impl std::fmt::Debug for CharTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharTokenizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(kind: TokenizerKind, text: &str) -> Vec<String> {
        CharTokenizer::for_kind(kind)
            .tokenize(text)
            .into_iter()
            .map(|t| t.term)
            .collect()
    }

    #[test]
    fn letter_drops_digits_and_punctuation() {
        assert_eq!(terms(TokenizerKind::Letter, "abc1def, ghi"), vec!["abc", "def", "ghi"]);
    }

    #[test]
    fn digit_keeps_only_numbers() {
        assert_eq!(terms(TokenizerKind::Digit, "room 101b floor 3"), vec!["101", "3"]);
    }

    #[test]
    fn alpha_numeric_keeps_mixed_runs() {
        assert_eq!(
            terms(TokenizerKind::AlphaNumeric, "iPhone15 pro-max"),
            vec!["iPhone15", "pro", "max"]
        );
    }

    #[test]
    fn whitespace_keeps_punctuation() {
        assert_eq!(
            terms(TokenizerKind::Whitespace, "  a-b  c.d "),
            vec!["a-b", "c.d"]
        );
    }

    #[test]
    fn offsets_are_bytes_and_positions_count_up() {
        let tokens = CharTokenizer::for_kind(TokenizerKind::Letter).tokenize("grün tee");
        assert_eq!(tokens[0].offset_from, 0);
        assert_eq!(tokens[0].offset_to, "grün".len());
        assert_eq!(tokens[1].offset_from, "grün ".len());
        assert_eq!(tokens[1].position, 1);
    }

    #[test]
    fn empty_input() {
        assert!(terms(TokenizerKind::Letter, "").is_empty());
        assert!(terms(TokenizerKind::Letter, " ,. ").is_empty());
    }
}
