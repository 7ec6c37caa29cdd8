//! Splits cleaned revision text into an ordered, total, stable sequence of
//! tokens. Token kinds are `break` (a run of newlines — the only legal
//! start/end for a new-comment insertion), `word` (a run of non-whitespace
//! characters) and `other` (a run of non-newline whitespace, e.g. spaces or
//! tabs). Concatenating every token's `text` in order reconstructs the input
//! exactly, so the tokenizer never discards information.
//!
//! The same [`tokenize`] function must be used for both sides of a diff;
//! callers should never hand-roll an alternative splitter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Break,
    Word,
    Other,
}

/// A single token. Tokens are value objects; once produced they are never
/// mutated, only sliced or recombined by reference into new `Vec`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn is_break(&self) -> bool {
        self.kind == TokenKind::Break
    }
}

/// Tokenize `text` into a total, stable sequence of [`Token`]s.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            let start = i;
            while i < chars.len() && chars[i] == '\n' {
                i += 1;
            }
            tokens.push(Token::new(chars[start..i].iter().collect::<String>(), TokenKind::Break));
        } else if c.is_whitespace() {
            let start = i;
            while i < chars.len() && chars[i] != '\n' && chars[i].is_whitespace() {
                i += 1;
            }
            tokens.push(Token::new(chars[start..i].iter().collect::<String>(), TokenKind::Other));
        } else {
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            tokens.push(Token::new(chars[start..i].iter().collect::<String>(), TokenKind::Word));
        }
    }
    tokens
}

/// Join a slice of tokens back into their literal text.
pub fn join(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_is_total() {
        let text = "== Topic ==\n:Hello world.\n\n::Reply.\n";
        let tokens = tokenize(text);
        assert_eq!(join(&tokens), text);
    }

    #[test]
    fn tokenize_is_stable() {
        let text = "a\nb  c\n\nd";
        assert_eq!(tokenize(text), tokenize(text));
    }

    #[test]
    fn breaks_are_newline_runs() {
        let tokens = tokenize("a\n\nb");
        let break_tok = tokens.iter().find(|t| t.is_break()).unwrap();
        assert_eq!(break_tok.text, "\n\n");
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }
}
