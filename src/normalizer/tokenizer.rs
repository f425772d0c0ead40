//! In-process token source: whitespace splitting, punctuation detachment,
//! sentence ends and number expansion.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::normalizer::numbers::normalize_number;

/// One token as written and as it should be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub original: String,
    pub normalized: String,
}

impl TokenPair {
    pub fn new(original: impl Into<String>, normalized: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            normalized: normalized.into(),
        }
    }

    pub(crate) fn verbatim(text: &str) -> Self {
        Self::new(text, text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    Token(TokenPair),
    SentenceEnd,
}

/// `(byte offset, piece)` for every whitespace-separated piece of `text`.
pub(crate) fn split_whitespace_indices(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let rest = &text[cursor..];
        let lead = rest.len() - rest.trim_start().len();
        let start = cursor + lead;
        if start >= text.len() {
            cursor = text.len();
            return None;
        }
        let len = text[start..]
            .find(char::is_whitespace)
            .unwrap_or(text.len() - start);
        cursor = start + len;
        Some((start, &text[start..cursor]))
    })
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_detachable(c: char) -> bool {
    !c.is_alphanumeric() && !matches!(c, '{' | '}')
}

/// `.` after these stays attached: ordinals ("3."), initials ("J.") and
/// dotted abbreviations ("t.d.").
fn is_abbreviation(core: &str) -> bool {
    let mut chars = core.chars();
    let single_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
    single_letter || core.chars().all(|c| c.is_ascii_digit()) || core.contains('.')
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTokenizer;

impl LocalTokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize<'a>(&self, text: &'a str) -> LocalTokens<'a> {
        LocalTokens {
            text,
            pieces: Box::new(split_whitespace_indices(text)),
            pending: VecDeque::new(),
        }
    }
}

/// Lazy token stream over one text.
pub struct LocalTokens<'a> {
    text: &'a str,
    pieces: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    pending: VecDeque<TokenEvent>,
}

impl<'a> LocalTokens<'a> {
    /// A `{` piece absorbs following pieces up to the closing brace. Returns
    /// the span and whatever follows the brace in the closing piece.
    fn embedded_span(&mut self, start: usize, first: &'a str) -> (&'a str, &'a str) {
        let text = self.text;
        let closing = |offset: usize, piece: &str| piece.find('}').map(|i| offset + i + 1);

        if let Some(close) = closing(start, first) {
            return (&text[start..close], &text[close..start + first.len()]);
        }
        let mut end = start + first.len();
        for (offset, piece) in self.pieces.by_ref() {
            if let Some(close) = closing(offset, piece) {
                return (&text[start..close], &text[close..offset + piece.len()]);
            }
            end = offset + piece.len();
        }
        (&text[start..end], "")
    }

    fn push_token(&mut self, original: &str, normalized: String) {
        self.pending
            .push_back(TokenEvent::Token(TokenPair::new(original, normalized)));
    }

    fn push_punctuation(&mut self, punct: &str) {
        self.pending
            .push_back(TokenEvent::Token(TokenPair::verbatim(punct)));
        if punct.chars().all(is_terminal) {
            self.pending.push_back(TokenEvent::SentenceEnd);
        }
    }

    fn split_piece(&mut self, piece: &str) {
        if !piece.chars().any(char::is_alphanumeric) {
            self.push_punctuation(piece);
            return;
        }

        let core_start = piece.len() - piece.trim_start_matches(is_detachable).len();
        let mut core_end = piece.trim_end_matches(is_detachable).len();
        let core = &piece[core_start..core_end];
        if piece[core_end..].starts_with('.') && is_abbreviation(core) {
            core_end += 1;
        }

        for c in piece[..core_start].chars() {
            let mut buf = [0u8; 4];
            self.push_punctuation(c.encode_utf8(&mut buf));
        }

        let word = &piece[core_start..core_end];
        let digits = word.trim_end_matches('.');
        let normalized = if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            normalize_number(digits)
        } else {
            word.to_string()
        };
        self.push_token(word, normalized);

        for c in piece[core_end..].chars() {
            let mut buf = [0u8; 4];
            self.push_punctuation(c.encode_utf8(&mut buf));
        }
    }
}

impl Iterator for LocalTokens<'_> {
    type Item = TokenEvent;

    fn next(&mut self) -> Option<TokenEvent> {
        while self.pending.is_empty() {
            let (start, piece) = self.pieces.next()?;
            if piece.starts_with('{') {
                let (span, rest) = self.embedded_span(start, piece);
                self.pending
                    .push_back(TokenEvent::Token(TokenPair::verbatim(span)));
                if !rest.is_empty() {
                    self.split_piece(rest);
                }
            } else {
                self.split_piece(piece);
            }
        }
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(text: &str) -> Vec<TokenEvent> {
        LocalTokenizer::new().tokenize(text).collect()
    }

    fn tok(original: &str, normalized: &str) -> TokenEvent {
        TokenEvent::Token(TokenPair::new(original, normalized))
    }

    #[test]
    fn whitespace_indices_are_byte_offsets() {
        let pieces: Vec<(usize, &str)> = split_whitespace_indices("  Halló\tþú  ").collect();
        assert_eq!(pieces, [(2, "Halló"), (9, "þú")]);
        assert_eq!(split_whitespace_indices("   ").count(), 0);
    }

    #[test]
    fn detaches_punctuation_and_ends_sentences() {
        assert_eq!(
            events("Halló, heimur! Bless."),
            [
                tok("Halló", "Halló"),
                tok(",", ","),
                tok("heimur", "heimur"),
                tok("!", "!"),
                TokenEvent::SentenceEnd,
                tok("Bless", "Bless"),
                tok(".", "."),
                TokenEvent::SentenceEnd,
            ]
        );
    }

    #[test]
    fn leading_quote_is_separate_token() {
        assert_eq!(
            events("\"Já\""),
            [tok("\"", "\""), tok("Já", "Já"), tok("\"", "\"")]
        );
    }

    #[test]
    fn numbers_are_expanded() {
        assert_eq!(
            events("21 kettir"),
            [tok("21", "tuttugu og einn"), tok("kettir", "kettir")]
        );
    }

    #[test]
    fn ordinals_and_abbreviations_keep_their_dot() {
        assert_eq!(
            events("3. maí t.d. A. Jónsson"),
            [
                tok("3.", "þrír"),
                tok("maí", "maí"),
                tok("t.d.", "t.d."),
                tok("A.", "A."),
                tok("Jónsson", "Jónsson"),
            ]
        );
    }

    #[test]
    fn embedded_phones_stay_whole() {
        assert_eq!(
            events("{t O: a: D} já"),
            [tok("{t O: a: D}", "{t O: a: D}"), tok("já", "já")]
        );
    }

    #[test]
    fn embedded_phones_end_at_closing_brace() {
        assert_eq!(
            events("Hann sagði {tʰaːð}."),
            [
                tok("Hann", "Hann"),
                tok("sagði", "sagði"),
                tok("{tʰaːð}", "{tʰaːð}"),
                tok(".", "."),
                TokenEvent::SentenceEnd,
            ]
        );
        assert_eq!(events("{a}b"), [tok("{a}", "{a}"), tok("b", "b")]);
        assert_eq!(
            events("{t O: a:}, já"),
            [tok("{t O: a:}", "{t O: a:}"), tok(",", ","), tok("já", "já")]
        );
    }

    #[test]
    fn punctuation_only_piece_is_one_token() {
        assert_eq!(
            events("Nú ... já"),
            [
                tok("Nú", "Nú"),
                tok("...", "..."),
                TokenEvent::SentenceEnd,
                tok("já", "já"),
            ]
        );
    }
}
