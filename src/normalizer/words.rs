//! Token events to [`Word`]s, with byte offsets into the caller's input.

use std::collections::VecDeque;
use std::iter::Peekable;

use crate::error::FrontendError;
use crate::normalizer::numbers::spell_digits;
use crate::normalizer::tokenizer::{TokenEvent, TokenPair};
use crate::phonemes::Phonemes;
use crate::ssml::SsmlWord;
use crate::types::{Alphabet, ProsodyProps, SsmlProps, Word};

pub(crate) type TokenEvents<'a> = Box<dyn Iterator<Item = TokenEvent> + 'a>;

/// Finds `original` in `text[cursor..limit]`: right after any whitespace at
/// the cursor, else further on. Returns the span and the new cursor.
fn locate(text: &str, cursor: usize, limit: usize, original: &str) -> Option<(usize, usize)> {
    let window = text.get(cursor..limit)?;
    let skipped = window.len() - window.trim_start().len();
    let at = cursor + skipped;
    let start = if text[at..limit].starts_with(original) {
        at
    } else {
        at + text[at..limit].find(original)?
    };
    Some((start, start + original.len()))
}

/// Plain text: every token becomes a word, sentence ends become separators.
pub struct PlainWords<'a> {
    text: &'a str,
    tokens: TokenEvents<'a>,
    cursor: usize,
    queued: Option<TokenPair>,
    separator_pending: bool,
    emitted: bool,
}

impl<'a> PlainWords<'a> {
    pub(crate) fn new(text: &'a str, tokens: TokenEvents<'a>) -> Self {
        Self {
            text,
            tokens,
            cursor: 0,
            queued: None,
            separator_pending: false,
            emitted: false,
        }
    }

    fn word(&mut self, pair: TokenPair) -> Word {
        let (start, end) = match locate(self.text, self.cursor, self.text.len(), &pair.original) {
            Some(span) => span,
            None => {
                tracing::warn!(
                    token = %pair.original,
                    cursor = self.cursor,
                    "normalizer: token not found in input, using empty span"
                );
                (self.cursor, self.cursor)
            }
        };
        self.cursor = end;
        Word {
            original_symbol: pair.original,
            symbol: pair.normalized,
            start_byte_offset: start,
            end_byte_offset: end,
            ..Word::default()
        }
    }
}

impl Iterator for PlainWords<'_> {
    type Item = Result<Word, FrontendError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pair = match self.queued.take() {
                Some(pair) => pair,
                None => match self.tokens.next()? {
                    TokenEvent::SentenceEnd => {
                        self.separator_pending = self.emitted;
                        continue;
                    }
                    TokenEvent::Token(pair) => pair,
                },
            };
            if self.separator_pending {
                self.separator_pending = false;
                self.queued = Some(pair);
                return Some(Ok(Word::separator()));
            }
            self.emitted = true;
            return Some(Ok(self.word(pair)));
        }
    }
}

/// Non-whitespace characters of `s`.
fn compact(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// SSML: re-walks the parser's words against the token stream of their text.
pub struct SsmlWords<'a> {
    markup: &'a str,
    parsed: std::vec::IntoIter<SsmlWord>,
    tokens: Peekable<TokenEvents<'a>>,
    phonemes: &'a Phonemes,
    alphabet: Alphabet,
    ready: VecDeque<Word>,
    sentence_pending: bool,
    emitted: bool,
    prosody: Option<ProsodyProps>,
    failed: bool,
}

impl<'a> SsmlWords<'a> {
    pub(crate) fn new(
        markup: &'a str,
        parsed: Vec<SsmlWord>,
        tokens: TokenEvents<'a>,
        phonemes: &'a Phonemes,
        alphabet: Alphabet,
    ) -> Self {
        Self {
            markup,
            parsed: parsed.into_iter(),
            tokens: tokens.peekable(),
            phonemes,
            alphabet,
            ready: VecDeque::new(),
            sentence_pending: false,
            emitted: false,
            prosody: None,
            failed: false,
        }
    }

    /// Consumes token pairs until their text matches `word`. Also reports
    /// whether a sentence ended between two of those pairs.
    fn resync(&mut self, word: &SsmlWord) -> Result<(Vec<TokenPair>, bool), FrontendError> {
        let target = compact(&word.text);
        let mut consumed = String::new();
        let mut pairs = Vec::new();
        let mut ended_inside = false;
        while consumed != target {
            match self.tokens.next() {
                Some(TokenEvent::SentenceEnd) if pairs.is_empty() => self.sentence_pending = true,
                Some(TokenEvent::SentenceEnd) => ended_inside = true,
                Some(TokenEvent::Token(pair)) => {
                    consumed.push_str(&compact(&pair.original));
                    if !target.starts_with(&consumed) {
                        return Err(FrontendError::validation(format!(
                            "token {:?} does not line up with {:?} at byte {}",
                            pair.original, word.text, word.start_byte_offset
                        )));
                    }
                    pairs.push(pair);
                }
                None => {
                    return Err(FrontendError::validation(format!(
                        "token stream ended before {:?} at byte {}",
                        word.text, word.start_byte_offset
                    )))
                }
            }
        }
        Ok((pairs, ended_inside))
    }

    fn span_word(&self, word: &SsmlWord, symbol: String) -> Word {
        Word {
            original_symbol: word.text.clone(),
            symbol,
            start_byte_offset: word.start_byte_offset,
            end_byte_offset: word.end_byte_offset,
            ssml_props: Some(word.props.clone()),
            ..Word::default()
        }
    }

    fn joined(pairs: &[TokenPair]) -> String {
        pairs
            .iter()
            .map(|p| p.normalized.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn expand(&self, word: &SsmlWord, pairs: Vec<TokenPair>) -> Result<Vec<Word>, FrontendError> {
        match &word.props {
            SsmlProps::Speak | SsmlProps::Prosody(_) => {
                let mut cursor = word.start_byte_offset;
                Ok(pairs
                    .into_iter()
                    .map(|pair| {
                        let (start, end) = locate(self.markup, cursor, word.end_byte_offset, &pair.original)
                            .unwrap_or((word.start_byte_offset, word.end_byte_offset));
                        cursor = end.max(cursor);
                        Word {
                            original_symbol: pair.original,
                            symbol: pair.normalized,
                            start_byte_offset: start,
                            end_byte_offset: end,
                            ssml_props: Some(word.props.clone()),
                            ..Word::default()
                        }
                    })
                    .collect())
            }
            SsmlProps::Phoneme { ipa, .. } => {
                let mut out = self.span_word(word, Self::joined(&pairs));
                out.phone_sequence = self.phonemes.convert(ipa, Alphabet::Ipa, self.alphabet)?;
                Ok(vec![out])
            }
            SsmlProps::Sub { alias } => Ok(vec![self.span_word(word, alias.clone())]),
            SsmlProps::SayAs {
                interpret_as,
                format,
            } => {
                let symbol = match (interpret_as.as_str(), format.as_deref()) {
                    ("digits", _) | ("characters", Some("digits")) => pairs
                        .iter()
                        .map(|p| spell_digits(&p.original))
                        .collect::<Vec<_>>()
                        .join(" "),
                    ("characters", _) => pairs
                        .iter()
                        .flat_map(|p| p.original.chars())
                        .map(String::from)
                        .collect::<Vec<_>>()
                        .join(" "),
                    (kind, _) => {
                        tracing::warn!(interpret_as = kind, "normalizer: unsupported say-as kind, reading as written");
                        Self::joined(&pairs)
                    }
                };
                Ok(vec![self.span_word(word, symbol)])
            }
        }
    }

    fn advance(&mut self, word: SsmlWord) -> Result<(), FrontendError> {
        let (pairs, mut ended_inside) = self.resync(&word)?;
        if !matches!(word.props, SsmlProps::Speak | SsmlProps::Prosody(_)) {
            // punctuation inside an annotation does not end the sentence
            ended_inside = false;
            while matches!(self.tokens.peek(), Some(TokenEvent::SentenceEnd)) {
                self.tokens.next();
            }
        }

        let prosody_changed = word.prosody != self.prosody;
        if prosody_changed {
            tracing::debug!(from = ?self.prosody, to = ?word.prosody, "normalizer: prosody change");
            self.prosody = word.prosody.clone();
        }
        if self.emitted && (self.sentence_pending || prosody_changed) {
            self.ready.push_back(Word::separator());
        }

        let words = self.expand(&word, pairs)?;
        self.emitted |= !words.is_empty();
        self.ready.extend(words);
        self.sentence_pending = ended_inside;
        Ok(())
    }

    fn check_drained(&mut self) -> Result<(), FrontendError> {
        for event in self.tokens.by_ref() {
            if let TokenEvent::Token(pair) = event {
                if !compact(&pair.original).is_empty() {
                    return Err(FrontendError::validation(format!(
                        "token {:?} has no counterpart in the markup",
                        pair.original
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Iterator for SsmlWords<'_> {
    type Item = Result<Word, FrontendError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while self.ready.is_empty() {
            let step = match self.parsed.next() {
                Some(word) => self.advance(word),
                None => {
                    let drained = self.check_drained();
                    if drained.is_ok() {
                        return None;
                    }
                    drained
                }
            };
            if let Err(err) = step {
                self.failed = true;
                return Some(Err(err));
            }
        }
        self.ready.pop_front().map(Ok)
    }
}
