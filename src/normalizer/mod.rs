//! Text to sentence-segmented [`Word`](crate::types::Word) streams.
//!
//! A normalizer owns a token source, local or remote, and turns its
//! `(original, normalized)` pairs into words carrying byte offsets into the
//! caller's input. SSML input is parsed first; its text is tokenized on its
//! own and then lined up with the parsed words again.

pub mod numbers;
mod remote;
mod tokenizer;
mod words;

use std::sync::Arc;

pub use remote::{
    HttpNormalizationRpc, NormalizationRequest, NormalizationResponse, NormalizedSentence,
    RemoteTokenizer,
};
pub use tokenizer::{LocalTokenizer, LocalTokens, TokenEvent, TokenPair};
pub use words::{PlainWords, SsmlWords};

pub(crate) use tokenizer::split_whitespace_indices;

use crate::error::FrontendError;
use crate::phonemes::Phonemes;
use crate::pipeline::traits::NormalizationRpc;
use crate::ssml::SsmlParser;
use crate::types::{SsmlRequest, Word};
use words::TokenEvents;

pub struct LocalNormalizer {
    tokenizer: LocalTokenizer,
    phonemes: Arc<Phonemes>,
}

impl LocalNormalizer {
    pub fn new(phonemes: Arc<Phonemes>) -> Self {
        Self {
            tokenizer: LocalTokenizer::new(),
            phonemes,
        }
    }
}

pub struct RemoteNormalizer {
    tokenizer: RemoteTokenizer,
    phonemes: Arc<Phonemes>,
}

impl RemoteNormalizer {
    pub fn new(rpc: Box<dyn NormalizationRpc>, phonemes: Arc<Phonemes>) -> Self {
        Self {
            tokenizer: RemoteTokenizer::new(rpc),
            phonemes,
        }
    }
}

pub enum Normalizer {
    Local(LocalNormalizer),
    Remote(RemoteNormalizer),
}

impl Normalizer {
    pub fn local(phonemes: Arc<Phonemes>) -> Self {
        Self::Local(LocalNormalizer::new(phonemes))
    }

    pub fn remote(rpc: Box<dyn NormalizationRpc>, phonemes: Arc<Phonemes>) -> Self {
        Self::Remote(RemoteNormalizer::new(rpc, phonemes))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Remote(_) => "remote",
        }
    }

    pub fn phonemes(&self) -> &Phonemes {
        match self {
            Self::Local(n) => &n.phonemes,
            Self::Remote(n) => &n.phonemes,
        }
    }

    /// Raw token events for `text`.
    pub fn tokens<'a>(&'a self, text: &'a str) -> Result<TokenEvents<'a>, FrontendError> {
        match self {
            Self::Local(n) => Ok(Box::new(n.tokenizer.tokenize(text))),
            Self::Remote(n) => Ok(Box::new(n.tokenizer.tokenize(text)?)),
        }
    }

    /// Words of `text`, with a separator between sentences.
    ///
    /// Markup errors surface here; alignment problems between the markup and
    /// the token stream surface as the stream is read.
    pub fn normalize<'a>(
        &'a self,
        text: &'a str,
        request: &SsmlRequest,
    ) -> Result<WordStream<'a>, FrontendError> {
        tracing::debug!(
            normalizer = self.name(),
            ssml = request.process_as_ssml,
            bytes = text.len(),
            "normalizer: start"
        );
        if !request.process_as_ssml {
            return Ok(WordStream::Plain(PlainWords::new(text, self.tokens(text)?)));
        }

        let parser = SsmlParser::parse(self.phonemes(), text)?;
        let bare = parser.get_text()?;
        let tokens: Vec<TokenEvent> = self.tokens(&bare)?.collect();
        Ok(WordStream::Ssml(SsmlWords::new(
            text,
            parser.into_words(),
            Box::new(tokens.into_iter()),
            self.phonemes(),
            request.alphabet,
        )))
    }
}

/// Lazy output of [`Normalizer::normalize`].
pub enum WordStream<'a> {
    Plain(PlainWords<'a>),
    Ssml(SsmlWords<'a>),
}

impl Iterator for WordStream<'_> {
    type Item = Result<Word, FrontendError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Plain(words) => words.next(),
            Self::Ssml(words) => words.next(),
        }
    }
}
