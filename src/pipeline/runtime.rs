use std::sync::Arc;

use crate::error::FrontendError;
use crate::g2p::Translator;
use crate::normalizer::Normalizer;
use crate::phonemes::Phonemes;
use crate::pipeline::traits::SynthesisBackend;
use crate::types::{SsmlRequest, Word};

/// Normalizer and translator chain wired together.
pub struct Frontend {
    phonemes: Arc<Phonemes>,
    normalizer: Normalizer,
    translator: Translator,
    default_language: String,
    failure_languages: Vec<String>,
}

pub(crate) struct FrontendParts {
    pub phonemes: Arc<Phonemes>,
    pub normalizer: Normalizer,
    pub translator: Translator,
    pub default_language: String,
    pub failure_languages: Vec<String>,
}

impl Frontend {
    pub(crate) fn from_parts(parts: FrontendParts) -> Self {
        Self {
            phonemes: parts.phonemes,
            normalizer: parts.normalizer,
            translator: parts.translator,
            default_language: parts.default_language,
            failure_languages: parts.failure_languages,
        }
    }

    pub fn phonemes(&self) -> &Phonemes {
        &self.phonemes
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn failure_languages(&self) -> &[String] {
        &self.failure_languages
    }

    /// Normalized words without phones.
    pub fn normalize<'a>(
        &'a self,
        text: &'a str,
        request: &SsmlRequest,
    ) -> Result<impl Iterator<Item = Result<Word, FrontendError>> + 'a, FrontendError> {
        self.normalizer.normalize(text, request)
    }

    /// Normalizes and transcribes `text` in the default language.
    pub fn process<'a>(
        &'a self,
        text: &'a str,
        request: &SsmlRequest,
    ) -> Result<impl Iterator<Item = Result<Word, FrontendError>> + 'a, FrontendError> {
        self.process_in(text, &self.default_language, &self.failure_languages, request)
    }

    pub fn process_in<'a>(
        &'a self,
        text: &'a str,
        lang: &'a str,
        failure_langs: &'a [String],
        request: &SsmlRequest,
    ) -> Result<impl Iterator<Item = Result<Word, FrontendError>> + 'a, FrontendError> {
        let words = self.normalizer.normalize(text, request)?;
        tracing::debug!(
            lang,
            translator = self.translator.name(),
            alphabet = request.alphabet.as_str(),
            "frontend: processing"
        );
        Ok(self
            .translator
            .translate_words_with_fallback(words, lang, failure_langs, request.alphabet))
    }

    /// Runs the whole text through `backend`.
    ///
    /// The stream is collected first so that a failure anywhere in it reaches
    /// the caller instead of a partial synthesis.
    pub fn synthesize(
        &self,
        text: &str,
        request: &SsmlRequest,
        backend: &dyn SynthesisBackend,
    ) -> Result<Vec<u8>, FrontendError> {
        let mut words = self.process(text, request)?.collect::<Result<Vec<Word>, _>>()?;
        while words.last().is_some_and(Word::is_separator) {
            words.pop();
        }
        tracing::debug!(words = words.len(), "frontend: handing words to synthesis");
        backend.synthesize(&words, request.alphabet)
    }
}
