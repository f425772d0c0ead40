use crate::error::FrontendError;
use crate::g2p::Translator;
use crate::phonemes::Phonemes;
use crate::types::{Alphabet, PhoneSeq};

/// Ordered fallback chain: the first translator with a non-empty answer wins.
pub struct ComposedTranslator {
    chain: Vec<Translator>,
}

impl ComposedTranslator {
    pub fn new(chain: Vec<Translator>) -> Result<Self, FrontendError> {
        if chain.is_empty() {
            return Err(FrontendError::configuration(
                "composed translator needs at least one translator",
            ));
        }
        Ok(Self { chain })
    }

    pub fn phonemes(&self) -> &Phonemes {
        // non-empty, checked in `new`
        self.chain[0].phonemes()
    }

    pub fn translate(
        &self,
        text: &str,
        lang: &str,
        failure_langs: &[String],
        alphabet: Alphabet,
    ) -> Result<PhoneSeq, FrontendError> {
        for translator in &self.chain {
            let phones = translator.translate(text, lang, failure_langs, alphabet)?;
            if !phones.is_empty() {
                return Ok(phones);
            }
            tracing::debug!(text, translator = translator.name(), "composed translator: empty result, trying next");
        }
        Ok(Vec::new())
    }
}
