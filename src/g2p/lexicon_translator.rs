use std::collections::HashMap;
use std::sync::Arc;

use crate::error::FrontendError;
use crate::g2p::embedded::{segments, Segment};
use crate::g2p::{candidate_languages, is_pause_token, lookup_folded, pause, TranslationFailure};
use crate::lexicon::Lexicon;
use crate::phonemes::Phonemes;
use crate::types::{Alphabet, PhoneSeq};

/// Resolves tokens through per-language lexicons only.
pub struct LexiconTranslator {
    lexicons: HashMap<String, Arc<Lexicon>>,
    phonemes: Arc<Phonemes>,
}

impl LexiconTranslator {
    pub fn new(lexicons: impl IntoIterator<Item = Arc<Lexicon>>, phonemes: Arc<Phonemes>) -> Self {
        Self {
            lexicons: lexicons
                .into_iter()
                .map(|lex| (lex.language().to_string(), lex))
                .collect(),
            phonemes,
        }
    }

    pub fn phonemes(&self) -> &Phonemes {
        &self.phonemes
    }

    pub fn translate(
        &self,
        text: &str,
        lang: &str,
        failure_langs: &[String],
        alphabet: Alphabet,
    ) -> Result<PhoneSeq, FrontendError> {
        let mut out = Vec::new();
        for segment in segments(text) {
            match segment {
                Segment::Phones(raw) => {
                    let source = self
                        .lexicons
                        .get(lang)
                        .map(|lex| lex.alphabet())
                        .unwrap_or(Alphabet::Ipa);
                    let phones = self.phonemes.align(&raw, source)?;
                    out.extend(self.phonemes.convert(&phones, source, alphabet)?);
                }
                Segment::Token(token) => match self.resolve(token, lang, failure_langs) {
                    Ok((phones, source)) => {
                        out.extend(self.phonemes.convert(&phones, source, alphabet)?)
                    }
                    Err(failure) => {
                        tracing::debug!(token, lang, %failure, "lexicon translator: token left without phones");
                    }
                },
            }
        }
        Ok(out)
    }

    fn resolve(
        &self,
        token: &str,
        lang: &str,
        failure_langs: &[String],
    ) -> Result<(PhoneSeq, Alphabet), TranslationFailure> {
        if is_pause_token(token) {
            return Ok((pause(), Alphabet::Ipa));
        }
        candidate_languages(lang, failure_langs)
            .filter_map(|l| self.lexicons.get(l))
            .map(|lex| lookup_folded(lex, token).map(|phones| (phones, lex.alphabet())))
            .find_map(Result::ok)
            .ok_or_else(|| TranslationFailure::NotInLexicon(token.to_string()))
    }
}
