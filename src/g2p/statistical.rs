use std::collections::HashMap;
use std::sync::Arc;

use crate::error::FrontendError;
use crate::g2p::embedded::{segments, Segment};
use crate::g2p::{candidate_languages, is_pause_token, lookup_folded, pause, TranslationFailure};
use crate::lexicon::Lexicon;
use crate::phonemes::Phonemes;
use crate::pipeline::traits::PhoneticModel;
use crate::types::{Alphabet, PhoneSeq};

/// Lexicon lookup backed by a trained model for words the lexicon misses.
pub struct StatisticalTranslator {
    lexicons: HashMap<String, Arc<Lexicon>>,
    models: HashMap<String, Arc<dyn PhoneticModel>>,
    phonemes: Arc<Phonemes>,
}

impl StatisticalTranslator {
    pub fn new(
        lexicons: impl IntoIterator<Item = Arc<Lexicon>>,
        models: impl IntoIterator<Item = (String, Arc<dyn PhoneticModel>)>,
        phonemes: Arc<Phonemes>,
    ) -> Self {
        Self {
            lexicons: lexicons
                .into_iter()
                .map(|lex| (lex.language().to_string(), lex))
                .collect(),
            models: models.into_iter().collect(),
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
                    let source = self.source_alphabet(lang);
                    let phones = self.phonemes.align(&raw, source)?;
                    out.extend(self.phonemes.convert(&phones, source, alphabet)?);
                }
                Segment::Token(token) => {
                    if is_pause_token(token) {
                        out.extend(self.phonemes.convert(&pause(), Alphabet::Ipa, alphabet)?);
                        continue;
                    }
                    match self.resolve(token, lang, failure_langs) {
                        Some((phones, source)) => {
                            out.extend(self.phonemes.convert(&phones, source, alphabet)?)
                        }
                        None => {
                            tracing::debug!(token, lang, "statistical translator: token left without phones");
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    /// Alphabet of embedded phone spans for `lang`.
    fn source_alphabet(&self, lang: &str) -> Alphabet {
        self.models
            .get(lang)
            .map(|model| model.alphabet())
            .or_else(|| self.lexicons.get(lang).map(|lex| lex.alphabet()))
            .unwrap_or(Alphabet::XSampa)
    }

    fn resolve(
        &self,
        token: &str,
        lang: &str,
        failure_langs: &[String],
    ) -> Option<(PhoneSeq, Alphabet)> {
        candidate_languages(lang, failure_langs)
            .map(|l| self.attempt(token, l))
            .filter_map(|attempt| match attempt {
                Ok(hit) => Some(hit),
                Err(failure) => {
                    tracing::debug!(token, %failure, "statistical translator: attempt failed");
                    None
                }
            })
            .next()
    }

    /// Lexicon first, then the model, for one language.
    fn attempt(&self, token: &str, lang: &str) -> Result<(PhoneSeq, Alphabet), TranslationFailure> {
        if let Some(lex) = self.lexicons.get(lang) {
            if let Ok(phones) = lookup_folded(lex, token) {
                return Ok((phones, lex.alphabet()));
            }
        }
        let model = self
            .models
            .get(lang)
            .ok_or_else(|| TranslationFailure::NoModel(lang.to_string()))?;
        let word: String = token
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.is_empty() {
            return Err(TranslationFailure::Unpronounceable(token.to_string()));
        }
        let phones = model.predict(&word)?;
        if phones.is_empty() {
            return Err(TranslationFailure::Undecodable(word));
        }
        Ok((phones, model.alphabet()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g2p::GraphoneModel;
    use crate::types::LexWord;

    fn toy_model() -> Arc<dyn PhoneticModel> {
        let mut model = GraphoneModel::new(Alphabet::XSampa);
        for (g, p) in [("h", "h"), ("e", "E"), ("s", "s"), ("t", "t"), ("u", "Y"), ("r", "r")] {
            model.add(g, vec![p.to_string()], -1.0);
        }
        Arc::new(model)
    }

    fn translator() -> StatisticalTranslator {
        let phonemes = Arc::new(Phonemes::icelandic());
        let is = Lexicon::new("is-IS", Alphabet::Ipa, phonemes.clone()).unwrap();
        is.insert(LexWord::new("pöbb", ["pʰ", "œ", "p"]));
        let en = Lexicon::new("en-US", Alphabet::XSampa, phonemes.clone()).unwrap();
        en.insert(LexWord::new("pub", ["p_h", "a", "p"]));
        StatisticalTranslator::new(
            [Arc::new(is), Arc::new(en)],
            [("is-IS".to_string(), toy_model())],
            phonemes,
        )
    }

    #[test]
    fn lexicon_hit_wins_over_model() {
        let phones = translator()
            .translate("pöbb", "is-IS", &[], Alphabet::XSampa)
            .unwrap();
        assert_eq!(phones, ["p_h", "9", "p"]);
    }

    #[test]
    fn model_covers_lexicon_miss() {
        let phones = translator()
            .translate("Hestur,", "is-IS", &[], Alphabet::Ipa)
            .unwrap();
        assert_eq!(phones, ["h", "ɛ", "s", "t", "ʏ", "r"]);
    }

    #[test]
    fn failure_language_lexicon_used_when_model_cannot_decode() {
        let phones = translator()
            .translate("pub", "is-IS", &["en-US".to_string()], Alphabet::XSampa)
            .unwrap();
        assert_eq!(phones, ["p_h", "a", "p"]);
    }

    #[test]
    fn exhausted_options_yield_nothing() {
        let t = translator();
        assert!(t.translate("xyz", "is-IS", &["en-US".to_string()], Alphabet::Ipa).unwrap().is_empty());
        assert!(t.translate("pub", "de-DE", &[], Alphabet::Ipa).unwrap().is_empty());
    }

    #[test]
    fn pauses_and_embedded_phones() {
        let phones = translator()
            .translate("pöbb , {t O:}", "is-IS", &[], Alphabet::XSampa)
            .unwrap();
        assert_eq!(phones, ["p_h", "9", "p", "sp", "t", "O:"]);
    }
}
