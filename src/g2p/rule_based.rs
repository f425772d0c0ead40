use std::collections::HashMap;
use std::sync::Arc;

use crate::error::FrontendError;
use crate::g2p::embedded::{segments, Segment};
use crate::g2p::{candidate_languages, TranslationFailure};
use crate::phonemes::{Phonemes, SYLLABLE_BOUNDARY};
use crate::pipeline::traits::Transcriber;
use crate::types::{Alphabet, PhoneSeq};

/// Consonants that may open a syllable together with a following glide or r.
const CLUSTER_HEADS: &[&str] = &["p", "pʰ", "t", "tʰ", "k", "kʰ", "c", "cʰ", "s"];
const CLUSTER_TAILS: &[&str] = &["j", "v", "r"];

/// Per-language transcription engines with optional syllabification.
pub struct RuleBasedTranslator {
    engines: HashMap<String, Arc<dyn Transcriber>>,
    syllabify: bool,
    phonemes: Arc<Phonemes>,
}

impl RuleBasedTranslator {
    pub fn new(
        engines: impl IntoIterator<Item = (String, Arc<dyn Transcriber>)>,
        syllabify: bool,
        phonemes: Arc<Phonemes>,
    ) -> Self {
        Self {
            engines: engines.into_iter().collect(),
            syllabify,
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
            let ipa = match segment {
                Segment::Phones(raw) => self.phonemes.align(&raw, Alphabet::Ipa)?,
                Segment::Token(token) => {
                    let word: String = token
                        .chars()
                        .filter(|c| c.is_alphanumeric())
                        .collect::<String>()
                        .to_lowercase();
                    if word.is_empty() {
                        continue;
                    }
                    match self.transcribe(&word, lang, failure_langs) {
                        Some(phones) if self.syllabify => {
                            syllabify(&phones, |p| self.phonemes.is_vowel(p, Alphabet::Ipa))
                        }
                        Some(phones) => phones,
                        None => {
                            tracing::debug!(token, lang, "rule-based translator: token left without phones");
                            continue;
                        }
                    }
                }
            };
            out.extend(self.phonemes.convert(&ipa, Alphabet::Ipa, alphabet)?);
        }
        Ok(out)
    }

    fn transcribe(&self, word: &str, lang: &str, failure_langs: &[String]) -> Option<PhoneSeq> {
        candidate_languages(lang, failure_langs)
            .map(|l| {
                self.engines
                    .get(l)
                    .ok_or_else(|| TranslationFailure::NoEngine(l.to_string()))
                    .and_then(|engine| engine.transcribe(word))
            })
            .filter_map(|attempt| match attempt {
                Ok(phones) => Some(phones),
                Err(failure) => {
                    tracing::debug!(word, %failure, "rule-based translator: attempt failed");
                    None
                }
            })
            .next()
    }
}

/// Inserts syllable boundaries, keeping as long an onset as the language allows.
///
/// A single consonant between vowels opens the next syllable. Of a longer
/// cluster, only the last consonant moves to the onset, or the last two when
/// they form a stop/s + j/v/r pair.
pub(crate) fn syllabify(phones: &[String], is_vowel: impl Fn(&str) -> bool) -> PhoneSeq {
    let vowels: Vec<usize> = phones
        .iter()
        .enumerate()
        .filter(|(_, p)| is_vowel(p.as_str()))
        .map(|(i, _)| i)
        .collect();

    let boundaries: Vec<usize> = vowels
        .windows(2)
        .map(|pair| {
            let (left, right) = (pair[0], pair[1]);
            match right - left - 1 {
                0 => right,
                1 => right - 1,
                _ => {
                    let head = phones[right - 2].as_str();
                    let tail = phones[right - 1].as_str();
                    if CLUSTER_HEADS.contains(&head) && CLUSTER_TAILS.contains(&tail) {
                        right - 2
                    } else {
                        right - 1
                    }
                }
            }
        })
        .collect();

    let mut out = Vec::with_capacity(phones.len() + boundaries.len());
    for (i, phone) in phones.iter().enumerate() {
        if boundaries.contains(&i) {
            out.push(SYLLABLE_BOUNDARY.to_string());
        }
        out.push(phone.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g2p::IcelandicRules;

    fn translator(syllabify: bool) -> RuleBasedTranslator {
        let engines: [(String, Arc<dyn Transcriber>); 1] =
            [("is-IS".to_string(), Arc::new(IcelandicRules::new()))];
        RuleBasedTranslator::new(engines, syllabify, Arc::new(Phonemes::icelandic()))
    }

    #[test]
    fn transcribes_icelandic_word() {
        let phones = translator(false)
            .translate("kleprar", "is-IS", &[], Alphabet::Ipa)
            .unwrap();
        assert_eq!(phones, ["kʰ", "l", "ɛː", "p", "r", "a", "r"]);
    }

    #[test]
    fn syllabification_keeps_stop_plus_r_onset() {
        let phones = translator(true)
            .translate("kleprar", "is-IS", &[], Alphabet::Ipa)
            .unwrap();
        assert_eq!(phones, ["kʰ", "l", "ɛː", ".", "p", "r", "a", "r"]);
    }

    #[test]
    fn syllabified_stress_output() {
        let phones = translator(true)
            .translate("hestur", "is-IS", &[], Alphabet::XSampaWithStress)
            .unwrap();
        assert_eq!(phones, ["h", "E0", "s", ".", "t", "Y0", "r"]);
    }

    #[test]
    fn punctuation_is_stripped() {
        let t = translator(false);
        assert_eq!(
            t.translate("Takk!", "is-IS", &[], Alphabet::XSampa).unwrap(),
            ["t_h", "a", "h", "k"]
        );
        assert!(t.translate("?!", "is-IS", &[], Alphabet::Ipa).unwrap().is_empty());
    }

    #[test]
    fn falls_back_to_engine_of_failure_language() {
        let phones = translator(false)
            .translate("bók", "en-US", &["is-IS".to_string()], Alphabet::Ipa)
            .unwrap();
        assert_eq!(phones, ["p", "ouː", "k"]);
        assert!(translator(false)
            .translate("bók", "en-US", &[], Alphabet::Ipa)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn embedded_phones_are_ipa() {
        let phones = translator(false)
            .translate("{tʰaːð}", "is-IS", &[], Alphabet::XSampa)
            .unwrap();
        assert_eq!(phones, ["t_h", "a:", "D"]);
    }

    #[test]
    fn syllabify_splits_between_adjacent_vowels() {
        let phones: PhoneSeq = ["a", "i", "t", "a"].iter().map(|p| p.to_string()).collect();
        let out = syllabify(&phones, |p| matches!(p, "a" | "i"));
        assert_eq!(out, ["a", ".", "i", ".", "t", "a"]);
    }
}
