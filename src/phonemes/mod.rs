//! Phone inventory, alphabet conversion and phone-string segmentation.
//!
//! A [`Phonemes`] value owns the IPA/X-SAMPA tables and one [`PhoneAligner`]
//! per alphabet. Build it once and share it by `Arc`.

mod aligner;
pub mod table;

use std::collections::{HashMap, HashSet};

pub use aligner::PhoneAligner;
pub use table::{PhoneClass, PhoneEntry, PAUSE, SYLLABLE_BOUNDARY, UNSTRESSED};

use crate::error::FrontendError;
use crate::types::{Alphabet, PhoneSeq};

pub struct Phonemes {
    ipa_to_xsampa: HashMap<&'static str, &'static str>,
    xsampa_to_ipa: HashMap<&'static str, &'static str>,
    ipa_vowels: HashSet<&'static str>,
    xsampa_vowels: HashSet<&'static str>,
    ipa_aligner: PhoneAligner,
    xsampa_aligner: PhoneAligner,
}

impl Phonemes {
    pub fn icelandic() -> Self {
        Self::from_table(table::ICELANDIC)
    }

    pub fn from_table(entries: &'static [PhoneEntry]) -> Self {
        let markers = [PAUSE, SYLLABLE_BOUNDARY];
        let mut ipa_to_xsampa: HashMap<&'static str, &'static str> =
            markers.iter().map(|m| (*m, *m)).collect();
        let mut xsampa_to_ipa = ipa_to_xsampa.clone();
        let mut ipa_vowels = HashSet::new();
        let mut xsampa_vowels = HashSet::new();

        for entry in entries {
            ipa_to_xsampa.insert(entry.ipa, entry.xsampa);
            xsampa_to_ipa.insert(entry.xsampa, entry.ipa);
            if entry.class == PhoneClass::Vowel {
                ipa_vowels.insert(entry.ipa);
                xsampa_vowels.insert(entry.xsampa);
            }
        }

        Self {
            ipa_aligner: PhoneAligner::new(Alphabet::Ipa, entries.iter().map(|e| e.ipa)),
            xsampa_aligner: PhoneAligner::new(Alphabet::XSampa, entries.iter().map(|e| e.xsampa)),
            ipa_to_xsampa,
            xsampa_to_ipa,
            ipa_vowels,
            xsampa_vowels,
        }
    }

    pub fn ipa_aligner(&self) -> &PhoneAligner {
        &self.ipa_aligner
    }

    pub fn xsampa_aligner(&self) -> &PhoneAligner {
        &self.xsampa_aligner
    }

    /// Segments `input` with the aligner of `alphabet`.
    pub fn align(&self, input: &str, alphabet: Alphabet) -> Result<PhoneSeq, FrontendError> {
        match alphabet {
            Alphabet::Ipa => self.ipa_aligner.align(input),
            Alphabet::XSampa => self.xsampa_aligner.align(input),
            Alphabet::XSampaWithStress => Err(FrontendError::configuration(
                "phone strings cannot be segmented in the stress-marked alphabet",
            )),
        }
    }

    pub fn convert_ipa_to_xsampa(&self, seq: &[String]) -> Result<PhoneSeq, FrontendError> {
        seq.iter()
            .map(|phone| {
                self.ipa_to_xsampa
                    .get(phone.as_str())
                    .map(|p| p.to_string())
                    .ok_or_else(|| FrontendError::unknown_phone(phone, Alphabet::Ipa))
            })
            .collect()
    }

    pub fn convert_xsampa_to_ipa(&self, seq: &[String]) -> Result<PhoneSeq, FrontendError> {
        seq.iter()
            .map(|phone| {
                self.xsampa_to_ipa
                    .get(phone.as_str())
                    .map(|p| p.to_string())
                    .ok_or_else(|| FrontendError::unknown_phone(phone, Alphabet::XSampa))
            })
            .collect()
    }

    /// Marks every vowel as unstressed. This is a per-vowel tag, not
    /// syllabification.
    pub fn convert_xsampa_to_xsampa_with_stress(&self, seq: &[String]) -> PhoneSeq {
        seq.iter()
            .map(|phone| {
                if self.xsampa_vowels.contains(phone.as_str()) {
                    format!("{phone}{UNSTRESSED}")
                } else {
                    phone.clone()
                }
            })
            .collect()
    }

    /// Converts `seq` from a storage alphabet into any output alphabet.
    pub fn convert(
        &self,
        seq: &[String],
        from: Alphabet,
        to: Alphabet,
    ) -> Result<PhoneSeq, FrontendError> {
        match (from, to) {
            (Alphabet::XSampaWithStress, _) => Err(FrontendError::configuration(
                "the stress-marked alphabet is output only",
            )),
            (Alphabet::Ipa, Alphabet::XSampa) => self.convert_ipa_to_xsampa(seq),
            (Alphabet::XSampa, Alphabet::Ipa) => self.convert_xsampa_to_ipa(seq),
            (Alphabet::Ipa, Alphabet::XSampaWithStress) => self
                .convert_ipa_to_xsampa(seq)
                .map(|xs| self.convert_xsampa_to_xsampa_with_stress(&xs)),
            (Alphabet::XSampa, Alphabet::XSampaWithStress) => {
                Ok(self.convert_xsampa_to_xsampa_with_stress(seq))
            }
            (Alphabet::Ipa, Alphabet::Ipa) | (Alphabet::XSampa, Alphabet::XSampa) => {
                Ok(seq.to_vec())
            }
        }
    }

    /// Aligns an X-SAMPA string and returns its IPA phones joined by spaces.
    pub fn align_ipa_from_xsampa(&self, xsampa: &str) -> Result<String, FrontendError> {
        let seq = self.xsampa_aligner.align(xsampa)?;
        Ok(self.convert_xsampa_to_ipa(&seq)?.join(" "))
    }

    pub fn is_vowel(&self, phone: &str, alphabet: Alphabet) -> bool {
        match alphabet {
            Alphabet::Ipa => self.ipa_vowels.contains(phone),
            Alphabet::XSampa => self.xsampa_vowels.contains(phone),
            Alphabet::XSampaWithStress => phone
                .strip_suffix(UNSTRESSED)
                .is_some_and(|base| self.xsampa_vowels.contains(base)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(phones: &[&str]) -> PhoneSeq {
        phones.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn align_ipa_from_xsampa_joins_with_spaces() {
        let phonemes = Phonemes::icelandic();
        assert_eq!(phonemes.align_ipa_from_xsampa("tO:a:D").unwrap(), "t ɔː aː ð");
    }

    #[test]
    fn align_ipa_from_xsampa_rejects_trailing_tab() {
        let phonemes = Phonemes::icelandic();
        let err = phonemes.align_ipa_from_xsampa("t O: a: D\t").unwrap_err();
        assert!(matches!(err, FrontendError::Alignment { .. }));
    }

    #[test]
    fn aligners_use_their_own_inventory() {
        let phonemes = Phonemes::icelandic();
        // "E" is an X-SAMPA vowel but not an IPA phone.
        assert!(phonemes.align("E", Alphabet::XSampa).is_ok());
        assert!(phonemes.align("E", Alphabet::Ipa).is_err());
        assert_eq!(phonemes.align("ɛː", Alphabet::Ipa).unwrap(), ["ɛː"]);
    }

    #[test]
    fn ipa_to_xsampa_is_strict() {
        let phonemes = Phonemes::icelandic();
        assert_eq!(
            phonemes.convert_ipa_to_xsampa(&seq(&["pʰ", "œ", "p"])).unwrap(),
            ["p_h", "9", "p"]
        );
        let err = phonemes.convert_ipa_to_xsampa(&seq(&["p", "ʃ"])).unwrap_err();
        match err {
            FrontendError::UnknownPhone { phone, alphabet } => {
                assert_eq!(phone, "ʃ");
                assert_eq!(alphabet, Alphabet::Ipa);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn round_trip_over_whole_table() {
        let phonemes = Phonemes::icelandic();
        let ipa: PhoneSeq = table::ICELANDIC.iter().map(|e| e.ipa.to_string()).collect();
        let xsampa = phonemes.convert_ipa_to_xsampa(&ipa).unwrap();
        assert_eq!(phonemes.convert_xsampa_to_ipa(&xsampa).unwrap(), ipa);
    }

    #[test]
    fn empty_sequences_convert_to_empty() {
        let phonemes = Phonemes::icelandic();
        assert!(phonemes.convert_ipa_to_xsampa(&[]).unwrap().is_empty());
        assert!(phonemes.convert_xsampa_to_ipa(&[]).unwrap().is_empty());
        assert!(phonemes.align("", Alphabet::Ipa).unwrap().is_empty());
    }

    #[test]
    fn pause_is_identity_in_every_alphabet() {
        let phonemes = Phonemes::icelandic();
        let pause = seq(&[PAUSE]);
        assert_eq!(phonemes.convert_ipa_to_xsampa(&pause).unwrap(), pause);
        assert_eq!(phonemes.convert_xsampa_to_ipa(&pause).unwrap(), pause);
        assert_eq!(phonemes.convert_xsampa_to_xsampa_with_stress(&pause), pause);
    }

    #[test]
    fn stress_marks_vowels_only() {
        let phonemes = Phonemes::icelandic();
        let marked = phonemes.convert_xsampa_to_xsampa_with_stress(&seq(&["k_h", "l", "E:", ".", "p", "r", "a", "r"]));
        assert_eq!(marked, ["k_h", "l", "E:0", ".", "p", "r", "a0", "r"]);
        assert!(phonemes.is_vowel("E:0", Alphabet::XSampaWithStress));
        assert!(!phonemes.is_vowel("r", Alphabet::XSampaWithStress));
    }

    #[test]
    fn convert_dispatches_by_alphabet_pair() {
        let phonemes = Phonemes::icelandic();
        let ipa = seq(&["t", "ɔː"]);
        assert_eq!(phonemes.convert(&ipa, Alphabet::Ipa, Alphabet::Ipa).unwrap(), ipa);
        let xsampa = seq(&["t", "O:"]);
        assert_eq!(phonemes.convert(&xsampa, Alphabet::XSampa, Alphabet::XSampa).unwrap(), xsampa);
        assert_eq!(
            phonemes.convert(&ipa, Alphabet::Ipa, Alphabet::XSampaWithStress).unwrap(),
            ["t", "O:0"]
        );
        assert!(phonemes
            .convert(&ipa, Alphabet::XSampaWithStress, Alphabet::Ipa)
            .is_err());
    }

    #[test]
    fn align_is_idempotent_on_canonical_strings() {
        let phonemes = Phonemes::icelandic();
        for canonical in ["t ɔː aː ð", "kʰ l ɛː p r a r", "p ouː k"] {
            let aligned = phonemes.align(canonical, Alphabet::Ipa).unwrap();
            assert_eq!(aligned.join(" "), canonical);
        }
    }

    #[test]
    fn aligners_count_emitted_phones() {
        let phonemes = Phonemes::icelandic();
        phonemes.align("tɔːaːð", Alphabet::Ipa).unwrap();
        phonemes.align_ipa_from_xsampa("tO:").unwrap();
        assert_eq!(phonemes.ipa_aligner().hit_counts()["ɔː"], 1);
        assert_eq!(phonemes.xsampa_aligner().hit_counts()["O:"], 1);
        assert_eq!(phonemes.xsampa_aligner().hit_counts()["a:"], 0);
    }
}
