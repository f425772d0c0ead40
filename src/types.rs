use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordered phone tokens in a single [`Alphabet`].
pub type PhoneSeq = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Alphabet {
    #[default]
    #[serde(rename = "ipa")]
    Ipa,
    #[serde(rename = "x-sampa")]
    XSampa,
    /// X-SAMPA with syllable boundaries and a stress digit on every vowel.
    #[serde(rename = "x-sampa+syll+stress")]
    XSampaWithStress,
}

impl Alphabet {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ipa => "ipa",
            Self::XSampa => "x-sampa",
            Self::XSampaWithStress => "x-sampa+syll+stress",
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipa" => Ok(Self::Ipa),
            "x-sampa" => Ok(Self::XSampa),
            "x-sampa+syll+stress" => Ok(Self::XSampaWithStress),
            other => Err(format!("unknown phoneme alphabet: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProsodyProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

impl ProsodyProps {
    /// Fields left unset on `self` are taken from the enclosing prosody.
    pub(crate) fn inherit(self, outer: Option<&ProsodyProps>) -> Self {
        let Some(outer) = outer else {
            return self;
        };
        Self {
            rate: self.rate.or_else(|| outer.rate.clone()),
            pitch: self.pitch.or_else(|| outer.pitch.clone()),
            volume: self.volume.or_else(|| outer.volume.clone()),
        }
    }
}

/// Tag context a word was read under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "kebab-case")]
pub enum SsmlProps {
    Speak,
    Prosody(ProsodyProps),
    Phoneme {
        xsampa: String,
        /// IPA segmentation of `xsampa`, computed when the tag was opened.
        ipa: PhoneSeq,
    },
    Sub {
        alias: String,
    },
    SayAs {
        interpret_as: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
}

/// Canonical unit passed from the normalizer through G2P to synthesis.
///
/// Byte offsets index the UTF-8 text handed to the normalizer. The all-default
/// value is the sentence separator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Word {
    pub original_symbol: String,
    pub symbol: String,
    pub phone_sequence: PhoneSeq,
    pub start_byte_offset: usize,
    pub end_byte_offset: usize,
    pub start_time_milli: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssml_props: Option<SsmlProps>,
}

impl Word {
    pub fn separator() -> Self {
        Self::default()
    }

    pub fn is_separator(&self) -> bool {
        self.original_symbol.is_empty() && self.symbol.is_empty() && self.ssml_props.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexWord {
    pub grapheme: String,
    pub phoneme: PhoneSeq,
}

impl LexWord {
    pub fn new(grapheme: impl Into<String>, phoneme: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            grapheme: grapheme.into(),
            phoneme: phoneme.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SsmlRequest {
    #[serde(default)]
    pub process_as_ssml: bool,
    #[serde(default)]
    pub alphabet: Alphabet,
}

impl SsmlRequest {
    pub fn plain(alphabet: Alphabet) -> Self {
        Self {
            process_as_ssml: false,
            alphabet,
        }
    }

    pub fn ssml(alphabet: Alphabet) -> Self {
        Self {
            process_as_ssml: true,
            alphabet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_word_is_separator() {
        let sep = Word::separator();
        assert!(sep.is_separator());
        assert_eq!(sep.start_byte_offset, 0);
        assert_eq!(sep.end_byte_offset, 0);
        assert!(sep.phone_sequence.is_empty());
    }

    #[test]
    fn word_with_symbol_is_not_separator() {
        let word = Word {
            original_symbol: "Halló".to_string(),
            symbol: "Halló".to_string(),
            end_byte_offset: 6,
            ..Word::default()
        };
        assert!(!word.is_separator());
    }

    #[test]
    fn alphabet_parses_wire_names() {
        assert_eq!("ipa".parse::<Alphabet>().unwrap(), Alphabet::Ipa);
        assert_eq!("x-sampa".parse::<Alphabet>().unwrap(), Alphabet::XSampa);
        assert_eq!(
            "x-sampa+syll+stress".parse::<Alphabet>().unwrap(),
            Alphabet::XSampaWithStress
        );
        assert!("arpabet".parse::<Alphabet>().is_err());
    }

    #[test]
    fn alphabet_serde_uses_wire_names() {
        let json = serde_json::to_string(&Alphabet::XSampaWithStress).unwrap();
        assert_eq!(json, "\"x-sampa+syll+stress\"");
        let back: Alphabet = serde_json::from_str("\"x-sampa\"").unwrap();
        assert_eq!(back, Alphabet::XSampa);
    }

    #[test]
    fn prosody_inherits_unset_fields() {
        let outer = ProsodyProps {
            rate: Some("slow".to_string()),
            pitch: Some("high".to_string()),
            volume: None,
        };
        let inner = ProsodyProps {
            rate: Some("fast".to_string()),
            ..ProsodyProps::default()
        };
        let merged = inner.inherit(Some(&outer));
        assert_eq!(merged.rate.as_deref(), Some("fast"));
        assert_eq!(merged.pitch.as_deref(), Some("high"));
        assert!(merged.volume.is_none());
    }

    #[test]
    fn ssml_props_serialize_with_tag() {
        let props = SsmlProps::Sub {
            alias: "vefur".to_string(),
        };
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["tag"], "sub");
        assert_eq!(json["alias"], "vefur");
    }
}
