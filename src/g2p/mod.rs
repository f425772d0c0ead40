//! Grapheme-to-phoneme translators.
//!
//! [`Translator`] is the closed set of implementations. Each one resolves a
//! text token by token, tries the requested language before each failure
//! language, and treats `{...}` spans as literal phone strings.

mod composed;
mod embedded;
mod graphone;
mod icelandic;
mod lexicon_translator;
mod rule_based;
mod statistical;

use thiserror::Error;

pub use composed::ComposedTranslator;
pub use graphone::GraphoneModel;
pub use icelandic::IcelandicRules;
pub use lexicon_translator::LexiconTranslator;
pub use rule_based::RuleBasedTranslator;
pub use statistical::StatisticalTranslator;

use crate::error::FrontendError;
use crate::lexicon::Lexicon;
use crate::phonemes::{Phonemes, PAUSE};
use crate::types::{Alphabet, PhoneSeq, SsmlProps, Word};

/// Why one attempt at resolving a token produced nothing.
///
/// Only used to drive fallback; it never leaves a translator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationFailure {
    #[error("no lexicon entry for {0:?}")]
    NotInLexicon(String),
    #[error("no model for language {0}")]
    NoModel(String),
    #[error("model cannot decode {0:?}")]
    Undecodable(String),
    #[error("no transcription engine for language {0}")]
    NoEngine(String),
    #[error("nothing to transcribe in {0:?}")]
    Unpronounceable(String),
}

pub enum Translator {
    Lexicon(LexiconTranslator),
    Statistical(StatisticalTranslator),
    RuleBased(RuleBasedTranslator),
    Composed(ComposedTranslator),
}

impl Translator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lexicon(_) => "lexicon",
            Self::Statistical(_) => "statistical",
            Self::RuleBased(_) => "rule-based",
            Self::Composed(_) => "composed",
        }
    }

    pub fn phonemes(&self) -> &Phonemes {
        match self {
            Self::Lexicon(t) => t.phonemes(),
            Self::Statistical(t) => t.phonemes(),
            Self::RuleBased(t) => t.phonemes(),
            Self::Composed(t) => t.phonemes(),
        }
    }

    /// Phones for `text` in `alphabet`.
    ///
    /// Tokens nobody can resolve contribute no phones. Errors are structural:
    /// an embedded phone string outside the inventory, or an unknown phone.
    pub fn translate(
        &self,
        text: &str,
        lang: &str,
        failure_langs: &[String],
        alphabet: Alphabet,
    ) -> Result<PhoneSeq, FrontendError> {
        match self {
            Self::Lexicon(t) => t.translate(text, lang, failure_langs, alphabet),
            Self::Statistical(t) => t.translate(text, lang, failure_langs, alphabet),
            Self::RuleBased(t) => t.translate(text, lang, failure_langs, alphabet),
            Self::Composed(t) => t.translate(text, lang, failure_langs, alphabet),
        }
    }

    pub fn translate_words<'a, I>(
        &'a self,
        words: I,
        lang: &'a str,
        alphabet: Alphabet,
    ) -> impl Iterator<Item = Result<Word, FrontendError>> + 'a
    where
        I: IntoIterator<Item = Result<Word, FrontendError>>,
        I::IntoIter: 'a,
    {
        self.translate_words_with_fallback(words, lang, &[], alphabet)
    }

    /// Lazily fills `phone_sequence` on every non-separator word.
    ///
    /// Words read from a `<phoneme>` tag keep their pronunciation, converted
    /// to `alphabet`.
    pub fn translate_words_with_fallback<'a, I>(
        &'a self,
        words: I,
        lang: &'a str,
        failure_langs: &'a [String],
        alphabet: Alphabet,
    ) -> impl Iterator<Item = Result<Word, FrontendError>> + 'a
    where
        I: IntoIterator<Item = Result<Word, FrontendError>>,
        I::IntoIter: 'a,
    {
        words.into_iter().map(move |word| {
            let mut word = word?;
            if word.is_separator() {
                return Ok(word);
            }
            word.phone_sequence = match &word.ssml_props {
                Some(SsmlProps::Phoneme { ipa, .. }) => {
                    self.phonemes().convert(ipa, Alphabet::Ipa, alphabet)?
                }
                _ => self.translate(&word.symbol, lang, failure_langs, alphabet)?,
            };
            Ok(word)
        })
    }
}

/// `lang` followed by the failure languages, in order.
pub(crate) fn candidate_languages<'a>(
    lang: &'a str,
    failure_langs: &'a [String],
) -> impl Iterator<Item = &'a str> + 'a {
    std::iter::once(lang).chain(failure_langs.iter().map(String::as_str))
}

pub(crate) fn is_pause_token(token: &str) -> bool {
    matches!(token, "." | ",")
}

pub(crate) fn pause() -> PhoneSeq {
    vec![PAUSE.to_string()]
}

/// Verbatim lookup, then lower-cased.
pub(crate) fn lookup_folded(lexicon: &Lexicon, token: &str) -> Result<PhoneSeq, TranslationFailure> {
    let hit = lexicon.get(token);
    if !hit.is_empty() {
        return Ok(hit);
    }
    let lower = token.to_lowercase();
    if lower != token {
        let hit = lexicon.get(&lower);
        if !hit.is_empty() {
            return Ok(hit);
        }
    }
    Err(TranslationFailure::NotInLexicon(token.to_string()))
}
