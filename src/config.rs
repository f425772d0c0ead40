use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FrontendError;
use crate::types::Alphabet;

/// Front-end configuration, read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub default_language: String,
    /// Languages tried, in order, when the requested one has no answer.
    pub failure_languages: Vec<String>,
    pub lexicons: Vec<LexiconSource>,
    pub models: Vec<ModelSource>,
    /// Translator chain, first entry tried first.
    pub translators: Vec<TranslatorKind>,
    pub syllabify: bool,
    pub normalizer: NormalizerConfig,
}

impl FrontendConfig {
    pub const DEFAULT_LANGUAGE: &'static str = "is-IS";

    /// Reads a config file. Relative resource paths are taken from the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, FrontendError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| FrontendError::io("read frontend config", e))?;
        let mut config: Self = serde_json::from_str(&data)
            .map_err(|e| FrontendError::json("parse frontend config", e))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.lexicons.iter_mut().for_each(|l| resolve(&mut l.path));
        self.models.iter_mut().for_each(|m| resolve(&mut m.path));
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            default_language: Self::DEFAULT_LANGUAGE.to_string(),
            failure_languages: Vec::new(),
            lexicons: Vec::new(),
            models: Vec::new(),
            translators: vec![TranslatorKind::RuleBased],
            syllabify: false,
            normalizer: NormalizerConfig::Local,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconSource {
    pub language: String,
    #[serde(default)]
    pub alphabet: Alphabet,
    pub path: PathBuf,
}

/// Graphone model file for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSource {
    pub language: String,
    #[serde(default = "default_model_alphabet")]
    pub alphabet: Alphabet,
    pub path: PathBuf,
}

fn default_model_alphabet() -> Alphabet {
    Alphabet::XSampa
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslatorKind {
    Lexicon,
    Statistical,
    RuleBased,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NormalizerConfig {
    #[default]
    Local,
    Remote {
        url: String,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_timeout_ms() -> u64 {
    5_000
}
