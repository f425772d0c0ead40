use std::collections::HashMap;
use std::sync::Arc;

use crate::config::FrontendConfig;
use crate::error::FrontendError;
use crate::g2p::Translator;
use crate::normalizer::Normalizer;
use crate::phonemes::Phonemes;
use crate::pipeline::defaults::{
    build_normalizer, build_translator, default_transcribers, load_lexicons, load_models,
    TranslatorResources,
};
use crate::pipeline::runtime::{Frontend, FrontendParts};
use crate::pipeline::traits::{PhoneticModel, Transcriber};

pub struct FrontendBuilder {
    config: FrontendConfig,
    phonemes: Option<Arc<Phonemes>>,
    normalizer: Option<Normalizer>,
    translator: Option<Translator>,
    models: HashMap<String, Arc<dyn PhoneticModel>>,
    transcribers: HashMap<String, Arc<dyn Transcriber>>,
}

impl FrontendBuilder {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            config,
            phonemes: None,
            normalizer: None,
            translator: None,
            models: HashMap::new(),
            transcribers: HashMap::new(),
        }
    }

    pub fn with_phonemes(mut self, phonemes: Arc<Phonemes>) -> Self {
        self.phonemes = Some(phonemes);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Replaces the configured translator chain.
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Adds or replaces the model used for `language`.
    pub fn with_model(mut self, language: impl Into<String>, model: Arc<dyn PhoneticModel>) -> Self {
        self.models.insert(language.into(), model);
        self
    }

    pub fn with_transcriber(
        mut self,
        language: impl Into<String>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        self.transcribers.insert(language.into(), transcriber);
        self
    }

    pub fn build(self) -> Result<Frontend, FrontendError> {
        let phonemes = self
            .phonemes
            .unwrap_or_else(|| Arc::new(Phonemes::icelandic()));

        let translator = match self.translator {
            Some(translator) => translator,
            None => {
                let mut models = load_models(&self.config.models)?;
                models.extend(self.models);
                let mut transcribers = default_transcribers();
                transcribers.extend(self.transcribers);
                let resources = TranslatorResources {
                    lexicons: load_lexicons(&self.config.lexicons, &phonemes)?,
                    models,
                    transcribers,
                };
                build_translator(&self.config, resources, phonemes.clone())?
            }
        };
        let normalizer = match self.normalizer {
            Some(normalizer) => normalizer,
            None => build_normalizer(&self.config.normalizer, phonemes.clone()),
        };

        tracing::info!(
            translator = translator.name(),
            normalizer = normalizer.name(),
            language = %self.config.default_language,
            "frontend: built"
        );
        Ok(Frontend::from_parts(FrontendParts {
            phonemes,
            normalizer,
            translator,
            default_language: self.config.default_language,
            failure_languages: self.config.failure_languages,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LexiconSource, ModelSource, TranslatorKind};
    use crate::g2p::GraphoneModel;
    use crate::types::{Alphabet, SsmlRequest, Word};

    fn phones(frontend: &Frontend, text: &str) -> Vec<Vec<String>> {
        frontend
            .process(text, &SsmlRequest::plain(Alphabet::XSampa))
            .unwrap()
            .map(|w| w.map(|w: Word| w.phone_sequence))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn default_build_uses_rule_based_icelandic() {
        let frontend = FrontendBuilder::new(FrontendConfig::default()).build().unwrap();
        assert_eq!(frontend.translator().name(), "rule-based");
        assert_eq!(frontend.normalizer().name(), "local");
        assert_eq!(phones(&frontend, "bók"), [["p", "ou:", "k"]]);
    }

    #[test]
    fn build_composes_configured_chain_from_files() {
        let dir = std::env::temp_dir();
        let lexicon_path = dir.join("speech_frontend_builder_lexicon.txt");
        let model_path = dir.join("speech_frontend_builder_model.tsv");
        std::fs::write(&lexicon_path, "bók p ou k\n").expect("write lexicon");
        std::fs::write(&model_path, "h\th\t-1\na\ta\t-1\nl\tl\t-1\n").expect("write model");

        let config = FrontendConfig {
            lexicons: vec![LexiconSource {
                language: "is-IS".to_string(),
                alphabet: Alphabet::XSampa,
                path: lexicon_path.clone(),
            }],
            models: vec![ModelSource {
                language: "is-IS".to_string(),
                alphabet: Alphabet::XSampa,
                path: model_path.clone(),
            }],
            translators: vec![
                TranslatorKind::Lexicon,
                TranslatorKind::Statistical,
                TranslatorKind::RuleBased,
            ],
            ..FrontendConfig::default()
        };
        let frontend = FrontendBuilder::new(config).build().unwrap();
        assert_eq!(frontend.translator().name(), "composed");
        assert_eq!(
            phones(&frontend, "bók hal takk"),
            [vec!["p", "ou", "k"], vec!["h", "a", "l"], vec!["t_h", "a", "h", "k"]]
        );

        let _ = std::fs::remove_file(&lexicon_path);
        let _ = std::fs::remove_file(&model_path);
    }

    #[test]
    fn build_fails_on_missing_lexicon() {
        let config = FrontendConfig {
            lexicons: vec![LexiconSource {
                language: "is-IS".to_string(),
                alphabet: Alphabet::Ipa,
                path: "/nonexistent/lexicon.txt".into(),
            }],
            ..FrontendConfig::default()
        };
        let err = FrontendBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, FrontendError::Configuration { .. }));
    }

    #[test]
    fn build_fails_on_empty_translator_list() {
        let config = FrontendConfig {
            translators: Vec::new(),
            ..FrontendConfig::default()
        };
        assert!(FrontendBuilder::new(config).build().is_err());
    }

    #[test]
    fn overrides_replace_configured_parts() {
        let mut model = GraphoneModel::new(Alphabet::XSampa);
        model.add("x", vec!["k".to_string(), "s".to_string()], -1.0);
        let config = FrontendConfig {
            translators: vec![TranslatorKind::Statistical],
            ..FrontendConfig::default()
        };
        let frontend = FrontendBuilder::new(config)
            .with_phonemes(Arc::new(Phonemes::icelandic()))
            .with_model("is-IS", Arc::new(model))
            .build()
            .unwrap();
        assert_eq!(phones(&frontend, "x"), [["k", "s"]]);
    }
}
