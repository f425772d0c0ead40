//! Stock components the builder falls back to.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{FrontendConfig, LexiconSource, ModelSource, NormalizerConfig, TranslatorKind};
use crate::error::FrontendError;
use crate::g2p::{
    ComposedTranslator, GraphoneModel, IcelandicRules, LexiconTranslator, RuleBasedTranslator,
    StatisticalTranslator, Translator,
};
use crate::lexicon::Lexicon;
use crate::normalizer::{HttpNormalizationRpc, Normalizer};
use crate::phonemes::Phonemes;
use crate::pipeline::traits::{PhoneticModel, Transcriber};

/// Transcription engines bundled with the crate, by language.
pub fn default_transcribers() -> HashMap<String, Arc<dyn Transcriber>> {
    let mut engines: HashMap<String, Arc<dyn Transcriber>> = HashMap::new();
    engines.insert("is-IS".to_string(), Arc::new(IcelandicRules::new()));
    engines
}

pub fn load_lexicons(
    sources: &[LexiconSource],
    phonemes: &Arc<Phonemes>,
) -> Result<Vec<Arc<Lexicon>>, FrontendError> {
    sources
        .iter()
        .map(|src| {
            Lexicon::load(&src.path, src.language.as_str(), src.alphabet, phonemes.clone()).map(Arc::new)
        })
        .collect()
}

pub fn load_models(
    sources: &[ModelSource],
) -> Result<HashMap<String, Arc<dyn PhoneticModel>>, FrontendError> {
    sources
        .iter()
        .map(|src| {
            let model: Arc<dyn PhoneticModel> = Arc::new(GraphoneModel::load(&src.path, src.alphabet)?);
            Ok((src.language.clone(), model))
        })
        .collect()
}

pub fn build_normalizer(config: &NormalizerConfig, phonemes: Arc<Phonemes>) -> Normalizer {
    match config {
        NormalizerConfig::Local => Normalizer::local(phonemes),
        NormalizerConfig::Remote { url, timeout_ms } => {
            let rpc = HttpNormalizationRpc::new(url.clone(), Duration::from_millis(*timeout_ms));
            tracing::info!(url = rpc.url(), timeout_ms, "normalizer: using remote service");
            Normalizer::remote(Box::new(rpc), phonemes)
        }
    }
}

/// Resources shared by the translators of one chain.
pub(crate) struct TranslatorResources {
    pub lexicons: Vec<Arc<Lexicon>>,
    pub models: HashMap<String, Arc<dyn PhoneticModel>>,
    pub transcribers: HashMap<String, Arc<dyn Transcriber>>,
}

/// One translator per configured kind; several kinds are composed in order.
pub(crate) fn build_translator(
    config: &FrontendConfig,
    resources: TranslatorResources,
    phonemes: Arc<Phonemes>,
) -> Result<Translator, FrontendError> {
    let mut chain: Vec<Translator> = config
        .translators
        .iter()
        .map(|kind| match kind {
            TranslatorKind::Lexicon => Translator::Lexicon(LexiconTranslator::new(
                resources.lexicons.iter().cloned(),
                phonemes.clone(),
            )),
            TranslatorKind::Statistical => Translator::Statistical(StatisticalTranslator::new(
                resources.lexicons.iter().cloned(),
                resources
                    .models
                    .iter()
                    .map(|(lang, model)| (lang.clone(), model.clone())),
                phonemes.clone(),
            )),
            TranslatorKind::RuleBased => Translator::RuleBased(RuleBasedTranslator::new(
                resources
                    .transcribers
                    .iter()
                    .map(|(lang, engine)| (lang.clone(), engine.clone())),
                config.syllabify,
                phonemes.clone(),
            )),
        })
        .collect();

    match chain.len() {
        0 => Err(FrontendError::configuration("no translators configured")),
        1 => Ok(chain.remove(0)),
        _ => Ok(Translator::Composed(ComposedTranslator::new(chain)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizer_follows_config_kind() {
        let phonemes = Arc::new(Phonemes::icelandic());
        let local = build_normalizer(&NormalizerConfig::Local, phonemes.clone());
        assert_eq!(local.name(), "local");
        let remote = build_normalizer(
            &NormalizerConfig::Remote {
                url: "http://127.0.0.1:9/normalize".to_string(),
                timeout_ms: 50,
            },
            phonemes,
        );
        assert_eq!(remote.name(), "remote");
    }
}
