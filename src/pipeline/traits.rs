use crate::error::FrontendError;
use crate::g2p::TranslationFailure;
use crate::normalizer::NormalizationResponse;
use crate::types::{Alphabet, PhoneSeq, Word};

/// Trained pronunciation model consulted on lexicon misses.
pub trait PhoneticModel: Send + Sync {
    fn predict(&self, word: &str) -> Result<PhoneSeq, TranslationFailure>;

    /// Alphabet of the phones returned by `predict`.
    fn alphabet(&self) -> Alphabet;
}

/// Letter-to-sound engine for one language. Returns IPA.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, word: &str) -> Result<PhoneSeq, TranslationFailure>;
}

/// Transport to an external normalization service.
pub trait NormalizationRpc: Send + Sync {
    fn normalize(&self, text: &str) -> Result<NormalizationResponse, FrontendError>;
}

/// Synthesis collaborator fed with the finished word stream.
pub trait SynthesisBackend: Send + Sync {
    fn synthesize(&self, words: &[Word], alphabet: Alphabet) -> Result<Vec<u8>, FrontendError>;
}
