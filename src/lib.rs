pub mod config;
pub mod error;
pub mod g2p;
pub mod lexicon;
pub mod normalizer;
pub mod phonemes;
pub mod pipeline;
pub mod ssml;
pub mod types;

pub use config::FrontendConfig;
pub use error::FrontendError;
pub use g2p::Translator;
pub use lexicon::Lexicon;
pub use normalizer::Normalizer;
pub use phonemes::Phonemes;
pub use pipeline::builder::FrontendBuilder;
pub use pipeline::runtime::Frontend;
pub use pipeline::traits::{NormalizationRpc, PhoneticModel, SynthesisBackend, Transcriber};
pub use types::{Alphabet, LexWord, PhoneSeq, SsmlProps, SsmlRequest, Word};
