use thiserror::Error;

use crate::types::Alphabet;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid SSML: {message}")]
    Validation { message: String },
    #[error("cannot align phoneme substring {substring:?} in {input:?}")]
    Alignment { substring: String, input: String },
    #[error("unknown {alphabet} phone {phone:?}")]
    UnknownPhone { phone: String, alphabet: Alphabet },
    #[error("invalid configuration: {message}")]
    Configuration { message: String },
    #[error("{context}: {message}")]
    Rpc {
        context: &'static str,
        message: String,
    },
}

impl FrontendError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn alignment(substring: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Alignment {
            substring: substring.into(),
            input: input.into(),
        }
    }

    pub(crate) fn unknown_phone(phone: impl Into<String>, alphabet: Alphabet) -> Self {
        Self::UnknownPhone {
            phone: phone.into(),
            alphabet,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn rpc(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Rpc {
            context,
            message: err.to_string(),
        }
    }
}
