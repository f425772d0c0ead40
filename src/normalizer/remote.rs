//! Token source backed by an external normalization service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FrontendError;
use crate::normalizer::tokenizer::{TokenEvent, TokenPair};
use crate::pipeline::traits::NormalizationRpc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizationResponse {
    #[serde(default)]
    pub sentences: Vec<NormalizedSentence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizedSentence {
    #[serde(default)]
    pub tokens: Vec<TokenPair>,
}

impl NormalizationResponse {
    /// Flattens the sentences into tokens with a sentence end after each one.
    pub fn into_events(self) -> impl Iterator<Item = TokenEvent> {
        self.sentences.into_iter().flat_map(|sentence| {
            sentence
                .tokens
                .into_iter()
                .map(TokenEvent::Token)
                .chain(std::iter::once(TokenEvent::SentenceEnd))
        })
    }
}

/// Blocking JSON-over-HTTP client. One request per call, no retry.
pub struct HttpNormalizationRpc {
    url: String,
    timeout: Duration,
    agent: ureq::Agent,
}

impl HttpNormalizationRpc {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            url: url.into(),
            timeout,
            agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NormalizationRpc for HttpNormalizationRpc {
    fn normalize(&self, text: &str) -> Result<NormalizationResponse, FrontendError> {
        let request = NormalizationRequest {
            text: text.to_string(),
        };
        tracing::debug!(url = %self.url, bytes = text.len(), "normalization rpc: request");

        let response = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_json(&request);

        match response {
            Ok(resp) => resp
                .into_json::<NormalizationResponse>()
                .map_err(|e| FrontendError::rpc("decode normalization response", e)),
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(FrontendError::rpc(
                    "normalization service",
                    format!("status {status}: {body}"),
                ))
            }
            Err(ureq::Error::Transport(transport)) => Err(FrontendError::rpc(
                "normalization service",
                format!("{transport} (timeout {:?})", self.timeout),
            )),
        }
    }
}

/// Remote token source: the whole text goes out in one call.
pub struct RemoteTokenizer {
    rpc: Box<dyn NormalizationRpc>,
}

impl RemoteTokenizer {
    pub fn new(rpc: Box<dyn NormalizationRpc>) -> Self {
        Self { rpc }
    }

    pub fn tokenize(&self, text: &str) -> Result<impl Iterator<Item = TokenEvent>, FrontendError> {
        let response = self.rpc.normalize(text)?;
        tracing::debug!(
            sentences = response.sentences.len(),
            "normalization rpc: response"
        );
        Ok(response.into_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl NormalizationRpc for Canned {
        fn normalize(&self, _text: &str) -> Result<NormalizationResponse, FrontendError> {
            serde_json::from_str(self.0).map_err(|e| FrontendError::json("parse canned response", e))
        }
    }

    #[test]
    fn response_parses_wire_format() {
        let json = r#"{"sentences":[{"tokens":[{"original":"3","normalized":"þrír"},{"original":"kettir","normalized":"kettir"}]},{"tokens":[{"original":"Já","normalized":"já"}]}]}"#;
        let events: Vec<TokenEvent> = RemoteTokenizer::new(Box::new(Canned(json)))
            .tokenize("3 kettir. Já")
            .unwrap()
            .collect();
        assert_eq!(
            events,
            [
                TokenEvent::Token(TokenPair::new("3", "þrír")),
                TokenEvent::Token(TokenPair::new("kettir", "kettir")),
                TokenEvent::SentenceEnd,
                TokenEvent::Token(TokenPair::new("Já", "já")),
                TokenEvent::SentenceEnd,
            ]
        );
    }

    #[test]
    fn request_serializes_text_field() {
        let body = serde_json::to_string(&NormalizationRequest {
            text: "Halló".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"text":"Halló"}"#);
    }

    #[test]
    fn malformed_response_is_an_error() {
        let result = RemoteTokenizer::new(Box::new(Canned("{\"sentences\": 3}"))).tokenize("x");
        assert!(matches!(result, Err(FrontendError::Json { .. })));
    }

    #[test]
    fn unreachable_service_is_rpc_error() {
        let rpc = HttpNormalizationRpc::new("http://127.0.0.1:9/normalize", Duration::from_millis(200));
        assert_eq!(rpc.url(), "http://127.0.0.1:9/normalize");
        assert!(matches!(rpc.normalize("x"), Err(FrontendError::Rpc { .. })));
    }
}
