//! Text embedding providers.
//!
//! Semantic binding and rule suggestion only need "text in, vectors out".
//! [`HttpEmbeddingClient`] talks to an OpenAI-compatible embeddings endpoint;
//! tests substitute their own [`EmbeddingProvider`].

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default embeddings endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";

/// Maximum texts sent in one request by default.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Errors from an embedding provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmbeddingError {
    /// Request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// Service answered with a non-success status.
    #[error("embedding service error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    /// Client configuration is unusable.
    #[error("embedding client configuration error: {0}")]
    Config(String),
}

impl EmbeddingError {
    /// Whether a retry may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse(_) | Self::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Converts texts to vectors.
///
/// The result is index-aligned with the input. A provider may return fewer
/// vectors than texts, or an empty vector for a text it could not embed;
/// callers treat both as "no embedding".
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Settings for [`HttpEmbeddingClient`].
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    pub model: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
    pub batch_size: usize,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    index: usize,
}

/// Blocking client for an OpenAI-compatible embeddings API.
pub struct HttpEmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
}

impl HttpEmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        if config.batch_size == 0 {
            return Err(EmbeddingError::Config("batch size must be at least 1".into()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("fieldcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EmbeddingError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    fn request_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut attempt = 0;
        loop {
            match self.send_batch(batch) {
                Ok(vectors) => return Ok(vectors),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %err, "embedding request failed, retrying");
                    std::thread::sleep(Duration::from_millis(500 * u64::from(attempt)));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn send_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.config.model,
            input: batch,
        };
        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;
        Ok(order_by_index(parsed.data, batch.len()))
    }
}

/// Place returned vectors by their `index`; slots the service skipped stay empty.
fn order_by_index(data: Vec<EmbeddingDatum>, expected: usize) -> Vec<Vec<f32>> {
    let mut slots = vec![Vec::new(); expected];
    for datum in data {
        match slots.get_mut(datum.index) {
            Some(slot) => *slot = datum.embedding,
            None => debug!(index = datum.index, "ignoring embedding with out-of-range index"),
        }
    }
    slots
}

impl EmbeddingProvider for HttpEmbeddingClient {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = vec![Vec::new(); texts.len()];

        // Blank texts are never sent; their slots stay empty.
        let positions: Vec<usize> = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(idx, _)| idx)
            .collect();

        // A failed batch leaves its slots empty; the call only fails when no
        // batch succeeded.
        let mut succeeded = 0usize;
        let mut last_error = None;
        for chunk in positions.chunks(self.config.batch_size) {
            let batch: Vec<String> = chunk.iter().map(|&idx| texts[idx].clone()).collect();
            debug!(count = batch.len(), model = %self.config.model, "requesting embeddings");
            match self.request_batch(&batch) {
                Ok(embedded) => {
                    succeeded += 1;
                    for (&idx, vector) in chunk.iter().zip(embedded) {
                        vectors[idx] = vector;
                    }
                }
                Err(err) => {
                    warn!(error = %err, count = batch.len(), "embedding batch failed, entries left empty");
                    last_error = Some(err);
                }
            }
        }
        match last_error {
            Some(err) if succeeded == 0 => Err(err),
            _ => Ok(vectors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(EmbeddingError::Network("timeout".to_string()).is_retryable());
        assert!(
            EmbeddingError::Status {
                status: 429,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !EmbeddingError::Status {
                status: 401,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!EmbeddingError::InvalidResponse("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_order_by_index_tolerates_gaps() {
        let data = vec![
            EmbeddingDatum {
                embedding: vec![2.0],
                index: 1,
            },
            EmbeddingDatum {
                embedding: vec![9.0],
                index: 7,
            },
        ];
        let ordered = order_by_index(data, 3);
        assert_eq!(ordered, vec![Vec::new(), vec![2.0], Vec::new()]);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let config = EmbeddingConfig {
            batch_size: 0,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            HttpEmbeddingClient::new(config),
            Err(EmbeddingError::Config(_))
        ));
    }

    #[test]
    fn test_blank_texts_skip_the_network() {
        // Nothing non-blank to send, so no request is made.
        let client = HttpEmbeddingClient::new(EmbeddingConfig {
            endpoint: "http://127.0.0.1:9/unused".to_string(),
            ..EmbeddingConfig::default()
        })
        .unwrap();
        let vectors = client
            .embed(&["".to_string(), "   ".to_string()])
            .unwrap();
        assert_eq!(vectors, vec![Vec::<f32>::new(), Vec::new()]);
    }

    /// Serves one canned response per connection, in order.
    fn serve(responses: Vec<(u16, &'static str)>) -> String {
        use std::io::{BufRead, BufReader, Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream);
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    let lower = line.to_ascii_lowercase();
                    if let Some(value) = lower.strip_prefix("content-length:") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                let mut request_body = vec![0u8; content_length];
                reader.read_exact(&mut request_body).unwrap();
                let mut stream = reader.into_inner();
                write!(
                    stream,
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
                stream.flush().unwrap();
            }
        });
        format!("http://{addr}/v1/embeddings")
    }

    fn stub_client(endpoint: String) -> HttpEmbeddingClient {
        HttpEmbeddingClient::new(EmbeddingConfig {
            endpoint,
            batch_size: 1,
            max_retries: 0,
            ..EmbeddingConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_failed_batch_keeps_successful_batches() {
        let endpoint = serve(vec![
            (200, r#"{"data":[{"embedding":[1.0,2.0],"index":0}]}"#),
            (400, r#"{"error":"bad input"}"#),
        ]);
        let vectors = stub_client(endpoint)
            .embed(&["zip".to_string(), "city".to_string()])
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0, 2.0], Vec::new()]);
    }

    #[test]
    fn test_all_batches_failing_is_an_error() {
        let endpoint = serve(vec![
            (400, r#"{"error":"bad input"}"#),
            (400, r#"{"error":"bad input"}"#),
        ]);
        let result = stub_client(endpoint).embed(&["zip".to_string(), "city".to_string()]);
        assert!(matches!(
            result,
            Err(EmbeddingError::Status { status: 400, .. })
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let input = vec!["Zip".to_string()];
        let body = serde_json::to_value(EmbeddingRequest {
            model: DEFAULT_MODEL,
            input: &input,
        })
        .unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["input"][0], "Zip");
    }
}
