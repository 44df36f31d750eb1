//! HTTP client for an OpenAI-compatible chat-completions endpoint.

use async_trait::async_trait;
use pitwall_core::GenerationSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::generation::{Generation, Generator};

/// Longest error body kept for logging.
const MAX_ERROR_BODY: usize = 500;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contained no completion text")]
    EmptyCompletion,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client. Every request is bounded by the configured
/// timeout; failures surface as [`Generation::Fallback`].
pub struct GenerationClient {
    client: reqwest::Client,
    settings: GenerationSettings,
}

impl GenerationClient {
    pub fn new(settings: GenerationSettings) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Request a completion, reporting failures as errors.
    pub async fn try_generate(
        &self,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, GenerationError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let body = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.settings.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: max_output_tokens,
            temperature: self.settings.temperature,
        };

        debug!(
            endpoint = %self.settings.endpoint,
            model = %self.settings.model,
            "requesting completion"
        );
        let resp = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Server {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyCompletion)?;

        info!(chars = content.len(), "completion received");
        Ok(content)
    }
}

#[async_trait]
impl Generator for GenerationClient {
    async fn generate(&self, prompt: &str, max_output_tokens: u32) -> Generation {
        match self.try_generate(prompt, max_output_tokens).await {
            Ok(text) => Generation::Success(text),
            Err(GenerationError::MissingCredential) => {
                warn!("API key missing, using local fallback");
                Generation::fallback(prompt)
            }
            Err(e) => {
                warn!(error = %e, "generation failed, using local fallback");
                Generation::fallback(prompt)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const COMPLETION: &str = r#"{
        "choices": [{"message": {"role": "assistant", "content": "Box this lap for mediums."}}]
    }"#;

    fn settings(endpoint: String) -> GenerationSettings {
        GenerationSettings {
            api_key: Some("sk-test".into()),
            endpoint,
            timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    fn header_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }

    /// Read one full HTTP request (headers plus `Content-Length` body).
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = header_end(&buf) {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve a single canned response; the handle yields the raw request.
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status} Canned\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            request
        });
        (format!("http://{addr}/v1/chat/completions"), handle)
    }

    #[tokio::test]
    async fn no_credential_falls_back_immediately() {
        let client = GenerationClient::new(GenerationSettings::default()).unwrap();
        let generation = client.generate("Why did Hamilton pit?", 250).await;
        let Generation::Fallback(fallback) = generation else {
            panic!("expected fallback");
        };
        assert_eq!(fallback.prompt_echo(), "Why did Hamilton pit?");
    }

    #[tokio::test]
    async fn success_returns_completion_text() {
        let (url, server) = serve_once(200, COMPLETION).await;
        let client = GenerationClient::new(settings(url)).unwrap();

        let generation = client.generate("Tyre call?", 120).await;
        assert_eq!(
            generation,
            Generation::Success("Box this lap for mediums.".into())
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        let lowered = request.to_ascii_lowercase();
        assert!(lowered.contains("authorization: bearer sk-test"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["max_tokens"], 120);
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Tyre call?");
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let (url, _server) = serve_once(500, r#"{"error": "overloaded"}"#).await;
        let client = GenerationClient::new(settings(url)).unwrap();
        let err = client.try_generate("q", 10).await.unwrap_err();
        assert!(matches!(err, GenerationError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let (url, _server) = serve_once(200, "this is not json").await;
        let client = GenerationClient::new(settings(url)).unwrap();
        assert!(client.generate("q", 10).await.is_fallback());
    }

    #[tokio::test]
    async fn empty_choices_fall_back() {
        let (url, _server) = serve_once(200, r#"{"choices": []}"#).await;
        let client = GenerationClient::new(settings(url)).unwrap();
        let err = client.try_generate("q", 10).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyCompletion));
    }

    #[tokio::test]
    async fn refused_connection_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            GenerationClient::new(settings(format!("http://{addr}/v1/chat/completions"))).unwrap();
        assert!(client.generate("q", 10).await.is_fallback());
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let mut slow = settings(format!("http://{addr}/v1/chat/completions"));
        slow.timeout = Duration::from_millis(200);
        let client = GenerationClient::new(slow).unwrap();

        match client.try_generate("q", 10).await.unwrap_err() {
            GenerationError::Http(e) => assert!(e.is_timeout()),
            other => panic!("expected transport error, got {other}"),
        }
    }
}
