use anyhow::Result;
use async_trait::async_trait;
use minimi_core::image::{Artifact, ArtifactKind, GenerationParams, ImageGenerator};
use stability_client::{Client, Config, DecodedArtifact, FinishReason, TextToImageRequest};

/// An adapter that implements the core `ImageGenerator` trait on top of the
/// Stability REST client.
///
/// A client is built per request from the key the caller passes in, so the
/// adapter itself never holds the credential. All of them share the
/// adapter's connection pool.
pub struct StabilityAdapter {
    http: reqwest::Client,
    base_url: String,
    engine: String,
}

impl StabilityAdapter {
    pub fn new(base_url: &str, engine: &str) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, engine)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, engine: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            engine: engine.to_string(),
        }
    }

    fn client(&self, api_key: &str) -> Client {
        Client::with_http(
            self.http.clone(),
            Config::builder()
                .with_base_url(&self.base_url)
                .with_engine(&self.engine)
                .with_api_key(api_key)
                .build(),
        )
    }
}

pub fn build_request(prompt: &str, params: &GenerationParams) -> TextToImageRequest {
    TextToImageRequest::new(prompt)
        .with_steps(params.steps)
        .with_size(params.width, params.height)
        .with_samples(params.samples)
}

/// The REST endpoint only returns PNG images; an artifact that finished with
/// an error carries no usable picture.
pub fn to_artifact(decoded: DecodedArtifact) -> Artifact {
    match decoded.finish_reason {
        FinishReason::Error => Artifact {
            kind: ArtifactKind::Other,
            mime: None,
            binary: decoded.binary,
        },
        FinishReason::Success | FinishReason::ContentFiltered => Artifact::image(decoded.binary),
    }
}

#[async_trait]
impl ImageGenerator for StabilityAdapter {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<Artifact>> {
        let request = build_request(prompt, params);
        let artifacts = self.client(api_key).text_to_image(&request).await?;
        tracing::debug!(count = artifacts.len(), "received artifacts");
        Ok(artifacts.into_iter().map(to_artifact).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one HTTP request, answers it with an empty artifact list and
    /// returns the request's `user-agent` header.
    async fn answer_once(mut stream: TcpStream) -> Option<String> {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        let head_end = loop {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before the request head");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
        let header = |name: &str| {
            head.lines().find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case(name)
                    .then(|| value.trim().to_string())
            })
        };
        let body_len: usize = header("content-length")
            .and_then(|len| len.parse().ok())
            .unwrap_or(0);
        while raw.len() < head_end + body_len {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before the request body");
            raw.extend_from_slice(&buf[..n]);
        }

        let body = r#"{"artifacts":[]}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        header("user-agent")
    }

    #[test]
    fn test_request_uses_generation_params() {
        let request = build_request("a castle", &GenerationParams::default());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "text_prompts": [{"text": "a castle"}],
                "steps": 30,
                "width": 1024,
                "height": 1024,
                "samples": 1
            })
        );
    }

    #[test]
    fn test_errored_artifacts_are_not_images() {
        let ok = to_artifact(DecodedArtifact {
            seed: 1,
            finish_reason: FinishReason::Success,
            binary: vec![1],
        });
        assert_eq!(ok.kind, ArtifactKind::Image);
        assert_eq!(ok.mime.as_deref(), Some("image/png"));

        let failed = to_artifact(DecodedArtifact {
            seed: 2,
            finish_reason: FinishReason::Error,
            binary: vec![],
        });
        assert_eq!(failed.kind, ArtifactKind::Other);
    }

    #[test]
    fn test_client_targets_configured_engine() {
        let adapter = StabilityAdapter::new("http://localhost:9000", "sd-mini");
        let client = adapter.client("sk-test");
        assert_eq!(
            client.config().text_to_image_url(),
            "http://localhost:9000/v1/generation/sd-mini/text-to-image"
        );
    }

    #[tokio::test]
    async fn test_every_request_goes_through_the_shared_http_client() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let mut agents = vec![];
            for _ in 0..2 {
                let (stream, _) = listener.accept().await.unwrap();
                agents.push(answer_once(stream).await);
            }
            agents
        });

        let http = reqwest::Client::builder()
            .user_agent("minimi-shared-pool")
            .build()
            .unwrap();
        let adapter = StabilityAdapter::with_http(http, &base_url, "sd-mini");
        for key in ["sk-first", "sk-second"] {
            let artifacts = adapter
                .generate(key, "a castle", &GenerationParams::default())
                .await
                .unwrap();
            assert!(artifacts.is_empty());
        }

        let agents = server.await.unwrap();
        assert_eq!(agents, vec![Some("minimi-shared-pool".to_string()); 2]);
    }
}
