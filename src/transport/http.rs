//! HTTP transport for the chat provider
//!
//! One POST per response: the full prior history plus the new input goes
//! out as JSON, and the reply comes back as an SSE body decoded by
//! [`crate::transport::sse`]. There is no retry and no connection reuse
//! across responses beyond reqwest's own pooling.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{FitsageError, Result};
use crate::session::message::{Message, UserInput};
use crate::transport::sse::parse_sse_stream;
use crate::transport::{DeltaStream, Transport};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Transport that talks to a chat provider over HTTP + SSE
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: url::Url,
    api_key: Option<String>,
    model: String,
    system_prompt: Option<String>,
    max_output_tokens: u32,
    temperature: Option<f64>,
}

impl HttpTransport {
    /// Build a transport for the given endpoint and model.
    ///
    /// No network I/O is performed at construction time.
    pub fn new(
        endpoint: url::Url,
        model: impl Into<String>,
        api_key: Option<String>,
        system_prompt: Option<String>,
        max_output_tokens: u32,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FitsageError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: model.into(),
            system_prompt,
            max_output_tokens,
            temperature: None,
        })
    }

    /// Replace the model for subsequent calls
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a sampling temperature; omitted from the request when unset
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn request_body(&self, history: &[Message], input: &UserInput) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = history
            .iter()
            .map(|m| serde_json::to_value(m).unwrap_or_default())
            .collect();
        let new_message = Message::user(input.text.clone(), &input.attachments);
        messages.push(serde_json::to_value(&new_message).unwrap_or_default());

        let mut body = json!({
            "model": self.model,
            "system": self.system_prompt,
            "max_output_tokens": self.max_output_tokens,
            "stream": true,
            "messages": messages,
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// POST the conversation and stream back delta events.
    ///
    /// Mandatory headers on every POST:
    ///
    /// - `Content-Type: application/json`
    /// - `Accept: text/event-stream`
    /// - `Authorization: Bearer <key>` -- only when an API key is configured
    ///
    /// The SSE body is decoded in a spawned task; the returned stream is an
    /// unfold over the task's channel. Dropping the stream drops the
    /// receiver, which stops the task and closes the connection.
    ///
    /// # Errors
    ///
    /// Returns `FitsageError::Transport` if the request fails before
    /// streaming begins or the server answers with a non-success status.
    async fn open(&self, history: &[Message], input: &UserInput) -> Result<DeltaStream> {
        let body = self.request_body(history, input);
        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            history_len = history.len(),
            "opening response stream"
        );

        let mut req = self
            .client
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body);

        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let response = req.send().await.map_err(|e| {
            anyhow::anyhow!(FitsageError::Transport(format!("request failed: {e}")))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(FitsageError::Transport(format!(
                "provider returned HTTP {status}: {body}"
            ))));
        }

        let byte_stream = response.bytes_stream();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            parse_sse_stream(byte_stream, tx).await;
        });

        Ok(Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            let item = rx.recv().await?;
            Some((item, rx))
        })))
    }
}
