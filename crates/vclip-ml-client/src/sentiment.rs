//! HTTP-backed [`SentimentCapability`] implementation.
//!
//! Talks to an external sentiment classifier over a small JSON contract.
//! Per the capability's own contract, any transport or decoding failure is
//! swallowed and surfaces as "no opinion" (`None`) rather than an error —
//! sentiment is a scoring bonus, not something the pipeline depends on.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;
use vclip_selection::{SentimentCapability, SentimentLabel, SentimentResult};

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    label: String,
    confidence: f64,
}

pub struct HttpSentimentClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSentimentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client builds with static config"),
        }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var("SENTIMENT_SERVICE_URL").ok().map(Self::new)
    }
}

#[async_trait]
impl SentimentCapability for HttpSentimentClient {
    async fn classify(&self, text: &str) -> Option<SentimentResult> {
        let url = format!("{}/classify", self.base_url);
        let response = match self.client.post(&url).json(&ClassifyRequest { text }).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("sentiment classifier unreachable: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("sentiment classifier returned {}", response.status());
            return None;
        }

        let parsed: ClassifyResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("sentiment classifier returned unparseable body: {}", e);
                return None;
            }
        };

        let label = match parsed.label.to_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            "neutral" => SentimentLabel::Neutral,
            other => SentimentLabel::Other(other.to_string()),
        };

        Some(SentimentResult { label, confidence: parsed.confidence })
    }
}
