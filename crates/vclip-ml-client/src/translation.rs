//! HTTP-backed [`TranslationCapability`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;
use vclip_captions::{TranslationCapability, TranslationMode};

#[derive(Serialize)]
struct ConvertRequest<'a> {
    text: &'a str,
    target_language: &'a str,
    mode: &'a str,
}

#[derive(Deserialize)]
struct ConvertResponse {
    text: String,
}

pub struct HttpTranslationClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTranslationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .expect("reqwest client builds with static config"),
        }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var("TRANSLATION_SERVICE_URL").ok().map(Self::new)
    }
}

#[async_trait]
impl TranslationCapability for HttpTranslationClient {
    async fn convert(&self, text: &str, target: &str, mode: TranslationMode) -> Option<String> {
        let mode_str = match mode {
            TranslationMode::Translate => "translate",
            TranslationMode::Transliterate => "transliterate",
        };

        let url = format!("{}/convert", self.base_url);
        let request = ConvertRequest { text, target_language: target, mode: mode_str };

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("translation service unreachable: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("translation service returned {}", response.status());
            return None;
        }

        match response.json::<ConvertResponse>().await {
            Ok(body) => Some(body.text),
            Err(e) => {
                warn!("translation service returned unparseable body: {}", e);
                None
            }
        }
    }
}
