//! Transcription and speech synthesis endpoints.

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::client::ApiClient;
use crate::error::ApiError;

const TRANSCRIBE_PATH: &str = "/api/asr/transcribe/";
const SYNTHESIZE_PATH: &str = "/api/tts/synthesize/";

/// Audio ready for upload.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transcription {
    pub id: Option<u64>,
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
}

/// Download progress for streamed responses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl Transfer {
    /// Completion in percent, when the total size is known.
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.loaded as f64 / total as f64 * 100.0),
            _ => None,
        }
    }
}

impl ApiClient {
    /// Upload audio as multipart field `audio`.
    pub async fn transcribe(
        &self,
        audio: &AudioUpload,
        language: Option<&str>,
    ) -> Result<Transcription, ApiError> {
        let part = Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(&audio.mime)
            .map_err(|e| ApiError::Unexpected(format!("Invalid MIME type '{}': {}", audio.mime, e)))?;

        let mut form = Form::new().part("audio", part);
        if let Some(language) = language {
            form = form.text("language", language.to_string());
        }

        let builder = self.request(Method::POST, TRANSCRIBE_PATH)?.multipart(form);
        self.send_json(builder).await
    }

    /// Synthesize speech, reporting download progress as chunks arrive.
    pub async fn synthesize<F>(
        &self,
        text: &str,
        voice: Option<&str>,
        mut on_progress: F,
    ) -> Result<Vec<u8>, ApiError>
    where
        F: FnMut(Transfer),
    {
        let builder = self
            .request(Method::POST, SYNTHESIZE_PATH)?
            .json(&SynthesisRequest { text, voice });
        let response = self.send(builder).await?;

        let total = response.content_length();
        let mut audio = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            audio.extend_from_slice(&chunk);
            on_progress(Transfer {
                loaded: audio.len() as u64,
                total,
            });
        }

        tracing::debug!(bytes = audio.len(), "Synthesized audio received");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_percent() {
        assert_eq!(Transfer { loaded: 50, total: Some(200) }.percent(), Some(25.0));
        assert_eq!(Transfer { loaded: 50, total: None }.percent(), None);
        assert_eq!(Transfer { loaded: 0, total: Some(0) }.percent(), None);
    }

    #[test]
    fn test_voice_omitted_when_unset() {
        let body = serde_json::to_string(&SynthesisRequest { text: "hi", voice: None }).unwrap();
        assert_eq!(body, r#"{"text":"hi"}"#);
    }
}
