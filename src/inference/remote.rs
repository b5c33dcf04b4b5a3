//! HTTP clients for the model-serving and PDF extraction endpoints

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{
    AbstractiveSummarizer, EntityAnnotator, ExtractiveQa, InferenceError, NamedEntity,
    PdfTextExtractor, QaAnswer, SummaryParams,
};

const USER_AGENT: &str = concat!("legal-intel/", env!("CARGO_PKG_VERSION"));

/// Client for the model-serving endpoint hosting NER, QA and summarization
///
/// One client instance is shared by all pipeline stages; reqwest pools the
/// underlying connections.
#[derive(Clone)]
pub struct RemoteInferenceClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    entities: Vec<NamedEntity>,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    summary: String,
}

impl RemoteInferenceClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, InferenceError> {
        self.base_url
            .join(path)
            .map_err(|e| InferenceError::Unavailable(format!("Invalid endpoint URL: {}", e)))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, InferenceError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Unavailable(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl EntityAnnotator for RemoteInferenceClient {
    async fn annotate(&self, text: &str) -> Result<Vec<NamedEntity>, InferenceError> {
        let url = self.endpoint("ner")?;

        tracing::debug!(url = %url, chars = text.len(), "Requesting NER annotation");

        let response = self
            .client
            .post(url)
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::ParseError(format!("Invalid NER response: {}", e)))?;

        Ok(parsed.entities)
    }
}

#[async_trait]
impl ExtractiveQa for RemoteInferenceClient {
    async fn answer(&self, question: &str, context: &str) -> Result<QaAnswer, InferenceError> {
        let url = self.endpoint("qa")?;

        tracing::debug!(url = %url, question = %question, "Requesting QA answer");

        let response = self
            .client
            .post(url)
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({
                "question": question,
                "context": context,
            }))
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| InferenceError::ParseError(format!("Invalid QA response: {}", e)))
    }
}

#[async_trait]
impl AbstractiveSummarizer for RemoteInferenceClient {
    async fn summarize(
        &self,
        text: &str,
        params: &SummaryParams,
    ) -> Result<String, InferenceError> {
        let url = self.endpoint("summarize")?;

        tracing::debug!(url = %url, chars = text.len(), max_length = params.max_length, "Requesting summary");

        let response = self
            .client
            .post(url)
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({
                "text": text,
                "params": params,
            }))
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        let parsed: SummarizeResponse = response.json().await.map_err(|e| {
            InferenceError::ParseError(format!("Invalid summarization response: {}", e))
        })?;

        Ok(parsed.summary)
    }
}

/// Client for a Tika-style PDF text extraction service
#[derive(Clone)]
pub struct RemotePdfExtractor {
    client: Client,
    base_url: Url,
}

impl RemotePdfExtractor {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl PdfTextExtractor for RemotePdfExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, InferenceError> {
        let url = self
            .base_url
            .join("tika")
            .map_err(|e| InferenceError::Unavailable(format!("Invalid endpoint URL: {}", e)))?;

        tracing::debug!(url = %url, bytes = bytes.len(), "Requesting PDF text extraction");

        let response = self
            .client
            .put(url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/pdf")
            .header("Accept", "text/plain")
            .body(bytes.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(InferenceError::Unavailable(format!(
                "PDF extraction returned status {}",
                status
            )));
        }

        let text = response.text().await?;
        Ok(text.trim().to_string())
    }
}
