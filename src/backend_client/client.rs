//! Booking backend HTTP client.
//! Keeps cookies so the server session from `/login` carries over to booking.
//! Never retries: every call is a single request.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::backend::FormReply;

#[derive(Debug, Clone, Default)]
pub struct BackendClientOptions {
    pub timeout_ms: Option<u64>,
    pub ignore_cert: bool,
}

impl From<&ClientConfig> for BackendClientOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            ignore_cert: config.ignore_cert,
        }
    }
}

#[derive(Clone)]
pub struct BackendClient {
    base: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base: &str, options: BackendClientOptions) -> ClientResult<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(options.ignore_cert);
        if let Some(ms) = options.timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(ms));
        }

        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(&config.backend, config.into())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URLs pass through, paths are joined onto the backend base.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base, url)
        } else {
            format!("{}/{}", self.base, url)
        }
    }

    /// POST a JSON body and parse the JSON reply.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.resolve(path);
        debug!("[BACKEND] POST {} (json)", url);
        let response = self.http.post(&url).json(body).send().await?;
        Self::parse_json(&url, response).await
    }

    /// POST url-encoded form fields and parse the JSON reply.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(String, String)],
    ) -> ClientResult<T> {
        let url = self.resolve(path);
        debug!("[BACKEND] POST {} (form, {} fields)", url, fields.len());
        let response = self.http.post(&url).form(fields).send().await?;
        Self::parse_json(&url, response).await
    }

    /// POST a form whose reply is a page or a redirect to one.
    pub async fn submit_form(&self, action: &str, fields: &[(String, String)]) -> ClientResult<FormReply> {
        let url = self.resolve(action);
        debug!("[BACKEND] POST {} (page form)", url);
        let response = self.http.post(&url).form(fields).send().await?;

        let requested = reqwest::Url::parse(&url).ok();
        if requested.as_ref() != Some(response.url()) {
            let final_url = response.url().to_string();
            debug!("[BACKEND] redirected {} → {}", url, final_url);
            return Ok(FormReply::Redirected(final_url));
        }

        let html = response.text().await?;
        Ok(FormReply::Document(html))
    }

    /// GET raw bytes, failing on non-success status.
    pub async fn get_bytes(&self, url: &str) -> ClientResult<Vec<u8>> {
        let url = self.resolve(url);
        debug!("[BACKEND] GET {}", url);
        let response = self.http.get(&url).send().await?;
        let response = response.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn parse_json<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let body_text = response.text().await?;
        serde_json::from_str::<T>(&body_text).map_err(|e| {
            warn!("[BACKEND] {} answered {} with a non-JSON body", url, status);
            ClientError::decode(format!(
                "JSON parse error: {} body={}",
                e,
                &body_text[..floor_char_boundary(&body_text, 200)]
            ))
        })
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut idx = max;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
#[path = "../../tests/unit/backend_client/client.rs"]
mod tests;
