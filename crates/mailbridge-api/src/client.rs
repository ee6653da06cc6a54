//! HTTP client for the messages API.

use crate::error::{Error, Result};
use crate::request::SendRequest;
use crate::response::SendResponse;
use serde::Deserialize;

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.mailgun.net/v3";

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Client for the provider's messages API.
///
/// Authenticates with HTTP basic auth (`api:<key>`) and posts to
/// `<base>/<domain>/messages`. Retries, timeouts, and cancellation are
/// the caller's responsibility; this client performs exactly one
/// request per call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the default API endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (e.g. the EU region
    /// endpoint, or a test server).
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends a message through the given sending domain.
    ///
    /// Uses multipart encoding whenever the request carries attachments,
    /// plain form encoding otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the API responds
    /// with a non-success status.
    pub async fn send(&self, domain: &str, request: &SendRequest) -> Result<SendResponse> {
        let url = format!("{}/{domain}/messages", self.base_url);
        tracing::debug!(
            %url,
            attachments = request.attachments().len(),
            "Submitting message"
        );

        let builder = self
            .http
            .post(&url)
            .basic_auth("api", Some(&self.api_key));

        let response = if request.has_attachments() {
            // Attachments require multipart/form-data encoding.
            let mut form = reqwest::multipart::Form::new();
            for (key, value) in request.to_form_pairs() {
                form = form.text(key, value);
            }
            for attachment in request.attachments() {
                let part = reqwest::multipart::Part::bytes(attachment.content.clone())
                    .file_name(attachment.filename.clone());
                form = form.part("attachment", part);
            }
            builder.multipart(form).send().await?
        } else {
            builder.form(&request.to_form_pairs()).send().await?
        };

        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or(ErrorBody {
                message: String::new(),
            });
            return Err(Error::Api {
                status: status.as_u16(),
                message: body.message,
            });
        }

        response.json::<SendResponse>().await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::with_base_url("key", "https://api.eu.mailgun.net/v3/");
        assert_eq!(client.base_url, "https://api.eu.mailgun.net/v3");
    }
}
