//! Typed HTTP client for the remote store.
//!
//! Every call attaches the bearer API key and the device identifier
//! header; non-2xx responses decode the structured error body and
//! surface a typed failure.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{NewScript, Script, ScriptListItem, ScriptPatch, SyncStatus};
use crate::util::{compact_text, is_http_url};

const DEVICE_ID_HEADER: &str = "X-Device-ID";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Explicit client value constructed from configuration; no ambient
/// global, callers pass it to each operation.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: String,
    device_id: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.server_url.trim_end_matches('/').to_string();
        if !is_http_url(&base_url) {
            return Err(Error::Config(
                "Server URL must start with http:// or https://".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url,
            api_key: config.api_key.clone().unwrap_or_default(),
            device_id: config.device_id.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn script_url(&self, name: &str) -> String {
        self.url(&format!("/scripts/{}", urlencoding::encode(name)))
    }

    fn prepare(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header(DEVICE_ID_HEADER, &self.device_id)
    }

    pub async fn list_scripts(&self) -> Result<Vec<ScriptListItem>> {
        let response = self.prepare(self.client.get(self.url("/scripts"))).send().await?;
        let envelope: ScriptsEnvelope = decode(response, None).await?;
        Ok(envelope.scripts)
    }

    pub async fn get_script(&self, name: &str) -> Result<Script> {
        let response = self
            .prepare(self.client.get(self.script_url(name)))
            .send()
            .await?;
        let envelope: ScriptEnvelope = decode(response, Some(name)).await?;
        Ok(envelope.script)
    }

    pub async fn create_script(&self, script: &NewScript) -> Result<Script> {
        let response = self
            .prepare(self.client.post(self.url("/scripts")).json(script))
            .send()
            .await?;
        let envelope: ScriptEnvelope = decode(response, Some(&script.name)).await?;
        Ok(envelope.script)
    }

    pub async fn update_script(&self, name: &str, patch: &ScriptPatch) -> Result<Script> {
        let response = self
            .prepare(self.client.put(self.script_url(name)).json(patch))
            .send()
            .await?;
        let envelope: ScriptEnvelope = decode(response, Some(name)).await?;
        Ok(envelope.script)
    }

    pub async fn delete_script(&self, name: &str) -> Result<()> {
        let response = self
            .prepare(self.client.delete(self.script_url(name)))
            .send()
            .await?;
        let _: DeleteEnvelope = decode(response, Some(name)).await?;
        Ok(())
    }

    pub async fn sync_status(&self, since: Option<i64>) -> Result<SyncStatus> {
        let path = since.map_or_else(
            || "/sync/status".to_string(),
            |ts| format!("/sync/status?since={ts}"),
        );
        let response = self.prepare(self.client.get(self.url(&path))).send().await?;
        decode(response, None).await
    }

    /// Probe the health endpoint. Never raises: any network or server
    /// failure maps to `false`.
    pub async fn health_check(&self) -> bool {
        let Ok(response) = self
            .prepare(self.client.get(self.url("/health")))
            .send()
            .await
        else {
            return false;
        };
        response.status().is_success()
    }
}

#[derive(Debug, Deserialize)]
struct ScriptsEnvelope {
    scripts: Vec<ScriptListItem>,
}

#[derive(Debug, Deserialize)]
struct ScriptEnvelope {
    script: Script,
}

#[derive(Debug, Deserialize)]
struct DeleteEnvelope {
    #[allow(dead_code)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    warning: Option<bool>,
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    name: Option<&str>,
) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_response(status, &body, name))
}

fn error_from_response(status: StatusCode, body: &str, name: Option<&str>) -> Error {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|payload| payload.error.clone())
        .unwrap_or_else(|| {
            let trimmed = compact_text(body);
            if trimmed.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                trimmed
            }
        });
    let warning = parsed.and_then(|payload| payload.warning).unwrap_or(false);

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(name.map_or_else(|| message.clone(), str::to_string)),
        StatusCode::UNAUTHORIZED => Error::Unauthorized(message),
        StatusCode::CONFLICT => Error::Duplicate(name.map_or_else(|| message.clone(), str::to_string)),
        _ => Error::Api {
            message,
            status: status.as_u16(),
            warning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_typed_error() {
        let error = error_from_response(
            StatusCode::NOT_FOUND,
            r#"{"error":"Script not found"}"#,
            Some("deploy"),
        );
        assert!(matches!(error, Error::NotFound(name) if name == "deploy"));
    }

    #[test]
    fn conflict_maps_to_duplicate() {
        let error = error_from_response(
            StatusCode::CONFLICT,
            r#"{"error":"Script with this name already exists"}"#,
            Some("deploy"),
        );
        assert!(matches!(error, Error::Duplicate(name) if name == "deploy"));
    }

    #[test]
    fn warning_flag_survives_decoding() {
        let error = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Script name conflicts with system command: git","warning":true}"#,
            Some("git"),
        );
        assert!(error.is_warning());
    }

    #[test]
    fn unauthorized_maps_to_typed_error() {
        let error = error_from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"Unauthorized"}"#,
            None,
        );
        assert!(matches!(error, Error::Unauthorized(_)));
    }

    #[test]
    fn unparseable_body_falls_back_to_status_text() {
        let error = error_from_response(StatusCode::BAD_GATEWAY, "", None);
        match error {
            Error::Api {
                message,
                status,
                warning,
            } => {
                assert_eq!(message, "HTTP 502");
                assert_eq!(status, 502);
                assert!(!warning);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn client_rejects_non_http_server_url() {
        let config = Config {
            server_url: "shelf.example.com".to_string(),
            api_key: Some("sk-test".to_string()),
            device_id: "dev-1".to_string(),
        };
        assert!(ApiClient::new(&config).is_err());
    }
}
