//! HTTP client for the CoCon REST interface
//!
//! CoCon exposes commands as `GET /CoCon/<Model>/<Command>/?Param=value`
//! and pushes notifications over a long-poll on `/CoCon/Notification/id=<id>`,
//! where the id is handed out by `/CoCon/Connect`.

use std::time::Duration;

use serde_json::Value;

use crate::error::{MonitorError, MonitorResult};

/// CoCon data models that can be unsubscribed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Microphone,
    Timer,
    Audio,
    Logging,
    Interpretation,
}

impl Model {
    /// Models whose notifications the vote monitor never needs
    pub const NOISY: [Model; 5] = [
        Model::Microphone,
        Model::Timer,
        Model::Audio,
        Model::Logging,
        Model::Interpretation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Model::Microphone => "Microphone",
            Model::Timer => "Timer",
            Model::Audio => "Audio",
            Model::Logging => "Logging",
            Model::Interpretation => "Interpretation",
        }
    }
}

pub struct CoconClient {
    http: reqwest::Client,
    base_url: String,
    connection_id: Option<String>,
}

impl CoconClient {
    /// `base_url` is the `http://host:port/CoCon` root
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> MonitorResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connection_id: None,
        })
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    /// Open a notification session
    pub async fn connect(&mut self) -> MonitorResult<()> {
        let response = self.get_json(&format!("{}/Connect", self.base_url), &[]).await?;
        let id = extract_connection_id(&response).ok_or_else(|| {
            MonitorError::Protocol(format!("Connect answered without an id: {}", response))
        })?;
        log::info!("Connected to CoCon at {} (id {})", self.base_url, id);
        self.connection_id = Some(id);
        Ok(())
    }

    /// Run a command such as `Delegate/GetDelegatesInMeeting`
    pub async fn send(&self, endpoint: &str, params: &[(&str, String)]) -> MonitorResult<Value> {
        let url = format!("{}/{}/", self.base_url, endpoint.trim_matches('/'));
        self.get_json(&url, params).await
    }

    /// Wait for the next batch of notifications; `Null` when the poll timed out empty
    pub async fn notification(&self) -> MonitorResult<Value> {
        let id = self.require_id()?;
        let url = format!("{}/Notification/id={}", self.base_url, id);
        self.get_json(&url, &[]).await
    }

    /// Stop notifications for `models` on this session
    pub async fn unsubscribe(&self, models: &[Model]) -> MonitorResult<()> {
        let id = self.require_id()?.to_string();
        let url = format!("{}/Unsubscribe/", self.base_url);
        for model in models {
            let params = [("Model", model.as_str().to_string()), ("id", id.clone())];
            self.get_json(&url, &params).await?;
            log::debug!("Unsubscribed {}", model.as_str());
        }
        Ok(())
    }

    fn require_id(&self) -> MonitorResult<&str> {
        self.connection_id
            .as_deref()
            .ok_or_else(|| MonitorError::Protocol("not connected".to_string()))
    }

    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> MonitorResult<Value> {
        log::trace!("GET {} {:?}", url, params);
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        parse_body(&body)
    }
}

/// Decode a response body; CoCon answers an idle long-poll with an empty body
pub fn parse_body(body: &str) -> MonitorResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Find the session id in a `Connect` answer (`{"id": ..}` or `{"Connect": {"id": ..}}`)
pub fn extract_connection_id(response: &Value) -> Option<String> {
    let candidates = [
        response.get("id"),
        response.get("Id"),
        response.get("Connect").and_then(|c| c.get("id")),
        response.get("Connect").and_then(|c| c.get("Id")),
    ];
    candidates.into_iter().flatten().find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
