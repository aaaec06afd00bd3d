//! Lead capture: contact details a visitor leaves during a conversation.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poc_common::ConversationId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::transport::{check_status, EndpointConfig};
use crate::ChatError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A prospective client's contact request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Links the lead to the chat that produced it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
    pub captured_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            company: None,
            message: None,
            conversation_id: None,
            captured_at: Utc::now(),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = non_empty(company.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = non_empty(message.into());
        self
    }

    pub fn with_conversation_id(mut self, id: Option<&ConversationId>) -> Self {
        self.conversation_id = id.cloned();
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if self.name.is_empty() {
            return Err(ChatError::Lead("name is required".into()));
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ChatError::Lead(format!("invalid email address: {}", self.email)));
        }
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Somewhere captured leads are persisted.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn submit(&self, lead: &Lead) -> Result<(), ChatError>;
}

/// Posts leads as JSON to the backend's lead endpoint.
pub struct HttpLeadSink {
    config: EndpointConfig,
    http: reqwest::Client,
}

impl HttpLeadSink {
    pub fn new(config: EndpointConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ChatError::Network(e.to_string()))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl LeadSink for HttpLeadSink {
    async fn submit(&self, lead: &Lead) -> Result<(), ChatError> {
        lead.validate()?;

        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(lead)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        check_status(response).await?;

        info!(
            conversation_id = ?lead.conversation_id.as_ref().map(ConversationId::as_str),
            "lead captured"
        );
        Ok(())
    }
}
