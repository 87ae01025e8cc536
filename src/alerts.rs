//! SMS alert dispatch
//!
//! Sends the alert text to every configured recipient through an SMS gateway.
//! Each recipient is attempted independently and gets its own outcome. The
//! report's `success()` flag means "the dispatch was attempted": it is false
//! only when the gateway credentials are incomplete, and stays true even if
//! every individual send failed. Use `delivered_count()` or
//! `all_delivered()` to inspect actual delivery.

use crate::WhisperError;
use crate::config::SmsConfig;
use crate::models::Report;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, instrument, warn};

/// Gateway account credentials and sender number
#[derive(Clone, Default)]
pub struct SmsCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl fmt::Debug for SmsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .finish()
    }
}

impl From<&SmsConfig> for SmsCredentials {
    fn from(config: &SmsConfig) -> Self {
        Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }
}

impl SmsCredentials {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
        }
    }

    /// Names of the fields that are blank
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("account SID", &self.account_sid),
            ("auth token", &self.auth_token),
            ("sender number", &self.from_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn validate(&self) -> Result<(), WhisperError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WhisperError::config(format!(
                "Twilio keys missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// A service that delivers one SMS and returns its provider message id
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, credentials: &SmsCredentials, to: &str, body: &str) -> Result<String>;
}

/// Twilio Programmable Messaging REST API
pub struct TwilioGateway {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    code: Option<u32>,
    message: String,
}

impl TwilioGateway {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SmsGateway for TwilioGateway {
    async fn send(&self, credentials: &SmsCredentials, to: &str, body: &str) -> Result<String> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url,
            urlencoding::encode(&credentials.account_sid)
        );
        let form = [
            ("Body", body),
            ("From", credentials.from_number.as_str()),
            ("To", to),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .form(&form)
            .send()
            .await
            .with_context(|| "Twilio request failed")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| "Failed to read Twilio response")?;

        if !status.is_success() {
            match serde_json::from_str::<TwilioError>(&text) {
                Ok(TwilioError {
                    code: Some(code),
                    message,
                }) => bail!("{message} (Twilio error {code})"),
                Ok(TwilioError { message, .. }) => bail!("{message}"),
                Err(_) => bail!("Twilio API error {}", status),
            }
        }

        let message: TwilioMessage =
            serde_json::from_str(&text).with_context(|| "Failed to parse Twilio response")?;
        Ok(message.sid)
    }
}

/// Result of one recipient's send attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertOutcome {
    pub recipient: String,
    pub delivered: bool,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
}

/// Result of a whole dispatch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<AlertOutcome>,
    /// Set when the dispatch was not attempted because credentials are incomplete
    pub configuration_error: Option<String>,
}

impl DispatchReport {
    /// True when the per-recipient loop ran, regardless of delivery
    #[must_use]
    pub fn success(&self) -> bool {
        self.configuration_error.is_none()
    }

    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.delivered).count()
    }

    #[must_use]
    pub fn all_delivered(&self) -> bool {
        self.success() && self.outcomes.iter().all(|o| o.delivered)
    }
}

/// Alert text sent to recipients
#[must_use]
pub fn format_alert(report: &Report, advice: &str) -> String {
    format!(
        "🚨 {} ALERT for {}!\n{}",
        report.severity.as_str().to_uppercase(),
        report.place.trim(),
        advice
    )
}

/// Sends one message to a list of recipients
pub struct AlertDispatcher {
    gateway: Box<dyn SmsGateway>,
}

impl AlertDispatcher {
    #[must_use]
    pub fn new(gateway: impl SmsGateway + 'static) -> Self {
        Self {
            gateway: Box::new(gateway),
        }
    }

    pub fn from_config(config: &SmsConfig) -> Result<Self> {
        Ok(Self::new(TwilioGateway::new(&config.base_url)?))
    }

    /// Attempt delivery to every recipient, in order
    #[instrument(skip_all, fields(recipients = recipients.len()))]
    pub async fn dispatch(
        &self,
        recipients: &[String],
        message: &str,
        credentials: &SmsCredentials,
    ) -> DispatchReport {
        if let Err(e) = credentials.validate() {
            error!("SMS dispatch aborted: {}", e);
            return DispatchReport {
                outcomes: Vec::new(),
                configuration_error: Some(e.user_message()),
            };
        }

        let mut outcomes = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let outcome = match self.gateway.send(credentials, recipient, message).await {
                Ok(message_id) => {
                    info!("SMS sent to {} (SID: {})", recipient, message_id);
                    AlertOutcome {
                        recipient: recipient.clone(),
                        delivered: true,
                        provider_message_id: Some(message_id),
                        error: None,
                    }
                }
                Err(e) => {
                    warn!("Error sending to {}: {:#}", recipient, e);
                    AlertOutcome {
                        recipient: recipient.clone(),
                        delivered: false,
                        provider_message_id: None,
                        error: Some(format!("{e:#}")),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let report = DispatchReport {
            outcomes,
            configuration_error: None,
        };
        info!(
            "SMS dispatch finished: {}/{} delivered",
            report.delivered_count(),
            recipients.len()
        );
        report
    }
}
