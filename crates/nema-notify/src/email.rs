// SMTP notification for published EATs
//
// Configuration is read once at startup. A missing host, sender, or recipient
// list means notifications are disabled; the caller decides how to log that.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use nema_core::{yes_no, Eat, EatNotifier};
use thiserror::Error;

const DEFAULT_SMTP_PORT: u16 = 587;
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration problems that disable notifications
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid SMTP_PORT: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("invalid content type: {0}")]
    ContentType(String),
}

/// SMTP settings
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub recipients: Vec<String>,
}

impl EmailConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `SMTP_HOST`: relay host (required)
    /// - `SMTP_PORT`: relay port (default: 587)
    /// - `SMTP_USERNAME` / `SMTP_PASSWORD`: credentials, used when a username is set
    /// - `SMTP_FROM`: sender address (required)
    /// - `SMTP_RECIPIENTS`: comma separated recipient addresses (required)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EmailConfig::from_env`] with an arbitrary variable source.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("SMTP_HOST").ok_or(ConfigError::Missing("SMTP_HOST"))?;
        let from = get("SMTP_FROM").ok_or(ConfigError::Missing("SMTP_FROM"))?;

        let recipients: Vec<String> = get("SMTP_RECIPIENTS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        if recipients.is_empty() {
            return Err(ConfigError::Missing("SMTP_RECIPIENTS"));
        }

        let port = match get("SMTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            host,
            port,
            username: get("SMTP_USERNAME"),
            password: get("SMTP_PASSWORD"),
            from,
            recipients,
        })
    }
}

/// Build the notification message for `eat`, attaching `pdf` when present
pub fn build_message(
    config: &EmailConfig,
    eat: &Eat,
    pdf: Option<&[u8]>,
) -> Result<Message, EmailError> {
    let mut builder = Message::builder()
        .from(config.from.parse::<Mailbox>()?)
        .subject(format!(
            "EAT: {} (Version {}) - {}",
            eat.event_title, eat.version, eat.status
        ));
    for recipient in &config.recipients {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }

    let body = SinglePart::plain(message_body(eat));
    let message = match pdf {
        Some(pdf) => {
            let content_type = ContentType::parse("application/pdf")
                .map_err(|e| EmailError::ContentType(e.to_string()))?;
            let attachment =
                Attachment::new(eat.document_name("pdf")).body(pdf.to_vec(), content_type);
            builder.multipart(MultiPart::mixed().singlepart(body).singlepart(attachment))?
        }
        None => builder.singlepart(body)?,
    };
    Ok(message)
}

fn message_body(eat: &Eat) -> String {
    let mut lines = vec![
        "A new Emergency Advisory Text has been published.".to_string(),
        String::new(),
        format!("Event: {}", eat.event_title),
        format!("Version: {}", eat.version),
        format!("Status: {}", eat.status),
        format!("Location: {}", eat.location),
        format!(
            "Event Date (UTC): {}",
            eat.event_date.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        format!("Magnitude: {}", eat.magnitude_display()),
    ];
    if !eat.earthquake_url.is_empty() {
        lines.push(format!("Earthquake URL: {}", eat.earthquake_url));
    }
    lines.push(format!(
        "Beach/Marine Threat: {}",
        yes_no(eat.beach_marine_threat)
    ));
    lines.push(format!("Land Threat: {}", yes_no(eat.land_threat)));
    lines.push(format!("TEP Activated: {}", yes_no(eat.tep_activated)));
    if !eat.event_comments.is_empty() {
        lines.push(String::new());
        lines.push("Event Comments:".to_string());
        lines.push(eat.event_comments.clone());
    }
    lines.join("\n")
}

/// Sends notifications through an SMTP relay
pub struct SmtpNotifier {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let tls = TlsParameters::new(config.host.clone())?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(Tls::Opportunistic(tls))
            .timeout(Some(SMTP_TIMEOUT));

        if let Some(username) = &config.username {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                config.password.clone().unwrap_or_default(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }

    pub fn recipients(&self) -> &[String] {
        &self.config.recipients
    }
}

#[async_trait]
impl EatNotifier for SmtpNotifier {
    async fn notify(&self, eat: &Eat, pdf: Option<&[u8]>) -> anyhow::Result<()> {
        let message = build_message(&self.config, eat, pdf)?;
        self.transport.send(message).await.map_err(EmailError::from)?;
        tracing::info!(
            event_title = %eat.event_title,
            version = eat.version,
            recipients = self.config.recipients.len(),
            "EAT notification sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nema_core::EatStatus;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config() -> EmailConfig {
        EmailConfig {
            host: "smtp.example.org".to_string(),
            port: 587,
            username: None,
            password: None,
            from: "mar@example.org".to_string(),
            recipients: vec!["duty@example.org".to_string(), "ops@example.org".to_string()],
        }
    }

    fn eat() -> Eat {
        Eat {
            id: Some(7),
            event_title: "M5.0-Wellington-2026-01-15".to_string(),
            location: "Wellington".to_string(),
            event_date: Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
            magnitude: 5.0,
            earthquake_url: String::new(),
            version: 2,
            event_comments: "No tsunami expected.".to_string(),
            beach_marine_threat: false,
            land_threat: true,
            status: EatStatus::Preliminary,
            tep_activated: false,
            attachments: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_from_lookup_full() {
        let env = vars(&[
            ("SMTP_HOST", "smtp.example.org"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USERNAME", "mar"),
            ("SMTP_PASSWORD", "secret"),
            ("SMTP_FROM", "mar@example.org"),
            ("SMTP_RECIPIENTS", " a@example.org, ,b@example.org ,"),
        ]);
        let config = EmailConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.host, "smtp.example.org");
        assert_eq!(config.port, 2525);
        assert_eq!(config.username.as_deref(), Some("mar"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.recipients, vec!["a@example.org", "b@example.org"]);
    }

    #[test]
    fn test_from_lookup_defaults_port() {
        let env = vars(&[
            ("SMTP_HOST", "smtp.example.org"),
            ("SMTP_FROM", "mar@example.org"),
            ("SMTP_RECIPIENTS", "a@example.org"),
            ("SMTP_USERNAME", ""),
        ]);
        let config = EmailConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.port, 587);
        assert!(config.username.is_none());
    }

    #[test]
    fn test_from_lookup_missing_values() {
        let env = vars(&[]);
        assert_eq!(
            EmailConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err(),
            ConfigError::Missing("SMTP_HOST")
        );

        let env = vars(&[("SMTP_HOST", "smtp.example.org"), ("SMTP_FROM", "x@y.org")]);
        assert_eq!(
            EmailConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err(),
            ConfigError::Missing("SMTP_RECIPIENTS")
        );

        let env = vars(&[
            ("SMTP_HOST", "smtp.example.org"),
            ("SMTP_FROM", "x@y.org"),
            ("SMTP_RECIPIENTS", " , "),
        ]);
        assert_eq!(
            EmailConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err(),
            ConfigError::Missing("SMTP_RECIPIENTS")
        );
    }

    #[test]
    fn test_from_lookup_invalid_port() {
        let env = vars(&[
            ("SMTP_HOST", "smtp.example.org"),
            ("SMTP_FROM", "x@y.org"),
            ("SMTP_RECIPIENTS", "a@example.org"),
            ("SMTP_PORT", "smtp"),
        ]);
        assert_eq!(
            EmailConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err(),
            ConfigError::InvalidPort("smtp".to_string())
        );
    }

    #[test]
    fn test_build_message_with_pdf() {
        let message = build_message(&config(), &eat(), Some(&b"%PDF-1.3 test"[..])).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: EAT: M5.0-Wellington-2026-01-15 (Version 2) - preliminary"));
        assert!(raw.contains("Location: Wellington"));
        assert!(raw.contains("Land Threat: Yes"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("M5.0-Wellington-2026-01-15_v2.pdf"));
        assert!(raw.contains("duty@example.org"));
        assert!(raw.contains("ops@example.org"));
    }

    #[test]
    fn test_build_message_without_pdf() {
        let message = build_message(&config(), &eat(), None).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Location: Wellington"));
        assert!(!raw.contains("application/pdf"));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        let mut config = config();
        config.from = "not an address".to_string();
        assert!(matches!(
            build_message(&config, &eat(), None),
            Err(EmailError::Address(_))
        ));
    }

    #[tokio::test]
    async fn test_smtp_notifier_builds_from_config() {
        let notifier = SmtpNotifier::new(config()).unwrap();
        assert_eq!(notifier.recipients().len(), 2);
    }
}
