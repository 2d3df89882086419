use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::domain::LeadSubmission;

const MISSING: &str = "N/A";

/// Outbound notification for a single lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Where lead notifications are sent from and to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRoute {
    pub to: String,
    pub from: String,
}

/// Email provider seam.
#[async_trait]
pub trait LeadMailer: Send + Sync {
    async fn send(&self, email: &LeadEmail) -> Result<(), DeliveryError>;
}

/// Failure of a best-effort delivery channel.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("delivery endpoint returned status {status}")]
    Status { status: u16 },
}

pub fn compose_lead_email(
    lead: &LeadSubmission,
    route: &EmailRoute,
    received_at: DateTime<Utc>,
) -> LeadEmail {
    let name = lead.labelled_fields()[0].1.unwrap_or(MISSING);
    let received = received_at.format("%Y-%m-%d %H:%M UTC").to_string();

    let mut text = String::from("New 1031 exchange lead\n\n");
    let mut html = String::from("<h2>New 1031 exchange lead</h2>\n<table>\n");
    for (label, value) in lead.labelled_fields() {
        let value = value.unwrap_or(MISSING);
        text.push_str(&format!("{label}: {value}\n"));
        html.push_str(&format!(
            "<tr><th align=\"left\">{label}</th><td>{}</td></tr>\n",
            escape_html_lines(value)
        ));
    }
    text.push_str(&format!("\nReceived: {received}\n"));
    html.push_str(&format!(
        "</table>\n<p><em>Received {}</em></p>\n",
        escape_html_lines(&received)
    ));

    LeadEmail {
        to: route.to.clone(),
        from: route.from.clone(),
        subject: format!("New 1031 Exchange Lead: {name}"),
        text,
        html,
    }
}

/// HTML-escapes `raw` and turns newlines into `<br>` so multi-line details
/// keep their breaks in the table cell.
fn escape_html_lines(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '\n' => escaped.push_str("<br>"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Serialize)]
struct SendGridMessage<'a> {
    personalizations: [SendGridPersonalization<'a>; 1],
    from: SendGridAddress<'a>,
    subject: &'a str,
    content: [SendGridContent<'a>; 2],
}

#[derive(Debug, Serialize)]
struct SendGridPersonalization<'a> {
    to: [SendGridAddress<'a>; 1],
}

#[derive(Debug, Serialize)]
struct SendGridAddress<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct SendGridContent<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}

/// SendGrid v3 `mail/send` client.
#[derive(Debug, Clone)]
pub struct SendGridMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SendGridMailer {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl LeadMailer for SendGridMailer {
    async fn send(&self, email: &LeadEmail) -> Result<(), DeliveryError> {
        let message = SendGridMessage {
            personalizations: [SendGridPersonalization {
                to: [SendGridAddress { email: &email.to }],
            }],
            from: SendGridAddress { email: &email.from },
            subject: &email.subject,
            content: [
                SendGridContent {
                    kind: "text/plain",
                    value: &email.text,
                },
                SendGridContent {
                    kind: "text/html",
                    value: &email.html,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
            });
        }

        debug!(to = %email.to, "lead email accepted by provider");
        Ok(())
    }
}
