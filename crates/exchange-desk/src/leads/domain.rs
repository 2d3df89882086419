use serde::{Deserialize, Serialize};

/// Contact-form submission as posted by the site.
///
/// Only the token is consumed by the relay itself; everything else is passed
/// through to the email body and the webhook untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_close_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnstile_token: Option<String>,
}

impl LeadSubmission {
    /// The anti-bot token, when one was actually submitted.
    pub fn token(&self) -> Option<&str> {
        self.turnstile_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Labelled lead fields in the order the notification lists them.
    pub fn labelled_fields(&self) -> [(&'static str, Option<&str>); 10] {
        [
            ("Name", present(&self.name)),
            ("Company", present_optional(&self.company)),
            ("Email", present(&self.email)),
            ("Phone", present(&self.phone)),
            ("Project Type", present(&self.project_type)),
            ("Property", present_optional(&self.property)),
            ("Estimated Close Date", present_optional(&self.estimated_close_date)),
            ("City", present_optional(&self.city)),
            ("Timeline", present_optional(&self.timeline)),
            ("Details", present_optional(&self.details)),
        ]
    }
}

fn present(value: &str) -> Option<&str> {
    Some(value).filter(|value| !value.trim().is_empty())
}

fn present_optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(present)
}
