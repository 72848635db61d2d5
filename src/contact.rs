//! Contact form validation and the EmailJS request it turns into.
//!
//! Sending happens on the wasm side (`wasm::contact`); everything here is
//! plain data so it can be checked on the host.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT: &str = "New message from portfolio website";
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

const MIN_NAME_CHARS: usize = 2;
const MIN_MESSAGE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    /// `name` attribute of the matching form control.
    pub fn control_name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Message must be at least 10 characters")]
    MessageTooShort,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::NameTooShort => Field::Name,
            FieldError::InvalidEmail => Field::Email,
            FieldError::MessageTooShort => Field::Message,
        }
    }
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{count} invalid field(s)", count = .0.len())]
pub struct ContactErrors(pub Vec<FieldError>);

impl ContactErrors {
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<ValidContact, ContactErrors> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        let mut errors = Vec::new();
        if name.chars().count() < MIN_NAME_CHARS {
            errors.push(FieldError::NameTooShort);
        }
        if !is_valid_email(email) {
            errors.push(FieldError::InvalidEmail);
        }
        if message.chars().count() < MIN_MESSAGE_CHARS {
            errors.push(FieldError::MessageTooShort);
        }
        if !errors.is_empty() {
            return Err(ContactErrors(errors));
        }

        let optional = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        Ok(ValidContact {
            name: name.to_owned(),
            email: email.to_owned(),
            message: message.to_owned(),
            subject: optional(&self.subject),
            phone: optional(&self.phone),
        })
    }
}

/// Structural address check: one `@`, a dotted domain, an alphabetic TLD.
pub fn is_valid_email(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
        || domain.contains('@')
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some(tld) = labels.last() else {
        return false;
    };
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// A submission that passed validation, with fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: Option<String>,
    pub phone: Option<String>,
}

impl ValidContact {
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(DEFAULT_SUBJECT)
    }

    pub fn email_request(&self, settings: &EmailSettings) -> EmailJsRequest {
        EmailJsRequest {
            service_id: settings.service_id.clone(),
            template_id: settings.template_id.clone(),
            user_id: settings.public_key.clone(),
            template_params: TemplateParams {
                user_name: self.name.clone(),
                user_email: self.email.clone(),
                user_message: self.message.clone(),
                to_email: settings.to_email.clone(),
                subject: self.subject().to_owned(),
            },
        }
    }

    /// Plain-text summary of the submission, as the site owner would read it.
    pub fn notification_body(&self) -> String {
        let mut body = format!("Name: {}\nEmail: {}\n", self.name, self.email);
        if let Some(phone) = &self.phone {
            body.push_str(&format!("Phone: {phone}\n"));
        }
        body.push_str(&format!("\nMessage:\n{}\n", self.message));
        body
    }
}

/// EmailJS account settings. The public key is a client-side key by design of
/// the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub to_email: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            endpoint: EMAILJS_ENDPOINT.to_owned(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            to_email: String::new(),
        }
    }
}

impl EmailSettings {
    pub fn is_configured(&self) -> bool {
        !(self.service_id.is_empty() || self.template_id.is_empty() || self.public_key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub user_name: String,
    pub user_email: String,
    pub user_message: String,
    pub to_email: String,
    pub subject: String,
}

/// Body of `POST /api/v1.0/email/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailJsRequest {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: TemplateParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toast {
    pub title: &'static str,
    pub description: &'static str,
    pub destructive: bool,
}

impl Delivery {
    pub fn toast(self) -> Toast {
        match self {
            Delivery::Sent => Toast {
                title: "Message sent!",
                description: "Thank you for your message. I'll get back to you soon.",
                destructive: false,
            },
            Delivery::Failed => Toast {
                title: "Failed to send message",
                description: "Please try again or contact me directly via email.",
                destructive: true,
            },
        }
    }
}
