use crate::error::{ContactError, Result};
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A message left through the site's contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: Timestamp,
}

impl ContactMessage {
    /// Builds a message, rejecting blank fields and malformed email addresses.
    ///
    /// Surrounding whitespace is trimmed from every field.
    pub fn new(
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
        created_at: Timestamp,
    ) -> std::result::Result<Self, ContactError> {
        let name = required("name", name)?;
        let email = required("email", email)?;
        let subject = required("subject", subject)?;
        let message = required("message", message)?;

        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => {
                return Err(ContactError::Validation(
                    "email must be a valid address".to_string(),
                ))
            }
        }

        Ok(Self {
            name,
            email,
            subject,
            message,
            created_at,
        })
    }
}

fn required(field: &str, value: &str) -> std::result::Result<String, ContactError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ContactError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Persistence for contact messages. Messages never expire.
#[async_trait]
pub trait ContactRepository: Send + Sync + 'static {
    async fn save(&self, message: ContactMessage) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    #[test]
    fn trims_and_accepts_complete_message() {
        let msg = ContactMessage::new(
            "  Ada ",
            "ada@example.com",
            "Hello",
            " Nice site! ",
            now(),
        )
        .unwrap();

        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.message, "Nice site!");
        assert_eq!(msg.created_at, now());
    }

    #[test]
    fn rejects_blank_fields() {
        let err = ContactMessage::new("Ada", "ada@example.com", "   ", "hi", now()).unwrap_err();
        assert!(matches!(err, ContactError::Validation(ref m) if m == "subject is required"));

        let err = ContactMessage::new("", "ada@example.com", "s", "hi", now()).unwrap_err();
        assert!(matches!(err, ContactError::Validation(ref m) if m == "name is required"));
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["ada", "@example.com", "ada@"] {
            let err = ContactMessage::new("Ada", email, "s", "hi", now()).unwrap_err();
            assert!(matches!(err, ContactError::Validation(_)), "{email}");
        }
    }
}
