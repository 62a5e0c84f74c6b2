use serde::{Deserialize, Serialize};

/// Envelope published on the mail channel. Consumers only ever see these
/// two fields, so the shape is load-bearing wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub recipient: String,
    pub description: String,
}

impl NotificationEvent {
    pub fn welcome(recipient: &str) -> Self {
        NotificationEvent {
            recipient: recipient.to_string(),
            description: "Welcome! Your account has been registered.".to_string(),
        }
    }

    pub fn upload_complete(recipient: &str, bytes: i64) -> Self {
        NotificationEvent {
            recipient: recipient.to_string(),
            description: format!("Image upload complete. Total size: {bytes} bytes."),
        }
    }

    pub fn download_complete(recipient: &str, file_name: &str, bytes: i64) -> Self {
        NotificationEvent {
            recipient: recipient.to_string(),
            description: format!("Image downloaded: {file_name} ({bytes} bytes)."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_recipient_and_description_only() {
        let event = NotificationEvent::welcome("user@example.com");
        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["recipient"], "user@example.com");
        assert!(object.contains_key("description"));
    }

    #[test]
    fn upload_event_reports_transferred_bytes() {
        let event = NotificationEvent::upload_complete("user@example.com", 2048);
        assert!(event.description.contains("2048"));
        assert_eq!(event.recipient, "user@example.com");
    }

    #[test]
    fn download_event_names_the_file() {
        let event = NotificationEvent::download_complete("user@example.com", "sunset.png", 512);
        assert!(event.description.contains("sunset.png"));
        assert!(event.description.contains("512"));
    }
}
