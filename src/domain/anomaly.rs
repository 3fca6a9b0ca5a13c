// Anomaly message domain model
use serde::Deserialize;

/// Payload published on the anomalies topic. Only `damage` is read; every
/// other field the publisher sends is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnomalyMessage {
    #[serde(default)]
    pub damage: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnomalyMessage {
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        let text = std::str::from_utf8(payload)?;
        Ok(serde_json::from_str(text)?)
    }

    /// The alert text to display, if this message carries one.
    pub fn alert(&self) -> Option<&str> {
        self.damage.as_deref().filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_damage() {
        let msg =
            AnomalyMessage::parse(br#"{"damage":"Crushed corner","confidence":0.93}"#).unwrap();
        assert_eq!(msg.alert(), Some("Crushed corner"));
    }

    #[test]
    fn test_missing_or_empty_damage_has_no_alert() {
        let msg = AnomalyMessage::parse(br#"{"other":"x"}"#).unwrap();
        assert_eq!(msg.alert(), None);

        let msg = AnomalyMessage::parse(br#"{"damage":""}"#).unwrap();
        assert_eq!(msg.alert(), None);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(AnomalyMessage::parse(b"{bad"), Err(PayloadError::Json(_))));
        assert!(matches!(AnomalyMessage::parse(&[0xff, 0xfe]), Err(PayloadError::Utf8(_))));
        // valid JSON but not an object
        assert!(AnomalyMessage::parse(b"\"{bad\"").is_err());
    }
}
