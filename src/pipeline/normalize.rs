// src/pipeline/normalize.rs

//! Inbound body classification.

use serde_json::Value;

use crate::error::Result;
use crate::models::{InboundPayload, MessageEvent};

const URL_VERIFICATION: &str = "url_verification";
const EVENT_CALLBACK: &str = "event_callback";

/// Parse and classify a raw webhook body.
///
/// Fails only when `raw_body` is not valid JSON.
pub fn normalize(raw_body: &str) -> Result<InboundPayload> {
    let payload: Value = serde_json::from_str(raw_body)?;
    let payload_type = payload.get("type").and_then(Value::as_str);

    match payload_type {
        Some(URL_VERIFICATION) => {
            log::info!("Handling URL verification challenge");
            let challenge = match payload.get("challenge") {
                Some(Value::String(s)) => s.clone(),
                None | Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
            };
            Ok(InboundPayload::UrlVerification { challenge })
        }
        Some(EVENT_CALLBACK) => match payload.get("event") {
            Some(event @ Value::Object(_)) => {
                match serde_json::from_value::<MessageEvent>(event.clone()) {
                    Ok(event) => {
                        log::debug!("Event callback: type={}", event.event_type);
                        Ok(InboundPayload::EventCallback(event))
                    }
                    Err(e) => {
                        log::warn!("Ignoring malformed event: {}", e);
                        Ok(InboundPayload::Other)
                    }
                }
            }
            _ => {
                log::info!("Event ignored: event_callback without event object");
                Ok(InboundPayload::Other)
            }
        },
        other => {
            log::info!("Event ignored: payload type {:?}", other);
            Ok(InboundPayload::Other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_invalid_json_fails() {
        assert!(matches!(normalize("not json"), Err(AppError::Json(_))));
        assert!(matches!(normalize(""), Err(AppError::Json(_))));
    }

    #[test]
    fn test_url_verification_echoes_challenge() {
        let payload = normalize(r#"{"type":"url_verification","challenge":"abc123"}"#).unwrap();
        assert_eq!(
            payload,
            InboundPayload::UrlVerification {
                challenge: "abc123".to_string()
            }
        );
    }

    #[test]
    fn test_url_verification_without_challenge() {
        let payload = normalize(r#"{"type":"url_verification"}"#).unwrap();
        assert_eq!(
            payload,
            InboundPayload::UrlVerification {
                challenge: String::new()
            }
        );
    }

    #[test]
    fn test_url_verification_stringifies_non_string_challenge() {
        let payload = normalize(r#"{"type":"url_verification","challenge":12345}"#).unwrap();
        assert_eq!(
            payload,
            InboundPayload::UrlVerification {
                challenge: "12345".to_string()
            }
        );

        let payload = normalize(r#"{"type":"url_verification","challenge":null}"#).unwrap();
        assert_eq!(
            payload,
            InboundPayload::UrlVerification {
                challenge: String::new()
            }
        );
    }

    #[test]
    fn test_event_callback() {
        let body = r#"{
            "type": "event_callback",
            "event": {
                "type": "message",
                "text": "crawl https://example.com",
                "channel": "C1",
                "user": "U1",
                "ts": "1.2"
            }
        }"#;
        match normalize(body).unwrap() {
            InboundPayload::EventCallback(event) => {
                assert_eq!(event.channel, "C1");
                assert_eq!(event.text.as_deref(), Some("crawl https://example.com"));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_other_shapes_are_inert() {
        assert_eq!(normalize("{}").unwrap(), InboundPayload::Other);
        assert_eq!(normalize("[1, 2]").unwrap(), InboundPayload::Other);
        assert_eq!(
            normalize(r#"{"type":"app_rate_limited"}"#).unwrap(),
            InboundPayload::Other
        );
        assert_eq!(
            normalize(r#"{"type":"event_callback"}"#).unwrap(),
            InboundPayload::Other
        );
        assert_eq!(
            normalize(r#"{"type":"event_callback","event":"message"}"#).unwrap(),
            InboundPayload::Other
        );
    }

    #[test]
    fn test_ill_typed_event_is_inert() {
        let body = r#"{"type":"event_callback","event":{"type":"message","text":42}}"#;
        assert_eq!(normalize(body).unwrap(), InboundPayload::Other);
    }
}
