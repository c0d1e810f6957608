//! # Response Envelope
//!
//! Every backend endpoint wraps its payload in
//! `{ success, content?, messageAr?, messageEn? }`.

use crate::error::{BookingError, BookingResult};
use crate::messages::Language;
use serde::{Deserialize, Serialize};

/// REST response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,

    pub content: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_ar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_en: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope (mostly for fakes and tests)
    pub fn ok(content: T) -> Self {
        Self {
            success: true,
            content: Some(content),
            message_ar: None,
            message_en: None,
        }
    }

    /// Unsuccessful envelope with server messages
    pub fn failure(message_ar: Option<&str>, message_en: Option<&str>) -> Self {
        Self {
            success: false,
            content: None,
            message_ar: message_ar.map(String::from),
            message_en: message_en.map(String::from),
        }
    }

    /// Server message in `lang`, if any
    pub fn message(&self, lang: Language) -> Option<String> {
        localized(self.message_ar.as_deref(), self.message_en.as_deref(), lang)
    }

    /// Turn a `success: false` envelope into [`BookingError::RemoteFailure`].
    /// A successful envelope yields its content, which may still be absent.
    pub fn into_result(self) -> BookingResult<Option<T>> {
        if self.success {
            Ok(self.content)
        } else {
            Err(BookingError::remote(self.message_ar, self.message_en))
        }
    }

    /// Like [`into_result`](Self::into_result) but treats absent content as empty
    pub fn into_content_or_default(self) -> BookingResult<T>
    where
        T: Default,
    {
        self.into_result().map(Option::unwrap_or_default)
    }
}

/// Pick the server message for `lang`.
///
/// Arabic uses `messageAr` only; English prefers `messageEn` and falls back to
/// `messageAr`. Blank strings count as absent.
pub fn localized(message_ar: Option<&str>, message_en: Option<&str>, lang: Language) -> Option<String> {
    let non_blank = |m: Option<&str>| m.filter(|s| !s.trim().is_empty()).map(String::from);
    match lang {
        Language::Ar => non_blank(message_ar),
        Language::En => non_blank(message_en).or_else(|| non_blank(message_ar)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success_envelope() {
        let env: ApiEnvelope<Vec<i64>> =
            serde_json::from_value(json!({ "success": true, "content": [1, 2, 3] })).unwrap();
        assert!(env.success);
        assert_eq!(env.content, Some(vec![1, 2, 3]));
        assert_eq!(env.into_content_or_default().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_failure_envelope() {
        let env: ApiEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "success": false,
            "messageAr": "غير مصرح",
            "messageEn": "Not allowed"
        }))
        .unwrap();
        assert_eq!(env.message(Language::Ar).as_deref(), Some("غير مصرح"));
        assert!(matches!(env.into_result(), Err(BookingError::RemoteFailure { .. })));
    }

    #[test]
    fn test_missing_content_defaults_to_empty() {
        let env: ApiEnvelope<Vec<i64>> = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(env.into_content_or_default().unwrap().is_empty());
    }

    #[test]
    fn test_missing_content_without_default_impl() {
        #[derive(Debug, Deserialize)]
        struct Quote {
            #[allow(dead_code)]
            amount: f64,
        }

        let env: ApiEnvelope<Quote> = serde_json::from_value(json!({
            "success": false,
            "messageEn": "expired"
        }))
        .unwrap();
        assert!(env.content.is_none());
        assert_eq!(env.message(Language::En).as_deref(), Some("expired"));
    }

    #[test]
    fn test_localized_fallbacks() {
        assert_eq!(localized(None, Some("x"), Language::Ar), None);
        assert_eq!(localized(Some("ع"), None, Language::En).as_deref(), Some("ع"));
        assert_eq!(localized(Some("  "), None, Language::Ar), None);
    }
}
