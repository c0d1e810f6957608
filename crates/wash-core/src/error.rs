//! # Booking Error Types
//!
//! Typed error handling for the carwash booking client.
//! All booking operations return `Result<T, BookingError>`.
//!
//! Every error converts to a localized user-facing message and a fallback
//! [`Route`], so no remote failure ever has to crash a screen.

use crate::envelope::ApiEnvelope;
use crate::messages::{Language, Message};
use crate::navigation::Route;
use thiserror::Error;

/// A precondition the user has not met yet. Raised before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    CarNotSelected,
    AddressNotSelected,
    SlotNotSelected,
    TermsNotAgreed,
    EmptyDiscountCode,
    SlotAlreadyLocked,
    LockInFlight,
    ConfirmationInFlight,
    InvalidPhone,
    InvalidOtp,
}

impl ValidationError {
    /// Message shown to the user for this validation failure
    pub fn message(&self) -> Message {
        match self {
            ValidationError::CarNotSelected => Message::SelectCar,
            ValidationError::AddressNotSelected => Message::SelectAddress,
            ValidationError::SlotNotSelected => Message::SelectSlot,
            ValidationError::TermsNotAgreed => Message::AgreeToTerms,
            ValidationError::EmptyDiscountCode => Message::EnterDiscountCode,
            ValidationError::SlotAlreadyLocked => Message::SlotBooked,
            ValidationError::LockInFlight => Message::LockInFlight,
            ValidationError::ConfirmationInFlight => Message::ConfirmationInFlight,
            ValidationError::InvalidPhone => Message::EnterPhoneNumber,
            ValidationError::InvalidOtp => Message::EnterSixDigitOtp,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message().text(Language::En))
    }
}

/// Core error type for all booking operations
#[derive(Debug, Error)]
pub enum BookingError {
    /// No session token is present; the user has to log in first
    #[error("Authentication required")]
    AuthRequired,

    /// An entity the flow expected (cart item, slot) is missing
    #[error("Not found: {entity}")]
    NotFound { entity: String },

    /// Form-level validation failure, no request was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    /// The backend answered with `success: false`
    #[error("Remote failure: {}", remote_summary(.message_ar, .message_en))]
    RemoteFailure {
        message_ar: Option<String>,
        message_en: Option<String>,
    },

    /// The backend rejected the bearer token (HTTP 401)
    #[error("Session expired or unauthorized")]
    Unauthorized,

    /// Network/HTTP error communicating with the backend
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Unexpected HTTP status without a parsable envelope
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors (bad base url, unreadable config file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session store could not be read or written
    #[error("Session store error: {0}")]
    Session(String),
}

impl BookingError {
    /// Build a remote failure from the envelope message fields
    pub fn remote(message_ar: Option<String>, message_en: Option<String>) -> Self {
        BookingError::RemoteFailure {
            message_ar,
            message_en,
        }
    }

    /// Shorthand for a missing entity
    pub fn not_found(entity: impl Into<String>) -> Self {
        BookingError::NotFound {
            entity: entity.into(),
        }
    }

    /// Returns true if this error is worth an automatic retry.
    ///
    /// Only transport-level failures qualify; an unsuccessful envelope is an
    /// answer, not a transient fault.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Network(_) | BookingError::Timeout(_))
    }

    /// Returns true if the stored session token should be discarded
    pub fn clears_session(&self) -> bool {
        matches!(self, BookingError::Unauthorized)
    }

    /// Localized text for a toast, falling back to `fallback` for remote and
    /// transport errors that carry no usable server message.
    pub fn user_message(&self, lang: Language, fallback: Message) -> String {
        match self {
            BookingError::AuthRequired | BookingError::Unauthorized => {
                Message::LoginRequired.text(lang).to_string()
            }
            BookingError::NotFound { .. } => Message::ItemNotFound.text(lang).to_string(),
            BookingError::Validation(v) => v.message().text(lang).to_string(),
            _ => self
                .server_message(lang)
                .unwrap_or_else(|| fallback.text(lang).to_string()),
        }
    }

    /// Message text the server attached, either in a `success: false`
    /// envelope or in the envelope-shaped body of a non-2xx response
    pub fn server_message(&self, lang: Language) -> Option<String> {
        match self {
            BookingError::RemoteFailure {
                message_ar,
                message_en,
            } => crate::envelope::localized(message_ar.as_deref(), message_en.as_deref(), lang),
            BookingError::Http { body, .. } => serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
                .ok()
                .and_then(|env| env.message(lang)),
            _ => None,
        }
    }

    /// Where the client goes after this error, if anywhere
    pub fn fallback_route(&self) -> Option<Route> {
        match self {
            BookingError::AuthRequired | BookingError::Unauthorized => Some(Route::Login),
            BookingError::NotFound { .. } => Some(Route::Back),
            _ => None,
        }
    }
}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        BookingError::Validation(err)
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(err: serde_json::Error) -> Self {
        BookingError::Serialization(err.to_string())
    }
}

fn remote_summary<'a>(message_ar: &'a Option<String>, message_en: &'a Option<String>) -> &'a str {
    message_en
        .as_deref()
        .or(message_ar.as_deref())
        .unwrap_or("unsuccessful response")
}

/// Result type alias for booking operations
pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(BookingError::Network("connection reset".into()).is_retryable());
        assert!(BookingError::Timeout("30s".into()).is_retryable());
        assert!(!BookingError::remote(None, None).is_retryable());
        assert!(!BookingError::AuthRequired.is_retryable());
    }

    #[test]
    fn test_fallback_routes() {
        assert_eq!(BookingError::AuthRequired.fallback_route(), Some(Route::Login));
        assert_eq!(BookingError::not_found("cart item").fallback_route(), Some(Route::Back));
        assert_eq!(BookingError::Network("x".into()).fallback_route(), None);
    }

    #[test]
    fn test_remote_message_prefers_arabic() {
        let err = BookingError::remote(Some("الموعد غير متاح".into()), Some("Slot unavailable".into()));
        assert_eq!(
            err.user_message(Language::Ar, Message::SlotLockFailed),
            "الموعد غير متاح"
        );
        assert_eq!(
            err.user_message(Language::En, Message::SlotLockFailed),
            "Slot unavailable"
        );
    }

    #[test]
    fn test_remote_without_message_uses_fallback() {
        let err = BookingError::remote(None, None);
        assert_eq!(
            err.user_message(Language::Ar, Message::SlotLockFailed),
            Message::SlotLockFailed.text(Language::Ar)
        );
    }

    #[test]
    fn test_unauthorized_clears_session() {
        assert!(BookingError::Unauthorized.clears_session());
        assert!(!BookingError::AuthRequired.clears_session());
    }

    #[test]
    fn test_http_error_body_message() {
        let err = BookingError::Http {
            status: 409,
            body: r#"{"success":false,"messageEn":"Service already exists in cart"}"#.into(),
        };
        assert_eq!(
            err.user_message(Language::En, Message::AddToCartFailed),
            "Service already exists in cart"
        );

        let err = BookingError::Http {
            status: 502,
            body: "<html>bad gateway</html>".into(),
        };
        assert_eq!(err.server_message(Language::En), None);
        assert_eq!(
            err.user_message(Language::En, Message::AddToCartFailed),
            Message::AddToCartFailed.text(Language::En)
        );
    }
}
