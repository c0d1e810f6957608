//! # Client Context
//!
//! Dependencies every flow needs: the backend, the session, a notifier and
//! the display language. Cheap to clone; passed explicitly.

use crate::backend::{BoxedBookingBackend, CARD_PAYMENT_METHOD_ID};
use crate::error::{BookingError, BookingResult};
use crate::messages::{Language, Message};
use crate::navigation::{Notice, Notifier, TracingNotifier};
use crate::session::Session;
use std::sync::Arc;

/// Shared dependencies for the flows
#[derive(Clone)]
pub struct ClientContext {
    pub backend: BoxedBookingBackend,
    pub session: Session,
    pub notifier: Arc<dyn Notifier>,
    pub language: Language,
    pub payment_method_id: i64,
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("backend", &self.backend.backend_name())
            .field("session", &self.session)
            .field("language", &self.language)
            .field("payment_method_id", &self.payment_method_id)
            .finish()
    }
}

impl ClientContext {
    pub fn new(backend: BoxedBookingBackend, session: Session) -> Self {
        Self {
            backend,
            session,
            notifier: Arc::new(TracingNotifier),
            language: Language::default(),
            payment_method_id: CARD_PAYMENT_METHOD_ID,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_payment_method_id(mut self, id: i64) -> Self {
        self.payment_method_id = id;
        self
    }

    /// Session token, or an `AUTH_REQUIRED` toast and error
    pub fn token(&self) -> BookingResult<String> {
        self.session.token().map_err(|err| {
            self.fail(&err, Message::LoginRequired);
            err
        })
    }

    pub fn success(&self, message: Message) {
        self.notifier.notify(Notice::success(message.text(self.language)));
    }

    /// Success toast preferring the server's text
    pub fn success_or(&self, server_text: Option<String>, fallback: Message) {
        let text = server_text.unwrap_or_else(|| fallback.text(self.language).to_string());
        self.notifier.notify(Notice::success(text));
    }

    /// Error toast for `err`; clears the session on 401
    pub fn fail(&self, err: &BookingError, fallback: Message) {
        self.session.observe_error(err);
        self.notifier
            .notify(Notice::error(err.user_message(self.language, fallback)));
    }

    /// Error toast with a fixed message, ignoring any server text
    pub fn fail_with(&self, err: &BookingError, message: Message) {
        self.session.observe_error(err);
        self.notifier.notify(Notice::error(message.text(self.language)));
    }
}
