//! # wash-core
//!
//! Core types and flows for the carwash booking client.
//!
//! This crate provides:
//! - `BookingBackend` trait for the remote API
//! - `CartLineItem`, `Car`, `Address`, `TimeSlot` and `OrderRecord` records
//! - `compute_breakdown` price calculator over `Money` (halalas)
//! - `Selection` and `SlotLock` state for one booking
//! - `BookingSession` for the booking-details flow and `Account` for the rest
//! - `Session` lifecycle over a `SessionStore`
//! - `BookingError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use wash_core::{BookingSession, ClientContext, Route, Session};
//!
//! let ctx = ClientContext::new(backend, Session::init(store));
//!
//! let mut booking = BookingSession::load(ctx, invoice_id).await?;
//! booking.mount().await?;
//! booking.toggle_terms_agreed();
//!
//! match booking.confirm().await? {
//!     Route::PaymentPage(url) => open(url),
//!     route => navigate(route),
//! }
//! ```

pub mod account;
pub mod backend;
pub mod booking;
pub mod cart;
pub mod context;
pub mod envelope;
pub mod error;
pub mod messages;
pub mod money;
pub mod navigation;
pub mod order;
pub mod pricing;
pub mod profile;
pub mod provider;
pub mod selection;
pub mod session;
pub mod slot;

#[cfg(test)]
mod fake;

// Re-exports for convenience
pub use account::{Account, CartEntry, OTP_LENGTH, PROVIDER_PAGE_SIZE};
pub use backend::{
    Ack, AuthPurpose, AuthToken, BookingBackend, BoxedBookingBackend, DiscountQuote,
    PaymentInitiation, PaymentRequest, CARD_PAYMENT_METHOD_ID,
};
pub use booking::{BookingSession, SelectorOptions};
pub use cart::{CartLineItem, ExtraLineItem, ServiceItem};
pub use context::ClientContext;
pub use envelope::ApiEnvelope;
pub use error::{BookingError, BookingResult, ValidationError};
pub use messages::{Language, Message};
pub use money::Money;
pub use navigation::{Notice, NoticeLevel, Notifier, RecordingNotifier, Route, TracingNotifier};
pub use order::{OrderPage, OrderRecord, Review};
pub use pricing::{compute_breakdown, DiscountDescriptor, DiscountType, PriceBreakdown};
pub use profile::{Address, Car};
pub use provider::{AddToCartRequest, BrandReview, ExtraService, Page, Provider, Service};
pub use selection::{ConfirmedSelection, Selection};
pub use session::{BoxedSessionStore, FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use slot::{group_by_date, LockState, SlotDay, SlotLock, TimeSlot};
