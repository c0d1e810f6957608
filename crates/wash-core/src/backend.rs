//! # Booking Backend Trait
//!
//! The remote API surface as a trait, so flows can run against the real
//! HTTP client or an in-process fake.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   BookingBackend (trait)                    │
//! │  ├── providers() / services() / brand_reviews()             │
//! │  ├── cart_items() / add_to_cart() / delete_cart_item()      │
//! │  ├── cars() / addresses() / slots()                         │
//! │  ├── lock_slot() / validate_discount() / initiate_payment() │
//! │  ├── orders() / cancel_order() / add_review()               │
//! │  └── initiate_auth() / finalize_auth()                      │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!               ┌────────────┴────────────┐
//!       ┌───────┴───────┐         ┌───────┴───────┐
//!       │  HttpBackend  │         │  test fakes   │
//!       │  (wash-http)  │         │               │
//!       └───────────────┘         └───────────────┘
//! ```
//!
//! Methods return the raw [`ApiEnvelope`] so callers can branch on
//! `success` and show the server's message. `Err` is reserved for transport
//! failures, undecodable bodies and HTTP 401.

use crate::cart::CartLineItem;
use crate::envelope::ApiEnvelope;
use crate::error::BookingResult;
use crate::messages::Language;
use crate::order::{OrderPage, Review};
use crate::pricing::DiscountType;
use crate::profile::{Address, Car};
use crate::provider::{AddToCartRequest, BrandReview, Page, Provider, Service};
use crate::selection::ConfirmedSelection;
use crate::slot::TimeSlot;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Payment method id for card payments
pub const CARD_PAYMENT_METHOD_ID: i64 = 2;

/// Body of the payment-initiation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_method_id: i64,
    pub invoice_id: i64,
    pub slot_id: i64,
    /// Sent as `null` when no code is applied
    #[serde(default)]
    pub discount_code: Option<String>,
    pub user_address: i64,
    pub user_car: i64,
}

impl PaymentRequest {
    /// Assemble the payload from a validated selection
    pub fn from_selection(payment_method_id: i64, invoice_id: i64, selection: ConfirmedSelection) -> Self {
        Self {
            payment_method_id,
            invoice_id,
            slot_id: selection.slot_id,
            discount_code: selection.discount_code,
            user_address: selection.address_id,
            user_car: selection.car_id,
        }
    }
}

/// Content of a successful payment initiation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInitiation {
    /// Hosted payment page
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Content of a successful discount validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountQuote {
    pub discount_amount: f64,
    pub discount_type: DiscountType,
}

/// Content of a successful OTP finalize
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(default)]
    pub token: Option<String>,
}

/// Which OTP flow an auth call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPurpose {
    Login,
    SignUp,
}

/// Untyped content for endpoints whose payload the client ignores
pub type Ack = serde_json::Value;

/// The remote booking API
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// First page of providers, `size` entries
    async fn providers(&self, size: u32) -> BookingResult<ApiEnvelope<Page<Provider>>>;

    /// Services offered by a provider
    async fn services(&self, brand_id: i64) -> BookingResult<ApiEnvelope<Vec<Service>>>;

    /// Latest reviews of a provider
    async fn brand_reviews(&self, brand_id: i64) -> BookingResult<ApiEnvelope<Page<BrandReview>>>;

    /// Put a service, with chosen extras, into the cart
    async fn add_to_cart(&self, token: &str, request: &AddToCartRequest) -> BookingResult<ApiEnvelope<Ack>>;

    /// All cart entries of the user
    async fn cart_items(&self, token: &str) -> BookingResult<ApiEnvelope<Vec<CartLineItem>>>;

    /// Remove one service from the cart
    async fn delete_cart_item(&self, token: &str, invoice_id: i64, item_id: i64) -> BookingResult<ApiEnvelope<Ack>>;

    async fn cars(&self, token: &str) -> BookingResult<ApiEnvelope<Vec<Car>>>;

    async fn addresses(&self, token: &str) -> BookingResult<ApiEnvelope<Vec<Address>>>;

    /// Open slots of a service provider
    async fn slots(&self, token: &str, brand_id: i64) -> BookingResult<ApiEnvelope<Vec<TimeSlot>>>;

    /// Tentatively reserve a slot
    async fn lock_slot(&self, token: &str, slot_id: i64) -> BookingResult<ApiEnvelope<Ack>>;

    async fn validate_discount(
        &self,
        token: &str,
        code: &str,
        brand_id: i64,
    ) -> BookingResult<ApiEnvelope<DiscountQuote>>;

    /// Start a card payment; success carries the hosted page URL
    async fn initiate_payment(
        &self,
        token: &str,
        request: &PaymentRequest,
    ) -> BookingResult<ApiEnvelope<PaymentInitiation>>;

    /// Orders, `page` is 1-based
    async fn orders(&self, token: &str, page: u32, size: u32) -> BookingResult<ApiEnvelope<OrderPage>>;

    async fn cancel_order(&self, token: &str, request_id: i64) -> BookingResult<ApiEnvelope<Ack>>;

    async fn add_review(&self, token: &str, request_id: i64, review: &Review) -> BookingResult<ApiEnvelope<Ack>>;

    /// Send an OTP to `phone`
    async fn initiate_auth(&self, purpose: AuthPurpose, phone: &str, language: Language)
        -> BookingResult<ApiEnvelope<Ack>>;

    /// Exchange the OTP for a bearer token
    async fn finalize_auth(&self, purpose: AuthPurpose, phone: &str, code: &str)
        -> BookingResult<ApiEnvelope<AuthToken>>;

    /// Backend name (for logging)
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared backend (dynamic dispatch)
pub type BoxedBookingBackend = Arc<dyn BookingBackend>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_request_wire_format() {
        let selection = ConfirmedSelection {
            car_id: 3,
            address_id: 4,
            slot_id: 5,
            discount_code: Some("WASH10".into()),
        };
        let req = PaymentRequest::from_selection(CARD_PAYMENT_METHOD_ID, 42, selection);

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "paymentMethodId": 2,
                "invoiceId": 42,
                "slotId": 5,
                "discountCode": "WASH10",
                "userAddress": 4,
                "userCar": 3
            })
        );
    }

    #[test]
    fn test_payment_request_sends_null_discount() {
        let selection = ConfirmedSelection {
            car_id: 1,
            address_id: 1,
            slot_id: 1,
            discount_code: None,
        };
        let value = serde_json::to_value(PaymentRequest::from_selection(2, 1, selection)).unwrap();
        assert_eq!(value.get("discountCode"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn test_parse_payment_initiation() {
        let env: ApiEnvelope<PaymentInitiation> = serde_json::from_value(json!({
            "success": true,
            "content": { "redirect_url": "https://pay/x" }
        }))
        .unwrap();
        assert_eq!(env.content.unwrap().redirect_url.as_deref(), Some("https://pay/x"));
    }

    #[test]
    fn test_parse_discount_quote() {
        let quote: DiscountQuote =
            serde_json::from_value(json!({ "discountAmount": 15, "discountType": "AMOUNT" })).unwrap();
        assert_eq!(quote.discount_type, DiscountType::Amount);
        assert_eq!(quote.discount_amount, 15.0);
    }
}
