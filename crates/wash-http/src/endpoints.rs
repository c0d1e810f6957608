//! # Endpoint Catalog
//!
//! Paths relative to the API base URL, with the HTTP method each one
//! expects. Query parameters are attached by the client.

use reqwest::Method;
use wash_core::AuthPurpose;

/// One REST endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: EndpointMethod,
    pub path: &'static str,
}

/// HTTP verbs the API uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl EndpointMethod {
    pub fn as_reqwest(&self) -> Method {
        match self {
            EndpointMethod::Get => Method::GET,
            EndpointMethod::Post => Method::POST,
            EndpointMethod::Put => Method::PUT,
            EndpointMethod::Delete => Method::DELETE,
        }
    }

    /// Whether repeating the request cannot create a second effect.
    /// POST starts payments, sends OTPs and adds cart items.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, EndpointMethod::Post)
    }
}

const fn get(path: &'static str) -> Endpoint {
    Endpoint {
        method: EndpointMethod::Get,
        path,
    }
}

const fn post(path: &'static str) -> Endpoint {
    Endpoint {
        method: EndpointMethod::Post,
        path,
    }
}

const fn put(path: &'static str) -> Endpoint {
    Endpoint {
        method: EndpointMethod::Put,
        path,
    }
}

const fn delete(path: &'static str) -> Endpoint {
    Endpoint {
        method: EndpointMethod::Delete,
        path,
    }
}

// Auth (`?number=&language=` / `?confirmationCode=&number=`)
pub const LOGIN_INITIATE: Endpoint = post("auth/login/initiate");
pub const LOGIN_FINALIZE: Endpoint = post("auth/login/finalize");
pub const SIGN_UP_INITIATE: Endpoint = post("auth/signUp/initiate");
pub const SIGN_UP_FINALIZE: Endpoint = post("auth/signUp/finalize");

// Catalogue, no token
/// `?page=&size=&type=1`
pub const PROVIDERS: Endpoint = get("public/getFreelancers");
/// `?brandId=`
pub const SERVICES: Endpoint = get("public/getServices");
/// `?page=&size=&brandId=`
pub const BRAND_REVIEWS: Endpoint = get("public/getReviewsBrand");

// Cart
/// Body `{serviceId, extraServices}`
pub const ADD_TO_CART: Endpoint = post("consumer/addToCart");
pub const CART_ITEMS: Endpoint = get("consumer/getCartItems");
/// `?invoiceId=&itemId=`
pub const DELETE_CART_ITEM: Endpoint = delete("consumer/deleteItem");

// Selectors
pub const ALL_CARS: Endpoint = get("consumer/allCars");
pub const ALL_ADDRESSES: Endpoint = get("consumer/allAddresses");
/// `?brandId=`
pub const SLOTS: Endpoint = get("consumer/getSlot");
/// `?slotId=`, empty JSON body
pub const LOCK_SLOT: Endpoint = put("consumer/lockSlot");

// Checkout
/// `?discountCode=&brandId=`
pub const VALIDATE_DISCOUNT: Endpoint = get("consumer/validateDiscount");
pub const PAYMENT_INITIATE: Endpoint = post("payment/consumer/card/payment/initiate");

// Orders
/// `?page=&size=`, page is 0-based on the wire
pub const ORDERS: Endpoint = get("consumer/getOrders");
/// `?requestId=`
pub const CANCEL_ORDER: Endpoint = put("consumer/cancelOrder");
/// `?requestId=`, body `{appraisal, description}`
pub const ADD_REVIEW: Endpoint = post("consumer/addReview");

/// OTP request endpoint for `purpose`
pub fn auth_initiate(purpose: AuthPurpose) -> Endpoint {
    match purpose {
        AuthPurpose::Login => LOGIN_INITIATE,
        AuthPurpose::SignUp => SIGN_UP_INITIATE,
    }
}

/// OTP verification endpoint for `purpose`
pub fn auth_finalize(purpose: AuthPurpose) -> Endpoint {
    match purpose {
        AuthPurpose::Login => LOGIN_FINALIZE,
        AuthPurpose::SignUp => SIGN_UP_FINALIZE,
    }
}

/// Provider listing `type` filter for car-wash brands
pub const PROVIDER_TYPE: u32 = 1;

/// Reviews shown on a provider page
pub const REVIEWS_PAGE_SIZE: u32 = 8;

/// Convert a 1-based client page to the API's 0-based index
pub fn wire_page(page: u32) -> u32 {
    page.saturating_sub(1)
}
