//! # wash-cli
//!
//! Terminal front end for the carwash booking client.
//!
//! This crate provides:
//! - `App` wiring config, the REST backend and the session file
//! - Console rendering of the cart, selectors, slots and orders
//! - A loopback redirect listener replacing the in-app payment web view
//!
//! ## Redirect listener
//!
//! | Method | Path | Outcome |
//! |--------|------|---------|
//! | GET | `/health` | Liveness |
//! | GET | `/payment/success` | `Route::Orders` |
//! | GET | `/payment/failed` | `Route::PaymentFailed` |

pub mod handlers;
pub mod listener;
pub mod render;
pub mod routes;
pub mod state;

pub use listener::RedirectListener;
pub use render::ConsoleNotifier;
pub use routes::create_router;
pub use state::{App, AppState};
