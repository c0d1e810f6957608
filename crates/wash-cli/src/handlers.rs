//! # Request Handlers
//!
//! Landing pages the hosted payment page redirects back to. Each one hands
//! the outcome to the waiting command and renders a short page.

use crate::state::AppState;
use axum::{extract::State, response::Html, response::IntoResponse, Json};
use tracing::{info, warn};
use wash_core::{Language, Message, Route};

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "carwash-callback",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Payment completed; continue to the orders listing
pub async fn payment_success(State(state): State<AppState>) -> Html<String> {
    info!("payment success redirect received");
    deliver(&state, Route::Orders);
    Html(landing_page(state.language, Message::PaymentSucceeded, "✅"))
}

/// Payment failed or was abandoned
pub async fn payment_failed(State(state): State<AppState>) -> Html<String> {
    info!("payment failure redirect received");
    deliver(&state, Route::PaymentFailed);
    Html(landing_page(state.language, Message::PaymentFailed, "❌"))
}

/// Only the first outcome matters; later redirects are dropped
fn deliver(state: &AppState, route: Route) {
    if let Err(e) = state.redirects.try_send(route) {
        warn!("redirect outcome not delivered: {}", e);
    }
}

fn landing_page(lang: Language, message: Message, icon: &str) -> String {
    let dir = match lang {
        Language::Ar => "rtl",
        Language::En => "ltr",
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head><meta charset="utf-8"><title>{text}</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0;">
    <div style="padding: 60px; text-align: center;">
        <div style="font-size: 60px;">{icon}</div>
        <h1>{text}</h1>
    </div>
</body>
</html>
"#,
        lang = lang,
        dir = dir,
        text = message.text(lang),
        icon = icon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_page_direction() {
        let page = landing_page(Language::Ar, Message::PaymentSucceeded, "✅");
        assert!(page.contains(r#"dir="rtl""#));
        assert!(page.contains(Message::PaymentSucceeded.text(Language::Ar)));

        let page = landing_page(Language::En, Message::PaymentFailed, "❌");
        assert!(page.contains("Payment failed"));
    }
}
