//! # wash-wasm
//!
//! WebAssembly bindings for the booking screen's client-side logic:
//! - Price breakdown with an optional discount
//! - The confirm-button precondition
//! - Slot grouping and money formatting
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { compute_breakdown, format_amount } from 'wash-wasm';
//!
//! await init();
//!
//! const b = compute_breakdown(100, [20], 10, 'PERCENTAGE');
//! console.log(format_amount(b.total_halalas, 'en')); // "108.00 SAR"
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use wash_core::pricing::breakdown_for_subtotal;
use wash_core::{group_by_date, DiscountDescriptor, DiscountType, Language, Money, PriceBreakdown, Selection, TimeSlot};
use wasm_bindgen::prelude::*;

/// Price summary for the WASM interface, in halalas
#[derive(Debug, Clone, Copy)]
#[wasm_bindgen]
pub struct WasmBreakdown {
    subtotal: i64,
    discount_value: i64,
    total: i64,
}

#[wasm_bindgen]
impl WasmBreakdown {
    #[wasm_bindgen(getter)]
    pub fn subtotal_halalas(&self) -> i64 {
        self.subtotal
    }

    #[wasm_bindgen(getter)]
    pub fn discount_halalas(&self) -> i64 {
        self.discount_value
    }

    #[wasm_bindgen(getter)]
    pub fn total_halalas(&self) -> i64 {
        self.total
    }

    /// True when the discount exceeds the subtotal
    #[wasm_bindgen]
    pub fn is_negative(&self) -> bool {
        self.total < 0
    }
}

impl From<PriceBreakdown> for WasmBreakdown {
    fn from(b: PriceBreakdown) -> Self {
        Self {
            subtotal: b.subtotal.halalas(),
            discount_value: b.discount_value.halalas(),
            total: b.total.halalas(),
        }
    }
}

/// Compute subtotal, discount and total from riyal amounts.
///
/// `discount_type` is `PERCENTAGE` or `AMOUNT`; pass no amount for an
/// undiscounted price.
#[wasm_bindgen]
pub fn compute_breakdown(
    base_price: f64,
    extras: &[f64],
    discount_amount: Option<f64>,
    discount_type: Option<String>,
) -> Result<WasmBreakdown, JsValue> {
    let subtotal = extras
        .iter()
        .map(|&p| Money::from_riyals(p))
        .fold(Money::from_riyals(base_price), |acc, p| acc + p);

    let discount = match discount_amount {
        Some(amount) => {
            let kind: DiscountType = discount_type
                .as_deref()
                .unwrap_or("PERCENTAGE")
                .parse()
                .map_err(|e: String| JsValue::from_str(&e))?;
            Some(DiscountDescriptor::new("", amount, kind))
        }
        None => None,
    };

    Ok(breakdown_for_subtotal(subtotal, discount.as_ref()).into())
}

/// Whether the confirm button is enabled
#[wasm_bindgen]
pub fn can_confirm(has_car: bool, has_address: bool, has_slot: bool, terms_agreed: bool, processing: bool) -> bool {
    let mut selection = Selection::new();
    if has_car {
        selection.select_car(0);
    }
    if has_address {
        selection.select_address(0);
    }
    if has_slot {
        selection.select_slot(0);
    }
    if terms_agreed {
        selection.toggle_terms_agreed();
    }
    !processing && selection.can_confirm()
}

/// Format halalas for display, e.g. "120.00 SAR"
#[wasm_bindgen]
pub fn format_amount(halalas: i64, lang: &str) -> Result<String, JsValue> {
    let lang: Language = lang.parse().map_err(|e: String| JsValue::from_str(&e))?;
    Ok(Money::from_halalas(halalas).display(lang))
}

/// Group a JSON array of slots by date; returns a JSON array of days
#[wasm_bindgen]
pub fn group_slots(slots_json: &str) -> Result<String, JsValue> {
    let slots: Vec<TimeSlot> =
        serde_json::from_str(slots_json).map_err(|e| JsValue::from_str(&format!("Invalid slots: {}", e)))?;
    serde_json::to_string(&group_by_date(&slots)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_percentage() {
        let b = compute_breakdown(100.0, &[20.0], Some(10.0), Some("PERCENTAGE".into())).unwrap();
        assert_eq!(b.subtotal_halalas(), 12_000);
        assert_eq!(b.discount_halalas(), 1_200);
        assert_eq!(b.total_halalas(), 10_800);
    }

    #[test]
    fn test_breakdown_fixed_can_go_negative() {
        let b = compute_breakdown(50.0, &[], Some(80.0), Some("amount".into())).unwrap();
        assert_eq!(b.total_halalas(), -3_000);
        assert!(b.is_negative());
    }

    #[test]
    fn test_breakdown_without_discount() {
        let b = compute_breakdown(45.5, &[4.5], None, None).unwrap();
        assert_eq!(b.total_halalas(), 5_000);
        assert_eq!(b.discount_halalas(), 0);
    }

    #[test]
    fn test_can_confirm() {
        assert!(can_confirm(true, true, true, true, false));
        assert!(!can_confirm(true, true, true, false, false));
        assert!(!can_confirm(true, true, true, true, true));
        assert!(!can_confirm(false, true, true, true, false));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12_000, "en").unwrap(), "120.00 SAR");
    }

    #[test]
    fn test_group_slots() {
        let json = r#"[
            {"slotId": 1, "date": "2025-03-01", "timeFrom": "09:00", "timeTo": "10:00"},
            {"slotId": 2, "date": "2025-03-02", "timeFrom": "09:00", "timeTo": "10:00"},
            {"slotId": 3, "date": "2025-03-01", "timeFrom": "11:00", "timeTo": "12:00"}
        ]"#;
        let days: serde_json::Value = serde_json::from_str(&group_slots(json).unwrap()).unwrap();
        assert_eq!(days.as_array().unwrap().len(), 2);
        assert_eq!(days[0]["slots"].as_array().unwrap().len(), 2);
    }
}
