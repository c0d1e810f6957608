//! # Selection State
//!
//! The user's in-progress choices for one booking. Created empty when a
//! booking session mounts and discarded when it is torn down.

use crate::error::ValidationError;
use crate::pricing::{DiscountDescriptor, DiscountType};
use serde::Serialize;

/// Mutable selection record for one booking session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    car_id: Option<i64>,
    address_id: Option<i64>,
    slot_id: Option<i64>,
    discount: Option<DiscountDescriptor>,
    terms_agreed: bool,
    processing: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_car(&mut self, id: i64) {
        self.car_id = Some(id);
    }

    pub fn select_address(&mut self, id: i64) {
        self.address_id = Some(id);
    }

    pub fn select_slot(&mut self, id: i64) {
        self.slot_id = Some(id);
    }

    /// Replace any previously applied discount
    pub fn apply_discount(&mut self, code: impl Into<String>, amount: f64, discount_type: DiscountType) {
        self.discount = Some(DiscountDescriptor::new(code, amount, discount_type));
    }

    pub fn clear_discount(&mut self) {
        self.discount = None;
    }

    pub fn toggle_terms_agreed(&mut self) {
        self.terms_agreed = !self.terms_agreed;
    }

    /// Auto-select defaults: only fills slots that are still empty
    pub fn select_car_if_empty(&mut self, id: Option<i64>) {
        if self.car_id.is_none() {
            self.car_id = id;
        }
    }

    pub fn select_address_if_empty(&mut self, id: Option<i64>) {
        if self.address_id.is_none() {
            self.address_id = id;
        }
    }

    pub fn select_slot_if_empty(&mut self, id: Option<i64>) {
        if self.slot_id.is_none() {
            self.slot_id = id;
        }
    }

    pub fn car_id(&self) -> Option<i64> {
        self.car_id
    }

    pub fn address_id(&self) -> Option<i64> {
        self.address_id
    }

    pub fn slot_id(&self) -> Option<i64> {
        self.slot_id
    }

    pub fn discount(&self) -> Option<&DiscountDescriptor> {
        self.discount.as_ref()
    }

    pub fn terms_agreed(&self) -> bool {
        self.terms_agreed
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub(crate) fn set_processing(&mut self, processing: bool) {
        self.processing = processing;
    }

    /// Confirm button gate
    pub fn can_confirm(&self) -> bool {
        self.car_id.is_some()
            && self.address_id.is_some()
            && self.slot_id.is_some()
            && self.terms_agreed
            && !self.processing
    }

    /// First unmet precondition, in the order the screen checks them
    pub fn validate(&self) -> Result<ConfirmedSelection, ValidationError> {
        let car_id = self.car_id.ok_or(ValidationError::CarNotSelected)?;
        let address_id = self.address_id.ok_or(ValidationError::AddressNotSelected)?;
        let slot_id = self.slot_id.ok_or(ValidationError::SlotNotSelected)?;
        if !self.terms_agreed {
            return Err(ValidationError::TermsNotAgreed);
        }
        if self.processing {
            return Err(ValidationError::ConfirmationInFlight);
        }
        Ok(ConfirmedSelection {
            car_id,
            address_id,
            slot_id,
            discount_code: self.discount.as_ref().map(|d| d.code.clone()),
        })
    }
}

/// A selection that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedSelection {
    pub car_id: i64,
    pub address_id: i64,
    pub slot_id: i64,
    pub discount_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Selection {
        let mut s = Selection::new();
        s.select_car(1);
        s.select_address(2);
        s.select_slot(3);
        s.toggle_terms_agreed();
        s
    }

    #[test]
    fn test_can_confirm_truth_table() {
        for mask in 0u8..32 {
            let mut s = Selection::new();
            if mask & 1 != 0 {
                s.select_car(1);
            }
            if mask & 2 != 0 {
                s.select_address(1);
            }
            if mask & 4 != 0 {
                s.select_slot(1);
            }
            if mask & 8 != 0 {
                s.toggle_terms_agreed();
            }
            let processing = mask & 16 != 0;
            s.set_processing(processing);

            let expected = mask & 0b1111 == 0b1111 && !processing;
            assert_eq!(s.can_confirm(), expected, "mask {:05b}", mask);
        }
    }

    #[test]
    fn test_validate_order() {
        let mut s = Selection::new();
        assert_eq!(s.validate(), Err(ValidationError::CarNotSelected));
        s.select_car(1);
        assert_eq!(s.validate(), Err(ValidationError::AddressNotSelected));
        s.select_address(1);
        assert_eq!(s.validate(), Err(ValidationError::SlotNotSelected));
        s.select_slot(1);
        assert_eq!(s.validate(), Err(ValidationError::TermsNotAgreed));
        s.toggle_terms_agreed();
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_carries_discount_code() {
        let mut s = complete();
        s.apply_discount("WASH10", 10.0, DiscountType::Percentage);
        assert_eq!(s.validate().unwrap().discount_code.as_deref(), Some("WASH10"));
    }

    #[test]
    fn test_auto_select_does_not_override() {
        let mut s = Selection::new();
        s.select_car(5);
        s.select_car_if_empty(Some(9));
        s.select_address_if_empty(Some(7));
        s.select_slot_if_empty(None);
        assert_eq!(s.car_id(), Some(5));
        assert_eq!(s.address_id(), Some(7));
        assert_eq!(s.slot_id(), None);
    }

    #[test]
    fn test_terms_toggle() {
        let mut s = complete();
        assert!(s.can_confirm());
        s.toggle_terms_agreed();
        assert!(!s.can_confirm());
    }

    #[test]
    fn test_single_discount() {
        let mut s = Selection::new();
        s.apply_discount("A", 10.0, DiscountType::Percentage);
        s.apply_discount("B", 5.0, DiscountType::Amount);
        assert_eq!(s.discount().map(|d| d.code.as_str()), Some("B"));
    }
}
