//! # Time Slots and the Slot Lock
//!
//! Slots are fetched per brand and grouped by date for presentation.
//!
//! Locking is a best-effort reservation made before payment:
//!
//! ```text
//!   Unlocked ──lock()──▶ Locking ──ok──▶ Locked
//!       ▲                   │
//!       └──────failure──────┘
//! ```
//!
//! The lock is advisory. Availability is re-checked server-side when the
//! payment is initiated, and lock state never gates confirmation.

use crate::error::ValidationError;
use crate::messages::{Language, Message};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A bookable time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub slot_id: i64,
    pub date: NaiveDate,
    #[serde(with = "clock")]
    pub time_from: NaiveTime,
    #[serde(with = "clock")]
    pub time_to: NaiveTime,
}

impl TimeSlot {
    /// "9:00 AM - 10:30 AM" style range
    pub fn display_range(&self, lang: Language) -> String {
        format!(
            "{} - {}",
            format_time_12h(self.time_from, lang),
            format_time_12h(self.time_to, lang)
        )
    }
}

/// Slots sharing one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotDay {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

/// Group slots by date, keeping the server's order of first appearance
pub fn group_by_date(slots: &[TimeSlot]) -> Vec<SlotDay> {
    let mut days: Vec<SlotDay> = Vec::new();
    for slot in slots {
        match days.iter_mut().find(|d| d.date == slot.date) {
            Some(day) => day.slots.push(slot.clone()),
            None => days.push(SlotDay {
                date: slot.date,
                slots: vec![slot.clone()],
            }),
        }
    }
    days
}

/// Twelve-hour clock with a localized AM/PM marker
pub fn format_time_12h(time: NaiveTime, lang: Language) -> String {
    let (pm, hour) = time.hour12();
    let marker = match (lang, pm) {
        (Language::Ar, false) => "ص",
        (Language::Ar, true) => "م",
        (Language::En, false) => "AM",
        (Language::En, true) => "PM",
    };
    format!("{}:{:02} {}", hour, time.minute(), marker)
}

/// Day card label: "today" for the first date, weekday name otherwise
pub fn day_label(date: NaiveDate, index: usize, lang: Language) -> String {
    const DAYS_AR: [&str; 7] = ["الأحد", "الإثنين", "الثلاثاء", "الأربعاء", "الخميس", "الجمعة", "السبت"];
    const DAYS_EN: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
    const MONTHS_AR: [&str; 12] = [
        "يناير", "فبراير", "مارس", "إبريل", "مايو", "يونيو", "يوليو", "أغسطس", "سبتمبر", "أكتوبر",
        "نوفمبر", "ديسمبر",
    ];

    let weekday = date.weekday().num_days_from_sunday() as usize;
    let month = date.month0() as usize;
    match lang {
        Language::Ar => {
            let name = if index == 0 { "اليوم" } else { DAYS_AR[weekday] };
            format!("{} {} {}", name, date.day(), MONTHS_AR[month])
        }
        Language::En => {
            let name = if index == 0 { "Today" } else { DAYS_EN[weekday] };
            format!("{} {}", name, date.format("%-d %b"))
        }
    }
}

/// Lock protocol state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "slot_id", rename_all = "snake_case")]
pub enum LockState {
    #[default]
    Unlocked,
    Locking(i64),
    Locked(i64),
}

/// Client-side tracker for the slot lock protocol
#[derive(Debug, Clone, Default)]
pub struct SlotLock {
    state: LockState,
}

impl SlotLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    /// `Unlocked -> Locking`. Rejects a second attempt while one is in
    /// flight and re-locking the slot that is already locked.
    pub fn begin(&mut self, slot_id: i64) -> Result<(), ValidationError> {
        match self.state {
            LockState::Locking(_) => Err(ValidationError::LockInFlight),
            LockState::Locked(locked) if locked == slot_id => Err(ValidationError::SlotAlreadyLocked),
            _ => {
                self.state = LockState::Locking(slot_id);
                Ok(())
            }
        }
    }

    /// `Locking -> Locked`
    pub fn succeed(&mut self) {
        if let LockState::Locking(slot_id) = self.state {
            self.state = LockState::Locked(slot_id);
        }
    }

    /// `Locking -> Unlocked`
    pub fn fail(&mut self) {
        if let LockState::Locking(_) = self.state {
            self.state = LockState::Unlocked;
        }
    }

    pub fn is_locking(&self) -> bool {
        matches!(self.state, LockState::Locking(_))
    }

    pub fn is_locked(&self, slot_id: i64) -> bool {
        self.state == LockState::Locked(slot_id)
    }

    /// Label for the lock button under `slot_id`
    pub fn button_label(&self, slot_id: i64) -> Message {
        match self.state {
            LockState::Locked(locked) if locked == slot_id => Message::SlotBooked,
            LockState::Locking(locking) if locking == slot_id => Message::LockInFlight,
            _ => Message::ReserveSlot,
        }
    }
}

/// `HH:MM` or `HH:MM:SS` on the wire
mod clock {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(serde::de::Error::custom)
    }
}
