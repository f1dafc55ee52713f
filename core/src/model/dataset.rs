use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::reading::Reading;
use crate::time::parse_date;

/// An editable row. The date is kept exactly as entered, so a half-typed or
/// empty date survives until it is fixed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entry {
    pub date: String,
    pub value: f64,
}

impl Entry {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    pub entries: Vec<Entry>,
    pub collapsed: bool,
}

impl Dataset {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            entries: Vec::new(),
            collapsed: false,
        }
    }

    /// The engine's input: entries with a usable date, ascending by date.
    ///
    /// The sort is stable, so duplicate dates keep their entry order.
    pub fn series(&self) -> Vec<Reading> {
        let mut readings: Vec<Reading> = self
            .entries
            .iter()
            .filter_map(|e| parse_date(&e.date).map(|date| Reading::new(date, e.value)))
            .collect();
        readings.sort_by_key(|r| r.date);
        readings
    }
}
