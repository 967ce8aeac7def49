use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DISH_SCHEMA_VERSION: u8 = 1;

/// One named item in a dish. Quantities are decimal values stored as text so
/// repeated doubling never runs into native integer or float limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemEntry {
    pub name: String,
    pub quantity: String,
}

impl ItemEntry {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }
}

/// Per-user petri dish record. Keyed by `user_id`; item order is insertion
/// order and doubles as display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetriDish {
    pub user_id: String,
    pub items: Vec<ItemEntry>,
    /// Timestamp of the last successful cultivate. Absent until the first one.
    #[serde(default)]
    pub last_double_time: Option<DateTime<Utc>>,
    /// Item name staged for insertion, waiting for a confirming command.
    #[serde(default)]
    pub pending_item: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl PetriDish {
    pub fn new(user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            items: Vec::new(),
            last_double_time: None,
            pending_item: None,
            created_at: now,
            updated_at: now,
            schema_version: DISH_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn item_quantity(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.quantity.as_str())
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|e| e.name == name)
    }
}

/// Merge-patch for a dish record: a `None` field leaves the stored value
/// untouched, so a write that stages a pending item cannot clobber the item
/// list and vice versa. `pending_item: Some(None)` clears the pending name.
#[derive(Debug, Clone, Default)]
pub struct DishPatch {
    pub items: Option<Vec<ItemEntry>>,
    pub last_double_time: Option<DateTime<Utc>>,
    pub pending_item: Option<Option<String>>,
}

impl DishPatch {
    pub fn apply(self, dish: &mut PetriDish) {
        if let Some(items) = self.items {
            dish.items = items;
        }
        if let Some(t) = self.last_double_time {
            dish.last_double_time = Some(t);
        }
        if let Some(p) = self.pending_item {
            dish.pending_item = p;
        }
    }
}
