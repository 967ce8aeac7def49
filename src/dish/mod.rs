//! Petri dish data model, persistence, and command handling.
//! Each user owns one dish record holding named items with decimal
//! quantities; commands stage inserts for confirmation, double quantities on
//! a cooldown, rename items, and render status.

pub mod commands;
pub mod errors;
pub mod quantity;
pub mod storage;
pub mod types;

pub use commands::{fmt_list, DishCommand, DishProcessor, CULTIVATE_COOLDOWN_MS};
pub use errors::DishError;
pub use quantity::{double, parse_quantity};
pub use storage::{DishStore, DishStoreBuilder};
pub use types::{DishPatch, ItemEntry, PetriDish, DISH_SCHEMA_VERSION};
