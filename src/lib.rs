//! # Peiyangmin - a persistent petri-dish item game for chat bots
//!
//! Each user owns a "petri dish": a persistent record of named items with
//! decimal quantities. Commands insert an item (with a confirming second
//! step, since inserting clears the dish), double every quantity on a
//! five-minute cooldown, rename items, and show status. Quantities are
//! stored as decimal strings and multiplied exactly, so repeated doubling
//! never loses precision no matter how large they grow.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peiyangmin::bot::Bot;
//! use peiyangmin::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let bot = Bot::new(config)?;
//!     bot.run_console("alice").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`bot`] - Command front end: line routing and the console runner
//! - [`dish`] - Dish records, sled persistence, and command handling
//! - [`config`] - Configuration management and validation
//! - [`logutil`] - Log sanitization helpers for user-supplied strings
//!
//! ## Architecture
//!
//! ```text
//! chat line → bot::dispatch (tokenize, route)
//!           → dish::DishProcessor (read record, branch, one write)
//!           → dish::DishStore (sled, merge-patch writes)
//!           → reply text
//! ```
//!
//! One store mutation at most per command; concurrent commands for the same
//! user follow last-writer-wins (see DESIGN.md).

pub mod bot;
pub mod config;
pub mod dish;
pub mod logutil;
