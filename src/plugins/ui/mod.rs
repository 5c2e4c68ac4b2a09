//! HUD and upgrade picker.
//!
//! `hud` is gameplay-side: it snapshots the run into the `Hud` resource every tick and works
//! headless. `view` is render-only: text nodes that mirror `Hud`, plus the number keys that
//! answer an open upgrade offer.

pub mod hud;
pub mod view;

pub use hud::Hud;
