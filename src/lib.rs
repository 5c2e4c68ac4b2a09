//! Arcane Survivors: a top-down survivors-like built on Bevy and avian2d.
//!
//! The simulation (spawn director, enemies, weapons, xp and upgrades) lives in gameplay plugins
//! that run headless; rendering, lighting and HUD text are separate render-only plugins.
//! Integration tests in `tests/` import this library.

pub mod common;
pub mod game;
pub mod plugins;
