//! gacha-sim - Monte Carlo simulator for pity-curve draw mechanics
//!
//! This module exposes the simulation engine for testing and external use.

pub mod build_info;
pub mod error;
pub mod logging;
pub mod simulator;

pub use error::{Error, Result};
