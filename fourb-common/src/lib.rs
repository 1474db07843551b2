//! # 4B Engine Common Library
//!
//! Shared code for the 4B scoring engine crates including:
//! - Durable domain records (Swing, SessionScores, AthleteModel)
//! - Pose landmark schema
//! - Engine tuning parameters
//! - Configuration loading
//! - Error types and timestamp utilities

pub mod config;
pub mod error;
pub mod landmarks;
pub mod models;
pub mod params;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use params::EngineParams;
