//! # Controversy Common Library
//!
//! Shared code for the controversy catalogue:
//! - Database models, initialization and repositories
//! - Pie-chart wedge computation
//! - Slug validation and derivation
//! - Configuration loading

pub mod chart;
pub mod config;
pub mod db;
pub mod error;
pub mod slug;

pub use chart::{ChartItem, Wedge};
pub use db::models::{Category, Controversy, DataPoint, NewControversy, NewDataPoint};
pub use error::{Error, Result};
