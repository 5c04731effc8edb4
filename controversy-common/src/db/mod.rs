//! Database models and queries

pub mod controversies;
pub mod data_points;
pub mod init;
pub mod migrations;
pub mod models;

pub use controversies::*;
pub use data_points::*;
pub use init::*;
pub use migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};
pub use models::*;
