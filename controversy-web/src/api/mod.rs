//! HTTP handlers for controversy-web

pub mod admin;
pub mod buildinfo;
pub mod controversy;
pub mod health;
pub mod ui;

pub use admin::admin_routes;
pub use buildinfo::get_build_info;
pub use controversy::{add_data_point, append_slash, chart_data, detail, index};
pub use health::health_routes;
pub use ui::serve_site_css;
