//! # HMS Web
//!
//! 医院管理系统的REST API：患者、医生、预约、科室的CRUD接口与仪表盘统计。

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use server::{create_app, WebOptions, WebServer};
