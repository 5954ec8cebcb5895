//! # HMS
//!
//! 医院管理系统：患者、医生、预约、科室的记录管理与仪表盘统计。
//!
//! 本包汇总各子模块，并提供访问REST API的HTTP客户端。

pub mod client;

pub use client::{HmsClient, Resource};
pub use hms_core as model;
pub use hms_storage as store;
