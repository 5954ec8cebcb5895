//! # HMS Core
//!
//! 医院管理系统的核心模块，提供实体模型、输入验证、错误定义和通用工具。

pub mod error;
pub mod models;
pub mod utils;
pub mod validation;

pub use error::{HmsError, Result};
pub use models::*;
pub use validation::{FromPayload, StatusUpdate, ValidationResult};
