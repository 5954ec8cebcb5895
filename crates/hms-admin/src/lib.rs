//! # HMS管理模块
//!
//! 提供配置加载、验证以及日志初始化等运维功能

pub mod config;
pub mod logging;

pub use self::config::{
    ConfigManager, ConfigOverrides, ConfigValidator, HmsConfig, ServerConfig, WebConfig,
};
pub use self::logging::{init_logging, LoggingConfig};
