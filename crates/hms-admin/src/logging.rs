//! 日志初始化

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 过滤级别，`RUST_LOG` 环境变量优先
    pub level: String,
    /// 输出目标模块名
    pub with_target: bool,
    /// 彩色输出
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: true,
            ansi: true,
        }
    }
}

/// 构建过滤器
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log level: {}", config.level)),
    }
}

/// 安装全局日志订阅者
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
