//! 错误定义模块

use thiserror::Error;

/// 医院管理系统统一错误类型
#[derive(Error, Debug)]
pub enum HmsError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

impl HmsError {
    /// 指定类型的记录不存在
    pub fn not_found(kind: &str) -> Self {
        HmsError::NotFound(format!("{} not found", kind))
    }
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, HmsError>;
