//! 配置管理
//!
//! 配置按优先级从低到高叠加：内置默认值、可选的TOML文件、`HMS_` 前缀的环境变量
//! （层级分隔符为 `__`，例如 `HMS_SERVER__PORT=8080`）。

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::logging::LoggingConfig;

/// HMS系统完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HmsConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// Web服务配置
    pub web: WebConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务器名称
    pub name: String,
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// Web服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// 启用CORS
    pub enable_cors: bool,
    /// 请求体大小上限
    pub body_limit_bytes: usize,
}

impl HmsConfig {
    /// 监听地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 渲染为TOML文本
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

impl Default for HmsConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            web: WebConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "HMS-Server".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: HmsConfig,
    validator: ConfigValidator,
}

impl ConfigManager {
    /// 加载并验证配置；`config_path` 为空时只使用默认值和环境变量
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config = Self::load_config(config_path)?;
        let validator = ConfigValidator::new();
        validator.validate(&config)?;

        Ok(Self { config, validator })
    }

    fn load_config(config_path: Option<&str>) -> Result<HmsConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&HmsConfig::default()).context("Failed to build default configuration")?,
        );

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("HMS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        let config: HmsConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        match config_path {
            Some(path) => info!("Configuration loaded successfully from: {}", path),
            None => info!("Configuration loaded from defaults and environment"),
        }
        Ok(config)
    }

    /// 获取配置
    pub fn config(&self) -> &HmsConfig {
        &self.config
    }

    /// 应用命令行覆盖项后重新验证
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<()> {
        let mut config = self.config.clone();
        if let Some(host) = overrides.host {
            config.server.host = host;
        }
        if let Some(port) = overrides.port {
            config.server.port = port;
        }
        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }

        self.validator.validate(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn into_config(self) -> HmsConfig {
        self.config
    }
}

/// 命令行覆盖项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// 配置验证器
#[derive(Debug)]
pub struct ConfigValidator {
    validation_rules: Vec<ValidationRule>,
}

/// 验证规则
struct ValidationRule {
    field_path: &'static str,
    validator: fn(&HmsConfig) -> Result<()>,
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("field_path", &self.field_path)
            .finish()
    }
}

impl ConfigValidator {
    /// 创建新的配置验证器
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "server.port",
                validator: |config| {
                    if config.server.port == 0 {
                        Err(anyhow::anyhow!("Server port cannot be 0"))
                    } else {
                        Ok(())
                    }
                },
            },
            ValidationRule {
                field_path: "server.host",
                validator: |config| {
                    if config.server.host.trim().is_empty() {
                        Err(anyhow::anyhow!("Server host cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
            },
            ValidationRule {
                field_path: "web.body_limit_bytes",
                validator: |config| {
                    if config.web.body_limit_bytes == 0 {
                        Err(anyhow::anyhow!("Body limit cannot be 0"))
                    } else {
                        Ok(())
                    }
                },
            },
            ValidationRule {
                field_path: "logging.level",
                validator: |config| {
                    if config.logging.level.trim().is_empty() {
                        Err(anyhow::anyhow!("Log level cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
            },
        ];

        Self { validation_rules }
    }

    /// 验证配置
    pub fn validate(&self, config: &HmsConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                error!("Configuration validation failed for {}: {}", rule.field_path, e);
                return Err(anyhow::anyhow!("Invalid {}: {}", rule.field_path, e));
            }
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
