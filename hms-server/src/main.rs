//! HMS服务器主程序

use anyhow::{Context, Result};
use clap::Parser;
use hms_admin::{init_logging, ConfigManager, ConfigOverrides};
use hms_storage::MemStorage;
use hms_web::{WebOptions, WebServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// HMS服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "hms-server")]
#[command(about = "HMS (Hospital Management System) 服务器")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 日志级别
    #[arg(short, long)]
    log_level: Option<String>,

    /// 打印生效配置后退出
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut manager = ConfigManager::load(args.config.as_deref())?;
    manager.apply_overrides(ConfigOverrides {
        host: args.host,
        port: args.port,
        log_level: args.log_level,
    })?;
    let config = manager.into_config();

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    // 初始化日志
    init_logging(&config.logging)?;

    info!("启动HMS服务器...");
    info!("HMS服务器配置:");
    info!("  名称: {}", config.server.name);
    info!("  监听地址: {}", config.bind_address());
    info!("  CORS: {}", config.web.enable_cors);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.bind_address()))?;

    let options = WebOptions {
        enable_cors: config.web.enable_cors,
        body_limit_bytes: config.web.body_limit_bytes,
    };

    // 每个进程一个存储实例，数据仅保存在内存中
    let storage = Arc::new(MemStorage::new());
    let server = WebServer::new(addr, storage, &options);

    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e);
    }

    Ok(())
}
