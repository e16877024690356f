//! 日志初始化

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::env::{core, EnvVar};

/// 初始化 tracing
///
/// - 输出到 stderr，stdout 留给命令的 JSON 结果
/// - 级别优先取 `RUST_LOG`，其次 `READ_FROG_LOG_LEVEL`，默认 info
/// - 重复调用时保留已安装的订阅者
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = core::LogLevel::get().unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(format!("warn,read_frog={}", level))
    });

    let no_color = core::NoColor::get().unwrap_or(false);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .compact();

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!("Tracing initialized");
    }
}
