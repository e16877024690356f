//! 环境变量系统演示
//!
//! 展示环境变量如何覆盖维护设置

use read_frog::env::{cache, storage, EnvConfig, EnvVar};
use read_frog::settings::MaintenanceSettings;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Read Frog 环境变量系统演示 ===\n");

    env::set_var("READ_FROG_CACHE_RETENTION_DAYS", "14");
    env::set_var("READ_FROG_DB_PATH", "/tmp/read-frog-demo.redb");

    // 1. 单独获取环境变量
    println!("1. 单独获取环境变量:");
    println!("   保留天数: {}", cache::RetentionDays::get()?);
    println!("   检查间隔: {:?}", cache::CheckIntervalHours::get()?);
    println!("   数据库: {}", storage::DbPath::get()?);

    // 2. 批量加载配置
    println!("\n2. 完整环境配置:");
    EnvConfig::from_env()?.print_summary();

    // 3. 覆盖维护设置
    println!("\n3. 覆盖后的维护设置:");
    let mut settings = MaintenanceSettings::default();
    settings.apply_env_overrides();
    settings.validate()?;
    println!("   {:?}", settings.retention_policy());

    // 4. 无效值
    env::set_var("READ_FROG_CACHE_RETENTION_DAYS", "0");
    match cache::RetentionDays::get() {
        Ok(days) => println!("   保留天数: {}", days),
        Err(e) => println!("\n4. 保留天数验证失败: {}", e),
    }

    env::remove_var("READ_FROG_CACHE_RETENTION_DAYS");
    env::remove_var("READ_FROG_DB_PATH");

    println!("\n=== 演示完成 ===");
    Ok(())
}
