//! 存储模块
//!
//! 扩展的本地数据库：配置槽位与翻译缓存共用同一个 redb 文件。

pub mod db;

pub use db::LocalDb;
