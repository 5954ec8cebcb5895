//! # HMS存储模块
//!
//! 提供四类实体的内存存储，以及基于全量扫描的查询与统计。

pub mod collection;
pub mod queries;
pub mod storage;

pub use collection::Collection;
pub use queries::{DashboardStats, Searchable, StatusGroups};
pub use storage::{MemStorage, Stored};
