//! 单类实体的内存集合
//!
//! 以ID为键保存记录，并额外维护插入顺序以便列表输出稳定。每个集合由一把读写锁保护，
//! 读-改-写序列（更新、删除）在同一把写锁内完成，不会丢失并发更新。

use hms_core::{utils::generate_record_id, Record};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug)]
struct Records<R> {
    by_id: HashMap<Uuid, R>,
    order: Vec<Uuid>, // 插入顺序
}

/// 记录集合
#[derive(Debug)]
pub struct Collection<R> {
    records: RwLock<Records<R>>,
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records {
                by_id: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    /// 按ID查询，不存在时返回 `None`
    pub async fn get(&self, id: Uuid) -> Option<R> {
        let records = self.records.read().await;
        records.by_id.get(&id).cloned()
    }

    /// 按插入顺序返回全部记录
    pub async fn list(&self) -> Vec<R> {
        let records = self.records.read().await;
        records
            .order
            .iter()
            .filter_map(|id| records.by_id.get(id))
            .cloned()
            .collect()
    }

    /// 创建记录，ID由服务端生成
    pub async fn create(&self, insert: R::Insert) -> R {
        let mut records = self.records.write().await;

        let mut id = generate_record_id();
        while records.by_id.contains_key(&id) {
            id = generate_record_id();
        }

        let record = R::from_insert(id, insert);
        records.by_id.insert(id, record.clone());
        records.order.push(id);

        info!(kind = R::KIND, %id, "Created record");
        record
    }

    /// 部分更新，仅覆盖补丁中出现的字段；ID保持不变
    pub async fn update(&self, id: Uuid, patch: R::Patch) -> Option<R> {
        let mut records = self.records.write().await;
        let record = records.by_id.get_mut(&id)?;
        record.apply_patch(patch);

        info!(kind = R::KIND, %id, "Updated record");
        Some(record.clone())
    }

    /// 永久删除记录，不级联删除关联实体
    pub async fn delete(&self, id: Uuid) -> bool {
        let mut records = self.records.write().await;
        if records.by_id.remove(&id).is_none() {
            debug!(kind = R::KIND, %id, "Delete of unknown record");
            return false;
        }
        records.order.retain(|existing| *existing != id);

        info!(kind = R::KIND, %id, "Deleted record");
        true
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self::new()
    }
}
