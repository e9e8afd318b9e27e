//! インメモリ接続レジストリ実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! HashMap をインメモリテーブルとして使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, DisplayName};

/// インメモリ接続レジストリ
///
/// 接続 ID → 表示名のテーブルを 1 つの Mutex で保護する。
/// 各操作は O(接続数) 以下で I/O を含まないため、ロック保持は短い。
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, DisplayName>>,
}

impl InMemoryConnectionRegistry {
    /// 新しい空のレジストリを作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add(&self, connection_id: ConnectionId, display_name: DisplayName) {
        let mut connections = self.connections.lock().await;
        // 先勝ち: 既存エントリは上書きしない
        connections.entry(connection_id).or_insert(display_name);
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id)
    }

    async fn get(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        let connections = self.connections.lock().await;
        connections.get(connection_id).cloned()
    }

    async fn names(&self) -> Vec<DisplayName> {
        let connections = self.connections.lock().await;
        let mut names: Vec<DisplayName> = connections.values().cloned().collect();
        // 表示順が呼び出しごとにぶれないようソートしてから重複除去
        names.sort();
        names.dedup();
        names
    }

    async fn count_distinct(&self) -> usize {
        self.names().await.len()
    }

    async fn find_by_name(&self, display_name: &DisplayName) -> Option<ConnectionId> {
        let connections = self.connections.lock().await;
        connections
            .iter()
            .find(|(_, name)| *name == display_name)
            .map(|(id, _)| id.clone())
    }
}
