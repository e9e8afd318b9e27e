//! インメモリメッセージ履歴実装
//!
//! ドメイン層が定義する MessageHistory trait の具体的な実装。
//! VecDeque を上限付き FIFO バッファとして使用します。

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatEvent, MessageHistory};

/// 履歴が保持するイベント数の上限
const DEFAULT_CAPACITY: usize = 100;

/// インメモリメッセージ履歴
///
/// 変更（追加＋追い出し）とコピーを同じ Mutex で囲むことで、
/// snapshot が適用途中の状態を観測しないことを保証する。
pub struct InMemoryMessageHistory {
    events: Mutex<VecDeque<ChatEvent>>,
    capacity: usize,
}

impl InMemoryMessageHistory {
    /// 上限 100 件の履歴を作成
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 任意の上限で履歴を作成（テスト用）
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }
}

impl Default for InMemoryMessageHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageHistory for InMemoryMessageHistory {
    async fn append(&self, event: ChatEvent) {
        let mut events = self.events.lock().await;
        events.push_back(event);
        // append はこのロック下で直列化されるため、超過は高々 1 件
        if events.len() > self.capacity {
            events.pop_front();
        }
    }

    async fn snapshot(&self) -> Vec<ChatEvent> {
        let events = self.events.lock().await;
        events.iter().cloned().collect()
    }
}
