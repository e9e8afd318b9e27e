//! UseCase: チャット全体のオーケストレーション
//!
//! 接続・切断・受信メッセージ・サーバ発アクションの 4 系統のトリガを受けて、
//! レジストリと履歴を更新し、規定の順序で配信ポートを駆動します。
//!
//! ## 順序の保証
//!
//! 1 つのトリガ内のサブステップは記載順に発行する。特に接続時は、
//! トリガ元への履歴スナップショット配信が参加通知・ユーザリスト更新より
//! 必ず先行する（新規参加者が自分の参加通知を履歴と二重に見ないため
//! の原仕様の互換動作）。異なるトリガ間の相対順序は、レジストリ・履歴の
//! 相互排他を通じたもの以外は保証しない。
//!
//! ## エラーの扱い
//!
//! 想定内のエッジケース（未登録接続の切断、空メッセージ、宛先不在の
//! 個別送信）はエラーではなく何もしない操作として定義する。配信失敗は
//! ログに落として吸収し、コーディネータの状態には決して影響させない。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    Author, Broadcaster, ChatEvent, ConnectionId, ConnectionRegistry, DisplayName, MessageHistory,
    MessageText, OutboundEvent, Timestamp,
};

/// チャットコーディネータ
///
/// プロセス起動時に 1 度だけ構築され、プロセスと同じ寿命を持つ。
/// 可変な共有状態はレジストリと履歴のみで、どちらも実装側で
/// 並行アクセスから保護される。
pub struct ChatCoordinator {
    /// 接続レジストリ（ライブ接続の正本）
    registry: Arc<dyn ConnectionRegistry>,
    /// メッセージ履歴（上限付き FIFO）
    history: Arc<dyn MessageHistory>,
    /// 配信ポート（トランスポート層の実装）
    broadcaster: Arc<dyn Broadcaster>,
    /// イベントのタイムスタンプ供給源
    clock: Arc<dyn Clock>,
}

impl ChatCoordinator {
    /// 新しい ChatCoordinator を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        history: Arc<dyn MessageHistory>,
        broadcaster: Arc<dyn Broadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            history,
            broadcaster,
            clock,
        }
    }

    /// 接続トリガ
    ///
    /// 1. レジストリに登録（表示名未提供時はセンチネル）
    /// 2. トリガ元にのみ履歴スナップショットを配信
    /// 3. 参加通知を全員に配信
    /// 4. 更新後のユーザリストを全員に配信
    pub async fn on_connect(&self, connection_id: ConnectionId, display_name: Option<DisplayName>) {
        let display_name = display_name.unwrap_or_else(DisplayName::unknown);

        self.registry
            .add(connection_id.clone(), display_name.clone())
            .await;

        let snapshot = self.history.snapshot().await;
        if let Err(e) = self
            .broadcaster
            .to_caller(&connection_id, OutboundEvent::LoadRecentMessages(snapshot))
            .await
        {
            tracing::warn!(
                "Failed to deliver history snapshot to '{}': {}",
                connection_id.as_str(),
                e
            );
        }

        self.dispatch_to_all(OutboundEvent::UserJoined(display_name.clone()))
            .await;
        self.dispatch_to_all(OutboundEvent::UpdateUserList(self.registry.names().await))
            .await;

        tracing::info!(
            "Participant '{}' connected as session '{}'",
            display_name.as_str(),
            connection_id.as_str()
        );
    }

    /// 切断トリガ
    ///
    /// 未登録の接続なら何もしない。登録があれば削除し、退出通知と
    /// 更新後のユーザリストを全員に配信する。
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) {
        let Some(display_name) = self.registry.remove(connection_id).await else {
            tracing::debug!(
                "Disconnect for unknown session '{}', nothing to do",
                connection_id.as_str()
            );
            return;
        };

        self.dispatch_to_all(OutboundEvent::UserLeft(display_name.clone()))
            .await;
        self.dispatch_to_all(OutboundEvent::UpdateUserList(self.registry.names().await))
            .await;

        tracing::info!(
            "Participant '{}' disconnected (session '{}')",
            display_name.as_str(),
            connection_id.as_str()
        );
    }

    /// 受信メッセージトリガ
    ///
    /// トリム後に空の本文は状態変更も配信もせず捨てる。それ以外は
    /// 発言者をレジストリから引いてイベントを作成し、履歴に追加して
    /// 全員に配信する。
    pub async fn on_inbound_message(&self, connection_id: &ConnectionId, text: String) {
        let Ok(text) = MessageText::new(text) else {
            tracing::debug!(
                "Rejected empty message from session '{}'",
                connection_id.as_str()
            );
            return;
        };

        // レジストリに無いセッションからのメッセージは、表示名不明の
        // 参加者として受け付ける（切断と受信の競合で起こり得る）
        let author_name = self
            .registry
            .get(connection_id)
            .await
            .unwrap_or_else(DisplayName::unknown);

        let event = ChatEvent::user(&author_name, text, self.now());
        self.history.append(event.clone()).await;
        self.dispatch_to_all(OutboundEvent::ReceiveMessage(event)).await;
    }

    /// サーバ発: 全員宛メッセージ（発言者ラベル "Server"）
    pub async fn send_to_all(&self, text: String) {
        self.broadcast_system_event(Author::server(), text).await;
    }

    /// サーバ発: アナウンス（発言者ラベル "Speaker"）
    ///
    /// `send_to_all` とはラベルのみが異なる。アナウンスは意味上
    /// 別チャンネルなので操作としても分けている。
    pub async fn announce(&self, text: String) {
        self.broadcast_system_event(Author::speaker(), text).await;
    }

    /// サーバ発: 個別メッセージ（発言者ラベル "Server (private)"）
    ///
    /// 表示名が一致する最初の接続にのみ配信する。一致が無ければ何も
    /// しない。共有履歴には追加しない（他の参加者が再接続時に受け取る
    /// スナップショットに露出させない）。
    pub async fn send_to_user(&self, display_name: &DisplayName, text: String) {
        let Ok(text) = MessageText::new(text) else {
            tracing::debug!(
                "Rejected empty private message for '{}'",
                display_name.as_str()
            );
            return;
        };

        let Some(target) = self.registry.find_by_name(display_name).await else {
            tracing::debug!(
                "No session for display name '{}', dropping private message",
                display_name.as_str()
            );
            return;
        };

        let event = ChatEvent::system(Author::server_private(), text, self.now());
        if let Err(e) = self
            .broadcaster
            .to_one(&target, OutboundEvent::ReceiveMessage(event))
            .await
        {
            tracing::warn!(
                "Failed to deliver private message to session '{}': {}",
                target.as_str(),
                e
            );
        }
    }

    /// サーバ発: 重複を除いた参加者数を全員に配信
    ///
    /// チャットイベントではないので履歴には残らない。
    pub async fn broadcast_user_count(&self) {
        let count = self.registry.count_distinct().await;
        self.dispatch_to_all(OutboundEvent::UpdateUserCount(count))
            .await;
    }

    /// 現在の履歴スナップショットを返す
    pub async fn snapshot(&self) -> Vec<ChatEvent> {
        self.history.snapshot().await
    }

    /// 重複を除いた表示名リストを返す
    pub async fn names(&self) -> Vec<DisplayName> {
        self.registry.names().await
    }

    /// システムイベントを履歴に追加して全員に配信する
    async fn broadcast_system_event(&self, author: Author, text: String) {
        let Ok(text) = MessageText::new(text) else {
            tracing::debug!(
                "Rejected empty system message (author '{}')",
                author.as_str()
            );
            return;
        };

        let event = ChatEvent::system(author, text, self.now());
        self.history.append(event.clone()).await;
        self.dispatch_to_all(OutboundEvent::ReceiveMessage(event)).await;
    }

    /// 全員宛配信。失敗はログに落として吸収する
    async fn dispatch_to_all(&self, event: OutboundEvent) {
        if let Err(e) = self.broadcaster.to_all(event).await {
            tracing::warn!("Failed to broadcast event: {}", e);
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}
