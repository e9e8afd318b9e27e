//! 接続レジストリの trait 定義
//!
//! ライブ接続（接続 ID → 表示名）の正本テーブル。
//! ドメイン層がインターフェースを所有し、Infrastructure 層が実装を提供します
//! （依存性の逆転）。

use async_trait::async_trait;

use super::value_object::{ConnectionId, DisplayName};

/// 接続レジストリ trait
///
/// 独立した接続ライフサイクルから並行に呼ばれることを前提とする。
/// 同一 ID に対する add / remove は線形化可能であること。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を登録する
    ///
    /// 既に同じ ID が登録されている場合は何もしない（先勝ち・冪等）。
    async fn add(&self, connection_id: ConnectionId, display_name: DisplayName);

    /// 接続を削除し、削除された表示名を返す
    ///
    /// 未登録の ID は `None`（エラーではない）。
    async fn remove(&self, connection_id: &ConnectionId) -> Option<DisplayName>;

    /// 接続 ID から表示名を引く
    async fn get(&self, connection_id: &ConnectionId) -> Option<DisplayName>;

    /// 登録中の表示名を重複なしで返す（辞書順ソート済み）
    async fn names(&self) -> Vec<DisplayName>;

    /// 重複を除いた参加者数を返す
    async fn count_distinct(&self) -> usize;

    /// 表示名が一致する最初の接続 ID を返す
    ///
    /// 同じ表示名が複数接続に紐付く場合、どれが返るかは規定しない。
    async fn find_by_name(&self, display_name: &DisplayName) -> Option<ConnectionId>;
}
