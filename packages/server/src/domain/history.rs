//! メッセージ履歴の trait 定義
//!
//! 直近のチャットイベントを保持する、サイズ上限付き・追記専用のログ。
//! ドメイン層がインターフェースを所有し、Infrastructure 層が実装を提供します
//! （依存性の逆転）。

use async_trait::async_trait;

use super::entity::ChatEvent;

/// メッセージ履歴 trait
///
/// append と snapshot は 1 回の変更の粒度で相互排他であること。
/// snapshot が適用途中の append / 追い出しを観測してはならない。
#[async_trait]
pub trait MessageHistory: Send + Sync {
    /// イベントを末尾に追加する
    ///
    /// 追加後に長さが上限を超えた場合、最古の 1 件だけを追い出す。
    async fn append(&self, event: ChatEvent);

    /// 現在の内容を時系列順のコピーで返す
    async fn snapshot(&self) -> Vec<ChatEvent>;
}
