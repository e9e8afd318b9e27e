//! UseCase 層
//!
//! ドメイン層の trait（ConnectionRegistry / MessageHistory / Broadcaster）に
//! のみ依存するアプリケーションサービスを定義します。

pub mod coordinator;

pub use coordinator::ChatCoordinator;
