//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。

use imagedrop_storage::ObjectStore;

/// Gatewayの共有状態。
///
/// プロセス起動時に一度だけ構築され、以後は読み取り専用。
/// 発行済みトークンの記録は保持しない（失効前の取り消しは不可能）。
pub struct GatewayState {
    /// オブジェクトストレージ（S3互換等、トレイトで抽象化）
    pub store: Box<dyn ObjectStore>,
    /// 静的共有シークレット（環境変数 GATEWAY_API_KEY で設定）。
    /// Noneの場合はAPIキー認証をスキップ（開発環境用）。
    pub api_key: Option<String>,
    /// 署名付きURLの有効期限（秒）
    pub presign_expiry_secs: u32,
}
