//! # sweep
//!
//! コンテナ内の全オブジェクトを削除するスタンドアロンプロセス。
//! Gatewayを経由せず、ストレージと直接通信する。
//!
//! ## 環境変数
//! - `STORAGE_CONNECTION_STRING` — 必須。欠落は起動時エラー。
//! - `STORAGE_CONTAINER` — 任意。デフォルトは `images`。
//! - `STORAGE_PUBLIC_ENDPOINT` — 任意。

use imagedrop_cli::sweep;
use imagedrop_storage::{ObjectStore, S3ObjectStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let store = S3ObjectStore::from_env()?;

    if !store.container_exists().await? {
        tracing::info!("コンテナが存在しません。何もすることはありません");
        return Ok(());
    }

    // 列挙の失敗はここで致命的エラーになる。個々の削除失敗は集計のみ。
    let report = sweep::run_sweep(&store).await?;

    tracing::info!(
        found = report.found,
        succeeded = report.succeeded,
        failed = report.failed,
        "スイープ完了"
    );

    Ok(())
}
