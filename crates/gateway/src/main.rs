//! # Imagedrop Gateway
//!
//! 期限付き・書き込み専用の署名付きアップロードURLを発行するHTTPサービス。
//!
//! ## 役割
//! - クライアント認証（静的APIキー、任意）
//! - コンテナの存在保証（なければ作成、冪等）
//! - 署名付きアップロードURLの一括発行
//!
//! ## API エンドポイント
//! - `POST /upload-urls?count=N` — 署名付きURLの一括発行
//!
//! データ本体はクライアントがストレージへ直接PUTするため、
//! Gatewayはペイロードを一切経由しない。

mod auth;
mod config;
mod endpoints;
mod error;

use std::sync::Arc;

use imagedrop_storage::S3ObjectStore;

use crate::config::GatewayState;

/// 署名付きURLの有効期限（秒）。
const PRESIGN_EXPIRY_SECS: u32 = 300;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // 接続文字列の欠落・不正はここで致命的エラーになる
    let store = S3ObjectStore::from_env()?;

    let api_key = std::env::var("GATEWAY_API_KEY").ok();
    if api_key.is_none() {
        tracing::warn!("GATEWAY_API_KEYが未設定です。APIキー認証をスキップします（開発環境用）");
    }

    let state = Arc::new(GatewayState {
        store: Box::new(store),
        api_key,
        presign_expiry_secs: PRESIGN_EXPIRY_SECS,
    });

    let app = axum::Router::new()
        .route(
            "/upload-urls",
            axum::routing::post(endpoints::handle_upload_urls),
        )
        .with_state(state);

    let addr = std::env::var("GATEWAY_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    tracing::info!("Gatewayを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
