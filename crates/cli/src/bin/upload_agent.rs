//! # upload-agent
//!
//! GatewayからアップロードURLを受領し、固定のデモペイロードを
//! ストレージへ直接PUTするスタンドアロンプロセス。
//!
//! ## 環境変数
//! - `GATEWAY_ENDPOINT` — GatewayのベースURL（デフォルト `http://localhost:3000`）
//! - `GATEWAY_API_KEY` — 静的共有シークレット（任意）
//! - `UPLOAD_COUNT` — 要求するURL数（デフォルト 3）

use imagedrop_cli::{agent, payload};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let gateway_endpoint = std::env::var("GATEWAY_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let api_key = std::env::var("GATEWAY_API_KEY").ok();
    let count = std::env::var("UPLOAD_COUNT")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(3);

    let client = reqwest::Client::new();

    // 発行要求の失敗のみが致命的エラー
    let response =
        agent::request_upload_urls(&client, &gateway_endpoint, api_key.as_deref(), count)
            .await?;
    tracing::info!(count = response.urls.len(), "アップロードURLを受領しました");

    let payload = payload::demo_payload();
    let report = agent::run_transfers(&client, &response.urls, &payload).await;

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "アップロード完了"
    );

    Ok(())
}
