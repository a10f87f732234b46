//! # アップロードエージェント コアロジック
//!
//! GatewayからアップロードURLを受領し、ストレージへ直接PUTする。
//! 制御パス（URL発行）と データパス（バイト転送）は分離されており、
//! ペイロードはGatewayを経由しない。

use imagedrop_types::{UploadUrlRecord, UploadUrlsResponse};
use reqwest::header::CONTENT_TYPE;

/// 転送結果の集計。
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// 成功した転送数
    pub succeeded: usize,
    /// 失敗した転送数
    pub failed: usize,
}

/// GatewayにアップロードURLの発行を要求する。
///
/// 発行要求自体の失敗は致命的エラーとして呼び出し元に伝播する。
pub async fn request_upload_urls(
    client: &reqwest::Client,
    gateway_endpoint: &str,
    api_key: Option<&str>,
    count: u32,
) -> anyhow::Result<UploadUrlsResponse> {
    let url = format!(
        "{}/upload-urls?count={count}",
        gateway_endpoint.trim_end_matches('/')
    );

    let mut request = client.post(&url);
    if let Some(key) = api_key {
        request = request.header("x-api-key", key);
    }

    let response = request
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Gatewayへのリクエスト送信に失敗: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Gatewayがエラーを返しました: HTTP {status} - {body}");
    }

    response
        .json::<UploadUrlsResponse>()
        .await
        .map_err(|e| anyhow::anyhow!("レスポンスのパースに失敗: {e}"))
}

/// 受領したレコードを順番に転送する。
///
/// 各トークンは相異なるオブジェクトにスコープされているため並行転送も
/// 安全だが、ここでは単純さを優先して逐次転送とする。
/// 1件の失敗（非2xx・トランスポートエラー）は記録して次のレコードへ進む。
/// リトライは行わない。
pub async fn run_transfers(
    client: &reqwest::Client,
    records: &[UploadUrlRecord],
    payload: &[u8],
) -> TransferReport {
    let mut report = TransferReport::default();

    for record in records {
        let result = client
            .put(&record.upload_url)
            .header(CONTENT_TYPE, "image/jpeg")
            .body(payload.to_vec())
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(
                    blob_name = %record.blob_name,
                    file_url = %record.file_url,
                    "アップロード成功"
                );
                report.succeeded += 1;
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(
                    blob_name = %record.blob_name,
                    %status,
                    body = %body,
                    "アップロード失敗"
                );
                report.failed += 1;
            }
            Err(e) => {
                tracing::error!(
                    blob_name = %record.blob_name,
                    error = %e,
                    "アップロードの送信に失敗"
                );
                report.failed += 1;
            }
        }
    }

    report
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::Json;

    use super::*;

    fn record(name: &str, upload_url: String) -> UploadUrlRecord {
        UploadUrlRecord {
            blob_name: name.to_string(),
            upload_url,
            file_url: format!("http://mock-storage/images/{name}"),
        }
    }

    async fn spawn_mock_storage() -> u16 {
        let app = axum::Router::new()
            .route("/ok", axum::routing::put(|| async { StatusCode::OK }))
            .route(
                "/fail",
                axum::routing::put(|| async {
                    (StatusCode::INTERNAL_SERVER_ERROR, "storage error")
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        port
    }

    /// 成功・失敗・到達不能が個別に集計され、途中で中断しないことを確認
    #[tokio::test]
    async fn test_mixed_outcomes_are_counted() {
        let port = spawn_mock_storage().await;
        let client = reqwest::Client::new();

        let records = vec![
            record("a.jpg", format!("http://127.0.0.1:{port}/ok?sig=1")),
            record("b.jpg", format!("http://127.0.0.1:{port}/fail?sig=2")),
            // 到達不能なエンドポイント（トランスポートエラー）
            record("c.jpg", "http://127.0.0.1:1/ok?sig=3".to_string()),
            record("d.jpg", format!("http://127.0.0.1:{port}/ok?sig=4")),
        ];

        let report = run_transfers(&client, &records, b"payload").await;

        assert_eq!(
            report,
            TransferReport {
                succeeded: 2,
                failed: 2
            }
        );
    }

    /// モックGatewayからレコードを受領できることを確認
    #[tokio::test]
    async fn test_request_upload_urls() {
        let app = axum::Router::new().route(
            "/upload-urls",
            axum::routing::post(
                |axum::extract::Query(params): axum::extract::Query<
                    std::collections::HashMap<String, String>,
                >| async move {
                    assert_eq!(params.get("count").map(String::as_str), Some("2"));
                    Json(serde_json::json!({
                        "urls": [
                            {
                                "blobName": "image-1-aaaaaaaa.jpg",
                                "uploadUrl": "http://mock/images/image-1-aaaaaaaa.jpg?X-Amz-Signature=x",
                                "fileUrl": "http://mock/images/image-1-aaaaaaaa.jpg"
                            },
                            {
                                "blobName": "image-1-bbbbbbbb.jpg",
                                "uploadUrl": "http://mock/images/image-1-bbbbbbbb.jpg?X-Amz-Signature=y",
                                "fileUrl": "http://mock/images/image-1-bbbbbbbb.jpg"
                            }
                        ]
                    }))
                },
            ),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let client = reqwest::Client::new();
        let response =
            request_upload_urls(&client, &format!("http://127.0.0.1:{port}"), None, 2)
                .await
                .unwrap();

        assert_eq!(response.urls.len(), 2);
        assert_eq!(response.urls[0].blob_name, "image-1-aaaaaaaa.jpg");
    }

    /// Gatewayのエラー応答が発行要求の失敗として伝播することを確認
    #[tokio::test]
    async fn test_request_upload_urls_gateway_error() {
        let app = axum::Router::new().route(
            "/upload-urls",
            axum::routing::post(|| async {
                (StatusCode::INTERNAL_SERVER_ERROR, "接続文字列が不正です")
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let client = reqwest::Client::new();
        let result =
            request_upload_urls(&client, &format!("http://127.0.0.1:{port}"), None, 1).await;

        assert!(result.is_err());
    }
}
