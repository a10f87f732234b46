//! # POST /upload-urls
//!
//! 期限付き・書き込み専用の署名付きアップロードURLを一括発行する。
//!
//! Gatewayはペイロードのバイト列を一切扱わない。データ本体はクライアントが
//! 署名付きURLに対して直接PUTする。発行したトークンの記録も保持しない。

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use imagedrop_types::{UploadUrlRecord, UploadUrlsResponse};

use crate::auth;
use crate::config::GatewayState;
use crate::error::GatewayError;

/// 1リクエストあたりの発行数の上限。
const MAX_COUNT: i64 = 100;

/// `count` クエリパラメータをパースする。
///
/// 欠落・非数値は1。数値は `[1, 100]` にクランプする。
pub(crate) fn parse_count(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 1;
    };
    match raw.trim().parse::<i64>() {
        Ok(n) => n.clamp(1, MAX_COUNT) as u32,
        Err(_) => 1,
    }
}

/// POST /upload-urls?count=N — 署名付きアップロードURLの一括発行。
///
/// コンテナの存在を確認（なければ作成、冪等）した上で、
/// N件の独立したレコードを順序付きで返す。各トークンは単一オブジェクト・
/// PUT専用にスコープされ、有効期限後はストレージ側で拒否される。
pub async fn handle_upload_urls(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<UploadUrlsResponse>, GatewayError> {
    auth::require_api_key(&state, &headers)?;

    let count = parse_count(params.get("count").map(String::as_str));

    // コンテナ作成は失敗前の唯一の副作用であり、冪等なのでロールバック不要
    state.store.ensure_container().await?;

    let mut urls = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let blob_name = imagedrop_storage::generate_object_name();
        let target = state
            .store
            .presign_upload(&blob_name, state.presign_expiry_secs)
            .await?;
        urls.push(UploadUrlRecord {
            blob_name,
            upload_url: target.upload_url,
            file_url: target.file_url,
        });
    }

    tracing::info!(count, "アップロードURLを発行しました");
    Ok(Json(UploadUrlsResponse { urls }))
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
