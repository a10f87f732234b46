//! # Imagedrop 共有型定義
//!
//! Gateway・CLI間で共有されるワイヤー型と、ストレージ接続文字列のパーサを提供する。
//!
//! ## エンコーディング規則
//! - ワイヤー型はすべてcamelCase（`blobName`, `uploadUrl`, `fileUrl`）
//! - 接続文字列は `key=value;key=value;...` 形式

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ワイヤー型
// ---------------------------------------------------------------------------

/// 発行済みアップロードURLの1レコード。
///
/// `upload_url` は署名付きクエリ文字列を含むPUT用URL、
/// `file_url` は署名なしのオブジェクトURL。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRecord {
    /// 生成されたオブジェクト名（`image-<unix millis>-<乱数サフィックス>.jpg`）
    pub blob_name: String,
    /// 署名付きアップロードURL（PUT、書き込み専用、期限付き）
    pub upload_url: String,
    /// 署名なしのオブジェクトURL
    pub file_url: String,
}

/// `POST /upload-urls` のレスポンスボディ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadUrlsResponse {
    /// 発行されたレコードの順序付きリスト
    pub urls: Vec<UploadUrlRecord>,
}

// ---------------------------------------------------------------------------
// ストレージ接続文字列
// ---------------------------------------------------------------------------

/// 接続文字列のパースエラー。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialParseError {
    /// 必須キーの欠落または空値
    #[error("接続文字列に{0}がありません")]
    MissingKey(&'static str),
}

/// ストレージ認証情報。
///
/// プロセス起動時に接続文字列から一度だけパースし、以後は読み取り専用。
/// すべての署名付きURL生成とストレージ直接操作の認証に使用される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCredential {
    /// アカウント識別子（アクセスキーとして使用）
    pub account_name: String,
    /// 署名用シークレットキー
    pub account_key: String,
    /// ストレージサービスのエンドポイントURL
    pub blob_endpoint: String,
}

impl StorageCredential {
    /// `key=value;key=value;...` 形式の接続文字列をパースする。
    ///
    /// 認識するキーは `AccountName` / `AccountKey` / `BlobEndpoint` の3つで、
    /// それ以外のキーは無視する。認識キーの欠落・空値はエラー。
    pub fn parse(connection_string: &str) -> Result<Self, CredentialParseError> {
        let mut account_name = None;
        let mut account_key = None;
        let mut blob_endpoint = None;

        for segment in connection_string.split(';') {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "AccountName" => account_name = Some(value.to_string()),
                "AccountKey" => account_key = Some(value.to_string()),
                "BlobEndpoint" => blob_endpoint = Some(value.to_string()),
                // その他のキー（DefaultEndpointsProtocol等）は無視
                _ => {}
            }
        }

        Ok(Self {
            account_name: account_name
                .ok_or(CredentialParseError::MissingKey("AccountName"))?,
            account_key: account_key.ok_or(CredentialParseError::MissingKey("AccountKey"))?,
            blob_endpoint: blob_endpoint
                .ok_or(CredentialParseError::MissingKey("BlobEndpoint"))?,
        })
    }
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
