//! # Imagedrop ストレージ抽象
//!
//! GatewayとCLIが共有するオブジェクトストレージの抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

pub mod s3;

pub use s3::S3ObjectStore;

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

// ---------------------------------------------------------------------------
// エラー型
// ---------------------------------------------------------------------------

/// ストレージ操作のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// ストレージバックエンドの操作に失敗
    #[error("ストレージ操作に失敗: {0}")]
    Backend(String),
    /// 署名付きURLの生成に失敗
    #[error("署名付きURLの生成に失敗: {0}")]
    Presign(String),
}

// ---------------------------------------------------------------------------
// オブジェクトストア抽象
// ---------------------------------------------------------------------------

/// 署名付きアップロードURL生成の結果。
pub struct UploadTarget {
    /// クライアントがアップロードに使用するURL（PUT、書き込み専用、期限付き）
    pub upload_url: String,
    /// 署名なしのオブジェクトURL
    pub file_url: String,
}

/// スイープ時の列挙結果1件。スイープ完了後は保持されない。
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    /// オブジェクト名
    pub name: String,
    /// サイズ（バイト）
    pub size: u64,
    /// 最終更新時刻（プロバイダ形式の文字列）
    pub last_modified: String,
}

/// オブジェクトストレージの抽象インターフェース。
///
/// 運用者はS3互換ストレージ（MinIO, AWS S3, Cloudflare R2等）や
/// その他のストレージバックエンドを実装として選択できる。
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// コンテナが存在しなければ作成する。冪等。
    async fn ensure_container(&self) -> Result<(), StorageError>;

    /// コンテナの存在を確認する。
    async fn container_exists(&self) -> Result<bool, StorageError>;

    /// 単一オブジェクト・PUT専用・期限付きの署名付きアップロードURLを生成する。
    ///
    /// 署名はメソッドとオブジェクトキーを対象に含むため、
    /// 同じURLでのGET/DELETEはストレージ側で拒否される。
    async fn presign_upload(
        &self,
        object_key: &str,
        expiry_secs: u32,
    ) -> Result<UploadTarget, StorageError>;

    /// コンテナ内の全オブジェクトを列挙する。
    ///
    /// プロバイダ側のページネーションは実装内で吸収し、
    /// 呼び出し側からは単一のパスとして見える。
    async fn list_objects(&self) -> Result<Vec<ObjectEntry>, StorageError>;

    /// オブジェクトを削除する。
    async fn delete_object(&self, object_key: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// オブジェクト名生成
// ---------------------------------------------------------------------------

/// 衝突確率が実用上無視できるオブジェクト名を生成する。
///
/// 形式: `image-<unix millis>-<乱数サフィックス8文字>.jpg`
/// 一意性は確率的であり保証ではない。
pub fn generate_object_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("image-{millis}-{}.jpg", &suffix[..8])
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// オブジェクト名が規定の形式であることを確認
    #[test]
    fn test_object_name_format() {
        let name = generate_object_name();

        assert!(name.starts_with("image-"));
        assert!(name.ends_with(".jpg"));

        let stem = name.trim_start_matches("image-").trim_end_matches(".jpg");
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert!(millis.parse::<u128>().is_ok());
        assert_eq!(suffix.len(), 8);
    }

    /// 連続生成した名前が衝突しないことを確認
    #[test]
    fn test_object_name_uniqueness() {
        let names: Vec<String> = (0..100).map(|_| generate_object_name()).collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }
}
