//! # S3互換オブジェクトストア実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用する
//! `ObjectStore` 実装。

use imagedrop_types::StorageCredential;

use crate::{ObjectEntry, ObjectStore, StorageError, UploadTarget};

/// S3互換ストレージによる `ObjectStore` 実装。
pub struct S3ObjectStore {
    /// 内部通信用バケット（存在確認・列挙・削除等）
    bucket_internal: s3::Bucket,
    /// クライアント向けバケット（署名付きURL生成用）。
    /// Docker内部ホスト名と外部ホスト名が異なる場合に使用。
    /// Noneの場合はbucket_internalを使用する。
    bucket_public: Option<s3::Bucket>,
    /// 認証情報（コンテナ作成時の再署名に使用）
    credential: StorageCredential,
    /// コンテナ名
    container: String,
    /// クライアントから到達可能なエンドポイント（fileUrl合成用）
    public_endpoint: String,
}

impl S3ObjectStore {
    /// 認証情報とコンテナ名からストアを構築する。
    ///
    /// `public_endpoint` を指定すると、署名付きURLと `file_url` は
    /// そのエンドポイントに対して生成される。クライアント側での
    /// ホスト名書き換えは不要になる。
    pub fn new(
        credential: StorageCredential,
        container: &str,
        public_endpoint: Option<String>,
    ) -> anyhow::Result<Self> {
        let bucket_internal =
            Self::init_bucket(&credential.blob_endpoint, &credential, container)?;

        let bucket_public = public_endpoint
            .as_deref()
            .map(|ep| {
                tracing::info!(
                    public_endpoint = %ep,
                    "クライアント向けストレージエンドポイントを設定"
                );
                Self::init_bucket(ep, &credential, container)
            })
            .transpose()?;

        let public_endpoint =
            public_endpoint.unwrap_or_else(|| credential.blob_endpoint.clone());

        Ok(Self {
            bucket_internal,
            bucket_public,
            credential,
            container: container.to_string(),
            public_endpoint,
        })
    }

    /// 環境変数から構築する。
    ///
    /// - `STORAGE_CONNECTION_STRING` — 必須。欠落・不正は起動時エラー。
    /// - `STORAGE_PUBLIC_ENDPOINT` — 任意。クライアント向けエンドポイント。
    /// - `STORAGE_CONTAINER` — 任意。デフォルトは `images`。
    pub fn from_env() -> anyhow::Result<Self> {
        let connection_string = std::env::var("STORAGE_CONNECTION_STRING")
            .map_err(|_| anyhow::anyhow!("STORAGE_CONNECTION_STRINGが設定されていません"))?;
        let credential = StorageCredential::parse(&connection_string)?;

        let container =
            std::env::var("STORAGE_CONTAINER").unwrap_or_else(|_| "images".to_string());
        let public_endpoint = std::env::var("STORAGE_PUBLIC_ENDPOINT").ok();

        Self::new(credential, &container, public_endpoint)
    }

    /// エンドポイントと認証情報からS3互換バケットを初期化する。
    fn init_bucket(
        endpoint: &str,
        credential: &StorageCredential,
        container: &str,
    ) -> anyhow::Result<s3::Bucket> {
        let region = s3::Region::Custom {
            region: "us-east-1".to_string(),
            endpoint: endpoint.to_string(),
        };

        let credentials = s3::creds::Credentials::new(
            Some(&credential.account_name),
            Some(&credential.account_key),
            None,
            None,
            None,
        )?;

        let bucket = s3::Bucket::new(container, region, credentials)?.with_path_style();

        Ok(*bucket)
    }

    /// 内部エンドポイントに対するリージョン定義。
    fn region(&self) -> s3::Region {
        s3::Region::Custom {
            region: "us-east-1".to_string(),
            endpoint: self.credential.blob_endpoint.clone(),
        }
    }

    fn s3_credentials(&self) -> Result<s3::creds::Credentials, StorageError> {
        s3::creds::Credentials::new(
            Some(&self.credential.account_name),
            Some(&self.credential.account_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("認証情報の構築に失敗: {e}")))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn ensure_container(&self) -> Result<(), StorageError> {
        let exists = self
            .bucket_internal
            .exists()
            .await
            .map_err(|e| StorageError::Backend(format!("コンテナの存在確認に失敗: {e}")))?;
        if exists {
            return Ok(());
        }

        let response = s3::Bucket::create_with_path_style(
            &self.container,
            self.region(),
            self.s3_credentials()?,
            s3::BucketConfiguration::default(),
        )
        .await
        .map_err(|e| StorageError::Backend(format!("コンテナの作成に失敗: {e}")))?;

        // 並行リクエストとの競合で既に作成済みの場合（409）は成功扱い
        if !response.success() && response.response_code != 409 {
            return Err(StorageError::Backend(format!(
                "コンテナの作成に失敗: HTTP {} - {}",
                response.response_code, response.response_text
            )));
        }

        tracing::info!(container = %self.container, "コンテナを作成しました");
        Ok(())
    }

    async fn container_exists(&self) -> Result<bool, StorageError> {
        self.bucket_internal
            .exists()
            .await
            .map_err(|e| StorageError::Backend(format!("コンテナの存在確認に失敗: {e}")))
    }

    async fn presign_upload(
        &self,
        object_key: &str,
        expiry_secs: u32,
    ) -> Result<UploadTarget, StorageError> {
        let public_bucket = self.bucket_public.as_ref().unwrap_or(&self.bucket_internal);

        let upload_url = public_bucket
            .presign_put(object_key, expiry_secs, None, None)
            .await
            .map_err(|e| {
                StorageError::Presign(format!("署名付きアップロードURL生成失敗: {e}"))
            })?;

        let file_url = format!(
            "{}/{}/{}",
            self.public_endpoint.trim_end_matches('/'),
            self.container,
            object_key
        );

        Ok(UploadTarget {
            upload_url,
            file_url,
        })
    }

    async fn list_objects(&self) -> Result<Vec<ObjectEntry>, StorageError> {
        let pages = self
            .bucket_internal
            .list(String::new(), None)
            .await
            .map_err(|e| StorageError::Backend(format!("オブジェクトの列挙に失敗: {e}")))?;

        // ページごとのListBucketResultを単一のリストに平坦化する
        let mut entries = Vec::new();
        for page in pages {
            for object in page.contents {
                entries.push(ObjectEntry {
                    name: object.key,
                    size: object.size,
                    last_modified: object.last_modified,
                });
            }
        }

        Ok(entries)
    }

    async fn delete_object(&self, object_key: &str) -> Result<(), StorageError> {
        let response = self
            .bucket_internal
            .delete_object(object_key)
            .await
            .map_err(|e| StorageError::Backend(format!("オブジェクトの削除に失敗: {e}")))?;

        // S3互換のDELETEは対象が既に存在しない場合も204を返す
        let code = response.status_code();
        if !(200..300).contains(&code) {
            return Err(StorageError::Backend(format!(
                "オブジェクトの削除に失敗: HTTP {code}"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
