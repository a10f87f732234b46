//! # スイープ コアロジック
//!
//! コンテナ内の全オブジェクトを列挙して削除する。
//! 列挙の失敗は致命的、個々の削除の失敗は集計して続行する。

use imagedrop_storage::{ObjectStore, StorageError};

/// スイープ結果の集計。常に `succeeded + failed == found`。
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// 列挙されたオブジェクト数
    pub found: usize,
    /// 削除に成功した数
    pub succeeded: usize,
    /// 削除に失敗した数
    pub failed: usize,
}

/// コンテナ内の全オブジェクトを削除する。
///
/// 列挙はプロバイダ側のページネーションを吸収した単一のパスで行い、
/// 収集した名前を順に削除する。1件の削除失敗は記録して次へ進む。
/// 二度続けて実行しても安全で、2回目は空またはより少ない結果を報告する。
pub async fn run_sweep(store: &dyn ObjectStore) -> Result<SweepReport, StorageError> {
    // 列挙の失敗のみがこの関数のエラーになる
    let entries = store.list_objects().await?;

    let mut report = SweepReport {
        found: entries.len(),
        ..SweepReport::default()
    };

    for entry in &entries {
        match store.delete_object(&entry.name).await {
            Ok(()) => {
                tracing::info!(name = %entry.name, size = entry.size, "削除しました");
                report.succeeded += 1;
            }
            Err(e) => {
                tracing::error!(name = %entry.name, error = %e, "削除に失敗しました");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
