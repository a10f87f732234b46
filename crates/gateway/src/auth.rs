//! # Gateway認証
//!
//! 静的共有シークレット（APIキー）によるリクエスト認証。

use axum::http::HeaderMap;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// APIキーを運ぶリクエストヘッダ名。
pub const API_KEY_HEADER: &str = "x-api-key";

/// APIキーを検証する。
///
/// - `api_key` が `Some` の場合: `x-api-key` ヘッダとの完全一致が必須。
/// - `api_key` が `None` の場合: 検証をスキップ（開発環境用）。
pub(crate) fn require_api_key(
    state: &GatewayState,
    headers: &HeaderMap,
) -> Result<(), GatewayError> {
    let Some(expected) = &state.api_key else {
        return Ok(());
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(GatewayError::Unauthorized(
            "APIキーが一致しません".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::endpoints::upload_urls::tests::test_state;

    /// 正しいAPIキーが受理されることを確認
    #[test]
    fn test_correct_api_key_accepted() {
        let state = test_state(Some("secret-key"));
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("secret-key"));

        assert!(require_api_key(&state, &headers).is_ok());
    }

    /// 不一致のAPIキーが拒否されることを確認
    #[test]
    fn test_wrong_api_key_rejected() {
        let state = test_state(Some("secret-key"));
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("wrong"));

        assert!(require_api_key(&state, &headers).is_err());
    }

    /// ヘッダ欠落が拒否されることを確認
    #[test]
    fn test_missing_header_rejected() {
        let state = test_state(Some("secret-key"));

        assert!(require_api_key(&state, &HeaderMap::new()).is_err());
    }

    /// APIキー未設定時は検証がスキップされることを確認
    #[test]
    fn test_unconfigured_key_skips_check() {
        let state = test_state(None);

        assert!(require_api_key(&state, &HeaderMap::new()).is_ok());
    }
}
