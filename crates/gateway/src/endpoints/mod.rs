//! # Gatewayエンドポイント

pub mod upload_urls;

pub use upload_urls::handle_upload_urls;
