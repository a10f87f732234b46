//! # Imagedrop CLI
//!
//! `upload-agent` と `sweep` の2バイナリが共有するコアロジック。
//! バイナリ本体は環境変数の読み込みとログ初期化のみを行い、
//! 処理はこのライブラリ側でテスト可能な形で実装する。

pub mod agent;
pub mod payload;
pub mod sweep;
