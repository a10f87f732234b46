//! # デモ用ペイロード
//!
//! アップロードエージェントが転送する固定のインメモリペイロード。
//! 実画像ではなく、JPEGのマーカー構造だけを持つダミーバイト列。

/// JPEG SOIマーカー
const SOI: [u8; 2] = [0xFF, 0xD8];
/// JPEG EOIマーカー
const EOI: [u8; 2] = [0xFF, 0xD9];
/// JFIF APP0セグメント（識別子 + バージョン1.01 + 密度情報）
const APP0: [u8; 18] = [
    0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01,
    0x00, 0x01, 0x00, 0x00,
];

/// フィラー部のサイズ（バイト）
const FILLER_LEN: usize = 1024;

/// ダミーJPEGペイロードを構築する。
pub fn demo_payload() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(SOI.len() + APP0.len() + FILLER_LEN + EOI.len());
    bytes.extend_from_slice(&SOI);
    bytes.extend_from_slice(&APP0);
    bytes.extend((0..FILLER_LEN).map(|i| (i % 251) as u8));
    bytes.extend_from_slice(&EOI);
    bytes
}
