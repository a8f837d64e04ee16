//! 決定性 documentId 產生器
//!
//! ID 由機構、典藏、檔名（或類別）與相對路徑指紋組成。
//! 指紋是正規化後相對路徑的 SHA-1 前 8 個十六進位字元，只有 2^32 的空間，
//! 在單一典藏的數量下足夠，但並非大規模唯一。

use sha1::{Digest, Sha1};

use super::path_validator::to_slash_path;

/// 路徑指紋長度（十六進位字元）
pub const FINGERPRINT_LENGTH: usize = 8;

/// 中介資料 ID 固定插入的標記
pub const METADATA_MARKER: &str = "METADATAINVENTORY";

/// 影像（或一般資產）檔案的 documentId
#[must_use]
pub fn image_document_id(
    institution_code: &str,
    collection_code: &str,
    base_name: &str,
    relative_path: &str,
) -> String {
    format!(
        "{}{}{}{}",
        strip_underscores(institution_code),
        strip_underscores(collection_code),
        strip_underscores(base_name),
        path_fingerprint(relative_path)
    )
}

/// 中介資料（CSV）檔案的 documentId，類別轉大寫並在指紋前插入標記
#[must_use]
pub fn metadata_document_id(
    institution_code: &str,
    collection_code: &str,
    category: &str,
    relative_path: &str,
) -> String {
    format!(
        "{}{}{}{}{}",
        strip_underscores(institution_code),
        strip_underscores(collection_code),
        strip_underscores(category).to_uppercase(),
        METADATA_MARKER,
        path_fingerprint(relative_path)
    )
}

#[must_use]
pub fn path_fingerprint(relative_path: &str) -> String {
    let normalized = to_slash_path(relative_path);
    let digest = Sha1::digest(normalized.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LENGTH);
    hex
}

fn strip_underscores(text: &str) -> String {
    text.replace('_', "")
}
