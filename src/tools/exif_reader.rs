use anyhow::{Context, Result};
use exif::{In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 讀取影像內嵌的 EXIF 日期（`DateTimeOriginal` 優先，其次 `DateTime`）
pub fn read_embedded_date(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).with_context(|| format!("無法開啟檔案: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .with_context(|| format!("沒有 EXIF 資料: {}", path.display()))?;

    for tag in [Tag::DateTimeOriginal, Tag::DateTime] {
        let Some(field) = exif.get_field(tag, In::PRIMARY) else {
            continue;
        };
        if let Value::Ascii(ref values) = field.value {
            let text = values
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
                .unwrap_or_default();
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
    }

    Ok(None)
}

/// 測試用的最小 little-endian TIFF：IFD0 可放 `DateTime`，
/// Exif IFD 可放 `DateTimeOriginal`
#[cfg(test)]
pub(crate) fn minimal_exif_tiff(date_time: Option<&str>, date_time_original: Option<&str>) -> Vec<u8> {
    const ASCII: u16 = 2;
    const LONG: u16 = 4;
    const TAG_DATE_TIME: u16 = 0x0132;
    const TAG_EXIF_POINTER: u16 = 0x8769;
    const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

    fn entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: usize, value: usize) {
        out.extend(tag.to_le_bytes());
        out.extend(kind.to_le_bytes());
        out.extend(u32::try_from(count).unwrap().to_le_bytes());
        out.extend(u32::try_from(value).unwrap().to_le_bytes());
    }
    fn ascii(text: &str) -> Vec<u8> {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        bytes
    }

    let ifd0_entries = usize::from(date_time.is_some()) + usize::from(date_time_original.is_some());
    let mut offset = 8 + 2 + 12 * ifd0_entries + 4;
    let mut ifd0 = u16::try_from(ifd0_entries).unwrap().to_le_bytes().to_vec();
    let mut data = Vec::new();

    if let Some(text) = date_time {
        let value = ascii(text);
        entry(&mut ifd0, TAG_DATE_TIME, ASCII, value.len(), offset);
        offset += value.len();
        data.extend(value);
    }
    if let Some(text) = date_time_original {
        let value = ascii(text);
        entry(&mut ifd0, TAG_EXIF_POINTER, LONG, 1, offset);
        let exif_ifd_len = 2 + 12 + 4;
        data.extend(1u16.to_le_bytes());
        entry(&mut data, TAG_DATE_TIME_ORIGINAL, ASCII, value.len(), offset + exif_ifd_len);
        data.extend(0u32.to_le_bytes());
        data.extend(value);
    }
    ifd0.extend(0u32.to_le_bytes());

    let mut tiff = b"II\x2a\x00".to_vec();
    tiff.extend(8u32.to_le_bytes());
    tiff.extend(ifd0);
    tiff.extend(data);
    tiff
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tiff_file(bytes: &[u8]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::with_suffix(".tif").unwrap();
        temp_file.write_all(bytes).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_date_time_original_wins() {
        let file = tiff_file(&minimal_exif_tiff(
            Some("2001:01:01 00:00:00"),
            Some("2021:03:04 10:11:12"),
        ));
        assert_eq!(
            read_embedded_date(file.path()).unwrap(),
            Some("2021:03:04 10:11:12".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_date_time() {
        let file = tiff_file(&minimal_exif_tiff(Some("2019:05:06 07:08:09"), None));
        assert_eq!(
            read_embedded_date(file.path()).unwrap(),
            Some("2019:05:06 07:08:09".to_string())
        );
    }

    #[test]
    fn test_non_image_is_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"institutionCode,collectionCode\n").unwrap();
        assert!(read_embedded_date(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(read_embedded_date(Path::new("/nonexistent/scan.tif")).is_err());
    }
}
