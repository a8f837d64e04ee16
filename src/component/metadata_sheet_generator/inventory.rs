use super::asset_record::{AssetRecord, columns, order_columns};
use crate::tools::{write_csv_table, write_xlsx_table};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// 辨識既有清冊所需的欄位，缺少任一欄位時整份清冊重建
pub const REQUIRED_INVENTORY_COLUMNS: [&str; 4] = [
    columns::DOCUMENT_ID,
    columns::RELATIVE_PATH,
    columns::COLLECTION_CODE,
    columns::INSTITUTION_CODE,
];

/// 累積的資產清冊：有順序的紀錄與輸出欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    columns: Vec<String>,
    records: Vec<AssetRecord>,
}

impl Inventory {
    #[must_use]
    pub const fn new(columns: Vec<String>, records: Vec<AssetRecord>) -> Self {
        Self { columns, records }
    }

    /// 依系統欄位 + 對應表欄位排序建立清冊（子集檔案使用）
    #[must_use]
    pub fn from_records(records: Vec<AssetRecord>, mapping_columns: &[String]) -> Self {
        let present: HashSet<&str> = records.iter().flat_map(AssetRecord::column_names).collect();
        let columns = order_columns(|c| present.contains(c), mapping_columns);
        Self { columns, records }
    }

    /// 讀取既有清冊 CSV；檔案不存在時回傳空清冊。
    /// 欄位數不齊的列照樣讀入，缺少的欄位視為空白。
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("無法開啟清冊: {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("無法讀取清冊表頭: {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.with_context(|| {
                format!("無法讀取清冊第 {} 列: {}", index + 2, path.display())
            })?;
            records.push(AssetRecord::from_row(
                headers.iter().map(String::as_str),
                row.iter(),
            ));
        }

        Ok(Self::new(headers, records))
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        write_csv_table(path, &self.columns, &self.rows())
    }

    pub fn write_xlsx(&self, path: &Path) -> Result<()> {
        write_xlsx_table(path, &self.columns, &self.rows())
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| record.to_row(&self.columns))
            .collect()
    }

    /// 空清冊或具備所有識別欄位才視為有效
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.records.is_empty()
            || REQUIRED_INVENTORY_COLUMNS
                .iter()
                .all(|required| self.columns.iter().any(|c| c == required))
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn find(&self, document_id: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|r| r.document_id == document_id)
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<AssetRecord>) {
        (self.columns, self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let inventory = Inventory::load(&temp_dir.path().join("master.csv")).unwrap();
        assert!(inventory.is_empty());
        assert!(inventory.is_well_formed());
    }

    #[test]
    fn test_write_then_load_keeps_columns_and_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("master.csv");

        let mut record = AssetRecord::default();
        record.document_id = "ISAMMAM001photo1abcd1234".to_string();
        record.relative_path = "scans/ISAM/MAM001/photo1.tif".to_string();
        record.set("institutionCode", "ISAM");
        record.set("collectionCode", "MAM001");
        record.set("description", "Hand-written note, with comma");

        let mapping: Vec<String> = ["institutionCode", "collectionCode", "description"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let inventory = Inventory::from_records(vec![record], &mapping);
        inventory.write_csv(&path).unwrap();

        let loaded = Inventory::load(&path).unwrap();
        assert_eq!(loaded.columns(), inventory.columns());
        assert_eq!(loaded, inventory);
        assert!(loaded.is_well_formed());
        assert_eq!(
            loaded.find("ISAMMAM001photo1abcd1234").unwrap().description(),
            "Hand-written note, with comma"
        );
    }

    #[test]
    fn test_missing_identifying_columns_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("master.csv");
        fs::write(&path, "title,fileName\nphoto1,photo1.tif\n").unwrap();

        let inventory = Inventory::load(&path).unwrap();
        assert_eq!(inventory.len(), 1);
        assert!(!inventory.is_well_formed());
    }

    #[test]
    fn test_short_rows_keep_their_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("master.csv");
        fs::write(
            &path,
            "documentId,relativePath,institutionCode,collectionCode,description\n\
             OLD1,a/b.tif,ISAM,MAM001,Hand-written note\n\
             OLD2,a/c.tif,ISAM,MAM001\n",
        )
        .unwrap();

        let inventory = Inventory::load(&path).unwrap();
        assert_eq!(inventory.len(), 2);
        assert!(inventory.is_well_formed());
        assert_eq!(inventory.find("OLD1").unwrap().description(), "Hand-written note");
        assert_eq!(inventory.find("OLD2").unwrap().description(), "");
        assert_eq!(inventory.find("OLD2").unwrap().collection_code(), "MAM001");
    }

    #[test]
    fn test_long_rows_ignore_extra_cells() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("master.csv");
        fs::write(&path, "documentId,relativePath\nA,b,c,d\n").unwrap();

        let inventory = Inventory::load(&path).unwrap();
        assert_eq!(inventory.find("A").unwrap().relative_path, "b");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("master.csv");
        fs::write(&path, b"documentId,relativePath\nA,\xff\xfe\n").unwrap();
        assert!(Inventory::load(&path).is_err());
    }
}
