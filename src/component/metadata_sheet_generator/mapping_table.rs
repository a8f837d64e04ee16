use super::asset_record::columns;
use anyhow::{Context, Result, bail};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// 對應表必須具備的欄位
pub const REQUIRED_MAPPING_COLUMNS: [&str; 8] = [
    columns::INSTITUTION_CODE,
    columns::COLLECTION_CODE,
    "creator",
    "contributor",
    "license",
    "rightsHolder",
    "holdingInstitution",
    columns::DESCRIPTION,
];

/// 對應表的一列（一個機構 + 典藏組合）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingRow {
    values: HashMap<String, String>,
}

impl MappingRow {
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 取得欄位值，欄位不存在時為空字串
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map_or("", String::as_str)
    }

    #[must_use]
    pub fn institution_code(&self) -> &str {
        self.get(columns::INSTITUTION_CODE)
    }

    #[must_use]
    pub fn collection_code(&self) -> &str {
        self.get(columns::COLLECTION_CODE)
    }
}

/// 機構提供的典藏對應表，每次執行只載入一次，唯讀
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    columns: Vec<String>,
    rows: Vec<MappingRow>,
}

impl MappingTable {
    /// 以欄位順序與資料列建立對應表，檢查必要欄位
    pub fn new(columns: Vec<String>, rows: Vec<MappingRow>) -> Result<Self> {
        let missing: BTreeSet<&str> = REQUIRED_MAPPING_COLUMNS
            .iter()
            .copied()
            .filter(|required| !columns.iter().any(|c| c == required))
            .collect();

        if !missing.is_empty() {
            let missing: Vec<&str> = missing.into_iter().collect();
            bail!("對應表缺少必要欄位: {}", missing.join(", "));
        }

        Ok(Self { columns, rows })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("找不到對應表: {}", path.display());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("無法開啟對應表: {}", path.display()))?;

        let columns: Vec<String> = reader
            .headers()
            .with_context(|| format!("無法讀取對應表表頭: {}", path.display()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.with_context(|| {
                format!("無法讀取對應表第 {} 列: {}", index + 2, path.display())
            })?;
            rows.push(MappingRow::from_pairs(
                columns
                    .iter()
                    .zip(record.iter())
                    .map(|(column, value)| (column.clone(), value.trim().to_string())),
            ));
        }

        Self::new(columns, rows)
            .with_context(|| format!("對應表格式錯誤: {}", path.display()))
    }

    /// 欄位順序與檔案表頭相同
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    #[must_use]
    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    /// 找出機構 + 典藏對應的列。若有重複列，以檔案中第一列為準。
    #[must_use]
    pub fn find(&self, institution_code: &str, collection_code: &str) -> Option<&MappingRow> {
        self.rows.iter().find(|row| {
            row.institution_code() == institution_code && row.collection_code() == collection_code
        })
    }

    #[must_use]
    pub fn institutions(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(MappingRow::institution_code)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn collections(&self, institution_code: &str) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.institution_code() == institution_code)
            .map(MappingRow::collection_code)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "institutionCode,collectionCode,creator,contributor,license,rightsHolder,holdingInstitution,description,subject,additionalNames";

    fn write_mapping(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("mapping.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_keeps_header_order() {
        let dir = TempDir::new().unwrap();
        let path = write_mapping(
            &dir,
            &format!("{HEADER}\nISAM,MAM001,Jane,Lab,CC-BY,Iziko,Iziko,Mammals,Skulls,\n"),
        );

        let table = MappingTable::load(&path).unwrap();
        assert_eq!(table.columns()[0], "institutionCode");
        assert_eq!(table.columns().last().unwrap(), "additionalNames");
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].get("additionalNames"), "");
    }

    #[test]
    fn test_first_matching_row_wins() {
        let dir = TempDir::new().unwrap();
        let path = write_mapping(
            &dir,
            &format!(
                "{HEADER}\nISAM,MAM001,First,Lab,CC-BY,Iziko,Iziko,Mammals,,\nISAM,MAM001,Second,Lab,CC-BY,Iziko,Iziko,Mammals,,\n"
            ),
        );

        let table = MappingTable::load(&path).unwrap();
        assert_eq!(table.find("ISAM", "MAM001").unwrap().get("creator"), "First");
        assert!(table.find("ISAM", "MAM999").is_none());
    }

    #[test]
    fn test_missing_required_columns_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_mapping(&dir, "institutionCode,collectionCode,creator\nISAM,MAM001,Jane\n");

        let err = MappingTable::load(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("contributor"));
        assert!(message.contains("license"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        assert!(MappingTable::load(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn test_institutions_and_collections_sorted_unique() {
        let dir = TempDir::new().unwrap();
        let path = write_mapping(
            &dir,
            &format!(
                "{HEADER}\nISAM,MAM002,a,b,c,d,e,f,,\nDNMNH,AVE001,a,b,c,d,e,f,,\nISAM,MAM001,a,b,c,d,e,f,,\nISAM,MAM001,a,b,c,d,e,f,,\n"
            ),
        );

        let table = MappingTable::load(&path).unwrap();
        assert_eq!(table.institutions(), vec!["DNMNH", "ISAM"]);
        assert_eq!(table.collections("ISAM"), vec!["MAM001", "MAM002"]);
        assert!(table.collections("NONE").is_empty());
    }
}
