use std::collections::BTreeMap;

pub mod columns {
    pub const DOCUMENT_ID: &str = "documentId";
    pub const TITLE: &str = "title";
    pub const FILE_NAME: &str = "fileName";
    pub const RELATIVE_PATH: &str = "relativePath";
    pub const FULL_PATH: &str = "fullPath";
    pub const FORMAT: &str = "format";
    pub const ASSET_CATEGORY: &str = "assetCategory";
    pub const DATE_CREATED: &str = "dateCreated";
    pub const SCAN_MODE_APPLIED: &str = "scanModeApplied";

    pub const INSTITUTION_CODE: &str = "institutionCode";
    pub const COLLECTION_CODE: &str = "collectionCode";
    pub const INSTITUTION_NAME: &str = "institutionName";
    pub const DESCRIPTION: &str = "description";
    pub const SUBJECT: &str = "subject";
    pub const ADDITIONAL_NAMES: &str = "additionalNames";
}

/// 輸出時永遠排在最前面的系統欄位
pub const SYSTEM_COLUMNS: [&str; 9] = [
    columns::DOCUMENT_ID,
    columns::TITLE,
    columns::FILE_NAME,
    columns::RELATIVE_PATH,
    columns::FULL_PATH,
    columns::FORMAT,
    columns::ASSET_CATEGORY,
    columns::DATE_CREATED,
    columns::SCAN_MODE_APPLIED,
];

pub const METADATA_FORMAT: &str = ".csv";
pub const METADATA_SUBJECT: &str = "Metadata";

/// 清冊中的一列：系統欄位固定，其餘欄位（機構、典藏、對應表欄位）放在 attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRecord {
    pub document_id: String,
    pub title: String,
    pub file_name: String,
    pub relative_path: String,
    pub full_path: String,
    pub format: String,
    pub asset_category: String,
    pub date_created: String,
    pub scan_mode_applied: String,
    pub(crate) attributes: BTreeMap<String, String>,
}

impl AssetRecord {
    /// 由表頭與一列值建立（讀回既有清冊時使用）
    #[must_use]
    pub fn from_row<'a, H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        V: IntoIterator<Item = &'a str>,
    {
        let mut record = Self::default();
        for (header, value) in headers.into_iter().zip(values) {
            record.set(header, value);
        }
        record
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            columns::DOCUMENT_ID => &self.document_id,
            columns::TITLE => &self.title,
            columns::FILE_NAME => &self.file_name,
            columns::RELATIVE_PATH => &self.relative_path,
            columns::FULL_PATH => &self.full_path,
            columns::FORMAT => &self.format,
            columns::ASSET_CATEGORY => &self.asset_category,
            columns::DATE_CREATED => &self.date_created,
            columns::SCAN_MODE_APPLIED => &self.scan_mode_applied,
            other => return self.attributes.get(other).map(String::as_str),
        };
        Some(value.as_str())
    }

    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match column {
            columns::DOCUMENT_ID => self.document_id = value,
            columns::TITLE => self.title = value,
            columns::FILE_NAME => self.file_name = value,
            columns::RELATIVE_PATH => self.relative_path = value,
            columns::FULL_PATH => self.full_path = value,
            columns::FORMAT => self.format = value,
            columns::ASSET_CATEGORY => self.asset_category = value,
            columns::DATE_CREATED => self.date_created = value,
            columns::SCAN_MODE_APPLIED => self.scan_mode_applied = value,
            other => {
                self.attributes.insert(other.to_string(), value);
            }
        }
    }

    /// 系統欄位永遠視為已設定
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        SYSTEM_COLUMNS.contains(&column) || self.attributes.contains_key(column)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        SYSTEM_COLUMNS
            .iter()
            .copied()
            .chain(self.attributes.keys().map(String::as_str))
    }

    /// 只保留輸出欄位中的 attributes
    pub fn retain_columns(&mut self, keep: &[String]) {
        self.attributes
            .retain(|column, _| keep.iter().any(|k| k == column));
    }

    /// 依欄位順序輸出一列，缺少的欄位為空字串
    #[must_use]
    pub fn to_row(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .map(|column| self.get(column).unwrap_or_default().to_string())
            .collect()
    }

    #[must_use]
    pub fn attribute(&self, column: &str) -> &str {
        self.attributes.get(column).map_or("", String::as_str)
    }

    #[must_use]
    pub fn institution_code(&self) -> &str {
        self.attribute(columns::INSTITUTION_CODE)
    }

    #[must_use]
    pub fn collection_code(&self) -> &str {
        self.attribute(columns::COLLECTION_CODE)
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.attribute(columns::DESCRIPTION)
    }

    #[must_use]
    pub fn is_metadata_file(&self) -> bool {
        self.format.eq_ignore_ascii_case(METADATA_FORMAT)
    }
}

/// 系統欄位在前，之後接對應表欄位（依對應表順序），只保留實際存在的欄位
#[must_use]
pub fn order_columns<F>(is_present: F, mapping_columns: &[String]) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let mut ordered: Vec<String> = SYSTEM_COLUMNS
        .iter()
        .copied()
        .filter(|column| is_present(column))
        .map(str::to_string)
        .collect();

    for column in mapping_columns {
        if !is_present(column) || ordered.contains(column) {
            continue;
        }
        ordered.push(column.clone());
    }

    ordered
}
