use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

pub const MAX_RECENT_PATHS: usize = 10;

/// 預設的 exiftool 執行檔名稱
pub const DEFAULT_EXIFTOOL_PROGRAM: &str = "exiftool";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetTypeTable {
    #[serde(rename = "TIFF_FILE")]
    pub tiff_file: Vec<String>,
    #[serde(rename = "JPEG_FILE")]
    pub jpeg_file: Vec<String>,
    #[serde(rename = "RAW_FILE")]
    pub raw_file: Vec<String>,
    #[serde(rename = "METADATA_FILE")]
    pub metadata_file: Vec<String>,
    /// 檔名第二段的視角代碼 -> 描述
    #[serde(rename = "VIEW_CODES")]
    pub view_codes: HashMap<String, String>,
    #[serde(rename = "INSTITUTION_NAMES")]
    pub institution_names: HashMap<String, String>,
}

impl AssetTypeTable {
    /// 取得篩選條件對應的副檔名集合（小寫，含前導點）
    #[must_use]
    pub fn extensions_for(&self, filter: FileFilter) -> HashSet<String> {
        let lists: Vec<&Vec<String>> = match filter {
            FileFilter::All => vec![
                &self.tiff_file,
                &self.jpeg_file,
                &self.raw_file,
                &self.metadata_file,
            ],
            FileFilter::TiffOnly => vec![&self.tiff_file],
            FileFilter::RawOnly => vec![&self.raw_file],
            FileFilter::JpegOnly => vec![&self.jpeg_file],
        };

        lists
            .into_iter()
            .flatten()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    /// 依檔名的第二段（底線分隔）查詢視角描述，找不到時回傳空字串
    #[must_use]
    pub fn view_description(&self, base_name: &str) -> String {
        let Some(view_code) = base_name.split('_').nth(1) else {
            return String::new();
        };

        self.view_codes
            .get(&view_code.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn institution_name(&self, institution_code: &str) -> String {
        self.institution_names
            .get(institution_code)
            .cloned()
            .unwrap_or_else(|| institution_code.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FileFilter {
    #[default]
    #[serde(rename = "All")]
    All,
    #[serde(rename = "TIFF only")]
    TiffOnly,
    #[serde(rename = "RAW only")]
    RawOnly,
    #[serde(rename = "JPEG only")]
    JpegOnly,
}

impl FileFilter {
    #[must_use]
    pub const fn all_filters() -> [Self; 4] {
        [Self::All, Self::TiffOnly, Self::RawOnly, Self::JpegOnly]
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::TiffOnly => "TIFF only",
            Self::RawOnly => "RAW only",
            Self::JpegOnly => "JPEG only",
        }
    }
}

impl fmt::Display for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputChoice {
    #[default]
    #[serde(rename = "CSV only")]
    CsvOnly,
    #[serde(rename = "Excel only")]
    ExcelOnly,
    #[serde(rename = "Both")]
    Both,
}

impl OutputChoice {
    #[must_use]
    pub const fn all_choices() -> [Self; 3] {
        [Self::CsvOnly, Self::ExcelOnly, Self::Both]
    }

    #[must_use]
    pub const fn includes_csv(&self) -> bool {
        matches!(self, Self::CsvOnly | Self::Both)
    }

    #[must_use]
    pub const fn includes_excel(&self) -> bool {
        matches!(self, Self::ExcelOnly | Self::Both)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CsvOnly => "CSV only",
            Self::ExcelOnly => "Excel only",
            Self::Both => "Both",
        }
    }
}

impl fmt::Display for OutputChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    /// 最近使用的根目錄（最新在前）
    pub recent_paths: Vec<String>,
    pub file_filter: FileFilter,
    pub output_choice: OutputChoice,
    pub exiftool_program: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            recent_paths: Vec::new(),
            file_filter: FileFilter::default(),
            output_choice: OutputChoice::default(),
            exiftool_program: DEFAULT_EXIFTOOL_PROGRAM.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub asset_type_table: AssetTypeTable,
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AssetTypeTable {
        serde_json::from_str(include_str!("../data/asset_type_table.json")).unwrap()
    }

    #[test]
    fn test_extensions_for_all_includes_csv() {
        let extensions = table().extensions_for(FileFilter::All);
        assert!(extensions.contains(".csv"));
        assert!(extensions.contains(".tif"));
        assert!(extensions.contains(".nef"));
        assert_eq!(extensions.len(), 12);
    }

    #[test]
    fn test_extensions_for_single_filters() {
        let table = table();
        let tiff = table.extensions_for(FileFilter::TiffOnly);
        assert_eq!(tiff.len(), 2);
        assert!(!tiff.contains(".csv"));
        assert_eq!(table.extensions_for(FileFilter::JpegOnly).len(), 2);
        assert_eq!(table.extensions_for(FileFilter::RawOnly).len(), 7);
    }

    #[test]
    fn test_view_description_lookup() {
        let table = table();
        assert_eq!(
            table.view_description("photo1_cd"),
            "Dorsal view of specimen cranium"
        );
        assert_eq!(
            table.view_description("ZM4021_LABEL_extra"),
            "Close-up view of specimen label"
        );
        assert_eq!(table.view_description("photo1"), "");
        assert_eq!(table.view_description("photo1_zz"), "");
    }

    #[test]
    fn test_institution_name_falls_back_to_code() {
        let table = table();
        assert_eq!(table.institution_name("ISAM"), "Iziko Museum of South Africa");
        assert_eq!(table.institution_name("XYZ"), "XYZ");
    }

    #[test]
    fn test_user_settings_partial_json_uses_defaults() {
        let settings: UserSettings = serde_json::from_str(r#"{"language":"zh-TW"}"#).unwrap();
        assert_eq!(settings.language, Language::ZhTw);
        assert_eq!(settings.file_filter, FileFilter::All);
        assert_eq!(settings.exiftool_program, DEFAULT_EXIFTOOL_PROGRAM);
    }
}
