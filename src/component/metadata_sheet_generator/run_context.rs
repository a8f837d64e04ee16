use super::mapping_table::MappingTable;
use crate::config::{AssetTypeTable, FileFilter, OutputChoice};
use crate::tools::DateResolver;
use chrono::Local;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const MAPPING_DIR: &str = "DAMSG_mapping";
pub const MAPPING_FILE: &str = "collections_mapping_2026.csv";
pub const OUTPUT_DIR: &str = "DAMSG_output";
pub const MASTER_CSV_FILE: &str = "digital_asset_inventory_master.csv";
pub const MASTER_XLSX_FILE: &str = "digital_asset_inventory_master.xlsx";
pub const METADATA_DIR: &str = "metadata";
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[must_use]
pub fn mapping_table_path(root: &Path) -> PathBuf {
    root.join(MAPPING_DIR).join(MAPPING_FILE)
}

#[must_use]
pub fn master_csv_path(root: &Path) -> PathBuf {
    root.join(OUTPUT_DIR).join(MASTER_CSV_FILE)
}

#[must_use]
pub fn master_xlsx_path(root: &Path) -> PathBuf {
    root.join(OUTPUT_DIR).join(MASTER_XLSX_FILE)
}

/// 工具自己的資料夾，不視為類別資料夾
#[must_use]
pub fn is_reserved_dir(name: &str) -> bool {
    name == MAPPING_DIR || name == OUTPUT_DIR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    SingleCollection,
    InstitutionCollections,
    AllInstitutions,
}

impl ScanMode {
    #[must_use]
    pub const fn all_modes() -> [Self; 3] {
        [
            Self::SingleCollection,
            Self::InstitutionCollections,
            Self::AllInstitutions,
        ]
    }

    /// `scanModeApplied` 欄位中記錄的文字
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SingleCollection => "Single Collection",
            Self::InstitutionCollections => "All Collections (selected institution)",
            Self::AllInstitutions => "All Institutions + Collections",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all_modes()
            .into_iter()
            .find(|mode| mode.label() == label.trim())
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 使用者選擇的掃描範圍
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSelection {
    pub mode: ScanMode,
    pub institution: Option<String>,
    pub collection: Option<String>,
}

impl ScanSelection {
    #[must_use]
    pub fn single(institution: &str, collection: &str) -> Self {
        Self {
            mode: ScanMode::SingleCollection,
            institution: Some(institution.to_string()),
            collection: Some(collection.to_string()),
        }
    }

    #[must_use]
    pub fn institution(institution: &str) -> Self {
        Self {
            mode: ScanMode::InstitutionCollections,
            institution: Some(institution.to_string()),
            collection: None,
        }
    }

    #[must_use]
    pub const fn everything() -> Self {
        Self {
            mode: ScanMode::AllInstitutions,
            institution: None,
            collection: None,
        }
    }

    #[must_use]
    pub fn includes(&self, institution: &str, collection: &str) -> bool {
        match self.mode {
            ScanMode::SingleCollection => {
                self.institution.as_deref() == Some(institution)
                    && self.collection.as_deref() == Some(collection)
            }
            ScanMode::InstitutionCollections => self.institution.as_deref() == Some(institution),
            ScanMode::AllInstitutions => true,
        }
    }
}

/// 單次執行的所有狀態，取代全域變數
pub struct RunContext {
    pub root: PathBuf,
    pub mapping: MappingTable,
    pub selection: ScanSelection,
    pub file_filter: FileFilter,
    pub extensions: HashSet<String>,
    pub output_choice: OutputChoice,
    pub asset_type_table: AssetTypeTable,
    pub date_resolver: DateResolver,
    pub run_timestamp: String,
    pub shutdown_signal: Arc<AtomicBool>,
}

impl RunContext {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        root: PathBuf,
        mapping: MappingTable,
        selection: ScanSelection,
        file_filter: FileFilter,
        output_choice: OutputChoice,
        asset_type_table: AssetTypeTable,
        date_resolver: DateResolver,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        let extensions = asset_type_table.extensions_for(file_filter);
        Self {
            root,
            mapping,
            selection,
            file_filter,
            extensions,
            output_choice,
            asset_type_table,
            date_resolver,
            run_timestamp: Local::now().format(RUN_TIMESTAMP_FORMAT).to_string(),
            shutdown_signal,
        }
    }

    #[must_use]
    pub fn scan_mode(&self) -> ScanMode {
        self.selection.mode
    }

    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.shutdown_signal.load(Ordering::SeqCst)
    }

    /// 副檔名是否符合目前的篩選條件
    #[must_use]
    pub fn matches_filter(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .contains(&format!(".{}", ext.to_lowercase()))
            })
    }
}
