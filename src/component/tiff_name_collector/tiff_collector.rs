use crate::tools::{relative_slash_path, write_xlsx_table};
use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const TIFF_LIST_FILE: &str = "tiff_files_list.xlsx";

pub const TIFF_LIST_COLUMNS: [&str; 5] = [
    "Institution Name",
    "Folder Name",
    "File Name",
    "Full Path",
    "Relative Path",
];

const TIFF_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiffEntry {
    pub institution_name: String,
    pub folder_name: String,
    pub file_name: String,
    pub full_path: PathBuf,
    pub relative_path: String,
}

impl TiffEntry {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.institution_name.clone(),
            self.folder_name.clone(),
            self.file_name.clone(),
            self.full_path.to_string_lossy().into_owned(),
            self.relative_path.clone(),
        ]
    }
}

/// 遞迴列出機構資料夾中所有 TIFF 檔案，機構名稱取自所選資料夾名稱
#[must_use]
pub fn collect_tiff_files(institution_dir: &Path) -> Vec<TiffEntry> {
    let institution_name = institution_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let entries: Vec<TiffEntry> = WalkDir::new(institution_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_tiff(entry.path()))
        .map(|entry| {
            let folder_name = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            TiffEntry {
                institution_name: institution_name.clone(),
                folder_name,
                file_name: entry.file_name().to_string_lossy().into_owned(),
                relative_path: relative_slash_path(entry.path(), institution_dir),
                full_path: entry.into_path(),
            }
        })
        .collect();

    info!(
        "在 {} 找到 {} 個 TIFF 檔案",
        institution_dir.display(),
        entries.len()
    );
    entries
}

/// 寫出 TIFF 清單，回傳輸出路徑
pub fn write_tiff_list(institution_dir: &Path, entries: &[TiffEntry]) -> Result<PathBuf> {
    let output_path = institution_dir.join(TIFF_LIST_FILE);
    let headers: Vec<String> = TIFF_LIST_COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows: Vec<Vec<String>> = entries.iter().map(TiffEntry::to_row).collect();

    write_xlsx_table(&output_path, &headers, &rows)?;
    Ok(output_path)
}

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TIFF_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext)))
}
