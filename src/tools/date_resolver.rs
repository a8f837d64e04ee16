//! 建立日期解析
//!
//! 依序嘗試多個日期來源，第一個有結果的來源勝出。
//! 任何來源失敗（工具不存在、檔案損毀、格式不支援）都視為「沒有結果」並繼續往下。

use super::exif_reader::read_embedded_date;
use super::exiftool_probe::probe_date;
use crate::config::{AssetTypeTable, DEFAULT_EXIFTOOL_PROGRAM};
use chrono::{DateTime, Local};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

pub trait DateSource {
    fn name(&self) -> &'static str;
    fn resolve(&self, path: &Path) -> Option<String>;
}

/// 外部 exiftool 指令
pub struct ExiftoolDateSource {
    program: String,
}

impl ExiftoolDateSource {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DateSource for ExiftoolDateSource {
    fn name(&self) -> &'static str {
        "exiftool"
    }

    fn resolve(&self, path: &Path) -> Option<String> {
        match probe_date(&self.program, path) {
            Ok(date) => date.filter(|d| !d.is_empty()),
            Err(e) => {
                debug!("exiftool 沒有取得日期 {}: {e:#}", path.display());
                None
            }
        }
    }
}

/// 影像內嵌 EXIF，RAW 檔略過
pub struct EmbeddedExifDateSource {
    raw_extensions: HashSet<String>,
}

impl EmbeddedExifDateSource {
    #[must_use]
    pub fn new(table: &AssetTypeTable) -> Self {
        Self {
            raw_extensions: table.raw_file.iter().map(|ext| ext.to_lowercase()).collect(),
        }
    }

    fn is_raw(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.raw_extensions
                    .contains(&format!(".{}", ext.to_lowercase()))
            })
    }
}

impl DateSource for EmbeddedExifDateSource {
    fn name(&self) -> &'static str {
        "embedded-exif"
    }

    fn resolve(&self, path: &Path) -> Option<String> {
        if self.is_raw(path) {
            return None;
        }
        match read_embedded_date(path) {
            Ok(date) => date,
            Err(e) => {
                debug!("沒有內嵌日期 {}: {e:#}", path.display());
                None
            }
        }
    }
}

/// 檔案系統時間戳（建立時間，平台不支援時改用修改時間）
pub struct FilesystemDateSource;

impl DateSource for FilesystemDateSource {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn resolve(&self, path: &Path) -> Option<String> {
        let metadata = fs::metadata(path).ok()?;
        let timestamp = metadata.created().or_else(|_| metadata.modified()).ok()?;
        let local: DateTime<Local> = timestamp.into();
        Some(local.format(DATE_FORMAT).to_string())
    }
}

pub struct DateResolver {
    sources: Vec<Box<dyn DateSource>>,
}

impl DateResolver {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn DateSource>>) -> Self {
        Self { sources }
    }

    /// exiftool → 內嵌 EXIF → 檔案系統
    #[must_use]
    pub fn standard(table: &AssetTypeTable, exiftool_program: &str) -> Self {
        let program = if exiftool_program.trim().is_empty() {
            DEFAULT_EXIFTOOL_PROGRAM
        } else {
            exiftool_program
        };

        Self::new(vec![
            Box::new(ExiftoolDateSource::new(program)),
            Box::new(EmbeddedExifDateSource::new(table)),
            Box::new(FilesystemDateSource),
        ])
    }

    /// 回傳正規化的日期，所有來源都沒有結果時回傳空字串
    #[must_use]
    pub fn resolve_date(&self, path: &Path) -> String {
        for source in &self.sources {
            if let Some(date) = source.resolve(path) {
                debug!("{} 取得日期 {} -> {date}", source.name(), path.display());
                return date;
            }
        }
        String::new()
    }
}
