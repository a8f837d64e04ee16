use super::asset_record::{AssetRecord, METADATA_FORMAT, METADATA_SUBJECT, columns};
use super::collection_scanner::{copy_mapping_columns, scan_collection};
use super::inventory::Inventory;
use super::inventory_merger::merge;
use super::run_context::{
    METADATA_DIR, RunContext, is_reserved_dir, master_csv_path, master_xlsx_path,
};
use crate::tools::{DATE_FORMAT, metadata_document_id, relative_slash_path};
use anyhow::{Context, Result};
use chrono::Local;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 一個待掃描的典藏資料夾
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTarget {
    pub category: String,
    pub institution: String,
    pub collection: String,
}

/// 掃描結束後才寫出的單一典藏子集檔案
#[derive(Debug, Clone)]
pub struct PendingSubset {
    pub path: PathBuf,
    pub inventory: Inventory,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<AssetRecord>,
    pub subsets: Vec<PendingSubset>,
    pub collections_scanned: usize,
    pub collections_skipped: usize,
    pub files_recorded: usize,
    pub interrupted: bool,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub collections_scanned: usize,
    /// 對應表中找不到的典藏
    pub collections_skipped: usize,
    pub files_recorded: usize,
    pub rows_added: usize,
    pub rows_already_present: usize,
    pub inventory_rows: usize,
    pub subsets_written: Vec<PathBuf>,
    pub master_csv: Option<PathBuf>,
    pub master_xlsx: Option<PathBuf>,
    pub interrupted: bool,
}

pub struct SheetGenerator {
    ctx: RunContext,
}

impl SheetGenerator {
    #[must_use]
    pub const fn new(ctx: RunContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub const fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// 依 類別 → 機構 → 典藏 的順序找出符合掃描範圍的資料夾
    pub fn discover_collections(&self) -> Result<Vec<CollectionTarget>> {
        let mut targets = Vec::new();

        for category in sorted_subdirs(&self.ctx.root)? {
            if is_reserved_dir(&category) {
                continue;
            }
            let category_path = self.ctx.root.join(&category);
            for institution in sorted_subdirs(&category_path)? {
                let institution_path = category_path.join(&institution);
                for collection in sorted_subdirs(&institution_path)? {
                    if !self.ctx.selection.includes(&institution, &collection) {
                        continue;
                    }
                    targets.push(CollectionTarget {
                        category: category.clone(),
                        institution: institution.clone(),
                        collection,
                    });
                }
            }
        }

        Ok(targets)
    }

    /// 掃描所有目標典藏，不寫出任何檔案
    pub fn scan(&self, targets: &[CollectionTarget], progress: &ProgressBar) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for target in targets {
            if self.ctx.is_interrupted() {
                outcome.interrupted = true;
                break;
            }
            progress.set_message(format!(
                "{}/{}/{}",
                target.category, target.institution, target.collection
            ));

            let Some(mapping_row) = self
                .ctx
                .mapping
                .find(&target.institution, &target.collection)
            else {
                debug!(
                    "對應表中沒有 {}/{}，略過",
                    target.institution, target.collection
                );
                outcome.collections_skipped += 1;
                progress.inc(1);
                continue;
            };

            let records = scan_collection(
                &self.ctx,
                &target.category,
                &target.institution,
                &target.collection,
                mapping_row,
            );
            outcome.collections_scanned += 1;
            outcome.files_recorded += records.len();

            // 子集只收類別本身的影像，不含 metadata 子資料夾中的檔案
            let subset_records: Vec<AssetRecord> = records
                .iter()
                .filter(|r| r.format != METADATA_FORMAT && r.asset_category == target.category)
                .cloned()
                .collect();
            outcome.records.extend(records);

            if !subset_records.is_empty() {
                let subset_path = self.subset_path(target);
                outcome
                    .records
                    .push(self.subset_record(target, &subset_path));
                outcome.subsets.push(PendingSubset {
                    path: subset_path,
                    inventory: Inventory::from_records(subset_records, self.ctx.mapping.columns()),
                });
            }

            progress.inc(1);
        }

        if self.ctx.is_interrupted() {
            outcome.interrupted = true;
        }
        outcome
    }

    /// 完整執行：掃描、合併、寫出。中斷時不寫出任何檔案。
    pub fn run(&self, progress: &ProgressBar) -> Result<RunReport> {
        let targets = self.discover_collections()?;
        info!("找到 {} 個待掃描的典藏資料夾", targets.len());
        progress.set_length(targets.len() as u64);

        let outcome = self.scan(&targets, progress);
        progress.finish_and_clear();

        let mut report = RunReport {
            collections_scanned: outcome.collections_scanned,
            collections_skipped: outcome.collections_skipped,
            files_recorded: outcome.files_recorded,
            interrupted: outcome.interrupted,
            ..RunReport::default()
        };

        if outcome.interrupted {
            warn!("執行已中斷，未寫出任何檔案");
            return Ok(report);
        }

        let master_csv = master_csv_path(&self.ctx.root);
        // 讀不了的總清冊不可覆寫，直接回報錯誤
        let existing = Inventory::load(&master_csv)
            .with_context(|| format!("無法讀取總清冊，未寫出任何檔案: {}", master_csv.display()))?;
        let existing_rows = if existing.is_well_formed() {
            existing.len()
        } else {
            0
        };
        let new_count = outcome.records.len();

        let updated = merge(existing, outcome.records, &self.ctx.mapping);
        report.rows_added = updated.len() - existing_rows;
        report.rows_already_present = new_count - report.rows_added;
        report.inventory_rows = updated.len();

        for subset in &outcome.subsets {
            subset.inventory.write_csv(&subset.path)?;
            info!("典藏中介資料 CSV 已產生: {}", subset.path.display());
            report.subsets_written.push(subset.path.clone());
        }

        // 兩種格式每次都寫出，輸出選項只決定要開啟哪個檔案
        updated.write_csv(&master_csv)?;
        report.master_csv = Some(master_csv);

        let master_xlsx = master_xlsx_path(&self.ctx.root);
        updated.write_xlsx(&master_xlsx)?;
        report.master_xlsx = Some(master_xlsx);

        info!(
            "總清冊已更新 - 列數: {}, 新增: {}, 已存在: {}",
            report.inventory_rows, report.rows_added, report.rows_already_present
        );

        Ok(report)
    }

    fn subset_path(&self, target: &CollectionTarget) -> PathBuf {
        self.ctx
            .root
            .join(&target.category)
            .join(&target.institution)
            .join(&target.collection)
            .join(METADATA_DIR)
            .join(format!(
                "{}_metadata_{}.csv",
                target.collection, self.ctx.run_timestamp
            ))
    }

    /// 描述子集檔案本身的中介資料紀錄，描述留空由合併時補上
    fn subset_record(&self, target: &CollectionTarget, subset_path: &Path) -> AssetRecord {
        let file_name = subset_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative_path = relative_slash_path(subset_path, &self.ctx.root);

        let mut record = AssetRecord {
            document_id: metadata_document_id(
                &target.institution,
                &target.collection,
                &target.category,
                &relative_path,
            ),
            title: file_name.clone(),
            file_name,
            full_path: subset_path.to_string_lossy().into_owned(),
            relative_path,
            format: METADATA_FORMAT.to_string(),
            asset_category: format!("{}_{METADATA_DIR}", target.category),
            date_created: Local::now().format(DATE_FORMAT).to_string(),
            scan_mode_applied: self.ctx.scan_mode().label().to_string(),
            ..AssetRecord::default()
        };
        record.set(columns::INSTITUTION_CODE, &target.institution);
        record.set(columns::COLLECTION_CODE, &target.collection);
        record.set(
            columns::INSTITUTION_NAME,
            self.ctx.asset_type_table.institution_name(&target.institution),
        );
        record.set(columns::DESCRIPTION, "");
        record.set(columns::SUBJECT, METADATA_SUBJECT);

        if let Some(row) = self.ctx.mapping.find(&target.institution, &target.collection) {
            copy_mapping_columns(&mut record, self.ctx.mapping.columns(), row);
        }
        record
    }
}

fn sorted_subdirs(path: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(path)
        .with_context(|| format!("無法列出資料夾: {}", path.display()))?
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}
