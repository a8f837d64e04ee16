//! 清冊合併
//!
//! 將本次掃描的新紀錄併入既有清冊：
//! 以 documentId 去重、補上中介資料檔描述、回填 additionalNames、整理欄位順序。
//! 既有紀錄的內容（包括人工填寫的描述）不會被覆寫。

use super::asset_record::{AssetRecord, columns, order_columns};
use super::inventory::Inventory;
use super::mapping_table::MappingTable;
use super::run_context::ScanMode;
use log::{debug, warn};
use std::collections::HashSet;

pub fn merge(
    existing: Inventory,
    new_records: Vec<AssetRecord>,
    mapping: &MappingTable,
) -> Inventory {
    let existing = if existing.is_well_formed() {
        existing
    } else {
        warn!("既有清冊缺少識別欄位，重建清冊");
        Inventory::default()
    };

    let (existing_columns, mut records) = existing.into_parts();
    let mut known_ids: HashSet<String> = records.iter().map(|r| r.document_id.clone()).collect();
    let mut present: HashSet<String> = existing_columns.into_iter().collect();

    let mut skipped = 0usize;
    for record in new_records {
        if !known_ids.insert(record.document_id.clone()) {
            skipped += 1;
            continue;
        }
        present.extend(record.column_names().map(str::to_string));
        records.push(record);
    }
    debug!("合併時略過 {skipped} 筆已存在的紀錄");

    for record in &mut records {
        fill_metadata_description(record);
        backfill_additional_names(record, mapping);
    }

    let columns = order_columns(|c| present.contains(c), mapping.columns());
    for record in &mut records {
        record.retain_columns(&columns);
    }

    Inventory::new(columns, records)
}

/// 中介資料 CSV 沒有描述時，依產生它的掃描模式補上描述
fn fill_metadata_description(record: &mut AssetRecord) {
    if !record.is_metadata_file() || !record.description().trim().is_empty() {
        return;
    }

    let description = metadata_description(
        ScanMode::from_label(&record.scan_mode_applied),
        record.institution_code(),
        record.collection_code(),
    );
    record.set(columns::DESCRIPTION, description);
}

#[must_use]
pub fn metadata_description(
    mode: Option<ScanMode>,
    institution_code: &str,
    collection_code: &str,
) -> String {
    match mode {
        Some(ScanMode::SingleCollection) => {
            format!("Metadata file for {institution_code}_{collection_code}")
        }
        Some(ScanMode::InstitutionCollections) => format!("Metadata file for {institution_code}"),
        Some(ScanMode::AllInstitutions) | None => "Metadata file for all collections".to_string(),
    }
}

fn backfill_additional_names(record: &mut AssetRecord, mapping: &MappingTable) {
    if !mapping.has_column(columns::ADDITIONAL_NAMES)
        || !record.attribute(columns::ADDITIONAL_NAMES).trim().is_empty()
    {
        return;
    }

    let Some(row) = mapping.find(record.institution_code(), record.collection_code()) else {
        return;
    };
    let names = row.get(columns::ADDITIONAL_NAMES);
    if !names.is_empty() {
        record.set(columns::ADDITIONAL_NAMES, names);
    }
}
