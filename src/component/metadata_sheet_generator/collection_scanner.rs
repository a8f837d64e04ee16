//! 單一典藏資料夾掃描
//!
//! 走訪 `<root>/<category>/<institution>/<collection>`，每個符合篩選條件的檔案產生一筆紀錄。

use super::asset_record::{AssetRecord, METADATA_FORMAT, METADATA_SUBJECT, columns};
use super::mapping_table::MappingRow;
use super::run_context::{METADATA_DIR, RunContext};
use crate::tools::{
    has_path_segment, image_document_id, metadata_document_id, relative_slash_path,
};
use log::{debug, info};
use std::path::Path;
use walkdir::WalkDir;

/// 掃描一個典藏資料夾。資料夾不存在時回傳空清單。
pub fn scan_collection(
    ctx: &RunContext,
    category: &str,
    institution_code: &str,
    collection_code: &str,
    mapping_row: &MappingRow,
) -> Vec<AssetRecord> {
    let collection_root = ctx
        .root
        .join(category)
        .join(institution_code)
        .join(collection_code);

    if !collection_root.is_dir() {
        debug!("典藏資料夾不存在: {}", collection_root.display());
        return Vec::new();
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(&collection_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
    {
        if ctx.is_interrupted() {
            info!("掃描 {} 時中斷", collection_root.display());
            break;
        }
        if !ctx.matches_filter(entry.path()) {
            continue;
        }

        records.push(build_record(
            ctx,
            entry.path(),
            category,
            institution_code,
            collection_code,
            mapping_row,
        ));
    }

    info!(
        "已掃描 {category}/{institution_code}/{collection_code}: {} 個檔案",
        records.len()
    );
    records
}

fn build_record(
    ctx: &RunContext,
    full_path: &Path,
    category: &str,
    institution_code: &str,
    collection_code: &str,
    mapping_row: &MappingRow,
) -> AssetRecord {
    let relative_path = relative_slash_path(full_path, &ctx.root);
    let file_name = full_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base_name = full_path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = full_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    let relative = full_path.strip_prefix(&ctx.root).unwrap_or(full_path);
    let asset_category = if has_path_segment(relative, METADATA_DIR) {
        format!("{category}_{METADATA_DIR}")
    } else {
        category.to_string()
    };

    let is_metadata = format == METADATA_FORMAT;
    let document_id = if is_metadata {
        metadata_document_id(institution_code, collection_code, category, &relative_path)
    } else {
        image_document_id(institution_code, collection_code, &base_name, &relative_path)
    };

    let description = describe(ctx, &base_name, mapping_row, collection_code);
    let subject = if is_metadata {
        METADATA_SUBJECT.to_string()
    } else {
        mapping_row.get(columns::SUBJECT).to_string()
    };

    let mut record = AssetRecord {
        document_id,
        title: base_name,
        file_name,
        full_path: full_path.to_string_lossy().into_owned(),
        relative_path,
        format,
        asset_category,
        date_created: ctx.date_resolver.resolve_date(full_path),
        scan_mode_applied: ctx.scan_mode().label().to_string(),
        ..AssetRecord::default()
    };
    record.set(columns::INSTITUTION_CODE, institution_code);
    record.set(columns::COLLECTION_CODE, collection_code);
    record.set(
        columns::INSTITUTION_NAME,
        ctx.asset_type_table.institution_name(institution_code),
    );
    record.set(columns::DESCRIPTION, description);
    record.set(columns::SUBJECT, subject);

    copy_mapping_columns(&mut record, ctx.mapping.columns(), mapping_row);
    record
}

/// 視角描述 → 對應表描述 → 典藏代碼
fn describe(
    ctx: &RunContext,
    base_name: &str,
    mapping_row: &MappingRow,
    collection_code: &str,
) -> String {
    let view = ctx.asset_type_table.view_description(base_name);
    if !view.is_empty() {
        return view;
    }

    let mapped = mapping_row.get(columns::DESCRIPTION);
    if !mapped.is_empty() {
        return mapped.to_string();
    }

    collection_code.to_string()
}

/// 對應表中尚未由掃描邏輯設定的欄位全部複製到紀錄上
pub fn copy_mapping_columns(record: &mut AssetRecord, mapping_columns: &[String], row: &MappingRow) {
    for column in mapping_columns {
        if !record.has_column(column) {
            record.set(column, row.get(column));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::metadata_sheet_generator::mapping_table::MappingTable;
    use crate::component::metadata_sheet_generator::run_context::ScanSelection;
    use crate::config::{Config, FileFilter, OutputChoice};
    use crate::tools::DateResolver;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use tempfile::TempDir;

    const MAPPING_COLUMNS: [&str; 10] = [
        "institutionCode",
        "collectionCode",
        "creator",
        "contributor",
        "license",
        "rightsHolder",
        "holdingInstitution",
        "description",
        "subject",
        "additionalNames",
    ];

    fn mapping_row() -> MappingRow {
        MappingRow::from_pairs([
            ("institutionCode", "ISAM"),
            ("collectionCode", "MAM001"),
            ("creator", "Jane Doe"),
            ("contributor", "Imaging Lab"),
            ("license", "CC-BY 4.0"),
            ("rightsHolder", "Iziko"),
            ("holdingInstitution", "Iziko Museums"),
            ("description", "Mammal skulls"),
            ("subject", "Mammalia"),
            ("additionalNames", ""),
        ])
    }

    fn context(root: &Path, filter: FileFilter) -> RunContext {
        let mapping = MappingTable::new(
            MAPPING_COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![mapping_row()],
        )
        .unwrap();
        RunContext::new(
            root.to_path_buf(),
            mapping,
            ScanSelection::single("ISAM", "MAM001"),
            filter,
            OutputChoice::CsvOnly,
            Config::load_embedded_asset_type_table().unwrap(),
            DateResolver::new(Vec::new()),
            Arc::new(AtomicBool::new(false)),
        )
    }

    fn collection_dir(root: &Path) -> std::path::PathBuf {
        let dir = root.join("scans").join("ISAM").join("MAM001");
        fs::create_dir_all(dir.join("metadata")).unwrap();
        dir
    }

    #[test]
    fn test_scan_builds_records_per_matching_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = collection_dir(temp_dir.path());
        fs::write(dir.join("photo1.tif"), b"a").unwrap();
        fs::write(dir.join("photo1_cd.tif"), b"b").unwrap();
        fs::write(dir.join("notes.csv"), b"c").unwrap();
        fs::write(dir.join("readme.txt"), b"d").unwrap();

        let ctx = context(temp_dir.path(), FileFilter::All);
        let records = scan_collection(&ctx, "scans", "ISAM", "MAM001", &mapping_row());
        assert_eq!(records.len(), 3);

        let dorsal = records.iter().find(|r| r.title == "photo1_cd").unwrap();
        assert_eq!(dorsal.description(), "Dorsal view of specimen cranium");
        assert_eq!(dorsal.attribute("subject"), "Mammalia");
        assert_eq!(dorsal.relative_path, "scans/ISAM/MAM001/photo1_cd.tif");
        assert_eq!(
            dorsal.document_id,
            image_document_id("ISAM", "MAM001", "photo1_cd", "scans/ISAM/MAM001/photo1_cd.tif")
        );

        let plain = records.iter().find(|r| r.title == "photo1").unwrap();
        assert_eq!(plain.description(), "Mammal skulls");
        assert_eq!(plain.attribute("license"), "CC-BY 4.0");
        assert_eq!(plain.attribute("institutionName"), "Iziko Museum of South Africa");

        let notes = records.iter().find(|r| r.title == "notes").unwrap();
        assert_eq!(notes.attribute("subject"), "Metadata");
        assert_eq!(notes.format, ".csv");
        assert_eq!(
            notes.document_id,
            metadata_document_id("ISAM", "MAM001", "scans", "scans/ISAM/MAM001/notes.csv")
        );
    }

    #[test]
    fn test_metadata_subfolder_gets_category_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let dir = collection_dir(temp_dir.path());
        fs::write(dir.join("metadata").join("summary.csv"), b"x").unwrap();
        fs::write(dir.join("skull.tif"), b"y").unwrap();

        let ctx = context(temp_dir.path(), FileFilter::All);
        let records = scan_collection(&ctx, "scans", "ISAM", "MAM001", &mapping_row());

        let summary = records.iter().find(|r| r.file_name == "summary.csv").unwrap();
        assert_eq!(summary.asset_category, "scans_metadata");
        let skull = records.iter().find(|r| r.file_name == "skull.tif").unwrap();
        assert_eq!(skull.asset_category, "scans");
    }

    #[test]
    fn test_filter_and_case_insensitive_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let dir = collection_dir(temp_dir.path());
        fs::write(dir.join("A.TIF"), b"a").unwrap();
        fs::write(dir.join("b.jpg"), b"b").unwrap();
        fs::write(dir.join("c.NEF"), b"c").unwrap();

        let ctx = context(temp_dir.path(), FileFilter::TiffOnly);
        let records = scan_collection(&ctx, "scans", "ISAM", "MAM001", &mapping_row());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].format, ".tif");
    }

    #[test]
    fn test_missing_collection_folder_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path(), FileFilter::All);
        let records = scan_collection(&ctx, "scans", "ISAM", "MAM404", &mapping_row());
        assert!(records.is_empty());
    }

    #[test]
    fn test_rescan_yields_same_ids() {
        let temp_dir = TempDir::new().unwrap();
        let dir = collection_dir(temp_dir.path());
        fs::write(dir.join("photo1.tif"), b"a").unwrap();

        let ctx = context(temp_dir.path(), FileFilter::All);
        let first = scan_collection(&ctx, "scans", "ISAM", "MAM001", &mapping_row());
        let second = scan_collection(&ctx, "scans", "ISAM", "MAM001", &mapping_row());
        assert_eq!(first[0].document_id, second[0].document_id);
    }

    #[test]
    fn test_copy_mapping_columns_does_not_overwrite() {
        let mut record = AssetRecord::default();
        record.set("description", "View");
        let mapping_columns: Vec<String> = MAPPING_COLUMNS.iter().map(|c| c.to_string()).collect();

        copy_mapping_columns(&mut record, &mapping_columns, &mapping_row());
        assert_eq!(record.description(), "View");
        assert_eq!(record.attribute("creator"), "Jane Doe");
        assert_eq!(record.attribute("additionalNames"), "");
        assert!(record.has_column("additionalNames"));
    }
}
