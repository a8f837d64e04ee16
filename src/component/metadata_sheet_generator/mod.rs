//! 數位資產中介資料表產生器
//!
//! 掃描 `類別/機構/典藏` 資料夾中的影像與中介資料檔，結合機構提供的對應表，
//! 產生每個典藏的子集 CSV，並將新紀錄合併到累積的總清冊。
//!
//! 總清冊沒有鎖定機制，同一個根目錄不可同時執行兩次。

mod asset_record;
mod collection_scanner;
mod inventory;
mod inventory_merger;
mod main;
mod mapping_table;
mod run_context;
mod sheet_generator;

pub use asset_record::{
    AssetRecord, METADATA_FORMAT, METADATA_SUBJECT, SYSTEM_COLUMNS, columns, order_columns,
};
pub use collection_scanner::{copy_mapping_columns, scan_collection};
pub use inventory::{Inventory, REQUIRED_INVENTORY_COLUMNS};
pub use inventory_merger::{merge, metadata_description};
pub use main::MetadataSheetGenerator;
pub use mapping_table::{MappingRow, MappingTable, REQUIRED_MAPPING_COLUMNS};
pub use run_context::{
    MAPPING_DIR, MAPPING_FILE, MASTER_CSV_FILE, MASTER_XLSX_FILE, METADATA_DIR, OUTPUT_DIR,
    RunContext, ScanMode, ScanSelection, mapping_table_path, master_csv_path, master_xlsx_path,
};
pub use sheet_generator::{CollectionTarget, PendingSubset, RunReport, ScanOutcome, SheetGenerator};
