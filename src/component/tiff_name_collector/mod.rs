//! TIFF 檔名清單元件
//!
//! 列出機構資料夾中所有 TIFF 檔案（資料夾、檔名、完整路徑、相對路徑），輸出成 Excel

mod main;
mod tiff_collector;

pub use main::TiffNameCollector;
pub use tiff_collector::{
    TIFF_LIST_COLUMNS, TIFF_LIST_FILE, TiffEntry, collect_tiff_files, write_tiff_list,
};
