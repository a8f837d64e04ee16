//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod metadata_sheet_generator;
pub mod tiff_name_collector;

pub use metadata_sheet_generator::MetadataSheetGenerator;
pub use tiff_name_collector::TiffNameCollector;
