pub mod load;
pub mod save;
pub mod types;

pub use types::{
    AssetTypeTable, Config, DEFAULT_EXIFTOOL_PROGRAM, FileFilter, Language, MAX_RECENT_PATHS,
    OutputChoice, UserSettings,
};
