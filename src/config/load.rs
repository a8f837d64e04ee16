use crate::config::types::{AssetTypeTable, Config, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// 編譯時嵌入的資產類型設定（副檔名、視角代碼、機構名稱）
const ASSET_TYPE_TABLE_JSON: &str = include_str!("../data/asset_type_table.json");

pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    pub fn new() -> Result<Self> {
        let asset_type_table = Self::load_embedded_asset_type_table()?;
        let settings = Self::load_settings(Path::new(SETTINGS_FILE)).unwrap_or_else(|e| {
            warn!("Falling back to default settings: {e:#}");
            UserSettings::default()
        });

        Ok(Self {
            asset_type_table,
            settings,
        })
    }

    pub fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    pub fn load_embedded_asset_type_table() -> Result<AssetTypeTable> {
        serde_json::from_str(ASSET_TYPE_TABLE_JSON).context("Failed to parse embedded asset type table")
    }
}
