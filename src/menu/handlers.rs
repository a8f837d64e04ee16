use crate::component::{MetadataSheetGenerator, TiffNameCollector};
use crate::config::Config;
use crate::config::load::SETTINGS_FILE;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use log::warn;
use rust_i18n::t;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_metadata_sheet_generator(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let generator = MetadataSheetGenerator::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = generator.run() {
        warn!("Metadata sheet generator failed: {e:#}");
        eprintln!("{} {:#}", style(t!("main_menu.error_prefix")).red().bold(), e);
    }

    // 元件會儲存最近路徑與選項，重新讀回以保持選單中的設定一致
    if let Ok(settings) = Config::load_settings(Path::new(SETTINGS_FILE)) {
        config.settings = settings;
    }

    pause(term)?;
    Ok(())
}

pub fn run_tiff_name_collector(term: &Term) -> Result<()> {
    let collector = TiffNameCollector::new();

    if let Err(e) = collector.run() {
        warn!("TIFF name collector failed: {e:#}");
        eprintln!("{} {:#}", style(t!("main_menu.error_prefix")).red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
