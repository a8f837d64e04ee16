use super::tiff_collector::{collect_tiff_files, write_tiff_list};
use crate::tools::validate_directory_exists;
use anyhow::Result;
use console::style;
use dialoguer::Input;
use log::info;
use rust_i18n::t;
use std::path::PathBuf;

/// TIFF 檔名清單元件
pub struct TiffNameCollector;

impl TiffNameCollector {
    pub const fn new() -> Self {
        Self
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style(t!("tiff.title")).cyan().bold());
        println!("{}", style(t!("tiff.intro")).dim());

        let input_path = self.prompt_input_path()?;
        let directory = PathBuf::from(&input_path);

        validate_directory_exists(&directory)?;

        println!("{}", style(t!("tiff.scanning")).dim());
        let entries = collect_tiff_files(&directory);

        if entries.is_empty() {
            println!("{}", style(t!("tiff.none_found")).yellow());
            return Ok(());
        }

        let output_path = write_tiff_list(&directory, &entries)?;
        println!(
            "{} {}",
            style(t!("tiff.created", count = entries.len())).green(),
            output_path.display()
        );
        info!("TIFF 清單已寫出: {}", output_path.display());

        Ok(())
    }

    fn prompt_input_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt(t!("tiff.prompt"))
            .interact_text()?;
        Ok(path.trim().to_string())
    }
}

impl Default for TiffNameCollector {
    fn default() -> Self {
        Self::new()
    }
}
