use super::mapping_table::MappingTable;
use super::run_context::{RunContext, ScanMode, ScanSelection, mapping_table_path};
use super::sheet_generator::{RunReport, SheetGenerator};
use crate::config::save::{add_recent_path, save_settings};
use crate::config::{Config, FileFilter, OutputChoice};
use crate::tools::{DateResolver, open_in_default_app, validate_directory_exists};
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 數位資產中介資料表產生器元件
pub struct MetadataSheetGenerator {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl MetadataSheetGenerator {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style(t!("generator.title")).cyan().bold());

        let Some(input_path) = self.prompt_root_folder()? else {
            return Ok(()); // ESC pressed
        };
        let root = PathBuf::from(&input_path);
        validate_directory_exists(&root)?;

        // 沒有對應表就不掃描
        let mapping = MappingTable::load(&mapping_table_path(&root))?;
        println!(
            "{}",
            style(t!(
                "generator.mapping_loaded",
                count = mapping.rows().len()
            ))
            .dim()
        );

        let Some(selection) = self.prompt_selection(&mapping)? else {
            return Ok(());
        };
        let Some(file_filter) = self.prompt_file_filter()? else {
            return Ok(());
        };
        let Some(output_choice) = self.prompt_output_choice()? else {
            return Ok(());
        };

        {
            let mut settings = self.config.settings.clone();
            add_recent_path(&mut settings, &input_path);
            settings.file_filter = file_filter;
            settings.output_choice = output_choice;
            if let Err(e) = save_settings(&settings) {
                warn!("無法儲存設定: {e}");
            }
        }

        if !self.confirm_start()? {
            println!("{}", style(t!("common.cancelled")).yellow());
            return Ok(());
        }

        // 上一次執行的 Ctrl-C 不影響這次
        self.shutdown_signal.store(false, Ordering::SeqCst);

        let date_resolver = DateResolver::standard(
            &self.config.asset_type_table,
            &self.config.settings.exiftool_program,
        );
        let ctx = RunContext::new(
            root,
            mapping,
            selection,
            file_filter,
            output_choice,
            self.config.asset_type_table.clone(),
            date_resolver,
            Arc::clone(&self.shutdown_signal),
        );
        let generator = SheetGenerator::new(ctx);

        println!("{}", style(t!("generator.scanning")).dim());
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        let report = generator.run(&progress)?;
        self.print_report(&report);

        if !report.interrupted {
            self.offer_to_open(&report, output_choice)?;
        }

        Ok(())
    }

    fn prompt_root_folder(&self) -> Result<Option<String>> {
        let recent_paths = &self.config.settings.recent_paths;

        if recent_paths.is_empty() {
            let path: String = Input::new()
                .with_prompt(t!("generator.root_prompt"))
                .interact_text()?;
            return Ok(Some(path.trim().to_string()));
        }

        let mut options: Vec<String> = recent_paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let indicator = if Path::new(p).exists() { "✓" } else { "✗" };
                format!("{} [{}] {}", i + 1, indicator, p)
            })
            .collect();
        options.push(t!("common.new_path").to_string());

        println!("{}", style(t!("common.esc_hint")).dim());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("generator.root_select"))
            .items(&options)
            .default(0)
            .interact_opt()?;

        match selection {
            None => Ok(None),
            Some(idx) if idx < recent_paths.len() => Ok(Some(recent_paths[idx].clone())),
            Some(_) => {
                let path: String = Input::new()
                    .with_prompt(t!("generator.root_prompt"))
                    .interact_text()?;
                Ok(Some(path.trim().to_string()))
            }
        }
    }

    fn prompt_selection(&self, mapping: &MappingTable) -> Result<Option<ScanSelection>> {
        let modes = ScanMode::all_modes();
        let items: Vec<&str> = modes.iter().map(ScanMode::label).collect();

        let Some(mode_index) = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("generator.mode_prompt"))
            .items(&items)
            .default(0)
            .interact_opt()?
        else {
            return Ok(None);
        };

        let mode = modes[mode_index];
        if mode == ScanMode::AllInstitutions {
            return Ok(Some(ScanSelection::everything()));
        }

        let institutions = mapping.institutions();
        let Some(institution) =
            pick_one(&t!("generator.institution_prompt"), &institutions)?
        else {
            return Ok(None);
        };

        if mode == ScanMode::InstitutionCollections {
            return Ok(Some(ScanSelection::institution(&institution)));
        }

        let collections = mapping.collections(&institution);
        let Some(collection) = pick_one(&t!("generator.collection_prompt"), &collections)? else {
            return Ok(None);
        };

        Ok(Some(ScanSelection::single(&institution, &collection)))
    }

    fn prompt_file_filter(&self) -> Result<Option<FileFilter>> {
        let filters = FileFilter::all_filters();
        let items: Vec<&str> = filters.iter().map(FileFilter::as_str).collect();
        let default_index = filters
            .iter()
            .position(|&f| f == self.config.settings.file_filter)
            .unwrap_or(0);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("generator.filter_prompt"))
            .items(&items)
            .default(default_index)
            .interact_opt()?;

        Ok(selection.map(|idx| filters[idx]))
    }

    fn prompt_output_choice(&self) -> Result<Option<OutputChoice>> {
        let choices = OutputChoice::all_choices();
        let items: Vec<&str> = choices.iter().map(OutputChoice::as_str).collect();
        let default_index = choices
            .iter()
            .position(|&c| c == self.config.settings.output_choice)
            .unwrap_or(0);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("generator.output_prompt"))
            .items(&items)
            .default(default_index)
            .interact_opt()?;

        Ok(selection.map(|idx| choices[idx]))
    }

    fn confirm_start(&self) -> Result<bool> {
        let confirm = Confirm::new()
            .with_prompt(t!("generator.confirm_start"))
            .default(true)
            .interact()?;
        Ok(confirm)
    }

    fn offer_to_open(&self, report: &RunReport, output_choice: OutputChoice) -> Result<()> {
        let mut files: Vec<&PathBuf> = Vec::new();
        if output_choice.includes_csv() {
            files.extend(report.master_csv.as_ref());
        }
        if output_choice.includes_excel() {
            files.extend(report.master_xlsx.as_ref());
        }
        if files.is_empty() {
            return Ok(());
        }

        let open = Confirm::new()
            .with_prompt(t!("generator.confirm_open"))
            .default(false)
            .interact()?;
        if !open {
            return Ok(());
        }

        for file in files {
            if let Err(e) = open_in_default_app(file) {
                warn!("無法開啟 {}: {e:#}", file.display());
                println!(
                    "{} {}",
                    style(t!("generator.open_failed")).red(),
                    file.display()
                );
            }
        }
        Ok(())
    }

    fn print_report(&self, report: &RunReport) {
        println!();
        println!("{}", style(t!("generator.summary_title")).cyan().bold());

        if report.interrupted {
            println!("{}", style(t!("generator.interrupted")).yellow());
            return;
        }

        println!(
            "  {}",
            t!("generator.summary_collections", count = report.collections_scanned)
        );
        if report.collections_skipped > 0 {
            println!(
                "  {}",
                style(t!(
                    "generator.summary_skipped",
                    count = report.collections_skipped
                ))
                .yellow()
            );
        }
        println!(
            "  {}",
            t!("generator.summary_files", count = report.files_recorded)
        );
        println!(
            "  {}",
            style(t!("generator.summary_added", count = report.rows_added)).green()
        );
        println!(
            "  {}",
            style(t!(
                "generator.summary_present",
                count = report.rows_already_present
            ))
            .dim()
        );
        for subset in &report.subsets_written {
            println!("  {} {}", style("→").dim(), subset.display());
        }
        if let Some(master_csv) = &report.master_csv {
            println!(
                "  {} {}",
                style(t!("generator.summary_master")).green(),
                master_csv.display()
            );
        }
        if let Some(master_xlsx) = &report.master_xlsx {
            println!(
                "  {} {}",
                style(t!("generator.summary_master")).green(),
                master_xlsx.display()
            );
        }

        info!(
            "中介資料清冊完成 - 典藏: {}, 檔案: {}, 新增: {}",
            report.collections_scanned, report.files_recorded, report.rows_added
        );
    }
}

fn pick_one(prompt: &str, options: &[String]) -> Result<Option<String>> {
    if options.is_empty() {
        anyhow::bail!("{}", t!("generator.no_options"));
    }

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact_opt()?;

    Ok(selection.map(|idx| options[idx].clone()))
}
