use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;

/// 以系統預設程式開啟檔案
pub fn open_in_default_app(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };

    let status = command
        .arg(path)
        .status()
        .with_context(|| format!("無法開啟檔案: {}", path.display()))?;

    if !status.success() {
        bail!("開啟 {} 失敗，結束狀態: {status}", path.display());
    }

    Ok(())
}
