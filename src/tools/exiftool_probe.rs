use anyhow::{Context, Result, bail};
use regex::Regex;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

/// 依序向 exiftool 要求的日期標籤
pub const EXIFTOOL_DATE_TAGS: [&str; 5] = [
    "-DateTimeOriginal",
    "-CreateDate",
    "-DateCreated",
    "-XMP:CreateDate",
    "-XMP:DateCreated",
];

const NORMALIZED_DATE_LENGTH: usize = 19;

static REGEX_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[:\-](\d{2})[:\-](\d{2})[ T](\d{2}):(\d{2}):(\d{2})")
        .expect("Invalid regex")
});

/// 執行 exiftool 並回傳第一個非空白的日期行（已正規化）
pub fn probe_date(program: &str, path: &Path) -> Result<Option<String>> {
    let output = Command::new(program)
        .arg("-s3")
        .args(EXIFTOOL_DATE_TAGS)
        .arg(path)
        .stderr(Stdio::null())
        .output()
        .with_context(|| format!("無法執行 {program}: {}", path.display()))?;

    if !output.status.success() && output.stdout.is_empty() {
        bail!("{program} 結束狀態: {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(first_date_line(&stdout))
}

fn first_date_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(normalize_date_line)
}

/// 將日期分隔字元統一為 `YYYY:MM:DD HH:MM:SS`
#[must_use]
pub fn normalize_date_line(line: &str) -> String {
    if let Some(caps) = REGEX_DATE_TIME.captures(line) {
        return format!(
            "{}:{}:{} {}:{}:{}",
            &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6]
        );
    }

    line.replace('-', ":")
        .chars()
        .take(NORMALIZED_DATE_LENGTH)
        .collect()
}
