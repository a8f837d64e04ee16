use anyhow::{Context, Result, bail};
use std::path::{Component, Path};

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    }
    Ok(())
}

/// 將路徑分隔字元統一為 `/`
#[must_use]
pub fn to_slash_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// 取得相對於 base 的路徑字串（一律使用 `/`）
#[must_use]
pub fn relative_slash_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// 檢查路徑中是否有某一層資料夾名稱完全相同
#[must_use]
pub fn has_path_segment(path: &Path, segment: &str) -> bool {
    path.parent().is_some_and(|parent| {
        parent
            .components()
            .any(|component| matches!(component, Component::Normal(part) if part == segment))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_directory_exists(temp_dir.path()).is_ok());
        assert!(validate_directory_exists(&temp_dir.path().join("missing")).is_err());

        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(validate_directory_exists(&file).is_err());
    }

    #[test]
    fn test_relative_slash_path() {
        let base = PathBuf::from("/data/root");
        let file = base.join("scans").join("ISAM").join("a.tif");
        assert_eq!(relative_slash_path(&file, &base), "scans/ISAM/a.tif");
    }

    #[test]
    fn test_to_slash_path() {
        assert_eq!(to_slash_path(r"scans\ISAM\a.tif"), "scans/ISAM/a.tif");
    }

    #[test]
    fn test_has_path_segment_only_matches_folders() {
        let inside = Path::new("/root/scans/ISAM/MAM001/metadata/summary.csv");
        let lookalike = Path::new("/root/scans/ISAM/MAM001/metadata_old/summary.csv");
        let file_named = Path::new("/root/scans/ISAM/MAM001/metadata");
        assert!(has_path_segment(inside, "metadata"));
        assert!(!has_path_segment(lookalike, "metadata"));
        assert!(!has_path_segment(file_named, "metadata"));
    }
}
