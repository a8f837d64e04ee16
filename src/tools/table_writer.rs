use super::path_validator::ensure_directory_exists;
use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// 寫出 CSV（第一列為欄位名稱）
pub fn write_csv_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("無法建立檔案: {}", path.display()))?;
    writer
        .write_record(headers)
        .with_context(|| format!("無法寫入表頭: {}", path.display()))?;
    for row in rows {
        writer
            .write_record(row)
            .with_context(|| format!("無法寫入資料列: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("無法寫出檔案: {}", path.display()))?;

    Ok(())
}

/// 寫出單一工作表的 Excel 檔案
pub fn write_xlsx_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    ensure_parent(path)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, excel_column(col)?, header)?;
    }
    for (row_index, row) in rows.iter().enumerate() {
        let excel_row = u32::try_from(row_index + 1).context("資料列超過工作表上限")?;
        for (col, value) in row.iter().enumerate() {
            worksheet.write_string(excel_row, excel_column(col)?, value)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("無法儲存檔案: {}", path.display()))?;

    Ok(())
}

fn excel_column(index: usize) -> Result<u16> {
    u16::try_from(index).context("欄位超過工作表上限")
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn headers() -> Vec<String> {
        vec!["documentId".to_string(), "title".to_string()]
    }

    #[test]
    fn test_write_csv_creates_parent_and_quotes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("table.csv");
        let rows = vec![vec!["A1".to_string(), "Skull, dorsal".to_string()]];

        write_csv_table(&path, &headers(), &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "documentId,title\nA1,\"Skull, dorsal\"\n");
    }

    #[test]
    fn test_write_xlsx_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.xlsx");
        let rows = vec![vec!["A1".to_string(), "photo1".to_string()]];

        write_xlsx_table(&path, &headers(), &rows).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx 是 zip 容器
        assert_eq!(&bytes[..2], b"PK");
    }
}
