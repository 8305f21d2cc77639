use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::data::model::{Dataset, COLUMN_NAMES};

// ---------------------------------------------------------------------------
// Workbook export: one worksheet per file table
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Write the aggregated dataset as a workbook: one sheet per file, sheet
/// name derived from the file label, header row, numeric body.
pub fn write_workbook(dataset: &Dataset, out_path: &Path) -> Result<(), ExportError> {
    if dataset.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let mut used_names: Vec<String> = Vec::new();

    for table in &dataset.tables {
        let name = sheet_name(&table.label, &used_names);

        let sheet = workbook.add_worksheet();
        sheet.set_name(&name)?;
        used_names.push(name);

        for (col, title) in COLUMN_NAMES.iter().take(table.columns).enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }
        for (i, row) in table.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_number(r, 0, row.x)?;
            if let Some(y) = row.y {
                sheet.write_number(r, 1, y)?;
            }
        }
    }

    workbook.save(out_path)?;
    Ok(())
}

/// Coerce a file label into a legal, unique worksheet name: the characters
/// Excel forbids become underscores, 31 chars max, collisions get a numeric
/// suffix.
fn sheet_name(label: &str, used: &[String]) -> String {
    let mut base: String = label
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(31)
        .collect();
    if base.trim().is_empty() {
        base = "Sheet".to_string();
    }

    let mut name = base.clone();
    let mut n = 2;
    while used.iter().any(|u| u.eq_ignore_ascii_case(&name)) {
        let suffix = format!(" ({n})");
        let keep = 31usize.saturating_sub(suffix.chars().count());
        name = base.chars().take(keep).collect::<String>() + &suffix;
        n += 1;
    }
    name
}
