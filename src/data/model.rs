use std::path::Path;

use super::parse::ParsedRow;

// ---------------------------------------------------------------------------
// FileTable – one parsed, labeled file
// ---------------------------------------------------------------------------

/// Positional column headings: first column is the independent variable,
/// second (when present) the dependent one.
pub const COLUMN_NAMES: [&str; 2] = ["Wavelength", "Percentage"];

/// The ordered rows of one ingested file. Immutable once built.
#[derive(Debug, Clone)]
pub struct FileTable {
    /// Display name: the file name with its extension stripped.
    pub label: String,
    /// Uniform column count (1 or 2) for every row.
    pub columns: usize,
    pub rows: Vec<ParsedRow>,
}

impl FileTable {
    pub fn new(label: String, columns: usize, rows: Vec<ParsedRow>) -> Self {
        FileTable { label, columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Display label for an uploaded file: its stem, extension stripped.
pub fn label_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Bounds and the aggregated Dataset
// ---------------------------------------------------------------------------

/// Default plot-range endpoints derived from the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum first-column value across all tables.
    pub min_x: f64,
    /// Maximum second-column value (first column when a table has only one).
    pub max_y: f64,
}

/// What the bounds fall back to when no table has any rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsPolicy {
    pub fallback: Bounds,
}

impl BoundsPolicy {
    /// Typical UV-VIS spectrophotometer wavelength range.
    pub const UV_VIS: BoundsPolicy = BoundsPolicy {
        fallback: Bounds { min_x: 190.0, max_y: 1100.0 },
    };
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        BoundsPolicy {
            fallback: Bounds { min_x: 0.0, max_y: 100.0 },
        }
    }
}

/// The aggregate of one processing action: every FileTable in upload order
/// plus the derived bounds. Always rebuilt from scratch, never patched.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub tables: Vec<FileTable>,
    pub bounds: Bounds,
}

impl Dataset {
    pub fn empty(policy: &BoundsPolicy) -> Self {
        Dataset {
            tables: Vec::new(),
            bounds: policy.fallback,
        }
    }

    /// Merge per-file tables, preserving input order as the legend order,
    /// and derive the running bounds across every series.
    pub fn aggregate(tables: Vec<FileTable>, policy: &BoundsPolicy) -> Self {
        let mut min_x = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for table in &tables {
            for row in &table.rows {
                min_x = min_x.min(row.x);
                max_y = max_y.max(row.y.unwrap_or(row.x));
            }
        }

        let bounds = if min_x.is_finite() && max_y.is_finite() {
            Bounds { min_x, max_y }
        } else {
            policy.fallback
        };

        Dataset { tables, bounds }
    }

    /// True when no table contributed any rows.
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|t| t.is_empty())
    }

    /// Total row count across every table.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(FileTable::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(label: &str, pairs: &[(f64, f64)]) -> FileTable {
        let rows = pairs
            .iter()
            .map(|&(x, y)| ParsedRow { x, y: Some(y) })
            .collect();
        FileTable::new(label.to_string(), 2, rows)
    }

    fn single_column(label: &str, values: &[f64]) -> FileTable {
        let rows = values.iter().map(|&x| ParsedRow { x, y: None }).collect();
        FileTable::new(label.to_string(), 1, rows)
    }

    #[test]
    fn bounds_span_all_tables() {
        let tables = vec![
            single_column("a", &[190.0, 400.0]),
            single_column("b", &[300.0, 1100.0]),
        ];
        let dataset = Dataset::aggregate(tables, &BoundsPolicy::default());
        assert_eq!(dataset.bounds, Bounds { min_x: 190.0, max_y: 1100.0 });
    }

    #[test]
    fn second_column_feeds_the_upper_bound_when_present() {
        let tables = vec![table("a", &[(190.0, 85.3), (400.0, 12.0)])];
        let dataset = Dataset::aggregate(tables, &BoundsPolicy::default());
        assert_eq!(dataset.bounds, Bounds { min_x: 190.0, max_y: 85.3 });
    }

    #[test]
    fn empty_tables_fall_back_to_the_policy() {
        let policy = BoundsPolicy::UV_VIS;
        let dataset = Dataset::aggregate(vec![], &policy);
        assert!(dataset.is_empty());
        assert_eq!(dataset.bounds, policy.fallback);
    }

    #[test]
    fn aggregation_preserves_upload_order() {
        let tables = vec![
            table("second_scan", &[(1.0, 2.0)]),
            table("first_scan", &[(3.0, 4.0)]),
        ];
        let dataset = Dataset::aggregate(tables, &BoundsPolicy::default());
        let labels: Vec<&str> = dataset.tables.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["second_scan", "first_scan"]);
    }

    #[test]
    fn label_strips_the_extension() {
        assert_eq!(label_for(Path::new("/tmp/scan one.odt")), "scan one");
        assert_eq!(label_for(Path::new("bare")), "bare");
    }
}
