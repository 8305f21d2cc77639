use std::path::{Path, PathBuf};

use anyhow::Context;
use eframe::egui::Rect;

use crate::data::codec::SymbolMap;
use crate::data::ingest::{self, EncodingMode, FileKind};
use crate::data::model::{label_for, BoundsPolicy, Dataset, FileTable};
use crate::data::parse;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Terminal state of one file within a processing action.
#[derive(Debug)]
pub enum FileStatus {
    Succeeded { rows: usize },
    Failed { reason: String },
}

/// What happened to one file, shown in the side panel.
#[derive(Debug)]
pub struct FileReport {
    pub name: String,
    pub status: FileStatus,
    /// Rows skipped with a warning while the file as a whole succeeded.
    pub row_warnings: Vec<String>,
}

/// The full session state, independent of rendering.
///
/// Holds the most recent successfully aggregated [`Dataset`] across repeated
/// processing actions; a run that produces nothing leaves it untouched.
/// Single writer (the end of a processing action), read every frame.
pub struct AppState {
    /// Last successful dataset; empty with fallback bounds at session start.
    pub dataset: Dataset,

    /// Operator-editable symbol map, as JSON object text.
    pub symbol_map_text: String,

    /// The map currently in effect (after any fallback to the default).
    pub symbol_map: SymbolMap,

    /// Warning from the last map build, when the default had to be used.
    pub config_warning: Option<String>,

    /// Byte-decoding mode for plain-text inputs.
    pub encoding_mode: EncodingMode,

    /// Fallback bounds used when a run yields no data.
    pub bounds_policy: BoundsPolicy,

    /// Operator-adjustable display range, reset to the derived bounds after
    /// every successful processing action.
    pub display_min: f64,
    pub display_max: f64,

    /// Set when the display range should be pushed to the plot this frame.
    pub apply_bounds: bool,

    /// Per-file outcomes of the last processing action.
    pub reports: Vec<FileReport>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Where to write the plot image once the screenshot frame arrives.
    pub pending_plot_export: Option<PathBuf>,

    /// Plot area of the last rendered frame, for screenshot cropping.
    pub plot_rect: Option<Rect>,
}

impl Default for AppState {
    fn default() -> Self {
        let bounds_policy = BoundsPolicy::default();
        let dataset = Dataset::empty(&bounds_policy);
        Self {
            display_min: dataset.bounds.min_x,
            display_max: dataset.bounds.max_y,
            dataset,
            symbol_map_text: SymbolMap::default_config_text(),
            symbol_map: SymbolMap::default(),
            config_warning: None,
            encoding_mode: EncodingMode::Utf8,
            bounds_policy,
            apply_bounds: false,
            reports: Vec::new(),
            status_message: None,
            pending_plot_export: None,
            plot_rect: None,
        }
    }
}

impl AppState {
    /// One processing action: build the codec, run every file to a terminal
    /// per-file state, aggregate, and replace the session dataset wholesale.
    ///
    /// No single file's failure aborts the run. When nothing produced any
    /// rows the previous dataset is kept and the operator is told there is
    /// nothing to plot or export.
    pub fn process_files(&mut self, paths: &[PathBuf]) {
        let (codec, config_error) = SymbolMap::from_config(&self.symbol_map_text);
        if let Some(err) = &config_error {
            log::warn!("invalid symbol map, using the default: {err}");
        }
        self.config_warning = config_error.map(|e| format!("Using default map: {e}"));
        self.symbol_map = codec.clone();

        self.reports.clear();
        let mut tables = Vec::new();

        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            match process_one(path, &codec, self.encoding_mode) {
                Ok((table, row_warnings)) => {
                    log::info!(
                        "{name}: {} rows parsed, {} skipped",
                        table.len(),
                        row_warnings.len()
                    );
                    self.reports.push(FileReport {
                        name,
                        status: FileStatus::Succeeded { rows: table.len() },
                        row_warnings,
                    });
                    tables.push(table);
                }
                Err(err) => {
                    log::error!("{name}: {err:#}");
                    self.reports.push(FileReport {
                        name,
                        status: FileStatus::Failed {
                            reason: format!("{err:#}"),
                        },
                        row_warnings: Vec::new(),
                    });
                }
            }
        }

        let dataset = Dataset::aggregate(tables, &self.bounds_policy);
        if dataset.is_empty() {
            // Keep whatever the session was already showing.
            self.status_message = Some("Nothing to plot or export.".to_string());
            return;
        }

        self.display_min = dataset.bounds.min_x;
        self.display_max = dataset.bounds.max_y;
        self.apply_bounds = true;
        self.dataset = dataset;
        self.status_message = None;
    }

    /// Reset the display range to the current dataset's derived bounds.
    pub fn fit_display_to_data(&mut self) {
        self.display_min = self.dataset.bounds.min_x;
        self.display_max = self.dataset.bounds.max_y;
        self.apply_bounds = true;
    }
}

/// Run one file through ingest → parse → table. Any error here is that
/// file's terminal `Failed` state; siblings are unaffected.
fn process_one(
    path: &Path,
    codec: &SymbolMap,
    mode: EncodingMode,
) -> anyhow::Result<(FileTable, Vec<String>)> {
    let bytes = std::fs::read(path).context("reading file")?;
    let kind = FileKind::from_path(path);
    let records = ingest::read_records(&bytes, kind, mode)?;
    let scan = parse::parse_table(&records, codec)?;

    let row_warnings = scan.skipped.iter().map(|w| w.to_string()).collect();
    let table = FileTable::new(label_for(path), scan.columns, scan.rows);
    Ok((table, row_warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn encoded_file(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let map = SymbolMap::default();
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", map.encode(line)).unwrap();
        }
        path
    }

    #[test]
    fn processing_replaces_the_dataset_and_derives_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let a = encoded_file(dir.path(), "scan_a.txt", &["190 85.3", "400 12.0"]);
        let b = encoded_file(dir.path(), "scan_b.txt", &["300 96.1", "junk row", "1100 40.0"]);

        let mut state = AppState::default();
        state.process_files(&[a, b]);

        assert_eq!(state.dataset.tables.len(), 2);
        assert_eq!(state.dataset.bounds.min_x, 190.0);
        assert_eq!(state.dataset.bounds.max_y, 96.1);
        assert_eq!(state.display_min, 190.0);
        assert!(state.status_message.is_none());

        assert!(matches!(
            state.reports[0].status,
            FileStatus::Succeeded { rows: 2 }
        ));
        assert_eq!(state.reports[1].row_warnings.len(), 1);
    }

    #[test]
    fn a_failed_file_does_not_block_its_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let good = encoded_file(dir.path(), "good.txt", &["190 85.3"]);
        let missing = dir.path().join("missing.txt");

        let mut state = AppState::default();
        state.process_files(&[missing, good]);

        assert!(matches!(state.reports[0].status, FileStatus::Failed { .. }));
        assert!(matches!(state.reports[1].status, FileStatus::Succeeded { .. }));
        assert_eq!(state.dataset.tables.len(), 1);
    }

    #[test]
    fn an_empty_run_keeps_the_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let good = encoded_file(dir.path(), "good.txt", &["190 85.3"]);

        let mut state = AppState::default();
        state.process_files(&[good]);
        let bounds_before = state.dataset.bounds;

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "").unwrap();
        state.process_files(&[empty]);

        assert_eq!(state.dataset.tables.len(), 1);
        assert_eq!(state.dataset.bounds, bounds_before);
        assert_eq!(
            state.status_message.as_deref(),
            Some("Nothing to plot or export.")
        );
    }

    #[test]
    fn processing_zero_files_surfaces_the_empty_result() {
        let mut state = AppState::default();
        state.process_files(&[]);
        assert!(state.dataset.tables.is_empty());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn a_broken_symbol_map_falls_back_with_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let file = encoded_file(dir.path(), "scan.txt", &["190 85.3"]);

        let mut state = AppState::default();
        state.symbol_map_text = "not json at all".to_string();
        state.process_files(&[file]);

        assert!(state.config_warning.is_some());
        // The default map still decodes the default-encoded file.
        assert_eq!(state.dataset.total_rows(), 1);
    }
}
