use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, TextEdit, Ui};

use crate::data::ingest::EncodingMode;
use crate::data::model::BoundsPolicy;
use crate::state::{AppState, FileStatus};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open files…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export workbook…").clicked() {
                export_workbook_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export plot image…").clicked() {
                export_plot_dialog(ui.ctx(), state);
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.dataset.tables.is_empty() {
            ui.label(format!(
                "{} files, {} rows",
                state.dataset.tables.len(),
                state.dataset.total_rows()
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – configuration and per-file reports
// ---------------------------------------------------------------------------

/// Render the configuration panel: symbol map editor, encoding selector,
/// plot range, and the per-file reports of the last processing action.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            symbol_map_section(ui, state);
            ui.separator();
            encoding_section(ui, state);
            ui.separator();
            range_section(ui, state);
            ui.separator();
            reports_section(ui, state);
        });
}

fn symbol_map_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Symbol map");
    ui.label("Digit/period → glyph pairs, JSON object:");
    ui.add(
        TextEdit::multiline(&mut state.symbol_map_text)
            .code_editor()
            .desired_rows(6)
            .desired_width(f32::INFINITY),
    );

    if let Some(warning) = &state.config_warning {
        ui.label(RichText::new(warning).color(Color32::YELLOW));
    }

    egui::CollapsingHeader::new("Map in effect")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for (source, glyph) in state.symbol_map.pairs() {
                ui.monospace(format!("{source} → {glyph}"));
            }
        });
}

fn encoding_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Text encoding");
    egui::ComboBox::from_id_salt("encoding_mode")
        .selected_text(state.encoding_mode.label())
        .show_ui(ui, |ui: &mut Ui| {
            for mode in EncodingMode::ALL {
                if ui
                    .selectable_label(state.encoding_mode == mode, mode.label())
                    .clicked()
                {
                    state.encoding_mode = mode;
                }
            }
        });
    ui.small("Applies to plain-text files; documents carry their own encoding.");
}

fn range_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Plot range");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("min");
        if ui
            .add(DragValue::new(&mut state.display_min).speed(1.0))
            .changed()
        {
            state.apply_bounds = true;
        }
        ui.label("max");
        if ui
            .add(DragValue::new(&mut state.display_max).speed(1.0))
            .changed()
        {
            state.apply_bounds = true;
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("Fit data").clicked() {
            state.fit_display_to_data();
        }
        if ui.small_button("UV-VIS").clicked() {
            state.bounds_policy = BoundsPolicy::UV_VIS;
            state.display_min = BoundsPolicy::UV_VIS.fallback.min_x;
            state.display_max = BoundsPolicy::UV_VIS.fallback.max_y;
            state.apply_bounds = true;
        }
    });
}

fn reports_section(ui: &mut Ui, state: &AppState) {
    ui.strong("Files");
    if state.reports.is_empty() {
        ui.label("No files processed yet.");
        return;
    }

    for (i, report) in state.reports.iter().enumerate() {
        let (summary, color) = match &report.status {
            FileStatus::Succeeded { rows } => {
                (format!("{} — {rows} rows", report.name), Color32::LIGHT_GREEN)
            }
            FileStatus::Failed { reason } => {
                (format!("{} — {reason}", report.name), Color32::LIGHT_RED)
            }
        };

        if report.row_warnings.is_empty() {
            ui.label(RichText::new(summary).color(color));
            continue;
        }

        egui::CollapsingHeader::new(
            RichText::new(format!("{summary} ({} skipped)", report.row_warnings.len()))
                .color(color),
        )
        .id_salt(i)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for warning in &report.row_warnings {
                ui.small(warning);
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open spectrophotometer exports")
        .add_filter("Supported files", &["odt", "txt", "dat"])
        .add_filter("OpenDocument text", &["odt"])
        .add_filter("Plain text", &["txt", "dat"])
        .pick_files();

    if let Some(paths) = files {
        state.process_files(&paths);
    }
}

fn export_workbook_dialog(state: &mut AppState) {
    if state.dataset.is_empty() {
        state.status_message = Some("Nothing to plot or export.".to_string());
        return;
    }

    let file = rfd::FileDialog::new()
        .set_title("Export workbook")
        .set_file_name("processed_data.xlsx")
        .add_filter("Excel workbook", &["xlsx"])
        .save_file();

    if let Some(path) = file {
        match crate::export::write_workbook(&state.dataset, &path) {
            Ok(()) => {
                log::info!("workbook written to {}", path.display());
                state.status_message = Some(format!("Workbook saved to {}", path.display()));
            }
            Err(e) => {
                log::error!("workbook export failed: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

fn export_plot_dialog(ctx: &egui::Context, state: &mut AppState) {
    if state.dataset.is_empty() {
        state.status_message = Some("Nothing to plot or export.".to_string());
        return;
    }

    let file = rfd::FileDialog::new()
        .set_title("Export plot image")
        .set_file_name("plot.png")
        .add_filter("PNG image", &["png"])
        .save_file();

    if let Some(mut path) = file {
        if path.extension().is_none() {
            path.set_extension("png");
        }
        state.pending_plot_export = Some(path);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }
}
