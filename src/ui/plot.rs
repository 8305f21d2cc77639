use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::color::series_palette;
use crate::data::model::COLUMN_NAMES;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Aggregated series plot (central panel)
// ---------------------------------------------------------------------------

/// Render every file table as one line, legend entry per file label.
/// Single-column tables plot their values against the row index.
pub fn dataset_plot(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.tables.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open spectrophotometer exports to plot them  (File → Open…)");
        });
        return;
    }

    let colors = series_palette(state.dataset.tables.len());
    let apply_bounds = std::mem::take(&mut state.apply_bounds);
    let (display_min, display_max) = (state.display_min, state.display_max);

    let response = Plot::new("dataset_plot")
        .legend(Legend::default())
        .x_axis_label(COLUMN_NAMES[0])
        .y_axis_label(COLUMN_NAMES[1])
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if apply_bounds {
                // The operator's range applies to the x-axis, as on the
                // instrument software; the y-axis keeps its current span.
                let current = plot_ui.plot_bounds();
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [display_min, current.min()[1]],
                    [display_max, current.max()[1]],
                ));
            }

            for (table, color) in state.dataset.tables.iter().zip(colors) {
                let points: PlotPoints = if table.columns == 2 {
                    table
                        .rows
                        .iter()
                        .map(|r| [r.x, r.y.unwrap_or(r.x)])
                        .collect()
                } else {
                    table
                        .rows
                        .iter()
                        .enumerate()
                        .map(|(i, r)| [i as f64, r.x])
                        .collect()
                };

                plot_ui.line(Line::new(points).name(&table.label).color(color).width(1.5));
            }
        });

    // Remember where the plot landed so image export can crop to it.
    state.plot_rect = Some(response.response.rect);
}
