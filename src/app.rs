use anyhow::Context as _;
use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpecPlotApp {
    pub state: AppState,
}

impl Default for SpecPlotApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for SpecPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        handle_screenshots(ctx, &mut self.state);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: configuration + reports ----
        egui::SidePanel::left("config_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dataset_plot(ui, &mut self.state);
        });
    }
}

/// Write any screenshot delivered this frame to the pending export path,
/// cropped to the last known plot area.
fn handle_screenshots(ctx: &egui::Context, state: &mut AppState) {
    if state.pending_plot_export.is_none() {
        return;
    }

    let image = ctx.input(|i| {
        i.events.iter().find_map(|e| match e {
            egui::Event::Screenshot { image, .. } => Some(image.clone()),
            _ => None,
        })
    });
    let Some(image) = image else { return };
    let Some(path) = state.pending_plot_export.take() else { return };

    let cropped = match state.plot_rect {
        Some(rect) => image.region(&rect, Some(ctx.pixels_per_point())),
        None => (*image).clone(),
    };

    match save_png(&cropped, &path) {
        Ok(()) => {
            log::info!("plot image written to {}", path.display());
            state.status_message = Some(format!("Plot image saved to {}", path.display()));
        }
        Err(e) => {
            log::error!("saving plot image: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn save_png(image: &egui::ColorImage, path: &std::path::Path) -> anyhow::Result<()> {
    let [w, h] = image.size;
    let buffer = image::RgbaImage::from_raw(w as u32, h as u32, image.as_raw().to_vec())
        .context("screenshot buffer size mismatch")?;
    buffer.save(path).context("writing png")?;
    Ok(())
}
