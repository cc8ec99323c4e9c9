//! Desktop host for the fractal clock.
//!
//! # Module Organization
//!
//! - `state` - The main [`FractalClockApp`] and its lifecycle plumbing
//! - `canvas` - Laying out the clock canvas and driving frames into it
//! - `rendering` - The egui drawing surface
//! - `export` - Saving the current frame as a PNG (native only)

mod canvas;
#[cfg(not(target_arch = "wasm32"))]
mod export;
mod rendering;
mod state;

pub use rendering::{from_color32, to_color32, EguiHost, EguiSurface};
pub use state::{CanvasLifecycle, FractalClockApp, SETTINGS_KEY};

use crate::constants::{MAX_ITERATIONS, MIN_ITERATIONS};
use crate::settings::{ClockType, Settings};
use crate::types::{PackedColor, Vector2};
use eframe::egui;
use std::time::Instant;

impl eframe::App for FractalClockApp {
    /// Persist the settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.draft.to_json() {
            Ok(json) => {
                storage.set_string(SETTINGS_KEY, json);
            }
            Err(err) => {
                log::error!("Failed to serialize settings: {err}");
            }
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

impl FractalClockApp {
    /// Runs one UI pass: panels, canvas, and the repaint request for the next frame.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    pub fn show(&mut self, ctx: &egui::Context) {
        ctx.set_visuals(egui::Visuals::dark());
        let now = Instant::now();

        let minimized = ctx.input(|i| i.viewport().minimized).unwrap_or(false);
        self.update_visibility(!minimized, now);

        if self.show_settings {
            egui::SidePanel::right("settings_panel")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    self.draw_settings_panel(ui);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui, now);
            });

        self.request_next_frame(ctx);
    }

    /// Asks egui to wake up when the scheduler's pending frame is due.
    fn request_next_frame(&self, ctx: &egui::Context) {
        if let Some(deadline) = self.clock.scheduler().pending() {
            let wait = deadline.saturating_duration_since(Instant::now());
            if wait.is_zero() {
                ctx.request_repaint();
            } else {
                ctx.request_repaint_after(wait);
            }
        }
    }

    /// Renders the settings panel. Every edit is published to the clock right away.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    fn draw_settings_panel(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.heading("Settings");
                ui.separator();

                let mut changed = false;
                let mut export_requested = false;
                let draft = &mut self.draft;

                changed |= ui.checkbox(&mut draft.draw_clock, "Draw clock face").changed();
                changed |= ui.checkbox(&mut draft.draw_branches, "Draw branches").changed();
                changed |= ui.checkbox(&mut draft.anti_aliasing, "Anti-aliasing").changed();
                changed |= ui
                    .checkbox(&mut draft.every_second, "Update once per second")
                    .changed();
                changed |= ui.checkbox(&mut draft.use_tick, "Ticking second hand").changed();

                ui.separator();
                ui.label("Clock type:");
                egui::ComboBox::from_id_salt("clock_type_combo")
                    .selected_text(draft.clock_type.label())
                    .show_ui(ui, |ui| {
                        for kind in ClockType::ALL {
                            changed |= ui
                                .selectable_value(&mut draft.clock_type, kind, kind.label())
                                .changed();
                        }
                    });

                changed |= ui
                    .add(
                        egui::Slider::new(
                            &mut draft.max_iterations,
                            MIN_ITERATIONS..=MAX_ITERATIONS,
                        )
                        .text("Iterations"),
                    )
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut draft.frames_per_second, 0.0..=120.0).text("FPS"))
                    .on_hover_text("0 draws as fast as possible")
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut draft.scaling_factor, 0.05..=1.0).text("Scaling"))
                    .on_hover_text("Lower values render the tree at a smaller internal size")
                    .changed();

                ui.separator();
                changed |= color_row(ui, "Clock face", &mut draft.clock_face_color);
                changed |= color_row(ui, "Background", &mut draft.background_color);

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        *draft = Settings::default();
                        changed = true;
                    }
                    if cfg!(not(target_arch = "wasm32")) {
                        export_requested = ui.button("Save PNG…").clicked();
                    }
                });

                if changed {
                    self.publish_settings();
                }
                #[cfg(not(target_arch = "wasm32"))]
                if export_requested {
                    self.export_png();
                }
                #[cfg(target_arch = "wasm32")]
                let _ = export_requested;

                ui.separator();
                self.draw_readout(ui);
            });
    }

    /// Shows the captured hand positions, theme colors and frame counters.
    fn draw_readout(&self, ui: &mut egui::Ui) {
        ui.heading("Hands");
        let hands = self.clock.hand_endpoints();
        egui::Grid::new("hand_readout").num_columns(2).show(ui, |ui| {
            for (name, at) in [
                ("Base", hands.base),
                ("Hour", hands.hour),
                ("Minute", hands.minute),
                ("Second", hands.second),
            ] {
                ui.label(name);
                ui.monospace(format_point(at));
                ui.end_row();
            }
        });

        if let Some(theme) = self.clock.theme_colors() {
            ui.horizontal(|ui| {
                for color in [theme.primary, theme.secondary, theme.tertiary] {
                    ui.colored_label(to_color32(color), "⏺");
                }
            });
        }

        let stats = self.clock.stats();
        ui.colored_label(
            egui::Color32::GRAY,
            format!("Frames: {} drawn, {} skipped", stats.drawn, stats.skipped),
        );
        ui.colored_label(egui::Color32::GRAY, "Double-click the clock to hide this panel");
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut PackedColor) -> bool {
    ui.horizontal(|ui| {
        let mut edited = to_color32(*color);
        let changed = ui.color_edit_button_srgba(&mut edited).changed();
        ui.label(label);
        if changed {
            *color = from_color32(edited);
        }
        changed
    })
    .inner
}

fn format_point(at: Vector2) -> String {
    format!("({:>7.1}, {:>7.1})", at.x, at.y)
}
