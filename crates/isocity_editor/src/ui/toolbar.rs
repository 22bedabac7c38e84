//! Top toolbar: mode toggle, view reset, save button and status.

use bevy_egui::egui;

use crate::{EditorMode, EditorState, SaveStatus};

/// Deferred toolbar actions, applied by the caller after layout.
#[derive(Default)]
pub struct ToolbarResult {
    pub save_clicked: bool,
}

pub fn render_toolbar(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    save_in_flight: bool,
) -> ToolbarResult {
    let mut result = ToolbarResult::default();

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Isocity").strong());
            ui.separator();

            if ui
                .selectable_label(editor_state.mode == EditorMode::View, "View")
                .clicked()
            {
                editor_state.set_mode(EditorMode::View);
            }
            if ui
                .selectable_label(editor_state.mode == EditorMode::Edit, "Edit")
                .clicked()
            {
                editor_state.set_mode(EditorMode::Edit);
            }

            ui.separator();
            if ui.button("Reset View").clicked() {
                editor_state.pending_reset_view = true;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if editor_state.mode == EditorMode::Edit {
                    let save_button =
                        ui.add_enabled(!save_in_flight, egui::Button::new("Save Map"));
                    if save_button.clicked() {
                        result.save_clicked = true;
                    }
                }

                match &editor_state.save_status {
                    SaveStatus::Idle => {}
                    SaveStatus::Saving => {
                        ui.colored_label(egui::Color32::YELLOW, "Saving...");
                    }
                    SaveStatus::Saved(message) => {
                        ui.colored_label(egui::Color32::from_rgb(100, 200, 100), message);
                    }
                    SaveStatus::Failed(message) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, message);
                    }
                }

                ui.separator();
                ui.small(editor_state.map_path.display().to_string());
            });
        });
    });

    result
}
