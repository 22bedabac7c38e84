//! Editor UI: toolbar, brush palette, viewport panel, loading overlay.

mod palette;
mod toolbar;

pub use palette::{render_palette, Brush};
pub use toolbar::{render_toolbar, ToolbarResult};

use bevy::prelude::*;
use bevy::tasks::AsyncComputeTaskPool;
use bevy_egui::{egui, EguiContexts};

use crate::sheets::SheetTextureCache;
use crate::{store, viewport, CityMap, EditorMode, EditorState, SaveStatus, SaveTask, SpriteAtlas};

/// The one egui pass: panels first, viewport in the remaining space, then
/// deferred actions.
pub fn render_ui(
    mut contexts: EguiContexts,
    mut editor_state: ResMut<EditorState>,
    mut map: ResMut<CityMap>,
    atlas: Res<SpriteAtlas>,
    cache: Res<SheetTextureCache>,
    mut save_task: ResMut<SaveTask>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let toolbar = toolbar::render_toolbar(ctx, &mut editor_state, save_task.0.is_some());

    if editor_state.mode == EditorMode::Edit {
        palette::render_palette(ctx, &mut editor_state, &atlas, &cache);
    }

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            viewport::show(ui, &mut editor_state, &mut map, &atlas, &cache);
        });

    render_loading_overlay(ctx, &cache);

    if toolbar.save_clicked && save_task.0.is_none() {
        start_save(&mut editor_state, &map, &mut save_task);
    }
}

/// Serialize the grid and hand it to the store on the async pool. Only one
/// save may be outstanding; the toolbar disables its button while one is.
fn start_save(editor_state: &mut EditorState, map: &CityMap, save_task: &mut SaveTask) {
    let document = map.grid.to_document();
    let path = editor_state.map_path.clone();
    editor_state.save_status = SaveStatus::Saving;

    let task = AsyncComputeTaskPool::get()
        .spawn(async move { store::save_document(&path, &document) });
    save_task.0 = Some(task);
}

/// Centered overlay shown until every sheet has loaded or failed.
fn render_loading_overlay(ctx: &egui::Context, cache: &SheetTextureCache) {
    if cache.all_settled() {
        return;
    }
    let (settled, total) = cache.progress();

    egui::Window::new("loading_overlay")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Loading sheets... {}/{}", settled, total));
            });
        });
}
