//! isocity_editor - isometric city diorama viewer and map editor
//!
//! This crate provides the windowed application around `isocity_core`:
//! - sheet loading (manifest + image pairs joined into the atlas index)
//! - the egui viewport: depth-sorted isometric rendering, pan/zoom/paint
//! - brush palette and toolbar UI
//! - map document load/save through the persistence store
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use isocity_editor::EditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin::new().with_map_path("assets/city.json"))
//!         .run();
//! }
//! ```

pub mod preferences;
pub mod sheets;
pub mod store;
pub mod ui;
pub mod viewport;

use bevy::prelude::*;
use bevy::tasks::futures_lite::future;
use bevy::tasks::Task;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use std::path::PathBuf;

use isocity_core::{AtlasIndex, CityGrid, ViewTransform, DEFAULT_GRID_SIZE, MAX_ZOOM, MIN_ZOOM};
use preferences::EditorPreferences;
use sheets::{BrushCategory, SheetTextureCache};
use store::SaveResponse;
use ui::Brush;
use viewport::PointerState;

/// Map document location used when neither the plugin config nor the
/// preferences name one.
pub const DEFAULT_MAP_PATH: &str = "assets/city.json";

/// Whether the app is a read-only diorama or an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    View,
    Edit,
}

/// Save lifecycle surfaced in the toolbar.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved(String),
    Failed(String),
}

/// The city grid being viewed or edited.
#[derive(Resource)]
pub struct CityMap {
    pub grid: CityGrid,
}

/// The global sprite name -> frame index.
#[derive(Resource, Default)]
pub struct SpriteAtlas {
    pub index: AtlasIndex,
}

/// The single outstanding save, if any.
#[derive(Resource, Default)]
pub struct SaveTask(pub Option<Task<SaveResponse>>);

/// Base directory sheet manifests are resolved against (Bevy's assets dir).
#[derive(Resource)]
pub struct AssetsBasePath(pub PathBuf);

/// Global editor state
#[derive(Resource)]
pub struct EditorState {
    pub mode: EditorMode,
    pub view: ViewTransform,
    pub pointer: PointerState,

    // Brush
    pub active_brush: Option<Brush>,
    pub palette_category: BrushCategory,
    pub last_painted: Option<(i32, i32)>,
    pub hovered_cell: Option<(i32, i32)>,

    // Persistence
    pub save_status: SaveStatus,
    pub map_path: PathBuf,

    // View lifecycle
    pub view_initialized: bool,
    pub pending_reset_view: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            mode: EditorMode::View,
            view: ViewTransform::default(),
            pointer: PointerState::Idle,

            active_brush: None,
            palette_category: BrushCategory::Ground,
            last_painted: None,
            hovered_cell: None,

            save_status: SaveStatus::Idle,
            map_path: PathBuf::from(DEFAULT_MAP_PATH),

            view_initialized: false,
            pending_reset_view: false,
        }
    }
}

impl EditorState {
    /// Switch between view and edit mode, dropping any in-progress stroke.
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
        self.pointer = PointerState::Idle;
        self.last_painted = None;
        self.hovered_cell = None;
    }
}

/// Configuration for initial editor state
#[derive(Clone, Debug)]
pub struct EditorStateConfig {
    /// Start in edit mode instead of the view-only diorama. Default: false
    pub start_in_edit_mode: bool,
    /// Initial zoom level, clamped to the transform's range. Default: 0.8
    pub initial_zoom: f32,
}

impl Default for EditorStateConfig {
    fn default() -> Self {
        Self {
            start_in_edit_mode: false,
            initial_zoom: 0.8,
        }
    }
}

/// Main editor plugin with configurable map path and initial state
///
/// # Example
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use isocity_editor::EditorPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         EditorPlugin::new()
///             .with_map_path("maps/harbor.json")
///             .with_start_in_edit_mode(true)
///     )
///     .run();
/// ```
pub struct EditorPlugin {
    /// Custom assets path. If None, defaults to the working directory's
    /// `assets` folder (where Bevy's asset server also looks).
    pub assets_path: Option<PathBuf>,
    /// Map document to load. If None, falls back to the last map from
    /// preferences, then [`DEFAULT_MAP_PATH`].
    pub map_path: Option<PathBuf>,
    /// Initial editor state configuration.
    pub initial_state: EditorStateConfig,
}

impl Default for EditorPlugin {
    fn default() -> Self {
        Self {
            assets_path: None,
            map_path: None,
            initial_state: EditorStateConfig::default(),
        }
    }
}

impl EditorPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assets directory path
    pub fn with_assets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.assets_path = Some(path.into());
        self
    }

    /// Set the map document path
    pub fn with_map_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.map_path = Some(path.into());
        self
    }

    /// Start in edit mode (default: view mode)
    pub fn with_start_in_edit_mode(mut self, edit: bool) -> Self {
        self.initial_state.start_in_edit_mode = edit;
        self
    }

    /// Set the initial zoom level (default: 0.8)
    pub fn with_initial_zoom(mut self, zoom: f32) -> Self {
        self.initial_state.initial_zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self
    }

    fn detect_assets_path(&self) -> PathBuf {
        if let Some(path) = &self.assets_path {
            return path.clone();
        }
        std::env::current_dir()
            .map(|p| p.join("assets"))
            .unwrap_or_else(|_| PathBuf::from("assets"))
    }
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        let assets_path = self.detect_assets_path();

        let preferences = EditorPreferences::load();

        let map_path = self
            .map_path
            .clone()
            .or_else(|| preferences.last_map_path.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MAP_PATH));
        info!("Using map document {:?}", map_path);

        let mut editor_state = EditorState::default();
        editor_state.map_path = map_path;
        editor_state.view.zoom = self
            .initial_state
            .initial_zoom
            .clamp(MIN_ZOOM, MAX_ZOOM);
        if self.initial_state.start_in_edit_mode || preferences.start_in_edit_mode {
            editor_state.mode = EditorMode::Edit;
        }

        app.add_plugins(EguiPlugin::default())
            .insert_resource(editor_state)
            .insert_resource(preferences)
            .insert_resource(AssetsBasePath(assets_path))
            .insert_resource(CityMap {
                grid: CityGrid::new(DEFAULT_GRID_SIZE),
            })
            .init_resource::<SpriteAtlas>()
            .init_resource::<SheetTextureCache>()
            .init_resource::<SaveTask>()
            .add_systems(
                Startup,
                (setup_editor_camera, load_map, sheets::queue_sheet_loads),
            )
            .add_systems(Update, (sheets::poll_sheet_images, poll_save_task))
            .add_systems(EguiPrimaryContextPass, ui::render_ui);
    }
}

/// Spawns the editor camera if one doesn't exist
fn setup_editor_camera(mut commands: Commands, camera_query: Query<&Camera2d>) {
    if camera_query.is_empty() {
        commands.spawn(Camera2d);
    }
}

/// Load the map document at startup, falling back to an empty grid so the
/// app stays usable with a missing or malformed document.
fn load_map(mut map: ResMut<CityMap>, editor_state: Res<EditorState>) {
    match store::load_document(&editor_state.map_path) {
        Ok(document) => {
            let (grid, dropped) = CityGrid::from_document(&document);
            if dropped > 0 {
                warn!(
                    "Dropped {} out-of-bounds tile records from {:?}",
                    dropped, editor_state.map_path
                );
            }
            info!(
                "Loaded map {:?}: size {}, {} populated cells",
                editor_state.map_path,
                grid.size(),
                grid.populated_count()
            );
            map.grid = grid;
        }
        Err(e) => {
            warn!(
                "Could not load map {:?}: {}. Starting with an empty {}x{} grid.",
                editor_state.map_path, e, DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE
            );
            map.grid = CityGrid::new(DEFAULT_GRID_SIZE);
        }
    }
}

/// Poll the outstanding save task and surface its result.
fn poll_save_task(
    mut save_task: ResMut<SaveTask>,
    mut editor_state: ResMut<EditorState>,
    mut preferences: ResMut<EditorPreferences>,
) {
    let Some(task) = save_task.0.as_mut() else {
        return;
    };
    let Some(response) = future::block_on(future::poll_once(task)) else {
        return;
    };
    save_task.0 = None;

    if response.is_success() {
        info!("Saved map to {:?}", editor_state.map_path);
        editor_state.save_status = SaveStatus::Saved(response.message);

        preferences.last_map_path = Some(editor_state.map_path.to_string_lossy().to_string());
        if let Err(e) = preferences.save() {
            warn!("Failed to save preferences: {}", e);
        }
    } else {
        error!("Map save failed: {}", response.message);
        editor_state.save_status = SaveStatus::Failed(response.message);
    }
}
