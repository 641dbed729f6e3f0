use std::path::Path;

use tracing::info;

use super::source::{FsmSource, SceneSource};
use super::Scene;
use crate::error::{Error, Result};
use crate::export::{self, ExportOptions};

#[derive(Debug)]
enum SessionState {
    Empty,
    Loaded(Scene),
    ShutDown,
}

/// Load / query / export / shutdown handle around one scene.
///
/// Counts and exports are only valid between a successful [`load`] and
/// [`shutdown`]; outside that window they fail with
/// [`Error::InvalidState`]. A failed load leaves the session empty, and a
/// shut-down session cannot be reused.
///
/// Code that does not need this lifecycle can hold a [`Scene`] directly and
/// let it drop at end of scope.
///
/// [`load`]: SceneSession::load
/// [`shutdown`]: SceneSession::shutdown
#[derive(Debug)]
pub struct SceneSession<S: SceneSource = FsmSource> {
    source: S,
    options: ExportOptions,
    state: SessionState,
}

impl SceneSession<FsmSource> {
    pub fn new() -> Self {
        Self::with_source(FsmSource)
    }
}

impl Default for SceneSession<FsmSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneSource> SceneSession<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            options: ExportOptions::default(),
            state: SessionState::Empty,
        }
    }

    /// Start a session around an already loaded scene.
    pub fn from_scene(source: S, scene: Scene) -> Self {
        Self {
            source,
            options: ExportOptions::default(),
            state: SessionState::Loaded(scene),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Load `path` through the session's source, replacing any scene that
    /// was loaded before. On failure the session holds no scene.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        if matches!(self.state, SessionState::ShutDown) {
            return Err(Error::InvalidState("session has been shut down"));
        }

        self.state = SessionState::Empty;
        let scene = self.source.load_scene(path)?;
        info!(
            path = %path.display(),
            heightmaps = scene.heightmap_count(),
            objects = scene.object_count(),
            "loaded scene"
        );
        self.state = SessionState::Loaded(scene);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SessionState::Loaded(_))
    }

    pub fn scene(&self) -> Result<&Scene> {
        match &self.state {
            SessionState::Loaded(scene) => Ok(scene),
            SessionState::Empty => Err(Error::InvalidState("no scene loaded")),
            SessionState::ShutDown => Err(Error::InvalidState("session has been shut down")),
        }
    }

    pub fn heightmap_count(&self) -> Result<usize> {
        Ok(self.scene()?.heightmap_count())
    }

    pub fn object_count(&self) -> Result<usize> {
        Ok(self.scene()?.object_count())
    }

    pub fn export_terrain_coordinates(&self, path: &Path) -> Result<()> {
        export::export_terrain_coordinates(self.scene()?, path, &self.options)
    }

    pub fn export_object_coordinates(&self, path: &Path) -> Result<()> {
        export::export_object_coordinates(self.scene()?, path, &self.options)
    }

    /// Release the scene. Every later call on this session fails with
    /// [`Error::InvalidState`].
    pub fn shutdown(&mut self) {
        self.state = SessionState::ShutDown;
    }
}
