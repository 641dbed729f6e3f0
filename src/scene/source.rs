use std::path::Path;

use super::{fsm, Scene};
use crate::error::Result;

/// Something that can turn a path into a fully loaded [`Scene`].
///
/// The session and exporters only see this trait, so a parser for a
/// different on-disk layout can be dropped in without touching them.
pub trait SceneSource {
    fn load_scene(&self, path: &Path) -> Result<Scene>;
}

/// Reads the native `.fsm` container.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsmSource;

impl SceneSource for FsmSource {
    fn load_scene(&self, path: &Path) -> Result<Scene> {
        fsm::load_fsm(path)
    }
}

/// Hands out copies of a scene built in memory, ignoring the path.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    scene: Scene,
}

impl InMemorySource {
    pub fn new(scene: Scene) -> Self {
        Self { scene }
    }
}

impl SceneSource for InMemorySource {
    fn load_scene(&self, _path: &Path) -> Result<Scene> {
        Ok(self.scene.clone())
    }
}

impl<S: SceneSource + ?Sized> SceneSource for &S {
    fn load_scene(&self, path: &Path) -> Result<Scene> {
        (**self).load_scene(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::scene::HeightmapLayer;

    #[test]
    fn fsm_source_reports_missing_file() {
        let err = FsmSource.load_scene(Path::new("missing.fsm")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn in_memory_source_returns_its_scene() {
        let layer = HeightmapLayer::new(2, 1, 1, 4.0, vec![9.0]).unwrap();
        let scene = Scene::new(vec![layer], vec![]).unwrap();
        let source = InMemorySource::new(scene.clone());

        let dyn_source: &dyn SceneSource = &source;
        assert_eq!(dyn_source.load_scene(Path::new("ignored")).unwrap(), scene);
    }
}
