use std::path::Path;

use super::scenes::{DynamicScene, Scene};

pub trait Renderer {
    fn create_scene(&self, width: u32, height: u32) -> Box<dyn Scene>;

    /// Write the current content of `scene` to an image file.
    fn save_frame(&self, scene: &dyn Scene, path: &Path) -> image::ImageResult<()>;
}

pub struct DynamicRenderer {
    backend: Box<dyn Renderer>,
}

impl DynamicRenderer {
    pub fn new(backend: Box<dyn Renderer>) -> Self {
        DynamicRenderer { backend }
    }

    pub fn create_scene(&self, width: u32, height: u32) -> DynamicScene {
        DynamicScene::new(self.backend.create_scene(width, height))
    }

    pub fn save_frame(&self, scene: &DynamicScene, path: &Path) -> image::ImageResult<()> {
        self.backend.save_frame(scene.0.as_ref(), path)
    }
}

impl std::fmt::Debug for DynamicRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicRenderer").finish_non_exhaustive()
    }
}
