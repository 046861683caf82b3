pub mod affine;
pub mod colors;
pub mod dots;
pub mod raster_backend;
mod renderer;
pub mod scenes;
pub mod shapes;

// re-export the image crate
pub use image;

// re-export the renderer
pub use renderer::{DynamicRenderer, Renderer};

pub enum Backend {
    Raster,
}

impl Backend {
    pub fn create_renderer(&self) -> DynamicRenderer {
        match self {
            Backend::Raster => DynamicRenderer::new(Box::new(raster_backend::RasterRenderer)),
        }
    }
}

pub mod prelude {
    pub use super::affine::*;
    pub use super::colors::*;
    pub use super::dots::*;
    pub use super::scenes::*;
    pub use super::shapes::*;
}
