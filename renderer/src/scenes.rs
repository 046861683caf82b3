use super::affine::Affine;
use crate::colors::RGBA;
use crate::shapes::Shape;
use std::any::Any;

pub struct DynamicScene(pub Box<dyn Scene>);

impl DynamicScene {
    pub fn new(scene: Box<dyn Scene>) -> Self {
        Self(scene)
    }

    pub fn set_background_color(&mut self, color: RGBA) {
        self.0.set_background_color(color);
    }

    pub fn background_color(&self) -> RGBA {
        self.0.background_color()
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn draw_shape_fill(&mut self, shape: Shape, color: RGBA, transform: Option<Affine>, alpha: f32) {
        self.0.draw_shape_fill(shape, color, transform, alpha);
    }

    pub fn try_as<T>(&self) -> Option<&T>
    where
        T: Any,
    {
        self.0.as_any().downcast_ref::<T>()
    }
}

/// A drawing surface. Coordinates are pixels with the origin in the top
/// left corner and y pointing down.
pub trait Scene: Any {
    fn as_any(&self) -> &dyn Any;
    fn set_background_color(&mut self, color: RGBA);
    fn background_color(&self) -> RGBA;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Reset every pixel to the background color.
    fn clear(&mut self);
    /// Fill `shape` with `color`. `alpha` multiplies the color's own alpha;
    /// later fills paint over earlier ones.
    fn draw_shape_fill(&mut self, shape: Shape, color: RGBA, transform: Option<Affine>, alpha: f32);
}
