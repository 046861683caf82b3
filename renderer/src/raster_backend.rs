use std::any::Any;
use std::path::Path;

use image::{Rgba, RgbaImage};
use nalgebra::Vector2;

use crate::{
    affine::Affine,
    colors::RGBA,
    renderer::Renderer,
    scenes::Scene,
    shapes::{Point, Shape},
};

/// A CPU scene that rasterizes fills straight into an RGBA image buffer.
/// Pixels are sampled at their centers, so edges are aliased.
#[derive(Debug, Clone)]
pub struct RasterScene {
    image: RgbaImage,
    background: RGBA,
}

impl RasterScene {
    pub fn new(width: u32, height: u32) -> Self {
        let background = RGBA::GRAY;
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(background.to_rgba8())),
            background,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> RGBA {
        RGBA::from(self.image.get_pixel(x, y).0)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    fn fill_convex(&mut self, polygon: &[Point], color: RGBA) {
        if polygon.len() < 3 || color.a <= 0.0 {
            return;
        }

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in polygon {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let width = self.image.width() as f64;
        let height = self.image.height() as f64;
        if max_x < 0.0 || max_y < 0.0 || min_x >= width || min_y >= height {
            return;
        }

        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = max_x.ceil().min(width - 1.0) as u32;
        let y1 = max_y.ceil().min(height - 1.0) as u32;

        let edges: Vec<(Vector2<f64>, Vector2<f64>)> = polygon
            .iter()
            .zip(polygon.iter().cycle().skip(1))
            .map(|(a, b)| (Vector2::new(a.x, a.y), Vector2::new(b.x - a.x, b.y - a.y)))
            .collect();

        for y in y0..=y1 {
            for x in x0..=x1 {
                let sample = Vector2::new(x as f64 + 0.5, y as f64 + 0.5);
                if contains(&edges, sample) {
                    let dst = RGBA::from(self.image.get_pixel(x, y).0);
                    self.image.put_pixel(x, y, Rgba(color.over(dst).to_rgba8()));
                }
            }
        }
    }
}

// winding-agnostic test for convex polygons
fn contains(edges: &[(Vector2<f64>, Vector2<f64>)], sample: Vector2<f64>) -> bool {
    let mut positive = false;
    let mut negative = false;
    for (origin, direction) in edges {
        let rel = sample - origin;
        let cross = direction.x * rel.y - direction.y * rel.x;
        if cross > 0.0 {
            positive = true;
        } else if cross < 0.0 {
            negative = true;
        }
        if positive && negative {
            return false;
        }
    }
    true
}

impl Scene for RasterScene {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn set_background_color(&mut self, color: RGBA) {
        self.background = color;
    }

    fn background_color(&self) -> RGBA {
        self.background
    }

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self) {
        let px = Rgba(self.background.to_rgba8());
        for pixel in self.image.pixels_mut() {
            *pixel = px;
        }
    }

    fn draw_shape_fill(&mut self, shape: Shape, color: RGBA, transform: Option<Affine>, alpha: f32) {
        let transform = transform.unwrap_or_default();
        let polygon: Vec<Point> = shape.to_polygon().into_iter().map(|p| transform.apply(p)).collect();
        let color = color.with_alpha((color.a * alpha).clamp(0.0, 1.0));
        self.fill_convex(&polygon, color);
    }
}

/// Creates [`RasterScene`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterRenderer;

impl Renderer for RasterRenderer {
    fn create_scene(&self, width: u32, height: u32) -> Box<dyn Scene> {
        Box::new(RasterScene::new(width, height))
    }

    fn save_frame(&self, scene: &dyn Scene, path: &Path) -> image::ImageResult<()> {
        match scene.as_any().downcast_ref::<RasterScene>() {
            Some(raster) => raster.save_png(path),
            None => Err(image::ImageError::Unsupported(
                image::error::UnsupportedError::from_format_and_kind(
                    image::error::ImageFormatHint::Unknown,
                    image::error::UnsupportedErrorKind::GenericFeature("non-raster scene".to_string()),
                ),
            )),
        }
    }
}
