#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// Fillable shapes in scene (pixel) coordinates. Transforms are applied by
/// the scene at draw time.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A circle approximated by a regular polygon with `edges` sides.
    Circle { center: Point, radius: f64, edges: u32 },
    /// An axis-aligned rectangle with top left corner `a`.
    Rectangle { a: Point, w: f64, h: f64 },
}

impl Shape {
    /// Rectangle of size `w` x `h` centered on the origin. Combine with a
    /// transform to rotate and place it.
    pub fn centered_rectangle(w: f64, h: f64) -> Shape {
        Shape::Rectangle {
            a: Point::new(-w / 2.0, -h / 2.0),
            w,
            h,
        }
    }

    /// Outline of the shape as a convex polygon.
    pub fn to_polygon(&self) -> Vec<Point> {
        match self {
            Shape::Circle { center, radius, edges } => {
                let edges = (*edges).max(3);
                (0..edges)
                    .map(|i| {
                        let angle = i as f64 * std::f64::consts::TAU / edges as f64;
                        Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
                    })
                    .collect()
            }
            Shape::Rectangle { a, w, h } => vec![
                *a,
                Point::new(a.x + w, a.y),
                Point::new(a.x + w, a.y + h),
                Point::new(a.x, a.y + h),
            ],
        }
    }
}
