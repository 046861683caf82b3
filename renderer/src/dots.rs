//! Random-dot kinematogram. The field owns the per-dot simulation; callers
//! only hand in parameters and ask for one frame at a time.

use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};
use strum::{Display, EnumString};

use crate::{
    affine::Affine,
    colors::RGBA,
    scenes::Scene,
    shapes::{Point, Shape},
};

/// How noise dots move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NoiseDots {
    /// Each noise dot keeps a random direction for its whole life.
    Direction,
    /// Noise dots are replotted at a random position every frame.
    Position,
    /// Noise dots pick a new random direction every frame.
    Walk,
}

/// Whether the set of signal dots is fixed or redrawn every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SignalDots {
    Same,
    Different,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FieldShape {
    Circle,
    Square,
}

/// Parameters of a dot field, in pixels and frames.
#[derive(Debug, Clone, PartialEq)]
pub struct DotFieldParams {
    /// Fraction of dots moving coherently, in `[0, 1]`.
    pub coherence: f64,
    /// Width and height of the field.
    pub field_size: (f64, f64),
    pub field_shape: FieldShape,
    /// Dot diameter.
    pub dot_size: f64,
    /// Lifetime in frames; a negative value means dots live forever.
    pub dot_life: i32,
    pub noise_dots: NoiseDots,
    pub signal_dots: SignalDots,
    /// Distance travelled per frame.
    pub speed: f64,
    pub n_dots: usize,
    /// Direction of coherent motion in degrees, counter-clockwise from +x.
    pub direction: f64,
    pub color: RGBA,
}

#[derive(Debug, Clone)]
struct Dot {
    position: Point,
    /// radians, counter-clockwise from +x
    direction: f64,
    age: i32,
    signal: bool,
}

#[derive(Debug, Clone)]
pub struct DotField {
    params: DotFieldParams,
    dots: Vec<Dot>,
    rng: StdRng,
    frame: u64,
}

impl DotField {
    pub fn new(params: DotFieldParams, seed: u64) -> Self {
        let mut field = Self {
            params,
            dots: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
        };

        let n = field.params.n_dots;
        let life = field.params.dot_life;
        for _ in 0..n {
            let position = field.random_position();
            let direction = field.random_direction();
            let age = if life > 0 { field.rng.gen_range(0..life) } else { 0 };
            field.dots.push(Dot {
                position,
                direction,
                age,
                signal: false,
            });
        }
        field.assign_signal();

        log::debug!(
            "created dot field with {} dots ({} signal)",
            field.dots.len(),
            field.signal_count()
        );

        field
    }

    pub fn params(&self) -> &DotFieldParams {
        &self.params
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of signal dots this frame.
    pub fn signal_count(&self) -> usize {
        self.dots.iter().filter(|d| d.signal).count()
    }

    /// Dot centers relative to the field center, y pointing up.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.dots.iter().map(|d| d.position)
    }

    fn n_signal(&self) -> usize {
        let n = self.params.n_dots as f64 * self.params.coherence.clamp(0.0, 1.0);
        n.round() as usize
    }

    fn assign_signal(&mut self) {
        let n_signal = self.n_signal().min(self.dots.len());
        for dot in self.dots.iter_mut() {
            dot.signal = false;
        }
        for i in sample(&mut self.rng, self.dots.len(), n_signal) {
            self.dots[i].signal = true;
        }
    }

    fn random_direction(&mut self) -> f64 {
        self.rng.gen_range(0.0..std::f64::consts::TAU)
    }

    fn random_position(&mut self) -> Point {
        let (w, h) = self.params.field_size;
        match self.params.field_shape {
            FieldShape::Square => Point::new(
                self.rng.gen_range(-0.5..0.5) * w,
                self.rng.gen_range(-0.5..0.5) * h,
            ),
            FieldShape::Circle => {
                // uniform over the ellipse inscribed in the field
                let r = self.rng.gen::<f64>().sqrt();
                let theta = self.random_direction();
                Point::new(r * theta.cos() * w / 2.0, r * theta.sin() * h / 2.0)
            }
        }
    }

    fn inside(&self, p: Point) -> bool {
        let (w, h) = self.params.field_size;
        let (hw, hh) = (w / 2.0, h / 2.0);
        if hw <= 0.0 || hh <= 0.0 {
            return false;
        }
        match self.params.field_shape {
            FieldShape::Square => p.x.abs() <= hw && p.y.abs() <= hh,
            FieldShape::Circle => (p.x / hw).powi(2) + (p.y / hh).powi(2) <= 1.0,
        }
    }

    /// Advance the simulation by one frame.
    pub fn update(&mut self) {
        if self.params.signal_dots == SignalDots::Different {
            self.assign_signal();
        }

        let signal_direction = self.params.direction.to_radians();
        let speed = self.params.speed;
        let life = self.params.dot_life;

        for i in 0..self.dots.len() {
            let (signal, age) = (self.dots[i].signal, self.dots[i].age + 1);

            if life > 0 && age >= life {
                let position = self.random_position();
                let direction = self.random_direction();
                let dot = &mut self.dots[i];
                dot.position = position;
                dot.direction = direction;
                dot.age = 0;
                continue;
            }
            self.dots[i].age = age;

            let direction = if signal {
                signal_direction
            } else {
                match self.params.noise_dots {
                    NoiseDots::Direction => self.dots[i].direction,
                    NoiseDots::Walk => self.random_direction(),
                    NoiseDots::Position => {
                        let position = self.random_position();
                        self.dots[i].position = position;
                        continue;
                    }
                }
            };

            let dot = &mut self.dots[i];
            dot.position.x += speed * direction.cos();
            dot.position.y += speed * direction.sin();

            if !self.inside(self.dots[i].position) {
                let position = self.random_position();
                self.dots[i].position = position;
            }
        }

        self.frame += 1;
    }

    /// Draw every dot. `to_scene` maps field coordinates (y up, origin at
    /// the field center) into scene pixels.
    pub fn draw(&self, scene: &mut dyn Scene, to_scene: Affine) {
        let radius = self.params.dot_size / 2.0;
        for dot in &self.dots {
            let center = to_scene.apply(dot.position);
            scene.draw_shape_fill(
                Shape::Circle {
                    center,
                    radius,
                    edges: 12,
                },
                self.params.color,
                None,
                1.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DotFieldParams {
        DotFieldParams {
            coherence: 0.5,
            field_size: (200.0, 200.0),
            field_shape: FieldShape::Circle,
            dot_size: 4.0,
            dot_life: 20,
            noise_dots: NoiseDots::Direction,
            signal_dots: SignalDots::Same,
            speed: 1.0,
            n_dots: 200,
            direction: 90.0,
            color: RGBA::BLACK,
        }
    }

    #[test]
    fn coherence_sets_signal_count() {
        let field = DotField::new(params(), 7);
        assert_eq!(field.signal_count(), 100);
        assert_eq!(field.positions().count(), 200);
    }

    #[test]
    fn dots_stay_inside_field() {
        let mut field = DotField::new(params(), 11);
        for _ in 0..100 {
            field.update();
            for p in field.positions() {
                assert!((p.x / 100.0).powi(2) + (p.y / 100.0).powi(2) <= 1.0 + 1e-9);
            }
        }
        assert_eq!(field.frame(), 100);
    }

    #[test]
    fn fully_coherent_immortal_dots_move_upwards() {
        let mut p = params();
        p.coherence = 1.0;
        p.dot_life = -1;
        p.field_size = (10_000.0, 10_000.0);
        p.field_shape = FieldShape::Square;
        let mut field = DotField::new(p, 3);
        let before: Vec<Point> = field.positions().collect();
        field.update();
        // dots crossing the top edge are respawned, everything else moves by one pixel
        let moved_up = before
            .iter()
            .zip(field.positions())
            .filter(|(a, b)| (b.y - a.y - 1.0).abs() < 1e-9 && (b.x - a.x).abs() < 1e-9)
            .count();
        assert!(moved_up >= 190, "only {moved_up} dots moved coherently");
    }

    #[test]
    fn policies_parse_from_strings() {
        assert_eq!("walk".parse::<NoiseDots>().unwrap(), NoiseDots::Walk);
        assert_eq!("different".parse::<SignalDots>().unwrap(), SignalDots::Different);
        assert_eq!(FieldShape::Circle.to_string(), "circle");
    }
}
