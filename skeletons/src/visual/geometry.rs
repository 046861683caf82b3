// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use strum::{Display, EnumString};

/// A position in the stimulus plane. The origin is the center of the window,
/// x points right and y points up. Units are pixels unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point {
            x: x as f64,
            y: y as f64,
        }
    }
}

/// Euclidean distance between `p0` and `p1`.
pub fn length(p0: Point, p1: Point) -> f64 {
    ((p0.x - p1.x).powi(2) + (p0.y - p1.y).powi(2)).sqrt()
}

pub fn midpoint(p0: Point, p1: Point) -> Point {
    Point {
        x: (p0.x + p1.x) / 2.0,
        y: (p0.y + p1.y) / 2.0,
    }
}

/// Orientation of the segment `p0 -> p1` in degrees, clockwise-positive.
///
/// At 0° a segment points along +x. Vertical segments get 90° when pointing
/// down and 270° otherwise, which includes the zero-length segment.
pub fn orientation(p0: Point, p1: Point) -> f64 {
    let dy = p1.y - p0.y;
    let dx = p1.x - p0.x;

    if dx == 0.0 {
        if dy < 0.0 {
            return 90.0;
        }
        return 270.0;
    }

    (-dy.atan2(dx)).to_degrees()
}

/// Units in which stimulus sizes can be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Units {
    /// Physical pixels.
    #[strum(serialize = "pix")]
    Pixels,
    /// Degrees of visual angle.
    #[strum(serialize = "deg")]
    Degrees,
    /// Centimeters on the screen surface.
    #[strum(serialize = "cm")]
    Centimeters,
}

/// Physical description of the display, used to convert visual angle into
/// pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorProfile {
    pub name: String,
    /// Visible width of the screen in centimeters.
    pub width_cm: f64,
    /// Distance between the eye and the screen in centimeters.
    pub distance_cm: f64,
    /// Resolution of the screen in pixels.
    pub size_px: (u32, u32),
}

impl Default for MonitorProfile {
    fn default() -> Self {
        Self {
            name: "testMonitor".to_string(),
            width_cm: 30.0,
            distance_cm: 57.0,
            size_px: (1024, 768),
        }
    }
}

impl MonitorProfile {
    pub fn pixels_per_cm(&self) -> f64 {
        self.size_px.0 as f64 / self.width_cm
    }

    /// Size on the screen in centimeters that subtends `deg` degrees.
    pub fn deg_to_cm(&self, deg: f64) -> f64 {
        2.0 * self.distance_cm * (deg.to_radians() / 2.0).tan()
    }

    pub fn deg_to_pix(&self, deg: f64) -> f64 {
        self.deg_to_cm(deg) * self.pixels_per_cm()
    }

    pub fn to_pixels(&self, value: f64, units: Units) -> f64 {
        match units {
            Units::Pixels => value,
            Units::Degrees => self.deg_to_pix(value),
            Units::Centimeters => value * self.pixels_per_cm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn length_is_symmetric_and_non_negative() {
        let pairs = [
            (Point::new(0.0, 0.0), Point::new(3.0, 4.0)),
            (Point::new(-10.0, 2.5), Point::new(7.0, -1.0)),
            (Point::new(1.0, 1.0), Point::new(1.0, 1.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(length(a, b), length(b, a));
            assert!(length(a, b) >= 0.0);
        }
        assert!((length(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < EPS);
    }

    #[test]
    fn midpoint_is_symmetric() {
        let a = Point::new(-100.0, 50.0);
        let b = Point::new(100.0, -150.0);
        assert_eq!(midpoint(a, b), midpoint(b, a));
        assert_eq!(midpoint(a, b), Point::new(0.0, -50.0));
    }

    #[test]
    fn vertical_segments_use_fixed_angles() {
        let origin = Point::ORIGIN;
        assert_eq!(orientation(origin, Point::new(0.0, -10.0)), 90.0);
        assert_eq!(orientation(origin, Point::new(0.0, 10.0)), 270.0);
        // zero-length segment falls into the upward branch
        assert_eq!(orientation(origin, origin), 270.0);
        assert_eq!(orientation(Point::new(5.0, 5.0), Point::new(5.0, 5.0)), 270.0);
    }

    #[test]
    fn non_vertical_segments_follow_negated_atan2() {
        let cases = [
            ((0.0, 0.0), (100.0, 0.0), 0.0),
            ((0.0, 0.0), (100.0, 100.0), -45.0),
            ((0.0, 0.0), (100.0, -100.0), 45.0),
            ((100.0, 0.0), (-100.0, 0.0), -180.0),
            ((100.0, 100.0), (-100.0, -100.0), 135.0),
        ];
        for (a, b, expected) in cases {
            let got = orientation(a.into(), b.into());
            assert!((got - expected).abs() < EPS, "{a:?} -> {b:?}: {got} != {expected}");
        }
    }

    #[test]
    fn orientation_matches_formula_modulo_360() {
        let points: [f64; 6] = [-120.0, -37.5, -1.0, 0.5, 42.0, 250.0];
        for &x0 in &points {
            for &y0 in &points {
                for &x1 in &points {
                    for &y1 in &points {
                        if x0 == x1 {
                            continue;
                        }
                        let expected = (-(y1 - y0).atan2(x1 - x0)).to_degrees();
                        let got = orientation(Point::new(x0, y0), Point::new(x1, y1));
                        let diff = (got - expected).rem_euclid(360.0);
                        assert!(diff < EPS || 360.0 - diff < EPS);
                    }
                }
            }
        }
    }

    #[test]
    fn degrees_convert_through_viewing_distance() {
        let monitor = MonitorProfile {
            name: "bench".to_string(),
            width_cm: 30.0,
            distance_cm: 15.0,
            size_px: (800, 800),
        };
        // one degree at 15 cm is ~0.2618 cm
        assert!((monitor.deg_to_cm(1.0) - 0.261_806).abs() < 1e-5);
        assert!((monitor.to_pixels(30.0, Units::Centimeters) - 800.0).abs() < EPS);
        assert_eq!(monitor.to_pixels(12.0, Units::Pixels), 12.0);
        assert_eq!("deg".parse::<Units>().unwrap(), Units::Degrees);
        assert_eq!(Units::Pixels.to_string(), "pix");
    }
}
