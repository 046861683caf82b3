// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The fixed set of stimuli shown during a session.

use std::sync::Arc;

use renderer::colors::RGBA;
use renderer::dots::{FieldShape, NoiseDots, SignalDots};

use crate::errors::SkeletonError;
use crate::visual::geometry::Units;
use crate::visual::motion::{MotionParams, MotionStim};
use crate::visual::skeleton::{SkeletonNode, SkeletonStim};
use crate::visual::stimuli::Stimulus;

/// Number of skeleton shapes in the catalog.
pub const SHAPE_COUNT: usize = 10;

/// Thickness used by the design sketches unless they set their own.
pub const DEFAULT_SKETCH_THICKNESS: f64 = 20.0;

fn leaf(x: i32, y: i32) -> Arc<SkeletonNode> {
    SkeletonNode::leaf((x, y))
}

fn node(x: i32, y: i32, connections: Vec<Arc<SkeletonNode>>) -> Arc<SkeletonNode> {
    SkeletonNode::new((x, y), connections)
}

/// Roots of the ten skeleton shapes, indexed by stimulus id. Every call
/// builds fresh trees.
pub fn shape_roots() -> Vec<Arc<SkeletonNode>> {
    vec![
        // one segment
        node(0, -100, vec![leaf(0, 100)]),
        node(100, 0, vec![leaf(-100, 0)]),
        node(100, 100, vec![leaf(-100, -100)]),
        // two segments
        node(-100, 0, vec![leaf(100, -50), leaf(100, 50)]),
        node(50, 0, vec![leaf(-50, -100), leaf(-50, 100)]),
        // three segments
        node(50, -100, vec![node(50, 0, vec![node(-50, 0, vec![leaf(-50, 100)])])]),
        node(0, 0, vec![leaf(0, -100), leaf(100, 50), leaf(-100, 50)]),
        node(-100, -100, vec![node(100, -100, vec![node(100, 100, vec![leaf(-100, 100)])])]),
        node(0, 0, vec![leaf(50, -100), leaf(-50, -100), leaf(0, 100)]),
        node(0, 0, vec![leaf(75, 50), leaf(75, -50), leaf(100, 0)]),
    ]
}

/// The ten skeleton shapes with ids 0 to 9.
pub fn build_shapes(thickness: f64) -> Vec<SkeletonStim> {
    shape_roots()
        .into_iter()
        .enumerate()
        .map(|(id, root)| SkeletonStim::new(root, id as u32, thickness))
        .collect()
}

/// The random-dot stimulus, with dots as large as the skeleton lines.
pub fn motion_stimulus(thickness: f64) -> MotionStim {
    MotionStim::new(MotionParams {
        units: Units::Degrees,
        coherence: 0.5,
        field_size: (50.0, 50.0),
        color: RGBA::from_signed(-1.0, -1.0, -1.0),
        dot_size: thickness,
        dot_life: 20,
        noise_dots: NoiseDots::Direction,
        signal_dots: SignalDots::Same,
        speed: 0.01,
        n_dots: 200,
        field_shape: FieldShape::Circle,
        direction: 90.0,
    })
}

/// All stimuli of a session: the shapes in id order, then the motion
/// stimulus.
pub fn build_catalog(thickness: f64) -> Vec<Box<dyn Stimulus>> {
    let mut catalog: Vec<Box<dyn Stimulus>> = build_shapes(thickness)
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn Stimulus>)
        .collect();
    catalog.push(Box::new(motion_stimulus(thickness)));

    log::debug!("built catalog with {} stimuli", catalog.len());
    catalog
}

/// A single catalog entry.
pub fn stimulus_by_id(id: u32, thickness: f64) -> Result<Box<dyn Stimulus>, SkeletonError> {
    build_catalog(thickness)
        .into_iter()
        .find(|s| s.stimulus_id() == id)
        .ok_or(SkeletonError::UnknownStimulusError(id))
}

/// Skeletons from the early design sessions. The first and last share a
/// node, which ends up drawn once per path that reaches it.
pub fn sketches() -> Vec<(&'static str, SkeletonStim)> {
    let node4 = leaf(0, 250);
    let node3 = node(-100, 150, vec![node4.clone()]);
    let node2 = node(100, 100, vec![node3.clone()]);
    let node1 = node(0, 0, vec![node2.clone(), node4]);
    let node0 = node(0, 0, vec![node2.clone()]);

    vec![
        ("skel1", SkeletonStim::new(node3, 0, DEFAULT_SKETCH_THICKNESS)),
        ("skel2", SkeletonStim::new(node2, 1, DEFAULT_SKETCH_THICKNESS)),
        ("skel3", SkeletonStim::new(node0, 2, DEFAULT_SKETCH_THICKNESS)),
        ("skel4", SkeletonStim::new(node1, 3, 10.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::geometry::Point;
    use crate::visual::motion::MOTION_STIMULUS_ID;
    use crate::visual::skeleton::Primitive;
    use crate::visual::stimuli::StimulusType;

    #[test]
    fn shapes_have_expected_topology() {
        let shapes = build_shapes(10.0);
        let discs: Vec<usize> = shapes.iter().map(|s| s.disc_count()).collect();
        let rects: Vec<usize> = shapes.iter().map(|s| s.rect_count()).collect();
        assert_eq!(discs, [2, 2, 2, 3, 3, 4, 4, 4, 4, 4]);
        assert_eq!(rects, [1, 1, 1, 2, 2, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn every_shape_matches_its_coordinates() {
        // disc centers in pre-order, and for each later disc the index of its parent
        let expected: [(&[(f64, f64)], &[usize]); SHAPE_COUNT] = [
            (&[(0.0, -100.0), (0.0, 100.0)], &[0]),
            (&[(100.0, 0.0), (-100.0, 0.0)], &[0]),
            (&[(100.0, 100.0), (-100.0, -100.0)], &[0]),
            (&[(-100.0, 0.0), (100.0, -50.0), (100.0, 50.0)], &[0, 0]),
            (&[(50.0, 0.0), (-50.0, -100.0), (-50.0, 100.0)], &[0, 0]),
            (&[(50.0, -100.0), (50.0, 0.0), (-50.0, 0.0), (-50.0, 100.0)], &[0, 1, 2]),
            (&[(0.0, 0.0), (0.0, -100.0), (100.0, 50.0), (-100.0, 50.0)], &[0, 0, 0]),
            (&[(-100.0, -100.0), (100.0, -100.0), (100.0, 100.0), (-100.0, 100.0)], &[0, 1, 2]),
            (&[(0.0, 0.0), (50.0, -100.0), (-50.0, -100.0), (0.0, 100.0)], &[0, 0, 0]),
            (&[(0.0, 0.0), (75.0, 50.0), (75.0, -50.0), (100.0, 0.0)], &[0, 0, 0]),
        ];

        for (id, (shape, (centers, parents))) in build_shapes(10.0).iter().zip(expected).enumerate() {
            let centers: Vec<Point> = centers.iter().map(|&(x, y)| Point::new(x, y)).collect();
            let discs: Vec<Point> = shape
                .primitives()
                .iter()
                .filter_map(|p| match p {
                    Primitive::Disc(d) => Some(d.center),
                    _ => None,
                })
                .collect();
            assert_eq!(discs, centers, "disc centers of shape {}", id);

            let rects: Vec<(Point, Point)> = shape
                .primitives()
                .iter()
                .filter_map(|p| match p {
                    Primitive::Rect(r) => Some((r.p0, r.p1)),
                    _ => None,
                })
                .collect();
            let joined: Vec<(Point, Point)> = parents
                .iter()
                .enumerate()
                .map(|(child, &parent)| (centers[parent], centers[child + 1]))
                .collect();
            assert_eq!(rects, joined, "rect endpoints of shape {}", id);
        }
    }

    #[test]
    fn shape_7_is_an_open_square() {
        let shape = &build_shapes(10.0)[7];
        let corners: Vec<Point> = shape
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Disc(d) => Some(d.center),
                _ => None,
            })
            .collect();
        assert_eq!(
            corners,
            [
                Point::new(-100.0, -100.0),
                Point::new(100.0, -100.0),
                Point::new(100.0, 100.0),
                Point::new(-100.0, 100.0),
            ]
        );
        let lengths: Vec<f64> = shape
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Rect(r) => Some(r.length),
                _ => None,
            })
            .collect();
        assert_eq!(lengths, [200.0, 200.0, 200.0]);
    }

    #[test]
    fn catalog_ends_with_motion() {
        let catalog = build_catalog(10.0);
        assert_eq!(catalog.len(), SHAPE_COUNT + 1);
        let ids: Vec<u32> = catalog.iter().map(|s| s.stimulus_id()).collect();
        assert_eq!(ids, (0..=10).collect::<Vec<u32>>());

        let motion = catalog[10].downcast_ref::<MotionStim>().unwrap();
        assert_eq!(motion.stimulus_type(), StimulusType::Motion);
        assert_eq!(motion.params().dot_size, 10.0);
        assert_eq!(motion.stimulus_id(), MOTION_STIMULUS_ID);
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(stimulus_by_id(4, 10.0).unwrap().stimulus_id(), 4);
        assert!(matches!(
            stimulus_by_id(11, 10.0),
            Err(SkeletonError::UnknownStimulusError(11))
        ));
    }

    #[test]
    fn sketches_share_nodes() {
        let sketches = sketches();
        let (name, skel4) = &sketches[3];
        assert_eq!(*name, "skel4");
        assert_eq!(skel4.thickness(), 10.0);
        // node4 is reached directly and through node2 -> node3
        assert_eq!(skel4.disc_count(), 5);
        assert_eq!(skel4.rect_count(), 4);
        assert_eq!(sketches[0].1.disc_count(), 2);
    }
}
