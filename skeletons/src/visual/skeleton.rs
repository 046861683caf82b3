// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Skeleton shapes: trees of points drawn as discs joined by oriented
//! rectangles.

use std::sync::Arc;

use renderer::colors::RGBA;

use super::geometry::{length, midpoint, orientation, Point};
use super::stimuli::{Stimulus, StimulusType};
use super::window::RenderWindow;

/// Number of edges used to approximate the joint discs.
pub const DISC_EDGES: u32 = 32;

/// A node of a skeleton. Children are reference counted so that several
/// parents may point to the same node; nodes cannot be modified after
/// construction, which also rules out cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonNode {
    position: Point,
    connections: Vec<Arc<SkeletonNode>>,
}

impl SkeletonNode {
    pub fn new(position: impl Into<Point>, connections: Vec<Arc<SkeletonNode>>) -> Arc<Self> {
        Arc::new(Self {
            position: position.into(),
            connections,
        })
    }

    /// A node without children.
    pub fn leaf(position: impl Into<Point>) -> Arc<Self> {
        Self::new(position, Vec::new())
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn connections(&self) -> &[Arc<SkeletonNode>] {
        &self.connections
    }

    /// Number of nodes visited by a traversal from this node. Shared
    /// sub-nodes are counted once per path that reaches them.
    pub fn node_count(&self) -> usize {
        1 + self.connections.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Number of edges visited by a traversal from this node.
    pub fn edge_count(&self) -> usize {
        self.node_count() - 1
    }
}

/// A filled disc marking a skeleton joint.
#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    pub center: Point,
    pub radius: f64,
    pub edges: u32,
    pub opacity: f64,
}

/// A rectangle spanning two joints. Length, center and orientation are
/// derived once from the endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
    pub thickness: f64,
    pub length: f64,
    pub center: Point,
    pub orientation: f64,
    pub opacity: f64,
}

impl Rect {
    pub fn new(p0: Point, p1: Point, thickness: f64) -> Self {
        Self {
            p0,
            p1,
            thickness,
            length: length(p0, p1),
            center: midpoint(p0, p1),
            orientation: orientation(p0, p1),
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Disc(Disc),
    Rect(Rect),
}

impl Primitive {
    pub fn opacity(&self) -> f64 {
        match self {
            Primitive::Disc(disc) => disc.opacity,
            Primitive::Rect(rect) => rect.opacity,
        }
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        match self {
            Primitive::Disc(disc) => disc.opacity = opacity,
            Primitive::Rect(rect) => rect.opacity = opacity,
        }
    }

    pub fn is_disc(&self) -> bool {
        matches!(self, Primitive::Disc(_))
    }

    pub fn is_rect(&self) -> bool {
        matches!(self, Primitive::Rect(_))
    }

    pub fn draw(&self, window: &mut dyn RenderWindow, color: RGBA) {
        match self {
            Primitive::Disc(disc) => window.draw_disc(disc.center, disc.radius, disc.edges, color, disc.opacity),
            Primitive::Rect(rect) => window.draw_rect(
                rect.center,
                rect.length,
                rect.thickness,
                rect.orientation,
                color,
                rect.opacity,
            ),
        }
    }
}

/// Compiles the tree below `root` into a flat list of primitives in
/// depth-first pre-order: a disc for each node, and before descending into
/// a child, the rectangle joining it to its parent.
pub fn build(root: &SkeletonNode, thickness: f64) -> Vec<Primitive> {
    let mut primitives = Vec::new();
    let mut stack: Vec<(Option<Point>, &SkeletonNode)> = vec![(None, root)];

    while let Some((parent, node)) = stack.pop() {
        if let Some(parent) = parent {
            primitives.push(Primitive::Rect(Rect::new(parent, node.position, thickness)));
        }

        primitives.push(Primitive::Disc(Disc {
            center: node.position,
            radius: thickness / 2.0,
            edges: DISC_EDGES,
            opacity: 1.0,
        }));

        // reversed so that the first child is handled first
        for child in node.connections.iter().rev() {
            stack.push((Some(node.position), child.as_ref()));
        }
    }

    primitives
}

/// A shape stimulus built from a skeleton.
#[derive(Debug, Clone)]
pub struct SkeletonStim {
    root: Arc<SkeletonNode>,
    stimulus_id: u32,
    thickness: f64,
    primitives: Vec<Primitive>,
}

impl SkeletonStim {
    pub fn new(root: Arc<SkeletonNode>, stimulus_id: u32, thickness: f64) -> Self {
        let primitives = build(&root, thickness);
        log::trace!(
            "built skeleton {} with {} primitives (thickness {})",
            stimulus_id,
            primitives.len(),
            thickness
        );
        Self {
            root,
            stimulus_id,
            thickness,
            primitives,
        }
    }

    pub fn root(&self) -> &Arc<SkeletonNode> {
        &self.root
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn disc_count(&self) -> usize {
        self.primitives.iter().filter(|p| p.is_disc()).count()
    }

    pub fn rect_count(&self) -> usize {
        self.primitives.iter().filter(|p| p.is_rect()).count()
    }

    /// Set the opacity of every primitive. The value is not clamped here;
    /// the window clamps when compositing.
    pub fn set_opacity(&mut self, opacity: f64) {
        for primitive in self.primitives.iter_mut() {
            primitive.set_opacity(opacity);
        }
    }

    /// Add `delta` to each primitive's current opacity.
    pub fn change_opacity(&mut self, delta: f64) {
        for primitive in self.primitives.iter_mut() {
            let opacity = primitive.opacity();
            primitive.set_opacity(opacity + delta);
        }
    }
}

impl Stimulus for SkeletonStim {
    fn draw(&mut self, window: &mut dyn RenderWindow) {
        for primitive in &self.primitives {
            primitive.draw(window, RGBA::WHITE);
        }
    }

    fn stimulus_id(&self) -> u32 {
        self.stimulus_id
    }

    fn stimulus_type(&self) -> StimulusType {
        StimulusType::Shape
    }

    fn set_opacity(&mut self, opacity: f64) {
        SkeletonStim::set_opacity(self, opacity);
    }

    fn change_opacity(&mut self, delta: f64) {
        SkeletonStim::change_opacity(self, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::recording::{DrawCall, RecordingWindow};

    fn three_branch_tree() -> Arc<SkeletonNode> {
        // root -> a -> (a1, a2), root -> b
        let a1 = SkeletonNode::leaf((10, 20));
        let a2 = SkeletonNode::leaf((-10, 20));
        let a = SkeletonNode::new((0, 10), vec![a1, a2]);
        let b = SkeletonNode::leaf((0, -10));
        SkeletonNode::new((0, 0), vec![a, b])
    }

    #[test]
    fn single_edge_scenario() {
        let root = SkeletonNode::new((0.0, 0.0), vec![SkeletonNode::leaf((100.0, 0.0))]);
        let stim = SkeletonStim::new(root, 0, 20.0);

        assert_eq!(stim.disc_count(), 2);
        assert_eq!(stim.rect_count(), 1);

        match stim.primitives() {
            [Primitive::Disc(d0), Primitive::Rect(r), Primitive::Disc(d1)] => {
                assert_eq!(d0.center, Point::new(0.0, 0.0));
                assert_eq!(d1.center, Point::new(100.0, 0.0));
                assert_eq!(d0.radius, 10.0);
                assert_eq!(d0.edges, 32);
                assert_eq!(r.length, 100.0);
                assert_eq!(r.center, Point::new(50.0, 0.0));
                assert_eq!(r.orientation, 0.0);
                assert_eq!(r.thickness, 20.0);
                assert_eq!(r.opacity, 1.0);
            }
            other => panic!("unexpected primitives: {other:?}"),
        }
    }

    #[test]
    fn build_emits_pre_order() {
        let prims = build(&three_branch_tree(), 4.0);
        let kinds: Vec<&str> = prims.iter().map(|p| if p.is_disc() { "disc" } else { "rect" }).collect();
        assert_eq!(
            kinds,
            ["disc", "rect", "disc", "rect", "disc", "rect", "disc", "rect", "disc"]
        );

        let disc_centers: Vec<Point> = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Disc(d) => Some(d.center),
                _ => None,
            })
            .collect();
        assert_eq!(
            disc_centers,
            [
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 20.0),
                Point::new(-10.0, 20.0),
                Point::new(0.0, -10.0),
            ]
        );

        // each rectangle starts at its parent
        let rect_ends: Vec<(Point, Point)> = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Rect(r) => Some((r.p0, r.p1)),
                _ => None,
            })
            .collect();
        assert_eq!(rect_ends[1], (Point::new(0.0, 10.0), Point::new(10.0, 20.0)));
        assert_eq!(rect_ends[3], (Point::new(0.0, 0.0), Point::new(0.0, -10.0)));
    }

    #[test]
    fn counts_match_nodes_and_edges() {
        let root = three_branch_tree();
        let stim = SkeletonStim::new(root.clone(), 3, 10.0);
        assert_eq!(stim.disc_count(), root.node_count());
        assert_eq!(stim.rect_count(), root.edge_count());
        assert_eq!(root.node_count(), 5);
    }

    #[test]
    fn shared_nodes_are_visited_per_path() {
        let shared = SkeletonNode::leaf((0, 250));
        let mid = SkeletonNode::new((-100, 150), vec![shared.clone()]);
        let root = SkeletonNode::new((0, 0), vec![mid, shared]);
        let stim = SkeletonStim::new(root, 0, 10.0);
        assert_eq!(stim.disc_count(), 4);
        assert_eq!(stim.rect_count(), 3);
    }

    #[test]
    fn leaf_only_skeleton_is_one_disc() {
        let stim = SkeletonStim::new(SkeletonNode::leaf((5, 5)), 1, 8.0);
        assert_eq!(stim.primitives().len(), 1);
        assert!(stim.primitives()[0].is_disc());
    }

    #[test]
    fn set_opacity_reaches_every_primitive() {
        let mut stim = SkeletonStim::new(three_branch_tree(), 0, 10.0);
        stim.set_opacity(0.25);
        assert!(stim.primitives().iter().all(|p| p.opacity() == 0.25));
        // values outside [0, 1] are kept as given
        stim.set_opacity(1.5);
        assert!(stim.primitives().iter().all(|p| p.opacity() == 1.5));
    }

    #[test]
    fn change_opacity_accumulates() {
        let mut twice = SkeletonStim::new(three_branch_tree(), 0, 10.0);
        let mut once = twice.clone();
        twice.set_opacity(0.0);
        once.set_opacity(0.0);

        twice.change_opacity(0.125);
        twice.change_opacity(0.125);
        once.change_opacity(0.25);

        for (a, b) in twice.primitives().iter().zip(once.primitives()) {
            assert_eq!(a.opacity(), b.opacity());
        }
    }

    #[test]
    fn change_opacity_keeps_primitives_independent() {
        let mut stim = SkeletonStim::new(three_branch_tree(), 0, 10.0);
        stim.primitives[0].set_opacity(0.5);
        stim.change_opacity(-0.25);
        assert_eq!(stim.primitives()[0].opacity(), 0.25);
        assert_eq!(stim.primitives()[1].opacity(), 0.75);
    }

    #[test]
    fn draw_forwards_primitives_in_order() {
        let mut stim = SkeletonStim::new(
            SkeletonNode::new((0, -100), vec![SkeletonNode::leaf((0, 100))]),
            0,
            10.0,
        );
        stim.set_opacity(0.5);
        let mut window = RecordingWindow::new((800, 800), 60.0);
        stim.draw(&mut window);

        let calls = window.draw_calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], DrawCall::Disc { radius, opacity, .. } if radius == 5.0 && opacity == 0.5));
        assert!(matches!(
            calls[1],
            DrawCall::Rect { width, height, orientation, .. } if width == 200.0 && height == 10.0 && orientation == 270.0
        ));
        assert!(matches!(calls[2], DrawCall::Disc { center, .. } if center == Point::new(0.0, 100.0)));
        assert!(calls.iter().all(|c| matches!(
            c,
            DrawCall::Disc { color, .. } | DrawCall::Rect { color, .. } if *color == RGBA::WHITE
        )));
    }
}
