//! Geometry emitted by the turtle: stroked segments, custom-action output and
//! the final turtle state, ready for an external renderer.

use crate::turtle::TurtleState;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A straight stroke drawn by a forward step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Extra geometry emitted by custom actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AuxGeometry {
    Point(Vec2),
    Circle { center: Vec2, radius: f32 },
    Polyline(Vec<Vec2>),
}

impl AuxGeometry {
    fn extend_bounds(&self, min: &mut Vec2, max: &mut Vec2) {
        match self {
            Self::Point(p) => {
                *min = min.min(*p);
                *max = max.max(*p);
            }
            Self::Circle { center, radius } => {
                let r = Vec2::splat(radius.abs());
                *min = min.min(*center - r);
                *max = max.max(*center + r);
            }
            Self::Polyline(points) => {
                for p in points {
                    *min = min.min(*p);
                    *max = max.max(*p);
                }
            }
        }
    }
}

/// Everything a turtle interpretation produces.
///
/// This is the only hand-off to a renderer: the crate itself never writes
/// files or rasterises.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Drawn strokes, in emission order.
    pub segments: Vec<Segment>,

    /// Auxiliary geometry keyed by the custom action name that produced it.
    pub auxiliary: HashMap<String, Vec<AuxGeometry>>,

    /// Turtle state after the last symbol.
    pub final_state: TurtleState,

    /// Number of pushes left unmatched at the end.
    pub open_branches: usize,
}

impl Drawing {
    pub fn new(initial: TurtleState) -> Self {
        Self {
            final_state: initial,
            ..Default::default()
        }
    }

    pub fn add_segment(&mut self, start: Vec2, end: Vec2) {
        self.segments.push(Segment { start, end });
    }

    pub fn add_auxiliary(&mut self, name: &str, geometry: impl IntoIterator<Item = AuxGeometry>) {
        let mut geometry = geometry.into_iter().peekable();
        if geometry.peek().is_none() {
            return;
        }
        self.auxiliary
            .entry(name.to_string())
            .or_default()
            .extend(geometry);
    }

    pub fn auxiliary(&self, name: &str) -> &[AuxGeometry] {
        self.auxiliary.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Groups the segments into polylines.
    ///
    /// A segment continues the current polyline when it starts exactly where
    /// the previous one ended; a pop or a pen-up move starts a new one.
    pub fn strokes(&self) -> Vec<Vec<Vec2>> {
        let mut strokes: Vec<Vec<Vec2>> = Vec::new();
        for segment in &self.segments {
            match strokes.last_mut() {
                Some(stroke) if stroke.last() == Some(&segment.start) => stroke.push(segment.end),
                _ => strokes.push(vec![segment.start, segment.end]),
            }
        }
        strokes
    }

    /// Axis-aligned bounds `(min, max)` over segments and auxiliary geometry.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for segment in &self.segments {
            min = min.min(segment.start).min(segment.end);
            max = max.max(segment.start).max(segment.end);
        }
        for geometry in self.auxiliary.values().flatten() {
            geometry.extend_bounds(&mut min, &mut max);
        }
        (min.x <= max.x).then_some((min, max))
    }
}
