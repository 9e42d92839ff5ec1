use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Stable identity of a committed stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrokeId(Uuid);

impl StrokeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StrokeId {
    fn default() -> Self {
        Self::new()
    }
}

/// One sample of a freehand stroke, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Color32,
}

impl StrokePoint {
    pub fn new(pos: Pos2, size: f32, color: Color32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            size,
            color,
        }
    }

    pub fn pos(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }
}

// Immutable stroke for sharing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: StrokeId,
    points: Vec<StrokePoint>,
}

// Strokes are shared between the live document and history snapshots
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn new(points: Vec<StrokePoint>) -> Self {
        Self {
            id: StrokeId::new(),
            points,
        }
    }

    pub fn new_ref(points: Vec<StrokePoint>) -> StrokeRef {
        Arc::new(Self::new(points))
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    /// Renderers use the first point's color for the whole stroke
    pub fn color(&self) -> Color32 {
        self.points.first().map_or(Color32::TRANSPARENT, |p| p.color)
    }

    /// Renderers use the first point's size for the whole stroke
    pub fn thickness(&self) -> f32 {
        self.points.first().map_or(0.0, |p| p.size)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        for point in &mut self.points {
            point.x += dx;
            point.y += dy;
        }
    }
}

// Mutable stroke for the pointer gesture in progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutableStroke {
    points: Vec<StrokePoint>,
}

impl MutableStroke {
    pub fn new(first: StrokePoint) -> Self {
        Self {
            points: vec![first],
        }
    }

    pub fn add_point(&mut self, point: StrokePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Only strokes with at least two points become drawables
    pub fn into_stroke_ref(self) -> Option<StrokeRef> {
        (self.points.len() >= 2).then(|| Stroke::new_ref(self.points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> StrokePoint {
        StrokePoint::new(Pos2::new(x, y), 4.0, Color32::RED)
    }

    #[test]
    fn single_point_stroke_is_discarded() {
        let stroke = MutableStroke::new(point(0.0, 0.0));
        assert!(stroke.into_stroke_ref().is_none());
    }

    #[test]
    fn two_point_stroke_is_kept() {
        let mut stroke = MutableStroke::new(point(0.0, 0.0));
        stroke.add_point(point(5.0, 5.0));
        let stroke = stroke.into_stroke_ref().unwrap();
        assert_eq!(stroke.points().len(), 2);
        assert_eq!(stroke.color(), Color32::RED);
        assert_eq!(stroke.thickness(), 4.0);
    }

    #[test]
    fn translate_moves_every_point() {
        let mut stroke = Stroke::new(vec![point(0.0, 0.0), point(1.0, 2.0)]);
        stroke.translate(10.0, -1.0);
        assert_eq!(stroke.points()[0].pos(), Pos2::new(10.0, -1.0));
        assert_eq!(stroke.points()[1].pos(), Pos2::new(11.0, 1.0));
    }
}
