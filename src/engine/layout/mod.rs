mod force;
mod radial;

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Pos2, Vec2, vec2};

use crate::config::{LayoutConfig, LayoutKind, SizingConfig};

use super::index::GraphIndex;
use super::sizing::{NodeSizes, orphan_radius};

pub use force::ForceLayout;
pub use radial::RadialLayout;

/// Map-space position of every node produced by one pass.
pub type Positions = HashMap<String, Vec2>;

/// Positions remembered between passes, keyed by node id. Owned by the
/// caller so separate graphs never share entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionCache {
    positions: Positions,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Vec2> {
        self.positions.get(id).copied()
    }

    pub fn insert(&mut self, id: impl Into<String>, position: Vec2) {
        self.positions.insert(id.into(), position);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Drops entries for nodes that no longer exist.
    pub fn purge(&mut self, index: &GraphIndex<'_>) -> usize {
        let before = self.positions.len();
        self.positions.retain(|id, _| index.contains(id));
        before - self.positions.len()
    }

    pub fn replace_all(&mut self, positions: &Positions) {
        self.positions.clone_from(positions);
    }
}

/// Visible canvas size; map space has its origin at the canvas top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub size: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: vec2(width, height),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Pan/zoom between canvas-relative screen points and map space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapTransform {
    pub pan: Vec2,
    pub scale: f32,
}

impl Default for MapTransform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl MapTransform {
    pub fn screen_to_map(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.pan) / self.scale
    }

    pub fn map_to_screen(&self, map: Vec2) -> Pos2 {
        (map * self.scale + self.pan).to_pos2()
    }

    /// Zooms by `factor` keeping the map point under `anchor` fixed.
    pub fn zoom_around(&mut self, anchor: Pos2, factor: f32, min_scale: f32, max_scale: f32) {
        let before = self.screen_to_map(anchor);
        self.scale = (self.scale * factor).clamp(min_scale, max_scale);
        self.pan = anchor.to_vec2() - before * self.scale;
    }
}

/// Everything a strategy reads for one pass.
pub struct LayoutInput<'i, 'a> {
    pub index: &'i GraphIndex<'a>,
    pub sizes: &'i NodeSizes,
    /// Drag-pinned positions; never overwritten.
    pub locked: &'i Positions,
    pub viewport: Viewport,
    pub layout: &'i LayoutConfig,
    pub sizing: &'i SizingConfig,
}

impl LayoutInput<'_, '_> {
    pub fn radius(&self, id: &str) -> f32 {
        self.sizes
            .get(id)
            .map(|size| size.radius)
            .unwrap_or_else(|| orphan_radius(self.sizing))
    }

    pub fn is_locked(&self, id: &str) -> bool {
        self.locked.contains_key(id)
    }

    /// Point on the seed circle for the node at `index` of `count`.
    pub fn seed_position(&self, index: usize, count: usize) -> Vec2 {
        let angle = (index as f32 / count.max(1) as f32) * TAU;
        self.viewport.center() + vec2(angle.cos(), angle.sin()) * self.layout.seed_radius
    }
}

/// A way of assigning a position to every node.
pub trait LayoutStrategy {
    fn kind(&self) -> LayoutKind;

    /// Positions for every node in `input.index`. Locked nodes keep their
    /// pinned position. `cache` supplies and receives remembered positions.
    fn layout(&self, input: &LayoutInput<'_, '_>, cache: &mut PositionCache) -> Positions;
}

pub fn strategy_for(kind: LayoutKind) -> Box<dyn LayoutStrategy> {
    match kind {
        LayoutKind::Radial => Box::new(RadialLayout),
        LayoutKind::Force => Box::new(ForceLayout),
    }
}

/// Pinned positions of every locked node that carries one.
pub fn locked_positions(index: &GraphIndex<'_>) -> Positions {
    index
        .nodes()
        .iter()
        .filter_map(|node| node.locked_position().map(|position| (node.id.clone(), position)))
        .collect()
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::model::{Node, ProjectModel};

    #[test]
    fn screen_to_map_undoes_pan_and_scale() {
        let transform = MapTransform {
            pan: vec2(100.0, -40.0),
            scale: 2.0,
        };

        let map = transform.screen_to_map(pos2(300.0, 60.0));
        assert_eq!(map, vec2(100.0, 50.0));
        assert_eq!(transform.map_to_screen(map), pos2(300.0, 60.0));
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut transform = MapTransform::default();
        let anchor = pos2(200.0, 100.0);
        let before = transform.screen_to_map(anchor);

        transform.zoom_around(anchor, 2.0, 0.1, 8.0);

        assert!((transform.screen_to_map(anchor) - before).length() < 1e-4);
        assert_eq!(transform.scale, 2.0);
    }

    #[test]
    fn purge_drops_deleted_nodes() {
        let model = ProjectModel::new(vec![Node::new("a", "A")], Vec::new());
        let index = GraphIndex::from_model(&model);
        let mut cache = PositionCache::new();
        cache.insert("a", vec2(1.0, 1.0));
        cache.insert("gone", vec2(2.0, 2.0));

        assert_eq!(cache.purge(&index), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("gone").is_none());
    }

    #[test]
    fn only_locked_nodes_with_positions_are_pinned() {
        let mut pinned = Node::new("a", "A");
        pinned.lock_at(vec2(5.0, 6.0));
        let mut flagged_without_position = Node::new("b", "B");
        flagged_without_position.position_locked = true;
        let model = ProjectModel::new(vec![pinned, flagged_without_position, Node::new("c", "C")], Vec::new());
        let index = GraphIndex::from_model(&model);

        let locked = locked_positions(&index);

        assert_eq!(locked.len(), 1);
        assert_eq!(locked["a"], vec2(5.0, 6.0));
    }
}
