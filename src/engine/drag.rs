use eframe::egui::Vec2;

use crate::model::ProjectModel;

use super::index::GraphIndex;
use super::layout::PositionCache;
use super::reach::descendants;

/// What a finished press turned out to be.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    /// No drag was in progress.
    Idle,
    /// The pointer never left the click threshold.
    Click { node: String },
    /// The subtree moved; every listed node is now locked.
    Moved { node: String, moved: Vec<String> },
}

/// One in-progress press on a node, translating its whole subtree rigidly.
#[derive(Clone, Debug)]
pub struct SubtreeDrag {
    node: String,
    pointer_start: Vec2,
    /// Each moving node with its position when the press began.
    starts: Vec<(String, Vec2)>,
    threshold: f32,
    moved: bool,
}

impl SubtreeDrag {
    /// Captures the moving subtree of `node_id`. `None` when the node is
    /// unknown.
    pub fn begin(
        model: &ProjectModel,
        positions: &PositionCache,
        node_id: &str,
        pointer: Vec2,
        threshold: f32,
    ) -> Option<Self> {
        let index = GraphIndex::from_model(model);
        let subtree = descendants(&index, node_id);
        if subtree.is_empty() {
            return None;
        }

        let known = |id: &str| {
            positions
                .get(id)
                .or_else(|| index.node(id).and_then(|node| node.position.map(Vec2::from)))
        };
        // Nodes no pass has placed yet start where the pressed node is.
        let anchor = known(node_id).unwrap_or(pointer);
        let mut unplaced = 0_usize;
        let mut starts = Vec::with_capacity(subtree.len());
        for id in subtree {
            let position = known(id).unwrap_or_else(|| {
                unplaced += 1;
                anchor
            });
            starts.push((id.to_owned(), position));
        }

        tracing::debug!(node = node_id, subtree = starts.len(), unplaced, "drag started");

        Some(Self {
            node: node_id.to_owned(),
            pointer_start: pointer,
            starts,
            threshold,
            moved: false,
        })
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn subtree(&self) -> impl Iterator<Item = &str> {
        self.starts.iter().map(|(id, _)| id.as_str())
    }

    /// Moves every subtree node to its start position plus the pointer
    /// delta, locking each one. Returns `false` while the press is still
    /// within the click threshold.
    pub fn update(&mut self, pointer: Vec2, model: &mut ProjectModel, positions: &mut PositionCache) -> bool {
        let delta = pointer - self.pointer_start;
        if !self.moved {
            if delta.x.abs() <= self.threshold && delta.y.abs() <= self.threshold {
                return false;
            }
            self.moved = true;
        }

        for (id, start) in &self.starts {
            let target = *start + delta;
            positions.insert(id.as_str(), target);
            if let Some(node) = model.node_mut(id) {
                node.lock_at(target);
            }
        }
        true
    }

    pub fn finish(self) -> DragOutcome {
        if self.moved {
            tracing::debug!(node = %self.node, moved = self.starts.len(), "drag finished");
            DragOutcome::Moved {
                node: self.node,
                moved: self.starts.into_iter().map(|(id, _)| id).collect(),
            }
        } else {
            DragOutcome::Click { node: self.node }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::model::{Link, Node};

    fn setup() -> (ProjectModel, PositionCache) {
        let model = ProjectModel::new(
            vec![
                Node::new("p", "P"),
                Node::new("c1", "C1"),
                Node::new("c2", "C2"),
                Node::new("g", "G"),
                Node::new("other", "Other"),
            ],
            vec![
                Link::new("l1", "p", "c1"),
                Link::new("l2", "p", "c2"),
                Link::new("l3", "c1", "g"),
                Link::new("l4", "g", "p"),
            ],
        );
        let mut cache = PositionCache::new();
        cache.insert("p", vec2(0.0, 0.0));
        cache.insert("c1", vec2(10.0, 5.0));
        cache.insert("c2", vec2(-7.0, 3.0));
        cache.insert("g", vec2(20.0, 20.0));
        cache.insert("other", vec2(100.0, 100.0));
        (model, cache)
    }

    #[test]
    fn subtree_translates_rigidly() {
        let (mut model, mut cache) = setup();
        let before = cache.clone();
        let pointer = vec2(3.0, 3.0);
        let delta = vec2(50.0, -25.0);

        let mut drag = SubtreeDrag::begin(&model, &cache, "p", pointer, 4.0).unwrap();
        assert!(drag.update(pointer + delta, &mut model, &mut cache));

        for id in ["p", "c1", "c2", "g"] {
            assert_eq!(cache.get(id).unwrap(), before.get(id).unwrap() + delta);
            let node = model.node(id).unwrap();
            assert!(node.position_locked);
            assert_eq!(node.locked_position(), cache.get(id));
        }
        assert_eq!(cache.get("other"), before.get("other"));
        assert!(!model.node("other").unwrap().position_locked);
    }

    #[test]
    fn every_update_is_relative_to_the_press() {
        let (mut model, mut cache) = setup();
        let mut drag = SubtreeDrag::begin(&model, &cache, "c1", vec2(0.0, 0.0), 4.0).unwrap();

        drag.update(vec2(30.0, 0.0), &mut model, &mut cache);
        drag.update(vec2(10.0, 10.0), &mut model, &mut cache);

        assert_eq!(cache.get("c1"), Some(vec2(20.0, 15.0)));
        assert_eq!(cache.get("g"), Some(vec2(30.0, 30.0)));
    }

    #[test]
    fn small_movement_is_a_click() {
        let (mut model, mut cache) = setup();
        let before = cache.clone();
        let mut drag = SubtreeDrag::begin(&model, &cache, "p", vec2(0.0, 0.0), 4.0).unwrap();

        assert!(!drag.update(vec2(3.0, -4.0), &mut model, &mut cache));

        assert_eq!(cache, before);
        assert!(model.nodes.iter().all(|node| !node.position_locked));
        assert_eq!(drag.finish(), DragOutcome::Click { node: "p".to_owned() });
    }

    #[test]
    fn threshold_latches_once_crossed() {
        let (mut model, mut cache) = setup();
        let mut drag = SubtreeDrag::begin(&model, &cache, "c2", vec2(0.0, 0.0), 4.0).unwrap();

        assert!(drag.update(vec2(5.0, 0.0), &mut model, &mut cache));
        assert!(drag.update(vec2(1.0, 0.0), &mut model, &mut cache));
        assert_eq!(cache.get("c2"), Some(vec2(-6.0, 3.0)));
        assert!(matches!(drag.finish(), DragOutcome::Moved { moved, .. } if moved == vec!["c2".to_owned()]));
    }

    #[test]
    fn unplaced_descendant_moves_with_the_pressed_node() {
        let (mut model, mut cache) = setup();
        let fresh = model.add_child("c2", "Fresh").unwrap();
        let delta = vec2(40.0, 10.0);

        let mut drag = SubtreeDrag::begin(&model, &cache, "c2", Vec2::ZERO, 4.0).unwrap();
        assert!(drag.subtree().any(|id| id == fresh));
        assert!(drag.update(delta, &mut model, &mut cache));

        let expected = vec2(-7.0, 3.0) + delta;
        assert_eq!(cache.get(&fresh), Some(expected));
        assert_eq!(model.node(&fresh).unwrap().locked_position(), Some(expected));
        match drag.finish() {
            DragOutcome::Moved { moved, .. } => assert!(moved.contains(&fresh)),
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn unknown_node_does_not_start_a_drag() {
        let (model, cache) = setup();
        assert!(SubtreeDrag::begin(&model, &cache, "nope", Vec2::ZERO, 4.0).is_none());
    }
}
