//! Rollup, sizing and layout of the dependency map.
//!
//! Every pass rebuilds from the model: [`GraphIndex`] → [`compute_totals`]
//! → [`compute_sizes`] → a [`LayoutStrategy`] → link geometry. Dragging
//! writes locked positions straight into the model and the position cache,
//! bypassing layout for the moved subtree.

mod animate;
mod drag;
mod index;
mod layout;
mod link_path;
mod reach;
mod rollup;
mod scene;
mod schedule;
mod sizing;

use std::collections::HashSet;

use eframe::egui::Vec2;

use crate::config::{EngineConfig, LayoutKind};
use crate::model::ProjectModel;

pub use animate::Animator;
pub use drag::{DragOutcome, SubtreeDrag};
pub use index::GraphIndex;
pub use layout::{
    ForceLayout, LayoutInput, LayoutStrategy, MapTransform, PositionCache, Positions, RadialLayout,
    Viewport, locked_positions, strategy_for,
};
pub use link_path::{LinkPath, build_link_path};
pub use reach::{descendants, shelved_branch};
pub use rollup::{RollupTotals, Totals, compute_totals};
pub use scene::{Scene, SceneLink, SceneNode};
pub use schedule::{RefreshScheduler, RefreshTicket};
pub use sizing::{NodeSize, NodeSizes, compute_sizes, orphan_radius};

/// Owner of all mutable engine state: remembered positions, the drag in
/// progress, animation and the pending refresh.
///
/// Layout passes and drag updates both need `&mut self`, so they can never
/// interleave over the same positions.
pub struct MapEngine {
    config: EngineConfig,
    strategy: Box<dyn LayoutStrategy>,
    positions: PositionCache,
    animator: Animator,
    scheduler: RefreshScheduler,
    drag: Option<SubtreeDrag>,
    scene: Scene,
}

impl MapEngine {
    pub fn new(config: EngineConfig) -> Self {
        let strategy = strategy_for(config.layout.strategy);
        let mut scheduler = RefreshScheduler::new();
        scheduler.request();

        Self {
            config,
            strategy,
            positions: PositionCache::new(),
            animator: Animator::new(),
            scheduler,
            drag: None,
            scene: Scene::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn positions(&self) -> &PositionCache {
        &self.positions
    }

    pub fn layout_kind(&self) -> LayoutKind {
        self.strategy.kind()
    }

    pub fn set_layout_kind(&mut self, kind: LayoutKind) {
        if kind == self.strategy.kind() {
            return;
        }
        tracing::info!(strategy = kind.label(), "switching layout strategy");
        self.config.layout.strategy = kind;
        self.strategy = strategy_for(kind);
        self.scheduler.request();
    }

    /// Marks the scene stale; supersedes any refresh already pending.
    pub fn request_refresh(&mut self) -> RefreshTicket {
        self.scheduler.request()
    }

    pub fn refresh_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Runs the pending pass, if there is one. Returns whether it ran.
    /// While a subtree is being dragged the pass stays pending.
    pub fn refresh_if_pending(&mut self, model: &ProjectModel, viewport: Viewport) -> bool {
        if self.is_dragging() || self.scheduler.take().is_none() {
            return false;
        }
        self.recompute(model, viewport);
        true
    }

    /// Full rebuild: index, totals, sizes, layout, then link geometry.
    /// Satisfies any pending refresh.
    pub fn recompute(&mut self, model: &ProjectModel, viewport: Viewport) -> &Scene {
        self.scheduler.cancel();
        let index = GraphIndex::from_model(model);
        let purged = self.positions.purge(&index);
        let totals = compute_totals(&index);
        let sizes = compute_sizes(&totals, &index, &self.config.sizing);
        let locked = locked_positions(&index);

        let input = LayoutInput {
            index: &index,
            sizes: &sizes,
            locked: &locked,
            viewport,
            layout: &self.config.layout,
            sizing: &self.config.sizing,
        };
        let positions = self.strategy.layout(&input, &mut self.positions);
        let shelved = shelved_branch(&index);

        let fallback_size = NodeSize::from_radius(orphan_radius(&self.config.sizing));
        let nodes = index
            .nodes()
            .iter()
            .map(|node| SceneNode {
                id: node.id.clone(),
                name: node.name.clone(),
                status: node.status,
                totals: totals.get(&node.id).copied().unwrap_or(Totals::ZERO),
                size: sizes.get(&node.id).copied().unwrap_or(fallback_size),
                position: positions
                    .get(&node.id)
                    .copied()
                    .unwrap_or_else(|| viewport.center()),
                locked: locked.contains_key(&node.id),
                in_shelved_branch: shelved.contains(node.id.as_str()),
            })
            .collect::<Vec<_>>();

        let links = model
            .links
            .iter()
            .filter(|link| index.contains(&link.from) && index.contains(&link.to))
            .filter_map(|link| {
                let start = positions.get(&link.from)?.to_pos2();
                let end = positions.get(&link.to)?.to_pos2();
                Some(SceneLink {
                    id: link.id.clone(),
                    from: link.from.clone(),
                    to: link.to.clone(),
                    path: build_link_path(start, end, &self.config.links),
                })
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            strategy = self.strategy.kind().label(),
            nodes = nodes.len(),
            links = links.len(),
            dangling = index.dangling_links(),
            locked = locked.len(),
            purged,
            "recomputed scene"
        );

        self.animator.retarget(&positions);
        self.scene = Scene {
            nodes,
            links,
            root: index.canonical_root().map(str::to_owned),
        };
        &self.scene
    }

    /// Starts a press on `node_id` at map-space `pointer`. Any previous drag
    /// is abandoned.
    pub fn begin_drag(&mut self, model: &ProjectModel, node_id: &str, pointer: Vec2) -> bool {
        self.drag = SubtreeDrag::begin(
            model,
            &self.positions,
            node_id,
            pointer,
            self.config.drag.click_threshold,
        );
        self.drag.is_some()
    }

    /// Applies the pointer at map-space `pointer` to the drag in progress.
    /// Returns whether anything moved.
    pub fn update_drag(&mut self, model: &mut ProjectModel, pointer: Vec2) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        if !drag.update(pointer, model, &mut self.positions) {
            return false;
        }

        let moved = drag.subtree().map(str::to_owned).collect::<HashSet<_>>();
        self.follow_dragged(&moved);
        true
    }

    /// Moves the scene entries of `moved` to their cached positions and
    /// rebuilds the paths of links touching them. Nothing else is laid out.
    fn follow_dragged(&mut self, moved: &HashSet<String>) {
        for id in moved {
            if let Some(position) = self.positions.get(id) {
                self.animator.snap(id, position);
            }
        }

        for node in &mut self.scene.nodes {
            if !moved.contains(&node.id) {
                continue;
            }
            if let Some(position) = self.positions.get(&node.id) {
                node.position = position;
                node.locked = true;
            }
        }

        for link in &mut self.scene.links {
            if !moved.contains(&link.from) && !moved.contains(&link.to) {
                continue;
            }
            if let (Some(start), Some(end)) = (self.positions.get(&link.from), self.positions.get(&link.to)) {
                link.path = build_link_path(start.to_pos2(), end.to_pos2(), &self.config.links);
            }
        }
    }

    /// Ends the press. On [`DragOutcome::Moved`] the caller persists the
    /// model.
    pub fn end_drag(&mut self) -> DragOutcome {
        self.drag
            .take()
            .map(SubtreeDrag::finish)
            .unwrap_or(DragOutcome::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(SubtreeDrag::has_moved)
    }

    /// Advances the displayed positions; `true` while still animating.
    pub fn step_animation(&mut self, dt: f32) -> bool {
        self.animator.step(dt, &self.config.animation)
    }

    /// Where a node is currently drawn, which can trail its layout position.
    pub fn displayed_position(&self, id: &str) -> Option<Vec2> {
        self.animator
            .displayed(id)
            .or_else(|| self.scene.node(id).map(|node| node.position))
    }

    /// Connector geometry between the displayed endpoints of `link`.
    pub fn displayed_link_path(&self, link: &SceneLink) -> LinkPath {
        match (
            self.displayed_position(&link.from),
            self.displayed_position(&link.to),
        ) {
            (Some(start), Some(end)) => {
                build_link_path(start.to_pos2(), end.to_pos2(), &self.config.links)
            }
            _ => link.path,
        }
    }
}
