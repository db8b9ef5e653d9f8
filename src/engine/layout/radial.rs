use std::collections::{HashSet, VecDeque};
use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Vec2, vec2};

use crate::config::LayoutKind;

use super::{LayoutInput, LayoutStrategy, PositionCache, Positions};

/// Deterministic radial tree: the canonical root at the viewport center,
/// extra roots orbiting it, and each parent's children evenly spaced on a
/// ring around the parent, starting straight up. Locked children hold
/// their slot without being moved.
pub struct RadialLayout;

impl LayoutStrategy for RadialLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Radial
    }

    fn layout(&self, input: &LayoutInput<'_, '_>, cache: &mut PositionCache) -> Positions {
        let index = input.index;
        let nodes = index.nodes();
        let mut positions = Positions::with_capacity(nodes.len());

        for (i, node) in nodes.iter().enumerate() {
            let position = input
                .locked
                .get(&node.id)
                .copied()
                .or_else(|| cache.get(&node.id))
                .unwrap_or_else(|| input.seed_position(i, nodes.len()));
            positions.insert(node.id.clone(), position);
        }

        let roots = index.roots();
        let Some((&root, extra_roots)) = roots.split_first() else {
            cache.replace_all(&positions);
            return positions;
        };

        if !input.is_locked(root) {
            positions.insert(root.to_owned(), input.viewport.center());
        }

        let root_position = positions
            .get(root)
            .copied()
            .unwrap_or_else(|| input.viewport.center());
        let orbit = input.radius(root) * input.layout.extra_root_spread;
        for (slot, extra) in extra_roots.iter().enumerate() {
            if input.is_locked(extra) {
                continue;
            }
            let angle = ring_angle(slot, extra_roots.len());
            positions.insert((*extra).to_owned(), root_position + polar(angle, orbit));
        }

        let mut visited: HashSet<&str> = roots.iter().copied().collect();
        let mut queue: VecDeque<&str> = roots.iter().copied().collect();

        while let Some(parent) = queue.pop_front() {
            let group = index
                .children(parent)
                .iter()
                .copied()
                .filter(|child| visited.insert(*child))
                .collect::<Vec<_>>();
            if group.is_empty() {
                continue;
            }

            // Locked children keep their slot on the ring but are not moved.
            if group.iter().any(|child| !input.is_locked(child)) {
                let center = positions.get(parent).copied().unwrap_or_else(|| input.viewport.center());
                let widest = group
                    .iter()
                    .map(|child| input.radius(child))
                    .fold(0.0_f32, f32::max);
                let ring = input.radius(parent) + widest + input.layout.ring_gap;

                for (slot, child) in group.iter().enumerate() {
                    if input.is_locked(child) {
                        continue;
                    }
                    let angle = ring_angle(slot, group.len());
                    positions.insert((*child).to_owned(), center + polar(angle, ring));
                }
            }

            queue.extend(group);
        }

        cache.replace_all(&positions);
        positions
    }
}

fn ring_angle(slot: usize, count: usize) -> f32 {
    -FRAC_PI_2 + (slot as f32) * (TAU / count.max(1) as f32)
}

fn polar(angle: f32, distance: f32) -> Vec2 {
    vec2(angle.cos(), angle.sin()) * distance
}
