use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::config::LayoutKind;
use crate::util::stable_pair;

use super::{LayoutInput, LayoutStrategy, PositionCache, Positions};

/// Fruchterman–Reingold style simulation with a fixed iteration budget.
///
/// Always starts from the seed circle (plus per-id jitter), so the result
/// depends only on the graph, sizes, locks and viewport. Locked nodes are
/// pinned and only push on their neighbours.
pub struct ForceLayout;

impl LayoutStrategy for ForceLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Force
    }

    fn layout(&self, input: &LayoutInput<'_, '_>, cache: &mut PositionCache) -> Positions {
        let nodes = input.index.nodes();
        let n = nodes.len();
        if n == 0 {
            cache.replace_all(&Positions::new());
            return Positions::new();
        }

        let center = input.viewport.center();
        let slot_by_id = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.id.as_str(), slot))
            .collect::<HashMap<_, _>>();
        let radii = nodes
            .iter()
            .map(|node| input.radius(&node.id))
            .collect::<Vec<_>>();
        let pinned = nodes
            .iter()
            .map(|node| input.locked.get(&node.id).copied())
            .collect::<Vec<_>>();

        let mut edges = Vec::new();
        for node in nodes {
            let Some(&from) = slot_by_id.get(node.id.as_str()) else {
                continue;
            };
            for child in input.index.children(&node.id) {
                if let Some(&to) = slot_by_id.get(child)
                    && from != to
                {
                    edges.push((from, to));
                }
            }
        }

        let mut positions = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| match pinned[slot] {
                Some(position) => position - center,
                None => {
                    let (jx, jy) = stable_pair(&node.id);
                    input.seed_position(slot, n) - center + vec2(jx, jy) * 40.0
                }
            })
            .collect::<Vec<_>>();

        if n > 1 {
            simulate(
                &mut positions,
                &edges,
                &radii,
                &pinned,
                input.layout.seed_radius,
                input.layout.force_iterations,
            );
        }

        let result = nodes
            .iter()
            .zip(positions)
            .zip(&pinned)
            .map(|((node, position), pin)| {
                (node.id.clone(), pin.unwrap_or(position + center))
            })
            .collect::<Positions>();

        cache.replace_all(&result);
        result
    }
}

/// Positions are relative to the viewport center. `spread` is the seed
/// circle radius: the ideal edge length shrinks as nodes are added so the
/// settled graph stays around that size, and free nodes are kept inside a
/// frame of `1.25 * spread`.
fn simulate(
    positions: &mut [Vec2],
    edges: &[(usize, usize)],
    radii: &[f32],
    pinned: &[Option<Vec2>],
    spread: f32,
    iterations: usize,
) {
    let n = positions.len();
    let k = (spread / (n as f32).sqrt()).max(24.0);
    let frame = spread.max(k) * 1.25;
    let mut temperature = (k * 2.5).max(60.0);

    for _ in 0..iterations {
        let mut disp = vec![Vec2::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[i] - positions[j];
                let distance = delta.length().max(0.5);
                let direction = if delta.length_sq() > 0.0 {
                    delta / distance
                } else {
                    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
                    vec2(angle.cos(), angle.sin())
                };

                let min_distance = (radii[i] + radii[j]) * 1.2;
                let mut force = (k * k) / distance;
                if distance < min_distance {
                    force += (min_distance - distance) * 2.4;
                }
                disp[i] += direction * force;
                disp[j] -= direction * force;
            }
        }

        for &(from, to) in edges {
            let delta = positions[from] - positions[to];
            let distance = delta.length().max(0.5);
            let direction = delta / distance;
            let ideal_length = k * 0.6 + (radii[from] + radii[to]);
            let force = (distance - ideal_length) * 0.18;

            disp[from] -= direction * force;
            disp[to] += direction * force;
        }

        for i in 0..n {
            disp[i] -= positions[i] * 0.02;
        }

        for i in 0..n {
            if pinned[i].is_some() {
                continue;
            }
            let d = disp[i];
            let length = d.length();
            if length > 0.0 {
                positions[i] += d / length * length.min(temperature) * 0.92;
            }
            let distance = positions[i].length();
            if distance > frame {
                positions[i] *= frame / distance;
            }
        }

        temperature *= 0.975;
        if temperature < 0.5 {
            break;
        }
    }
}
