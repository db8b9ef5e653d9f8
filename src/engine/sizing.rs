use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::SizingConfig;

use super::index::GraphIndex;
use super::rollup::{RollupTotals, Totals};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSize {
    pub radius: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeSize {
    pub fn from_radius(radius: f32) -> Self {
        Self {
            radius,
            width: radius * 2.0,
            height: radius * 2.0,
        }
    }
}

pub type NodeSizes = HashMap<String, NodeSize>;

pub fn orphan_radius(config: &SizingConfig) -> f32 {
    config.root_radius * config.orphan_ratio
}

/// Radius for each node, assigned sibling group by sibling group in BFS
/// order from the canonical root.
///
/// A node is sized by the first parent that reaches it. Extra roots form
/// one sibling group under the canonical root. Anything the walk never
/// reaches gets the orphan radius.
pub fn compute_sizes(totals: &RollupTotals, index: &GraphIndex<'_>, config: &SizingConfig) -> NodeSizes {
    let mut sizes = NodeSizes::with_capacity(index.nodes().len());
    let roots = index.roots();

    if let Some((&root, extra_roots)) = roots.split_first() {
        let mut sized: HashSet<&str> = HashSet::from([root]);
        sizes.insert(root.to_owned(), NodeSize::from_radius(config.root_radius));

        let mut queue = VecDeque::from([root]);
        let extra_group = extra_roots
            .iter()
            .copied()
            .filter(|id| sized.insert(*id))
            .collect::<Vec<_>>();
        size_group(&extra_group, config.root_radius, totals, config, &mut sizes);
        queue.extend(extra_group);

        while let Some(parent) = queue.pop_front() {
            let parent_radius = sizes
                .get(parent)
                .map(|size| size.radius)
                .unwrap_or_else(|| orphan_radius(config));

            let group = index
                .children(parent)
                .iter()
                .copied()
                .filter(|child| sized.insert(*child))
                .collect::<Vec<_>>();
            size_group(&group, parent_radius, totals, config, &mut sizes);
            queue.extend(group);
        }
    }

    let fallback = NodeSize::from_radius(orphan_radius(config));
    for node in index.nodes() {
        sizes.entry(node.id.clone()).or_insert(fallback);
    }

    sizes
}

fn size_group(
    group: &[&str],
    parent_radius: f32,
    totals: &RollupTotals,
    config: &SizingConfig,
    sizes: &mut NodeSizes,
) {
    if group.is_empty() {
        return;
    }

    let max_radius = parent_radius * config.max_child_ratio;
    let min_radius = (parent_radius * config.min_child_ratio)
        .max(config.min_child_floor)
        .min(max_radius);

    let values = group
        .iter()
        .map(|id| {
            totals
                .get(*id)
                .copied()
                .unwrap_or(Totals::ZERO)
                .estimate(config.hour_rate)
        })
        .collect::<Vec<_>>();

    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = high - low;

    for (id, value) in group.iter().zip(values) {
        let t = if group.len() == 1 {
            1.0
        } else if !span.is_finite() || span <= f64::EPSILON {
            0.5
        } else {
            ((value - low) / span).clamp(0.0, 1.0)
        };
        let t = t as f32;
        let radius = max_radius - (max_radius - min_radius) * (1.0 - t);
        sizes.insert((*id).to_owned(), NodeSize::from_radius(radius));
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::engine::rollup::compute_totals;
    use crate::model::{Link, Node, ProjectModel};

    fn star(costs: &[f64]) -> ProjectModel {
        let mut nodes = vec![Node::new("root", "Root")];
        let mut links = Vec::new();
        for (i, cost) in costs.iter().enumerate() {
            let id = format!("c{i}");
            nodes.push(Node::new(id.as_str(), id.as_str()).with_estimates(*cost, 0.0));
            links.push(Link::new(format!("l{i}"), "root", id));
        }
        ProjectModel::new(nodes, links)
    }

    fn sizes_of(model: &ProjectModel) -> NodeSizes {
        let index = GraphIndex::from_model(model);
        let totals = compute_totals(&index);
        compute_sizes(&totals, &index, &SizingConfig::default())
    }

    #[test]
    fn root_gets_fixed_radius() {
        let sizes = sizes_of(&star(&[10.0, 20.0]));
        let config = SizingConfig::default();

        assert_eq!(sizes["root"].radius, config.root_radius);
        assert!(sizes.values().all(|size| size.radius <= config.root_radius));
    }

    #[test]
    fn single_child_takes_the_top_of_the_range() {
        let sizes = sizes_of(&star(&[10.0]));
        let config = SizingConfig::default();

        assert_eq!(sizes["c0"].radius, config.root_radius * config.max_child_ratio);
    }

    #[test]
    fn equal_siblings_take_the_midpoint() {
        let sizes = sizes_of(&star(&[10.0, 10.0, 10.0]));
        let config = SizingConfig::default();
        let max = config.root_radius * config.max_child_ratio;
        let min = (config.root_radius * config.min_child_ratio).max(config.min_child_floor);

        for id in ["c0", "c1", "c2"] {
            assert!((sizes[id].radius - (min + max) / 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn time_is_priced_into_the_estimate() {
        let mut model = star(&[100.0, 100.0]);
        model.nodes[2].estimated_time = 1.0;
        let sizes = sizes_of(&model);

        assert!(sizes["c1"].radius > sizes["c0"].radius);
    }

    #[test]
    fn unreached_nodes_get_the_orphan_radius() {
        let mut model = star(&[1.0]);
        model.nodes.push(Node::new("x", "X"));
        model.nodes.push(Node::new("y", "Y"));
        model.links.push(Link::new("lx", "x", "y"));
        model.links.push(Link::new("ly", "y", "x"));
        let sizes = sizes_of(&model);
        let config = SizingConfig::default();

        assert_eq!(sizes["x"].radius, orphan_radius(&config));
        assert_eq!(sizes["y"].radius, orphan_radius(&config));
    }

    #[test]
    fn extra_roots_form_one_group_under_the_root() {
        let mut model = star(&[]);
        model.nodes.push(Node::new("e1", "E1").with_estimates(1.0, 0.0));
        model.nodes.push(Node::new("e2", "E2").with_estimates(9.0, 0.0));
        model.nodes.push(Node::new("e2child", "E2 child").with_estimates(3.0, 0.0));
        model.links.push(Link::new("le", "e2", "e2child"));
        let sizes = sizes_of(&model);
        let config = SizingConfig::default();

        assert_eq!(sizes["e2"].radius, config.root_radius * config.max_child_ratio);
        assert!(sizes["e1"].radius < sizes["e2"].radius);
        assert_eq!(sizes["e2child"].radius, sizes["e2"].radius * config.max_child_ratio);
    }

    #[test]
    fn width_and_height_are_the_diameter() {
        let size = NodeSize::from_radius(12.5);
        assert_eq!(size.width, 25.0);
        assert_eq!(size.height, 25.0);
    }

    proptest! {
        #[test]
        fn radius_is_monotonic_within_a_sibling_group(
            costs in prop::collection::vec(0.0f64..10_000.0, 2..24)
        ) {
            let sizes = sizes_of(&star(&costs));
            for (i, a) in costs.iter().enumerate() {
                for (j, b) in costs.iter().enumerate() {
                    if a > b {
                        let ra = sizes[&format!("c{i}")].radius;
                        let rb = sizes[&format!("c{j}")].radius;
                        prop_assert!(ra >= rb, "c{i} ({a}) radius {ra} < c{j} ({b}) radius {rb}");
                    }
                }
            }
        }
    }
}
