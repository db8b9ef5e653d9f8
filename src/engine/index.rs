use std::collections::{HashMap, HashSet};

use crate::model::{Link, Node, ProjectModel};

/// Forward/reverse adjacency over a model's nodes, rebuilt on every pass.
///
/// Buckets keep link-list order; traversal order, and therefore layout
/// angle order, depends on it.
pub struct GraphIndex<'a> {
    nodes: &'a [Node],
    nodes_by_id: HashMap<&'a str, &'a Node>,
    children: HashMap<&'a str, Vec<&'a str>>,
    incoming: HashMap<&'a str, Vec<&'a str>>,
    dangling_links: usize,
}

impl<'a> GraphIndex<'a> {
    pub fn build(nodes: &'a [Node], links: &'a [Link]) -> Self {
        let mut nodes_by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            nodes_by_id.entry(node.id.as_str()).or_insert(node);
        }

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut dangling_links = 0usize;

        for link in links {
            let from = link.from.as_str();
            let to = link.to.as_str();
            if !nodes_by_id.contains_key(from) || !nodes_by_id.contains_key(to) {
                dangling_links += 1;
                continue;
            }

            children.entry(from).or_default().push(to);
            incoming.entry(to).or_default().push(from);
        }

        if dangling_links > 0 {
            tracing::debug!(dangling_links, "ignored links with missing endpoints");
        }

        Self {
            nodes,
            nodes_by_id,
            children,
            incoming,
            dangling_links,
        }
    }

    pub fn from_model(model: &'a ProjectModel) -> Self {
        Self::build(&model.nodes, &model.links)
    }

    /// Nodes in model order.
    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes_by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes_by_id.contains_key(id)
    }

    /// Dependents of `id`, in link order.
    pub fn children(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Prerequisites of `id`, in link order.
    pub fn incoming(&self, id: &str) -> &[&'a str] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dangling_links(&self) -> usize {
        self.dangling_links
    }

    /// Every node without prerequisites, in node order. The first is the
    /// canonical root.
    pub fn roots(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .map(|node| node.id.as_str())
            .filter(|id| self.incoming(id).is_empty() && seen.insert(*id))
            .collect()
    }

    pub fn canonical_root(&self) -> Option<&'a str> {
        self.nodes
            .iter()
            .map(|node| node.id.as_str())
            .find(|id| self.incoming(id).is_empty())
    }
}
