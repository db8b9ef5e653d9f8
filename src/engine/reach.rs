use std::collections::{HashSet, VecDeque};

use crate::model::Status;

use super::index::GraphIndex;

/// `start` followed by everything reachable from it through dependents, in
/// BFS order. Each node appears once, so cycles are harmless.
pub fn descendants<'a>(index: &GraphIndex<'a>, start: &str) -> Vec<&'a str> {
    let Some(start) = index.node(start).map(|node| node.id.as_str()) else {
        return Vec::new();
    };

    let mut order = vec![start];
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(id) = queue.pop_front() {
        for &next in index.children(id) {
            if visited.insert(next) {
                order.push(next);
                queue.push_back(next);
            }
        }
    }

    order
}

/// Every shelved node together with everything that depends on it. Drives
/// the renderer's dimming.
pub fn shelved_branch<'a>(index: &GraphIndex<'a>) -> HashSet<&'a str> {
    let mut marked = HashSet::new();
    let mut queue = VecDeque::new();

    for node in index.nodes() {
        if node.status == Status::Shelved && marked.insert(node.id.as_str()) {
            queue.push_back(node.id.as_str());
        }
    }

    while let Some(id) = queue.pop_front() {
        for &next in index.children(id) {
            if marked.insert(next) {
                queue.push_back(next);
            }
        }
    }

    marked
}
