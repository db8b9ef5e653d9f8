use std::collections::{HashMap, HashSet};
use std::ops::{Add, AddAssign};

use crate::model::Status;

use super::index::GraphIndex;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub cost: f64,
    pub time: f64,
}

impl Totals {
    pub const ZERO: Self = Self {
        cost: 0.0,
        time: 0.0,
    };

    pub fn new(cost: f64, time: f64) -> Self {
        Self { cost, time }
    }

    /// Single comparable effort figure: cost plus time priced at `hour_rate`.
    pub fn estimate(self, hour_rate: f64) -> f64 {
        self.cost + self.time * hour_rate
    }
}

impl Add for Totals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            cost: self.cost + rhs.cost,
            time: self.time + rhs.time,
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

pub type RollupTotals = HashMap<String, Totals>;

struct Frame<'a> {
    id: &'a str,
    next_child: usize,
    total: Totals,
}

enum Step<'a> {
    Descend(&'a str),
    Finish,
}

/// Per-node cost/time of the node plus everything that depends on it.
///
/// Shelved nodes total zero and cut their branch from every ancestor. A
/// child already on the expansion trail contributes zero and is not
/// memoized, so cycles terminate. Shared descendants are counted once per
/// path that reaches them.
pub fn compute_totals(index: &GraphIndex<'_>) -> RollupTotals {
    let mut memo: HashMap<&str, Totals> = HashMap::with_capacity(index.nodes().len());
    let mut trail: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for node in index.nodes() {
        let start = node.id.as_str();
        if memo.contains_key(start) {
            continue;
        }
        let Some(own) = own_totals(index, start) else {
            memo.insert(start, Totals::ZERO);
            continue;
        };

        trail.insert(start);
        stack.push(Frame {
            id: start,
            next_child: 0,
            total: own,
        });

        while let Some(frame) = stack.last_mut() {
            let children = index.children(frame.id);
            let step = match children.get(frame.next_child) {
                Some(&child) => {
                    frame.next_child += 1;
                    if let Some(done) = memo.get(child) {
                        frame.total += *done;
                        continue;
                    }
                    if trail.contains(child) {
                        continue;
                    }
                    Step::Descend(child)
                }
                None => Step::Finish,
            };

            match step {
                Step::Descend(child) => match own_totals(index, child) {
                    Some(own) => {
                        trail.insert(child);
                        stack.push(Frame {
                            id: child,
                            next_child: 0,
                            total: own,
                        });
                    }
                    None => {
                        memo.insert(child, Totals::ZERO);
                    }
                },
                Step::Finish => {
                    let Some(done) = stack.pop() else {
                        break;
                    };
                    trail.remove(done.id);
                    memo.insert(done.id, done.total);
                    if let Some(parent) = stack.last_mut() {
                        parent.total += done.total;
                    }
                }
            }
        }
    }

    memo.into_iter()
        .filter(|(id, _)| index.contains(id))
        .map(|(id, total)| (id.to_owned(), total))
        .collect()
}

/// `None` for nodes that contribute nothing: missing or shelved.
fn own_totals(index: &GraphIndex<'_>, id: &str) -> Option<Totals> {
    let node = index.node(id)?;
    if node.status == Status::Shelved {
        return None;
    }
    Some(Totals::new(
        node.estimated_cost.max(0.0),
        node.estimated_time.max(0.0),
    ))
}
