use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::config::AnimationConfig;

use super::layout::Positions;

/// Positions as currently drawn, easing toward the latest layout.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    displayed: HashMap<String, Vec2>,
    targets: Positions,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a new set of targets. Nodes seen for the first time appear at
    /// their target; nodes that disappeared are dropped.
    pub fn retarget(&mut self, targets: &Positions) {
        self.displayed.retain(|id, _| targets.contains_key(id));
        for (id, target) in targets {
            self.displayed.entry(id.clone()).or_insert(*target);
        }
        self.targets.clone_from(targets);
    }

    /// Moves a node immediately, e.g. while it is being dragged.
    pub fn snap(&mut self, id: &str, position: Vec2) {
        self.displayed.insert(id.to_owned(), position);
        self.targets.insert(id.to_owned(), position);
    }

    pub fn displayed(&self, id: &str) -> Option<Vec2> {
        self.displayed.get(id).copied()
    }

    /// Advances by `dt` seconds; `true` while anything is still moving.
    pub fn step(&mut self, dt: f32, config: &AnimationConfig) -> bool {
        let blend = 1.0 - (-config.stiffness * dt.max(0.0)).exp();
        let settle_sq = config.settle_distance * config.settle_distance;
        let mut moving = false;

        for (id, shown) in &mut self.displayed {
            let Some(target) = self.targets.get(id).copied() else {
                continue;
            };
            let remaining = target - *shown;
            if remaining.length_sq() <= settle_sq {
                *shown = target;
                continue;
            }
            *shown += remaining * blend;
            moving = true;
        }

        moving
    }
}
