use eframe::egui::Vec2;

use crate::model::Status;

use super::link_path::LinkPath;
use super::rollup::Totals;
use super::sizing::NodeSize;

/// Renderer-facing result of one recompute pass.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub links: Vec<SceneLink>,
    pub root: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub totals: Totals,
    pub size: NodeSize,
    pub position: Vec2,
    pub locked: bool,
    /// Shelved, or depends on something shelved.
    pub in_shelved_branch: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneLink {
    pub id: String,
    pub from: String,
    pub to: String,
    pub path: LinkPath,
}

impl Scene {
    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
