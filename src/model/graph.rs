use std::collections::HashSet;

use eframe::egui::Vec2;
use serde::{Deserialize, Serialize};

use super::error::ModelError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Considering,
    Shelved,
    Committed,
    #[serde(rename = "In Progress")]
    InProgress,
    Complete,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Self::Considering,
        Self::Shelved,
        Self::Committed,
        Self::InProgress,
        Self::Complete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Considering => "Considering",
            Self::Shelved => "Shelved",
            Self::Committed => "Committed",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl From<Position> for Vec2 {
    fn from(position: Position) -> Self {
        Vec2::new(position.x, position.y)
    }
}

impl From<Vec2> for Position {
    fn from(value: Vec2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_cost: f64,
    /// Hours.
    #[serde(default)]
    pub estimated_time: f64,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub position_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            estimated_cost: 0.0,
            estimated_time: 0.0,
            status: Status::default(),
            assigned_to: String::new(),
            position_locked: false,
            position: None,
        }
    }

    pub fn with_estimates(mut self, cost: f64, time: f64) -> Self {
        self.estimated_cost = cost.max(0.0);
        self.estimated_time = time.max(0.0);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// The pinned position, if the node was locked by a drag and carries one.
    pub fn locked_position(&self) -> Option<Vec2> {
        if self.position_locked {
            self.position.map(Vec2::from)
        } else {
            None
        }
    }

    pub fn lock_at(&mut self, position: Vec2) {
        self.position = Some(position.into());
        self.position_locked = true;
    }
}

/// Directed dependency: `from` is the prerequisite, `to` the dependent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub from: String,
    pub to: String,
}

impl Link {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectModel {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ProjectModel {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self { nodes, links }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn add_node(&mut self, name: impl Into<String>) -> String {
        let id = self.fresh_id('n', |model, candidate| model.contains(candidate));
        self.nodes.push(Node::new(id.clone(), name));
        id
    }

    /// Adds a node that depends on `parent`, linking `parent -> child`.
    pub fn add_child(&mut self, parent: &str, name: impl Into<String>) -> Result<String, ModelError> {
        if !self.contains(parent) {
            return Err(ModelError::UnknownNode(parent.to_owned()));
        }

        let child = self.add_node(name);
        self.add_link(parent, &child)?;
        Ok(child)
    }

    /// Cycles and self-loops are accepted; the engine tolerates both.
    pub fn add_link(&mut self, from: &str, to: &str) -> Result<String, ModelError> {
        for endpoint in [from, to] {
            if !self.contains(endpoint) {
                return Err(ModelError::UnknownNode(endpoint.to_owned()));
            }
        }

        let id = self.fresh_id('l', |model, candidate| {
            model.links.iter().any(|link| link.id == candidate)
        });
        self.links.push(Link::new(id.clone(), from, to));
        Ok(id)
    }

    pub fn remove_link(&mut self, id: &str) -> Result<Link, ModelError> {
        let position = self
            .links
            .iter()
            .position(|link| link.id == id)
            .ok_or_else(|| ModelError::UnknownLink(id.to_owned()))?;
        Ok(self.links.remove(position))
    }

    /// Removes the node and every link touching it.
    pub fn delete_node(&mut self, id: &str) -> Result<Node, ModelError> {
        let position = self
            .nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| ModelError::UnknownNode(id.to_owned()))?;

        self.links.retain(|link| link.from != id && link.to != id);
        Ok(self.nodes.remove(position))
    }

    /// Links whose endpoints are both present.
    pub fn resolved_links(&self) -> impl Iterator<Item = &Link> {
        let ids = self.nodes.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
        self.links
            .iter()
            .filter(move |link| ids.contains(link.from.as_str()) && ids.contains(link.to.as_str()))
    }

    fn fresh_id(&self, prefix: char, taken: impl Fn(&Self, &str) -> bool) -> String {
        let mut counter = self.nodes.len() + self.links.len() + 1;
        loop {
            let candidate = format!("{prefix}{counter}");
            if !taken(self, &candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}
