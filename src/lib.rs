//! Effort map: rolls project cost and time up a dependency graph, sizes
//! nodes by their share of the effort and lays the graph out for drawing.

pub mod app;
pub mod config;
pub mod engine;
pub mod model;
pub mod util;
