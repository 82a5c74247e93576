//! JSON export of the nodes a traversal visited, for debug drawing.

use anyhow::{Context, Result};
use label_hierarchy::{AnchorId, NodeGeometry};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct OverlayNode {
	pub center: [f64; 3],
	pub size: f64,
	/// Labels yielded while this node was current.
	pub labels: Vec<AnchorId>,
}

#[derive(Debug, Serialize)]
pub struct FrameOverlay {
	pub frame: usize,
	pub strategy: String,
	pub seeds: usize,
	pub nodes: Vec<OverlayNode>,
}

#[derive(Debug, Default, Serialize)]
pub struct Overlay {
	pub quadtree: bool,
	pub frames: Vec<FrameOverlay>,
}

impl FrameOverlay {
	pub fn new(frame: usize, strategy: &str, seeds: usize) -> Self {
		Self {
			frame,
			strategy: strategy.to_string(),
			seeds,
			nodes: Vec::new(),
		}
	}

	/// Record a yielded label. Consecutive labels from the same node share
	/// one entry.
	pub fn record(&mut self, geometry: NodeGeometry, id: AnchorId) {
		let center = geometry.center.to_array();
		match self.nodes.last_mut() {
			Some(last) if last.center == center && last.size == geometry.size => last.labels.push(id),
			_ => self.nodes.push(OverlayNode {
				center,
				size: geometry.size,
				labels: vec![id],
			}),
		}
	}
}

impl Overlay {
	pub fn write(&self, path: &Path) -> Result<()> {
		let json = serde_json::to_string_pretty(self).context("Failed to serialize overlay")?;
		std::fs::write(path, json)
			.with_context(|| format!("Failed to write overlay: {}", path.display()))
	}
}
