//! Scene file parsing for the inspector.

use anyhow::{Context, Result};
use glam::DVec3;
use label_hierarchy::{HierarchyConfig, TraversalOptions, TraversalStrategy, ViewSnapshot};
use serde::Deserialize;
use std::path::Path;

/// Root configuration of one inspection scene.
#[derive(Debug, Deserialize)]
pub struct Config {
	/// Tree shape. Library defaults when omitted.
	#[serde(default)]
	pub hierarchy: HierarchyConfig,
	/// Synthetic anchors to index.
	pub dataset: DatasetConfig,
	/// Camera the traversal runs against.
	pub camera: CameraConfig,
	/// Strategy and budgets.
	#[serde(default)]
	pub traversal: TraversalConfig,
}

/// Shape of the generated point cloud.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
	/// Uniform in a cube.
	#[default]
	Cube,
	/// Uniform on the z = 0 plane (builds a quadtree).
	Plane,
	/// On a sphere around the origin (pairs with `positions_as_normals`).
	Globe,
}

#[derive(Debug, Deserialize)]
pub struct DatasetConfig {
	/// Number of anchors.
	pub count: usize,
	/// RNG seed for positions and priorities.
	#[serde(default)]
	pub seed: u64,
	#[serde(default)]
	pub layout: Layout,
	/// Edge length of the cube/plane, or the globe radius.
	#[serde(default = "default_extent")]
	pub extent: f64,
	/// Extra anchors stacked on the first anchor's position.
	#[serde(default)]
	pub duplicates: usize,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
	pub eye: [f64; 3],
	pub target: [f64; 3],
	#[serde(default = "default_up")]
	pub up: [f64; 3],
	/// Vertical view angle in degrees.
	#[serde(default = "default_view_angle")]
	pub view_angle: f64,
	#[serde(default = "default_aspect")]
	pub aspect: f64,
	#[serde(default = "default_near")]
	pub near: f64,
	#[serde(default = "default_far")]
	pub far: f64,
}

/// One entry of a round-robin composite.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CompositePart {
	pub strategy: TraversalStrategy,
	#[serde(default = "default_repeat")]
	pub repeat: usize,
}

#[derive(Debug, Deserialize)]
pub struct TraversalConfig {
	#[serde(default = "default_strategy")]
	pub strategy: TraversalStrategy,
	/// When non-empty, overrides `strategy`.
	#[serde(default)]
	pub composite: Vec<CompositePart>,
	/// Frames to simulate; each frame seeds the next.
	#[serde(default = "default_frames")]
	pub frames: usize,
	/// Labels pulled per frame. 0 drains the iterator.
	#[serde(default)]
	pub labels_per_frame: usize,
	#[serde(flatten)]
	pub options: TraversalOptions,
}

impl Default for TraversalConfig {
	fn default() -> Self {
		Self {
			strategy: default_strategy(),
			composite: Vec::new(),
			frames: default_frames(),
			labels_per_frame: 0,
			options: TraversalOptions::default(),
		}
	}
}

fn default_extent() -> f64 {
	100.0
}

fn default_up() -> [f64; 3] {
	[0.0, 0.0, 1.0]
}

fn default_view_angle() -> f64 {
	30.0
}

fn default_aspect() -> f64 {
	1.0
}

fn default_near() -> f64 {
	0.1
}

fn default_far() -> f64 {
	10_000.0
}

fn default_repeat() -> usize {
	1
}

fn default_strategy() -> TraversalStrategy {
	TraversalStrategy::Queue
}

fn default_frames() -> usize {
	1
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate TOML text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		config
			.hierarchy
			.validate()
			.context("Invalid [hierarchy] section")?;
		if config.dataset.count == 0 {
			anyhow::bail!("dataset.count must be at least 1");
		}
		if !(config.dataset.extent > 0.0) {
			anyhow::bail!("dataset.extent must be positive, got {}", config.dataset.extent);
		}
		if !(config.camera.near > 0.0 && config.camera.near < config.camera.far) {
			anyhow::bail!(
				"camera planes must satisfy 0 < near < far, got near={} far={}",
				config.camera.near,
				config.camera.far
			);
		}
		if config.traversal.frames == 0 {
			anyhow::bail!("traversal.frames must be at least 1");
		}

		Ok(config)
	}
}

impl CameraConfig {
	pub fn view(&self) -> ViewSnapshot {
		ViewSnapshot::look_at(
			DVec3::from_array(self.eye),
			DVec3::from_array(self.target),
			DVec3::from_array(self.up),
			self.view_angle,
			self.aspect,
			self.near,
			self.far,
		)
	}
}
