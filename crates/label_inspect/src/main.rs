//! Label Inspect - builds a label hierarchy from a scene file and reports
//! what each traversal yields.

mod config;
mod dataset;
mod overlay;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use label_hierarchy::{AnchorId, LabelHierarchy, LabelIterator, TraversalStrategy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use web_time::Instant;

use config::Config;
use overlay::{FrameOverlay, Overlay};

#[derive(Parser, Debug)]
#[command(name = "label_inspect")]
#[command(about = "Build a label hierarchy and run traversals against a camera")]
struct Args {
	/// Path to scene configuration file (TOML)
	#[arg(short, long)]
	config: PathBuf,

	/// Override the configured strategy (ignores composite parts)
	#[arg(short, long, value_enum)]
	strategy: Option<StrategyArg>,

	/// Stop each frame after this many labels
	#[arg(short, long)]
	limit: Option<usize>,

	/// Override the number of simulated frames
	#[arg(short, long)]
	frames: Option<usize>,

	/// Write visited node geometry as JSON
	#[arg(short, long)]
	overlay: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
	Frustum,
	FullSort,
	Queue,
	DepthFirst,
}

impl From<StrategyArg> for TraversalStrategy {
	fn from(arg: StrategyArg) -> Self {
		match arg {
			StrategyArg::Frustum => TraversalStrategy::Frustum,
			StrategyArg::FullSort => TraversalStrategy::FullSort,
			StrategyArg::Queue => TraversalStrategy::Queue,
			StrategyArg::DepthFirst => TraversalStrategy::DepthFirst,
		}
	}
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();

	println!("Label Inspect");
	println!("=============");
	println!("Config: {}", args.config.display());

	let mut config = Config::load(&args.config)?;
	if let Some(strategy) = args.strategy {
		config.traversal.strategy = strategy.into();
		config.traversal.composite.clear();
	}
	if let Some(frames) = args.frames {
		config.traversal.frames = frames.max(1);
	}
	let limit = args
		.limit
		.or(Some(config.traversal.labels_per_frame).filter(|n| *n > 0))
		.unwrap_or(usize::MAX);

	println!("\nGenerating {} anchors ({:?})...", config.dataset.count, config.dataset.layout);
	let mut anchors = dataset::generate(&config.dataset)?;
	println!("  ✓ {} anchors", anchors.len());

	println!("\nBuilding hierarchy...");
	let mut hierarchy =
		LabelHierarchy::new(config.hierarchy.clone()).context("Invalid hierarchy configuration")?;
	let stats = hierarchy.compute(&mut anchors).context("Failed to build hierarchy")?;
	println!(
		"  ✓ {} nodes, {} leaves, depth {} ({}), mean leaf depth {:.2}",
		stats.node_count,
		stats.leaf_count,
		stats.actual_depth,
		if hierarchy.is_quadtree() { "quadtree" } else { "octree" },
		stats.mean_leaf_depth
	);
	println!(
		"  ✓ {} promoted, {} coincident groups, built in {:.2?}",
		stats.promoted_anchors, stats.coincident_groups, stats.build_time
	);

	let view = config.camera.view();
	let mut overlay = Overlay {
		quadtree: hierarchy.is_quadtree(),
		frames: Vec::new(),
	};

	let mut seeds: Vec<AnchorId> = Vec::new();
	for frame in 0..config.traversal.frames {
		let mut labels = make_iterator(&hierarchy, &config, &view);
		let mut frame_overlay = FrameOverlay::new(frame, labels.name(), seeds.len());

		let start = Instant::now();
		labels.begin(&seeds);
		let mut yielded = Vec::new();
		while yielded.len() < limit {
			let Some(id) = labels.label_id() else {
				break;
			};
			if let Some(geometry) = labels.node_geometry() {
				frame_overlay.record(geometry, id);
			}
			yielded.push(id);
			labels.advance();
		}
		let elapsed = start.elapsed();

		println!(
			"\nFrame {} [{}]: {} labels ({} seeded), {} nodes, {:.2?}{}",
			frame,
			labels.name(),
			yielded.len(),
			seeds.len(),
			labels.nodes_visited(),
			elapsed,
			if labels.is_at_end() { "" } else { " (limit reached)" }
		);

		overlay.frames.push(frame_overlay);
		seeds = distinct(yielded);
	}

	if let Some(path) = &args.overlay {
		overlay.write(path)?;
		println!("\n  ✓ Overlay written to {}", path.display());
	}

	Ok(())
}

/// Composite parts take precedence over the single strategy.
fn make_iterator<'h>(
	hierarchy: &'h LabelHierarchy,
	config: &Config,
	view: &label_hierarchy::ViewSnapshot,
) -> LabelIterator<'h> {
	let options = &config.traversal.options;
	if config.traversal.composite.is_empty() {
		return hierarchy.iterator(config.traversal.strategy, view, options);
	}
	let parts = config
		.traversal
		.composite
		.iter()
		.map(|part| (hierarchy.iterator(part.strategy, view, options), part.repeat))
		.collect();
	LabelIterator::composite(parts)
}

/// Seeds for the next frame, first occurrence kept.
fn distinct(ids: Vec<AnchorId>) -> Vec<AnchorId> {
	let mut seen = std::collections::HashSet::with_capacity(ids.len());
	ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
