use clap::Parser;
use std::path::PathBuf;
use vegetation::{generate_resolved, FullData, RngSource, TreeConfig, TreeMatrices};

/// Generates a tree headlessly and writes its parameters and instance data.
#[derive(Debug, Parser)]
#[command(name = "trees-playground", version, about)]
pub struct TreesPlayground {
	/// Parameters file to start from; flags below override its fields.
	#[arg(long)]
	pub params: Option<PathBuf>,

	/// Seed for reproducible trees. Without it every run differs.
	#[arg(long)]
	pub seed: Option<u64>,

	/// At most 64; deeper trees are rejected at parse time.
	#[arg(long, value_parser = clap::value_parser!(u32).range(0..=64))]
	pub max_depth: Option<u32>,
	#[arg(long)]
	pub initial_length: Option<f32>,
	#[arg(long)]
	pub initial_radius: Option<f32>,
	#[arg(long)]
	pub length_factor: Option<f32>,
	#[arg(long)]
	pub radius_factor: Option<f32>,
	/// Degrees.
	#[arg(long, allow_negative_numbers = true)]
	pub branch_angle: Option<f32>,
	#[arg(long)]
	pub num_branches: Option<u32>,
	/// Degrees.
	#[arg(long)]
	pub angle_variance: Option<f32>,
	/// Percent.
	#[arg(long)]
	pub length_variance: Option<f32>,
	#[arg(long)]
	pub min_radius: Option<f32>,
	#[arg(long)]
	pub leaf_size: Option<f32>,
	#[arg(long)]
	pub taper_factor: Option<f32>,
	#[arg(long)]
	pub branch_color: Option<String>,
	#[arg(long)]
	pub leaf_color: Option<String>,

	/// Where to write the parameters file.
	#[arg(long)]
	pub out_params: Option<PathBuf>,

	/// Where to write the full data file.
	#[arg(long)]
	pub out_data: Option<PathBuf>,
}

impl TreesPlayground {
	/// The flag overrides as a sparse config.
	pub fn overrides(&self) -> TreeConfig {
		TreeConfig {
			max_depth: self.max_depth,
			initial_length: self.initial_length,
			initial_radius: self.initial_radius,
			length_factor: self.length_factor,
			radius_factor: self.radius_factor,
			branch_angle: self.branch_angle,
			num_branches: self.num_branches,
			angle_variance: self.angle_variance,
			length_variance: self.length_variance,
			min_radius: self.min_radius,
			leaf_size: self.leaf_size,
			taper_factor: self.taper_factor,
			branch_color: self.branch_color.clone(),
			leaf_color: self.leaf_color.clone(),
		}
	}

	/// The parameters file, if any, with the flag overrides layered on top.
	pub fn config(&self) -> anyhow::Result<TreeConfig> {
		let base = match &self.params {
			Some(path) => {
				tracing::info!("loading parameters from {}", path.display());
				TreeConfig::load(path)?
			}
			None => TreeConfig::new(),
		};
		Ok(base.merged_with(self.overrides()))
	}

	pub fn run(&self) -> anyhow::Result<TreeMatrices> {
		let config = self.config()?;
		let resolved = config.resolve()?;

		let matrices = match self.seed {
			Some(seed) => {
				tracing::info!("growing tree with seed {}", seed);
				generate_resolved(&resolved, &mut RngSource::seeded(seed))
			}
			None => generate_resolved(&resolved, &mut RngSource::thread()),
		};

		tracing::info!(
			budget = matrices.budget,
			branches = matrices.branch_matrices.len(),
			leaves = matrices.leaf_matrices.len(),
			truncated = matrices.truncated,
			"tree generated"
		);

		if let Some(path) = &self.out_params {
			config.save(path)?;
		}
		if let Some(path) = &self.out_data {
			FullData::new(&resolved, &matrices).save(path)?;
		}

		Ok(matrices)
	}
}
