//! The two files a tree is saved as.
//!
//! A *parameters* file is just the [`TreeConfig`]. A *full data* file carries
//! the appearance subset of the config plus both instance arrays, each
//! transform flattened to 16 column-major floats.

use crate::{
	error::TreeError,
	tree::{
		config::{HexColor, ResolvedTreeConfig, TreeConfig},
		transform::unflatten,
		TreeMatrices,
	},
};
use bevy::math::Mat4;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
	fs::File,
	io::{BufReader, BufWriter, Write},
	path::Path,
};

/// Appearance settings a renderer needs alongside the instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullDataConfig {
	pub taper_factor: f32,
	pub leaf_size: f32,
	pub branch_color: String,
	pub leaf_color: String,
}

impl FullDataConfig {
	pub fn from_resolved(config: &ResolvedTreeConfig) -> Self {
		Self {
			taper_factor: config.taper_factor,
			leaf_size: config.leaf_size,
			branch_color: config.branch_color.to_string(),
			leaf_color: config.leaf_color.to_string(),
		}
	}

	pub fn branch_color(&self) -> Result<HexColor, TreeError> {
		HexColor::parse("branchColor", &self.branch_color)
	}

	pub fn leaf_color(&self) -> Result<HexColor, TreeError> {
		HexColor::parse("leafColor", &self.leaf_color)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullData {
	pub config: FullDataConfig,
	pub branch_matrices: Vec<[f32; 16]>,
	pub leaf_matrices: Vec<[f32; 16]>,
}

impl FullData {
	pub fn new(config: &ResolvedTreeConfig, matrices: &TreeMatrices) -> Self {
		Self {
			config: FullDataConfig::from_resolved(config),
			branch_matrices: matrices.branch_arrays(),
			leaf_matrices: matrices.leaf_arrays(),
		}
	}

	pub fn branch_transforms(&self) -> Vec<Mat4> {
		unflatten(&self.branch_matrices)
	}

	pub fn leaf_transforms(&self) -> Vec<Mat4> {
		unflatten(&self.leaf_matrices)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, TreeError> {
		let data: Self = read_json(path.as_ref())?;
		data.config.branch_color()?;
		data.config.leaf_color()?;
		Ok(data)
	}

	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TreeError> {
		write_json(path.as_ref(), self)
	}
}

impl TreeConfig {
	/// Reads a parameters file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, TreeError> {
		read_json(path.as_ref())
	}

	/// Writes a parameters file; absent fields are left out.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TreeError> {
		write_json(path.as_ref(), self)
	}
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TreeError> {
	let reader = BufReader::new(File::open(path)?);
	Ok(serde_json::from_reader(reader)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), TreeError> {
	let mut writer = BufWriter::new(File::create(path)?);
	serde_json::to_writer_pretty(&mut writer, value)?;
	writer.flush()?;
	log::info!("wrote {}", path.display());
	Ok(())
}
