pub mod branches;
pub mod budget;
pub mod config;
pub mod leaves;
pub mod sink;
pub mod transform;

use crate::{error::TreeError, random::RandomSource};
use bevy::math::Mat4;
use branches::BranchRecursion;
use budget::{estimate_instance_budget, preallocation};
use config::{ResolvedTreeConfig, TreeConfig};
use sink::InstanceBuffers;

/// Branch and leaf instance transforms for one generated tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeMatrices {
	pub branch_matrices: Vec<Mat4>,
	pub leaf_matrices: Vec<Mat4>,
	/// Bound both arrays were generated against; size instance buffers with it.
	pub budget: usize,
	/// Set when the budget cut geometry off. A renderer seeing this may want
	/// a larger buffer.
	pub truncated: bool,
}

impl TreeMatrices {
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.branch_matrices.is_empty() && self.leaf_matrices.is_empty()
	}

	/// Branch instances as 16-float column-major arrays.
	pub fn branch_arrays(&self) -> Vec<[f32; 16]> {
		transform::flatten(&self.branch_matrices)
	}

	/// Leaf instances as 16-float column-major arrays.
	pub fn leaf_arrays(&self) -> Vec<[f32; 16]> {
		transform::flatten(&self.leaf_matrices)
	}
}

/// Generates a tree, degrading to an empty result instead of failing.
///
/// A missing or invalid config yields empty matrices and a warning.
pub fn generate_tree_matrices<R: RandomSource + ?Sized>(
	config: Option<&TreeConfig>,
	random: &mut R,
) -> TreeMatrices {
	let Some(config) = config else {
		log::warn!("no tree config supplied, generating an empty tree");
		return TreeMatrices::empty();
	};

	match try_generate(config, random) {
		Ok(matrices) => matrices,
		Err(e) => {
			log::warn!("unusable tree config, generating an empty tree: {}", e);
			TreeMatrices::empty()
		}
	}
}

/// Resolves `config` and generates a tree from it.
pub fn try_generate<R: RandomSource + ?Sized>(
	config: &TreeConfig,
	random: &mut R,
) -> Result<TreeMatrices, TreeError> {
	let resolved = config.resolve()?;
	Ok(generate_resolved(&resolved, random))
}

/// Generates a tree from an already resolved config.
pub fn generate_resolved<R: RandomSource + ?Sized>(
	config: &ResolvedTreeConfig,
	random: &mut R,
) -> TreeMatrices {
	let budget = estimate_instance_budget(config.max_depth, config.num_branches);
	let mut buffers = InstanceBuffers::with_capacity(preallocation(budget));

	let mut recursion = BranchRecursion::new(config, budget, random);
	recursion.grow(&mut buffers);
	let truncated = recursion.truncated();

	if truncated {
		log::warn!(
			"tree truncated by instance budget {} ({} branches, {} leaves)",
			budget,
			buffers.branches.len(),
			buffers.leaves.len()
		);
	} else {
		log::debug!(
			"generated tree with {} branches and {} leaves (budget {})",
			buffers.branches.len(),
			buffers.leaves.len(),
			budget
		);
	}

	TreeMatrices {
		branch_matrices: buffers.branches,
		leaf_matrices: buffers.leaves,
		budget,
		truncated,
	}
}
