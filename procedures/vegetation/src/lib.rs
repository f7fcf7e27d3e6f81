pub mod error;
pub mod export;
pub mod random;
pub mod tree;

pub use error::TreeError;
pub use export::{FullData, FullDataConfig};
pub use random::{ConstantSource, RandomSource, RngSource, SequenceSource};
pub use tree::{
	branches::BranchRecursion,
	budget::estimate_instance_budget,
	config::{HexColor, ResolvedTreeConfig, TreeConfig},
	generate_resolved, generate_tree_matrices,
	sink::{InstanceBuffers, InstanceSink, Segment},
	try_generate, TreeMatrices,
};
