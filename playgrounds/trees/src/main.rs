use clap::Parser;
use trees_playground::TreesPlayground;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let playground = TreesPlayground::parse();
	let matrices = playground.run()?;

	if matrices.truncated {
		tracing::warn!(
			"instance budget {} was too small for this tree, consider a shallower config",
			matrices.budget
		);
	}

	Ok(())
}
