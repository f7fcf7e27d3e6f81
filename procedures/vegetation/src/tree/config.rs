use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The trunk radius defaults to the trunk length divided by this ratio.
pub const INITIAL_RADIUS_RATIO: f32 = 15.0;

/// Tree parameters as they arrive at the API boundary.
///
/// Every field is optional. [`TreeConfig::resolve`] fills the gaps from
/// [`ResolvedTreeConfig::default`] and validates the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_depth: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub initial_length: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub initial_radius: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub length_factor: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub radius_factor: Option<f32>,
	/// Degrees.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub branch_angle: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub num_branches: Option<u32>,
	/// Degrees.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub angle_variance: Option<f32>,
	/// Percent of the child length.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub length_variance: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_radius: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub leaf_size: Option<f32>,

	// appearance, only read by renderers and the full data file
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub taper_factor: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub branch_color: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub leaf_color: Option<String>,
}

impl TreeConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_max_depth(mut self, max_depth: u32) -> Self {
		self.max_depth = Some(max_depth);
		self
	}

	pub fn with_initial_length(mut self, initial_length: f32) -> Self {
		self.initial_length = Some(initial_length);
		self
	}

	pub fn with_initial_radius(mut self, initial_radius: f32) -> Self {
		self.initial_radius = Some(initial_radius);
		self
	}

	pub fn with_length_factor(mut self, length_factor: f32) -> Self {
		self.length_factor = Some(length_factor);
		self
	}

	pub fn with_radius_factor(mut self, radius_factor: f32) -> Self {
		self.radius_factor = Some(radius_factor);
		self
	}

	pub fn with_branch_angle(mut self, branch_angle: f32) -> Self {
		self.branch_angle = Some(branch_angle);
		self
	}

	pub fn with_num_branches(mut self, num_branches: u32) -> Self {
		self.num_branches = Some(num_branches);
		self
	}

	pub fn with_angle_variance(mut self, angle_variance: f32) -> Self {
		self.angle_variance = Some(angle_variance);
		self
	}

	pub fn with_length_variance(mut self, length_variance: f32) -> Self {
		self.length_variance = Some(length_variance);
		self
	}

	pub fn with_min_radius(mut self, min_radius: f32) -> Self {
		self.min_radius = Some(min_radius);
		self
	}

	pub fn with_leaf_size(mut self, leaf_size: f32) -> Self {
		self.leaf_size = Some(leaf_size);
		self
	}

	pub fn with_taper_factor(mut self, taper_factor: f32) -> Self {
		self.taper_factor = Some(taper_factor);
		self
	}

	pub fn with_branch_color(mut self, branch_color: impl Into<String>) -> Self {
		self.branch_color = Some(branch_color.into());
		self
	}

	pub fn with_leaf_color(mut self, leaf_color: impl Into<String>) -> Self {
		self.leaf_color = Some(leaf_color.into());
		self
	}

	/// Layers `overrides` on top of `self`; fields set in `overrides` win.
	pub fn merged_with(self, overrides: TreeConfig) -> Self {
		Self {
			max_depth: overrides.max_depth.or(self.max_depth),
			initial_length: overrides.initial_length.or(self.initial_length),
			initial_radius: overrides.initial_radius.or(self.initial_radius),
			length_factor: overrides.length_factor.or(self.length_factor),
			radius_factor: overrides.radius_factor.or(self.radius_factor),
			branch_angle: overrides.branch_angle.or(self.branch_angle),
			num_branches: overrides.num_branches.or(self.num_branches),
			angle_variance: overrides.angle_variance.or(self.angle_variance),
			length_variance: overrides.length_variance.or(self.length_variance),
			min_radius: overrides.min_radius.or(self.min_radius),
			leaf_size: overrides.leaf_size.or(self.leaf_size),
			taper_factor: overrides.taper_factor.or(self.taper_factor),
			branch_color: overrides.branch_color.or(self.branch_color),
			leaf_color: overrides.leaf_color.or(self.leaf_color),
		}
	}

	/// Fills absent fields from the defaults table and validates the result.
	///
	/// Shrink factors must lie in `(0, 1]`, `minRadius` and `leafSize` must be
	/// positive and variances must not be negative. A non-positive trunk
	/// length or radius is accepted and simply grows nothing.
	///
	/// The trunk radius falls back to the *resolved* trunk length over
	/// [`INITIAL_RADIUS_RATIO`], so overriding only the length still yields a
	/// proportional trunk.
	pub fn resolve(&self) -> Result<ResolvedTreeConfig, TreeError> {
		let defaults = ResolvedTreeConfig::default();

		let initial_length =
			finite("initialLength", self.initial_length.unwrap_or(defaults.initial_length))?;
		let initial_radius = finite(
			"initialRadius",
			self.initial_radius.unwrap_or(initial_length / INITIAL_RADIUS_RATIO),
		)?;

		let branch_color = match &self.branch_color {
			Some(hex) => HexColor::parse("branchColor", hex)?,
			None => defaults.branch_color,
		};
		let leaf_color = match &self.leaf_color {
			Some(hex) => HexColor::parse("leafColor", hex)?,
			None => defaults.leaf_color,
		};

		Ok(ResolvedTreeConfig {
			max_depth: self.max_depth.unwrap_or(defaults.max_depth),
			initial_length,
			initial_radius,
			length_factor: unit_fraction(
				"lengthFactor",
				self.length_factor.unwrap_or(defaults.length_factor),
			)?,
			radius_factor: unit_fraction(
				"radiusFactor",
				self.radius_factor.unwrap_or(defaults.radius_factor),
			)?,
			branch_angle: finite("branchAngle", self.branch_angle.unwrap_or(defaults.branch_angle))?,
			num_branches: self.num_branches.unwrap_or(defaults.num_branches),
			angle_variance: non_negative(
				"angleVariance",
				self.angle_variance.unwrap_or(defaults.angle_variance),
			)?,
			length_variance: non_negative(
				"lengthVariance",
				self.length_variance.unwrap_or(defaults.length_variance),
			)?,
			min_radius: positive("minRadius", self.min_radius.unwrap_or(defaults.min_radius))?,
			leaf_size: positive("leafSize", self.leaf_size.unwrap_or(defaults.leaf_size))?,
			taper_factor: finite("taperFactor", self.taper_factor.unwrap_or(defaults.taper_factor))?,
			branch_color,
			leaf_color,
		})
	}
}

fn finite(field: &'static str, value: f32) -> Result<f32, TreeError> {
	if value.is_finite() {
		Ok(value)
	} else {
		Err(TreeError::invalid(field, format!("expected a finite number, got {}", value)))
	}
}

fn positive(field: &'static str, value: f32) -> Result<f32, TreeError> {
	match finite(field, value)? {
		value if value > 0.0 => Ok(value),
		value => Err(TreeError::invalid(field, format!("expected a positive number, got {}", value))),
	}
}

fn non_negative(field: &'static str, value: f32) -> Result<f32, TreeError> {
	match finite(field, value)? {
		value if value >= 0.0 => Ok(value),
		value => Err(TreeError::invalid(field, format!("expected zero or more, got {}", value))),
	}
}

/// Shrink ratios live in `(0, 1]`.
fn unit_fraction(field: &'static str, value: f32) -> Result<f32, TreeError> {
	match finite(field, value)? {
		value if value > 0.0 && value <= 1.0 => Ok(value),
		value => Err(TreeError::invalid(field, format!("expected a value in (0, 1], got {}", value))),
	}
}

/// Fully populated tree parameters; the recursion only ever sees this.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTreeConfig {
	pub max_depth: u32,
	pub initial_length: f32,
	pub initial_radius: f32,
	pub length_factor: f32,
	pub radius_factor: f32,
	pub branch_angle: f32,
	pub num_branches: u32,
	pub angle_variance: f32,
	pub length_variance: f32,
	pub min_radius: f32,
	pub leaf_size: f32,
	pub taper_factor: f32,
	pub branch_color: HexColor,
	pub leaf_color: HexColor,
}

impl Default for ResolvedTreeConfig {
	fn default() -> Self {
		Self {
			max_depth: 5,
			initial_length: 10.0,
			initial_radius: 10.0 / INITIAL_RADIUS_RATIO,
			length_factor: 0.7,
			radius_factor: 0.6,
			branch_angle: 30.0,
			num_branches: 2,
			angle_variance: 10.0,
			length_variance: 10.0,
			min_radius: 0.1,
			leaf_size: 0.5,
			taper_factor: 0.7,
			branch_color: HexColor([0x8b, 0x5a, 0x2b]),
			leaf_color: HexColor([0x3a, 0x7d, 0x2c]),
		}
	}
}

impl ResolvedTreeConfig {
	/// Converts back into a boundary config with every field present.
	pub fn to_config(&self) -> TreeConfig {
		TreeConfig {
			max_depth: Some(self.max_depth),
			initial_length: Some(self.initial_length),
			initial_radius: Some(self.initial_radius),
			length_factor: Some(self.length_factor),
			radius_factor: Some(self.radius_factor),
			branch_angle: Some(self.branch_angle),
			num_branches: Some(self.num_branches),
			angle_variance: Some(self.angle_variance),
			length_variance: Some(self.length_variance),
			min_radius: Some(self.min_radius),
			leaf_size: Some(self.leaf_size),
			taper_factor: Some(self.taper_factor),
			branch_color: Some(self.branch_color.to_string()),
			leaf_color: Some(self.leaf_color.to_string()),
		}
	}
}

/// An sRGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
	/// Accepts `#rrggbb` or `rrggbb`, case insensitive.
	pub fn parse(field: &'static str, value: &str) -> Result<Self, TreeError> {
		let digits = value.trim().trim_start_matches('#');
		let mut rgb = [0u8; 3];
		hex::decode_to_slice(digits, &mut rgb)
			.map_err(|e| TreeError::invalid(field, format!("bad hex color {:?}: {}", value, e)))?;
		Ok(Self(rgb))
	}

	/// Linear-ish unit floats, as renderers take them.
	pub fn to_unit_rgb(&self) -> [f32; 3] {
		self.0.map(|channel| channel as f32 / 255.0)
	}
}

impl fmt::Display for HexColor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", hex::encode(self.0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config_resolves_to_defaults() {
		let resolved = TreeConfig::new().resolve().unwrap();
		assert_eq!(resolved, ResolvedTreeConfig::default());
	}

	#[test]
	fn test_initial_radius_follows_resolved_length() {
		let resolved = TreeConfig::new().with_initial_length(30.0).resolve().unwrap();
		assert_eq!(resolved.initial_radius, 2.0);

		let resolved =
			TreeConfig::new().with_initial_length(30.0).with_initial_radius(0.5).resolve().unwrap();
		assert_eq!(resolved.initial_radius, 0.5);
	}

	#[test]
	fn test_fields_default_independently() {
		let resolved = TreeConfig::new().with_num_branches(4).with_leaf_size(2.0).resolve().unwrap();
		assert_eq!(resolved.num_branches, 4);
		assert_eq!(resolved.leaf_size, 2.0);
		assert_eq!(resolved.max_depth, 5);
		assert_eq!(resolved.branch_angle, 30.0);
	}

	#[test]
	fn test_non_finite_is_rejected() {
		let err = TreeConfig::new().with_branch_angle(f32::NAN).resolve().unwrap_err();
		match err {
			TreeError::InvalidConfiguration { field, .. } => assert_eq!(field, "branchAngle"),
			other => panic!("unexpected error: {:?}", other),
		}

		assert!(TreeConfig::new().with_min_radius(f32::INFINITY).resolve().is_err());
	}

	fn rejected_field(config: TreeConfig) -> &'static str {
		match config.resolve() {
			Err(TreeError::InvalidConfiguration { field, .. }) => field,
			other => panic!("expected a rejected config, got {:?}", other),
		}
	}

	#[test]
	fn test_radius_floor_must_be_positive() {
		assert_eq!(rejected_field(TreeConfig::new().with_min_radius(0.0)), "minRadius");
		assert_eq!(rejected_field(TreeConfig::new().with_min_radius(-1.0)), "minRadius");
	}

	#[test]
	fn test_leaf_size_must_be_positive() {
		assert_eq!(rejected_field(TreeConfig::new().with_leaf_size(0.0)), "leafSize");
		assert_eq!(rejected_field(TreeConfig::new().with_leaf_size(-0.5)), "leafSize");
	}

	#[test]
	fn test_shrink_factors_are_unit_fractions() {
		assert_eq!(rejected_field(TreeConfig::new().with_length_factor(0.0)), "lengthFactor");
		assert_eq!(rejected_field(TreeConfig::new().with_length_factor(1.5)), "lengthFactor");
		assert_eq!(rejected_field(TreeConfig::new().with_radius_factor(0.0)), "radiusFactor");
		assert_eq!(rejected_field(TreeConfig::new().with_radius_factor(-0.2)), "radiusFactor");

		let resolved =
			TreeConfig::new().with_length_factor(1.0).with_radius_factor(1.0).resolve().unwrap();
		assert_eq!(resolved.length_factor, 1.0);
		assert_eq!(resolved.radius_factor, 1.0);
	}

	#[test]
	fn test_variances_must_not_be_negative() {
		assert_eq!(rejected_field(TreeConfig::new().with_angle_variance(-1.0)), "angleVariance");
		assert_eq!(rejected_field(TreeConfig::new().with_length_variance(-10.0)), "lengthVariance");
		assert!(TreeConfig::new().with_angle_variance(0.0).with_length_variance(0.0).resolve().is_ok());
	}

	#[test]
	fn test_non_positive_trunk_is_accepted() {
		assert!(TreeConfig::new().with_initial_length(0.0).resolve().is_ok());
		assert!(TreeConfig::new().with_initial_radius(-0.5).resolve().is_ok());
	}

	#[test]
	fn test_colors() {
		let resolved = TreeConfig::new()
			.with_branch_color("#FF8000")
			.with_leaf_color("00ff00")
			.resolve()
			.unwrap();
		assert_eq!(resolved.branch_color, HexColor([255, 128, 0]));
		assert_eq!(resolved.leaf_color.to_string(), "#00ff00");
		assert_eq!(resolved.leaf_color.to_unit_rgb(), [0.0, 1.0, 0.0]);

		assert!(TreeConfig::new().with_leaf_color("#12345").resolve().is_err());
		assert!(TreeConfig::new().with_leaf_color("#zzzzzz").resolve().is_err());
	}

	#[test]
	fn test_merge_prefers_overrides() {
		let base = TreeConfig::new().with_max_depth(3).with_leaf_size(1.0);
		let merged = base.merged_with(TreeConfig::new().with_max_depth(7));
		assert_eq!(merged.max_depth, Some(7));
		assert_eq!(merged.leaf_size, Some(1.0));
		assert_eq!(merged.num_branches, None);
	}

	#[test]
	fn test_json_is_camel_case_and_sparse() {
		let config = TreeConfig::new().with_max_depth(4).with_angle_variance(0.0);
		let json = serde_json::to_value(&config).unwrap();
		assert_eq!(json, serde_json::json!({ "maxDepth": 4, "angleVariance": 0.0 }));

		let parsed: TreeConfig =
			serde_json::from_str(r##"{ "numBranches": 3, "branchColor": "#102030" }"##).unwrap();
		assert_eq!(parsed.num_branches, Some(3));
		assert_eq!(parsed.branch_color.as_deref(), Some("#102030"));
		assert_eq!(parsed.max_depth, None);
	}

	#[test]
	fn test_resolved_round_trips_through_config() {
		let resolved = ResolvedTreeConfig::default();
		assert_eq!(resolved.to_config().resolve().unwrap(), resolved);
	}
}
