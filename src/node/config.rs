use super::error::ConfigError;
use super::metric::ErrorMethod;

/// Default error threshold used by the command line front-end.
pub const DEFAULT_THRESHOLD: f64 = 10.;
/// Default minimum block size used by the command line front-end.
pub const DEFAULT_MIN_BLOCK_SIZE: u32 = 4;

/// Parameters of one compression run; fixed for the whole tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
	/// How block non-uniformity is measured.
	pub method: ErrorMethod,
	/// A block is split only if its error is strictly greater than this.
	pub threshold: f64,
	/// Smallest width/height a block or any of its quadrants may have.
	pub min_block_size: u32,
}

impl Config {
	/// Creates a validated configuration.
	pub fn new(method: ErrorMethod, threshold: f64, min_block_size: u32) -> Result<Self, ConfigError> {
		let config = Config { method, threshold, min_block_size };
		config.validate()?;
		Ok(config)
	}

	/// Checks the numeric parameters.
	///
	/// Fields are public, so a hand-built `Config` goes through this again
	/// before a tree is built from it.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_parameters(self.threshold, self.min_block_size)
	}
}

/// Checks a threshold and minimum block size independently of the metric
/// they will be used with.
pub fn validate_parameters(threshold: f64, min_block_size: u32) -> Result<(), ConfigError> {
	if !threshold.is_finite() {
		return Err(ConfigError::NonFiniteThreshold(threshold));
	}
	if threshold < 0. {
		return Err(ConfigError::NegativeThreshold(threshold));
	}
	if min_block_size == 0 {
		return Err(ConfigError::ZeroMinBlockSize);
	}
	Ok(())
}

impl Default for Config {
	fn default() -> Self {
		Config {
			method: ErrorMethod::Variance,
			threshold: DEFAULT_THRESHOLD,
			min_block_size: DEFAULT_MIN_BLOCK_SIZE,
		}
	}
}
