use std::path::PathBuf;

use thiserror::Error;

/// Reason why a set of compression parameters was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
	/// The error threshold is below zero.
	#[error("threshold must not be negative (got {0})")]
	NegativeThreshold(f64),
	/// The error threshold is NaN or infinite.
	#[error("threshold must be a finite number (got {0})")]
	NonFiniteThreshold(f64),
	/// The minimum block size is zero; blocks could shrink forever.
	#[error("minimum block size must be at least 1")]
	ZeroMinBlockSize,
	/// The error method selector matches none of the known methods.
	#[error("unknown error method '{0}'")]
	UnknownMethod(String),
}

/// Reason why an image couldn't be turned into a quadtree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyzeError {
	/// Construction was asked to proceed with parameters that don't validate.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(#[from] ConfigError),
	/// The image has no pixels, so there is no root block.
	#[error("image has zero width or height")]
	EmptyImage,
}

/// Reason why an image file couldn't be compressed.
#[derive(Debug, Error)]
pub enum CompressError {
	/// The input file couldn't be read or decoded.
	#[error("could not load '{}': {source}", .path.display())]
	Load {
		path: PathBuf,
		source: image::ImageError,
	},
	/// The output file couldn't be encoded or written.
	#[error("could not save '{}': {source}", .path.display())]
	Save {
		path: PathBuf,
		source: image::ImageError,
	},
	/// Encoding the output in memory (for size measurement) failed.
	#[error("could not encode output: {0}")]
	Encode(image::ImageError),
	/// Metadata of a file couldn't be read.
	#[error("could not access '{}': {source}", .path.display())]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},
	/// The output path doesn't end in one of the supported extensions.
	#[error("unsupported output format for '{0}'; use .jpg, .jpeg, .png, .gif or .bmp")]
	UnsupportedOutputFormat(String),
	/// Building the quadtree failed.
	#[error(transparent)]
	Analyze(#[from] AnalyzeError),
}
