//! File-level compression pipeline: load an image, build its quadtree,
//! render the flattened copy, save it and report statistics.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::{ImageFormat, RgbImage};

use crate::node::config::Config;
use crate::node::error::CompressError;
use crate::node::QuadtreeNode;
use crate::TreeStats;

/// Output extensions accepted by `Compression::save`.
pub const OUTPUT_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

/// Picks the output format from a path's extension.
pub fn output_format(path: &Path) -> Result<ImageFormat, CompressError> {
	let ext = path.extension()
		.and_then(|e| e.to_str())
		.map(str::to_ascii_lowercase)
		.unwrap_or_default();
	if !OUTPUT_EXTENSIONS.contains(&ext.as_str()) {
		return Err(CompressError::UnsupportedOutputFormat(path.display().to_string()));
	}
	ImageFormat::from_extension(&ext)
		.ok_or_else(|| CompressError::UnsupportedOutputFormat(path.display().to_string()))
}

/// A source image ready to be compressed.
pub struct Compressor {
	source: RgbImage,
	config: Config,
	/// Size of the file the source was read from, if any.
	file_size: Option<u64>,
}

impl Compressor {
	/// Wraps an already decoded image.
	pub fn new(source: RgbImage, config: Config) -> Self {
		Compressor { source, config, file_size: None }
	}

	/// Loads and decodes an image file; any color type is converted to
	/// 8-bit RGB.
	pub fn open<P: AsRef<Path>>(path: P, config: Config) -> Result<Self, CompressError> {
		let path = path.as_ref();
		let file_size = std::fs::metadata(path)
			.map_err(|source| CompressError::Io { path: path.to_owned(), source })?
			.len();
		let source = image::open(path)
			.map_err(|source| CompressError::Load { path: path.to_owned(), source })?
			.into_rgb8();
		log::info!(
			"loaded {} ({}x{}, {} bytes)",
			path.display(),
			source.width(),
			source.height(),
			file_size
		);
		Ok(Compressor { source, config, file_size: Some(file_size) })
	}

	pub fn source(&self) -> &RgbImage {
		&self.source
	}

	pub fn file_size(&self) -> Option<u64> {
		self.file_size
	}

	/// Builds the quadtree and renders it over a copy of the source.
	///
	/// The elapsed time covers tree construction and rendering only.
	pub fn compress(&self) -> Result<Compression, CompressError> {
		let start = Instant::now();
		let tree = QuadtreeNode::from_image(&self.source, &self.config)?;
		let output = tree.to_image(&self.source);
		let elapsed = start.elapsed();
		let stats = tree.stats();
		log::info!("compressed in {} ms: {}", elapsed.as_millis(), stats);
		Ok(Compression { tree, output, stats, elapsed })
	}
}

/// Result of one compression run.
pub struct Compression {
	pub tree: QuadtreeNode,
	pub output: RgbImage,
	pub stats: TreeStats,
	pub elapsed: Duration,
}

impl Compression {
	/// Writes the output image; the format follows the extension of `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CompressError> {
		let path = path.as_ref();
		let format = output_format(path)?;
		self.output.save_with_format(path, format)
			.map_err(|source| CompressError::Save { path: path.to_owned(), source })?;
		log::info!("saved {}", path.display());
		Ok(())
	}

	/// Size of the output when encoded as PNG.
	pub fn encoded_size(&self) -> Result<u64, CompressError> {
		let mut buf = Cursor::new(Vec::new());
		self.output.write_to(&mut buf, ImageFormat::Png).map_err(CompressError::Encode)?;
		Ok(buf.into_inner().len() as u64)
	}

	/// Gathers the statistics shown after a run.
	pub fn report(&self, original_size: Option<u64>) -> Result<Report, CompressError> {
		Ok(Report {
			elapsed: self.elapsed,
			stats: self.stats,
			original_size,
			compressed_size: self.encoded_size()?,
		})
	}
}

/// Statistics of a compression run.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
	pub elapsed: Duration,
	pub stats: TreeStats,
	pub original_size: Option<u64>,
	pub compressed_size: u64,
}

impl Report {
	/// How much smaller the output is than the original file, in percent.
	///
	/// Negative if the output is larger; `None` without a (non-empty)
	/// original file.
	pub fn compression_percentage(&self) -> Option<f64> {
		match self.original_size {
			Some(orig) if orig > 0 => Some((1. - self.compressed_size as f64 / orig as f64) * 100.),
			_ => None,
		}
	}
}

impl fmt::Display for Report {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Execution time: {} ms", self.elapsed.as_millis())?;
		writeln!(f, "Tree depth: {}", self.stats.depth)?;
		writeln!(f, "Node count: {}", self.stats.nodes)?;
		writeln!(f, "Leaf count: {}", self.stats.leaves)?;
		if let Some(orig) = self.original_size {
			writeln!(f, "Original size: {} bytes", orig)?;
		}
		write!(f, "Compressed size: {} bytes", self.compressed_size)?;
		if let Some(pct) = self.compression_percentage() {
			write!(f, "\nCompression: {:.2}%", pct)?;
		}
		Ok(())
	}
}

/// Whether the directory an output file would be written into exists.
///
/// A bare file name refers to the working directory, which always counts
/// as existing.
pub fn output_dir_exists(path: &Path) -> bool {
	match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
		_ => true,
	}
}

/// Default output path: `<stem>_compressed.png` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
	let stem = input.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_else(|| "output".to_string());
	input.with_file_name(format!("{}_compressed.png", stem))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::metric::ErrorMethod;

	#[test]
	fn output_format_from_extension() {
		assert_eq!(output_format(Path::new("a/b.PNG")).unwrap(), ImageFormat::Png);
		assert_eq!(output_format(Path::new("x.jpeg")).unwrap(), ImageFormat::Jpeg);
		assert_eq!(output_format(Path::new("x.bmp")).unwrap(), ImageFormat::Bmp);
		assert!(output_format(Path::new("x.tiff")).is_err());
		assert!(output_format(Path::new("noext")).is_err());
	}

	#[test]
	fn default_output_next_to_input() {
		assert_eq!(
			default_output_path(Path::new("pics/cat.jpg")),
			PathBuf::from("pics/cat_compressed.png")
		);
	}

	#[test]
	fn output_dir_check() {
		let dir = tempfile::tempdir().unwrap();
		assert!(output_dir_exists(Path::new("out.png")));
		assert!(output_dir_exists(&dir.path().join("out.png")));
		assert!(!output_dir_exists(&dir.path().join("missing").join("out.png")));
	}

	#[test]
	fn report_percentage() {
		let report = Report {
			elapsed: Duration::from_millis(3),
			stats: TreeStats { depth: 1, nodes: 1, leaves: 1 },
			original_size: Some(200),
			compressed_size: 50,
		};
		assert_eq!(report.compression_percentage(), Some(75.));
		assert!(report.to_string().ends_with("Compression: 75.00%"));
		let no_orig = Report { original_size: None, ..report };
		assert_eq!(no_orig.compression_percentage(), None);
	}

	#[test]
	fn compress_in_memory() {
		let img = RgbImage::from_pixel(8, 8, image::Rgb([40, 50, 60]));
		let config = Config::new(ErrorMethod::Entropy, 0.0001, 1).unwrap();
		let result = Compressor::new(img.clone(), config).compress().unwrap();
		assert_eq!(result.stats, TreeStats { depth: 1, nodes: 1, leaves: 1 });
		assert_eq!(result.output, img);
		assert!(result.report(None).unwrap().compressed_size > 0);
	}
}
