pub mod average;

use std::fmt;
use std::str::FromStr;

use image::RgbImage;

use super::error::ConfigError;
use super::Block;

use average::{block_pixels, channel_means};

/// Trait for types that score how far a block of pixels is from being a
/// single flat color.
///
/// Results must be non-negative, with higher meaning less uniform, and a
/// block with no pixels inside the image must score 0.
pub trait ErrorMetric {
	fn calculate_error(&self, img: &RgbImage, block: &Block) -> f64;
}

/// The built-in error metrics. Each one works per RGB channel and averages
/// the three channel results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorMethod {
	/// Population variance around the channel mean.
	Variance,
	/// Mean absolute deviation from the channel mean.
	MeanAbsoluteDeviation,
	/// Difference between the largest and smallest channel value.
	MaxPixelDifference,
	/// Shannon entropy (bits) of the 256-bin channel histogram.
	Entropy,
}

impl ErrorMethod {
	pub const ALL: [ErrorMethod; 4] = [
		ErrorMethod::Variance,
		ErrorMethod::MeanAbsoluteDeviation,
		ErrorMethod::MaxPixelDifference,
		ErrorMethod::Entropy,
	];

	/// Looks up a method by its menu number, 1 through 4.
	pub fn from_selector(selector: u32) -> Result<Self, ConfigError> {
		match selector {
			1..=4 => Ok(ErrorMethod::ALL[selector as usize - 1]),
			_ => Err(ConfigError::UnknownMethod(selector.to_string())),
		}
	}

	pub fn selector(self) -> u32 {
		match self {
			ErrorMethod::Variance => 1,
			ErrorMethod::MeanAbsoluteDeviation => 2,
			ErrorMethod::MaxPixelDifference => 3,
			ErrorMethod::Entropy => 4,
		}
	}

	/// Human-readable name, as shown in reports.
	pub fn name(self) -> &'static str {
		match self {
			ErrorMethod::Variance => "Variance",
			ErrorMethod::MeanAbsoluteDeviation => "Mean Absolute Deviation (MAD)",
			ErrorMethod::MaxPixelDifference => "Max Pixel Difference",
			ErrorMethod::Entropy => "Entropy",
		}
	}
}

impl ErrorMetric for ErrorMethod {
	fn calculate_error(&self, img: &RgbImage, block: &Block) -> f64 {
		match self {
			ErrorMethod::Variance => variance(img, block),
			ErrorMethod::MeanAbsoluteDeviation => mean_absolute_deviation(img, block),
			ErrorMethod::MaxPixelDifference => max_pixel_difference(img, block),
			ErrorMethod::Entropy => entropy(img, block),
		}
	}
}

impl fmt::Display for ErrorMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Accepts the menu numbers `1`-`4` as well as method names.
impl FromStr for ErrorMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if let Ok(n) = s.parse::<u32>() {
			return ErrorMethod::from_selector(n);
		}
		match s.to_ascii_lowercase().replace('_', "-").as_str() {
			"variance" | "var" => Ok(ErrorMethod::Variance),
			"mad" | "mean-absolute-deviation" => Ok(ErrorMethod::MeanAbsoluteDeviation),
			"max-diff" | "max-pixel-difference" | "mpd" => Ok(ErrorMethod::MaxPixelDifference),
			"entropy" => Ok(ErrorMethod::Entropy),
			_ => Err(ConfigError::UnknownMethod(s.to_string())),
		}
	}
}

/// Averages a per-channel statistic, `f(value, channel mean)`, over the
/// block and then over the three channels.
fn mean_deviation(img: &RgbImage, block: &Block, f: impl Fn(f64, f64) -> f64) -> f64 {
	let means = match channel_means(img, block) {
		Some(m) => m,
		None => return 0.,
	};
	let (sums, count) = block_pixels(img, block).fold(([0f64; 3], 0u64), |(mut sums, count), px| {
		for ch in 0..3 {
			sums[ch] += f(px[ch] as f64, means[ch]);
		}
		(sums, count + 1)
	});
	sums.iter().map(|s| s / count as f64).sum::<f64>() / 3.
}

fn variance(img: &RgbImage, block: &Block) -> f64 {
	mean_deviation(img, block, |v, avg| (v - avg) * (v - avg))
}

fn mean_absolute_deviation(img: &RgbImage, block: &Block) -> f64 {
	mean_deviation(img, block, |v, avg| (v - avg).abs())
}

fn max_pixel_difference(img: &RgbImage, block: &Block) -> f64 {
	let extremes = block_pixels(img, block).fold(None, |acc: Option<([u8; 3], [u8; 3])>, px| {
		let (mut lo, mut hi) = acc.unwrap_or(([255; 3], [0; 3]));
		for ch in 0..3 {
			lo[ch] = lo[ch].min(px[ch]);
			hi[ch] = hi[ch].max(px[ch]);
		}
		Some((lo, hi))
	});
	match extremes {
		Some((lo, hi)) => (0..3).map(|ch| (hi[ch] - lo[ch]) as f64).sum::<f64>() / 3.,
		None => 0.,
	}
}

fn entropy(img: &RgbImage, block: &Block) -> f64 {
	let mut histograms = [[0u64; 256]; 3];
	let mut count = 0u64;
	for px in block_pixels(img, block) {
		for ch in 0..3 {
			histograms[ch][px[ch] as usize] += 1;
		}
		count += 1;
	}
	if count == 0 {
		return 0.;
	}
	histograms.iter()
		.map(|hist| hist.iter()
			.filter(|&&n| n > 0)
			.map(|&n| {
				let p = n as f64 / count as f64;
				-p * p.log2()
			})
			.sum::<f64>())
		.sum::<f64>() / 3.
}
