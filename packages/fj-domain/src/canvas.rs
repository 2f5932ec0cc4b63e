//! Drawn canvas content and its rasterization for handwriting recognition.
//!
//! Canvases are rendered on an opaque white background. Transparent pixels produce spurious
//! recognizer output, so the raster never carries an alpha channel.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

const MAX_RASTER_SIDE: u32 = 4_096;
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	#[error("Canvas raster size {width}x{height} is out of bounds.")]
	InvalidSize { width: u32, height: u32 },
	#[error(transparent)]
	Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f32,
	pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
	pub points: Vec<Point>,
	/// Width in canvas points. Falls back to the render default when absent.
	#[serde(default)]
	pub width: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
	pub width: f32,
	pub height: f32,
	#[serde(default)]
	pub strokes: Vec<Stroke>,
}
impl Canvas {
	/// A canvas is blank when no stroke carries a point.
	pub fn is_blank(&self) -> bool {
		self.strokes.iter().all(|stroke| stroke.points.is_empty())
	}

	pub fn stroke_count(&self) -> usize {
		self.strokes.iter().filter(|stroke| !stroke.points.is_empty()).count()
	}

	pub fn render_png(&self, opts: &RenderOptions) -> Result<Vec<u8>, RenderError> {
		let image = self.rasterize(opts)?;
		let mut bytes = Vec::new();

		DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

		Ok(bytes)
	}

	pub fn rasterize(&self, opts: &RenderOptions) -> Result<RgbImage, RenderError> {
		let width = raster_side(self.width, opts.scale);
		let height = raster_side(self.height, opts.scale);

		if width == 0 || height == 0 || width > MAX_RASTER_SIDE || height > MAX_RASTER_SIDE {
			return Err(RenderError::InvalidSize { width, height });
		}

		let mut image = RgbImage::from_pixel(width, height, PAPER);

		for stroke in &self.strokes {
			let radius = (stroke.width.unwrap_or(opts.stroke_width) * opts.scale / 2.0).max(0.5);
			let mut points = stroke.points.iter().map(|p| (p.x * opts.scale, p.y * opts.scale));
			let Some(mut prev) = points.next() else {
				continue;
			};

			stamp(&mut image, prev, radius);

			for next in points {
				draw_segment(&mut image, prev, next, radius);

				prev = next;
			}
		}

		Ok(image)
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
	pub scale: f32,
	pub stroke_width: f32,
}
impl Default for RenderOptions {
	fn default() -> Self {
		Self { scale: 2.0, stroke_width: 3.0 }
	}
}

fn raster_side(points: f32, scale: f32) -> u32 {
	let pixels = (points * scale).ceil();

	if !pixels.is_finite() || pixels <= 0.0 {
		return 0;
	}
	if pixels >= u32::MAX as f32 {
		return u32::MAX;
	}

	pixels as u32
}

fn draw_segment(image: &mut RgbImage, from: (f32, f32), to: (f32, f32), radius: f32) {
	let min = (-radius, -radius);
	let max = (image.width() as f32 + radius, image.height() as f32 + radius);
	// Only the part that can touch the raster is stepped, so the stamp count is bounded by the
	// raster size whatever the input coordinates are.
	let Some((start, end)) = clip_segment(from, to, min, max) else {
		return;
	};
	let (dx, dy) = (end.0 - start.0, end.1 - start.1);
	let length = (dx * dx + dy * dy).sqrt();
	let step = (radius / 2.0).max(0.5);
	let steps = (length / step).ceil().max(1.0) as u32;

	stamp(image, start, radius);

	for i in 1..=steps {
		let t = i as f32 / steps as f32;

		stamp(image, (start.0 + dx * t, start.1 + dy * t), radius);
	}
}

// Liang-Barsky clipping against an axis-aligned rectangle. Computed in f64 so that far-off
// endpoints keep enough precision near the raster.
fn clip_segment(
	from: (f32, f32),
	to: (f32, f32),
	min: (f32, f32),
	max: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
	if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
		return None;
	}

	let (x0, y0) = (f64::from(from.0), f64::from(from.1));
	let (dx, dy) = (f64::from(to.0) - x0, f64::from(to.1) - y0);
	let (mut enter, mut exit) = (0.0_f64, 1.0_f64);

	for (p, q) in [
		(-dx, x0 - f64::from(min.0)),
		(dx, f64::from(max.0) - x0),
		(-dy, y0 - f64::from(min.1)),
		(dy, f64::from(max.1) - y0),
	] {
		if p == 0.0 {
			if q < 0.0 {
				return None;
			}

			continue;
		}

		let t = q / p;

		if p < 0.0 {
			enter = enter.max(t);
		} else {
			exit = exit.min(t);
		}
		if enter > exit {
			return None;
		}
	}

	let at = |t: f64| ((x0 + dx * t) as f32, (y0 + dy * t) as f32);

	Some((at(enter), at(exit)))
}

// Round pen tip; successive stamps give round caps and joins.
fn stamp(image: &mut RgbImage, center: (f32, f32), radius: f32) {
	if !center.0.is_finite() || !center.1.is_finite() {
		return;
	}

	let (w, h) = (image.width() as f32, image.height() as f32);
	let x0 = (center.0 - radius).floor().max(0.0);
	let x1 = (center.0 + radius).ceil().min(w - 1.0);
	let y0 = (center.1 - radius).floor().max(0.0);
	let y1 = (center.1 + radius).ceil().min(h - 1.0);

	if x0 > x1 || y0 > y1 {
		return;
	}

	let r2 = radius * radius;

	for y in y0 as u32..=y1 as u32 {
		for x in x0 as u32..=x1 as u32 {
			let px = x as f32 + 0.5 - center.0;
			let py = y as f32 + 0.5 - center.1;

			if px * px + py * py <= r2 {
				image.put_pixel(x, y, INK);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::{Duration, Instant};

	use super::*;

	fn line_canvas() -> Canvas {
		Canvas {
			width: 40.0,
			height: 20.0,
			strokes: vec![Stroke {
				points: vec![Point { x: 5.0, y: 10.0 }, Point { x: 35.0, y: 10.0 }],
				width: None,
			}],
		}
	}

	#[test]
	fn empty_strokes_are_blank() {
		let canvas = Canvas {
			width: 10.0,
			height: 10.0,
			strokes: vec![Stroke::default(), Stroke::default()],
		};

		assert!(canvas.is_blank());
		assert_eq!(canvas.stroke_count(), 0);
		assert!(!line_canvas().is_blank());
	}

	#[test]
	fn raster_is_opaque_white_with_ink() {
		let image = line_canvas().rasterize(&RenderOptions::default()).expect("render failed");

		assert_eq!(image.dimensions(), (80, 40));
		assert_eq!(*image.get_pixel(0, 0), PAPER);
		assert_eq!(*image.get_pixel(40, 20), INK);
		assert_eq!(*image.get_pixel(40, 2), PAPER);
	}

	#[test]
	fn out_of_canvas_points_are_clipped() {
		let canvas = Canvas {
			width: 10.0,
			height: 10.0,
			strokes: vec![Stroke {
				points: vec![Point { x: -50.0, y: -50.0 }, Point { x: 500.0, y: 500.0 }],
				width: Some(1.0),
			}],
		};

		assert!(canvas.rasterize(&RenderOptions::default()).is_ok());
	}

	#[test]
	fn far_off_points_render_only_the_visible_part() {
		let canvas = Canvas {
			width: 100.0,
			height: 100.0,
			strokes: vec![
				Stroke {
					points: vec![Point { x: 1.0, y: 1.0 }, Point { x: 1.0e9, y: 1.0 }],
					width: None,
				},
				Stroke {
					points: vec![Point { x: -1.0e9, y: -1.0e9 }, Point { x: -1.0e9, y: 1.0e9 }],
					width: None,
				},
				Stroke {
					points: vec![Point { x: 50.0, y: 1.0e9 }, Point { x: 50.0, y: -1.0e9 }],
					width: Some(1.0),
				},
			],
		};
		let started = Instant::now();
		let image = canvas.rasterize(&RenderOptions::default()).expect("render failed");

		assert!(started.elapsed() < Duration::from_secs(1), "took {:?}", started.elapsed());
		assert_eq!(*image.get_pixel(10, 2), INK);
		assert_eq!(*image.get_pixel(199, 2), INK);
		assert_eq!(*image.get_pixel(100, 0), INK);
		assert_eq!(*image.get_pixel(100, 199), INK);
		assert_eq!(*image.get_pixel(10, 100), PAPER);
	}

	#[test]
	fn segments_outside_the_raster_are_skipped() {
		assert_eq!(clip_segment((-5.0, -5.0), (-1.0, -9.0), (0.0, 0.0), (10.0, 10.0)), None);
		assert_eq!(
			clip_segment((-10.0, 5.0), (30.0, 5.0), (0.0, 0.0), (10.0, 10.0)),
			Some(((0.0, 5.0), (10.0, 5.0)))
		);
		assert_eq!(clip_segment((f32::NAN, 1.0), (2.0, 2.0), (0.0, 0.0), (10.0, 10.0)), None);
	}

	#[test]
	fn zero_sized_canvas_is_rejected() {
		let canvas = Canvas { width: 0.0, height: 10.0, strokes: Vec::new() };
		let err = canvas.rasterize(&RenderOptions::default()).expect_err("Expected size error.");

		assert!(matches!(err, RenderError::InvalidSize { width: 0, .. }));
	}

	#[test]
	fn encodes_png() {
		let bytes = line_canvas().render_png(&RenderOptions::default()).expect("encode failed");

		assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
	}
}
