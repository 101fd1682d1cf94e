/*!
# `Ripo` - GIF Images.

Only the first frame is decoded, composited onto the logical screen.
*/

use crate::{
	ColorSpace,
	ImageKind,
	PixelBuffer,
	RefillBuffer,
	RipoError,
	traits::Decoder,
};
use gif::{
	ColorOutput,
	DecodeOptions,
};
use rgb::{
	FromSlice,
	RGB8,
};



/// # Interlace Passes.
///
/// The starting row and row step of each of the four passes.
const PASSES: [(usize, usize); 4] = [(0, 8), (4, 8), (2, 4), (1, 2)];



/// # GIF Image.
pub(crate) struct ImageGif;

impl Decoder for ImageGif {
	const KIND: ImageKind = ImageKind::Gif;

	/// # Trailer Block.
	const TRAILER: &'static [u8] = &[0x3B];

	/// # Decode.
	fn decode(src: &mut RefillBuffer<'_>) -> Result<PixelBuffer, RipoError> {
		let mut opts = DecodeOptions::new();
		opts.set_color_output(ColorOutput::Indexed);
		let mut decoder = opts.read_info(&mut *src)
			.map_err(|e| RipoError::decode(Self::KIND, e))?;

		let screen = (usize::from(decoder.width()), usize::from(decoder.height()));
		let global = decoder.global_palette().map(<[u8]>::to_vec);
		let bg = decoder.bg_color();

		let frame = decoder.next_frame_info()
			.map_err(|e| RipoError::decode(Self::KIND, e))?
			.ok_or_else(|| RipoError::decode(Self::KIND, "no image frames"))?;
		let rect = FrameRect {
			left: usize::from(frame.left),
			top: usize::from(frame.top),
			width: usize::from(frame.width),
			height: usize::from(frame.height),
		};
		let interlaced = frame.interlaced;
		let transparent = frame.transparent.map(usize::from);
		let palette = frame.palette.clone()
			.or(global)
			.ok_or_else(|| RipoError::decode(Self::KIND, "missing color table"))?;
		let palette = palette.as_rgb();

		// Some encoders leave the logical screen empty.
		let (width, height) =
			if screen.0 == 0 || screen.1 == 0 {
				(rect.left + rect.width, rect.top + rect.height)
			}
			else { screen };

		let layout = Self::layout(width, height, ColorSpace::Rgb, transparent.is_some())?;
		let channels = usize::from(layout.pixel_channels());
		let mut out = PixelBuffer::allocate(layout)?;

		// Everything the frame doesn't cover is either transparent (and
		// already zeroed) or the background color.
		if transparent.is_none() {
			if let Some(px) = bg.and_then(|i| palette.get(i)) {
				for y in 0..height {
					fill_row(out.row_mut(y), channels, *px);
				}
			}
		}

		// Indexed rows in storage order.
		let mut line = vec![0_u8; rect.width];
		let order: Vec<usize> =
			if interlaced {
				PASSES.iter()
					.flat_map(|&(start, step)| (start..rect.height).step_by(step))
					.collect()
			}
			else { (0..rect.height).collect() };

		for y in order {
			if rect.width != 0 {
				let filled = decoder.fill_buffer(&mut line)
					.map_err(|e| RipoError::decode(Self::KIND, e))?;
				if ! filled {
					return Err(RipoError::decode(Self::KIND, "missing image rows"));
				}
			}

			// Clip to the screen.
			let y = rect.top + y;
			if y >= height || rect.left >= width { continue; }
			let visible = rect.width.min(width - rect.left);

			let dst = &mut out.row_mut(y)[rect.left * channels..(rect.left + visible) * channels];
			for (&idx, px) in line.iter().zip(dst.chunks_exact_mut(channels)) {
				let idx = usize::from(idx);
				if Some(idx) == transparent {
					px.fill(0);
					continue;
				}

				let rgb = palette.get(idx).copied().unwrap_or_default();
				px[..3].copy_from_slice(&[rgb.r, rgb.g, rgb.b]);
				if channels == 4 { px[3] = 255; }
			}
		}

		Ok(out)
	}
}



#[derive(Debug, Clone, Copy)]
/// # Frame Position.
struct FrameRect {
	left: usize,
	top: usize,
	width: usize,
	height: usize,
}

/// # Fill Row.
///
/// Paint every pixel in the row the same opaque color.
fn fill_row(row: &mut [u8], channels: usize, color: RGB8) {
	for px in row.chunks_exact_mut(channels) {
		px[..3].copy_from_slice(&[color.r, color.g, color.b]);
		if channels == 4 { px[3] = 255; }
	}
}
