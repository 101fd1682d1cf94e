/*!
# `Ripo` - Pixel Buffer
*/

pub(super) mod color;
pub(super) mod layout;

use crate::{
	ColorSpace,
	PixelLayout,
	RipoError,
};
use std::fmt;



#[derive(Clone, Eq, PartialEq)]
/// # Pixel Buffer.
///
/// This is the canonical decoded image, whatever format it came from.
///
/// Pixels are stored packed (interleaved), row-major, top-to-bottom, in a
/// single buffer. Each row begins [`PixelBuffer::row_stride`] bytes after the
/// previous one; the stride is padded to a 16-byte boundary, and the padding
/// is always zeroed.
///
/// Sample `ch` of the pixel at `(row, col)` lives at:
///
/// ```text
/// row * row_stride + col * pixel_channels * component_size + ch * component_size
/// ```
pub struct PixelBuffer {
	/// # Storage.
	data: Vec<u8>,

	/// # Layout.
	layout: PixelLayout,

	/// # Row Stride.
	row_stride: usize,
}

impl fmt::Debug for PixelBuffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PixelBuffer")
			.field("width", &self.width())
			.field("height", &self.height())
			.field("color_space", &self.color_space())
			.field("has_alpha", &self.has_alpha())
			.field("component_size", &self.component_size())
			.field("row_stride", &self.row_stride)
			.finish_non_exhaustive()
	}
}

impl AsRef<[u8]> for PixelBuffer {
	#[inline]
	fn as_ref(&self) -> &[u8] { self.as_bytes() }
}

/// ## Instantiation.
impl PixelBuffer {
	/// # Allocate.
	///
	/// Allocate zeroed storage for the finished layout.
	///
	/// ## Errors
	///
	/// This will return an error if the buffer size overflows or cannot be
	/// reserved.
	pub fn allocate(layout: PixelLayout) -> Result<Self, RipoError> {
		let size = layout.buffer_size()?;

		let mut data = Vec::new();
		data.try_reserve_exact(size).map_err(|_| RipoError::Overflow)?;
		data.resize(size, 0);

		Ok(Self {
			data,
			row_stride: layout.row_stride(),
			layout,
		})
	}

	/// # From Packed Rows.
	///
	/// Adopt an unpadded, row-major buffer (as returned by decoders that
	/// produce whole frames), spreading the rows out to the aligned stride in
	/// place.
	///
	/// ## Errors
	///
	/// This will return an error if the buffer length doesn't match the
	/// layout, or if the padded size cannot be reserved.
	pub fn from_packed(layout: PixelLayout, mut data: Vec<u8>) -> Result<Self, RipoError> {
		let row_size = layout.row_size();
		let height = layout.height() as usize;
		if Some(data.len()) != row_size.checked_mul(height) {
			return Err(RipoError::Overflow);
		}

		let size = layout.buffer_size()?;
		let row_stride = layout.row_stride();
		if size != data.len() {
			data.try_reserve_exact(size - data.len()).map_err(|_| RipoError::Overflow)?;
			data.resize(size, 0);

			// Work backwards so rows never overwrite ones not yet moved.
			for y in (0..height).rev() {
				let start = y * row_stride;
				data.copy_within(y * row_size..(y + 1) * row_size, start);
				data[start + row_size..start + row_stride].fill(0);
			}
		}

		Ok(Self { data, layout, row_stride })
	}
}

/// ## Getters.
impl PixelBuffer {
	#[inline]
	#[must_use]
	/// # Width.
	pub const fn width(&self) -> u32 { self.layout.width() }

	#[inline]
	#[must_use]
	/// # Height.
	pub const fn height(&self) -> u32 { self.layout.height() }

	#[inline]
	#[must_use]
	/// # Color Space.
	pub const fn color_space(&self) -> ColorSpace { self.layout.color_space() }

	#[inline]
	#[must_use]
	/// # Has Alpha?
	pub const fn has_alpha(&self) -> bool { self.layout.has_alpha() }

	#[inline]
	#[must_use]
	/// # Component Size.
	pub const fn component_size(&self) -> u8 { self.layout.component_size() }

	#[inline]
	#[must_use]
	/// # Pixel Channels.
	pub const fn pixel_channels(&self) -> u8 { self.layout.pixel_channels() }

	#[inline]
	#[must_use]
	/// # Row Stride.
	pub const fn row_stride(&self) -> usize { self.row_stride }

	#[inline]
	#[must_use]
	/// # Layout.
	pub const fn layout(&self) -> PixelLayout { self.layout }

	#[inline]
	#[must_use]
	/// # Raw Storage.
	///
	/// This includes the row padding.
	pub fn as_bytes(&self) -> &[u8] { &self.data }

	#[inline]
	#[must_use]
	/// # Take Storage.
	pub fn into_vec(self) -> Vec<u8> { self.data }
}

/// ## Pixel Access.
impl PixelBuffer {
	#[must_use]
	/// # Row.
	///
	/// Return the samples of row `y`, excluding padding.
	pub fn row(&self, y: u32) -> Option<&[u8]> {
		if y < self.height() {
			let start = y as usize * self.row_stride;
			Some(&self.data[start..start + self.layout.row_size()])
		}
		else { None }
	}

	/// # Rows.
	///
	/// Iterate over each row, top to bottom, excluding padding.
	pub fn rows(&self) -> impl ExactSizeIterator<Item=&[u8]> {
		let row_size = self.layout.row_size();
		self.data.chunks_exact(self.row_stride).map(move |r| &r[..row_size])
	}

	#[must_use]
	/// # Pixel.
	///
	/// Return the samples of the pixel at `(row, col)`, one per channel (or
	/// `component_size` bytes per channel).
	///
	/// Negative indices count back from the end, so `(-1, -1)` is the
	/// bottom-right corner. Anything out of range returns `None`.
	pub fn pixel(&self, row: isize, col: isize) -> Option<&[u8]> {
		let row = wrap_index(row, self.height())?;
		let col = wrap_index(col, self.width())?;

		let size = self.layout.pixel_size();
		let start = row * self.row_stride + col * size;
		self.data.get(start..start + size)
	}

	/// # Row (Mutable).
	///
	/// Codecs write decoded scanlines through this.
	pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
		let start = y * self.row_stride;
		let end = start + self.layout.row_size();
		&mut self.data[start..end]
	}
}



/// # Wrap Index.
///
/// Resolve a possibly-negative index against a length.
fn wrap_index(idx: isize, len: u32) -> Option<usize> {
	let len = isize::try_from(len).ok()?;
	let idx = if idx < 0 { idx + len } else { idx };
	if (0..len).contains(&idx) { usize::try_from(idx).ok() }
	else { None }
}
