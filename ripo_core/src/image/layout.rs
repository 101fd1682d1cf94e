/*!
# `Ripo` - Pixel Layout
*/

use crate::{
	ColorSpace,
	RipoError,
	ROW_ALIGNMENT,
};
use std::num::NonZeroU32;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Pixel Layout.
///
/// Everything needed to size a [`PixelBuffer`](crate::PixelBuffer): the
/// dimensions, which channels each pixel carries, and how wide each channel
/// sample is.
///
/// Codecs build one of these from the image header, after resolving
/// anything that changes the channel count (palette expansion, alpha), and
/// only then allocate.
pub struct PixelLayout {
	/// # Width.
	width: NonZeroU32,

	/// # Height.
	height: NonZeroU32,

	/// # Color Space.
	color_space: ColorSpace,

	/// # Alpha Channel?
	has_alpha: bool,

	/// # Bytes Per Channel Sample.
	component_size: u8,
}

impl PixelLayout {
	/// # New (8-bit).
	///
	/// ## Errors
	///
	/// This will return an error if either dimension is zero or too big for
	/// a `u32`.
	pub fn new<W, H>(width: W, height: H, color_space: ColorSpace, has_alpha: bool)
	-> Result<Self, RipoError>
	where W: TryInto<u32>, H: TryInto<u32> {
		let width = width.try_into().ok()
			.and_then(NonZeroU32::new)
			.ok_or(RipoError::Overflow)?;
		let height = height.try_into().ok()
			.and_then(NonZeroU32::new)
			.ok_or(RipoError::Overflow)?;

		Ok(Self {
			width,
			height,
			color_space,
			has_alpha,
			component_size: 1,
		})
	}

	/// # With Component Size.
	///
	/// Only 8-bit samples are implemented at the moment.
	///
	/// ## Errors
	///
	/// This will return an error for any size other than `1`.
	pub const fn with_component_size(self, component_size: u8) -> Result<Self, RipoError> {
		match component_size {
			1 => Ok(self),
			2 => Err(RipoError::Unsupported("16-bit samples")),
			_ => Err(RipoError::Overflow),
		}
	}
}

/// ## Getters.
impl PixelLayout {
	#[inline]
	#[must_use]
	/// # Width.
	pub const fn width(&self) -> u32 { self.width.get() }

	#[inline]
	#[must_use]
	/// # Height.
	pub const fn height(&self) -> u32 { self.height.get() }

	#[inline]
	#[must_use]
	/// # Color Space.
	pub const fn color_space(&self) -> ColorSpace { self.color_space }

	#[inline]
	#[must_use]
	/// # Has Alpha?
	pub const fn has_alpha(&self) -> bool { self.has_alpha }

	#[inline]
	#[must_use]
	/// # Component Size.
	///
	/// The number of bytes used by each channel sample.
	pub const fn component_size(&self) -> u8 { self.component_size }

	#[inline]
	#[must_use]
	/// # Pixel Channels.
	///
	/// The number of samples per pixel, including alpha.
	pub const fn pixel_channels(&self) -> u8 {
		self.color_space.color_channels() + self.has_alpha as u8
	}

	#[inline]
	#[must_use]
	/// # Pixel Size.
	///
	/// The number of bytes per pixel.
	pub const fn pixel_size(&self) -> usize {
		self.pixel_channels() as usize * self.component_size as usize
	}

	#[inline]
	#[must_use]
	/// # Row Size.
	///
	/// The number of meaningful bytes in each row, i.e. excluding padding.
	pub const fn row_size(&self) -> usize {
		self.width.get() as usize * self.pixel_size()
	}

	#[inline]
	#[must_use]
	/// # Row Stride.
	///
	/// See [`row_stride`].
	pub const fn row_stride(&self) -> usize {
		row_stride(self.width.get() as usize, self.pixel_channels(), self.component_size)
	}

	#[inline]
	/// # Buffer Size.
	///
	/// The total number of bytes needed for storage.
	///
	/// ## Errors
	///
	/// This will return an error if the size overflows `usize`.
	pub fn buffer_size(&self) -> Result<usize, RipoError> {
		self.row_stride()
			.checked_mul(self.height.get() as usize)
			.ok_or(RipoError::Overflow)
	}
}



#[must_use]
/// # Row Stride.
///
/// Return the distance in bytes between the start of one row and the next:
/// the smallest multiple of [`ROW_ALIGNMENT`] that can hold
/// `width * pixel_channels * component_size` bytes.
///
/// The result saturates rather than overflowing.
pub const fn row_stride(width: usize, pixel_channels: u8, component_size: u8) -> usize {
	let size = width.saturating_mul(pixel_channels as usize * component_size as usize);
	match size % ROW_ALIGNMENT {
		0 => size,
		rem => size.saturating_add(ROW_ALIGNMENT - rem),
	}
}
