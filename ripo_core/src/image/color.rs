/*!
# `Ripo` - Color Space
*/

use std::fmt;



#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
/// # Color Space.
///
/// The color channels stored for each pixel. Alpha is tracked separately;
/// see [`PixelLayout::has_alpha`](crate::PixelLayout::has_alpha).
pub enum ColorSpace {
	/// # Greyscale.
	Gray,

	/// # RGB.
	Rgb,
}

impl fmt::Display for ColorSpace {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl ColorSpace {
	#[must_use]
	/// # As String Slice.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Gray => "GRAY",
			Self::Rgb => "RGB",
		}
	}

	#[inline]
	#[must_use]
	/// # Color Channels.
	///
	/// Return the number of channels used by color, e.g. 3 for RGB.
	pub const fn color_channels(self) -> u8 {
		match self {
			Self::Gray => 1,
			Self::Rgb => 3,
		}
	}
}
