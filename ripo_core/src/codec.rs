/*!
# `Ripo` - Codec
*/

use crate::{
	ByteSource,
	ImageKind,
	kind::image::read_prefix,
	PixelBuffer,
	RefillBuffer,
	RipoError,
};
use std::{
	fmt,
	num::NonZeroUsize,
};

#[cfg(feature = "gif")]  use crate::ImageGif;
#[cfg(feature = "jpeg")] use crate::ImageJpeg;
#[cfg(feature = "png")]  use crate::ImagePng;
#[cfg(feature = "webp")] use crate::ImageWebp;
#[cfg(any(feature = "gif", feature = "jpeg", feature = "png", feature = "webp"))]
use crate::traits::Decoder;



/// # Decode Callback.
pub type DecodeFn = fn(&mut RefillBuffer<'_>) -> Result<PixelBuffer, RipoError>;



#[derive(Clone, Copy)]
/// # Codec.
///
/// A format's detection and decoding entry points, along with the refill
/// settings its decoder should be fed with.
///
/// The built-in codecs are returned by [`ImageKind::codec`]; custom decode
/// callbacks can be paired with a kind via [`Codec::new`] and added to a
/// [`Registry`](crate::Registry).
pub struct Codec {
	/// # Kind.
	kind: ImageKind,

	/// # Decode Callback.
	decode: DecodeFn,

	/// # End-of-Stream Marker.
	trailer: &'static [u8],

	/// # Refill Capacity.
	buffer_size: NonZeroUsize,
}

impl fmt::Debug for Codec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Codec")
			.field("kind", &self.kind)
			.field("trailer", &self.trailer)
			.field("buffer_size", &self.buffer_size)
			.finish_non_exhaustive()
	}
}

impl Codec {
	#[must_use]
	/// # New.
	///
	/// Pair a decode callback with a kind. No trailer is set, and the
	/// default buffer size is used.
	pub const fn new(kind: ImageKind, decode: DecodeFn) -> Self {
		Self {
			kind,
			decode,
			trailer: &[],
			buffer_size: crate::DEFAULT_BUFFER_SIZE,
		}
	}

	#[cfg(any(feature = "gif", feature = "jpeg", feature = "png", feature = "webp"))]
	/// # From Decoder.
	const fn from_decoder<D: Decoder>() -> Self {
		Self {
			kind: D::KIND,
			decode: D::decode,
			trailer: D::TRAILER,
			buffer_size: D::BUFFER_SIZE,
		}
	}

	#[must_use]
	/// # With Trailer.
	pub const fn with_trailer(mut self, trailer: &'static [u8]) -> Self {
		self.trailer = trailer;
		self
	}

	#[must_use]
	/// # With Buffer Size.
	pub const fn with_buffer_size(mut self, size: NonZeroUsize) -> Self {
		self.buffer_size = size;
		self
	}
}

/// ## Getters.
impl Codec {
	#[inline]
	#[must_use]
	/// # Kind.
	pub const fn kind(&self) -> ImageKind { self.kind }

	#[inline]
	#[must_use]
	/// # Trailer.
	pub const fn trailer(&self) -> &'static [u8] { self.trailer }

	#[inline]
	#[must_use]
	/// # Buffer Size.
	pub const fn buffer_size(&self) -> NonZeroUsize { self.buffer_size }

	#[inline]
	#[must_use]
	/// # Sniff.
	///
	/// Test a prefix against this codec's magic.
	pub fn sniff(&self, prefix: &[u8]) -> bool { self.kind.sniff(prefix) }
}

/// ## Operations.
impl Codec {
	/// # Detect.
	///
	/// Returns `true` if the source starts with this codec's magic. The
	/// source's position is left unchanged.
	///
	/// ## Errors
	///
	/// This will bubble up any read errors.
	pub fn detect(&self, source: &mut dyn ByteSource) -> Result<bool, RipoError> {
		read_prefix(source).map(|p| self.sniff(&p))
	}

	/// # Load.
	///
	/// Rewind the source and decode it from the start.
	///
	/// ## Errors
	///
	/// This will bubble up any read or decoding errors. No partial image is
	/// ever returned.
	pub fn load(&self, source: &mut dyn ByteSource) -> Result<PixelBuffer, RipoError> {
		source.rewind()?;
		let mut buf = RefillBuffer::new(source, self.buffer_size, self.trailer);
		let res = (self.decode)(&mut buf);
		buf.resolve(res)
	}
}



/// ## Built-in Codecs.
impl ImageKind {
	#[must_use]
	/// # Codec.
	///
	/// Return the built-in codec for this kind, or `None` if its crate
	/// feature was not enabled.
	pub const fn codec(self) -> Option<Codec> {
		match self {
			#[cfg(feature = "jpeg")] Self::Jpeg => Some(Codec::from_decoder::<ImageJpeg>()),
			#[cfg(feature = "png")]  Self::Png => Some(Codec::from_decoder::<ImagePng>()),
			#[cfg(feature = "gif")]  Self::Gif => Some(Codec::from_decoder::<ImageGif>()),
			#[cfg(feature = "webp")] Self::Webp => Some(Codec::from_decoder::<ImageWebp>()),
			#[allow(unreachable_patterns)]
			_ => None,
		}
	}
}
