/*!
# `Ripo` - Registry
*/

use crate::{
	ByteSource,
	Codec,
	ImageKind,
	kind::image::read_prefix,
	PixelBuffer,
	RipoError,
};
use std::num::NonZeroUsize;



#[derive(Debug, Clone)]
/// # Codec Registry.
///
/// An ordered list of codecs consulted for detection and decoding. Order
/// matters: the first codec whose magic matches wins.
///
/// [`Registry::default`] holds every codec compiled into the crate, in the
/// order JPEG, PNG, GIF, `WebP`. [`Registry::new`] starts empty.
///
/// ## Examples
///
/// ```no_run
/// use ripo_core::{ImageKind, ImageSource, Registry};
///
/// // Only accept PNGs.
/// let mut reg = Registry::new();
/// if let Some(codec) = ImageKind::Png.codec() { reg.register(codec); }
///
/// let mut src = ImageSource::open("/path/to/image.png").unwrap();
/// let img = reg.load(&mut src).unwrap();
/// ```
pub struct Registry {
	/// # Codecs.
	codecs: Vec<Codec>,

	/// # Refill Capacity Override.
	buffer_size: Option<NonZeroUsize>,
}

impl Default for Registry {
	fn default() -> Self {
		Self {
			codecs: ImageKind::ALL.into_iter().filter_map(ImageKind::codec).collect(),
			buffer_size: None,
		}
	}
}

/// ## Setup.
impl Registry {
	#[must_use]
	/// # New (Empty).
	pub const fn new() -> Self {
		Self {
			codecs: Vec::new(),
			buffer_size: None,
		}
	}

	#[must_use]
	/// # With Buffer Size.
	///
	/// Override the refill capacity of every codec.
	pub const fn with_buffer_size(mut self, size: NonZeroUsize) -> Self {
		self.buffer_size = Some(size);
		self
	}

	/// # Register.
	///
	/// Add a codec to the end of the list. A codec already registered for
	/// the same kind is replaced in place instead.
	pub fn register(&mut self, codec: Codec) {
		if let Some(old) = self.codecs.iter_mut().find(|c| c.kind() == codec.kind()) {
			*old = codec;
		}
		else { self.codecs.push(codec); }
	}

	/// # Unregister.
	///
	/// Remove and return the codec for a kind, if any.
	pub fn unregister(&mut self, kind: ImageKind) -> Option<Codec> {
		let idx = self.codecs.iter().position(|c| c.kind() == kind)?;
		Some(self.codecs.remove(idx))
	}
}

/// ## Getters.
impl Registry {
	#[must_use]
	/// # Registered Kinds.
	///
	/// In detection order.
	pub fn kinds(&self) -> Vec<ImageKind> {
		self.codecs.iter().map(Codec::kind).collect()
	}

	#[must_use]
	/// # Registered Extensions.
	///
	/// Every file extension claimed by a registered codec.
	pub fn extensions(&self) -> Vec<&'static str> {
		self.codecs.iter()
			.flat_map(|c| c.kind().extensions().iter().copied())
			.collect()
	}

	#[must_use]
	/// # Codecs For Extension.
	///
	/// Return the registered codecs claiming a file extension. The match is
	/// case-insensitive.
	pub fn codecs_for_extension(&self, ext: &str) -> Vec<&Codec> {
		let ext = ext.strip_prefix('.').unwrap_or(ext);
		self.codecs.iter()
			.filter(|c| c.kind().extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
			.collect()
	}
}

/// ## Operations.
impl Registry {
	/// # Detect Format.
	///
	/// Sniff the source's leading bytes, returning the kind of the first
	/// registered codec to match, or `None`. The source position is left
	/// unchanged, so this can be called any number of times.
	///
	/// ## Errors
	///
	/// This will bubble up any read errors.
	pub fn detect_format(&self, source: &mut dyn ByteSource)
	-> Result<Option<ImageKind>, RipoError> {
		let prefix = read_prefix(source)?;
		Ok(self.sniff(&prefix).map(Codec::kind))
	}

	/// # Load.
	///
	/// Decode the source into a [`PixelBuffer`].
	///
	/// If the source has a path hint, codecs registered for its extension
	/// are tried first, provided their magic matches; a misnamed file falls
	/// through to regular sniffing.
	///
	/// ## Errors
	///
	/// Returns [`RipoError::EmptySource`] if the source has no data,
	/// [`RipoError::UnknownFormat`] if no codec recognizes it, or any error
	/// raised while decoding.
	pub fn load(&self, source: &mut dyn ByteSource) -> Result<PixelBuffer, RipoError> {
		let prefix = read_prefix(source)?;
		if prefix.is_empty() { return Err(RipoError::EmptySource); }

		let hinted = source.path_hint()
			.and_then(|p| p.extension())
			.and_then(|e| e.to_str())
			.and_then(|ext|
				self.codecs_for_extension(ext).into_iter().find(|c| c.sniff(&prefix))
			);

		let codec = match hinted {
			Some(c) => {
				log::debug!("decoding as {} (extension match)", c.kind());
				c
			},
			None => {
				let c = self.sniff(&prefix).ok_or(RipoError::UnknownFormat)?;
				log::debug!("decoding as {} (magic match)", c.kind());
				c
			},
		};

		match self.buffer_size {
			Some(size) => codec.with_buffer_size(size).load(source),
			None => codec.load(source),
		}
	}

	/// # Sniff.
	fn sniff(&self, prefix: &[u8]) -> Option<&Codec> {
		self.codecs.iter().find(|c| c.sniff(prefix))
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		ColorSpace,
		PixelLayout,
		RefillBuffer,
		source::Trickle,
	};
	use std::io::Cursor;

	const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

	/// # Decode to a 1x1 pixel holding the refill capacity.
	fn capacity(src: &mut RefillBuffer<'_>) -> Result<PixelBuffer, RipoError> {
		let cap = u8::try_from(src.capacity()).unwrap_or(u8::MAX);
		let layout = PixelLayout::new(1_u32, 1_u32, ColorSpace::Gray, false)?;
		PixelBuffer::from_packed(layout, vec![cap])
	}

	/// # Decode to a 1x1 pixel holding a marker.
	fn marker(_: &mut RefillBuffer<'_>) -> Result<PixelBuffer, RipoError> {
		let layout = PixelLayout::new(1_u32, 1_u32, ColorSpace::Gray, false)?;
		PixelBuffer::from_packed(layout, vec![42])
	}

	#[test]
	fn t_register() {
		let mut reg = Registry::new();
		assert!(reg.kinds().is_empty());
		assert!(reg.extensions().is_empty());

		reg.register(Codec::new(ImageKind::Png, marker));
		reg.register(Codec::new(ImageKind::Jpeg, marker));
		assert_eq!(reg.kinds(), [ImageKind::Png, ImageKind::Jpeg]);
		assert_eq!(reg.extensions(), ["png", "jpg", "jpeg", "jpe", "jfif"]);
		assert_eq!(reg.codecs_for_extension("JPE").len(), 1);
		assert_eq!(reg.codecs_for_extension(".gif").len(), 0);

		// Re-registering replaces.
		reg.register(Codec::new(ImageKind::Png, capacity));
		assert_eq!(reg.kinds(), [ImageKind::Png, ImageKind::Jpeg]);

		assert!(reg.unregister(ImageKind::Png).is_some());
		assert!(reg.unregister(ImageKind::Png).is_none());
		assert_eq!(reg.kinds(), [ImageKind::Jpeg]);
	}

	#[test]
	fn t_default() {
		let reg = Registry::default();
		let kinds = reg.kinds();
		let expected: Vec<ImageKind> = ImageKind::ALL.into_iter()
			.filter(|k| k.codec().is_some())
			.collect();
		assert_eq!(kinds, expected);
	}

	#[test]
	fn t_detect() {
		let mut reg = Registry::new();
		reg.register(Codec::new(ImageKind::Png, marker));

		let mut raw = PNG_MAGIC.to_vec();
		raw.extend_from_slice(&[0; 20]);
		let mut src = Trickle::new(raw, 3);

		// Detection is repeatable.
		assert_eq!(reg.detect_format(&mut src), Ok(Some(ImageKind::Png)));
		assert_eq!(reg.detect_format(&mut src), Ok(Some(ImageKind::Png)));

		// Unregistered kinds aren't detected.
		let mut src = Cursor::new(b"GIF89a and so on".to_vec());
		assert_eq!(reg.detect_format(&mut src), Ok(None));
		assert_eq!(reg.load(&mut src), Err(RipoError::UnknownFormat));

		let mut src = Cursor::new(Vec::<u8>::new());
		assert_eq!(reg.detect_format(&mut src), Ok(None));
		assert_eq!(reg.load(&mut src), Err(RipoError::EmptySource));
	}

	#[test]
	fn t_extension_hint() {
		let mut reg = Registry::new();
		reg.register(Codec::new(ImageKind::Jpeg, marker));
		reg.register(Codec::new(ImageKind::Png, capacity));

		// A PNG named like a JPEG is still a PNG.
		let mut raw = PNG_MAGIC.to_vec();
		raw.extend_from_slice(&[0; 20]);
		let mut src = Trickle::new(raw, 64).with_path_hint("photo.jpg");
		let img = reg.load(&mut src).unwrap();
		assert_eq!(img.pixel(0, 0), Some(&[u8::MAX][..]));

		// And a JPEG named like one goes straight to the JPEG codec.
		let mut src = Trickle::new(vec![0xFF, 0xD8, 0xFF, 0xE0], 64).with_path_hint("photo.JPEG");
		let img = reg.load(&mut src).unwrap();
		assert_eq!(img.pixel(0, 0), Some(&[42_u8][..]));
	}

	#[cfg(feature = "png")]
	#[test]
	fn t_misnamed_png() {
		let layout = PixelLayout::new(6_u32, 4_u32, ColorSpace::Rgb, false).unwrap();
		let data = (0..layout.row_size() * 4).map(|i| (i * 5 % 256) as u8).collect();
		let img = PixelBuffer::from_packed(layout, data).unwrap();

		let mut raw = Vec::new();
		crate::write_png(&img, &mut raw).unwrap();

		// The extension says JPEG, the bytes say otherwise.
		for step in [1, 4, 64] {
			let mut src = Trickle::new(raw.clone(), step).with_path_hint("photo.jpg");
			assert_eq!(crate::detect_format(&mut src), Ok(Some(ImageKind::Png)));
			assert_eq!(crate::load(&mut src), Ok(img.clone()));
		}
	}

	#[test]
	fn t_buffer_size() {
		let mut reg = Registry::new()
			.with_buffer_size(NonZeroUsize::new(100).unwrap());
		reg.register(Codec::new(ImageKind::Png, capacity));

		let mut raw = PNG_MAGIC.to_vec();
		raw.extend_from_slice(&[0; 20]);
		let img = reg.load(&mut Cursor::new(raw)).unwrap();
		assert_eq!(img.pixel(0, 0), Some(&[100_u8][..]));
	}
}
