/*!
# `Ripo` - Image Kind
*/

use crate::{
	ByteSource,
	PREFIX_SIZE,
	RipoError,
};
use std::fmt;



#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
/// # Image Kind.
pub enum ImageKind {
	/// # JPEG.
	Jpeg,

	/// # PNG.
	Png,

	/// # GIF.
	Gif,

	/// # WebP.
	Webp,
}

impl AsRef<str> for ImageKind {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for ImageKind {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<&[u8]> for ImageKind {
	type Error = RipoError;

	/// # From Raw Bytes.
	///
	/// This examines the leading bytes of the raw image file to see what
	/// magic its headers contain.
	fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
		Self::ALL.into_iter()
			.find(|k| k.sniff(src))
			.ok_or(RipoError::UnknownFormat)
	}
}

/// ## Sniffing.
impl ImageKind {
	/// # All Kinds.
	///
	/// This is also the default detection order.
	pub const ALL: [Self; 4] = [Self::Jpeg, Self::Png, Self::Gif, Self::Webp];

	#[must_use]
	/// # Sniff.
	///
	/// Returns `true` if the prefix carries this format's magic. Prefixes
	/// shorter than the magic never match.
	pub fn sniff(self, src: &[u8]) -> bool {
		match self {
			Self::Jpeg => sniff_jpeg(src),
			Self::Png => sniff_png(src),
			Self::Gif => sniff_gif(src),
			Self::Webp => sniff_webp(src),
		}
	}
}

/// ## Getters.
impl ImageKind {
	#[must_use]
	/// # As String Slice.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Jpeg => "JPEG",
			Self::Png => "PNG",
			Self::Gif => "GIF",
			Self::Webp => "WebP",
		}
	}

	#[must_use]
	/// # File Extension.
	///
	/// The preferred extension, without a dot.
	pub const fn extension(self) -> &'static str {
		match self {
			Self::Jpeg => "jpg",
			Self::Png => "png",
			Self::Gif => "gif",
			Self::Webp => "webp",
		}
	}

	#[must_use]
	/// # File Extensions.
	///
	/// Every extension commonly used by the format, lowercase, without dots.
	pub const fn extensions(self) -> &'static [&'static str] {
		match self {
			Self::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
			Self::Png => &["png"],
			Self::Gif => &["gif"],
			Self::Webp => &["webp"],
		}
	}

	#[must_use]
	/// # Media Type.
	pub const fn mime(self) -> &'static str {
		match self {
			Self::Jpeg => "image/jpeg",
			Self::Png => "image/png",
			Self::Gif => "image/gif",
			Self::Webp => "image/webp",
		}
	}

	#[must_use]
	/// # From Extension.
	///
	/// The match is case-insensitive, and a leading dot is ignored.
	pub fn from_extension(ext: &str) -> Option<Self> {
		let ext = ext.strip_prefix('.').unwrap_or(ext);
		Self::ALL.into_iter().find(|k|
			k.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext))
		)
	}
}



/// # Read Prefix.
///
/// Read up to [`PREFIX_SIZE`] bytes from the start of the source, looping
/// over short reads, then rewind it. The source is rewound even if the read
/// fails.
///
/// ## Errors
///
/// This will bubble up any read or rewind errors.
pub fn read_prefix(source: &mut dyn ByteSource) -> Result<Vec<u8>, RipoError> {
	source.rewind()?;

	let mut buf = [0_u8; PREFIX_SIZE];
	let mut len = 0;
	let res = loop {
		if len == PREFIX_SIZE { break Ok(()); }
		match source.read_into(&mut buf[len..]) {
			Ok(0) => break Ok(()),
			Ok(n) => { len += n; },
			Err(e) => break Err(e),
		}
	};

	let rewound = source.rewind();
	res?;
	rewound?;
	Ok(buf[..len].to_vec())
}

/// # Sniff JPEG.
///
/// A start-of-image marker.
fn sniff_jpeg(src: &[u8]) -> bool { src.starts_with(&[0xFF, 0xD8]) }

/// # Sniff PNG.
fn sniff_png(src: &[u8]) -> bool {
	src.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'])
}

/// # Sniff GIF.
///
/// This covers both `GIF87a` and `GIF89a`.
fn sniff_gif(src: &[u8]) -> bool { src.starts_with(b"GIF8") }

/// # Sniff WebP.
///
/// A RIFF container holding a `VP8 `, `VP8L`, or `VP8X` chunk.
fn sniff_webp(src: &[u8]) -> bool {
	16 <= src.len() &&
	src[..4] == *b"RIFF" &&
	src[8..12] == *b"WEBP" &&
	src[12..15] == *b"VP8" &&
	matches!(src[15], b' ' | b'L' | b'X')
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::Trickle;
	use std::io::Cursor;

	const WEBP: &[u8] = b"RIFF\x24\0\0\0WEBPVP8L\x18\0\0\0";

	#[test]
	fn t_sniff() {
		assert_eq!(ImageKind::try_from(&[0xFF_u8, 0xD8, 0xFF, 0xE0][..]), Ok(ImageKind::Jpeg));
		assert_eq!(
			ImageKind::try_from(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'][..]),
			Ok(ImageKind::Png),
		);
		assert_eq!(ImageKind::try_from(&b"GIF87a"[..]), Ok(ImageKind::Gif));
		assert_eq!(ImageKind::try_from(&b"GIF89a"[..]), Ok(ImageKind::Gif));
		assert_eq!(ImageKind::try_from(WEBP), Ok(ImageKind::Webp));

		// Near misses.
		assert_eq!(ImageKind::try_from(&[0xFF_u8][..]), Err(RipoError::UnknownFormat));
		assert_eq!(ImageKind::try_from(&b"GIF9"[..]), Err(RipoError::UnknownFormat));
		assert_eq!(ImageKind::try_from(&WEBP[..15]), Err(RipoError::UnknownFormat));
		assert_eq!(ImageKind::try_from(&[][..]), Err(RipoError::UnknownFormat));

		let mut bad = WEBP.to_vec();
		bad[15] = b'Z';
		assert!(! ImageKind::Webp.sniff(&bad));
		bad[15] = b'X';
		assert!(ImageKind::Webp.sniff(&bad));
	}

	#[test]
	fn t_extensions() {
		for kind in ImageKind::ALL {
			assert!(kind.extensions().contains(&kind.extension()));
			assert_eq!(ImageKind::from_extension(kind.extension()), Some(kind));
			assert!(kind.mime().starts_with("image/"));
		}

		assert_eq!(ImageKind::from_extension("JFIF"), Some(ImageKind::Jpeg));
		assert_eq!(ImageKind::from_extension(".jpe"), Some(ImageKind::Jpeg));
		assert_eq!(ImageKind::from_extension("tiff"), None);
		assert_eq!(ImageKind::from_extension(""), None);
	}

	#[test]
	fn t_read_prefix() {
		// Short reads are stitched together.
		let data: Vec<u8> = (0..40).collect();
		let mut src = Trickle::new(data.clone(), 3);
		assert_eq!(read_prefix(&mut src).unwrap(), &data[..PREFIX_SIZE]);

		// And the position is restored.
		let mut buf = [0_u8; 3];
		assert_eq!(src.read_into(&mut buf), Ok(3));
		assert_eq!(buf, [0, 1, 2]);

		// Sources shorter than the prefix are fine.
		let mut src = Cursor::new(vec![1_u8, 2, 3]);
		assert_eq!(read_prefix(&mut src).unwrap(), [1, 2, 3]);
		assert_eq!(src.position(), 0);

		let mut src = Cursor::new(Vec::<u8>::new());
		assert!(read_prefix(&mut src).unwrap().is_empty());
	}
}
