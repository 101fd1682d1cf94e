/*!
# `Ripo` - Error
*/

use crate::ImageKind;
use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Errors.
pub enum RipoError {
	/// # The source produced no bytes at all.
	EmptySource,

	/// # Decoding failed.
	///
	/// The detail is the external decoder's own message.
	Decode {
		/// # Image Kind.
		kind: ImageKind,

		/// # Decoder Message.
		detail: String,
	},

	/// # Encoding failed.
	Encode(String),

	/// # No registered codec recognized the source.
	UnknownFormat,

	/// # Recognized, but not implemented.
	Unsupported(&'static str),

	/// # The source ended and the format has no end marker to stand in.
	Truncated,

	/// # The source ended in the middle of a skip.
	SkipExhausted {
		/// # Bytes Left to Skip.
		remaining: usize,
	},

	/// # Image dimensions are out of range.
	Overflow,

	/// # I/O read error.
	Read(String),

	/// # I/O write error.
	Write,
}

impl Error for RipoError {}

impl fmt::Display for RipoError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::EmptySource => f.write_str("The image source is empty."),
			Self::Decode { kind, detail } => write!(f, "{kind} decoding failed: {detail}"),
			Self::Encode(detail) => write!(f, "PNG encoding failed: {detail}"),
			Self::UnknownFormat => f.write_str("The image format could not be determined."),
			Self::Unsupported(what) => write!(f, "Unsupported feature: {what}."),
			Self::Truncated => f.write_str("The image source ended before the image was complete."),
			Self::SkipExhausted { remaining } => write!(
				f,
				"The image source ended with {remaining} byte(s) left to skip."
			),
			Self::Overflow => f.write_str("The image dimensions are out of range."),
			Self::Read(detail) => write!(f, "Unable to read the image source: {detail}"),
			Self::Write => f.write_str("Unable to save the file."),
		}
	}
}

impl RipoError {
	#[inline]
	/// # Decode Error.
	///
	/// Wrap an external decoder's error, keeping its message verbatim.
	pub(crate) fn decode<E: fmt::Display>(kind: ImageKind, err: E) -> Self {
		Self::Decode { kind, detail: err.to_string() }
	}
}
