/*!
# `Ripo` - Kinds
*/

#[cfg(feature = "gif")]  pub(super) mod gif;
pub(super) mod image;
#[cfg(feature = "jpeg")] pub(super) mod jpeg;
#[cfg(feature = "png")]  pub(super) mod png;
#[cfg(feature = "webp")] pub(super) mod webp;
