/*!
# `Ripo` - Encoding!
*/

pub(super) mod png;
