//! Photo compression: dimension clamping and JPEG re-encoding.
//!
//! Split into pure calculations (testable without pixels) and the codec
//! work that actually touches image data:
//!
//! - [`calculations`] — dimension math ([`fit_within`])
//! - [`compress`] — decode → downscale → JPEG encode ([`compress_image`])

pub mod calculations;
pub mod compress;

pub use calculations::fit_within;
pub use compress::{CompressError, CompressedImage, DEFAULT_MAX_DIM, compress_image};
