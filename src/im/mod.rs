pub mod core;
#[allow(unused_imports)]
pub use self::core::{copy_mask_im_to_rgba_im, Im, MaskIm, RGBAIm};

// Optional extras
// -----------------------------------------------------------------------------

#[cfg(feature = "im-io")]
pub mod io;
