use super::core::RGBAIm;
use image::ImageResult;
use std::path::Path;

// PNG output
// -----------------------------------------------------------------------------
impl RGBAIm {
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let img = image::RgbaImage::from_raw(self.w as u32, self.h as u32, self.arr.clone())
            .ok_or_else(|| {
                image::ImageError::Parameter(image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ))
            })?;

        img.save_with_format(path, image::ImageFormat::Png)
    }
}

// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_png_is_lossless() {
        let mut im = RGBAIm::new(3, 2);
        im.put(0, 0, [255, 0, 0, 255]);
        im.put(2, 1, [0, 128, 255, 64]);

        let path = std::env::temp_dir().join(format!("homog2d_io_{}.png", std::process::id()));
        im.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap().into_rgba8();
        let _ = std::fs::remove_file(&path);

        assert_eq!((loaded.width(), loaded.height()), (3, 2));
        assert_eq!(loaded.into_raw(), im.arr);
    }
}
