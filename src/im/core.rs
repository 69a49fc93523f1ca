/// Interleaved `N_CH`-channel image, rows packed back to back.
#[derive(Debug, Clone)]
pub struct Im<T, const N_CH: usize> {
    pub w: usize,
    pub h: usize,
    pub s: usize, // stride in elements (w * N_CH)
    pub arr: Vec<T>,
}

impl<T: Copy + Default, const N_CH: usize> Im<T, N_CH> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            s: w * N_CH,
            arr: vec![T::default(); w * N_CH * h],
        }
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.w && y < self.h).then(|| y * self.s + x * N_CH)
    }

    /// All channels of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[T; N_CH]> {
        let i = self.offset(x, y)?;
        let mut out = [T::default(); N_CH];
        out.copy_from_slice(&self.arr[i..i + N_CH]);
        Some(out)
    }

    /// Writes all channels of `(x, y)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn put(&mut self, x: usize, y: usize, px: [T; N_CH]) {
        if let Some(i) = self.offset(x, y) {
            self.arr[i..i + N_CH].copy_from_slice(&px);
        }
    }

    pub fn fill(&mut self, px: [T; N_CH]) {
        for chunk in self.arr.chunks_exact_mut(N_CH) {
            chunk.copy_from_slice(&px);
        }
    }
}

pub type RGBAIm = Im<u8, 4>;
pub type MaskIm = Im<u8, 1>;

/// Paints `(r, g, b)` into `dst` wherever `src` is set; other pixels keep
/// their color.
pub fn copy_mask_im_to_rgba_im(src: &MaskIm, dst: &mut RGBAIm, r: u8, g: u8, b: u8) {
    assert_eq!(src.w, dst.w, "width mismatch");
    assert_eq!(src.h, dst.h, "height mismatch");

    for (m, px) in src.arr.iter().zip(dst.arr.chunks_exact_mut(4)) {
        if *m != 0 {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }
}
