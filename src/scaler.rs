use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed mapping from destination pixels to source pixels
pub struct ScaleLut {
    src_w: usize,
    xs: Vec<usize>,
    ys: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_w: 0,
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        Self {
            src_w,
            xs: nearest_indices(dst_w, src_w),
            ys: nearest_indices(dst_h, src_h),
        }
    }

    #[inline]
    pub fn dst_size(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }
}

fn nearest_indices(dst: usize, src: usize) -> Vec<usize> {
    if src == 0 {
        return vec![0; dst];
    }
    let s = src as f32 / dst.max(1) as f32;
    (0..dst)
        .map(|d| ((d as f32 + 0.5) * s).floor().min((src - 1) as f32) as usize)
        .collect()
}

/// Parallel nearest-neighbour stretch of `src` onto `dst`.
/// Rows are processed in parallel for cache friendly writes.
pub fn blit_nearest(dst: &mut [u32], src: &[u32], lut: &ScaleLut) {
    let (dw, _) = lut.dst_size();
    if dw == 0 || lut.src_w == 0 {
        return;
    }
    dst.par_chunks_mut(dw)
        .zip(lut.ys.par_iter())
        .for_each(|(dst_row, &sy)| {
            let row = &src[sy * lut.src_w..(sy + 1) * lut.src_w];
            for (px, &sx) in dst_row.iter_mut().zip(&lut.xs) {
                *px = row[sx];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_lut() {
        let lut = ScaleLut::new(4, 3, 4, 3);
        assert_eq!(lut.xs, vec![0, 1, 2, 3]);
        assert_eq!(lut.ys, vec![0, 1, 2]);
    }

    #[test]
    fn test_upscale_doubles_pixels() {
        let src = vec![1, 2, 3, 4];
        let lut = ScaleLut::new(4, 4, 2, 2);
        let mut dst = vec![0; 16];
        blit_nearest(&mut dst, &src, &lut);
        assert_eq!(
            dst,
            vec![1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn test_downscale_stays_in_bounds() {
        let src: Vec<u32> = (0..100).collect();
        let lut = ScaleLut::new(3, 3, 10, 10);
        let mut dst = vec![0; 9];
        blit_nearest(&mut dst, &src, &lut);
        assert!(dst.iter().all(|&p| p < 100));
    }

    #[test]
    fn test_empty_lut_is_noop() {
        let mut dst = vec![9; 4];
        blit_nearest(&mut dst, &[], &ScaleLut::empty());
        assert_eq!(dst, vec![9; 4]);
    }
}
