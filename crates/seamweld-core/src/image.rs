//! Image buffer type shared by every stage of the seamweld pipeline.
//!
//! Unlike a fixed-channel RGB/RGBA buffer, [`Image`] carries a **runtime**
//! band count: a luminance pass is 1 band, a composited texture is 3, and a
//! coherent scene index is 3 bands of integer-valued floats (observation id,
//! source row, source col). All of them share the same storage, view, and
//! masking machinery, so the rasterizer, the coherent-index builder, and the
//! multigrid solver all work against one type.
//!
//! # Validity mask
//!
//! Every pixel additionally carries one validity bit, independent of its
//! bands, packed into a `Vec<u64>` bitset parallel to the sample buffer. A
//! pixel with the bit clear has `NO_DATA`-equivalent bands (the stored
//! sample values are unspecified and must not be blended or sampled).
//!
//! # Memory layout
//!
//! Row-major, band-interleaved: `[b0 b1 b2 ... b0 b1 b2 ...]` for each row
//! in turn. The sample buffer is `Arc<Vec<f32>>`, giving cheap `Clone` and
//! copy-on-write mutation via [`Arc::make_mut`].

use crate::{Error, Rect, Result, Roi};
use std::path::Path;
use std::sync::Arc;

/// Owned, band-interleaved float image with a per-pixel validity mask.
#[derive(Clone)]
pub struct Image {
    data: Arc<Vec<f32>>,
    mask: Arc<Vec<u64>>,
    width: u32,
    height: u32,
    bands: usize,
}

impl Image {
    /// Creates a new image filled with zeros, every pixel marked valid.
    pub fn new(width: u32, height: u32, bands: usize) -> Self {
        let pixel_count = width as usize * height as usize;
        Self {
            data: Arc::new(vec![0.0; pixel_count * bands]),
            mask: Arc::new(vec![u64::MAX; Self::mask_words(pixel_count)]),
            width,
            height,
            bands,
        }
    }

    /// Creates a new image filled with zeros, every pixel marked `NO_DATA`.
    pub fn new_empty(width: u32, height: u32, bands: usize) -> Self {
        let pixel_count = width as usize * height as usize;
        Self {
            data: Arc::new(vec![0.0; pixel_count * bands]),
            mask: Arc::new(vec![0; Self::mask_words(pixel_count)]),
            width,
            height,
            bands,
        }
    }

    /// Creates an image from existing band-interleaved pixel data, all valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height
    /// * bands`.
    pub fn from_data(width: u32, height: u32, bands: usize, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * bands;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {expected} elements, got {}", data.len()),
            ));
        }
        let pixel_count = width as usize * height as usize;
        Ok(Self {
            data: Arc::new(data),
            mask: Arc::new(vec![u64::MAX; Self::mask_words(pixel_count)]),
            width,
            height,
            bands,
        })
    }

    #[inline]
    fn mask_words(pixel_count: usize) -> usize {
        pixel_count.div_ceil(64)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of bands per pixel.
    #[inline]
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Total pixel count (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// A rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// `true` if width or height is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw band-interleaved sample data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw sample data; clones on write if shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    fn sample_offset(&self, x: u32, y: u32) -> usize {
        self.pixel_index(x, y) * self.bands
    }

    /// Returns `true` if the pixel at `(x, y)` is valid.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn is_valid(&self, x: u32, y: u32) -> bool {
        debug_assert!(x < self.width && y < self.height);
        let idx = self.pixel_index(x, y);
        (self.mask[idx / 64] >> (idx % 64)) & 1 != 0
    }

    /// Marks the pixel at `(x, y)` valid or invalid.
    #[inline]
    pub fn set_valid(&mut self, x: u32, y: u32, valid: bool) {
        debug_assert!(x < self.width && y < self.height);
        let idx = self.pixel_index(x, y);
        let mask = Arc::make_mut(&mut self.mask);
        let word = &mut mask[idx / 64];
        let bit = 1u64 << (idx % 64);
        if valid {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    /// Returns the bands at `(x, y)`, copied into a `Vec`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        debug_assert!(x < self.width && y < self.height);
        let offset = self.sample_offset(x, y);
        &self.data[offset..offset + self.bands]
    }

    /// Sets the bands at `(x, y)` and marks the pixel valid.
    ///
    /// # Panics
    ///
    /// Panics if `pixel.len() != self.bands()` or `(x, y)` is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: &[f32]) {
        debug_assert_eq!(pixel.len(), self.bands);
        let offset = self.sample_offset(x, y);
        let bands = self.bands;
        Arc::make_mut(&mut self.data)[offset..offset + bands].copy_from_slice(pixel);
        self.set_valid(x, y, true);
    }

    /// Returns the bands at `(x, y)` if the pixel is valid and in bounds.
    #[inline]
    pub fn get_valid_pixel(&self, x: u32, y: u32) -> Option<&[f32]> {
        if x < self.width && y < self.height && self.is_valid(x, y) {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Fills every pixel with `pixel` and marks all valid.
    pub fn fill(&mut self, pixel: &[f32]) {
        debug_assert_eq!(pixel.len(), self.bands);
        let data = Arc::make_mut(&mut self.data);
        for chunk in data.chunks_exact_mut(self.bands) {
            chunk.copy_from_slice(pixel);
        }
        let mask = Arc::make_mut(&mut self.mask);
        mask.fill(u64::MAX);
    }

    /// Applies `f` to every valid pixel's bands in place.
    pub fn apply_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut [f32]),
    {
        let bands = self.bands;
        let pixel_count = self.pixel_count();
        let data = Arc::make_mut(&mut self.data);
        let mask = &self.mask;
        for idx in 0..pixel_count {
            if (mask[idx / 64] >> (idx % 64)) & 1 != 0 {
                f(&mut data[idx * bands..idx * bands + bands]);
            }
        }
    }

    /// Bilinearly samples band `band` at floating-point coordinates,
    /// clamping to the image border. Invalid source pixels are skipped in
    /// the weighted average; returns `None` if all four taps are invalid.
    pub fn sample_bilinear(&self, x: f32, y: f32, band: usize) -> Option<f32> {
        let w = self.width as i64;
        let h = self.height as i64;
        if w == 0 || h == 0 {
            return None;
        }
        let fx = x.floor();
        let fy = y.floor();
        let tx = x - fx;
        let ty = y - fy;
        let x0 = (fx as i64).clamp(0, w - 1) as u32;
        let x1 = (fx as i64 + 1).clamp(0, w - 1) as u32;
        let y0 = (fy as i64).clamp(0, h - 1) as u32;
        let y1 = (fy as i64 + 1).clamp(0, h - 1) as u32;

        let taps = [
            (x0, y0, (1.0 - tx) * (1.0 - ty)),
            (x1, y0, tx * (1.0 - ty)),
            (x0, y1, (1.0 - tx) * ty),
            (x1, y1, tx * ty),
        ];

        let mut acc = 0.0f32;
        let mut wsum = 0.0f32;
        for (sx, sy, weight) in taps {
            if self.is_valid(sx, sy) {
                acc += self.pixel(sx, sy)[band] * weight;
                wsum += weight;
            }
        }
        if wsum > 0.0 {
            Some(acc / wsum)
        } else {
            None
        }
    }

    /// Copies the valid pixels of `src` into this image at `(dst_x, dst_y)`,
    /// leaving destination pixels untouched wherever `src` is invalid.
    pub fn blit(&mut self, src: &Image, dst_x: i64, dst_y: i64) {
        for sy in 0..src.height {
            let ty = dst_y + sy as i64;
            if ty < 0 || ty >= self.height as i64 {
                continue;
            }
            for sx in 0..src.width {
                let tx = dst_x + sx as i64;
                if tx < 0 || tx >= self.width as i64 {
                    continue;
                }
                if src.is_valid(sx, sy) {
                    let px = src.pixel(sx, sy).to_vec();
                    self.set_pixel(tx as u32, ty as u32, &px);
                }
            }
        }
    }

    /// Downsamples by an integer `factor` along both axes.
    ///
    /// `DecimateMode::Mean` averages valid source pixels in each block;
    /// `DecimateMode::Pick` takes the top-left valid source pixel of each
    /// block. A destination pixel is invalid if its block had no valid
    /// source pixels.
    pub fn decimate(&self, factor: u32, mode: DecimateMode) -> Image {
        assert!(factor >= 1);
        if factor == 1 {
            return self.clone();
        }
        let dw = self.width.div_ceil(factor).max(1);
        let dh = self.height.div_ceil(factor).max(1);
        let mut out = Image::new_empty(dw, dh, self.bands);
        for dy in 0..dh {
            for dx in 0..dw {
                let x0 = dx * factor;
                let y0 = dy * factor;
                let x1 = (x0 + factor).min(self.width);
                let y1 = (y0 + factor).min(self.height);
                match mode {
                    DecimateMode::Mean => {
                        let mut acc = vec![0.0f32; self.bands];
                        let mut count = 0u32;
                        for sy in y0..y1 {
                            for sx in x0..x1 {
                                if self.is_valid(sx, sy) {
                                    for (a, v) in acc.iter_mut().zip(self.pixel(sx, sy)) {
                                        *a += v;
                                    }
                                    count += 1;
                                }
                            }
                        }
                        if count > 0 {
                            for a in acc.iter_mut() {
                                *a /= count as f32;
                            }
                            out.set_pixel(dx, dy, &acc);
                        }
                    }
                    DecimateMode::Pick => {
                        'search: for sy in y0..y1 {
                            for sx in x0..x1 {
                                if self.is_valid(sx, sy) {
                                    let px = self.pixel(sx, sy).to_vec();
                                    out.set_pixel(dx, dy, &px);
                                    break 'search;
                                }
                            }
                        }
                    }
                }
            }
        }
        out
    }

    /// Returns a deep copy of the sub-region described by `region`.
    pub fn crop(&self, region: impl Into<Roi>) -> Image {
        let rect = region.into().resolve(self.width, self.height);
        let mut out = Image::new_empty(rect.width, rect.height, self.bands);
        for y in 0..rect.height {
            for x in 0..rect.width {
                let sx = rect.x + x;
                let sy = rect.y + y;
                if self.is_valid(sx, sy) {
                    let px = self.pixel(sx, sy).to_vec();
                    out.set_pixel(x, y, &px);
                }
            }
        }
        out
    }

    /// Resizes to `(new_width, new_height)` using bilinear resampling of
    /// valid pixels. Destination pixels with no overlapping valid source
    /// data remain invalid.
    pub fn resize(&self, new_width: u32, new_height: u32) -> Image {
        if new_width == 0 || new_height == 0 || self.is_empty() {
            return Image::new_empty(new_width, new_height, self.bands);
        }
        let sx_scale = self.width as f32 / new_width as f32;
        let sy_scale = self.height as f32 / new_height as f32;
        let mut out = Image::new_empty(new_width, new_height, self.bands);
        for dy in 0..new_height {
            let sy = (dy as f32 + 0.5) * sy_scale - 0.5;
            for dx in 0..new_width {
                let sx = (dx as f32 + 0.5) * sx_scale - 0.5;
                let mut px = vec![0.0f32; self.bands];
                let mut ok = true;
                for (band, slot) in px.iter_mut().enumerate() {
                    match self.sample_bilinear(sx, sy, band) {
                        Some(v) => *slot = v,
                        None => {
                            ok = false;
                            break;
                        }
                    }
                }
                if ok {
                    out.set_pixel(dx, dy, &px);
                }
            }
        }
        out
    }

    /// Linearly stretches `band`'s valid samples so the `lo`/`hi`
    /// percentile-free min/max map to `[0, 1]`.
    pub fn histogram_stretch(&mut self, band: usize) {
        let (mut lo, mut hi) = (f32::INFINITY, f32::NEG_INFINITY);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_valid(x, y) {
                    let v = self.pixel(x, y)[band];
                    lo = lo.min(v);
                    hi = hi.max(v);
                }
            }
        }
        if !lo.is_finite() || !hi.is_finite() || hi <= lo {
            return;
        }
        let scale = 1.0 / (hi - lo);
        self.apply_in_place(|px| px[band] = (px[band] - lo) * scale);
    }

    /// Stretches `band` so its valid-sample mean sits at 0.5 and `k`
    /// standard deviations map to the `[0, 1]` edges, clamping outliers.
    pub fn stddev_stretch(&mut self, band: usize, k: f32) {
        let mut sum = 0.0f64;
        let mut sumsq = 0.0f64;
        let mut count = 0u64;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_valid(x, y) {
                    let v = self.pixel(x, y)[band] as f64;
                    sum += v;
                    sumsq += v * v;
                    count += 1;
                }
            }
        }
        if count == 0 {
            return;
        }
        let mean = sum / count as f64;
        let variance = (sumsq / count as f64 - mean * mean).max(0.0);
        let std = variance.sqrt();
        if std <= 0.0 {
            return;
        }
        let mean = mean as f32;
        let std = std as f32;
        self.apply_in_place(|px| {
            let z = (px[band] - mean) / (k * std);
            px[band] = (z * 0.5 + 0.5).clamp(0.0, 1.0);
        });
    }

    /// Fills invalid pixels within `radius` of a valid neighbor by averaging
    /// valid neighbors, iterating outward until no more gaps close or
    /// `radius` rings have been consumed. Gaps wider than `radius` pixels
    /// are left invalid.
    ///
    /// `connectivity` selects 4- or 8-connected neighbor sampling.
    pub fn inpaint(&mut self, radius: u32, connectivity: Connectivity) {
        let offsets: &[(i64, i64)] = match connectivity {
            Connectivity::Four => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
            Connectivity::Eight => &[
                (1, 0),
                (-1, 0),
                (0, 1),
                (0, -1),
                (1, 1),
                (1, -1),
                (-1, 1),
                (-1, -1),
            ],
        };
        for _ in 0..radius {
            let snapshot_mask = self.mask.clone();
            let mut to_fill = Vec::new();
            for y in 0..self.height {
                for x in 0..self.width {
                    let idx = self.pixel_index(x, y);
                    if (snapshot_mask[idx / 64] >> (idx % 64)) & 1 != 0 {
                        continue;
                    }
                    let mut acc = vec![0.0f32; self.bands];
                    let mut count = 0u32;
                    for (dx, dy) in offsets {
                        let nx = x as i64 + dx;
                        let ny = y as i64 + dy;
                        if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
                            continue;
                        }
                        let nidx = self.pixel_index(nx as u32, ny as u32);
                        if (snapshot_mask[nidx / 64] >> (nidx % 64)) & 1 != 0 {
                            for (a, v) in acc.iter_mut().zip(self.pixel(nx as u32, ny as u32)) {
                                *a += v;
                            }
                            count += 1;
                        }
                    }
                    if count > 0 {
                        for a in acc.iter_mut() {
                            *a /= count as f32;
                        }
                        to_fill.push((x, y, acc));
                    }
                }
            }
            if to_fill.is_empty() {
                break;
            }
            for (x, y, px) in to_fill {
                self.set_pixel(x, y, &px);
            }
        }
    }

    /// Creates an immutable view into `region`.
    pub fn view(&self, region: impl Into<Roi>) -> ImageView<'_> {
        let rect = region.into().resolve(self.width, self.height);
        ImageView { image: self, region: rect }
    }

    /// Creates a mutable view into `region`.
    pub fn view_mut(&mut self, region: impl Into<Roi>) -> ImageViewMut<'_> {
        let rect = region.into().resolve(self.width, self.height);
        ImageViewMut { image: self, region: rect }
    }

    /// Decodes a PNG or JPEG file into an `f32` image in `[0, 1]`, all
    /// decoded pixels marked valid. Band count follows the source format
    /// (1 for luma, 3 for RGB, 4 for RGBA).
    pub fn read(path: impl AsRef<Path>) -> Result<Image> {
        let dyn_img = image::open(path)?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for px in rgba.pixels() {
            for c in px.0 {
                data.push(c as f32 / 255.0);
            }
        }
        Image::from_data(width, height, 4, data)
    }

    /// Encodes this image (clamped to `[0, 1]`, first 1/3/4 bands used) to
    /// PNG. Invalid pixels are written as black/transparent.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let w = self.width;
        let h = self.height;
        let mut buf = image::RgbaImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let out = if self.is_valid(x, y) {
                    let px = self.pixel(x, y);
                    match self.bands {
                        1 => {
                            let v = (px[0].clamp(0.0, 1.0) * 255.0).round() as u8;
                            [v, v, v, 255]
                        }
                        3 => [
                            (px[0].clamp(0.0, 1.0) * 255.0).round() as u8,
                            (px[1].clamp(0.0, 1.0) * 255.0).round() as u8,
                            (px[2].clamp(0.0, 1.0) * 255.0).round() as u8,
                            255,
                        ],
                        _ => [
                            (px[0].clamp(0.0, 1.0) * 255.0).round() as u8,
                            (px[1].clamp(0.0, 1.0) * 255.0).round() as u8,
                            (px[2].clamp(0.0, 1.0) * 255.0).round() as u8,
                            (px[3].clamp(0.0, 1.0) * 255.0).round() as u8,
                        ],
                    }
                } else {
                    [0, 0, 0, 0]
                };
                buf.put_pixel(x, y, image::Rgba(out));
            }
        }
        buf.save(path).map_err(Error::from)
    }
}

/// Strategy for [`Image::decimate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimateMode {
    /// Average the valid samples in each block.
    Mean,
    /// Take the first valid sample in raster order within each block.
    Pick,
}

/// Neighbor connectivity for [`Image::inpaint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Up/down/left/right only.
    Four,
    /// Up/down/left/right plus the four diagonals.
    Eight,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bands", &self.bands)
            .finish()
    }
}

/// Immutable view into a rectangular region of an [`Image`].
pub struct ImageView<'a> {
    image: &'a Image,
    region: Rect,
}

impl<'a> ImageView<'a> {
    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// The region this view covers, in the parent image's coordinates.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Returns the bands at `(x, y)` relative to the view origin.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        debug_assert!(x < self.region.width && y < self.region.height);
        self.image.pixel(self.region.x + x, self.region.y + y)
    }

    /// Returns `true` if the pixel at `(x, y)` relative to the view origin
    /// is valid.
    #[inline]
    pub fn is_valid(&self, x: u32, y: u32) -> bool {
        self.image.is_valid(self.region.x + x, self.region.y + y)
    }
}

/// Mutable view into a rectangular region of an [`Image`].
pub struct ImageViewMut<'a> {
    image: &'a mut Image,
    region: Rect,
}

impl<'a> ImageViewMut<'a> {
    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// The region this view covers, in the parent image's coordinates.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Returns the bands at `(x, y)` relative to the view origin.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        debug_assert!(x < self.region.width && y < self.region.height);
        self.image.pixel(self.region.x + x, self.region.y + y)
    }

    /// Sets the bands at `(x, y)` relative to the view origin.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: &[f32]) {
        debug_assert!(x < self.region.width && y < self.region.height);
        self.image.set_pixel(self.region.x + x, self.region.y + y, pixel);
    }

    /// Fills the view with `pixel`.
    pub fn fill(&mut self, pixel: &[f32]) {
        for y in 0..self.region.height {
            for x in 0..self.region.width {
                self.set_pixel(x, y, pixel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_new_all_valid() {
        let img = Image::new(10, 10, 3);
        assert_eq!(img.bands(), 3);
        assert!(img.is_valid(5, 5));
    }

    #[test]
    fn test_image_new_empty_all_invalid() {
        let img = Image::new_empty(10, 10, 3);
        assert!(!img.is_valid(5, 5));
    }

    #[test]
    fn test_set_get_pixel() {
        let mut img = Image::new_empty(10, 10, 3);
        img.set_pixel(5, 5, &[1.0, 0.5, 0.25]);
        assert_eq!(img.pixel(5, 5), [1.0, 0.5, 0.25]);
        assert!(img.is_valid(5, 5));
        assert!(!img.is_valid(0, 0));
    }

    #[test]
    fn test_clone_is_cow() {
        let img1 = {
            let mut img = Image::new_empty(4, 4, 1);
            img.set_pixel(0, 0, &[1.0]);
            img
        };
        let mut img2 = img1.clone();
        img2.set_pixel(0, 0, &[2.0]);
        assert_eq!(img1.pixel(0, 0), [1.0]);
        assert_eq!(img2.pixel(0, 0), [2.0]);
    }

    #[test]
    fn test_bilinear_sample_all_valid() {
        let mut img = Image::new_empty(2, 2, 1);
        img.set_pixel(0, 0, &[0.0]);
        img.set_pixel(1, 0, &[1.0]);
        img.set_pixel(0, 1, &[0.0]);
        img.set_pixel(1, 1, &[1.0]);
        let v = img.sample_bilinear(0.5, 0.5, 0).unwrap();
        assert!((v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bilinear_sample_skips_invalid() {
        let mut img = Image::new_empty(2, 2, 1);
        img.set_pixel(0, 0, &[1.0]);
        let v = img.sample_bilinear(0.0, 0.0, 0).unwrap();
        assert!((v - 1.0).abs() < 1e-5);
        let none = Image::new_empty(2, 2, 1);
        assert!(none.sample_bilinear(0.5, 0.5, 0).is_none());
    }

    #[test]
    fn test_decimate_mean() {
        let mut img = Image::new_empty(4, 4, 1);
        for y in 0..4 {
            for x in 0..4 {
                img.set_pixel(x, y, &[1.0]);
            }
        }
        let small = img.decimate(2, DecimateMode::Mean);
        assert_eq!(small.dimensions(), (2, 2));
        assert_eq!(small.pixel(0, 0), [1.0]);
    }

    #[test]
    fn test_decimate_skips_invalid_blocks() {
        let img = Image::new_empty(4, 4, 1);
        let small = img.decimate(2, DecimateMode::Mean);
        assert!(!small.is_valid(0, 0));
    }

    #[test]
    fn test_crop() {
        let mut img = Image::new_empty(10, 10, 1);
        img.set_pixel(5, 5, &[9.0]);
        let cropped = img.crop(Rect::new(5, 5, 2, 2));
        assert_eq!(cropped.pixel(0, 0), [9.0]);
    }

    #[test]
    fn test_blit_skips_invalid_src() {
        let mut dst = Image::new(4, 4, 1);
        dst.fill(&[5.0]);
        let mut src = Image::new_empty(2, 2, 1);
        src.set_pixel(0, 0, &[9.0]);
        dst.blit(&src, 1, 1);
        assert_eq!(dst.pixel(1, 1), [9.0]);
        assert_eq!(dst.pixel(2, 2), [5.0]); // src (1,1) was invalid, untouched
    }

    #[test]
    fn test_inpaint_fills_small_gap() {
        let mut img = Image::new_empty(3, 3, 1);
        for y in 0..3 {
            for x in 0..3 {
                if !(x == 1 && y == 1) {
                    img.set_pixel(x, y, &[1.0]);
                }
            }
        }
        img.inpaint(1, Connectivity::Four);
        assert!(img.is_valid(1, 1));
        assert!((img.pixel(1, 1)[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_inpaint_respects_radius() {
        let mut img = Image::new_empty(5, 1, 1);
        img.set_pixel(0, 0, &[1.0]);
        img.inpaint(1, Connectivity::Four);
        assert!(!img.is_valid(4, 0));
    }

    #[test]
    fn test_histogram_stretch() {
        let mut img = Image::new_empty(2, 1, 1);
        img.set_pixel(0, 0, &[2.0]);
        img.set_pixel(1, 0, &[4.0]);
        img.histogram_stretch(0);
        assert!((img.pixel(0, 0)[0] - 0.0).abs() < 1e-5);
        assert!((img.pixel(1, 0)[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_view_reads_parent() {
        let mut img = Image::new_empty(10, 10, 1);
        img.set_pixel(5, 5, &[3.0]);
        let view = img.view(Rect::new(5, 5, 2, 2));
        assert_eq!(view.pixel(0, 0), [3.0]);
    }

    #[test]
    fn test_view_mut_writes_parent() {
        let mut img = Image::new_empty(10, 10, 1);
        {
            let mut view = img.view_mut(Rect::new(2, 2, 3, 3));
            view.fill(&[7.0]);
        }
        assert_eq!(img.pixel(2, 2), [7.0]);
        assert!(!img.is_valid(0, 0));
    }
}
