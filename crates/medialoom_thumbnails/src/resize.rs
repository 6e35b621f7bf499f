//! Crop-then-resize geometry.

use image::DynamicImage;
use image::imageops::FilterType;

/// Centre crop that brings `src` to the aspect ratio of `dst`.
///
/// Returns `(x, y, width, height)`, or `None` when no crop applies: the
/// ratios already match, or the source is smaller than the target in some
/// dimension.
///
/// # Examples
///
/// ```
/// use medialoom_thumbnails::crop_rect;
///
/// // Square source, 16:9 target: trim top and bottom.
/// assert_eq!(crop_rect((1000, 1000), (128, 72)), Some((0, 219, 1000, 562)));
/// // Already 16:9.
/// assert_eq!(crop_rect((1920, 1080), (128, 72)), None);
/// ```
pub fn crop_rect(src: (u32, u32), dst: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
    let (sw, sh) = (u64::from(src.0), u64::from(src.1));
    let (dw, dh) = (u64::from(dst.0), u64::from(dst.1));
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
        return None;
    }
    if sw * dh == sh * dw || sw < dw || sh < dh {
        return None;
    }

    if dw * sh < sw * dh {
        // Source is wider: trim the sides
        let width = sh * dw / dh;
        let x = (sw - width) / 2;
        Some((x as u32, 0, width as u32, src.1))
    } else {
        // Source is taller: trim top and bottom
        let height = sw * dh / dw;
        let y = (sh - height) / 2;
        Some((0, y as u32, src.0, height as u32))
    }
}

/// Final output size for a source resized toward `dst`.
///
/// Sources at least as large as the target get exactly `dst`. Smaller
/// sources are stretched to `dst` unless `keep_aspect_ratio` is set, in
/// which case the height follows the source ratio.
pub fn target_size(src: (u32, u32), dst: (u32, u32), keep_aspect_ratio: bool) -> (u32, u32) {
    let large_enough = src.0 >= dst.0 && src.1 >= dst.1;
    if large_enough || !keep_aspect_ratio || src.0 == 0 {
        return dst;
    }
    let height = u64::from(dst.0) * u64::from(src.1) / u64::from(src.0);
    (dst.0, height.max(1) as u32)
}

/// Crop and resize an image for one thumbnail size.
pub fn resize_thumb(img: &DynamicImage, dst: (u32, u32), keep_aspect_ratio: bool) -> DynamicImage {
    let src = (img.width(), img.height());
    let (width, height) = target_size(src, dst, keep_aspect_ratio);
    match crop_rect(src, dst) {
        Some((x, y, w, h)) => img
            .crop_imm(x, y, w, h)
            .resize_exact(width, height, FilterType::Lanczos3),
        None => img.resize_exact(width, height, FilterType::Lanczos3),
    }
}
