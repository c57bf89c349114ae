//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Clamp dimensions so the longer side does not exceed `max_dim`.
///
/// Aspect ratio is preserved to within rounding; dimensions already inside
/// the bound are returned unchanged. The shorter side never rounds below 1.
///
/// # Examples
/// ```
/// # use gardenplot::imaging::fit_within;
/// // 3200x2400 landscape clamped to 1600 → 1600x1200
/// assert_eq!(fit_within((3200, 2400), 1600), (1600, 1200));
///
/// // Already small enough → identity
/// assert_eq!(fit_within((800, 600), 1600), (800, 600));
/// ```
pub fn fit_within(dims: (u32, u32), max_dim: u32) -> (u32, u32) {
    let (w, h) = dims;
    let longer = w.max(h);
    if longer <= max_dim || longer == 0 {
        return (w, h);
    }

    let scale = max_dim as f64 / longer as f64;
    if w >= h {
        (max_dim, ((h as f64 * scale).round() as u32).max(1))
    } else {
        (((w as f64 * scale).round() as u32).max(1), max_dim)
    }
}
