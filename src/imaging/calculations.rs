//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the size of an image fitted into a `limit × limit` box.
///
/// The aspect ratio is preserved and the longer edge ends up equal to
/// `limit`. Images that already fit are returned unchanged; nothing is ever
/// upscaled. Neither edge drops below 1px.
///
/// # Examples
/// ```
/// # use gmb::imaging::calculate_fit_dimensions;
/// // Landscape 4000x3000 into 800 → 800x600
/// assert_eq!(calculate_fit_dimensions((4000, 3000), 800), (800, 600));
///
/// // Already small enough → untouched
/// assert_eq!(calculate_fit_dimensions((640, 480), 800), (640, 480));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), limit: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w <= limit && src_h <= limit {
        return source;
    }
    if src_w == 0 || src_h == 0 {
        return source;
    }

    let src_aspect = src_w as f64 / src_h as f64;

    if src_w >= src_h {
        // Landscape or square: width hits the box
        let h = (limit as f64 / src_aspect).round() as u32;
        (limit, h.max(1))
    } else {
        // Portrait: height hits the box
        let w = (limit as f64 * src_aspect).round() as u32;
        (w.max(1), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_fits_width() {
        assert_eq!(calculate_fit_dimensions((4000, 3000), 800), (800, 600));
    }

    #[test]
    fn portrait_fits_height() {
        assert_eq!(calculate_fit_dimensions((3000, 4000), 800), (600, 800));
    }

    #[test]
    fn square_fits_both() {
        assert_eq!(calculate_fit_dimensions((2000, 2000), 1280), (1280, 1280));
    }

    #[test]
    fn no_upscale_when_smaller() {
        assert_eq!(calculate_fit_dimensions((500, 300), 900), (500, 300));
    }

    #[test]
    fn exact_fit_untouched() {
        assert_eq!(calculate_fit_dimensions((800, 800), 800), (800, 800));
    }

    #[test]
    fn only_one_edge_over_limit() {
        // 1000x200 into 800: width over, height under
        assert_eq!(calculate_fit_dimensions((1000, 200), 800), (800, 160));
    }

    #[test]
    fn rounding_to_nearest() {
        // 1000 / 1.5 = 666.67 → 667
        assert_eq!(calculate_fit_dimensions((3000, 2000), 1000), (1000, 667));
    }

    #[test]
    fn extreme_aspect_keeps_one_pixel() {
        assert_eq!(calculate_fit_dimensions((10000, 1), 100), (100, 1));
        assert_eq!(calculate_fit_dimensions((1, 10000), 100), (1, 100));
    }
}
