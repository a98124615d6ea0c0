// Filter pipeline: grayscale photo -> binary stencil (0/255).
// Visual expectation: a crisp black/white poster of the photo; higher
// simplify/median values give blobbier, rounder shapes; isolate keeps only
// the biggest subject (or only what surrounds it).
//
// Pure functions only. Nothing here touches the masks or the window.
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::drawing::draw_polygon_mut;
use imageproc::filter::median_filter;
use imageproc::point::Point as ContourPoint;

use crate::types::{FilterParameters, Isolate};

/// "Set" value of every binary buffer in the crate.
pub const ON: u8 = 255;

/// Run the whole pipeline. Steps are applied in a fixed order, each only when enabled.
pub fn render(gray: &GrayImage, params: &FilterParameters) -> GrayImage {
    // 1) Binary threshold on the source gray levels.
    let mut bw = threshold(gray, params.threshold);

    // 2) Simplify: remove speckle (open), then fill small gaps (close).
    if params.simplify > 0 {
        let kernel = EllipseKernel::new(2 * params.simplify + 1);
        bw = close(&open(&bw, &kernel), &kernel);
    }

    // 3) Median: rounds contour corners.
    if params.median > 0 {
        bw = median_filter(&bw, params.median, params.median);
    }

    // 4) Isolation against the largest external contour.
    match params.isolate {
        Isolate::Off => {}
        Isolate::Subject => isolate_largest(&mut bw, true),
        Isolate::Background => isolate_largest(&mut bw, false),
    }

    bw
}

/// 255 where gray > t, else 0 (strictly greater, so t = 255 yields an all-black image).
pub fn threshold(gray: &GrayImage, t: u8) -> GrayImage {
    let mut out = gray.clone();
    for px in out.pixels_mut() {
        px.0[0] = if px.0[0] > t { ON } else { 0 };
    }
    out
}

/* ---------------------------- morphology ---------------------------- */

/// One row of the structuring element: offset `dy` from the anchor, covering `-reach..=reach` in x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KernelRow {
    dy: i32,
    reach: i32,
}

/// Elliptic structuring element of odd size `k`, rasterised the way the
/// classic `getStructuringElement(ELLIPSE)` does it: row `dy` spans
/// `round(sqrt(r² - dy²))` pixels either side of the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EllipseKernel {
    rows: Vec<KernelRow>,
}

impl EllipseKernel {
    pub fn new(size: u32) -> Self {
        let r = (size / 2) as i32;
        let rows = (-r..=r)
            .map(|dy| {
                let reach = (((r * r - dy * dy) as f64).sqrt()).round() as i32;
                KernelRow { dy, reach: reach.min(r) }
            })
            .collect();
        Self { rows }
    }

    /// Kernel footprint as a (2r+1)² grid of 0/1, row-major.
    #[cfg(test)]
    pub fn footprint(&self) -> Vec<Vec<u8>> {
        let r = self.rows.len() as i32 / 2;
        self.rows
            .iter()
            .map(|row| (-r..=r).map(|dx| u8::from(dx.abs() <= row.reach)).collect())
            .collect()
    }
}

/// Per-row prefix counts of set pixels, so "how many set pixels in row y, [x0,x1)" is O(1).
/// Turns an O(k²) kernel scan into O(k) per pixel.
struct RowCounts {
    stride: usize,
    counts: Vec<u32>,
}

impl RowCounts {
    fn new(img: &GrayImage) -> Self {
        let (w, h) = (img.width() as usize, img.height() as usize);
        let stride = w + 1;
        let mut counts = vec![0u32; stride * h];
        for (y, row) in img.rows().enumerate() {
            let base = y * stride;
            for (x, px) in row.enumerate() {
                counts[base + x + 1] = counts[base + x] + u32::from(px.0[0] != 0);
            }
        }
        Self { stride, counts }
    }

    #[inline]
    fn set_in(&self, y: usize, x0: usize, x1: usize) -> u32 {
        let base = y * self.stride;
        self.counts[base + x1] - self.counts[base + x0]
    }
}

#[derive(Clone, Copy)]
enum Morph {
    Erode,
    Dilate,
}

// Pixels outside the image never influence the result (erosion treats them
// as set, dilation as unset), so borders neither shrink nor grow shapes.
fn morph(img: &GrayImage, kernel: &EllipseKernel, op: Morph) -> GrayImage {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let counts = RowCounts::new(img);
    let mut out = GrayImage::new(img.width(), img.height());

    for y in 0..h {
        for x in 0..w {
            let mut rows = kernel.rows.iter().filter_map(|row| {
                let sy = y + row.dy;
                if sy < 0 || sy >= h {
                    return None;
                }
                let x0 = (x - row.reach).max(0) as usize;
                let x1 = (x + row.reach + 1).min(w) as usize;
                Some((counts.set_in(sy as usize, x0, x1), (x1 - x0) as u32))
            });
            let set = match op {
                Morph::Erode => rows.all(|(n, len)| n == len),
                Morph::Dilate => rows.any(|(n, _)| n > 0),
            };
            if set {
                out.put_pixel(x as u32, y as u32, Luma([ON]));
            }
        }
    }
    out
}

pub fn erode(img: &GrayImage, kernel: &EllipseKernel) -> GrayImage {
    morph(img, kernel, Morph::Erode)
}

pub fn dilate(img: &GrayImage, kernel: &EllipseKernel) -> GrayImage {
    morph(img, kernel, Morph::Dilate)
}

/// Erode then dilate: drops specks smaller than the kernel.
pub fn open(img: &GrayImage, kernel: &EllipseKernel) -> GrayImage {
    dilate(&erode(img, kernel), kernel)
}

/// Dilate then erode: fills gaps smaller than the kernel.
pub fn close(img: &GrayImage, kernel: &EllipseKernel) -> GrayImage {
    erode(&dilate(img, kernel), kernel)
}

/* ----------------------------- isolation ----------------------------- */

/// Keep (`keep_subject`) or drop the region enclosed by the largest external contour.
/// No contour at all leaves `bw` untouched.
fn isolate_largest(bw: &mut GrayImage, keep_subject: bool) {
    let Some(subject) = largest_subject_mask(bw) else {
        return;
    };
    for (px, m) in bw.pixels_mut().zip(subject.pixels()) {
        let inside = m.0[0] == ON;
        if inside != keep_subject {
            px.0[0] = 0;
        }
    }
}

/// Filled mask of the external contour with the largest enclosed area.
/// Holes inside that contour are part of the mask. Ties go to the first contour found.
pub fn largest_subject_mask(bw: &GrayImage) -> Option<GrayImage> {
    let contours: Vec<Contour<i32>> = find_contours(bw);

    let mut best: Option<(f64, &Contour<i32>)> = None;
    for contour in contours
        .iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
    {
        let area = polygon_area(&contour.points);
        if best.is_none_or(|(a, _)| area > a) {
            best = Some((area, contour));
        }
    }

    let (_, contour) = best?;
    let mut mask = GrayImage::new(bw.width(), bw.height());
    fill_contour(&mut mask, &contour.points);
    Some(mask)
}

/// Shoelace area of a closed polygon.
fn polygon_area(points: &[ContourPoint<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
        .sum();
    twice.abs() as f64 / 2.0
}

/// Fill the polygon and its outline. The outline pass matters for one-pixel-wide
/// parts, which a scanline fill alone would miss.
fn fill_contour(mask: &mut GrayImage, points: &[ContourPoint<i32>]) {
    let mut poly = points.to_vec();
    poly.dedup();
    // draw_polygon_mut rejects a closing point equal to the first one
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() >= 3 {
        draw_polygon_mut(mask, &poly, Luma([ON]));
    }

    let (w, h) = (mask.width() as i32, mask.height() as i32);
    for p in points {
        if p.x >= 0 && p.y >= 0 && p.x < w && p.y < h {
            mask.put_pixel(p.x as u32, p.y as u32, Luma([ON]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(w: u32, h: u32, v: u8) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([v]))
    }

    fn fill_rect(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, v: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([v]));
            }
        }
    }

    fn params(threshold: u8, simplify: u32, median: u32, isolate: Isolate) -> FilterParameters {
        FilterParameters { threshold, simplify, median, isolate }
    }

    #[test]
    fn threshold_is_strictly_greater() {
        let gray = filled(4, 4, 128);
        assert!(threshold(&gray, 127).pixels().all(|p| p.0[0] == ON));
        assert!(threshold(&gray, 128).pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn ellipse_kernel_shapes() {
        assert_eq!(EllipseKernel::new(1).footprint(), vec![vec![1]]);
        assert_eq!(
            EllipseKernel::new(3).footprint(),
            vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 1, 0]]
        );
        assert_eq!(
            EllipseKernel::new(5).footprint(),
            vec![
                vec![0, 0, 1, 0, 0],
                vec![1, 1, 1, 1, 1],
                vec![1, 1, 1, 1, 1],
                vec![1, 1, 1, 1, 1],
                vec![0, 0, 1, 0, 0],
            ]
        );
    }

    #[test]
    fn zero_simplify_and_median_are_noops() {
        let mut gray = filled(32, 32, 10);
        fill_rect(&mut gray, 5, 5, 9, 9, 200);
        gray.put_pixel(20, 20, Luma([255]));
        let out = render(&gray, &params(100, 0, 0, Isolate::Off));
        assert_eq!(out, threshold(&gray, 100));
    }

    #[test]
    fn uniform_images_survive_every_stage() {
        for v in [0u8, 255] {
            let gray = filled(24, 24, v);
            let expected = if v == 255 { ON } else { 0 };
            for iso in [Isolate::Off, Isolate::Subject] {
                let out = render(&gray, &params(100, 3, 2, iso));
                assert!(out.pixels().all(|p| p.0[0] == expected), "v={v} iso={iso:?}");
            }
        }
    }

    #[test]
    fn opening_removes_speck() {
        let mut gray = filled(16, 16, 0);
        gray.put_pixel(8, 8, Luma([255]));
        let out = render(&gray, &params(100, 1, 0, Isolate::Off));
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn closing_fills_pinhole() {
        let mut gray = filled(16, 16, 255);
        gray.put_pixel(8, 8, Luma([0]));
        let out = render(&gray, &params(100, 1, 0, Isolate::Off));
        assert!(out.pixels().all(|p| p.0[0] == ON));
    }

    #[test]
    fn erosion_ignores_image_border() {
        let img = filled(8, 8, ON);
        let k = EllipseKernel::new(5);
        assert_eq!(erode(&img, &k), img);
        let empty = filled(8, 8, 0);
        assert_eq!(dilate(&empty, &k), empty);
    }

    #[test]
    fn median_removes_salt() {
        let mut gray = filled(16, 16, 0);
        gray.put_pixel(8, 8, Luma([255]));
        let out = render(&gray, &params(100, 0, 1, Isolate::Off));
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }

    fn two_squares() -> GrayImage {
        let mut gray = filled(64, 64, 0);
        fill_rect(&mut gray, 10, 10, 30, 30, 255); // large subject
        fill_rect(&mut gray, 45, 45, 50, 50, 255); // small speck
        gray
    }

    #[test]
    fn isolate_subject_keeps_largest_only() {
        let out = render(&two_squares(), &params(100, 0, 0, Isolate::Subject));
        for (x, y) in [(10, 10), (29, 29), (20, 20), (10, 29)] {
            assert_eq!(out.get_pixel(x, y).0[0], ON, "({x},{y})");
        }
        assert_eq!(out.get_pixel(47, 47).0[0], 0);
        assert_eq!(out.get_pixel(45, 45).0[0], 0);
    }

    #[test]
    fn isolate_background_drops_largest() {
        let out = render(&two_squares(), &params(100, 0, 0, Isolate::Background));
        assert_eq!(out.get_pixel(20, 20).0[0], 0);
        assert_eq!(out.get_pixel(10, 10).0[0], 0);
        assert_eq!(out.get_pixel(47, 47).0[0], ON);
    }

    #[test]
    fn isolate_subject_keeps_holes_empty() {
        let mut gray = filled(64, 64, 0);
        fill_rect(&mut gray, 10, 10, 40, 40, 255);
        fill_rect(&mut gray, 20, 20, 30, 30, 0);
        let out = render(&gray, &params(100, 0, 0, Isolate::Subject));
        assert_eq!(out.get_pixel(25, 25).0[0], 0);
        assert_eq!(out.get_pixel(12, 12).0[0], ON);
    }

    #[test]
    fn isolate_without_contours_is_noop() {
        let gray = filled(16, 16, 0);
        assert!(largest_subject_mask(&threshold(&gray, 100)).is_none());
        for iso in [Isolate::Subject, Isolate::Background] {
            let out = render(&gray, &params(100, 0, 0, iso));
            assert!(out.pixels().all(|p| p.0[0] == 0));
        }
    }

    #[test]
    fn render_is_deterministic() {
        let gray = two_squares();
        let p = params(90, 2, 1, Isolate::Subject);
        assert_eq!(render(&gray, &p), render(&gray, &p));
    }

    #[test]
    fn shoelace_area_of_square_outline() {
        let pts: Vec<ContourPoint<i32>> = [(0, 0), (4, 0), (4, 4), (0, 4)]
            .into_iter()
            .map(|(x, y)| ContourPoint::new(x, y))
            .collect();
        assert_eq!(polygon_area(&pts), 16.0);
        assert_eq!(polygon_area(&pts[..2]), 0.0);
    }
}
