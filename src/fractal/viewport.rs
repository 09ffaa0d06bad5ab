use ndarray::ArrayView2;

use crate::{
    error::{validation_error, Result},
    fractal::escape::escape_time,
};

/// Rectangle of the complex plane mapped onto a pixel grid.
///
/// Pixel `(row j, col i)` of a `width × height` grid maps to
/// `(x0 + i·dx, y0 + j·dy)` with `dx = (x1 - x0) / width` and
/// `dy = (y1 - y0) / height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Viewport {
    /// Creates a viewport, rejecting empty or inverted rectangles.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Result<Self> {
        // NaN corners fail both comparisons.
        let ordered = x1 > x0 && y1 > y0;
        if !ordered {
            return Err(validation_error(format!(
                "viewport must satisfy x1 > x0 and y1 > y0, got ({x0}, {y0}, {x1}, {y1})"
            )));
        }

        Ok(Self { x0, y0, x1, y1 })
    }

    /// Per-pixel step `(dx, dy)` for a grid of the given size.
    #[inline(always)]
    pub fn step(&self, width: usize, height: usize) -> (f32, f32) {
        (
            (self.x1 - self.x0) / width as f32,
            (self.y1 - self.y0) / height as f32,
        )
    }

    /// Complex coordinate of pixel `(row, col)`.
    #[inline(always)]
    pub fn point(&self, row: usize, col: usize, width: usize, height: usize) -> (f32, f32) {
        let (dx, dy) = self.step(width, height);
        (self.x0 + col as f32 * dx, self.y0 + row as f32 * dy)
    }
}

/// Renders rows `[start_row, start_row + row_count)` into `buffer`.
///
/// `buffer` is the whole row-major image; only indices
/// `start_row * width .. (start_row + row_count) * width` are written.
///
/// # Panics
///
/// Panics if `buffer` is too short to hold the requested rows.
pub fn render_rows(
    viewport: &Viewport,
    width: usize,
    height: usize,
    start_row: usize,
    row_count: usize,
    budget: u32,
    buffer: &mut [u32],
) {
    let slab = &mut buffer[start_row * width..(start_row + row_count) * width];
    render_slab(viewport, width, height, start_row, budget, slab);
}

/// Renders into a slab that starts at `start_row`; the slab holds whole rows only.
#[inline(always)]
pub(crate) fn render_slab(
    viewport: &Viewport,
    width: usize,
    height: usize,
    start_row: usize,
    budget: u32,
    slab: &mut [u32],
) {
    debug_assert!(width > 0 && height > 0, "grid must not be empty");
    debug_assert_eq!(slab.len() % width, 0, "slab must hold whole rows");

    let (dx, dy) = viewport.step(width, height);

    for (offset, row) in slab.chunks_exact_mut(width).enumerate() {
        let y = viewport.y0 + (start_row + offset) as f32 * dy;

        for (col, pixel) in row.iter_mut().enumerate() {
            let x = viewport.x0 + col as f32 * dx;
            *pixel = escape_time(x, y, budget);
        }
    }
}

/// Views a flat iteration buffer as a `(height, width)` grid.
pub fn grid_view(buffer: &[u32], width: usize, height: usize) -> Result<ArrayView2<'_, u32>> {
    ArrayView2::from_shape((height, width), buffer).map_err(|err| {
        validation_error(format!(
            "buffer of {} elements cannot be viewed as {height}x{width}: {err}",
            buffer.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_view() -> Viewport {
        Viewport::new(-1.0, -1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_viewport_rejects_inverted_rectangles() {
        assert!(Viewport::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, 1.0, -1.0).is_err());
        assert!(Viewport::new(0.0, 0.0, 0.0, 1.0).is_err());
        assert!(Viewport::new(f32::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_point_mapping() {
        let view = unit_view();
        assert_eq!(view.step(10, 10), (0.2, 0.2));
        assert_eq!(view.point(0, 0, 10, 10), (-1.0, -1.0));

        let (x, y) = view.point(5, 5, 10, 10);
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
    }

    #[test]
    fn test_render_rows_writes_only_its_rows() {
        let view = unit_view();
        let (width, height) = (8, 6);
        let mut buffer = vec![u32::MAX; width * height];

        render_rows(&view, width, height, 2, 3, 32, &mut buffer);

        for (index, &value) in buffer.iter().enumerate() {
            let row = index / width;
            if (2..5).contains(&row) {
                assert!(value <= 32, "row {row} was not rendered");
            } else {
                assert_eq!(value, u32::MAX, "row {row} was touched");
            }
        }
    }

    #[test]
    fn test_render_rows_matches_escape_time() {
        let view = Viewport::new(-2.0, -1.0, 1.0, 1.0).unwrap();
        let (width, height) = (12, 9);
        let mut buffer = vec![0; width * height];

        render_rows(&view, width, height, 0, height, 64, &mut buffer);

        let (dx, dy) = view.step(width, height);
        for row in 0..height {
            for col in 0..width {
                let expected =
                    escape_time(view.x0 + col as f32 * dx, view.y0 + row as f32 * dy, 64);
                assert_eq!(buffer[row * width + col], expected);
            }
        }
    }

    #[test]
    fn test_grid_view_shape() {
        let buffer: Vec<u32> = (0..12).collect();
        let grid = grid_view(&buffer, 4, 3).unwrap();
        assert_eq!(grid.dim(), (3, 4));
        assert_eq!(grid[[2, 1]], 9);

        assert!(grid_view(&buffer, 5, 3).is_err());
    }
}
