use crate::host::{LineRenderer, Material};
use crossterm::style::Color;

/// One character cell of the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        color: Color::Reset,
    };
}

/// Maps world X/Y onto cell coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Cell column of the world origin
    pub origin_col: f64,
    /// Cell row of the world origin
    pub origin_row: f64,
    /// Rows per world unit; columns get twice as many
    pub cells_per_unit: f64,
}

impl ViewTransform {
    /// Transform centered on a canvas of the given size
    pub fn centered(width: usize, height: usize, zoom: f64) -> Self {
        ViewTransform {
            origin_col: width as f64 / 2.0,
            origin_row: height as f64 / 2.0,
            cells_per_unit: height as f64 / 8.0 * zoom,
        }
    }

    /// World point to (column, row); rows grow downwards
    pub fn to_cell(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.origin_col + x * self.cells_per_unit * 2.0,
            self.origin_row - y * self.cells_per_unit,
        )
    }
}

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Character-cell render target for line primitives
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    zoom: f64,
    transform: ViewTransform,
    saved: Vec<ViewTransform>,
    pen: Cell,
    pending: Option<[f64; 3]>,
    drawing: bool,
    /// Segments dropped because an endpoint was not finite
    pub skipped_segments: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
            zoom: 1.0,
            transform: ViewTransform::centered(width, height, 1.0),
            saved: Vec::new(),
            pen: Cell::BLANK,
            pending: None,
            drawing: false,
            skipped_segments: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[cfg(test)]
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Resizes the canvas, clearing it and re-centering the view
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::BLANK; width * height];
        self.transform = ViewTransform::centered(width, height, self.zoom);
        self.saved.clear();
    }

    /// Multiplies the zoom level, clamped to `MIN_ZOOM..=MAX_ZOOM`
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.transform = ViewTransform::centered(self.width, self.height, self.zoom);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
        self.transform = ViewTransform::centered(self.width, self.height, self.zoom);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.skipped_segments = 0;
    }

    #[cfg(test)]
    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        if col < self.width && row < self.height {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    /// Rasterizes a world-space segment with the current pen and transform
    pub fn draw_segment(&mut self, a: [f64; 3], b: [f64; 3]) {
        let (x0, y0) = self.transform.to_cell(a[0], a[1]);
        let (x1, y1) = self.transform.to_cell(b[0], b[1]);
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            self.skipped_segments += 1;
            log::trace!("skipping segment with non-finite endpoint: {a:?} -> {b:?}");
            return;
        }

        let bounds = (
            -0.5,
            -0.5,
            self.width as f64 - 0.5,
            self.height as f64 - 0.5,
        );
        if let Some((x0, y0, x1, y1)) = clip_segment(x0, y0, x1, y1, bounds) {
            let pen = self.pen;
            draw_line(x0, y0, x1, y1, &mut self.cells, self.width, self.height, pen);
        }
    }
}

impl LineRenderer for Canvas {
    fn set_pass(&mut self, material: &Material) {
        self.pen = Cell {
            glyph: material.glyph,
            color: material.color,
        };
    }

    fn push_matrix(&mut self) {
        self.saved.push(self.transform);
    }

    fn pop_matrix(&mut self) {
        if let Some(transform) = self.saved.pop() {
            self.transform = transform;
        }
    }

    fn begin_lines(&mut self) {
        self.drawing = true;
        self.pending = None;
    }

    fn vertex(&mut self, x: f64, y: f64, z: f64) {
        if !self.drawing {
            return;
        }
        match self.pending.take() {
            None => self.pending = Some([x, y, z]),
            Some(start) => self.draw_segment(start, [x, y, z]),
        }
    }

    fn end(&mut self) {
        self.drawing = false;
        self.pending = None;
    }
}

/// Clips a segment to `(min_x, min_y, max_x, max_y)` (Liang-Barsky)
pub fn clip_segment(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
) -> Option<(f64, f64, f64, f64)> {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, x0 - min_x),
        (dx, max_x - x0),
        (-dy, y0 - min_y),
        (dy, max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }
    Some((x0 + t0 * dx, y0 + t0 * dy, x0 + t1 * dx, y0 + t1 * dy))
}

/// Draws a line between two cell positions using Bresenham's algorithm
pub fn draw_line(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    cells: &mut [Cell],
    width: usize,
    height: usize,
    pen: Cell,
) {
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        if x0 >= 0 && x0 < width as isize && y0 >= 0 && y0 < height as isize {
            cells[y0 as usize * width + x0 as usize] = pen;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
