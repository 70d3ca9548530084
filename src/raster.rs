//! The dense RGB pixel buffer the core consumes, and its three out-of-bounds
//! access policies (spec section 7 / design note on the NEAREST "bug").

use crate::color::Rgb;
use crate::error::{VectorizeError, VectorizeResult};

/// How to resolve a pixel read whose coordinate falls outside `[0, width) x
/// [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBoundsStrategy {
    /// Clamp the coordinate to the nearest in-bounds value and read that pixel.
    Nearest,
    /// Return black (`[0, 0, 0]`) without touching the buffer.
    Zero,
    /// Return an [`VectorizeError::OutOfBounds`] error.
    Panic,
}

/// A dense, row-major RGB pixel grid: `row 0` is the top row, `x` increases
/// rightward, `y` increases downward.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<Rgb>,
}

impl PixelBuffer {
    /// Build a pixel buffer from a row-major `height x width` grid of RGB
    /// triples, validating dimensions and buffer length.
    pub fn new(width: u32, height: u32, rows: &[Vec<Rgb>]) -> VectorizeResult<Self> {
        if width == 0 || height == 0 {
            return Err(VectorizeError::invalid_input(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if rows.len() != height as usize {
            return Err(VectorizeError::invalid_input(format!(
                "expected {height} rows, got {}",
                rows.len()
            )));
        }
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width as usize {
                return Err(VectorizeError::invalid_input(format!(
                    "row {y} has {} pixels, expected {width}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn read(&self, x: u32, y: u32) -> Rgb {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Read a pixel applying the given out-of-bounds policy.
    ///
    /// The similarity-check path (stage 1) uses [`OutOfBoundsStrategy::Zero`];
    /// explicit coordinate iteration uses [`OutOfBoundsStrategy::Panic`]
    /// (surfaced as [`VectorizeError::OutOfBounds`] rather than an actual
    /// `panic!`, since this core never aborts the process on bad input).
    pub fn get(&self, x: i64, y: i64, strategy: OutOfBoundsStrategy) -> VectorizeResult<Rgb> {
        if self.in_bounds(x, y) {
            return Ok(self.read(x as u32, y as u32));
        }
        match strategy {
            OutOfBoundsStrategy::Nearest => {
                let cx = x.clamp(0, self.width as i64 - 1) as u32;
                let cy = y.clamp(0, self.height as i64 - 1) as u32;
                Ok(self.read(cx, cy))
            }
            OutOfBoundsStrategy::Zero => Ok([0, 0, 0]),
            OutOfBoundsStrategy::Panic => Err(VectorizeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            }),
        }
    }

    /// Convenience accessor for the common, definitely-in-bounds case.
    pub fn get_in_bounds(&self, x: u32, y: u32) -> Rgb {
        self.read(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> PixelBuffer {
        PixelBuffer::new(2, 1, &[vec![[1, 2, 3], [4, 5, 6]]]).unwrap()
    }

    #[test]
    fn rejects_zero_dimension() {
        assert!(PixelBuffer::new(0, 1, &[]).is_err());
        assert!(PixelBuffer::new(1, 0, &[]).is_err());
    }

    #[test]
    fn rejects_mismatched_row_count() {
        assert!(PixelBuffer::new(2, 2, &[vec![[0, 0, 0], [0, 0, 0]]]).is_err());
    }

    #[test]
    fn zero_strategy_returns_black_out_of_bounds() {
        let buf = tiny();
        assert_eq!(
            buf.get(-1, 0, OutOfBoundsStrategy::Zero).unwrap(),
            [0, 0, 0]
        );
        assert_eq!(
            buf.get(5, 0, OutOfBoundsStrategy::Zero).unwrap(),
            [0, 0, 0]
        );
    }

    #[test]
    fn panic_strategy_errors_out_of_bounds() {
        let buf = tiny();
        assert!(buf.get(-1, 0, OutOfBoundsStrategy::Panic).is_err());
        assert!(buf.get(0, 0, OutOfBoundsStrategy::Panic).is_ok());
    }

    #[test]
    fn nearest_strategy_clamps_the_coordinate_actually_used() {
        let buf = tiny();
        // y out of bounds: only y should be clamped, not x substituted for y.
        assert_eq!(
            buf.get(1, 99, OutOfBoundsStrategy::Nearest).unwrap(),
            [4, 5, 6]
        );
        assert_eq!(
            buf.get(-3, 0, OutOfBoundsStrategy::Nearest).unwrap(),
            [1, 2, 3]
        );
    }
}
