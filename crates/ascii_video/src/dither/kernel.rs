/// Error diffusion weights as `(dx, dy, weight)` over a common divisor.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub entries: &'static [(i32, usize, u8)],
    pub divisor: u8,
    /// Rows below the current one that receive error.
    pub max_dy: usize,
}

/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// Propagates 6/8 of the error.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[(1, 0, 1), (2, 0, 1), (-1, 1, 1), (0, 1, 1), (1, 1, 1), (0, 2, 1)],
    divisor: 8,
    max_dy: 2,
};

/// Plain nearest-color quantization.
pub const NONE: Kernel = Kernel { entries: &[], divisor: 1, max_dy: 0 };

impl Kernel {
    /// Spread `error` from cell `x` of the current row into `buffer`.
    pub fn diffuse(&self, buffer: &mut ErrorBuffer, x: usize, error: [f32; 3]) {
        let divisor = f32::from(self.divisor);
        for &(dx, dy, weight) in self.entries {
            let Some(nx) = x.checked_add_signed(dx as isize) else {
                continue;
            };
            let share = f32::from(weight) / divisor;
            buffer.add_error(nx, dy, error.map(|channel| channel * share));
        }
    }
}

/// Sliding window of pending error, one row per kernel depth.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, depth: usize) -> Self {
        Self { rows: (0..depth.max(1)).map(|_| vec![[0.0; 3]; width]).collect(), width }
    }

    #[inline]
    pub fn accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Out-of-range targets are dropped.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            let cell = &mut self.rows[row_offset][x];
            for channel in 0..3 {
                cell[channel] += error[channel];
            }
        }
    }

    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }

    /// Whether this buffer already matches a grid `width` wide and `depth` rows deep.
    pub fn fits(&self, width: usize, depth: usize) -> bool {
        self.width == width && self.rows.len() == depth.max(1)
    }

    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.fill([0.0; 3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floyd_steinberg_spreads_all_error() {
        let mut buffer = ErrorBuffer::new(3, FLOYD_STEINBERG.max_dy + 1);
        FLOYD_STEINBERG.diffuse(&mut buffer, 1, [1.6, 0.0, 0.0]);

        assert!((buffer.accumulated(2)[0] - 0.7).abs() < 1e-6);
        buffer.advance_row();
        let below: f32 = (0..3).map(|x| buffer.accumulated(x)[0]).sum();
        assert!((below - 0.9).abs() < 1e-6);
    }

    #[test]
    fn error_past_the_edges_is_dropped() {
        let mut buffer = ErrorBuffer::new(2, ATKINSON.max_dy + 1);
        ATKINSON.diffuse(&mut buffer, 0, [0.8; 3]);
        // (2, 0) falls off the right edge; (-1, 1) off the left.
        assert!((buffer.accumulated(1)[1] - 0.1).abs() < 1e-6);
        buffer.advance_row();
        assert!((buffer.accumulated(0)[2] - 0.1).abs() < 1e-6);
        assert!((buffer.accumulated(1)[2] - 0.1).abs() < 1e-6);
        buffer.reset();
        assert_eq!(buffer.accumulated(0), [0.0; 3]);
        assert!(buffer.fits(2, 3));
        assert!(!buffer.fits(2, 2));
    }
}
