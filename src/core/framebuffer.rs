use nalgebra::Vector3;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Represents a 2D buffer containing color and depth information.
/// Thread-safe for parallel rendering using atomic depth and striped locking for color.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub sample_count: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,

    /// Color buffer wrapped in UnsafeCell to allow interior mutability.
    /// Safety is guaranteed by `locks` and depth testing.
    pub color_buffer: UnsafeCell<Vec<Vector3<f32>>>,

    /// Depth buffer stored as atomic bits of f32.
    pub depth_buffer: Vec<AtomicU32>,

    /// Striped locks to protect color writes.
    /// We map pixel coordinates to a lock index to reduce contention.
    locks: Vec<Mutex<()>>,
}

// We implement Sync because we manage thread safety manually via Atomics and Locks.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        let buffer_width = width * sample_count;
        let buffer_height = height * sample_count;
        let size = buffer_width * buffer_height;

        let inf_bits = f32::INFINITY.to_bits();
        let depth_buffer = (0..size).map(|_| AtomicU32::new(inf_bits)).collect();

        // A pool of locks keeps memory overhead low compared to one lock per pixel.
        let locks = (0..1024).map(|_| Mutex::new(())).collect();

        Self {
            width,
            height,
            sample_count,
            buffer_width,
            buffer_height,
            color_buffer: UnsafeCell::new(vec![Vector3::zeros(); size]),
            depth_buffer,
            locks,
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.buffer_width && y < self.buffer_height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.buffer_width + x
    }

    /// Resets every sample to a solid color and the given depth.
    pub fn clear(&mut self, color: Vector3<f32>, depth: f32) {
        self.color_buffer.get_mut().fill(color);
        self.reset_depth(depth);
    }

    /// Fills the color buffer with a vertical gradient (top row = `top`).
    pub fn clear_gradient(&mut self, top: Vector3<f32>, bottom: Vector3<f32>, depth: f32) {
        let buffer_width = self.buffer_width;
        let rows = self.buffer_height.max(2) - 1;
        for (y, row) in self
            .color_buffer
            .get_mut()
            .chunks_mut(buffer_width)
            .enumerate()
        {
            let t = y as f32 / rows as f32;
            row.fill(top.lerp(&bottom, t));
        }
        self.reset_depth(depth);
    }

    fn reset_depth(&self, depth: f32) {
        let bits = depth.to_bits();
        for d in &self.depth_buffer {
            d.store(bits, Ordering::Relaxed);
        }
    }

    /// Thread-safe depth test and update.
    /// Returns true if the new depth is closer than the existing value.
    /// If true, it updates the depth buffer atomically.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) || new_depth.is_nan() {
            return false;
        }
        let idx = self.index(x, y);
        let new_bits = new_depth.to_bits();
        let depth_atomic = &self.depth_buffer[idx];

        let mut current_bits = depth_atomic.load(Ordering::Relaxed);
        loop {
            let current_depth = f32::from_bits(current_bits);
            if new_depth >= current_depth {
                return false;
            }

            match depth_atomic.compare_exchange_weak(
                current_bits,
                new_bits,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated_bits) => current_bits = updated_bits,
            }
        }
    }

    /// Depth test without writing. Used by additive passes (points, glows)
    /// that must be occluded but must not occlude.
    #[inline]
    pub fn depth_test(&self, x: usize, y: usize, depth: f32) -> bool {
        if !self.in_bounds(x, y) || depth.is_nan() {
            return false;
        }
        let current = f32::from_bits(self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed));
        depth < current
    }

    /// Runs `f` on the stored color of one sample while holding its stripe lock.
    #[inline]
    fn with_pixel<F: FnOnce(&mut Vector3<f32>)>(&self, x: usize, y: usize, f: F) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        let lock_idx = idx % self.locks.len();
        let _guard = match self.locks[lock_idx].lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Unsafe access is safe because we hold the lock for this "stripe" of pixels
        unsafe {
            let buffer = &mut *self.color_buffer.get();
            f(&mut buffer[idx]);
        }
    }

    /// Thread-safe pixel write.
    /// Should only be called AFTER depth_test_and_update returns true.
    #[inline]
    pub fn set_pixel_safe(&self, x: usize, y: usize, color: Vector3<f32>) {
        self.with_pixel(x, y, |dst| *dst = color);
    }

    /// Source-over blend: `dst = src * alpha + dst * (1 - alpha)`.
    #[inline]
    pub fn blend_pixel_safe(&self, x: usize, y: usize, color: Vector3<f32>, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        self.with_pixel(x, y, |dst| *dst = color * alpha + *dst * (1.0 - alpha));
    }

    /// Additive blend: `dst += src`.
    #[inline]
    pub fn add_pixel_safe(&self, x: usize, y: usize, color: Vector3<f32>) {
        self.with_pixel(x, y, |dst| *dst += color);
    }

    /// Snapshot of the raw depth samples, row-major over the sample grid.
    pub fn depth_values(&self) -> Vec<f32> {
        self.depth_buffer
            .iter()
            .map(|atomic| f32::from_bits(atomic.load(Ordering::Relaxed)))
            .collect()
    }

    /// Returns the resolved (box-filtered) color of an output pixel.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }

        // Reading doesn't strictly need locks if we accept tearing during rendering,
        // but for outputting the final image (when rendering is done), it's safe.
        let buffer = unsafe { &*self.color_buffer.get() };

        if self.sample_count == 1 {
            return Some(buffer[self.index(x, y)]);
        }

        let mut sum_color = Vector3::zeros();
        let start_x = x * self.sample_count;
        let start_y = y * self.sample_count;

        for dy in 0..self.sample_count {
            for dx in 0..self.sample_count {
                let idx = self.index(start_x + dx, start_y + dy);
                sum_color += buffer[idx];
            }
        }

        let samples = (self.sample_count * self.sample_count) as f32;
        Some(sum_color / samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_test_keeps_nearest() {
        let fb = FrameBuffer::new(4, 4, 1);
        assert!(fb.depth_test_and_update(1, 1, 0.5));
        assert!(!fb.depth_test_and_update(1, 1, 0.7));
        assert!(fb.depth_test_and_update(1, 1, 0.2));
        assert!(!fb.depth_test(1, 1, 0.3));
        assert!(fb.depth_test(1, 1, 0.1));
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let fb = FrameBuffer::new(2, 2, 1);
        assert!(!fb.depth_test_and_update(5, 0, 0.0));
        assert!(fb.get_pixel(2, 0).is_none());
    }

    #[test]
    fn test_blend_and_add() {
        let mut fb = FrameBuffer::new(1, 1, 1);
        fb.clear(Vector3::new(1.0, 0.0, 0.0), f32::INFINITY);
        fb.blend_pixel_safe(0, 0, Vector3::new(0.0, 1.0, 0.0), 0.25);
        let c = fb.get_pixel(0, 0).unwrap();
        assert!((c - Vector3::new(0.75, 0.25, 0.0)).norm() < 1e-6);

        fb.add_pixel_safe(0, 0, Vector3::new(0.0, 0.0, 0.5));
        let c = fb.get_pixel(0, 0).unwrap();
        assert!((c.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_supersampled_resolve_averages() {
        let fb = FrameBuffer::new(1, 1, 2);
        fb.set_pixel_safe(0, 0, Vector3::new(4.0, 0.0, 0.0));
        let c = fb.get_pixel(0, 0).unwrap();
        assert!((c.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gradient_rows() {
        let mut fb = FrameBuffer::new(1, 3, 1);
        fb.clear_gradient(Vector3::new(1.0, 1.0, 1.0), Vector3::zeros(), 1.0);
        assert!((fb.get_pixel(0, 0).unwrap().x - 1.0).abs() < 1e-6);
        assert!((fb.get_pixel(0, 1).unwrap().x - 0.5).abs() < 1e-6);
        assert!(fb.get_pixel(0, 2).unwrap().x.abs() < 1e-6);
        assert!(fb.depth_values().iter().all(|d| *d == 1.0));
    }
}
