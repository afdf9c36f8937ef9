//! Buffer pool for transient device scratch space.
//!
//! Pools amortize allocation cost for the scratch buffers that geometry
//! operations acquire on every call (e.g. the shifted copy during a mask
//! translation). Buffers are returned through an RAII guard, so release is
//! deterministic on every exit path, including early error returns.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::buffer::DeviceBuffer;
use crate::error::Result;

/// Free-list pool of `f32` device buffers of one fixed cell count.
pub struct BufferPool {
    /// Cell count of every buffer in this pool.
    cell_count: usize,
    /// Maximum number of buffers retained on the free list.
    max_buffers: usize,
    /// Free list of buffers.
    free_list: Mutex<Vec<DeviceBuffer<f32>>>,
    /// Statistics: total acquisitions.
    total_acquires: AtomicUsize,
    /// Statistics: free-list hits.
    cache_hits: AtomicUsize,
}

impl BufferPool {
    /// Create a pool for buffers of `cell_count` elements, retaining at most
    /// `max_buffers` on the free list.
    pub fn new(cell_count: usize, max_buffers: usize) -> Self {
        Self {
            cell_count,
            max_buffers: max_buffers.max(1),
            free_list: Mutex::new(Vec::with_capacity(max_buffers)),
            total_acquires: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
        }
    }

    /// Acquire a zero-filled buffer, reusing from the free list if possible.
    pub fn acquire(&self) -> Result<PooledBuffer<'_>> {
        self.total_acquires.fetch_add(1, Ordering::Relaxed);

        let recycled = self.free_list.lock().pop();
        let buffer = match recycled {
            Some(mut buf) => {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                buf.fill(0.0);
                buf
            }
            None => {
                debug!(cells = self.cell_count, "pool miss, allocating scratch buffer");
                DeviceBuffer::alloc(self.cell_count)?
            }
        };

        Ok(PooledBuffer {
            buffer: Some(buffer),
            pool: self,
        })
    }

    /// Return a buffer to the pool. Called from `PooledBuffer::drop`.
    fn return_buffer(&self, buffer: DeviceBuffer<f32>) {
        let mut free = self.free_list.lock();
        if free.len() < self.max_buffers {
            free.push(buffer);
        }
        // If the pool is full, the buffer is dropped.
    }

    /// Cell count of buffers in this pool.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Number of buffers currently on the free list.
    pub fn free_count(&self) -> usize {
        self.free_list.lock().len()
    }

    /// Free-list hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_acquires.load(Ordering::Relaxed);
        let hits = self.cache_hits.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// A buffer borrowed from a [`BufferPool`].
///
/// Dereferences to [`DeviceBuffer<f32>`]; the buffer is returned to the pool
/// when the guard is dropped.
pub struct PooledBuffer<'a> {
    buffer: Option<DeviceBuffer<f32>>,
    pool: &'a BufferPool,
}

impl std::ops::Deref for PooledBuffer<'_> {
    type Target = DeviceBuffer<f32>;

    fn deref(&self) -> &Self::Target {
        self.buffer.as_ref().unwrap()
    }
}

impl std::ops::DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buffer.as_mut().unwrap()
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.return_buffer(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_recycle() {
        let pool = BufferPool::new(64, 4);

        let buf = pool.acquire().unwrap();
        assert_eq!(buf.len(), 64);
        drop(buf);
        assert_eq!(pool.free_count(), 1);

        // Second acquire reuses the returned buffer.
        let _buf2 = pool.acquire().unwrap();
        assert_eq!(pool.free_count(), 0);
        assert_eq!(pool.hit_rate(), 0.5);
    }

    #[test]
    fn test_recycled_buffer_is_zeroed() {
        let pool = BufferPool::new(8, 2);

        {
            let mut buf = pool.acquire().unwrap();
            buf.fill(3.0);
        }
        let buf = pool.acquire().unwrap();
        assert!(buf.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_pool_capacity_bound() {
        let pool = BufferPool::new(8, 1);

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        drop(a);
        drop(b);

        // Only one buffer is retained; the second is dropped.
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_release_on_early_exit() {
        let pool = BufferPool::new(8, 4);

        fn fails_midway(pool: &BufferPool) -> Result<()> {
            let _scratch = pool.acquire()?;
            Err(crate::error::CoreError::invalid_argument("boom"))
        }

        assert!(fails_midway(&pool).is_err());
        assert_eq!(pool.free_count(), 1);
    }
}
