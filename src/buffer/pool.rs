use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Capacity given to freshly allocated buffers.
    pub initial_capacity: usize,
    /// Upper bound on buffers kept idle; extra releases are dropped.
    pub max_idle: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_idle: 32,
        }
    }
}

/// Pool of reusable byte buffers shared by concurrent pushes.
///
/// Released buffers are **not** cleared: a buffer handed out by `acquire` may
/// still hold bytes from its previous user, so callers must `clear()` it
/// before writing. Which physical buffer is returned is unspecified.
#[derive(Debug)]
pub struct BufferPool {
    idle: Mutex<Vec<Vec<u8>>>,
    config: PoolConfig,
    allocated: AtomicU64,
    reused: AtomicU64,
}

impl BufferPool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(config.max_idle)),
            config,
            allocated: AtomicU64::new(0),
            reused: AtomicU64::new(0),
        }
    }

    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = match self.idle.lock().pop() {
            Some(buf) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                Vec::with_capacity(self.config.initial_capacity)
            }
        };

        PooledBuffer { pool: self, buf }
    }

    pub fn release(&self, buf: Vec<u8>) {
        let mut idle = self.idle.lock();
        if idle.len() < self.config.max_idle {
            idle.push(buf);
        }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.idle.lock().len(),
            allocated: self.allocated.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub idle: usize,
    pub allocated: u64,
    pub reused: u64,
}

/// A buffer borrowed from a `BufferPool`, returned to it on drop.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
