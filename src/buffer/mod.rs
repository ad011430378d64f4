pub mod batch;
pub mod pool;

pub use batch::{
    BatchAssembler, DEFAULT_MAX_BODY_SIZE, DOCUMENT_CLOSE, DOCUMENT_OPEN, MIN_MAX_BODY_SIZE,
};
pub use pool::{BufferPool, PoolConfig, PoolStats, PooledBuffer};
