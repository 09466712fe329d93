//! Pool registry: identifier allocation and keyed pool storage.

pub mod allocator;
pub mod pool_registry;

pub use allocator::PoolIdAllocator;
pub use pool_registry::{DEFAULT_PAGE_LIMIT, PageRequest, PageResponse, PoolRegistry};
