//! Backend abstraction
//!
//! The engine only needs four remote operations. The trait lets the HTTP
//! client and the in-memory implementation be swapped freely.

mod memory;
mod traits;

pub use memory::InMemoryBackend;
pub use traits::Backend;
