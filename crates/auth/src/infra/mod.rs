//! Infrastructure Layer
//!
//! Transport and router implementations.

pub mod http;
pub mod memory;
pub mod router;

pub use self::http::HttpTransport;
pub use memory::MemoryBackend;
pub use router::MemoryRouter;
