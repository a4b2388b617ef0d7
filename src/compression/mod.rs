//! Decompression helpers (requires the `compression` feature).
//!
//! Gated behind the `compression` Cargo feature so that the core library
//! compiles without the codec crates. Enable it to open compressed images:
//!
//! ```toml
//! [dependencies]
//! gckit = { version = "0.1", features = ["compression"] }
//! ```
//!
//! | Module | Algorithm | Used by |
//! |--------|-----------|---------|
//! | [`lz4`]  | LZ4 block, size-prepended | [`crate::blob::CompressedSource::from_lz4`] |
//! | [`zstd`] | Zstandard stream          | [`crate::blob::CompressedSource::from_zstd`] |

#[cfg(feature = "compression")]
pub mod lz4;

#[cfg(feature = "compression")]
pub mod zstd;
