//! **gckit** - a reusable Rust library for reading GameCube disc metadata.
//!
//! A [`Volume`] wraps a disc image and exposes its header fields, its
//! localized `opening.bnr` banner and a container-independent sync hash.
//! Accessors never fail: corrupt or unreadable data yields documented
//! fallback values instead.
//!
//! # Modules
//! | Module | Purpose |
//! |--------|---------|
//! | [`blob`]      | Byte sources over plain, split and compressed images |
//! | [`volume`]    | Header field accessors, banner cache, unique IDs |
//! | [`formats`]   | FST file lookup and BNR1/BNR2 banner parsing |
//! | [`text`]      | Shift-JIS / Windows-1252 selection and decoding |
//! | [`image`]     | RGB5A3 texture decoding |
//! | [`region`]    | Country, region and language enumerations |
//! | [`sync_hash`] | SHA-1 fingerprint of game content |
//!
//! ```no_run
//! use gckit::Volume;
//!
//! let volume = Volume::open("game.iso")?;
//! println!("{} ({:?})", volume.unique_id(), volume.region());
//! for (language, name) in volume.long_names() {
//!     println!("{language:?}: {name}");
//! }
//! # Ok::<(), gckit::Error>(())
//! ```

pub mod blob;
pub mod compression;
pub mod error;
pub mod formats;
pub mod image;
pub mod region;
pub mod sync_hash;
pub mod text;
pub mod utils;
pub mod volume;

pub use error::{Error, Result};
pub use volume::Volume;
