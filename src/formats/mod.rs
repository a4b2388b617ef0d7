//! Parsers for the on-disc structures the volume reads.
//!
//! Both parsers follow the same conventions:
//!
//! * **Read through [`crate::blob::ByteSource`]** or from an already-loaded
//!   byte slice - never from the container format directly.
//! * **Strict validation** - any structural mismatch is an
//!   [`crate::Error::MalformedResource`]. Callers decide on a fallback; the
//!   parsers never return partially populated values.
//!
//! | Module     | Structure | Description |
//! |------------|-----------|-------------|
//! | [`fst`]    | FST       | File system table; locates `opening.bnr` and `boot.id` |
//! | [`banner`] | BNR1/BNR2 | Icon image and localized titles from `opening.bnr` |

pub mod banner;
pub mod fst;
