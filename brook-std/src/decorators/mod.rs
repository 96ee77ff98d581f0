//! Decorators with a fixed override.
//!
//! Each decorator owns one inner stream and forwards every operation it does
//! not restrict, via [`decorator`](brook_macros::decorator).

mod no_seek;

pub use no_seek::NoSeekStream;
