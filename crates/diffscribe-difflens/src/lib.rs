//! Line-oriented filtering of unified diffs.
//!
//! Keeps the file sections whose `diff --git` header mentions a marker
//! (usually a file extension) and drops everything else, without parsing
//! hunks.

pub mod filter;
