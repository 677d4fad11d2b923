//! Path cursor for object lookups.
//!
//! Paths are absolute and `/`-separated; the leading `/` is optional. The
//! cursor hands out one directory segment per hop and never allocates or
//! backtracks. Whatever is left once no separator remains is the final
//! segment, which the caller treats as a registration name or lookup target.

use crate::config::{NAME_MAX, SEPARATOR};

/// Truncate a segment to the stored name capacity.
pub fn clamp_name(segment: &[u8]) -> &[u8] {
    &segment[..segment.len().min(NAME_MAX)]
}

/// Walks a path one directory segment at a time.
#[derive(Clone, Copy, Debug)]
pub struct PathCursor<'p> {
    rest: &'p [u8],
}

impl<'p> PathCursor<'p> {
    /// Start at the beginning of `path`.
    pub fn new(path: &'p str) -> Self {
        Self {
            rest: path.as_bytes(),
        }
    }

    /// Consume the next directory segment.
    ///
    /// One leading separator is skipped first, at every hop. Returns `None`
    /// once no separator is left; [`remainder`](Self::remainder) is then the
    /// final segment. Returned segments are already clamped to `NAME_MAX`.
    pub fn next_dir(&mut self) -> Option<&'p [u8]> {
        if let [SEPARATOR, rest @ ..] = self.rest {
            self.rest = rest;
        }
        let slash = self.rest.iter().position(|&b| b == SEPARATOR)?;
        let segment = &self.rest[..slash];
        self.rest = &self.rest[slash + 1..];
        Some(clamp_name(segment))
    }

    /// Bytes not consumed yet.
    pub fn remainder(&self) -> &'p [u8] {
        self.rest
    }
}
