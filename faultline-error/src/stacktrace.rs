//! Lightweight call-stack snapshots
//!
//! A [`Stacktrace`] holds raw instruction pointers only. Symbol resolution
//! is deferred until the snapshot is rendered, so capturing stays cheap on
//! the error path.

use std::fmt;
use std::fmt::Write as _;

/// Upper bound on the number of frames kept in a snapshot
pub const MAX_DEPTH: usize = 32;

/// Initial frame buffer capacity; the buffer grows up to [`MAX_DEPTH`]
pub const INITIAL_DEPTH: usize = 16;

/// Frames scanned while looking for the capture frame itself
#[cfg(feature = "stacktrace")]
const ANCHOR_WINDOW: usize = 64;

const UNKNOWN: &str = "<unknown>";

/// An immutable snapshot of the call stack, outermost caller last.
///
/// Frames are ordered innermost first: the first frame is the function that
/// requested the capture (after `skip`), the last one is closest to `main`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stacktrace {
    frames: Vec<usize>,
}

impl Stacktrace {
    /// Capture the current call stack.
    ///
    /// With `skip = 0` the first frame is the caller of `capture`; each
    /// additional `skip` drops one more frame from the top. At most
    /// [`MAX_DEPTH`] frames are kept. With the `stacktrace` feature
    /// disabled the snapshot is always empty.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        Self {
            frames: trace_frames(skip, Self::capture as *const () as usize),
        }
    }

    /// Build a snapshot from raw instruction pointers
    pub fn from_frames(frames: Vec<usize>) -> Self {
        Self { frames }
    }

    /// Raw instruction pointers, innermost first
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    /// Number of captured frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frames were captured
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resolve and render every frame as `<function>\n\t<file>:<line>\n`.
    ///
    /// Returns an empty string for an empty snapshot. Frames that cannot be
    /// resolved are rendered with `<unknown>` placeholders.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for &ip in &self.frames {
            write_frame(&mut out, ip);
        }
        out
    }
}

/// Render an optional snapshot; `None` renders as an empty string.
pub fn render_opt(stack: Option<&Stacktrace>) -> String {
    stack.map(Stacktrace::render).unwrap_or_default()
}

impl fmt::Display for Stacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(feature = "stacktrace")]
fn trace_frames(skip: usize, anchor: usize) -> Vec<usize> {
    let mut frames = Vec::with_capacity(INITIAL_DEPTH);
    let mut start: Option<usize> = None;

    backtrace::trace(|frame| {
        frames.push(frame.ip() as usize);
        if start.is_none() && frame.symbol_address() as usize == anchor {
            start = Some(frames.len());
        }
        match start {
            Some(start) => frames.len() < start + skip + MAX_DEPTH,
            None => frames.len() < ANCHOR_WINDOW,
        }
    });

    // Without an anchor keep everything rather than guess at an offset.
    let first = start.map_or(0, |start| start + skip).min(frames.len());
    frames.drain(..first);
    frames.truncate(MAX_DEPTH);
    frames
}

#[cfg(not(feature = "stacktrace"))]
fn trace_frames(_skip: usize, _anchor: usize) -> Vec<usize> {
    Vec::new()
}

#[cfg(feature = "stacktrace")]
fn write_frame(out: &mut String, ip: usize) {
    let mut resolved = false;
    backtrace::resolve(ip as *mut std::ffi::c_void, |symbol| {
        resolved = true;
        let function = symbol
            .name()
            .map(|name| format!("{:#}", name))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let file = symbol
            .filename()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let line = symbol.lineno().unwrap_or(0);
        let _ = write!(out, "{}\n\t{}:{}\n", function, file, line);
    });

    if !resolved {
        let _ = write!(out, "{}\n\t{}:0\n", UNKNOWN, UNKNOWN);
    }
}

#[cfg(not(feature = "stacktrace"))]
fn write_frame(out: &mut String, _ip: usize) {
    let _ = write!(out, "{}\n\t{}:0\n", UNKNOWN, UNKNOWN);
}
