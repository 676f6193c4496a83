use std::cell::Cell;
use std::rc::Rc;

use crate::frame::PixelBuffer;

/// Supplier of live camera frames.
///
/// The camera is the only writer of the live image; everything in this crate
/// reads it through `capture_frame`, which returns an owned copy. A camera
/// that is not ready yet returns an empty (zero-dimension) buffer.
pub trait FrameSource {
    fn capture_frame(&self) -> PixelBuffer;
}

impl<T: FrameSource + ?Sized> FrameSource for Rc<T> {
    fn capture_frame(&self) -> PixelBuffer {
        (**self).capture_frame()
    }
}

impl<T: FrameSource + ?Sized> FrameSource for &T {
    fn capture_frame(&self) -> PixelBuffer {
        (**self).capture_frame()
    }
}

/// A source that always returns the same image.
#[derive(Clone, Debug)]
pub struct StillSource {
    frame: PixelBuffer,
}

impl StillSource {
    pub fn new(frame: PixelBuffer) -> Self {
        Self { frame }
    }
}

impl FrameSource for StillSource {
    fn capture_frame(&self) -> PixelBuffer {
        self.frame.clone()
    }
}

/// A source that cycles through a fixed list of frames, one per capture.
#[derive(Debug)]
pub struct FrameSequence {
    frames: Vec<PixelBuffer>,
    cursor: Cell<usize>,
}

impl FrameSequence {
    pub fn new(frames: Vec<PixelBuffer>) -> Self {
        Self {
            frames,
            cursor: Cell::new(0),
        }
    }

    /// Number of captures served so far.
    pub fn captures(&self) -> usize {
        self.cursor.get()
    }
}

impl FrameSource for FrameSequence {
    fn capture_frame(&self) -> PixelBuffer {
        if self.frames.is_empty() {
            return PixelBuffer::new(0, 0);
        }
        let i = self.cursor.get();
        self.cursor.set(i + 1);
        self.frames[i % self.frames.len()].clone()
    }
}

/// Take a single unprocessed snapshot.
///
/// This is the recovery path when a composite fails: the caller stores the
/// plain frame instead of the developed one.
pub fn capture_plain(source: &impl FrameSource) -> Option<PixelBuffer> {
    let frame = source.capture_frame();
    if frame.is_empty() {
        None
    } else {
        Some(frame)
    }
}
