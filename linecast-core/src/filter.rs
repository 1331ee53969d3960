use crate::frame::Frame;

/// Whether `frame` is worth emitting after `last_emitted`: non-empty, fully
/// printable, and different by value from what went out last.
pub fn accept(frame: &Frame, last_emitted: Option<&Frame>) -> bool {
    !frame.is_empty() && frame.is_printable() && last_emitted != Some(frame)
}

/// Holds the last emitted frame and gates new ones against it.
#[derive(Debug, Default, Clone)]
pub struct ChangeFilter {
    last_emitted: Option<Frame>,
}

impl ChangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_emitted(&self) -> Option<&Frame> {
        self.last_emitted.as_ref()
    }

    /// Checks `frame` and, if it passes, records it as the last emitted frame.
    pub fn accept(&mut self, frame: &Frame) -> bool {
        if !accept(frame, self.last_emitted.as_ref()) {
            return false;
        }
        self.last_emitted = Some(frame.clone());
        true
    }
}
