use std::time::Duration;

use crate::surface::SurfaceSize;

/// Pause after an emitted frame. Paces output to the cadence of real progress.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pause after a poll that produced nothing new. Zero busy-polls.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(10);

/// Progress writers usually leave the cursor one row below their last line
/// when they finish.
pub const DEFAULT_FINAL_ROW_OFFSET: i32 = -1;

/// Which row the post-exit sample reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalRow {
    /// Offset from the cursor row.
    pub offset: i32,
    /// Fall back to the cursor row when the offset row is blank or outside
    /// the buffer.
    pub fallback_to_cursor: bool,
}

impl Default for FinalRow {
    fn default() -> Self {
        Self {
            offset: DEFAULT_FINAL_ROW_OFFSET,
            fallback_to_cursor: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub poll_interval: Duration,
    pub idle_interval: Duration,
    pub final_row: FinalRow,
    pub surface_size: SurfaceSize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            final_row: FinalRow::default(),
            surface_size: SurfaceSize::default(),
        }
    }
}

impl RelayConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval = interval;
        self
    }

    pub fn with_final_row(mut self, final_row: FinalRow) -> Self {
        self.final_row = final_row;
        self
    }

    pub fn with_surface_size(mut self, size: SurfaceSize) -> Self {
        self.surface_size = size;
        self
    }
}
