//! # Linecast Core
//!
//! Turns a console row that a child process repaints in place into a stream
//! of discrete lines.
//!
//! - `surface`: the shadow console abstraction the sampler reads from
//! - `sampler`: reads the cursor row (or an offset row) as a [`Frame`]
//! - `filter`: drops duplicate and non-printable frames
//! - `sink`: writes accepted frames as lines in the configured encoding
//! - `relay`: the poll / final-flush state machine tying it together
//!
//! Platform backends live in `linecast-console`.

pub mod child;
pub mod command;
pub mod config;
pub mod error;
pub mod filter;
pub mod frame;
pub mod relay;
pub mod sampler;
pub mod sink;
pub mod surface;

pub use child::{ChildProcess, SpawnedChild};
pub use command::CommandLine;
pub use config::{FinalRow, RelayConfig};
pub use error::RelayError;
pub use filter::ChangeFilter;
pub use frame::Frame;
pub use relay::{RelayReport, RelayState};
pub use sink::{LineEnding, OutputEncoding, OutputFormat, ReplaySink};
pub use surface::{CursorPosition, ShadowSurface, SurfaceGeometry, SurfaceSize};
