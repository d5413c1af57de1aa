//! Domain types for the availability engine

pub mod cell;
pub mod instrument;
pub mod observation;

pub use cell::{AvailabilityCell, CellError, SourceKind};
pub use instrument::{InstrumentType, InstrumentTypeError};
pub use observation::RawObservation;

/// Ticker type alias
pub type Ticker = String;
