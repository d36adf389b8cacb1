//! Booking state machine, quotes, cancellation and completion

pub mod coordinator;
pub mod rejection;
pub mod request;

pub use coordinator::{BookingCoordinator, DEFAULT_FREE_CANCELLATION_HOURS};
pub use rejection::{BookingRejection, BookingStage};
pub use request::{BookingOutcome, BookingRequest, Cancellation, Completion, Quote};
