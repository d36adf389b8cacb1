//! Reservation aggregate
//!
//! Contains the Reservation entity, rental windows, the availability
//! check, and the persistence interface.

pub mod availability;
pub mod model;
pub mod repository;
pub mod window;

pub use availability::{check_availability, AvailabilityResult};
pub use model::{Reservation, ReservationStatus};
pub use repository::ReservationSource;
pub use window::{RentalWindow, WindowError};
