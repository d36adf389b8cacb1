pub mod booking;
pub mod catalog;
pub mod events;

// Re-export key types for convenience
pub use booking::{
    BookingCoordinator, BookingOutcome, BookingRejection, BookingRequest, BookingStage,
    Cancellation, Completion, Quote,
};
pub use catalog::CatalogService;
pub use events::{create_event_bus, Event, EventBus, EventSubscriber, SharedEventBus};
