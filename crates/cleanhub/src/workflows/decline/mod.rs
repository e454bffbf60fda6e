//! Decline handling and marketplace re-listing for booked cleanings.
//!
//! When a business owner declines an appointment the homeowner is walked
//! through resolving it: cancel outright, or re-list the job on the open
//! marketplace, backfilling missing home attributes and confirming the
//! computed price along the way. The server half (`service`, `router`)
//! owns the appointment state; the client half (`session`, `resolver`,
//! `client`) is a strictly sequential state machine over the wire contract
//! in `domain`.

pub mod client;
pub mod domain;
pub mod pricing;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use client::MarketplaceClient;
pub use domain::{
    Appointment, AppointmentId, AppointmentStatus, CompleteHomeAttributes, DeclineAction,
    DeclineNotification, DeclineResponseBody, HomeAttributeField, HomeDetailsPatch, HomeId,
    HomeRecord,
};
pub use pricing::{PricingConfig, ServiceAreaPricingEngine};
pub use repository::{
    AppointmentRepository, HomeRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
pub use resolver::{DeclineResolver, DeclineResponseApi};
pub use router::decline_router;
pub use service::{DeclineOutcome, DeclineResponseService, DeclineServiceError};
pub use session::{
    ApiError, Applied, RequestToken, ResolutionError, ResolutionOutcome, ResolutionRequest,
    ResolutionSession, ResolutionStep,
};
