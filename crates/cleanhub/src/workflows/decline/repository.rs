use super::domain::{Appointment, AppointmentId, DeclineNotification, HomeId, HomeRecord};

/// Storage abstraction so the decision service can be exercised in isolation.
pub trait AppointmentRepository: Send + Sync {
    fn fetch(&self, id: AppointmentId) -> Result<Option<Appointment>, RepositoryError>;
    fn update(&self, appointment: Appointment) -> Result<(), RepositoryError>;
}

/// Same seam for homeowner home records.
pub trait HomeRepository: Send + Sync {
    fn fetch(&self, id: HomeId) -> Result<Option<HomeRecord>, RepositoryError>;
    fn update(&self, home: HomeRecord) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound delivery hook for homeowner decline notifications (push,
/// e-mail, or an in-memory queue in tests).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: DeclineNotification) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
