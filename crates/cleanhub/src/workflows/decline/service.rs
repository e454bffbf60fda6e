use std::sync::Arc;

use tracing::info;

use super::domain::{
    Appointment, AppointmentId, AppointmentStatus, DeclineAction, DeclineNotification,
    DeclineResponseBody, HomeAttributeField, HomeDetailsPatch, HomeId, HomeRecord,
};
use super::pricing::ServiceAreaPricingEngine;
use super::repository::{
    AppointmentRepository, HomeRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};

/// Server-side decision service for declined appointments. Composes the
/// repositories, the notification publisher, and the pricing engine; every
/// appointment state transition in the workflow goes through here.
pub struct DeclineResponseService<A, H, N> {
    appointments: Arc<A>,
    homes: Arc<H>,
    notifications: Arc<N>,
    pricing: ServiceAreaPricingEngine,
}

/// What the server decided for a `decline-response` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclineOutcome {
    /// The appointment was cancelled and persisted as such.
    Cancelled,
    /// The home record cannot be priced yet; the client must backfill
    /// exactly these fields.
    NeedsHomeDetails {
        home_id: HomeId,
        missing_fields: Vec<HomeAttributeField>,
    },
    /// Price preview. Nothing is persisted until the client confirms.
    ConfirmRequired {
        home_id: HomeId,
        marketplace_price: u32,
        current_price: u32,
    },
}

impl From<DeclineOutcome> for DeclineResponseBody {
    fn from(outcome: DeclineOutcome) -> Self {
        match outcome {
            DeclineOutcome::Cancelled => DeclineResponseBody::accepted(),
            DeclineOutcome::NeedsHomeDetails {
                home_id,
                missing_fields,
            } => DeclineResponseBody::needs_home_details(home_id, missing_fields),
            DeclineOutcome::ConfirmRequired {
                home_id,
                marketplace_price,
                current_price,
            } => DeclineResponseBody::confirm_required(home_id, marketplace_price, current_price),
        }
    }
}

impl<A, H, N> DeclineResponseService<A, H, N>
where
    A: AppointmentRepository + 'static,
    H: HomeRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(
        appointments: Arc<A>,
        homes: Arc<H>,
        notifications: Arc<N>,
        pricing: ServiceAreaPricingEngine,
    ) -> Self {
        Self {
            appointments,
            homes,
            notifications,
            pricing,
        }
    }

    /// Business owner declines a scheduled appointment. Marks it declined
    /// and publishes the notification the homeowner's client consumes.
    pub fn record_decline(
        &self,
        id: AppointmentId,
        reason: Option<String>,
    ) -> Result<DeclineNotification, DeclineServiceError> {
        let mut appointment = self
            .appointments
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        match appointment.status {
            AppointmentStatus::Scheduled => {}
            AppointmentStatus::Declined => return Err(DeclineServiceError::AlreadyDeclined),
            AppointmentStatus::Cancelled | AppointmentStatus::OpenToMarketplace => {
                return Err(DeclineServiceError::AlreadyResolved)
            }
        }

        appointment.status = AppointmentStatus::Declined;
        let notification = DeclineNotification {
            appointment_id: appointment.id,
            business_owner_name: appointment.business_owner_name.clone(),
            appointment_date: appointment.scheduled_for,
            reason,
        };
        self.appointments.update(appointment)?;
        self.notifications.publish(notification.clone())?;

        info!(appointment = id.0, "appointment declined, homeowner notified");
        Ok(notification)
    }

    /// Homeowner's answer to the decline: cancel outright, or ask for a
    /// marketplace re-listing. Only the cancel path persists anything.
    pub fn submit_response(
        &self,
        id: AppointmentId,
        action: DeclineAction,
    ) -> Result<DeclineOutcome, DeclineServiceError> {
        let mut appointment = self.declined_appointment(id)?;

        match action {
            DeclineAction::Cancel => {
                appointment.status = AppointmentStatus::Cancelled;
                self.appointments.update(appointment)?;
                info!(appointment = id.0, "declined appointment cancelled");
                Ok(DeclineOutcome::Cancelled)
            }
            DeclineAction::Marketplace => {
                let home = self
                    .homes
                    .fetch(appointment.home_id)?
                    .ok_or(RepositoryError::NotFound)?;

                match home.complete_attributes() {
                    Err(missing_fields) => Ok(DeclineOutcome::NeedsHomeDetails {
                        home_id: home.id,
                        missing_fields,
                    }),
                    Ok(attributes) => {
                        let marketplace_price = self.pricing.quote(&attributes);
                        Ok(DeclineOutcome::ConfirmRequired {
                            home_id: home.id,
                            marketplace_price,
                            current_price: appointment.booked_price,
                        })
                    }
                }
            }
        }
    }

    /// The actual listing transition, after the homeowner has confirmed the
    /// quoted price. Recomputes the quote so the stored price always matches
    /// the home record at confirmation time.
    pub fn confirm_marketplace(
        &self,
        id: AppointmentId,
    ) -> Result<Appointment, DeclineServiceError> {
        let mut appointment = self.declined_appointment(id)?;
        let home = self
            .homes
            .fetch(appointment.home_id)?
            .ok_or(RepositoryError::NotFound)?;
        let attributes = home
            .complete_attributes()
            .map_err(|missing| DeclineServiceError::IncompleteHome { missing })?;

        let marketplace_price = self.pricing.quote(&attributes);
        appointment.marketplace_price = Some(marketplace_price);
        appointment.status = AppointmentStatus::OpenToMarketplace;
        self.appointments.update(appointment.clone())?;

        info!(
            appointment = id.0,
            price = marketplace_price,
            "appointment listed on the marketplace"
        );
        Ok(appointment)
    }

    /// Backfill missing home attributes before the marketplace retry.
    pub fn update_home(
        &self,
        id: HomeId,
        patch: &HomeDetailsPatch,
    ) -> Result<HomeRecord, DeclineServiceError> {
        let mut home = self.homes.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        home.apply(patch);
        self.homes.update(home.clone())?;
        Ok(home)
    }

    fn declined_appointment(&self, id: AppointmentId) -> Result<Appointment, DeclineServiceError> {
        let appointment = self
            .appointments
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        match appointment.status {
            AppointmentStatus::Declined => Ok(appointment),
            AppointmentStatus::Scheduled => Err(DeclineServiceError::NotAwaitingResponse),
            AppointmentStatus::Cancelled | AppointmentStatus::OpenToMarketplace => {
                Err(DeclineServiceError::AlreadyResolved)
            }
        }
    }
}

/// Error raised by the decision service.
#[derive(Debug, thiserror::Error)]
pub enum DeclineServiceError {
    #[error("Appointment already resolved")]
    AlreadyResolved,
    #[error("appointment was already declined")]
    AlreadyDeclined,
    #[error("appointment is not awaiting a decline response")]
    NotAwaitingResponse,
    #[error("home details are incomplete")]
    IncompleteHome { missing: Vec<HomeAttributeField> },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
