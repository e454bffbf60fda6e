use async_trait::async_trait;

use super::domain::{
    AppointmentId, DeclineAction, DeclineNotification, DeclineResponseBody, HomeAttributeField,
    HomeDetailsPatch, HomeId,
};
use super::session::{
    ApiError, Applied, RequestToken, ResolutionError, ResolutionOutcome, ResolutionRequest,
    ResolutionSession, ResolutionStep,
};

/// The server operations the resolution flow depends on. Implemented over
/// HTTP by `MarketplaceClient` and by in-memory fakes in tests.
#[async_trait]
pub trait DeclineResponseApi: Send + Sync {
    async fn submit_decline_response(
        &self,
        appointment: AppointmentId,
        action: DeclineAction,
    ) -> Result<DeclineResponseBody, ApiError>;

    async fn confirm_marketplace_listing(
        &self,
        appointment: AppointmentId,
    ) -> Result<DeclineResponseBody, ApiError>;

    async fn update_home_details(
        &self,
        home: HomeId,
        patch: &HomeDetailsPatch,
    ) -> Result<DeclineResponseBody, ApiError>;
}

/// Pairs a `ResolutionSession` with an api implementation and drives the
/// strictly sequential request cycle: issue a token, perform the call,
/// settle the result. Each driver method corresponds to one control in the
/// resolution modal.
pub struct DeclineResolver<C> {
    api: C,
    session: ResolutionSession,
}

impl<C: DeclineResponseApi> DeclineResolver<C> {
    pub fn open(api: C, notification: DeclineNotification) -> Self {
        Self {
            api,
            session: ResolutionSession::open(notification),
        }
    }

    pub fn session(&self) -> &ResolutionSession {
        &self.session
    }

    pub fn step(&self) -> &ResolutionStep {
        self.session.step()
    }

    /// Cancel outright or ask for a marketplace re-listing.
    pub async fn choose(&mut self, action: DeclineAction) -> Result<Applied, ResolutionError> {
        let token = self.session.begin_choice(action)?;
        self.settle(token).await
    }

    pub fn enter_detail(
        &mut self,
        field: HomeAttributeField,
        value: impl Into<String>,
    ) -> Result<(), ResolutionError> {
        self.session.enter_detail(field, value)
    }

    /// Persist the backfilled attributes and retry the marketplace request.
    pub async fn submit_home_details(&mut self) -> Result<Applied, ResolutionError> {
        let token = self.session.begin_home_details()?;
        self.settle(token).await
    }

    /// Accept the quoted price and perform the listing transition.
    pub async fn confirm_price(&mut self) -> Result<Applied, ResolutionError> {
        let token = self.session.begin_confirm()?;
        self.settle(token).await
    }

    pub fn go_back(&mut self) -> Result<(), ResolutionError> {
        self.session.go_back()
    }

    pub fn finish(&mut self) -> Result<ResolutionOutcome, ResolutionError> {
        self.session.finish()
    }

    pub fn close(&mut self) {
        self.session.close()
    }

    async fn settle(&mut self, token: RequestToken) -> Result<Applied, ResolutionError> {
        let result = self.dispatch(token.request()).await;
        match self.session.apply(token, result) {
            Applied::Failed(error) => Err(error),
            applied => Ok(applied),
        }
    }

    async fn dispatch(
        &self,
        request: &ResolutionRequest,
    ) -> Result<DeclineResponseBody, ApiError> {
        let appointment = self.session.appointment_id();
        match request {
            ResolutionRequest::CancelAppointment => {
                self.api
                    .submit_decline_response(appointment, DeclineAction::Cancel)
                    .await
            }
            ResolutionRequest::RequestMarketplace => {
                self.api
                    .submit_decline_response(appointment, DeclineAction::Marketplace)
                    .await
            }
            ResolutionRequest::SubmitHomeDetails { home_id, patch } => {
                let saved = self.api.update_home_details(*home_id, patch).await?;
                if !saved.is_ok() {
                    return Ok(saved);
                }
                self.api
                    .submit_decline_response(appointment, DeclineAction::Marketplace)
                    .await
            }
            ResolutionRequest::ConfirmListing => {
                self.api.confirm_marketplace_listing(appointment).await
            }
        }
    }
}
