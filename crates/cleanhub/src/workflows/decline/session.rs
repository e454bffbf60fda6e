use std::collections::BTreeMap;

use super::domain::{
    AppointmentId, DeclineAction, DeclineNotification, DeclineResponseBody, HomeAttributeField,
    HomeDetailsPatch, HomeId,
};

/// Transport-level failure reported by a `DeclineResponseApi`
/// implementation. Anything the server actually said travels inside a
/// `DeclineResponseBody` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ApiError(pub String);

/// Where the homeowner currently is in the resolution flow. Each variant
/// carries exactly the data valid for that state, so a step can never be
/// read with another step's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStep {
    /// Initial step: cancel outright or ask for a marketplace re-listing.
    Choice,
    /// The server reported missing pricing attributes; the homeowner fills
    /// in a draft for exactly the missing set.
    HomeDetails {
        home_id: HomeId,
        missing_fields: Vec<HomeAttributeField>,
        draft: BTreeMap<HomeAttributeField, String>,
    },
    /// The server quoted a marketplace price awaiting confirmation.
    PriceConfirm {
        home_id: HomeId,
        marketplace_price: u32,
        current_price: u32,
    },
    /// Terminal: the appointment is visible on the marketplace.
    Success,
}

impl ResolutionStep {
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionStep::Choice => "choice",
            ResolutionStep::HomeDetails { .. } => "home_details",
            ResolutionStep::PriceConfirm { .. } => "price_confirm",
            ResolutionStep::Success => "success",
        }
    }
}

/// Terminal result reported to whoever opened the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Cancelled,
    Listed,
}

/// Everything the session can surface. The first five reach the homeowner
/// as a dismissable message; `RequestInFlight` and `NotAvailable` reject
/// misuse of the session API (the UI analog is a disabled control).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("{0} is required")]
    MissingField(HomeAttributeField),
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidValue {
        field: HomeAttributeField,
        value: String,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Server(String),
    #[error("unexpected response from the marketplace service")]
    UnexpectedResponse,
    #[error("a request is already in flight")]
    RequestInFlight,
    #[error("action is not available from the {0} step")]
    NotAvailable(&'static str),
}

/// Network interaction the session has asked its driver to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionRequest {
    CancelAppointment,
    RequestMarketplace,
    /// Persist the backfilled attributes, then retry the marketplace
    /// request; the driver feeds back a single settled result.
    SubmitHomeDetails {
        home_id: HomeId,
        patch: HomeDetailsPatch,
    },
    ConfirmListing,
}

/// One-shot handle tying a settled response back to the session that
/// issued it. A token minted before `close()` no longer matches the live
/// generation, so its result is dropped instead of applied.
#[derive(Debug)]
pub struct RequestToken {
    generation: u64,
    request: ResolutionRequest,
}

impl RequestToken {
    pub fn request(&self) -> &ResolutionRequest {
        &self.request
    }
}

/// What `apply` did with a settled response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The step moved forward.
    Advanced,
    /// The workflow reached a terminal outcome.
    Resolved(ResolutionOutcome),
    /// The step did not change; the error is also recorded on the session.
    Failed(ResolutionError),
    /// The token predates the live session; the response was ignored.
    Stale,
}

/// In-memory state for one decline-resolution interaction, from modal open
/// to close. Strictly sequential: `begin_*` marks a request in flight and
/// returns a token, `apply` settles it. Exclusively owned by one modal
/// instance; discarded wholesale on close.
#[derive(Debug)]
pub struct ResolutionSession {
    notification: DeclineNotification,
    step: ResolutionStep,
    error: Option<ResolutionError>,
    in_flight: bool,
    generation: u64,
    resolution: Option<ResolutionOutcome>,
}

impl ResolutionSession {
    pub fn open(notification: DeclineNotification) -> Self {
        Self {
            notification,
            step: ResolutionStep::Choice,
            error: None,
            in_flight: false,
            generation: 0,
            resolution: None,
        }
    }

    pub fn appointment_id(&self) -> AppointmentId {
        self.notification.appointment_id
    }

    pub fn notification(&self) -> &DeclineNotification {
        &self.notification
    }

    pub fn step(&self) -> &ResolutionStep {
        &self.step
    }

    pub fn last_error(&self) -> Option<&ResolutionError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn request_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn resolution(&self) -> Option<ResolutionOutcome> {
        self.resolution
    }

    /// Cancel or marketplace, from the choice step only.
    pub fn begin_choice(&mut self, action: DeclineAction) -> Result<RequestToken, ResolutionError> {
        self.ensure_idle()?;
        if self.resolution.is_some() || !matches!(self.step, ResolutionStep::Choice) {
            return Err(ResolutionError::NotAvailable(self.step.label()));
        }

        let request = match action {
            DeclineAction::Cancel => ResolutionRequest::CancelAppointment,
            DeclineAction::Marketplace => ResolutionRequest::RequestMarketplace,
        };
        Ok(self.issue(request))
    }

    /// Record a value the homeowner typed for one attribute. Values for
    /// fields outside the missing set are kept in the draft but never
    /// required and never sent.
    pub fn enter_detail(
        &mut self,
        field: HomeAttributeField,
        value: impl Into<String>,
    ) -> Result<(), ResolutionError> {
        match &mut self.step {
            ResolutionStep::HomeDetails { draft, .. } => {
                draft.insert(field, value.into());
                Ok(())
            }
            step => Err(ResolutionError::NotAvailable(step.label())),
        }
    }

    /// Validates the draft against the missing-field set and, only if every
    /// required value is a non-empty whole number, marks the submission in
    /// flight. A validation failure never reaches the network.
    pub fn begin_home_details(&mut self) -> Result<RequestToken, ResolutionError> {
        self.ensure_idle()?;
        let (home_id, patch) = match &self.step {
            ResolutionStep::HomeDetails {
                home_id,
                missing_fields,
                draft,
            } => (*home_id, build_patch(missing_fields, draft)?),
            step => return Err(ResolutionError::NotAvailable(step.label())),
        };

        Ok(self.issue(ResolutionRequest::SubmitHomeDetails { home_id, patch }))
    }

    /// Accept the quoted marketplace price, from the price step only.
    pub fn begin_confirm(&mut self) -> Result<RequestToken, ResolutionError> {
        self.ensure_idle()?;
        if !matches!(self.step, ResolutionStep::PriceConfirm { .. }) {
            return Err(ResolutionError::NotAvailable(self.step.label()));
        }

        Ok(self.issue(ResolutionRequest::ConfirmListing))
    }

    /// Back to the choice step, discarding the draft, the missing-field
    /// set, and any quoted prices.
    pub fn go_back(&mut self) -> Result<(), ResolutionError> {
        self.ensure_idle()?;
        match self.step {
            ResolutionStep::HomeDetails { .. } | ResolutionStep::PriceConfirm { .. } => {
                self.step = ResolutionStep::Choice;
                self.error = None;
                Ok(())
            }
            ref step => Err(ResolutionError::NotAvailable(step.label())),
        }
    }

    /// "Done" on the success step: reports the listing outcome to the
    /// session owner.
    pub fn finish(&mut self) -> Result<ResolutionOutcome, ResolutionError> {
        match self.step {
            ResolutionStep::Success => {
                self.resolution = Some(ResolutionOutcome::Listed);
                Ok(ResolutionOutcome::Listed)
            }
            ref step => Err(ResolutionError::NotAvailable(step.label())),
        }
    }

    /// Discard the interaction entirely. Bumps the generation so an
    /// in-flight response that settles later is dropped, not applied.
    pub fn close(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.step = ResolutionStep::Choice;
        self.error = None;
        self.in_flight = false;
        self.resolution = None;
    }

    /// Settle a request. Stale tokens are ignored; everything else clears
    /// the in-flight flag and either advances the step or records the
    /// surfaced error, leaving the step untouched.
    pub fn apply(
        &mut self,
        token: RequestToken,
        result: Result<DeclineResponseBody, ApiError>,
    ) -> Applied {
        if token.generation != self.generation {
            return Applied::Stale;
        }
        self.in_flight = false;

        let mut body = match result {
            Ok(body) => body,
            Err(error) => return self.fail(ResolutionError::Network(error.0)),
        };
        if let Some(message) = body.error.take() {
            return self.fail(ResolutionError::Server(message));
        }
        if !body.ok {
            return self.fail(ResolutionError::Server("request was rejected".to_string()));
        }

        match token.request {
            ResolutionRequest::CancelAppointment => {
                self.resolution = Some(ResolutionOutcome::Cancelled);
                Applied::Resolved(ResolutionOutcome::Cancelled)
            }
            ResolutionRequest::RequestMarketplace => {
                if body.needs_home_details.unwrap_or(false) {
                    match (body.home_id, body.missing_fields.take()) {
                        (Some(home_id), Some(missing_fields)) if !missing_fields.is_empty() => {
                            self.step = ResolutionStep::HomeDetails {
                                home_id,
                                missing_fields,
                                draft: BTreeMap::new(),
                            };
                            Applied::Advanced
                        }
                        _ => self.fail(ResolutionError::UnexpectedResponse),
                    }
                } else if body.confirm_required.unwrap_or(false) {
                    self.advance_to_price_confirm(body.home_id, &body)
                } else {
                    self.fail(ResolutionError::UnexpectedResponse)
                }
            }
            ResolutionRequest::SubmitHomeDetails { home_id, .. } => {
                if body.confirm_required.unwrap_or(false) {
                    let home_id = body.home_id.or(Some(home_id));
                    self.advance_to_price_confirm(home_id, &body)
                } else {
                    self.fail(ResolutionError::UnexpectedResponse)
                }
            }
            ResolutionRequest::ConfirmListing => {
                self.step = ResolutionStep::Success;
                Applied::Advanced
            }
        }
    }

    fn advance_to_price_confirm(
        &mut self,
        home_id: Option<HomeId>,
        body: &DeclineResponseBody,
    ) -> Applied {
        match (home_id, body.marketplace_price) {
            (Some(home_id), Some(marketplace_price)) => {
                let current_price = body.current_price.unwrap_or(marketplace_price);
                self.step = ResolutionStep::PriceConfirm {
                    home_id,
                    marketplace_price,
                    current_price,
                };
                Applied::Advanced
            }
            _ => self.fail(ResolutionError::UnexpectedResponse),
        }
    }

    fn ensure_idle(&self) -> Result<(), ResolutionError> {
        if self.in_flight {
            return Err(ResolutionError::RequestInFlight);
        }
        Ok(())
    }

    fn issue(&mut self, request: ResolutionRequest) -> RequestToken {
        self.in_flight = true;
        self.error = None;
        RequestToken {
            generation: self.generation,
            request,
        }
    }

    fn fail(&mut self, error: ResolutionError) -> Applied {
        self.error = Some(error.clone());
        Applied::Failed(error)
    }
}

fn build_patch(
    missing_fields: &[HomeAttributeField],
    draft: &BTreeMap<HomeAttributeField, String>,
) -> Result<HomeDetailsPatch, ResolutionError> {
    let mut patch = HomeDetailsPatch::default();
    for &field in missing_fields {
        let raw = draft.get(&field).map(|value| value.trim()).unwrap_or("");
        if raw.is_empty() {
            return Err(ResolutionError::MissingField(field));
        }
        let value = raw.parse::<u32>().map_err(|_| ResolutionError::InvalidValue {
            field,
            value: raw.to_string(),
        })?;
        patch.set(field, value);
    }
    Ok(patch)
}
