use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::decline::domain::{
    Appointment, AppointmentId, AppointmentStatus, DeclineAction, DeclineNotification,
    DeclineResponseBody, HomeDetailsPatch, HomeId, HomeRecord,
};
use crate::workflows::decline::pricing::{PricingConfig, ServiceAreaPricingEngine};
use crate::workflows::decline::repository::{
    AppointmentRepository, HomeRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
use crate::workflows::decline::resolver::{DeclineResolver, DeclineResponseApi};
use crate::workflows::decline::router::decline_router;
use crate::workflows::decline::service::DeclineResponseService;
use crate::workflows::decline::session::ApiError;

pub(super) fn pricing_config() -> PricingConfig {
    PricingConfig {
        base_rate: 50,
        per_bedroom: 20,
        per_bathroom: 15,
        per_linen_hour: 10,
    }
}

pub(super) fn appointment_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 14).expect("valid date")
}

pub(super) fn scheduled_appointment(id: i64, home: i64) -> Appointment {
    Appointment {
        id: AppointmentId(id),
        home_id: HomeId(home),
        scheduled_for: appointment_date(),
        business_owner_name: Some("Brightside Cleaning Co.".to_string()),
        booked_price: 150,
        marketplace_price: None,
        status: AppointmentStatus::Scheduled,
    }
}

pub(super) fn declined_appointment(id: i64, home: i64) -> Appointment {
    Appointment {
        status: AppointmentStatus::Declined,
        ..scheduled_appointment(id, home)
    }
}

/// Attributes 3/2/4 quote to $180 under `pricing_config`.
pub(super) fn complete_home(id: i64) -> HomeRecord {
    HomeRecord {
        id: HomeId(id),
        num_beds: Some(3),
        num_baths: Some(2),
        time_to_be_completed: Some(4),
    }
}

pub(super) fn partial_home(id: i64) -> HomeRecord {
    HomeRecord {
        id: HomeId(id),
        num_beds: None,
        num_baths: Some(2),
        time_to_be_completed: None,
    }
}

pub(super) fn notification(appointment: i64) -> DeclineNotification {
    DeclineNotification {
        appointment_id: AppointmentId(appointment),
        business_owner_name: Some("Brightside Cleaning Co.".to_string()),
        appointment_date: appointment_date(),
        reason: Some("Crew double-booked".to_string()),
    }
}

pub(super) type TestService =
    DeclineResponseService<MemoryAppointments, MemoryHomes, MemoryNotifications>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryAppointments>,
    Arc<MemoryHomes>,
    Arc<MemoryNotifications>,
) {
    let appointments = Arc::new(MemoryAppointments::default());
    let homes = Arc::new(MemoryHomes::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = DeclineResponseService::new(
        appointments.clone(),
        homes.clone(),
        notifications.clone(),
        ServiceAreaPricingEngine::new(pricing_config()),
    );
    (service, appointments, homes, notifications)
}

pub(super) fn decline_router_with_service(service: TestService) -> axum::Router {
    decline_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 16)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryAppointments {
    records: Arc<Mutex<HashMap<AppointmentId, Appointment>>>,
}

impl MemoryAppointments {
    pub(super) fn insert(&self, appointment: Appointment) {
        self.records
            .lock()
            .expect("appointment mutex poisoned")
            .insert(appointment.id, appointment);
    }

    pub(super) fn get(&self, id: AppointmentId) -> Option<Appointment> {
        self.records
            .lock()
            .expect("appointment mutex poisoned")
            .get(&id)
            .cloned()
    }
}

impl AppointmentRepository for MemoryAppointments {
    fn fetch(&self, id: AppointmentId) -> Result<Option<Appointment>, RepositoryError> {
        Ok(self.get(id))
    }

    fn update(&self, appointment: Appointment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("appointment mutex poisoned");
        if guard.contains_key(&appointment.id) {
            guard.insert(appointment.id, appointment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryHomes {
    records: Arc<Mutex<HashMap<HomeId, HomeRecord>>>,
}

impl MemoryHomes {
    pub(super) fn insert(&self, home: HomeRecord) {
        self.records
            .lock()
            .expect("home mutex poisoned")
            .insert(home.id, home);
    }

    pub(super) fn get(&self, id: HomeId) -> Option<HomeRecord> {
        self.records
            .lock()
            .expect("home mutex poisoned")
            .get(&id)
            .cloned()
    }
}

impl HomeRepository for MemoryHomes {
    fn fetch(&self, id: HomeId) -> Result<Option<HomeRecord>, RepositoryError> {
        Ok(self.get(id))
    }

    fn update(&self, home: HomeRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("home mutex poisoned");
        if guard.contains_key(&home.id) {
            guard.insert(home.id, home);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<DeclineNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<DeclineNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: DeclineNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct UnavailableAppointments;

impl AppointmentRepository for UnavailableAppointments {
    fn fetch(&self, _id: AppointmentId) -> Result<Option<Appointment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _appointment: Appointment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Call the resolver has made, for asserting wire traffic (or its absence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RecordedCall {
    DeclineResponse {
        appointment: AppointmentId,
        action: DeclineAction,
    },
    ConfirmListing {
        appointment: AppointmentId,
    },
    UpdateHome {
        home: HomeId,
        patch: HomeDetailsPatch,
    },
}

/// Api fake that replays a scripted queue of responses and records every
/// call it receives.
#[derive(Default, Clone)]
pub(super) struct ScriptedApi {
    responses: Arc<Mutex<VecDeque<Result<DeclineResponseBody, ApiError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedApi {
    pub(super) fn with_responses(responses: Vec<Result<DeclineResponseBody, ApiError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn push(&self, response: Result<DeclineResponseBody, ApiError>) {
        self.responses
            .lock()
            .expect("responses mutex poisoned")
            .push_back(response);
    }

    pub(super) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn next(&self, call: RecordedCall) -> Result<DeclineResponseBody, ApiError> {
        self.calls.lock().expect("calls mutex poisoned").push(call);
        self.responses
            .lock()
            .expect("responses mutex poisoned")
            .pop_front()
            .expect("scripted response available")
    }
}

#[async_trait]
impl DeclineResponseApi for ScriptedApi {
    async fn submit_decline_response(
        &self,
        appointment: AppointmentId,
        action: DeclineAction,
    ) -> Result<DeclineResponseBody, ApiError> {
        self.next(RecordedCall::DeclineResponse {
            appointment,
            action,
        })
    }

    async fn confirm_marketplace_listing(
        &self,
        appointment: AppointmentId,
    ) -> Result<DeclineResponseBody, ApiError> {
        self.next(RecordedCall::ConfirmListing { appointment })
    }

    async fn update_home_details(
        &self,
        home: HomeId,
        patch: &HomeDetailsPatch,
    ) -> Result<DeclineResponseBody, ApiError> {
        self.next(RecordedCall::UpdateHome {
            home,
            patch: patch.clone(),
        })
    }
}

pub(super) fn open_resolver(api: &ScriptedApi, appointment: i64) -> DeclineResolver<ScriptedApi> {
    DeclineResolver::open(api.clone(), notification(appointment))
}
