use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local};
use cleanhub::workflows::decline::{
    Appointment, AppointmentId, AppointmentRepository, AppointmentStatus, DeclineNotification,
    HomeId, HomeRecord, HomeRepository, NotificationError, NotificationPublisher, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) notifications: Arc<InMemoryNotificationPublisher>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAppointmentRepository {
    records: Arc<Mutex<HashMap<AppointmentId, Appointment>>>,
}

impl InMemoryAppointmentRepository {
    pub(crate) fn insert(&self, appointment: Appointment) {
        self.records
            .lock()
            .expect("appointment mutex poisoned")
            .insert(appointment.id, appointment);
    }

    pub(crate) fn get(&self, id: AppointmentId) -> Option<Appointment> {
        self.records
            .lock()
            .expect("appointment mutex poisoned")
            .get(&id)
            .cloned()
    }
}

impl AppointmentRepository for InMemoryAppointmentRepository {
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
pub(crate) struct InMemoryHomeRepository {
    records: Arc<Mutex<HashMap<HomeId, HomeRecord>>>,
}

impl InMemoryHomeRepository {
    pub(crate) fn insert(&self, home: HomeRecord) {
        self.records
            .lock()
            .expect("home mutex poisoned")
            .insert(home.id, home);
    }
}

impl HomeRepository for InMemoryHomeRepository {
    fn fetch(&self, id: HomeId) -> Result<Option<HomeRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("home mutex poisoned")
            .get(&id)
            .cloned())
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
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<DeclineNotification>>>,
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<DeclineNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: DeclineNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Seed one upcoming appointment and its home record so the service (and
/// the demo) have something to resolve. With `complete_home` the home can
/// be priced immediately; otherwise beds and the linen window are missing.
pub(crate) fn seed_demo_data(
    appointments: &InMemoryAppointmentRepository,
    homes: &InMemoryHomeRepository,
    complete_home: bool,
) -> AppointmentId {
    let scheduled_for = Local::now().date_naive() + Duration::days(3);

    homes.insert(HomeRecord {
        id: HomeId(42),
        num_beds: complete_home.then_some(3),
        num_baths: Some(2),
        time_to_be_completed: complete_home.then_some(4),
    });
    appointments.insert(Appointment {
        id: AppointmentId(101),
        home_id: HomeId(42),
        scheduled_for,
        business_owner_name: Some("Brightside Cleaning Co.".to_string()),
        booked_price: 150,
        marketplace_price: None,
        status: AppointmentStatus::Scheduled,
    });

    AppointmentId(101)
}
