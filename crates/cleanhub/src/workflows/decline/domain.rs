use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for booked appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppointmentId(pub i64);

/// Identifier wrapper for homeowner home records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HomeId(pub i64);

/// The two ways a homeowner can resolve a declined appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclineAction {
    Cancel,
    Marketplace,
}

impl DeclineAction {
    pub const fn label(self) -> &'static str {
        match self {
            DeclineAction::Cancel => "cancel",
            DeclineAction::Marketplace => "marketplace",
        }
    }
}

/// Listing state tracked on the server. The client never mutates this
/// directly; it only requests transitions and reflects the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Declined,
    Cancelled,
    OpenToMarketplace,
}

impl AppointmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Declined => "declined",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::OpenToMarketplace => "open_to_marketplace",
        }
    }
}

/// A booked cleaning, as the marketplace service stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub home_id: HomeId,
    pub scheduled_for: NaiveDate,
    pub business_owner_name: Option<String>,
    /// Price the homeowner originally booked at, whole dollars.
    pub booked_price: u32,
    /// Price the job was listed at, set when the listing is confirmed.
    pub marketplace_price: Option<u32>,
    pub status: AppointmentStatus,
}

/// Structural attributes required to price a cleaning job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HomeAttributeField {
    NumBeds,
    NumBaths,
    TimeToBeCompleted,
}

impl HomeAttributeField {
    pub const fn label(self) -> &'static str {
        match self {
            HomeAttributeField::NumBeds => "numBeds",
            HomeAttributeField::NumBaths => "numBaths",
            HomeAttributeField::TimeToBeCompleted => "timeToBeCompleted",
        }
    }
}

impl fmt::Display for HomeAttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A homeowner's property record. Attributes arrive incrementally, so each
/// one is optional until the homeowner has filled it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeRecord {
    pub id: HomeId,
    pub num_beds: Option<u32>,
    pub num_baths: Option<u32>,
    /// Linen-service window in hours.
    pub time_to_be_completed: Option<u32>,
}

impl HomeRecord {
    /// Returns the fully-populated attribute set, or the exact list of
    /// fields still missing.
    pub fn complete_attributes(&self) -> Result<CompleteHomeAttributes, Vec<HomeAttributeField>> {
        match (self.num_beds, self.num_baths, self.time_to_be_completed) {
            (Some(num_beds), Some(num_baths), Some(time_to_be_completed)) => {
                Ok(CompleteHomeAttributes {
                    num_beds,
                    num_baths,
                    time_to_be_completed,
                })
            }
            _ => {
                let mut missing = Vec::new();
                if self.num_beds.is_none() {
                    missing.push(HomeAttributeField::NumBeds);
                }
                if self.num_baths.is_none() {
                    missing.push(HomeAttributeField::NumBaths);
                }
                if self.time_to_be_completed.is_none() {
                    missing.push(HomeAttributeField::TimeToBeCompleted);
                }
                Err(missing)
            }
        }
    }

    /// Overlays the fields present in the patch onto the record.
    pub fn apply(&mut self, patch: &HomeDetailsPatch) {
        if let Some(num_beds) = patch.num_beds {
            self.num_beds = Some(num_beds);
        }
        if let Some(num_baths) = patch.num_baths {
            self.num_baths = Some(num_baths);
        }
        if let Some(time_to_be_completed) = patch.time_to_be_completed {
            self.time_to_be_completed = Some(time_to_be_completed);
        }
    }
}

/// Attribute set with every pricing input present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteHomeAttributes {
    pub num_beds: u32,
    pub num_baths: u32,
    pub time_to_be_completed: u32,
}

/// Partial home update. Serializes only the fields present, so the wire
/// body carries exactly the subset that was missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDetailsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_beds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_baths: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_be_completed: Option<u32>,
}

impl HomeDetailsPatch {
    pub fn set(&mut self, field: HomeAttributeField, value: u32) {
        match field {
            HomeAttributeField::NumBeds => self.num_beds = Some(value),
            HomeAttributeField::NumBaths => self.num_baths = Some(value),
            HomeAttributeField::TimeToBeCompleted => self.time_to_be_completed = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_beds.is_none() && self.num_baths.is_none() && self.time_to_be_completed.is_none()
    }
}

/// Delivered to the homeowner's client when a business owner declines.
/// Consumed once when the resolution modal opens; never persisted there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineNotification {
    pub appointment_id: AppointmentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_owner_name: Option<String>,
    pub appointment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn default_ok() -> bool {
    true
}

/// Wire response shared by every decline-workflow endpoint. The router
/// serializes it and the resolution session consumes it, so both sides of
/// the wire agree on one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineResponseBody {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_home_details: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<HomeAttributeField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_id: Option<HomeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for DeclineResponseBody {
    fn default() -> Self {
        Self {
            ok: true,
            needs_home_details: None,
            missing_fields: None,
            home_id: None,
            confirm_required: None,
            marketplace_price: None,
            current_price: None,
            error: None,
        }
    }
}

impl DeclineResponseBody {
    /// Plain `{ok: true}` acknowledgement.
    pub fn accepted() -> Self {
        Self::default()
    }

    pub fn needs_home_details(home_id: HomeId, missing_fields: Vec<HomeAttributeField>) -> Self {
        Self {
            needs_home_details: Some(true),
            missing_fields: Some(missing_fields),
            home_id: Some(home_id),
            ..Self::default()
        }
    }

    pub fn confirm_required(home_id: HomeId, marketplace_price: u32, current_price: u32) -> Self {
        Self {
            confirm_required: Some(true),
            marketplace_price: Some(marketplace_price),
            current_price: Some(current_price),
            home_id: Some(home_id),
            ..Self::default()
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok && self.error.is_none()
    }
}
