//! Provider-side records: what is sent with each call and what comes back.

use chrono::{DateTime, FixedOffset};

/// Parameters of one "describe capacity block offerings" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityBlockQuery {
    pub instance_type: String,
    pub instance_count: u32,
    pub capacity_duration_hours: u32,
    pub start_date_range: DateTime<FixedOffset>,
    pub end_date_range: Option<DateTime<FixedOffset>>,
    pub max_results: i32,
}

/// Parameters of one "search training plan offerings" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPlanQuery {
    pub target_resource: String,
    /// Instance type in the provider's prefixed form, e.g. `ml.p5.48xlarge`.
    pub instance_type: String,
    pub instance_count: u32,
    pub duration_hours: u32,
    pub start_time_after: DateTime<FixedOffset>,
    pub end_time_before: Option<DateTime<FixedOffset>>,
}

/// A date value as the provider hands it out: either still text or already a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderTimestamp {
    Text(String),
    Structured(DateTime<FixedOffset>),
}

impl From<&str> for ProviderTimestamp {
    fn from(value: &str) -> Self {
        ProviderTimestamp::Text(value.to_string())
    }
}

impl From<DateTime<FixedOffset>> for ProviderTimestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        ProviderTimestamp::Structured(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityBlockOffering {
    pub instance_type: Option<String>,
    pub instance_count: Option<u32>,
    pub capacity_block_duration_hours: Option<u32>,
    /// Fee as reported, a decimal number in text form.
    pub upfront_fee: Option<String>,
    pub start_date: Option<ProviderTimestamp>,
    pub end_date: Option<ProviderTimestamp>,
    pub availability_zone: Option<String>,
    /// `None` when the provider omits the list altogether.
    pub reserved_capacity_offerings: Option<Vec<ReservedCapacityOffering>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingPlanOffering {
    pub duration_hours: Option<u32>,
    pub upfront_fee: Option<String>,
    pub reserved_capacity_offerings: Vec<ReservedCapacityOffering>,
}

/// One concrete reservation window within an offering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservedCapacityOffering {
    pub instance_type: Option<String>,
    pub instance_count: Option<u32>,
    pub availability_zone: Option<String>,
    pub duration_hours: Option<u32>,
    pub start_time: Option<ProviderTimestamp>,
    pub end_time: Option<ProviderTimestamp>,
}
