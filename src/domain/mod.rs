//! Module for the types defining the capacity search domain.

mod offering;

use chrono::NaiveDate;

pub use offering::{
    CapacityBlockOffering, CapacityBlockQuery, ProviderTimestamp, ReservedCapacityOffering,
    TrainingPlanOffering, TrainingPlanQuery,
};

use crate::error::{Error, validation_error};

/// Accelerator instance types offered for capacity blocks and training plans.
pub const INSTANCE_TYPES: [&str; 10] = [
    "p6-b200.48xlarge",
    "p5.4xlarge",
    "p5.48xlarge",
    "p5e.48xlarge",
    "p5en.48xlarge",
    "p4d.24xlarge",
    "p4de.24xlarge",
    "trn1.32xlarge",
    "trn2.48xlarge",
    "trn2.3xlarge",
];

/// The full region list. Also the region set of every fallback scan.
pub const AWS_REGIONS: [&str; 13] = [
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-north-1",
    "eu-west-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-south-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "sa-east-1",
];

/// Region selection entry that stands for [`AWS_REGIONS`].
pub const ALL_REGIONS: &str = "All Regions";

/// Reservation lengths (in days) accepted by the providers: every day up to two weeks, then whole weeks
/// up to 26 weeks.
pub const VALID_DURATIONS: [u32; 38] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 21, 28, 35, 42, 49, 56, 63, 70, 77, 84, 91, 98,
    105, 112, 119, 126, 133, 140, 147, 154, 161, 168, 175, 182,
];

pub const DEFAULT_DURATION_DAYS: u32 = 7;
pub const MAX_INSTANCE_COUNT: u32 = 256;

/// Upper bound of concurrent provider calls per scan.
pub const MAX_WORKERS: usize = 8;

/// Result cap sent with every capacity block query.
pub const MAX_RESULTS: i32 = 100;

/// Expands the [`ALL_REGIONS`] sentinel and removes duplicates, keeping the first occurrence.
pub fn expand_regions<S: AsRef<str>>(selection: &[S]) -> Vec<String> {
    if selection.iter().any(|r| r.as_ref() == ALL_REGIONS) {
        return AWS_REGIONS.iter().map(|r| r.to_string()).collect();
    }
    dedup(selection)
}

fn dedup<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.as_ref().trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// A validated search over the cross product of `regions` and `instance_types`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    instance_types: Vec<String>,
    regions: Vec<String>,
    params: ScanParams,
}

impl ScanRequest {
    pub fn new<S: AsRef<str>, R: AsRef<str>>(
        instance_types: &[S],
        regions: &[R],
        instance_count: u32,
        duration_days: u32,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Self, Error> {
        let instance_types = dedup(instance_types);
        if instance_types.is_empty() {
            return Err(validation_error("select at least one instance type"));
        }

        let regions = expand_regions(regions);
        if regions.is_empty() {
            return Err(validation_error("select at least one region"));
        }

        if !(1..=MAX_INSTANCE_COUNT).contains(&instance_count) {
            return Err(validation_error(format!(
                "instance count must be between 1 and {MAX_INSTANCE_COUNT}, got {instance_count}"
            )));
        }

        if !VALID_DURATIONS.contains(&duration_days) {
            return Err(validation_error(format!(
                "unsupported duration of {duration_days} days"
            )));
        }

        if let Some(end) = end {
            if start > end {
                return Err(validation_error("start date must be before end date"));
            }
        }

        Ok(Self {
            instance_types,
            regions,
            params: ScanParams {
                instance_count,
                duration_days,
                start,
                end,
            },
        })
    }

    pub fn instance_types(&self) -> &[String] {
        &self.instance_types
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn params(&self) -> ScanParams {
        self.params
    }
}

/// The part of a request every single (region, instance type) call receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    pub instance_count: u32,
    pub duration_days: u32,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl ScanParams {
    /// Halves count and duration (floored, at least 1). The date window is kept.
    ///
    /// The halved duration is not checked against [`VALID_DURATIONS`]: the provider is the authority on
    /// what it accepts and reports a rejected duration as a per-region error.
    pub fn reduced(&self) -> Self {
        Self {
            instance_count: (self.instance_count / 2).max(1),
            duration_days: (self.duration_days / 2).max(1),
            ..*self
        }
    }

    pub(crate) fn duration_hours(&self) -> u32 {
        self.duration_days * 24
    }
}
