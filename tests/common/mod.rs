//! Test doubles shared by the integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use capacity_finder::{
    CapacityBlockOffering, CapacityBlockQuery, CapacityProvider, ProviderError,
    ProviderTimestamp, ReservedCapacityOffering, TrainingPlanOffering, TrainingPlanQuery,
};

type Key = (String, String);

/// One recorded provider call: region and the instance type, count and duration (hours) it asked for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Call {
    pub region: String,
    pub instance_type: String,
    pub instance_count: u32,
    pub duration_hours: u32,
}

/// Provider answering from canned responses per (region, instance type). Unknown pairs return no offerings.
#[derive(Default)]
pub struct MockProvider {
    capacity: HashMap<Key, Result<Vec<CapacityBlockOffering>, ProviderError>>,
    training: HashMap<Key, Result<Vec<TrainingPlanOffering>, ProviderError>>,
    calls: Mutex<Vec<Call>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(
        mut self,
        region: &str,
        instance_type: &str,
        response: Result<Vec<CapacityBlockOffering>, ProviderError>,
    ) -> Self {
        self.capacity
            .insert((region.to_string(), instance_type.to_string()), response);
        self
    }

    /// `instance_type` is the unprefixed type, as selected by the user.
    pub fn training(
        mut self,
        region: &str,
        instance_type: &str,
        response: Result<Vec<TrainingPlanOffering>, ProviderError>,
    ) -> Self {
        self.training
            .insert((region.to_string(), instance_type.to_string()), response);
        self
    }

    /// Recorded calls, sorted.
    pub fn calls(&self) -> Vec<Call> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }

    fn record(&self, region: &str, instance_type: &str, instance_count: u32, duration_hours: u32) {
        self.calls.lock().unwrap().push(Call {
            region: region.to_string(),
            instance_type: instance_type.to_string(),
            instance_count,
            duration_hours,
        });
    }
}

impl CapacityProvider for MockProvider {
    fn describe_capacity_block_offerings(
        &self,
        region: &str,
        query: &CapacityBlockQuery,
    ) -> Result<Vec<CapacityBlockOffering>, ProviderError> {
        self.record(
            region,
            &query.instance_type,
            query.instance_count,
            query.capacity_duration_hours,
        );
        self.capacity
            .get(&(region.to_string(), query.instance_type.clone()))
            .cloned()
            .unwrap_or(Ok(Vec::new()))
    }

    fn search_training_plan_offerings(
        &self,
        region: &str,
        query: &TrainingPlanQuery,
    ) -> Result<Vec<TrainingPlanOffering>, ProviderError> {
        self.record(
            region,
            &query.instance_type,
            query.instance_count,
            query.duration_hours,
        );
        let instance_type = query
            .instance_type
            .strip_prefix("ml.")
            .unwrap_or(&query.instance_type);
        self.training
            .get(&(region.to_string(), instance_type.to_string()))
            .cloned()
            .unwrap_or(Ok(Vec::new()))
    }
}

/// The one-week p5 block used throughout the scenarios.
pub fn one_week_block(zone: &str) -> CapacityBlockOffering {
    CapacityBlockOffering {
        instance_type: Some("p5.48xlarge".to_string()),
        instance_count: Some(1),
        capacity_block_duration_hours: Some(168),
        upfront_fee: Some("120.50".to_string()),
        start_date: Some(ProviderTimestamp::from("2025-01-01T00:00:00Z")),
        end_date: Some(ProviderTimestamp::from("2025-01-08T00:00:00Z")),
        availability_zone: Some(zone.to_string()),
        reserved_capacity_offerings: None,
    }
}

pub fn training_offering(windows: Vec<ReservedCapacityOffering>) -> TrainingPlanOffering {
    TrainingPlanOffering {
        duration_hours: Some(168),
        upfront_fee: Some("2500.00".to_string()),
        reserved_capacity_offerings: windows,
    }
}

pub fn reservation_window(zone: &str, start: &str, end: &str) -> ReservedCapacityOffering {
    ReservedCapacityOffering {
        instance_type: Some("ml.p5.48xlarge".to_string()),
        instance_count: Some(2),
        availability_zone: Some(zone.to_string()),
        duration_hours: Some(168),
        start_time: Some(ProviderTimestamp::from(start)),
        end_time: Some(ProviderTimestamp::from(end)),
    }
}
