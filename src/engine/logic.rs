//! Module for scanning a single (region, instance type) pair

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::{
    Error,
    domain::{CapacityBlockQuery, MAX_RESULTS, ScanParams, TrainingPlanQuery},
    engine::normalize::{TRAINING_INSTANCE_PREFIX, capacity_block_row, training_plan_row},
    output::{OfferingRow, ScanError, ScanItem},
    provider::CapacityProvider,
};

const TRAINING_JOB_RESOURCE: &str = "training-job";

///
/// Looks up the capacity block offerings of one instance type in one region.
///
/// Returns one row per offering, or a single error item when the call or the normalization of its response
/// fails. Never fails as a whole.
///
pub fn scan_capacity_blocks(
    provider: &impl CapacityProvider,
    region: &str,
    instance_type: &str,
    params: &ScanParams,
) -> Vec<ScanItem> {
    match try_scan_capacity_blocks(provider, region, instance_type, params) {
        Ok(rows) => rows.into_iter().map(ScanItem::Offering).collect(),
        Err(err) => vec![scan_error(region, instance_type, err)],
    }
}

///
/// Looks up the training plan offerings of one instance type in one region.
///
/// A region in which the provider does not offer training plans to the caller yields no items rather than
/// an error.
///
pub fn scan_training_plans(
    provider: &impl CapacityProvider,
    region: &str,
    instance_type: &str,
    params: &ScanParams,
) -> Vec<ScanItem> {
    match try_scan_training_plans(provider, region, instance_type, params) {
        Ok(rows) => rows.into_iter().map(ScanItem::Offering).collect(),
        Err(Error::Provider(err)) if err.is_unsupported_feature() => {
            debug!(region, instance_type, code = err.code(), "training plans not offered");
            Vec::new()
        }
        Err(err) => vec![scan_error(region, instance_type, err)],
    }
}

fn try_scan_capacity_blocks(
    provider: &impl CapacityProvider,
    region: &str,
    instance_type: &str,
    params: &ScanParams,
) -> Result<Vec<OfferingRow>, Error> {
    let query = capacity_block_query(instance_type, params);
    debug!(region, instance_type, ?query, "describing capacity block offerings");

    let offerings = provider.describe_capacity_block_offerings(region, &query)?;
    debug!(
        region,
        instance_type,
        offerings = offerings.len(),
        "received capacity block offerings"
    );

    offerings
        .iter()
        .map(|offering| capacity_block_row(region, instance_type, offering))
        .collect()
}

fn try_scan_training_plans(
    provider: &impl CapacityProvider,
    region: &str,
    instance_type: &str,
    params: &ScanParams,
) -> Result<Vec<OfferingRow>, Error> {
    let query = training_plan_query(instance_type, params);
    debug!(region, instance_type, ?query, "searching training plan offerings");

    let offerings = provider.search_training_plan_offerings(region, &query)?;
    debug!(
        region,
        instance_type,
        offerings = offerings.len(),
        "received training plan offerings"
    );

    let mut rows = Vec::with_capacity(offerings.len());
    for offering in &offerings {
        if let Some(row) = training_plan_row(region, instance_type, offering)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn scan_error(region: &str, instance_type: &str, err: Error) -> ScanItem {
    match &err {
        Error::Provider(provider_err) => warn!(
            region,
            instance_type,
            kind = %provider_err.kind(),
            code = provider_err.code(),
            "{err}"
        ),
        _ => warn!(region, instance_type, "{err}"),
    }
    ScanItem::Error(ScanError {
        region: region.to_string(),
        error: err.to_string(),
    })
}

pub(crate) fn capacity_block_query(instance_type: &str, params: &ScanParams) -> CapacityBlockQuery {
    CapacityBlockQuery {
        instance_type: instance_type.to_string(),
        instance_count: params.instance_count,
        capacity_duration_hours: params.duration_hours(),
        start_date_range: start_of_day(params.start),
        end_date_range: params.end.map(start_of_day),
        max_results: MAX_RESULTS,
    }
}

pub(crate) fn training_plan_query(instance_type: &str, params: &ScanParams) -> TrainingPlanQuery {
    TrainingPlanQuery {
        target_resource: TRAINING_JOB_RESOURCE.to_string(),
        instance_type: format!("{TRAINING_INSTANCE_PREFIX}{instance_type}"),
        instance_count: params.instance_count,
        duration_hours: params.duration_hours(),
        start_time_after: start_of_day(params.start),
        end_time_before: params.end.map(start_of_day),
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}
