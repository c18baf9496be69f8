//! Conversion of provider offering records into display rows.
//!
//! All numbers and dates are formatted here, once. Rows are never parsed back.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::{
    Error,
    domain::{CapacityBlockOffering, ProviderTimestamp, ReservedCapacityOffering, TrainingPlanOffering},
    error::malformed_offering,
    output::OfferingRow,
};

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";
const NOT_AVAILABLE: &str = "N/A";
pub(crate) const TRAINING_INSTANCE_PREFIX: &str = "ml.";

/// Converts a provider date value into a timestamp. Text with a `Z` suffix or an explicit offset keeps its
/// offset; zone-less date-times and bare dates are read as UTC.
pub(crate) fn parse_timestamp(value: &ProviderTimestamp) -> Option<DateTime<FixedOffset>> {
    let text = match value {
        ProviderTimestamp::Structured(dt) => return Some(*dt),
        ProviderTimestamp::Text(text) => text.trim(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::from_str(text)
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })?;
    Some(naive.and_utc().fixed_offset())
}

pub(crate) fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// `$`-prefixed fee without trailing zeros, `$0` when absent. Text that is not a number is shown as is.
pub(crate) fn format_fee(fee: Option<&str>) -> String {
    let Some(fee) = fee.map(str::trim) else {
        return "$0".to_string();
    };
    match Decimal::from_str(fee) {
        Ok(amount) => format!("${}", amount.normalize()),
        Err(_) => format!("${fee}"),
    }
}

pub(crate) fn format_duration_days(hours: u32) -> String {
    let days = (Decimal::from(hours) / Decimal::from(24)).round_dp(2);
    format!("{days:.2}")
}

/// Number of reservation parts. A missing or empty list counts as a single part.
pub(crate) fn parts_count(parts: Option<&[ReservedCapacityOffering]>) -> usize {
    parts.map_or(1, |p| p.len().max(1))
}

pub(crate) fn display_instance_type(instance_type: &str) -> &str {
    instance_type
        .strip_prefix(TRAINING_INSTANCE_PREFIX)
        .unwrap_or(instance_type)
}

fn required_timestamp(
    value: Option<&ProviderTimestamp>,
    field: &str,
) -> Result<DateTime<FixedOffset>, Error> {
    let value = value.ok_or_else(|| malformed_offering(format!("missing {field}")))?;
    parse_timestamp(value).ok_or_else(|| malformed_offering(format!("unreadable {field}: {value:?}")))
}

fn optional_timestamp(value: Option<&ProviderTimestamp>, field: &str) -> Result<String, Error> {
    match value {
        None => Ok(NOT_AVAILABLE.to_string()),
        Some(_) => required_timestamp(value, field).map(|dt| format_timestamp(&dt)),
    }
}

pub(crate) fn capacity_block_row(
    region: &str,
    instance_type: &str,
    offering: &CapacityBlockOffering,
) -> Result<OfferingRow, Error> {
    let start = required_timestamp(offering.start_date.as_ref(), "start date")?;
    let end = required_timestamp(offering.end_date.as_ref(), "end date")?;
    let duration_hours = offering
        .capacity_block_duration_hours
        .ok_or_else(|| malformed_offering("missing capacity block duration"))?;

    Ok(OfferingRow {
        region: region.to_string(),
        instance_type: instance_type.to_string(),
        instance_count: offering.instance_count.unwrap_or(0).to_string(),
        duration_days: format_duration_days(duration_hours),
        start_date: format_timestamp(&start),
        end_date: format_timestamp(&end),
        upfront_fee: format_fee(offering.upfront_fee.as_deref()),
        number_of_parts: parts_count(offering.reserved_capacity_offerings.as_deref()).to_string(),
        availability_zone: offering
            .availability_zone
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    })
}

/// Row built from the first reservation window of the offering; `None` for an offering without any.
pub(crate) fn training_plan_row(
    region: &str,
    instance_type: &str,
    offering: &TrainingPlanOffering,
) -> Result<Option<OfferingRow>, Error> {
    let Some(first) = offering.reserved_capacity_offerings.first() else {
        return Ok(None);
    };

    let reserved_type = first.instance_type.as_deref().unwrap_or(instance_type);

    Ok(Some(OfferingRow {
        region: region.to_string(),
        instance_type: display_instance_type(reserved_type).to_string(),
        instance_count: first.instance_count.unwrap_or(0).to_string(),
        duration_days: format_duration_days(offering.duration_hours.unwrap_or(0)),
        start_date: optional_timestamp(first.start_time.as_ref(), "start time")?,
        end_date: optional_timestamp(first.end_time.as_ref(), "end time")?,
        upfront_fee: format_fee(offering.upfront_fee.as_deref()),
        number_of_parts: offering.reserved_capacity_offerings.len().to_string(),
        availability_zone: first
            .availability_zone
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }))
}
