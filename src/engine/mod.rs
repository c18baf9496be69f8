//! Module for the core logic of the scanner: per-pair scans, their parallel dispatch and the fallback policy

mod logic;
mod normalize;
mod orchestration;


use tracing::info;

pub use logic::{scan_capacity_blocks, scan_training_plans};
pub use orchestration::run_parallel;

use crate::{
    domain::{AWS_REGIONS, MAX_WORKERS, ScanParams, ScanRequest},
    output::{FALLBACK_COLUMNS, OFFERING_COLUMNS, SplitResult, split},
    provider::CapacityProvider,
};

/// Outcome of a capacity block search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityBlockReport {
    pub primary: SplitResult,
    /// Present only when the primary scan found no offering.
    pub fallback: Option<FallbackReport>,
}

/// Outcome of the relaxed scan run after an empty primary scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackReport {
    pub params: ScanParams,
    pub regions: Vec<String>,
    pub result: SplitResult,
}

impl FallbackReport {
    /// Whether the relaxed scan did not find anything either.
    pub fn is_exhausted(&self) -> bool {
        self.result.offerings.is_empty()
    }
}

/// Outcome of a training plan search. There is no fallback for training plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPlanReport {
    pub result: SplitResult,
}

///
/// Searches capacity blocks for every selected (region, instance type) pair.
///
/// If no pair yields an offering, a second scan over all regions with halved instance count and duration is
/// run. Its result is reported as is; there is no further fallback.
///
pub fn find_capacity_blocks(
    provider: &impl CapacityProvider,
    request: &ScanRequest,
) -> CapacityBlockReport {
    let params = request.params();
    info!(
        regions = request.regions().len(),
        instance_types = request.instance_types().len(),
        instance_count = params.instance_count,
        duration_days = params.duration_days,
        "scanning capacity blocks"
    );

    let items = run_parallel(
        |region, instance_type| scan_capacity_blocks(provider, region, instance_type, &params),
        request.regions(),
        request.instance_types(),
        MAX_WORKERS,
    );
    let primary = split(&items, &OFFERING_COLUMNS);

    if !primary.offerings.is_empty() {
        info!(offerings = primary.offerings.len(), "capacity blocks found");
        return CapacityBlockReport {
            primary,
            fallback: None,
        };
    }

    CapacityBlockReport {
        primary,
        fallback: Some(run_fallback(provider, request)),
    }
}

fn run_fallback(provider: &impl CapacityProvider, request: &ScanRequest) -> FallbackReport {
    let params = request.params().reduced();
    let regions: Vec<String> = AWS_REGIONS.iter().map(|r| r.to_string()).collect();
    info!(
        regions = regions.len(),
        instance_count = params.instance_count,
        duration_days = params.duration_days,
        "no capacity found, retrying with reduced parameters"
    );

    let items = run_parallel(
        |region, instance_type| scan_capacity_blocks(provider, region, instance_type, &params),
        &regions,
        request.instance_types(),
        MAX_WORKERS,
    );
    let result = split(&items, &FALLBACK_COLUMNS);
    info!(
        offerings = result.offerings.len(),
        "reduced capacity block scan finished"
    );

    FallbackReport {
        params,
        regions,
        result,
    }
}

/// Searches training plan offerings for every selected (region, instance type) pair.
pub fn find_training_plans(
    provider: &impl CapacityProvider,
    request: &ScanRequest,
) -> TrainingPlanReport {
    let params = request.params();
    info!(
        regions = request.regions().len(),
        instance_types = request.instance_types().len(),
        instance_count = params.instance_count,
        duration_days = params.duration_days,
        "scanning training plans"
    );

    let items = run_parallel(
        |region, instance_type| scan_training_plans(provider, region, instance_type, &params),
        request.regions(),
        request.instance_types(),
        MAX_WORKERS,
    );
    let result = split(&items, &OFFERING_COLUMNS);
    info!(offerings = result.offerings.len(), "training plan scan finished");

    TrainingPlanReport { result }
}
