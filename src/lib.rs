//! Searches capacity blocks and training plans across regions and instance types.
//!
//! A search fans out one provider call per (region, instance type) pair of a [`ScanRequest`] onto a bounded
//! pool of worker threads, normalizes every returned offering into an [`OfferingRow`] and splits the
//! aggregate into a table of offerings and a table of per-region errors.
//!
//! # Error handling
//!
//! A failing pair never aborts the search. Its error is captured as a [`ScanError`] row and reported next to
//! the offerings of the other pairs, so [`find_capacity_blocks`] and [`find_training_plans`] always return
//! a report. Only building the request itself can fail, with [`Error::Validation`].
//!
//! # Example
//!
//! ```no_run
//! use capacity_finder::{CapacityProvider, ScanRequest, find_capacity_blocks, parse_date};
//!
//! fn search(provider: &impl CapacityProvider) -> Result<(), capacity_finder::Error> {
//!     let request = ScanRequest::new(
//!         &["p5.48xlarge"],
//!         &["All Regions"],
//!         1,
//!         7,
//!         parse_date("2025-01-01")?,
//!         None,
//!     )?;
//!
//!     let report = find_capacity_blocks(provider, &request);
//!     report.primary.offerings.write_csv(std::io::stdout())?;
//!     Ok(())
//! }
//! ```

mod domain;
mod engine;
mod error;
mod input;
mod output;
mod provider;
mod telemetry;

pub use domain::{
    ALL_REGIONS, AWS_REGIONS, CapacityBlockOffering, CapacityBlockQuery, DEFAULT_DURATION_DAYS,
    INSTANCE_TYPES, MAX_INSTANCE_COUNT, MAX_RESULTS, MAX_WORKERS, ProviderTimestamp,
    ReservedCapacityOffering, ScanParams, ScanRequest, TrainingPlanOffering, TrainingPlanQuery,
    VALID_DURATIONS, expand_regions,
};
pub use engine::{
    CapacityBlockReport, FallbackReport, TrainingPlanReport, find_capacity_blocks,
    find_training_plans, run_parallel, scan_capacity_blocks, scan_training_plans,
};
pub use error::{Error, ProviderError, ProviderErrorKind};
pub use input::{Cli, Command, SearchArgs, parse_date};
pub use output::{
    ERROR_COLUMNS, FALLBACK_COLUMNS, OFFERING_COLUMNS, OfferingRow, ScanError, ScanItem,
    SplitResult, Table, split,
};
#[cfg(feature = "aws")]
pub use provider::AwsProvider;
pub use provider::CapacityProvider;
pub use telemetry::setup_logging;
