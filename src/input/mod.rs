//! Module defining the parsing logic used to convert the user-provided search parameters into a validated
//! [`ScanRequest`].

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::domain::{ALL_REGIONS, DEFAULT_DURATION_DAYS, ScanRequest};
use crate::error::{Error, validation_error};


const DEFAULT_INSTANCE_TYPE: &str = "p5.48xlarge";

#[derive(Parser, Debug)]
#[command(
    name = "capacity-finder",
    version,
    about = "Finds EC2 capacity blocks and SageMaker training plans across regions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Named AWS profile to load credentials from. Defaults to the standard credential chain.
    #[arg(long, global = true)]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search EC2 capacity blocks, retrying with reduced parameters across all regions if nothing is found
    CapacityBlocks(SearchArgs),
    /// Search SageMaker training plan offerings
    TrainingPlans(SearchArgs),
}

impl Command {
    pub fn search_args(&self) -> &SearchArgs {
        match self {
            Command::CapacityBlocks(args) | Command::TrainingPlans(args) => args,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Instance type to search for; repeat for several
    #[arg(long = "instance-type", short = 't', default_value = DEFAULT_INSTANCE_TYPE)]
    pub instance_types: Vec<String>,

    /// Region to search in; repeat for several. "All Regions" selects every supported region
    #[arg(long = "region", short = 'r', default_value = ALL_REGIONS)]
    pub regions: Vec<String>,

    /// Number of instances to reserve (1-256)
    #[arg(long, short = 'c', default_value_t = 1)]
    pub count: u32,

    /// Reservation length in days: 1-14, or whole weeks up to 182
    #[arg(long, short = 'd', default_value_t = DEFAULT_DURATION_DAYS)]
    pub duration: u32,

    /// Earliest start date (YYYY-MM-DD or DD/MM/YYYY). Defaults to today
    #[arg(long)]
    pub start: Option<String>,

    /// Latest end date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub end: Option<String>,
}

impl SearchArgs {
    pub fn to_request(&self) -> Result<ScanRequest, Error> {
        let start = match &self.start {
            Some(raw) => parse_date(raw)?,
            None => Local::now().date_naive(),
        };
        let end = self.end.as_deref().map(parse_date).transpose()?;

        ScanRequest::new(
            self.instance_types.as_slice(),
            self.regions.as_slice(),
            self.count,
            self.duration,
            start,
            end,
        )
    }
}

/// Parses a calendar date given either as `YYYY-MM-DD` or as `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, Error> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| validation_error(format!("invalid date: {raw}")))
}
