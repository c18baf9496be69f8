use anyhow::Result;
use capacity_finder::{
    AwsProvider, CapacityBlockReport, Cli, Command, Table, TrainingPlanReport,
    find_capacity_blocks, find_training_plans, setup_logging,
};
use clap::Parser;
use tracing::{debug, info, warn};

fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();
    let request = cli.command.search_args().to_request()?;
    let provider = AwsProvider::new(cli.profile)?;

    match cli.command {
        Command::CapacityBlocks(_) => report_capacity_blocks(find_capacity_blocks(&provider, &request)),
        Command::TrainingPlans(_) => report_training_plans(find_training_plans(&provider, &request)),
    }
}

fn report_capacity_blocks(report: CapacityBlockReport) -> Result<()> {
    match &report.fallback {
        None => {
            info!("Capacity blocks found");
            print_table(&report.primary.offerings)?;
        }
        Some(fallback) if fallback.is_exhausted() => {
            warn!("No offerings found even with reduced parameters");
            debug_errors(&fallback.result.errors);
        }
        Some(fallback) => {
            info!(
                instance_count = fallback.params.instance_count,
                duration_days = fallback.params.duration_days,
                "Found alternatives with reduced parameters"
            );
            print_table(&fallback.result.offerings)?;
            debug_errors(&fallback.result.errors);
        }
    }
    report_errors(&report.primary.errors)
}

fn report_training_plans(report: TrainingPlanReport) -> Result<()> {
    if report.result.offerings.is_empty() {
        info!("No SageMaker offerings found");
    } else {
        info!("SageMaker offerings found");
        print_table(&report.result.offerings)?;
    }
    report_errors(&report.result.errors)
}

fn print_table(table: &Table) -> Result<()> {
    table.write_csv(std::io::stdout())?;
    Ok(())
}

fn report_errors(errors: &Table) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    warn!(regions = errors.len(), "Some regions returned errors");
    errors.write_csv(std::io::stderr())?;
    Ok(())
}

// Errors of the relaxed scan are expected (e.g., halved durations the provider does not accept)
fn debug_errors(errors: &Table) {
    for row in errors.rows() {
        if let [region, error] = row.as_slice() {
            debug!(region = %region, "reduced scan failed: {error}");
        }
    }
}
