//! Module defining the normalized rows produced by a scan and the tables they are split into.

use std::io::Write;

use serde::Serialize;

use crate::Error;


pub const REGION: &str = "Region";
pub const INSTANCE_TYPE: &str = "Instance Type";
pub const INSTANCE_COUNT: &str = "Instance Count";
pub const DURATION_DAYS: &str = "Duration (days)";
pub const START_DATE: &str = "Start Date";
pub const END_DATE: &str = "End Date";
pub const UPFRONT_FEE: &str = "Upfront Fee";
pub const NUMBER_OF_PARTS: &str = "Number of Parts";
pub const AVAILABILITY_ZONE: &str = "Availability Zone";
pub const ERROR: &str = "Error";

/// Column order of the success table.
pub const OFFERING_COLUMNS: [&str; 9] = [
    REGION,
    INSTANCE_TYPE,
    INSTANCE_COUNT,
    DURATION_DAYS,
    START_DATE,
    END_DATE,
    UPFRONT_FEE,
    NUMBER_OF_PARTS,
    AVAILABILITY_ZONE,
];

/// Column order of the table of alternatives found by a fallback scan.
pub const FALLBACK_COLUMNS: [&str; 6] = [
    REGION,
    INSTANCE_TYPE,
    INSTANCE_COUNT,
    DURATION_DAYS,
    START_DATE,
    END_DATE,
];

pub const ERROR_COLUMNS: [&str; 2] = [REGION, ERROR];

/// A provider offering flattened into display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferingRow {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Instance Type")]
    pub instance_type: String,
    #[serde(rename = "Instance Count")]
    pub instance_count: String,
    #[serde(rename = "Duration (days)")]
    pub duration_days: String,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Upfront Fee")]
    pub upfront_fee: String,
    #[serde(rename = "Number of Parts")]
    pub number_of_parts: String,
    #[serde(rename = "Availability Zone")]
    pub availability_zone: String,
}

impl OfferingRow {
    /// Value of the column with the given header, if the row has such a column.
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            REGION => &self.region,
            INSTANCE_TYPE => &self.instance_type,
            INSTANCE_COUNT => &self.instance_count,
            DURATION_DAYS => &self.duration_days,
            START_DATE => &self.start_date,
            END_DATE => &self.end_date,
            UPFRONT_FEE => &self.upfront_fee,
            NUMBER_OF_PARTS => &self.number_of_parts,
            AVAILABILITY_ZONE => &self.availability_zone,
            _ => return None,
        };
        Some(value)
    }
}

/// A failed (region, instance type) call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Error")]
    pub error: String,
}

/// One item of an aggregated scan result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanItem {
    Offering(OfferingRow),
    Error(ScanError),
}

impl ScanItem {
    pub fn region(&self) -> &str {
        match self {
            ScanItem::Offering(row) => &row.region,
            ScanItem::Error(err) => &err.region,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ScanItem::Error(_))
    }
}

/// Rows projected onto an explicit column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the header followed by all rows as CSV.
    pub fn write_csv(&self, writer: impl Write) -> Result<(), Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Success and error rows of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
    pub offerings: Table,
    pub errors: Table,
}

/// Partitions scan items into successful rows, projected onto `columns` in the given order, and error rows,
/// projected onto [`ERROR_COLUMNS`]. Column names no row provides are dropped.
///
/// Empty input yields two empty tables.
pub fn split<S: AsRef<str>>(items: &[ScanItem], columns: &[S]) -> SplitResult {
    if items.is_empty() {
        return SplitResult::default();
    }

    let (offerings, errors): (Vec<&ScanItem>, Vec<&ScanItem>) =
        items.iter().partition(|item| !item.is_error());

    SplitResult {
        offerings: project_offerings(&offerings, columns),
        errors: project_errors(&errors),
    }
}

fn project_offerings<S: AsRef<str>>(items: &[&ScanItem], columns: &[S]) -> Table {
    let rows: Vec<&OfferingRow> = items
        .iter()
        .filter_map(|item| match item {
            ScanItem::Offering(row) => Some(row),
            ScanItem::Error(_) => None,
        })
        .collect();
    let Some(first) = rows.first() else {
        return Table::default();
    };

    let columns: Vec<&str> = columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|column| first.field(column).is_some())
        .collect();

    Table {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .filter_map(|column| row.field(column))
                    .map(str::to_string)
                    .collect()
            })
            .collect(),
    }
}

fn project_errors(items: &[&ScanItem]) -> Table {
    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(|item| match item {
            ScanItem::Error(err) => Some(vec![err.region.clone(), err.error.clone()]),
            ScanItem::Offering(_) => None,
        })
        .collect();
    if rows.is_empty() {
        return Table::default();
    }

    Table {
        columns: ERROR_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}
