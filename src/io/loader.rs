// src/io/loader.rs
//
// Reads the case tables from a CSV file or an Excel workbook.
// Volume table: Month, Production_weeks, Sales_weeks, Avg_weekly_demand, Total_monthly_demand
// Parameter table: Parameter, Value
// Product mix table (optional): Month, Consumer, PC, Professional

use crate::error::{PlannerError, PlannerResult};
use crate::model::case::{
    CaseParameters, MonthRecord, ProductMix, DEFAULT_OVERTIME_SHARE, SUNDAY_SHIFT_DAYS,
};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

pub type RawRecord = HashMap<String, String>;

const VOLUME_SHEET: &str = "Volume_2000";
const PARAMETER_SHEET: &str = "Costs";
const MIX_SHEET: &str = "Forecast_2000_weekly";

/// Loads a case from `path`, choosing the reader by extension.
///
/// A CSV file holds the volume table only; parameters keep the built-in
/// values. Use [`load_case_with_parameters`] to supply a parameter table as well.
pub fn load_case(path: impl AsRef<Path>) -> PlannerResult<CaseParameters> {
    load_case_with_parameters(path, None)
}

/// Like [`load_case`], with an optional CSV parameter table for a CSV volume
/// table. Workbooks carry their own `Costs` sheet and reject a separate one.
pub fn load_case_with_parameters(
    path: impl AsRef<Path>,
    parameters: Option<&Path>,
) -> PlannerResult<CaseParameters> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_case_from_csv(path, parameters),
        "xlsx" | "xls" if parameters.is_some() => Err(PlannerError::config(
            "a parameter table only applies to a CSV volume table",
        )),
        "xlsx" | "xls" => load_case_from_workbook(path),
        _ => Err(PlannerError::UnsupportedFormat(path.display().to_string())),
    }
}

pub fn load_case_from_csv(
    volume: &Path,
    parameters: Option<&Path>,
) -> PlannerResult<CaseParameters> {
    let volume_rows = read_csv_records(volume)?;
    let parameter_rows = match parameters {
        Some(path) => Some(read_csv_records(path)?),
        None => None,
    };
    let case = case_from_records(&volume_rows, parameter_rows.as_deref(), None)?;
    info!(path = %volume.display(), "case loaded from csv");
    Ok(case)
}

pub fn load_case_from_workbook(path: &Path) -> PlannerResult<CaseParameters> {
    if !path.exists() {
        return Err(PlannerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("workbook not found: {}", path.display()),
        )));
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|e| PlannerError::Excel(e.to_string()))?;
    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(PlannerError::Excel("workbook has no sheets".to_string()));
    }

    let mut sheets: HashMap<String, Vec<RawRecord>> = HashMap::new();
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| PlannerError::Excel(e.to_string()))?;
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            continue;
        };
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| normalize_key(&cell.to_string()))
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let record: RawRecord = headers
                .iter()
                .zip(data_row.iter())
                .map(|(h, cell)| (h.clone(), cell.to_string().trim().to_string()))
                .collect();
            if record.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(record);
        }
        debug!(sheet = name.as_str(), rows = records.len(), "sheet read");
        sheets.insert(name.clone(), records);
    }

    let volume = sheets
        .get(VOLUME_SHEET)
        .or_else(|| {
            sheet_names
                .iter()
                .filter_map(|n| sheets.get(n))
                .find(|rows| rows.first().is_some_and(|r| r.contains_key("month")))
        })
        .ok_or_else(|| PlannerError::config("workbook has no sheet with a Month column"))?;

    let case = case_from_records(
        volume,
        sheets.get(PARAMETER_SHEET).map(Vec::as_slice),
        sheets.get(MIX_SHEET).map(Vec::as_slice),
    )?;
    info!(path = %path.display(), "case loaded from workbook");
    Ok(case)
}

/// Reads a headed CSV file into one map per non-blank row, keyed by the
/// normalized header name.
pub fn read_csv_records(path: &Path) -> PlannerResult<Vec<RawRecord>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_key).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        if record.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// Builds and validates a case from raw tables. Parameters missing from the
/// parameter table keep the built-in case values.
pub fn case_from_records(
    volume: &[RawRecord],
    parameters: Option<&[RawRecord]>,
    mix: Option<&[RawRecord]>,
) -> PlannerResult<CaseParameters> {
    let defaults = CaseParameters::oaty_2000();

    let months = parse_volume(volume)?;
    let mut case = CaseParameters {
        months,
        ..defaults.clone()
    };

    if let Some(rows) = parameters {
        apply_parameters(&mut case, rows)?;
    }

    case.product_mix = match mix {
        Some(rows) => parse_mix(rows)?,
        None if case.month_labels() == defaults.month_labels() => defaults.product_mix,
        None => Vec::new(),
    };

    case.validate()?;
    Ok(case)
}

fn parse_volume(rows: &[RawRecord]) -> PlannerResult<Vec<MonthRecord>> {
    const TABLE: &str = "volume";
    if rows.is_empty() {
        return Err(PlannerError::config("volume table is empty"));
    }
    let first = &rows[0];
    for column in ["month", "production_weeks", "sales_weeks"] {
        require_column(TABLE, first, column)?;
    }
    let total_key = ["total_monthly_demand", "total_months_demand"]
        .into_iter()
        .find(|k| first.contains_key(*k));
    if total_key.is_none() && !first.contains_key("avg_weekly_demand") {
        return Err(PlannerError::MissingColumn {
            table: TABLE.to_string(),
            column: "Total_monthly_demand".to_string(),
        });
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let row_no = i + 1;
            let month = row.get("month").cloned().unwrap_or_default();
            let production_weeks = parse_weeks(TABLE, row_no, row, "production_weeks")?;
            let sales_weeks = parse_weeks(TABLE, row_no, row, "sales_weeks")?;

            let (avg_weekly_demand, total_demand) = match total_key {
                Some(key) => {
                    let total = parse_number(TABLE, row_no, row, key)?;
                    let avg = match row.get("avg_weekly_demand") {
                        Some(_) => parse_number(TABLE, row_no, row, "avg_weekly_demand")?,
                        None if sales_weeks > 0 => total / f64::from(sales_weeks),
                        None => 0.0,
                    };
                    (avg, total)
                }
                None => {
                    let avg = parse_number(TABLE, row_no, row, "avg_weekly_demand")?;
                    (avg, avg * f64::from(sales_weeks))
                }
            };

            Ok(MonthRecord {
                month,
                production_weeks,
                sales_weeks,
                avg_weekly_demand,
                total_demand,
            })
        })
        .collect()
}

fn apply_parameters(case: &mut CaseParameters, rows: &[RawRecord]) -> PlannerResult<()> {
    const TABLE: &str = "parameters";
    if let Some(first) = rows.first() {
        require_column(TABLE, first, "parameter")?;
        require_column(TABLE, first, "value")?;
    }

    let mut overtime_limit_given = false;
    let mut sunday_given = false;

    for (i, row) in rows.iter().enumerate() {
        let name = row.get("parameter").map(|s| normalize_key(s)).unwrap_or_default();
        let value = parse_number(TABLE, i + 1, row, "value")?;

        match name.as_str() {
            "weekly_capacity" | "capacity_drives_per_week" => case.weekly_base_capacity = value,
            "weekly_overtime_limit" => {
                case.weekly_overtime_limit = value;
                overtime_limit_given = true;
            }
            "weekly_sunday_overtime" => {
                case.weekly_sunday_overtime = value;
                sunday_given = true;
            }
            "inventory_holding_cost" => case.holding_cost_rate = value,
            "holding_cost_pct_annual" => case.holding_cost_rate = value / 100.0,
            "overtime_cost_weekday" | "overtime_weekday_mult" => case.overtime_multiplier = value,
            "subcontract_cost" => case.subcontract_multiplier = value,
            "subcontract_cost_max_pct" => case.subcontract_multiplier = value / 100.0,
            "warehouse_capacity" | "warehouse_capacity_drives" => case.warehouse_capacity = value,
            "opening_inventory" => case.opening_inventory = value,
            other => debug!(parameter = other, "parameter not used by the planner"),
        }
    }

    if !overtime_limit_given {
        case.weekly_overtime_limit = case.weekly_base_capacity * DEFAULT_OVERTIME_SHARE;
    }
    if !sunday_given {
        case.weekly_sunday_overtime = case.weekly_base_capacity * SUNDAY_SHIFT_DAYS;
    }
    Ok(())
}

fn parse_mix(rows: &[RawRecord]) -> PlannerResult<Vec<ProductMix>> {
    const TABLE: &str = "product mix";
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(ProductMix {
                month: row.get("month").cloned().unwrap_or_default(),
                consumer: parse_number(TABLE, i + 1, row, "consumer")?,
                pc: parse_number(TABLE, i + 1, row, "pc")?,
                professional: parse_number(TABLE, i + 1, row, "professional")?,
            })
        })
        .collect()
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '-'], "_")
}

fn require_column(table: &str, row: &RawRecord, column: &str) -> PlannerResult<()> {
    if row.contains_key(column) {
        Ok(())
    } else {
        Err(PlannerError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
    }
}

fn parse_number(table: &str, row_no: usize, row: &RawRecord, column: &str) -> PlannerResult<f64> {
    let raw = row
        .get(column)
        .ok_or_else(|| PlannerError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })?;
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PlannerError::InvalidValue {
            table: table.to_string(),
            row: row_no,
            column: column.to_string(),
            value: raw.clone(),
        })
}

fn parse_weeks(table: &str, row_no: usize, row: &RawRecord, column: &str) -> PlannerResult<u32> {
    let value = parse_number(table, row_no, row, column)?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(PlannerError::InvalidValue {
            table: table.to_string(),
            row: row_no,
            column: column.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value as u32)
}
