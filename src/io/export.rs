//! Export the filtered table to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts. Headers are whatever the dataset's columns are (wire names or
//! localized labels), so a Japanese export opens with 年,類型,出動・搬送,件数.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::domain::Dataset;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Write `dataset` to `path` in the requested format.
pub fn write_dataset(path: &Path, dataset: &Dataset, format: ExportFormat) -> Result<(), AppError> {
    let body = match format {
        ExportFormat::Csv => to_csv(dataset)?,
        ExportFormat::Json => serde_json::to_string_pretty(&to_json(dataset))
            .map_err(|e| AppError::new(2, format!("Failed to encode export JSON: {e}")))?,
    };

    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export file '{}': {e}", path.display())))?;
    file.write_all(body.as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write export file '{}': {e}", path.display())))?;

    Ok(())
}

/// CSV text with a header row. Missing counts are empty cells.
pub fn to_csv(dataset: &Dataset) -> Result<String, AppError> {
    let c = &dataset.columns;
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([&c.year, &c.category, &c.mode, &c.count]).map_err(csv_error)?;

    for r in &dataset.records {
        let year = r.year.to_string();
        let count = r.value().map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([year.as_str(), r.category.as_str(), r.mode.as_str(), count.as_str()])
            .map_err(csv_error)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::new(2, format!("Failed to encode export CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::new(2, format!("Failed to encode export CSV: {e}")))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::new(2, format!("Failed to encode export CSV: {e}"))
}

/// JSON array of objects keyed by the dataset's column names.
pub fn to_json(dataset: &Dataset) -> Value {
    let c = &dataset.columns;
    let rows = dataset
        .records
        .iter()
        .map(|r| {
            let mut obj = Map::new();
            obj.insert(c.year.clone(), Value::from(r.year));
            obj.insert(c.category.clone(), Value::from(r.category.clone()));
            obj.insert(c.mode.clone(), Value::from(r.mode.clone()));
            obj.insert(c.count.clone(), r.value().map(Value::from).unwrap_or(Value::Null));
            Value::Object(obj)
        })
        .collect();
    Value::Array(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::localize;
    use crate::domain::{Locale, Record};

    fn sample() -> Dataset {
        Dataset::new(vec![
            Record::new(2015, "Traffic_accident", "Dispatch", Some(100.0)),
            Record::new(2016, "Traffic_accident", "Dispatch", None),
        ])
    }

    #[test]
    fn csv_uses_column_labels() {
        assert_eq!(
            to_csv(&sample()).unwrap(),
            "year,Type,Dispatch_Transport,Number\n2015,Traffic_accident,Dispatch,100\n2016,Traffic_accident,Dispatch,\n"
        );

        let ja = to_csv(&localize(&sample(), Locale::Ja)).unwrap();
        assert!(ja.starts_with("年,類型,出動・搬送,件数\n2015,交通事故,出動,100\n"));
    }

    #[test]
    fn csv_quotes_awkward_cells() {
        let ds = Dataset::new(vec![
            Record::new(2015, "Fire, rescue", "Dispatch", Some(1.0)),
            Record::new(2015, "say \"hi\"", "Dispatch", Some(2.0)),
        ]);
        let txt = to_csv(&ds).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[1], "2015,\"Fire, rescue\",Dispatch,1");
        assert_eq!(lines[2], "2015,\"say \"\"hi\"\"\",Dispatch,2");
    }

    #[test]
    fn json_keys_follow_columns() {
        let v = to_json(&localize(&sample(), Locale::En));
        let rows = v.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Year"], 2015);
        assert_eq!(rows[0]["Incident type"], "Traffic accident");
        assert_eq!(rows[0]["Count"], 100.0);
        assert!(rows[1]["Count"].is_null());
    }

    #[test]
    fn writes_file() {
        let path = std::env::temp_dir().join(format!("ems_export_test_{}.json", std::process::id()));
        write_dataset(&path, &sample(), ExportFormat::Json).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["Dispatch_Transport"], "Dispatch");
    }

    #[test]
    fn unwritable_path_is_an_input_error() {
        let path = std::env::temp_dir().join("ems_missing_dir_for_test").join("out.csv");
        let err = write_dataset(&path, &sample(), ExportFormat::Csv).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("out.csv"));
    }
}
