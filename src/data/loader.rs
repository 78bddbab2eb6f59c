use std::path::{Path, PathBuf};
use std::time::Duration;

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Dataset, Record, SENTINEL_COUNTRY};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {location}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not fetch {location}")]
    Unreachable {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetching {location} returned HTTP {status}")]
    HttpStatus {
        location: String,
        status: reqwest::StatusCode,
    },
    #[error("malformed CSV")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),
    #[error("malformed Parquet")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("malformed Arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("schema mismatch at row {row}: {message}")]
    Schema { row: usize, message: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the salary dataset from a URL or local path.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – flat columns, one row per record
/// * `.json`    – `[{ "ano": 2024, "cargo": "...", ... }, ...]`
/// * `.csv`     – header row; also used for unknown extensions
///
/// Country codes are normalized with [`normalize_country`] before the
/// dataset is built.
pub fn load_source(location: &str) -> Result<Dataset, LoadError> {
    let raw = read_source(location)?;

    let rows = match extension_of(location).as_str() {
        "parquet" | "pq" => parse_parquet(raw)?,
        "json" => parse_json(&raw)?,
        _ => parse_csv(&raw)?,
    };

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(row, raw)| raw.into_record(row))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("Loaded {} salary records from {location}", records.len());
    Ok(Dataset::from_records(records))
}

/// Resolve a raw country code to an ISO3 code or the sentinel.
///
/// Missing, blank, or anything that is not three ASCII letters is
/// unresolvable.
pub fn normalize_country(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(code) if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) => {
            code.to_ascii_uppercase()
        }
        other => {
            log::debug!("Unresolved country code {other:?}, using {SENTINEL_COUNTRY}");
            SENTINEL_COUNTRY.to_string()
        }
    }
}

fn read_source(location: &str) -> Result<Bytes, LoadError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return fetch_remote(location);
    }

    let path = match location.strip_prefix("file://") {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(location),
    };
    std::fs::read(&path)
        .map(Bytes::from)
        .map_err(|source| LoadError::Io {
            location: path.display().to_string(),
            source,
        })
}

fn fetch_remote(url: &str) -> Result<Bytes, LoadError> {
    let unreachable = |source| LoadError::Unreachable {
        location: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(unreachable)?;
    let resp = client.get(url).send().map_err(unreachable)?;
    check_status(url, resp.status())?;
    resp.bytes().map_err(unreachable)
}

fn check_status(location: &str, status: reqwest::StatusCode) -> Result<(), LoadError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(LoadError::HttpStatus {
            location: location.to_string(),
            status,
        })
    }
}

/// Lower-cased extension of the last path segment, ignoring any query string.
fn extension_of(location: &str) -> String {
    let without_query = location.split(['?', '#']).next().unwrap_or(location);
    Path::new(without_query)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Row schema shared by the CSV and JSON readers
// ---------------------------------------------------------------------------

/// One row as it appears in the source, before normalization.
#[derive(Debug, Clone, Deserialize)]
struct RawRecord {
    #[serde(rename = "ano", alias = "year")]
    year: i64,
    #[serde(rename = "cargo", alias = "role")]
    role: String,
    #[serde(rename = "senioridade", alias = "seniority")]
    seniority: String,
    #[serde(rename = "remoto", alias = "remote_type")]
    remote_type: String,
    #[serde(rename = "contrato", alias = "contract_type")]
    contract_type: String,
    #[serde(rename = "tamanho_empresa", alias = "company_size")]
    company_size: String,
    #[serde(rename = "localizacao_iso3", alias = "company_country", default)]
    company_country: Option<String>,
    #[serde(rename = "salario_usd", alias = "salary_usd")]
    salary_usd: f64,
}

impl RawRecord {
    fn into_record(self, row: usize) -> Result<Record, LoadError> {
        if !self.salary_usd.is_finite() {
            return Err(LoadError::Schema {
                row,
                message: format!("salary is not a finite number ({})", self.salary_usd),
            });
        }
        Ok(Record {
            year: self.year,
            role: self.role,
            seniority: self.seniority,
            remote_type: self.remote_type,
            contract_type: self.contract_type,
            company_size: self.company_size,
            company_country: normalize_country(self.company_country.as_deref()),
            salary_usd: self.salary_usd,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn parse_csv(raw: &[u8]) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(raw);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn parse_json(raw: &[u8]) -> Result<Vec<RawRecord>, LoadError> {
    Ok(serde_json::from_slice(raw)?)
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

fn parse_parquet(raw: Bytes) -> Result<Vec<RawRecord>, LoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(raw)?.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let offset = rows.len();
        let columns = ParquetColumns::locate(&batch, offset)?;

        for i in 0..batch.num_rows() {
            let row = offset + i;
            rows.push(RawRecord {
                year: int_at(&columns.year, i, row, "ano")?,
                role: text_at(&columns.role, i, row, "cargo")?,
                seniority: text_at(&columns.seniority, i, row, "senioridade")?,
                remote_type: text_at(&columns.remote_type, i, row, "remoto")?,
                contract_type: text_at(&columns.contract_type, i, row, "contrato")?,
                company_size: text_at(&columns.company_size, i, row, "tamanho_empresa")?,
                company_country: match &columns.company_country {
                    Some(col) if !col.is_null(i) => {
                        Some(text_at(col, i, row, "localizacao_iso3")?)
                    }
                    _ => None,
                },
                salary_usd: float_at(&columns.salary_usd, i, row, "salario_usd")?,
            });
        }
    }
    Ok(rows)
}

/// Columns of one batch; text columns are already decoded to `Utf8`.
struct ParquetColumns {
    year: ArrayRef,
    role: ArrayRef,
    seniority: ArrayRef,
    remote_type: ArrayRef,
    contract_type: ArrayRef,
    company_size: ArrayRef,
    company_country: Option<ArrayRef>,
    salary_usd: ArrayRef,
}

impl ParquetColumns {
    fn locate(batch: &RecordBatch, row: usize) -> Result<Self, LoadError> {
        let required = |names: [&str; 2]| {
            find_column(batch, names).ok_or_else(|| LoadError::Schema {
                row,
                message: format!("missing column '{}'", names[0]),
            })
        };
        let text = |names: [&str; 2]| required(names).and_then(decode_text);

        Ok(ParquetColumns {
            year: required(["ano", "year"])?,
            role: text(["cargo", "role"])?,
            seniority: text(["senioridade", "seniority"])?,
            remote_type: text(["remoto", "remote_type"])?,
            contract_type: text(["contrato", "contract_type"])?,
            company_size: text(["tamanho_empresa", "company_size"])?,
            company_country: find_column(batch, ["localizacao_iso3", "company_country"])
                .map(decode_text)
                .transpose()?,
            salary_usd: required(["salario_usd", "salary_usd"])?,
        })
    }
}

fn find_column(batch: &RecordBatch, names: [&str; 2]) -> Option<ArrayRef> {
    let schema = batch.schema_ref();
    names
        .iter()
        .find_map(|name| schema.index_of(name).ok())
        .map(|idx| batch.column(idx).clone())
}

/// Dictionary-encoded strings (pandas categoricals) are cast to plain `Utf8`.
fn decode_text(col: ArrayRef) -> Result<ArrayRef, LoadError> {
    match col.data_type() {
        DataType::Dictionary(_, _) => Ok(cast(&col, &DataType::Utf8)?),
        _ => Ok(col),
    }
}

fn schema_error(col: &ArrayRef, i: usize, row: usize, name: &str) -> LoadError {
    let message = if col.is_null(i) {
        format!("'{name}' is null")
    } else {
        format!("'{name}' has unsupported type {:?}", col.data_type())
    };
    LoadError::Schema { row, message }
}

fn text_at(col: &ArrayRef, i: usize, row: usize, name: &str) -> Result<String, LoadError> {
    if col.is_null(i) {
        return Err(schema_error(col, i, row, name));
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(i).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(i).to_string()),
        _ => Err(schema_error(col, i, row, name)),
    }
}

fn int_at(col: &ArrayRef, i: usize, row: usize, name: &str) -> Result<i64, LoadError> {
    if col.is_null(i) {
        return Err(schema_error(col, i, row, name));
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(i))
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(i) as i64)
    } else {
        Err(schema_error(col, i, row, name))
    }
}

fn float_at(col: &ArrayRef, i: usize, row: usize, name: &str) -> Result<f64, LoadError> {
    if col.is_null(i) {
        return Err(schema_error(col, i, row, name));
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(arr.value(i))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(arr.value(i) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(i) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(i) as f64)
    } else {
        Err(schema_error(col, i, row, name))
    }
}
