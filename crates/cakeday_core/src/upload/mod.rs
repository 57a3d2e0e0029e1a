//! People upload parsing.
//!
//! # Responsibility
//! - Accept headerless tabular files (`csv`, `txt`, `xlsx`) of
//!   `name,date_of_birth`.
//! - Turn well-formed rows into [`Person`] records and drop the rest.
//!
//! # Invariants
//! - Unsupported extensions and oversized files are rejected before reading.
//! - Dropped rows are logged by row number only.
//! - A row that is not valid UTF-8 is dropped like any other malformed row.

use crate::model::person::Person;
use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Date layouts accepted in text cells, tried in order.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Supported upload file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Txt,
    Xlsx,
}

impl UploadFormat {
    /// Resolves a format from a file extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Txt),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Errors raised while reading an upload.
#[derive(Debug)]
pub enum UploadError {
    UnsupportedFormat(String),
    TooLarge { size: u64, max: u64 },
    Io(std::io::Error),
    Csv(csv::Error),
    Spreadsheet(XlsxError),
}

impl Display for UploadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(extension) => {
                write!(f, "Unsupported file format: {extension}")
            }
            Self::TooLarge { size, max } => {
                write!(f, "upload is {size} bytes; the limit is {max} bytes")
            }
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::Spreadsheet(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UploadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedFormat(_) => None,
            Self::TooLarge { .. } => None,
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Spreadsheet(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for UploadError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for UploadError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<XlsxError> for UploadError {
    fn from(value: XlsxError) -> Self {
        Self::Spreadsheet(value)
    }
}

/// Reads people from an uploaded file.
///
/// # Errors
/// - `UnsupportedFormat` when the extension is not `csv`, `txt` or `xlsx`.
/// - `TooLarge` when the file exceeds [`MAX_UPLOAD_BYTES`].
/// - `Io` / `Csv` / `Spreadsheet` when the file cannot be read.
pub fn parse_upload_file(path: impl AsRef<Path>) -> Result<Vec<Person>, UploadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or_default();
    let format = UploadFormat::from_extension(extension)
        .ok_or_else(|| UploadError::UnsupportedFormat(extension.to_string()))?;

    let file = File::open(path)?;
    let size = file.metadata()?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }

    match format {
        UploadFormat::Csv | UploadFormat::Txt => parse_rows(file),
        UploadFormat::Xlsx => {
            drop(file);
            parse_workbook(path)
        }
    }
}

/// Parses headerless `name,date_of_birth` rows.
///
/// Extra columns are ignored. Rows with a blank name, a missing date, an
/// unrecognised date or bytes that are not UTF-8 are skipped.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<Person>, UploadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = RowFilter::default();
    for (index, record) in reader.byte_records().enumerate() {
        let record = record?;
        let name = record.get(0).and_then(|field| std::str::from_utf8(field).ok());
        let date = record
            .get(1)
            .and_then(|field| std::str::from_utf8(field).ok())
            .and_then(parse_date);
        rows.push(index + 1, name.zip(date));
    }

    Ok(rows.finish(UploadFormat::Csv))
}

/// Parses the first worksheet of an `xlsx` workbook.
///
/// Column A holds the name and column B the date of birth, either as a date
/// cell or as text in one of [`DATE_FORMATS`]. There is no header row.
pub fn parse_workbook(path: impl AsRef<Path>) -> Result<Vec<Person>, UploadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let mut rows = RowFilter::default();

    if let Some(range) = workbook.worksheet_range_at(0) {
        let range = range?;
        for (index, cells) in range.rows().enumerate() {
            let name = cells.first().and_then(cell_text);
            let date = cells.get(1).and_then(cell_date);
            rows.push(index + 1, name.zip(date));
        }
    }

    Ok(rows.finish(UploadFormat::Xlsx))
}

fn cell_text(cell: &Data) -> Option<&str> {
    match cell {
        Data::String(text) => Some(text.trim()),
        _ => None,
    }
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(text) | Data::DateTimeIso(text) => parse_date(text.trim()),
        Data::DateTime(value) => value.as_datetime().map(|datetime| datetime.date()),
        _ => None,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Collects accepted rows and counts the dropped ones.
#[derive(Default)]
struct RowFilter {
    people: Vec<Person>,
    skipped: usize,
}

impl RowFilter {
    fn push(&mut self, row_number: usize, fields: Option<(&str, NaiveDate)>) {
        match fields.and_then(|(name, date)| Person::new(name, date).ok()) {
            Some(person) => self.people.push(person),
            None => {
                self.skipped += 1;
                warn!("event=upload_row_skipped module=upload status=skipped row={row_number}");
            }
        }
    }

    fn finish(self, format: UploadFormat) -> Vec<Person> {
        info!(
            "event=upload_parse module=upload status=ok format={} rows={} skipped={}",
            format.as_str(),
            self.people.len() + self.skipped,
            self.skipped
        );
        self.people
    }
}
