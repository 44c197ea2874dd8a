//! Streaming book records from a publisher metadata CSV.
//!
//! The metadata export mixes books with journal content and books hosted
//! elsewhere; only rows for books on OAPEN map to [`BookRecord`]s. What
//! happens to the remaining rows is the caller's choice via [`RowPolicy`]:
//! either they vanish from the output, or they stay as positional
//! placeholders so output indexes line up with input rows.

use crate::oapen::{self, OapenError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Column carrying the book DOI.
const DOI_COLUMN: &str = "DOI";
/// Column carrying the document type.
const TYPE_COLUMN: &str = "Type of Document";
/// Column carrying the OAPEN catalog URL.
const URL_COLUMN: &str = "OAPEN URL";

/// The only document type that maps to a record.
const BOOK_TYPE: &str = "Book";
/// Document types the metadata export is allowed to contain.
const KNOWN_TYPES: [&str; 2] = [BOOK_TYPE, "Journal"];

/// Error type for row streaming failures.
///
/// Any of these aborts the sequence at the offending row; there is no
/// per-row recovery.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// The CSV itself could not be read or parsed.
    #[error("metadata CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A contract column is absent from the row being read.
    #[error("missing column {column:?} at line {line}")]
    MissingColumn { column: String, line: u64 },

    /// Caller contract: the type field only ever holds Book or Journal.
    #[error("unknown document type {value:?} at line {line}")]
    UnknownDocumentType { value: String, line: u64 },

    /// A row passed the marker check but its URL failed extraction.
    #[error(transparent)]
    Oapen(#[from] OapenError),
}

/// One book from the metadata CSV.
///
/// `fields` carries every column of the source row keyed by header name;
/// the named accessors read the contract columns out of it. Records are
/// immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    /// The book's DOI, trimmed of trailing newline characters only.
    pub doi: String,
    /// The OAPEN resource id extracted from the catalog URL.
    pub oapen_id: String,
    /// All CSV columns of the source row, by header name.
    pub fields: HashMap<String, String>,
}

impl BookRecord {
    /// Raw field access by column header.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The document type column.
    pub fn document_type(&self) -> Option<&str> {
        self.field(TYPE_COLUMN)
    }

    /// The OAPEN catalog URL column.
    pub fn oapen_url(&self) -> Option<&str> {
        self.field(URL_COLUMN)
    }
}

/// Why a row was excluded from the record output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The document type is Journal, not Book.
    NotABook,
    /// The catalog URL field doesn't point at OAPEN.
    NotOnOapen,
}

/// One output item of the row sequence.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// A book hosted on OAPEN.
    Book(BookRecord),
    /// Placeholder for an excluded row.
    ///
    /// Only produced under [`RowPolicy::KeepPlaceholders`].
    Skipped(SkipReason),
}

/// How rows excluded by the inclusion rule appear in the output sequence.
///
/// The two strategies differ in output cardinality: `SkipSilently` yields
/// only books, `KeepPlaceholders` yields exactly one item per input row.
/// Callers that index output positions against input rows need the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Excluded rows are dropped from the sequence.
    #[default]
    SkipSilently,
    /// Excluded rows yield [`RowOutcome::Skipped`] markers.
    KeepPlaceholders,
}

/// Lazy, forward-only, single-pass sequence of book records.
///
/// Rows are read from the CSV as the iterator is driven; nothing is
/// buffered beyond the current row and the sequence cannot be restarted.
/// The first fatal error fuses the iterator: the offending row's error is
/// yielded once and the sequence ends there.
pub struct BookRecords {
    rows: csv::StringRecordsIntoIter<File>,
    headers: csv::StringRecord,
    policy: RowPolicy,
    done: bool,
}

impl BookRecords {
    /// Open the metadata CSV at `path`.
    ///
    /// The first CSV row must be a header row naming at least the DOI,
    /// document-type, and catalog-URL columns; the header names are fixed
    /// contract constants.
    pub fn open(path: impl AsRef<Path>, policy: RowPolicy) -> Result<Self, RowError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        Ok(Self { rows: reader.into_records(), headers, policy, done: false })
    }

    fn map_row(&self, record: &csv::StringRecord) -> Result<RowOutcome, RowError> {
        let line = record.position().map_or(0, |p| p.line());

        let doc_type = self.field(record, TYPE_COLUMN, line)?;
        if !KNOWN_TYPES.contains(&doc_type) {
            return Err(RowError::UnknownDocumentType { value: doc_type.to_string(), line });
        }
        if doc_type != BOOK_TYPE {
            return Ok(RowOutcome::Skipped(SkipReason::NotABook));
        }

        let oapen_url = self.field(record, URL_COLUMN, line)?;
        if !oapen_url.contains(oapen::OAPEN_HOST) {
            return Ok(RowOutcome::Skipped(SkipReason::NotOnOapen));
        }
        let oapen_id = oapen::resource_id(oapen_url)?;

        let doi = self.field(record, DOI_COLUMN, line)?.trim_end_matches('\n').to_string();

        let fields = self
            .headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();

        Ok(RowOutcome::Book(BookRecord { doi, oapen_id, fields }))
    }

    fn field<'r>(
        &self,
        record: &'r csv::StringRecord,
        column: &str,
        line: u64,
    ) -> Result<&'r str, RowError> {
        let index = self
            .headers
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| RowError::MissingColumn { column: column.to_string(), line })?;
        record
            .get(index)
            .ok_or_else(|| RowError::MissingColumn { column: column.to_string(), line })
    }
}

impl Iterator for BookRecords {
    type Item = Result<RowOutcome, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let record = match self.rows.next()? {
                Ok(record) => record,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };

            match self.map_row(&record) {
                Ok(RowOutcome::Skipped(reason)) => match self.policy {
                    RowPolicy::KeepPlaceholders => {
                        return Some(Ok(RowOutcome::Skipped(reason)));
                    }
                    RowPolicy::SkipSilently => {
                        tracing::debug!(?reason, "row excluded");
                        continue;
                    }
                },
                Ok(book) => return Some(Ok(book)),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "DOI,Type of Document,OAPEN URL,Title";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    const BOOK_ROW: &str =
        "10.21983/P3.0001.1.00,Book,http://www.oapen.org/record?docid=627426,The First Book";
    const JOURNAL_ROW: &str = "10.21983/jrnl.1,Journal,,Some Journal";
    const ELSEWHERE_ROW: &str =
        "10.21983/P3.0002.1.00,Book,http://publisher.example.org/book/2,The Other Book";

    #[test]
    fn test_strict_yields_only_books() {
        let file = write_csv(&[BOOK_ROW, JOURNAL_ROW, ELSEWHERE_ROW]);
        let records = BookRecords::open(file.path(), RowPolicy::SkipSilently).unwrap();

        let outcomes: Vec<_> = records.collect::<Result<_, _>>().unwrap();
        assert_eq!(outcomes.len(), 1);
        match &outcomes[0] {
            RowOutcome::Book(book) => {
                assert_eq!(book.doi, "10.21983/P3.0001.1.00");
                assert_eq!(book.oapen_id, "627426");
            }
            other => panic!("expected a book, got {other:?}"),
        }
    }

    #[test]
    fn test_placeholders_keep_input_cardinality() {
        let file = write_csv(&[BOOK_ROW, JOURNAL_ROW, ELSEWHERE_ROW]);
        let records = BookRecords::open(file.path(), RowPolicy::KeepPlaceholders).unwrap();

        let outcomes: Vec<_> = records.collect::<Result<_, _>>().unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], RowOutcome::Book(_)));
        assert!(matches!(outcomes[1], RowOutcome::Skipped(SkipReason::NotABook)));
        assert!(matches!(outcomes[2], RowOutcome::Skipped(SkipReason::NotOnOapen)));
    }

    #[test]
    fn test_unknown_type_aborts_sequence() {
        let file = write_csv(&["10.21983/mag.1,Magazine,,Glossy", BOOK_ROW]);
        let mut records = BookRecords::open(file.path(), RowPolicy::SkipSilently).unwrap();

        let first = records.next().unwrap();
        assert!(matches!(
            first,
            Err(RowError::UnknownDocumentType { ref value, .. }) if value == "Magazine"
        ));
        // The sequence is fused; the valid book row after it is never reached.
        assert!(records.next().is_none());
    }

    #[test]
    fn test_missing_column_aborts_sequence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DOI,OAPEN URL").unwrap();
        writeln!(file, "10.21983/P3.0001.1.00,http://www.oapen.org/record?docid=1").unwrap();
        file.flush().unwrap();

        let mut records = BookRecords::open(file.path(), RowPolicy::SkipSilently).unwrap();
        let first = records.next().unwrap();
        assert!(matches!(
            first,
            Err(RowError::MissingColumn { ref column, .. }) if column == TYPE_COLUMN
        ));
        assert!(records.next().is_none());
    }

    #[test]
    fn test_doi_trailing_newline_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(
            file,
            "\"10.21983/P3.0001.1.00\n\",Book,http://www.oapen.org/record?docid=1,A Title"
        )
        .unwrap();
        file.flush().unwrap();

        let mut records = BookRecords::open(file.path(), RowPolicy::SkipSilently).unwrap();
        match records.next().unwrap().unwrap() {
            RowOutcome::Book(book) => assert_eq!(book.doi, "10.21983/P3.0001.1.00"),
            other => panic!("expected a book, got {other:?}"),
        }
    }

    #[test]
    fn test_record_carries_all_fields() {
        let file = write_csv(&[BOOK_ROW]);
        let mut records = BookRecords::open(file.path(), RowPolicy::SkipSilently).unwrap();

        match records.next().unwrap().unwrap() {
            RowOutcome::Book(book) => {
                assert_eq!(book.field("Title"), Some("The First Book"));
                assert_eq!(book.document_type(), Some("Book"));
                assert_eq!(book.oapen_url(), Some("http://www.oapen.org/record?docid=627426"));
            }
            other => panic!("expected a book, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_docid_url_is_fatal() {
        // Passes the marker substring check but has no docid parameter.
        let file =
            write_csv(&["10.21983/P3.0003.1.00,Book,http://www.oapen.org/record?id=3,No Docid"]);
        let mut records = BookRecords::open(file.path(), RowPolicy::SkipSilently).unwrap();

        let first = records.next().unwrap();
        assert!(matches!(first, Err(RowError::Oapen(OapenError::MissingDocid(_)))));
        assert!(records.next().is_none());
    }
}
