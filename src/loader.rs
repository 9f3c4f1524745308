use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use csv::{ByteRecord, StringRecord};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::bank::{Account, Bank};
use crate::money::parse_amount;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed record: {0}")]
    Record(#[from] csv::Error),
    #[error("file is empty, expected a customer count")]
    MissingCount,
    #[error("invalid number {value:?} in record {record}")]
    InvalidNumber { value: String, record: u64 },
    #[error("account record {record} has too few fields")]
    ShortRecord { record: u64 },
    #[error("customer {customer:?} declares {expected} accounts but the file ends after {found}")]
    MissingAccount {
        customer: String,
        expected: i32,
        found: i32,
    },
}

#[derive(Debug, Deserialize)]
struct CustomerRecord {
    first_name: String,
    last_name: String,
    account_count: i32,
}

const CUSTOMER_FIELDS: usize = 3;

pub fn load_from_path(path: &Path, bank: &mut Bank) -> Result<(), LoadError> {
    let file = File::open(path)?;
    load(file, bank)
}

/**
 * Reads the count line, then customer headers each followed by their
 * account lines. Customers are appended to the bank as soon as their
 * header is read, so a failure part-way through leaves every customer
 * read so far in place.
 *
 * Fields are decoded lossily: bytes that are not UTF-8 become U+FFFD
 * rather than failing the load.
 */
pub fn load<R: Read>(input: R, bank: &mut Bank) -> Result<(), LoadError> {
    let mut records = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input)
        .into_byte_records()
        .map(|record| record.map(decode));

    let count_record = records.next().ok_or(LoadError::MissingCount)??;
    let count_line = count_record.iter().collect::<Vec<_>>().join("\t");
    let count_line = count_line.trim_matches(is_trimmed);
    let declared: i32 = count_line.parse().map_err(|_| LoadError::InvalidNumber {
        value: count_line.to_string(),
        record: record_of(&count_record),
    })?;

    while let Some(record) = records.next() {
        let record = without_trailing_empty_fields(record?);
        if record.len() != CUSTOMER_FIELDS {
            debug!(record = record_of(&record), "skipping non-customer line");
            continue;
        }

        let header: CustomerRecord = record.deserialize(None)?;
        let customer = bank.add_customer(header.first_name, header.last_name);

        for found in 0..header.account_count {
            let record = match records.next() {
                Some(record) => without_trailing_empty_fields(record?),
                None => {
                    return Err(LoadError::MissingAccount {
                        customer: format!("{}, {}", customer.last_name(), customer.first_name()),
                        expected: header.account_count,
                        found,
                    })
                }
            };
            if let Some(account) = parse_account(&record)? {
                customer.add_account(account);
            }
        }
    }

    if usize::try_from(declared).ok() != Some(bank.customer_count()) {
        debug!(
            declared,
            loaded = bank.customer_count(),
            "customer count line does not match the file contents"
        );
    }
    Ok(())
}

/// Control characters and space, the set a line is trimmed of.
fn is_trimmed(c: char) -> bool {
    c <= ' '
}

fn decode(record: ByteRecord) -> StringRecord {
    let position = record.position().cloned();
    let mut decoded = StringRecord::from_byte_record_lossy(record);
    decoded.set_position(position);
    decoded
}

/// `None` for an account kind other than `S` or `C`; the line is consumed
/// all the same.
fn parse_account(record: &StringRecord) -> Result<Option<Account>, LoadError> {
    let kind = field(record, 0)?;
    let balance = amount(record, 1)?;
    let account = match kind {
        "S" => Account::Savings {
            balance,
            interest_rate: amount(record, 2)?,
        },
        "C" => Account::Checking {
            balance,
            overdraft_limit: amount(record, 2)?,
        },
        other => {
            debug!(kind = other, record = record_of(record), "skipping unknown account kind");
            return Ok(None);
        }
    };
    Ok(Some(account))
}

fn field(record: &StringRecord, index: usize) -> Result<&str, LoadError> {
    record.get(index).ok_or(LoadError::ShortRecord {
        record: record_of(record),
    })
}

fn amount(record: &StringRecord, index: usize) -> Result<f64, LoadError> {
    let value = field(record, index)?;
    parse_amount(value).map_err(|_| LoadError::InvalidNumber {
        value: value.to_string(),
        record: record_of(record),
    })
}

/// 1-based number of the record in the file, counting the count line.
/// Blank lines are not records and are not counted.
fn record_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |position| position.record() + 1)
}

/**
 * "a\tb\t2\t" counts as three fields, not four: trailing empty
 * fields are dropped before a line is classified.
 */
fn without_trailing_empty_fields(record: StringRecord) -> StringRecord {
    let len = (0..record.len())
        .rev()
        .find(|&index| !record[index].is_empty())
        .map_or(0, |last| last + 1);
    if len == record.len() {
        return record;
    }
    let position = record.position().cloned();
    let mut trimmed: StringRecord = record.iter().take(len).collect();
    trimmed.set_position(position);
    trimmed
}
