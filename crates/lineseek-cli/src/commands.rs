//! Command dispatch.
//!
//! Values are always read as strings; the key type is chosen at run time and
//! each command is instantiated for `i64` and `String` keys.

use crate::config::{Command, GenerateArgs, KeyType, SessionArgs};
use crate::error::{HarnessError, Result};
use crate::fixture::{FixtureSpec, generate_file};
use crate::verify::verify;
use lineseek::{LineCodec, Lookup, Record, SearchError, SeparatedCodec, SortedFile};
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::io::Write;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Key types the command line can select.
pub trait CliKey: FromStr + Display + Ord + Clone + Debug + Serialize {}

impl<K> CliKey for K where K: FromStr + Display + Ord + Clone + Debug + Serialize {}

type Codec<K> = SeparatedCodec<K, String>;

/// Run a parsed command, writing results to `out`.
///
/// # Errors
///
/// Returns the command's failure, including `SearchError::NotFound` for a
/// missing key in either mode and `HarnessError::VerificationFailed` for a failed check.
pub fn run<W: Write>(command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Generate(args) => generate(args, out),
        Command::Find { session, key, json } => match session.key_type {
            KeyType::Int => find::<i64, W>(session, key, *json, out),
            KeyType::String => find::<String, W>(session, key, *json, out),
        },
        Command::Between {
            session,
            min,
            max,
            json,
        } => match session.key_type {
            KeyType::Int => between::<i64, W>(session, min, max, *json, out),
            KeyType::String => between::<String, W>(session, min, max, *json, out),
        },
        Command::Bounds { session, json } => match session.key_type {
            KeyType::Int => bounds::<i64, W>(session, *json, out),
            KeyType::String => bounds::<String, W>(session, *json, out),
        },
        Command::Verify { session, windows } => match session.key_type {
            KeyType::Int => check::<i64, W>(session, *windows, out),
            KeyType::String => check::<String, W>(session, *windows, out),
        },
    }
}

fn generate<W: Write>(args: &GenerateArgs, out: &mut W) -> Result<()> {
    if args.separator.is_empty() {
        return Err(HarnessError::InvalidConfig(
            "separator must not be empty".to_string(),
        ));
    }
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    });
    let spec = FixtureSpec::new(args.records, seed)
        .with_unique(!args.non_unique)
        .with_separator(args.separator.clone());

    let summary = generate_file(&spec, &args.output)?;
    writeln!(
        out,
        "{}: {} lines, {} keys, seed {seed}",
        args.output.display(),
        summary.lines,
        summary.keys
    )?;
    Ok(())
}

fn parse_key<K: CliKey>(raw: &str, key_type: KeyType) -> Result<K>
where
    K::Err: Display,
{
    raw.parse().map_err(|e: K::Err| HarnessError::InvalidKey {
        value: raw.to_string(),
        key_type: key_type.as_str(),
        reason: e.to_string(),
    })
}

fn open<K: CliKey>(session: &SessionArgs) -> Result<SortedFile<Codec<K>>>
where
    K::Err: Display,
{
    session.validate()?;
    let codec = Codec::<K>::new(session.separator.clone());
    let file = SortedFile::open(&session.file, codec, session.search_config())?;
    debug!("Opened {:?}", file);
    Ok(file)
}

fn print_records<K: CliKey, W: Write>(
    codec: &Codec<K>,
    records: &[Record<K, String>],
    json: bool,
    out: &mut W,
) -> Result<()>
where
    K::Err: Display,
{
    for record in records {
        if json {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", codec.encode(&record.key, &record.value))?;
        }
    }
    Ok(())
}

fn find<K: CliKey, W: Write>(session: &SessionArgs, raw: &str, json: bool, out: &mut W) -> Result<()>
where
    K::Err: Display,
{
    let key: K = parse_key(raw, session.key_type)?;
    let mut file = open::<K>(session)?;

    match file.find(&key)? {
        Lookup::Value(value) => {
            if json {
                serde_json::to_writer(&mut *out, &Record::new(key, value))?;
                writeln!(out)?;
            } else {
                writeln!(out, "{value}")?;
            }
        }
        Lookup::Records(records) => {
            if records.is_empty() {
                return Err(SearchError::NotFound {
                    key: format!("{key:?}"),
                }
                .into());
            }
            print_records(file.codec(), &records, json, out)?;
        }
    }
    Ok(())
}

fn between<K: CliKey, W: Write>(
    session: &SessionArgs,
    min: &str,
    max: &str,
    json: bool,
    out: &mut W,
) -> Result<()>
where
    K::Err: Display,
{
    let low: K = parse_key(min, session.key_type)?;
    let high: K = parse_key(max, session.key_type)?;
    let mut file = open::<K>(session)?;

    let records = file.between(&low, &high)?;
    info!("{} records between {} and {}", records.len(), low, high);
    print_records(file.codec(), &records, json, out)
}

/// `bounds` output.
#[derive(Debug, Serialize)]
struct BoundsOutput<'a, K> {
    min: Record<&'a K, &'a str>,
    max: Record<&'a K, &'a str>,
    file_size: u64,
}

fn bounds<K: CliKey, W: Write>(session: &SessionArgs, json: bool, out: &mut W) -> Result<()>
where
    K::Err: Display,
{
    let file = open::<K>(session)?;
    let bounds = file.bounds();

    if json {
        let output = BoundsOutput {
            min: Record::new(&bounds.min_key, bounds.min_value.as_str()),
            max: Record::new(&bounds.max_key, bounds.max_value.as_str()),
            file_size: bounds.file_size,
        };
        serde_json::to_writer(&mut *out, &output)?;
        writeln!(out)?;
    } else {
        let codec = file.codec();
        writeln!(out, "min: {}", codec.encode(&bounds.min_key, &bounds.min_value))?;
        writeln!(out, "max: {}", codec.encode(&bounds.max_key, &bounds.max_value))?;
        writeln!(out, "file size: {}", bounds.file_size)?;
    }
    Ok(())
}

fn check<K: CliKey, W: Write>(session: &SessionArgs, windows: usize, out: &mut W) -> Result<()>
where
    K::Err: Display,
{
    session.validate()?;
    let codec = Codec::<K>::new(session.separator.clone());
    let report = verify(&session.file, codec, session.search_config(), windows)?;

    for mismatch in &report.mismatches {
        writeln!(
            out,
            "MISMATCH {}: expected {}, got {}",
            mismatch.query, mismatch.expected, mismatch.actual
        )?;
    }
    writeln!(
        out,
        "{} lines, {} keys, {} ranges, {} mismatches",
        report.lines,
        report.keys_checked,
        report.ranges_checked,
        report.mismatches.len()
    )?;

    if report.is_ok() {
        Ok(())
    } else {
        Err(HarnessError::VerificationFailed {
            mismatches: report.mismatches.len(),
        })
    }
}
