pub mod compare;
pub mod rules;
pub mod schema;
pub mod validate;

use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use taxcomp::core::ProfileInput;

/// A profile as read from input, numbered from 1 in input order
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub number: usize,
    pub input: ProfileInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Json,
    Csv,
}

/// A JSON input holds either one profile or an array of them
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonProfiles {
    Many(Vec<ProfileInput>),
    One(Box<ProfileInput>),
}

/// Read profiles (JSON or CSV) from a file, or stdin with "-"
pub fn read_profiles(path: &Path) -> anyhow::Result<Vec<ProfileRecord>> {
    let mut buffer = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
    } else {
        BufReader::new(File::open(path)?).read_to_end(&mut buffer)?;
    }

    let format = detect_format(path, &buffer);
    log::debug!("reading {} as {:?}", path.display(), format);

    let profiles = match format {
        InputFormat::Json => read_json(&buffer)?,
        InputFormat::Csv => read_csv(&buffer)?,
    };
    log::info!("Read {} profile(s)", profiles.len());

    Ok(profiles
        .into_iter()
        .enumerate()
        .map(|(i, input)| ProfileRecord {
            number: i + 1,
            input,
        })
        .collect())
}

fn detect_format(path: &Path, buffer: &[u8]) -> InputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => match buffer.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') | Some(b'[') => InputFormat::Json,
            _ => InputFormat::Csv,
        },
    }
}

fn read_json(buffer: &[u8]) -> anyhow::Result<Vec<ProfileInput>> {
    let profiles = match serde_json::from_slice(buffer)? {
        JsonProfiles::Many(profiles) => profiles,
        JsonProfiles::One(profile) => vec![*profile],
    };
    Ok(profiles)
}

fn read_csv(buffer: &[u8]) -> anyhow::Result<Vec<ProfileInput>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buffer);
    let mut profiles = Vec::new();
    for result in rdr.deserialize() {
        let profile: ProfileInput = result?;
        profiles.push(profile);
    }
    Ok(profiles)
}

/// Plain amount for display; no currency symbol or digit grouping
pub fn format_amount(amount: rust_decimal::Decimal) -> String {
    if amount.fract().is_zero() {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}
