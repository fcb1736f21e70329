//! Parsing of format version strings.

use crate::error::{Result, ValidationError};

/// Parsed version string, ignoring any patch component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
}

/// Parse a `MAJOR[.MINOR[.PATCH]]` version string.  Components must be plain
/// non-negative integers without leading zeros (a single `0` is allowed).
pub fn parse_version(vstring: &str) -> Result<Version> {
    let bad = || ValidationError::version(format!("invalid version string '{}'", vstring));

    let mut parts = vstring.split('.');
    let major = parse_component(parts.next().ok_or_else(bad)?).ok_or_else(bad)?;
    let minor = match parts.next() {
        Some(x) => parse_component(x).ok_or_else(bad)?,
        None => 0,
    };
    if let Some(patch) = parts.next() {
        parse_component(patch).ok_or_else(bad)?;
    }
    if parts.next().is_some() {
        return Err(bad());
    }

    Ok(Version { major, minor })
}

fn parse_component(x: &str) -> Option<u64> {
    if x.is_empty() || !x.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if x.len() > 1 && x.starts_with('0') {
        return None;
    }
    x.parse().ok()
}

/// Parse a version string and check that its major version is 1.
pub fn check_major_version_1(vstring: &str) -> Result<Version> {
    let version = parse_version(vstring)?;
    if version.major != 1 {
        return Err(ValidationError::version(format!(
            "unsupported version string '{}'",
            vstring
        )));
    }
    Ok(version)
}
