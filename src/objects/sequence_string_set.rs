//! Validation for sequence string sets.

use std::io::BufRead;
use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

/// Byte-at-a-time cursor with one byte of lookahead, for the record
/// grammars below.
struct PerByte<R: BufRead> {
    inner: R,
    current: Option<u8>,
}

impl<R: BufRead> PerByte<R> {
    fn new(inner: R) -> Result<Self> {
        let mut this = Self {
            inner,
            current: None,
        };
        this.advance()?;
        Ok(this)
    }

    fn get(&self) -> Option<u8> {
        self.current
    }

    fn advance(&mut self) -> Result<bool> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    self.current = None;
                    return Ok(false);
                }
                Ok(_) => {
                    self.current = Some(buf[0]);
                    return Ok(true);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn build_alphabet(sequence_type: &str) -> Result<[bool; 256]> {
    let mut allowed = [false; 256];
    let listed: &[u8] = match sequence_type {
        "DNA" => b"ACGRYSWKMBDHVN.-T",
        "RNA" => b"ACGRYSWKMBDHVN.-U",
        "AA" => b"ACDEFGHIKLMNPQRSTVWY",
        "custom" => {
            for b in 33..=126u8 {
                allowed[b as usize] = true;
            }
            &[]
        }
        other => {
            return Err(ValidationError::value(format!(
                "invalid string '{}' for the 'sequence_string_set.sequence_type' property",
                other
            )));
        }
    };
    for &b in listed {
        allowed[b as usize] = true;
        allowed[b.to_ascii_lowercase() as usize] = true;
    }
    Ok(allowed)
}

struct Parser<R: BufRead> {
    pb: PerByte<R>,
    line_count: u64,
    allowed: [bool; 256],
}

impl<R: BufRead> Parser<R> {
    fn premature(&self) -> ValidationError {
        ValidationError::value(format!(
            "premature end of the file at line {}",
            self.line_count + 1
        ))
    }

    fn advance_and_check(&mut self) -> Result<u8> {
        if !self.pb.advance()? {
            return Err(self.premature());
        }
        Ok(self.pb.get().unwrap_or(0))
    }

    /// Parse the name line after its leading marker; the name must be the
    /// zero-based record index.
    fn parse_name(&mut self, expected: u64) -> Result<()> {
        let mut val = self.advance_and_check()?;
        let mut proposed: u64 = 0;
        let mut empty = true;
        while val != b'\n' {
            if !val.is_ascii_digit() {
                return Err(ValidationError::value(format!(
                    "sequence name should be a non-negative integer at line {}",
                    self.line_count + 1
                )));
            }
            empty = false;
            proposed = proposed * 10 + (val - b'0') as u64;
            val = self.advance_and_check()?;
        }
        if empty || proposed != expected {
            return Err(ValidationError::value(format!(
                "sequence name should be its index at line {}",
                self.line_count + 1
            )));
        }
        self.line_count += 1;
        Ok(())
    }

    fn check_residue(&self, val: u8) -> Result<()> {
        if !self.allowed[val as usize] {
            return Err(ValidationError::value(format!(
                "forbidden character '{}' in sequence at line {}",
                char::from(val),
                self.line_count + 1
            )));
        }
        Ok(())
    }

    /// Parse a full FASTA stream, returning the number of records.
    fn parse_fasta(&mut self) -> Result<u64> {
        let mut nseq = 0;
        while let Some(val) = self.pb.get() {
            if val != b'>' {
                return Err(ValidationError::value(format!(
                    "sequence name should start with '>' at line {}",
                    self.line_count + 1
                )));
            }
            self.parse_name(nseq)?;

            // Residues until the next record marker or EOF; the final record
            // must still end with a newline.
            let mut val = self.advance_and_check()?;
            loop {
                if val == b'\n' {
                    self.line_count += 1;
                    if !self.pb.advance()? {
                        break;
                    }
                    val = self.pb.get().unwrap_or(0);
                    if val == b'>' {
                        break;
                    }
                } else {
                    self.check_residue(val)?;
                    val = self.advance_and_check()?;
                }
            }

            nseq += 1;
        }
        Ok(nseq)
    }

    /// Parse a full FASTQ stream, returning the number of records.
    fn parse_fastq(&mut self, lowest_quality: u8) -> Result<u64> {
        let mut nseq = 0;
        while let Some(val) = self.pb.get() {
            if val != b'@' {
                return Err(ValidationError::value(format!(
                    "sequence name should start with '@' at line {}",
                    self.line_count + 1
                )));
            }
            self.parse_name(nseq)?;

            // Residues until the '+' separator line.
            let mut val = self.advance_and_check()?;
            let mut seq_length: u64 = 0;
            loop {
                if val == b'\n' {
                    self.line_count += 1;
                    val = self.advance_and_check()?;
                    if val == b'+' {
                        break;
                    }
                } else {
                    self.check_residue(val)?;
                    seq_length += 1;
                    val = self.advance_and_check()?;
                }
            }

            // The separator line is consumed without interpretation.
            loop {
                val = self.advance_and_check()?;
                if val == b'\n' {
                    break;
                }
            }
            self.line_count += 1;

            // Qualities cannot be delimited by '@' as that is a valid score,
            // so we run until the accumulated length catches up with the
            // sequence, then expect a final newline.
            let mut qual_length: u64 = 0;
            loop {
                val = self.advance_and_check()?;
                if val == b'\n' {
                    self.line_count += 1;
                    if qual_length >= seq_length {
                        self.pb.advance()?;
                        break;
                    }
                } else {
                    if val < lowest_quality {
                        return Err(ValidationError::value(format!(
                            "out-of-range quality score '{}' detected at line {}",
                            char::from(val),
                            self.line_count + 1
                        )));
                    }
                    qual_length += 1;
                }
            }

            if qual_length != seq_length {
                return Err(ValidationError::value(format!(
                    "non-equal lengths for quality and sequence strings at line {}",
                    self.line_count + 1
                )));
            }

            nseq += 1;
        }
        Ok(nseq)
    }
}

/// Quality handling derived from the object metadata.
enum Quality {
    None,
    Lowest(u8),
}

fn quality_settings(obj: &serde_json::Map<String, serde_json::Value>) -> Result<Quality> {
    let Some(qtype) = json::optional_string(obj, "quality_type")? else {
        return Ok(Quality::None);
    };
    match qtype {
        "none" => Ok(Quality::None),
        "phred" => {
            let offset = json::extract_count(obj, "quality_offset").map_err(|_| {
                ValidationError::structure(
                    "expected a 'sequence_string_set.quality_offset' property for Phred quality \
                     scores"
                        .to_string(),
                )
            })?;
            if offset != 33 && offset != 64 {
                return Err(ValidationError::value(
                    "'sequence_string_set.quality_offset' property should be either 33 or 64"
                        .to_string(),
                ));
            }
            Ok(Quality::Lowest(offset as u8))
        }
        "solexa" => Ok(Quality::Lowest(64 - 5)),
        other => Err(ValidationError::value(format!(
            "invalid string '{}' for the 'sequence_string_set.quality_type' property",
            other
        ))),
    }
}

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let obj = json::extract_typed_object(metadata, "sequence_string_set")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;

    let expected_nseq = json::extract_count(obj, "length")?;
    let allowed = build_alphabet(json::extract_string(obj, "sequence_type")?)?;
    let quality = quality_settings(obj)?;

    let nseq = match quality {
        Quality::None => {
            let reader =
                files::open_gzip_maybe_parallel(&path.join("sequences.fasta.gz"), options)?;
            let mut parser = Parser {
                pb: PerByte::new(reader)?,
                line_count: 0,
                allowed,
            };
            parser.parse_fasta()?
        }
        Quality::Lowest(lowest) => {
            let reader =
                files::open_gzip_maybe_parallel(&path.join("sequences.fastq.gz"), options)?;
            let mut parser = Parser {
                pb: PerByte::new(reader)?,
                line_count: 0,
                allowed,
            };
            parser.parse_fastq(lowest)?
        }
    };

    if nseq != expected_nseq {
        return Err(ValidationError::value(format!(
            "observed number of sequences ({}) is different from the expected number ({})",
            nseq, expected_nseq
        )));
    }

    dirs::validate_annotation_data_frame(&path.join("sequence_data"), expected_nseq, options)
        .map_err(|e| e.nested("failed to validate 'sequence_data'"))?;
    dirs::validate_annotation_list(&path.join("other_data"), options)
        .map_err(|e| e.nested("failed to validate 'other_data'"))?;

    Ok(())
}

pub fn height(_path: &Path, metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let obj = json::extract_typed_object(metadata, "sequence_string_set")?;
    json::extract_count(obj, "length")
}
