//! Signature checks and (de)compression helpers for payload files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;

use crate::error::{Result, ValidationError};
use crate::options::Options;

/// Read the first `len` bytes of a file.
pub fn extract_signature(path: &Path, len: usize) -> Result<Vec<u8>> {
    let mut reader = open_file(path)?;
    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer).map_err(|_| {
        ValidationError::structure(format!(
            "file at '{}' is too small to extract a signature of length {}",
            path.display(),
            len
        ))
    })?;
    Ok(buffer)
}

/// Check the leading bytes of a file against an expected signature.
pub fn check_signature(path: &Path, expected: &[u8], what: &str) -> Result<()> {
    let mut reader = open_file(path)?;
    compare_signature(&mut reader, expected, what, path)
}

/// Check the leading bytes of the decompressed stream of a gzip (or BGZF)
/// file against an expected signature.
pub fn check_gzip_signature(path: &Path, expected: &[u8], what: &str) -> Result<()> {
    let mut reader = open_gzip(path)?;
    compare_signature(&mut reader, expected, what, path)
}

/// Check the leading bytes of the decompressed stream of a BGZF file against
/// an expected signature.  This applies to htslib-style binary payloads
/// (BAM, BCF) and their tabix/CSI indices.
pub fn check_bgzf_signature(path: &Path, expected: &[u8], what: &str) -> Result<()> {
    let file = File::open(path).map_err(|e| {
        ValidationError::structure(format!("failed to open '{}'; {}", path.display(), e))
    })?;
    let mut reader = noodles_bgzf::Reader::new(file);
    compare_signature(&mut reader, expected, what, path)
}

fn compare_signature(
    reader: &mut dyn Read,
    expected: &[u8],
    what: &str,
    path: &Path,
) -> Result<()> {
    let mut observed = vec![0u8; expected.len()];
    reader.read_exact(&mut observed).map_err(|_| {
        ValidationError::structure(format!(
            "incomplete {} file signature for '{}'",
            what,
            path.display()
        ))
    })?;
    if observed != expected {
        return Err(ValidationError::value(format!(
            "incorrect {} file signature for '{}'",
            what,
            path.display()
        )));
    }
    Ok(())
}

fn open_file(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        ValidationError::structure(format!("failed to open '{}'; {}", path.display(), e))
    })?;
    Ok(BufReader::new(file))
}

/// Open a gzip-compressed file for streaming decompressed reads.  BGZF files
/// are multi-member gzip streams, so they are handled transparently.
pub fn open_gzip(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = open_file(path)?;
    Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
}

/// Open a gzip-compressed file, moving decompression onto a background
/// thread when `Options::parallel_reads` is set.  The hint never changes
/// what the downstream parser observes.
pub fn open_gzip_maybe_parallel(path: &Path, options: &Options) -> Result<Box<dyn BufRead + Send>> {
    let reader = open_gzip(path)?;
    if options.parallel_reads {
        tracing::trace!("decompressing {:?} on a background thread", path);
        Ok(Box::new(BufReader::new(BackgroundReader::spawn(reader))))
    } else {
        Ok(reader)
    }
}

/// Chunk size for the background decompression thread.
const BACKGROUND_CHUNK: usize = 65536;

/// Adapter that pulls bytes from an inner reader on a worker thread through
/// a bounded channel.
struct BackgroundReader {
    receiver: std::sync::mpsc::Receiver<std::io::Result<Vec<u8>>>,
    current: Vec<u8>,
    offset: usize,
    done: bool,
}

impl BackgroundReader {
    fn spawn(mut inner: Box<dyn BufRead + Send>) -> Self {
        let (sender, receiver) = std::sync::mpsc::sync_channel(4);
        std::thread::spawn(move || loop {
            let mut chunk = vec![0u8; BACKGROUND_CHUNK];
            match inner.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    chunk.truncate(n);
                    if sender.send(Ok(chunk)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = sender.send(Err(e));
                    break;
                }
            }
        });
        Self {
            receiver,
            current: Vec::new(),
            offset: 0,
            done: false,
        }
    }
}

impl Read for BackgroundReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.offset == self.current.len() {
            if self.done {
                return Ok(0);
            }
            match self.receiver.recv() {
                Ok(Ok(chunk)) => {
                    self.current = chunk;
                    self.offset = 0;
                }
                Ok(Err(e)) => {
                    self.done = true;
                    return Err(e);
                }
                Err(_) => {
                    self.done = true;
                    return Ok(0);
                }
            }
        }

        let n = buf.len().min(self.current.len() - self.offset);
        buf[..n].copy_from_slice(&self.current[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_gz(path: &Path, payload: &[u8]) {
        let file = std::fs::File::create(path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(payload).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn raw_signature() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("file.bin");
        std::fs::write(&path, b"BAI\x01restoffile").unwrap();

        check_signature(&path, b"BAI\x01", "BAI index").unwrap();
        let err = check_signature(&path, b"TBI\x01", "TBI index").unwrap_err();
        assert!(err.to_string().contains("incorrect TBI index file signature"));

        let short = tmp.path().join("short.bin");
        std::fs::write(&short, b"BA").unwrap();
        let err = check_signature(&short, b"BAI\x01", "BAI index").unwrap_err();
        assert!(err.to_string().contains("incomplete BAI index file signature"));
    }

    #[test]
    fn gzip_signature() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("file.fasta.gz");
        write_gz(&path, b">0\nACGT\n");

        check_gzip_signature(&path, b">", "FASTA").unwrap();
        let err = check_gzip_signature(&path, b"@", "FASTQ").unwrap_err();
        assert!(err.to_string().contains("incorrect FASTQ file signature"));
    }

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn parallel_hint_is_transparent(#[case] parallel: bool) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("payload.gz");
        let payload: Vec<u8> = (0..200_000u32).flat_map(|x| x.to_le_bytes()).collect();
        write_gz(&path, &payload);

        let options = Options {
            parallel_reads: parallel,
            ..Default::default()
        };
        let mut reader = open_gzip_maybe_parallel(&path, &options).unwrap();
        let mut observed = Vec::new();
        reader.read_to_end(&mut observed).unwrap();
        assert_eq!(observed, payload);
    }
}
