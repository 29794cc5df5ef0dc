//! io.rs
//! Byte sources and sinks for finished backup files.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use crate::constants::IO_CHUNK_SIZE;
use crate::progress::{Phase, ProgressReporter};
use crate::types::BackupError;

/// Where an import reads the PNG from.
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Where an export writes the PNG to.
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
}

/// Open `src`, returning the reader and its length when known up front.
pub fn open_input(src: InputSource) -> Result<(Box<dyn Read + Send>, Option<u64>), BackupError> {
    Ok(match src {
        InputSource::Reader(r) => (r, None),
        InputSource::File(p) => {
            let file = File::open(p)?;
            let len = file.metadata()?.len();
            (Box::new(file), Some(len))
        }
        InputSource::Memory(b) => {
            let len = b.len() as u64;
            (Box::new(io::Cursor::new(b)), Some(len))
        }
    })
}

pub fn open_output(sink: OutputSink) -> Result<Box<dyn Write + Send>, BackupError> {
    Ok(match sink {
        OutputSink::Writer(w) => w,
        OutputSink::File(p) => Box::new(File::create(p)?),
    })
}

/// Write `bytes` in chunks, reporting `writeFile` progress, then flush.
pub fn write_with_progress<W: Write + ?Sized>(
    writer: &mut W,
    bytes: &[u8],
    reporter: &mut ProgressReporter<'_>,
) -> Result<(), BackupError> {
    let total = bytes.len() as u64;
    let mut written = 0u64;
    for chunk in bytes.chunks(IO_CHUNK_SIZE) {
        writer.write_all(chunk)?;
        written += chunk.len() as u64;
        reporter.report(Phase::WriteFile, written, total);
    }
    writer.flush()?;
    reporter.complete(Phase::WriteFile, total);
    Ok(())
}

/// Read a source to its end, reporting `readFile` progress.
///
/// Without a length hint intermediate events are skipped and only the
/// completion event is emitted.
pub fn read_with_progress<R: Read + ?Sized>(
    reader: &mut R,
    size_hint: Option<u64>,
    reporter: &mut ProgressReporter<'_>,
) -> Result<Vec<u8>, BackupError> {
    let mut out = Vec::with_capacity(size_hint.unwrap_or(0).min(isize::MAX as u64) as usize);
    let mut buf = vec![0u8; IO_CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        out.extend_from_slice(&buf[..n]);
        if let Some(total) = size_hint {
            reporter.report(Phase::ReadFile, out.len() as u64, total);
        }
    }
    reporter.complete(Phase::ReadFile, out.len() as u64);
    Ok(out)
}
