//! pipeline.rs
//! Export and import wiring. No crypto or container logic lives here.
//!
//! Export: stringify -> encrypt -> pack -> encodePNG [-> writeFile] -> done
//! Import: [readFile ->] decodePNG -> unpack -> decrypt -> parseJSON -> done
//!
//! Each stage validates its input and the first failure ends the run. A
//! failed run emits no `done` event.

use std::path::Path;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::config::CodecConfig;
use crate::crypto::{CryptoError, VaultCodec};
use crate::frame::pack_with_rng;
use crate::frame::unpack;
use crate::io::{open_input, open_output, read_with_progress, write_with_progress, InputSource, OutputSink};
use crate::png::{decode_png_with_progress, encode_png_with_progress};
use crate::progress::{Phase, ProgressReporter};
use crate::types::BackupError;

/// Reset `reporter` for a new run and apply the configured throttle.
fn start_run(reporter: &mut ProgressReporter<'_>, config: &CodecConfig) {
    reporter.begin();
    reporter.set_min_interval(config.progress_interval());
}

// ============================================================
// Export
// ============================================================

/// Turn `vault` into an encrypted PNG backup.
///
/// Design notes:
/// - The reporter is reset and takes `config.progress_interval_ms` as its
///   throttle, so one reporter can drive many runs.
/// - Salt, IV and pixel filler come from the OS RNG; two exports of the same
///   vault never produce the same file.
///
/// # Returns
/// The complete PNG file. `done` is emitted with its length as the total.
///
/// # Errors
/// `InvalidInput` for an empty password or a bad config, `Serialization` if
/// `vault` cannot be written as JSON. Nothing is emitted as `done` on error.
pub fn export_backup<T>(
    vault: &T,
    password: &str,
    config: &CodecConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<Vec<u8>, BackupError>
where
    T: Serialize + ?Sized,
{
    export_backup_with_rng(vault, password, config, &mut OsRng, reporter)
}

/// `export_backup` drawing salt, IV, and filler from `rng`.
pub fn export_backup_with_rng<T, R>(
    vault: &T,
    password: &str,
    config: &CodecConfig,
    rng: &mut R,
    reporter: &mut ProgressReporter<'_>,
) -> Result<Vec<u8>, BackupError>
where
    T: Serialize + ?Sized,
    R: RngCore + CryptoRng,
{
    start_run(reporter, config);
    let png = encode_stages(vault, password, config, rng, reporter)?;
    reporter.finish(png.len() as u64);
    info!(png_len = png.len(), "backup exported");
    Ok(png)
}

/// Export and stream the PNG into `sink`. Returns the bytes written.
pub fn export_backup_to<T>(
    sink: OutputSink,
    vault: &T,
    password: &str,
    config: &CodecConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<u64, BackupError>
where
    T: Serialize + ?Sized,
{
    start_run(reporter, config);
    let png = encode_stages(vault, password, config, &mut OsRng, reporter)?;

    let mut writer = open_output(sink)?;
    write_with_progress(&mut *writer, &png, reporter)?;

    reporter.finish(png.len() as u64);
    info!(png_len = png.len(), "backup exported to sink");
    Ok(png.len() as u64)
}

/// Export straight to a file at `path`.
pub fn write_backup_file<T, P>(
    path: P,
    vault: &T,
    password: &str,
    config: &CodecConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<u64, BackupError>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    export_backup_to(OutputSink::File(path.as_ref().to_path_buf()), vault, password, config, reporter)
}

fn encode_stages<T, R>(
    vault: &T,
    password: &str,
    config: &CodecConfig,
    rng: &mut R,
    reporter: &mut ProgressReporter<'_>,
) -> Result<Vec<u8>, BackupError>
where
    T: Serialize + ?Sized,
    R: RngCore + CryptoRng,
{
    config.validate()?;
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword.into());
    }

    // ---- stringify ----
    let text = Zeroizing::new(serde_json::to_string(vault)?);
    reporter.complete(Phase::Stringify, text.len() as u64);
    debug!(json_len = text.len(), "vault serialized");

    // ---- encrypt ----
    let codec = VaultCodec::new(config.clone());
    let envelope = codec.encrypt_with_rng(text.as_str(), password, rng, reporter)?;
    drop(text);

    // ---- pack ----
    let frame = pack_with_rng(&envelope, rng, reporter)?;

    // ---- encodePNG ----
    let png = encode_png_with_progress(&frame.pixels, frame.header.width, frame.header.height, reporter)?;
    Ok(png)
}

// ============================================================
// Import
// ============================================================

/// Restore a vault from PNG bytes produced by `export_backup`.
///
/// Stages run in file order and the first failure ends the run:
/// `decodePNG` (MalformedPng, UnsupportedCompression, UnsupportedFilter),
/// `unpack` (UnsupportedFormat, CorruptHeader, ChecksumMismatch),
/// `decrypt` (InvalidFormat, AuthenticationFailed), `parseJSON`
/// (Serialization).
///
/// # Returns
/// The vault deserialized as `T`. The decrypted JSON text is wiped before
/// returning.
pub fn import_backup<T>(
    png: &[u8],
    password: &str,
    config: &CodecConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<T, BackupError>
where
    T: DeserializeOwned,
{
    start_run(reporter, config);
    let vault = decode_stages(png, password, config, reporter)?;
    reporter.finish(png.len() as u64);
    info!(png_len = png.len(), "backup imported");
    Ok(vault)
}

/// Read the PNG from `source`, then import it.
pub fn import_backup_from<T>(
    source: InputSource,
    password: &str,
    config: &CodecConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<T, BackupError>
where
    T: DeserializeOwned,
{
    start_run(reporter, config);
    let (mut reader, size_hint) = open_input(source)?;
    let png = read_with_progress(&mut *reader, size_hint, reporter)?;

    let vault = decode_stages(&png, password, config, reporter)?;
    reporter.finish(png.len() as u64);
    info!(png_len = png.len(), "backup imported from source");
    Ok(vault)
}

/// Import from a file at `path`.
pub fn read_backup_file<T, P>(
    path: P,
    password: &str,
    config: &CodecConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<T, BackupError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    import_backup_from(InputSource::File(path.as_ref().to_path_buf()), password, config, reporter)
}

fn decode_stages<T>(
    png: &[u8],
    password: &str,
    config: &CodecConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<T, BackupError>
where
    T: DeserializeOwned,
{
    config.validate()?;

    // ---- decodePNG ----
    let image = decode_png_with_progress(png, reporter)?;

    // ---- unpack ----
    let envelope = unpack(&image.pixels, reporter)?;
    drop(image);

    // ---- decrypt ----
    let codec = VaultCodec::new(config.clone());
    let text = codec.decrypt(&envelope, password, reporter)?;

    // ---- parseJSON ----
    let vault = serde_json::from_str(text.as_str())?;
    reporter.complete(Phase::ParseJson, text.len() as u64);
    Ok(vault)
}
