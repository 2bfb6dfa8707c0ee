use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::encoding::TextEncoding;
use crate::error::CsvWriteError;

/// Write `text` to the file at `path`, encoded with `encoding`
///
/// The payload is fully encoded before the file is created, so an invalid
/// encoding label never leaves an empty or partial file behind.
/// The file is closed when this function returns, also on error.
pub fn output_to_file<P: AsRef<Path>>(
    text: &str,
    path: P,
    encoding: &str,
) -> Result<(), CsvWriteError> {
    let encoding = TextEncoding::for_label(encoding)?;
    output_encoded_to_file(&encoding.encode(text), path.as_ref())?;
    debug!(path = %path.as_ref().display(), encoding = encoding.name(), "wrote CSV file");
    Ok(())
}

pub(crate) fn output_encoded_to_file(bytes: &[u8], path: &Path) -> Result<(), CsvWriteError> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(())
}
