use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Read a whole trace file into memory, one entry per line.
///
/// Files ending in `.zst` are decompressed on the fly. The file is closed
/// before this returns.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, decompressed or read.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let reader: Box<dyn Read> = if is_zstd(path) {
        Box::new(zstd::stream::Decoder::new(file).map_err(io_err)?)
    } else {
        Box::new(file)
    };

    let lines = lines_from(BufReader::new(reader)).map_err(io_err)?;
    debug!(path = %path.display(), lines = lines.len(), "read trace");
    Ok(lines)
}

/// Collect lines from any buffered reader.
///
/// Invalid UTF-8 is replaced rather than rejected; simulator logs
/// occasionally carry stray bytes from the program's own console output.
pub fn lines_from<R: BufRead>(mut reader: R) -> std::io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Ok(lines)
}

fn is_zstd(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "zst")
}
