//! Output file naming and writing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::MasterError;

/// `song.tt` becomes `song.wav`; a path without an extension gains one.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("wav")
}

/// Write an encoded file in one go.
///
/// Nothing is created until the whole song has been encoded, so a failed
/// compile or render never leaves a partial file behind.
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<(), MasterError> {
    fs::write(path, bytes).map_err(|source| MasterError::Write {
        path: path.to_path_buf(),
        source,
    })
}
