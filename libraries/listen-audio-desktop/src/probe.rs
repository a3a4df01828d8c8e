//! Duration probing from container/tag properties

use crate::error::{AudioError, Result};
use lofty::AudioFile;
use std::path::Path;
use std::time::Duration;

/// Read the length of an audio file without decoding it
///
/// Returns `Ok(None)` when the container does not record a duration.
pub fn probe_duration(path: &Path) -> Result<Option<Duration>> {
    if !path.exists() {
        return Err(AudioError::FileNotFound(path.to_path_buf()));
    }

    let tagged_file = lofty::read_from_path(path)?;
    let duration = tagged_file.properties().duration();

    Ok((!duration.is_zero()).then_some(duration))
}
