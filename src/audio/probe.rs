use std::path::Path;

use lofty::prelude::AudioFile;

use crate::host::Seconds;

/// Read the duration from the file's container metadata without decoding.
///
/// Lets a cached duration be seeded before the sink exists.
pub fn probe_duration(path: &Path) -> Option<Seconds> {
    let tagged = lofty::read_from_path(path).ok()?;
    let duration = tagged.properties().duration();
    (!duration.is_zero()).then(|| duration.as_secs_f64())
}
