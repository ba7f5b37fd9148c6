use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use super::error::TtsServiceError;
use super::model::{stored_file_name, SynthesisOutcome};

/// Pack every successful outcome into a deflate zip, one `<name>_es.mp3`
/// member each. Failed outcomes are skipped.
pub fn build_archive(outcomes: &[SynthesisOutcome]) -> Result<Vec<u8>, TtsServiceError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used_names = HashSet::new();

    for outcome in outcomes {
        let SynthesisOutcome::Success { name, audio } = outcome else {
            continue;
        };

        let member_name = unique_member_name(name, &mut used_names);
        writer.start_file(member_name.as_str(), options)?;
        writer.write_all(audio)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Zip rejects duplicate member names, so repeated names get `_2`, `_3`, ...
fn unique_member_name(name: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = stored_file_name(name);
    let mut counter = 2;
    while used.contains(&candidate) {
        candidate = format!("{}_es_{}.mp3", name, counter);
        counter += 1;
    }
    used.insert(candidate.clone());
    candidate
}
