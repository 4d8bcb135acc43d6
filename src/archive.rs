use std::io::{
    Cursor,
    Read,
};

use zip::ZipArchive;

use crate::error::DispatchError;

/// Returns the contents of the first entry of a ZIP archive, whatever its name.
pub fn extract_first(message: &[u8]) -> Result<Vec<u8>, DispatchError> {
    let malformed = |e: zip::result::ZipError| DispatchError::MalformedArchive(e.to_string());

    let mut archive = ZipArchive::new(Cursor::new(message)).map_err(malformed)?;
    let mut entry = archive.by_index(0).map_err(malformed)?;

    // The declared size comes from the sender; never allocate from it.
    let declared = entry.size();
    let mut data = Vec::new();
    entry
        .read_to_end(&mut data)
        .map_err(|e| DispatchError::MalformedArchive(e.to_string()))?;

    if data.len() as u64 != declared {
        return Err(DispatchError::MalformedArchive(format!(
            "entry declares {} bytes but holds {}",
            declared,
            data.len()
        )));
    }

    Ok(data)
}
