//! Upload validation for user-supplied structure files.

use crate::error::SpbError;

/// Expected structure-file suffix.
const CIF_SUFFIX: &str = ".cif";

/// Validate an uploaded file name and derive its structure identifier
/// (the name with the `.cif` suffix stripped). Runs before any file read
/// or network traffic.
///
/// # Errors
///
/// Returns [`SpbError::InvalidFileFormat`] when the name does not end in
/// `.cif` or the stem is empty.
pub fn derive_cifid(file_name: &str) -> Result<String, SpbError> {
    let stem = file_name
        .strip_suffix(CIF_SUFFIX)
        .ok_or_else(|| SpbError::InvalidFileFormat(file_name.to_owned()))?;
    if stem.is_empty() {
        return Err(SpbError::InvalidFileFormat(file_name.to_owned()));
    }
    Ok(stem.to_owned())
}
