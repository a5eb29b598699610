//! Private utility module
use std::path::{Path, PathBuf};

/// Check whether the file name ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// The NIfTI path placed next to an ECAT file: same stem, ".nii" extension.
pub fn nifti_path_for<P>(ecat_path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    ecat_path.as_ref().with_extension("nii")
}
