//! Reconciliation of the geometry declared in the ECAT headers with the
//! actual shape of the voxel tensor.
//!
//! ECAT files declare their voxel grid once per frame, and the frame count
//! in the main header. The tensor produced by the reader has to agree with
//! those, except for single-frame acquisitions, which are let through as
//! long as the in-plane dimensions match.
use crate::ecat::{MainHeader, SubHeader};
use crate::error::{ConversionError, Result};

/// How the tensor shape was accepted.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum FrameMode {
    /// The tensor shape equals the declared `(X, Y, Z, frames)`.
    Exact,
    /// The tensor has a single frame and its X and Y dimensions match the
    /// declared ones. Z and the declared frame count are not checked.
    SingleFrame,
}

/// The `(X, Y, Z, frames)` shape declared by the first sub-header and the
/// main header.
pub fn declared_shape(main_header: &MainHeader, first: &SubHeader) -> [usize; 4] {
    [
        first.x_dimension,
        first.y_dimension,
        first.z_dimension,
        main_header.num_frames,
    ]
}

/// Check a tensor shape against the declared one.
///
/// # Errors
///
/// - `ConversionError::ShapeMismatch` if the shapes differ and the
/// single-frame exemption does not hold.
///
/// # Example
///
/// ```
/// # use ecat2nii::shape::{reconcile, FrameMode};
/// assert_eq!(reconcile(&[128, 128, 63, 4], [128, 128, 63, 4])?, FrameMode::Exact);
/// assert_eq!(reconcile(&[128, 128, 1, 1], [128, 128, 63, 1])?, FrameMode::SingleFrame);
/// assert!(reconcile(&[128, 128, 63, 3], [128, 128, 63, 4]).is_err());
/// # Ok::<(), ecat2nii::ConversionError>(())
/// ```
pub fn reconcile(actual: &[usize], declared: [usize; 4]) -> Result<FrameMode> {
    if actual == declared {
        return Ok(FrameMode::Exact);
    }
    if actual.len() == 4 && actual[3] == 1 && actual[0..2] == declared[0..2] {
        return Ok(FrameMode::SingleFrame);
    }
    Err(ConversionError::ShapeMismatch(declared, actual.to_vec()))
}

/// Indices of the sub-headers whose voxel grid or pixel sizes differ from
/// those of the first one.
pub fn inconsistent_frames(sub_headers: &[SubHeader]) -> Vec<usize> {
    let first = match sub_headers.first() {
        Some(s) => s,
        None => return Vec::new(),
    };
    sub_headers
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, s)| {
            s.dimensions() != first.dimensions() || s.pixel_sizes() != first.pixel_sizes()
        })
        .map(|(i, _)| i)
        .collect()
}
