//! Global quantitative rescale of the assembled image.
//!
//! The scaled frames are mapped into the dynamic range of a signed 16-bit
//! integer, tracking a single `scale` so that physical units can be
//! recovered, then multiplied back by `scale` and the scanner calibration
//! factor.
//!
//! Two passes are made. The first divides by `max * 32767`. The second only
//! runs when the minimum left by the first pass is below `-32768`, and
//! divides by `min * -32768`. Positive overflow is never corrected by a
//! second pass; this asymmetry is inherited from established ECAT
//! conversion practice and is kept as is.
use crate::ecat::VoxelTensor;
use crate::error::{ConversionError, Result};

/// Upper bound of the 16-bit signed range.
pub const INT16_MAX: f32 = 32767.;
/// Lower bound of the 16-bit signed range.
pub const INT16_MIN: f32 = -32768.;

/// Image data in physical units, along with the factors needed to go back
/// to the normalized 16-bit range.
#[derive(Debug, Clone, PartialEq)]
pub struct RescaledTensor {
    /// Voxel values in physical units, `(X, Y, Z, frame)`
    pub data: VoxelTensor,
    /// Global intensity scale from the rescale passes
    pub scale: f32,
    /// Calibration factor applied on top of `scale`
    pub calibration_factor: f32,
    /// Whether the negative tail correction pass was applied
    pub negative_corrected: bool,
}

impl RescaledTensor {
    /// `scale * calibration_factor`, the factor between the stored values
    /// and the normalized 16-bit range.
    pub fn quantitative_factor(&self) -> f32 {
        self.scale * self.calibration_factor
    }

    /// Maximum voxel value.
    pub fn max(&self) -> f32 {
        max_value(&self.data)
    }

    /// Minimum voxel value.
    pub fn min(&self) -> f32 {
        min_value(&self.data)
    }
}

/// Ensure every voxel is finite.
///
/// # Errors
///
/// - `ConversionError::NonFiniteValue` with the index of the first NaN or
/// infinite voxel, in logical (X, Y, Z, frame) order.
pub fn check_finite(tensor: &VoxelTensor) -> Result<()> {
    match tensor.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((x, y, z, t), &v)) => Err(ConversionError::NonFiniteValue([x, y, z, t], v)),
        None => Ok(()),
    }
}

/// Rescale `tensor` into physical units.
///
/// # Errors
///
/// - `ConversionError::NonFiniteValue` if the tensor holds a NaN or an infinity.
/// - `ConversionError::EmptyOrZeroImage` if the tensor is empty or its maximum
/// is zero.
/// - `ConversionError::RescaleOverflow` if a divisor or the final factor is
/// not representable as a finite `f32`.
pub fn rescale(mut tensor: VoxelTensor, calibration_factor: f32) -> Result<RescaledTensor> {
    check_finite(&tensor)?;
    if tensor.is_empty() {
        return Err(ConversionError::EmptyOrZeroImage);
    }

    let max = max_value(&tensor);
    let divisor = max * INT16_MAX;
    if divisor == 0. {
        return Err(ConversionError::EmptyOrZeroImage);
    }
    if !divisor.is_finite() {
        return Err(ConversionError::RescaleOverflow(max));
    }
    tensor.mapv_inplace(|v| v / divisor);
    let mut scale = max / INT16_MAX;

    let min = min_value(&tensor);
    if !min.is_finite() {
        return Err(ConversionError::RescaleOverflow(max));
    }
    let negative_corrected = min < INT16_MIN;
    if negative_corrected {
        tracing::debug!("Minimum {} below 16-bit range, correcting negative tail", min);
        let divisor = min * INT16_MIN;
        if !divisor.is_finite() {
            return Err(ConversionError::RescaleOverflow(min));
        }
        tensor.mapv_inplace(|v| v / divisor);
        scale = scale * min / INT16_MIN;
    }

    let factor = scale * calibration_factor;
    if !factor.is_finite() {
        return Err(ConversionError::RescaleOverflow(scale));
    }
    tensor.mapv_inplace(|v| v * factor);

    Ok(RescaledTensor {
        data: tensor,
        scale,
        calibration_factor,
        negative_corrected,
    })
}

fn max_value(tensor: &VoxelTensor) -> f32 {
    tensor.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v))
}

fn min_value(tensor: &VoxelTensor) -> f32 {
    tensor.fold(f32::INFINITY, |acc, &v| acc.min(v))
}
