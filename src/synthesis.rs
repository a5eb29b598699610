//! Derivation of the NIfTI-1 header of a converted ECAT image.
//!
//! Every field is computed from the geometry of the first sub-header and
//! from the rescaled tensor. Nothing here performs I/O.
use crate::affine::{scanner_affine, voxel_size_mm, Affine4};
use crate::ecat::SubHeader;
use crate::error::{ConversionError, Result};
use crate::header::{NiftiHeader, HEADER_SIZE, MAGIC_CODE_NIP1, VOX_OFFSET};
use crate::rescale::RescaledTensor;
use crate::typedef::{NiftiType, Unit, XForm};
use std::convert::TryFrom;

/// Provenance text written to `descrip` unless overridden.
pub const DEFAULT_DESCRIPTION: &str = "OpenNeuroPET ecat2nii conversion";

/// Build the `dim` field for a voxel array shape.
pub fn dim_from_shape(shape: &[usize]) -> Result<[u16; 8]> {
    if shape.is_empty() || shape.len() > 7 {
        return Err(ConversionError::InvalidCode("dim[0]", shape.len() as i16));
    }
    let mut dim = [1; 8];
    dim[0] = shape.len() as u16;
    for (d, &s) in dim[1..].iter_mut().zip(shape) {
        *d = u16::try_from(s).map_err(|_| ConversionError::DimensionTooLarge(s))?;
    }
    Ok(dim)
}

/// Derive the header of a converted image.
///
/// When `affine` is given it is stored as is, in place of the scanner
/// affine of `first`.
///
/// `cal_min` receives the image maximum and `cal_max` the image minimum.
/// This inversion is kept for compatibility with existing conversions.
pub fn synthesize_header(
    first: &SubHeader,
    rescaled: &RescaledTensor,
    affine: Option<&Affine4>,
    description: &str,
) -> Result<NiftiHeader> {
    let [sx, sy, sz] = voxel_size_mm(first);

    let mut header = NiftiHeader {
        sizeof_hdr: HEADER_SIZE,
        dim: dim_from_shape(rescaled.data.shape())?,
        intent_p1: 0.,
        intent_p2: 0.,
        intent_p3: 0.,
        datatype: NiftiType::Float32 as i16,
        bitpix: NiftiType::Float32.bitpix(),
        pixdim: [1., sx, sy, sz, 0., 0., 0., 0.],
        vox_offset: VOX_OFFSET,
        scl_slope: 1.,
        scl_inter: 0.,
        slice_end: 0,
        slice_code: 0,
        xyzt_units: Unit::xyzt(Unit::Mm, Unit::Unknown),
        cal_min: rescaled.max(),
        cal_max: rescaled.min(),
        slice_duration: 0.,
        toffset: 0.,
        qform_code: XForm::Unknown as i16,
        sform_code: XForm::ScannerAnat as i16,
        quatern_b: 0.,
        quatern_c: 0.,
        quatern_d: 0.,
        magic: *MAGIC_CODE_NIP1,
        ..Default::default()
    };
    header.set_description_str(description)?;

    match affine {
        Some(affine) => header.set_affine(affine),
        None => header.set_affine(&scanner_affine(first)),
    }

    Ok(header)
}
