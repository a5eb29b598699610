//! Writing of converted images as single NIfTI-1 files (.nii or .nii.gz).
//!
//! Only what a conversion produces is supported: a 348-byte header, an empty
//! extender, and float32 voxels in column major order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteordered::{ByteOrdered, Endian};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::convert::ConversionResult;
use crate::error::{ConversionError, Result};
use crate::header::NiftiHeader;
use crate::util::{is_gz_file, nifti_path_for};

/// Write a converted image to `path`. The file is gzip compressed if the
/// name ends with ".gz".
///
/// The header is written in its own byte order (`header.endianness`), and
/// so is the voxel data.
pub fn write_nifti<P>(path: P, result: &ConversionResult) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    if is_gz_file(path) {
        let mut e = GzEncoder::new(writer, Compression::default());
        write_result(&mut e, result)?;
        let _ = e.finish()?;
    } else {
        let mut writer = writer;
        write_result(&mut writer, result)?;
        writer.flush()?;
    }
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Write a converted image next to its ECAT file, replacing the extension
/// with ".nii". Returns the path written.
pub fn write_next_to<P>(ecat_path: P, result: &ConversionResult) -> Result<PathBuf>
where
    P: AsRef<Path>,
{
    let path = nifti_path_for(ecat_path);
    write_nifti(&path, result)?;
    Ok(path)
}

/// Write a converted image to any byte sink.
///
/// # Errors
///
/// - `ConversionError::InvalidCode` if the header does not declare float32
/// voxels or has an invalid `dim[0]`.
/// - `ConversionError::HeaderDataMismatch` if `dim` disagrees with the data.
/// - `ConversionError::IncorrectDescriptionLength` if `descrip` is over 80 bytes.
pub fn write_result<W>(writer: W, result: &ConversionResult) -> Result<()>
where
    W: Write,
{
    let header = checked_header(result)?;
    let mut writer = ByteOrdered::runtime(writer, header.endianness);
    write_header(&mut writer, &header)?;

    // `t()` reverses the axes, so the X index varies fastest
    for v in result.data.data.t().iter() {
        writer.write_f32(*v)?;
    }
    Ok(())
}

/// Copy of the header, checked against the data and with `descrip`
/// padded to 80 bytes.
fn checked_header(result: &ConversionResult) -> Result<NiftiHeader> {
    let mut header = result.header.clone();
    // float32 is the only data type known here
    let _ = header.data_type()?;
    let dim = header.dim()?;
    let shape = result.data.data.shape();
    if dim.len() != shape.len() || dim.iter().zip(shape).any(|(&d, &s)| usize::from(d) != s) {
        return Err(ConversionError::HeaderDataMismatch(dim.to_vec(), shape.to_vec()));
    }
    header.validate_description()?;
    Ok(header)
}

fn write_header<W, E>(writer: &mut ByteOrdered<W, E>, header: &NiftiHeader) -> Result<()>
where
    W: Write,
    E: Endian,
{
    writer.write_i32(header.sizeof_hdr)?;
    writer.write_all(&header.data_type)?;
    writer.write_all(&header.db_name)?;
    writer.write_i32(header.extents)?;
    writer.write_i16(header.session_error)?;
    writer.write_u8(header.regular)?;
    writer.write_u8(header.dim_info)?;
    for s in &header.dim {
        writer.write_u16(*s)?;
    }
    writer.write_f32(header.intent_p1)?;
    writer.write_f32(header.intent_p2)?;
    writer.write_f32(header.intent_p3)?;
    writer.write_i16(header.intent_code)?;
    writer.write_i16(header.datatype)?;
    writer.write_i16(header.bitpix)?;
    writer.write_i16(header.slice_start)?;
    for f in &header.pixdim {
        writer.write_f32(*f)?;
    }
    writer.write_f32(header.vox_offset)?;
    writer.write_f32(header.scl_slope)?;
    writer.write_f32(header.scl_inter)?;
    writer.write_i16(header.slice_end)?;
    writer.write_u8(header.slice_code)?;
    writer.write_u8(header.xyzt_units)?;
    writer.write_f32(header.cal_max)?;
    writer.write_f32(header.cal_min)?;
    writer.write_f32(header.slice_duration)?;
    writer.write_f32(header.toffset)?;
    writer.write_i32(header.glmax)?;
    writer.write_i32(header.glmin)?;

    writer.write_all(&header.descrip)?;
    writer.write_all(&header.aux_file)?;
    writer.write_i16(header.qform_code)?;
    writer.write_i16(header.sform_code)?;
    for f in &[
        header.quatern_b,
        header.quatern_c,
        header.quatern_d,
        header.quatern_x,
        header.quatern_y,
        header.quatern_z,
    ] {
        writer.write_f32(*f)?;
    }
    for f in header.srow_x.iter().chain(&header.srow_y).chain(&header.srow_z) {
        writer.write_f32(*f)?;
    }
    writer.write_all(&header.intent_name)?;
    writer.write_all(&header.magic)?;

    // Empty 4 bytes after the header
    writer.write_u32(0)?;

    Ok(())
}
