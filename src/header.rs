//! This module defines the `NiftiHeader` struct, which holds every NIfTI-1
//! header field produced by the conversion.

use crate::error::{ConversionError, Result};
use crate::typedef::{NiftiType, Unit, XForm};
use byteordered::{ByteOrdered, Endianness};
use num_traits::FromPrimitive;
use std::io::Read;
use std::ops::Deref;

/// Magic code for NIFTI-1 header files (extention ".hdr[.gz]").
pub const MAGIC_CODE_NI1: &[u8; 4] = b"ni1\0";
/// Magic code for full NIFTI-1 files (extention ".nii[.gz]").
pub const MAGIC_CODE_NIP1: &[u8; 4] = b"n+1\0";

/// Size of the NIfTI-1 header, in bytes.
pub const HEADER_SIZE: i32 = 348;
/// Offset of the voxel data in a single file with no extensions.
pub const VOX_OFFSET: f32 = 352.;

/// The NIFTI-1 header data type.
/// All fields are public and named after the specification's header file.
/// The type of each field was adjusted according to their use and
/// array limitations.
///
/// The quaternion offsets (`qoffset_x`, `qoffset_y`, `qoffset_z` in the
/// C header) are the `quatern_x`, `quatern_y` and `quatern_z` fields.
///
/// # Examples
///
/// ```
/// use ecat2nii::NiftiHeader;
/// # use ecat2nii::Result;
///
/// # fn run() -> Result<()> {
/// let mut hdr = NiftiHeader {
///     cal_min: 0.,
///     cal_max: 128.,
///     ..Default::default()
/// };
/// hdr.set_description_str("calibrated")?;
/// assert_eq!(hdr.sizeof_hdr, 348);
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// Header size, must be 348
    pub sizeof_hdr: i32,
    /// Unused in NIFTI-1
    pub data_type: [u8; 10],
    /// Unused in NIFTI-1
    pub db_name: [u8; 18],
    /// Unused in NIFTI-1
    pub extents: i32,
    /// Unused in NIFTI-1
    pub session_error: i16,
    /// Unused in NIFTI-1
    pub regular: u8,
    /// MRI slice ordering
    pub dim_info: u8,
    /// Data array dimensions
    pub dim: [u16; 8],
    /// 1st intent parameter
    pub intent_p1: f32,
    /// 2nd intent parameter
    pub intent_p2: f32,
    /// 3rd intent parameter
    pub intent_p3: f32,
    /// NIFTI_INTENT_* code
    pub intent_code: i16,
    /// Defines the data type!
    pub datatype: i16,
    /// Number of bits per voxel
    pub bitpix: i16,
    /// First slice index
    pub slice_start: i16,
    /// Grid spacings
    pub pixdim: [f32; 8],
    /// Offset into .nii file to reach the volume
    pub vox_offset: f32,
    /// Data scaling: slope
    pub scl_slope: f32,
    /// Data scaling: offset
    pub scl_inter: f32,
    /// Last slice index
    pub slice_end: i16,
    /// Slice timing order
    pub slice_code: u8,
    /// Units of pixdim[1..4]
    pub xyzt_units: u8,
    /// Max display intensity
    pub cal_max: f32,
    /// Min display intensity
    pub cal_min: f32,
    /// Time for 1 slice
    pub slice_duration: f32,
    /// Time axis shift
    pub toffset: f32,
    /// Unused in NIFTI-1
    pub glmax: i32,
    /// Unused in NIFTI-1
    pub glmin: i32,

    /// Any text you like
    pub descrip: Vec<u8>,
    /// Auxiliary filename
    pub aux_file: [u8; 24],
    /// NIFTI_XFORM_* code
    pub qform_code: i16,
    /// NIFTI_XFORM_* code
    pub sform_code: i16,
    /// Quaternion b param
    pub quatern_b: f32,
    /// Quaternion c param
    pub quatern_c: f32,
    /// Quaternion d param
    pub quatern_d: f32,
    /// Quaternion x shift
    pub quatern_x: f32,
    /// Quaternion y shift
    pub quatern_y: f32,
    /// Quaternion z shift
    pub quatern_z: f32,

    /// 1st row affine transform
    pub srow_x: [f32; 4],
    /// 2nd row affine transform
    pub srow_y: [f32; 4],
    /// 3rd row affine transform
    pub srow_z: [f32; 4],

    /// 'name' or meaning of data
    pub intent_name: [u8; 16],

    /// Magic code. Must be `b"ni1\0"` or `b"n+1\0"`
    pub magic: [u8; 4],

    /// Byte order of the header as read, or to be written
    pub endianness: Endianness,
}

impl Default for NiftiHeader {
    fn default() -> NiftiHeader {
        NiftiHeader {
            sizeof_hdr: HEADER_SIZE,
            data_type: [0; 10],
            db_name: [0; 18],
            extents: 0,
            session_error: 0,
            regular: 0,
            dim_info: 0,
            dim: [1, 0, 0, 0, 0, 0, 0, 0],
            intent_p1: 0.,
            intent_p2: 0.,
            intent_p3: 0.,
            intent_code: 0,
            datatype: 0,
            bitpix: 0,
            slice_start: 0,
            pixdim: [0.; 8],
            vox_offset: VOX_OFFSET,
            scl_slope: 0.,
            scl_inter: 0.,
            slice_end: 0,
            slice_code: 0,
            xyzt_units: 0,
            cal_max: 0.,
            cal_min: 0.,
            slice_duration: 0.,
            toffset: 0.,
            glmax: 0,
            glmin: 0,

            descrip: vec![0; 80],
            aux_file: [0; 24],
            qform_code: 0,
            sform_code: 0,
            quatern_b: 0.,
            quatern_c: 0.,
            quatern_d: 0.,
            quatern_x: 0.,
            quatern_y: 0.,
            quatern_z: 0.,

            srow_x: [0.; 4],
            srow_y: [0.; 4],
            srow_z: [0.; 4],

            intent_name: [0; 16],

            magic: *MAGIC_CODE_NIP1,

            endianness: Endianness::Little,
        }
    }
}

impl NiftiHeader {
    /// Read a NIfTI-1 header, along with its byte order, from the given
    /// byte stream. It is assumed that the input is currently at the start
    /// of the NIFTI header.
    pub fn from_reader<S: Read>(input: S) -> Result<NiftiHeader> {
        parse_header_1(input)
    }

    /// The effective dimensions of the volume, `dim[1..=dim[0]]`.
    pub fn dim(&self) -> Result<&[u16]> {
        let ndim = usize::from(self.dim[0]);
        if ndim == 0 || ndim > 7 {
            return Err(ConversionError::InvalidCode("dim[0]", self.dim[0] as i16));
        }
        Ok(&self.dim[1..=ndim])
    }

    /// Get the data type as a validated enum.
    pub fn data_type(&self) -> Result<NiftiType> {
        FromPrimitive::from_i16(self.datatype)
            .ok_or(ConversionError::InvalidCode("datatype", self.datatype))
    }

    /// Get the spatial units type as a validated unit enum.
    pub fn xyzt_to_space(&self) -> Result<Unit> {
        let space_code = self.xyzt_units & 0o0007;
        FromPrimitive::from_u8(space_code)
            .ok_or(ConversionError::InvalidCode("xyzt units (space)", i16::from(space_code)))
    }

    /// Get the time units type as a validated unit enum.
    pub fn xyzt_to_time(&self) -> Result<Unit> {
        let time_code = self.xyzt_units & 0o0070;
        FromPrimitive::from_u8(time_code)
            .ok_or(ConversionError::InvalidCode("xyzt units (time)", i16::from(time_code)))
    }

    /// Get the xyzt units type as a validated pair of space and time unit enum.
    pub fn xyzt(&self) -> Result<(Unit, Unit)> {
        Ok((self.xyzt_to_space()?, self.xyzt_to_time()?))
    }

    /// Get the qform coordinate mapping method as a validated enum.
    pub fn qform(&self) -> Result<XForm> {
        FromPrimitive::from_i16(self.qform_code)
            .ok_or(ConversionError::InvalidCode("qform", self.qform_code))
    }

    /// Get the sform coordinate mapping method as a validated enum.
    pub fn sform(&self) -> Result<XForm> {
        FromPrimitive::from_i16(self.sform_code)
            .ok_or(ConversionError::InvalidCode("sform", self.sform_code))
    }

    /// The description as text, up to the first null byte.
    pub fn description(&self) -> String {
        let end = self
            .descrip
            .iter()
            .position(|&b| b == 0)
            .unwrap_or_else(|| self.descrip.len());
        String::from_utf8_lossy(&self.descrip[..end]).into_owned()
    }

    /// Ensure that the current `descrip` field is valid and is exactly equal to 80 bytes.
    pub fn validate_description(&mut self) -> Result<()> {
        let len = self.descrip.len();
        if len > 80 {
            Err(ConversionError::IncorrectDescriptionLength(len))
        } else {
            if len < 80 {
                self.descrip.extend((len..80).map(|_| 0));
            }
            Ok(())
        }
    }

    /// Safely set the `descrip` field using a buffer.
    pub fn set_description<D>(&mut self, description: D) -> Result<()>
    where
        D: Into<Vec<u8>>,
        D: Deref<Target = [u8]>,
    {
        let len = description.len();
        if len < 80 {
            let mut descrip = vec![0; 80];
            descrip[..len].copy_from_slice(&description);
            self.descrip = descrip;
            Ok(())
        } else if len == 80 {
            self.descrip = description.into();
            Ok(())
        } else {
            Err(ConversionError::IncorrectDescriptionLength(len))
        }
    }

    /// Safely set the `descrip` field using a  &str.
    pub fn set_description_str<T>(&mut self, description: T) -> Result<()>
    where
        T: Into<String>,
    {
        self.set_description(description.into().into_bytes())
    }
}

fn parse_header_1<S: Read>(mut input: S) -> Result<NiftiHeader> {
    // the byte order is told apart by the header size
    let mut sizeof_hdr = [0u8; 4];
    input.read_exact(&mut sizeof_hdr)?;
    let endianness = if i32::from_le_bytes(sizeof_hdr) == HEADER_SIZE {
        Endianness::Little
    } else if i32::from_be_bytes(sizeof_hdr) == HEADER_SIZE {
        Endianness::Big
    } else {
        return Err(ConversionError::InvalidFormat);
    };

    let h = NiftiHeader {
        sizeof_hdr: HEADER_SIZE,
        endianness,
        ..Default::default()
    };
    parse_header_2(h, ByteOrdered::runtime(input, endianness))
}

/// second part of header parsing
fn parse_header_2<S: Read>(
    mut h: NiftiHeader,
    mut input: ByteOrdered<S, Endianness>,
) -> Result<NiftiHeader> {
    input.read_exact(&mut h.data_type)?;
    input.read_exact(&mut h.db_name)?;
    h.extents = input.read_i32()?;
    h.session_error = input.read_i16()?;
    h.regular = input.read_u8()?;
    h.dim_info = input.read_u8()?;
    for v in &mut h.dim {
        *v = input.read_u16()?;
    }
    h.intent_p1 = input.read_f32()?;
    h.intent_p2 = input.read_f32()?;
    h.intent_p3 = input.read_f32()?;
    h.intent_code = input.read_i16()?;
    h.datatype = input.read_i16()?;
    h.bitpix = input.read_i16()?;
    h.slice_start = input.read_i16()?;
    for v in &mut h.pixdim {
        *v = input.read_f32()?;
    }
    h.vox_offset = input.read_f32()?;
    h.scl_slope = input.read_f32()?;
    h.scl_inter = input.read_f32()?;
    h.slice_end = input.read_i16()?;
    h.slice_code = input.read_u8()?;
    h.xyzt_units = input.read_u8()?;
    h.cal_max = input.read_f32()?;
    h.cal_min = input.read_f32()?;
    h.slice_duration = input.read_f32()?;
    h.toffset = input.read_f32()?;
    h.glmax = input.read_i32()?;
    h.glmin = input.read_i32()?;

    // descrip is 80-elem vec already
    input.read_exact(h.descrip.as_mut_slice())?;
    input.read_exact(&mut h.aux_file)?;
    h.qform_code = input.read_i16()?;
    h.sform_code = input.read_i16()?;
    h.quatern_b = input.read_f32()?;
    h.quatern_c = input.read_f32()?;
    h.quatern_d = input.read_f32()?;
    h.quatern_x = input.read_f32()?;
    h.quatern_y = input.read_f32()?;
    h.quatern_z = input.read_f32()?;
    for v in &mut h.srow_x {
        *v = input.read_f32()?;
    }
    for v in &mut h.srow_y {
        *v = input.read_f32()?;
    }
    for v in &mut h.srow_z {
        *v = input.read_f32()?;
    }
    input.read_exact(&mut h.intent_name)?;
    input.read_exact(&mut h.magic)?;

    debug_assert_eq!(h.descrip.len(), 80);

    if &h.magic != MAGIC_CODE_NI1 && &h.magic != MAGIC_CODE_NIP1 {
        Err(ConversionError::InvalidFormat)
    } else {
        Ok(h)
    }
}
