//! NIfTI-1 codes used by the converted header. Primitive integer values can
//! be converted to these types and vice-versa.

/// Data type for representing a NIFTI value type in a volume.
/// Only the types involved in the ECAT conversion are listed.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum NiftiType {
    /// 32 bit float, the stored voxel type.
    // NIFTI_TYPE_FLOAT32        16
    Float32 = 16,
}

impl NiftiType {
    /// Retrieve the size of an element of this data type, in bytes.
    pub fn size_of(self) -> usize {
        match self {
            NiftiType::Float32 => 4,
        }
    }

    /// Number of bits per voxel, as in the `bitpix` field.
    pub fn bitpix(self) -> i16 {
        (self.size_of() * 8) as i16
    }
}

/// An enum type which represents a unit type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum Unit {
    /// NIFTI code for unspecified units.
    Unknown = 0,
    /* Space codes are multiples of 1. */
    /// NIFTI code for meters.
    Meter = 1,
    /// NIFTI code for millimeters.
    Mm = 2,
    /// NIFTI code for micrometers.
    Micron = 3,
    /* Time codes are multiples of 8. */
    /// NIFTI code for seconds.
    Sec = 8,
    /// NIFTI code for milliseconds.
    Msec = 16,
    /// NIFTI code for microseconds.
    Usec = 24,
}

impl Unit {
    /// Combine a space unit and a time unit into an `xyzt_units` code.
    ///
    /// ```
    /// # use ecat2nii::typedef::Unit;
    /// assert_eq!(Unit::xyzt(Unit::Mm, Unit::Unknown), 2);
    /// assert_eq!(Unit::xyzt(Unit::Mm, Unit::Sec), 10);
    /// ```
    pub fn xyzt(space: Unit, time: Unit) -> u8 {
        (space as u8 & 0o0007) | (time as u8 & 0o0070)
    }
}

/// An enum type for representing a NIFTI XForm.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum XForm {
    /// Arbitrary coordinates (Method 1).
    Unknown = 0,
    /// Scanner-based anatomical coordinates
    ScannerAnat = 1,
    /// Coordinates aligned to another file's,
    /// or to anatomical "truth".
    AlignedAnat = 2,
    /// Coordinates aligned to Talairach-Tournoux
    /// Atlas; (0,0,0)=AC, etc.
    Talairach = 3,
    /// MNI 152 normalized coordinates.
    Mni152 = 4,
}
