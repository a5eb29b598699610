//! This module defines the ECAT data model consumed by the conversion:
//! the main header, one sub-header per frame, and the 4-D voxel tensor.
//!
//! Decoding the ECAT binary layout is not done here. A parser is plugged in
//! through the [`EcatReader`] trait, or the caller hands over an already
//! parsed [`EcatVolume`].
//!
//! [`EcatReader`]: ./trait.EcatReader.html
//! [`EcatVolume`]: ./struct.EcatVolume.html

use crate::error::Result;
use ndarray::Array4;
use std::fmt;
use std::path::{Path, PathBuf};

/// Dense voxel tensor of scanner counts, indexed as `(X, Y, Z, frame)`.
pub type VoxelTensor = Array4<f32>;

/// First ECAT software version whose sub-headers carry prompt and random
/// count rates (ECAT 7.3).
pub const COUNT_RATES_SW_VERSION: i32 = 73;

/// Scanner and study level metadata of an ECAT file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainHeader {
    /// Number of time frames in the acquisition
    pub num_frames: usize,
    /// ECAT software version code (e.g. 72 for ECAT 7.2)
    pub sw_version: i32,
    /// Physical units per count, scanner wide
    pub calibration_factor: f32,
}

impl MainHeader {
    /// Whether the sub-headers of this file carry prompt and random rates.
    pub fn has_count_rates(&self) -> bool {
        self.sw_version >= COUNT_RATES_SW_VERSION
    }
}

/// Per-frame ECAT image sub-header.
///
/// Pixel sizes are in centimeters, frame times in the scanner's native
/// unit. Rate fields are zero for files older than ECAT 7.3.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubHeader {
    /// Voxel grid width
    pub x_dimension: usize,
    /// Voxel grid height
    pub y_dimension: usize,
    /// Number of planes
    pub z_dimension: usize,
    /// Pixel size along X
    pub x_pixel_size: f32,
    /// Pixel size along Y
    pub y_pixel_size: f32,
    /// Pixel size along Z
    pub z_pixel_size: f32,
    /// Multiplier from stored counts to a comparable intensity scale
    pub scale_factor: f32,
    /// Frame start time
    pub frame_start_time: f32,
    /// Frame duration
    pub frame_duration: f32,
    /// Prompt count rate
    pub prompt_rate: f32,
    /// Random count rate
    pub random_rate: f32,
}

impl SubHeader {
    /// The declared voxel grid as `[X, Y, Z]`.
    pub fn dimensions(&self) -> [usize; 3] {
        [self.x_dimension, self.y_dimension, self.z_dimension]
    }

    /// The pixel sizes as `[X, Y, Z]`.
    pub fn pixel_sizes(&self) -> [f32; 3] {
        [self.x_pixel_size, self.y_pixel_size, self.z_pixel_size]
    }
}

/// A fully parsed ECAT acquisition: main header, ordered sub-headers
/// (index = frame index) and pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct EcatVolume {
    /// Main header
    pub main_header: MainHeader,
    /// One sub-header per frame
    pub sub_headers: Vec<SubHeader>,
    /// Raw pixel data, `(X, Y, Z, frame)`
    pub data: VoxelTensor,
}

impl EcatVolume {
    /// Assemble a parsed acquisition from its parts.
    pub fn new(main_header: MainHeader, sub_headers: Vec<SubHeader>, data: VoxelTensor) -> Self {
        EcatVolume {
            main_header,
            sub_headers,
            data,
        }
    }
}

/// The external ECAT parser.
///
/// Implemented for any `Fn(&Path) -> Result<EcatVolume>`, so a closure can
/// stand in for a full reader.
pub trait EcatReader {
    /// Decode the ECAT file at `path`.
    fn read_ecat(&self, path: &Path) -> Result<EcatVolume>;
}

impl<F> EcatReader for F
where
    F: Fn(&Path) -> Result<EcatVolume>,
{
    fn read_ecat(&self, path: &Path) -> Result<EcatVolume> {
        self(path)
    }
}

/// Input to a conversion, resolved once at the start of the pipeline.
#[derive(Clone, PartialEq)]
pub enum EcatSource {
    /// An ECAT file on disk, decoded by an [`EcatReader`](./trait.EcatReader.html).
    Raw(PathBuf),
    /// An acquisition that was already parsed.
    Parsed(EcatVolume),
}

impl EcatSource {
    /// Create a source from a file path.
    pub fn raw<P: Into<PathBuf>>(path: P) -> Self {
        EcatSource::Raw(path.into())
    }

    /// Create a source from a parsed (main header, sub-headers, data) triple.
    pub fn parsed(main_header: MainHeader, sub_headers: Vec<SubHeader>, data: VoxelTensor) -> Self {
        EcatSource::Parsed(EcatVolume::new(main_header, sub_headers, data))
    }

    /// The path of the source file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            EcatSource::Raw(path) => Some(path),
            EcatSource::Parsed(_) => None,
        }
    }
}

impl From<EcatVolume> for EcatSource {
    fn from(volume: EcatVolume) -> Self {
        EcatSource::Parsed(volume)
    }
}

// voxel data is left out, it would flood the output
impl fmt::Debug for EcatSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EcatSource::Raw(path) => f.debug_tuple("Raw").field(path).finish(),
            EcatSource::Parsed(v) => f
                .debug_struct("Parsed")
                .field("main_header", &v.main_header)
                .field("sub_headers", &v.sub_headers.len())
                .field("shape", &v.data.shape())
                .finish(),
        }
    }
}
