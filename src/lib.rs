//! Conversion of ECAT positron emission tomography images into NIfTI-1.
//!
//! The crate takes a parsed ECAT acquisition (main header, one sub-header
//! per frame, and the voxel tensor) and produces a NIfTI-1 header together
//! with voxel data in quantitative physical units. Per-frame timing and
//! count information is returned alongside, for timing file writers.
//!
//! Decoding the ECAT binary format is left to an external parser, plugged
//! in through the [`EcatReader`] trait.
//!
//! # Example
//!
//! ```no_run
//! use ecat2nii::{writer, ConversionOptions, Converter, EcatSource, EcatVolume};
//! # use std::path::Path;
//! # fn my_ecat_parser(path: &Path) -> ecat2nii::Result<EcatVolume> { unimplemented!() }
//!
//! # fn run() -> ecat2nii::Result<()> {
//! let reader = |path: &Path| my_ecat_parser(path);
//! let conversion = Converter::new(ConversionOptions::new().time_zero("ScanStart"))
//!     .with_reader(&reader)
//!     .convert(EcatSource::raw("sub-01_pet.v"))?;
//! writer::write_nifti("sub-01_pet.nii.gz", &conversion.result)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`EcatReader`]: ./ecat/trait.EcatReader.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;

pub mod affine;
pub mod convert;
pub mod ecat;
pub mod error;
pub mod frame;
pub mod header;
pub mod options;
pub mod rescale;
pub mod shape;
pub mod synthesis;
pub mod typedef;
mod util;
pub mod writer;

pub use crate::convert::{convert, Conversion, ConversionResult, Converter};
pub use crate::ecat::{EcatReader, EcatSource, EcatVolume, MainHeader, SubHeader, VoxelTensor};
pub use crate::error::{ConversionError, Result};
pub use crate::frame::FrameTiming;
pub use crate::header::NiftiHeader;
pub use crate::options::ConversionOptions;
pub use crate::rescale::RescaledTensor;
pub use crate::util::nifti_path_for;
pub use byteordered::Endianness;
