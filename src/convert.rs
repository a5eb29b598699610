//! The ECAT to NIfTI conversion pipeline.
//!
//! A conversion resolves its [`EcatSource`] once, validates it, then runs
//! shape reconciliation, per-frame scaling, the global rescale and header
//! synthesis in sequence. The first failure ends the conversion and nothing
//! is produced.
//!
//! # Example
//!
//! ```
//! use ecat2nii::{convert, ConversionOptions, EcatSource, MainHeader, SubHeader, VoxelTensor};
//!
//! # fn run() -> ecat2nii::Result<()> {
//! let main_header = MainHeader { num_frames: 1, sw_version: 73, calibration_factor: 1. };
//! let sub_header = SubHeader {
//!     x_dimension: 4, y_dimension: 4, z_dimension: 2,
//!     x_pixel_size: 0.2, y_pixel_size: 0.2, z_pixel_size: 0.25,
//!     scale_factor: 1., frame_duration: 1.,
//!     ..Default::default()
//! };
//! let data = VoxelTensor::from_elem((4, 4, 2, 1), 5.);
//! let source = EcatSource::parsed(main_header, vec![sub_header], data);
//!
//! let conversion = convert(source, &ConversionOptions::new().time_zero("10:00:00"))?;
//! assert_eq!(conversion.result.header.dim, [4, 4, 4, 2, 1, 1, 1, 1]);
//! assert_eq!(conversion.timing.duration, vec![60.]);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! [`EcatSource`]: ../ecat/enum.EcatSource.html
use crate::ecat::{EcatReader, EcatSource, EcatVolume};
use crate::error::{ConversionError, Result};
use crate::frame::{scale_frames, FrameTiming};
use crate::header::NiftiHeader;
use crate::options::ConversionOptions;
use crate::rescale::{check_finite, rescale, RescaledTensor};
use crate::shape::{declared_shape, inconsistent_frames, reconcile, FrameMode};
use crate::synthesis::synthesize_header;
use ndarray::Axis;
use std::collections::BTreeMap;
use std::fmt;

/// The header and voxel data of a converted image, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// Derived NIfTI-1 header
    pub header: NiftiHeader,
    /// Voxel data in physical units
    pub data: RescaledTensor,
}

impl ConversionResult {
    /// The factor relating stored values to the normalized 16-bit range.
    pub fn quantitative_factor(&self) -> f32 {
        self.data.quantitative_factor()
    }
}

/// Everything a successful conversion produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Header and data
    pub result: ConversionResult,
    /// Per-frame timing and counts
    pub timing: FrameTiming,
    /// How the tensor shape was accepted
    pub frame_mode: FrameMode,
    /// Injection time, as given in the options
    pub time_zero: Option<String>,
    /// Extra metadata, as given in the options
    pub extra: BTreeMap<String, String>,
}

/// Runs conversions with a fixed set of options and, optionally, an ECAT
/// reader for raw sources.
pub struct Converter<'a> {
    options: ConversionOptions,
    reader: Option<&'a dyn EcatReader>,
}

impl<'a> fmt::Debug for Converter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("reader", &self.reader.is_some())
            .finish()
    }
}

impl<'a> Converter<'a> {
    /// Create a converter with the given options and no ECAT reader.
    pub fn new(options: ConversionOptions) -> Self {
        Converter {
            options,
            reader: None,
        }
    }

    /// Decode raw sources with `reader`.
    pub fn with_reader(mut self, reader: &'a dyn EcatReader) -> Self {
        self.reader = Some(reader);
        self
    }

    /// The options of this converter.
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert one ECAT acquisition.
    ///
    /// # Errors
    ///
    /// - `ConversionError::MissingReader` if `source` is raw and no reader
    /// was configured; errors from the reader itself are passed on.
    /// - `ConversionError::InvalidInputCombination` if the acquisition has no
    /// sub-headers.
    /// - `ConversionError::ShapeMismatch` if the tensor shape disagrees with
    /// the headers.
    /// - `ConversionError::SubHeaderCount` if a tensor frame has no sub-header.
    /// - `ConversionError::NonFiniteValue` if a voxel is NaN or infinite.
    /// - `ConversionError::EmptyOrZeroImage` if the scaled image maximum is zero.
    /// - `ConversionError::IncorrectDescriptionLength` if the configured
    /// description is over 80 bytes.
    /// - `ConversionError::NonFiniteCalibration` if the calibration factor,
    /// configured or from the main header, is NaN or infinite.
    /// - `ConversionError::RescaleOverflow` if the image extremes are too
    /// large to rescale in `f32`.
    ///
    /// A warning is logged when no TimeZero, or an empty one, is configured.
    pub fn convert(&self, source: EcatSource) -> Result<Conversion> {
        let volume = self.resolve(source)?;
        self.validate(&volume)?;
        let calibration_factor = self.calibration_factor(&volume);
        if self.options.get_time_zero().map_or(true, str::is_empty) {
            tracing::warn!(
                "Metadata TimeZero is missing -- set to ScanStart or empty to use the scanning time as injection time"
            );
        }

        let EcatVolume {
            main_header,
            sub_headers,
            data,
        } = volume;

        let declared = declared_shape(&main_header, &sub_headers[0]);
        let frame_mode = reconcile(data.shape(), declared)?;
        if frame_mode == FrameMode::SingleFrame {
            tracing::debug!(
                "Single frame acquisition, shape {:?} accepted against headers {:?}",
                data.shape(),
                declared
            );
        }

        let frames = data.len_of(Axis(3));
        if sub_headers.len() < frames {
            return Err(ConversionError::SubHeaderCount(frames, sub_headers.len()));
        }
        let inconsistent = inconsistent_frames(&sub_headers);
        if !inconsistent.is_empty() {
            tracing::warn!(
                "Frames {:?} declare a geometry different from the first frame",
                inconsistent
            );
        }
        check_finite(&data)?;

        let (scaled, timing) = scale_frames(&main_header, &sub_headers, &data);
        drop(data);

        let rescaled = rescale(scaled, calibration_factor)?;

        let header = synthesize_header(
            &sub_headers[0],
            &rescaled,
            self.options.get_affine(),
            self.options.get_description(),
        )?;

        tracing::info!(
            "Converted {} frame(s) of shape {:?}, quantitative factor {}",
            frames,
            rescaled.data.shape(),
            rescaled.quantitative_factor()
        );

        Ok(Conversion {
            result: ConversionResult {
                header,
                data: rescaled,
            },
            timing,
            frame_mode,
            time_zero: self.options.get_time_zero().map(str::to_owned),
            extra: self.options.extras().clone(),
        })
    }

    fn resolve(&self, source: EcatSource) -> Result<EcatVolume> {
        match source {
            EcatSource::Parsed(volume) => Ok(volume),
            EcatSource::Raw(path) => {
                let reader = self.reader.ok_or(ConversionError::MissingReader)?;
                tracing::debug!("Reading ECAT file {}", path.display());
                reader.read_ecat(&path)
            }
        }
    }

    fn validate(&self, volume: &EcatVolume) -> Result<()> {
        if volume.sub_headers.is_empty() {
            return Err(ConversionError::InvalidInputCombination(
                "the ECAT acquisition has no frame sub-headers".to_owned(),
            ));
        }
        let len = self.options.get_description().len();
        if len > 80 {
            return Err(ConversionError::IncorrectDescriptionLength(len));
        }
        let calibration_factor = self.calibration_factor(volume);
        if !calibration_factor.is_finite() {
            return Err(ConversionError::NonFiniteCalibration(calibration_factor));
        }
        Ok(())
    }

    /// The configured calibration factor, or else the one of the main header.
    fn calibration_factor(&self, volume: &EcatVolume) -> f32 {
        self.options
            .get_calibration_factor()
            .unwrap_or(volume.main_header.calibration_factor)
    }
}

/// Convert an ECAT acquisition with the given options. Raw sources need a
/// reader, see [`Converter::with_reader`](./struct.Converter.html#method.with_reader).
pub fn convert(source: EcatSource, options: &ConversionOptions) -> Result<Conversion> {
    Converter::new(options.clone()).convert(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecat::{MainHeader, SubHeader, VoxelTensor};
    use std::path::Path;

    fn main_header(num_frames: usize) -> MainHeader {
        MainHeader {
            num_frames,
            sw_version: 73,
            calibration_factor: 2.,
        }
    }

    fn sub_header(z: usize) -> SubHeader {
        SubHeader {
            x_dimension: 3,
            y_dimension: 3,
            z_dimension: z,
            x_pixel_size: 0.2,
            y_pixel_size: 0.2,
            z_pixel_size: 0.3,
            scale_factor: 1.,
            frame_duration: 1.,
            ..Default::default()
        }
    }

    fn volume() -> EcatVolume {
        let data = VoxelTensor::from_shape_fn((3, 3, 2, 2), |(x, y, z, t)| {
            (x + y + z + t) as f32
        });
        EcatVolume::new(main_header(2), vec![sub_header(2), sub_header(2)], data)
    }

    #[test]
    fn raw_source_without_reader() {
        let err = convert(EcatSource::raw("scan.v"), &ConversionOptions::new()).unwrap_err();
        assert!(matches!(err, ConversionError::MissingReader));
    }

    #[test]
    fn raw_source_with_reader() {
        let reader = |path: &Path| -> Result<EcatVolume> {
            assert_eq!(path, Path::new("scan.v"));
            Ok(volume())
        };
        let conversion = Converter::new(ConversionOptions::new())
            .with_reader(&reader)
            .convert(EcatSource::raw("scan.v"))
            .unwrap();
        assert_eq!(conversion.frame_mode, FrameMode::Exact);
        assert_eq!(conversion.timing.len(), 2);
    }

    #[test]
    fn no_sub_headers() {
        let mut v = volume();
        v.sub_headers.clear();
        let err = convert(v.into(), &ConversionOptions::new()).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidInputCombination(_)));
    }

    #[test]
    fn too_few_sub_headers() {
        let mut v = volume();
        v.main_header.num_frames = 1;
        v.data = VoxelTensor::ones((3, 3, 2, 1));
        v.sub_headers.truncate(1);
        assert!(convert(v.into(), &ConversionOptions::new()).is_ok());

        let mut v = volume();
        v.sub_headers.truncate(1);
        let err = convert(v.into(), &ConversionOptions::new()).unwrap_err();
        assert!(matches!(err, ConversionError::SubHeaderCount(2, 1)));
    }

    #[test]
    fn description_checked_up_front() {
        let options = ConversionOptions::new().description("x".repeat(100));
        let err = convert(volume().into(), &options).unwrap_err();
        assert!(matches!(err, ConversionError::IncorrectDescriptionLength(100)));
    }

    #[test]
    fn calibration_override() {
        let base = convert(volume().into(), &ConversionOptions::new()).unwrap();
        let over = convert(
            volume().into(),
            &ConversionOptions::new().calibration_factor(4.),
        )
        .unwrap();
        assert_eq!(base.result.data.calibration_factor, 2.);
        assert_eq!(over.result.data.calibration_factor, 4.);
        assert_eq!(over.result.data.data, base.result.data.data.mapv(|v| v * 2.));
    }

    #[test]
    fn non_finite_calibration() {
        let mut v = volume();
        v.main_header.calibration_factor = f32::NAN;
        let err = convert(v.into(), &ConversionOptions::new()).unwrap_err();
        assert!(matches!(err, ConversionError::NonFiniteCalibration(c) if c.is_nan()));

        let options = ConversionOptions::new().calibration_factor(f32::INFINITY);
        let err = convert(volume().into(), &options).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::NonFiniteCalibration(c) if c == f32::INFINITY
        ));

        // a finite override replaces a broken header value
        let mut v = volume();
        v.main_header.calibration_factor = f32::NAN;
        let options = ConversionOptions::new().calibration_factor(3.);
        let c = convert(v.into(), &options).unwrap();
        assert_eq!(c.result.data.calibration_factor, 3.);
        assert!(c.result.data.data.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn metadata_carried() {
        let options = ConversionOptions::new()
            .time_zero("09:30:00")
            .extra("InjectedRadioactivity", "400");
        let c = convert(volume().into(), &options).unwrap();
        assert_eq!(c.time_zero.as_deref(), Some("09:30:00"));
        assert_eq!(c.extra.get("InjectedRadioactivity").map(String::as_str), Some("400"));
    }
}
