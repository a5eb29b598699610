//! Types for error handling go here.
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum ConversionError {
        /// The geometry declared by the headers disagrees with the shape of
        /// the voxel tensor, and the single-frame exemption does not apply.
        /// Holds the expected `(X, Y, Z, frames)` followed by the actual shape.
        ShapeMismatch(expected: [usize; 4], actual: Vec<usize>) {
            display("Mismatch between expected X, Y, Z and frame dimensions {:?} obtained from headers and shape of imaging data {:?}", expected, actual)
        }
        /// The image maximum is zero, so the intensity rescale divisor would be zero
        EmptyOrZeroImage {
            display("Image maximum is zero, cannot rescale intensities")
        }
        /// A NaN or infinite voxel was found in the input tensor
        NonFiniteValue(index: [usize; 4], value: f32) {
            display("Non-finite voxel value {} at index {:?}", value, index)
        }
        /// A rescale divisor or factor left the range of `f32`.
        /// Holds the image extreme it was derived from.
        RescaleOverflow(value: f32) {
            display("Intensity rescale overflows for image extreme {}", value)
        }
        /// The effective calibration factor is NaN or infinite
        NonFiniteCalibration(value: f32) {
            display("Non-finite calibration factor {}", value)
        }
        /// The header `dim` disagrees with the shape of the voxel data to write
        HeaderDataMismatch(dim: Vec<u16>, shape: Vec<usize>) {
            display("Header dimensions {:?} do not match data shape {:?}", dim, shape)
        }
        /// The conversion input is neither a usable file path nor a
        /// consistent (main header, sub-headers, pixel data) triple
        InvalidInputCombination(reason: String) {
            display("Invalid conversion input: {}", reason)
        }
        /// A raw ECAT file was given, but no ECAT reader is available
        MissingReader {
            display("A raw ECAT source requires an ECAT reader")
        }
        /// Fewer sub-headers than frames
        SubHeaderCount(frames: usize, sub_headers: usize) {
            display("Expected {} frame sub-headers, found {}", frames, sub_headers)
        }
        /// A voxel array dimension does not fit in the NIfTI-1 `dim` field
        DimensionTooLarge(len: usize) {
            display("Dimension of length {} does not fit in a NIfTI-1 header", len)
        }
        /// Attempted to set a description longer than 80 bytes
        IncorrectDescriptionLength(len: usize) {
            display("Description length ({} bytes) is greater than 80 bytes.", len)
        }
        /// An invalid code was found in a header field
        InvalidCode(typename: &'static str, code: i16) {
            display("invalid code `{}` for header field {}", code, typename)
        }
        /// Attempted to read an invalid NIfTI-1 header
        InvalidFormat {
            display("Invalid NIfTI-1 file")
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, ConversionError>;
