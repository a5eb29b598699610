//! Options for a single conversion.
use crate::affine::Affine4;
use crate::synthesis::DEFAULT_DESCRIPTION;
use std::collections::BTreeMap;

/// Options and metadata of a conversion, built in the usual builder
/// fashion.
///
/// # Example
///
/// ```
/// use ecat2nii::ConversionOptions;
///
/// let options = ConversionOptions::new()
///     .time_zero("12:12:12")
///     .calibration_factor(0.5)
///     .extra("TracerName", "[11C]PS13");
/// assert_eq!(options.get_time_zero(), Some("12:12:12"));
/// assert_eq!(options.get_extra("TracerName"), Some("[11C]PS13"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    affine: Option<Affine4>,
    time_zero: Option<String>,
    calibration_factor: Option<f32>,
    description: String,
    extra: BTreeMap<String, String>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            affine: None,
            time_zero: None,
            calibration_factor: None,
            description: DEFAULT_DESCRIPTION.to_owned(),
            extra: BTreeMap::new(),
        }
    }
}

impl ConversionOptions {
    /// Options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this affine instead of deriving one from the ECAT geometry.
    pub fn affine(mut self, affine: Affine4) -> Self {
        self.affine = Some(affine);
        self
    }

    /// Set the injection time (`TimeZero`).
    pub fn time_zero<T: Into<String>>(mut self, time_zero: T) -> Self {
        self.time_zero = Some(time_zero.into());
        self
    }

    /// Replace the calibration factor of the main header.
    pub fn calibration_factor(mut self, calibration_factor: f32) -> Self {
        self.calibration_factor = Some(calibration_factor);
        self
    }

    /// Text for the header's `descrip` field, up to 80 bytes.
    pub fn description<T: Into<String>>(mut self, description: T) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a metadata entry that the conversion carries without
    /// interpreting it.
    pub fn extra<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let _ = self.extra.insert(key.into(), value.into());
        self
    }

    /// The affine override, if any.
    pub fn get_affine(&self) -> Option<&Affine4> {
        self.affine.as_ref()
    }

    /// The injection time, if any.
    pub fn get_time_zero(&self) -> Option<&str> {
        self.time_zero.as_deref()
    }

    /// The calibration factor override, if any.
    pub fn get_calibration_factor(&self) -> Option<f32> {
        self.calibration_factor
    }

    /// Text for the header's `descrip` field.
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Look up an extra metadata entry.
    pub fn get_extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    /// All extra metadata entries.
    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}
