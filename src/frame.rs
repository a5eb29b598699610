//! Per-frame scaling and reorientation of ECAT pixel data.
//!
//! Each frame is multiplied by its own scale factor and reversed along the
//! three spatial axes, which takes ECAT's stored orientation to the one
//! expected in NIfTI. Frame timing and count information is collected on
//! the way, for consumers such as `.sif` timing file writers.
//!
//! The reversals are kept as three separate single-axis operations
//! ([`flip_z`], [`flip_y`], [`flip_x`]), applied in that order.
//!
//! [`flip_z`]: ./fn.flip_z.html
//! [`flip_y`]: ./fn.flip_y.html
//! [`flip_x`]: ./fn.flip_x.html
use crate::ecat::{MainHeader, SubHeader, VoxelTensor};
use ndarray::{ArrayBase, Axis, Ix3, RawData};

/// Reverse a frame along the X axis (axis 0).
pub fn flip_x<S: RawData>(frame: &mut ArrayBase<S, Ix3>) {
    frame.invert_axis(Axis(0));
}

/// Reverse a frame along the Y axis (axis 1).
pub fn flip_y<S: RawData>(frame: &mut ArrayBase<S, Ix3>) {
    frame.invert_axis(Axis(1));
}

/// Reverse a frame along the Z axis (axis 2).
pub fn flip_z<S: RawData>(frame: &mut ArrayBase<S, Ix3>) {
    frame.invert_axis(Axis(2));
}

/// Timing and count information of a single frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameRecord {
    /// Frame start
    pub start: f32,
    /// Frame duration
    pub duration: f32,
    /// Prompt counts (rate times duration)
    pub prompts: f32,
    /// Random counts (rate times duration)
    pub randoms: f32,
}

impl FrameRecord {
    /// Derive the record of a frame from its sub-header.
    ///
    /// Start and duration are the sub-header values times 60. Prompts and
    /// randoms are the respective rates times the duration times 60 when
    /// `count_rates` is set (ECAT 7.3 onwards), zero otherwise.
    pub fn from_sub_header(sub_header: &SubHeader, count_rates: bool) -> Self {
        let (prompts, randoms) = if count_rates {
            (
                sub_header.prompt_rate * sub_header.frame_duration * 60.,
                sub_header.random_rate * sub_header.frame_duration * 60.,
            )
        } else {
            (0., 0.)
        };
        FrameRecord {
            start: sub_header.frame_start_time * 60.,
            duration: sub_header.frame_duration * 60.,
            prompts,
            randoms,
        }
    }
}

/// Ordered per-frame timing sequences, one entry per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameTiming {
    /// Frame start times
    pub start: Vec<f32>,
    /// Frame durations
    pub duration: Vec<f32>,
    /// Prompt counts
    pub prompts: Vec<f32>,
    /// Random counts
    pub randoms: Vec<f32>,
}

impl FrameTiming {
    /// Create empty sequences with room for `frames` entries.
    pub fn with_capacity(frames: usize) -> Self {
        FrameTiming {
            start: Vec::with_capacity(frames),
            duration: Vec::with_capacity(frames),
            prompts: Vec::with_capacity(frames),
            randoms: Vec::with_capacity(frames),
        }
    }

    /// Append the record of the next frame.
    pub fn push(&mut self, record: FrameRecord) {
        self.start.push(record.start);
        self.duration.push(record.duration);
        self.prompts.push(record.prompts);
        self.randoms.push(record.randoms);
    }

    /// Number of frames recorded.
    pub fn len(&self) -> usize {
        self.start.len()
    }

    /// Whether no frame was recorded.
    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    /// Iterate over the records, in frame order.
    pub fn rows(&self) -> impl Iterator<Item = FrameRecord> + '_ {
        self.start
            .iter()
            .zip(&self.duration)
            .zip(&self.prompts)
            .zip(&self.randoms)
            .map(|(((&start, &duration), &prompts), &randoms)| FrameRecord {
                start,
                duration,
                prompts,
                randoms,
            })
    }
}

/// Scale and reorient every frame of `data`, collecting frame timing.
///
/// The output has the same shape as `data`. Frame `i` uses
/// `sub_headers[i]`; frames without a sub-header are not processed, which
/// callers rule out beforehand.
pub fn scale_frames(
    main_header: &MainHeader,
    sub_headers: &[SubHeader],
    data: &VoxelTensor,
) -> (VoxelTensor, FrameTiming) {
    let frames = data.len_of(Axis(3));
    debug_assert!(sub_headers.len() >= frames);

    let count_rates = main_header.has_count_rates();
    let mut out = VoxelTensor::zeros(data.raw_dim());
    let mut timing = FrameTiming::with_capacity(frames);

    for (index, ((raw, mut slab), sub_header)) in data
        .axis_iter(Axis(3))
        .zip(out.axis_iter_mut(Axis(3)))
        .zip(sub_headers)
        .enumerate()
    {
        tracing::debug!("Loading frame {}", index + 1);
        let scale_factor = sub_header.scale_factor;
        let mut frame = raw.view();
        flip_z(&mut frame);
        flip_y(&mut frame);
        flip_x(&mut frame);
        slab.zip_mut_with(&frame, |o, &v| *o = v * scale_factor);

        timing.push(FrameRecord::from_sub_header(sub_header, count_rates));
    }

    (out, timing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};

    fn cube() -> Array3<f32> {
        Array3::from_shape_fn((2, 3, 4), |(x, y, z)| (x * 100 + y * 10 + z) as f32)
    }

    fn main_header(sw_version: i32, num_frames: usize) -> MainHeader {
        MainHeader {
            num_frames,
            sw_version,
            calibration_factor: 1.,
        }
    }

    fn sub_header(scale_factor: f32, start: f32, duration: f32) -> SubHeader {
        SubHeader {
            x_dimension: 2,
            y_dimension: 3,
            z_dimension: 4,
            scale_factor,
            frame_start_time: start,
            frame_duration: duration,
            prompt_rate: 10.,
            random_rate: 2.,
            ..Default::default()
        }
    }

    #[test]
    fn single_axis_flips() {
        let a = cube();

        let mut x = a.view();
        flip_x(&mut x);
        assert_eq!(x[[0, 1, 2]], a[[1, 1, 2]]);

        let mut y = a.view();
        flip_y(&mut y);
        assert_eq!(y[[0, 0, 2]], a[[0, 2, 2]]);

        let mut z = a.view();
        flip_z(&mut z);
        assert_eq!(z[[1, 1, 0]], a[[1, 1, 3]]);
    }

    #[test]
    fn flips_on_owned_array() {
        let mut a = cube();
        flip_z(&mut a);
        assert_eq!(a[[0, 0, 0]], 3.);
        assert_eq!(a[[0, 0, 3]], 0.);
    }

    #[test]
    fn composed_flips_reverse_all_axes() {
        let a = cube();
        let mut v = a.view();
        flip_z(&mut v);
        flip_y(&mut v);
        flip_x(&mut v);
        for ((x, y, z), &value) in v.indexed_iter() {
            assert_eq!(value, a[[1 - x, 2 - y, 3 - z]]);
        }
    }

    #[test]
    fn scaling_and_orientation() {
        let mut data = Array4::<f32>::zeros((2, 3, 4, 2));
        data.index_axis_mut(Axis(3), 0).assign(&cube());
        data.index_axis_mut(Axis(3), 1).assign(&cube());
        let subs = [sub_header(2., 0., 1.), sub_header(0.5, 1., 2.)];

        let (out, timing) = scale_frames(&main_header(73, 2), &subs, &data);
        assert_eq!(out.shape(), data.shape());
        // last voxel of the source lands first
        assert_eq!(out[[0, 0, 0, 0]], 123. * 2.);
        assert_eq!(out[[0, 0, 0, 1]], 123. * 0.5);
        assert_eq!(out[[1, 2, 3, 0]], 0.);
        assert_eq!(out[[1, 0, 2, 1]], data[[0, 2, 1, 1]] * 0.5);
        assert_eq!(timing.len(), 2);
    }

    #[test]
    fn timing_with_count_rates() {
        let data = Array4::<f32>::ones((2, 3, 4, 2));
        let subs = [sub_header(1., 0., 1.5), sub_header(1., 1.5, 3.)];
        let (_, timing) = scale_frames(&main_header(73, 2), &subs, &data);
        assert_eq!(timing.start, vec![0., 90.]);
        assert_eq!(timing.duration, vec![90., 180.]);
        assert_eq!(timing.prompts, vec![900., 1800.]);
        assert_eq!(timing.randoms, vec![180., 360.]);
    }

    #[test]
    fn no_count_rates_before_7_3() {
        let data = Array4::<f32>::ones((2, 3, 4, 3));
        let subs = [
            sub_header(1., 0., 1.),
            sub_header(1., 1., 1.),
            sub_header(1., 2., 1.),
        ];
        let (_, timing) = scale_frames(&main_header(72, 3), &subs, &data);
        assert_eq!(timing.prompts, vec![0.; 3]);
        assert_eq!(timing.randoms, vec![0.; 3]);
        assert_eq!(timing.start, vec![0., 60., 120.]);
    }

    #[test]
    fn timing_rows() {
        let mut timing = FrameTiming::default();
        assert!(timing.is_empty());
        timing.push(FrameRecord {
            start: 0.,
            duration: 60.,
            prompts: 5.,
            randoms: 1.,
        });
        timing.push(FrameRecord {
            start: 60.,
            duration: 120.,
            prompts: 7.,
            randoms: 2.,
        });
        let rows: Vec<_> = timing.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].start, 60.);
        assert_eq!(rows[1].randoms, 2.);
    }
}
