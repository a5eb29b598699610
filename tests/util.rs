use ecat2nii::{EcatVolume, MainHeader, SubHeader, VoxelTensor};

/// Main header of a synthetic acquisition.
#[allow(dead_code)]
pub fn main_header(num_frames: usize, sw_version: i32) -> MainHeader {
    MainHeader {
        num_frames,
        sw_version,
        calibration_factor: 1.5,
    }
}

/// Sub-header of a synthetic frame with the given grid and pixel sizes.
#[allow(dead_code)]
pub fn sub_header(dims: [usize; 3], sizes: [f32; 3]) -> SubHeader {
    SubHeader {
        x_dimension: dims[0],
        y_dimension: dims[1],
        z_dimension: dims[2],
        x_pixel_size: sizes[0],
        y_pixel_size: sizes[1],
        z_pixel_size: sizes[2],
        scale_factor: 1.,
        frame_start_time: 0.,
        frame_duration: 1.,
        prompt_rate: 100.,
        random_rate: 10.,
    }
}

/// A small dynamic acquisition: 4x4x3 voxels, `frames` frames, frame `i`
/// starting at minute `i` and scaled by `i + 1`.
#[allow(dead_code)]
pub fn dynamic_volume(frames: usize, sw_version: i32) -> EcatVolume {
    let sub_headers = (0..frames)
        .map(|i| SubHeader {
            scale_factor: (i + 1) as f32,
            frame_start_time: i as f32,
            ..sub_header([4, 4, 3], [0.2, 0.2, 0.25])
        })
        .collect();
    let data = VoxelTensor::from_shape_fn((4, 4, 3, frames), |(x, y, z, t)| {
        (x + 4 * y + 16 * z) as f32 + 0.5 * t as f32
    });
    EcatVolume::new(main_header(frames, sw_version), sub_headers, data)
}
