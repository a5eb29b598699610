//! Convert a synthetic two-frame ECAT acquisition and write it as NIfTI-1.

extern crate ecat2nii;

use std::env;

use ecat2nii::{
    convert, writer, ConversionOptions, EcatSource, MainHeader, SubHeader, VoxelTensor,
};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to the output NIfTI file is required");

    let main_header = MainHeader {
        num_frames: 2,
        sw_version: 73,
        calibration_factor: 1.2,
    };
    let sub_headers: Vec<SubHeader> = (0..2)
        .map(|i| SubHeader {
            x_dimension: 64,
            y_dimension: 64,
            z_dimension: 24,
            x_pixel_size: 0.2,
            y_pixel_size: 0.2,
            z_pixel_size: 0.24,
            scale_factor: 1. + i as f32,
            frame_start_time: i as f32 * 5.,
            frame_duration: 5.,
            prompt_rate: 2500.,
            random_rate: 300.,
        })
        .collect();

    // a bright sphere in the middle of the field of view
    let data = VoxelTensor::from_shape_fn((64, 64, 24, 2), |(x, y, z, t)| {
        let d2 = (x as f32 - 32.).powi(2) + (y as f32 - 32.).powi(2) + (z as f32 - 12.).powi(2);
        if d2 < 100. {
            1000. + 100. * t as f32
        } else {
            10.
        }
    });

    let options = ConversionOptions::new().time_zero("ScanStart");
    let conversion = convert(EcatSource::parsed(main_header, sub_headers, data), &options)
        .expect("Conversion failed");

    writer::write_nifti(&filename, &conversion.result).expect("Failed to write NIfTI file");

    for (i, frame) in conversion.timing.rows().enumerate() {
        println!(
            "frame {}: start {} s, duration {} s, prompts {}, randoms {}",
            i + 1,
            frame.start,
            frame.duration,
            frame.prompts,
            frame.randoms
        );
    }
    println!("{:#?}", conversion.result.header);
}
