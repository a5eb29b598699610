extern crate ecat2nii;

mod util;

use approx::assert_relative_eq;
use ecat2nii::{
    convert,
    rescale::{INT16_MAX, INT16_MIN},
    shape::FrameMode,
    ConversionError, ConversionOptions, EcatSource, VoxelTensor,
};

use util::{dynamic_volume, main_header, sub_header};

#[test]
fn single_frame_with_z_mismatch() {
    let sub = sub_header([128, 128, 63], [2.0, 2.0, 2.0]);
    let data = VoxelTensor::from_elem((128, 128, 1, 1), 3.);
    let source = EcatSource::parsed(main_header(1, 73), vec![sub], data);

    let conversion = convert(source, &ConversionOptions::new()).unwrap();
    assert_eq!(conversion.frame_mode, FrameMode::SingleFrame);
    assert_eq!(conversion.result.data.data.shape(), &[128, 128, 1, 1]);
    assert_eq!(conversion.result.header.dim, [4, 128, 128, 1, 1, 1, 1, 1]);
}

#[test]
fn single_frame_exemption_is_narrow() {
    let sub = sub_header([128, 128, 63], [2.0, 2.0, 2.0]);
    let data = VoxelTensor::from_elem((128, 127, 1, 1), 3.);
    let source = EcatSource::parsed(main_header(1, 73), vec![sub], data);

    match convert(source, &ConversionOptions::new()) {
        Err(ConversionError::ShapeMismatch(expected, actual)) => {
            assert_eq!(expected, [128, 128, 63, 1]);
            assert_eq!(actual, vec![128, 127, 1, 1]);
        }
        other => panic!("expected a shape mismatch, got {:?}", other),
    }
}

#[test]
fn reversed_geometry_rejected() {
    let mut volume = dynamic_volume(2, 73);
    for s in &mut volume.sub_headers {
        s.x_dimension = 3;
        s.z_dimension = 4;
    }
    assert!(matches!(
        convert(volume.into(), &ConversionOptions::new()),
        Err(ConversionError::ShapeMismatch(..))
    ));
}

#[test]
fn all_zero_image() {
    let mut volume = dynamic_volume(2, 73);
    volume.data.fill(0.);
    assert!(matches!(
        convert(volume.into(), &ConversionOptions::new()),
        Err(ConversionError::EmptyOrZeroImage)
    ));
}

#[test]
fn non_finite_input() {
    let mut volume = dynamic_volume(2, 73);
    volume.data[[1, 2, 0, 1]] = f32::NEG_INFINITY;
    match convert(volume.into(), &ConversionOptions::new()) {
        Err(ConversionError::NonFiniteValue(index, v)) => {
            assert_eq!(index, [1, 2, 0, 1]);
            assert_eq!(v, f32::NEG_INFINITY);
        }
        other => panic!("expected a non-finite error, got {:?}", other),
    }
}

#[test]
fn negative_tail_scenario() {
    let sub = sub_header([2, 2, 2], [0.2, 0.2, 0.2]);
    let mut data = VoxelTensor::zeros((2, 2, 2, 1));
    data[[0, 0, 0, 0]] = 10000.;
    data[[1, 1, 1, 0]] = -40000.;
    let source = EcatSource::parsed(main_header(1, 73), vec![sub], data);

    let conversion = convert(source, &ConversionOptions::new()).unwrap();
    let rescaled = &conversion.result.data;
    let factor = rescaled.quantitative_factor();
    assert!(rescaled.data.iter().all(|v| v.abs() <= INT16_MAX));
    assert!(rescaled
        .data
        .iter()
        .all(|&v| v / factor >= INT16_MIN && v / factor <= INT16_MAX));
}

#[test]
fn negative_tail_corrected() {
    let sub = sub_header([2, 2, 2], [0.2, 0.2, 0.2]);
    let mut data = VoxelTensor::zeros((2, 2, 2, 1));
    data[[0, 0, 0, 0]] = 1e-6;
    data[[1, 1, 1, 0]] = -40000.;
    let source = EcatSource::parsed(main_header(1, 73), vec![sub], data);

    let conversion = convert(source, &ConversionOptions::new()).unwrap();
    let rescaled = &conversion.result.data;
    assert!(rescaled.negative_corrected);
    assert!(rescaled.data.iter().all(|v| v.abs() <= INT16_MAX));
}

#[test]
fn ecat_7_2_has_no_count_rates() {
    let conversion = convert(dynamic_volume(3, 72).into(), &ConversionOptions::new()).unwrap();
    assert_eq!(conversion.timing.prompts, vec![0.; 3]);
    assert_eq!(conversion.timing.randoms, vec![0.; 3]);
    assert_eq!(conversion.timing.start, vec![0., 60., 120.]);
    assert_eq!(conversion.timing.duration, vec![60.; 3]);
}

#[test]
fn ecat_7_3_count_rates() {
    let conversion = convert(dynamic_volume(3, 73).into(), &ConversionOptions::new()).unwrap();
    assert_eq!(conversion.timing.prompts, vec![6000.; 3]);
    assert_eq!(conversion.timing.randoms, vec![600.; 3]);
}

#[test]
fn geometry_scenario() {
    let sub = sub_header([128, 128, 63], [2.0, 2.0, 2.5]);
    let data = VoxelTensor::from_shape_fn((128, 128, 63, 1), |(x, y, z, _)| {
        (x + y + z) as f32
    });
    let source = EcatSource::parsed(main_header(1, 73), vec![sub], data);

    let header = convert(source, &ConversionOptions::new())
        .unwrap()
        .result
        .header;
    assert_eq!(header.pixdim[1..4], [20.0, 20.0, 25.0]);
    assert_eq!(header.quatern_x, -1. * ((128. * 2.0 * 10. / 2.) - 2.0 * 5.));
    assert_eq!(header.quatern_x, -1270.);
    assert_eq!(header.srow_x[3], header.quatern_x);
}

#[test]
fn physical_units() {
    let volume = dynamic_volume(2, 73);
    let raw = volume.data.clone();
    let conversion = convert(volume.into(), &ConversionOptions::new()).unwrap();
    let rescaled = &conversion.result.data;

    // frame 1 is scaled by 2, and every spatial axis is reversed
    let max = (3 + 4 * 3 + 16 * 2) as f32 * 2. + 0.5 * 2.;
    assert_relative_eq!(rescaled.scale, max / 32767., max_relative = 1e-6);
    assert_eq!(rescaled.calibration_factor, 1.5);

    let expected = raw[[3, 3, 2, 1]] * 2. / (max * 32767.) * rescaled.quantitative_factor();
    assert_relative_eq!(rescaled.data[[0, 0, 0, 1]], expected, max_relative = 1e-5);
    assert_eq!(conversion.result.header.cal_min, rescaled.max());
    assert_eq!(conversion.result.header.cal_max, rescaled.min());
}

#[test]
fn scale_follows_input_magnitude() {
    let k = 4.;
    let a = convert(dynamic_volume(2, 73).into(), &ConversionOptions::new()).unwrap();
    let mut volume = dynamic_volume(2, 73);
    volume.data.mapv_inplace(|v| v * k);
    let b = convert(volume.into(), &ConversionOptions::new()).unwrap();

    let (ra, rb) = (&a.result.data, &b.result.data);
    assert_relative_eq!(rb.scale, ra.scale * k, max_relative = 1e-6);
    let (fa, fb) = (ra.quantitative_factor(), rb.quantitative_factor());
    for (va, vb) in ra.data.iter().zip(rb.data.iter()) {
        assert_relative_eq!(va / fa, vb / fb, max_relative = 1e-5);
    }
}
