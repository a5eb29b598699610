//! Spatial affine of the converted image.
//!
//! The scanner affine is diagonal, with the ECAT pixel sizes converted from
//! centimeters to millimeters, and a translation that centers the volume on
//! the scanner isocenter with a half-voxel correction.
use crate::ecat::SubHeader;
use crate::header::NiftiHeader;
use nalgebra::{Matrix3, Matrix4, Scalar, Vector3, Vector4};

/// 3x3 affine (rotation and zooms).
pub type Affine3 = Matrix3<f32>;
/// 4x4 homogeneous affine.
pub type Affine4 = Matrix4<f32>;

/// Centimeters to millimeters.
pub const CM_TO_MM: f32 = 10.;

/// Separate a 4x4 affine into its 3x3 affine and translation components.
pub fn get_affine_and_translation<T: Scalar>(affine: &Matrix4<T>) -> (Matrix3<T>, Vector3<T>) {
    let translation = Vector3::<T>::new(
        affine[(0, 3)].clone(),
        affine[(1, 3)].clone(),
        affine[(2, 3)].clone(),
    );
    let affine = affine.fixed_view::<3, 3>(0, 0).into_owned();
    (affine, translation)
}

/// Pixel sizes of a sub-header in millimeters.
pub fn voxel_size_mm(sub_header: &SubHeader) -> [f32; 3] {
    let [x, y, z] = sub_header.pixel_sizes();
    [x * CM_TO_MM, y * CM_TO_MM, z * CM_TO_MM]
}

/// Translation offsets placing the volume center at the scanner isocenter.
///
/// Per axis: `-((dim * size * 10 / 2) - size * 5)`, with `size` the ECAT
/// pixel size in centimeters.
pub fn qoffsets(sub_header: &SubHeader) -> [f32; 3] {
    let dims = sub_header.dimensions();
    let sizes = sub_header.pixel_sizes();
    let offset = |d: usize, s: f32| -1. * ((d as f32 * s * CM_TO_MM / 2.) - s * 5.);
    [
        offset(dims[0], sizes[0]),
        offset(dims[1], sizes[1]),
        offset(dims[2], sizes[2]),
    ]
}

/// The scanner affine derived from the geometry of a sub-header.
#[rustfmt::skip]
pub fn scanner_affine(sub_header: &SubHeader) -> Affine4 {
    let [sx, sy, sz] = voxel_size_mm(sub_header);
    let [ox, oy, oz] = qoffsets(sub_header);
    Affine4::new(
        sx,  0.0, 0.0, ox,
        0.0, sy,  0.0, oy,
        0.0, 0.0, sz,  oz,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Map a voxel index to scanner coordinates.
pub fn apply(affine: &Affine4, index: [f32; 3]) -> [f32; 3] {
    let p = affine * Vector4::new(index[0], index[1], index[2], 1.0);
    [p[0], p[1], p[2]]
}

impl NiftiHeader {
    /// Store `affine` in the sform rows, and its translation in the
    /// quaternion offsets.
    pub fn set_affine(&mut self, affine: &Affine4) {
        for (row, srow) in [&mut self.srow_x, &mut self.srow_y, &mut self.srow_z]
            .iter_mut()
            .enumerate()
        {
            for (col, v) in srow.iter_mut().enumerate() {
                *v = affine[(row, col)];
            }
        }
        let (_, translation) = get_affine_and_translation(affine);
        self.quatern_x = translation[0];
        self.quatern_y = translation[1];
        self.quatern_z = translation[2];
    }

    /// The affine held by the sform rows.
    #[rustfmt::skip]
    pub fn sform_affine(&self) -> Affine4 {
        let (x, y, z) = (&self.srow_x, &self.srow_y, &self.srow_z);
        Affine4::new(
            x[0], x[1], x[2], x[3],
            y[0], y[1], y[2], y[3],
            z[0], z[1], z[2], z[3],
            0.0,  0.0,  0.0,  1.0,
        )
    }
}
