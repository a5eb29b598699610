#![no_main]
use ecat2nii::NiftiHeader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = NiftiHeader::from_reader(data) {
        let _ = header.dim();
        let _ = header.data_type();
        let _ = header.qform();
        let _ = header.sform();
        let _ = header.xyzt();
        let _ = header.sform_affine();
        let _ = header.description();
        let _ = header.clone().validate_description();
    }
});
