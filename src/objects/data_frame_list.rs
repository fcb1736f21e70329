//! Validation for data frame lists.

use std::path::Path;

use crate::error::Result;
use crate::metadata::ObjectMetadata;
use crate::objects::compressed_list::{self, ChildRule};
use crate::options::Options;

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    compressed_list::validate_directory(
        path,
        "data_frame_list",
        ChildRule::Interface("DATA_FRAME"),
        options,
    )
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    compressed_list::height(path, "data_frame_list")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::test_utils::*;

    #[test]
    fn basic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("dfl");
        mock_compressed_list_skeleton(&dir, "data_frame_list", &[4, 3]);
        mock_data_frame(
            &dir.join("concatenated"),
            7,
            &[MockColumn::Integer("x"), MockColumn::String("y")],
        );

        test_validate(&dir).unwrap();
        assert_eq!(test_height(&dir).unwrap(), 2);
    }

    #[test]
    fn child_must_be_data_frame() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("dfl");
        mock_compressed_list_skeleton(&dir, "data_frame_list", &[2]);
        mock_atomic_vector(&dir.join("concatenated"), 2);
        expect_validation_error(&dir, "should satisfy the 'DATA_FRAME' interface");
    }
}
