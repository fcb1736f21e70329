//! Validation for atomic vector lists.

use std::path::Path;

use crate::error::Result;
use crate::metadata::ObjectMetadata;
use crate::objects::compressed_list::{self, ChildRule};
use crate::options::Options;

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    compressed_list::validate_directory(
        path,
        "atomic_vector_list",
        ChildRule::Exact("atomic_vector"),
        options,
    )
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    compressed_list::height(path, "atomic_vector_list")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::test_utils::*;

    #[test]
    fn basic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("avl");
        mock_atomic_vector_list(&dir, &[3, 0, 4, 2]);

        test_validate(&dir).unwrap();
        assert_eq!(test_height(&dir).unwrap(), 4);
    }

    #[test]
    fn length_sum_mismatch() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("avl");
        mock_atomic_vector_list(&dir, &[3, 2]);
        mock_atomic_vector(&dir.join("concatenated"), 6);
        expect_validation_error(&dir, "sum of 'lengths'");
    }

    #[test]
    fn wrong_child_type() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("avl");
        mock_atomic_vector_list(&dir, &[2]);
        mock_string_factor(&dir.join("concatenated"), &["a"], &[0, 0]);
        expect_validation_error(&dir, "'concatenated' should contain a 'atomic_vector' object");
    }

    #[test]
    fn partition_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("avl");
        mock_atomic_vector_list(&dir, &[1, 2]);
        {
            let handle = hdf5::File::open_rw(dir.join("partitions.h5")).unwrap();
            let ghandle = handle.group("atomic_vector_list").unwrap();
            write_string_dataset(&ghandle, "names", &["x".to_string()]);
        }
        expect_validation_error(&dir, "same length as the parent object");
    }
}
