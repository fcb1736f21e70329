//! Validation for sequence string set lists.

use std::path::Path;

use crate::error::Result;
use crate::metadata::ObjectMetadata;
use crate::objects::compressed_list::{self, ChildRule};
use crate::options::Options;

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    compressed_list::validate_directory(
        path,
        "sequence_string_set_list",
        ChildRule::Exact("sequence_string_set"),
        options,
    )
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    compressed_list::height(path, "sequence_string_set_list")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::test_utils::*;

    #[test]
    fn basic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("ssl");
        mock_compressed_list_skeleton(&dir, "sequence_string_set_list", &[2, 1]);
        mock_sequence_string_set_fasta(
            &dir.join("concatenated"),
            3,
            "DNA",
            ">0\nACGT\n>1\nGG\n>2\nTTTT\n",
        );

        test_validate(&dir).unwrap();
        assert_eq!(test_height(&dir).unwrap(), 2);
    }
}
