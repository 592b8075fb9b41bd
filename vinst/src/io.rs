// SPDX-License-Identifier: Apache-2.0

//! Reading instantiation examples from disk.
//!
//! Handles plain and `.gz` inputs; text that is not valid UTF-8 is decoded
//! lossily since vendor examples are not always clean.

use crate::instance::{extract_instance, ExtractOptions, InstanceRecord};
use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub fn read_source_text(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("opening source '{}'", path.display()))?;
    let is_gz = path.extension().map(|e| e == "gz").unwrap_or(false);
    let mut reader: Box<dyn Read> = if is_gz {
        Box::new(MultiGzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("reading source '{}'", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads `path` and extracts the instantiation introduced by the sentinel in
/// `options`.
pub fn extract_instance_from_path(path: &Path, options: &ExtractOptions) -> Result<InstanceRecord> {
    let text = read_source_text(path)?;
    extract_instance(&text, options)
        .with_context(|| format!("extracting instance from '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vinst_error::{Missing, VinstError};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const SOURCE: &str = "// Instance of DW01_inc\nDW01_inc #(width) U1 (.A(inst_A), .SUM(SUM_inst));\n";

    #[test]
    fn test_extract_from_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DW01_inc.v");
        std::fs::write(&path, SOURCE).unwrap();
        let record = extract_instance_from_path(&path, &ExtractOptions::default()).unwrap();
        assert_eq!(record.module_name, "DW01_inc");
        assert_eq!(record.port_names, vec!["inst_A", "SUM_inst"]);
    }

    #[test]
    fn test_extract_from_gzipped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DW01_inc.v.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(SOURCE.as_bytes()).unwrap();
        enc.finish().unwrap();
        assert_eq!(read_source_text(&path).unwrap(), SOURCE);
        let record = extract_instance_from_path(&path, &ExtractOptions::default()).unwrap();
        assert_eq!(record.parameters, Some(vec!["width".to_string()]));
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.v");
        let mut bytes = b"// Copyright \xa9 vendor\n".to_vec();
        bytes.extend_from_slice(SOURCE.as_bytes());
        std::fs::write(&path, bytes).unwrap();
        let record = extract_instance_from_path(&path, &ExtractOptions::default()).unwrap();
        assert_eq!(record.module_name, "DW01_inc");
    }

    #[test]
    fn test_errors_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.v");
        let err = extract_instance_from_path(&missing, &ExtractOptions::default()).unwrap_err();
        assert!(err.to_string().contains("missing.v"), "{}", err);

        let no_sentinel = dir.path().join("plain.v");
        std::fs::write(&no_sentinel, "module m; endmodule\n").unwrap();
        let err =
            extract_instance_from_path(&no_sentinel, &ExtractOptions::default()).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("plain.v"), "{}", msg);
        assert!(msg.contains("not found"), "{}", msg);
    }

    #[test]
    fn test_extraction_error_keeps_its_kind() {
        let dir = tempfile::tempdir().unwrap();
        let no_sentinel = dir.path().join("plain.v");
        std::fs::write(&no_sentinel, "module m; endmodule\n").unwrap();
        let err =
            extract_instance_from_path(&no_sentinel, &ExtractOptions::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<VinstError>(),
            Some(&VinstError::NotFound {
                what: Missing::Sentinel(crate::DEFAULT_SENTINEL.to_string())
            })
        );

        let broken = dir.path().join("broken.v");
        std::fs::write(&broken, "// instance of x\nx u (.a(b);\n").unwrap();
        let err = extract_instance_from_path(&broken, &ExtractOptions::default()).unwrap_err();
        assert!(
            matches!(err.downcast_ref::<VinstError>(), Some(VinstError::Syntax(_))),
            "{:#}",
            err
        );
    }
}
