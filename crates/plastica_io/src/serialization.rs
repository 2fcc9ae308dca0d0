//! Serialization utilities with robust error handling.
//!
//! JSON throughout; files whose name ends in `.gz` are gzip-compressed.

use crate::error::{IoError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Serializes data to JSON with error handling.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from JSON string.
///
/// # Returns
/// Deserialized data on success, or error on failure.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Writes JSON to a file, gzip-compressed when the path ends in `.gz`.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = to_json(data)?;
    let write = || -> std::io::Result<()> {
        let file = File::create(path)?;
        if is_gzip(path) {
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(json.as_bytes())?;
            encoder.finish()?;
        } else {
            let mut writer = BufWriter::new(file);
            writer.write_all(json.as_bytes())?;
            writer.flush()?;
        }
        Ok(())
    };
    write().map_err(|e| IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path)))
}

/// Reads JSON from a file written by [`write_json_file`].
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let read = || -> std::io::Result<String> {
        let mut json = String::new();
        if is_gzip(path) {
            GzDecoder::new(File::open(path)?).read_to_string(&mut json)?;
        } else {
            File::open(path)?.read_to_string(&mut json)?;
        }
        Ok(json)
    };
    let json = read()
        .map_err(|e| IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path)))?;
    from_json(&json).map_err(|e| e.with_context(format!("parsing {:?}", path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: f64,
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("plastica_io_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_json_roundtrip() {
        let data = TestData {
            name: "test".to_string(),
            value: 0.1 + 0.2,
        };

        let json = to_json(&data).unwrap();
        let restored: TestData = from_json(&json).unwrap();
        assert_eq!(data, restored);
        assert_eq!(to_json(&restored).unwrap(), json);
    }

    #[test]
    fn test_empty_json_fails() {
        let result: Result<TestData> = from_json("  ");
        assert!(matches!(result, Err(IoError::Validation(_))));
    }

    #[test]
    fn test_invalid_json_fails() {
        let result: Result<TestData> = from_json("{ invalid json");
        assert!(matches!(result, Err(IoError::Serialization(_))));
    }

    #[test]
    fn test_file_roundtrip_plain_and_gzip() {
        let data = TestData {
            name: "file".to_string(),
            value: -1.5e-7,
        };
        for name in ["data.json", "data.json.gz"] {
            let path = temp_path(name);
            write_json_file(&data, &path).unwrap();
            let restored: TestData = read_json_file(&path).unwrap();
            assert_eq!(data, restored);
            let _ = std::fs::remove_file(&path);
        }
    }

    #[test]
    fn test_gzip_file_is_compressed() {
        let path = temp_path("magic.json.gz");
        write_json_file(&vec![1.0; 64], &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = temp_path("missing.json");
        let err = read_json_file::<TestData, _>(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
