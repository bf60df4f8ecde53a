use crate::error::PredictionError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let data = bincode::serialize(value)?;
    fs::write(path, data).with_context(|| format!("writing artifact {}", path.display()))?;
    Ok(())
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, PredictionError> {
    match fs::read(path) {
        Ok(bytes) => bincode::deserialize(&bytes).map_err(|e| {
            PredictionError::DeserializationFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PredictionError::ArtifactNotFound { path: path.to_path_buf() })
        }
        Err(e) => Err(PredictionError::DeserializationFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load::<Vec<u32>>(&dir.path().join("nope.pkl")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn garbage_is_deserialization_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pkl");
        fs::write(&path, [0xff_u8; 3]).unwrap();

        let err = load::<Vec<String>>(&path).unwrap_err();
        assert!(matches!(err, PredictionError::DeserializationFailed { .. }));
    }

    #[test]
    fn saved_value_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.pkl");
        save(&vec![3_u32, 1, 4], &path).unwrap();
        assert_eq!(load::<Vec<u32>>(&path).unwrap(), vec![3, 1, 4]);
    }
}
