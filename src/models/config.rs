//! Widget tuning file (JSON). Every field is optional.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::anchoring::MovableOrigin;
use crate::algorithm::gesture::PetOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Anchor preference of the drag engine.
    pub origin: MovableOrigin,
    /// Petting detector tuning.
    pub pet: PetOptions,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl WidgetConfig {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let config: WidgetConfig = load_json(path)?;
        log::info!("loaded widget config: path={}", path.display());
        Ok(config)
    }
}

pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::anchoring::AxisOrigin;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"origin":{{"x":"start"}},"pet":{{"neglect":0.25}}}}"#).expect("write");

        let config = WidgetConfig::load(file.path()).expect("load config");
        assert_eq!(config.origin.x, AxisOrigin::Start);
        assert_eq!(config.origin.y, AxisOrigin::Auto);
        assert_eq!(config.pet.neglect, 0.25);
        assert_eq!(config.pet.sample_rate_ms, 100);
        assert_eq!(config.pet.angle_max, 20.0);
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            WidgetConfig::load(&missing),
            Err(LoadError::Read { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").expect("write");
        let err = WidgetConfig::load(&broken).expect_err("malformed config");
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
