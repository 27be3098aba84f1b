//! CLI command implementations.

pub mod segment;
pub mod specimens;
pub mod timeline;

use std::path::Path;

use timeblocks::{SegmenterConfig, Timeblocks, TimeblocksConfig};
use tracing::debug;

use crate::cli::BaselineChoice;

/// Load the configuration (if given) and the measurement file.
pub fn open(
    file: &Path,
    config_path: Option<&Path>,
    baseline: Option<BaselineChoice>,
) -> Result<Timeblocks, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut config = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "reading configuration");
            TimeblocksConfig::from_file(path)?
        }
        None => TimeblocksConfig::default(),
    };

    if let Some(choice) = baseline {
        config = config.with_segmenter(SegmenterConfig {
            baseline: choice.into(),
        });
    }

    Ok(Timeblocks::open_with_config(file, config)?)
}

/// The requested specimens, or the configured default selection.
pub fn selection(tb: &Timeblocks, requested: Vec<String>) -> Vec<String> {
    if requested.is_empty() {
        tb.default_selection()
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const CONTENT: &str = "idx,specimen,start_time,end_time\n\
                           1,B,2024-01-01 08:00,2024-01-01 08:10\n\
                           2,A,2024-01-01 08:00,2024-01-01 08:10\n";

    #[test]
    fn test_open_missing_file() {
        let err = open(Path::new("/no/such/file.csv"), None, None).err().unwrap();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_selection_defaults_to_every_specimen() {
        let file = create_test_file(CONTENT);
        let tb = open(file.path(), None, None).unwrap();

        assert_eq!(selection(&tb, Vec::new()), vec!["B", "A"]);
        assert_eq!(selection(&tb, vec!["A".to_string()]), vec!["A"]);
    }

    #[test]
    fn test_config_file_and_baseline_override() {
        let data = create_test_file(CONTENT);
        let config = create_test_file(
            r#"{"segmenter": {"baseline": "running_max_end"},
                "presentation": {"default_specimens": ["A"]}}"#,
        );

        let tb = open(data.path(), Some(config.path()), None).unwrap();
        assert_eq!(tb.config().segmenter.baseline, timeblocks::GapBaseline::RunningMaxEnd);
        assert_eq!(selection(&tb, Vec::new()), vec!["A"]);

        let tb = open(data.path(), Some(config.path()), Some(BaselineChoice::Previous)).unwrap();
        assert_eq!(tb.config().segmenter.baseline, timeblocks::GapBaseline::PreviousEnd);
    }
}
