use std::fs;
use std::path::{Path, PathBuf};

/// Default directory for cleaned output files, relative to the working dir.
pub const OUTPUT_DIR: &str = "output";

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// `<stem>_cleaned_<YYYYMMDD_HHMMSS>.<ext>` under the given output directory.
pub fn timestamped_output_path(output_dir: &Path, source: &Path, ext: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "data".to_string());
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    output_dir.join(format!("{}_cleaned_{}.{}", stem, timestamp, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_derives_from_source_stem() {
        let path = timestamped_output_path(Path::new("output"), Path::new("data/firms.xlsx"), "json");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("firms_cleaned_"));
        assert!(name.ends_with(".json"));
        assert_eq!(path.parent(), Some(Path::new("output")));
    }
}
