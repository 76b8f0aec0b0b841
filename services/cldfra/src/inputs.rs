//! Input file collection.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Parse a file list: one path per line, blank lines and `#` comments skipped.
pub fn parse_file_list(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

/// Read a file list from disk.
pub fn read_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file list: {}", path.display()))?;
    Ok(parse_file_list(&content))
}

/// Combine positional paths with an optional file list, dropping repeats.
///
/// Two paths are repeats when they resolve to the same file; the first
/// spelling is kept. Paths that cannot be resolved (e.g. missing files) are
/// compared as written and left for processing to report.
pub fn collect_inputs(files: &[PathBuf], file_list: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut inputs = files.to_vec();
    if let Some(list) = file_list {
        inputs.extend(read_file_list(list)?);
    }

    let mut seen = HashSet::new();
    inputs.retain(|path| seen.insert(fs::canonicalize(path).unwrap_or_else(|_| path.clone())));
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::temp_test_dir_with_prefix;

    #[test]
    fn test_parse_file_list() {
        let content = "\
# WRF run 2024-07-01
/data/wrfout_d01_2024-07-01_00:00:00

  /data/wrfout_d01_2024-07-01_06:00:00  
   # disabled: /data/wrfout_d02
relative/wrfout_d02
";
        assert_eq!(
            parse_file_list(content),
            vec![
                PathBuf::from("/data/wrfout_d01_2024-07-01_00:00:00"),
                PathBuf::from("/data/wrfout_d01_2024-07-01_06:00:00"),
                PathBuf::from("relative/wrfout_d02"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_file_list("").is_empty());
        assert!(parse_file_list("\n# nothing\n\n").is_empty());
    }

    #[test]
    fn test_collect_inputs_merges_and_dedups() {
        let dir = temp_test_dir_with_prefix("cldfra_inputs_");
        let list = dir.path().join("files.txt");
        fs::write(&list, "b.nc\na.nc\nc.nc\n").unwrap();

        let inputs =
            collect_inputs(&[PathBuf::from("a.nc"), PathBuf::from("a.nc")], Some(&list)).unwrap();
        assert_eq!(
            inputs,
            vec![
                PathBuf::from("a.nc"),
                PathBuf::from("b.nc"),
                PathBuf::from("c.nc"),
            ]
        );
    }

    #[test]
    fn test_collect_inputs_dedups_by_file() {
        let dir = temp_test_dir_with_prefix("cldfra_inputs_same_");
        let file = dir.path().join("wrfout_d01");
        fs::write(&file, b"").unwrap();
        let dotted = dir.path().join(".").join("wrfout_d01");
        let canonical = fs::canonicalize(&file).unwrap();

        let inputs = collect_inputs(&[file.clone(), dotted, canonical], None).unwrap();
        assert_eq!(inputs, vec![file]);
    }

    #[test]
    fn test_collect_inputs_keeps_unresolvable_paths() {
        let dir = temp_test_dir_with_prefix("cldfra_inputs_unresolved_");
        let missing = dir.path().join("wrfout_missing");
        let other = dir.path().join("wrfout_other");

        let inputs =
            collect_inputs(&[missing.clone(), other.clone(), missing.clone()], None).unwrap();
        assert_eq!(inputs, vec![missing, other]);
    }

    #[test]
    fn test_missing_file_list_fails() {
        let dir = temp_test_dir_with_prefix("cldfra_inputs_missing_");
        let err = collect_inputs(&[], Some(&dir.path().join("nope.txt"))).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.txt"));
    }
}
