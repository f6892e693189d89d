//! Shared history helpers for text input widgets.

use color_eyre::Result;
use std::fs;
use std::io::{BufRead, BufReader, Write};

use crate::cache::CacheManager;

/// Load history from a cache file
pub fn load_history_impl(cache: &CacheManager, history_id: &str) -> Result<Vec<String>> {
    let history_file = cache.cache_file(&format!("{}_history.txt", history_id));

    if !history_file.exists() {
        return Ok(Vec::new());
    }

    let file = fs::File::open(&history_file)?;
    let reader = BufReader::new(file);
    let mut history = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            history.push(line);
        }
    }

    Ok(history)
}

/// Save history to a cache file, keeping the most recent `limit` entries. The
/// file is locked exclusively while written so concurrent instances don't
/// interleave lines.
pub fn save_history_impl(
    cache: &CacheManager,
    history_id: &str,
    history: &[String],
    limit: usize,
) -> Result<()> {
    cache.ensure_cache_dir()?;
    let history_file = cache.cache_file(&format!("{}_history.txt", history_id));

    let mut file = fs::File::create(&history_file)?;
    if let Err(e) = fs2::FileExt::try_lock_exclusive(&file) {
        eprintln!("Warning: Could not lock history file: {}", e);
    }

    let start = history.len().saturating_sub(limit);
    for entry in history.iter().skip(start) {
        writeln!(file, "{}", entry)?;
    }
    file.flush()?;

    Ok(())
}

/// Add entry to history with deduplication
/// Only consecutive duplicate entries are skipped
pub fn add_to_history(history: &mut Vec<String>, entry: String) {
    if let Some(last) = history.last() {
        if last == &entry {
            return;
        }
    }
    history.push(entry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_history() {
        let mut history = Vec::new();

        add_to_history(&mut history, "query1".to_string());
        assert_eq!(history.len(), 1);

        add_to_history(&mut history, "query2".to_string());
        assert_eq!(history.len(), 2);

        // Consecutive duplicate is skipped
        add_to_history(&mut history, "query2".to_string());
        assert_eq!(history.len(), 2);

        // Non-consecutive duplicate is preserved
        add_to_history(&mut history, "query1".to_string());
        assert_eq!(history.len(), 3);
        assert_eq!(history[0], "query1");
        assert_eq!(history[1], "query2");
        assert_eq!(history[2], "query1");
    }

    #[test]
    fn history_roundtrip_respects_limit() {
        let temp = tempfile::TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp.path().to_path_buf());

        let history: Vec<String> = (0..5).map(|i| format!("q{}", i)).collect();
        save_history_impl(&cache, "criteria", &history, 3).unwrap();

        let loaded = load_history_impl(&cache, "criteria").unwrap();
        assert_eq!(loaded, vec!["q2", "q3", "q4"]);
    }

    #[test]
    fn missing_history_file_loads_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp.path().to_path_buf());
        assert!(load_history_impl(&cache, "criteria").unwrap().is_empty());
    }
}
