/*!
 * Tests for file and directory utilities
 */

use anyhow::Result;
use std::fs;

use xcloc_translate::file_utils::FileManager;
use crate::common;

#[test]
fn test_find_files_withMixedExtensions_shouldMatchCaseInsensitivelyInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "b/fr.xliff", "")?;
    common::create_test_file(root, "a/de.XLIFF", "")?;
    common::create_test_file(root, "a/notes.txt", "")?;
    common::create_test_file(root, "c.xlf", "")?;

    let files = FileManager::find_files(root, &["xliff".to_string()])?;
    let relative: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(relative, vec!["a/de.XLIFF", "b/fr.xliff"]);

    let files = FileManager::find_files(root, &[".xlf".to_string(), "xliff".to_string()])?;
    assert_eq!(files.len(), 3);
    Ok(())
}

#[test]
fn test_write_atomic_withMissingParent_shouldCreateItAndReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested/dir/out.xliff");

    FileManager::write_atomic(&path, b"first")?;
    FileManager::write_atomic(&path, b"second")?;

    assert_eq!(fs::read_to_string(&path)?, "second");
    let leftovers = fs::read_dir(path.parent().unwrap())?.count();
    assert_eq!(leftovers, 1);
    Ok(())
}

#[test]
fn test_copy_dir_all_withExistingDestination_shouldReplaceIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("source");
    let destination = temp_dir.path().join("destination");
    common::create_test_file(&source, "contents.json", "{}")?;
    common::create_test_file(&source, "Localized Contents/fr.xliff", "<xliff/>")?;
    common::create_test_file(&destination, "stale.txt", "old")?;

    FileManager::copy_dir_all(&source, &destination)?;

    assert!(destination.join("contents.json").is_file());
    assert_eq!(fs::read_to_string(destination.join("Localized Contents/fr.xliff"))?, "<xliff/>");
    assert!(!destination.join("stale.txt").exists());
    Ok(())
}

#[test]
fn test_absolute_path_withNonexistentChild_shouldResolveAgainstExistingAncestor() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let base = FileManager::absolute_path(temp_dir.path())?;
    let child = FileManager::absolute_path(temp_dir.path().join("not/yet/created"))?;

    assert!(child.starts_with(&base));
    assert!(child.ends_with("not/yet/created"));
    Ok(())
}

#[test]
fn test_append_to_log_file_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("logs/run.log");

    FileManager::append_to_log_file(&path, "first")?;
    FileManager::append_to_log_file(&path, "second")?;

    let content = fs::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first"));
    assert!(lines[1].ends_with("] second"));
    Ok(())
}

#[test]
fn test_exists_helpers_shouldDistinguishFilesAndDirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.txt", "x")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    Ok(())
}
