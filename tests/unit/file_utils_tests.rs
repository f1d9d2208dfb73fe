/*!
 * Tests for file and folder utilities
 */

use anyhow::Result;
use std::path::PathBuf;

use lexis::file_utils::FileManager;
use crate::common;

#[test]
fn test_fileExists_shouldDistinguishFilesFromDirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(&temp_dir.path().to_path_buf(), "a.md", "x")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&file));
    Ok(())
}

#[test]
fn test_generateOutputPath_shouldAppendLanguageToken() {
    let path = FileManager::generate_output_path(
        "/data/chunks/chapter3.md",
        "/data/out",
        "French",
        "md",
    );
    assert_eq!(path, PathBuf::from("/data/out/chapter3_French.md"));
}

#[test]
fn test_findFiles_shouldMatchExtensionCaseInsensitively() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "a.md", "x")?;
    common::create_test_file(&dir, "b.MD", "x")?;
    common::create_test_file(&dir, "c.txt", "x")?;

    let found = FileManager::find_files(&dir, "md")?;

    assert_eq!(found.len(), 2);
    Ok(())
}

#[test]
fn test_findFiles_shouldNotDescendIntoSubdirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "top.md", "x")?;
    let nested = dir.join("nested");
    FileManager::ensure_dir(&nested)?;
    common::create_test_file(&nested, "deep.md", "x")?;

    let found = FileManager::find_files(&dir, "md")?;

    assert_eq!(found.len(), 1);
    Ok(())
}

#[test]
fn test_findFiles_shouldAcceptDottedExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "a.md", "x")?;

    assert_eq!(FileManager::find_files(&dir, ".md")?.len(), 1);
    Ok(())
}

#[test]
fn test_writeToFile_shouldCreateMissingParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("a/b/out.md");

    FileManager::write_to_file(&target, "content")?;

    assert_eq!(FileManager::read_to_string(&target)?, "content");
    Ok(())
}

#[test]
fn test_readToString_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("./no_such_file.md").is_err());
}
