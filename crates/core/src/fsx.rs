//! Filesystem helpers used by the task steps

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::types::TestbedResult;

/// Delete a whole directory tree
pub fn delete_directory(dir: &Path) -> TestbedResult<()> {
    fs::remove_dir_all(dir)?;
    Ok(())
}

/// Copy a directory into another, recursively
///
/// Top-level entries whose file name appears in `excluded` are skipped.
pub fn copy_dir(src: &Path, dest: &Path, excluded: &[String]) -> TestbedResult<()> {
    fs::create_dir_all(dest)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let name = entry.file_name();

        if excluded.iter().any(|e| e.as_str() == name) {
            continue;
        }

        let target = dest.join(&name);

        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target, &[])?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }

    Ok(())
}

/// Copy a single file to a different location
pub fn copy_file(src: &Path, dest: &Path) -> TestbedResult<()> {
    fs::copy(src, dest)?;
    Ok(())
}

/// Concatenate the content of several files, in order, into a destination
///
/// All sources are read up front so the destination may also be one of
/// the sources (used when appending certificates to an existing file).
pub fn concat_files(sources: &[&Path], dest: &Path) -> TestbedResult<()> {
    let mut combined = Vec::new();

    for source in sources {
        combined.extend(fs::read(source)?);
    }

    fs::write(dest, combined)?;
    Ok(())
}

/// Replace a string in a given file
pub fn replace_in_file(path: &Path, from: &str, to: &str) -> TestbedResult<()> {
    let content = fs::read_to_string(path)?;
    fs::write(path, content.replace(from, to))?;
    Ok(())
}

/// Age of a path since its last modification
pub fn modified_age(path: &Path) -> TestbedResult<Duration> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(modified.elapsed().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_dir_skips_excluded_top_level_entries() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dest = temp.path().join("dest");

        fs::create_dir_all(src.join("kept")).unwrap();
        fs::create_dir_all(src.join("skipped")).unwrap();
        fs::write(src.join("kept/file.txt"), "content").unwrap();
        fs::write(src.join("root.txt"), "root").unwrap();

        copy_dir(&src, &dest, &["skipped".to_string()]).unwrap();

        assert!(dest.join("kept/file.txt").exists());
        assert!(dest.join("root.txt").exists());
        assert!(!dest.join("skipped").exists());
    }

    #[test]
    fn concat_files_appends_to_an_existing_source() {
        let temp = tempfile::tempdir().unwrap();
        let base = temp.path().join("cacert.pem");
        let extra = temp.path().join("extra.pem");

        fs::write(&base, "base\n").unwrap();
        fs::write(&extra, "extra\n").unwrap();

        concat_files(&[&base, &extra], &base).unwrap();

        assert_eq!(fs::read_to_string(&base).unwrap(), "base\nextra\n");
    }

    #[test]
    fn replace_in_file_rewrites_content() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("htaccess");

        fs::write(&file, "# RewriteBase /\n").unwrap();
        replace_in_file(&file, "# RewriteBase /", "RewriteBase /site").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "RewriteBase /site\n");
    }

    #[test]
    fn delete_directory_removes_the_tree() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("tree");
        fs::create_dir_all(dir.join("nested")).unwrap();

        delete_directory(&dir).unwrap();
        assert!(!dir.exists());
    }
}
