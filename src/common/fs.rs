//! Common file system operations with unified error handling

use std::fs;
use std::io::{ErrorKind, Write};
use std::os::unix::fs as unix_fs;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};
use walkdir::WalkDir;

use crate::error::{self, Result};

/// Directory entries never carried over by a tree copy
#[derive(Default, Clone)]
pub struct CopyOptions {
    pub exclude: Vec<String>,
}

impl CopyOptions {
    /// Skip version-control metadata of every supported SCM
    pub fn exclude_vcs() -> Self {
        Self {
            exclude: vec![".git".to_string(), ".hg".to_string(), ".svn".to_string()],
        }
    }

    fn is_excluded(&self, name: &std::ffi::OsStr) -> bool {
        self.exclude
            .iter()
            .any(|excluded| name.to_str() == Some(excluded.as_str()))
    }
}

/// Copy a directory tree into `dst`, overwriting files that already exist.
///
/// Symlinks are recreated as symlinks with the same target, so relative links
/// such as `node_modules/.bin/*` keep resolving inside the copy.
pub fn copy_dir_recursive(src: &Path, dst: &Path, options: &CopyOptions) -> Result<u64> {
    fs::create_dir_all(dst).map_err(|e| error::fs::write_failed(dst, e))?;

    let mut copied = 0;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !options.is_excluded(entry.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| error::fs::read_failed(src, e))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| error::fs::read_failed(entry.path(), e))?;
        let target = dst.join(relative);

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            copied += 1;
        } else if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| error::fs::write_failed(&target, e))?;
        } else {
            if fs::symlink_metadata(&target).is_ok_and(|m| m.file_type().is_symlink()) {
                remove_path(&target)?;
            }
            fs::copy(entry.path(), &target).map_err(|e| error::fs::write_failed(&target, e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link = fs::read_link(src).map_err(|e| error::fs::read_failed(src, e))?;
    remove_path(dst)?;
    unix_fs::symlink(&link, dst).map_err(|e| error::fs::write_failed(dst, e))
}

/// Remove a file, symlink or directory tree; a missing path is not an error
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(error::fs::read_failed(path, e)),
    };
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| error::fs::write_failed(path, e))
}

/// Paths moved out of a tree while the tree is replaced.
///
/// Dropping this without calling [`ParkedPaths::restore`] discards them.
pub struct ParkedPaths {
    holding: TempDir,
    moved: Vec<(PathBuf, PathBuf)>,
}

impl ParkedPaths {
    /// Move every existing path of `keep` that lies inside `root` next to it
    pub fn park(root: &Path, keep: &[PathBuf]) -> Result<Self> {
        let parent = root
            .parent()
            .ok_or_else(|| error::fs::write_failed(root, "path has no parent directory"))?;
        fs::create_dir_all(parent).map_err(|e| error::fs::write_failed(parent, e))?;
        let holding = tempfile::Builder::new()
            .prefix(".parked-")
            .tempdir_in(parent)
            .map_err(|e| error::fs::write_failed(parent, e))?;

        let mut moved = Vec::new();
        for (index, path) in keep.iter().enumerate() {
            if path == root || !path.starts_with(root) || fs::symlink_metadata(path).is_err() {
                continue;
            }
            let aside = holding.path().join(index.to_string());
            fs::rename(path, &aside).map_err(|e| error::fs::write_failed(path, e))?;
            tracing::debug!(path = %path.display(), "parked");
            moved.push((aside, path.clone()));
        }
        Ok(Self { holding, moved })
    }

    /// Put every parked path back, replacing whatever now sits there
    pub fn restore(self) -> Result<()> {
        for (aside, original) in &self.moved {
            remove_path(original)?;
            if let Some(parent) = original.parent() {
                fs::create_dir_all(parent).map_err(|e| error::fs::write_failed(parent, e))?;
            }
            fs::rename(aside, original).map_err(|e| error::fs::write_failed(original, e))?;
        }
        Ok(())
    }
}

/// Delete `dir` and rebuild it with `fill`, carrying the `keep` paths across
pub fn replace_dir_keeping<T>(
    dir: &Path,
    keep: &[PathBuf],
    fill: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let parked = ParkedPaths::park(dir, keep)?;
    let result = remove_path(dir).and_then(|()| fill());
    parked.restore()?;
    result
}

/// Replace `path` with `content` through a temp file in the same directory
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| error::fs::write_failed(path, "path has no parent directory"))?;
    fs::create_dir_all(parent).map_err(|e| error::fs::write_failed(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| error::fs::write_failed(path, e))?;
    temp.write_all(content)
        .map_err(|e| error::fs::write_failed(path, e))?;
    temp.persist(path)
        .map_err(|e| error::fs::write_failed(path, e.error))?;
    Ok(())
}

/// Write `content` only if it differs from what is on disk.
///
/// Returns `true` when the file was (re)written.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(error::fs::read_failed(path, e)),
    }
    write_atomic(path, content.as_bytes())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_temp_dir, write_file};

    #[test]
    fn test_copy_dir_recursive_skips_vcs() {
        let temp = create_temp_dir();
        let src = temp.path().join("src");
        write_file(&src.join("server.js"), "console.log('hi')");
        write_file(&src.join("lib/index.js"), "module.exports = {}");
        write_file(&src.join(".git/HEAD"), "ref: refs/heads/main");

        let dst = temp.path().join("dst");
        let copied = copy_dir_recursive(&src, &dst, &CopyOptions::exclude_vcs()).unwrap();

        assert_eq!(copied, 2);
        assert!(dst.join("server.js").is_file());
        assert!(dst.join("lib/index.js").is_file());
        assert!(!dst.join(".git").exists());
    }

    #[test]
    fn test_copy_dir_recursive_overwrites() {
        let temp = create_temp_dir();
        let src = temp.path().join("src");
        write_file(&src.join("server.js"), "new");
        let dst = temp.path().join("dst");
        write_file(&dst.join("server.js"), "old");

        copy_dir_recursive(&src, &dst, &CopyOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(dst.join("server.js")).unwrap(), "new");
    }

    #[test]
    fn test_copy_dir_recursive_keeps_symlinks() {
        let temp = create_temp_dir();
        let src = temp.path().join("src");
        write_file(&src.join("node_modules/foo/cli.js"), "require('./lib')");
        std::fs::create_dir_all(src.join("node_modules/.bin")).unwrap();
        unix_fs::symlink("../foo/cli.js", src.join("node_modules/.bin/foo")).unwrap();
        unix_fs::symlink("../foo", src.join("node_modules/.bin/foo-dir")).unwrap();

        let dst = temp.path().join("dst");
        copy_dir_recursive(&src, &dst, &CopyOptions::default()).unwrap();

        let bin = dst.join("node_modules/.bin");
        assert!(fs::symlink_metadata(bin.join("foo")).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(bin.join("foo")).unwrap(), Path::new("../foo/cli.js"));
        assert_eq!(fs::read_link(bin.join("foo-dir")).unwrap(), Path::new("../foo"));
        assert!(bin.join("foo-dir/cli.js").is_file());

        // A second copy over the same tree replaces the links in place
        copy_dir_recursive(&src, &dst, &CopyOptions::default()).unwrap();
        assert_eq!(fs::read_link(bin.join("foo")).unwrap(), Path::new("../foo/cli.js"));
    }

    #[test]
    fn test_replace_dir_keeping() {
        let temp = create_temp_dir();
        let dir = temp.path().join("app");
        write_file(&dir.join("stale.js"), "old");
        write_file(&dir.join("cache/lodash/-/lodash-4.17.21.tgz"), "tarball");
        let keep = vec![dir.join("cache"), temp.path().join("elsewhere")];

        let seen = replace_dir_keeping(&dir, &keep, || {
            assert!(!dir.exists());
            write_file(&dir.join("server.js"), "new");
            Ok(3)
        })
        .unwrap();

        assert_eq!(seen, 3);
        assert!(dir.join("server.js").is_file());
        assert!(!dir.join("stale.js").exists());
        assert_eq!(
            fs::read_to_string(dir.join("cache/lodash/-/lodash-4.17.21.tgz")).unwrap(),
            "tarball"
        );
    }

    #[test]
    fn test_replace_dir_keeping_restores_on_failure() {
        let temp = create_temp_dir();
        let dir = temp.path().join("app");
        write_file(&dir.join("cache/pkg.tgz"), "tarball");

        let result: Result<()> = replace_dir_keeping(&dir, &[dir.join("cache")], || {
            Err(error::fs::write_failed(&dir, "clone failed"))
        });

        assert!(result.is_err());
        assert!(dir.join("cache/pkg.tgz").is_file());
    }

    #[test]
    fn test_write_if_changed() {
        let temp = create_temp_dir();
        let path = temp.path().join("etc/unit.conf");

        assert!(write_if_changed(&path, "a = 1\n").unwrap());
        assert!(!write_if_changed(&path, "a = 1\n").unwrap());
        assert!(write_if_changed(&path, "a = 2\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "a = 2\n");
    }
}
