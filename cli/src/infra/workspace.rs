//! Per-run working copies of the Terraform root module.
//!
//! Two runs sharing one directory would fight over `.terraform/` and the
//! local state file, so concurrent runs each get a private copy.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Directories never copied into a working copy.
const SKIPPED_DIRS: &[&str] = &[".terraform", ".git", "target"];

/// A temporary copy of a Terraform directory, removed on drop.
pub struct IsolatedWorkspace {
    _tmp: TempDir,
    root: PathBuf,
}

impl IsolatedWorkspace {
    /// Copy `source` into a fresh temporary directory.
    ///
    /// Local state, lock info and provider caches are left behind; the
    /// dependency lock file (`.terraform.lock.hcl`) is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is not a directory or any copy fails.
    pub fn copy_from(source: &Path) -> Result<Self> {
        if !source.is_dir() {
            anyhow::bail!("terraform directory {} does not exist", source.display());
        }
        let tmp = tempfile::Builder::new()
            .prefix("jokester-e2e-")
            .tempdir()
            .context("cannot create temporary directory")?;
        let source = source
            .canonicalize()
            .with_context(|| format!("cannot resolve {}", source.display()))?;
        let name = source
            .file_name()
            .map_or_else(|| "module".into(), ToOwned::to_owned);
        let root = tmp.path().join(name);
        copy_tree(&source, &source, &root)?;
        tracing::debug!(from = %source.display(), to = %root.display(), "copied terraform directory");
        Ok(Self { _tmp: tmp, root })
    }

    /// Root of the copied module.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }
}

/// Copy `src` into `dst`. Symlinks are recreated, never followed, so a link
/// back into the module cannot recurse.
fn copy_tree(module_root: &Path, src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("cannot create {}", dst.display()))?;
    for entry in fs::read_dir(src).with_context(|| format!("cannot read {}", src.display()))? {
        let entry = entry.with_context(|| format!("cannot read {}", src.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("cannot stat {}", entry.path().display()))?;
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        let from = entry.path();
        let to = dst.join(&name);
        if !file_type.is_file() && SKIPPED_DIRS.contains(&name_str.as_ref()) {
            continue;
        }
        if file_type.is_symlink() {
            copy_link(module_root, &from, &to)?;
        } else if file_type.is_dir() {
            copy_tree(module_root, &from, &to)?;
        } else if !is_local_state(&name_str) {
            fs::copy(&from, &to)
                .with_context(|| format!("cannot copy {} to {}", from.display(), to.display()))?;
        }
    }
    Ok(())
}

/// Recreate the link at `from` as `to`. Relative targets inside the module
/// are kept so they point into the copy; relative targets leaving the module
/// are made absolute so they still resolve from the temporary directory.
fn copy_link(module_root: &Path, from: &Path, to: &Path) -> Result<()> {
    let target = fs::read_link(from).with_context(|| format!("cannot read link {}", from.display()))?;
    let target = if target.is_relative() {
        let resolved = from
            .parent()
            .and_then(|dir| dir.join(&target).canonicalize().ok());
        match resolved {
            Some(outside) if !outside.starts_with(module_root) => outside,
            _ => target,
        }
    } else {
        target
    };
    symlink(from, &target, to)
        .with_context(|| format!("cannot link {} to {}", to.display(), target.display()))
}

#[cfg(unix)]
fn symlink(_from: &Path, target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(from: &Path, target: &Path, link: &Path) -> std::io::Result<()> {
    if from.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

fn is_local_state(file_name: &str) -> bool {
    file_name.starts_with("terraform.tfstate") || file_name == ".terraform.tfstate.lock.info"
}
