// src/build.rs

//! Post-export build step for an Android project exported by the editor.
//!
//! The exported project lands in `<export_dir>/<product_name>`. A previous
//! export in the same place is emptied first, then `gradle build` runs in the
//! project directory through the [`CommandRunner`].

use std::path::Path;

use tracing::{debug, info};

use crate::errors::{Result, RunnerError};
use crate::exec::{CommandInvocation, CommandRunner};
use crate::fs::FileSystem;

/// Empty `<export_dir>/<product_name>` if it exists, keeping the folder.
///
/// Returns the number of top-level entries removed. A missing product folder
/// is not an error; a missing export directory is.
pub fn clear_product_folder(
    fs: &dyn FileSystem,
    export_dir: &Path,
    product_name: &str,
) -> Result<usize> {
    if !fs.is_dir(export_dir) {
        return Err(RunnerError::ConfigError(format!(
            "export directory {:?} does not exist",
            export_dir
        )));
    }
    if matches!(product_name, "" | "." | "..") || product_name.contains(['/', '\\']) {
        return Err(RunnerError::ConfigError(format!(
            "invalid product name {product_name:?}"
        )));
    }

    let product_dir = export_dir.join(product_name);
    if !fs.is_dir(&product_dir) {
        debug!(dir = %product_dir.display(), "no previous export to clear");
        return Ok(0);
    }

    let entries = fs.read_dir(&product_dir)?;
    for entry in &entries {
        if fs.is_dir(entry) {
            fs.remove_dir_all(entry)?;
        } else {
            fs.remove_file(entry)?;
        }
    }

    info!(
        dir = %product_dir.display(),
        removed = entries.len(),
        "cleared previous export"
    );
    Ok(entries.len())
}

/// Run the gradle build command inside `project_dir`.
pub async fn gradle_build(
    runner: &CommandRunner,
    project_dir: &Path,
    gradle_cmd: &str,
) -> Result<i32> {
    info!(project = %project_dir.display(), cmd = %gradle_cmd, "starting gradle build");
    runner.run(gradle_invocation(project_dir, gradle_cmd)).await
}

/// The invocation that builds the exported project.
pub fn gradle_invocation(project_dir: &Path, gradle_cmd: &str) -> CommandInvocation {
    CommandInvocation::new(gradle_cmd).in_dir(project_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn empties_only_the_product_folder() {
        let fs = MockFileSystem::new();
        fs.add_file("./export/MyGame/build.gradle", b"x".to_vec());
        fs.add_file("./export/MyGame/src/main/AndroidManifest.xml", b"x".to_vec());
        fs.add_file("./export/Other/keep.txt", b"x".to_vec());

        let removed = clear_product_folder(&fs, Path::new("./export"), "MyGame").unwrap();

        assert_eq!(removed, 2);
        assert!(fs.is_dir(Path::new("./export/MyGame")));
        assert!(fs.read_dir(Path::new("./export/MyGame")).unwrap().is_empty());
        assert!(fs.is_file(Path::new("./export/Other/keep.txt")));
    }

    #[test]
    fn missing_product_folder_is_noop() {
        let fs = MockFileSystem::new();
        fs.add_dir("./export");
        assert_eq!(clear_product_folder(&fs, Path::new("./export"), "MyGame").unwrap(), 0);
    }

    #[test]
    fn missing_export_dir_is_error() {
        let fs = MockFileSystem::new();
        assert!(clear_product_folder(&fs, Path::new("./nowhere"), "MyGame").is_err());
    }

    #[test]
    fn product_name_with_separator_is_rejected() {
        let fs = MockFileSystem::new();
        fs.add_dir("./export");
        assert!(clear_product_folder(&fs, Path::new("./export"), "../etc").is_err());
    }
}
