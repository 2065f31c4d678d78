//! Preprocessor discovery.
//!
//! A file is piped through `cpp` (or `clang-cpp`) when one is on `PATH`;
//! otherwise it is read as-is and must already be preprocessed. Linemarker
//! lines survive either way; the lexer skips them.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::DriverError;

/// Loads a source file, preprocessing it when a preprocessor is found.
pub fn load(path: &Path) -> Result<String, DriverError> {
    let read = |path: &Path| {
        std::fs::read_to_string(path).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let Some(cpp) = find_preprocessor() else {
        warn!(
            "C preprocessor not found; only already preprocessed sources \
             will be interpreted correctly"
        );
        return read(path);
    };

    info!("`{}` will be used as C preprocessor", cpp.display());
    match Command::new(&cpp).arg(path).output() {
        Ok(output) if output.status.success() => match String::from_utf8(output.stdout) {
            Ok(text) => Ok(text),
            Err(_) => {
                warn!("preprocessor produced non-UTF-8 output; reading the file directly");
                read(path)
            }
        },
        Ok(output) => {
            warn!(
                "`{}` exited with {}; reading the file directly",
                cpp.display(),
                output.status
            );
            read(path)
        }
        Err(error) => {
            warn!(
                "failed to run `{}` ({error}); reading the file directly",
                cpp.display()
            );
            read(path)
        }
    }
}

fn find_preprocessor() -> Option<PathBuf> {
    ["cpp", "clang-cpp"].iter().find_map(|name| which(name))
}

fn which(executable: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(executable))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && std::fs::metadata(path)
            .map(|meta| meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
