use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::LocateError;

/// Return the only entry of `dir`, which must be a regular file.
///
/// Every entry counts, directories included: an inbox with one file and one
/// stray folder is ambiguous, not "one file".
pub fn locate_single_file(dir: &Path) -> Result<PathBuf, LocateError> {
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LocateError::NotFound {
                dir: dir.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(LocateError::Io {
                dir: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut entries = Vec::new();
    for entry in rd {
        let entry = entry.map_err(|source| LocateError::Io {
            dir: dir.to_path_buf(),
            source,
        })?;
        entries.push(entry.path());
    }

    match entries.len() {
        0 => Err(LocateError::NotFound {
            dir: dir.to_path_buf(),
        }),
        1 => {
            let only = entries.remove(0);
            if only.is_file() {
                Ok(only)
            } else {
                Err(LocateError::NotFound {
                    dir: dir.to_path_buf(),
                })
            }
        }
        count => Err(LocateError::Ambiguous {
            dir: dir.to_path_buf(),
            count,
        }),
    }
}
