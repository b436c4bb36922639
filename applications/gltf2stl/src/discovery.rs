use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use log::{trace, warn};

/// File extensions of convertible sources, matched case-sensitively.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["glb", "gltf"];

/// Extension of the written files.
pub const OUTPUT_EXTENSION: &str = "stl";

/// Finds all glTF sources below `root`, sorted by path.
///
/// Hidden files and directories (starting with a `.`) are ignored.
/// Symbolic links to directories are not followed.
/// Entries below `root` that can't be read are skipped with a warning.
///
/// # Errors
///
/// Fails if `root` itself can't be listed.
pub fn find_sources(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    let mut pending = Vec::new();

    scan_directory(root, fs::read_dir(root)?, &mut pending, &mut sources);

    while let Some(directory) = pending.pop() {
        match fs::read_dir(&directory) {
            Ok(entries) => scan_directory(&directory, entries, &mut pending, &mut sources),
            Err(error) => warn!("skipping {}: {error}", directory.display()),
        }
    }

    sources.sort();
    Ok(sources)
}

/// Sorts the entries of `directory` into subdirectories to visit and sources.
fn scan_directory(
    directory: &Path,
    entries: fs::ReadDir,
    pending: &mut Vec<PathBuf>,
    sources: &mut Vec<PathBuf>,
) {
    trace!("searching {}", directory.display());

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!("skipping an entry of {}: {error}", directory.display());
                continue;
            }
        };
        if is_hidden(&entry.file_name()) {
            continue;
        }

        let path = entry.path();
        // `DirEntry::file_type` does not follow symlinks
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => pending.push(path),
            Ok(_) => {
                if is_source(&path) && path.is_file() {
                    sources.push(path);
                }
            }
            Err(error) => warn!("skipping {}: {error}", path.display()),
        }
    }
}

/// Whether `path` has one of the [`SOURCE_EXTENSIONS`].
#[must_use]
pub fn is_source(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| SOURCE_EXTENSIONS.contains(&extension))
}

/// The STL file written for `source`: same directory, same stem.
#[must_use]
pub fn output_path(source: &Path) -> PathBuf {
    source.with_extension(OUTPUT_EXTENSION)
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().starts_with(b".")
}
