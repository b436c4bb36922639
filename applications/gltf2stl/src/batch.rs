use std::{
    collections::HashSet,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};

use crate::{
    convert::{convert, ConvertOptions},
    discovery::{find_sources, output_path},
    ApplicationError, ApplicationResult, Config,
};

/// Outcome of a batch run that didn't abort.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Sources that were written as STL.
    pub converted: Vec<PathBuf>,
    /// Sources that failed while `keep_going` was set.
    pub failed: Vec<PathBuf>,
}

impl Summary {
    /// Number of files that were found.
    #[must_use]
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// Converts all sources below `config.root`, one after the other.
///
/// Progress lines go to `out`, diagnostics go to the log.
///
/// # Errors
///
/// Fails if the tree can't be searched or a file can't be converted. With
/// [`Config::keep_going`] the remaining files are still converted and
/// [`ApplicationError::Failed`] is returned at the end instead.
pub fn run(config: &Config, out: &mut impl Write) -> ApplicationResult<Summary> {
    let root = config.root.as_path();
    let sources = find_sources(root).map_err(|source| ApplicationError::Discovery {
        root: root.to_owned(),
        source,
    })?;

    if sources.is_empty() {
        writeln!(out, "No glTF/GLB files found.").map_err(ApplicationError::Output)?;
        return Ok(Summary::default());
    }
    info!("found {} file(s) below {}", sources.len(), root.display());

    let options = ConvertOptions {
        format: config.format,
        ..ConvertOptions::default()
    };
    let mut summary = Summary::default();
    let mut written = HashSet::new();

    for source in sources {
        let destination = output_path(&source);
        writeln!(
            out,
            "Converting {} -> {}",
            relative(&source, root).display(),
            relative(&destination, root).display()
        )
        .map_err(ApplicationError::Output)?;

        if !written.insert(destination.clone()) {
            warn!(
                "{} overwrites the output of another source",
                source.display()
            );
        }

        match convert(&source, &destination, &options) {
            Ok(triangle_count) => {
                debug!("wrote {triangle_count} triangle(s) to {}", destination.display());
                summary.converted.push(source);
            }
            Err(conversion_error) if config.keep_going => {
                error!("skipping {}: {conversion_error:#}", source.display());
                summary.failed.push(source);
            }
            Err(conversion_error) => return Err(ApplicationError::Conversion(conversion_error)),
        }
    }

    if summary.failed.is_empty() {
        writeln!(out, "Done. Converted {} file(s).", summary.converted.len())
            .map_err(ApplicationError::Output)?;
        Ok(summary)
    } else {
        writeln!(
            out,
            "Done. Converted {} file(s), {} failed.",
            summary.converted.len(),
            summary.failed.len()
        )
        .map_err(ApplicationError::Output)?;
        Err(ApplicationError::Failed {
            failed: summary.failed.len(),
            total: summary.total(),
        })
    }
}

fn relative<'path>(path: &'path Path, root: &Path) -> &'path Path {
    path.strip_prefix(root).unwrap_or(path)
}
