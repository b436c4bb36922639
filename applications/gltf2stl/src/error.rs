use std::{
    fmt::{self, Display},
    io,
    path::PathBuf,
    process::ExitCode,
};

/// Result type of all fallible batch operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Everything that makes a batch run fail.
#[derive(Debug)]
pub enum ApplicationError {
    /// The command line could not be parsed.
    Arguments(pico_args::Error),
    /// An argument that looks like a flag but isn't one.
    UnknownArgument(String),
    /// The source tree could not be walked.
    Discovery {
        /// Directory the search started from.
        root: PathBuf,
        /// Why the search stopped.
        source: io::Error,
    },
    /// Converting a single file failed; the error carries the file as context.
    Conversion(anyhow::Error),
    /// Progress could not be reported.
    Output(io::Error),
    /// Some files failed while the batch kept going.
    Failed {
        /// Number of files that could not be converted.
        failed: usize,
        /// Number of files found.
        total: usize,
    },
}

impl Display for ApplicationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationError::Arguments(error) => write!(formatter, "invalid arguments: {error}"),
            ApplicationError::UnknownArgument(argument) => {
                write!(formatter, "unknown argument: {argument}")
            }
            ApplicationError::Discovery { root, source } => {
                write!(formatter, "failed to search {}: {source}", root.display())
            }
            ApplicationError::Conversion(error) => write!(formatter, "{error:#}"),
            ApplicationError::Output(error) => {
                write!(formatter, "failed to report progress: {error}")
            }
            ApplicationError::Failed { failed, total } => {
                write!(formatter, "{failed} of {total} file(s) failed to convert")
            }
        }
    }
}

impl std::error::Error for ApplicationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplicationError::Arguments(error) => Some(error),
            ApplicationError::Discovery { source, .. } => Some(source),
            ApplicationError::Conversion(error) => Some(&**error),
            ApplicationError::Output(error) => Some(error),
            ApplicationError::UnknownArgument(_) | ApplicationError::Failed { .. } => None,
        }
    }
}

impl From<pico_args::Error> for ApplicationError {
    fn from(value: pico_args::Error) -> Self {
        Self::Arguments(value)
    }
}

impl From<ApplicationError> for ExitCode {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Arguments(_) | ApplicationError::UnknownArgument(_) => {
                ExitCode::from(2)
            }
            ApplicationError::Discovery { .. }
            | ApplicationError::Conversion(_)
            | ApplicationError::Output(_)
            | ApplicationError::Failed { .. } => ExitCode::FAILURE,
        }
    }
}
