use std::{
    fmt::{self, Display},
    io,
};

/// Failure to encode or store an STL file.
#[derive(Debug)]
pub enum StlError {
    /// The underlying writer or file failed.
    Io(io::Error),
    /// Binary STL counts triangles with a `u32`.
    TooManyTriangles(usize),
}

impl Display for StlError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StlError::Io(error) => write!(formatter, "failed to write STL data: {error}"),
            StlError::TooManyTriangles(count) => write!(
                formatter,
                "{count} triangles exceed the capacity of a binary STL file"
            ),
        }
    }
}

impl std::error::Error for StlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StlError::Io(error) => Some(error),
            StlError::TooManyTriangles(_) => None,
        }
    }
}

impl From<io::Error> for StlError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
