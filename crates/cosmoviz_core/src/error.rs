use std::path::PathBuf;

/// Errors raised while generating, storing, or converting a sweep dataset.
///
/// None of these are retried: every failure is local file or array access, so
/// the current pipeline run aborts with the offending entry attached.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("source not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("entry `{entry}` is missing")]
    MissingEntry { entry: String },

    #[error("shape mismatch in `{entry}`: expected {expected}, found {found}")]
    ShapeMismatch {
        entry: String,
        expected: usize,
        found: usize,
    },

    #[error("attribute `{entry}` could not be decoded: {reason}")]
    Encoding { entry: String, reason: String },

    #[error("I/O error on `{entry}`: {source}")]
    Io {
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("container error on `{entry}`: {source}")]
    Archive {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to read array `{entry}`: {source}")]
    NpyRead {
        entry: String,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    #[error("failed to write array `{entry}`: {source}")]
    NpyWrite {
        entry: String,
        #[source]
        source: ndarray_npy::WriteNpyError,
    },

    #[error("JSON error on `{entry}`: {source}")]
    Json {
        entry: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid array shape for `{entry}`: {source}")]
    Shape {
        entry: String,
        #[source]
        source: ndarray::ShapeError,
    },
}

impl SweepError {
    pub fn missing(entry: impl Into<String>) -> Self {
        SweepError::MissingEntry {
            entry: entry.into(),
        }
    }

    pub fn shape_mismatch(entry: impl Into<String>, expected: usize, found: usize) -> Self {
        SweepError::ShapeMismatch {
            entry: entry.into(),
            expected,
            found,
        }
    }

    pub fn io(entry: impl Into<String>, source: std::io::Error) -> Self {
        SweepError::Io {
            entry: entry.into(),
            source,
        }
    }

    pub fn shape(entry: impl Into<String>, source: ndarray::ShapeError) -> Self {
        SweepError::Shape {
            entry: entry.into(),
            source,
        }
    }

    /// Name of the entry or file the error is attached to, if any.
    pub fn entry(&self) -> Option<String> {
        match self {
            SweepError::MissingSource { path } => Some(path.display().to_string()),
            SweepError::MissingEntry { entry }
            | SweepError::ShapeMismatch { entry, .. }
            | SweepError::Encoding { entry, .. }
            | SweepError::Io { entry, .. }
            | SweepError::Archive { entry, .. }
            | SweepError::NpyRead { entry, .. }
            | SweepError::NpyWrite { entry, .. }
            | SweepError::Json { entry, .. }
            | SweepError::Shape { entry, .. } => Some(entry.clone()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_is_attached() {
        let err = SweepError::shape_mismatch("param2", 10, 9);
        assert_eq!(err.entry().as_deref(), Some("param2"));
        assert_eq!(
            err.to_string(),
            "shape mismatch in `param2`: expected 10, found 9"
        );

        let err = SweepError::MissingSource {
            path: PathBuf::from("data/missing.npz"),
        };
        assert_eq!(err.entry().as_deref(), Some("data/missing.npz"));
    }

    #[test]
    fn test_array_shape_error_names_its_entry() {
        let source = ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape);
        let err = SweepError::shape("nm", source);
        assert_eq!(err.entry().as_deref(), Some("nm"));
        assert!(err.to_string().starts_with("invalid array shape for `nm`"));
    }
}
