use std::path::PathBuf;

/// Result alias carrying [`SketchError`].
pub type Result<T> = std::result::Result<T, SketchError>;

/// Everything that can go wrong while loading the sketch assets.
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A line of a BVH file could not be understood.
    #[error("bvh line {line}: {message}")]
    BvhSyntax { line: usize, message: String },
    /// The BVH file parsed but describes an unusable clip.
    #[error("bvh structure: {0}")]
    BvhStructure(String),
    #[error("audio decode: {0}")]
    Audio(#[from] hound::Error),
    #[error("image decode: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")]
    Message(String),
}

impl SketchError {
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::BvhSyntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
