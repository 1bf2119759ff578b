use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to open {}: {source}", path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("invalid relationship manifest: {0}")]
    ManifestParse(String),

    #[error("invalid [Content_Types].xml: {0}")]
    ContentTypesParse(String),

    #[error("unable to read image template {}: {source}", path.display())]
    MissingTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing part {0}")]
    MissingPart(String),

    #[error("part {part} is not valid UTF-8")]
    Utf8 {
        part: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ManifestParse(e.to_string())
    }
}
