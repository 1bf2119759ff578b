use crate::docx::fragment::ImageTemplate;

pub const IMAGE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Where the parts this crate touches live inside the package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageLayout {
    pub relationships: String,
    pub document: String,
    pub header: String,
    pub footer: String,
    /// Directory for inserted images, with trailing slash.
    pub media_dir: String,
    pub content_types: String,
}

impl Default for PackageLayout {
    fn default() -> Self {
        Self {
            relationships: "word/_rels/document.xml.rels".into(),
            document: "word/document.xml".into(),
            header: "word/header1.xml".into(),
            footer: "word/footer1.xml".into(),
            media_dir: "word/media/".into(),
            content_types: "[Content_Types].xml".into(),
        }
    }
}

impl PackageLayout {
    /// Relationship target for a media file, relative to the document part.
    pub(crate) fn media_target(&self, file_name: &str) -> String {
        let dir = self.media_dir.trim_matches('/');
        let doc_dir = self.document.rsplit_once('/').map(|(d, _)| d).unwrap_or("");
        if doc_dir.is_empty() {
            return if dir.is_empty() {
                file_name.to_string()
            } else {
                format!("{dir}/{file_name}")
            };
        }
        match dir.strip_prefix(doc_dir) {
            Some("") => file_name.to_string(),
            Some(rest) if rest.starts_with('/') => format!("{}/{file_name}", &rest[1..]),
            // Not below the document's folder: use a package-absolute target.
            _ => format!("/{dir}/{file_name}"),
        }
    }
}

/// Literal markers that open and close a run.
///
/// `open` is the tag name with its `<`. It only counts when followed by
/// whitespace or `>`, so `<w:rPr>`, `<w:rFonts>` and self-closing `<w:r/>`
/// never start a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunMarkers {
    pub open: String,
    pub close: String,
}

impl Default for RunMarkers {
    fn default() -> Self {
        Self::for_tag("w:r")
    }
}

impl RunMarkers {
    pub fn for_tag(tag: &str) -> Self {
        Self {
            open: format!("<{tag}"),
            close: format!("</{tag}>"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub layout: PackageLayout,
    pub markers: RunMarkers,
    pub template: ImageTemplate,
}
