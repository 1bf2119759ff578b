pub mod content_types;
pub mod fragment;
pub mod rels;

use std::path::Path;

use crate::archive::{Archive, ZipFileArchive};
use crate::config::{Config, IMAGE_REL_TYPE};
use crate::error::Error;
use crate::media::{self, ImageFile, MEDIA_TOKEN_LEN};
use crate::replace::{self, text};

/// Insert `fragment` right before the closing tag of the root element.
/// `None` when the root element is self-closing.
fn append_to_root(
    xml_content: &str,
    xml: &roxmltree::Document,
    fragment: &str,
) -> Option<String> {
    let range = xml.root_element().range();
    let root_text = &xml_content[range.clone()];
    if root_text.ends_with("/>") {
        return None;
    }
    let at = range.start + root_text.rfind("</")?;
    let mut out = String::with_capacity(xml_content.len() + fragment.len());
    out.push_str(&xml_content[..at]);
    out.push_str(fragment);
    out.push_str(&xml_content[at..]);
    Some(out)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CaseMode {
    Sensitive,
    Insensitive,
}

/// An open DOCX package whose placeholders can be replaced.
///
/// Every write is committed to the underlying archive before the call that
/// made it returns. A failure partway through an operation leaves the parts
/// committed so far in place.
pub struct DocumentPackage<A: Archive = ZipFileArchive> {
    archive: A,
    config: Config,
}

impl DocumentPackage<ZipFileArchive> {
    /// Open the DOCX file at `path`, creating an empty package if it is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(ZipFileArchive::open(path, true)?))
    }
}

impl<A: Archive> DocumentPackage<A> {
    pub fn new(archive: A) -> Self {
        Self::with_config(archive, Config::default())
    }

    pub fn with_config(archive: A, config: Config) -> Self {
        Self { archive, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Commit and hand back the archive.
    pub fn close(mut self) -> Result<A, Error> {
        self.archive.commit()?;
        Ok(self.archive)
    }

    pub fn read_part(&mut self, name: &str) -> Result<Option<String>, Error> {
        let Some(bytes) = self.archive.read_entry(name)? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|source| Error::Utf8 {
                part: name.to_string(),
                source,
            })
    }

    fn write_part(&mut self, name: &str, content: String) -> Result<(), Error> {
        self.archive.write_entry(name, content.into_bytes())?;
        self.archive.commit()
    }

    /// Replace `from` with `to` in the header, footer and body, case-sensitively.
    ///
    /// Both arguments are plain text, not markup: `&`, `<` and `>` are escaped
    /// before matching, so pass `R&D`, not `R&amp;D`. Line breaks in `to`
    /// become Word line breaks.
    pub fn replace_text(&mut self, from: &str, to: &str) -> Result<(), Error> {
        self.replace_text_everywhere(from, to, CaseMode::Sensitive)
    }

    /// Same as [`replace_text`](Self::replace_text), ignoring ASCII case in `from`.
    /// Both arguments are plain text, escaped the same way.
    pub fn replace_text_insensitive(&mut self, from: &str, to: &str) -> Result<(), Error> {
        self.replace_text_everywhere(from, to, CaseMode::Insensitive)
    }

    fn replace_text_everywhere(
        &mut self,
        from: &str,
        to: &str,
        case: CaseMode,
    ) -> Result<(), Error> {
        if from.is_empty() {
            log::warn!("Ignoring replacement of empty text");
            return Ok(());
        }
        let from = text::escape_text(from);
        let to = text::to_markup(to);

        let layout = &self.config.layout;
        let parts = [
            layout.header.clone(),
            layout.footer.clone(),
            layout.document.clone(),
        ];
        for part in &parts {
            self.replace_text_in_part(part, &from, &to, case)?;
        }
        Ok(())
    }

    fn replace_text_in_part(
        &mut self,
        part: &str,
        from: &str,
        to: &str,
        case: CaseMode,
    ) -> Result<(), Error> {
        let Some(content) = self.read_part(part)? else {
            log::debug!("{part} not present, skipping");
            return Ok(());
        };
        let replaced = match case {
            CaseMode::Sensitive => content.replace(from, to),
            CaseMode::Insensitive => text::replace_ignore_ascii_case(&content, from, to),
        };
        if replaced == content {
            log::debug!("{part}: no occurrence of {from:?}");
            return Ok(());
        }
        log::debug!("{part}: replaced {from:?}");
        self.write_part(part, replaced)
    }

    /// Replace every body run that contains `placeholder` with the image at
    /// `image_path`, and return the new relationship id.
    ///
    /// Nothing is added when no body run contains `placeholder`: the call
    /// returns `None` and stores no media file and no relationship. Headers
    /// and footers are not scanned.
    ///
    /// The manifest and `[Content_Types].xml` updates are prepared before
    /// anything is written, so a malformed part fails the call without
    /// leaving a stray media entry behind.
    pub fn replace_text_with_image(
        &mut self,
        placeholder: &str,
        image_path: impl AsRef<Path>,
    ) -> Result<Option<String>, Error> {
        let image = ImageFile::load(image_path.as_ref())?;
        let layout = self.config.layout.clone();

        let body = self
            .read_part(&layout.document)?
            .ok_or_else(|| Error::MissingPart(layout.document.clone()))?;
        let target = text::escape_text(placeholder);
        if replace::locate(&body, &target, &self.config.markers).is_none() {
            log::warn!("No run in {} contains {placeholder:?}", layout.document);
            return Ok(None);
        }
        let manifest = self
            .read_part(&layout.relationships)?
            .ok_or_else(|| Error::MissingPart(layout.relationships.clone()))?;

        let file_name = self.unique_media_name(&image.extension);
        let media_path = format!("{}{}", layout.media_dir, file_name);
        let (manifest, rel_id) =
            rels::register(&manifest, IMAGE_REL_TYPE, &layout.media_target(&file_name))?;

        let types = match self.read_part(&layout.content_types)? {
            Some(types) => {
                content_types::ensure_default(&types, &image.extension, image.content_type())?
            }
            None => {
                log::warn!(
                    "{} not present, image content type not declared",
                    layout.content_types
                );
                None
            }
        };

        let (pixel_width, pixel_height) = (image.pixel_width, image.pixel_height);
        self.archive.write_entry(&media_path, image.data)?;
        if let Some(types) = types {
            self.archive
                .write_entry(&layout.content_types, types.into_bytes())?;
        }
        self.write_part(&layout.relationships, manifest)?;

        let block = self
            .config
            .template
            .render(&rel_id, pixel_width, pixel_height);
        let body = replace::replace_all(&body, &target, &block, &self.config.markers);
        self.write_part(&layout.document, body)?;

        log::info!(
            "Inserted {media_path} ({pixel_width}x{pixel_height}) as {rel_id} for {placeholder:?}"
        );
        Ok(Some(rel_id))
    }

    fn unique_media_name(&self, extension: &str) -> String {
        loop {
            let name = format!("{}.{extension}", media::random_token(MEDIA_TOKEN_LEN));
            let path = format!("{}{}", self.config.layout.media_dir, name);
            if !self.archive.contains_entry(&path) {
                return name;
            }
        }
    }
}
