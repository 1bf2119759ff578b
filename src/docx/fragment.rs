use std::path::Path;

use crate::error::Error;

/// English Metric Units per pixel used for inserted images.
pub const PX_TO_EMU: u64 = 8625;

const DEFAULT_TEMPLATE: &str = include_str!("../../templates/image.xml");

/// Inline drawing run that shows one image.
///
/// Placeholders: `{RID}`, `{WIDTH}`, `{HEIGHT}` (EMU), plus `{DOCPR_ID}` and
/// `{NAME}` for the drawing object's properties.
#[derive(Clone, Debug)]
pub struct ImageTemplate {
    text: String,
    px_to_emu: u64,
}

impl Default for ImageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl ImageTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            px_to_emu: PX_TO_EMU,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::MissingTemplate {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text))
    }

    pub fn with_scale(mut self, px_to_emu: u64) -> Self {
        self.px_to_emu = px_to_emu;
        self
    }

    pub fn render(&self, rel_id: &str, pixel_width: u32, pixel_height: u32) -> String {
        let width = u64::from(pixel_width) * self.px_to_emu;
        let height = u64::from(pixel_height) * self.px_to_emu;
        let number: String = rel_id.chars().filter(|c| c.is_ascii_digit()).collect();
        let object_id = if number.is_empty() { "1" } else { number.as_str() };

        self.text
            .replace("{RID}", rel_id)
            .replace("{WIDTH}", &width.to_string())
            .replace("{HEIGHT}", &height.to_string())
            .replace("{DOCPR_ID}", object_id)
            .replace("{NAME}", &format!("Picture {object_id}"))
    }
}
