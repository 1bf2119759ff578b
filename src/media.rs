use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::error::Error;

/// Length of the random part of an inserted media file name.
pub const MEDIA_TOKEN_LEN: usize = 10;

/// An image read from disk, ready to be stored in a package.
pub struct ImageFile {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Extension as found on the source path, or the format's usual one.
    pub extension: String,
}

impl ImageFile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::ImageNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;

        let mut reader = ImageReader::new(Cursor::new(data.as_slice())).with_guessed_format()?;
        let format = match reader.format() {
            Some(f) => f,
            None => {
                let f = ImageFormat::from_path(path)?;
                reader.set_format(f);
                f
            }
        };
        let (pixel_width, pixel_height) = reader.into_dimensions()?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .or_else(|| format.extensions_str().first().copied())
            .unwrap_or("bin")
            .to_string();

        log::debug!(
            "Loaded {} ({:?}, {}x{} px, {} bytes)",
            path.display(),
            format,
            pixel_width,
            pixel_height,
            data.len()
        );
        Ok(Self {
            data,
            format,
            pixel_width,
            pixel_height,
            extension,
        })
    }

    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
