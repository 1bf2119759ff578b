pub mod archive;
pub mod config;
pub mod docx;
mod error;
pub mod media;
pub mod replace;

pub use archive::{Archive, MemoryArchive, ZipFileArchive};
pub use config::{Config, PackageLayout, RunMarkers};
pub use docx::DocumentPackage;
pub use docx::fragment::{ImageTemplate, PX_TO_EMU};
pub use docx::rels::Relationship;
pub use error::Error;
pub use replace::RunSpan;

use std::path::Path;
use std::time::Instant;

/// Replace `from` with `to` in the header, footer and body of the DOCX at `path`.
pub fn replace_text_in_file(path: &Path, from: &str, to: &str) -> Result<(), Error> {
    let t0 = Instant::now();

    let mut package = DocumentPackage::open(path)?;
    let t_open = t0.elapsed();

    package.replace_text(from, to)?;
    package.close()?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: open={:.1}ms, replace={:.1}ms, total={:.1}ms ({})",
        t_open.as_secs_f64() * 1000.0,
        (t_total - t_open).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        path.display(),
    );

    Ok(())
}

/// Replace every body run containing `placeholder` with the image at `image`.
pub fn replace_text_with_image_in_file(
    path: &Path,
    placeholder: &str,
    image: &Path,
) -> Result<Option<String>, Error> {
    let t0 = Instant::now();

    let mut package = DocumentPackage::open(path)?;
    let t_open = t0.elapsed();

    let rel_id = package.replace_text_with_image(placeholder, image)?;
    package.close()?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: open={:.1}ms, replace={:.1}ms, total={:.1}ms ({})",
        t_open.as_secs_f64() * 1000.0,
        (t_total - t_open).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        path.display(),
    );

    Ok(rel_id)
}
