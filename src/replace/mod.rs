//! Locating and replacing whole runs in raw WordprocessingML.
//!
//! Works on the markup text directly. A run is everything from an opening
//! run tag to the next closing run tag, and a run only qualifies when the
//! target text lies entirely between the two.

pub mod text;

use crate::config::RunMarkers;

/// Byte range of one run, from `<w:r` through `</w:r>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSpan {
    pub start: usize,
    pub end: usize,
}

impl RunSpan {
    pub fn as_str<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }
}

fn opens_run(rest: &[u8], open: &[u8]) -> bool {
    rest.starts_with(open)
        && rest
            .get(open.len())
            .is_some_and(|&b| b == b'>' || b.is_ascii_whitespace())
}

/// Find the leftmost innermost run containing `target`.
pub fn locate(document: &str, target: &str, markers: &RunMarkers) -> Option<RunSpan> {
    locate_from(document, target, markers, 0)
}

/// Like [`locate`], ignoring everything before byte `offset`.
pub fn locate_from(
    document: &str,
    target: &str,
    markers: &RunMarkers,
    offset: usize,
) -> Option<RunSpan> {
    if target.is_empty() {
        log::warn!("Refusing to locate an empty target");
        return None;
    }
    let bytes = document.as_bytes();
    let open = markers.open.as_bytes();
    let close = markers.close.as_bytes();
    let needle = target.as_bytes();

    let mut run_start: Option<usize> = None;
    // End offset of the first target occurrence inside the current run.
    let mut target_end: Option<usize> = None;

    for i in offset..bytes.len() {
        let rest = &bytes[i..];
        if opens_run(rest, open) {
            run_start = Some(i);
            target_end = None;
        }
        if run_start.is_some() && target_end.is_none() && rest.starts_with(needle) {
            target_end = Some(i + needle.len());
        }
        if rest.starts_with(close) {
            if let (Some(start), Some(end)) = (run_start, target_end)
                && end <= i
            {
                return Some(RunSpan {
                    start,
                    end: i + close.len(),
                });
            }
            run_start = None;
            target_end = None;
        }
    }
    None
}

/// Replace every run containing `target` with `replacement`.
///
/// Each located run is substituted at its first literal occurrence in the
/// document, which is not necessarily the located position when the same
/// run markup appears more than once.
pub fn replace_all(
    document: &str,
    target: &str,
    replacement: &str,
    markers: &RunMarkers,
) -> String {
    let mut doc = document.to_string();
    // A replacement that contains the target would be found again forever;
    // in that case resume scanning after what was just inserted.
    let resume = !target.is_empty() && replacement.contains(target);
    let mut offset = 0;
    let mut replaced = 0usize;

    while let Some(span) = locate_from(&doc, target, markers, offset) {
        let block = span.as_str(&doc).to_string();
        let search_from = if resume { offset } else { 0 };
        let Some(at) = doc[search_from..].find(&block).map(|p| p + search_from) else {
            break;
        };
        doc.replace_range(at..at + block.len(), replacement);
        replaced += 1;
        if resume {
            offset = at + replacement.len();
        }
    }

    log::debug!("Replaced {replaced} run(s) containing {target:?}");
    doc
}
