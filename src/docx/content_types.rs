use crate::error::Error;
use crate::replace::text::escape_attr;

use super::append_to_root;

/// Make sure `[Content_Types].xml` maps `extension` to a content type.
/// Returns `None` when a matching `Default` entry already exists.
pub fn ensure_default(
    xml_content: &str,
    extension: &str,
    content_type: &str,
) -> Result<Option<String>, Error> {
    let xml = roxmltree::Document::parse(xml_content)
        .map_err(|e| Error::ContentTypesParse(e.to_string()))?;

    let declared = xml.root_element().children().any(|n| {
        n.is_element()
            && n.tag_name().name() == "Default"
            && n.attribute("Extension")
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    });
    if declared {
        return Ok(None);
    }

    let entry = format!(
        r#"<Default Extension="{}" ContentType="{}"/>"#,
        escape_attr(&extension.to_ascii_lowercase()),
        escape_attr(content_type)
    );
    let updated = append_to_root(xml_content, &xml, &entry)
        .ok_or_else(|| Error::ContentTypesParse("Types element has no closing tag".into()))?;
    log::debug!("Declared content type {content_type} for .{extension}");
    Ok(Some(updated))
}
