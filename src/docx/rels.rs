use crate::error::Error;
use crate::replace::text::escape_attr;

use super::append_to_root;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

fn relationship_nodes<'a, 'input>(
    xml: &'a roxmltree::Document<'input>,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    xml.root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
}

/// All relationships in a `.rels` part, in document order.
pub fn parse_relationships(xml_content: &str) -> Result<Vec<Relationship>, Error> {
    let xml = roxmltree::Document::parse(xml_content)?;
    Ok(relationship_nodes(&xml)
        .map(|n| Relationship {
            id: n.attribute("Id").unwrap_or_default().to_string(),
            rel_type: n.attribute("Type").unwrap_or_default().to_string(),
            target: n.attribute("Target").unwrap_or_default().to_string(),
        })
        .collect())
}

/// Numeric part of an id like `rId12`: the first run of digits, 0 if none.
fn id_number(id: &str) -> Result<u64, Error> {
    let digits: String = id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse()
        .map_err(|_| Error::ManifestParse(format!("relationship id {id} is out of range")))
}

/// Append a relationship with the next free `rId` and return the updated
/// part together with the new id.
pub fn register(
    xml_content: &str,
    rel_type: &str,
    target: &str,
) -> Result<(String, String), Error> {
    let xml = roxmltree::Document::parse(xml_content)?;

    let mut max: Option<u64> = None;
    for node in relationship_nodes(&xml) {
        let n = id_number(node.attribute("Id").unwrap_or_default())?;
        max = Some(max.map_or(n, |m| m.max(n)));
    }
    let max = max.ok_or_else(|| Error::ManifestParse("no existing relationships".into()))?;
    let next = max
        .checked_add(1)
        .ok_or_else(|| Error::ManifestParse("relationship ids exhausted".into()))?;

    let id = format!("rId{next}");
    let entry = format!(
        r#"<Relationship Id="{id}" Type="{}" Target="{}"/>"#,
        escape_attr(rel_type),
        escape_attr(target)
    );
    let updated = append_to_root(xml_content, &xml, &entry)
        .ok_or_else(|| Error::ManifestParse("relationships element has no closing tag".into()))?;

    log::debug!("Registered {id} -> {target}");
    Ok((updated, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/webSettings" Target="webSettings.xml"/><Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

    const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

    #[test]
    fn next_id_follows_maximum_not_last() {
        let (updated, id) = register(RELS, IMAGE, "media/a.png").unwrap();
        assert_eq!(id, "rId10");

        let rels = parse_relationships(&updated).unwrap();
        assert_eq!(rels.len(), 4);
        let added = rels.last().unwrap();
        assert_eq!(added.id, "rId10");
        assert_eq!(added.rel_type, IMAGE);
        assert_eq!(added.target, "media/a.png");
    }

    #[test]
    fn existing_content_is_untouched() {
        let (updated, _) = register(RELS, IMAGE, "media/a.png").unwrap();
        let close = RELS.rfind("</Relationships>").unwrap();
        assert!(updated.starts_with(&RELS[..close]));
        assert!(updated.ends_with("</Relationships>"));
    }

    #[test]
    fn registering_twice_keeps_ids_unique() {
        let (once, first) = register(RELS, IMAGE, "media/a.png").unwrap();
        let (twice, second) = register(&once, IMAGE, "media/b.png").unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("rId10", "rId11"));

        let mut ids: Vec<String> = parse_relationships(&twice)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn target_is_escaped() {
        let (updated, _) = register(RELS, IMAGE, "media/a&b.png").unwrap();
        assert!(updated.contains(r#"Target="media/a&amp;b.png""#));
        let rels = parse_relationships(&updated).unwrap();
        assert_eq!(rels.last().unwrap().target, "media/a&b.png");
    }

    #[test]
    fn ids_without_digits_count_as_zero() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="custom" Type="t" Target="x"/></Relationships>"#;
        let (_, id) = register(xml, IMAGE, "media/a.png").unwrap();
        assert_eq!(id, "rId1");
    }

    #[test]
    fn malformed_manifest_is_rejected() {
        let err = register("<Relationships><Relationship", IMAGE, "media/a.png").unwrap_err();
        assert!(matches!(err, Error::ManifestParse(_)));
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;
        let err = register(xml, IMAGE, "media/a.png").unwrap_err();
        assert!(matches!(err, Error::ManifestParse(_)));
    }
}
