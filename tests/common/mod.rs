#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/><Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/></Types>"#;

pub const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

pub const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/><Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/></Relationships>"#;

const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

pub fn document_xml(paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document {W_NS}><w:body>{paragraphs}<w:sectPr/></w:body></w:document>"#
    )
}

pub fn header_xml(paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr {W_NS}>{paragraphs}</w:hdr>"#
    )
}

pub fn footer_xml(paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr {W_NS}>{paragraphs}</w:ftr>"#
    )
}

/// One paragraph holding one run with attributes, the way Word saves them.
pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r w:rsidRPr="00A1"><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

/// Parts of a test package. `None` leaves the part out of the zip.
pub struct Fixture {
    pub body: Option<String>,
    pub relationships: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub content_types: Option<String>,
}

impl Fixture {
    pub fn with_body(paragraphs: &str) -> Self {
        Self {
            body: Some(document_xml(paragraphs)),
            relationships: Some(DOCUMENT_RELS.to_string()),
            header: Some(header_xml(&paragraph("Header text"))),
            footer: Some(footer_xml(&paragraph("Footer text"))),
            content_types: Some(CONTENT_TYPES.to_string()),
        }
    }

    /// Use `xml` as the whole body part, without the usual wrapper.
    pub fn raw_body(mut self, xml: &str) -> Self {
        self.body = Some(xml.to_string());
        self
    }

    pub fn header(mut self, paragraphs: &str) -> Self {
        self.header = Some(header_xml(paragraphs));
        self
    }

    pub fn footer(mut self, paragraphs: &str) -> Self {
        self.footer = Some(footer_xml(paragraphs));
        self
    }

    pub fn without_header_footer(mut self) -> Self {
        self.header = None;
        self.footer = None;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut entries: Vec<(&str, &str)> = Vec::new();
        if let Some(types) = &self.content_types {
            entries.push(("[Content_Types].xml", types.as_str()));
        }
        entries.push(("_rels/.rels", PACKAGE_RELS));
        if let Some(body) = &self.body {
            entries.push(("word/document.xml", body.as_str()));
        }
        if let Some(rels) = &self.relationships {
            entries.push(("word/_rels/document.xml.rels", rels.as_str()));
        }
        if let Some(header) = &self.header {
            entries.push(("word/header1.xml", header.as_str()));
        }
        if let Some(footer) = &self.footer {
            entries.push(("word/footer1.xml", footer.as_str()));
        }

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let path = dir.join("input.docx");
        fs::write(&path, self.to_bytes()).unwrap();
        path
    }
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::new(width, height).save(&path).unwrap();
    path
}

/// Read an entry straight from the file on disk, bypassing the crate.
pub fn read_entry(docx: &Path, name: &str) -> Option<String> {
    let mut zip = zip::ZipArchive::new(fs::File::open(docx).unwrap()).unwrap();
    let mut entry = zip.by_name(name).ok()?;
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    Some(content)
}

pub fn entry_names(docx: &Path) -> Vec<String> {
    let zip = zip::ZipArchive::new(fs::File::open(docx).unwrap()).unwrap();
    zip.file_names().map(String::from).collect()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
