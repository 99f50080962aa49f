//! Word (.docx) extraction: OOXML package, `word/document.xml`.

use std::io::{Cursor, Read};

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{admit_image, Extractor};
use crate::error::{Error, Result};
use crate::model::{ImageAsset, RawUnit};

/// Extractor for Word processing documents.
///
/// The whole document is treated as one pseudo-page: all non-empty
/// paragraphs are joined into a single unit, so boilerplate repetition
/// is measured against the document as a whole. Legacy binary `.doc`
/// payloads are not OOXML packages and fail as corrupt.
pub struct WordExtractor;

impl Extractor for WordExtractor {
    fn name(&self) -> &'static str {
        "word"
    }

    fn extract_text(&self, data: &[u8]) -> Result<Vec<RawUnit>> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let xml = read_entry(&mut archive, "word/document.xml").map_err(|_| {
            Error::Corrupt("not a Word package (missing word/document.xml)".into())
        })?;

        let paragraphs = parse_document_xml(&xml)?;
        debug!("word: {} non-empty paragraphs", paragraphs.len());
        if paragraphs.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![RawUnit::new(0, paragraphs.join("\n"))])
    }

    fn extract_images(&self, data: &[u8]) -> Vec<ImageAsset> {
        collect_media(data, "word/media/")
    }
}

/// Read a named archive entry into a string.
pub(crate) fn read_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String> {
    let mut entry = archive.by_name(name)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

/// Pull every image payload under a media prefix (`word/media/`,
/// `ppt/media/`), best-effort.
pub(crate) fn collect_media(data: &[u8], prefix: &str) -> Vec<ImageAsset> {
    let mut archive = match ZipArchive::new(Cursor::new(data)) {
        Ok(a) => a,
        Err(e) => {
            warn!("image extraction skipped, unreadable package: {}", e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with(prefix))
        .map(|n| n.to_string())
        .collect();
    names.sort();

    let mut assets = Vec::new();
    for name in names {
        let mut bytes = Vec::new();
        match archive.by_name(&name) {
            Ok(mut entry) => {
                if let Err(e) = entry.read_to_end(&mut bytes) {
                    warn!("skipping unreadable media entry {}: {}", name, e);
                    continue;
                }
            }
            Err(e) => {
                warn!("skipping media entry {}: {}", name, e);
                continue;
            }
        }
        if let Some(asset) = admit_image(bytes, &name) {
            assets.push(asset);
        }
    }
    assets
}

/// Collect the text of every non-empty `<w:p>` paragraph.
fn parse_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                if in_text {
                    current.push_str(&t.unescape()?);
                }
            }
            Ok(Event::End(ref e)) => match e.name().local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let text = current.trim();
                    if !text.is_empty() {
                        paragraphs.push(text.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Split </w:t></w:r><w:r><w:t>run</w:t></w:r></w:p>
    <w:p><w:r><w:t>   </w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Last &amp; final</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_paragraphs_as_single_unit() {
        let data = docx_bytes(DOC_XML);
        let units = WordExtractor.extract_text(&data).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].index, 0);
        assert_eq!(
            units[0].text,
            "First paragraph\nSplit run\nLast & final"
        );
    }

    #[test]
    fn test_corrupt_container() {
        let result = WordExtractor.extract_text(b"this is not a zip archive");
        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_zip_without_document_xml() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        writer.start_file("other.xml", options).unwrap();
        writer.write_all(b"<x/>").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let result = WordExtractor.extract_text(&data);
        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_images_best_effort_on_garbage() {
        assert!(WordExtractor.extract_images(b"not a zip").is_empty());
    }

    #[test]
    fn test_empty_document_yields_no_units() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body/></w:document>"#;
        let units = WordExtractor.extract_text(&docx_bytes(xml)).unwrap();
        assert!(units.is_empty());
    }
}
