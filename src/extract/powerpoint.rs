//! PowerPoint (.pptx) extraction: OOXML package, `ppt/slides/slideN.xml`.

use std::io::Cursor;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::word::{collect_media, read_entry};
use super::Extractor;
use crate::error::{Error, Result};
use crate::model::{ImageAsset, RawUnit};

/// Extractor for presentations.
///
/// One unit per slide, ordered by slide number; the unit text is every
/// non-empty text paragraph of the slide joined by newlines. Slides with
/// no text still produce a unit so that the boilerplate repeat fraction
/// is measured against the presentation's true slide count.
pub struct PowerPointExtractor;

impl Extractor for PowerPointExtractor {
    fn name(&self) -> &'static str {
        "powerpoint"
    }

    fn extract_text(&self, data: &[u8]) -> Result<Vec<RawUnit>> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut slides = slide_entries(&archive);
        if slides.is_empty() {
            return Err(Error::Corrupt(
                "not a PowerPoint package (no ppt/slides entries)".into(),
            ));
        }
        slides.sort_by_key(|(number, _)| *number);

        let mut units = Vec::with_capacity(slides.len());
        for (index, (_, name)) in slides.into_iter().enumerate() {
            let xml = read_entry(&mut archive, &name)?;
            let lines = parse_slide_xml(&xml)?;
            units.push(RawUnit::new(index, lines.join("\n")));
        }
        debug!("powerpoint: {} slides", units.len());
        Ok(units)
    }

    fn extract_images(&self, data: &[u8]) -> Vec<ImageAsset> {
        collect_media(data, "ppt/media/")
    }
}

/// Find slide XML entries and their slide numbers.
fn slide_entries<R: std::io::Read + std::io::Seek>(
    archive: &ZipArchive<R>,
) -> Vec<(usize, String)> {
    archive
        .file_names()
        .filter_map(|name| {
            let digits = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?;
            let number: usize = digits.parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect()
}

/// Collect the text of every non-empty `<a:p>` paragraph in a slide.
fn parse_slide_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.name().local_name().as_ref() == b"br" {
                    current.push('\n');
                }
            }
            Ok(Event::Text(ref t)) => {
                if in_text {
                    current.push_str(&t.unescape()?);
                }
            }
            Ok(Event::End(ref e)) => match e.name().local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    for line in current.split('\n') {
                        let line = line.trim();
                        if !line.is_empty() {
                            lines.push(line.to_string());
                        }
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

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn slide_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            r#"<?xml version="1.0"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            body
        )
    }

    fn pptx_bytes(slides: &[&[&str]]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        for (i, paragraphs) in slides.iter().enumerate() {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
                .unwrap();
            writer
                .write_all(slide_xml(paragraphs).as_bytes())
                .unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_one_unit_per_slide_in_order() {
        let data = pptx_bytes(&[&["Alpha", "Beta"], &["Gamma"], &[]]);
        let units = PowerPointExtractor.extract_text(&data).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].text, "Alpha\nBeta");
        assert_eq!(units[1].text, "Gamma");
        // text-less slides still count as units
        assert!(units[2].is_empty());
        assert_eq!(units[2].index, 2);
    }

    #[test]
    fn test_slide_number_ordering_beats_name_ordering() {
        // slide10 sorts before slide2 lexicographically but not numerically
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        for number in [10usize, 2, 1] {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", number), options)
                .unwrap();
            let label = format!("Slide {}", number);
            writer
                .write_all(slide_xml(&[label.as_str()]).as_bytes())
                .unwrap();
        }
        let data = writer.finish().unwrap().into_inner();

        let units = PowerPointExtractor.extract_text(&data).unwrap();
        assert_eq!(units[0].text, "Slide 1");
        assert_eq!(units[1].text, "Slide 2");
        assert_eq!(units[2].text, "Slide 10");
    }

    #[test]
    fn test_no_slides_is_corrupt() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        writer.start_file("ppt/presentation.xml", options).unwrap();
        writer.write_all(b"<p/>").unwrap();
        let data = writer.finish().unwrap().into_inner();

        assert!(matches!(
            PowerPointExtractor.extract_text(&data),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn test_rels_entries_ignored() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        writer.start_file("ppt/slides/slide1.xml", options).unwrap();
        writer.write_all(slide_xml(&["Only"]).as_bytes()).unwrap();
        writer
            .start_file("ppt/slides/_rels/slide1.xml.rels", options)
            .unwrap();
        writer.write_all(b"<r/>").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let units = PowerPointExtractor.extract_text(&data).unwrap();
        assert_eq!(units.len(), 1);
    }
}
