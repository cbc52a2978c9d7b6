use super::{DeckError, DeckFormat, DeckText, MIN_DECK_CHARS};
use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, info};

const DRAWINGML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Reads the text layer of a deck and checks there is enough of it to analyse
pub fn extract_deck_text(path: &Path) -> Result<DeckText, DeckError> {
    if !path.exists() {
        return Err(DeckError::NotFound(path.to_path_buf()));
    }

    let format = DeckFormat::from_path(path)?;
    debug!(path = %path.display(), format = format.as_str(), "Extracting deck text");

    let text = match format {
        DeckFormat::Pdf => {
            pdf_extract::extract_text(path).map_err(|e| DeckError::Pdf(e.to_string()))?
        }
        DeckFormat::Pptx => extract_pptx_text(File::open(path)?)?,
        DeckFormat::Text => fs::read_to_string(path)?,
    };

    let found = text.trim().chars().count();
    if found < MIN_DECK_CHARS {
        return Err(DeckError::InsufficientText {
            found,
            required: MIN_DECK_CHARS,
        });
    }

    info!(
        chars = text.chars().count(),
        format = format.as_str(),
        "Extracted deck text"
    );

    Ok(DeckText {
        source: path.to_path_buf(),
        format,
        text,
    })
}

fn slide_number(entry: &str) -> Option<u32> {
    entry
        .strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Collects the text of every slide in a `.pptx` container, in slide order.
///
/// Each DrawingML paragraph becomes one line; slides are separated by a blank
/// line.
pub fn extract_pptx_text<R: Read + Seek>(reader: R) -> Result<String, DeckError> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| DeckError::Pptx(e.to_string()))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(n, _)| *n);

    if slides.is_empty() {
        return Err(DeckError::Pptx("no slides found in presentation".to_string()));
    }

    let mut sections = Vec::with_capacity(slides.len());
    for (number, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| DeckError::Pptx(e.to_string()))?
            .read_to_string(&mut xml)?;

        let doc = roxmltree::Document::parse(&xml)
            .map_err(|e| DeckError::Pptx(format!("slide {}: {}", number, e)))?;

        let lines: Vec<String> = doc
            .descendants()
            .filter(|n| n.has_tag_name((DRAWINGML_NS, "p")))
            .map(|p| {
                p.descendants()
                    .filter(|n| n.has_tag_name((DRAWINGML_NS, "t")))
                    .filter_map(|t| t.text())
                    .collect::<String>()
            })
            .filter(|line| !line.trim().is_empty())
            .collect();

        if !lines.is_empty() {
            sections.push(lines.join("\n"));
        }
    }

    Ok(sections.join("\n\n"))
}
