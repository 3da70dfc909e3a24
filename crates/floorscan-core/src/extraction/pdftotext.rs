use crate::error::FloorscanError;
use crate::extraction::{PageExtractor, PageText};
use crate::model::TextSpan;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Runs `pdftotext -bbox-layout`, which reports every layout line and word
/// with its bounding box in PDF points.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageText>, FloorscanError> {
        let mut tmpfile = tempfile::NamedTempFile::new()
            .map_err(|e| FloorscanError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| FloorscanError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FloorscanError::PdftotextNotFound
                } else {
                    FloorscanError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(FloorscanError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_xml(&xml)?;
        tracing::debug!(pages = pages.len(), "extracted pages with pdftotext");
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

struct OpenLine {
    bbox: [f64; 4],
    words: Vec<String>,
}

struct OpenWord {
    bbox: [f64; 4],
    text: String,
}

/// Parse the XHTML written by `pdftotext -bbox-layout`.
///
/// Pages are numbered by their order in the document. Each `<line>` becomes a
/// span whose text is its words joined by spaces; each `<word>` becomes a word
/// box. Lines and words with no text are dropped.
pub fn parse_bbox_xml(xml: &str) -> Result<Vec<PageText>, FloorscanError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageText> = Vec::new();
    let mut line: Option<OpenLine> = None;
    let mut word: Option<OpenWord> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => start_page(&mut pages),
                b"line" => {
                    line = Some(OpenLine {
                        bbox: bbox_attrs(&e)?,
                        words: Vec::new(),
                    })
                }
                b"word" => {
                    word = Some(OpenWord {
                        bbox: bbox_attrs(&e)?,
                        text: String::new(),
                    })
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"page" {
                    start_page(&mut pages);
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(open) = word.as_mut() {
                    let text = e.unescape().map_err(|e| {
                        FloorscanError::Extraction(format!("bad text in pdftotext output: {e}"))
                    })?;
                    open.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"word" => {
                    if let (Some(open), Some(page)) = (word.take(), pages.last_mut()) {
                        let text = open.text.trim();
                        if !text.is_empty() {
                            let [x0, y0, x1, y1] = open.bbox;
                            page.words.push(TextSpan::new(text, x0, y0, x1, y1));
                            if let Some(l) = line.as_mut() {
                                l.words.push(text.to_string());
                            }
                        }
                    }
                }
                b"line" => {
                    if let (Some(open), Some(page)) = (line.take(), pages.last_mut()) {
                        if !open.words.is_empty() {
                            let [x0, y0, x1, y1] = open.bbox;
                            page.spans.push(TextSpan::new(open.words.join(" "), x0, y0, x1, y1));
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FloorscanError::Extraction(format!(
                    "malformed pdftotext output at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(pages)
}

fn start_page(pages: &mut Vec<PageText>) {
    pages.push(PageText {
        page_number: pages.len() + 1,
        ..Default::default()
    });
}

fn bbox_attrs(e: &BytesStart<'_>) -> Result<[f64; 4], FloorscanError> {
    let mut bbox = [None; 4];
    for attr in e.attributes().flatten() {
        let slot = match attr.key.as_ref() {
            b"xMin" => 0,
            b"yMin" => 1,
            b"xMax" => 2,
            b"yMax" => 3,
            _ => continue,
        };
        bbox[slot] = std::str::from_utf8(&attr.value)
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite());
    }
    match bbox {
        [Some(x0), Some(y0), Some(x1), Some(y1)] => Ok([x0, y0, x1, y1]),
        _ => Err(FloorscanError::Extraction(format!(
            "<{}> element without a complete bounding box",
            String::from_utf8_lossy(e.name().as_ref())
        ))),
    }
}
