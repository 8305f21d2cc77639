use std::borrow::Cow;
use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Source ingestion: file kind dispatch → raw records
// ---------------------------------------------------------------------------

/// Why a whole file contributed no data. Surfaced per file; sibling files
/// continue unaffected.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("no usable data found in the file")]
    Empty,
    #[error("file is not valid {encoding}")]
    Encoding { encoding: &'static str },
    #[error("could not open document container: {0}")]
    Container(#[from] zip::result::ZipError),
    #[error("could not parse document content: {0}")]
    Document(#[from] quick_xml::Error),
    #[error("no row with a usable column layout (expected 1 or 2 numeric fields)")]
    UnsupportedColumnCount,
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// What the uploaded bytes are, inferred from the file-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// An OpenDocument text file; records are its paragraphs.
    StructuredDocument,
    /// Anything else; records are its non-blank lines.
    PlainText,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("odt") => FileKind::StructuredDocument,
            _ => FileKind::PlainText,
        }
    }
}

/// How plain-text bytes are turned into characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingMode {
    /// Strict UTF-8; any invalid sequence fails the whole file.
    Utf8,
    /// Strict windows-1252.
    Windows1252,
    /// Loss-tolerant single-byte decode, for exports where the substitution
    /// mangled bytes along with digits. Never fails.
    Lenient,
}

impl EncodingMode {
    pub const ALL: [EncodingMode; 3] =
        [EncodingMode::Utf8, EncodingMode::Windows1252, EncodingMode::Lenient];

    pub fn label(self) -> &'static str {
        match self {
            EncodingMode::Utf8 => "UTF-8",
            EncodingMode::Windows1252 => "Windows-1252",
            EncodingMode::Lenient => "Lenient (single-byte)",
        }
    }
}

/// Extract raw records from one file's bytes.
///
/// Structured documents yield their paragraph texts in document order;
/// plain text yields its non-blank lines under the selected decoding mode.
/// A file with zero records is an error.
pub fn read_records(bytes: &[u8], kind: FileKind, mode: EncodingMode) -> Result<Vec<String>, FileError> {
    let records = match kind {
        FileKind::StructuredDocument => document_paragraphs(bytes)?,
        FileKind::PlainText => {
            let text = decode_text(bytes, mode)?;
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        }
    };

    if records.is_empty() {
        return Err(FileError::Empty);
    }
    Ok(records)
}

fn decode_text(bytes: &[u8], mode: EncodingMode) -> Result<String, FileError> {
    match mode {
        EncodingMode::Utf8 => encoding_rs::UTF_8
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned)
            .ok_or(FileError::Encoding { encoding: "UTF-8" }),
        EncodingMode::Windows1252 => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned)
            .ok_or(FileError::Encoding { encoding: "windows-1252" }),
        EncodingMode::Lenient => {
            // Every byte has a windows-1252 interpretation, so this cannot fail.
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            Ok(text.into_owned())
        }
    }
}

// ---------------------------------------------------------------------------
// ODT extraction
// ---------------------------------------------------------------------------

/// Pull `content.xml` out of the ODT zip container and return the text of
/// each paragraph-level block.
fn document_paragraphs(bytes: &[u8]) -> Result<Vec<String>, FileError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("content.xml")?.read_to_string(&mut xml)?;
    extract_paragraphs(&xml)
}

/// Stream the text of every `text:p` / `text:h` block, in document order.
/// Inline markup (spans, links) is flattened; `text:s` and `text:tab`
/// become spaces so column boundaries survive the round trip.
fn extract_paragraphs(xml: &str) -> Result<Vec<String>, FileError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    // Nesting depth inside a paragraph block (ODT allows nested text:p
    // inside frames; only the outermost block becomes a record).
    let mut depth = 0usize;
    let mut current = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"text:p" | b"text:h" => {
                    if depth == 0 {
                        current.clear();
                    }
                    depth += 1;
                }
                b"text:s" | b"text:tab" if depth > 0 => current.push(' '),
                _ => {}
            },
            Event::Empty(e) => {
                if depth > 0 {
                    if let b"text:s" | b"text:tab" | b"text:line-break" = e.name().as_ref() {
                        current.push(' ');
                    }
                }
            }
            Event::Text(t) => {
                if depth > 0 {
                    current.push_str(&t.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::End(e) => {
                if let b"text:p" | b"text:h" = e.name().as_ref() {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let trimmed = current.trim();
                        if !trimmed.is_empty() {
                            paragraphs.push(trimmed.to_string());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Minimal ODT container: a zip holding a content.xml with the given
    /// paragraph bodies.
    fn sample_odt(paragraphs: &[&str]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        writer.start_file("mimetype", options).unwrap();
        writer
            .write_all(b"application/vnd.oasis.opendocument.text")
            .unwrap();

        writer.start_file("content.xml", options).unwrap();
        write!(writer, "<office:document-content><office:body><office:text>").unwrap();
        for p in paragraphs {
            write!(writer, "<text:p>{p}</text:p>").unwrap();
        }
        write!(writer, "</office:text></office:body></office:document-content>").unwrap();
        writer.finish().unwrap();

        cursor.into_inner()
    }

    #[test]
    fn plain_text_lines_become_records() {
        let bytes = b"190 85.3\n\n  200 84.1  \n";
        let records =
            read_records(bytes, FileKind::PlainText, EncodingMode::Utf8).unwrap();
        assert_eq!(records, vec!["190 85.3", "200 84.1"]);
    }

    #[test]
    fn invalid_utf8_fails_the_whole_file() {
        let bytes = [b'1', b'9', b'0', 0xFF, 0xFE, b'\n'];
        let err = read_records(&bytes, FileKind::PlainText, EncodingMode::Utf8).unwrap_err();
        assert!(matches!(err, FileError::Encoding { encoding: "UTF-8" }));
    }

    #[test]
    fn lenient_mode_accepts_any_bytes() {
        let bytes = [b'1', 0xB0, b' ', 0xFF, b'\n'];
        let records =
            read_records(&bytes, FileKind::PlainText, EncodingMode::Lenient).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], "1° ÿ");
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = read_records(b"\n \n", FileKind::PlainText, EncodingMode::Utf8).unwrap_err();
        assert!(matches!(err, FileError::Empty));
    }

    #[test]
    fn odt_paragraphs_become_records_in_document_order() {
        let bytes = sample_odt(&["1¹° µ¶®³", "", "2°° 84"]);
        let records =
            read_records(&bytes, FileKind::StructuredDocument, EncodingMode::Utf8).unwrap();
        assert_eq!(records, vec!["1¹° µ¶®³", "2°° 84"]);
    }

    #[test]
    fn odt_inline_markup_is_flattened() {
        let bytes = sample_odt(&["<text:span>190</text:span><text:tab/>85.3"]);
        let records =
            read_records(&bytes, FileKind::StructuredDocument, EncodingMode::Utf8).unwrap();
        assert_eq!(records, vec!["190 85.3"]);
    }

    #[test]
    fn non_zip_bytes_are_a_container_error() {
        let err = read_records(b"not a zip", FileKind::StructuredDocument, EncodingMode::Utf8)
            .unwrap_err();
        assert!(matches!(err, FileError::Container(_)));
    }

    #[test]
    fn file_kind_is_inferred_from_the_suffix() {
        assert_eq!(
            FileKind::from_path(Path::new("scan.ODT")),
            FileKind::StructuredDocument
        );
        assert_eq!(FileKind::from_path(Path::new("scan.txt")), FileKind::PlainText);
        assert_eq!(FileKind::from_path(Path::new("scan")), FileKind::PlainText);
    }
}
