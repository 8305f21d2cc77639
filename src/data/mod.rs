/// Data layer: glyph decoding, tolerant parsing, ingestion, aggregation.
///
/// Architecture:
/// ```text
///  .odt / .txt bytes
///        │
///        ▼
///   ┌──────────┐
///   │  ingest   │  extract raw records (paragraphs / lines)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  parse    │  decode glyphs (codec) → split → numeric rows + warnings
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  FileTable → Dataset (order-preserving merge, bounds)
///   └──────────┘
/// ```

pub mod codec;
pub mod ingest;
pub mod model;
pub mod parse;
