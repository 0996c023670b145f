//! Asset map tokenizer and parser
//!
//! The map is parsed completely before anything is executed, so a malformed
//! line aborts the run before the decompiler is launched or any destination
//! file is touched.

use crate::scale::Scale;
use crate::{Error, Result};
use serde::Serialize;

/// A fully parsed asset map
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetMap {
    pub blocks: Vec<MappingBlock>,
}

/// One `<origin> -> <destination>` declaration and its directives
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingBlock {
    /// 1-based line of the mapping header
    pub line: usize,
    /// Archive path relative to the origin root
    pub origin: String,
    /// Directory relative to the destination root
    pub destination: String,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "lowercase")]
pub enum Directive {
    Shape(Vec<ShapeEntry>),
    Font(Vec<FontEntry>),
}

/// `<internal-name> = <output-name>[sx,sy]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeEntry {
    pub line: usize,
    pub internal_name: String,
    pub output_name: String,
    pub scale: Scale,
}

/// A bare font index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontEntry {
    pub line: usize,
    pub index: u32,
}

impl Directive {
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Shape(_) => "shape",
            Directive::Font(_) => "font",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Directive::Shape(entries) => entries.len(),
            Directive::Font(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classification of a single trimmed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Text,
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
    kind: LineKind,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }

    fn is_shape_entry(&self) -> bool {
        self.text.contains('=')
    }

    fn is_font_entry(&self) -> bool {
        !self.text.is_empty() && self.text.bytes().all(|b| b.is_ascii_digit())
    }
}

fn tokenize(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(i, raw)| {
            let text = raw.trim();
            Line {
                number: i + 1,
                text,
                kind: if text.is_empty() {
                    LineKind::Blank
                } else {
                    LineKind::Text
                },
            }
        })
        .collect()
}

/// Line cursor; the index only moves forward
struct Cursor<'a> {
    lines: Vec<Line<'a>>,
    index: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn skip_blank(&mut self) {
        while self.peek().is_some_and(|l| l.is_blank()) {
            self.advance();
        }
    }

    /// Next line if it is part of the current block (non-blank)
    fn peek_in_block(&self) -> Option<Line<'a>> {
        self.peek().filter(|l| !l.is_blank())
    }
}

/// Parse asset map text into its typed representation
pub fn parse(text: &str) -> Result<AssetMap> {
    let mut cursor = Cursor {
        lines: tokenize(text),
        index: 0,
    };
    let mut blocks = Vec::new();

    cursor.skip_blank();
    while let Some(line) = cursor.peek() {
        blocks.push(parse_mapping_block(&mut cursor, line)?);
        cursor.skip_blank();
    }

    Ok(AssetMap { blocks })
}

fn parse_mapping_block<'a>(cursor: &mut Cursor<'a>, header: Line<'a>) -> Result<MappingBlock> {
    let (origin, destination) = header
        .text
        .rsplit_once("->")
        .map(|(o, d)| (o.trim(), d.trim()))
        .ok_or_else(|| Error::MalformedMap {
            line: header.number,
            reason: format!("expected '<origin> -> <destination>', got '{}'", header.text),
        })?;

    if origin.is_empty() || destination.is_empty() {
        return Err(Error::MalformedMap {
            line: header.number,
            reason: "origin and destination must both be non-empty".to_string(),
        });
    }
    cursor.advance();

    let mut directives = Vec::new();
    while let Some(line) = cursor.peek_in_block() {
        directives.push(parse_directive(cursor, line)?);
    }

    Ok(MappingBlock {
        line: header.number,
        origin: origin.to_string(),
        destination: destination.to_string(),
        directives,
    })
}

fn parse_directive<'a>(cursor: &mut Cursor<'a>, header: Line<'a>) -> Result<Directive> {
    cursor.advance();
    match header.text {
        "shape" => {
            let mut entries = Vec::new();
            while let Some(line) = cursor.peek_in_block().filter(Line::is_shape_entry) {
                entries.push(parse_shape_entry(line)?);
                cursor.advance();
            }
            Ok(Directive::Shape(entries))
        }
        "font" => {
            let mut entries = Vec::new();
            while let Some(line) = cursor.peek_in_block().filter(Line::is_font_entry) {
                entries.push(parse_font_entry(line)?);
                cursor.advance();
            }
            Ok(Directive::Font(entries))
        }
        other => Err(Error::UnknownDirective {
            line: header.number,
            directive: other.to_string(),
        }),
    }
}

fn parse_shape_entry(line: Line<'_>) -> Result<ShapeEntry> {
    let malformed = |reason: &str| Error::MalformedMap {
        line: line.number,
        reason: reason.to_string(),
    };

    let (internal, output) = line
        .text
        .split_once('=')
        .ok_or_else(|| malformed("expected '<name> = <output>'"))?;
    let internal = internal.trim();
    let output = output.trim();

    let (output_name, scale) = match output.split_once('[') {
        Some((name, rest)) => {
            let inner = rest
                .strip_suffix(']')
                .ok_or_else(|| malformed("scale suffix must end with ']'"))?;
            (name.trim(), Scale::parse_pair(inner)?)
        }
        None => (output, Scale::IDENTITY),
    };

    if internal.is_empty() || output_name.is_empty() {
        return Err(malformed("shape name and output name must both be non-empty"));
    }

    Ok(ShapeEntry {
        line: line.number,
        internal_name: internal.to_string(),
        output_name: output_name.to_string(),
        scale,
    })
}

fn parse_font_entry(line: Line<'_>) -> Result<FontEntry> {
    let index = line.text.parse::<u32>().map_err(|e| Error::MalformedMap {
        line: line.number,
        reason: format!("bad font index '{}': {}", line.text, e),
    })?;
    Ok(FontEntry {
        line: line.number,
        index,
    })
}
