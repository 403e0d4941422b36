// src/core/document.rs
//
// In-memory model of `word/document.xml`. Content the engine never rewrites is
// kept as raw XML slices of the source so it round-trips byte-identically;
// only rewritten paragraphs and cell vertical alignment are regenerated.

/// A parsed `word/document.xml`: the XML up to and including the `w:body`
/// open tag, followed by the body's block-level children in document order.
#[derive(Debug, Clone)]
pub struct DocxDocument {
    pub prefix: String,
    pub blocks: Vec<Block>,
}

/// Block-level body content. `Raw` carries elements the engine does not model
/// (section properties, bookmarks at body level) verbatim.
#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct Paragraph {
    /// The whole `w:p` element as read from the source. Serialized verbatim
    /// until a rewrite fires, at which point it is dropped and the paragraph
    /// is regenerated from `props` and `content`.
    pub raw: Option<String>,
    /// Raw `w:pPr` element, preserved verbatim.
    pub props: Option<String>,
    pub content: Vec<Inline>,
}

/// Paragraph-level content. Non-run children (hyperlinks, proofing marks)
/// round-trip as `Raw` while the paragraph is untouched; a rewrite replaces
/// the whole content list with a single run.
#[derive(Debug, Clone)]
pub enum Inline {
    Run(Run),
    Raw(String),
}

/// An atomic span of text sharing one style. `raw` holds the source XML for
/// runs read from the template; freshly created runs have no `raw` and are
/// serialized from `text` and `style`.
#[derive(Debug, Clone)]
pub struct Run {
    pub raw: Option<String>,
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn new(text: String) -> Self {
        Self {
            raw: None,
            text,
            style: RunStyle::default(),
        }
    }
}

/// Run-level formatting. Sizes are in half-points, colors are hex strings
/// without the leading `#`, matching the OOXML attribute values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStyle {
    pub font: Option<String>,
    pub east_asia_font: Option<String>,
    pub size: Option<u32>,
    pub color: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Table {
    /// Raw `w:tblPr` / `w:tblGrid` elements, in source order.
    pub props: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone)]
pub struct Row {
    /// Raw non-cell children (`w:trPr`, bookmarks), in source order.
    pub props: Vec<String>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone)]
pub struct Cell {
    /// Raw `w:tcPr` children except `w:vAlign`, which is modeled separately
    /// because the walker owns it.
    pub props: Vec<String>,
    pub valign: Option<VAlign>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

impl VAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VAlign::Top => "top",
            VAlign::Center => "center",
            VAlign::Bottom => "bottom",
        }
    }

    pub fn parse(val: &str) -> Option<Self> {
        match val {
            "top" => Some(VAlign::Top),
            "center" => Some(VAlign::Center),
            "bottom" => Some(VAlign::Bottom),
            _ => None,
        }
    }
}

impl Paragraph {
    /// Concatenation of all run texts, the text placeholder matching runs on.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for inline in &self.content {
            if let Inline::Run(run) = inline {
                text.push_str(&run.text);
            }
        }
        text
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Raw(_) => None,
        })
    }

    pub fn run_count(&self) -> usize {
        self.runs().count()
    }
}

impl Cell {
    /// Text of the cell's direct paragraphs, joined with newlines. Nested
    /// table text is not included; pruning decisions look at the cell's own
    /// paragraphs only.
    pub fn text(&self) -> String {
        let parts: Vec<String> = self
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(p) => Some(p.text()),
                _ => None,
            })
            .collect();
        parts.join("\n")
    }
}

impl DocxDocument {
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }
}
