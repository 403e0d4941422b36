// src/docx_reader.rs
use crate::core::document::{
    Block, Cell, DocxDocument, Inline, Paragraph, Row, Run, RunStyle, Table, VAlign,
};
use crate::error::ProposalError;
use memmap2::Mmap;
use roxmltree::Node;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Threshold above which templates are loaded through a memory map.
const MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

/// A loaded template container: every zip entry in archive order, so the
/// writer can repack the package with only `word/document.xml` replaced.
pub struct Template {
    path: PathBuf,
    entries: Vec<(String, Vec<u8>)>,
}

impl Template {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[(String, Vec<u8>)] {
        &self.entries
    }

    pub fn document_xml(&self) -> Result<String, ProposalError> {
        let (_, data) = self
            .entries
            .iter()
            .find(|(name, _)| name == "word/document.xml")
            .ok_or(ProposalError::MissingDocumentPart)?;
        Ok(String::from_utf8(data.clone())?)
    }
}

/// Open a template `.docx` and capture its entries. A missing file is the
/// recoverable `TemplateNotFound` case; anything else propagates. Large
/// templates go through a memory map instead of a buffered read.
pub fn load_template(path: &Path) -> Result<Template, ProposalError> {
    if !path.is_file() {
        return Err(ProposalError::TemplateNotFound {
            path: path.to_path_buf(),
        });
    }

    let file_size = std::fs::metadata(path)?.len();
    let bytes = if file_size > MMAP_THRESHOLD {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        mmap.to_vec()
    } else {
        std::fs::read(path)?
    };

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        entries.push((name, data));
    }

    Ok(Template {
        path: path.to_path_buf(),
        entries,
    })
}

/// Parse `word/document.xml` into the block model. Everything outside the
/// body, and every body child the engine does not rewrite, is captured as a
/// raw slice of the source text so serialization reproduces it exactly.
pub fn parse_document(xml: &str) -> Result<DocxDocument, ProposalError> {
    let tree = roxmltree::Document::parse(xml)?;
    let body = tree
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "body")
        .ok_or(ProposalError::MissingBody)?;

    let body_start = body.range().start;
    let open_end = xml[body_start..]
        .find('>')
        .map(|i| body_start + i + 1)
        .ok_or(ProposalError::MissingBody)?;
    let prefix = xml[..open_end].to_string();

    let mut blocks = Vec::new();
    for child in body.children() {
        if child.is_element() {
            match child.tag_name().name() {
                "p" => blocks.push(Block::Paragraph(parse_paragraph(child, xml))),
                "tbl" => blocks.push(Block::Table(parse_table(child, xml))),
                _ => blocks.push(Block::Raw(slice(child, xml))),
            }
        } else if !child.range().is_empty() {
            blocks.push(Block::Raw(slice(child, xml)));
        }
    }

    Ok(DocxDocument { prefix, blocks })
}

fn slice(node: Node, xml: &str) -> String {
    xml[node.range()].to_string()
}

fn parse_paragraph(node: Node, xml: &str) -> Paragraph {
    let mut props = None;
    let mut content = Vec::new();

    for child in node.children() {
        if child.is_element() {
            match child.tag_name().name() {
                "pPr" => props = Some(slice(child, xml)),
                "r" => content.push(Inline::Run(parse_run(child, xml))),
                _ => content.push(Inline::Raw(slice(child, xml))),
            }
        } else if !child.range().is_empty() {
            content.push(Inline::Raw(slice(child, xml)));
        }
    }

    Paragraph {
        raw: Some(slice(node, xml)),
        props,
        content,
    }
}

fn parse_run(node: Node, xml: &str) -> Run {
    let mut text = String::new();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "t" => {
                if let Some(t) = child.text() {
                    text.push_str(t);
                }
            }
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }

    Run {
        raw: Some(slice(node, xml)),
        text,
        style: parse_run_style(node),
    }
}

fn parse_run_style(run: Node) -> RunStyle {
    let mut style = RunStyle::default();

    let rpr = match run
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "rPr")
    {
        Some(rpr) => rpr,
        None => return style,
    };

    for child in rpr.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "rFonts" => {
                style.font = child.attribute((W_NS, "ascii")).map(|s| s.to_string());
                style.east_asia_font = child.attribute((W_NS, "eastAsia")).map(|s| s.to_string());
            }
            "b" => style.bold = Some(toggle_value(child)),
            "i" => style.italic = Some(toggle_value(child)),
            "sz" => {
                style.size = child
                    .attribute((W_NS, "val"))
                    .and_then(|v| v.parse::<u32>().ok());
            }
            "color" => {
                // "auto" is the engine default, not an explicit color.
                style.color = child
                    .attribute((W_NS, "val"))
                    .filter(|v| !v.eq_ignore_ascii_case("auto"))
                    .map(|s| s.to_string());
            }
            _ => {}
        }
    }

    style
}

/// OOXML on/off semantics: the bare element means true.
fn toggle_value(node: Node) -> bool {
    match node.attribute((W_NS, "val")) {
        Some("false") | Some("0") | Some("off") | Some("none") => false,
        _ => true,
    }
}

fn parse_table(node: Node, xml: &str) -> Table {
    let mut props = Vec::new();
    let mut rows = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "tr" => rows.push(parse_row(child, xml)),
            _ => props.push(slice(child, xml)),
        }
    }

    Table { props, rows }
}

fn parse_row(node: Node, xml: &str) -> Row {
    let mut props = Vec::new();
    let mut cells = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "tc" => cells.push(parse_cell(child, xml)),
            _ => props.push(slice(child, xml)),
        }
    }

    Row { props, cells }
}

fn parse_cell(node: Node, xml: &str) -> Cell {
    let mut props = Vec::new();
    let mut valign = None;
    let mut blocks = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "tcPr" => {
                for pr in child.children().filter(|n| n.is_element()) {
                    if pr.tag_name().name() == "vAlign" {
                        valign = pr.attribute((W_NS, "val")).and_then(VAlign::parse);
                    } else {
                        props.push(slice(pr, xml));
                    }
                }
            }
            "p" => blocks.push(Block::Paragraph(parse_paragraph(child, xml))),
            "tbl" => blocks.push(Block::Table(parse_table(child, xml))),
            _ => blocks.push(Block::Raw(slice(child, xml))),
        }
    }

    Cell {
        props,
        valign,
        blocks,
    }
}
