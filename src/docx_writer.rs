// src/docx_writer.rs
use crate::core::document::{Block, Cell, DocxDocument, Inline, Paragraph, Row, Run, Table};
use crate::docx_reader::Template;
use crate::error::ProposalError;
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Serialize the model back to `document.xml` text. Untouched content is
/// emitted from its captured source slices, so a walk that changed nothing
/// reproduces the input byte for byte.
pub fn serialize_document(doc: &DocxDocument) -> String {
    let mut out = String::with_capacity(doc.prefix.len() * 4);
    out.push_str(&doc.prefix);
    for block in &doc.blocks {
        write_block(&mut out, block);
    }
    out.push_str("</w:body></w:document>");
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(para) => write_paragraph(out, para),
        Block::Table(table) => write_table(out, table),
        Block::Raw(raw) => out.push_str(raw),
    }
}

fn write_paragraph(out: &mut String, para: &Paragraph) {
    if let Some(raw) = &para.raw {
        out.push_str(raw);
        return;
    }
    out.push_str("<w:p>");
    if let Some(props) = &para.props {
        out.push_str(props);
    }
    for inline in &para.content {
        match inline {
            Inline::Run(run) => write_run(out, run),
            Inline::Raw(raw) => out.push_str(raw),
        }
    }
    out.push_str("</w:p>");
}

fn write_run(out: &mut String, run: &Run) {
    if let Some(raw) = &run.raw {
        out.push_str(raw);
        return;
    }

    out.push_str("<w:r>");
    write_run_props(out, run);
    // Tabs and line breaks live as elements in the XML, not as characters.
    for (i, segment) in run.text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        for (j, piece) in segment.split('\t').enumerate() {
            if j > 0 {
                out.push_str("<w:tab/>");
            }
            if !piece.is_empty() {
                out.push_str(r#"<w:t xml:space="preserve">"#);
                out.push_str(&escape(piece));
                out.push_str("</w:t>");
            }
        }
    }
    out.push_str("</w:r>");
}

fn write_run_props(out: &mut String, run: &Run) {
    let style = &run.style;
    if *style == Default::default() {
        return;
    }

    out.push_str("<w:rPr>");
    if style.font.is_some() || style.east_asia_font.is_some() {
        out.push_str("<w:rFonts");
        if let Some(font) = &style.font {
            let font = escape(font.as_str());
            out.push_str(&format!(r#" w:ascii="{}" w:hAnsi="{}""#, font, font));
        }
        if let Some(east_asia) = &style.east_asia_font {
            out.push_str(&format!(r#" w:eastAsia="{}""#, escape(east_asia.as_str())));
        }
        out.push_str("/>");
    }
    match style.bold {
        Some(true) => out.push_str("<w:b/>"),
        Some(false) => out.push_str(r#"<w:b w:val="false"/>"#),
        None => {}
    }
    match style.italic {
        Some(true) => out.push_str("<w:i/>"),
        Some(false) => out.push_str(r#"<w:i w:val="false"/>"#),
        None => {}
    }
    if let Some(color) = &style.color {
        out.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape(color.as_str())));
    }
    if let Some(size) = style.size {
        out.push_str(&format!(r#"<w:sz w:val="{}"/>"#, size));
    }
    out.push_str("</w:rPr>");
}

fn write_table(out: &mut String, table: &Table) {
    out.push_str("<w:tbl>");
    for prop in &table.props {
        out.push_str(prop);
    }
    for row in &table.rows {
        write_row(out, row);
    }
    out.push_str("</w:tbl>");
}

fn write_row(out: &mut String, row: &Row) {
    out.push_str("<w:tr>");
    for prop in &row.props {
        out.push_str(prop);
    }
    for cell in &row.cells {
        write_cell(out, cell);
    }
    out.push_str("</w:tr>");
}

fn write_cell(out: &mut String, cell: &Cell) {
    out.push_str("<w:tc>");
    if !cell.props.is_empty() || cell.valign.is_some() {
        out.push_str("<w:tcPr>");
        for prop in &cell.props {
            out.push_str(prop);
        }
        if let Some(valign) = cell.valign {
            out.push_str(&format!(r#"<w:vAlign w:val="{}"/>"#, valign.as_str()));
        }
        out.push_str("</w:tcPr>");
    }
    let mut has_paragraph = false;
    for block in &cell.blocks {
        if matches!(block, Block::Paragraph(_)) {
            has_paragraph = true;
        }
        write_block(out, block);
    }
    // A cell must end with a paragraph; stripping can leave one empty.
    if !has_paragraph {
        out.push_str("<w:p/>");
    }
    out.push_str("</w:tc>");
}

/// Repack the template container with the rewritten `document.xml`. Media
/// entries are stored uncompressed, everything else deflated, matching the
/// layout Word produces.
pub fn write_docx(template: &Template, document_xml: &str) -> Result<Vec<u8>, ProposalError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, data) in template.entries() {
        let method = if name.starts_with("word/media/") {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = FileOptions::default().compression_method(method);
        zip.start_file(name.as_str(), options)?;
        if name == "word/document.xml" {
            zip.write_all(document_xml.as_bytes())?;
        } else {
            zip.write_all(data)?;
        }
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
