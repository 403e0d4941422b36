// src/core/walker.rs
use crate::core::document::{Block, DocxDocument, Table, VAlign};
use crate::core::rewrite::rewrite_paragraph;
use crate::placeholders::PlaceholderMap;
use log::debug;

/// Walk every paragraph reachable from the document body and rewrite its
/// placeholders: top-level paragraphs first, then tables in document order.
///
/// Table traversal is depth-first with no depth limit: each cell's blocks are
/// visited in order, recursing into nested tables wherever they appear. Every
/// visited cell gets its vertical alignment normalized to center, whether or
/// not a substitution fired in it.
pub fn apply_placeholders(doc: &mut DocxDocument, placeholders: &PlaceholderMap) {
    let mut visited = 0usize;
    for block in &mut doc.blocks {
        walk_block(block, placeholders, &mut visited);
    }
    debug!("walker visited {} paragraphs", visited);
}

fn walk_block(block: &mut Block, placeholders: &PlaceholderMap, visited: &mut usize) {
    match block {
        Block::Paragraph(para) => {
            rewrite_paragraph(para, placeholders);
            *visited += 1;
        }
        Block::Table(table) => walk_table(table, placeholders, visited),
        Block::Raw(_) => {}
    }
}

fn walk_table(table: &mut Table, placeholders: &PlaceholderMap, visited: &mut usize) {
    for row in &mut table.rows {
        for cell in &mut row.cells {
            for block in &mut cell.blocks {
                walk_block(block, placeholders, visited);
            }
            cell.valign = Some(VAlign::Center);
        }
    }
}
