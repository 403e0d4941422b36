// src/core/prune.rs
use crate::core::document::{Block, Cell, DocxDocument, Table};
use serde::{Deserialize, Serialize};

/// Row-pruning strategy for dropping pricing rows left empty or zero after
/// substitution. Which policy applies is a property of the template family;
/// the two layouts put their value column in different places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrunePolicy {
    /// Skip rows whose first cell reads "description" (the header marker),
    /// then drop rows with more than two cells whose third cell is a
    /// zero-value sentinel.
    ValueColumn,
    /// Row 0 is the header and always survives; drop any other row whose
    /// last cell is empty.
    LastColumn,
}

/// Values a pricing cell renders as when the user left the line at zero or a
/// token went unresolved to nothing.
const ZERO_SENTINELS: [&str; 5] = ["", "$0", "\u{20b9}0", "0", "<<>>"];

/// Remove rows whose value cell came out empty after substitution. Rows are
/// marked during a full scan and removed afterwards in reverse order so
/// indices stay valid.
pub fn prune_empty_rows(table: &mut Table, policy: PrunePolicy) {
    let mut rows_to_remove: Vec<usize> = Vec::new();

    for (idx, row) in table.rows.iter().enumerate() {
        let remove = match policy {
            PrunePolicy::ValueColumn => {
                if first_cell_is_header(row.cells.first()) {
                    false
                } else if row.cells.len() > 2 {
                    let price = row.cells[2].text();
                    let price = price.trim();
                    ZERO_SENTINELS.contains(&price)
                } else {
                    false
                }
            }
            PrunePolicy::LastColumn => {
                if idx == 0 {
                    false
                } else {
                    match row.cells.last() {
                        Some(cell) => cell.text().trim().is_empty(),
                        None => false,
                    }
                }
            }
        };
        if remove {
            rows_to_remove.push(idx);
        }
    }

    for idx in rows_to_remove.into_iter().rev() {
        table.rows.remove(idx);
    }
}

fn first_cell_is_header(cell: Option<&Cell>) -> bool {
    match cell {
        Some(cell) => cell.text().trim().eq_ignore_ascii_case("description"),
        None => false,
    }
}

/// Delete whole paragraphs whose text contains any of the markers, in the
/// body and inside table cells at any depth. Used for tax-note lines when a
/// tax-exempt currency was chosen. Distinct from row pruning: this removes
/// paragraphs, not rows.
pub fn strip_marked_paragraphs(doc: &mut DocxDocument, markers: &[String]) {
    if markers.is_empty() {
        return;
    }
    strip_in_blocks(&mut doc.blocks, markers);
}

fn strip_in_blocks(blocks: &mut Vec<Block>, markers: &[String]) {
    blocks.retain(|block| match block {
        Block::Paragraph(para) => {
            let text = para.text();
            !markers.iter().any(|m| text.contains(m.as_str()))
        }
        _ => true,
    });
    for block in blocks {
        if let Block::Table(table) = block {
            for row in &mut table.rows {
                for cell in &mut row.cells {
                    strip_in_blocks(&mut cell.blocks, markers);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::{Inline, Paragraph, Row, Run};

    fn para(text: &str) -> Paragraph {
        Paragraph {
            raw: None,
            props: None,
            content: vec![Inline::Run(Run::new(text.to_string()))],
        }
    }

    fn cell(text: &str) -> Cell {
        Cell {
            props: Vec::new(),
            valign: None,
            blocks: vec![Block::Paragraph(para(text))],
        }
    }

    fn row(texts: &[&str]) -> Row {
        Row {
            props: Vec::new(),
            cells: texts.iter().map(|t| cell(t)).collect(),
        }
    }

    fn table(rows: Vec<Row>) -> Table {
        Table {
            props: Vec::new(),
            rows,
        }
    }

    #[test]
    fn last_column_policy_keeps_header_and_filled_rows() {
        let mut t = table(vec![
            row(&["Item", "Qty", "Price"]),
            row(&["Widget", "2", "$200"]),
            row(&["Gadget", "0", ""]),
        ]);
        prune_empty_rows(&mut t, PrunePolicy::LastColumn);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1].cells[0].text(), "Widget");
    }

    #[test]
    fn last_column_policy_never_removes_header_row() {
        let mut t = table(vec![row(&["Item", "Qty", ""]), row(&["Widget", "2", "$200"])]);
        prune_empty_rows(&mut t, PrunePolicy::LastColumn);
        assert_eq!(t.rows.len(), 2);
    }

    #[test]
    fn value_column_policy_removes_zero_sentinels() {
        let mut t = table(vec![
            row(&["Description", "Scope", "Price"]),
            row(&["SEO", "Monthly", "\u{20b9}0"]),
            row(&["Creative Posts", "Monthly", "\u{20b9}500"]),
            row(&["Email Marketing", "Monthly", "<<>>"]),
            row(&["Reporting", "Monthly", ""]),
        ]);
        prune_empty_rows(&mut t, PrunePolicy::ValueColumn);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].cells[0].text(), "Description");
        assert_eq!(t.rows[1].cells[0].text(), "Creative Posts");
    }

    #[test]
    fn value_column_policy_skips_description_header_case_insensitive() {
        let mut t = table(vec![row(&["DESCRIPTION", "x", ""])]);
        prune_empty_rows(&mut t, PrunePolicy::ValueColumn);
        assert_eq!(t.rows.len(), 1);
    }

    #[test]
    fn value_column_policy_ignores_short_rows() {
        let mut t = table(vec![row(&["Notes", ""])]);
        prune_empty_rows(&mut t, PrunePolicy::ValueColumn);
        assert_eq!(t.rows.len(), 1);
    }

    #[test]
    fn strips_marked_paragraphs_in_body_and_cells() {
        let mut doc = DocxDocument {
            prefix: String::new(),
            blocks: vec![
                Block::Paragraph(para("All prices attract 18% GST.")),
                Block::Paragraph(para("Thank you.")),
                Block::Table(table(vec![row(&["GST registration note", "keep me"])])),
            ],
        };
        strip_marked_paragraphs(&mut doc, &["GST".to_string()]);
        assert_eq!(doc.blocks.len(), 2);
        match &doc.blocks[1] {
            Block::Table(t) => {
                assert!(t.rows[0].cells[0].blocks.is_empty());
                assert_eq!(t.rows[0].cells[1].text(), "keep me");
            }
            _ => panic!("expected table"),
        }
    }
}
