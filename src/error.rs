// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Failures the assembler can surface. All are deterministic; none are worth
/// retrying internally. An unresolved placeholder is not an error: the token
/// stays in the output verbatim.
#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    #[error("unknown proposal kind: {0}")]
    UnknownProposal(String),

    #[error("placeholder {token} registered twice with conflicting values ({first:?} vs {second:?})")]
    DuplicatePlaceholder {
        token: String,
        first: String,
        second: String,
    },

    #[error("template has no word/document.xml part")]
    MissingDocumentPart,

    #[error("document.xml has no w:body element")]
    MissingBody,

    #[error("docx archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed document xml: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("document part is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
