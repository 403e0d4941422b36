pub mod core {
    pub mod document;
    pub mod prune;
    pub mod rewrite;
    pub mod walker;
}

pub mod assembler;
pub mod catalog;
pub mod docx_reader;
pub mod docx_writer;
pub mod error;
pub mod placeholders;
pub mod pricing;

pub use assembler::{build_placeholders, output_file_name, Assembler, GeneratedProposal, ProposalRequest};
pub use catalog::{ProposalCatalog, ProposalConfig};
pub use crate::core::document::DocxDocument;
pub use crate::core::prune::PrunePolicy;
pub use error::ProposalError;
pub use placeholders::PlaceholderMap;
pub use pricing::Currency;
