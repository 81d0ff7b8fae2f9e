//! Plain-text document reader: one document per line.

use std::io::{BufRead, BufReader};
use std::{fs::File, path::Path};

use tracing::{debug, info};

use crate::errors::RagError;
use crate::record::Document;

/// Reads every line of a UTF-8 file as a [`Document`].
///
/// - Splits on `\n` and `\r\n`; line terminators are dropped.
/// - Keeps lines verbatim, blank ones included, so positions stay aligned
///   with line numbers.
/// - A trailing newline does not produce an extra empty document.
///
/// # Errors
/// - [`RagError::Io`] if the file is missing, unreadable or not valid UTF-8.
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<Document>, RagError> {
    info!(target: "rag_index::io", path = ?path.as_ref(), "reading documents");

    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for line in reader.lines() {
        out.push(Document::new(line?));
    }

    debug!(target: "rag_index::io", documents = out.len(), "documents loaded");
    Ok(out)
}
