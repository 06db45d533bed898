// src/documents/loader.rs
use crate::utils::AppError;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// An official statement read from disk as text.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub path: PathBuf,
    pub text: String,
}

impl SourceDocument {
    /// Builds a document from in-memory text, normalizing line terminators.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            text: normalize_newlines(text).into_owned(),
        }
    }

    /// Lines in document order, each keeping its trailing `\n`.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split_inclusive('\n')
    }
}

/// Converts `\r\n` and lone `\r` terminators to `\n`, the way text-mode reads do.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Reads a document as text. The document name is the file name.
///
/// Invalid UTF-8 is replaced rather than rejected; many official statements
/// come out of PDF converters with stray bytes.
pub async fn load_document(path: impl AsRef<Path>) -> Result<SourceDocument, AppError> {
    let path = path.as_ref();
    tracing::debug!("Reading document: {}", path.display());

    let bytes = tokio::fs::read(path).await?;
    let text = String::from_utf8_lossy(&bytes);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(SourceDocument {
        name,
        path: path.to_path_buf(),
        text: normalize_newlines(&text).into_owned(),
    })
}
