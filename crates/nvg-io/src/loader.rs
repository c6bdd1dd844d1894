//! Loading NVG files into layers

use crate::reader::{NvgReader, ReadError};
use crate::tokenizer::TokenSource;
use nvg_core::config::LoaderConfig;
use nvg_data::{Element, FileInfo};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// The documents of one NVG file, as shown on a map.
#[derive(Debug, Clone, Serialize)]
pub struct NvgLayer {
    /// Layer name, taken from the file stem
    pub name: String,
    pub visible: bool,
    /// Top-level elements in the order they were read
    pub documents: Vec<Element>,
    /// Points counted across all documents
    pub message_count: u64,
}

impl NvgLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            documents: Vec::new(),
            message_count: 0,
        }
    }

    /// Adds a document and counts its points, leaving out empty ones when asked to.
    pub fn add_document(&mut self, document: Element, skip_empty_points: bool) {
        let points = document
            .points()
            .filter(|p| !(skip_empty_points && p.is_empty()))
            .count();
        self.message_count += points as u64;
        self.documents.push(document);
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Total number of elements in the layer.
    pub fn element_count(&self) -> usize {
        self.documents.iter().map(|d| d.descendant_count() + 1).sum()
    }
}

/// True when `path` names an existing regular file.
pub fn can_load<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_file()
}

/// Reads every document of an NVG file into a layer.
///
/// Each `<nvg>` root is stamped with the file's metadata.
pub fn load_file<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<NvgLayer, ReadError> {
    let path = path.as_ref();
    if !can_load(path) {
        return Err(ReadError::FileNotFound(path.to_path_buf()));
    }

    let file_info = FileInfo::from_path(path)?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_info.file_name.clone());

    let reader = NvgReader::open(path)?;
    let layer = load_documents(name, reader, config, |document| {
        if let Some(root) = document.as_root_mut() {
            root.file_info = Some(file_info.clone());
        }
    })?;

    info!(
        path = %path.display(),
        documents = layer.document_count(),
        messages = layer.message_count,
        "loaded NVG file"
    );
    Ok(layer)
}

/// Reads documents from `reader` until none remain or the configured limit is reached.
///
/// `stamp` is applied to each document before it is added. The reader is released
/// before returning.
pub fn load_documents<S, F>(
    name: impl Into<String>,
    mut reader: NvgReader<S>,
    config: &LoaderConfig,
    mut stamp: F,
) -> Result<NvgLayer, ReadError>
where
    S: TokenSource,
    F: FnMut(&mut Element),
{
    let mut layer = NvgLayer::new(name);

    while !config.limit_reached(layer.document_count()) {
        let Some(mut document) = reader.read_next_element()? else {
            break;
        };
        debug!(
            layer = %layer.name,
            kind = %document.kind(),
            elements = document.descendant_count() + 1,
            "read document"
        );
        stamp(&mut document);
        layer.add_document(document, config.skip_empty_points);
    }

    reader.close();
    Ok(layer)
}
