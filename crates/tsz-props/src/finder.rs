//! Extraction passes.

use crate::classifier::{Site, TypeClassifier};
use crate::error::{ExtractError, Result};
use crate::locator::ComponentLocator;
use crate::options::ExtractOptions;
use tracing::debug;
use tsz_props_schema::{ComponentSpec, FinderResult};
use tsz_typegraph::{DeclId, FileId, TypeGraph};

/// Entry point: locate components and classify their props.
///
/// Every call is one pass with its own reference table.
pub struct PropsFinder<'a, G: TypeGraph + ?Sized> {
    db: &'a G,
    options: ExtractOptions,
}

impl<'a, G: TypeGraph + ?Sized> PropsFinder<'a, G> {
    pub fn new(db: &'a G) -> Self {
        Self::with_options(db, ExtractOptions::default())
    }

    pub fn with_options(db: &'a G, options: ExtractOptions) -> Self {
        PropsFinder { db, options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// One pass over an explicit declaration list.
    pub fn find(&self, decls: &[DeclId]) -> Result<FinderResult> {
        let locator = ComponentLocator::new(self.db, &self.options);
        let mut classifier = TypeClassifier::new(self.db, &self.options);
        let mut components = Vec::new();

        for candidate in locator.locate(decls)? {
            let Some(props) = candidate.props else {
                continue;
            };
            let site = Site::component(candidate.name.clone(), candidate.location.clone());
            let props_ref_index = classifier.classify_props(props, &site)?;
            debug!(
                component = &*candidate.name,
                props_ref_index, "classified component props"
            );
            components.push(ComponentSpec {
                name: candidate.name.to_string(),
                props_ref_index,
            });
        }

        let refs = classifier.finish()?;
        let result = FinderResult { components, refs };
        debug_assert!(result.validate().is_ok());
        Ok(result)
    }

    /// One pass over the exports of a source file.
    pub fn find_in_file(&self, file: FileId) -> Result<FinderResult> {
        self.find_in_files(&[file])
    }

    /// One pass over the exports of several files, sharing one reference
    /// table so props types used across files are stored once.
    pub fn find_in_files(&self, files: &[FileId]) -> Result<FinderResult> {
        let mut decls = Vec::new();
        for &file in files {
            let source = self
                .db
                .file(file)
                .ok_or(ExtractError::UnknownFile { id: file.0 })?;
            decls.extend(source.exports);
        }
        self.find(&decls)
    }
}
