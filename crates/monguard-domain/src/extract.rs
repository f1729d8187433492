//! Resource content extraction: schema-filtered, read-only views over the configuration tree.

use crate::model::{Attribute, Block, Body, ConfigTree, ResourceBlock};
use crate::schema::BodySchema;
use monguard_types::SourceRange;
use std::collections::BTreeSet;

/// A resource block that cannot be read with the requested schema.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("{range}: resource block must have exactly two labels (kind and name), found {found}")]
    MalformedResource { found: usize, range: SourceRange },

    #[error("{range}: {resource}: \"{name}\" must be an attribute, found a block")]
    UnexpectedBlock {
        resource: String,
        name: String,
        range: SourceRange,
    },

    #[error("{range}: {resource}: \"{name}\" must be a block, found an attribute")]
    UnexpectedAttribute {
        resource: String,
        name: String,
        range: SourceRange,
    },

    #[error("{range}: {resource}: required attribute \"{name}\" is missing")]
    MissingAttribute {
        resource: String,
        name: String,
        range: SourceRange,
    },
}

impl ExtractionError {
    pub fn range(&self) -> &SourceRange {
        match self {
            ExtractionError::MalformedResource { range, .. }
            | ExtractionError::UnexpectedBlock { range, .. }
            | ExtractionError::UnexpectedAttribute { range, .. }
            | ExtractionError::MissingAttribute { range, .. } => range,
        }
    }
}

/// Result of a lenient fetch: readable blocks plus one error per malformed block.
#[derive(Clone, Debug, Default)]
pub struct ResourceContent {
    pub blocks: Vec<ResourceBlock>,
    pub errors: Vec<ExtractionError>,
}

/// Fetches resource blocks of one kind, keeping only what a schema names.
#[derive(Clone, Copy, Debug)]
pub struct Extractor<'a> {
    tree: &'a ConfigTree,
}

impl<'a> Extractor<'a> {
    pub fn new(tree: &'a ConfigTree) -> Self {
        Self { tree }
    }

    /// Fetch every block of `kind`. The first malformed block aborts the fetch.
    ///
    /// A kind with no declared instances yields an empty list.
    pub fn fetch(
        &self,
        kind: &str,
        schema: &BodySchema,
    ) -> Result<Vec<ResourceBlock>, ExtractionError> {
        let content = self.fetch_lenient(kind, schema);
        match content.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(content.blocks),
        }
    }

    /// Fetch every block of `kind`, collecting malformed blocks as errors instead of failing.
    pub fn fetch_lenient(&self, kind: &str, schema: &BodySchema) -> ResourceContent {
        let mut content = ResourceContent::default();

        for resource in &self.tree.resources {
            if resource.kind() != Some(kind) {
                continue;
            }
            if resource.labels.len() != 2 {
                content.errors.push(ExtractionError::MalformedResource {
                    found: resource.labels.len(),
                    range: resource.range.clone(),
                });
                continue;
            }

            let address = resource.address();
            match filter_body(&resource.body, schema, &address, &resource.range) {
                Ok(body) => content.blocks.push(ResourceBlock {
                    labels: resource.labels.clone(),
                    body,
                    range: resource.range.clone(),
                }),
                Err(err) => content.errors.push(err),
            }
        }

        content
    }
}

fn filter_body(
    body: &Body,
    schema: &BodySchema,
    resource: &str,
    enclosing: &SourceRange,
) -> Result<Body, ExtractionError> {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();

    for attr in &body.attributes {
        if schema.block_schema(&attr.name).is_some() {
            return Err(ExtractionError::UnexpectedAttribute {
                resource: resource.to_string(),
                name: attr.name.clone(),
                range: attr.range.clone(),
            });
        }
        if schema.attribute(&attr.name).is_none() {
            continue;
        }
        seen.insert(attr.name.as_str());
        attributes.push(attr.clone());
    }

    if let Some(missing) = schema
        .attributes
        .iter()
        .find(|a| a.required && !seen.contains(a.name.as_str()))
    {
        return Err(ExtractionError::MissingAttribute {
            resource: resource.to_string(),
            name: missing.name.clone(),
            range: enclosing.clone(),
        });
    }

    let mut blocks: Vec<Block> = Vec::new();
    for block in &body.blocks {
        if schema.attribute(&block.kind).is_some() {
            return Err(ExtractionError::UnexpectedBlock {
                resource: resource.to_string(),
                name: block.kind.clone(),
                range: block.range.clone(),
            });
        }
        let Some(block_schema) = schema.block_schema(&block.kind) else {
            continue;
        };
        blocks.push(Block {
            kind: block.kind.clone(),
            labels: block.labels.clone(),
            body: filter_body(&block.body, &block_schema.body, resource, &block.range)?,
            range: block.range.clone(),
        });
    }

    Ok(Body { attributes, blocks })
}
