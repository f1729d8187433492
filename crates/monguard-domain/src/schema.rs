//! Schema descriptors: which attributes and nested blocks a caller wants to read.
//!
//! Pure data. Absence of a named attribute is not an error unless it is marked `required`.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodySchema {
    pub attributes: Vec<AttributeSchema>,
    pub blocks: Vec<BlockSchema>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSchema {
    pub name: String,
    pub required: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSchema {
    pub kind: String,
    pub body: BodySchema,
}

impl BodySchema {
    /// Schema for a flat list of optional attributes.
    pub fn with_attributes(names: &[&str]) -> Self {
        Self {
            attributes: names
                .iter()
                .map(|name| AttributeSchema {
                    name: (*name).to_string(),
                    required: false,
                })
                .collect(),
            blocks: Vec::new(),
        }
    }

    pub fn required_attribute(mut self, name: &str) -> Self {
        self.attributes.push(AttributeSchema {
            name: name.to_string(),
            required: true,
        });
        self
    }

    pub fn block(mut self, kind: &str, body: BodySchema) -> Self {
        self.blocks.push(BlockSchema {
            kind: kind.to_string(),
            body,
        });
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn block_schema(&self, kind: &str) -> Option<&BlockSchema> {
        self.blocks.iter().find(|b| b.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_attributes_and_blocks() {
        let schema = BodySchema::with_attributes(&["name", "tags"])
            .required_attribute("type")
            .block("monitor_thresholds", BodySchema::with_attributes(&["critical"]));

        assert_eq!(schema.attributes.len(), 3);
        assert!(!schema.attribute("name").expect("name").required);
        assert!(schema.attribute("type").expect("type").required);
        assert!(schema.attribute("query").is_none());

        let thresholds = schema.block_schema("monitor_thresholds").expect("block");
        assert!(thresholds.body.attribute("critical").is_some());
    }
}
