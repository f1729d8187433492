//! Lowering of `hcl-edit` syntax trees into the engine's configuration model.

use crate::annotations;
use crate::sourcemap::SourceMap;
use hcl_edit::Span;
use hcl_edit::expr::{Expression, ObjectKey, TraversalOperator};
use hcl_edit::structure::{Body as HclBody, Structure};
use hcl_edit::template::{Element, Template};
use monguard_domain::model::{
    Attribute, Block, Body, Expr, ExprKind, IgnoreAnnotation, Reference, ResourceBlock,
    TemplatePart, TraversalStep, Variable,
};
use monguard_domain::resolve::{Number, Value};
use monguard_types::SourceRange;
use std::collections::BTreeMap;

/// Everything one `.tf` file contributes to the configuration tree.
#[derive(Clone, Debug, Default)]
pub struct Fragment {
    pub resources: Vec<ResourceBlock>,
    pub variables: Vec<Variable>,
    pub locals: Vec<(String, Expr)>,
    pub annotations: Vec<IgnoreAnnotation>,
}

/// Parse and lower one configuration file.
pub fn lower_config(filename: &str, text: &str) -> anyhow::Result<Fragment> {
    let body = hcl_edit::parser::parse_body(text).map_err(|err| anyhow::anyhow!("{err}"))?;
    let map = SourceMap::new(filename, text);
    let lowerer = Lowerer { map: &map };

    let mut fragment = Fragment {
        annotations: annotations::collect(text, &map),
        ..Fragment::default()
    };

    for structure in body.iter() {
        let Structure::Block(block) = structure else {
            continue;
        };
        let range = lowerer.range_of(block, &lowerer.whole_file());
        match block.ident.as_str() {
            "resource" => fragment.resources.push(ResourceBlock {
                labels: block.labels.iter().map(|l| l.as_str().to_string()).collect(),
                body: lowerer.body(&block.body, &range),
                range,
            }),
            "variable" => {
                let name = match block.labels.as_slice() {
                    [label] => label.as_str().to_string(),
                    _ => anyhow::bail!("{range}: variable block must have exactly one label"),
                };
                let default = block.body.iter().find_map(|s| match s {
                    Structure::Attribute(attr) if attr.key.as_str() == "default" => {
                        Some(lowerer.expr(&attr.value, &range))
                    }
                    _ => None,
                });
                fragment.variables.push(Variable {
                    name,
                    default,
                    value: None,
                    range,
                });
            }
            "locals" => {
                for s in block.body.iter() {
                    if let Structure::Attribute(attr) = s {
                        fragment
                            .locals
                            .push((attr.key.as_str().to_string(), lowerer.expr(&attr.value, &range)));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(fragment)
}

/// Parse a tfvars file into `name -> value expression`.
pub fn lower_tfvars(filename: &str, text: &str) -> anyhow::Result<BTreeMap<String, Expr>> {
    let body = hcl_edit::parser::parse_body(text).map_err(|err| anyhow::anyhow!("{err}"))?;
    let map = SourceMap::new(filename, text);
    let lowerer = Lowerer { map: &map };
    let file = lowerer.whole_file();

    let mut values = BTreeMap::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => {
                values.insert(attr.key.as_str().to_string(), lowerer.expr(&attr.value, &file));
            }
            Structure::Block(block) => {
                let range = lowerer.range_of(block, &file);
                anyhow::bail!(
                    "{range}: unexpected block \"{}\" in variable file",
                    block.ident.as_str()
                );
            }
        }
    }
    Ok(values)
}

struct Lowerer<'m, 'a> {
    map: &'m SourceMap<'a>,
}

impl Lowerer<'_, '_> {
    fn whole_file(&self) -> SourceRange {
        self.map.range(0..usize::MAX)
    }

    /// Range of a syntax node, falling back to its parent when the parser kept no span.
    fn range_of(&self, node: &impl Span, parent: &SourceRange) -> SourceRange {
        node.span()
            .map(|span| self.map.range(span))
            .unwrap_or_else(|| parent.clone())
    }

    fn body(&self, body: &HclBody, parent: &SourceRange) -> Body {
        let mut out = Body::default();
        for structure in body.iter() {
            match structure {
                Structure::Attribute(attr) => {
                    let range = self.range_of(attr, parent);
                    out.attributes.push(Attribute {
                        name: attr.key.as_str().to_string(),
                        expr: self.expr(&attr.value, &range),
                        range,
                    });
                }
                Structure::Block(block) => {
                    let range = self.range_of(block, parent);
                    out.blocks.push(Block {
                        kind: block.ident.as_str().to_string(),
                        labels: block.labels.iter().map(|l| l.as_str().to_string()).collect(),
                        body: self.body(&block.body, &range),
                        range,
                    });
                }
            }
        }
        out
    }

    fn expr(&self, expr: &Expression, parent: &SourceRange) -> Expr {
        let range = self.range_of(expr, parent);
        let kind = match expr {
            Expression::Null(_) => ExprKind::Literal(Value::Null),
            Expression::Bool(b) => ExprKind::Literal(Value::Bool(*b.value())),
            Expression::Number(n) => {
                let n = n.value();
                match (n.as_i64(), n.as_f64()) {
                    (Some(i), _) => ExprKind::Literal(Value::Number(Number::Int(i))),
                    (None, Some(f)) => ExprKind::Literal(Value::Number(Number::Float(f))),
                    (None, None) => ExprKind::Dynamic(format!("number {n}")),
                }
            }
            Expression::String(s) => ExprKind::Literal(Value::String(s.value().to_string())),
            Expression::Array(items) => {
                ExprKind::Tuple(items.iter().map(|item| self.expr(item, &range)).collect())
            }
            Expression::Object(object) => {
                let mut entries = Vec::new();
                for (key, value) in object.iter() {
                    let key = match key {
                        ObjectKey::Ident(ident) => ident.as_str().to_string(),
                        ObjectKey::Expression(Expression::String(s)) => s.value().to_string(),
                        _ => {
                            return Expr::new(
                                ExprKind::Dynamic("object with a computed key".to_string()),
                                range,
                            );
                        }
                    };
                    entries.push((key, self.expr(value.expr(), &range)));
                }
                ExprKind::Object(entries)
            }
            Expression::StringTemplate(template) => self.template(template, &range),
            Expression::HeredocTemplate(heredoc) => self.template(&heredoc.template, &range),
            Expression::Parenthesis(inner) => self.expr(inner.inner(), &range).kind,
            Expression::Variable(ident) => ExprKind::Reference(Reference {
                root: ident.as_str().to_string(),
                steps: Vec::new(),
            }),
            Expression::Traversal(traversal) => match &traversal.expr {
                Expression::Variable(root) => ExprKind::Reference(Reference {
                    root: root.as_str().to_string(),
                    steps: traversal
                        .operators
                        .iter()
                        .map(|op| self.step(op.value(), &range))
                        .collect(),
                }),
                _ => ExprKind::Dynamic("traversal of a computed value".to_string()),
            },
            Expression::FuncCall(_) => ExprKind::Dynamic("function call".to_string()),
            Expression::Conditional(_) => ExprKind::Dynamic("conditional".to_string()),
            Expression::ForExpr(_) => ExprKind::Dynamic("for expression".to_string()),
            _ => ExprKind::Dynamic("operator".to_string()),
        };
        Expr::new(kind, range)
    }

    fn step(&self, op: &TraversalOperator, parent: &SourceRange) -> TraversalStep {
        match op {
            TraversalOperator::GetAttr(ident) => TraversalStep::Attr(ident.as_str().to_string()),
            TraversalOperator::Index(index) => TraversalStep::Index(self.expr(index, parent)),
            TraversalOperator::LegacyIndex(index) => TraversalStep::Index(Expr::new(
                ExprKind::Literal(Value::Number(Number::Int(*index.value() as i64))),
                parent.clone(),
            )),
            _ => TraversalStep::Splat,
        }
    }

    fn template(&self, template: &Template, range: &SourceRange) -> ExprKind {
        let mut parts = Vec::new();
        for element in template.iter() {
            match element {
                Element::Literal(text) => parts.push(TemplatePart::Literal(text.value().to_string())),
                Element::Interpolation(interp) => {
                    parts.push(TemplatePart::Interpolation(self.expr(&interp.expr, range)))
                }
                _ => return ExprKind::Dynamic("template directive".to_string()),
            }
        }
        ExprKind::Template(parts)
    }
}
