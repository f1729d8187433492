//! Builders for in-memory configuration trees with realistic, nested source ranges.
//!
//! Layout: every attribute sits on its own line, blocks span from their header line to the
//! closing brace, and byte offsets are `(line - 1) * 100 + (column - 1)`.

use crate::model::{
    Attribute, Block, Body, ConfigTree, Expr, ExprKind, IgnoreAnnotation, Reference,
    ResourceBlock, TemplatePart, TraversalStep, Variable,
};
use crate::resolve::{Number, Value};
use monguard_types::{SourcePos, SourceRange};

fn base(line: u32) -> usize {
    (line as usize - 1) * 100
}

pub fn line_range(file: &str, line: u32, start_col: u32, end_col: u32) -> SourceRange {
    SourceRange::new(
        file,
        SourcePos::new(line, start_col, base(line) + start_col as usize - 1),
        SourcePos::new(line, end_col, base(line) + end_col as usize - 1),
    )
}

fn span(file: &str, start_line: u32, end_line: u32) -> SourceRange {
    SourceRange::new(
        file,
        SourcePos::new(start_line, 1, base(start_line)),
        SourcePos::new(end_line, 2, base(end_line) + 1),
    )
}

/// Assign `range` to `expr` and every nested expression that has no range yet.
fn place(expr: &mut Expr, range: &SourceRange) {
    if expr.range == SourceRange::default() {
        expr.range = range.clone();
    }
    match &mut expr.kind {
        ExprKind::Tuple(items) => items.iter_mut().for_each(|e| place(e, range)),
        ExprKind::Object(entries) => entries.iter_mut().for_each(|(_, e)| place(e, range)),
        ExprKind::Template(parts) => {
            for part in parts {
                if let TemplatePart::Interpolation(e) = part {
                    place(e, range);
                }
            }
        }
        ExprKind::Reference(r) => {
            for step in &mut r.steps {
                if let TraversalStep::Index(e) = step {
                    place(e, range);
                }
            }
        }
        ExprKind::Literal(_) | ExprKind::Dynamic(_) => {}
    }
}

fn bare(kind: ExprKind) -> Expr {
    Expr::new(kind, SourceRange::default())
}

pub fn string(s: &str) -> Expr {
    bare(ExprKind::Literal(Value::String(s.to_string())))
}

pub fn int(i: i64) -> Expr {
    bare(ExprKind::Literal(Value::Number(Number::Int(i))))
}

pub fn float(f: f64) -> Expr {
    bare(ExprKind::Literal(Value::Number(Number::Float(f))))
}

pub fn boolean(b: bool) -> Expr {
    bare(ExprKind::Literal(Value::Bool(b)))
}

pub fn null() -> Expr {
    bare(ExprKind::Literal(Value::Null))
}

pub fn tuple(items: Vec<Expr>) -> Expr {
    bare(ExprKind::Tuple(items))
}

pub fn strings(items: &[&str]) -> Expr {
    tuple(items.iter().map(|s| string(s)).collect())
}

pub fn object(entries: Vec<(&str, Expr)>) -> Expr {
    bare(ExprKind::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    ))
}

/// `reference("var.team")`, `reference("aws_sns_topic.alerts.arn")`.
pub fn reference(dotted: &str) -> Expr {
    let mut parts = dotted.split('.');
    let root = parts.next().unwrap_or_default().to_string();
    let steps = parts.map(|p| TraversalStep::Attr(p.to_string())).collect();
    bare(ExprKind::Reference(Reference { root, steps }))
}

pub fn reference_with(root: &str, steps: Vec<TraversalStep>) -> Expr {
    bare(ExprKind::Reference(Reference {
        root: root.to_string(),
        steps,
    }))
}

pub fn template(parts: Vec<TemplatePart>) -> Expr {
    bare(ExprKind::Template(parts))
}

pub fn lit(s: &str) -> TemplatePart {
    TemplatePart::Literal(s.to_string())
}

pub fn interp(expr: Expr) -> TemplatePart {
    TemplatePart::Interpolation(expr)
}

pub fn dynamic(description: &str) -> Expr {
    bare(ExprKind::Dynamic(description.to_string()))
}

pub struct BodyBuilder {
    file: String,
    next_line: u32,
    body: Body,
    annotations: Vec<IgnoreAnnotation>,
}

impl BodyBuilder {
    fn new(file: &str, next_line: u32) -> Self {
        Self {
            file: file.to_string(),
            next_line,
            body: Body::default(),
            annotations: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, mut expr: Expr) -> Self {
        let line = self.next_line;
        self.next_line += 1;
        place(&mut expr, &line_range(&self.file, line, 10, 80));
        self.body.attributes.push(Attribute {
            name: name.to_string(),
            expr,
            range: line_range(&self.file, line, 3, 80),
        });
        self
    }

    pub fn block(mut self, kind: &str, f: impl FnOnce(BodyBuilder) -> BodyBuilder) -> Self {
        let start = self.next_line;
        let inner = f(BodyBuilder::new(&self.file, start + 1));
        let end = inner.next_line;
        self.next_line = end + 1;
        self.annotations.extend(inner.annotations);
        self.body.blocks.push(Block {
            kind: kind.to_string(),
            labels: Vec::new(),
            body: inner.body,
            range: span(&self.file, start, end),
        });
        self
    }

    /// `# monguard-ignore: ...` on its own line, covering the next attribute.
    pub fn ignore(mut self, rules: &[&str]) -> Self {
        let line = self.next_line;
        self.next_line += 1;
        self.annotations.push(IgnoreAnnotation {
            rules: rules.iter().map(|r| r.to_string()).collect(),
            range: line_range(&self.file, line, 3, 40),
        });
        self
    }
}

pub struct TreeBuilder {
    file: String,
    next_line: u32,
    tree: ConfigTree,
}

impl TreeBuilder {
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            next_line: 1,
            tree: ConfigTree {
                files: vec![file.to_string()],
                ..ConfigTree::default()
            },
        }
    }

    /// Continue in another file.
    pub fn file(mut self, file: &str) -> Self {
        self.file = file.to_string();
        self.next_line = 1;
        self.tree.files.push(file.to_string());
        self
    }

    pub fn resource(
        self,
        kind: &str,
        name: &str,
        f: impl FnOnce(BodyBuilder) -> BodyBuilder,
    ) -> Self {
        self.raw_resource(vec![kind, name], f)
    }

    pub fn raw_resource(
        mut self,
        labels: Vec<&str>,
        f: impl FnOnce(BodyBuilder) -> BodyBuilder,
    ) -> Self {
        let start = self.next_line;
        let inner = f(BodyBuilder::new(&self.file, start + 1));
        let end = inner.next_line;
        self.next_line = end + 2;
        self.tree.annotations.extend(inner.annotations);
        self.tree.resources.push(ResourceBlock {
            labels: labels.into_iter().map(str::to_string).collect(),
            body: inner.body,
            range: span(&self.file, start, end),
        });
        self
    }

    pub fn variable(mut self, name: &str, default: Option<Expr>) -> Self {
        let line = self.next_line;
        self.next_line += 1;
        let default = default.map(|mut e| {
            place(&mut e, &line_range(&self.file, line, 20, 60));
            e
        });
        self.tree.variables.insert(
            name.to_string(),
            Variable {
                name: name.to_string(),
                default,
                value: None,
                range: line_range(&self.file, line, 1, 60),
            },
        );
        self
    }

    /// Assign a value as a tfvars file would.
    pub fn tfvar(mut self, name: &str, mut value: Expr) -> Self {
        place(&mut value, &line_range("terraform.tfvars", 1, 1, 60));
        let range = line_range(&self.file, self.next_line, 1, 60);
        self.tree
            .variables
            .entry(name.to_string())
            .or_insert_with(|| Variable {
                name: name.to_string(),
                default: None,
                value: None,
                range,
            })
            .value = Some(value);
        self
    }

    pub fn local(mut self, name: &str, mut value: Expr) -> Self {
        let line = self.next_line;
        self.next_line += 1;
        place(&mut value, &line_range(&self.file, line, 10, 60));
        self.tree.locals.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> ConfigTree {
        self.tree
    }
}
