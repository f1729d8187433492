use crate::resolve::Value;
use monguard_types::{SourceRange, ids};
use std::collections::BTreeMap;

/// The loaded configuration: every file of one module directory, merged.
///
/// Built by a host adapter and shared read-only by all rules.
#[derive(Clone, Debug, Default)]
pub struct ConfigTree {
    /// Files that contributed to the tree, in load order.
    pub files: Vec<String>,

    /// `resource` blocks in load order (file order, then source order).
    pub resources: Vec<ResourceBlock>,

    /// `variable` declarations, with values supplied by tfvars files.
    pub variables: BTreeMap<String, Variable>,

    /// Entries of every `locals` block.
    pub locals: BTreeMap<String, Expr>,

    /// `# monguard-ignore: ...` comments.
    pub annotations: Vec<IgnoreAnnotation>,
}

/// One `resource "<kind>" "<name>" { ... }` declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceBlock {
    /// Block labels as written; well-formed resources have exactly two.
    pub labels: Vec<String>,
    pub body: Body,
    /// Range of the whole block.
    pub range: SourceRange,
}

impl ResourceBlock {
    pub fn kind(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.labels.get(1).map(String::as_str)
    }

    /// `kind.name`, the address used in messages and logs.
    pub fn address(&self) -> String {
        self.labels.join(".")
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    pub blocks: Vec<Block>,
}

impl Body {
    /// First attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub expr: Expr,
    /// Range of the whole `name = expr` pair.
    pub range: SourceRange,
}

/// A nested block inside a resource body (e.g. `monitor_thresholds { ... }`).
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub kind: String,
    pub labels: Vec<String>,
    pub body: Body,
    pub range: SourceRange,
}

/// An unevaluated expression with its own source range.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub range: SourceRange,
}

impl Expr {
    pub fn new(kind: ExprKind, range: SourceRange) -> Self {
        Self { kind, range }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// `null`, `true`, `42`, `"text"`.
    Literal(Value),
    /// `[a, b, c]`.
    Tuple(Vec<Expr>),
    /// `{ key = value }`; keys that are not statically known are lowered to `Dynamic`.
    Object(Vec<(String, Expr)>),
    /// `"prefix ${expr} suffix"` and heredocs.
    Template(Vec<TemplatePart>),
    /// `var.name`, `local.name`, `aws_sns_topic.alerts.arn`, ...
    Reference(Reference),
    /// Anything whose value needs full program semantics: function calls,
    /// conditionals, operators, `for` expressions, template directives.
    Dynamic(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TemplatePart {
    Literal(String),
    Interpolation(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub root: String,
    pub steps: Vec<TraversalStep>,
}

impl Reference {
    /// Dotted rendering used in logs and unknown-value reasons (`var.team`, `local.tags[*]`).
    pub fn display(&self) -> String {
        let mut out = self.root.clone();
        for step in &self.steps {
            match step {
                TraversalStep::Attr(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                TraversalStep::Index(_) => out.push_str("[...]"),
                TraversalStep::Splat => out.push_str("[*]"),
            }
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TraversalStep {
    Attr(String),
    Index(Expr),
    Splat,
}

/// A `variable "<name>" { default = ... }` declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub default: Option<Expr>,
    /// Value assigned by a tfvars file; wins over `default`.
    pub value: Option<Expr>,
    pub range: SourceRange,
}

/// `# monguard-ignore: rule_a, rule_b` (or `all`).
///
/// Covers diagnostics starting on the comment's own line or the line after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IgnoreAnnotation {
    pub rules: Vec<String>,
    pub range: SourceRange,
}

impl IgnoreAnnotation {
    pub fn covers(&self, rule: &str, range: &SourceRange) -> bool {
        if self.range.filename != range.filename {
            return false;
        }
        let line = self.range.start.line;
        if range.start.line != line && range.start.line != line + 1 {
            return false;
        }
        self.rules
            .iter()
            .any(|r| r == rule || r == ids::IGNORE_ALL)
    }
}
