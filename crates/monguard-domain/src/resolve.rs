//! Expression resolution: turns unevaluated expressions into typed host values.
//!
//! Resolution is static. Variables and locals are followed; anything that only exists at
//! apply time (resource attributes, data sources, function calls) is reported as
//! [`Resolved::Unknown`] so rules can skip it without failing.

use crate::model::{ConfigTree, Expr, ExprKind, Reference, TemplatePart, TraversalStep};
use monguard_types::SourceRange;
use std::collections::BTreeMap;
use std::fmt;

/// Nesting limit for variable and local indirection. Cycles hit it too.
const MAX_DEPTH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Integral value, accepting floats with no fractional part.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(i),
            Number::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                Some(f as i64)
            }
            Number::Float(_) => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }
}

/// Why a value cannot be known statically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnknownReason {
    /// Reference to something only known after apply (`aws_sns_topic.alerts.arn`).
    Computed(String),
    /// The expression evaluates to `null`.
    Null,
    /// Function call, conditional, operator, `for` expression or template directive.
    Dynamic(String),
    /// A variable with neither a tfvars value nor a default.
    UnsetVariable(String),
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownReason::Computed(reference) => write!(f, "computed value {reference}"),
            UnknownReason::Null => f.write_str("null value"),
            UnknownReason::Dynamic(description) => write!(f, "dynamic expression ({description})"),
            UnknownReason::UnsetVariable(name) => write!(f, "variable \"{name}\" has no value"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resolved<T> {
    Known(T),
    Unknown(UnknownReason),
}

impl<T> Resolved<T> {
    pub fn known(self) -> Option<T> {
        match self {
            Resolved::Known(v) => Some(v),
            Resolved::Unknown(_) => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Resolved::Unknown(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        match self {
            Resolved::Known(v) => Resolved::Known(f(v)),
            Resolved::Unknown(reason) => Resolved::Unknown(reason),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{range}: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
        range: SourceRange,
    },

    #[error("{range}: invalid reference {reference}: {reason}")]
    InvalidTraversal {
        reference: String,
        reason: String,
        range: SourceRange,
    },

    #[error("{range}: {reference} nests deeper than {MAX_DEPTH} references (cycle?)")]
    ReferenceDepthExceeded {
        reference: String,
        range: SourceRange,
    },
}

impl ResolveError {
    pub fn range(&self) -> &SourceRange {
        match self {
            ResolveError::TypeMismatch { range, .. }
            | ResolveError::InvalidTraversal { range, .. }
            | ResolveError::ReferenceDepthExceeded { range, .. } => range,
        }
    }
}

/// Host types a known, non-null value can be decoded into.
///
/// `decode` returns a description of what was found when the value does not fit.
pub trait Decode: Sized {
    const EXPECTED: &'static str;

    fn decode(value: Value) -> Result<Self, String>;
}

impl Decode for Value {
    const EXPECTED: &'static str = "any value";

    fn decode(value: Value) -> Result<Self, String> {
        Ok(value)
    }
}

impl Decode for String {
    const EXPECTED: &'static str = "string";

    fn decode(value: Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other.type_name().to_string()),
        }
    }
}

impl Decode for i64 {
    const EXPECTED: &'static str = "integer";

    fn decode(value: Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => n.as_i64().ok_or_else(|| format!("number {n}")),
            other => Err(other.type_name().to_string()),
        }
    }
}

/// HCL has a single number type, so written integers decode here too. This mirrors the
/// `i64` rule for integral floats; strings and bools never become numbers.
impl Decode for f64 {
    const EXPECTED: &'static str = "number";

    fn decode(value: Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            other => Err(other.type_name().to_string()),
        }
    }
}

impl Decode for bool {
    const EXPECTED: &'static str = "bool";

    fn decode(value: Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other.type_name().to_string()),
        }
    }
}

impl Decode for Vec<String> {
    const EXPECTED: &'static str = "list of string";

    fn decode(value: Value) -> Result<Self, String> {
        decode_list(value, |item| match item {
            Value::String(s) => Ok(s),
            other => Err(other),
        })
    }
}

impl Decode for Vec<i64> {
    const EXPECTED: &'static str = "list of integer";

    fn decode(value: Value) -> Result<Self, String> {
        decode_list(value, |item| match item {
            Value::Number(n) => n.as_i64().ok_or(Value::Number(n)),
            other => Err(other),
        })
    }
}

fn decode_list<T>(value: Value, item: impl Fn(Value) -> Result<T, Value>) -> Result<Vec<T>, String> {
    match value {
        Value::List(items) => items
            .into_iter()
            .map(|v| item(v).map_err(|bad| format!("list containing {}", bad.type_name())))
            .collect(),
        other => Err(other.type_name().to_string()),
    }
}

/// Evaluates expressions against the variables and locals of one configuration tree.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    tree: &'a ConfigTree,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a ConfigTree) -> Self {
        Self { tree }
    }

    /// Evaluate to an untyped value. `null` stays a known [`Value::Null`] here.
    pub fn evaluate(&self, expr: &Expr) -> Result<Resolved<Value>, ResolveError> {
        self.eval(expr, 0)
    }

    /// Evaluate and decode into `T`. Unknown and `null` values are not errors.
    pub fn resolve<T: Decode>(&self, expr: &Expr) -> Result<Resolved<T>, ResolveError> {
        self.resolve_with_decoder(expr, T::EXPECTED, T::decode)
    }

    /// Evaluate and decode with a caller-supplied decoder.
    pub fn resolve_with_decoder<T>(
        &self,
        expr: &Expr,
        expected: &'static str,
        decode: impl FnOnce(Value) -> Result<T, String>,
    ) -> Result<Resolved<T>, ResolveError> {
        match self.evaluate(expr)? {
            Resolved::Unknown(reason) => Ok(Resolved::Unknown(reason)),
            Resolved::Known(Value::Null) => Ok(Resolved::Unknown(UnknownReason::Null)),
            Resolved::Known(value) => decode(value).map(Resolved::Known).map_err(|found| {
                ResolveError::TypeMismatch {
                    expected,
                    found,
                    range: expr.range.clone(),
                }
            }),
        }
    }

    /// Decode into `T` and hand the value to `f`.
    ///
    /// `f` is not called for unknown values; the result is then `Ok(None)`.
    pub fn resolve_with<T, R, E>(
        &self,
        expr: &Expr,
        f: impl FnOnce(T) -> Result<R, E>,
    ) -> Result<Option<R>, E>
    where
        T: Decode,
        E: From<ResolveError>,
    {
        match self.resolve::<T>(expr)? {
            Resolved::Known(value) => f(value).map(Some),
            Resolved::Unknown(reason) => {
                tracing::trace!(range = %expr.range, %reason, "skipping unknown value");
                Ok(None)
            }
        }
    }

    fn eval(&self, expr: &Expr, depth: usize) -> Result<Resolved<Value>, ResolveError> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(Resolved::Known(value.clone())),
            ExprKind::Tuple(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match self.eval(item, depth)? {
                        Resolved::Known(v) => out.push(v),
                        Resolved::Unknown(reason) => return Ok(Resolved::Unknown(reason)),
                    }
                }
                Ok(Resolved::Known(Value::List(out)))
            }
            ExprKind::Object(entries) => {
                let mut out = BTreeMap::new();
                for (key, item) in entries {
                    match self.eval(item, depth)? {
                        Resolved::Known(v) => {
                            out.insert(key.clone(), v);
                        }
                        Resolved::Unknown(reason) => return Ok(Resolved::Unknown(reason)),
                    }
                }
                Ok(Resolved::Known(Value::Object(out)))
            }
            ExprKind::Template(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Literal(text) => out.push_str(text),
                        TemplatePart::Interpolation(inner) => match self.eval(inner, depth)? {
                            Resolved::Known(v) => out.push_str(&interpolated(v, &inner.range)?),
                            Resolved::Unknown(reason) => return Ok(Resolved::Unknown(reason)),
                        },
                    }
                }
                Ok(Resolved::Known(Value::String(out)))
            }
            ExprKind::Reference(reference) => self.eval_reference(reference, &expr.range, depth),
            ExprKind::Dynamic(description) => {
                Ok(Resolved::Unknown(UnknownReason::Dynamic(description.clone())))
            }
        }
    }

    fn eval_reference(
        &self,
        reference: &Reference,
        range: &SourceRange,
        depth: usize,
    ) -> Result<Resolved<Value>, ResolveError> {
        if depth >= MAX_DEPTH {
            return Err(ResolveError::ReferenceDepthExceeded {
                reference: reference.display(),
                range: range.clone(),
            });
        }

        let base = match (reference.root.as_str(), reference.steps.first()) {
            ("var", Some(TraversalStep::Attr(name))) => {
                let assigned = self
                    .tree
                    .variables
                    .get(name)
                    .and_then(|v| v.value.as_ref().or(v.default.as_ref()));
                match assigned {
                    Some(expr) => self.eval(expr, depth + 1)?,
                    None => {
                        return Ok(Resolved::Unknown(UnknownReason::UnsetVariable(name.clone())));
                    }
                }
            }
            ("local", Some(TraversalStep::Attr(name))) => match self.tree.locals.get(name) {
                Some(expr) => self.eval(expr, depth + 1)?,
                None => {
                    return Err(invalid(
                        reference,
                        range,
                        format!("no local value named \"{name}\""),
                    ));
                }
            },
            _ => return Ok(Resolved::Unknown(UnknownReason::Computed(reference.display()))),
        };

        match base {
            Resolved::Known(value) => self.traverse(value, &reference.steps[1..], reference, range, depth),
            Resolved::Unknown(reason) => Ok(Resolved::Unknown(reason)),
        }
    }

    fn traverse(
        &self,
        mut value: Value,
        steps: &[TraversalStep],
        reference: &Reference,
        range: &SourceRange,
        depth: usize,
    ) -> Result<Resolved<Value>, ResolveError> {
        for (i, step) in steps.iter().enumerate() {
            value = match step {
                TraversalStep::Attr(name) => match value {
                    Value::Object(mut map) => map.remove(name).ok_or_else(|| {
                        invalid(reference, range, format!("object has no attribute \"{name}\""))
                    })?,
                    other => {
                        return Err(invalid(
                            reference,
                            range,
                            format!("cannot read attribute \"{name}\" of a {}", other.type_name()),
                        ));
                    }
                },
                TraversalStep::Index(index) => {
                    let key = match self.eval(index, depth + 1)? {
                        Resolved::Known(key) => key,
                        Resolved::Unknown(reason) => return Ok(Resolved::Unknown(reason)),
                    };
                    index_value(value, key).map_err(|reason| invalid(reference, range, reason))?
                }
                TraversalStep::Splat => {
                    let items = match value {
                        Value::List(items) => items,
                        Value::Null => Vec::new(),
                        other => vec![other],
                    };
                    let rest = &steps[i + 1..];
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        match self.traverse(item, rest, reference, range, depth)? {
                            Resolved::Known(v) => out.push(v),
                            Resolved::Unknown(reason) => return Ok(Resolved::Unknown(reason)),
                        }
                    }
                    return Ok(Resolved::Known(Value::List(out)));
                }
            };
        }
        Ok(Resolved::Known(value))
    }
}

fn invalid(reference: &Reference, range: &SourceRange, reason: String) -> ResolveError {
    ResolveError::InvalidTraversal {
        reference: reference.display(),
        reason,
        range: range.clone(),
    }
}

fn index_value(value: Value, key: Value) -> Result<Value, String> {
    match (value, key) {
        (Value::List(mut items), Value::Number(n)) => {
            let len = items.len();
            match n.as_i64() {
                Some(i) if i >= 0 && (i as usize) < len => Ok(items.swap_remove(i as usize)),
                _ => Err(format!("index {n} out of range for list of length {len}")),
            }
        }
        (Value::Object(mut map), Value::String(k)) => map
            .remove(&k)
            .ok_or_else(|| format!("object has no key \"{k}\"")),
        (value, key) => Err(format!(
            "cannot index a {} with a {}",
            value.type_name(),
            key.type_name()
        )),
    }
}

fn interpolated(value: Value, range: &SourceRange) -> Result<String, ResolveError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ResolveError::TypeMismatch {
            expected: "string",
            found: other.type_name().to_string(),
            range: range.clone(),
        }),
    }
}
