//! Typed query AST
//!
//! The validated form of a query object. Every filter variant is a distinct
//! enum arm, so the validator and the evaluator match the same exhaustive set.

use crate::catalog::{DatasetKind, QualifiedKey};

/// Numeric comparison operators (GT, LT, EQ)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    Gt,
    Lt,
    Eq,
}

impl NumericOp {
    /// Parses the grammar token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GT" => Some(NumericOp::Gt),
            "LT" => Some(NumericOp::Lt),
            "EQ" => Some(NumericOp::Eq),
            _ => None,
        }
    }

    /// Returns the grammar token
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericOp::Gt => "GT",
            NumericOp::Lt => "LT",
            NumericOp::Eq => "EQ",
        }
    }
}

/// A validated IS pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `*`
    Any,
    /// `*X*`
    Contains(String),
    /// `X*`
    StartsWith(String),
    /// `*X`
    EndsWith(String),
    /// `X`
    Exact(String),
}

impl Pattern {
    /// Parses an IS pattern.
    ///
    /// `*` may appear only as a leading and/or trailing wildcard, or alone.
    /// `**`, `***` and interior asterisks are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "*" {
            return Some(Pattern::Any);
        }

        let leading = raw.starts_with('*');
        let trailing = raw.ends_with('*');
        let start = usize::from(leading);
        let end = raw.len() - usize::from(trailing);
        let inner = raw.get(start..end).unwrap_or("");

        if inner.contains('*') {
            return None;
        }

        match (leading, trailing) {
            (true, true) if inner.is_empty() => None,
            (true, true) => Some(Pattern::Contains(inner.to_string())),
            (false, true) => Some(Pattern::StartsWith(inner.to_string())),
            (true, false) => Some(Pattern::EndsWith(inner.to_string())),
            (false, false) => Some(Pattern::Exact(inner.to_string())),
        }
    }
}

/// Recursive WHERE filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `{NOT: Filter}`
    Not(Box<Filter>),
    /// `{AND: [Filter, ...]}`
    And(Vec<Filter>),
    /// `{OR: [Filter, ...]}`
    Or(Vec<Filter>),
    /// `{GT|LT|EQ: {mkey: number}}`
    Numeric {
        op: NumericOp,
        key: QualifiedKey,
        value: f64,
    },
    /// `{IS: {skey: pattern}}`
    Text { key: QualifiedKey, pattern: Pattern },
}

impl Filter {
    /// Collects every qualified key in the tree
    pub fn keys<'a>(&'a self, out: &mut Vec<&'a QualifiedKey>) {
        match self {
            Filter::Not(inner) => inner.keys(out),
            Filter::And(filters) | Filter::Or(filters) => {
                for filter in filters {
                    filter.keys(out);
                }
            }
            Filter::Numeric { key, .. } | Filter::Text { key, .. } => out.push(key),
        }
    }
}

/// One COLUMNS entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// A qualified dataset field
    Key(QualifiedKey),
    /// An apply-result name
    Apply(String),
}

impl Column {
    /// Output name of the column in result rows
    pub fn name(&self) -> String {
        match self {
            Column::Key(key) => key.to_string(),
            Column::Apply(name) => name.clone(),
        }
    }
}

/// Composite ORDER direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Up,
    Down,
}

impl SortDirection {
    /// Parses the grammar token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "UP" => Some(SortDirection::Up),
            "DOWN" => Some(SortDirection::Down),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Up => "UP",
            SortDirection::Down => "DOWN",
        }
    }
}

/// ORDER specification; keys are output column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSpec {
    /// Ascending by one column
    Single(String),
    /// Priority chain with a direction for the primary key
    Composite {
        direction: SortDirection,
        keys: Vec<String>,
    },
}

/// OPTIONS section
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub columns: Vec<Column>,
    pub order: Option<OrderSpec>,
}

impl Options {
    /// Output names of all columns, in COLUMNS order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(Column::name).collect()
    }
}

/// Aggregate operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Max,
    Min,
    Avg,
    Sum,
    Count,
}

impl AggregateOp {
    /// Parses the grammar token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "MAX" => Some(AggregateOp::Max),
            "MIN" => Some(AggregateOp::Min),
            "AVG" => Some(AggregateOp::Avg),
            "SUM" => Some(AggregateOp::Sum),
            "COUNT" => Some(AggregateOp::Count),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Max => "MAX",
            AggregateOp::Min => "MIN",
            AggregateOp::Avg => "AVG",
            AggregateOp::Sum => "SUM",
            AggregateOp::Count => "COUNT",
        }
    }

    /// MAX/MIN/AVG/SUM need a numeric field; COUNT takes either class
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, AggregateOp::Count)
    }
}

/// One APPLY rule: `{name: {op: key}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRule {
    pub name: String,
    pub op: AggregateOp,
    pub key: QualifiedKey,
}

/// TRANSFORMATIONS section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformations {
    pub group: Vec<QualifiedKey>,
    pub apply: Vec<ApplyRule>,
}

impl Transformations {
    /// Returns the rule producing `name`, if declared
    pub fn rule(&self, name: &str) -> Option<&ApplyRule> {
        self.apply.iter().find(|rule| rule.name == name)
    }
}

/// A structurally valid query (not yet bound to a dataset)
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// None when WHERE is empty
    pub filter: Option<Filter>,
    pub options: Options,
    pub transformations: Option<Transformations>,
}

impl Query {
    /// Every qualified key referenced anywhere in the query
    pub fn referenced_keys(&self) -> Vec<&QualifiedKey> {
        let mut keys = Vec::new();
        if let Some(filter) = &self.filter {
            filter.keys(&mut keys);
        }
        for column in &self.options.columns {
            if let Column::Key(key) = column {
                keys.push(key);
            }
        }
        if let Some(transformations) = &self.transformations {
            keys.extend(transformations.group.iter());
            keys.extend(transformations.apply.iter().map(|rule| &rule.key));
        }
        keys
    }
}

/// A validated query bound to exactly one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    dataset_id: String,
    kind: DatasetKind,
    query: Query,
}

impl BoundQuery {
    pub(crate) fn new(dataset_id: impl Into<String>, kind: DatasetKind, query: Query) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            kind,
            query,
        }
    }

    /// The bound dataset id
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Kind of the bound dataset
    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.query.filter.as_ref()
    }

    pub fn options(&self) -> &Options {
        &self.query.options
    }

    pub fn transformations(&self) -> Option<&Transformations> {
        self.query.transformations.as_ref()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}
