//! Typed field descriptors and the dependency-ordered schema.
//!
//! A [`SchemaNode`] tree describes the shape of a configuration and how each
//! field is defaulted. [`Schema::new`] flattens that tree, resolves every
//! reference between fields, and computes a topological evaluation order
//! over the resulting dependency graph. A schema that references unknown
//! fields or contains a cycle is rejected here, so resolution itself never
//! has to deal with either.

use super::{FieldPath, SchemaError};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Declared shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Boolean,
    /// Array of strings, usually restricted by [`Constraint::OneOf`].
    Array,
    Object,
    /// String resolved to an absolute path against the working directory.
    Path,
}

impl FieldKind {
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Boolean => "a boolean",
            FieldKind::Array => "an array",
            FieldKind::Object => "an object",
            FieldKind::Path => "a path string",
        }
    }
}

/// Kind-specific constraint checked against supplied and resolved values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Path must name an existing regular file.
    ExistingFile,
    /// Path must name an existing directory.
    ExistingDir,
    /// Every array item must be one of these values (case-sensitive).
    OneOf(Vec<String>),
    /// Array items must not repeat.
    Unique,
    /// String must end with one of these suffixes (case-sensitive).
    EndsWith(Vec<String>),
    /// String must be a single path component: no separators, not `.` or `..`.
    FileName,
}

/// Computes a default from already-resolved dependency values.
pub type ComputeFn = fn(&Dependencies<'_>) -> Option<Value>;

/// How a field is filled in when no value is supplied.
#[derive(Debug, Clone)]
pub enum DefaultRule {
    None,
    Literal(Value),
    /// Copy the resolved value of another field.
    Reference(FieldPath),
    /// Pure function of the resolved values of `inputs`.
    Computed {
        inputs: Vec<FieldPath>,
        compute: ComputeFn,
    },
}

impl DefaultRule {
    fn inputs(&self) -> Vec<&FieldPath> {
        match self {
            DefaultRule::None | DefaultRule::Literal(_) => Vec::new(),
            DefaultRule::Reference(target) => vec![target],
            DefaultRule::Computed { inputs, .. } => inputs.iter().collect(),
        }
    }
}

/// Resolved values a [`ComputeFn`] is allowed to read.
///
/// Only the declared inputs are visible, plus the year the resolution runs
/// in. A missing input means the referenced field ended up absent.
#[derive(Debug)]
pub struct Dependencies<'a> {
    values: BTreeMap<&'a FieldPath, &'a Value>,
    year: i32,
}

impl<'a> Dependencies<'a> {
    pub fn new(values: BTreeMap<&'a FieldPath, &'a Value>, year: i32) -> Self {
        Self { values, year }
    }

    pub fn get(&self, path: &str) -> Option<&'a Value> {
        self.values.get(&FieldPath::parse(path)).copied()
    }

    pub fn str(&self, path: &str) -> Option<&'a str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

/// One field of a schema tree, built fluently.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    key: String,
    kind: FieldKind,
    required: bool,
    advisory: Option<String>,
    default: DefaultRule,
    constraints: Vec<Constraint>,
    children: Vec<SchemaNode>,
}

impl SchemaNode {
    fn new(key: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            kind,
            required: false,
            advisory: None,
            default: DefaultRule::None,
            constraints: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The unnamed root mapping.
    pub fn root(fields: Vec<SchemaNode>) -> Self {
        Self::new("", FieldKind::Object).fields(fields)
    }

    pub fn string(key: &str) -> Self {
        Self::new(key, FieldKind::String)
    }

    pub fn boolean(key: &str) -> Self {
        Self::new(key, FieldKind::Boolean)
    }

    pub fn array(key: &str) -> Self {
        Self::new(key, FieldKind::Array)
    }

    pub fn object(key: &str) -> Self {
        Self::new(key, FieldKind::Object)
    }

    pub fn path(key: &str) -> Self {
        Self::new(key, FieldKind::Path)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as recommended: leaving it out produces a warning.
    /// `note` is the message used when no default is substituted.
    pub fn advisory(mut self, note: &str) -> Self {
        self.advisory = Some(note.to_string());
        self
    }

    pub fn default_literal(mut self, value: Value) -> Self {
        self.default = DefaultRule::Literal(value);
        self
    }

    pub fn default_ref(mut self, target: &str) -> Self {
        self.default = DefaultRule::Reference(FieldPath::parse(target));
        self
    }

    pub fn computed(mut self, inputs: &[&str], compute: ComputeFn) -> Self {
        self.default = DefaultRule::Computed {
            inputs: inputs.iter().map(|p| FieldPath::parse(p)).collect(),
            compute,
        };
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn fields(mut self, children: Vec<SchemaNode>) -> Self {
        self.children = children;
        self
    }
}

/// "At least one of" rule over fields, checked on the raw input.
#[derive(Debug, Clone)]
pub struct GroupConstraint {
    pub members: Vec<FieldPath>,
}

impl GroupConstraint {
    pub fn any_of(members: &[&str]) -> Self {
        Self {
            members: members.iter().map(|p| FieldPath::parse(p)).collect(),
        }
    }
}

/// A flattened field with its position in the tree and its dependencies.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub path: FieldPath,
    pub kind: FieldKind,
    pub required: bool,
    pub advisory: Option<String>,
    pub default: DefaultRule,
    pub constraints: Vec<Constraint>,
    /// Index of the enclosing object; `None` only for the root.
    pub parent: Option<usize>,
    /// Indices of the fields this field's default reads.
    pub inputs: Vec<usize>,
}

/// Validated schema with a precomputed evaluation order.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    index: HashMap<FieldPath, usize>,
    order: Vec<usize>,
    groups: Vec<GroupConstraint>,
}

impl Schema {
    /// Flattens `root`, links dependencies, and orders the fields so every
    /// field comes after its parent and after every field its default reads.
    pub fn new(root: SchemaNode, groups: Vec<GroupConstraint>) -> Result<Self, SchemaError> {
        let mut fields = Vec::new();
        let mut index = HashMap::new();
        flatten(root, FieldPath::root(), None, &mut fields, &mut index)?;

        let mut links = Vec::with_capacity(fields.len());
        for field in &fields {
            let mut inputs = Vec::new();
            for target in field.default.inputs() {
                let idx = index.get(target).copied().ok_or_else(|| {
                    SchemaError::UnknownReference {
                        field: field.path.clone(),
                        target: target.clone(),
                    }
                })?;
                inputs.push(idx);
            }
            links.push(inputs);
        }
        for (field, inputs) in fields.iter_mut().zip(links) {
            field.inputs = inputs;
        }

        for group in &groups {
            for member in &group.members {
                if !index.contains_key(member) {
                    return Err(SchemaError::UnknownGroupMember {
                        field: member.clone(),
                    });
                }
            }
        }

        let order = evaluation_order(&fields)?;
        log::debug!("schema evaluation order: {} fields", order.len());

        Ok(Self {
            fields,
            index,
            order,
            groups,
        })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, idx: usize) -> &FieldSpec {
        &self.fields[idx]
    }

    pub fn index_of(&self, path: &FieldPath) -> Option<usize> {
        self.index.get(path).copied()
    }

    /// Field indices in dependency order (root first).
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn groups(&self) -> &[GroupConstraint] {
        &self.groups
    }
}

fn flatten(
    node: SchemaNode,
    path: FieldPath,
    parent: Option<usize>,
    fields: &mut Vec<FieldSpec>,
    index: &mut HashMap<FieldPath, usize>,
) -> Result<(), SchemaError> {
    if !node.children.is_empty() && node.kind != FieldKind::Object {
        return Err(SchemaError::ChildrenOnLeaf { field: path });
    }
    if index.contains_key(&path) {
        return Err(SchemaError::DuplicateField { field: path });
    }

    let idx = fields.len();
    index.insert(path.clone(), idx);
    fields.push(FieldSpec {
        path: path.clone(),
        kind: node.kind,
        required: node.required,
        advisory: node.advisory,
        default: node.default,
        constraints: node.constraints,
        parent,
        inputs: Vec::new(),
    });

    for child in node.children {
        let child_path = path.join(&child.key);
        flatten(child, child_path, Some(idx), fields, index)?;
    }
    Ok(())
}

fn evaluation_order(fields: &[FieldSpec]) -> Result<Vec<usize>, SchemaError> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(fields.len(), fields.len());
    let nodes: Vec<NodeIndex> = (0..fields.len()).map(|idx| graph.add_node(idx)).collect();

    for (idx, field) in fields.iter().enumerate() {
        if let Some(parent) = field.parent {
            graph.add_edge(nodes[parent], nodes[idx], ());
        }
        for &input in &field.inputs {
            graph.add_edge(nodes[input], nodes[idx], ());
        }
    }

    toposort(&graph, None)
        .map(|sorted| sorted.into_iter().map(|node| graph[node]).collect())
        .map_err(|cycle| SchemaError::Cycle {
            field: fields[graph[cycle.node_id()]].path.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn position(schema: &Schema, path: &str) -> usize {
        let idx = schema.index_of(&FieldPath::parse(path)).expect("field declared");
        schema
            .order()
            .iter()
            .position(|&i| i == idx)
            .expect("field ordered")
    }

    #[test]
    fn orders_referents_before_dependents() {
        // Declared in reverse so declaration order alone would be wrong.
        let schema = Schema::new(
            SchemaNode::root(vec![
                SchemaNode::string("label").computed(&["alias"], |deps| {
                    deps.str("alias").map(|a| json!(format!("<{a}>")))
                }),
                SchemaNode::string("alias").default_ref("name"),
                SchemaNode::string("name"),
            ]),
            Vec::new(),
        )
        .expect("valid schema");

        assert!(position(&schema, "name") < position(&schema, "alias"));
        assert!(position(&schema, "alias") < position(&schema, "label"));
        assert_eq!(schema.order()[0], 0, "root evaluates first");
    }

    #[test]
    fn rejects_cycles() {
        let err = Schema::new(
            SchemaNode::root(vec![
                SchemaNode::string("a").default_ref("b"),
                SchemaNode::string("b").default_ref("a"),
            ]),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Cycle { .. }));
    }

    #[test]
    fn rejects_self_reference() {
        let err = Schema::new(
            SchemaNode::root(vec![SchemaNode::string("a").default_ref("a")]),
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::Cycle { field: "a".into() });
    }

    #[test]
    fn rejects_unknown_references() {
        let err = Schema::new(
            SchemaNode::root(vec![SchemaNode::string("a").default_ref("missing")]),
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownReference {
                field: "a".into(),
                target: "missing".into(),
            }
        );
    }

    #[test]
    fn rejects_unknown_group_members() {
        let err = Schema::new(
            SchemaNode::root(vec![SchemaNode::string("a")]),
            vec![GroupConstraint::any_of(&["a", "b"])],
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::UnknownGroupMember { field: "b".into() });
    }

    #[test]
    fn rejects_duplicate_and_misplaced_fields() {
        let err = Schema::new(
            SchemaNode::root(vec![SchemaNode::string("a"), SchemaNode::boolean("a")]),
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField { field: "a".into() });

        let err = Schema::new(
            SchemaNode::root(vec![
                SchemaNode::string("a").fields(vec![SchemaNode::string("b")]),
            ]),
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::ChildrenOnLeaf { field: "a".into() });
    }
}
