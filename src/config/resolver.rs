//! Schema-driven configuration resolution.
//!
//! Resolution runs in passes over a [`Schema`]:
//!
//! 1. Structural pass: every supplied value is checked against its declared
//!    kind, and supplied arrays against their enum/uniqueness constraints.
//!    Nothing is defaulted yet.
//! 2. Evaluation in dependency order: each field takes its supplied value,
//!    otherwise its default rule evaluated against already-resolved fields.
//!    Paths are made absolute against the working directory.
//! 3. Constraint pass on resolved values: filesystem checks on absolute
//!    paths, suffix checks, enum/uniqueness on defaulted arrays.
//! 4. Group ("at least one of") constraints on the raw input.
//!
//! Every problem is recorded in a [`ViolationReport`]; the passes never stop
//! early. A value that was supplied but invalid is never replaced by a
//! default.

use super::paths::{self, EntryStatus, EntryType};
use super::{
    Constraint, DefaultRule, Dependencies, FieldKind, FieldPath, FieldSpec, RawConfig,
    ResolveError, ResolvedConfig, Schema, Violation, ViolationKind, ViolationReport, field,
};
use chrono::Datelike;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A successful resolution: the resolved configuration plus advisory warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub config: ResolvedConfig,
    pub warnings: Vec<Violation>,
}

/// Resolves `raw` against `schema`, with relative paths anchored at `working_dir`.
pub fn resolve(
    raw: &RawConfig,
    working_dir: &Path,
    schema: &Schema,
) -> Result<Resolution, ResolveError> {
    ConfigResolver::new(schema).resolve(raw, working_dir)
}

/// State of a field's supplied value after the structural pass.
#[derive(Debug, Clone)]
enum Supplied {
    Absent,
    Valid(Value),
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Unresolved,
    Supplied,
    Defaulted,
}

/// Resolves raw configurations against a fixed schema.
#[derive(Debug, Clone)]
pub struct ConfigResolver<'a> {
    schema: &'a Schema,
    year: i32,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            year: chrono::Local::now().year(),
        }
    }

    /// Pins the year used by computed defaults.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn resolve(&self, raw: &RawConfig, working_dir: &Path) -> Result<Resolution, ResolveError> {
        let working_dir = paths::absolute_dir(working_dir).map_err(|source| ResolveError::Io {
            path: working_dir.to_path_buf(),
            source,
        })?;
        log::debug!("Resolving configuration in {}", working_dir.display());

        let root = raw.as_value();
        let mut report = ViolationReport::new();

        let supplied = self.structural_pass(root, &mut report);
        let (resolved, origins) = self.evaluate(&supplied, &working_dir, &mut report)?;
        self.check_resolved(&resolved, &origins, &mut report)?;
        self.check_groups(root, &mut report);

        if report.has_errors() {
            log::debug!(
                "Resolution failed with {} error(s), {} warning(s)",
                report.errors().len(),
                report.warnings().len()
            );
            return Err(ResolveError::Invalid(report));
        }

        let tree = self.assemble(root, &resolved);
        let config = ResolvedConfig::from_tree(tree)?;
        Ok(Resolution {
            config,
            warnings: report.into_warnings(),
        })
    }

    fn structural_pass(&self, root: &Value, report: &mut ViolationReport) -> Vec<Supplied> {
        let fields = self.schema.fields();
        let mut supplied = Vec::with_capacity(fields.len());

        // Fields are stored parents-first, so a parent's state is known here.
        for field in fields {
            let Some(parent) = field.parent else {
                supplied.push(Supplied::Valid(root.clone()));
                continue;
            };
            let value = match &supplied[parent] {
                Supplied::Valid(parent_value) => parent_value
                    .get(field.path.key())
                    .filter(|v| !v.is_null())
                    .cloned(),
                Supplied::Absent | Supplied::Invalid => None,
            };

            let state = match value {
                None => Supplied::Absent,
                Some(value) => {
                    let before = report.errors().len();
                    check_shape(field, &value, report);
                    if report.errors().len() == before {
                        if let Value::Array(items) = &value {
                            check_array(field, items, report);
                        }
                    }
                    if report.errors().len() == before {
                        Supplied::Valid(value)
                    } else {
                        Supplied::Invalid
                    }
                }
            };
            supplied.push(state);
        }
        supplied
    }

    fn evaluate(
        &self,
        supplied: &[Supplied],
        working_dir: &Path,
        report: &mut ViolationReport,
    ) -> Result<(Vec<Option<Value>>, Vec<Origin>), ResolveError> {
        let count = self.schema.fields().len();
        let mut resolved: Vec<Option<Value>> = vec![None; count];
        let mut origins = vec![Origin::Unresolved; count];

        for &idx in self.schema.order() {
            let field = self.schema.field(idx);
            let Some(parent) = field.parent else {
                if let Supplied::Valid(root) = &supplied[idx] {
                    resolved[idx] = Some(root.clone());
                    origins[idx] = Origin::Supplied;
                }
                continue;
            };
            if resolved[parent].is_none() {
                continue;
            }

            let (value, origin) = match &supplied[idx] {
                Supplied::Invalid => continue,
                Supplied::Valid(value) => (Some(value.clone()), Origin::Supplied),
                Supplied::Absent => {
                    let value = self.default_value(field, &resolved);
                    if let Some(note) = &field.advisory {
                        let message = match &value {
                            Some(value) => format!("not set, defaulting to {}", display(value)),
                            None => note.clone(),
                        };
                        report.record(&field.path, ViolationKind::Advisory, message);
                    }
                    if value.is_none() && field.required {
                        report.record(&field.path, ViolationKind::RequiredMissing, "is required");
                    }
                    if let Some(value) = &value {
                        log::debug!("{} defaulted to {}", field.path, display(value));
                    }
                    (value, Origin::Defaulted)
                }
            };

            let value = match value {
                Some(Value::String(raw)) if field.kind == FieldKind::Path => {
                    let absolute = paths::resolve(&raw, working_dir).map_err(|source| {
                        ResolveError::Io {
                            path: PathBuf::from(&raw),
                            source,
                        }
                    })?;
                    Some(Value::String(absolute.to_string_lossy().into_owned()))
                }
                other => other,
            };

            if value.is_some() {
                origins[idx] = origin;
            }
            resolved[idx] = value;
        }

        Ok((resolved, origins))
    }

    fn default_value(&self, field: &FieldSpec, resolved: &[Option<Value>]) -> Option<Value> {
        match &field.default {
            DefaultRule::None => None,
            DefaultRule::Literal(value) => Some(value.clone()),
            DefaultRule::Reference(_) => field
                .inputs
                .first()
                .and_then(|&input| resolved[input].clone()),
            DefaultRule::Computed { compute, .. } => {
                let values: BTreeMap<&FieldPath, &Value> = field
                    .inputs
                    .iter()
                    .filter_map(|&input| {
                        resolved[input]
                            .as_ref()
                            .map(|value| (&self.schema.field(input).path, value))
                    })
                    .collect();
                compute(&Dependencies::new(values, self.year))
            }
        }
    }

    fn check_resolved(
        &self,
        resolved: &[Option<Value>],
        origins: &[Origin],
        report: &mut ViolationReport,
    ) -> Result<(), ResolveError> {
        for &idx in self.schema.order() {
            let Some(value) = &resolved[idx] else {
                continue;
            };
            let field = self.schema.field(idx);

            if origins[idx] == Origin::Defaulted {
                if let Value::Array(items) = value {
                    check_array(field, items, report);
                }
            }

            for constraint in &field.constraints {
                match constraint {
                    Constraint::EndsWith(suffixes) => {
                        if let Some(text) = value.as_str() {
                            if !suffixes.iter().any(|suffix| text.ends_with(suffix.as_str())) {
                                report.record(
                                    &field.path,
                                    ViolationKind::Constraint,
                                    format!("must end with one of: {}", suffixes.join(", ")),
                                );
                            }
                        }
                    }
                    Constraint::FileName => {
                        if let Some(text) = value.as_str().filter(|text| !is_file_name(text)) {
                            report.record(
                                &field.path,
                                ViolationKind::Constraint,
                                format!("must be a plain file name (\"{text}\")"),
                            );
                        }
                    }
                    Constraint::ExistingFile | Constraint::ExistingDir
                        if field.kind == FieldKind::Path =>
                    {
                        if let Some(text) = value.as_str() {
                            check_filesystem(field, constraint, Path::new(text), report)?;
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn check_groups(&self, root: &Value, report: &mut ViolationReport) {
        for group in self.schema.groups() {
            let satisfied = group
                .members
                .iter()
                .any(|member| field::lookup(root, member).is_some());
            if satisfied {
                continue;
            }
            let names: Vec<&str> = group.members.iter().map(FieldPath::as_str).collect();
            if let Some(first) = group.members.first() {
                report.record(
                    first,
                    ViolationKind::Group,
                    format!("at least one of {} must be set", names.join(", ")),
                );
            }
        }
    }

    /// Builds the output tree: the raw input (so unknown keys survive) with
    /// every schema field replaced by its resolved value.
    fn assemble(&self, root: &Value, resolved: &[Option<Value>]) -> Value {
        let mut tree = root.clone();
        for &idx in self.schema.order() {
            let field = self.schema.field(idx);
            if field.parent.is_none() {
                continue;
            }
            match &resolved[idx] {
                Some(value) => field::insert(&mut tree, &field.path, value.clone()),
                None => field::remove(&mut tree, &field.path),
            }
        }
        tree
    }
}

fn check_shape(field: &FieldSpec, value: &Value, report: &mut ViolationReport) {
    let ok = match field.kind {
        FieldKind::String | FieldKind::Path => match value.as_str() {
            Some("") => {
                report.record(&field.path, ViolationKind::Shape, "must not be empty");
                return;
            }
            Some(_) => true,
            None => false,
        },
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::Object => value.is_object(),
        FieldKind::Array => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        report.record(
                            &field.path,
                            ViolationKind::Shape,
                            format!("item {i} must be a string"),
                        );
                    }
                }
                true
            }
            None => false,
        },
    };
    if !ok {
        report.record(
            &field.path,
            ViolationKind::Shape,
            format!("must be {}", field.kind.describe()),
        );
    }
}

fn check_array(field: &FieldSpec, items: &[Value], report: &mut ViolationReport) {
    for constraint in &field.constraints {
        match constraint {
            Constraint::OneOf(allowed) => {
                for (i, item) in items.iter().enumerate() {
                    let Some(text) = item.as_str() else { continue };
                    if !allowed.iter().any(|a| a == text) {
                        report.record(
                            &field.path,
                            ViolationKind::Constraint,
                            format!(
                                "item {i} (\"{text}\") must be one of: {}",
                                allowed.join(", ")
                            ),
                        );
                    }
                }
            }
            Constraint::Unique => {
                let mut seen = BTreeSet::new();
                let mut reported = BTreeSet::new();
                for item in items.iter().filter_map(Value::as_str) {
                    if !seen.insert(item) && reported.insert(item) {
                        report.record(
                            &field.path,
                            ViolationKind::Constraint,
                            format!("contains duplicate value \"{item}\""),
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

fn check_filesystem(
    field: &FieldSpec,
    constraint: &Constraint,
    path: &Path,
    report: &mut ViolationReport,
) -> Result<(), ResolveError> {
    let (expected, noun) = match constraint {
        Constraint::ExistingDir => (EntryType::Dir, "directory"),
        _ => (EntryType::File, "file"),
    };
    let status = paths::check_entry(path, expected).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match status {
        EntryStatus::Matches => {}
        EntryStatus::Missing => report.record(
            &field.path,
            ViolationKind::Constraint,
            format!("path must be an existing {noun} ({} not found)", path.display()),
        ),
        EntryStatus::WrongType => report.record(
            &field.path,
            ViolationKind::Constraint,
            format!("path must be an existing {noun} ({} is not a {noun})", path.display()),
        ),
    }
    Ok(())
}

fn is_file_name(text: &str) -> bool {
    !text.contains(['/', '\\']) && text != "." && text != ".."
}

fn display(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{text}\""),
        other => other.to_string(),
    }
}
