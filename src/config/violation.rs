//! Collected diagnostics produced by configuration resolution.

use super::FieldPath;
use std::fmt;

/// Category of a recorded violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Supplied value does not match the declared kind.
    Shape,
    /// Required field has no supplied value and no applicable default.
    RequiredMissing,
    /// Enum, uniqueness, suffix, or filesystem constraint violated.
    Constraint,
    /// None of an "or" group's members is present.
    Group,
    /// Advisory field was not supplied.
    Advisory,
}

impl ViolationKind {
    /// Advisory violations are warnings; everything else blocks.
    pub fn is_blocking(self) -> bool {
        !matches!(self, ViolationKind::Advisory)
    }
}

/// A single `(fieldPath, message)` diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: FieldPath,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(path: FieldPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered blocking errors and advisory warnings from one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationReport {
    errors: Vec<Violation>,
    warnings: Vec<Violation>,
}

impl ViolationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation in the list matching its kind.
    pub fn push(&mut self, violation: Violation) {
        if violation.kind.is_blocking() {
            log::debug!("config error at {}: {}", violation.path, violation.message);
            self.errors.push(violation);
        } else {
            log::debug!("config warning at {}: {}", violation.path, violation.message);
            self.warnings.push(violation);
        }
    }

    pub fn record(&mut self, path: &FieldPath, kind: ViolationKind, message: impl Into<String>) {
        self.push(Violation::new(path.clone(), kind, message));
    }

    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Violation] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Violation> {
        self.warnings
    }

    /// Renders one list as `  - path: message` lines.
    pub fn render_list(violations: &[Violation]) -> String {
        violations
            .iter()
            .map(|v| format!("  - {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.errors.is_empty() {
            writeln!(f, "Invalid configuration:")?;
            writeln!(f, "{}", Self::render_list(&self.errors))?;
        }
        if !self.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            writeln!(f, "{}", Self::render_list(&self.warnings))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_routes_by_kind() {
        let mut report = ViolationReport::new();
        report.record(&"pakager.mac".into(), ViolationKind::RequiredMissing, "is required");
        report.record(&"pakager.mac.icon".into(), ViolationKind::Advisory, "no icon set");

        assert!(report.has_errors());
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].path.as_str(), "pakager.mac.icon");
    }

    #[test]
    fn renders_bulleted_lists() {
        let mut report = ViolationReport::new();
        report.record(
            &"name".into(),
            ViolationKind::Group,
            "at least one of name, pakager.name must be set",
        );
        report.record(&"pakager.mac.category".into(), ViolationKind::Advisory, "not set");

        let rendered = report.to_string();
        assert!(rendered.contains("Invalid configuration:"));
        assert!(rendered.contains("  - name: at least one of name, pakager.name must be set"));
        assert!(rendered.contains("Warnings:"));
        assert!(rendered.contains("  - pakager.mac.category: not set"));
    }
}
