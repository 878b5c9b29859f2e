//! Annotation name matching.
//!
//! Annotation names are written simple (`@Inject`) or qualified
//! (`@jakarta.inject.Inject`). A written name matches a fully-qualified
//! target when the unit's imports bind it to that target; when nothing in
//! the unit decides, the simple names are compared.

use std::fmt;

use serde::Serialize;

use super::types::{package_of, simple_name, Annotation, CompilationUnit};

/// How a name was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Bound through qualification, an import, or the unit's own package.
    Resolved,
    /// Only the simple names were compared.
    Raw,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Resolved => f.write_str("resolved"),
            MatchMode::Raw => f.write_str("raw"),
        }
    }
}

/// Match a written annotation name against a fully-qualified target.
pub fn match_name(unit: &CompilationUnit, written: &str, target: &str) -> Option<MatchMode> {
    if written.contains('.') {
        let qualified = written == target
            || target
                .strip_suffix(written)
                .map(|prefix| prefix.ends_with('.'))
                .unwrap_or(false);
        return qualified.then_some(MatchMode::Resolved);
    }

    if written != simple_name(target) {
        return None;
    }

    let single = unit
        .imports
        .iter()
        .find(|i| !i.on_demand && !i.is_static && simple_name(&i.path) == written);
    if let Some(import) = single {
        return (import.path == target).then_some(MatchMode::Resolved);
    }

    let target_package = package_of(target);
    let on_demand = unit
        .imports
        .iter()
        .any(|i| i.on_demand && !i.is_static && i.path == target_package);
    if on_demand || unit.package_name() == target_package {
        return Some(MatchMode::Resolved);
    }

    Some(MatchMode::Raw)
}

pub fn is_annotation(unit: &CompilationUnit, annotation: &Annotation, target: &str) -> bool {
    match_name(unit, &annotation.name, target).is_some()
}

/// The first annotation in `annotations` that matches `target`.
pub fn find_annotation<'a>(
    unit: &CompilationUnit,
    annotations: &'a [Annotation],
    target: &str,
) -> Option<&'a Annotation> {
    annotations.iter().find(|a| is_annotation(unit, a, target))
}

pub fn has_annotation(unit: &CompilationUnit, annotations: &[Annotation], target: &str) -> bool {
    find_annotation(unit, annotations, target).is_some()
}

/// Pair each annotation with the first target it matches, in declaration
/// order; annotations matching none of `targets` are left out.
pub fn matching<'a, 't>(
    unit: &CompilationUnit,
    annotations: &'a [Annotation],
    targets: &[&'t str],
) -> Vec<(&'a Annotation, &'t str)> {
    annotations
        .iter()
        .filter_map(|a| {
            targets
                .iter()
                .find(|t| is_annotation(unit, a, t))
                .map(|t| (a, *t))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JavaParser;

    fn unit(source: &str) -> CompilationUnit {
        JavaParser::new().parse("file:///A.java", source).unwrap()
    }

    #[test]
    fn test_qualified_written_name() {
        let u = unit("class A {}");
        assert_eq!(
            match_name(&u, "jakarta.inject.Inject", "jakarta.inject.Inject"),
            Some(MatchMode::Resolved)
        );
        assert_eq!(
            match_name(&u, "inject.Inject", "jakarta.inject.Inject"),
            Some(MatchMode::Resolved)
        );
        assert_eq!(match_name(&u, "ject.Inject", "jakarta.inject.Inject"), None);
        assert_eq!(match_name(&u, "com.other.Inject", "jakarta.inject.Inject"), None);
    }

    #[test]
    fn test_single_type_import_decides() {
        let u = unit("import com.google.inject.Inject;\nclass A {}");
        assert_eq!(match_name(&u, "Inject", "jakarta.inject.Inject"), None);

        let u = unit("import jakarta.inject.Inject;\nclass A {}");
        assert_eq!(
            match_name(&u, "Inject", "jakarta.inject.Inject"),
            Some(MatchMode::Resolved)
        );
    }

    #[test]
    fn test_on_demand_and_same_package() {
        let u = unit("import jakarta.inject.*;\nclass A {}");
        assert_eq!(
            match_name(&u, "Inject", "jakarta.inject.Inject"),
            Some(MatchMode::Resolved)
        );

        let u = unit("package jakarta.inject;\nclass A {}");
        assert_eq!(
            match_name(&u, "Inject", "jakarta.inject.Inject"),
            Some(MatchMode::Resolved)
        );
    }

    #[test]
    fn test_raw_fallback_agrees_on_outcome() {
        let u = unit("class A {}");
        assert_eq!(
            match_name(&u, "Inject", "jakarta.inject.Inject"),
            Some(MatchMode::Raw)
        );
        assert_eq!(match_name(&u, "Named", "jakarta.inject.Inject"), None);
    }

    #[test]
    fn test_matching_keeps_declaration_order() {
        let u = unit(
            "import jakarta.inject.*;\nclass A { @Named @Deprecated @Inject Object f; }",
        );
        let field = &u.types[0].fields[0];
        let found = matching(
            &u,
            &field.annotations,
            &["jakarta.inject.Inject", "jakarta.inject.Named"],
        );
        let names: Vec<_> = found.iter().map(|(_, t)| *t).collect();
        assert_eq!(names, vec!["jakarta.inject.Named", "jakarta.inject.Inject"]);
    }
}
