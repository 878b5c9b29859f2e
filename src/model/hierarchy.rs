//! Type resolution and supertype hierarchies.

use std::collections::{HashSet, VecDeque};

use super::names::MatchMode;
use super::platform;
use super::types::{simple_name, CompilationUnit, TypeDecl, TypeKind, TypeRef};

pub const OBJECT: &str = "java.lang.Object";
pub const EXCEPTION: &str = "java.lang.Exception";
pub const RUNTIME_EXCEPTION: &str = "java.lang.RuntimeException";

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "char", "float", "double", "void",
];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// Source of supertype information.
pub trait TypeHierarchy: Send + Sync {
    /// Whether a qualified type name is known to this hierarchy.
    fn is_known(&self, qualified_name: &str) -> bool;

    /// Direct supertypes of a type, or `None` when the type cannot be
    /// resolved.
    fn direct_supertypes(&self, qualified_name: &str) -> Option<Vec<String>>;
}

/// Hierarchy backed only by the well-known library table.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformHierarchy;

impl TypeHierarchy for PlatformHierarchy {
    fn is_known(&self, qualified_name: &str) -> bool {
        platform::is_known(qualified_name)
    }

    fn direct_supertypes(&self, qualified_name: &str) -> Option<Vec<String>> {
        platform::direct_supertypes(qualified_name)
            .map(|supers| supers.iter().map(|s| s.to_string()).collect())
    }
}

/// Resolves type names as written in one compilation unit.
pub struct TypeResolver<'a> {
    unit: &'a CompilationUnit,
    hierarchy: &'a dyn TypeHierarchy,
}

impl<'a> TypeResolver<'a> {
    pub fn new(unit: &'a CompilationUnit, hierarchy: &'a dyn TypeHierarchy) -> Self {
        Self { unit, hierarchy }
    }

    pub fn unit(&self) -> &'a CompilationUnit {
        self.unit
    }

    /// Qualified name for a type name as written, or `None` when it does not
    /// resolve. Primitive names resolve to themselves.
    pub fn resolve(&self, written: &str) -> Option<String> {
        if is_primitive(written) {
            return Some(written.to_string());
        }

        if let Some((head, rest)) = written.split_once('.') {
            if self.hierarchy.is_known(written) || self.unit.find_type(written).is_some() {
                return Some(written.to_string());
            }
            // Outer.Inner where Outer is itself resolvable
            let outer = self.resolve(head)?;
            let candidate = format!("{}.{}", outer, rest);
            return (self.hierarchy.is_known(&candidate)
                || self.unit.find_type(&candidate).is_some())
            .then_some(candidate);
        }

        if let Some(local) = self
            .unit
            .all_types()
            .into_iter()
            .find(|t| t.name == written)
        {
            return Some(local.qualified_name.clone());
        }

        if let Some(import) = self
            .unit
            .imports
            .iter()
            .find(|i| !i.on_demand && !i.is_static && simple_name(&i.path) == written)
        {
            return Some(import.path.clone());
        }

        let package = self.unit.package_name();
        let same_package = if package.is_empty() {
            written.to_string()
        } else {
            format!("{}.{}", package, written)
        };
        if self.hierarchy.is_known(&same_package) {
            return Some(same_package);
        }

        let java_lang = format!("java.lang.{}", written);
        if self.hierarchy.is_known(&java_lang) {
            return Some(java_lang);
        }

        self.unit
            .imports
            .iter()
            .filter(|i| i.on_demand && !i.is_static)
            .map(|i| format!("{}.{}", i.path, written))
            .find(|candidate| self.hierarchy.is_known(candidate))
    }

    /// Resolved direct supertypes of a declaration in this unit.
    pub fn declared_supertypes(&self, decl: &TypeDecl) -> Option<Vec<String>> {
        let mut supers = Vec::new();
        match (&decl.superclass, decl.kind) {
            (Some(sc), _) => supers.push(self.resolve(&sc.name)?),
            (None, TypeKind::Enum) => supers.push("java.lang.Enum".to_string()),
            (None, TypeKind::Record) => supers.push("java.lang.Record".to_string()),
            (None, _) => supers.push(OBJECT.to_string()),
        }
        for iface in &decl.interfaces {
            supers.push(self.resolve(&iface.name)?);
        }
        Some(supers)
    }

    /// The type and all its transitive supertypes, or `None` when any link
    /// of the chain cannot be resolved.
    pub fn supertypes(&self, qualified_name: &str) -> Option<Vec<String>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut queue = VecDeque::from([qualified_name.to_string()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if current != OBJECT {
                for s in self.hierarchy.direct_supertypes(&current)? {
                    queue.push_back(s);
                }
            }
            out.push(current);
        }
        Some(out)
    }

    /// Whether the type written as `written` is `target` or a subtype of it.
    pub fn is_subtype_of(&self, written: &str, target: &str) -> Option<bool> {
        let resolved = self.resolve(written)?;
        if is_primitive(&resolved) {
            return Some(resolved == target);
        }
        Some(self.supertypes(&resolved)?.iter().any(|s| s == target))
    }

    /// Whether the type is a checked exception: its chain reaches
    /// `java.lang.Exception` but not `java.lang.RuntimeException`.
    pub fn is_checked_exception(&self, written: &str) -> Option<bool> {
        let resolved = self.resolve(written)?;
        let chain = self.supertypes(&resolved)?;
        let reaches = |name: &str| chain.iter().any(|s| s == name);
        Some(reaches(EXCEPTION) && !reaches(RUNTIME_EXCEPTION))
    }
}

/// Matches declared types against sets of accepted types.
///
/// A declared type that resolves is compared through its full supertype
/// chain; one that does not is compared by simple name only. Accepted names
/// are qualified names or primitive keywords.
pub struct TypeMatcher<'r, 'a> {
    resolver: &'r TypeResolver<'a>,
}

impl<'r, 'a> TypeMatcher<'r, 'a> {
    pub fn new(resolver: &'r TypeResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Whether the erasure of `type_ref` (ignoring array dimensions) is one
    /// of `accepted` or a subtype of one.
    pub fn matches(&self, type_ref: &TypeRef, accepted: &[&str]) -> (bool, MatchMode) {
        self.matches_name(&type_ref.name, accepted)
    }

    pub fn matches_name(&self, written: &str, accepted: &[&str]) -> (bool, MatchMode) {
        if is_primitive(written) {
            return (accepted.contains(&written), MatchMode::Resolved);
        }
        let chain = self
            .resolver
            .resolve(written)
            .and_then(|q| self.resolver.supertypes(&q));
        match chain {
            Some(chain) => (
                chain.iter().any(|s| accepted.contains(&s.as_str())),
                MatchMode::Resolved,
            ),
            None => {
                let simple = simple_name(written);
                (
                    accepted.iter().any(|a| simple_name(a) == simple),
                    MatchMode::Raw,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JavaParser;

    fn unit(source: &str) -> CompilationUnit {
        JavaParser::new().parse("file:///A.java", source).unwrap()
    }

    #[test]
    fn test_resolve_names() {
        let u = unit(
            r#"package p;
import java.util.List;
import java.util.concurrent.*;
class A { static class Inner {} }
"#,
        );
        let r = TypeResolver::new(&u, &PlatformHierarchy);
        assert_eq!(r.resolve("List").as_deref(), Some("java.util.List"));
        assert_eq!(r.resolve("String").as_deref(), Some("java.lang.String"));
        assert_eq!(
            r.resolve("TimeoutException").as_deref(),
            Some("java.util.concurrent.TimeoutException")
        );
        assert_eq!(r.resolve("Inner").as_deref(), Some("p.A.Inner"));
        assert_eq!(r.resolve("A.Inner").as_deref(), Some("p.A.Inner"));
        assert_eq!(r.resolve("int").as_deref(), Some("int"));
        assert_eq!(r.resolve("Mystery"), None);
    }

    #[test]
    fn test_checked_exceptions() {
        let u = unit("import java.io.IOException;\nclass A {}");
        let r = TypeResolver::new(&u, &PlatformHierarchy);
        assert_eq!(r.is_checked_exception("IOException"), Some(true));
        assert_eq!(r.is_checked_exception("Exception"), Some(true));
        assert_eq!(r.is_checked_exception("IllegalStateException"), Some(false));
        assert_eq!(r.is_checked_exception("Error"), Some(false));
        assert_eq!(r.is_checked_exception("Unknown"), None);
    }

    #[test]
    fn test_subtype_chain() {
        let u = unit("import java.util.ArrayList;\nclass A {}");
        let r = TypeResolver::new(&u, &PlatformHierarchy);
        assert_eq!(r.is_subtype_of("ArrayList", "java.util.Collection"), Some(true));
        assert_eq!(r.is_subtype_of("ArrayList", "java.util.Map"), Some(false));
        assert_eq!(r.is_subtype_of("String", "java.lang.CharSequence"), Some(true));
    }

    #[test]
    fn test_matcher_modes_agree() {
        let u = unit("class A {}");
        let r = TypeResolver::new(&u, &PlatformHierarchy);
        let m = TypeMatcher::new(&r);
        assert_eq!(
            m.matches_name("String", &["java.lang.CharSequence"]),
            (true, MatchMode::Resolved)
        );
        assert_eq!(
            m.matches_name("Session", &["jakarta.websocket.Session"]),
            (true, MatchMode::Raw)
        );
        assert_eq!(
            m.matches_name("Sessions", &["jakarta.websocket.Session"]),
            (false, MatchMode::Raw)
        );
        assert_eq!(m.matches_name("int", &["int", "long"]), (true, MatchMode::Resolved));
    }
}
