//! Structural identity of declarations.
//!
//! An [`ElementKey`] names a declaration by its declaring type and member
//! signature rather than by offset, so it still resolves after the document
//! has been edited and reparsed:
//!
//! ```text
//! package:com.acme                  package
//! com.acme.Outer.Inner              type
//! com.acme.Person#name              field
//! com.acme.Person#greet(String,int) method
//! com.acme.Person#<init>()          constructor
//! com.acme.Person#greet(String)[0]  parameter
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{
    Annotation, CompilationUnit, FieldDecl, MethodDecl, Modifiers, PackageDecl, ParamDecl,
    TextRange, TypeDecl,
};

const CONSTRUCTOR_NAME: &str = "<init>";
const PACKAGE_PREFIX: &str = "package:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty element key")]
    Empty,
    #[error("malformed element key '{0}'")]
    Malformed(String),
    #[error("invalid parameter index in element key '{0}'")]
    BadIndex(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementKey {
    Package(String),
    Type(String),
    Field {
        owner: String,
        name: String,
    },
    Method {
        owner: String,
        name: String,
        params: Vec<String>,
    },
    Parameter {
        owner: String,
        name: String,
        params: Vec<String>,
        index: usize,
    },
}

impl ElementKey {
    pub fn for_package(name: &str) -> Self {
        ElementKey::Package(name.to_string())
    }

    pub fn for_type(decl: &TypeDecl) -> Self {
        ElementKey::Type(decl.qualified_name.clone())
    }

    pub fn for_field(owner: &TypeDecl, field: &FieldDecl) -> Self {
        ElementKey::Field {
            owner: owner.qualified_name.clone(),
            name: field.name.clone(),
        }
    }

    pub fn for_method(owner: &TypeDecl, method: &MethodDecl) -> Self {
        ElementKey::Method {
            owner: owner.qualified_name.clone(),
            name: method_key_name(method).to_string(),
            params: method_params(method),
        }
    }

    pub fn for_parameter(owner: &TypeDecl, method: &MethodDecl, index: usize) -> Self {
        ElementKey::Parameter {
            owner: owner.qualified_name.clone(),
            name: method_key_name(method).to_string(),
            params: method_params(method),
            index,
        }
    }

    /// Qualified name of the type that declares this element; a type key
    /// returns its own name.
    pub fn owner(&self) -> Option<&str> {
        match self {
            ElementKey::Package(_) => None,
            ElementKey::Type(name) => Some(name),
            ElementKey::Field { owner, .. }
            | ElementKey::Method { owner, .. }
            | ElementKey::Parameter { owner, .. } => Some(owner),
        }
    }

    /// Key of the enclosing method for a parameter key.
    pub fn method_key(&self) -> Option<ElementKey> {
        match self {
            ElementKey::Method { .. } => Some(self.clone()),
            ElementKey::Parameter {
                owner,
                name,
                params,
                ..
            } => Some(ElementKey::Method {
                owner: owner.clone(),
                name: name.clone(),
                params: params.clone(),
            }),
            _ => None,
        }
    }
}

fn method_key_name(method: &MethodDecl) -> &str {
    if method.is_constructor {
        CONSTRUCTOR_NAME
    } else {
        &method.name
    }
}

fn method_params(method: &MethodDecl) -> Vec<String> {
    method
        .parameters
        .iter()
        .map(|p| p.type_ref.signature_text())
        .collect()
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::Package(name) => write!(f, "{}{}", PACKAGE_PREFIX, name),
            ElementKey::Type(name) => f.write_str(name),
            ElementKey::Field { owner, name } => write!(f, "{}#{}", owner, name),
            ElementKey::Method {
                owner,
                name,
                params,
            } => write!(f, "{}#{}({})", owner, name, params.join(",")),
            ElementKey::Parameter {
                owner,
                name,
                params,
                index,
            } => write!(f, "{}#{}({})[{}]", owner, name, params.join(","), index),
        }
    }
}

impl FromStr for ElementKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        if let Some(pkg) = s.strip_prefix(PACKAGE_PREFIX) {
            return Ok(ElementKey::Package(pkg.to_string()));
        }
        let Some((owner, member)) = s.split_once('#') else {
            return Ok(ElementKey::Type(s.to_string()));
        };
        if owner.is_empty() || member.is_empty() {
            return Err(KeyParseError::Malformed(s.to_string()));
        }

        let Some(open) = member.find('(') else {
            return Ok(ElementKey::Field {
                owner: owner.to_string(),
                name: member.to_string(),
            });
        };
        let close = member
            .rfind(')')
            .filter(|&c| c > open)
            .ok_or_else(|| KeyParseError::Malformed(s.to_string()))?;

        let name = member[..open].to_string();
        let params: Vec<String> = member[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        let rest = &member[close + 1..];
        if rest.is_empty() {
            return Ok(ElementKey::Method {
                owner: owner.to_string(),
                name,
                params,
            });
        }

        let index = rest
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .and_then(|i| i.parse::<usize>().ok())
            .ok_or_else(|| KeyParseError::BadIndex(s.to_string()))?;
        Ok(ElementKey::Parameter {
            owner: owner.to_string(),
            name,
            params,
            index,
        })
    }
}

impl TryFrom<String> for ElementKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementKey> for String {
    fn from(key: ElementKey) -> Self {
        key.to_string()
    }
}

/// A declaration located in a compilation unit.
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Package(&'a PackageDecl),
    Type(&'a TypeDecl),
    Field(&'a TypeDecl, &'a FieldDecl),
    Method(&'a TypeDecl, &'a MethodDecl),
    Parameter(&'a TypeDecl, &'a MethodDecl, usize),
}

impl<'a> Element<'a> {
    pub fn key(&self) -> ElementKey {
        match *self {
            Element::Package(p) => ElementKey::for_package(&p.name),
            Element::Type(t) => ElementKey::for_type(t),
            Element::Field(t, f) => ElementKey::for_field(t, f),
            Element::Method(t, m) => ElementKey::for_method(t, m),
            Element::Parameter(t, m, i) => ElementKey::for_parameter(t, m, i),
        }
    }

    pub fn annotations(&self) -> &'a [Annotation] {
        match *self {
            Element::Package(p) => &p.annotations,
            Element::Type(t) => &t.annotations,
            Element::Field(_, f) => &f.annotations,
            Element::Method(_, m) => &m.annotations,
            Element::Parameter(_, m, i) => m
                .parameters
                .get(i)
                .map(|p| p.annotations.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn modifiers(&self) -> Option<&'a Modifiers> {
        match *self {
            Element::Package(_) => None,
            Element::Type(t) => Some(&t.modifiers),
            Element::Field(_, f) => Some(&f.modifiers),
            Element::Method(_, m) => Some(&m.modifiers),
            Element::Parameter(_, m, i) => m.parameters.get(i).map(|p| &p.modifiers),
        }
    }

    /// The type declaring this element, or the type itself.
    pub fn declaring_type(&self) -> Option<&'a TypeDecl> {
        match *self {
            Element::Package(_) => None,
            Element::Type(t)
            | Element::Field(t, _)
            | Element::Method(t, _)
            | Element::Parameter(t, _, _) => Some(t),
        }
    }

    pub fn method(&self) -> Option<&'a MethodDecl> {
        match *self {
            Element::Method(_, m) | Element::Parameter(_, m, _) => Some(m),
            _ => None,
        }
    }

    pub fn parameter(&self) -> Option<&'a ParamDecl> {
        match *self {
            Element::Parameter(_, m, i) => m.parameters.get(i),
            _ => None,
        }
    }

    pub fn span(&self) -> TextRange {
        match *self {
            Element::Package(p) => p.span,
            Element::Type(t) => t.span,
            Element::Field(_, f) => f.span,
            Element::Method(_, m) => m.span,
            Element::Parameter(_, m, i) => m.parameters.get(i).map(|p| p.span).unwrap_or(m.span),
        }
    }
}

impl CompilationUnit {
    /// Locate the declaration identified by `key`.
    pub fn find_element(&self, key: &ElementKey) -> Option<Element<'_>> {
        match key {
            ElementKey::Package(name) => self
                .package
                .as_ref()
                .filter(|p| &p.name == name)
                .map(Element::Package),
            ElementKey::Type(name) => self.find_type(name).map(Element::Type),
            ElementKey::Field { owner, name } => {
                let t = self.find_type(owner)?;
                t.field(name).map(|f| Element::Field(t, f))
            }
            ElementKey::Method { owner, .. } => {
                let t = self.find_type(owner)?;
                let m = t
                    .methods
                    .iter()
                    .find(|m| &ElementKey::for_method(t, m) == key)?;
                Some(Element::Method(t, m))
            }
            ElementKey::Parameter { owner, index, .. } => {
                let method_key = key.method_key()?;
                let t = self.find_type(owner)?;
                let m = t
                    .methods
                    .iter()
                    .find(|m| ElementKey::for_method(t, m) == method_key)?;
                (*index < m.parameters.len()).then_some(Element::Parameter(t, m, *index))
            }
        }
    }

    /// The innermost declaration whose span covers `range`.
    pub fn element_at(&self, range: TextRange) -> Option<Element<'_>> {
        fn in_type(t: &TypeDecl, range: TextRange) -> Option<Element<'_>> {
            if !t.span.covers(range) {
                return None;
            }
            if let Some(found) = t.types.iter().find_map(|n| in_type(n, range)) {
                return Some(found);
            }
            for m in &t.methods {
                if !m.span.covers(range) {
                    continue;
                }
                if let Some(i) = m.parameters.iter().position(|p| p.span.covers(range)) {
                    return Some(Element::Parameter(t, m, i));
                }
                return Some(Element::Method(t, m));
            }
            // declarators of one declaration share its span
            let field = t
                .fields
                .iter()
                .find(|f| f.name_span.covers(range))
                .or_else(|| t.fields.iter().find(|f| f.span.covers(range)));
            if let Some(f) = field {
                return Some(Element::Field(t, f));
            }
            Some(Element::Type(t))
        }

        if let Some(found) = self.types.iter().find_map(|t| in_type(t, range)) {
            return Some(found);
        }
        self.package
            .as_ref()
            .filter(|p| p.span.covers(range))
            .map(Element::Package)
    }

    /// Every declaration of the unit in declaration order: package, then for
    /// each type the type itself, its fields, its methods with their
    /// parameters, and its nested types.
    pub fn elements(&self) -> Vec<Element<'_>> {
        fn walk<'a>(t: &'a TypeDecl, out: &mut Vec<Element<'a>>) {
            out.push(Element::Type(t));
            out.extend(t.fields.iter().map(|f| Element::Field(t, f)));
            for m in &t.methods {
                out.push(Element::Method(t, m));
                out.extend((0..m.parameters.len()).map(|i| Element::Parameter(t, m, i)));
            }
            for nested in &t.types {
                walk(nested, out);
            }
        }

        let mut out = Vec::new();
        if let Some(p) = &self.package {
            out.push(Element::Package(p));
        }
        for t in &self.types {
            walk(t, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JavaParser;

    const SOURCE: &str = r#"package com.acme;

public class Person {
    private String name;

    public Person() {}

    public void greet(String who, int[] times) {}

    static class Inner {
        void run() {}
    }
}
"#;

    fn unit() -> CompilationUnit {
        JavaParser::new().parse("file:///Person.java", SOURCE).unwrap()
    }

    #[test]
    fn test_key_strings() {
        let unit = unit();
        let person = &unit.types[0];
        assert_eq!(ElementKey::for_type(person).to_string(), "com.acme.Person");
        assert_eq!(
            ElementKey::for_field(person, &person.fields[0]).to_string(),
            "com.acme.Person#name"
        );
        assert_eq!(
            ElementKey::for_method(person, &person.methods[0]).to_string(),
            "com.acme.Person#<init>()"
        );
        assert_eq!(
            ElementKey::for_parameter(person, &person.methods[1], 1).to_string(),
            "com.acme.Person#greet(String,int[])[1]"
        );
    }

    #[test]
    fn test_parse_and_find() {
        let unit = unit();
        for text in [
            "package:com.acme",
            "com.acme.Person",
            "com.acme.Person.Inner",
            "com.acme.Person#name",
            "com.acme.Person#<init>()",
            "com.acme.Person#greet(String,int[])",
            "com.acme.Person#greet(String,int[])[0]",
            "com.acme.Person.Inner#run()",
        ] {
            let key: ElementKey = text.parse().unwrap();
            assert_eq!(key.to_string(), text);
            let element = unit.find_element(&key).expect(text);
            assert_eq!(element.key(), key);
        }

        let missing: ElementKey = "com.acme.Person#greet(String)".parse().unwrap();
        assert!(unit.find_element(&missing).is_none());
    }

    #[test]
    fn test_malformed_keys() {
        assert_eq!("".parse::<ElementKey>(), Err(KeyParseError::Empty));
        assert!(matches!(
            "a.B#m(int".parse::<ElementKey>(),
            Err(KeyParseError::Malformed(_))
        ));
        assert!(matches!(
            "a.B#m(int)[x]".parse::<ElementKey>(),
            Err(KeyParseError::BadIndex(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let key: ElementKey = "com.acme.Person#name".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"com.acme.Person#name\"");
        let back: ElementKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_element_at_innermost() {
        let unit = unit();
        let offset = SOURCE.find("int[] times").unwrap();
        let element = unit
            .element_at(TextRange::new(offset, offset + 3))
            .unwrap();
        assert_eq!(
            element.key().to_string(),
            "com.acme.Person#greet(String,int[])[1]"
        );

        let offset = SOURCE.find("void run").unwrap();
        let element = unit.element_at(TextRange::new(offset, offset)).unwrap();
        assert_eq!(element.key().to_string(), "com.acme.Person.Inner#run()");
    }

    #[test]
    fn test_elements_in_declaration_order() {
        let unit = unit();
        let keys: Vec<String> = unit.elements().iter().map(|e| e.key().to_string()).collect();
        assert_eq!(keys[0], "package:com.acme");
        assert_eq!(keys[1], "com.acme.Person");
        assert_eq!(keys[2], "com.acme.Person#name");
        assert_eq!(keys.last().unwrap(), "com.acme.Person.Inner#run()");
    }
}
