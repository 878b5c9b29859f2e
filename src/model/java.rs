//! Java source parser using tree-sitter.
//!
//! Produces a [`CompilationUnit`] with every declaration the rule engine
//! inspects. Syntax errors do not abort parsing; tree-sitter recovers and the
//! unit is flagged with `has_errors`.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use super::types::{
    Annotation, AnnotationMember, AnnotationValue, CompilationUnit, FieldDecl, Import,
    MethodDecl, Modifier, ModifierToken, Modifiers, PackageDecl, ParamDecl, TextRange, TypeDecl,
    TypeKind, TypeRef,
};

/// Tree-sitter query for import declarations.
const IMPORT_QUERY: &str = r#"
(import_declaration
  [(identifier) (scoped_identifier)] @import_path
) @import
"#;

/// Tree-sitter query for the package declaration.
const PACKAGE_QUERY: &str = r#"
(package_declaration
  [(identifier) (scoped_identifier)] @package_name
) @package
"#;

const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

pub struct JavaParser {
    language: Language,
}

impl JavaParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse `source` into a compilation unit identified by `uri`.
    pub fn parse(&self, uri: &str, source: &str) -> anyhow::Result<CompilationUnit> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Java source: {}", uri))?;
        let root = tree.root_node();
        let extractor = Extractor { source };

        let package = self.extract_package(&extractor, root)?;
        let imports = self.extract_imports(&extractor, root)?;
        let package_name = package.as_ref().map(|p| p.name.clone()).unwrap_or_default();
        let types = extractor.types_in(root, &package_name, false);

        Ok(CompilationUnit {
            uri: uri.to_string(),
            source: source.to_string(),
            package,
            imports,
            types,
            has_errors: root.has_error(),
        })
    }

    fn extract_package(
        &self,
        extractor: &Extractor,
        root: Node,
    ) -> anyhow::Result<Option<PackageDecl>> {
        let query = Query::new(&self.language, PACKAGE_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, extractor.source.as_bytes());

        while let Some(m) = matches.next() {
            let mut name = None;
            let mut decl = None;
            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "package_name" => name = Some(extractor.text(capture.node).to_string()),
                    "package" => decl = Some(capture.node),
                    _ => {}
                }
            }
            if let (Some(name), Some(node)) = (name, decl) {
                let mut walker = node.walk();
                let annotations = node
                    .named_children(&mut walker)
                    .filter_map(|c| extractor.annotation(c))
                    .collect();
                return Ok(Some(PackageDecl {
                    name,
                    annotations,
                    span: TextRange::from_node(node),
                }));
            }
        }
        Ok(None)
    }

    fn extract_imports(&self, extractor: &Extractor, root: Node) -> anyhow::Result<Vec<Import>> {
        let query = Query::new(&self.language, IMPORT_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, extractor.source.as_bytes());

        let mut imports = Vec::new();
        while let Some(m) = matches.next() {
            let mut path = String::new();
            let mut import_node = None;
            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "import_path" => path = extractor.text(capture.node).to_string(),
                    "import" => import_node = Some(capture.node),
                    _ => {}
                }
            }
            let Some(node) = import_node else { continue };
            if path.is_empty() {
                continue;
            }
            let mut walker = node.walk();
            let children: Vec<Node> = node.children(&mut walker).collect();
            imports.push(Import {
                path,
                is_static: children.iter().any(|c| c.kind() == "static"),
                on_demand: children.iter().any(|c| c.kind() == "asterisk"),
                span: TextRange::from_node(node),
            });
        }

        imports.sort_by_key(|i| i.span.start);
        Ok(imports)
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks the syntax tree of one source text.
struct Extractor<'s> {
    source: &'s str,
}

impl<'s> Extractor<'s> {
    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn types_in(&self, parent: Node, prefix: &str, nested: bool) -> Vec<TypeDecl> {
        let mut walker = parent.walk();
        parent
            .named_children(&mut walker)
            .filter(|c| TYPE_DECLARATION_KINDS.contains(&c.kind()))
            .filter_map(|c| self.type_decl(c, prefix, nested))
            .collect()
    }

    fn type_decl(&self, node: Node, prefix: &str, nested: bool) -> Option<TypeDecl> {
        let name_node = node.child_by_field_name("name")?;
        let name = self.text(name_node).to_string();
        let qualified_name = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        let kind = match node.kind() {
            "class_declaration" => TypeKind::Class,
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_declaration" => TypeKind::Record,
            _ => TypeKind::Annotation,
        };
        let (modifiers, annotations) = self.modifiers(node);

        let type_params_node = node.child_by_field_name("type_parameters");
        let type_parameters = type_params_node
            .map(|n| self.type_parameters(n))
            .unwrap_or_default();

        let mut header_end = type_params_node
            .map(|n| n.end_byte())
            .unwrap_or_else(|| name_node.end_byte());

        let superclass = node
            .child_by_field_name("superclass")
            .and_then(|s| s.named_child(0))
            .map(|t| self.type_ref(t, 0, false));

        let interface_list = match kind {
            TypeKind::Interface => {
                let mut walker = node.walk();
                let found = node
                    .children(&mut walker)
                    .find(|c| c.kind() == "extends_interfaces");
                found
            }
            _ => node.child_by_field_name("interfaces"),
        }
        .and_then(|n| {
            let mut walker = n.walk();
            let found = n.named_children(&mut walker).find(|c| c.kind() == "type_list");
            found
        });
        let interfaces = interface_list
            .map(|list| {
                let mut walker = list.walk();
                list.named_children(&mut walker)
                    .map(|t| self.type_ref(t, 0, false))
                    .collect()
            })
            .unwrap_or_default();

        let mut fields = Vec::new();
        if kind == TypeKind::Record {
            if let Some(components) = node.child_by_field_name("parameters") {
                header_end = components.end_byte();
                let mut walker = components.walk();
                for param in components.named_children(&mut walker) {
                    if let Some(p) = self.parameter(param) {
                        fields.push(FieldDecl {
                            name: p.name,
                            type_ref: p.type_ref,
                            modifiers: p.modifiers,
                            annotations: p.annotations,
                            span: p.span,
                            name_span: p.name_span,
                        });
                    }
                }
            }
        }

        let body_node = node.child_by_field_name("body");
        let mut methods = Vec::new();
        let mut types = Vec::new();
        if let Some(body) = body_node {
            let member_parent = if kind == TypeKind::Enum {
                let mut walker = body.walk();
                let decls = body
                    .named_children(&mut walker)
                    .find(|c| c.kind() == "enum_body_declarations");
                decls
            } else {
                Some(body)
            };
            if let Some(parent) = member_parent {
                let mut walker = parent.walk();
                for member in parent.named_children(&mut walker) {
                    match member.kind() {
                        "field_declaration" | "constant_declaration" => {
                            fields.extend(self.field_decls(member))
                        }
                        "method_declaration" => methods.extend(self.method_decl(member, false)),
                        "constructor_declaration" => {
                            methods.extend(self.method_decl(member, true))
                        }
                        k if TYPE_DECLARATION_KINDS.contains(&k) => {
                            types.extend(self.type_decl(member, &qualified_name, true))
                        }
                        _ => {}
                    }
                }
            }
        }

        Some(TypeDecl {
            name,
            qualified_name,
            kind,
            modifiers,
            annotations,
            type_parameters,
            superclass,
            interfaces,
            interfaces_span: interface_list.map(TextRange::from_node),
            header_end,
            fields,
            methods,
            types,
            is_nested: nested,
            span: TextRange::from_node(node),
            name_span: TextRange::from_node(name_node),
            body: body_node.map(TextRange::from_node).unwrap_or_default(),
        })
    }

    fn type_parameters(&self, node: Node) -> Vec<String> {
        let mut walker = node.walk();
        node.named_children(&mut walker)
            .filter(|c| c.kind() == "type_parameter")
            .filter_map(|p| {
                let mut w = p.walk();
                let name = p
                    .named_children(&mut w)
                    .find(|c| c.kind() == "type_identifier" || c.kind() == "identifier")
                    .map(|c| self.text(c).to_string());
                name
            })
            .collect()
    }

    /// Keyword modifiers and annotations of a declaration.
    fn modifiers(&self, decl: Node) -> (Modifiers, Vec<Annotation>) {
        let mut walker = decl.walk();
        let modifiers_node = decl
            .children(&mut walker)
            .find(|c| c.kind() == "modifiers");

        let Some(mods) = modifiers_node else {
            return (
                Modifiers {
                    tokens: Vec::new(),
                    insert_offset: decl.start_byte(),
                },
                Vec::new(),
            );
        };

        let mut tokens = Vec::new();
        let mut annotations = Vec::new();
        let mut walker = mods.walk();
        for child in mods.children(&mut walker) {
            if let Some(annotation) = self.annotation(child) {
                annotations.push(annotation);
            } else if let Some(modifier) = Modifier::parse(child.kind()) {
                tokens.push(ModifierToken {
                    modifier,
                    span: TextRange::from_node(child),
                });
            }
        }

        let insert_offset = mods
            .next_sibling()
            .map(|n| n.start_byte())
            .unwrap_or_else(|| mods.end_byte());

        (
            Modifiers {
                tokens,
                insert_offset,
            },
            annotations,
        )
    }

    fn annotation(&self, node: Node) -> Option<Annotation> {
        match node.kind() {
            "marker_annotation" => Some(Annotation {
                name: self.text(node.child_by_field_name("name")?).to_string(),
                members: Vec::new(),
                arguments: None,
                span: TextRange::from_node(node),
            }),
            "annotation" => {
                let name = self.text(node.child_by_field_name("name")?).to_string();
                let args = node.child_by_field_name("arguments");
                let mut members = Vec::new();
                if let Some(list) = args {
                    let mut walker = list.walk();
                    for arg in list.named_children(&mut walker) {
                        match arg.kind() {
                            "line_comment" | "block_comment" => {}
                            "element_value_pair" => {
                                let (Some(key), Some(value)) = (
                                    arg.child_by_field_name("key"),
                                    arg.child_by_field_name("value"),
                                ) else {
                                    continue;
                                };
                                members.push(AnnotationMember {
                                    name: self.text(key).to_string(),
                                    value: self.element_value(value),
                                    implicit: false,
                                    span: TextRange::from_node(arg),
                                    value_span: TextRange::from_node(value),
                                });
                            }
                            _ => members.push(AnnotationMember {
                                name: "value".to_string(),
                                value: self.element_value(arg),
                                implicit: true,
                                span: TextRange::from_node(arg),
                                value_span: TextRange::from_node(arg),
                            }),
                        }
                    }
                }
                Some(Annotation {
                    name,
                    members,
                    arguments: args.map(TextRange::from_node),
                    span: TextRange::from_node(node),
                })
            }
            _ => None,
        }
    }

    fn element_value(&self, node: Node) -> AnnotationValue {
        match node.kind() {
            "string_literal" => AnnotationValue::String(unquote(self.text(node))),
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal" => {
                AnnotationValue::Number(self.text(node).to_string())
            }
            "true" => AnnotationValue::Boolean(true),
            "false" => AnnotationValue::Boolean(false),
            "character_literal" => AnnotationValue::Char(self.text(node).to_string()),
            "class_literal" => {
                let name = node
                    .named_child(0)
                    .map(|t| self.type_ref(t, 0, false).name)
                    .unwrap_or_default();
                AnnotationValue::TypeLiteral(name)
            }
            "identifier" | "field_access" | "scoped_identifier" => {
                AnnotationValue::EnumConstant(self.text(node).to_string())
            }
            "element_value_array_initializer" => {
                let mut walker = node.walk();
                let items = node
                    .named_children(&mut walker)
                    .filter(|c| !matches!(c.kind(), "line_comment" | "block_comment"))
                    .map(|c| self.element_value(c))
                    .collect();
                AnnotationValue::Array(items)
            }
            "annotation" | "marker_annotation" => match self.annotation(node) {
                Some(a) => AnnotationValue::Annotation(Box::new(a)),
                None => AnnotationValue::Expression(self.text(node).to_string()),
            },
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.element_value(inner),
                None => AnnotationValue::Expression(self.text(node).to_string()),
            },
            _ => AnnotationValue::Expression(self.text(node).to_string()),
        }
    }

    /// Build a type reference from a type node; `extra_dims` counts C-style
    /// brackets written after the declarator name.
    fn type_ref(&self, node: Node, extra_dims: usize, varargs: bool) -> TypeRef {
        let mut base = node;
        let mut dims = extra_dims;
        if base.kind() == "annotated_type" {
            if let Some(last) = base.named_child(base.named_child_count().saturating_sub(1)) {
                base = last;
            }
        }
        if base.kind() == "array_type" {
            if let Some(d) = base.child_by_field_name("dimensions") {
                dims += count_dims(self.text(d));
            }
            if let Some(element) = base.child_by_field_name("element") {
                base = element;
            }
        }
        let primitive = matches!(
            base.kind(),
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type"
        );
        TypeRef {
            text: self.text(node).to_string(),
            name: erasure(self.text(base)),
            array_dims: dims,
            primitive,
            varargs,
            span: TextRange::from_node(node),
        }
    }

    fn field_decls(&self, node: Node) -> Vec<FieldDecl> {
        let (modifiers, annotations) = self.modifiers(node);
        let Some(type_node) = node.child_by_field_name("type") else {
            return Vec::new();
        };
        let mut walker = node.walk();
        node.children_by_field_name("declarator", &mut walker)
            .filter_map(|declarator| {
                let name_node = declarator.child_by_field_name("name")?;
                let dims = declarator
                    .child_by_field_name("dimensions")
                    .map(|d| count_dims(self.text(d)))
                    .unwrap_or(0);
                Some(FieldDecl {
                    name: self.text(name_node).to_string(),
                    type_ref: self.type_ref(type_node, dims, false),
                    modifiers: modifiers.clone(),
                    annotations: annotations.clone(),
                    span: TextRange::from_node(node),
                    name_span: TextRange::from_node(name_node),
                })
            })
            .collect()
    }

    fn method_decl(&self, node: Node, is_constructor: bool) -> Option<MethodDecl> {
        let name_node = node.child_by_field_name("name")?;
        let params_node = node.child_by_field_name("parameters")?;
        let (modifiers, annotations) = self.modifiers(node);

        let type_parameters = node
            .child_by_field_name("type_parameters")
            .map(|n| self.type_parameters(n))
            .unwrap_or_default();

        let return_type = if is_constructor {
            None
        } else {
            let dims = node
                .child_by_field_name("dimensions")
                .map(|d| count_dims(self.text(d)))
                .unwrap_or(0);
            node.child_by_field_name("type")
                .map(|t| self.type_ref(t, dims, false))
        };

        let mut walker = params_node.walk();
        let parameters = params_node
            .named_children(&mut walker)
            .filter_map(|p| self.parameter(p))
            .collect();

        let mut walker = node.walk();
        let throws_node = node.children(&mut walker).find(|c| c.kind() == "throws");
        let throws = throws_node
            .map(|t| {
                let mut w = t.walk();
                t.named_children(&mut w)
                    .map(|ty| self.type_ref(ty, 0, false))
                    .collect()
            })
            .unwrap_or_default();

        Some(MethodDecl {
            name: self.text(name_node).to_string(),
            is_constructor,
            modifiers,
            annotations,
            type_parameters,
            return_type,
            parameters,
            parameters_span: TextRange::from_node(params_node),
            throws,
            throws_span: throws_node.map(TextRange::from_node),
            body: node.child_by_field_name("body").map(TextRange::from_node),
            span: TextRange::from_node(node),
            name_span: TextRange::from_node(name_node),
        })
    }

    fn parameter(&self, node: Node) -> Option<ParamDecl> {
        let (modifiers, annotations) = self.modifiers(node);
        match node.kind() {
            "formal_parameter" => {
                let name_node = node.child_by_field_name("name")?;
                let dims = node
                    .child_by_field_name("dimensions")
                    .map(|d| count_dims(self.text(d)))
                    .unwrap_or(0);
                let type_node = node.child_by_field_name("type")?;
                Some(ParamDecl {
                    name: self.text(name_node).to_string(),
                    type_ref: self.type_ref(type_node, dims, false),
                    modifiers,
                    annotations,
                    span: TextRange::from_node(node),
                    name_span: TextRange::from_node(name_node),
                })
            }
            "spread_parameter" => {
                let mut walker = node.walk();
                let children: Vec<Node> = node.named_children(&mut walker).collect();
                let type_node = children
                    .iter()
                    .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))?;
                let declarator = children.iter().find(|c| c.kind() == "variable_declarator")?;
                let name_node = declarator.child_by_field_name("name")?;
                Some(ParamDecl {
                    name: self.text(name_node).to_string(),
                    type_ref: self.type_ref(*type_node, 0, true),
                    modifiers,
                    annotations,
                    span: TextRange::from_node(node),
                    name_span: TextRange::from_node(name_node),
                })
            }
            _ => None,
        }
    }
}

fn count_dims(text: &str) -> usize {
    text.matches('[').count()
}

/// Strip type arguments and whitespace: `Map<String, List<X>>` -> `Map`,
/// `Outer<T>.Inner` -> `Outer.Inner`.
fn erasure(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decode a Java string literal (or text block) to its contents.
fn unquote(literal: &str) -> String {
    let inner = if let Some(rest) = literal.strip_prefix("\"\"\"") {
        text_block_body(rest.strip_suffix("\"\"\"").unwrap_or(rest))
    } else {
        let rest = literal.strip_prefix('"').unwrap_or(literal);
        rest.strip_suffix('"').unwrap_or(rest).to_string()
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('s') => out.push(' '),
            Some('0') => out.push('\0'),
            Some('u') => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some('\n') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Lines of a text block body after the opening delimiter line, with the
/// incidental indentation they share. The closing delimiter's line counts
/// toward the indentation.
fn text_block_lines(raw: &str) -> (Vec<&str>, usize) {
    let body = raw.split_once('\n').map_or(raw, |(_, rest)| rest);
    let lines: Vec<&str> = body.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let last = lines.len() - 1;
    let indent = lines
        .iter()
        .enumerate()
        .filter(|(i, l)| *i == last || !l.trim().is_empty())
        .map(|(_, l)| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    (lines, indent)
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let start = line.char_indices().nth(indent).map_or(line.len(), |(i, _)| i);
    &line[start..]
}

/// Text block contents without incidental indentation or trailing spaces.
fn text_block_body(raw: &str) -> String {
    let (lines, indent) = text_block_lines(raw);
    lines
        .iter()
        .map(|l| strip_indent(l, indent).trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offset into `literal` where its decoded value begins: just after the
/// opening quote, or for a text block after the incidental indentation of
/// its first content line. `None` for a text block whose first content line
/// is shorter than that indentation.
pub fn literal_value_start(literal: &str) -> Option<usize> {
    let Some(rest) = literal.strip_prefix("\"\"\"") else {
        return literal.starts_with('"').then_some(1);
    };
    let raw = rest.strip_suffix("\"\"\"").unwrap_or(rest);
    let (newline, _) = raw.char_indices().find(|(_, c)| *c == '\n')?;
    let (lines, indent) = text_block_lines(raw);
    let first = lines[0];
    if first.chars().count() < indent {
        return None;
    }
    let skipped = first.len() - strip_indent(first, indent).len();
    Some(3 + newline + 1 + skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_java(source: &str) -> CompilationUnit {
        JavaParser::new().parse("file:///Test.java", source).unwrap()
    }

    #[test]
    fn test_extract_package_and_imports() {
        let unit = parse_java(
            r#"
package com.example;

import java.util.List;
import jakarta.inject.*;
import static java.lang.Math.PI;

public class Test {}
"#,
        );

        assert_eq!(unit.package_name(), "com.example");
        assert_eq!(unit.imports.len(), 3);
        assert_eq!(unit.imports[0].path, "java.util.List");
        assert!(unit.imports[1].on_demand);
        assert_eq!(unit.imports[1].path, "jakarta.inject");
        assert!(unit.imports[2].is_static);
        assert_eq!(unit.types[0].qualified_name, "com.example.Test");
    }

    #[test]
    fn test_extract_members() {
        let unit = parse_java(
            r#"
package p;

@Entity
public final class Person extends Base implements Serializable, Comparable<Person> {
    @Id private Long id;
    private String first, last;
    int[] scores;

    protected Person(String name, int... ages) throws IOException, SQLException {}

    public <T> List<T> items() { return null; }

    static class Inner {}
}
"#,
        );

        let person = &unit.types[0];
        assert_eq!(person.kind, TypeKind::Class);
        assert!(person.modifiers.is_final());
        assert!(person.modifiers.is_public());
        assert_eq!(person.annotations[0].name, "Entity");
        assert_eq!(person.superclass.as_ref().unwrap().name, "Base");
        assert_eq!(person.interfaces.len(), 2);
        assert_eq!(person.interfaces[1].name, "Comparable");

        let names: Vec<_> = person.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "first", "last", "scores"]);
        assert_eq!(person.fields[3].type_ref.array_dims, 1);
        assert_eq!(person.fields[0].annotations[0].name, "Id");

        let ctor = person.constructors().next().unwrap();
        assert_eq!(ctor.parameters.len(), 2);
        assert!(ctor.parameters[1].type_ref.varargs);
        assert_eq!(ctor.parameters[1].type_ref.signature_text(), "int[]");
        assert_eq!(ctor.throws.len(), 2);
        assert_eq!(ctor.throws[1].name, "SQLException");

        let items = person.plain_methods().next().unwrap();
        assert!(items.is_generic());
        assert_eq!(items.return_type.as_ref().unwrap().name, "List");

        assert_eq!(person.types[0].qualified_name, "p.Person.Inner");
        assert!(person.types[0].is_nested);
        assert!(person.types[0].modifiers.is_static());
    }

    #[test]
    fn test_annotation_values() {
        let unit = parse_java(
            r#"
@WebServlet(name = "hello", urlPatterns = {"/a", "/b"}, loadOnStartup = 1, asyncSupported = true)
@ServerEndpoint("chat/{room}")
@Target(ElementType.FIELD)
@Resource(type = String.class)
class C {}
"#,
        );
        let c = &unit.types[0];
        let servlet = &c.annotations[0];
        assert_eq!(servlet.member("name").unwrap().value.as_str(), Some("hello"));
        assert_eq!(
            servlet.member("urlPatterns").unwrap().value.strings(),
            vec!["/a", "/b"]
        );
        assert_eq!(
            servlet.member("loadOnStartup").unwrap().value,
            AnnotationValue::Number("1".to_string())
        );
        assert_eq!(
            servlet.member("asyncSupported").unwrap().value,
            AnnotationValue::Boolean(true)
        );

        let endpoint = &c.annotations[1];
        let value = endpoint.member("value").unwrap();
        assert!(value.implicit);
        assert_eq!(value.value.as_str(), Some("chat/{room}"));

        assert_eq!(
            c.annotations[2].member("value").unwrap().value,
            AnnotationValue::EnumConstant("ElementType.FIELD".to_string())
        );
        assert_eq!(
            c.annotations[3].member("type").unwrap().value,
            AnnotationValue::TypeLiteral("String".to_string())
        );
    }

    #[test]
    fn test_modifier_insert_offset() {
        let source = "class A {\n    @Inject\n    void run() {}\n}\n";
        let unit = parse_java(source);
        let run = &unit.types[0].methods[0];
        assert!(run.modifiers.tokens.is_empty());
        assert_eq!(&source[run.modifiers.insert_offset..run.modifiers.insert_offset + 4], "void");
    }

    #[test]
    fn test_erasure_and_unquote() {
        assert_eq!(erasure("Map<String, List<X>>"), "Map");
        assert_eq!(erasure("Outer<T>.Inner"), "Outer.Inner");
        assert_eq!(unquote(r#""a\"b\n""#), "a\"b\n");
        assert_eq!(unquote(r#""A""#), "A");
    }

    #[test]
    fn test_text_block_drops_incidental_indent() {
        assert_eq!(unquote("\"\"\"\n        chat\"\"\""), "chat");
        assert_eq!(unquote("\"\"\"\n        a\n          b  \n        \"\"\""), "a\n  b\n");
        assert_eq!(unquote("\"\"\"\n    one \\\n    two\"\"\""), "one two");
        // closing delimiter left of the content keeps the extra spaces
        assert_eq!(unquote("\"\"\"\n      x\n    \"\"\""), "  x\n");
    }

    #[test]
    fn test_value_start() {
        assert_eq!(literal_value_start("\"chat\""), Some(1));
        let block = "\"\"\"\n        chat\n      \"\"\"";
        assert_eq!(&block[literal_value_start(block).unwrap()..], "  chat\n      \"\"\"");
        assert_eq!(literal_value_start("\"\"\"\n\n    chat\"\"\""), None);
        assert_eq!(literal_value_start("chat"), None);
    }

    #[test]
    fn test_tolerates_syntax_errors() {
        let unit = parse_java("class Broken { void m( { }");
        assert!(unit.has_errors);
    }
}
