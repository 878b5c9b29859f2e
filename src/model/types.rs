//! Declaration structures extracted from Java source.
//!
//! A [`CompilationUnit`] is a read-only snapshot of one source file: its
//! package, imports, and a tree of type declarations with their members.
//! Every node keeps byte-offset spans into the original text so that
//! corrections can be expressed as text edits over that same text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into a source text.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a range covering a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely inside this range.
    pub fn covers(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Java modifier keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Sealed,
    NonSealed,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
    Default,
}

impl Modifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Sealed => "sealed",
            Modifier::NonSealed => "non-sealed",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
            Modifier::Default => "default",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Modifier::Public),
            "protected" => Some(Modifier::Protected),
            "private" => Some(Modifier::Private),
            "abstract" => Some(Modifier::Abstract),
            "static" => Some(Modifier::Static),
            "final" => Some(Modifier::Final),
            "sealed" => Some(Modifier::Sealed),
            "non-sealed" => Some(Modifier::NonSealed),
            "transient" => Some(Modifier::Transient),
            "volatile" => Some(Modifier::Volatile),
            "synchronized" => Some(Modifier::Synchronized),
            "native" => Some(Modifier::Native),
            "strictfp" => Some(Modifier::Strictfp),
            "default" => Some(Modifier::Default),
            _ => None,
        }
    }

    pub fn is_visibility(&self) -> bool {
        matches!(
            self,
            Modifier::Public | Modifier::Protected | Modifier::Private
        )
    }

    /// Position in the conventional modifier order (JLS recommendation).
    pub fn rank(&self) -> u8 {
        match self {
            Modifier::Public | Modifier::Protected | Modifier::Private => 0,
            Modifier::Abstract => 1,
            Modifier::Default => 2,
            Modifier::Static => 3,
            Modifier::Final => 4,
            Modifier::Sealed | Modifier::NonSealed => 5,
            Modifier::Transient => 6,
            Modifier::Volatile => 7,
            Modifier::Synchronized => 8,
            Modifier::Native => 9,
            Modifier::Strictfp => 10,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A modifier keyword as it appears in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierToken {
    pub modifier: Modifier,
    pub span: TextRange,
}

/// The keyword modifiers of a declaration.
///
/// Annotations share the `modifiers` node in the grammar but are kept on the
/// declaration itself; this only tracks keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub tokens: Vec<ModifierToken>,
    /// Offset where a new keyword goes when there are no keyword tokens yet:
    /// the start of the first token following the annotations.
    pub insert_offset: usize,
}

impl Modifiers {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.tokens.iter().any(|t| t.modifier == modifier)
    }

    pub fn get(&self, modifier: Modifier) -> Option<&ModifierToken> {
        self.tokens.iter().find(|t| t.modifier == modifier)
    }

    pub fn is_public(&self) -> bool {
        self.has(Modifier::Public)
    }

    pub fn is_static(&self) -> bool {
        self.has(Modifier::Static)
    }

    pub fn is_final(&self) -> bool {
        self.has(Modifier::Final)
    }

    pub fn is_abstract(&self) -> bool {
        self.has(Modifier::Abstract)
    }
}

/// A value attached to an annotation member.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// Decoded string literal contents.
    String(String),
    Number(String),
    Boolean(bool),
    Char(String),
    /// `ElementType.FIELD` or a bare constant name.
    EnumConstant(String),
    /// The type of a class literal, e.g. `String` for `String.class`.
    TypeLiteral(String),
    Annotation(Box<Annotation>),
    Array(Vec<AnnotationValue>),
    /// Any other constant expression, kept verbatim.
    Expression(String),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// String values of a scalar or array value.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            AnnotationValue::String(s) => vec![s.as_str()],
            AnnotationValue::Array(items) => items.iter().filter_map(|v| v.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether an array value is empty (`{}`); scalars are never empty.
    pub fn is_empty_array(&self) -> bool {
        matches!(self, AnnotationValue::Array(items) if items.is_empty())
    }
}

/// A `name = value` pair inside an annotation's argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMember {
    pub name: String,
    pub value: AnnotationValue,
    /// True for the single-element form `@A(x)`, whose member is `value`.
    pub implicit: bool,
    /// Span of the whole pair (or of the value for the implicit form).
    pub span: TextRange,
    pub value_span: TextRange,
}

/// An annotation usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// The name as written, simple (`Inject`) or qualified (`jakarta.inject.Inject`).
    pub name: String,
    pub members: Vec<AnnotationMember>,
    /// Span of the parenthesised argument list, if any.
    pub arguments: Option<TextRange>,
    pub span: TextRange,
}

impl Annotation {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn member(&self, name: &str) -> Option<&AnnotationMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }
}

/// A reference to a type as written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Full text as written, e.g. `List<String>` or `int[]`.
    pub text: String,
    /// Erasure as written, without type arguments or array brackets,
    /// e.g. `List`, `java.util.Map.Entry`, `int`.
    pub name: String,
    pub array_dims: usize,
    pub primitive: bool,
    pub varargs: bool,
    pub span: TextRange,
}

impl TypeRef {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn is_array(&self) -> bool {
        self.array_dims > 0 || self.varargs
    }

    pub fn is_void(&self) -> bool {
        self.primitive && self.name == "void" && !self.is_array()
    }

    /// Erased form used in member signatures, e.g. `String[]`.
    pub fn signature_text(&self) -> String {
        let dims = self.array_dims + usize::from(self.varargs);
        format!("{}{}", self.name, "[]".repeat(dims))
    }
}

#[derive(Debug, Clone)]
pub struct PackageDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The imported name, without a trailing `.*`.
    pub path: String,
    pub is_static: bool,
    /// `import p.*;`
    pub on_demand: bool,
    pub span: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "annotation",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub type_ref: TypeRef,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    /// Span of the whole field declaration (shared by all its declarators).
    pub span: TextRange,
    pub name_span: TextRange,
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub type_ref: TypeRef,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub span: TextRange,
    pub name_span: TextRange,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub is_constructor: bool,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub type_parameters: Vec<String>,
    /// `None` for constructors.
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<ParamDecl>,
    /// Span of the parenthesised parameter list.
    pub parameters_span: TextRange,
    pub throws: Vec<TypeRef>,
    /// Span of the `throws A, B` clause.
    pub throws_span: Option<TextRange>,
    pub body: Option<TextRange>,
    pub span: TextRange,
    pub name_span: TextRange,
}

impl MethodDecl {
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.as_ref().map(|t| t.is_void()).unwrap_or(false)
    }
}

/// A class, interface, enum, record or annotation type.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    /// Dotted qualified name, nested types included: `com.acme.Outer.Inner`.
    pub qualified_name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub type_parameters: Vec<String>,
    pub superclass: Option<TypeRef>,
    /// `implements` list for classes, `extends` list for interfaces.
    pub interfaces: Vec<TypeRef>,
    /// Span of the interface type list, when present.
    pub interfaces_span: Option<TextRange>,
    /// Offset just after the name and type parameters.
    pub header_end: usize,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub types: Vec<TypeDecl>,
    pub is_nested: bool,
    pub span: TextRange,
    pub name_span: TextRange,
    /// Span of the body including braces.
    pub body: TextRange,
}

impl TypeDecl {
    pub fn constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.is_constructor)
    }

    /// Methods that are not constructors.
    pub fn plain_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| !m.is_constructor)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub uri: String,
    pub source: String,
    pub package: Option<PackageDecl>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
    pub has_errors: bool,
}

impl CompilationUnit {
    /// Package name, or the empty string for the default package.
    pub fn package_name(&self) -> &str {
        self.package.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    /// All type declarations in declaration order, outer types first.
    pub fn all_types(&self) -> Vec<&TypeDecl> {
        fn walk<'a>(types: &'a [TypeDecl], out: &mut Vec<&'a TypeDecl>) {
            for t in types {
                out.push(t);
                walk(&t.types, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.types, &mut out);
        out
    }

    pub fn find_type(&self, qualified_name: &str) -> Option<&TypeDecl> {
        self.all_types()
            .into_iter()
            .find(|t| t.qualified_name == qualified_name)
    }

    /// Source text for a span.
    pub fn text(&self, span: TextRange) -> &str {
        self.source.get(span.start..span.end).unwrap_or("")
    }
}

/// Last dotted segment of a name.
pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Everything before the last dot, or the empty string.
pub fn package_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
}
