//! Generic quick-fix strategies, parameterized per registration.

use crate::diagnostics::Diagnostic;
use crate::model::{simple_name, ElementKey, Modifier};
use crate::proposals::{
    AddConstructorProposal, AddSupertypeProposal, ChangeReturnTypeProposal, CorrectionProposal,
    DeleteAnnotationProposal, EditComputationError, ModifierTarget, ModifyAttributesProposal,
    ModifyModifiersProposal, ParameterSelection, PrefixSlashProposal, RemoveParametersProposal,
    RemoveThrownExceptionsProposal, SupertypeKind, DEFAULT_RELEVANCE,
};
use crate::rules::{at, at_list};

use super::action::{CodeAction, ResolveData};
use super::participant::{ProposeContext, QuickFixParticipant};

const ANNOTATIONS: &str = "annotations";
const ANNOTATION: &str = "annotation";
const ATTRIBUTES: &str = "attributes";
const MODIFIERS: &str = "modifiers";
const VISIBILITY: &str = "visibility";
const EXCEPTIONS: &str = "exceptions";
const PARAMETERS: &str = "parameters";

fn required(data: &ResolveData, key: &str) -> Result<Vec<String>, EditComputationError> {
    let values = data.strings(key);
    if values.is_empty() {
        return Err(EditComputationError::InvalidData(format!(
            "missing '{}' entry",
            key
        )));
    }
    Ok(values)
}

fn quoted(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("'{}'", k))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which annotations a [`RemoveAnnotationFix`] removes.
#[derive(Debug, Clone)]
pub enum RemoveMode {
    /// Always these annotations.
    Fixed(Vec<&'static str>),
    /// One action per annotation named in the diagnostic data.
    EachFromData,
    /// One action removing every annotation named in the data.
    AllFromData,
    /// One action removing the data's annotations except this one.
    AllFromDataExcept(&'static str),
    /// One action per data annotation, removing all the others.
    KeepEachFromData,
}

pub struct RemoveAnnotationFix {
    id: String,
    mode: RemoveMode,
    relevance: i32,
}

impl RemoveAnnotationFix {
    pub fn new(id: impl Into<String>, mode: RemoveMode) -> Self {
        Self {
            id: id.into(),
            mode,
            relevance: DEFAULT_RELEVANCE,
        }
    }

    pub fn with_relevance(mut self, relevance: i32) -> Self {
        self.relevance = relevance;
        self
    }

    fn removal_sets(&self, diagnostic: &Diagnostic) -> Vec<Vec<String>> {
        let data = diagnostic.data_strings();
        match &self.mode {
            RemoveMode::Fixed(names) => vec![names.iter().map(|n| n.to_string()).collect()],
            RemoveMode::EachFromData => data.into_iter().map(|n| vec![n]).collect(),
            RemoveMode::AllFromData => vec![data],
            RemoveMode::AllFromDataExcept(keep) => {
                vec![data.into_iter().filter(|n| n != keep).collect()]
            }
            RemoveMode::KeepEachFromData => data
                .iter()
                .map(|kept| data.iter().filter(|n| *n != kept).cloned().collect())
                .collect(),
        }
    }
}

impl QuickFixParticipant for RemoveAnnotationFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        self.removal_sets(diagnostic)
            .into_iter()
            .filter(|names| !names.is_empty())
            .map(|names| {
                let title = format!("Remove {}", at_list(&names));
                let data = ctx.resolve_data(&self.id, diagnostic).with(ANNOTATIONS, names);
                ctx.action(title, diagnostic, data)
            })
            .collect()
    }

    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        let names = required(data, ANNOTATIONS)?;
        let label = format!("Remove {}", at_list(&names));
        Ok(Box::new(
            DeleteAnnotationProposal::new(label, names).with_relevance(self.relevance),
        ))
    }

    fn relevance(&self) -> i32 {
        self.relevance
    }
}

/// Adds or removes modifier keywords.
pub struct ModifierFix {
    id: String,
    title: String,
    target: ModifierTarget,
    add: Vec<Modifier>,
    remove: Vec<Modifier>,
    /// Remove the keywords listed in the diagnostic data instead.
    remove_from_data: bool,
}

impl ModifierFix {
    pub fn new(id: impl Into<String>, title: impl Into<String>, target: ModifierTarget) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target,
            add: Vec::new(),
            remove: Vec::new(),
            remove_from_data: false,
        }
    }

    pub fn adding(mut self, modifier: Modifier) -> Self {
        self.add.push(modifier);
        self
    }

    pub fn removing(mut self, modifier: Modifier) -> Self {
        self.remove.push(modifier);
        self
    }

    pub fn removing_from_data(mut self) -> Self {
        self.remove_from_data = true;
        self
    }
}

impl QuickFixParticipant for ModifierFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        let data = ctx.resolve_data(&self.id, diagnostic);
        if !self.remove_from_data {
            return vec![ctx.action(self.title.clone(), diagnostic, data)];
        }
        let keywords: Vec<String> = diagnostic
            .data_strings()
            .into_iter()
            .filter(|k| Modifier::parse(k).is_some())
            .collect();
        if keywords.is_empty() {
            return Vec::new();
        }
        let title = format!("{} {}", self.title, quoted(&keywords));
        vec![ctx.action(title, diagnostic, data.with(MODIFIERS, keywords))]
    }

    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        let remove = if self.remove_from_data {
            required(data, MODIFIERS)?
                .iter()
                .map(|k| {
                    Modifier::parse(k).ok_or_else(|| {
                        EditComputationError::InvalidData(format!("unknown modifier '{}'", k))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.remove.clone()
        };
        Ok(Box::new(
            ModifyModifiersProposal::new(self.title.clone(), self.target)
                .adding(self.add.clone())
                .removing(remove),
        ))
    }
}

/// One "add a no-arg constructor" action per visibility.
pub struct AddConstructorFix {
    id: String,
    visibilities: Vec<Modifier>,
}

impl AddConstructorFix {
    pub fn new(id: impl Into<String>, visibilities: Vec<Modifier>) -> Self {
        Self {
            id: id.into(),
            visibilities,
        }
    }
}

fn constructor_title(visibility: Modifier) -> String {
    format!("Add a no-arg {} constructor to this class", visibility.keyword())
}

impl QuickFixParticipant for AddConstructorFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        let Some(owner) = ctx.element.declaring_type() else {
            return Vec::new();
        };
        self.visibilities
            .iter()
            .map(|v| {
                let data = ctx
                    .resolve_data_for(&self.id, diagnostic, ElementKey::for_type(owner))
                    .with(VISIBILITY, v.keyword());
                ctx.action(constructor_title(*v), diagnostic, data)
            })
            .collect()
    }

    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        let visibility = data
            .string(VISIBILITY)
            .and_then(Modifier::parse)
            .filter(|m| m.is_visibility())
            .ok_or_else(|| EditComputationError::InvalidData("missing constructor visibility".into()))?;
        Ok(Box::new(AddConstructorProposal::new(
            constructor_title(visibility),
            visibility,
        )))
    }
}

/// Removes the exceptions listed in the diagnostic data from `throws`.
pub struct RemoveThrownExceptionsFix {
    id: String,
}

impl RemoveThrownExceptionsFix {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl QuickFixParticipant for RemoveThrownExceptionsFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        let exceptions = diagnostic.data_strings();
        if exceptions.is_empty() {
            return Vec::new();
        }
        let simple: Vec<&str> = exceptions.iter().map(|e| simple_name(e)).collect();
        let title = format!("Remove {} from the throws clause", simple.join(", "));
        let data = ctx.resolve_data(&self.id, diagnostic).with(EXCEPTIONS, exceptions);
        vec![ctx.action(title, diagnostic, data)]
    }

    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        Ok(Box::new(RemoveThrownExceptionsProposal::new(
            "Remove the checked exceptions",
            required(data, EXCEPTIONS)?,
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParametersMode {
    /// One action removing every parameter.
    All,
    /// One action per parameter named in the data, removing the other
    /// named parameters.
    KeepEachFromData,
}

pub struct RemoveParametersFix {
    id: String,
    mode: ParametersMode,
}

impl RemoveParametersFix {
    pub fn new(id: impl Into<String>, mode: ParametersMode) -> Self {
        Self {
            id: id.into(),
            mode,
        }
    }
}

impl QuickFixParticipant for RemoveParametersFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        match self.mode {
            ParametersMode::All => {
                let data = ctx.resolve_data(&self.id, diagnostic);
                vec![ctx.action("Remove all parameters", diagnostic, data)]
            }
            ParametersMode::KeepEachFromData => {
                let names = diagnostic.data_strings();
                names
                    .iter()
                    .map(|kept| {
                        let others: Vec<String> =
                            names.iter().filter(|n| *n != kept).cloned().collect();
                        let data = ctx.resolve_data(&self.id, diagnostic).with(PARAMETERS, others);
                        let title = format!("Remove all entity parameters except {}", kept);
                        ctx.action(title, diagnostic, data)
                    })
                    .collect()
            }
        }
    }

    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        let proposal = match self.mode {
            ParametersMode::All => {
                RemoveParametersProposal::new("Remove all parameters", ParameterSelection::All)
            }
            ParametersMode::KeepEachFromData => RemoveParametersProposal::new(
                "Remove entity parameters",
                ParameterSelection::Named(required(data, PARAMETERS)?),
            ),
        };
        Ok(Box::new(proposal))
    }
}

pub struct ChangeReturnTypeFix {
    id: String,
    new_type: &'static str,
}

impl ChangeReturnTypeFix {
    pub fn new(id: impl Into<String>, new_type: &'static str) -> Self {
        Self {
            id: id.into(),
            new_type,
        }
    }

    fn title(&self) -> String {
        format!("Change return type to {}", self.new_type)
    }
}

impl QuickFixParticipant for ChangeReturnTypeFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        let data = ctx.resolve_data(&self.id, diagnostic);
        vec![ctx.action(self.title(), diagnostic, data)]
    }

    fn resolve(&self, _data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        Ok(Box::new(ChangeReturnTypeProposal::new(
            self.title(),
            self.new_type,
        )))
    }
}

/// Which attributes an [`AddAttributeFix`] adds.
#[derive(Debug, Clone)]
pub enum AttributeSet {
    /// One action per attribute.
    EachOf(Vec<&'static str>),
    /// One action adding the attributes named in the diagnostic data.
    FromData,
}

pub struct AddAttributeFix {
    id: String,
    annotation: &'static str,
    attributes: AttributeSet,
}

impl AddAttributeFix {
    pub fn new(id: impl Into<String>, annotation: &'static str, attributes: AttributeSet) -> Self {
        Self {
            id: id.into(),
            annotation,
            attributes,
        }
    }
}

fn attribute_title(verb: &str, attributes: &[String], preposition: &str, annotation: &str) -> String {
    let names: Vec<String> = attributes.iter().map(|a| format!("`{}`", a)).collect();
    let noun = if names.len() == 1 { "attribute" } else { "attributes" };
    format!("{} the {} {} {} {}", verb, names.join(", "), noun, preposition, at(annotation))
}

impl QuickFixParticipant for AddAttributeFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        let sets: Vec<Vec<String>> = match &self.attributes {
            AttributeSet::EachOf(names) => names.iter().map(|n| vec![n.to_string()]).collect(),
            AttributeSet::FromData => vec![diagnostic.data_strings()],
        };
        sets.into_iter()
            .filter(|s| !s.is_empty())
            .map(|attributes| {
                let title = attribute_title("Add", &attributes, "to", self.annotation);
                let data = ctx
                    .resolve_data(&self.id, diagnostic)
                    .with(ANNOTATION, self.annotation)
                    .with(ATTRIBUTES, attributes);
                ctx.action(title, diagnostic, data)
            })
            .collect()
    }

    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        let attributes = required(data, ATTRIBUTES)?;
        let title = attribute_title("Add", &attributes, "to", self.annotation);
        Ok(Box::new(
            ModifyAttributesProposal::new(title, self.annotation).adding(attributes),
        ))
    }
}

/// One action per attribute, removing it from the annotation.
pub struct RemoveAttributeFix {
    id: String,
    annotation: &'static str,
    attributes: Vec<&'static str>,
}

impl RemoveAttributeFix {
    pub fn new(id: impl Into<String>, annotation: &'static str, attributes: Vec<&'static str>) -> Self {
        Self {
            id: id.into(),
            annotation,
            attributes,
        }
    }
}

impl QuickFixParticipant for RemoveAttributeFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        self.attributes
            .iter()
            .map(|a| {
                let attributes = vec![a.to_string()];
                let title = attribute_title("Remove", &attributes, "from", self.annotation);
                let data = ctx
                    .resolve_data(&self.id, diagnostic)
                    .with(ANNOTATION, self.annotation)
                    .with(ATTRIBUTES, attributes);
                ctx.action(title, diagnostic, data)
            })
            .collect()
    }

    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        let attributes = required(data, ATTRIBUTES)?;
        let title = attribute_title("Remove", &attributes, "from", self.annotation);
        Ok(Box::new(
            ModifyAttributesProposal::new(title, self.annotation).removing(attributes),
        ))
    }
}

/// Makes the diagnosed type extend or implement a fixed supertype.
pub struct SupertypeFix {
    id: String,
    supertype: &'static str,
    kind: SupertypeKind,
}

impl SupertypeFix {
    pub fn new(id: impl Into<String>, supertype: &'static str, kind: SupertypeKind) -> Self {
        Self {
            id: id.into(),
            supertype,
            kind,
        }
    }

    fn title(&self, type_name: &str) -> String {
        let verb = match self.kind {
            SupertypeKind::Extend => "extend",
            SupertypeKind::Implement => "implement",
        };
        format!("Let '{}' {} '{}'", type_name, verb, simple_name(self.supertype))
    }
}

impl QuickFixParticipant for SupertypeFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        let Some(t) = ctx.element.declaring_type() else {
            return Vec::new();
        };
        let data = ctx.resolve_data_for(&self.id, diagnostic, ElementKey::for_type(t));
        vec![ctx.action(self.title(&t.name), diagnostic, data)]
    }

    fn resolve(&self, data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        let owner = data.element.owner().map(simple_name).unwrap_or_default();
        Ok(Box::new(AddSupertypeProposal::new(
            self.title(owner),
            self.supertype,
            self.kind,
        )))
    }
}

/// Prefixes a string attribute with `/`.
pub struct PrefixSlashFix {
    id: String,
    annotation: &'static str,
    member: &'static str,
}

impl PrefixSlashFix {
    pub fn new(id: impl Into<String>, annotation: &'static str, member: &'static str) -> Self {
        Self {
            id: id.into(),
            annotation,
            member,
        }
    }
}

impl QuickFixParticipant for PrefixSlashFix {
    fn id(&self) -> &str {
        &self.id
    }

    fn propose(&self, ctx: &ProposeContext, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        let data = ctx.resolve_data(&self.id, diagnostic);
        vec![ctx.action("Prefix value with '/'", diagnostic, data)]
    }

    fn resolve(&self, _data: &ResolveData) -> Result<Box<dyn CorrectionProposal>, EditComputationError> {
        Ok(Box::new(PrefixSlashProposal::new(
            "Prefix value with '/'",
            self.annotation,
            self.member,
        )))
    }
}
