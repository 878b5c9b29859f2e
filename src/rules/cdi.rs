//! Contexts and Dependency Injection (`jakarta.enterprise`).

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{MethodDecl, TypeDecl};

use super::{at, at_list, di::INJECT};

pub const APPLICATION_SCOPED: &str = "jakarta.enterprise.context.ApplicationScoped";
pub const REQUEST_SCOPED: &str = "jakarta.enterprise.context.RequestScoped";
pub const SESSION_SCOPED: &str = "jakarta.enterprise.context.SessionScoped";
pub const CONVERSATION_SCOPED: &str = "jakarta.enterprise.context.ConversationScoped";
pub const DEPENDENT: &str = "jakarta.enterprise.context.Dependent";
pub const SINGLETON: &str = "jakarta.inject.Singleton";
pub const PRODUCES: &str = "jakarta.enterprise.inject.Produces";
pub const DISPOSES: &str = "jakarta.enterprise.inject.Disposes";
pub const OBSERVES: &str = "jakarta.enterprise.event.Observes";
pub const OBSERVES_ASYNC: &str = "jakarta.enterprise.event.ObservesAsync";

/// Scopes whose beans are proxied by the container.
pub const NORMAL_SCOPES: &[&str] = &[
    APPLICATION_SCOPED,
    REQUEST_SCOPED,
    SESSION_SCOPED,
    CONVERSATION_SCOPED,
];

pub const SCOPES: &[&str] = &[
    APPLICATION_SCOPED,
    REQUEST_SCOPED,
    SESSION_SCOPED,
    CONVERSATION_SCOPED,
    DEPENDENT,
    SINGLETON,
];

const INJECTION_PARAM_ANNOTATIONS: &[&str] = &[DISPOSES, OBSERVES, OBSERVES_ASYNC];

error_codes! {
    pub enum CdiCode for Domain::Cdi {
        InvalidNumberOfScopedAnnotationsByManagedBean,
        InvalidNumberOfScopeAnnotationsByProducerField,
        InvalidNumberOfScopeAnnotationsByProducerMethod,
        InvalidManagedBeanAnnotation,
        InvalidManagedBeanConstructor,
        RemoveProducesOrInject,
        InvalidInjectionParamAnnotation,
        InvalidDisposerMethodParams,
    }
}

pub struct CdiParticipant;

impl CdiParticipant {
    fn check_type(&self, ctx: &DiagnosticsContext, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        let scopes: Vec<&str> = ctx
            .matching(&t.annotations, SCOPES)
            .into_iter()
            .map(|(_, s)| s)
            .collect();

        if scopes.len() > 1 {
            out.push(
                Diagnostic::new(
                    CdiCode::InvalidNumberOfScopedAnnotationsByManagedBean,
                    t.name_span,
                    format!(
                        "A managed bean must not declare more than one scope: {}.",
                        at_list(&scopes)
                    ),
                )
                .with_data_strings(scopes.iter().copied()),
            );
        }

        if !t.is_class() || scopes.is_empty() {
            return;
        }

        if let Some(normal) = scopes.iter().find(|s| NORMAL_SCOPES.contains(s)) {
            for f in &t.fields {
                if f.modifiers.is_public() && !f.modifiers.is_static() {
                    out.push(
                        Diagnostic::new(
                            CdiCode::InvalidManagedBeanAnnotation,
                            f.name_span,
                            format!(
                                "A managed bean with a public field must be @Dependent, not {}.",
                                at(normal)
                            ),
                        )
                        .with_data_strings([*normal]),
                    );
                }
            }
        }

        let has_constructors = t.constructors().next().is_some();
        let acceptable = t
            .constructors()
            .any(|c| c.parameters.is_empty() || ctx.has(&c.annotations, INJECT));
        if has_constructors && !acceptable && !t.modifiers.is_abstract() {
            out.push(Diagnostic::new(
                CdiCode::InvalidManagedBeanConstructor,
                t.name_span,
                "A managed bean must have a no-arg constructor or a constructor annotated @Inject.",
            ));
        }
    }

    fn check_fields(&self, ctx: &DiagnosticsContext, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        for f in &t.fields {
            let produces = ctx.has(&f.annotations, PRODUCES);
            if !produces {
                continue;
            }
            let scopes: Vec<&str> = ctx
                .matching(&f.annotations, SCOPES)
                .into_iter()
                .map(|(_, s)| s)
                .collect();
            if scopes.len() > 1 {
                out.push(
                    Diagnostic::new(
                        CdiCode::InvalidNumberOfScopeAnnotationsByProducerField,
                        f.name_span,
                        format!(
                            "A producer field must not declare more than one scope: {}.",
                            at_list(&scopes)
                        ),
                    )
                    .with_data_strings(scopes.iter().copied()),
                );
            }
            if ctx.has(&f.annotations, INJECT) {
                out.push(
                    Diagnostic::new(
                        CdiCode::RemoveProducesOrInject,
                        f.name_span,
                        "A producer field must not be annotated @Inject.",
                    )
                    .with_data_strings([PRODUCES, INJECT]),
                );
            }
        }
    }

    fn check_method(&self, ctx: &DiagnosticsContext, m: &MethodDecl, out: &mut Vec<Diagnostic>) {
        let produces = ctx.has(&m.annotations, PRODUCES);
        let inject = ctx.has(&m.annotations, INJECT);

        if produces && !m.is_constructor {
            let scopes: Vec<&str> = ctx
                .matching(&m.annotations, SCOPES)
                .into_iter()
                .map(|(_, s)| s)
                .collect();
            if scopes.len() > 1 {
                out.push(
                    Diagnostic::new(
                        CdiCode::InvalidNumberOfScopeAnnotationsByProducerMethod,
                        m.name_span,
                        format!(
                            "A producer method must not declare more than one scope: {}.",
                            at_list(&scopes)
                        ),
                    )
                    .with_data_strings(scopes.iter().copied()),
                );
            }
        }

        if produces && inject {
            out.push(
                Diagnostic::new(
                    CdiCode::RemoveProducesOrInject,
                    m.name_span,
                    "A producer method must not be annotated @Inject.",
                )
                .with_data_strings([PRODUCES, INJECT]),
            );
        }

        // annotations of the parameters, first occurrence order
        let mut param_annotations: Vec<&str> = Vec::new();
        let mut annotated_params = 0;
        for p in &m.parameters {
            let found = ctx.matching(&p.annotations, INJECTION_PARAM_ANNOTATIONS);
            if !found.is_empty() {
                annotated_params += 1;
            }
            for (_, name) in found {
                if !param_annotations.contains(&name) {
                    param_annotations.push(name);
                }
            }
        }

        if (produces || inject) && !param_annotations.is_empty() {
            let method_annotation = if produces { PRODUCES } else { INJECT };
            let mut data = vec![method_annotation];
            data.extend(param_annotations.iter().copied());
            out.push(
                Diagnostic::new(
                    CdiCode::InvalidInjectionParamAnnotation,
                    m.name_span,
                    format!(
                        "A {} method must not have a parameter annotated {}.",
                        at(method_annotation),
                        at_list(&param_annotations)
                    ),
                )
                .with_data_strings(data),
            );
        }

        if annotated_params > 1 {
            out.push(
                Diagnostic::new(
                    CdiCode::InvalidDisposerMethodParams,
                    m.name_span,
                    format!(
                        "A method must not have more than one parameter annotated {}.",
                        at_list(&param_annotations)
                    ),
                )
                .with_data_strings(param_annotations.iter().copied()),
            );
        }
    }
}

impl RuleParticipant for CdiParticipant {
    fn domain(&self) -> Domain {
        Domain::Cdi
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            self.check_type(ctx, t, &mut out);
            self.check_fields(ctx, t, &mut out);
            for m in &t.methods {
                self.check_method(ctx, m, &mut out);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{codes, diagnose};

    const IMPORTS: &str = "import jakarta.enterprise.context.*;\nimport jakarta.enterprise.inject.*;\nimport jakarta.enterprise.event.*;\nimport jakarta.inject.*;\n";

    fn run(body: &str) -> Vec<Diagnostic> {
        diagnose(Domain::Cdi, &format!("{}{}", IMPORTS, body))
    }

    #[test]
    fn test_multiple_scopes() {
        let d = run("@ApplicationScoped @RequestScoped class Bean {}");
        assert_eq!(codes(&d), vec!["InvalidNumberOfScopedAnnotationsByManagedBean"]);
        assert_eq!(d[0].data_strings(), vec![APPLICATION_SCOPED, REQUEST_SCOPED]);
    }

    #[test]
    fn test_producer_scopes_and_inject() {
        let d = run(
            r#"class Factory {
    @Produces @Dependent @ApplicationScoped String name;
    @Produces @Inject String make() { return ""; }
    @Produces @RequestScoped @SessionScoped Object other() { return null; }
}"#,
        );
        assert_eq!(
            codes(&d),
            vec![
                "InvalidNumberOfScopeAnnotationsByProducerField",
                "RemoveProducesOrInject",
                "InvalidNumberOfScopeAnnotationsByProducerMethod",
            ]
        );
        assert_eq!(d[1].data_strings(), vec![PRODUCES, INJECT]);
    }

    #[test]
    fn test_public_field_on_normal_scoped_bean() {
        let d = run(
            r#"@RequestScoped class Bean {
    public String name;
    public static final String CONSTANT = "x";
    private int count;
}
@Dependent class Free { public String name; }"#,
        );
        assert_eq!(codes(&d), vec!["InvalidManagedBeanAnnotation"]);
        assert_eq!(d[0].data_strings(), vec![REQUEST_SCOPED]);
    }

    #[test]
    fn test_managed_bean_constructor() {
        let d = run(
            r#"@ApplicationScoped class NoDefault { NoDefault(String s) {} }
@ApplicationScoped class Injected { @Inject Injected(String s) {} }
@ApplicationScoped class Implicit {}
@ApplicationScoped class WithDefault { WithDefault() {} WithDefault(int x) {} }"#,
        );
        assert_eq!(codes(&d), vec!["InvalidManagedBeanConstructor"]);
    }

    #[test]
    fn test_injection_param_annotations() {
        let d = run(
            r#"class Bean {
    @Inject void init(@Observes String event) {}
    void both(@Disposes String a, @Observes String b) {}
    void plain(@Observes String event) {}
}"#,
        );
        assert_eq!(
            codes(&d),
            vec!["InvalidInjectionParamAnnotation", "InvalidDisposerMethodParams"]
        );
        assert_eq!(d[0].data_strings(), vec![INJECT, OBSERVES]);
        assert_eq!(d[1].data_strings(), vec![DISPOSES, OBSERVES]);
    }
}
