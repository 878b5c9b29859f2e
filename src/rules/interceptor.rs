//! Interceptors (`jakarta.interceptor`).

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{MethodDecl, Modifier, TypeDecl, OBJECT};

use super::at;

pub const INTERCEPTOR: &str = "jakarta.interceptor.Interceptor";
pub const AROUND_INVOKE: &str = "jakarta.interceptor.AroundInvoke";
pub const AROUND_CONSTRUCT: &str = "jakarta.interceptor.AroundConstruct";
pub const AROUND_TIMEOUT: &str = "jakarta.interceptor.AroundTimeout";
pub const INVOCATION_CONTEXT: &str = "jakarta.interceptor.InvocationContext";

pub const AROUND_ANNOTATIONS: &[&str] = &[AROUND_INVOKE, AROUND_CONSTRUCT, AROUND_TIMEOUT];

error_codes! {
    pub enum InterceptorCode for Domain::Interceptor {
        InvalidInterceptorAbstract,
        InvalidInterceptorNoArgConstructor,
        InvalidInterceptorMethodModifier,
        MultipleInterceptorMethods,
        InvalidAroundInvokeSignature,
    }
}

pub struct InterceptorParticipant;

impl InterceptorParticipant {
    fn check_interceptor(&self, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        if t.modifiers.is_abstract() {
            out.push(Diagnostic::new(
                InterceptorCode::InvalidInterceptorAbstract,
                t.name_span,
                "An interceptor class must not be abstract.",
            ));
        }
        let has_constructors = t.constructors().next().is_some();
        let public_no_arg = t
            .constructors()
            .any(|c| c.parameters.is_empty() && c.modifiers.is_public());
        if has_constructors && !public_no_arg {
            out.push(Diagnostic::new(
                InterceptorCode::InvalidInterceptorNoArgConstructor,
                t.name_span,
                "An interceptor class must have a public no-arg constructor.",
            ));
        }
    }

    /// `@AroundInvoke` and `@AroundTimeout` take one `InvocationContext`
    /// and return `Object`.
    fn check_signature(&self, ctx: &DiagnosticsContext, m: &MethodDecl, kind: &str) -> bool {
        if kind == AROUND_CONSTRUCT {
            return true;
        }
        let returns_object = match &m.return_type {
            Some(ret) if !ret.is_array() && !ret.primitive => match ctx.resolver().resolve(&ret.name) {
                Some(qualified) => qualified == OBJECT,
                None => ret.simple_name() == "Object",
            },
            _ => false,
        };
        let takes_context = match m.parameters.as_slice() {
            [p] => {
                let (matched, _) = ctx.type_matches(&p.type_ref, &[INVOCATION_CONTEXT]);
                matched && !p.type_ref.is_array()
            }
            _ => false,
        };
        returns_object && takes_context
    }
}

impl RuleParticipant for InterceptorParticipant {
    fn domain(&self) -> Domain {
        Domain::Interceptor
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            if t.is_class() && ctx.has(&t.annotations, INTERCEPTOR) {
                self.check_interceptor(t, &mut out);
            }

            // per type: which around-kinds were declared by which methods
            let mut declared: Vec<(&str, &MethodDecl)> = Vec::new();
            for m in t.plain_methods() {
                for (_, kind) in ctx.matching(&m.annotations, AROUND_ANNOTATIONS) {
                    declared.push((kind, m));

                    let offending: Vec<&str> = [Modifier::Static, Modifier::Final]
                        .into_iter()
                        .filter(|modifier| m.modifiers.has(*modifier))
                        .map(|modifier| modifier.keyword())
                        .collect();
                    if !offending.is_empty() {
                        out.push(
                            Diagnostic::new(
                                InterceptorCode::InvalidInterceptorMethodModifier,
                                m.name_span,
                                format!(
                                    "A method annotated {} must not be static or final.",
                                    at(kind)
                                ),
                            )
                            .with_data_strings(offending),
                        );
                    }

                    if !self.check_signature(ctx, m, kind) {
                        out.push(Diagnostic::new(
                            InterceptorCode::InvalidAroundInvokeSignature,
                            m.name_span,
                            format!(
                                "A method annotated {} must take a single InvocationContext parameter and return Object.",
                                at(kind)
                            ),
                        ));
                    }
                }
            }

            for (kind, m) in &declared {
                if declared.iter().filter(|(k, _)| k == kind).count() > 1 {
                    out.push(
                        Diagnostic::new(
                            InterceptorCode::MultipleInterceptorMethods,
                            m.name_span,
                            format!("A class must declare at most one {} method.", at(kind)),
                        )
                        .with_data_strings([*kind]),
                    );
                }
            }
        }
        Ok(out)
    }
}
