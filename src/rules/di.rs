//! Dependency injection (`jakarta.inject`).

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{MethodDecl, Modifier, Modifiers, TextRange, TypeDecl, TypeRef};

pub const INJECT: &str = "jakarta.inject.Inject";

error_codes! {
    pub enum DiCode for Domain::Di {
        RemoveInjectOrFinal,
        RemoveInjectOrAbstract,
        RemoveInjectOrStatic,
        RemoveInjectForGeneric,
        RemoveInjectForConstructor,
        InjectNonStaticInnerClass,
    }
}

pub struct DiParticipant;

impl DiParticipant {
    fn check_modifiers(
        &self,
        what: &str,
        modifiers: &Modifiers,
        range: TextRange,
        out: &mut Vec<Diagnostic>,
    ) {
        let checks = [
            (Modifier::Final, DiCode::RemoveInjectOrFinal),
            (Modifier::Abstract, DiCode::RemoveInjectOrAbstract),
            (Modifier::Static, DiCode::RemoveInjectOrStatic),
        ];
        for (modifier, code) in checks {
            if modifiers.has(modifier) {
                out.push(Diagnostic::new(
                    code,
                    range,
                    format!(
                        "The @Inject annotation must not define a {} {}.",
                        modifier.keyword(),
                        what
                    ),
                ));
            }
        }
    }

    /// Non-static member class of this file that `type_ref` names, if any.
    fn inner_class<'u>(
        &self,
        ctx: &'u DiagnosticsContext,
        type_ref: &TypeRef,
    ) -> Option<&'u TypeDecl> {
        if type_ref.primitive {
            return None;
        }
        let qualified = ctx.resolver().resolve(&type_ref.name)?;
        ctx.unit.find_type(&qualified).filter(|t| {
            t.is_nested && t.is_class() && !t.modifiers.is_static()
        })
    }

    fn check_inner_class(
        &self,
        ctx: &DiagnosticsContext,
        type_ref: &TypeRef,
        range: TextRange,
        out: &mut Vec<Diagnostic>,
    ) {
        if let Some(inner) = self.inner_class(ctx, type_ref) {
            out.push(Diagnostic::new(
                DiCode::InjectNonStaticInnerClass,
                range,
                format!(
                    "The @Inject annotation must not be used with the non-static inner class '{}'.",
                    inner.name
                ),
            ));
        }
    }

    fn check_method(&self, ctx: &DiagnosticsContext, m: &MethodDecl, out: &mut Vec<Diagnostic>) {
        if !m.is_constructor {
            self.check_modifiers("method", &m.modifiers, m.name_span, out);
            if m.is_generic() {
                out.push(Diagnostic::new(
                    DiCode::RemoveInjectForGeneric,
                    m.name_span,
                    "The @Inject annotation must not define a generic method.",
                ));
            }
        }
        for p in &m.parameters {
            self.check_inner_class(ctx, &p.type_ref, p.name_span, out);
        }
    }
}

impl RuleParticipant for DiParticipant {
    fn domain(&self) -> Domain {
        Domain::Di
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            for f in &t.fields {
                if !ctx.has(&f.annotations, INJECT) {
                    continue;
                }
                self.check_modifiers("field", &f.modifiers, f.name_span, &mut out);
                self.check_inner_class(ctx, &f.type_ref, f.name_span, &mut out);
            }

            let injected: Vec<&MethodDecl> = t
                .methods
                .iter()
                .filter(|m| ctx.has(&m.annotations, INJECT))
                .collect();
            let constructors = injected.iter().filter(|m| m.is_constructor).count();

            for m in injected {
                self.check_method(ctx, m, &mut out);
                if m.is_constructor && constructors > 1 {
                    out.push(Diagnostic::new(
                        DiCode::RemoveInjectForConstructor,
                        m.name_span,
                        "The @Inject annotation must not define more than one constructor.",
                    ));
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{codes, diagnose};

    fn run(body: &str) -> Vec<Diagnostic> {
        diagnose(Domain::Di, &format!("import jakarta.inject.Inject;\n{}", body))
    }

    #[test]
    fn test_field_modifiers() {
        let d = run(
            r#"class Bean {
    @Inject final String a = "";
    @Inject static String b;
    @Inject String ok;
    final String notInjected = "";
}"#,
        );
        assert_eq!(codes(&d), vec!["RemoveInjectOrFinal", "RemoveInjectOrStatic"]);
    }

    #[test]
    fn test_method_modifiers_and_generics() {
        let d = run(
            r#"abstract class Bean {
    @Inject abstract void a();
    @Inject final void b() {}
    @Inject <T> void c(T t) {}
    @Inject void ok(String s) {}
}"#,
        );
        assert_eq!(
            codes(&d),
            vec!["RemoveInjectOrAbstract", "RemoveInjectOrFinal", "RemoveInjectForGeneric"]
        );
    }

    #[test]
    fn test_multiple_inject_constructors() {
        let d = run(
            r#"class Bean {
    @Inject Bean() {}
    @Inject Bean(String s) {}
    Bean(int x) {}
}"#,
        );
        assert_eq!(
            codes(&d),
            vec!["RemoveInjectForConstructor", "RemoveInjectForConstructor"]
        );
    }

    #[test]
    fn test_single_inject_constructor_is_fine() {
        let d = run("class Bean { @Inject Bean(String s) {} Bean() {} }");
        assert!(d.is_empty());
    }

    #[test]
    fn test_non_static_inner_class() {
        let d = run(
            r#"class Outer {
    class Inner {}
    static class Nested {}
    @Inject Inner inner;
    @Inject Nested nested;
    @Inject void set(Inner value, Nested other) {}
}"#,
        );
        assert_eq!(
            codes(&d),
            vec!["InjectNonStaticInnerClass", "InjectNonStaticInnerClass"]
        );
    }
}
