//! Common annotations (`jakarta.annotation`).
//!
//! - `@Generated(date = ...)` must be ISO 8601
//! - `@Resource` on a class must name both `name` and `type`
//! - `@PostConstruct` / `@PreDestroy` methods take no parameters, return
//!   void, throw no checked exceptions and are not static

use lazy_static::lazy_static;
use regex::Regex;

use crate::diagnostics::{
    error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant, Severity,
};
use crate::model::{Element, MethodDecl, TypeDecl};

use super::at;

pub const GENERATED: &str = "jakarta.annotation.Generated";
pub const RESOURCE: &str = "jakarta.annotation.Resource";
pub const POST_CONSTRUCT: &str = "jakarta.annotation.PostConstruct";
pub const PRE_DESTROY: &str = "jakarta.annotation.PreDestroy";

error_codes! {
    pub enum AnnotationsCode for Domain::Annotations {
        InvalidDateFormat,
        MissingResourceNameAttribute,
        MissingResourceTypeAttribute,
        PostConstructParams,
        PostConstructReturnType,
        PostConstructException,
        PostConstructStatic,
        PreDestroyParams,
        PreDestroyReturnType,
        PreDestroyException,
        PreDestroyStatic,
    }
}

lazy_static! {
    static ref ISO_8601: Regex = Regex::new(
        r"^[+-]?\d{4}(-(0[1-9]|1[0-2])(-(0[1-9]|[12]\d|3[01]))?)?([T ]([01]\d|2[0-3])(:[0-5]\d(:[0-5]\d([.,]\d+)?)?)?([zZ]|[+-]([01]\d|2[0-3])(:?[0-5]\d)?)?)?$"
    )
    .unwrap();
}

pub fn is_iso_8601(date: &str) -> bool {
    ISO_8601.is_match(date)
}

/// The two lifecycle callbacks share their rules; only the codes differ.
struct Lifecycle {
    annotation: &'static str,
    params: AnnotationsCode,
    return_type: AnnotationsCode,
    exception: AnnotationsCode,
    is_static: AnnotationsCode,
}

const LIFECYCLES: &[Lifecycle] = &[
    Lifecycle {
        annotation: POST_CONSTRUCT,
        params: AnnotationsCode::PostConstructParams,
        return_type: AnnotationsCode::PostConstructReturnType,
        exception: AnnotationsCode::PostConstructException,
        is_static: AnnotationsCode::PostConstructStatic,
    },
    Lifecycle {
        annotation: PRE_DESTROY,
        params: AnnotationsCode::PreDestroyParams,
        return_type: AnnotationsCode::PreDestroyReturnType,
        exception: AnnotationsCode::PreDestroyException,
        is_static: AnnotationsCode::PreDestroyStatic,
    },
];

pub struct AnnotationsParticipant;

impl AnnotationsParticipant {
    fn check_generated(&self, ctx: &DiagnosticsContext, element: Element, out: &mut Vec<Diagnostic>) {
        let Some(generated) = ctx.find(element.annotations(), GENERATED) else {
            return;
        };
        let Some(date) = generated.member("date") else {
            return;
        };
        let Some(value) = date.value.as_str() else {
            return;
        };
        if !value.is_empty() && !is_iso_8601(value) {
            out.push(
                Diagnostic::new(
                    AnnotationsCode::InvalidDateFormat,
                    date.value_span,
                    format!("The date '{}' does not follow the ISO 8601 standard.", value),
                )
                .with_severity(Severity::Warning),
            );
        }
    }

    fn check_resource(&self, ctx: &DiagnosticsContext, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        let Some(resource) = ctx.find(&t.annotations, RESOURCE) else {
            return;
        };
        if !resource.has_member("name") {
            out.push(Diagnostic::new(
                AnnotationsCode::MissingResourceNameAttribute,
                resource.span,
                "The @Resource annotation must define the attribute 'name'.",
            ));
        }
        if !resource.has_member("type") {
            out.push(Diagnostic::new(
                AnnotationsCode::MissingResourceTypeAttribute,
                resource.span,
                "The @Resource annotation must define the attribute 'type'.",
            ));
        }
    }

    fn check_lifecycle(&self, ctx: &DiagnosticsContext, m: &MethodDecl, out: &mut Vec<Diagnostic>) {
        for lifecycle in LIFECYCLES {
            if m.is_constructor || !ctx.has(&m.annotations, lifecycle.annotation) {
                continue;
            }
            let name = at(lifecycle.annotation);

            if !m.parameters.is_empty() {
                out.push(Diagnostic::new(
                    lifecycle.params,
                    m.name_span,
                    format!("A method with the annotation {} must not have any parameters.", name),
                ));
            }
            if !m.returns_void() {
                out.push(Diagnostic::new(
                    lifecycle.return_type,
                    m.name_span,
                    format!("A method with the annotation {} must be void.", name),
                ));
            }

            let checked: Vec<String> = m
                .throws
                .iter()
                .filter(|t| ctx.resolver().is_checked_exception(&t.name) == Some(true))
                .filter_map(|t| ctx.resolver().resolve(&t.name))
                .collect();
            if !checked.is_empty() {
                out.push(
                    Diagnostic::new(
                        lifecycle.exception,
                        m.name_span,
                        format!(
                            "A method with the annotation {} must not throw checked exceptions.",
                            name
                        ),
                    )
                    .with_severity(Severity::Warning)
                    .with_data_strings(checked),
                );
            }

            if m.modifiers.is_static() {
                out.push(Diagnostic::new(
                    lifecycle.is_static,
                    m.name_span,
                    format!("A method with the annotation {} must not be static.", name),
                ));
            }
        }
    }
}

impl RuleParticipant for AnnotationsParticipant {
    fn domain(&self) -> Domain {
        Domain::Annotations
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for element in ctx.unit.elements() {
            self.check_generated(ctx, element, &mut out);
            match element {
                Element::Type(t) => self.check_resource(ctx, t, &mut out),
                Element::Method(_, m) => self.check_lifecycle(ctx, m, &mut out),
                _ => {}
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{codes, diagnose};

    #[test]
    fn test_iso_8601() {
        assert!(is_iso_8601("2001-07-04T12:08:56.235-07:00"));
        assert!(is_iso_8601("2024-01-31"));
        assert!(is_iso_8601("2024-01-31T10:15Z"));
        assert!(!is_iso_8601("04/07/2001"));
        assert!(!is_iso_8601("2024-13-01"));
    }

    #[test]
    fn test_generated_date() {
        let d = diagnose(
            Domain::Annotations,
            r#"import jakarta.annotation.Generated;
@Generated(value = "gen", date = "yesterday")
class A {
    @Generated(value = "gen", date = "2020-01-01T00:00:00Z") int ok;
}"#,
        );
        assert_eq!(codes(&d), vec!["InvalidDateFormat"]);
        assert_eq!(d[0].severity, Severity::Warning);
    }

    #[test]
    fn test_resource_attributes() {
        let d = diagnose(
            Domain::Annotations,
            r#"import jakarta.annotation.Resource;
@Resource(name = "db")
class A {}
@Resource
class B {}"#,
        );
        assert_eq!(
            codes(&d),
            vec![
                "MissingResourceTypeAttribute",
                "MissingResourceNameAttribute",
                "MissingResourceTypeAttribute"
            ]
        );
    }

    #[test]
    fn test_post_construct_with_parameter_is_one_diagnostic() {
        let d = diagnose(
            Domain::Annotations,
            r#"import jakarta.annotation.PostConstruct;
class A {
    @PostConstruct
    public void init(int x) {}
}"#,
        );
        assert_eq!(codes(&d), vec!["PostConstructParams"]);
    }

    #[test]
    fn test_lifecycle_violations() {
        let d = diagnose(
            Domain::Annotations,
            r#"import jakarta.annotation.*;
import java.io.IOException;
class A {
    @PreDestroy
    static String close() throws IOException, IllegalStateException { return null; }
}"#,
        );
        assert_eq!(
            codes(&d),
            vec!["PreDestroyReturnType", "PreDestroyException", "PreDestroyStatic"]
        );
        assert_eq!(d[1].data_strings(), vec!["java.io.IOException"]);
    }
}
