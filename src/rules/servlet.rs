//! Servlets, filters and listeners (`jakarta.servlet`).

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{Annotation, TypeDecl};

pub const WEB_SERVLET: &str = "jakarta.servlet.annotation.WebServlet";
pub const WEB_FILTER: &str = "jakarta.servlet.annotation.WebFilter";
pub const WEB_LISTENER: &str = "jakarta.servlet.annotation.WebListener";

pub const HTTP_SERVLET: &str = "jakarta.servlet.http.HttpServlet";
pub const FILTER: &str = "jakarta.servlet.Filter";

pub const LISTENER_INTERFACES: &[&str] = &[
    "jakarta.servlet.ServletContextListener",
    "jakarta.servlet.ServletContextAttributeListener",
    "jakarta.servlet.ServletRequestListener",
    "jakarta.servlet.ServletRequestAttributeListener",
    "jakarta.servlet.http.HttpSessionListener",
    "jakarta.servlet.http.HttpSessionAttributeListener",
    "jakarta.servlet.http.HttpSessionIdListener",
];

error_codes! {
    pub enum ServletCode for Domain::Servlet {
        WebServletMustExtend,
        WebServletMissingAttributes,
        WebServletDuplicateAttributes,
        WebFilterMustImplement,
        WebFilterMissingAttributes,
        WebFilterDuplicateAttributes,
        WebListenerMustImplement,
    }
}

/// Whether a type declared in this unit is a subtype of any of `targets`;
/// `None` when its hierarchy does not resolve.
fn is_subtype_of_any(ctx: &DiagnosticsContext, t: &TypeDecl, targets: &[&str]) -> Option<bool> {
    let chain = ctx.resolver().supertypes(&t.qualified_name)?;
    Some(chain.iter().any(|s| targets.contains(&s.as_str())))
}

/// A non-empty member: a string or a non-empty array.
fn has_value(annotation: &Annotation, member: &str) -> bool {
    annotation
        .member(member)
        .map(|m| !m.value.is_empty_array())
        .unwrap_or(false)
}

pub struct ServletParticipant;

impl ServletParticipant {
    fn check_url_attributes(
        &self,
        annotation: &Annotation,
        also_satisfied_by: &[&str],
        missing: ServletCode,
        duplicate: ServletCode,
        out: &mut Vec<Diagnostic>,
    ) {
        let name = annotation.simple_name();
        let value = has_value(annotation, "value");
        let url_patterns = has_value(annotation, "urlPatterns");
        let others = also_satisfied_by.iter().any(|m| has_value(annotation, m));

        if !value && !url_patterns && !others {
            out.push(Diagnostic::new(
                missing,
                annotation.span,
                format!(
                    "The @{} annotation must define the attribute 'urlPatterns' or 'value'.",
                    name
                ),
            ));
        }
        if value && url_patterns {
            out.push(Diagnostic::new(
                duplicate,
                annotation.span,
                format!(
                    "The @{} annotation cannot have both 'value' and 'urlPatterns' attributes specified at once.",
                    name
                ),
            ));
        }
    }
}

impl RuleParticipant for ServletParticipant {
    fn domain(&self) -> Domain {
        Domain::Servlet
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            if !t.is_class() {
                continue;
            }

            if let Some(servlet) = ctx.find(&t.annotations, WEB_SERVLET) {
                if is_subtype_of_any(ctx, t, &[HTTP_SERVLET]) == Some(false) {
                    out.push(Diagnostic::new(
                        ServletCode::WebServletMustExtend,
                        t.name_span,
                        "Annotated classes with @WebServlet must extend the HttpServlet class.",
                    ));
                }
                self.check_url_attributes(
                    servlet,
                    &[],
                    ServletCode::WebServletMissingAttributes,
                    ServletCode::WebServletDuplicateAttributes,
                    &mut out,
                );
            }

            if let Some(filter) = ctx.find(&t.annotations, WEB_FILTER) {
                if is_subtype_of_any(ctx, t, &[FILTER]) == Some(false) {
                    out.push(Diagnostic::new(
                        ServletCode::WebFilterMustImplement,
                        t.name_span,
                        "Annotated classes with @WebFilter must implement the Filter interface.",
                    ));
                }
                self.check_url_attributes(
                    filter,
                    &["servletNames"],
                    ServletCode::WebFilterMissingAttributes,
                    ServletCode::WebFilterDuplicateAttributes,
                    &mut out,
                );
            }

            if ctx.has(&t.annotations, WEB_LISTENER)
                && is_subtype_of_any(ctx, t, LISTENER_INTERFACES) == Some(false)
            {
                out.push(Diagnostic::new(
                    ServletCode::WebListenerMustImplement,
                    t.name_span,
                    "Annotated classes with @WebListener must implement one or more of the listener interfaces.",
                ));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{codes, diagnose, diagnose_with};

    const IMPORTS: &str = "import jakarta.servlet.*;\nimport jakarta.servlet.http.*;\nimport jakarta.servlet.annotation.*;\n";

    fn run(body: &str) -> Vec<Diagnostic> {
        diagnose(Domain::Servlet, &format!("{}{}", IMPORTS, body))
    }

    #[test]
    fn test_web_servlet() {
        let d = run(
            r#"@WebServlet("/a") class A extends HttpServlet {}
@WebServlet(urlPatterns = {"/b"}) class B {}
@WebServlet(name = "c") class C extends HttpServlet {}
@WebServlet(value = "/d", urlPatterns = "/d") class D extends HttpServlet {}"#,
        );
        assert_eq!(
            codes(&d),
            vec![
                "WebServletMustExtend",
                "WebServletMissingAttributes",
                "WebServletDuplicateAttributes",
            ]
        );
    }

    #[test]
    fn test_web_filter() {
        let d = run(
            r#"@WebFilter(servletNames = "s") class A implements Filter {}
@WebFilter("/b") class B {}
@WebFilter(filterName = "c") class C extends HttpFilter {}"#,
        );
        assert_eq!(
            codes(&d),
            vec!["WebFilterMustImplement", "WebFilterMissingAttributes"]
        );
    }

    #[test]
    fn test_web_listener() {
        let d = run(
            r#"@WebListener class A implements ServletContextListener {}
@WebListener class B implements HttpSessionListener, Runnable { public void run() {} }
@WebListener class C {}"#,
        );
        assert_eq!(codes(&d), vec!["WebListenerMustImplement"]);
    }

    #[test]
    fn test_unresolved_supertype_is_skipped() {
        let d = run(r#"@WebServlet("/a") class A extends com.acme.BaseServlet {}"#);
        assert!(d.is_empty());
    }

    #[test]
    fn test_project_supertype() {
        let d = diagnose_with(
            Domain::Servlet,
            &[
                (
                    "mem:///p/A.java",
                    "package p;\nimport jakarta.servlet.annotation.WebServlet;\n@WebServlet(\"/a\") class A extends Base {}",
                ),
                (
                    "mem:///p/Base.java",
                    "package p;\nimport jakarta.servlet.http.HttpServlet;\npublic class Base extends HttpServlet {}",
                ),
            ],
        );
        assert!(d.is_empty());
    }
}
