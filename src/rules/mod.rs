//! Rule participants, one per Jakarta specification domain.
//!
//! # Adding a New Domain
//!
//! 1. Add a variant to [`Domain`]
//! 2. Create a module here declaring its codes with `error_codes!`
//! 3. Implement `RuleParticipant` and add it to [`participants`]
//! 4. Register quick fixes for its codes in `quickfix::registry`

pub mod annotations;
pub mod bean_validation;
pub mod cdi;
pub mod di;
pub mod interceptor;
pub mod jaxrs;
pub mod jsonb;
pub mod persistence;
pub mod servlet;
pub mod websocket;

use once_cell::sync::OnceCell;

use crate::diagnostics::{Domain, RuleParticipant};
use crate::model::simple_name;

pub use annotations::{AnnotationsCode, AnnotationsParticipant};
pub use bean_validation::{BeanValidationCode, BeanValidationParticipant};
pub use cdi::{CdiCode, CdiParticipant};
pub use di::{DiCode, DiParticipant};
pub use interceptor::{InterceptorCode, InterceptorParticipant};
pub use jaxrs::{JaxRsCode, JaxRsParticipant};
pub use jsonb::{JsonbCode, JsonbParticipant};
pub use persistence::{PersistenceCode, PersistenceParticipant};
pub use servlet::{ServletCode, ServletParticipant};
pub use websocket::{WebsocketCode, WebsocketParticipant};

static PARTICIPANTS: OnceCell<Vec<Box<dyn RuleParticipant>>> = OnceCell::new();

/// The built-in rule participants in their fixed run order.
pub fn participants() -> &'static [Box<dyn RuleParticipant>] {
    PARTICIPANTS.get_or_init(|| {
        vec![
            Box::new(AnnotationsParticipant),
            Box::new(BeanValidationParticipant),
            Box::new(CdiParticipant),
            Box::new(DiParticipant),
            Box::new(InterceptorParticipant),
            Box::new(JaxRsParticipant),
            Box::new(JsonbParticipant),
            Box::new(PersistenceParticipant),
            Box::new(ServletParticipant),
            Box::new(WebsocketParticipant),
        ]
    })
}

/// Every code string with its domain.
pub fn all_codes() -> Vec<(Domain, &'static str)> {
    use crate::diagnostics::ErrorCode;

    fn codes<C: ErrorCode>(all: &[C]) -> impl Iterator<Item = (Domain, &'static str)> + '_ {
        all.iter().map(|c| (c.domain(), c.as_str()))
    }

    codes(AnnotationsCode::ALL)
        .chain(codes(BeanValidationCode::ALL))
        .chain(codes(CdiCode::ALL))
        .chain(codes(DiCode::ALL))
        .chain(codes(InterceptorCode::ALL))
        .chain(codes(JaxRsCode::ALL))
        .chain(codes(JsonbCode::ALL))
        .chain(codes(PersistenceCode::ALL))
        .chain(codes(ServletCode::ALL))
        .chain(codes(WebsocketCode::ALL))
        .collect()
}

/// Domain owning a code string.
pub fn code_domain(code: &str) -> Option<Domain> {
    all_codes()
        .into_iter()
        .find(|(_, c)| *c == code)
        .map(|(d, _)| d)
}

/// `@Name` for a qualified annotation name.
pub(crate) fn at(qualified: &str) -> String {
    format!("@{}", simple_name(qualified))
}

/// `@A, @B` for a list of qualified annotation names.
pub(crate) fn at_list<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| at(n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::diagnostics::{Diagnostic, DiagnosticsContext, Domain};
    use crate::model::Workspace;

    pub const URI: &str = "mem:///Test.java";

    /// Run one domain's participant over `source`.
    pub fn diagnose(domain: Domain, source: &str) -> Vec<Diagnostic> {
        diagnose_with(domain, &[(URI, source)])
    }

    /// Run one domain's participant over the first of several documents.
    pub fn diagnose_with(domain: Domain, docs: &[(&str, &str)]) -> Vec<Diagnostic> {
        let ws = Workspace::in_memory(docs.iter().map(|(u, s)| (u.to_string(), s.to_string())));
        ws.load_all();
        let unit = ws.unit(docs[0].0).unwrap();
        let ctx = DiagnosticsContext::new(&ws, &unit);
        super::participants()
            .iter()
            .find(|p| p.domain() == domain)
            .unwrap()
            .collect_diagnostics(&ctx)
            .unwrap()
    }

    pub fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.code.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_participants_in_domain_order() {
        let domains: Vec<Domain> = participants().iter().map(|p| p.domain()).collect();
        assert_eq!(domains, Domain::ALL.to_vec());
    }

    #[test]
    fn test_codes_belong_to_exactly_one_domain() {
        let codes = all_codes();
        let unique: HashSet<&str> = codes.iter().map(|(_, c)| *c).collect();
        assert_eq!(unique.len(), codes.len());
        assert_eq!(code_domain("RemoveInjectOrFinal"), Some(Domain::Di));
        assert_eq!(
            code_domain("InvalidEndpointPathWithNoStartingSlash"),
            Some(Domain::Websocket)
        );
        assert_eq!(code_domain("Nope"), None);
    }

    #[test]
    fn test_at_list() {
        assert_eq!(
            at_list(&["jakarta.inject.Inject", "jakarta.enterprise.inject.Produces"]),
            "@Inject, @Produces"
        );
    }
}
