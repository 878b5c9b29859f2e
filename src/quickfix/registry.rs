//! Registration of quick-fix participants per diagnostic code.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::diagnostics::{Domain, ErrorCode};
use crate::model::Modifier;
use crate::proposals::{ModifierTarget, SupertypeKind};
use crate::rules::{
    annotations, di, jsonb, persistence, servlet, websocket, AnnotationsCode,
    BeanValidationCode, CdiCode, DiCode, InterceptorCode, JaxRsCode, JsonbCode, PersistenceCode,
    ServletCode, WebsocketCode,
};

use super::fixes::{
    AddAttributeFix, AddConstructorFix, AttributeSet, ChangeReturnTypeFix, ModifierFix,
    ParametersMode, PrefixSlashFix, RemoveAnnotationFix, RemoveAttributeFix, RemoveMode,
    RemoveParametersFix, RemoveThrownExceptionsFix, SupertypeFix,
};
use super::participant::QuickFixParticipant;

type Participant = Arc<dyn QuickFixParticipant>;

/// Quick-fix participants keyed by `(source, code)` and by id.
#[derive(Default)]
pub struct QuickFixRegistry {
    by_code: HashMap<(String, String), Vec<Participant>>,
    by_id: HashMap<String, Participant>,
}

impl QuickFixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `participant` for each of `codes`.
    ///
    /// # Panics
    ///
    /// If a participant with the same id is already registered, since
    /// resolve could no longer find the first one.
    pub fn register<C: ErrorCode>(&mut self, codes: &[C], participant: impl QuickFixParticipant + 'static) {
        assert!(
            !self.by_id.contains_key(participant.id()),
            "quick-fix id {} registered twice",
            participant.id()
        );
        let participant: Participant = Arc::new(participant);
        for code in codes {
            self.by_code
                .entry((code.domain().source().to_string(), code.as_str().to_string()))
                .or_default()
                .push(Arc::clone(&participant));
        }
        self.by_id
            .insert(participant.id().to_string(), participant);
    }

    /// Participants for a diagnostic, in registration order.
    pub fn participants_for(&self, source: &str, code: &str) -> &[Participant] {
        self.by_code
            .get(&(source.to_string(), code.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Every `(source, code)` with at least one participant.
    pub fn codes(&self) -> Vec<(String, String)> {
        let mut codes: Vec<_> = self.by_code.keys().cloned().collect();
        codes.sort();
        codes
    }
}

static REGISTRY: OnceCell<QuickFixRegistry> = OnceCell::new();

/// The built-in registry, built on first use.
pub fn registry() -> &'static QuickFixRegistry {
    REGISTRY.get_or_init(builtin)
}

fn id(domain: Domain, fix: &str) -> String {
    format!("jakarta.{}.{}", domain.short_name(), fix)
}

fn builtin() -> QuickFixRegistry {
    let mut r = QuickFixRegistry::new();
    register_annotations(&mut r);
    register_bean_validation(&mut r);
    register_cdi(&mut r);
    register_di(&mut r);
    register_interceptor(&mut r);
    register_jaxrs(&mut r);
    register_jsonb(&mut r);
    register_persistence(&mut r);
    register_servlet(&mut r);
    register_websocket(&mut r);
    r
}

fn register_annotations(r: &mut QuickFixRegistry) {
    use AnnotationsCode::*;
    let d = Domain::Annotations;

    r.register(
        &[MissingResourceNameAttribute],
        AddAttributeFix::new(
            id(d, "AddResourceName"),
            annotations::RESOURCE,
            AttributeSet::EachOf(vec!["name"]),
        ),
    );
    r.register(
        &[MissingResourceTypeAttribute],
        AddAttributeFix::new(
            id(d, "AddResourceType"),
            annotations::RESOURCE,
            AttributeSet::EachOf(vec!["type"]),
        ),
    );

    let lifecycle = [
        (
            "PostConstruct",
            annotations::POST_CONSTRUCT,
            [PostConstructParams, PostConstructReturnType, PostConstructException, PostConstructStatic],
        ),
        (
            "PreDestroy",
            annotations::PRE_DESTROY,
            [PreDestroyParams, PreDestroyReturnType, PreDestroyException, PreDestroyStatic],
        ),
    ];
    for (fix, annotation, [params, return_type, exception, is_static]) in lifecycle {
        r.register(
            &[params],
            RemoveParametersFix::new(id(d, &format!("{}RemoveParameters", fix)), ParametersMode::All),
        );
        r.register(
            &[params],
            RemoveAnnotationFix::new(
                id(d, &format!("Remove{}", fix)),
                RemoveMode::Fixed(vec![annotation]),
            )
            .with_relevance(90),
        );
        r.register(
            &[return_type],
            ChangeReturnTypeFix::new(id(d, &format!("{}ReturnVoid", fix)), "void"),
        );
        r.register(
            &[exception],
            RemoveThrownExceptionsFix::new(id(d, &format!("{}RemoveExceptions", fix))),
        );
        r.register(
            &[is_static],
            ModifierFix::new(
                id(d, &format!("{}RemoveStatic", fix)),
                "Remove the 'static' modifier",
                ModifierTarget::Element,
            )
            .removing(Modifier::Static),
        );
    }
}

fn register_bean_validation(r: &mut QuickFixRegistry) {
    use BeanValidationCode::*;
    let d = Domain::BeanValidation;

    r.register(
        &[FixTypeOfElement, MakeNotStatic],
        RemoveAnnotationFix::new(id(d, "RemoveConstraint"), RemoveMode::EachFromData),
    );
    r.register(
        &[MakeNotStatic],
        ModifierFix::new(id(d, "RemoveStatic"), "Remove the 'static' modifier", ModifierTarget::Element)
            .removing(Modifier::Static),
    );
}

fn register_cdi(r: &mut QuickFixRegistry) {
    use CdiCode::*;
    let d = Domain::Cdi;

    r.register(
        &[
            InvalidNumberOfScopedAnnotationsByManagedBean,
            InvalidNumberOfScopeAnnotationsByProducerField,
            InvalidNumberOfScopeAnnotationsByProducerMethod,
        ],
        RemoveAnnotationFix::new(id(d, "KeepOneScope"), RemoveMode::KeepEachFromData),
    );
    r.register(
        &[InvalidManagedBeanAnnotation],
        ModifierFix::new(id(d, "RemovePublic"), "Remove the 'public' modifier", ModifierTarget::Element)
            .removing(Modifier::Public),
    );
    r.register(
        &[InvalidManagedBeanConstructor],
        AddConstructorFix::new(id(d, "AddConstructor"), vec![Modifier::Protected, Modifier::Public]),
    );
    r.register(
        &[RemoveProducesOrInject, InvalidInjectionParamAnnotation, InvalidDisposerMethodParams],
        RemoveAnnotationFix::new(id(d, "RemoveAnnotation"), RemoveMode::EachFromData),
    );
}

fn register_di(r: &mut QuickFixRegistry) {
    use DiCode::*;
    let d = Domain::Di;

    r.register(
        &[
            RemoveInjectOrFinal,
            RemoveInjectOrAbstract,
            RemoveInjectOrStatic,
            RemoveInjectForGeneric,
            RemoveInjectForConstructor,
        ],
        RemoveAnnotationFix::new(id(d, "RemoveInject"), RemoveMode::Fixed(vec![di::INJECT])),
    );
    for (code, modifier, fix) in [
        (RemoveInjectOrFinal, Modifier::Final, "RemoveFinal"),
        (RemoveInjectOrAbstract, Modifier::Abstract, "RemoveAbstract"),
        (RemoveInjectOrStatic, Modifier::Static, "RemoveStatic"),
    ] {
        r.register(
            &[code],
            ModifierFix::new(
                id(d, fix),
                format!("Remove the '{}' modifier", modifier.keyword()),
                ModifierTarget::Element,
            )
            .removing(modifier),
        );
    }
    r.register(
        &[InjectNonStaticInnerClass],
        ModifierFix::new(id(d, "MakeInnerClassStatic"), "Make the inner class static", ModifierTarget::ReferencedType)
            .adding(Modifier::Static),
    );
}

fn register_interceptor(r: &mut QuickFixRegistry) {
    use InterceptorCode::*;
    let d = Domain::Interceptor;

    r.register(
        &[InvalidInterceptorAbstract],
        ModifierFix::new(id(d, "RemoveAbstract"), "Remove the 'abstract' modifier", ModifierTarget::Element)
            .removing(Modifier::Abstract),
    );
    r.register(
        &[InvalidInterceptorNoArgConstructor],
        AddConstructorFix::new(id(d, "AddConstructor"), vec![Modifier::Public]),
    );
    r.register(
        &[InvalidInterceptorMethodModifier],
        ModifierFix::new(id(d, "RemoveModifiers"), "Remove modifier", ModifierTarget::Element).removing_from_data(),
    );
    r.register(
        &[MultipleInterceptorMethods],
        RemoveAnnotationFix::new(id(d, "RemoveInterceptorAnnotation"), RemoveMode::EachFromData),
    );
}

fn register_jaxrs(r: &mut QuickFixRegistry) {
    use JaxRsCode::*;
    let d = Domain::JaxRs;

    r.register(
        &[NonPublicResourceMethod, NoPublicConstructors],
        ModifierFix::new(id(d, "MakePublic"), "Make this declaration public", ModifierTarget::Element)
            .adding(Modifier::Public),
    );
    r.register(
        &[ResourceMethodMultipleEntityParams],
        RemoveParametersFix::new(id(d, "KeepOneEntityParameter"), ParametersMode::KeepEachFromData),
    );
    r.register(
        &[NoPublicConstructors],
        AddConstructorFix::new(id(d, "AddConstructor"), vec![Modifier::Public]),
    );
}

fn register_jsonb(r: &mut QuickFixRegistry) {
    use JsonbCode::*;
    let d = Domain::Jsonb;

    r.register(
        &[MultipleJsonbCreatorAnnotations],
        RemoveAnnotationFix::new(id(d, "RemoveJsonbCreator"), RemoveMode::Fixed(vec![jsonb::JSONB_CREATOR])),
    );
    r.register(
        &[JSONBTransientWithOtherAnnotations],
        RemoveAnnotationFix::new(id(d, "RemoveJsonbTransient"), RemoveMode::Fixed(vec![jsonb::JSONB_TRANSIENT])),
    );
    r.register(
        &[JSONBTransientWithOtherAnnotations],
        RemoveAnnotationFix::new(
            id(d, "RemoveOtherJsonbAnnotations"),
            RemoveMode::AllFromDataExcept(jsonb::JSONB_TRANSIENT),
        ),
    );
    r.register(
        &[JSONBAccessorConflict],
        RemoveAnnotationFix::new(id(d, "RemoveConflictingAnnotations"), RemoveMode::AllFromData),
    );
}

fn register_persistence(r: &mut QuickFixRegistry) {
    use PersistenceCode::*;
    let d = Domain::Persistence;

    r.register(
        &[MissingEmptyConstructor],
        AddConstructorFix::new(id(d, "AddConstructor"), vec![Modifier::Protected, Modifier::Public]),
    );
    r.register(
        &[InvalidClass, RemoveFinalMethods, RemoveFinalVariables],
        ModifierFix::new(id(d, "RemoveFinal"), "Remove the 'final' modifier", ModifierTarget::Element)
            .removing(Modifier::Final),
    );
    r.register(
        &[RemoveMapKeyAnnotation],
        RemoveAnnotationFix::new(id(d, "RemoveMapKeyAnnotation"), RemoveMode::EachFromData),
    );
    r.register(
        &[SupplyAttributesToAnnotations],
        AddAttributeFix::new(id(d, "AddJoinColumnAttributes"), persistence::MAP_KEY_JOIN_COLUMN, AttributeSet::FromData),
    );
}

fn register_servlet(r: &mut QuickFixRegistry) {
    use ServletCode::*;
    let d = Domain::Servlet;

    r.register(
        &[WebServletMustExtend],
        SupertypeFix::new(id(d, "ExtendHttpServlet"), servlet::HTTP_SERVLET, SupertypeKind::Extend),
    );
    r.register(
        &[WebFilterMustImplement],
        SupertypeFix::new(id(d, "ImplementFilter"), servlet::FILTER, SupertypeKind::Implement),
    );
    r.register(
        &[WebListenerMustImplement],
        SupertypeFix::new(
            id(d, "ImplementServletContextListener"),
            "jakarta.servlet.ServletContextListener",
            SupertypeKind::Implement,
        ),
    );
    r.register(
        &[WebServletMissingAttributes],
        AddAttributeFix::new(
            id(d, "AddServletAttribute"),
            servlet::WEB_SERVLET,
            AttributeSet::EachOf(vec!["value", "urlPatterns"]),
        ),
    );
    r.register(
        &[WebFilterMissingAttributes],
        AddAttributeFix::new(
            id(d, "AddFilterAttribute"),
            servlet::WEB_FILTER,
            AttributeSet::EachOf(vec!["value", "urlPatterns", "servletNames"]),
        ),
    );
    r.register(
        &[WebServletDuplicateAttributes],
        RemoveAttributeFix::new(id(d, "RemoveServletAttribute"), servlet::WEB_SERVLET, vec!["value", "urlPatterns"]),
    );
    r.register(
        &[WebFilterDuplicateAttributes],
        RemoveAttributeFix::new(id(d, "RemoveFilterAttribute"), servlet::WEB_FILTER, vec!["value", "urlPatterns"]),
    );
}

fn register_websocket(r: &mut QuickFixRegistry) {
    use WebsocketCode::*;
    let d = Domain::Websocket;

    r.register(
        &[InvalidEndpointPathWithNoStartingSlash],
        PrefixSlashFix::new(id(d, "PrefixSlash"), websocket::SERVER_ENDPOINT, "value"),
    );
    r.register(
        &[OnMessageDuplicateMethod],
        RemoveAnnotationFix::new(id(d, "RemoveOnMessage"), RemoveMode::Fixed(vec![websocket::ON_MESSAGE])),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_namespaced() {
        let r = registry();
        assert!(!r.is_empty());
        for id in r.by_id.keys() {
            assert!(id.starts_with("jakarta."), "{}", id);
        }

        // every registered participant is reachable by its own id
        let mut distinct: Vec<*const ()> = r
            .by_code
            .values()
            .flatten()
            .map(|p| Arc::as_ptr(p) as *const ())
            .collect();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), r.len());
        for p in r.by_code.values().flatten() {
            assert!(Arc::ptr_eq(r.get(p.id()).unwrap(), p), "{}", p.id());
        }
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_id_is_rejected() {
        let mut r = QuickFixRegistry::new();
        let fix = || RemoveAnnotationFix::new("jakarta.di.RemoveInject", RemoveMode::Fixed(vec![di::INJECT]));
        r.register(&[DiCode::RemoveInjectOrFinal], fix());
        r.register(&[DiCode::RemoveInjectOrStatic], fix());
    }

    #[test]
    fn test_codes_belong_to_known_domains() {
        for (source, code) in registry().codes() {
            let domain = crate::rules::code_domain(&code).unwrap();
            assert_eq!(domain.source(), source);
        }
    }

    #[test]
    fn test_lookup() {
        let r = registry();
        let ids: Vec<&str> = r
            .participants_for("jakarta-di", "RemoveInjectOrFinal")
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(ids, vec!["jakarta.di.RemoveInject", "jakarta.di.RemoveFinal"]);
        assert!(r.get("jakarta.websocket.PrefixSlash").is_some());
        assert!(r.participants_for("jakarta-di", "Nope").is_empty());
    }
}
