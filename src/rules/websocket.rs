//! WebSocket endpoints (`jakarta.websocket`).

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{MatchMode, MethodDecl, ParamDecl, TypeDecl};

use super::at;

pub const SERVER_ENDPOINT: &str = "jakarta.websocket.server.ServerEndpoint";
pub const CLIENT_ENDPOINT: &str = "jakarta.websocket.ClientEndpoint";
pub const ON_OPEN: &str = "jakarta.websocket.OnOpen";
pub const ON_CLOSE: &str = "jakarta.websocket.OnClose";
pub const ON_MESSAGE: &str = "jakarta.websocket.OnMessage";
pub const ON_ERROR: &str = "jakarta.websocket.OnError";
pub const PATH_PARAM: &str = "jakarta.websocket.server.PathParam";

pub const SESSION: &str = "jakarta.websocket.Session";
pub const ENDPOINT_CONFIG: &str = "jakarta.websocket.EndpointConfig";
pub const CLOSE_REASON: &str = "jakarta.websocket.CloseReason";
pub const PONG_MESSAGE: &str = "jakarta.websocket.PongMessage";

/// Types a `@PathParam` parameter may have.
pub const PATH_PARAM_TYPES: &[&str] = &[
    "java.lang.String",
    "boolean",
    "byte",
    "short",
    "int",
    "long",
    "char",
    "float",
    "double",
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Character",
    "java.lang.Float",
    "java.lang.Double",
];

const BINARY_TYPES: &[&str] = &["java.nio.ByteBuffer", "java.io.InputStream"];

error_codes! {
    pub enum WebsocketCode for Domain::Websocket {
        InvalidEndpointPathWithNoStartingSlash,
        InvalidEndpointPathWithRelativePaths,
        InvalidEndpointPathDuplicateVariable,
        InvalidEndpointPathNotTemplateOrPartialURI,
        InvalidOnOpenParams,
        InvalidOnCloseParams,
        PathParamsAnnotationMissing,
        OnMessageDuplicateMethod,
    }
}

lazy_static! {
    static ref TEMPLATE_SEGMENT: Regex = Regex::new(r"^\{([^{}/]+)\}$").unwrap();
}

/// Violations of an endpoint path, in check order.
pub fn path_violations(path: &str) -> Vec<WebsocketCode> {
    let mut found = Vec::new();
    if !path.starts_with('/') {
        found.push(WebsocketCode::InvalidEndpointPathWithNoStartingSlash);
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == "." || *s == "..") {
        found.push(WebsocketCode::InvalidEndpointPathWithRelativePaths);
    }

    let mut variables: Vec<&str> = Vec::new();
    let mut duplicate = false;
    let mut malformed = false;
    for segment in &segments {
        if let Some(caps) = TEMPLATE_SEGMENT.captures(segment) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            if variables.contains(&name) {
                duplicate = true;
            }
            variables.push(name);
        } else if segment.contains('{') || segment.contains('}') {
            malformed = true;
        }
    }
    if duplicate {
        found.push(WebsocketCode::InvalidEndpointPathDuplicateVariable);
    }
    if malformed {
        found.push(WebsocketCode::InvalidEndpointPathNotTemplateOrPartialURI);
    }
    found
}

fn path_message(code: WebsocketCode) -> &'static str {
    match code {
        WebsocketCode::InvalidEndpointPathWithNoStartingSlash => {
            "Server endpoint paths must start with a leading '/'."
        }
        WebsocketCode::InvalidEndpointPathWithRelativePaths => {
            "Server endpoint paths must not contain the relative segments '.' or '..'."
        }
        WebsocketCode::InvalidEndpointPathDuplicateVariable => {
            "Server endpoint paths must not use the same variable more than once in a path."
        }
        _ => "Server endpoint paths must be a URI-template (level-1) or a partial URI.",
    }
}

/// The native message format an `@OnMessage` method consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageKind {
    Text,
    Binary,
    Pong,
}

/// Lifecycle callbacks whose parameters are restricted.
struct Callback {
    annotation: &'static str,
    allowed: &'static [&'static str],
    code: WebsocketCode,
}

const CALLBACKS: &[Callback] = &[
    Callback {
        annotation: ON_OPEN,
        allowed: &[SESSION, ENDPOINT_CONFIG],
        code: WebsocketCode::InvalidOnOpenParams,
    },
    Callback {
        annotation: ON_CLOSE,
        allowed: &[SESSION, CLOSE_REASON],
        code: WebsocketCode::InvalidOnCloseParams,
    },
];

pub struct WebsocketParticipant;

impl WebsocketParticipant {
    fn check_path(&self, ctx: &DiagnosticsContext, t: &TypeDecl, out: &mut Vec<Diagnostic>) {
        let Some(endpoint) = ctx.find(&t.annotations, SERVER_ENDPOINT) else {
            return;
        };
        let Some(value) = endpoint.member("value") else {
            return;
        };
        let Some(path) = value.value.as_str() else {
            return;
        };
        for code in path_violations(path) {
            out.push(Diagnostic::new(code, value.value_span, path_message(code)));
        }
    }

    fn check_callback_params(
        &self,
        ctx: &DiagnosticsContext,
        m: &MethodDecl,
        callback: &Callback,
        out: &mut Vec<Diagnostic>,
    ) {
        for p in &m.parameters {
            let path_param = ctx.has(&p.annotations, PATH_PARAM);
            let (is_simple, simple_mode) = ctx.type_matches(&p.type_ref, PATH_PARAM_TYPES);
            let is_simple = is_simple && !p.type_ref.is_array();

            if path_param {
                if !is_simple && simple_mode == MatchMode::Resolved {
                    out.push(Diagnostic::new(
                        callback.code,
                        p.name_span,
                        format!(
                            "Parameters annotated with @PathParam must be String, a primitive or a boxed primitive ({}).",
                            at(callback.annotation)
                        ),
                    ));
                }
                continue;
            }

            let (allowed, mode) = ctx.type_matches(&p.type_ref, callback.allowed);
            if allowed && !p.type_ref.is_array() {
                continue;
            }
            if is_simple {
                out.push(Diagnostic::new(
                    WebsocketCode::PathParamsAnnotationMissing,
                    p.name_span,
                    "Parameters of type String, any Java primitive type, or boxed version thereof must be annotated with @PathParam.",
                ));
            } else if mode == MatchMode::Resolved {
                out.push(Diagnostic::new(
                    callback.code,
                    p.name_span,
                    format!(
                        "Invalid parameter type '{}' for a method annotated {}.",
                        p.type_ref.text,
                        at(callback.annotation)
                    ),
                ));
            }
        }
    }

    fn message_kind(&self, ctx: &DiagnosticsContext, m: &MethodDecl) -> Option<MessageKind> {
        let payload: Option<&ParamDecl> = m.parameters.iter().find(|p| {
            !ctx.has(&p.annotations, PATH_PARAM) && !ctx.type_matches(&p.type_ref, &[SESSION]).0
        });
        let t = &payload?.type_ref;
        if t.array_dims == 1 && t.name == "byte" {
            return Some(MessageKind::Binary);
        }
        if ctx.type_matches(t, &[PONG_MESSAGE]).0 {
            return Some(MessageKind::Pong);
        }
        if !t.is_array() && ctx.type_matches(t, BINARY_TYPES).0 {
            return Some(MessageKind::Binary);
        }
        Some(MessageKind::Text)
    }
}

impl RuleParticipant for WebsocketParticipant {
    fn domain(&self) -> Domain {
        Domain::Websocket
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            let server = ctx.has(&t.annotations, SERVER_ENDPOINT);
            if !server && !ctx.has(&t.annotations, CLIENT_ENDPOINT) {
                continue;
            }
            self.check_path(ctx, t, &mut out);

            let mut by_kind: BTreeMap<MessageKind, Vec<&MethodDecl>> = BTreeMap::new();
            for m in t.plain_methods() {
                for callback in CALLBACKS {
                    if ctx.has(&m.annotations, callback.annotation) {
                        self.check_callback_params(ctx, m, callback, &mut out);
                    }
                }
                if ctx.has(&m.annotations, ON_MESSAGE) {
                    if let Some(kind) = self.message_kind(ctx, m) {
                        by_kind.entry(kind).or_default().push(m);
                    }
                }
            }

            let mut duplicated: Vec<&MethodDecl> = by_kind
                .into_values()
                .filter(|methods| methods.len() > 1)
                .flatten()
                .collect();
            duplicated.sort_by_key(|m| m.span.start);
            for m in duplicated {
                out.push(Diagnostic::new(
                    WebsocketCode::OnMessageDuplicateMethod,
                    m.name_span,
                    "Classes annotated with @ServerEndpoint or @ClientEndpoint must have only one @OnMessage method for each native message format: text, binary and pong.",
                ));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{codes, diagnose};

    const IMPORTS: &str = "import jakarta.websocket.*;\nimport jakarta.websocket.server.*;\nimport java.nio.ByteBuffer;\n";

    fn run(body: &str) -> Vec<Diagnostic> {
        diagnose(Domain::Websocket, &format!("{}{}", IMPORTS, body))
    }

    #[test]
    fn test_path_violations() {
        use WebsocketCode::*;
        assert!(path_violations("/chat/{room}").is_empty());
        assert!(path_violations("/").is_empty());
        assert_eq!(path_violations("chat"), vec![InvalidEndpointPathWithNoStartingSlash]);
        assert_eq!(path_violations("/a/../b"), vec![InvalidEndpointPathWithRelativePaths]);
        assert_eq!(
            path_violations("/{a}/{a}"),
            vec![InvalidEndpointPathDuplicateVariable]
        );
        assert_eq!(
            path_violations("/room{id}"),
            vec![InvalidEndpointPathNotTemplateOrPartialURI]
        );
    }

    #[test]
    fn test_endpoint_path_diagnostic_range() {
        let source = format!("{}@ServerEndpoint(\"chat\") class Chat {{}}", IMPORTS);
        let d = diagnose(Domain::Websocket, &source);
        assert_eq!(codes(&d), vec!["InvalidEndpointPathWithNoStartingSlash"]);
        assert_eq!(&source[d[0].range.start..d[0].range.end], "\"chat\"");
    }

    #[test]
    fn test_text_block_path_ignores_indentation() {
        let d = run("@ServerEndpoint(\"\"\"\n        /chat\"\"\") class Chat {}");
        assert!(d.is_empty());
        let d = run("@ServerEndpoint(\"\"\"\n        chat\"\"\") class Chat {}");
        assert_eq!(codes(&d), vec!["InvalidEndpointPathWithNoStartingSlash"]);
    }

    #[test]
    fn test_on_open_params() {
        let d = run(
            r#"@ServerEndpoint("/chat/{room}")
class Chat {
    @OnOpen
    public void open(Session session, EndpointConfig config, @PathParam("room") String room, String missing, Object bad) {}
    @OnClose
    public void close(Session session, CloseReason reason, EndpointConfig wrong) {}
}"#,
        );
        assert_eq!(
            codes(&d),
            vec!["PathParamsAnnotationMissing", "InvalidOnOpenParams", "InvalidOnCloseParams"]
        );
    }

    #[test]
    fn test_unresolved_param_types_are_skipped() {
        let d = run(
            r#"@ServerEndpoint("/chat")
class Chat {
    @OnOpen public void open(com.acme.Custom custom) {}
}"#,
        );
        assert!(d.is_empty());
    }

    #[test]
    fn test_duplicate_message_methods() {
        let d = run(
            r#"@ClientEndpoint
class Client {
    @OnMessage public void text(String message) {}
    @OnMessage public void other(Session s, String message, boolean last) {}
    @OnMessage public void binary(ByteBuffer data) {}
    @OnMessage public void pong(PongMessage pong) {}
}"#,
        );
        assert_eq!(
            codes(&d),
            vec!["OnMessageDuplicateMethod", "OnMessageDuplicateMethod"]
        );
    }
}
