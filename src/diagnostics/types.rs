//! Core types for diagnostics.

use serde::{Deserialize, Serialize};

use crate::model::TextRange;

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Rule domains, one per Jakarta specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "jakarta-annotations")]
    Annotations,
    #[serde(rename = "jakarta-bean-validation")]
    BeanValidation,
    #[serde(rename = "jakarta-cdi")]
    Cdi,
    #[serde(rename = "jakarta-di")]
    Di,
    #[serde(rename = "jakarta-interceptor")]
    Interceptor,
    #[serde(rename = "jakarta-jax_rs")]
    JaxRs,
    #[serde(rename = "jakarta-jsonb")]
    Jsonb,
    #[serde(rename = "jakarta-persistence")]
    Persistence,
    #[serde(rename = "jakarta-servlet")]
    Servlet,
    #[serde(rename = "jakarta-websocket")]
    Websocket,
}

impl Domain {
    /// All domains in participant order.
    pub const ALL: &'static [Domain] = &[
        Domain::Annotations,
        Domain::BeanValidation,
        Domain::Cdi,
        Domain::Di,
        Domain::Interceptor,
        Domain::JaxRs,
        Domain::Jsonb,
        Domain::Persistence,
        Domain::Servlet,
        Domain::Websocket,
    ];

    /// The diagnostic source tag.
    pub fn source(&self) -> &'static str {
        match self {
            Domain::Annotations => "jakarta-annotations",
            Domain::BeanValidation => "jakarta-bean-validation",
            Domain::Cdi => "jakarta-cdi",
            Domain::Di => "jakarta-di",
            Domain::Interceptor => "jakarta-interceptor",
            Domain::JaxRs => "jakarta-jax_rs",
            Domain::Jsonb => "jakarta-jsonb",
            Domain::Persistence => "jakarta-persistence",
            Domain::Servlet => "jakarta-servlet",
            Domain::Websocket => "jakarta-websocket",
        }
    }

    /// Short name used in configuration and participant ids.
    pub fn short_name(&self) -> &'static str {
        match self {
            Domain::Annotations => "annotations",
            Domain::BeanValidation => "beanvalidation",
            Domain::Cdi => "cdi",
            Domain::Di => "di",
            Domain::Interceptor => "interceptor",
            Domain::JaxRs => "jaxrs",
            Domain::Jsonb => "jsonb",
            Domain::Persistence => "persistence",
            Domain::Servlet => "servlet",
            Domain::Websocket => "websocket",
        }
    }

    /// Parse a source tag or short name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.source() == s || d.short_name() == s)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source())
    }
}

/// A per-domain error code enumeration.
pub trait ErrorCode: Copy {
    fn domain(&self) -> Domain;

    /// Stable code string.
    fn as_str(&self) -> &'static str;
}

/// Declares a domain's error code enumeration.
macro_rules! error_codes {
    (
        $(#[$meta:meta])*
        pub enum $name:ident for $domain:path {
            $($variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn parse(s: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|c| $crate::diagnostics::ErrorCode::as_str(c) == s)
            }
        }

        impl $crate::diagnostics::ErrorCode for $name {
            fn domain(&self) -> $crate::diagnostics::Domain {
                $domain
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::diagnostics::ErrorCode::as_str(self))
            }
        }
    };
}

pub(crate) use error_codes;

/// A single reported violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: TextRange,
    pub message: String,
    pub severity: Severity,
    /// Rule domain source tag.
    pub source: String,
    pub code: String,
    /// Payload for quick fixes; opaque to everyone but the authoring domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Diagnostic {
    /// Create an error-severity diagnostic for `code`.
    pub fn new<C: ErrorCode>(code: C, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
            severity: Severity::Error,
            source: code.domain().source().to_string(),
            code: code.as_str().to_string(),
            data: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a string array payload.
    pub fn with_data_strings<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<serde_json::Value> = items
            .into_iter()
            .map(|s| serde_json::Value::String(s.into()))
            .collect();
        self.with_data(serde_json::Value::Array(items))
    }

    /// The payload as a string list; a scalar string is a one-element list.
    pub fn data_strings(&self) -> Vec<String> {
        data_strings(self.data.as_ref())
    }

    pub fn domain(&self) -> Option<Domain> {
        Domain::parse(&self.source)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Read a JSON payload as a list of strings.
pub fn data_strings(data: Option<&serde_json::Value>) -> Vec<String> {
    match data {
        Some(serde_json::Value::String(s)) => vec![s.clone()],
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Diagnostics for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDiagnostics {
    pub uri: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of a diagnose request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnoseOutcome {
    /// Fully processed files, in input order.
    pub files: Vec<FileDiagnostics>,
    /// Whether the request was cancelled before every file was processed.
    pub cancelled: bool,
}

impl DiagnoseOutcome {
    pub fn diagnostic_count(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    /// Check if there are any error-severity diagnostics.
    pub fn has_errors(&self) -> bool {
        self.files
            .iter()
            .flat_map(|f| &f.diagnostics)
            .any(Diagnostic::is_error)
    }
}
