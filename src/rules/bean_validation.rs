//! Bean Validation constraints (`jakarta.validation.constraints`).
//!
//! A constraint may only annotate an element whose type belongs to the
//! constraint's type family, and never a static field or method.

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticsContext, Domain, RuleParticipant};
use crate::model::{simple_name, Annotation, MatchMode, Modifiers, TypeRef};

use super::at;

error_codes! {
    pub enum BeanValidationCode for Domain::BeanValidation {
        FixTypeOfElement,
        MakeNotStatic,
    }
}

/// Types a constraint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Any,
    Boolean,
    /// Integral numbers and big numbers.
    Numeric,
    /// Numeric plus `CharSequence`.
    Decimal,
    /// Numeric plus floating point.
    Signed,
    CharSequence,
    Temporal,
    /// Strings, collections, maps and arrays.
    Sized,
}

const BOOLEAN_TYPES: &[&str] = &["boolean", "java.lang.Boolean"];

const NUMERIC_TYPES: &[&str] = &[
    "byte",
    "short",
    "int",
    "long",
    "java.lang.Byte",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.math.BigDecimal",
    "java.math.BigInteger",
];

const FLOATING_TYPES: &[&str] = &["float", "double", "java.lang.Float", "java.lang.Double"];

const CHAR_SEQUENCE_TYPES: &[&str] = &[
    "java.lang.CharSequence",
    "java.lang.String",
    "java.lang.StringBuilder",
    "java.lang.StringBuffer",
];

const TEMPORAL_TYPES: &[&str] = &[
    "java.util.Date",
    "java.util.Calendar",
    "java.time.temporal.TemporalAccessor",
    "java.time.Instant",
    "java.time.LocalDate",
    "java.time.LocalDateTime",
    "java.time.LocalTime",
    "java.time.MonthDay",
    "java.time.OffsetDateTime",
    "java.time.OffsetTime",
    "java.time.Year",
    "java.time.YearMonth",
    "java.time.ZonedDateTime",
    "java.time.chrono.HijrahDate",
    "java.time.chrono.JapaneseDate",
    "java.time.chrono.MinguoDate",
    "java.time.chrono.ThaiBuddhistDate",
];

const SIZED_TYPES: &[&str] = &[
    "java.lang.CharSequence",
    "java.lang.String",
    "java.util.Collection",
    "java.util.List",
    "java.util.Set",
    "java.util.Queue",
    "java.util.Deque",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.HashSet",
    "java.util.TreeSet",
    "java.util.Map",
    "java.util.HashMap",
    "java.util.TreeMap",
    "java.util.LinkedHashMap",
];

impl TypeFamily {
    /// Family of a constraint by simple name; `None` for names that are not
    /// built-in constraints.
    pub fn of(constraint: &str) -> Option<Self> {
        let family = match constraint {
            "NotNull" | "Null" | "Valid" => TypeFamily::Any,
            "AssertTrue" | "AssertFalse" => TypeFamily::Boolean,
            "Max" | "Min" => TypeFamily::Numeric,
            "DecimalMax" | "DecimalMin" | "Digits" => TypeFamily::Decimal,
            "Positive" | "PositiveOrZero" | "Negative" | "NegativeOrZero" => TypeFamily::Signed,
            "Email" | "Pattern" | "NotBlank" => TypeFamily::CharSequence,
            "Past" | "PastOrPresent" | "Future" | "FutureOrPresent" => TypeFamily::Temporal,
            "Size" | "NotEmpty" => TypeFamily::Sized,
            _ => return None,
        };
        Some(family)
    }

    fn accepted(&self) -> Vec<&'static str> {
        match self {
            TypeFamily::Any => Vec::new(),
            TypeFamily::Boolean => BOOLEAN_TYPES.to_vec(),
            TypeFamily::Numeric => NUMERIC_TYPES.to_vec(),
            TypeFamily::Decimal => [NUMERIC_TYPES, CHAR_SEQUENCE_TYPES].concat(),
            TypeFamily::Signed => [NUMERIC_TYPES, FLOATING_TYPES].concat(),
            TypeFamily::CharSequence => CHAR_SEQUENCE_TYPES.to_vec(),
            TypeFamily::Temporal => TEMPORAL_TYPES.to_vec(),
            TypeFamily::Sized => SIZED_TYPES.to_vec(),
        }
    }
}

/// Every built-in constraint annotation.
pub const CONSTRAINTS: &[&str] = &[
    "jakarta.validation.constraints.AssertFalse",
    "jakarta.validation.constraints.AssertTrue",
    "jakarta.validation.constraints.DecimalMax",
    "jakarta.validation.constraints.DecimalMin",
    "jakarta.validation.constraints.Digits",
    "jakarta.validation.constraints.Email",
    "jakarta.validation.constraints.Future",
    "jakarta.validation.constraints.FutureOrPresent",
    "jakarta.validation.constraints.Max",
    "jakarta.validation.constraints.Min",
    "jakarta.validation.constraints.Negative",
    "jakarta.validation.constraints.NegativeOrZero",
    "jakarta.validation.constraints.NotBlank",
    "jakarta.validation.constraints.NotEmpty",
    "jakarta.validation.constraints.NotNull",
    "jakarta.validation.constraints.Null",
    "jakarta.validation.constraints.Past",
    "jakarta.validation.constraints.PastOrPresent",
    "jakarta.validation.constraints.Pattern",
    "jakarta.validation.constraints.Positive",
    "jakarta.validation.constraints.PositiveOrZero",
    "jakarta.validation.constraints.Size",
];

pub struct BeanValidationParticipant;

impl BeanValidationParticipant {
    fn check(
        &self,
        ctx: &DiagnosticsContext,
        annotations: &[Annotation],
        modifiers: &Modifiers,
        type_ref: &TypeRef,
        out: &mut Vec<Diagnostic>,
    ) {
        for (annotation, constraint) in ctx.matching(annotations, CONSTRAINTS) {
            if modifiers.is_static() {
                out.push(
                    Diagnostic::new(
                        BeanValidationCode::MakeNotStatic,
                        annotation.span,
                        format!(
                            "Constraint annotations are not allowed on static fields or methods: {}.",
                            at(constraint)
                        ),
                    )
                    .with_data_strings([constraint]),
                );
                continue;
            }

            let Some(family) = TypeFamily::of(simple_name(constraint)) else {
                continue;
            };
            if family == TypeFamily::Any {
                continue;
            }

            let valid = if type_ref.is_array() {
                family == TypeFamily::Sized
            } else {
                let (matched, mode) = ctx.type_matches(type_ref, &family.accepted());
                // an unresolved type that does not match by name is skipped
                matched || mode == MatchMode::Raw
            };
            if !valid {
                out.push(
                    Diagnostic::new(
                        BeanValidationCode::FixTypeOfElement,
                        annotation.span,
                        format!(
                            "The {} annotation can not be used on an element of type '{}'.",
                            at(constraint),
                            type_ref.text
                        ),
                    )
                    .with_data_strings([constraint]),
                );
            }
        }
    }
}

impl RuleParticipant for BeanValidationParticipant {
    fn domain(&self) -> Domain {
        Domain::BeanValidation
    }

    fn collect_diagnostics(&self, ctx: &DiagnosticsContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for t in ctx.unit.all_types() {
            for f in &t.fields {
                self.check(ctx, &f.annotations, &f.modifiers, &f.type_ref, &mut out);
            }
            for m in t.plain_methods() {
                if let Some(ret) = &m.return_type {
                    self.check(ctx, &m.annotations, &m.modifiers, ret, &mut out);
                }
            }
        }
        Ok(out)
    }
}
