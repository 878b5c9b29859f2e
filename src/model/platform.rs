//! Well-known library types and their direct supertypes.
//!
//! The project's own sources cover user types; this table gives the
//! hierarchy of JDK and Jakarta API types that rules reason about
//! (exception classification, servlet/filter/listener contracts, bean
//! validation type families).

use phf::phf_map;

static PLATFORM_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    // java.lang
    "java.lang.Object" => &[],
    "java.lang.Class" => &["java.lang.Object"],
    "java.lang.Enum" => &["java.lang.Object", "java.lang.Comparable", "java.io.Serializable"],
    "java.lang.Record" => &["java.lang.Object"],
    "java.lang.Void" => &["java.lang.Object"],
    "java.lang.Iterable" => &["java.lang.Object"],
    "java.lang.Comparable" => &["java.lang.Object"],
    "java.lang.Runnable" => &["java.lang.Object"],
    "java.lang.AutoCloseable" => &["java.lang.Object"],
    "java.lang.Cloneable" => &["java.lang.Object"],
    "java.lang.Readable" => &["java.lang.Object"],
    "java.lang.CharSequence" => &["java.lang.Object"],
    "java.lang.String" => &["java.lang.Object", "java.io.Serializable", "java.lang.Comparable", "java.lang.CharSequence"],
    "java.lang.StringBuilder" => &["java.lang.Object", "java.io.Serializable", "java.lang.CharSequence"],
    "java.lang.StringBuffer" => &["java.lang.Object", "java.io.Serializable", "java.lang.CharSequence"],
    "java.lang.Number" => &["java.lang.Object", "java.io.Serializable"],
    "java.lang.Byte" => &["java.lang.Number", "java.lang.Comparable"],
    "java.lang.Short" => &["java.lang.Number", "java.lang.Comparable"],
    "java.lang.Integer" => &["java.lang.Number", "java.lang.Comparable"],
    "java.lang.Long" => &["java.lang.Number", "java.lang.Comparable"],
    "java.lang.Float" => &["java.lang.Number", "java.lang.Comparable"],
    "java.lang.Double" => &["java.lang.Number", "java.lang.Comparable"],
    "java.lang.Boolean" => &["java.lang.Object", "java.io.Serializable", "java.lang.Comparable"],
    "java.lang.Character" => &["java.lang.Object", "java.io.Serializable", "java.lang.Comparable"],
    "java.lang.Throwable" => &["java.lang.Object", "java.io.Serializable"],
    "java.lang.Exception" => &["java.lang.Throwable"],
    "java.lang.Error" => &["java.lang.Throwable"],
    "java.lang.RuntimeException" => &["java.lang.Exception"],
    "java.lang.InterruptedException" => &["java.lang.Exception"],
    "java.lang.CloneNotSupportedException" => &["java.lang.Exception"],
    "java.lang.ReflectiveOperationException" => &["java.lang.Exception"],
    "java.lang.ClassNotFoundException" => &["java.lang.ReflectiveOperationException"],
    "java.lang.NoSuchMethodException" => &["java.lang.ReflectiveOperationException"],
    "java.lang.IllegalArgumentException" => &["java.lang.RuntimeException"],
    "java.lang.IllegalStateException" => &["java.lang.RuntimeException"],
    "java.lang.NullPointerException" => &["java.lang.RuntimeException"],
    "java.lang.UnsupportedOperationException" => &["java.lang.RuntimeException"],
    "java.lang.ClassCastException" => &["java.lang.RuntimeException"],
    "java.lang.ArithmeticException" => &["java.lang.RuntimeException"],
    "java.lang.IndexOutOfBoundsException" => &["java.lang.RuntimeException"],
    "java.lang.NumberFormatException" => &["java.lang.IllegalArgumentException"],
    "java.lang.SecurityException" => &["java.lang.RuntimeException"],
    "java.lang.AssertionError" => &["java.lang.Error"],
    "java.lang.OutOfMemoryError" => &["java.lang.Error"],

    // java.io
    "java.io.Serializable" => &["java.lang.Object"],
    "java.io.Closeable" => &["java.lang.AutoCloseable"],
    "java.io.IOException" => &["java.lang.Exception"],
    "java.io.FileNotFoundException" => &["java.io.IOException"],
    "java.io.EOFException" => &["java.io.IOException"],
    "java.io.UncheckedIOException" => &["java.lang.RuntimeException"],
    "java.io.InputStream" => &["java.lang.Object", "java.io.Closeable"],
    "java.io.Reader" => &["java.lang.Object", "java.lang.Readable", "java.io.Closeable"],

    // java.nio
    "java.nio.Buffer" => &["java.lang.Object"],
    "java.nio.ByteBuffer" => &["java.nio.Buffer", "java.lang.Comparable"],

    // java.util
    "java.util.EventListener" => &["java.lang.Object"],
    "java.util.Collection" => &["java.lang.Iterable"],
    "java.util.List" => &["java.util.Collection"],
    "java.util.Set" => &["java.util.Collection"],
    "java.util.SortedSet" => &["java.util.Set"],
    "java.util.NavigableSet" => &["java.util.SortedSet"],
    "java.util.Queue" => &["java.util.Collection"],
    "java.util.Deque" => &["java.util.Queue"],
    "java.util.Map" => &["java.lang.Object"],
    "java.util.SortedMap" => &["java.util.Map"],
    "java.util.NavigableMap" => &["java.util.SortedMap"],
    "java.util.ArrayList" => &["java.lang.Object", "java.util.List", "java.io.Serializable"],
    "java.util.LinkedList" => &["java.lang.Object", "java.util.List", "java.util.Deque", "java.io.Serializable"],
    "java.util.HashSet" => &["java.lang.Object", "java.util.Set", "java.io.Serializable"],
    "java.util.LinkedHashSet" => &["java.util.HashSet"],
    "java.util.TreeSet" => &["java.lang.Object", "java.util.NavigableSet", "java.io.Serializable"],
    "java.util.HashMap" => &["java.lang.Object", "java.util.Map", "java.io.Serializable"],
    "java.util.LinkedHashMap" => &["java.util.HashMap"],
    "java.util.TreeMap" => &["java.lang.Object", "java.util.NavigableMap", "java.io.Serializable"],
    "java.util.Optional" => &["java.lang.Object"],
    "java.util.UUID" => &["java.lang.Object", "java.io.Serializable", "java.lang.Comparable"],
    "java.util.Date" => &["java.lang.Object", "java.io.Serializable", "java.lang.Comparable"],
    "java.util.Calendar" => &["java.lang.Object", "java.io.Serializable", "java.lang.Comparable"],
    "java.util.NoSuchElementException" => &["java.lang.RuntimeException"],
    "java.util.ConcurrentModificationException" => &["java.lang.RuntimeException"],
    "java.util.concurrent.ConcurrentMap" => &["java.util.Map"],
    "java.util.concurrent.ConcurrentHashMap" => &["java.lang.Object", "java.util.concurrent.ConcurrentMap", "java.io.Serializable"],
    "java.util.concurrent.TimeoutException" => &["java.lang.Exception"],
    "java.util.concurrent.ExecutionException" => &["java.lang.Exception"],
    "java.util.concurrent.atomic.AtomicInteger" => &["java.lang.Number"],
    "java.util.concurrent.atomic.AtomicLong" => &["java.lang.Number"],

    // java.math
    "java.math.BigDecimal" => &["java.lang.Number", "java.lang.Comparable"],
    "java.math.BigInteger" => &["java.lang.Number", "java.lang.Comparable"],

    // java.time
    "java.time.temporal.TemporalAccessor" => &["java.lang.Object"],
    "java.time.temporal.Temporal" => &["java.time.temporal.TemporalAccessor"],
    "java.time.temporal.TemporalAmount" => &["java.lang.Object"],
    "java.time.chrono.ChronoLocalDate" => &["java.time.temporal.Temporal"],
    "java.time.chrono.HijrahDate" => &["java.time.chrono.ChronoLocalDate"],
    "java.time.chrono.JapaneseDate" => &["java.time.chrono.ChronoLocalDate"],
    "java.time.chrono.MinguoDate" => &["java.time.chrono.ChronoLocalDate"],
    "java.time.chrono.ThaiBuddhistDate" => &["java.time.chrono.ChronoLocalDate"],
    "java.time.Instant" => &["java.lang.Object", "java.time.temporal.Temporal"],
    "java.time.LocalDate" => &["java.lang.Object", "java.time.chrono.ChronoLocalDate"],
    "java.time.LocalDateTime" => &["java.lang.Object", "java.time.temporal.Temporal"],
    "java.time.LocalTime" => &["java.lang.Object", "java.time.temporal.Temporal"],
    "java.time.OffsetDateTime" => &["java.lang.Object", "java.time.temporal.Temporal"],
    "java.time.OffsetTime" => &["java.lang.Object", "java.time.temporal.Temporal"],
    "java.time.ZonedDateTime" => &["java.lang.Object", "java.time.temporal.Temporal"],
    "java.time.Year" => &["java.lang.Object", "java.time.temporal.Temporal"],
    "java.time.YearMonth" => &["java.lang.Object", "java.time.temporal.Temporal"],
    "java.time.MonthDay" => &["java.lang.Object", "java.time.temporal.TemporalAccessor"],
    "java.time.Duration" => &["java.lang.Object", "java.time.temporal.TemporalAmount"],

    // java.sql
    "java.sql.SQLException" => &["java.lang.Exception"],
    "java.sql.Date" => &["java.util.Date"],
    "java.sql.Time" => &["java.util.Date"],
    "java.sql.Timestamp" => &["java.util.Date"],

    // jakarta.servlet
    "jakarta.servlet.Servlet" => &["java.lang.Object"],
    "jakarta.servlet.ServletConfig" => &["java.lang.Object"],
    "jakarta.servlet.GenericServlet" => &["java.lang.Object", "jakarta.servlet.Servlet", "jakarta.servlet.ServletConfig", "java.io.Serializable"],
    "jakarta.servlet.http.HttpServlet" => &["jakarta.servlet.GenericServlet"],
    "jakarta.servlet.Filter" => &["java.lang.Object"],
    "jakarta.servlet.FilterConfig" => &["java.lang.Object"],
    "jakarta.servlet.FilterChain" => &["java.lang.Object"],
    "jakarta.servlet.GenericFilter" => &["java.lang.Object", "jakarta.servlet.Filter", "jakarta.servlet.FilterConfig", "java.io.Serializable"],
    "jakarta.servlet.http.HttpFilter" => &["jakarta.servlet.GenericFilter"],
    "jakarta.servlet.ServletRequest" => &["java.lang.Object"],
    "jakarta.servlet.ServletResponse" => &["java.lang.Object"],
    "jakarta.servlet.http.HttpServletRequest" => &["jakarta.servlet.ServletRequest"],
    "jakarta.servlet.http.HttpServletResponse" => &["jakarta.servlet.ServletResponse"],
    "jakarta.servlet.ServletException" => &["java.lang.Exception"],
    "jakarta.servlet.ServletContextListener" => &["java.util.EventListener"],
    "jakarta.servlet.ServletContextAttributeListener" => &["java.util.EventListener"],
    "jakarta.servlet.ServletRequestListener" => &["java.util.EventListener"],
    "jakarta.servlet.ServletRequestAttributeListener" => &["java.util.EventListener"],
    "jakarta.servlet.http.HttpSessionListener" => &["java.util.EventListener"],
    "jakarta.servlet.http.HttpSessionAttributeListener" => &["java.util.EventListener"],
    "jakarta.servlet.http.HttpSessionIdListener" => &["java.util.EventListener"],

    // jakarta.websocket
    "jakarta.websocket.Session" => &["java.io.Closeable"],
    "jakarta.websocket.EndpointConfig" => &["java.lang.Object"],
    "jakarta.websocket.server.ServerEndpointConfig" => &["jakarta.websocket.EndpointConfig"],
    "jakarta.websocket.CloseReason" => &["java.lang.Object"],
    "jakarta.websocket.PongMessage" => &["java.lang.Object"],
    "jakarta.websocket.Endpoint" => &["java.lang.Object"],
    "jakarta.websocket.DecodeException" => &["java.lang.Exception"],
    "jakarta.websocket.EncodeException" => &["java.lang.Exception"],
    "jakarta.websocket.DeploymentException" => &["java.lang.Exception"],

    // jakarta.interceptor
    "jakarta.interceptor.InvocationContext" => &["java.lang.Object"],

    // jakarta.ws.rs
    "jakarta.ws.rs.WebApplicationException" => &["java.lang.RuntimeException"],
    "jakarta.ws.rs.core.Application" => &["java.lang.Object"],
    "jakarta.ws.rs.core.Response" => &["java.lang.Object", "java.lang.AutoCloseable"],
    "jakarta.ws.rs.core.UriInfo" => &["java.lang.Object"],
    "jakarta.ws.rs.core.HttpHeaders" => &["java.lang.Object"],
    "jakarta.ws.rs.core.Request" => &["java.lang.Object"],
    "jakarta.ws.rs.core.SecurityContext" => &["java.lang.Object"],
    "jakarta.ws.rs.ext.ExceptionMapper" => &["java.lang.Object"],
    "jakarta.ws.rs.ext.MessageBodyReader" => &["java.lang.Object"],
    "jakarta.ws.rs.ext.MessageBodyWriter" => &["java.lang.Object"],
};

/// Direct supertypes of a well-known library type.
pub fn direct_supertypes(qualified_name: &str) -> Option<&'static [&'static str]> {
    PLATFORM_TYPES.get(qualified_name).copied()
}

pub fn is_known(qualified_name: &str) -> bool {
    PLATFORM_TYPES.contains_key(qualified_name)
}

/// Qualified names of well-known types in `package` whose simple name is
/// `simple`; used for on-demand imports and the implicit `java.lang` import.
pub fn lookup_in_package(package: &str, simple: &str) -> Option<&'static str> {
    let candidate = format!("{}.{}", package, simple);
    PLATFORM_TYPES
        .get_entry(candidate.as_str())
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert!(is_known("java.lang.String"));
        assert!(!is_known("com.acme.Unknown"));
        assert_eq!(
            direct_supertypes("java.io.IOException"),
            Some(&["java.lang.Exception"][..])
        );
        assert_eq!(
            lookup_in_package("java.lang", "RuntimeException"),
            Some("java.lang.RuntimeException")
        );
        assert_eq!(lookup_in_package("java.lang", "List"), None);
    }

    #[test]
    fn test_every_supertype_is_known() {
        for (name, supers) in PLATFORM_TYPES.entries() {
            for s in supers.iter() {
                assert!(is_known(s), "{} lists unknown supertype {}", name, s);
            }
        }
    }
}
