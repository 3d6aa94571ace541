use axum::http::{HeaderMap, HeaderName};

/// Headers copied from an incoming request onto the upstream call so the mesh proxies and
/// tracers can stitch both hops into one trace.
///
/// Names are stored lower-case, which is how `HeaderName` normalises them, so lookups are
/// case-insensitive.
pub static TRACE_HEADERS_TO_PROPAGATE: [HeaderName; 8] = [
    HeaderName::from_static("x-ot-span-context"),
    HeaderName::from_static("x-request-id"),
    // Zipkin
    HeaderName::from_static("x-b3-traceid"),
    HeaderName::from_static("x-b3-spanid"),
    HeaderName::from_static("x-b3-parentspanid"),
    HeaderName::from_static("x-b3-sampled"),
    HeaderName::from_static("x-b3-flags"),
    // Jaeger native client
    HeaderName::from_static("uber-trace-id"),
];

/// Copy the whitelisted trace headers present on `incoming` into a new header map.
///
/// Each value is copied unchanged. A header repeated on the incoming request stays repeated:
/// every value goes out as its own header line, in order, rather than being folded into one
/// comma-separated line. Anything not on the whitelist is left behind.
pub fn forward_trace_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::new();
    for name in &TRACE_HEADERS_TO_PROPAGATE {
        for value in incoming.get_all(name) {
            forwarded.append(name.clone(), value.clone());
        }
    }
    forwarded
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    #[test]
    fn only_whitelisted_headers_are_forwarded() {
        let incoming = headers(&[
            ("X-B3-TraceId", "abc123"),
            ("X-Custom-Foo", "ignored"),
            ("accept", "*/*"),
        ]);

        let forwarded = forward_trace_headers(&incoming);

        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded["x-b3-traceid"], "abc123");
        assert!(forwarded.get("x-custom-foo").is_none());
    }

    #[test]
    fn lookup_ignores_header_name_case() {
        let incoming = headers(&[("X-REQUEST-ID", "req-1"), ("Uber-Trace-Id", "a:b:c:1")]);

        let forwarded = forward_trace_headers(&incoming);

        assert_eq!(forwarded.get("x-request-id").unwrap(), "req-1");
        assert_eq!(forwarded.get("UBER-TRACE-ID").unwrap(), "a:b:c:1");
    }

    #[test]
    fn values_are_kept_verbatim() {
        let incoming = headers(&[("x-ot-span-context", "  Mixed;Case=1 ")]);

        let forwarded = forward_trace_headers(&incoming);

        assert_eq!(forwarded["x-ot-span-context"], "  Mixed;Case=1 ");
    }

    #[test]
    fn repeated_headers_keep_every_value() {
        let incoming = headers(&[("x-b3-flags", "1"), ("x-b3-flags", "0")]);

        let forwarded = forward_trace_headers(&incoming);

        let values: Vec<_> = forwarded.get_all("x-b3-flags").iter().collect();
        assert_eq!(values, ["1", "0"]);
    }

    #[test]
    fn nothing_to_forward_yields_empty_map() {
        let forwarded = forward_trace_headers(&headers(&[("content-type", "text/plain")]));
        assert!(forwarded.is_empty());
    }

    #[test]
    fn whitelist_covers_zipkin_jaeger_and_envoy_headers() {
        let names: Vec<&str> = TRACE_HEADERS_TO_PROPAGATE.iter().map(HeaderName::as_str).collect();
        assert_eq!(
            names,
            [
                "x-ot-span-context",
                "x-request-id",
                "x-b3-traceid",
                "x-b3-spanid",
                "x-b3-parentspanid",
                "x-b3-sampled",
                "x-b3-flags",
                "uber-trace-id",
            ]
        );
    }
}
