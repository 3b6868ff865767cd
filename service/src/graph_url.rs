//! Query-string rewriting for graph image URLs.
//!
//! Values are treated as already encoded: time tokens carry their own `%3A`
//! and are spliced in verbatim, so these helpers work on the raw string
//! instead of round-tripping through a URL parser.

/// Splits `url` into its base (up to `?`) and the `&`-separated parameters.
pub fn split(url: &str) -> (&str, Vec<&str>) {
    match url.split_once('?') {
        Some((base, query)) => (
            base,
            query.split('&').filter(|param| !param.is_empty()).collect(),
        ),
        None => (url, Vec::new()),
    }
}

fn param_name(param: &str) -> &str {
    param.split_once('=').map_or(param, |(name, _)| name)
}

/// Value of the first parameter called `name`, as written in the URL.
pub fn param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, params) = split(url);

    params
        .into_iter()
        .find(|param| param_name(param) == name)
        .map(|param| param.split_once('=').map_or("", |(_, value)| value))
}

/// Removes every parameter whose name is in `names`, keeping the others in order.
pub fn without_params(url: &str, names: &[&str]) -> String {
    let (base, params) = split(url);

    let kept: Vec<&str> = params
        .into_iter()
        .filter(|param| !names.contains(&param_name(param)))
        .collect();

    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}

/// Appends `name=value` pairs. Values must already be encoded by the caller.
pub fn append(url: &str, params: &[(&str, &str)]) -> String {
    let mut out = url.to_string();

    for (name, value) in params {
        if !out.contains('?') {
            out.push('?');
        } else if !out.ends_with('?') && !out.ends_with('&') {
            out.push('&');
        }
        out.push_str(name);
        out.push('=');
        out.push_str(value);
    }

    out
}

/// Replaces the `from`/`until` window of a graph URL, leaving every other
/// parameter verbatim and in its original relative order.
pub fn with_window(url: &str, from: &str, until: &str) -> String {
    append(
        &without_params(url, &["from", "until"]),
        &[("from", from), ("until", until)],
    )
}

/// Percent-encodes a value for use inside a query string.
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = "/render/?width=586&height=308&from=-1days&title_font_size=12&until=now&target=a.b";

    #[test]
    fn strips_named_params_and_keeps_order() {
        assert_eq!(
            without_params(GRAPH, &["from", "until"]),
            "/render/?width=586&height=308&title_font_size=12&target=a.b"
        );
    }

    #[test]
    fn stripping_everything_drops_the_question_mark() {
        assert_eq!(without_params("/render?from=-1days", &["from"]), "/render");
    }

    #[test]
    fn append_handles_missing_and_trailing_separators() {
        assert_eq!(append("/render", &[("a", "1")]), "/render?a=1");
        assert_eq!(append("/render?", &[("a", "1")]), "/render?a=1");
        assert_eq!(append("/render?x=0&", &[("a", "1")]), "/render?x=0&a=1");
        assert_eq!(
            append("/render?x=0", &[("a", "1"), ("b", "2")]),
            "/render?x=0&a=1&b=2"
        );
    }

    #[test]
    fn window_rewrite_preserves_other_params() {
        let url = with_window(GRAPH, "12%3A30_20240105", "14%3A00_20240105");

        assert_eq!(
            url,
            "/render/?width=586&height=308&title_font_size=12&target=a.b\
             &from=12%3A30_20240105&until=14%3A00_20240105"
        );
        assert_eq!(param(&url, "from"), Some("12%3A30_20240105"));
        assert_eq!(param(&url, "width"), Some("586"));
    }

    #[test]
    fn param_lookup() {
        assert_eq!(param(GRAPH, "until"), Some("now"));
        assert_eq!(param(GRAPH, "missing"), None);
        assert_eq!(param("/render?flag", "flag"), Some(""));
    }

    #[test]
    fn encode_escapes_reserved_characters() {
        assert_eq!(encode("sum(a.*.b)"), "sum%28a.*.b%29");
        assert_eq!(encode("deploy release"), "deploy+release");
    }
}
