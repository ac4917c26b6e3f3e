//! Offline guarantees for assembled documents.
//!
//! A document must render with no network access, so anything that would
//! make the browser fetch a remote resource is an error. The scan looks for
//! `src`/`href` assignments, CSS `url(...)` and `@import`, and script calls
//! that load by URL (`fetch`, dynamic `import`, workers, `importScripts`,
//! `EventSource`, `WebSocket`, `sendBeacon`, `open`), whose target is an
//! absolute `http(s)://`/`ws(s)://` or protocol-relative `//` URL.
//!
//! Only markup and code are scanned. Embedded scene data (structure text,
//! property values) is inert and is inserted after the scan.

use crate::error::SceneError;

/// Calls whose first argument is fetched.
const LOADING_CALLS: [&str; 8] = [
    "fetch(",
    "import(",
    "worker(",
    "sharedworker(",
    "importscripts(",
    "eventsource(",
    "websocket(",
    "sendbeacon(",
];

/// Every external reference in `text`, in document order.
#[must_use]
pub fn external_references(text: &str) -> Vec<String> {
    let lower = text.to_ascii_lowercase();
    let mut found = Vec::new();

    for keyword in ["src", "href"] {
        for (pos, _) in lower.match_indices(keyword) {
            if !at_word_start(&lower, pos) {
                continue;
            }
            let rest = lower[pos + keyword.len()..].trim_start();
            let Some(value) = rest.strip_prefix('=') else {
                continue;
            };
            if let Some(url) = remote_target(text, &lower, value) {
                found.push((pos, url));
            }
        }
    }
    for keyword in ["url(", "@import"] {
        for (pos, _) in lower.match_indices(keyword) {
            let rest = &lower[pos + keyword.len()..];
            let rest = rest.trim_start();
            let rest = rest.strip_prefix("url(").unwrap_or(rest);
            if let Some(url) = remote_target(text, &lower, rest) {
                found.push((pos, url));
            }
        }
    }
    for keyword in LOADING_CALLS {
        for (pos, _) in lower.match_indices(keyword) {
            if !at_word_start(&lower, pos) {
                continue;
            }
            if let Some(url) = remote_target(text, &lower, &lower[pos + keyword.len()..]) {
                found.push((pos, url));
            }
        }
    }
    // `window.open(url)` and `xhr.open(method, url)`
    for (pos, _) in lower.match_indices(".open(") {
        let args = &lower[pos + ".open(".len()..];
        let url = remote_target(text, &lower, args).or_else(|| {
            second_argument(args).and_then(|a| remote_target(text, &lower, a))
        });
        if let Some(url) = url {
            found.push((pos, url));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    // `@import url(...)` is seen by both keywords
    found.dedup_by(|a, b| a.1 == b.1);
    found.into_iter().map(|(_, url)| url).collect()
}

/// Fail with [`SceneError::ExternalReference`] on the first external
/// reference in `text`.
pub fn ensure_offline(text: &str) -> Result<(), SceneError> {
    match external_references(text).into_iter().next() {
        Some(url) => Err(SceneError::ExternalReference(url)),
        None => Ok(()),
    }
}

/// Suffix of `args` after the first top-level comma of a call's argument
/// list, if the call has one.
fn second_argument(args: &str) -> Option<&str> {
    let end = args.find(')').unwrap_or(args.len());
    let comma = args[..end].find(',')?;
    Some(&args[comma + 1..])
}

/// `true` when the keyword at `pos` is not the tail of a longer identifier.
fn at_word_start(lower: &str, pos: usize) -> bool {
    lower[..pos]
        .chars()
        .next_back()
        .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
}

/// If `rest` (a suffix of `lower`) starts with an optionally quoted remote
/// URL, return it with its original casing.
fn remote_target(text: &str, lower: &str, rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let unquoted = rest
        .strip_prefix(['"', '\'', '`'])
        .or_else(|| rest.strip_prefix("&quot;"))
        .or_else(|| rest.strip_prefix("&#39;"))
        .unwrap_or(rest)
        .trim_start();
    if !["http://", "https://", "ws://", "wss://", "//"]
        .iter()
        .any(|scheme| unquoted.starts_with(scheme))
    {
        return None;
    }
    let start = lower.len() - unquoted.len();
    let end = unquoted
        .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | ')' | '>' | '<' | '&'))
        .map_or(lower.len(), |n| start + n);
    Some(text[start..end].to_owned())
}

/// Make `source` safe to inline in a `<script>` element by breaking up any
/// `</script` sequence. Harmless inside JS strings and regexes.
#[must_use]
pub fn neutralize_script(source: &str) -> String {
    let lower = source.to_ascii_lowercase();
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for (pos, _) in lower.match_indices("</script") {
        out.push_str(&source[last..pos]);
        out.push_str("<\\/");
        last = pos + 2;
    }
    out.push_str(&source[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_remote_attributes_and_css() {
        let doc = r#"<script src="https://cdn.example.org/3Dmol.js"></script>
<link href='//fonts.example.org/x.css'>
<style>@import "http://a.example/b.css"; .x { background: url(https://img.example/p.png) }</style>
<script>img.src = "HTTPS://Mixed.Case/y.png";</script>"#;
        assert_eq!(
            external_references(doc),
            vec![
                "https://cdn.example.org/3Dmol.js",
                "//fonts.example.org/x.css",
                "http://a.example/b.css",
                "https://img.example/p.png",
                "HTTPS://Mixed.Case/y.png",
            ]
        );
    }

    #[test]
    fn local_references_are_fine() {
        let doc = r##"<a href="#top">top</a><img src="data:image/png;base64,AAAA">
<script>var u = "https://example.org"; link.href = viewer.pngURI();</script>
<div style="background: url(data:image/svg+xml,abc)"></div>"##;
        assert!(external_references(doc).is_empty());
    }

    #[test]
    fn escaped_srcdoc_attributes_are_scanned() {
        let doc = r#"<iframe srcdoc="&lt;img src=&quot;https://x.example/a.png&quot;&gt;"></iframe>"#;
        assert_eq!(external_references(doc), vec!["https://x.example/a.png"]);
    }

    #[test]
    fn finds_script_loads_by_url() {
        let js = r#"fetch("https://cdn.example.org/payload.js");
const m = await import('https://esm.example/mod.js');
new Worker(`//workers.example/w.js`);
self.importScripts("http://a.example/s.js");
xhr.open("GET", "https://api.example/data");
window.open("https://popup.example/");
new WebSocket("wss://live.example/socket");"#;
        assert_eq!(
            external_references(js),
            vec![
                "https://cdn.example.org/payload.js",
                "https://esm.example/mod.js",
                "//workers.example/w.js",
                "http://a.example/s.js",
                "https://api.example/data",
                "https://popup.example/",
                "wss://live.example/socket",
            ]
        );
        assert!(matches!(
            ensure_offline(js),
            Err(SceneError::ExternalReference(url)) if url == "https://cdn.example.org/payload.js"
        ));
    }

    #[test]
    fn local_loads_are_fine() {
        let js = r#"fetch(dataUri); import("./local.js"); xhr.open("GET", path);
prefetch("https://x.example"); reopen("https://y.example");"#;
        // `prefetch(`/`reopen(` are not loading calls
        assert_eq!(external_references(js), Vec::<String>::new());
        assert!(ensure_offline(js).is_ok());
    }

    #[test]
    fn closing_script_tags_are_broken_up() {
        let js = r#"var s = "</script><b>"; var t = "</SCRIPT >";"#;
        let safe = neutralize_script(js);
        assert!(!safe.to_ascii_lowercase().contains("</script"));
        assert_eq!(safe, r#"var s = "<\/script><b>"; var t = "<\/SCRIPT >";"#);
    }
}
