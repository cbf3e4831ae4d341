//! Splits a decoded payload into its URL parts.

use crate::error::Result;
use common::model::parsed_url::ParsedUrl;
use std::collections::HashMap;
use url::Url;

/// Parses a decoded payload string into protocol, host, path and query
/// parameters. Fails with `MalformedUrl` when the input is not a
/// well-formed URL.
///
/// The query string is split on `&` and the first `=` only; a parameter
/// without `=` yields an empty value. Percent-escapes are passed through
/// untouched so the caller sees the exact bytes that were encoded.
pub fn parse(raw: &str) -> Result<ParsedUrl> {
    let parsed = Url::parse(raw)?;

    let mut query_params = HashMap::new();
    if let Some(query) = parsed.query() {
        for pair in query.split('&') {
            if pair.is_empty() {
                continue;
            }
            let mut halves = pair.splitn(2, '=');
            let key = halves.next().unwrap_or_default();
            let value = halves.next().unwrap_or("");
            query_params.insert(key.to_string(), value.to_string());
        }
    }

    Ok(ParsedUrl {
        full_url: raw.to_string(),
        protocol: parsed.scheme().to_string(),
        host: parsed.host_str().unwrap_or_default().to_string(),
        path: parsed.path().to_string(),
        query_params,
    })
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::error::Error;

    #[test]
    fn splits_protocol_host_path_and_query() {
        let parsed = parse("https://h/p?a=1&b").unwrap();
        assert_eq!(parsed.protocol, "https");
        assert_eq!(parsed.host, "h");
        assert_eq!(parsed.path, "/p");
        assert_eq!(parsed.query_params.len(), 2);
        assert_eq!(parsed.query_params["a"], "1");
        assert_eq!(parsed.query_params["b"], "");
    }

    #[test]
    fn url_without_query_yields_empty_map() {
        let parsed = parse("https://example.com/some/path").unwrap();
        assert_eq!(parsed.path, "/some/path");
        assert!(parsed.query_params.is_empty());
    }

    #[test]
    fn percent_escapes_are_not_decoded() {
        let parsed = parse("https://h/p?name=a%20b").unwrap();
        assert_eq!(parsed.query_params["name"], "a%20b");
    }

    #[test]
    fn issued_payload_parses_back_to_its_parameters() {
        let parsed = parse(
            "https://ex.com?apiKey=k1&id=0&isScanned=false&startDate=20250101&endDate=20260101",
        )
        .unwrap();
        assert_eq!(parsed.host, "ex.com");
        assert_eq!(parsed.query_params["apiKey"], "k1");
        assert_eq!(parsed.query_params["id"], "0");
        assert_eq!(parsed.query_params["isScanned"], "false");
        assert_eq!(parsed.query_params["startDate"], "20250101");
        assert_eq!(parsed.query_params["endDate"], "20260101");
    }

    #[test]
    fn garbage_is_a_malformed_url() {
        assert!(matches!(parse("not a url"), Err(Error::MalformedUrl(_))));
    }
}
