use crate::domain::entities::RequestConfig;
use crate::domain::errors::RequesterError;
use crate::domain::value_objects::{Authorization, JsonBody};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use url::Url;

const DEFAULT_METHOD: &str = "GET";

lazy_static! {
    static ref METHOD_RE: Regex =
        Regex::new(r"(?:-X|--request)\s+(\w+)").expect("method pattern is valid");
    static ref URL_RE: Regex =
        Regex::new(r#"['"]?(https?://[^\s'"]+)['"]?"#).expect("url pattern is valid");
    static ref HEADER_RE: Regex = Regex::new(r#"(?:-H|--header)\s+['"]?([^:'"]+):\s*([^'"]+)['"]?"#)
        .expect("header pattern is valid");
    static ref DATA_RE: Regex = Regex::new(
        r#"(?:-d|--data(?:-raw|-binary)?)\s+(?:'([^']*)'|"((?:[^"\\]|\\.)*)")"#
    )
    .expect("data pattern is valid");
}

/// Turns the text of a saved curl command into a [`RequestConfig`].
///
/// This is a pattern search over the command, not a shell or curl grammar:
/// the first URL and the first body flag win, every header flag is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurlCommandParser;

impl CurlCommandParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> Result<RequestConfig, RequesterError> {
        let command = text.trim();
        if command.split_whitespace().next() != Some("curl") {
            return Err(RequesterError::NotACurlCommand);
        }

        let method = Self::method(command);
        let (uri, query) = Self::target(command)?;
        let (headers, authorization) = Self::headers(command);
        let body = Self::body(command)?;

        Ok(RequestConfig {
            method,
            uri,
            query,
            body,
            headers,
            authorization,
        })
    }

    fn method(command: &str) -> String {
        METHOD_RE
            .captures(command)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| DEFAULT_METHOD.to_string())
    }

    /// Splits the first URL into its query-less URI and raw query string.
    fn target(command: &str) -> Result<(String, Option<String>), RequesterError> {
        let raw = URL_RE
            .captures(command)
            .map(|caps| caps[1].to_string())
            .ok_or(RequesterError::UrlNotFound)?;

        Url::parse(&raw).map_err(|source| RequesterError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;

        Ok(Self::split_target(&raw))
    }

    /// Slices a validated URL as written: userinfo and fragment are dropped,
    /// everything else keeps its original spelling and encoding.
    fn split_target(raw: &str) -> (String, Option<String>) {
        let (scheme, rest) = raw.split_once("://").unwrap_or(("", raw));
        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        let (location, query) = match rest.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (rest, None),
        };
        let (authority, path) = location
            .find('/')
            .map_or((location, ""), |at| location.split_at(at));
        let host = authority
            .rsplit_once('@')
            .map_or(authority, |(_, host)| host);

        let uri = format!("{scheme}://{host}{path}");
        let query = query
            .filter(|query| !query.is_empty())
            .map(str::to_string);
        (uri, query)
    }

    fn headers(command: &str) -> (HashMap<String, String>, Option<Authorization>) {
        let mut headers = HashMap::new();
        let mut authorization = None;

        for caps in HEADER_RE.captures_iter(command) {
            let name = caps[1].trim().to_string();
            let value = caps[2].trim().to_string();
            if name.eq_ignore_ascii_case("authorization") {
                authorization = Authorization::from_header_value(&value);
            }
            headers.insert(name, value);
        }

        (headers, authorization)
    }

    fn body(command: &str) -> Result<Option<JsonBody>, RequesterError> {
        let Some(caps) = DATA_RE.captures(command) else {
            return Ok(None);
        };
        let payload = Self::quoted_payload(&caps);
        JsonBody::new(&payload).map(Some)
    }

    /// Single quotes are literal; double quotes honour `\"` and `\\`.
    fn quoted_payload(caps: &Captures<'_>) -> String {
        if let Some(single) = caps.get(1) {
            return single.as_str().to_string();
        }

        let raw = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let mut payload = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(next @ ('"' | '\\')) => payload.push(next),
                    Some(other) => {
                        payload.push('\\');
                        payload.push(other);
                    }
                    None => payload.push('\\'),
                },
                other => payload.push(other),
            }
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(text: &str) -> Result<RequestConfig, RequesterError> {
        CurlCommandParser::new().parse(text)
    }

    #[test]
    fn parses_full_post_command() {
        let config = parse(
            r#"curl -X POST -H "Authorization: Bearer abc123" -H "Content-Type: application/json" -d '{"a":1}' "https://api.example.com/v1/items?x=1""#,
        )
        .unwrap();

        assert_eq!(config.method, "POST");
        assert_eq!(config.uri, "https://api.example.com/v1/items");
        assert_eq!(config.query.as_deref(), Some("x=1"));
        assert_eq!(
            config.headers,
            HashMap::from([
                ("Authorization".to_string(), "Bearer abc123".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ])
        );
        assert_eq!(
            config.authorization,
            Some(Authorization {
                scheme: "Bearer".to_string(),
                credential: "abc123".to_string(),
            })
        );
        let body = config.body.unwrap();
        assert_eq!(serde_json::Value::Object(body.0), json!({"a": 1}));
    }

    #[test]
    fn defaults_to_get_without_method_flag() {
        let config = parse("curl https://example.com/health").unwrap();
        assert_eq!(config.method, "GET");
        assert_eq!(config.uri, "https://example.com/health");
        assert_eq!(config.query, None);
        assert_eq!(config.body, None);
        assert!(config.headers.is_empty());
        assert_eq!(config.authorization, None);
    }

    #[test]
    fn accepts_leading_whitespace_and_long_flags() {
        let config = parse(
            "\n  curl --request PUT --header 'X-Trace: 42' --data-raw '{\"b\":[1,2]}' 'http://localhost:8080/things/7'\n",
        )
        .unwrap();
        assert_eq!(config.method, "PUT");
        assert_eq!(config.uri, "http://localhost:8080/things/7");
        assert_eq!(config.headers.get("X-Trace").map(String::as_str), Some("42"));
        assert_eq!(
            serde_json::Value::Object(config.body.unwrap().0),
            json!({"b": [1, 2]})
        );
    }

    #[test]
    fn rejects_text_that_is_not_a_curl_command() {
        assert!(matches!(
            parse("wget https://example.com"),
            Err(RequesterError::NotACurlCommand)
        ));
        assert!(matches!(
            parse("curly https://example.com"),
            Err(RequesterError::NotACurlCommand)
        ));
        assert!(matches!(parse(""), Err(RequesterError::NotACurlCommand)));
    }

    #[test]
    fn fails_without_url() {
        assert!(matches!(
            parse("curl -X GET ftp://example.com/file"),
            Err(RequesterError::UrlNotFound)
        ));
    }

    #[test]
    fn fails_on_malformed_json_body() {
        assert!(matches!(
            parse("curl -d '{bad json' https://example.com"),
            Err(RequesterError::BodyParse(_))
        ));
    }

    #[test]
    fn unescapes_double_quoted_body() {
        let config = parse(r#"curl -d "{\"name\":\"a \\\"b\\\"\"}" https://example.com"#).unwrap();
        assert_eq!(
            serde_json::Value::Object(config.body.unwrap().0),
            json!({"name": "a \"b\""})
        );
    }

    #[test]
    fn first_body_flag_wins() {
        let config = parse(r#"curl -d '{"first":1}' -d '{"second":2}' https://example.com"#).unwrap();
        assert_eq!(
            serde_json::Value::Object(config.body.unwrap().0),
            json!({"first": 1})
        );
    }

    #[test]
    fn first_url_wins() {
        let config = parse("curl https://one.example.com/a https://two.example.com/b").unwrap();
        assert_eq!(config.uri, "https://one.example.com/a");
    }

    #[test]
    fn later_header_overwrites_earlier_one() {
        let config = parse(r#"curl -H "Accept: text/plain" -H "Accept: application/json" https://e.com"#)
            .unwrap();
        assert_eq!(config.headers.len(), 1);
        assert_eq!(config.headers["Accept"], "application/json");
    }

    #[test]
    fn malformed_authorization_is_kept_only_as_header() {
        let config = parse(r#"curl -H "authorization: token" https://e.com"#).unwrap();
        assert_eq!(config.authorization, None);
        assert_eq!(config.headers["authorization"], "token");
    }

    #[test]
    fn empty_query_is_dropped() {
        let config = parse("curl 'https://e.com/search?'").unwrap();
        assert_eq!(config.uri, "https://e.com/search");
        assert_eq!(config.query, None);
    }

    #[test]
    fn query_keeps_non_ascii_text_as_written() {
        let config = parse("curl 'https://e.com/s?q=café&x=<b>'").unwrap();
        assert_eq!(config.uri, "https://e.com/s");
        assert_eq!(config.query.as_deref(), Some("q=café&x=<b>"));
    }

    #[test]
    fn uri_keeps_host_port_and_path_as_written() {
        let config = parse("curl https://Example.com").unwrap();
        assert_eq!(config.uri, "https://Example.com");

        let config = parse("curl https://e.com:443/a/../b").unwrap();
        assert_eq!(config.uri, "https://e.com:443/a/../b");
    }

    #[test]
    fn uri_drops_userinfo_and_fragment() {
        let config = parse("curl 'https://user:pw@e.com/p#section?not=query'").unwrap();
        assert_eq!(config.uri, "https://e.com/p");
        assert_eq!(config.query, None);
    }

    #[test]
    fn fails_on_unparseable_url() {
        assert!(matches!(
            parse("curl https://e.com:99999/"),
            Err(RequesterError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn query_is_kept_verbatim() {
        let config = parse("curl 'https://e.com/search?q=a%20b&page=2#top'").unwrap();
        assert_eq!(config.query.as_deref(), Some("q=a%20b&page=2"));
        assert_eq!(config.effective_target(), "https://e.com/search?q=a%20b&page=2");
    }
}
