use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        }
    }

    pub fn next(&self) -> HttpMethod {
        match self {
            HttpMethod::GET => HttpMethod::POST,
            HttpMethod::POST => HttpMethod::PUT,
            HttpMethod::PUT => HttpMethod::PATCH,
            HttpMethod::PATCH => HttpMethod::DELETE,
            HttpMethod::DELETE => HttpMethod::GET,
        }
    }

    /// Only GET requests go out without a body editor
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::GET)
    }
}

/// URL scheme. Unspecified schemes resolve to https.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn parse(s: &str) -> Option<Scheme> {
        match s {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            _ => None,
        }
    }
}

/// Request payload. Exactly one variant is active per request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestBody {
    /// No payload (GET, or an empty editor)
    Empty,
    /// Raw text payload
    Text(String),
    /// Key/value form fields, urlencoded on the wire
    Form(Vec<(String, String)>),
    /// Payload read from a local file at execution time
    File(PathBuf),
}

/// An immutable description of one HTTP call to issue.
///
/// Built by the request draft at send or save time and never mutated
/// afterwards; the executor, history and collections all consume it as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub scheme: Scheme,
    /// Authority and path, concatenated. No query-string special-casing.
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
    /// Auxiliary metadata attached at build time (e.g. active environment).
    /// Never transmitted.
    pub context: HashMap<String, String>,
    pub date: chrono::NaiveDate,
}

impl RequestSpec {
    /// Full URL handed to the transport
    pub fn url(&self) -> String {
        format!("{}://{}", self.scheme.as_str(), self.target)
    }

    /// Short display form used in history and completion lists
    pub fn label(&self) -> String {
        format!("{} {}", self.method.as_str(), self.target)
    }
}

/// Response from an HTTP request. Pass-through data: nothing here is
/// validated beyond what the transport already did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub elapsed: Duration,
}

impl ResponseData {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }
}

/// History entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub request: RequestSpec,
    pub response: ResponseData,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A named set of saved requests
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub requests: Vec<RequestSpec>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Collection {
            name: name.into(),
            requests: Vec::new(),
        }
    }
}

/// Environment variables
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub variables: HashMap<String, String>,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Environment {
            name: name.into(),
            variables: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.variables.get(key)
    }

    /// Substitutes {{variable}} patterns in text
    pub fn substitute(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (key, value) in &self.variables {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_cycle_covers_all() {
        let mut m = HttpMethod::GET;
        for _ in 0..5 {
            m = m.next();
        }
        assert_eq!(m, HttpMethod::GET);
    }

    #[test]
    fn test_only_get_has_no_body() {
        assert!(!HttpMethod::GET.has_body());
        assert!(HttpMethod::POST.has_body());
        assert!(HttpMethod::DELETE.has_body());
    }

    #[test]
    fn test_scheme_defaults_to_https() {
        assert_eq!(Scheme::default(), Scheme::Https);
        assert_eq!(Scheme::parse("http"), Some(Scheme::Http));
        assert_eq!(Scheme::parse("ftp"), None);
    }

    #[test]
    fn test_url_and_label() {
        let spec = RequestSpec {
            method: HttpMethod::GET,
            scheme: Scheme::Https,
            target: String::from("api.example.com/users"),
            headers: HashMap::new(),
            body: RequestBody::Empty,
            context: HashMap::new(),
            date: chrono::Utc::now().date_naive(),
        };
        assert_eq!(spec.url(), "https://api.example.com/users");
        assert_eq!(spec.label(), "GET api.example.com/users");
    }

    #[test]
    fn test_content_type_lookup_is_case_insensitive() {
        let resp = ResponseData {
            status: 200,
            headers: vec![(String::from("CONTENT-TYPE"), String::from("application/json"))],
            body: String::new(),
            elapsed: Duration::from_millis(5),
        };
        assert_eq!(resp.content_type(), Some("application/json"));
    }

    #[test]
    fn test_environment_substitution() {
        let mut env = Environment::new("staging");
        env.set("host", "staging.example.com");
        assert_eq!(
            env.substitute("https://{{host}}/users"),
            "https://staging.example.com/users"
        );
        assert_eq!(env.substitute("no variables"), "no variables");
    }
}
