//! Request builder - mutable form state that freezes into a `RequestSpec`
//!
//! The draft is what the panels edit. `build` runs at send or save time:
//! it substitutes environment variables, parses the URL into scheme and
//! target, collects the enabled header rows and the active body editor,
//! and hands back an immutable spec. Validation failures surface here,
//! synchronously, before any network activity.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::DEFAULT_URL;
use crate::models::{Environment, HttpMethod, RequestBody, RequestSpec, Scheme};

/// A malformed draft, rejected before execution starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequest {
    #[error("request target is empty")]
    EmptyTarget,
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// One editable header row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderField {
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

impl HeaderField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        HeaderField {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }
}

/// Which body editor is active. Exactly one feeds the built request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BodyMode {
    #[default]
    Text,
    Form,
    File,
}

impl BodyMode {
    pub fn as_str(&self) -> &str {
        match self {
            BodyMode::Text => "Text",
            BodyMode::Form => "Form",
            BodyMode::File => "File",
        }
    }

    pub fn next(&self) -> BodyMode {
        match self {
            BodyMode::Text => BodyMode::Form,
            BodyMode::Form => BodyMode::File,
            BodyMode::File => BodyMode::Text,
        }
    }
}

/// Content type variants for the raw text editor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RawType {
    Plain,
    #[default]
    Json,
    Xml,
}

impl RawType {
    pub fn as_str(&self) -> &str {
        match self {
            RawType::Plain => "Text",
            RawType::Json => "JSON",
            RawType::Xml => "XML",
        }
    }

    pub fn next(&self) -> RawType {
        match self {
            RawType::Plain => RawType::Json,
            RawType::Json => RawType::Xml,
            RawType::Xml => RawType::Plain,
        }
    }

    fn content_type(&self) -> Option<&'static str> {
        match self {
            RawType::Plain => None,
            RawType::Json => Some("application/json"),
            RawType::Xml => Some("application/xml"),
        }
    }
}

/// Mutable request form state
#[derive(Clone, Debug)]
pub struct RequestDraft {
    pub method: HttpMethod,
    /// URL as typed, scheme optional
    pub url: String,
    pub headers: Vec<HeaderField>,
    pub body_mode: BodyMode,
    pub raw_type: RawType,
    /// Raw text body buffer
    pub body_text: String,
    /// Form body buffer, one `key=value` field per line
    pub form_text: String,
    /// Path of the file payload
    pub file_path: String,
}

impl Default for RequestDraft {
    fn default() -> Self {
        RequestDraft {
            method: HttpMethod::GET,
            url: String::from(DEFAULT_URL),
            headers: vec![
                HeaderField::new("Content-Type", "application/json"),
                HeaderField::new("Accept", "application/json"),
            ],
            body_mode: BodyMode::Text,
            raw_type: RawType::Json,
            body_text: String::new(),
            form_text: String::new(),
            file_path: String::new(),
        }
    }
}

impl RequestDraft {
    /// Freeze the draft into an immutable spec.
    ///
    /// Environment substitution happens here so the executor never
    /// consults the environment; the active environment's name travels in
    /// the spec's opaque context instead.
    pub fn build(&self, environment: Option<&Environment>) -> Result<RequestSpec, InvalidRequest> {
        let subst = |text: &str| match environment {
            Some(env) => env.substitute(text),
            None => text.to_string(),
        };

        let (scheme, target) = parse_url(&subst(&self.url))?;

        let mut headers = HashMap::new();
        for field in &self.headers {
            if field.enabled && !field.key.is_empty() && !field.value.is_empty() {
                headers.insert(field.key.clone(), subst(&field.value));
            }
        }

        let body = if self.method.has_body() {
            match self.body_mode {
                BodyMode::Text => {
                    let text = subst(&self.body_text);
                    if text.is_empty() {
                        RequestBody::Empty
                    } else {
                        RequestBody::Text(text)
                    }
                }
                BodyMode::Form => {
                    let fields = parse_form_fields(&self.form_text, &subst);
                    if fields.is_empty() {
                        RequestBody::Empty
                    } else {
                        RequestBody::Form(fields)
                    }
                }
                BodyMode::File => {
                    let path = self.file_path.trim();
                    if path.is_empty() {
                        RequestBody::Empty
                    } else {
                        RequestBody::File(PathBuf::from(path))
                    }
                }
            }
        } else {
            RequestBody::Empty
        };

        let mut context = HashMap::new();
        if let Some(env) = environment {
            context.insert(String::from("environment"), env.name.clone());
        }

        Ok(RequestSpec {
            method: self.method,
            scheme,
            target,
            headers,
            body,
            context,
            date: chrono::Local::now().date_naive(),
        })
    }

    /// Find-or-insert the Content-Type header row. Key match is exact,
    /// as entered.
    pub fn set_content_type(&mut self, value: &str) {
        match self.headers.iter_mut().find(|h| h.key == "Content-Type") {
            Some(field) => {
                field.value = value.to_string();
                field.enabled = true;
            }
            None => self.headers.push(HeaderField::new("Content-Type", value)),
        }
    }

    /// Switch body editors, keeping the Content-Type header in step
    pub fn switch_body_mode(&mut self) {
        self.body_mode = self.body_mode.next();
        match self.body_mode {
            BodyMode::Form => self.set_content_type("application/x-www-form-urlencoded"),
            BodyMode::File => self.set_content_type("application/octet-stream"),
            BodyMode::Text => {
                if let Some(ct) = self.raw_type.content_type() {
                    self.set_content_type(ct);
                }
            }
        }
    }

    /// Cycle the raw text content type. Only meaningful in Text mode.
    pub fn cycle_raw_type(&mut self) {
        self.raw_type = self.raw_type.next();
        if let Some(ct) = self.raw_type.content_type() {
            self.set_content_type(ct);
        }
    }

    /// Buffer the active body editor writes into
    pub fn active_body_buffer(&self) -> &str {
        match self.body_mode {
            BodyMode::Text => &self.body_text,
            BodyMode::Form => &self.form_text,
            BodyMode::File => &self.file_path,
        }
    }

    pub fn active_body_buffer_mut(&mut self) -> &mut String {
        match self.body_mode {
            BodyMode::Text => &mut self.body_text,
            BodyMode::Form => &mut self.form_text,
            BodyMode::File => &mut self.file_path,
        }
    }

    /// Populate the form from a previously built spec (history or
    /// collection restore)
    pub fn restore_from(&mut self, spec: &RequestSpec) {
        self.method = spec.method;
        self.url = spec.url();
        self.headers = spec
            .headers
            .iter()
            .map(|(k, v)| HeaderField::new(k.clone(), v.clone()))
            .collect();
        match &spec.body {
            RequestBody::Empty => {
                self.body_mode = BodyMode::Text;
                self.body_text.clear();
            }
            RequestBody::Text(text) => {
                self.body_mode = BodyMode::Text;
                self.body_text = text.clone();
            }
            RequestBody::Form(fields) => {
                self.body_mode = BodyMode::Form;
                self.form_text = fields
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join("\n");
            }
            RequestBody::File(path) => {
                self.body_mode = BodyMode::File;
                self.file_path = path.to_string_lossy().to_string();
            }
        }
    }
}

/// Split a typed URL into scheme and target. A missing scheme means https.
fn parse_url(input: &str) -> Result<(Scheme, String), InvalidRequest> {
    let input = input.trim();
    let (scheme, rest) = match input.split_once("://") {
        Some((prefix, rest)) => {
            let scheme =
                Scheme::parse(prefix).ok_or_else(|| InvalidRequest::UnsupportedScheme(prefix.to_string()))?;
            (scheme, rest)
        }
        None => (Scheme::default(), input),
    };

    if rest.is_empty() {
        return Err(InvalidRequest::EmptyTarget);
    }
    Ok((scheme, rest.to_string()))
}

/// `key=value` fields separated by newlines or semicolons; pieces
/// without a separator are ignored
fn parse_form_fields(text: &str, subst: &impl Fn(&str) -> String) -> Vec<(String, String)> {
    text.split(['\n', ';'])
        .filter_map(|field| field.split_once('='))
        .filter(|(k, _)| !k.trim().is_empty())
        .map(|(k, v)| (k.trim().to_string(), subst(v.trim())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults_scheme_to_https() {
        let draft = RequestDraft {
            url: String::from("api.example.com/users"),
            ..Default::default()
        };
        let spec = draft.build(None).unwrap();
        assert_eq!(spec.scheme, Scheme::Https);
        assert_eq!(spec.target, "api.example.com/users");
        assert_eq!(spec.url(), "https://api.example.com/users");
    }

    #[test]
    fn test_build_keeps_explicit_http() {
        let draft = RequestDraft {
            url: String::from("http://localhost:8000/health"),
            ..Default::default()
        };
        let spec = draft.build(None).unwrap();
        assert_eq!(spec.scheme, Scheme::Http);
        assert_eq!(spec.target, "localhost:8000/health");
    }

    #[test]
    fn test_build_rejects_empty_target() {
        let mut draft = RequestDraft::default();
        draft.url = String::from("   ");
        assert_eq!(draft.build(None), Err(InvalidRequest::EmptyTarget));
        draft.url = String::from("https://");
        assert_eq!(draft.build(None), Err(InvalidRequest::EmptyTarget));
    }

    #[test]
    fn test_build_rejects_unknown_scheme() {
        let draft = RequestDraft {
            url: String::from("ftp://example.com/file"),
            ..Default::default()
        };
        assert_eq!(
            draft.build(None),
            Err(InvalidRequest::UnsupportedScheme(String::from("ftp")))
        );
    }

    #[test]
    fn test_build_skips_disabled_and_incomplete_headers() {
        let mut draft = RequestDraft::default();
        draft.headers = vec![
            HeaderField::new("Accept", "application/json"),
            HeaderField {
                key: String::from("X-Off"),
                value: String::from("1"),
                enabled: false,
            },
            HeaderField::new("X-Empty", ""),
        ];
        let spec = draft.build(None).unwrap();
        assert_eq!(spec.headers.len(), 1);
        assert_eq!(spec.headers.get("Accept").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn test_build_substitutes_environment_at_build_time() {
        let mut env = Environment::new("staging");
        env.set("host", "staging.example.com");
        env.set("token", "t-123");

        let mut draft = RequestDraft::default();
        draft.method = HttpMethod::POST;
        draft.url = String::from("{{host}}/login");
        draft.headers = vec![HeaderField::new("X-Token", "{{token}}")];
        draft.body_text = String::from(r#"{"host":"{{host}}"}"#);

        let spec = draft.build(Some(&env)).unwrap();
        assert_eq!(spec.target, "staging.example.com/login");
        assert_eq!(spec.headers.get("X-Token").map(String::as_str), Some("t-123"));
        assert_eq!(
            spec.body,
            RequestBody::Text(String::from(r#"{"host":"staging.example.com"}"#))
        );
        assert_eq!(spec.context.get("environment").map(String::as_str), Some("staging"));
    }

    #[test]
    fn test_build_parses_form_fields() {
        let mut draft = RequestDraft::default();
        draft.method = HttpMethod::POST;
        draft.body_mode = BodyMode::Form;
        draft.form_text = String::from("name=ada; role=admin\nnot a field\n");
        let spec = draft.build(None).unwrap();
        assert_eq!(
            spec.body,
            RequestBody::Form(vec![
                (String::from("name"), String::from("ada")),
                (String::from("role"), String::from("admin")),
            ])
        );
    }

    #[test]
    fn test_get_request_drops_body() {
        let mut draft = RequestDraft::default();
        draft.body_text = String::from("ignored");
        let spec = draft.build(None).unwrap();
        assert_eq!(spec.body, RequestBody::Empty);
    }

    #[test]
    fn test_set_content_type_upserts() {
        let mut draft = RequestDraft::default();
        draft.set_content_type("application/xml");
        assert_eq!(
            draft
                .headers
                .iter()
                .filter(|h| h.key == "Content-Type")
                .count(),
            1
        );
        assert_eq!(draft.headers[0].value, "application/xml");

        draft.headers.clear();
        draft.set_content_type("text/plain");
        assert_eq!(draft.headers.len(), 1);
        assert_eq!(draft.headers[0].key, "Content-Type");
    }

    #[test]
    fn test_switch_body_mode_tracks_content_type() {
        let mut draft = RequestDraft::default();
        draft.switch_body_mode();
        assert_eq!(draft.body_mode, BodyMode::Form);
        assert_eq!(draft.headers[0].value, "application/x-www-form-urlencoded");
        draft.switch_body_mode();
        assert_eq!(draft.body_mode, BodyMode::File);
        assert_eq!(draft.headers[0].value, "application/octet-stream");
    }

    #[test]
    fn test_restore_from_spec_round_trips_fields() {
        let mut draft = RequestDraft::default();
        draft.method = HttpMethod::PUT;
        draft.url = String::from("http://example.com/items/1");
        draft.body_text = String::from(r#"{"a":1}"#);
        let spec = draft.build(None).unwrap();

        let mut restored = RequestDraft::default();
        restored.restore_from(&spec);
        assert_eq!(restored.method, HttpMethod::PUT);
        assert_eq!(restored.url, "http://example.com/items/1");
        assert_eq!(restored.body_text, r#"{"a":1}"#);
        assert!(restored.headers.iter().any(|h| h.key == "Content-Type"));
    }
}
