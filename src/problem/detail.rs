use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

use crate::status;

/// Problem type used when a problem has no more specific type (RFC 9457 §4.2.1)
pub const BLANK_TYPE: &str = "about:blank";

/// Standard members; extension properties may not reuse these names
pub const RESERVED_MEMBERS: [&str; 5] = ["type", "title", "status", "detail", "instance"];

fn blank_type() -> String {
    BLANK_TYPE.to_string()
}

/// RFC 9457 problem details body
///
/// The standard members are kept behind accessors so that an error value can hand out
/// `&mut ProblemDetail` without exposing layout. Anything non-standard goes into the
/// extension `properties`, which are serialized flat next to the standard members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetail {
    #[serde(rename = "type", default = "blank_type")]
    problem_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(default)]
    status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    instance: Option<String>,

    #[serde(flatten)]
    properties: Map<String, Value>,
}

impl ProblemDetail {
    /// Bare problem with only a status. Type is `about:blank`, title is left unset.
    pub fn new(status: u16) -> Self {
        Self {
            problem_type: blank_type(),
            title: None,
            status,
            detail: None,
            instance: None,
            properties: Map::new(),
        }
    }

    /// Problem for a well-known status, titled with its reason phrase
    pub fn for_status(status: StatusCode) -> Self {
        Self::for_raw_status_code(status.as_u16())
    }

    /// Problem for any status code
    ///
    /// The title is only filled in when the code resolves to a registered reason phrase;
    /// for non-standard codes it stays unset instead of being made up.
    pub fn for_raw_status_code(status: u16) -> Self {
        let mut problem = Self::new(status);
        problem.title = status::reason_phrase(status).map(str::to_string);
        problem
    }

    pub fn for_status_and_detail(status: StatusCode, detail: impl Into<String>) -> Self {
        let mut problem = Self::for_status(status);
        problem.detail = Some(detail.into());
        problem
    }

    pub fn problem_type(&self) -> &str {
        &self.problem_type
    }

    pub fn set_type(&mut self, problem_type: impl Into<String>) {
        self.problem_type = problem_type.into();
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn set_detail(&mut self, detail: Option<String>) {
        self.detail = detail;
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    pub fn set_instance(&mut self, instance: Option<String>) {
        self.instance = instance;
    }

    /// Fill `instance` from request context, leaving an explicitly set value alone.
    ///
    /// Returns whether the instance was filled in.
    pub fn set_instance_if_absent(&mut self, instance: impl Into<String>) -> bool {
        if self.instance.is_some() {
            return false;
        }
        self.instance = Some(instance.into());
        true
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Add or replace an extension member
    ///
    /// Names of standard members are refused, since the flattened property would sit
    /// next to the real member on the wire. Returns whether the property was stored.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let name = name.into();
        if RESERVED_MEMBERS.contains(&name.as_str()) {
            warn!(
                property = %name,
                "Ignoring extension property that shadows a standard problem member"
            );
            return false;
        }
        self.properties.insert(name, value.into());
        true
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn with_type(mut self, problem_type: impl Into<String>) -> Self {
        self.set_type(problem_type);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(name, value);
        self
    }
}

impl fmt::Display for ProblemDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProblemDetail[type='{}'", self.problem_type)?;
        if let Some(title) = &self.title {
            write!(f, ", title='{}'", title)?;
        }
        write!(f, ", status={}", self.status)?;
        if let Some(detail) = &self.detail {
            write!(f, ", detail='{}'", detail)?;
        }
        if let Some(instance) = &self.instance {
            write!(f, ", instance='{}'", instance)?;
        }
        if !self.properties.is_empty() {
            if let Ok(properties) = serde_json::to_string(&self.properties) {
                write!(f, ", properties={}", properties)?;
            }
        }
        write!(f, "]")
    }
}
