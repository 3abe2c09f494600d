//! Contract models for tenant settings
//!
//! These models are storage-agnostic. Backends map them onto their own
//! representation (entity rows, file cache entries).

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Group used by records that were not given one
pub const DEFAULT_GROUP: &str = "default";

/// Type discriminator stored next to every text-encoded value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SettingType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Json,
}

impl SettingType {
    /// Tag used in persisted records
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored type tag is not one of the five known tags
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown setting type tag: {0}")]
pub struct UnknownSettingType(pub String);

impl FromStr for SettingType {
    type Err = UnknownSettingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "boolean" => Ok(Self::Boolean),
            "json" => Ok(Self::Json),
            other => Err(UnknownSettingType(other.to_string())),
        }
    }
}

/// Logical value of a single settings field
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Json(serde_json::Value),
}

impl SettingValue {
    /// Truthiness used when a value is stored under the boolean tag
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => text_truthy(s),
            Self::Json(v) => json_truthy(v),
        }
    }

    /// Truncating integer conversion
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Integer(i) => *i,
            // `as` saturates and maps NaN to 0
            Self::Float(f) => *f as i64,
            Self::Boolean(b) => i64::from(*b),
            Self::String(s) => crate::domain::codec::parse_leading_integer(s),
            Self::Json(v) => match v {
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .unwrap_or_else(|| n.as_f64().unwrap_or_default() as i64),
                serde_json::Value::Bool(b) => i64::from(*b),
                serde_json::Value::String(s) => crate::domain::codec::parse_leading_integer(s),
                other => i64::from(json_truthy(other)),
            },
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Float(f) => *f,
            Self::Integer(i) => *i as f64,
            Self::Boolean(b) => f64::from(u8::from(*b)),
            Self::String(s) => crate::domain::codec::parse_float(s),
            Self::Json(v) => match v {
                serde_json::Value::Number(n) => n.as_f64().unwrap_or_default(),
                serde_json::Value::Bool(b) => f64::from(u8::from(*b)),
                serde_json::Value::String(s) => crate::domain::codec::parse_float(s),
                other => f64::from(u8::from(json_truthy(other))),
            },
        }
    }

    /// Textual form used under the string tag
    pub fn to_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Boolean(true) => "1".to_string(),
            Self::Boolean(false) => String::new(),
            Self::Json(serde_json::Value::String(s)) => s.clone(),
            Self::Json(serde_json::Value::Null) => String::new(),
            Self::Json(v) => v.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Json(v) => v.clone(),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }

    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Json(v) => v,
            other => other.to_json(),
        }
    }
}

fn text_truthy(s: &str) -> bool {
    !s.is_empty() && s != "0"
}

fn json_truthy(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => text_truthy(s),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

/// Tenant identifier, either numeric or textual
///
/// Two ids are equal when their textual forms are equal, so `42` and `"42"`
/// address the same tenant while `"007"` and `7` do not.
#[derive(Debug, Clone)]
pub enum TenantId {
    Int(i64),
    Str(String),
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl PartialEq for TenantId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for TenantId {}

impl std::hash::Hash for TenantId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl From<i64> for TenantId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for TenantId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u32> for TenantId {
    fn from(id: u32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// Owner of a settings scope (organization, shop, user, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tenant {
    pub tenant_type: String,
    pub id: Option<TenantId>,
}

impl Tenant {
    pub fn new(tenant_type: impl Into<String>, id: impl Into<TenantId>) -> Self {
        Self {
            tenant_type: tenant_type.into(),
            id: Some(id.into()),
        }
    }

    /// Tenant identified by its type only
    pub fn of_type(tenant_type: impl Into<String>) -> Self {
        Self {
            tenant_type: tenant_type.into(),
            id: None,
        }
    }
}

/// Implemented by domain types that own settings
pub trait SettingsTenant {
    fn settings_tenant_type(&self) -> String;

    fn settings_tenant_id(&self) -> Option<TenantId>;

    fn settings_tenant(&self) -> Tenant {
        Tenant {
            tenant_type: self.settings_tenant_type(),
            id: self.settings_tenant_id(),
        }
    }
}

/// Generic persisted unit backing one field of one settings group
#[derive(Debug, Clone, PartialEq)]
pub struct SettingRecord {
    /// Backend-assigned identity
    pub id: Option<i64>,
    pub name: String,
    pub group: String,
    pub namespace: Option<String>,
    /// Text-encoded value, interpreted through `type`
    pub value: String,
    pub r#type: SettingType,
    pub tenant_type: Option<String>,
    pub tenant_id: Option<TenantId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SettingRecord {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            group: DEFAULT_GROUP.to_string(),
            namespace: None,
            value: String::new(),
            r#type: SettingType::String,
            tenant_type: None,
            tenant_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl SettingRecord {
    /// Decoded value according to the record's type tag
    pub fn cast_value(&self) -> SettingValue {
        crate::domain::codec::cast(self.r#type, &self.value)
    }

    /// Encodes `value` under the record's current type tag
    pub fn set_value(
        &mut self,
        value: &SettingValue,
    ) -> Result<(), crate::contract::error::CodecError> {
        self.value = crate::domain::codec::encode(self.r#type, value)?;
        Ok(())
    }

    /// Group, namespace and tenant identifying this record together with its name
    pub fn scope(&self) -> SettingScope {
        SettingScope {
            group: self.group.clone(),
            namespace: self.namespace.clone(),
            tenant_type: self.tenant_type.clone(),
            tenant_id: self.tenant_id.clone(),
        }
    }

    pub fn tenant(&self) -> Option<Tenant> {
        self.tenant_type.as_ref().map(|tenant_type| Tenant {
            tenant_type: tenant_type.clone(),
            id: self.tenant_id.clone(),
        })
    }
}

/// Identity of one settings group for one tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingScope {
    pub group: String,
    pub namespace: Option<String>,
    pub tenant_type: Option<String>,
    pub tenant_id: Option<TenantId>,
}

impl Default for SettingScope {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP.to_string(),
            namespace: None,
            tenant_type: None,
            tenant_id: None,
        }
    }
}

impl SettingScope {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_tenant(mut self, tenant: Option<&Tenant>) -> Self {
        self.tenant_type = tenant.map(|t| t.tenant_type.clone());
        self.tenant_id = tenant.and_then(|t| t.id.clone());
        self
    }

    /// Whether `record` belongs to exactly this scope
    ///
    /// Unlike [`SettingFilter`], absent components only match absent values.
    pub fn contains(&self, record: &SettingRecord) -> bool {
        record.group == self.group
            && record.namespace == self.namespace
            && record.tenant_type == self.tenant_type
            && record.tenant_id == self.tenant_id
    }

    /// Filter selecting this scope's records from a backend
    pub fn filter(&self) -> SettingFilter {
        SettingFilter {
            group: Some(self.group.clone()),
            namespace: self.namespace.clone(),
            tenant_type: self.tenant_type.clone(),
            tenant_id: self.tenant_id.clone(),
        }
    }
}

/// Query over stored records; `None` components match anything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingFilter {
    pub group: Option<String>,
    pub namespace: Option<String>,
    pub tenant_type: Option<String>,
    pub tenant_id: Option<TenantId>,
}

impl SettingFilter {
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &SettingRecord) -> bool {
        if let Some(group) = &self.group {
            if &record.group != group {
                return false;
            }
        }
        if let Some(namespace) = &self.namespace {
            if record.namespace.as_ref() != Some(namespace) {
                return false;
            }
        }
        if let Some(tenant_type) = &self.tenant_type {
            if record.tenant_type.as_ref() != Some(tenant_type) {
                return false;
            }
        }
        if let Some(tenant_id) = &self.tenant_id {
            if record.tenant_id.as_ref() != Some(tenant_id) {
                return false;
            }
        }
        true
    }
}
