//! Raw project and task shapes as delivered by the task service.
//!
//! The service is loose about nulls and sends identifiers as either strings
//! or numbers, so every field here tolerates both.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// A project to export, as listed in the project list file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier.
    #[serde(deserialize_with = "gid")]
    pub gid: String,

    /// Display name. Carries the zone and the WO/PO hint.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Project {
    pub fn new(gid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            gid: gid.into(),
            name: name.into(),
        }
    }
}

/// A task record. Read-only input to the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTask {
    #[serde(default, deserialize_with = "gid")]
    pub gid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Free-text description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub modified_at: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub permalink_url: String,

    /// Board placements, one per project the task lives in.
    #[serde(default, deserialize_with = "null_as_default")]
    pub memberships: Vec<Membership>,

    /// Custom fields in the service's native order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
}

impl RawTask {
    /// Section label of this task on the given project's board.
    ///
    /// Empty when the task has no membership in that project.
    pub fn section_in(&self, project_gid: &str) -> &str {
        self.memberships
            .iter()
            .find(|m| m.project.as_ref().is_some_and(|p| p.gid == project_gid))
            .and_then(|m| m.section.as_ref())
            .map(|s| s.name.trim())
            .unwrap_or("")
    }

    /// Modification timestamp, falling back to creation.
    pub fn last_touched(&self) -> &str {
        if self.modified_at.is_empty() {
            &self.created_at
        } else {
            &self.modified_at
        }
    }
}

/// Link between a task and a project board column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Membership {
    #[serde(default)]
    pub project: Option<ProjectRef>,

    #[serde(default)]
    pub section: Option<SectionRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default, deserialize_with = "gid")]
    pub gid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A custom field entry with its alternative value representations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomField {
    /// Free-form label as configured on the board.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Rendered value.
    #[serde(default)]
    pub display_value: Option<String>,

    /// Chosen option for enum fields.
    #[serde(default)]
    pub enum_value: Option<EnumOption>,

    /// Native numeric value exactly as sent. Anything that is not a JSON
    /// number reads as absent.
    #[serde(default, deserialize_with = "lenient_number")]
    pub number_value: Option<Number>,

    /// Raw text value.
    #[serde(default)]
    pub text_value: Option<String>,

    /// Field type as reported by the service (`text`, `enum`, `number`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumOption {
    #[serde(default)]
    pub name: Option<String>,
}

impl CustomField {
    /// A text field carrying only a display value.
    pub fn display(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A number field with its native value.
    pub fn number(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            display_value: Some(value.to_string()),
            number_value: Number::from_str(&value.to_string()).ok(),
            kind: Some("number".to_string()),
            ..Self::default()
        }
    }

    /// An enum field with the chosen option label.
    pub fn choice(name: impl Into<String>, option: impl Into<String>) -> Self {
        let option = option.into();
        Self {
            name: name.into(),
            display_value: Some(option.clone()),
            enum_value: Some(EnumOption { name: Some(option) }),
            kind: Some("enum".to_string()),
            ..Self::default()
        }
    }

    pub fn display_text(&self) -> Option<&str> {
        non_empty(self.display_value.as_deref())
    }

    pub fn raw_text(&self) -> Option<&str> {
        non_empty(self.text_value.as_deref())
    }

    pub fn chosen_option(&self) -> Option<&str> {
        non_empty(self.enum_value.as_ref().and_then(|e| e.name.as_deref()))
    }

    /// The native number as a `Decimal`. `Err` carries the number's text
    /// when it lies outside the `Decimal` range.
    pub fn native_number(&self) -> Option<std::result::Result<Decimal, String>> {
        let number = self.number_value.as_ref()?;
        let text = number.to_string();
        Some(
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| text),
        )
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Some(n),
        _ => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Gid {
    Text(String),
    Number(u64),
}

fn gid<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Gid>::deserialize(deserializer)? {
        Some(Gid::Text(s)) => s,
        Some(Gid::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
