//! Context data model: events, their detail lists, and the typed envelope.
//!
//! Detail lists are decoded from loosely structured payloads and queried by
//! template authors who are not engineers, so every lookup here is total:
//! a missing name produces a placeholder, an absent tag produces an empty
//! subsequence, and nothing in this module panics or returns an error.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Unix seconds of `0001-01-01T00:00:00Z`, the conventional "unset"
/// timestamp in incoming payloads.
const UNSET_INSTANT_SECS: i64 = -62_135_596_800;

/// A single named fact attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventDetail {
    /// Lookup key; unique within its owning list.
    #[serde(default)]
    pub name: String,
    /// Display override; empty means "use the name".
    #[serde(default)]
    pub label: String,
    /// Arbitrary JSON payload, may be null.
    #[serde(default)]
    pub value: Value,
    /// Grouping tag; empty means general-purpose.
    #[serde(default)]
    pub tag: String,
}

impl EventDetail {
    /// Display name: the label when set, otherwise the name.
    pub fn label_or_name(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Ordered list of event details with a lookup surface that never fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventDetails(Vec<EventDetail>);

impl EventDetails {
    pub fn new(details: Vec<EventDetail>) -> Self {
        Self(details)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventDetail> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name-to-value mapping; unnamed entries are skipped and later
    /// duplicates overwrite earlier ones.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for detail in &self.0 {
            if detail.name.is_empty() {
                continue;
            }
            map.insert(detail.name.clone(), detail.value.clone());
        }
        map
    }

    /// Details carrying exactly `tag`, in list order.
    pub fn with_tag(&self, tag: &str) -> EventDetails {
        EventDetails(self.0.iter().filter(|d| d.tag == tag).cloned().collect())
    }

    /// Untagged, general-purpose details.
    pub fn general(&self) -> EventDetails {
        self.with_tag("")
    }

    /// Details whose name is in `names`, keeping list order.
    pub fn with_names<S: AsRef<str>>(&self, names: &[S]) -> EventDetails {
        let wanted: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();

        EventDetails(
            self.0
                .iter()
                .filter(|d| wanted.contains(d.name.as_str()))
                .cloned()
                .collect(),
        )
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|d| d.name == name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.0.iter().any(|d| d.tag == tag)
    }

    /// First detail named `name`, or a placeholder whose value is null.
    ///
    /// The placeholder keeps template expressions over unknown fields
    /// rendering as empty output instead of failing the whole request.
    pub fn get(&self, name: &str) -> EventDetail {
        self.0
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .unwrap_or_else(|| EventDetail {
                name: name.to_string(),
                label: name.to_string(),
                value: Value::Null,
                tag: String::new(),
            })
    }

    /// Value of the first detail named `name`, null when absent.
    pub fn get_value(&self, name: &str) -> Value {
        self.get(name).value
    }
}

/// One notification event with its decoded detail list.
///
/// `details` is captured from the nested `Details` array during decode and
/// is a derived view: the wire `Serialize` implementation does not write it
/// back. Templates see it through [`Event::render_value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Event {
    #[serde(rename = "Type", default)]
    pub event_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub current_state: String,
    #[serde(default)]
    pub previous_state: String,
    #[serde(default)]
    pub importance: i64,
    #[serde(default, skip_serializing)]
    pub details: EventDetails,
}

impl Event {
    /// Template-facing view of the event, including the detail list.
    pub fn render_value(&self) -> Value {
        json!({
            "Type": self.event_type,
            "Description": self.description,
            "IsActive": self.is_active,
            "StartTime": self.start_time,
            "EndTime": self.end_time,
            "CurrentState": self.current_state,
            "PreviousState": self.previous_state,
            "Importance": self.importance,
            "Details": self.details,
        })
    }
}

/// Typed envelope for notification payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct NotificationContext {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(rename = "CompanyID", default)]
    pub company_id: i64,
    #[serde(default)]
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<DateTime<Utc>>,
}

impl NotificationContext {
    /// Guarantee a usable `Now`, replacing an absent or zero timestamp
    /// with the current UTC instant.
    pub fn ensure_now(&mut self) {
        let unset = match self.now {
            None => true,
            Some(t) => t.timestamp() == UNSET_INSTANT_SECS,
        };

        if unset {
            self.now = Some(Utc::now());
        }
    }

    /// Template-facing view of the whole context.
    pub fn render_value(&self) -> Value {
        json!({
            "Events": self.events.iter().map(Event::render_value).collect::<Vec<_>>(),
            "CompanyID": self.company_id,
            "CompanyName": self.company_name,
            "Now": self.now,
        })
    }
}
