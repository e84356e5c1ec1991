//! CoCon room-server objects and notifications

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MonitorError, MonitorResult};

/// Meeting as returned by `Meeting_Agenda/GetMeetingsForToday`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub state: String,
}

impl Meeting {
    /// Pick the running meeting, or the first one when none is running
    pub fn active(meetings: Vec<Meeting>) -> Option<Meeting> {
        let mut first = None;
        for meeting in meetings {
            if meeting.state.eq_ignore_ascii_case("running")
                || meeting.state.eq_ignore_ascii_case("active")
            {
                return Some(meeting);
            }
            if first.is_none() {
                first = Some(meeting);
            }
        }
        first
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Delegate {
    pub id: i64,
    pub name: String,
    pub voting_right: Option<bool>,
}

/// Delegates seated in the meeting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delegates {
    pub delegates: Vec<Delegate>,
}

impl Delegates {
    pub fn new(delegates: Vec<Delegate>) -> Self {
        Self { delegates }
    }

    pub fn by_id(&self, id: i64) -> Option<&Delegate> {
        self.delegates.iter().find(|d| d.id == id)
    }

    /// Copy voting rights over from the full delegate list, matched by id
    pub fn merge_voting_rights(&mut self, all: &[Delegate]) {
        for delegate in &mut self.delegates {
            if let Some(source) = all.iter().find(|d| d.id == delegate.id) {
                delegate.voting_right = source.voting_right;
            }
        }
    }

    /// Keep only delegates known to hold a voting right
    pub fn with_voting_right(self) -> Self {
        Self {
            delegates: self
                .delegates
                .into_iter()
                .filter(|d| d.voting_right.unwrap_or(false))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VotingOption {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AgendaItem {
    pub id: i64,
    pub title: String,
    pub state: String,
    pub voting_options: Vec<VotingOption>,
}

impl AgendaItem {
    pub fn is_active(&self) -> bool {
        self.state.eq_ignore_ascii_case("active")
    }

    pub fn active(items: Vec<AgendaItem>) -> Option<AgendaItem> {
        items.into_iter().find(AgendaItem::is_active)
    }

    /// Name of the voting option with `id`, `""` when unknown
    pub fn option_name(&self, id: i64) -> &str {
        self.voting_options
            .iter()
            .find(|o| o.id == id)
            .map_or("", |o| o.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IndividualResult {
    pub delegate_id: i64,
    pub voting_option_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OptionTotal {
    pub name: String,
    pub votes: VoteCount,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VoteCount {
    pub count: i64,
}

/// A notification pushed by CoCon on the long-poll channel
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    MeetingStatus { state: String },
    AgendaItem(AgendaItem),
    Delegates(Delegates),
    VotingState { id: i64, state: String },
    IndividualVotingResults(Vec<IndividualResult>),
    GeneralVotingResults(Vec<OptionTotal>),
    /// A model this monitor does not track
    Other(String),
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct StateBody {
    id: i64,
    state: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct IndividualBody {
    voting_results: Vec<IndividualResult>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct GeneralBody {
    voting_results: GeneralOptions,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct GeneralOptions {
    options: Vec<OptionTotal>,
}

/// Decode a CoCon payload into notifications.
///
/// CoCon sends objects keyed by model name (`{"VotingState": {...}}`), either
/// alone or batched in an array. Every key of an object becomes one
/// notification.
pub fn parse_notifications(payload: Value) -> MonitorResult<Vec<Notification>> {
    match payload {
        Value::Array(items) => {
            let mut out = Vec::new();
            for item in items {
                out.extend(parse_notifications(item)?);
            }
            Ok(out)
        }
        Value::Object(map) => map
            .into_iter()
            .map(|(name, body)| parse_one(&name, body))
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(MonitorError::Protocol(format!(
            "unexpected notification payload: {}",
            other
        ))),
    }
}

fn parse_one(name: &str, body: Value) -> MonitorResult<Notification> {
    let notification = match name {
        "MeetingStatus" => {
            let body: StateBody = serde_json::from_value(body)?;
            Notification::MeetingStatus { state: body.state }
        }
        "AgendaItem" => Notification::AgendaItem(serde_json::from_value(body)?),
        "Delegates" => Notification::Delegates(Delegates::new(list_field(body, "Delegates")?)),
        "VotingState" => {
            let body: StateBody = serde_json::from_value(body)?;
            Notification::VotingState {
                id: body.id,
                state: body.state,
            }
        }
        "IndividualVotingResults" => {
            let body: IndividualBody = serde_json::from_value(body)?;
            Notification::IndividualVotingResults(body.voting_results)
        }
        "GeneralVotingResults" => {
            let body: GeneralBody = serde_json::from_value(body)?;
            Notification::GeneralVotingResults(body.voting_results.options)
        }
        other => Notification::Other(other.to_string()),
    };
    Ok(notification)
}

/// Read a list either given bare or wrapped as `{"<key>": [...]}`
pub fn list_field<T: DeserializeOwned>(value: Value, key: &str) -> MonitorResult<Vec<T>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => match map.remove(key) {
            Some(inner) => Ok(serde_json::from_value(inner)?),
            None => Err(MonitorError::Protocol(format!("missing field {}", key))),
        },
        Value::Null => Ok(Vec::new()),
        other => Err(MonitorError::Protocol(format!(
            "expected a list for {}, got {}",
            key, other
        ))),
    }
}
