//! Vote-tally snapshot pushed to every display over `/ws`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Voting state value that arms the auto-print one-shot
pub const STOP_STATE: &str = "Stop";

/// One full vote-display state.
///
/// Every field is optional on the wire. The accessor methods resolve the
/// defaults the renderer relies on (`""`, `0`, `false`, empty columns), so
/// a display never has to guess what an absent field means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Vec<VoteEntry>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<Counts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_results: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_state: Option<String>,
}

impl Snapshot {
    /// Parse a snapshot from a raw WebSocket text frame
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn meeting_title(&self) -> &str {
        self.meeting_title.as_deref().unwrap_or("")
    }

    pub fn agenda_title(&self) -> &str {
        self.agenda_title.as_deref().unwrap_or("")
    }

    pub fn datetime(&self) -> &str {
        self.datetime.as_deref().unwrap_or("")
    }

    pub fn columns(&self) -> &[Vec<VoteEntry>] {
        self.columns.as_deref().unwrap_or(&[])
    }

    /// Counter value for one of the three footer options, `0` when absent
    pub fn count(&self, option: VoteOption) -> i64 {
        self.counts.as_ref().map_or(0, |c| c.get(option))
    }

    pub fn show_results(&self) -> bool {
        self.show_results.unwrap_or(false)
    }

    pub fn voting_state(&self) -> &str {
        self.voting_state.as_deref().unwrap_or("")
    }

    pub fn is_stopped(&self) -> bool {
        self.voting_state() == STOP_STATE
    }
}

/// The three tallied options shown in the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteOption {
    Yes,
    Abst,
    No,
}

impl VoteOption {
    pub const ALL: [VoteOption; 3] = [VoteOption::Yes, VoteOption::Abst, VoteOption::No];

    /// Key used in `counts` and as the vote result label
    pub fn key(self) -> &'static str {
        match self {
            VoteOption::Yes => "YES",
            VoteOption::Abst => "ABST",
            VoteOption::No => "NO",
        }
    }

    /// CSS class of the footer counter block
    pub fn css_class(self) -> &'static str {
        match self {
            VoteOption::Yes => "yes",
            VoteOption::Abst => "abst",
            VoteOption::No => "no",
        }
    }
}

/// Totals per option. Keys other than YES/ABST/NO are kept but not displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(rename = "YES", default, skip_serializing_if = "Option::is_none")]
    pub yes: Option<i64>,
    #[serde(rename = "ABST", default, skip_serializing_if = "Option::is_none")]
    pub abst: Option<i64>,
    #[serde(rename = "NO", default, skip_serializing_if = "Option::is_none")]
    pub no: Option<i64>,
    #[serde(flatten)]
    pub other: BTreeMap<String, i64>,
}

impl Counts {
    /// All three displayed options present and set to zero
    pub fn zeroed() -> Self {
        Self {
            yes: Some(0),
            abst: Some(0),
            no: Some(0),
            other: BTreeMap::new(),
        }
    }

    pub fn get(&self, option: VoteOption) -> i64 {
        let value = match option {
            VoteOption::Yes => self.yes,
            VoteOption::Abst => self.abst,
            VoteOption::No => self.no,
        };
        value.unwrap_or(0)
    }

    /// Set a total by its upper-cased option name
    pub fn set(&mut self, key: &str, count: i64) {
        match key {
            "YES" => self.yes = Some(count),
            "ABST" => self.abst = Some(count),
            "NO" => self.no = Some(count),
            _ => {
                self.other.insert(key.to_string(), count);
            }
        }
    }
}

/// One `[delegate, result]` pair inside a column.
///
/// On the wire this is a JSON array; missing trailing elements and `null`
/// both decode to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<Option<String>>",
    into = "(Option<String>, Option<String>)"
)]
pub struct VoteEntry {
    pub delegate: Option<String>,
    pub result: Option<String>,
}

impl VoteEntry {
    pub fn new(delegate: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            delegate: Some(delegate.into()),
            result: Some(result.into()),
        }
    }

    pub fn delegate(&self) -> &str {
        self.delegate.as_deref().unwrap_or("")
    }

    pub fn result(&self) -> &str {
        self.result.as_deref().unwrap_or("")
    }
}

impl From<Vec<Option<String>>> for VoteEntry {
    fn from(items: Vec<Option<String>>) -> Self {
        let mut items = items.into_iter();
        Self {
            delegate: items.next().flatten(),
            result: items.next().flatten(),
        }
    }
}

impl From<VoteEntry> for (Option<String>, Option<String>) {
    fn from(entry: VoteEntry) -> Self {
        (entry.delegate, entry.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_resolves_defaults() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert_eq!(snapshot.title(), "");
        assert_eq!(snapshot.meeting_title(), "");
        assert!(snapshot.columns().is_empty());
        assert_eq!(snapshot.count(VoteOption::Yes), 0);
        assert!(!snapshot.show_results());
        assert!(!snapshot.is_stopped());
    }

    #[test]
    fn test_partial_counts() {
        let snapshot = Snapshot::from_json(r#"{"counts":{"YES":3,"NO":1}}"#).unwrap();
        assert_eq!(snapshot.count(VoteOption::Yes), 3);
        assert_eq!(snapshot.count(VoteOption::No), 1);
        assert_eq!(snapshot.count(VoteOption::Abst), 0);
    }

    #[test]
    fn test_vote_entries_tolerate_nulls_and_short_arrays() {
        let snapshot =
            Snapshot::from_json(r#"{"columns":[[["Alice","YES"],[null,"NO"],["Carol"],[]]]}"#)
                .unwrap();
        let column = &snapshot.columns()[0];
        assert_eq!(column.len(), 4);
        assert_eq!(column[0], VoteEntry::new("Alice", "YES"));
        assert_eq!(column[1].delegate(), "");
        assert_eq!(column[1].result(), "NO");
        assert_eq!(column[2].delegate(), "Carol");
        assert_eq!(column[2].result(), "");
        assert_eq!(column[3], VoteEntry::default());
    }

    #[test]
    fn test_extra_count_keys_are_kept() {
        let mut counts = Counts::zeroed();
        counts.set("YES", 4);
        counts.set("NOT PARTICIPATING", 2);

        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["YES"], 4);
        assert_eq!(json["ABST"], 0);
        assert_eq!(json["NOT PARTICIPATING"], 2);
    }

    #[test]
    fn test_entry_serializes_as_pair() {
        let json = serde_json::to_string(&VoteEntry::new("Italy", "")).unwrap();
        assert_eq!(json, r#"["Italy",""]"#);
    }
}
