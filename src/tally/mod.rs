//! Vote tally state
//!
//! Folds CoCon notifications into the public [`Snapshot`]. A tally is owned
//! by the single worker task that talks to CoCon; readers only ever see the
//! snapshots it publishes.

use std::collections::{BTreeMap, HashMap};

use crate::types::{
    AgendaItem, Counts, Delegates, Meeting, Notification, Snapshot, VoteEntry, STOP_STATE,
};
use crate::utils::now_str;

pub const WAITING_FOR_MEETING: &str = "Waiting for meeting…";
pub const WAITING_FOR_VOTE: &str = "Waiting for vote…";
pub const MEETING_ENDED: &str = "Meeting ended";

/// Voting states that open (or keep) a vote map
const OPEN_STATES: [&str; 3] = ["Start", STOP_STATE, "Pause"];
const CLEAR_STATE: &str = "Clear";

/// Sort `{delegate: result}` by delegate name and split into columns of `size`
pub fn sort_and_chunk(votes: &BTreeMap<String, String>, size: usize) -> Vec<Vec<VoteEntry>> {
    let entries: Vec<VoteEntry> = votes
        .iter()
        .map(|(delegate, result)| VoteEntry::new(delegate.clone(), result.clone()))
        .collect();
    entries.chunks(size.max(1)).map(<[VoteEntry]>::to_vec).collect()
}

pub struct VoteTally {
    snapshot: Snapshot,
    column_lines: usize,
    agenda_item: AgendaItem,
    delegates: Delegates,
    votes_by_vote_id: HashMap<i64, BTreeMap<String, String>>,
    current_vote_id: Option<i64>,
    clock: fn() -> String,
}

impl VoteTally {
    pub fn new(room_name: &str, column_lines: usize) -> Self {
        Self::with_clock(room_name, column_lines, now_str)
    }

    /// Create a tally with a custom date-time source
    pub fn with_clock(room_name: &str, column_lines: usize, clock: fn() -> String) -> Self {
        let snapshot = Snapshot {
            title: Some(room_name.to_string()),
            meeting_title: Some(String::new()),
            agenda_title: Some(WAITING_FOR_MEETING.to_string()),
            datetime: Some(String::new()),
            columns: Some(Vec::new()),
            counts: Some(Counts::zeroed()),
            show_results: Some(false),
            voting_state: Some(String::new()),
        };
        Self {
            snapshot,
            column_lines,
            agenda_item: AgendaItem::default(),
            delegates: Delegates::default(),
            votes_by_vote_id: HashMap::new(),
            current_vote_id: None,
            clock,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn current_vote_id(&self) -> Option<i64> {
        self.current_vote_id
    }

    pub fn delegates(&self) -> &Delegates {
        &self.delegates
    }

    /// Seed the tally from the meeting state fetched at startup
    pub fn bootstrap(&mut self, meeting: &Meeting, delegates: Delegates, agenda_item: AgendaItem) {
        self.delegates = delegates;
        self.snapshot.meeting_title = Some(meeting.title.clone());
        self.snapshot.agenda_title = Some(title_or_waiting(&agenda_item));
        self.agenda_item = agenda_item;
        self.snapshot.datetime = Some((self.clock)());
        self.snapshot.show_results = Some(false);
        log::info!(
            "Bootstrapped meeting {:?} with {} voting delegates",
            meeting.title,
            self.delegates.delegates.len()
        );
    }

    /// Fold one notification into the tally and refresh the snapshot
    pub fn apply(&mut self, notification: Notification) {
        match notification {
            Notification::MeetingStatus { state } => {
                if state == "Ended" {
                    self.snapshot.agenda_title = Some(MEETING_ENDED.to_string());
                }
            }
            Notification::AgendaItem(item) => {
                if item.is_active() {
                    self.snapshot.agenda_title = Some(item.title.clone());
                    self.agenda_item = item;
                }
            }
            Notification::Delegates(delegates) => {
                self.delegates = delegates;
            }
            Notification::VotingState { id, state } => self.apply_voting_state(id, state),
            Notification::IndividualVotingResults(results) => {
                let Some(vote_id) = self.current_vote_id else {
                    return;
                };
                let votes = self.votes_by_vote_id.entry(vote_id).or_default();
                for result in results {
                    if let Some(delegate) = self.delegates.by_id(result.delegate_id) {
                        let option = self.agenda_item.option_name(result.voting_option_id);
                        votes.insert(delegate.name.clone(), option.to_string());
                    }
                }
            }
            Notification::GeneralVotingResults(options) => {
                let mut counts = Counts::zeroed();
                for option in options {
                    counts.set(&option.name.to_uppercase(), option.votes.count);
                }
                self.snapshot.counts = Some(counts);
            }
            Notification::Other(name) => {
                log::trace!("Ignoring {} notification", name);
            }
        }
        self.refresh();
    }

    fn apply_voting_state(&mut self, id: i64, state: String) {
        if OPEN_STATES.contains(&state.as_str()) {
            self.current_vote_id = Some(id);
            let delegates = &self.delegates;
            self.votes_by_vote_id.entry(id).or_insert_with(|| {
                delegates
                    .delegates
                    .iter()
                    .map(|d| (d.name.clone(), String::new()))
                    .collect()
            });
        } else if state == CLEAR_STATE {
            self.current_vote_id = None;
            self.votes_by_vote_id.clear();
            self.snapshot.columns = Some(Vec::new());
            self.snapshot.counts = Some(Counts::zeroed());
            self.snapshot.agenda_title = Some(title_or_waiting(&self.agenda_item));
        }
        self.snapshot.show_results = Some(state == STOP_STATE);
        log::debug!("Voting state {} for vote {}", state, id);
        self.snapshot.voting_state = Some(state);
    }

    fn refresh(&mut self) {
        if let Some(votes) = self
            .current_vote_id
            .and_then(|id| self.votes_by_vote_id.get(&id))
        {
            self.snapshot.columns = Some(sort_and_chunk(votes, self.column_lines));
        }
        self.snapshot.datetime = Some((self.clock)());
    }
}

fn title_or_waiting(item: &AgendaItem) -> String {
    if item.title.is_empty() {
        WAITING_FOR_VOTE.to_string()
    } else {
        item.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Delegate, IndividualResult, OptionTotal, VoteCount, VoteOption, VotingOption};

    fn fixed_clock() -> String {
        "Date 2025-01-01 Time 10:00".to_string()
    }

    fn delegate(id: i64, name: &str) -> Delegate {
        Delegate {
            id,
            name: name.to_string(),
            voting_right: Some(true),
        }
    }

    fn agenda() -> AgendaItem {
        AgendaItem {
            id: 1,
            title: "Budget 2025".to_string(),
            state: "active".to_string(),
            voting_options: vec![
                VotingOption { id: 1, name: "YES".to_string() },
                VotingOption { id: 2, name: "NO".to_string() },
                VotingOption { id: 3, name: "ABST".to_string() },
            ],
        }
    }

    fn tally() -> VoteTally {
        let mut tally = VoteTally::with_clock("ROOM 00", 2, fixed_clock);
        let meeting = Meeting {
            id: 9,
            title: "Plenary".to_string(),
            state: "Running".to_string(),
        };
        let delegates = Delegates::new(vec![
            delegate(1, "Malta"),
            delegate(2, "Italy"),
            delegate(3, "Austria"),
        ]);
        tally.bootstrap(&meeting, delegates, agenda());
        tally
    }

    fn voting(id: i64, state: &str) -> Notification {
        Notification::VotingState {
            id,
            state: state.to_string(),
        }
    }

    #[test]
    fn test_sort_and_chunk() {
        let votes: BTreeMap<String, String> = [("c", "NO"), ("a", "YES"), ("b", ""), ("d", "ABST"), ("e", "")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let columns = sort_and_chunk(&votes, 2);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0], vec![VoteEntry::new("a", "YES"), VoteEntry::new("b", "")]);
        assert_eq!(columns[2], vec![VoteEntry::new("e", "")]);

        assert_eq!(sort_and_chunk(&votes, 0).len(), 5);
        assert!(sort_and_chunk(&BTreeMap::new(), 16).is_empty());
    }

    #[test]
    fn test_initial_snapshot() {
        let tally = VoteTally::with_clock("ROOM 00", 16, fixed_clock);
        let snapshot = tally.snapshot();
        assert_eq!(snapshot.title(), "ROOM 00");
        assert_eq!(snapshot.agenda_title(), WAITING_FOR_MEETING);
        assert_eq!(snapshot.count(VoteOption::Yes), 0);
        assert!(!snapshot.show_results());
    }

    #[test]
    fn test_bootstrap_sets_titles() {
        let tally = tally();
        assert_eq!(tally.snapshot().meeting_title(), "Plenary");
        assert_eq!(tally.snapshot().agenda_title(), "Budget 2025");
        assert_eq!(tally.snapshot().datetime(), fixed_clock());
    }

    #[test]
    fn test_start_creates_blank_columns() {
        let mut tally = tally();
        tally.apply(voting(5, "Start"));

        let snapshot = tally.snapshot();
        assert_eq!(snapshot.voting_state(), "Start");
        assert!(!snapshot.show_results());
        assert_eq!(
            snapshot.columns(),
            &[
                vec![VoteEntry::new("Austria", ""), VoteEntry::new("Italy", "")],
                vec![VoteEntry::new("Malta", "")],
            ]
        );
    }

    #[test]
    fn test_individual_results_fill_in_votes() {
        let mut tally = tally();
        tally.apply(voting(5, "Start"));
        tally.apply(Notification::IndividualVotingResults(vec![
            IndividualResult { delegate_id: 1, voting_option_id: 1 },
            IndividualResult { delegate_id: 3, voting_option_id: 3 },
            IndividualResult { delegate_id: 42, voting_option_id: 2 },
        ]));

        let columns = tally.snapshot().columns();
        assert_eq!(columns[0][0], VoteEntry::new("Austria", "ABST"));
        assert_eq!(columns[1][0], VoteEntry::new("Malta", "YES"));
    }

    #[test]
    fn test_individual_results_ignored_without_vote() {
        let mut tally = tally();
        tally.apply(Notification::IndividualVotingResults(vec![IndividualResult {
            delegate_id: 1,
            voting_option_id: 1,
        }]));
        assert!(tally.snapshot().columns().is_empty());
        assert_eq!(tally.current_vote_id(), None);
    }

    #[test]
    fn test_stop_shows_results_and_general_totals() {
        let mut tally = tally();
        tally.apply(voting(5, "Start"));
        tally.apply(Notification::GeneralVotingResults(vec![
            OptionTotal { name: "Yes".to_string(), votes: VoteCount { count: 2 } },
            OptionTotal { name: "No".to_string(), votes: VoteCount { count: 1 } },
        ]));
        tally.apply(voting(5, "Stop"));

        let snapshot = tally.snapshot();
        assert!(snapshot.show_results());
        assert!(snapshot.is_stopped());
        assert_eq!(snapshot.count(VoteOption::Yes), 2);
        assert_eq!(snapshot.count(VoteOption::No), 1);
        assert_eq!(snapshot.count(VoteOption::Abst), 0);
    }

    #[test]
    fn test_clear_resets_board() {
        let mut tally = tally();
        tally.apply(voting(5, "Start"));
        tally.apply(Notification::GeneralVotingResults(vec![OptionTotal {
            name: "Yes".to_string(),
            votes: VoteCount { count: 3 },
        }]));
        tally.apply(voting(5, "Stop"));
        tally.apply(voting(5, "Clear"));

        let snapshot = tally.snapshot();
        assert!(snapshot.columns().is_empty());
        assert_eq!(snapshot.count(VoteOption::Yes), 0);
        assert!(!snapshot.show_results());
        assert_eq!(snapshot.voting_state(), "Clear");
        assert_eq!(snapshot.agenda_title(), "Budget 2025");
        assert_eq!(tally.current_vote_id(), None);
    }

    #[test]
    fn test_meeting_and_agenda_updates() {
        let mut tally = tally();
        let mut next = agenda();
        next.title = "Motion 4".to_string();
        tally.apply(Notification::AgendaItem(next.clone()));
        assert_eq!(tally.snapshot().agenda_title(), "Motion 4");

        next.state = "closed".to_string();
        next.title = "Ignored".to_string();
        tally.apply(Notification::AgendaItem(next));
        assert_eq!(tally.snapshot().agenda_title(), "Motion 4");

        tally.apply(Notification::MeetingStatus { state: "Ended".to_string() });
        assert_eq!(tally.snapshot().agenda_title(), MEETING_ENDED);
    }

    #[test]
    fn test_pause_keeps_existing_votes() {
        let mut tally = tally();
        tally.apply(voting(5, "Start"));
        tally.apply(Notification::IndividualVotingResults(vec![IndividualResult {
            delegate_id: 2,
            voting_option_id: 2,
        }]));
        tally.apply(voting(5, "Pause"));
        assert_eq!(tally.snapshot().columns()[0][1], VoteEntry::new("Italy", "NO"));
    }
}
