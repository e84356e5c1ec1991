//! Data types shared by the snapshot producer and the display

mod cocon;
mod snapshot;

pub use cocon::{
    list_field, parse_notifications, AgendaItem, Delegate, Delegates, IndividualResult, Meeting,
    Notification, OptionTotal, VoteCount, VotingOption,
};
pub use snapshot::{Counts, Snapshot, VoteEntry, VoteOption, STOP_STATE};
