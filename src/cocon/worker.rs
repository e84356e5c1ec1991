//! Background task that keeps the tally in sync with CoCon
//!
//! One session: connect, bootstrap the meeting state once, drop the noisy
//! models, then long-poll notifications until the link fails. A failed
//! session is logged and retried after [`RETRY_DELAY`] until shutdown.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;

use super::client::{CoconClient, Model};
use crate::api::AppState;
use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::tally::VoteTally;
use crate::types::{list_field, parse_notifications, AgendaItem, Delegate, Delegates, Meeting};

pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Run until `shutdown` flips to true (or its sender is dropped)
pub async fn run(config: MonitorConfig, state: Arc<AppState>, mut shutdown: watch::Receiver<bool>) {
    let mut tally = VoteTally::new(&config.room_name, config.column_lines);
    state.publish(tally.snapshot().clone()).await;

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            result = session(&config, &mut tally, &state) => {
                if let Err(e) = result {
                    log::error!("CoCon session ended: {}", e);
                }
            }
            _ = shutdown.changed() => break,
        }
        tokio::select! {
            _ = tokio::time::sleep(RETRY_DELAY) => {}
            _ = shutdown.changed() => break,
        }
    }
    log::info!("CoCon worker stopped");
}

async fn session(
    config: &MonitorConfig,
    tally: &mut VoteTally,
    state: &AppState,
) -> MonitorResult<()> {
    let mut client = CoconClient::new(config.cocon_base_url(), config.poll_timeout)?;
    client.connect().await?;

    match fetch_bootstrap(&client).await {
        Ok((meeting, delegates, agenda_item)) => {
            tally.bootstrap(&meeting, delegates, agenda_item);
            state.publish(tally.snapshot().clone()).await;
        }
        Err(e) => log::error!("Bootstrap failed: {}", e),
    }

    // Noisy models are dropped only once bootstrap has run
    if let Err(e) = client.unsubscribe(&Model::NOISY).await {
        log::warn!("Could not unsubscribe noisy models: {}", e);
    }

    loop {
        let payload = client.notification().await?;
        if payload.is_null() {
            continue;
        }
        let notifications = match parse_notifications(payload) {
            Ok(notifications) => notifications,
            Err(e) => {
                log::error!("Handler error: {}", e);
                continue;
            }
        };
        if notifications.is_empty() {
            continue;
        }
        for notification in notifications {
            tally.apply(notification);
        }
        state.publish(tally.snapshot().clone()).await;
    }
}

async fn fetch_bootstrap(client: &CoconClient) -> MonitorResult<(Meeting, Delegates, AgendaItem)> {
    let meetings = client.send("Meeting_Agenda/GetMeetingsForToday", &[]).await?;
    let meeting = active_meeting(meetings)?;

    let seated = client
        .send(
            "Delegate/GetDelegatesInMeeting",
            &[("MeetingId", meeting.id.to_string())],
        )
        .await?;
    let all = client.send("Delegate/GetAllDelegates", &[]).await?;
    let agenda = client
        .send("Meeting_Agenda/GetAgendaItemInformationInRunningMeeting", &[])
        .await?;

    Ok((meeting, voting_delegates(seated, all)?, active_agenda_item(agenda)?))
}

fn field(mut response: Value, key: &str) -> Value {
    response
        .as_object_mut()
        .and_then(|map| map.remove(key))
        .unwrap_or(Value::Null)
}

/// Active meeting out of a `GetMeetingsForToday` answer
pub fn active_meeting(response: Value) -> MonitorResult<Meeting> {
    let meetings: Vec<Meeting> = list_field(field(response, "GetMeetings"), "Meetings")?;
    Meeting::active(meetings).ok_or_else(|| MonitorError::Protocol("no meeting today".to_string()))
}

/// Seated delegates that hold a voting right according to the full delegate list
pub fn voting_delegates(seated: Value, all: Value) -> MonitorResult<Delegates> {
    let mut seated = Delegates::new(list_field(
        field(seated, "GetDelegatesInMeeting"),
        "Delegates",
    )?);
    let all: Vec<Delegate> = list_field(field(all, "GetAllDelegates"), "Delegates")?;
    seated.merge_voting_rights(&all);
    Ok(seated.with_voting_right())
}

/// Active agenda item; a meeting without one yields an empty item
pub fn active_agenda_item(response: Value) -> MonitorResult<AgendaItem> {
    let items: Vec<AgendaItem> = list_field(
        field(response, "GetAgendaItemInformationInRunningMeeting"),
        "AgendaItems",
    )?;
    Ok(AgendaItem::active(items).unwrap_or_default())
}
