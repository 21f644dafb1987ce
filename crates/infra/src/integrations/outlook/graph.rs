//! Microsoft Graph calendar store
//!
//! Talks to the signed-in user's default calendar. Times are exchanged as
//! wall-clock values in the configured zone: requests carry the zone name
//! and responses are asked for in it through the `Prefer` header.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use focusguard_core::CalendarStore;
use focusguard_domain::{CalendarEntry, DeclineOutcome, EntryHandle, FocusError, NewEntry, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OutlookConfig;
use crate::errors::{status_error, InfraError};

const SELECT_FIELDS: &str = "id,subject,start,end,isOrganizer";
const ORDER_BY: &str = "start/dateTime";
const PAGE_SIZE_HEADER: &str = "odata.maxpagesize=100";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `CalendarStore` backed by the Outlook calendar through Microsoft Graph.
#[derive(Clone)]
pub struct GraphCalendarStore {
    client: Client,
    base_url: String,
    access_token: String,
    time_zone: String,
}

impl GraphCalendarStore {
    /// Build a store from the adapter settings.
    ///
    /// # Errors
    /// Returns `FocusError::Auth` when no access token is configured and
    /// `FocusError::Config` when the HTTP client cannot be built.
    pub fn new(config: &OutlookConfig, time_zone: &str) -> Result<Self> {
        let access_token = config
            .access_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                FocusError::Auth(
                    "no Outlook access token configured (outlook.access_token or \
                     FOCUSGUARD_OUTLOOK_ACCESS_TOKEN)"
                        .into(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FocusError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self::with_client(client, &config.base_url, access_token, time_zone))
    }

    /// Build a store around an existing client.
    pub fn with_client(
        client: Client,
        base_url: &str,
        access_token: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            time_zone: time_zone.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn event_url(&self, handle: &EntryHandle, action: &str) -> String {
        let mut url = self.url(&format!("/me/events/{}", handle.as_str()));
        if !action.is_empty() {
            url.push('/');
            url.push_str(action);
        }
        url
    }

    fn timezone_preference(&self) -> String {
        format!(r#"outlook.timezone="{}""#, self.time_zone)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response =
            request.bearer_auth(&self.access_token).send().await.map_err(InfraError::from)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body).into())
    }

    fn to_entry(&self, event: GraphEvent) -> Option<CalendarEntry> {
        let start = parse_graph_date_time(&event.start.date_time);
        let end = parse_graph_date_time(&event.end.date_time);
        let (Some(start), Some(end)) = (start, end) else {
            warn!(event_id = %event.id, "dropping event with unreadable start or end");
            return None;
        };
        if !event.start.time_zone.as_deref().map_or(true, |tz| tz == self.time_zone) {
            debug!(event_id = %event.id, zone = ?event.start.time_zone, "event returned in another zone");
        }

        Some(CalendarEntry {
            handle: EntryHandle::new(event.id),
            subject: event.subject.unwrap_or_default(),
            start,
            duration_minutes: (end - start).num_minutes(),
            is_organizer: event.is_organizer.unwrap_or(false),
        })
    }
}

#[async_trait]
impl CalendarStore for GraphCalendarStore {
    async fn list_entries(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEntry>> {
        let mut request = self.client.get(self.url("/me/calendarView")).query(&[
            ("startDateTime", start.format(DATE_TIME_FORMAT).to_string()),
            ("endDateTime", end.format(DATE_TIME_FORMAT).to_string()),
            ("$orderby", ORDER_BY.to_string()),
            ("$select", SELECT_FIELDS.to_string()),
        ]);

        let mut entries = Vec::new();
        loop {
            let response = self
                .send(
                    request
                        .header("Prefer", self.timezone_preference())
                        .header("Prefer", PAGE_SIZE_HEADER),
                )
                .await?;
            let page: GraphEventPage = response.json().await.map_err(InfraError::from)?;

            // calendarView also returns events that merely overlap the range
            entries.extend(
                page.value
                    .into_iter()
                    .filter_map(|event| self.to_entry(event))
                    .filter(|entry| entry.start >= start && entry.start < end),
            );

            match page.next_link {
                Some(next) => request = self.client.get(next),
                None => break,
            }
        }

        // pages are ordered by Graph; keep it explicit for the grid builder
        entries.sort_by_key(|entry| entry.start);
        debug!(count = entries.len(), %start, %end, "listed calendar entries");
        Ok(entries)
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<EntryHandle> {
        let end = entry.start + ChronoDuration::minutes(entry.duration_minutes);
        let body = NewGraphEvent {
            subject: &entry.subject,
            start: GraphDateTimeOut {
                date_time: entry.start.format(DATE_TIME_FORMAT).to_string(),
                time_zone: &self.time_zone,
            },
            end: GraphDateTimeOut {
                date_time: end.format(DATE_TIME_FORMAT).to_string(),
                time_zone: &self.time_zone,
            },
            show_as: "busy",
            is_reminder_on: false,
        };

        let response = self.send(self.client.post(self.url("/me/events")).json(&body)).await?;
        let created: CreatedEvent = response.json().await.map_err(InfraError::from)?;
        Ok(EntryHandle::new(created.id))
    }

    async fn delete_entry(&self, handle: &EntryHandle) -> Result<()> {
        self.send(self.client.delete(self.event_url(handle, ""))).await?;
        Ok(())
    }

    async fn respond_decline(
        &self,
        entry: &CalendarEntry,
        message: &str,
    ) -> Result<DeclineOutcome> {
        if entry.is_organizer {
            return Ok(DeclineOutcome::NotDeclinable);
        }

        let body = DeclineBody { comment: message, send_response: true };
        self.send(self.client.post(self.event_url(&entry.handle, "decline")).json(&body)).await?;
        Ok(DeclineOutcome::Declined)
    }

    async fn cancel_and_notify(&self, entry: &CalendarEntry, message: &str) -> Result<()> {
        let body = CancelBody { comment: message };
        self.send(self.client.post(self.event_url(&entry.handle, "cancel")).json(&body)).await?;
        Ok(())
    }
}

/// Graph returns `2024-05-02T09:00:00.0000000`; fractional seconds are
/// optional.
fn parse_graph_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

#[derive(Debug, Deserialize)]
struct GraphEventPage {
    value: Vec<GraphEvent>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphEvent {
    id: String,
    subject: Option<String>,
    start: GraphDateTime,
    end: GraphDateTime,
    #[serde(rename = "isOrganizer")]
    is_organizer: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct GraphDateTime {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewGraphEvent<'a> {
    subject: &'a str,
    start: GraphDateTimeOut<'a>,
    end: GraphDateTimeOut<'a>,
    show_as: &'a str,
    is_reminder_on: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphDateTimeOut<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeclineBody<'a> {
    comment: &'a str,
    send_response: bool,
}

#[derive(Debug, Serialize)]
struct CancelBody<'a> {
    comment: &'a str,
}
