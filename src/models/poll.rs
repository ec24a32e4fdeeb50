//! Live polls and votes.
//!
//! Option vote counts are never trusted from storage: they are recomputed
//! from the vote list whenever a poll is read.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::StoredDocument;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub votes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub options: Vec<PollOption>,
    pub is_active: bool,
    pub created_at: String,
    #[serde(default)]
    pub ends_at: Option<String>,
    #[serde(default)]
    pub allow_multiple: bool,
}

impl Poll {
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.ends_at.as_deref().and_then(parse_deadline)
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.deadline().is_some_and(|deadline| deadline < now)
    }

    /// Accepting votes: explicitly active and not past `endsAt`.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.has_ended(now)
    }
}

/// Parse an `endsAt` value.
///
/// Accepts RFC 3339 and the zone-less `datetime-local` form, read as UTC.
pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub poll_id: String,
    pub option_id: String,
    pub voter_id: String,
    pub timestamp: String,
}

/// A poll as returned to clients, with counts derived from the vote list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollView {
    #[serde(flatten)]
    pub poll: Poll,
    pub total_votes: u32,
    pub is_open: bool,
}

/// Why a poll operation was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum PollError {
    NotFound(String),
    MissingField(&'static str),
    TooFewOptions,
    InvalidDeadline(String),
    Inactive,
    Ended,
    UnknownOption(String),
    AlreadyVoted,
}

impl std::fmt::Display for PollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollError::NotFound(id) => write!(f, "Poll {} not found", id),
            PollError::MissingField(field) => write!(f, "{} is required", field),
            PollError::TooFewOptions => write!(f, "options must contain at least 2 non-empty entries"),
            PollError::InvalidDeadline(raw) => write!(f, "endsAt is not a valid date-time: {}", raw),
            PollError::Inactive => write!(f, "Poll is no longer active"),
            PollError::Ended => write!(f, "Poll has ended"),
            PollError::UnknownOption(id) => write!(f, "optionId {} is not an option of this poll", id),
            PollError::AlreadyVoted => write!(f, "You have already voted for this option"),
        }
    }
}

impl From<PollError> for AppError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::NotFound(_) => AppError::NotFound(err.to_string()),
            _ => AppError::Validation(err.to_string()),
        }
    }
}

/// The stored voting document, `{ "polls": [...], "votes": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VotingDocument {
    #[serde(default)]
    pub polls: Vec<Poll>,
    #[serde(default)]
    pub votes: Vec<Vote>,
}

impl VotingDocument {
    /// Recount a poll's options from the vote list.
    pub fn tally(&self, poll: &Poll, now: DateTime<Utc>) -> PollView {
        let mut poll = poll.clone();
        let mut total_votes = 0;
        for option in &mut poll.options {
            option.votes = self
                .votes
                .iter()
                .filter(|v| v.poll_id == poll.id && v.option_id == option.id)
                .count() as u32;
            total_votes += option.votes;
        }
        let is_open = poll.is_open(now);

        PollView {
            poll,
            total_votes,
            is_open,
        }
    }

    pub fn views(&self, now: DateTime<Utc>) -> Vec<PollView> {
        self.polls.iter().map(|p| self.tally(p, now)).collect()
    }

    pub fn view(&self, poll_id: &str, now: DateTime<Utc>) -> Result<PollView, PollError> {
        let poll = self.find(poll_id)?;
        Ok(self.tally(poll, now))
    }

    fn find(&self, poll_id: &str) -> Result<&Poll, PollError> {
        self.polls
            .iter()
            .find(|p| p.id == poll_id)
            .ok_or_else(|| PollError::NotFound(poll_id.to_string()))
    }

    /// Validate and append a new, active poll.
    pub fn create_poll(
        &mut self,
        request: &CreatePollRequest,
        now: DateTime<Utc>,
    ) -> Result<Poll, PollError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(PollError::MissingField("title"));
        }

        let texts: Vec<&str> = request
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();
        if texts.len() < 2 {
            return Err(PollError::TooFewOptions);
        }

        let ends_at = match request.ends_at.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                parse_deadline(raw).ok_or_else(|| PollError::InvalidDeadline(raw.to_string()))?;
                Some(raw.to_string())
            }
        };

        let id = uuid::Uuid::new_v4().to_string();
        let poll = Poll {
            options: texts
                .iter()
                .enumerate()
                .map(|(index, text)| PollOption {
                    id: format!("{}_{}", id, index),
                    text: text.to_string(),
                    votes: 0,
                })
                .collect(),
            id,
            title: title.to_string(),
            description: request.description.trim().to_string(),
            is_active: true,
            created_at: now.to_rfc3339(),
            ends_at,
            allow_multiple: request.allow_multiple,
        };

        self.polls.push(poll.clone());
        Ok(poll)
    }

    /// Open or close a poll explicitly.
    pub fn set_active(&mut self, poll_id: &str, is_active: bool) -> Result<Poll, PollError> {
        let poll = self
            .polls
            .iter_mut()
            .find(|p| p.id == poll_id)
            .ok_or_else(|| PollError::NotFound(poll_id.to_string()))?;
        poll.is_active = is_active;
        Ok(poll.clone())
    }

    /// Record a vote.
    ///
    /// Single-choice polls keep only the voter's latest vote; multi-choice
    /// polls accept one vote per option per voter.
    pub fn cast_vote(
        &mut self,
        request: &CastVoteRequest,
        now: DateTime<Utc>,
    ) -> Result<(), PollError> {
        let poll_id = request.poll_id.trim();
        let option_id = request.option_id.trim();
        let voter_id = request.voter_id.trim();
        for (name, value) in [("pollId", poll_id), ("optionId", option_id), ("voterId", voter_id)] {
            if value.is_empty() {
                return Err(PollError::MissingField(name));
            }
        }

        let poll = self.find(poll_id)?;
        if !poll.is_active {
            return Err(PollError::Inactive);
        }
        if poll.has_ended(now) {
            return Err(PollError::Ended);
        }
        if !poll.options.iter().any(|o| o.id == option_id) {
            return Err(PollError::UnknownOption(option_id.to_string()));
        }

        if poll.allow_multiple {
            let duplicate = self.votes.iter().any(|v| {
                v.poll_id == poll_id && v.option_id == option_id && v.voter_id == voter_id
            });
            if duplicate {
                return Err(PollError::AlreadyVoted);
            }
        } else {
            self.votes
                .retain(|v| !(v.poll_id == poll_id && v.voter_id == voter_id));
        }

        self.votes.push(Vote {
            poll_id: poll_id.to_string(),
            option_id: option_id.to_string(),
            voter_id: voter_id.to_string(),
            timestamp: now.to_rfc3339(),
        });
        Ok(())
    }
}

impl StoredDocument for VotingDocument {
    const KEY: &'static str = "voting";

    fn default_document() -> Self {
        VotingDocument::default()
    }
}

/// Request body for `action: "create_poll"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub ends_at: Option<String>,
}

/// Request body for `action: "vote"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[serde(default)]
    pub poll_id: String,
    #[serde(default)]
    pub option_id: String,
    #[serde(default)]
    pub voter_id: String,
}

/// Request body for activating/deactivating a poll.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePollRequest {
    #[serde(default)]
    pub poll_id: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Query parameters for reading polls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollQuery {
    pub poll_id: Option<String>,
}
