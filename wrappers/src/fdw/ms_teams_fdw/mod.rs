#![allow(clippy::module_inception)]
mod ms_teams_client;
mod ms_teams_handler;
mod ms_teams_tables;

use thiserror::Error;

use api_wrappers::prelude::{CreateRuntimeError, OptionsError, QueryError};

pub use ms_teams_client::{MessageCard, MsTeamsClient, TeamsConnection};
pub use ms_teams_handler::{Connect, MsTeamsHandler, StatusResponse};
pub use ms_teams_tables::{ChannelsTable, MessageRecord, MessagesTable};

pub(crate) const FDW_NAME: &str = "MsTeamsFdw";

#[derive(Error, Debug)]
pub enum MsTeamsFdwError {
    #[error("{0}")]
    QueryError(#[from] QueryError),

    #[error("invalid options: {0}")]
    OptionsError(#[from] OptionsError),

    #[error("{0}")]
    CreateRuntimeError(#[from] CreateRuntimeError),

    #[error("parse url failed: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("parse JSON failed: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("{endpoint} request failed with status {status}: {body}")]
    HttpStatus {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("failed to send message {index} of {total}: {source}")]
    MessageSendFailed {
        index: usize,
        total: usize,
        #[source]
        source: Box<MsTeamsFdwError>,
    },
}

pub type MsTeamsFdwResult<T> = Result<T, MsTeamsFdwError>;
