use super::ms_teams_client::{MsTeamsClient, TeamsConnection};
use super::ms_teams_tables::{
    ChannelsTable, MessagesTable, CHANNELS_TABLE, MESSAGES_TABLE,
};
use super::{MsTeamsFdwError, MsTeamsFdwResult, FDW_NAME};
use crate::stats;
use api_wrappers::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Something that can open a connection to Microsoft Teams
///
/// Tables only hold a reference to their handler and ask it for a fresh
/// connection on every statement.
pub trait Connect {
    type Connection: TeamsConnection;

    fn connect(&self) -> MsTeamsFdwResult<Self::Connection>;
}

/// Outcome of [`MsTeamsHandler::check_connection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub success: bool,
    pub error_message: Option<String>,
}

/// Microsoft Teams handler
///
/// Owns the server options and the async runtime, and dispatches parsed
/// statements to the `messages` and `channels` tables.
pub struct MsTeamsHandler {
    options: HashMap<String, String>,
    rt: Arc<Runtime>,
}

impl MsTeamsHandler {
    // 'options' is the key-value pairs defined for the server, for example,
    //
    //   webhook_url   'https://example.webhook.office.com/webhookb2/...',
    //   client_id     '...',
    //   client_secret '...',
    //   tenant_id     '...',
    //   team_id       '...'
    //
    // Only save them here, the remote API is not called until a statement
    // needs it.
    pub fn new(options: &HashMap<String, String>) -> MsTeamsFdwResult<Self> {
        let rt = create_async_runtime()?;

        stats::inc_stats(FDW_NAME, stats::Metric::CreateTimes, 1);
        Ok(Self {
            options: options.clone(),
            rt: Arc::new(rt),
        })
    }

    /// Validate a `name=value` server option list
    pub fn validator(options: &[Option<String>]) -> MsTeamsFdwResult<()> {
        check_options_contain(options, "webhook_url")?;

        let graph_opts = ["client_id", "client_secret", "tenant_id", "team_id"];
        if graph_opts
            .iter()
            .any(|opt| check_options_contain(options, opt).is_ok())
        {
            for opt in graph_opts {
                check_options_contain(options, opt)?;
            }
        }

        Ok(())
    }

    pub fn table_names(&self) -> Vec<&'static str> {
        vec![CHANNELS_TABLE, MESSAGES_TABLE]
    }

    pub fn get_table(
        &self,
        name: &str,
    ) -> MsTeamsFdwResult<Box<dyn ApiTable<MsTeamsFdwError> + '_>> {
        match name {
            CHANNELS_TABLE => Ok(Box::new(ChannelsTable::new(self))),
            MESSAGES_TABLE => Ok(Box::new(MessagesTable::new(self))),
            _ => Err(QueryError::UnknownTable(name.to_owned()).into()),
        }
    }

    pub fn get_columns(&self, table: &str) -> MsTeamsFdwResult<Vec<String>> {
        Ok(self.get_table(table)?.get_columns())
    }

    /// Run a parsed statement, `SELECT` returns a table and `INSERT` returns `None`
    pub fn query(&self, statement: &Statement) -> MsTeamsFdwResult<Option<Table>> {
        let table = self.get_table(statement.table_name())?;
        match statement {
            Statement::Select(select) => table.select(select).map(Some),
            Statement::Insert(insert) => table.insert(insert).map(|_| None),
        }
    }

    pub fn check_connection(&self) -> StatusResponse {
        match self.connect().and_then(|mut client| client.check()) {
            Ok(()) => StatusResponse {
                success: true,
                error_message: None,
            },
            Err(err) => {
                report_error(&format!("Error connecting to Microsoft Teams: {}", err));
                StatusResponse {
                    success: false,
                    error_message: Some(sanitize_error_message(&err.to_string())),
                }
            }
        }
    }
}

impl Connect for MsTeamsHandler {
    type Connection = MsTeamsClient;

    fn connect(&self) -> MsTeamsFdwResult<MsTeamsClient> {
        MsTeamsClient::new(self.rt.clone(), &self.options)
    }
}

impl fmt::Debug for MsTeamsHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut options: Vec<(&String, String)> = self
            .options
            .iter()
            .map(|(name, value)| {
                if is_sensitive_option(name) {
                    (name, mask_credential_value(value))
                } else {
                    (name, value.clone())
                }
            })
            .collect();
        options.sort();
        f.debug_struct("MsTeamsHandler")
            .field("options", &options)
            .finish()
    }
}
