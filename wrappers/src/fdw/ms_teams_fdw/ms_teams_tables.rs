use super::ms_teams_handler::Connect;
use super::ms_teams_client::TeamsConnection;
use super::{MsTeamsFdwError, MsTeamsFdwResult, FDW_NAME};
use crate::stats;
use api_wrappers::prelude::*;
use serde_json::Value as JsonValue;

pub(crate) const MESSAGES_TABLE: &str = "messages";
pub(crate) const CHANNELS_TABLE: &str = "channels";

/// One message to post, validated from an inserted row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub title: Option<String>,
    pub text: String,
}

impl MessageRecord {
    fn cell_text(cell: &Cell) -> String {
        match cell.as_str() {
            Some(s) => s.to_owned(),
            None => cell.to_string(),
        }
    }

    /// Build a record from an inserted row, `row_no` is 1-based
    pub fn from_row(row_no: usize, row: &Row) -> Result<Self, QueryError> {
        let text = row
            .get("text")
            .map(Self::cell_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| QueryError::MandatoryValueMissing {
                column: "text".to_string(),
                row: row_no,
            })?;
        let title = row
            .get("title")
            .map(Self::cell_text)
            .filter(|title| !title.is_empty());

        Ok(Self { title, text })
    }
}

/// The Microsoft Teams messages table
///
/// Write only. Every inserted row is posted to the channel behind the
/// configured incoming webhook.
pub struct MessagesTable<'a, H: Connect> {
    handler: &'a H,
}

impl<'a, H: Connect> MessagesTable<'a, H> {
    const SUPPORTED_COLUMNS: &'static [&'static str] = &["text", "title"];
    const MANDATORY_COLUMNS: &'static [&'static str] = &["text"];

    pub fn new(handler: &'a H) -> Self {
        Self { handler }
    }

    /// Send messages in order, stopping at the first failure
    pub fn send_message(&self, messages: &[MessageRecord]) -> MsTeamsFdwResult<()> {
        let mut teams = self.handler.connect()?;
        let total = messages.len();

        for (idx, message) in messages.iter().enumerate() {
            teams.title(message.title.as_deref().unwrap_or(""));
            teams.text(&message.text);
            if let Err(err) = teams.send() {
                report_error(&format!(
                    "Error sending message to Microsoft Teams channel: {}",
                    err
                ));
                return Err(MsTeamsFdwError::MessageSendFailed {
                    index: idx + 1,
                    total,
                    source: Box::new(err),
                });
            }
            stats::inc_stats(FDW_NAME, stats::Metric::RowsOut, 1);
            report_info("Message sent to Microsoft Teams channel successfully.");
        }

        Ok(())
    }
}

impl<'a, H: Connect> ApiTable<MsTeamsFdwError> for MessagesTable<'a, H> {
    fn name(&self) -> &str {
        MESSAGES_TABLE
    }

    fn get_columns(&self) -> Vec<String> {
        Self::SUPPORTED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn insert(&self, query: &Insert) -> MsTeamsFdwResult<()> {
        if query.table != MESSAGES_TABLE {
            return Err(QueryError::TableMismatch {
                expected: MESSAGES_TABLE.to_string(),
                actual: query.table.clone(),
            }
            .into());
        }

        let parser = InsertQueryParser::new(
            query,
            Self::SUPPORTED_COLUMNS,
            Self::MANDATORY_COLUMNS,
            false,
        );
        let messages = parser
            .parse_query()?
            .iter()
            .enumerate()
            .map(|(idx, row)| MessageRecord::from_row(idx + 1, row))
            .collect::<Result<Vec<_>, _>>()?;

        self.send_message(&messages)
    }
}

/// The Microsoft Teams channels table
///
/// Read only. Lists every channel of the configured team.
pub struct ChannelsTable<'a, H: Connect> {
    handler: &'a H,
}

impl<'a, H: Connect> ChannelsTable<'a, H> {
    const COLUMNS: [&'static str; 9] = [
        "id",
        "createdDateTime",
        "displayName",
        "description",
        "isFavoriteByDefault",
        "email",
        "tenantId",
        "webUrl",
        "membershipType",
    ];

    pub fn new(handler: &'a H) -> Self {
        Self { handler }
    }

    pub fn get_channels(&self) -> MsTeamsFdwResult<Vec<JsonValue>> {
        let mut api_client = self.handler.connect()?;
        api_client.get_channels()
    }

    // normalize a channel object into a row of the declared columns
    fn channel_to_row(channel: &JsonValue) -> Row {
        let flat = flatten_json(channel);
        let mut row = Row::new();
        for col in Self::COLUMNS {
            row.push(col, flat.get(col).and_then(Cell::from_json));
        }
        row
    }
}

impl<'a, H: Connect> ApiTable<MsTeamsFdwError> for ChannelsTable<'a, H> {
    fn name(&self) -> &str {
        CHANNELS_TABLE
    }

    fn get_columns(&self) -> Vec<String> {
        Self::COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn select(&self, query: &Select) -> MsTeamsFdwResult<Table> {
        let columns = self.get_columns();
        let clauses = SelectQueryParser::new(query, CHANNELS_TABLE, &columns).parse_query()?;

        // the channel list endpoint takes no filter, sort or paging
        // parameters, so the parsed clauses are handed back unapplied
        let residual = Residual {
            quals: clauses.quals,
            sorts: clauses.sorts,
            limit: clauses.limit,
        };
        if !residual.is_empty() {
            log_debug1(&format!(
                "{}: returning all channels, residual = {:?}",
                CHANNELS_TABLE, residual
            ));
        }

        let rows: Vec<Row> = self
            .get_channels()?
            .iter()
            .map(Self::channel_to_row)
            .collect();
        stats::inc_stats(FDW_NAME, stats::Metric::RowsOut, rows.len() as i64);

        Ok(Table {
            columns: columns
                .into_iter()
                .enumerate()
                .map(|(idx, name)| Column { name, num: idx + 1 })
                .collect(),
            rows,
            residual,
        })
    }
}
