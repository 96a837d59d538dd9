mod models;

use crate::fdw::ms_teams_fdw::{MsTeamsFdwError, MsTeamsFdwResult, FDW_NAME};
use crate::stats;
use api_wrappers::prelude::*;
use reqwest::header;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

pub use models::MessageCard;
use models::{CollectionPage, TokenResponse};

const DEFAULT_API_URL: &str = "https://graph.microsoft.com/v1.0";
const DEFAULT_LOGIN_URL: &str = "https://login.microsoftonline.com";
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";
const GRAPH_OPTIONS: &[&str] = &["client_id", "client_secret", "tenant_id", "team_id"];

/// A connection to a Microsoft Teams workspace
///
/// The message methods mirror a connector card: set `title` and `text`, then
/// `send` posts the card as it currently is.
pub trait TeamsConnection {
    fn title(&mut self, title: &str);
    fn text(&mut self, text: &str);
    fn send(&mut self) -> MsTeamsFdwResult<()>;
    fn get_channels(&mut self) -> MsTeamsFdwResult<Vec<JsonValue>>;
}

// Graph API app registration, all or nothing
struct GraphConfig {
    api_url: Url,
    login_url: Url,
    client_id: String,
    client_secret: String,
    tenant_id: String,
    team_id: String,
}

// parse a base URL option, it must be able to take path segments
fn parse_base_url(opt_name: &str, value: &str) -> MsTeamsFdwResult<Url> {
    let invalid = |reason: String| OptionsError::OptionValueIsInvalid(opt_name.to_owned(), reason);
    let url = Url::parse(value).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()).into());
    }
    Ok(url)
}

// append raw segments to a base URL, each segment is percent-encoded
fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

impl GraphConfig {
    fn from_options(options: &HashMap<String, String>) -> MsTeamsFdwResult<Option<Self>> {
        if !GRAPH_OPTIONS.iter().any(|opt| options.contains_key(*opt)) {
            return Ok(None);
        }

        Ok(Some(Self {
            api_url: parse_base_url(
                "api_url",
                require_option_or("api_url", options, DEFAULT_API_URL),
            )?,
            login_url: parse_base_url(
                "login_url",
                require_option_or("login_url", options, DEFAULT_LOGIN_URL),
            )?,
            client_id: require_option("client_id", options)?.to_owned(),
            client_secret: require_option("client_secret", options)?.to_owned(),
            tenant_id: require_option("tenant_id", options)?.to_owned(),
            team_id: require_option("team_id", options)?.to_owned(),
        }))
    }

    fn token_url(&self) -> Url {
        join_segments(
            &self.login_url,
            &[self.tenant_id.as_str(), "oauth2", "v2.0", "token"],
        )
    }

    fn channels_url(&self) -> Url {
        join_segments(&self.api_url, &["teams", self.team_id.as_str(), "channels"])
    }
}

/// Microsoft Teams client
///
/// Messages go to a channel incoming webhook, channel listing goes through the
/// Microsoft Graph API with an app-only access token.
pub struct MsTeamsClient {
    rt: Arc<Runtime>,
    client: reqwest::Client,
    webhook_url: Option<Url>,
    graph: Option<GraphConfig>,
    card: MessageCard,
    access_token: Option<String>,
}

impl MsTeamsClient {
    pub(crate) fn new(
        rt: Arc<Runtime>,
        options: &HashMap<String, String>,
    ) -> MsTeamsFdwResult<Self> {
        let webhook_url = options
            .get("webhook_url")
            .map(|url| {
                Url::parse(url).map_err(|err| {
                    OptionsError::OptionValueIsInvalid("webhook_url".to_owned(), err.to_string())
                })
            })
            .transpose()?;
        let graph = GraphConfig::from_options(options)?;
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            rt,
            client,
            webhook_url,
            graph,
            card: MessageCard::default(),
            access_token: None,
        })
    }

    fn graph(&self) -> MsTeamsFdwResult<&GraphConfig> {
        self.graph.as_ref().ok_or_else(|| {
            OptionsError::OptionNameNotFound(GRAPH_OPTIONS.join(", ")).into()
        })
    }

    // read body text and fail on non-2xx status
    fn read_body(
        &self,
        endpoint: &'static str,
        resp: reqwest::Response,
    ) -> MsTeamsFdwResult<String> {
        let status = resp.status();
        let body = self.rt.block_on(resp.text())?;
        if !status.is_success() {
            return Err(MsTeamsFdwError::HttpStatus {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn fetch_access_token(&self) -> MsTeamsFdwResult<String> {
        let graph = self.graph()?;
        let params = [
            ("client_id", graph.client_id.as_str()),
            ("client_secret", graph.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];
        let resp = self
            .rt
            .block_on(self.client.post(graph.token_url()).form(&params).send())?;
        let body = self.read_body("token", resp)?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        if token.access_token.is_empty() {
            return Err(MsTeamsFdwError::InvalidResponse(
                "empty access token".to_string(),
            ));
        }
        log_debug1(&format!(
            "acquired {} token, expires in {:?}s",
            token.token_type.as_deref().unwrap_or("access"),
            token.expires_in
        ));
        Ok(token.access_token)
    }

    fn access_token(&mut self) -> MsTeamsFdwResult<String> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }
        let token = self.fetch_access_token()?;
        self.access_token = Some(token.clone());
        Ok(token)
    }

    /// Check that the configured endpoints are usable
    ///
    /// The webhook URL must be set. If Graph credentials are configured, an
    /// access token is acquired with them.
    pub(crate) fn check(&mut self) -> MsTeamsFdwResult<()> {
        if self.webhook_url.is_none() {
            return Err(OptionsError::OptionNameNotFound("webhook_url".to_string()).into());
        }
        if self.graph.is_some() {
            self.access_token()?;
        }
        Ok(())
    }
}

impl TeamsConnection for MsTeamsClient {
    fn title(&mut self, title: &str) {
        self.card.title = if title.is_empty() {
            None
        } else {
            Some(title.to_owned())
        };
    }

    fn text(&mut self, text: &str) {
        self.card.text = text.to_owned();
    }

    fn send(&mut self) -> MsTeamsFdwResult<()> {
        let url = self
            .webhook_url
            .clone()
            .ok_or_else(|| OptionsError::OptionNameNotFound("webhook_url".to_string()))?;
        let body = serde_json::to_string(&self.card)?;
        let body_len = body.len() as i64;

        // the webhook URL embeds its secret, keep it out of error messages
        let resp = self
            .rt
            .block_on(
                self.client
                    .post(url)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .send(),
            )
            .map_err(|err| err.without_url())?;

        // connector webhooks answer "1" on delivery and may report failures
        // with a 2xx status and an error text, workflow webhooks answer empty
        let body = self.read_body("webhook", resp)?;
        let body = body.trim();
        if !body.is_empty() && body != "1" {
            return Err(MsTeamsFdwError::InvalidResponse(format!(
                "webhook rejected the message: {}",
                body
            )));
        }

        stats::inc_stats(FDW_NAME, stats::Metric::BytesOut, body_len);
        Ok(())
    }

    fn get_channels(&mut self) -> MsTeamsFdwResult<Vec<JsonValue>> {
        let token = self.access_token()?;
        let mut url = self.graph()?.channels_url();
        let mut channels = Vec::new();

        loop {
            let resp = self
                .rt
                .block_on(self.client.get(url.clone()).bearer_auth(&token).send())?;
            let body = self.read_body("channels", resp)?;
            stats::inc_stats(FDW_NAME, stats::Metric::BytesIn, body.len() as i64);

            let page: CollectionPage = serde_json::from_str(&body)?;
            channels.extend(page.value);

            match page.next_link {
                Some(next_link) => url = Url::parse(&next_link)?,
                None => break,
            }
        }

        stats::inc_stats(FDW_NAME, stats::Metric::RowsIn, channels.len() as i64);
        Ok(channels)
    }
}
