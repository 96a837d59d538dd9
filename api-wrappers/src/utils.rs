//! Helper functions for working with API tables
//!

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

/// Option names that are considered sensitive and should be masked in
/// messages and debug output.
const SENSITIVE_OPTION_NAMES: &[&str] = &[
    "password",
    "secret",
    "token",
    "api_key",
    "apikey",
    "access_token",
    "refresh_token",
    "private_key",
    "credential",
    "client_secret",
    "webhook_url",
    "connection_string",
];

/// Masks a credential value for safe display.
///
/// Shows only the first 4 characters followed by asterisks if the value is
/// long enough, otherwise masks the entire value.
///
/// # Examples
/// ```
/// # use api_wrappers::utils::mask_credential_value;
/// assert_eq!(mask_credential_value("wJalrXUtnFEMI/EXAMPLEKEY"), "wJal***");
/// assert_eq!(mask_credential_value("abc"), "***");
/// ```
#[inline]
pub fn mask_credential_value(value: &str) -> String {
    match value.char_indices().nth(4) {
        Some((idx, _)) => format!("{}***", &value[..idx]),
        None => "***".to_string(),
    }
}

/// Checks if an option name is considered sensitive, case insensitive.
///
/// # Examples
/// ```
/// # use api_wrappers::utils::is_sensitive_option;
/// assert!(is_sensitive_option("CLIENT_SECRET"));
/// assert!(!is_sensitive_option("team_id"));
/// ```
#[inline]
pub fn is_sensitive_option(option_name: &str) -> bool {
    let lower = option_name.to_ascii_lowercase();
    SENSITIVE_OPTION_NAMES.iter().any(|&s| lower.contains(s))
}

/// Masks credential values in a message string.
///
/// Handles `key = 'value'`, `"key": "value"` and `key=value` forms.
///
/// # Examples
/// ```
/// # use api_wrappers::utils::mask_credentials_in_message;
/// let msg = "token request failed: client_secret = 'wJalrXUtnFEMI/EXAMPLEKEY'";
/// let masked = mask_credentials_in_message(msg);
/// assert!(!masked.contains("wJalrXUtnFEMI"));
/// assert!(masked.contains("wJal***"));
/// ```
pub fn mask_credentials_in_message(message: &str) -> String {
    let mut result = message.to_string();

    for sensitive_name in SENSITIVE_OPTION_NAMES {
        // resume after each masked value so that masks are not masked again
        let mut search_from = 0;

        while search_from < result.len() {
            let lower_result = result.to_ascii_lowercase();
            let Some(found) = lower_result[search_from..].find(sensitive_name) else {
                break;
            };
            let name_end = search_from + found + sensitive_name.len();

            // value starts after the first `=` or `:` following the name,
            // skipping the closing quote of a JSON key
            let after_name = &result[name_end..];
            let Some(sep) = after_name.find(['=', ':']) else {
                break;
            };
            if !after_name[..sep]
                .chars()
                .all(|c| c.is_whitespace() || c == '"' || c == '\'')
            {
                search_from = name_end;
                continue;
            }

            let value_area = &result[name_end + sep + 1..];
            let trimmed = value_area.trim_start();
            let value_start = name_end + sep + 1 + (value_area.len() - trimmed.len());

            let (start, len) = match trimmed.chars().next() {
                Some(q @ ('\'' | '"')) => match trimmed[1..].find(q) {
                    Some(end) => (value_start + 1, end),
                    None => break,
                },
                _ => (
                    value_start,
                    trimmed
                        .find(|c: char| c.is_whitespace() || ",;)&".contains(c))
                        .unwrap_or(trimmed.len()),
                ),
            };

            if len == 0 {
                search_from = name_end;
                continue;
            }

            let masked = mask_credential_value(&result[start..start + len]);
            result.replace_range(start..start + len, &masked);
            search_from = start + masked.len();
        }
    }

    result
}

/// Creates a sanitized message by masking any credential values.
///
/// # Examples
/// ```
/// # use api_wrappers::utils::sanitize_error_message;
/// let error = "connect failed with password='secret123' for user 'admin'";
/// let safe_error = sanitize_error_message(error);
/// assert!(!safe_error.contains("secret123"));
/// ```
#[inline]
pub fn sanitize_error_message(message: &str) -> String {
    mask_credentials_in_message(message)
}

/// Log debug message
///
/// Emits a `DEBUG` level event under the `wrappers` target, enable it with a
/// filter such as `RUST_LOG=wrappers=debug`.
#[inline]
pub fn log_debug1(msg: &str) {
    tracing::debug!(target: "wrappers", "wrappers: {}", msg);
}

/// Report info
///
/// ```rust,no_run
/// # use api_wrappers::prelude::report_info;
/// report_info(&format!("this is an info"));
/// ```
#[inline]
pub fn report_info(msg: &str) {
    tracing::info!(target: "wrappers", "{}", msg);
}

/// Report notice, a user-facing info that is not part of the normal flow
#[inline]
pub fn report_notice(msg: &str) {
    tracing::info!(target: "wrappers", notice = true, "{}", msg);
}

/// Report warning
#[inline]
pub fn report_warning(msg: &str) {
    tracing::warn!(target: "wrappers", "{}", msg);
}

/// Report error
///
/// Credential values in the message are masked before it is emitted. This
/// only logs, the caller is still responsible for returning the error.
///
/// ```rust,no_run
/// # use api_wrappers::prelude::report_error;
/// report_error(&format!("target column number not match"));
/// ```
#[inline]
pub fn report_error(msg: &str) {
    tracing::error!(target: "wrappers", "{}", sanitize_error_message(msg));
}

#[derive(Error, Debug)]
pub enum CreateRuntimeError {
    #[error("failed to create async runtime: {0}")]
    FailedToCreateAsyncRuntime(#[from] std::io::Error),
}

/// Create a Tokio async runtime
///
/// Use this runtime to run async code in `block` mode. Table callbacks are
/// synchronous, so async clients are driven with `block_on`.
///
/// For example,
///
/// ```rust,no_run
/// # use api_wrappers::utils::CreateRuntimeError;
/// # fn main() -> Result<(), CreateRuntimeError> {
/// # use api_wrappers::prelude::create_async_runtime;
/// # struct Client {
/// # }
/// # impl Client {
/// #     async fn query(&self, _sql: &str) -> Result<(), ()> { Ok(()) }
/// # }
/// # let client = Client {};
/// # let sql = "";
/// let rt = create_async_runtime()?;
///
/// // client.query() is an async function returning a Result
/// match rt.block_on(client.query(&sql)) {
///     Ok(result) => { }
///     Err(err) => { }
/// }
/// # Ok(())
/// # }
/// ```
#[inline]
pub fn create_async_runtime() -> Result<Runtime, CreateRuntimeError> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

fn flatten_into(prefix: Option<&str>, value: &JsonValue, out: &mut Map<String, JsonValue>) {
    match value {
        JsonValue::Object(obj) if !obj.is_empty() => {
            for (key, val) in obj {
                let path = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key.clone(),
                };
                flatten_into(Some(&path), val, out);
            }
        }
        _ => {
            out.insert(prefix.unwrap_or("value").to_owned(), value.clone());
        }
    }
}

/// Flatten nested JSON objects into a single-level map with dotted-path keys
///
/// Arrays and empty objects are kept as leaf values. A non-object top level
/// value is stored under the `value` key.
///
/// ```rust
/// # use api_wrappers::utils::flatten_json;
/// # use serde_json::json;
/// let flat = flatten_json(&json!({"id": "1", "owner": {"name": "Ada", "tags": [1]}}));
/// assert_eq!(flat["id"], json!("1"));
/// assert_eq!(flat["owner.name"], json!("Ada"));
/// assert_eq!(flat["owner.tags"], json!([1]));
/// ```
pub fn flatten_json(value: &JsonValue) -> Map<String, JsonValue> {
    let mut out = Map::new();
    flatten_into(None, value, &mut out);
    out
}
