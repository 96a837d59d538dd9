use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("required option `{0}` is not specified")]
    OptionNameNotFound(String),
    #[error("option `{0}` has an invalid value: {1}")]
    OptionValueIsInvalid(String, String),
}

/// Get required option value from the `options` map
///
/// Get the required option's value from `options` map, return an error if it
/// does not exist.
///
/// For example,
///
/// ```rust
/// # use api_wrappers::prelude::require_option;
/// # use std::collections::HashMap;
/// # use api_wrappers::options::OptionsError;
/// # fn main() -> Result<(), OptionsError> {
/// # let options = HashMap::from([("my_option".to_string(), "foo".to_string())]);
/// assert_eq!(require_option("my_option", &options)?, "foo");
/// # Ok(())
/// # }
/// ```
pub fn require_option<'map>(
    opt_name: &str,
    options: &'map HashMap<String, String>,
) -> Result<&'map str, OptionsError> {
    options
        .get(opt_name)
        .map(|t| t.as_ref())
        .ok_or_else(|| OptionsError::OptionNameNotFound(opt_name.to_string()))
}

/// Get required option value from the `options` map or a provided default
///
/// ```rust
/// # use api_wrappers::prelude::require_option_or;
/// # use std::collections::HashMap;
/// # let options = HashMap::new();
/// assert_eq!(require_option_or("my_option", &options, "default value"), "default value");
/// ```
pub fn require_option_or<'a>(
    opt_name: &str,
    options: &'a HashMap<String, String>,
    default: &'a str,
) -> &'a str {
    options.get(opt_name).map(|t| t.as_ref()).unwrap_or(default)
}

/// Check if the option list contains a specific option
///
/// The option list holds `name=value` entries as they come in from a
/// `CREATE SERVER ... OPTIONS (...)` style definition.
pub fn check_options_contain(opt_list: &[Option<String>], tgt: &str) -> Result<(), OptionsError> {
    let search_key = format!("{}=", tgt);
    let valid = opt_list
        .iter()
        .flatten()
        .any(|a| a.starts_with(&search_key));
    if valid {
        Ok(())
    } else {
        Err(OptionsError::OptionNameNotFound(tgt.to_string()))
    }
}

/// Convert a `name=value` option list to a hashmap, entries without `=` are skipped
pub fn options_to_hashmap(opt_list: &[Option<String>]) -> HashMap<String, String> {
    opt_list
        .iter()
        .flatten()
        .filter_map(|opt| opt.split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .collect()
}
