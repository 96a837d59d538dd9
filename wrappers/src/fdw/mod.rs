#[cfg(feature = "ms_teams_fdw")]
pub mod ms_teams_fdw;
