//! Previews the column map staged for a JSON business update request.
//!
//! Reads one JSON object from stdin and prints the partial update that would
//! be handed to the record store.

#![forbid(unsafe_code)]

use std::env::{self, VarError};
use std::io::{self, Read};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use updatemap_application::UpdateMapService;
use updatemap_core::{AppError, AppResult, UserIdentity};
use updatemap_domain::{UpdateMap, update_request};

update_request! {
    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct UpdateBusinessRequest {
        #[patch(json = "display_name")]
        pub display_name: Option<String>,
        pub limit_24: Option<f64>,
        #[patch(json = "max_seats,omitempty")]
        pub max_seats: Option<u32>,
        #[patch(json = "is_verified", admin_only = "true")]
        pub is_verified: Option<bool>,
        #[patch(json = "credit_limit", admin_only = "true")]
        pub credit_limit: Option<i64>,
        #[patch(json = "opened_at")]
        pub opened_at: Option<DateTime<Utc>>,
        #[patch(json = "-")]
        pub audit_note: Option<String>,
        pub revision: u32,
    }
}

#[derive(Debug, Clone)]
struct PreviewConfig {
    actor_subject: String,
    actor_is_admin: bool,
}

impl PreviewConfig {
    fn load() -> AppResult<Self> {
        let actor_subject = env::var("UPDATEMAP_ACTOR_SUBJECT")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "preview".to_owned());
        let actor_is_admin =
            parse_env_bool("UPDATEMAP_ACTOR_IS_ADMIN", env::var("UPDATEMAP_ACTOR_IS_ADMIN"))?;

        Ok(Self {
            actor_subject,
            actor_is_admin,
        })
    }
}

fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = PreviewConfig::load()?;
    let actor = UserIdentity::new(config.actor_subject, config.actor_is_admin);

    let mut input = String::new();
    io::stdin().read_to_string(&mut input).map_err(|error| {
        AppError::Internal(format!("failed to read update request from stdin: {error}"))
    })?;

    let update_map = preview(&UpdateMapService::new(), &actor, input.as_str())?;

    info!(
        subject = actor.subject(),
        is_admin = actor.is_admin(),
        column_count = update_map.len(),
        "staged partial update preview"
    );

    let rendered = serde_json::to_string_pretty(&update_map.to_json())
        .map_err(|error| AppError::Internal(format!("failed to render update map: {error}")))?;
    println!("{rendered}");

    Ok(())
}

fn preview(service: &UpdateMapService, actor: &UserIdentity, input: &str) -> AppResult<UpdateMap> {
    let request: UpdateBusinessRequest = serde_json::from_str(input)
        .map_err(|error| AppError::Validation(format!("invalid update request: {error}")))?;

    service.create_update_map(actor, &request)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the rendered map.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn parse_env_bool(name: &str, value: Result<String, VarError>) -> AppResult<bool> {
    match value {
        Ok(value) => parse_bool(name, value.as_str()),
        Err(VarError::NotPresent) => Ok(false),
        Err(VarError::NotUnicode(_)) => Err(AppError::Validation(format!(
            "invalid {name} value: not valid unicode"
        ))),
    }
}

fn parse_bool(name: &str, value: &str) -> AppResult<bool> {
    match value.trim() {
        flag if flag.eq_ignore_ascii_case("true") => Ok(true),
        flag if flag.eq_ignore_ascii_case("false") || flag.is_empty() => Ok(false),
        _ => Err(AppError::Validation(format!(
            "invalid {name} value '{value}': expected true or false"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::env::VarError;
    use std::ffi::OsString;

    use serde_json::json;
    use updatemap_application::UpdateMapService;
    use updatemap_core::{AppError, UserIdentity};

    use super::{parse_bool, parse_env_bool, preview};

    #[test]
    fn previews_only_fields_present_in_the_request() {
        let actor = UserIdentity::new("preview", false);
        let input = r#"{
            "display_name": "",
            "limit_24": 0.0,
            "opened_at": "2024-02-29T08:00:00Z",
            "audit_note": "bulk import",
            "revision": 7
        }"#;

        let update_map = preview(&UpdateMapService::new(), &actor, input)
            .unwrap_or_else(|error| unreachable!("{error}"));

        assert_eq!(
            update_map.to_json(),
            json!({
                "display_name": "",
                "limit24": 0.0,
                "opened_at": "2024-02-29T08:00:00Z",
            })
        );
    }

    #[test]
    fn rejects_admin_only_fields_for_regular_actors() {
        let actor = UserIdentity::new("preview", false);

        let result = preview(
            &UpdateMapService::new(),
            &actor,
            r#"{ "max_seats": 5, "credit_limit": 100 }"#,
        );

        assert!(matches!(
            result,
            Err(AppError::Forbidden(message))
                if message == "Only admins can update field 'credit_limit'."
        ));
    }

    #[test]
    fn admins_may_set_admin_only_fields() {
        let actor = UserIdentity::new("ops", true);

        let update_map = preview(
            &UpdateMapService::new(),
            &actor,
            r#"{ "is_verified": false, "credit_limit": 100 }"#,
        )
        .unwrap_or_else(|error| unreachable!("{error}"));

        assert_eq!(
            update_map.to_json(),
            json!({ "credit_limit": 100, "is_verified": false })
        );
    }

    #[test]
    fn unknown_fields_are_invalid_input() {
        let actor = UserIdentity::new("preview", false);

        let result = preview(&UpdateMapService::new(), &actor, r#"{ "limit24": 1 }"#);

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn parses_boolean_flags() {
        assert!(matches!(parse_bool("FLAG", "TRUE"), Ok(true)));
        assert!(matches!(parse_bool("FLAG", " false "), Ok(false)));
        assert!(matches!(parse_bool("FLAG", ""), Ok(false)));
        assert!(parse_bool("FLAG", "yes").is_err());
    }

    #[test]
    fn missing_env_flag_defaults_to_false() {
        assert!(matches!(
            parse_env_bool("FLAG", Err(VarError::NotPresent)),
            Ok(false)
        ));
        assert!(matches!(
            parse_env_bool("FLAG", Ok("true".to_owned())),
            Ok(true)
        ));
    }

    #[test]
    fn non_unicode_env_flag_is_invalid() {
        let result = parse_env_bool("FLAG", Err(VarError::NotUnicode(OsString::from("yes"))));

        assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("FLAG")));
    }
}
