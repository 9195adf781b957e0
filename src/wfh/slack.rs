use std::collections::HashMap;

use crate::errors::{DecodeError, HandlerError};
use crate::types::{CommandRequest, CommandResponse};

impl CommandRequest {
    /// Decodes an `application/x-www-form-urlencoded` slash command body.
    ///
    /// Keys Slack did not send come back as empty strings; keys this service
    /// does not know about (`api_app_id`, `is_enterprise_install`, ...) are
    /// ignored. When a key repeats, its first value wins.
    pub fn from_form(body: &str) -> Result<Self, DecodeError> {
        if body.trim().is_empty() {
            return Err(DecodeError::EmptyBody);
        }
        check_escapes(body)?;

        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)?;
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in pairs {
            params.entry(key).or_insert(value);
        }
        let field = |name: &str| params.get(name).cloned().unwrap_or_default();

        Ok(CommandRequest {
            token: field("token"),
            team_id: field("team_id"),
            team_domain: field("team_domain"),
            enterprise_id: field("enterprise_id"),
            enterprise_name: field("enterprise_name"),
            channel_id: field("channel_id"),
            channel_name: field("channel_name"),
            user_id: field("user_id"),
            user_name: field("user_name"),
            command: field("command"),
            text: field("text"),
            response_url: field("response_url"),
            trigger_id: field("trigger_id"),
        })
    }
}

/// Every `%` must start a two-digit hex escape; the form decoder would
/// otherwise pass a broken escape through as literal text.
fn check_escapes(body: &str) -> Result<(), DecodeError> {
    let bytes = body.as_bytes();
    for (offset, _) in body.match_indices('%') {
        let valid = bytes
            .get(offset + 1..offset + 3)
            .is_some_and(|digits| digits.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(DecodeError::InvalidEscape(offset));
        }
    }
    Ok(())
}

/// Serializes a response for Slack. `serde_json` leaves `<`, `>` and `&`
/// alone, so mention syntax such as `<@U123>` reaches Slack verbatim.
pub fn encode_response(response: &CommandResponse) -> Result<String, HandlerError> {
    Ok(serde_json::to_string(response)?)
}
