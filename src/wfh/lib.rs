//! `/wfh` slash command: announces that someone is working from home, today,
//! tomorrow or on Monday depending on the team's local time, optionally with a
//! randomly picked excuse image.
//!
//! The HTTP server and Lambda shells both go through [`Wfh::respond`] and
//! only differ in how the resulting JSON is delivered.

pub mod attachment;
pub mod config;
pub mod delivery;
pub mod errors;
pub mod message;
pub mod slack;
pub mod types;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

pub use config::{Config, ResponseMode, Zone};
pub use delivery::{Deliverer, JSON_CONTENT_TYPE};
pub use errors::{ConfigError, DecodeError, DeliveryError, HandlerError, WfhError};
pub use slack::encode_response;
pub use types::{Attachment, CommandRequest, CommandResponse, Field, ResponseType};

pub const COMMAND: &str = "/wfh";

/// A request that passed decoding and handling, ready to send.
#[derive(Debug, Clone)]
pub struct Reply {
    pub request: CommandRequest,
    pub body: String,
}

impl Reply {
    /// Where the body should go: `None` means answer inline.
    pub fn callback_url(&self, mode: ResponseMode) -> Option<&str> {
        match mode {
            ResponseMode::Callback if !self.request.response_url.is_empty() => {
                Some(self.request.response_url.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wfh {
    config: Config,
}

impl Wfh {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handle(&self, request: &CommandRequest) -> Result<CommandResponse, HandlerError> {
        self.handle_at(request, Utc::now(), &mut rand::thread_rng())
    }

    pub fn handle_at<R: Rng + ?Sized>(
        &self,
        request: &CommandRequest,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<CommandResponse, HandlerError> {
        if request.command != COMMAND {
            return Err(HandlerError::UnknownCommand(request.command.clone()));
        }

        let local = self.config.zone.local_time(now);
        let template = message::select_template(local);
        let mut response =
            CommandResponse::in_channel(message::compose(template, &request.user_id, &request.text));

        if let Some(images) = &self.config.images {
            response.add_attachment(images.pick(rng));
        }

        info!(
            user_id = %request.user_id,
            team_id = %request.team_id,
            template = ?template,
            local_time = %local,
            "handled /wfh"
        );

        Ok(response)
    }

    /// Decodes a form body, handles it and encodes the JSON reply.
    pub fn respond(&self, body: &str) -> Result<Reply, WfhError> {
        let request = CommandRequest::from_form(body)?;
        let response = self.handle(&request)?;
        let body = encode_response(&response)?;

        Ok(Reply { request, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::ImageSet;
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;

    fn request(text: &str) -> CommandRequest {
        CommandRequest {
            command: COMMAND.to_string(),
            user_id: "U1".to_string(),
            text: text.to_string(),
            ..CommandRequest::default()
        }
    }

    fn sydney(images: Option<ImageSet>) -> Wfh {
        Wfh::new(Config::new(Zone::Named(chrono_tz::Australia::Sydney), images))
    }

    // Local Sydney wall-clock time (AEST, UTC+10 in June) as a UTC instant.
    fn sydney_time(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        chrono_tz::Australia::Sydney
            .with_ymd_and_hms(2024, 6, day, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn wednesday_morning_without_images() {
        let wfh = sydney(None);
        // 2024-06-05 is a Wednesday.
        let response = wfh
            .handle_at(&request(""), sydney_time(5, 9, 0), &mut StepRng::new(0, 1))
            .unwrap();

        assert_eq!(
            encode_response(&response).unwrap(),
            r#"{"response_type":"in_channel","text":"<@U1> is working from home today"}"#
        );
    }

    #[test]
    fn friday_after_cutoff_announces_monday() {
        let wfh = sydney(None);
        let response = wfh
            .handle_at(&request(""), sydney_time(7, 10, 20), &mut StepRng::new(0, 1))
            .unwrap();

        assert!(response.text.ends_with("will be working from home on Monday"));
    }

    #[test]
    fn cutoff_is_evaluated_in_configured_zone() {
        let wfh = sydney(None);
        // 00:30 UTC Wednesday is 10:30 Wednesday in Sydney.
        let now = Utc.with_ymd_and_hms(2024, 6, 5, 0, 30, 0).unwrap();

        let response = wfh.handle_at(&request(""), now, &mut StepRng::new(0, 1)).unwrap();

        assert_eq!(response.text, "<@U1> will be working from home tomorrow");
    }

    #[test]
    fn text_is_echoed() {
        let wfh = sydney(None);
        let response = wfh
            .handle_at(&request("hello"), sydney_time(5, 9, 0), &mut StepRng::new(0, 1))
            .unwrap();

        assert!(response.text.ends_with(": _hello_"));
    }

    #[test]
    fn images_add_one_attachment() {
        let wfh = sydney(ImageSet::new("https://storage.googleapis.com/wfh", 250));
        let response = wfh
            .handle_at(&request(""), sydney_time(5, 9, 0), &mut StepRng::new(0, 0))
            .unwrap();

        assert_eq!(response.attachments.len(), 1);
        assert_eq!(
            response.attachments[0].image_url.as_deref(),
            Some("https://storage.googleapis.com/wfh/356a192b7913b04c54574d18c28d46e6395428ab.jpg")
        );
    }

    #[test]
    fn other_commands_are_rejected() {
        let wfh = sydney(None);
        let mut lunch = request("");
        lunch.command = "/lunch".to_string();

        let result = wfh.handle_at(&lunch, sydney_time(5, 9, 0), &mut StepRng::new(0, 1));

        assert!(matches!(result, Err(HandlerError::UnknownCommand(command)) if command == "/lunch"));
    }

    #[test]
    fn respond_maps_failures_to_status_codes() {
        let wfh = sydney(None);

        let empty = wfh.respond("").unwrap_err();
        assert_eq!(empty.status_code(), 400);

        let wrong = wfh.respond("command=%2Flunch&user_id=U1").unwrap_err();
        assert_eq!(wrong.status_code(), 500);
    }

    #[test]
    fn respond_keeps_request_for_delivery() {
        let wfh = sydney(None);

        let reply = wfh
            .respond("command=%2Fwfh&user_id=U1&response_url=https%3A%2F%2Fhooks.slack.com%2Fx")
            .unwrap();

        assert_eq!(reply.callback_url(ResponseMode::Callback), Some("https://hooks.slack.com/x"));
        assert_eq!(reply.callback_url(ResponseMode::Inline), None);
        assert!(reply.body.starts_with(r#"{"response_type":"in_channel","text":"<@U1> "#));
    }

    #[test]
    fn missing_response_url_falls_back_to_inline() {
        let wfh = sydney(None);

        let reply = wfh.respond("command=%2Fwfh&user_id=U1").unwrap();

        assert_eq!(reply.callback_url(ResponseMode::Callback), None);
    }
}
