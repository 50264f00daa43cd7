//! Wire format of the chat slash-command webhook, delivered through an
//! HTTP gateway event whose `body` is the form-encoded Slack payload.

use crate::application::command::{CommandReply, SlashCommand};
use crate::domain::user::ResolvedUser;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
pub struct SlashCommandEvent {
    pub body: String,
}

impl SlashCommandEvent {
    /// Extracts the caller and command text from the form body.
    ///
    /// Slack omits `text` when the user typed nothing, which is treated as empty.
    pub fn into_command(self) -> Result<SlashCommand> {
        let params: HashMap<String, String> = url::form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect();

        let field = |name: &str| {
            params
                .get(name)
                .filter(|value| !value.is_empty())
                .cloned()
                .ok_or_else(|| LedgerError::MalformedRequest(format!("missing `{}`", name)))
        };

        Ok(SlashCommand {
            caller: ResolvedUser::new(field("user_id")?, field("user_name")?),
            text: params.get("text").cloned().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SlackMessage {
    response_type: String,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpReply {
    pub status_code: String,
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

impl HttpReply {
    /// A message posted back to the whole channel.
    pub fn in_channel(reply: CommandReply) -> Result<Self> {
        let body = serde_json::to_string(&SlackMessage {
            response_type: "in_channel".to_string(),
            text: reply.text,
        })?;
        Ok(Self::new("200", body))
    }

    pub fn bad_request(error: &LedgerError) -> Self {
        Self::new("400", error.to_string())
    }

    fn new(status_code: &str, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: status_code.to_string(),
            body,
            headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_is_decoded() {
        let event = SlashCommandEvent {
            body: "token=t&user_id=U2&user_name=bob&command=%2Fchips&text=%3C%40U1%7Calice%3E+%2450"
                .to_string(),
        };
        let command = event.into_command().unwrap();
        assert_eq!(command.caller.mention(), "<@U2|bob>");
        assert_eq!(command.text, "<@U1|alice> $50");
    }

    #[test]
    fn test_missing_text_is_empty() {
        let event = SlashCommandEvent {
            body: "user_id=U2&user_name=bob".to_string(),
        };
        assert_eq!(event.into_command().unwrap().text, "");
    }

    #[test]
    fn test_missing_caller_is_malformed() {
        let event = SlashCommandEvent {
            body: "user_name=bob&text=list".to_string(),
        };
        assert!(matches!(
            event.into_command(),
            Err(LedgerError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_in_channel_reply() {
        let reply = HttpReply::in_channel(CommandReply {
            text: "done".to_string(),
        })
        .unwrap();
        assert_eq!(reply.status_code, "200");
        let message: SlackMessage = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(message.response_type, "in_channel");
        assert_eq!(message.text, "done");
        assert_eq!(reply.headers["Content-Type"], "application/json");
    }
}
