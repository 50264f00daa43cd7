use crate::application::router::{Instruction, RequestRouter, Response};
use crate::domain::dialog::DialogTurn;
use crate::error::{LedgerError, Result};
use crate::interfaces::lex::{LexEvent, LexResponse};
use crate::interfaces::slash_command::{HttpReply, SlashCommandEvent};
use serde_json::Value;
use tracing::debug;

enum Decoded {
    Instruction(Instruction),
    /// The transport already has an answer; nothing is routed.
    Rejected(HttpReply),
}

/// Tells the three event shapes apart by their marker keys.
fn decode(event: Value) -> Result<Decoded> {
    if event.get("keep_alive_ping").is_some() {
        return Ok(Decoded::Instruction(Instruction::KeepAlive));
    }

    if event.get("currentIntent").is_some() {
        let event: LexEvent = serde_json::from_value(event)?;
        if let Some(bot) = &event.bot {
            debug!(bot = %bot.name, "dialog event");
        }
        return Ok(Decoded::Instruction(Instruction::Dialog(
            DialogTurn::try_from(event)?,
        )));
    }

    if event.get("body").is_some() {
        let event: SlashCommandEvent = serde_json::from_value(event)?;
        return Ok(match event.into_command() {
            Ok(command) => Decoded::Instruction(Instruction::Command(command)),
            Err(e) => Decoded::Rejected(HttpReply::bad_request(&e)),
        });
    }

    Err(LedgerError::MalformedRequest(
        "event is neither a ping, a dialog turn nor a command".to_string(),
    ))
}

fn encode(response: Response) -> Result<Value> {
    let value = match response {
        Response::Ack => Value::Null,
        Response::Dialog(dialog) => serde_json::to_value(LexResponse::from(dialog))?,
        Response::Command(reply) => serde_json::to_value(HttpReply::in_channel(reply)?)?,
    };
    Ok(value)
}

/// Handles one raw invocation event end to end and returns the JSON answer.
pub async fn handle_event(router: &RequestRouter, event: Value) -> Result<Value> {
    let instruction = match decode(event)? {
        Decoded::Instruction(instruction) => instruction,
        Decoded::Rejected(reply) => return Ok(serde_json::to_value(reply)?),
    };
    encode(router.route(instruction).await?)
}
