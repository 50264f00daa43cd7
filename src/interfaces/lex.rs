//! Wire format of the dialog orchestrator's code hook (Amazon Lex V1 style).

use crate::domain::dialog::{
    DialogAction, DialogResponse, DialogTurn, FulfillmentState, SessionAttributes, Slots,
};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexEvent {
    pub current_intent: LexIntent,
    pub invocation_source: String,
    pub user_id: String,
    #[serde(default)]
    pub session_attributes: Option<SessionAttributes>,
    #[serde(default)]
    pub bot: Option<LexBot>,
}

#[derive(Debug, Deserialize)]
pub struct LexIntent {
    pub name: String,
    #[serde(default)]
    pub slots: LexSlots,
}

#[derive(Debug, Deserialize)]
pub struct LexBot {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexSlots {
    #[serde(rename = "Lender", default)]
    pub lender: Option<String>,
    #[serde(rename = "Amount", default)]
    pub amount: Option<String>,
}

impl From<LexSlots> for Slots {
    fn from(slots: LexSlots) -> Self {
        Slots {
            lender: slots.lender,
            amount: slots.amount,
        }
    }
}

impl From<Slots> for LexSlots {
    fn from(slots: Slots) -> Self {
        LexSlots {
            lender: slots.lender,
            amount: slots.amount,
        }
    }
}

/// Lex user ids look like `<bot>:<team>:<user>`; the user is the third segment.
pub fn caller_id(user_id: &str) -> &str {
    user_id.split(':').nth(2).unwrap_or(user_id)
}

impl TryFrom<LexEvent> for DialogTurn {
    type Error = LedgerError;

    fn try_from(event: LexEvent) -> Result<Self> {
        Ok(DialogTurn {
            invocation_source: event.invocation_source.parse()?,
            intent_name: event.current_intent.name,
            slots: event.current_intent.slots.into(),
            session_attributes: event.session_attributes.unwrap_or_default(),
            caller_id: caller_id(&event.user_id).to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexResponse {
    pub session_attributes: SessionAttributes,
    pub dialog_action: LexDialogAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LexDialogAction {
    #[serde(rename_all = "camelCase")]
    ElicitSlot {
        intent_name: String,
        slots: LexSlots,
        slot_to_elicit: String,
        message: LexMessage,
    },
    Delegate {
        slots: LexSlots,
    },
    #[serde(rename_all = "camelCase")]
    Close {
        fulfillment_state: String,
        message: LexMessage,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexMessage {
    pub content_type: String,
    pub content: String,
}

impl LexMessage {
    pub fn plain_text(content: String) -> Self {
        Self {
            content_type: "PlainText".to_string(),
            content,
        }
    }
}

impl From<DialogResponse> for LexResponse {
    fn from(response: DialogResponse) -> Self {
        let dialog_action = match response.action {
            DialogAction::ElicitSlot {
                intent_name,
                slots,
                slot_to_elicit,
                message,
            } => LexDialogAction::ElicitSlot {
                intent_name,
                slots: slots.into(),
                slot_to_elicit: slot_to_elicit.to_string(),
                message: LexMessage::plain_text(message),
            },
            DialogAction::Delegate { slots } => LexDialogAction::Delegate {
                slots: slots.into(),
            },
            DialogAction::Close {
                fulfillment_state,
                message,
            } => LexDialogAction::Close {
                fulfillment_state: match fulfillment_state {
                    FulfillmentState::Fulfilled => "Fulfilled",
                    FulfillmentState::Failed => "Failed",
                }
                .to_string(),
                message: LexMessage::plain_text(message),
            },
        };

        LexResponse {
            session_attributes: response.session_attributes,
            dialog_action,
        }
    }
}
