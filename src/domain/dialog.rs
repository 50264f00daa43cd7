//! Dialog turn and response types for slot-filling conversations.
//!
//! Slots are a fixed pair of typed fields rather than an open map; the wire
//! adapter in `interfaces::lex` translates to and from the orchestrator's JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Opaque key/value pairs the orchestrator hands back on every turn.
pub type SessionAttributes = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotName {
    Lender,
    Amount,
}

impl SlotName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotName::Lender => "Lender",
            SlotName::Amount => "Amount",
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slots {
    pub lender: Option<String>,
    pub amount: Option<String>,
}

impl Slots {
    pub fn get(&self, slot: SlotName) -> Option<&str> {
        match slot {
            SlotName::Lender => self.lender.as_deref(),
            SlotName::Amount => self.amount.as_deref(),
        }
    }

    pub fn clear(&mut self, slot: SlotName) {
        match slot {
            SlotName::Lender => self.lender = None,
            SlotName::Amount => self.amount = None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.lender.is_some() && self.amount.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationSource {
    /// A turn where slots are still being collected.
    DialogCodeHook,
    /// The final turn; every slot has been filled.
    FulfillmentCodeHook,
}

impl FromStr for InvocationSource {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DialogCodeHook" => Ok(Self::DialogCodeHook),
            "FulfillmentCodeHook" => Ok(Self::FulfillmentCodeHook),
            other => Err(LedgerError::MalformedRequest(format!(
                "unknown invocation source `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    RecordDebt,
    GetList,
}

impl FromStr for Intent {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record_debt" => Ok(Self::RecordDebt),
            "get_list" => Ok(Self::GetList),
            other => Err(LedgerError::UnsupportedIntent(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogTurn {
    pub invocation_source: InvocationSource,
    /// Kept raw so unsupported names surface as an error at dispatch time.
    pub intent_name: String,
    pub slots: Slots,
    pub session_attributes: SessionAttributes,
    pub caller_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentState {
    Fulfilled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    ElicitSlot {
        intent_name: String,
        slots: Slots,
        slot_to_elicit: SlotName,
        message: String,
    },
    Delegate {
        slots: Slots,
    },
    Close {
        fulfillment_state: FulfillmentState,
        message: String,
    },
}

/// Where the conversation stands after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Eliciting(SlotName),
    Delegating,
    Closed(FulfillmentState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogResponse {
    pub session_attributes: SessionAttributes,
    pub action: DialogAction,
}

impl DialogResponse {
    pub fn state(&self) -> DialogState {
        match &self.action {
            DialogAction::ElicitSlot { slot_to_elicit, .. } => DialogState::Eliciting(*slot_to_elicit),
            DialogAction::Delegate { .. } => DialogState::Delegating,
            DialogAction::Close {
                fulfillment_state, ..
            } => DialogState::Closed(*fulfillment_state),
        }
    }
}
