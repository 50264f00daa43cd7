use crate::application::ledger::LedgerService;
use crate::application::resolver::UserReferenceResolver;
use crate::application::validation::{Interface, ValidationEngine};
use crate::domain::amount::{Amount, parse_amount};
use crate::domain::dialog::{
    DialogAction, DialogResponse, DialogTurn, FulfillmentState, Intent, InvocationSource, SlotName,
};
use crate::domain::transaction::DebtTransaction;
use crate::error::{LedgerError, Result};
use tracing::{debug, info, warn};

/// Drives the slot-filling conversation for the dialog interface.
///
/// On a dialog turn it validates whatever slots are filled and either asks for
/// the first bad slot again or hands control back to the orchestrator. On the
/// fulfillment turn it records the debt and closes the conversation.
pub struct DialogStateMachine {
    validator: ValidationEngine,
    resolver: UserReferenceResolver,
    ledger: LedgerService,
}

impl DialogStateMachine {
    pub fn new(resolver: UserReferenceResolver, ledger: LedgerService) -> Self {
        Self {
            validator: ValidationEngine::new(resolver.clone(), Interface::Dialog),
            resolver,
            ledger,
        }
    }

    pub async fn handle(&self, turn: DialogTurn) -> Result<DialogResponse> {
        debug!(
            intent = %turn.intent_name,
            caller = %turn.caller_id,
            source = ?turn.invocation_source,
            "dialog turn"
        );

        match turn.intent_name.parse::<Intent>()? {
            Intent::RecordDebt => match turn.invocation_source {
                InvocationSource::DialogCodeHook => Ok(self.elicit_or_delegate(turn).await),
                InvocationSource::FulfillmentCodeHook => self.fulfill(turn).await,
            },
            Intent::GetList => self.list(turn).await,
        }
    }

    async fn elicit_or_delegate(&self, mut turn: DialogTurn) -> DialogResponse {
        let result = self
            .validator
            .validate(turn.slots.lender.as_deref(), turn.slots.amount.as_deref())
            .await;

        let action = match result {
            Err(violation) => {
                turn.slots.clear(violation.field);
                DialogAction::ElicitSlot {
                    intent_name: turn.intent_name,
                    slots: turn.slots,
                    slot_to_elicit: violation.field,
                    message: violation.message,
                }
            }
            Ok(_) => DialogAction::Delegate { slots: turn.slots },
        };

        DialogResponse {
            session_attributes: turn.session_attributes,
            action,
        }
    }

    /// No slot can be re-asked at this point, so lookup and parse failures are fatal.
    ///
    /// This is the only path that closes with `FulfillmentState::Failed`: a
    /// lender slot resolving to the caller, or an amount that is not positive.
    async fn fulfill(&self, turn: DialogTurn) -> Result<DialogResponse> {
        let lender_raw = required_slot(&turn, SlotName::Lender)?;
        let amount_raw = required_slot(&turn, SlotName::Amount)?;

        let debtor = self.resolver.resolve(&turn.caller_id).await?;
        let lender = self.resolver.resolve(lender_raw).await?;
        let value =
            parse_amount(amount_raw).map_err(|e| LedgerError::ValidationError(e.to_string()))?;

        let outcome = Amount::new(value)
            .and_then(|amount| DebtTransaction::new(debtor, lender.clone(), amount));

        let (fulfillment_state, message) = match outcome {
            Ok(tx) => {
                self.ledger.apply(&tx).await?;
                (
                    FulfillmentState::Fulfilled,
                    format!(
                        "{} chips owed to {} has been recorded in my books!",
                        amount_raw,
                        lender.mention()
                    ),
                )
            }
            Err(rejection) => {
                warn!(reason = %rejection, "debt rejected at fulfillment");
                (FulfillmentState::Failed, rejection.to_string())
            }
        };

        Ok(DialogResponse {
            session_attributes: turn.session_attributes,
            action: DialogAction::Close {
                fulfillment_state,
                message,
            },
        })
    }

    async fn list(&self, turn: DialogTurn) -> Result<DialogResponse> {
        let tally = self.ledger.tally().await?;
        info!(accounts = tally.accounts().len(), "standing requested");

        let message = if tally.is_empty() {
            tally.render()
        } else {
            format!("This is the current standing:\n{}", tally.render())
        };

        Ok(DialogResponse {
            session_attributes: turn.session_attributes,
            action: DialogAction::Close {
                fulfillment_state: FulfillmentState::Fulfilled,
                message,
            },
        })
    }
}

fn required_slot(turn: &DialogTurn, slot: SlotName) -> Result<&str> {
    turn.slots.get(slot).ok_or_else(|| {
        LedgerError::MalformedRequest(format!("fulfillment turn without a {} slot", slot))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Balance, NO_DEBTS_MESSAGE};
    use crate::domain::dialog::{DialogState, SessionAttributes, Slots};
    use crate::infrastructure::in_memory::{InMemoryLedgerStore, StaticIdentityDirectory};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn machine() -> (DialogStateMachine, LedgerService) {
        let directory = StaticIdentityDirectory::default()
            .with_user("U1", "alice")
            .with_user("U2", "bob");
        let resolver = UserReferenceResolver::new(Arc::new(directory));
        let ledger = LedgerService::new(Arc::new(InMemoryLedgerStore::new()));
        (DialogStateMachine::new(resolver, ledger.clone()), ledger)
    }

    fn turn(source: InvocationSource, lender: Option<&str>, amount: Option<&str>) -> DialogTurn {
        let mut session_attributes = SessionAttributes::new();
        session_attributes.insert("channel".to_string(), "general".to_string());
        DialogTurn {
            invocation_source: source,
            intent_name: "record_debt".to_string(),
            slots: Slots {
                lender: lender.map(str::to_string),
                amount: amount.map(str::to_string),
            },
            session_attributes,
            caller_id: "U2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_amount_is_elicited_and_cleared() {
        let (machine, _) = machine();
        let response = machine
            .handle(turn(InvocationSource::DialogCodeHook, Some("U1"), Some("abc")))
            .await
            .unwrap();

        assert_eq!(response.state(), DialogState::Eliciting(SlotName::Amount));
        match response.action {
            DialogAction::ElicitSlot { slots, message, .. } => {
                assert_eq!(slots.amount, None);
                assert_eq!(slots.lender.as_deref(), Some("U1"));
                assert!(message.contains("abc"));
                assert!(message.contains("invalid amount"));
            }
            other => panic!("expected ElicitSlot, got {:?}", other),
        }
        assert_eq!(
            response.session_attributes.get("channel").map(String::as_str),
            Some("general")
        );
    }

    #[tokio::test]
    async fn test_unknown_lender_is_elicited_first() {
        let (machine, _) = machine();
        let response = machine
            .handle(turn(InvocationSource::DialogCodeHook, Some("U404"), Some("abc")))
            .await
            .unwrap();
        assert_eq!(response.state(), DialogState::Eliciting(SlotName::Lender));
    }

    #[tokio::test]
    async fn test_partial_valid_slots_delegate() {
        let (machine, _) = machine();
        let response = machine
            .handle(turn(InvocationSource::DialogCodeHook, Some("@U1"), None))
            .await
            .unwrap();
        assert_eq!(response.state(), DialogState::Delegating);
        assert_eq!(
            response.action,
            DialogAction::Delegate {
                slots: Slots {
                    lender: Some("@U1".to_string()),
                    amount: None,
                }
            }
        );
    }

    #[tokio::test]
    async fn test_fulfillment_records_debt() {
        let (machine, ledger) = machine();
        let response = machine
            .handle(turn(InvocationSource::FulfillmentCodeHook, Some("U1"), Some("$20")))
            .await
            .unwrap();

        assert_eq!(
            response.action,
            DialogAction::Close {
                fulfillment_state: FulfillmentState::Fulfilled,
                message: "$20 chips owed to <@U1|alice> has been recorded in my books!".to_string(),
            }
        );

        let tally = ledger.tally().await.unwrap();
        assert_eq!(tally.accounts()[0].balance, Balance::new(dec!(20)));
        assert_eq!(tally.accounts()[1].balance, Balance::new(dec!(-20)));
    }

    #[tokio::test]
    async fn test_fulfillment_self_debt_closes_failed() {
        let (machine, ledger) = machine();
        let response = machine
            .handle(turn(InvocationSource::FulfillmentCodeHook, Some("U2"), Some("5")))
            .await
            .unwrap();
        assert_eq!(response.state(), DialogState::Closed(FulfillmentState::Failed));
        assert!(ledger.tally().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fulfillment_negative_amount_closes_failed() {
        let (machine, ledger) = machine();
        let response = machine
            .handle(turn(InvocationSource::FulfillmentCodeHook, Some("U1"), Some("-5")))
            .await
            .unwrap();
        assert_eq!(response.state(), DialogState::Closed(FulfillmentState::Failed));
        assert!(ledger.tally().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fulfillment_lookup_failure_is_fatal() {
        let (machine, ledger) = machine();
        let result = machine
            .handle(turn(InvocationSource::FulfillmentCodeHook, Some("U404"), Some("5")))
            .await;
        assert!(matches!(result, Err(LedgerError::LookupFailure { .. })));
        assert!(ledger.tally().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_intent() {
        let (machine, _) = machine();
        let mut request = turn(InvocationSource::DialogCodeHook, None, None);
        request.intent_name = "order_flowers".to_string();
        assert!(matches!(
            machine.handle(request).await,
            Err(LedgerError::UnsupportedIntent(_))
        ));
    }

    #[tokio::test]
    async fn test_get_list_on_empty_ledger() {
        let (machine, _) = machine();
        let mut request = turn(InvocationSource::FulfillmentCodeHook, None, None);
        request.intent_name = "get_list".to_string();

        let response = machine.handle(request).await.unwrap();
        assert_eq!(
            response.action,
            DialogAction::Close {
                fulfillment_state: FulfillmentState::Fulfilled,
                message: NO_DEBTS_MESSAGE.to_string(),
            }
        );
    }
}
