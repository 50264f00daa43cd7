use crate::application::ledger::LedgerService;
use crate::application::resolver::UserReferenceResolver;
use crate::application::validation::{Interface, ValidationEngine, Validated};
use crate::domain::amount::Amount;
use crate::domain::transaction::DebtTransaction;
use crate::domain::user::ResolvedUser;
use crate::error::{LedgerError, Result};
use tracing::{info, warn};

/// A single-line command, e.g. `/chips <@U1|alice> $50`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub caller: ResolvedUser,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
}

impl CommandReply {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

pub struct CommandHandler {
    validator: ValidationEngine,
    ledger: LedgerService,
}

impl CommandHandler {
    pub fn new(resolver: UserReferenceResolver, ledger: LedgerService) -> Self {
        Self {
            validator: ValidationEngine::new(resolver, Interface::SlashCommand),
            ledger,
        }
    }

    pub async fn handle(&self, command: SlashCommand) -> Result<CommandReply> {
        if is_tally_request(&command.text) {
            let tally = self.ledger.tally().await?;
            info!(accounts = tally.accounts().len(), "tally requested");
            return Ok(CommandReply::new(tally.render()));
        }

        let (lender_raw, amount_raw) = split_command(&command.text);

        let validated = match self
            .validator
            .validate(Some(lender_raw), Some(amount_raw))
            .await
        {
            Ok(validated) => validated,
            Err(violation) => return Ok(CommandReply::new(violation.message)),
        };
        let Validated {
            lender: Some(lender),
            amount: Some(value),
        } = validated
        else {
            return Err(LedgerError::InternalError(
                "validator dropped a supplied field".into(),
            ));
        };

        let tx = match Amount::new(value)
            .and_then(|amount| DebtTransaction::new(command.caller, lender, amount))
        {
            Ok(tx) => tx,
            Err(rejection) => {
                warn!(text = %command.text, reason = %rejection, "command rejected");
                return Ok(CommandReply::new(rejection.to_string()));
            }
        };

        self.ledger.apply(&tx).await?;

        Ok(CommandReply::new(format!(
            "{} lost {} chips while {} gained {} chips",
            tx.debtor, tx.amount, tx.lender, tx.amount
        )))
    }
}

/// Only the exact words `list` or `tally` ask for the standings.
fn is_tally_request(text: &str) -> bool {
    text == "list" || text == "tally"
}

/// Splits `<lender> <amount>`; a missing part comes back empty so it fails validation.
fn split_command(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((lender, amount)) => (lender, amount.trim()),
        None => (text, ""),
    }
}
