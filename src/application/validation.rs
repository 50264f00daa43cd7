use crate::application::resolver::UserReferenceResolver;
use crate::domain::amount::parse_amount;
use crate::domain::dialog::SlotName;
use crate::domain::user::ResolvedUser;
use rust_decimal::Decimal;
use tracing::warn;

/// Which entry point the input came through; decides the wording of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interface {
    Dialog,
    SlashCommand,
}

/// The first field that failed, with the text used to ask for it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: SlotName,
    pub message: String,
}

/// Fields that passed, already resolved and parsed. Absent inputs stay `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Validated {
    pub lender: Option<ResolvedUser>,
    pub amount: Option<Decimal>,
}

pub type ValidationResult = std::result::Result<Validated, Violation>;

#[derive(Clone)]
pub struct ValidationEngine {
    resolver: UserReferenceResolver,
    interface: Interface,
}

impl ValidationEngine {
    pub fn new(resolver: UserReferenceResolver, interface: Interface) -> Self {
        Self {
            resolver,
            interface,
        }
    }

    /// Checks the lender, then the amount, stopping at the first failure.
    ///
    /// A failed identity lookup is a violation here, never an error.
    pub async fn validate(&self, lender: Option<&str>, amount: Option<&str>) -> ValidationResult {
        let mut validated = Validated::default();

        if let Some(raw) = lender {
            match self.resolver.resolve(raw).await {
                Ok(user) => validated.lender = Some(user),
                Err(e) => {
                    warn!(lender = raw, error = %e, "lender failed validation");
                    return Err(self.violation(SlotName::Lender, raw));
                }
            }
        }

        if let Some(raw) = amount {
            match parse_amount(raw) {
                Ok(value) => validated.amount = Some(value),
                Err(e) => {
                    warn!(amount = raw, error = %e, "amount failed validation");
                    return Err(self.violation(SlotName::Amount, raw));
                }
            }
        }

        Ok(validated)
    }

    fn violation(&self, field: SlotName, raw: &str) -> Violation {
        let message = match (self.interface, field) {
            (Interface::Dialog, SlotName::Lender) => format!(
                "{} is an invalid user. Please enter a user in the Slack team.",
                raw
            ),
            (Interface::Dialog, SlotName::Amount) => format!(
                "{} is an invalid amount. Please enter a valid amount of chips.",
                raw
            ),
            (Interface::SlashCommand, SlotName::Lender) => {
                "Make sure to include a user who is a member of the team, \
                 or use `list` to get the current chip count."
                    .to_string()
            }
            (Interface::SlashCommand, SlotName::Amount) => {
                "Make sure to include an amount, or use `list` to get the current chip count."
                    .to_string()
            }
        };
        Violation { field, message }
    }
}
