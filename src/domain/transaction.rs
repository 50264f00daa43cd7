use crate::domain::amount::Amount;
use crate::domain::user::ResolvedUser;
use thiserror::Error;

/// Business rules that stop a debt from being recorded.
///
/// The display text is shown to the user verbatim.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum DebtRejection {
    #[error("You can't owe someone negative. Get them to owe you to erase debts.")]
    Negative,
    #[error("Zero chips is not a debt. No chips changed!")]
    Zero,
    #[error("You can resolve your own debts to yourself. No chips changed!")]
    SelfDebt,
}

/// A validated transfer of chips from `debtor` to `lender`.
///
/// Never persisted; the ledger applies it as two balance deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtTransaction {
    pub debtor: ResolvedUser,
    pub lender: ResolvedUser,
    pub amount: Amount,
}

impl DebtTransaction {
    pub fn new(
        debtor: ResolvedUser,
        lender: ResolvedUser,
        amount: Amount,
    ) -> Result<Self, DebtRejection> {
        if debtor.same_identity(&lender) {
            return Err(DebtRejection::SelfDebt);
        }
        Ok(Self {
            debtor,
            lender,
            amount,
        })
    }
}
