use rust_decimal::Decimal;
use std::fmt;

pub const NO_DEBTS_MESSAGE: &str = "There are no unpaid debts in this group! :smile:";

/// A signed chip balance. Negative means the account owes chips.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// `None` when the sum does not fit in a `Decimal`.
    pub fn checked_add(self, delta: Decimal) -> Option<Self> {
        self.0.checked_add(delta).map(Self)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// One ledger entry, keyed by the holder's canonical mention.
#[derive(Debug, PartialEq, Clone)]
pub struct Account {
    pub handle: String,
    pub balance: Balance,
}

impl Account {
    pub fn new(handle: impl Into<String>, balance: Balance) -> Self {
        Self {
            handle: handle.into(),
            balance,
        }
    }
}

/// Every account, sorted by handle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tally {
    accounts: Vec<Account>,
}

impl Tally {
    pub fn new(mut accounts: Vec<Account>) -> Self {
        accounts.sort_by(|a, b| a.handle.cmp(&b.handle));
        Self { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances; zero whenever every transfer committed fully.
    /// `None` if an intermediate sum leaves the `Decimal` range.
    pub fn total(&self) -> Option<Balance> {
        self.accounts
            .iter()
            .try_fold(Balance::ZERO, |acc, account| acc.checked_add(account.balance.0))
    }

    /// Renders the standings as a fenced block, or the empty-state message.
    ///
    /// Both fences sit on their own line, so the first row starts at column
    /// zero instead of directly after the opening fence.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return NO_DEBTS_MESSAGE.to_string();
        }

        let mut out = String::from("```\n");
        for account in &self.accounts {
            let balance = account.balance.to_string();
            out.push_str(&format!("{:<10}:{:>5}\n", account.handle, balance));
        }
        out.push_str("```");
        out
    }
}
