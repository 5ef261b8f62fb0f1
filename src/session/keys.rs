//! Session storage keys.

use std::fmt;

/// Every key the client reads or writes in the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Token,
    User,
    IsAuthenticated,
    SelectedPlot,
    SelectedEstate,
    PaymentAmount,
    Transactions,
    Portfolio,
    PaidSearchFees,
}

impl SessionKey {
    pub const ALL: [SessionKey; 9] = [
        SessionKey::Token,
        SessionKey::User,
        SessionKey::IsAuthenticated,
        SessionKey::SelectedPlot,
        SessionKey::SelectedEstate,
        SessionKey::PaymentAmount,
        SessionKey::Transactions,
        SessionKey::Portfolio,
        SessionKey::PaidSearchFees,
    ];

    /// Key name as stored on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "token",
            SessionKey::User => "user",
            SessionKey::IsAuthenticated => "isAuthenticated",
            SessionKey::SelectedPlot => "selectedPlot",
            SessionKey::SelectedEstate => "selectedEstate",
            SessionKey::PaymentAmount => "paymentAmount",
            SessionKey::Transactions => "transactions",
            SessionKey::Portfolio => "portfolio",
            SessionKey::PaidSearchFees => "paidSearchFees",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
