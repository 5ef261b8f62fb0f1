//! Typed accessors over the session store, one per key.

use rust_decimal::Decimal;

use crate::models::{EntityId, Estate, Plot, PortfolioEntry, Transaction, User};
use crate::session::keys::SessionKey;
use crate::session::store::{SessionResult, SessionStore};

impl SessionStore {
    /// Bearer token. Stored raw, not JSON-encoded.
    pub fn token(&self) -> Option<String> {
        self.get_raw(SessionKey::Token).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) -> SessionResult<()> {
        self.set_raw(SessionKey::Token, token)
    }

    pub fn user(&self) -> Option<User> {
        self.read(SessionKey::User)
    }

    pub fn set_user(&self, user: &User) -> SessionResult<()> {
        self.write(SessionKey::User, user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read::<bool>(SessionKey::IsAuthenticated).unwrap_or(false)
    }

    /// Record a login: `user`, `token` and `isAuthenticated`.
    ///
    /// Nothing is written without a non-empty token. Returns whether the
    /// session is now authenticated.
    pub fn save_login(&self, user: Option<&User>, token: Option<&str>) -> SessionResult<bool> {
        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            tracing::debug!("Auth reply carried no token, session left unchanged");
            return Ok(false);
        };
        if let Some(user) = user {
            self.set_user(user)?;
        }
        self.set_token(token)?;
        self.write(SessionKey::IsAuthenticated, &true)?;
        Ok(true)
    }

    /// Forget the login. Purchase state is kept.
    pub fn logout(&self) -> SessionResult<()> {
        self.remove(&[SessionKey::Token, SessionKey::User, SessionKey::IsAuthenticated])
    }

    pub fn selected_plot(&self) -> Option<Plot> {
        self.read(SessionKey::SelectedPlot)
    }

    pub fn set_selected_plot(&self, plot: &Plot) -> SessionResult<()> {
        self.write(SessionKey::SelectedPlot, plot)
    }

    pub fn selected_estate(&self) -> Option<Estate> {
        self.read(SessionKey::SelectedEstate)
    }

    pub fn set_selected_estate(&self, estate: &Estate) -> SessionResult<()> {
        self.write(SessionKey::SelectedEstate, estate)
    }

    pub fn payment_amount(&self) -> Option<Decimal> {
        self.read(SessionKey::PaymentAmount)
    }

    pub fn set_payment_amount(&self, amount: Decimal) -> SessionResult<()> {
        self.write(SessionKey::PaymentAmount, &amount)
    }

    /// Drop the in-flight purchase selection.
    pub fn clear_selection(&self) -> SessionResult<()> {
        self.remove(&[
            SessionKey::SelectedPlot,
            SessionKey::SelectedEstate,
            SessionKey::PaymentAmount,
        ])
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.read_or_default(SessionKey::Transactions)
    }

    pub fn push_transaction(&self, transaction: Transaction) -> SessionResult<()> {
        let mut all = self.transactions();
        all.push(transaction);
        self.write(SessionKey::Transactions, &all)
    }

    pub fn portfolio(&self) -> Vec<PortfolioEntry> {
        self.read_or_default(SessionKey::Portfolio)
    }

    pub fn push_portfolio(&self, entry: PortfolioEntry) -> SessionResult<()> {
        let mut all = self.portfolio();
        all.push(entry);
        self.write(SessionKey::Portfolio, &all)
    }

    /// Estates whose title-search fee has been paid.
    pub fn paid_search_fees(&self) -> Vec<EntityId> {
        self.read_or_default(SessionKey::PaidSearchFees)
    }

    pub fn has_paid_search_fee(&self, estate_id: &EntityId) -> bool {
        self.paid_search_fees().contains(estate_id)
    }

    /// Mark `estate_id` as paid. Returns false if it already was.
    pub fn add_paid_search_fee(&self, estate_id: EntityId) -> SessionResult<bool> {
        let mut paid = self.paid_search_fees();
        if paid.contains(&estate_id) {
            return Ok(false);
        }
        paid.push(estate_id);
        self.write(SessionKey::PaidSearchFees, &paid)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlotStatus, PlotTier};

    fn sample_plot() -> Plot {
        serde_json::from_value(serde_json::json!({
            "id": 14,
            "number": "12",
            "blockNumber": "B3",
            "sqm": 648.5,
            "status": "available",
            "tier": "Signature",
            "price": "4500000.50",
            "path": "M0 0 L10 0 L10 10 Z",
            "labels": ["B3/12"],
            "beacons": [{"id": "EN-101", "x": 1.5, "y": 2.0}],
            "coordinates": [{"lat": 6.45, "lng": 7.51}]
        }))
        .unwrap()
    }

    #[test]
    fn test_selected_plot_round_trip() {
        let store = SessionStore::in_memory();
        let plot = sample_plot();
        store.set_selected_plot(&plot).unwrap();
        let back = store.selected_plot().unwrap();
        assert_eq!(back, plot);
        assert_eq!(back.tier, PlotTier::Signature);
        assert_eq!(back.status, PlotStatus::Available);
    }

    #[test]
    fn test_selected_estate_round_trip() {
        let store = SessionStore::in_memory();
        let estate: Estate = serde_json::from_value(serde_json::json!({
            "id": "est-2",
            "name": "Garden City",
            "slug": "garden-city",
            "location": "Enugu East",
            "plot_size": "500 sqm",
            "amenities": ["road", "water"]
        }))
        .unwrap();
        store.set_selected_estate(&estate).unwrap();
        assert_eq!(store.selected_estate(), Some(estate));
    }

    #[test]
    fn test_user_round_trip_and_logout() {
        let store = SessionStore::in_memory();
        let user = User {
            id: Some(EntityId::Int(1)),
            full_name: Some("Ada Obi".into()),
            email: Some("ada@example.com".into()),
            phone: Some("+2348000000000".into()),
            role: Some("user".into()),
            ..User::default()
        };
        assert!(store.save_login(Some(&user), Some("abc")).unwrap());
        store.set_payment_amount(Decimal::from(10)).unwrap();

        assert_eq!(store.user(), Some(user));
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert!(store.is_authenticated());

        store.logout().unwrap();
        assert!(store.user().is_none());
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
        assert_eq!(store.payment_amount(), Some(Decimal::from(10)));
    }

    #[test]
    fn test_save_login_without_token_is_not_authenticated() {
        let store = SessionStore::in_memory();
        let user = User {
            email: Some("demo@enugu.gov.ng".into()),
            ..User::default()
        };

        assert!(!store.save_login(None, None).unwrap());
        assert!(!store.save_login(Some(&user), Some("  ")).unwrap());
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_token_is_stored_raw() {
        let store = SessionStore::in_memory();
        store.set_token("eyJhbGciOi").unwrap();
        assert_eq!(store.get_raw(SessionKey::Token).as_deref(), Some("eyJhbGciOi"));
    }

    #[test]
    fn test_paid_search_fees_dedupe() {
        let store = SessionStore::in_memory();
        assert!(store.add_paid_search_fee(EntityId::Int(3)).unwrap());
        assert!(!store.add_paid_search_fee(EntityId::Int(3)).unwrap());
        assert!(store.has_paid_search_fee(&EntityId::Int(3)));
        assert_eq!(store.paid_search_fees().len(), 1);
    }

    #[test]
    fn test_clear_selection() {
        let store = SessionStore::in_memory();
        store.set_selected_plot(&sample_plot()).unwrap();
        store.set_payment_amount(Decimal::from(5)).unwrap();
        store.clear_selection().unwrap();
        assert!(store.selected_plot().is_none());
        assert!(store.payment_amount().is_none());
    }
}
