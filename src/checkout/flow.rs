//! Plot purchase flow.
//!
//! # States
//! ```text
//! Idle → Processing → Complete
//!          ↓
//!        Idle (on failure, cancellation or a dropped future)
//! ```
//!
//! Payment is simulated: after a fixed delay the purchase is considered
//! successful and recorded in the session store. When logged in it is also
//! sent to the backend; a backend failure is logged and the local record kept.
//! A plot already in the portfolio is not paid for again.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::api::{ApiError, RegistryClient};
use crate::checkout::fees::compute_fees;
use crate::config::CheckoutConfig;
use crate::lifecycle::Shutdown;
use crate::models::{
    EntityId, Estate, FeeBreakdown, NewTransaction, Plot, PlotStatus, PortfolioEntry, Transaction,
};
use crate::session::{SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Plot {plot} is {status:?} and cannot be purchased")]
    PlotUnavailable { plot: String, status: PlotStatus },

    #[error("No plot selected")]
    NothingSelected,

    #[error("A payment is already in progress")]
    AlreadyProcessing,

    #[error("Plot {plot} has already been purchased")]
    AlreadyPurchased { plot: String },

    #[error("Payment cancelled")]
    Cancelled,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentState {
    Idle,
    Processing,
    Complete { reference: String },
}

/// Outcome of a completed payment.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub reference: String,
    pub transaction: Transaction,
    pub fees: FeeBreakdown,
    /// Whether the backend accepted the transaction.
    pub synced: bool,
}

/// Drives selection, payment and the session hand-off.
#[derive(Clone)]
pub struct Checkout {
    session: SessionStore,
    client: Option<RegistryClient>,
    shutdown: Option<Shutdown>,
    config: CheckoutConfig,
    state: Arc<Mutex<PaymentState>>,
}

/// Puts a payment left in `Processing` back to `Idle` when dropped.
struct ProcessingGuard<'a> {
    state: &'a Mutex<PaymentState>,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *state == PaymentState::Processing {
            *state = PaymentState::Idle;
        }
    }
}

fn new_reference() -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("REG-{}", &id[..12])
}

impl Checkout {
    pub fn new(session: SessionStore, config: CheckoutConfig) -> Self {
        Self {
            session,
            client: None,
            shutdown: None,
            config,
            state: Arc::new(Mutex::new(PaymentState::Idle)),
        }
    }

    /// Also record purchases with the backend through `client`.
    pub fn with_client(mut self, client: RegistryClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Abandon simulated payments once `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, PaymentState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> PaymentState {
        self.lock_state().clone()
    }

    /// Fee breakdown for `plot`, which must be available.
    pub fn quote(&self, plot: &Plot) -> CheckoutResult<FeeBreakdown> {
        if !plot.is_available() {
            return Err(CheckoutError::PlotUnavailable {
                plot: plot.label(),
                status: plot.status,
            });
        }
        Ok(compute_fees(plot.price, &self.config))
    }

    /// Select `plot` in `estate` for purchase and hand it off through the session.
    pub fn select(&self, estate: &Estate, plot: &Plot) -> CheckoutResult<FeeBreakdown> {
        let fees = self.quote(plot)?;
        self.session.set_selected_estate(estate)?;
        self.session.set_selected_plot(plot)?;
        self.session.set_payment_amount(fees.total)?;
        tracing::info!(estate = %estate.slug, plot = %plot.label(), total = %fees.total, "Plot selected");
        Ok(fees)
    }

    /// Pay for the current selection.
    pub async fn pay(&self) -> CheckoutResult<Receipt> {
        let plot = self.session.selected_plot().ok_or(CheckoutError::NothingSelected)?;
        let estate = self.session.selected_estate().ok_or(CheckoutError::NothingSelected)?;
        let fees = self.quote(&plot)?;
        let owned = self
            .session
            .portfolio()
            .iter()
            .any(|entry| entry.plot_id == plot.id && entry.estate_id == estate.id);
        if owned {
            return Err(CheckoutError::AlreadyPurchased { plot: plot.label() });
        }

        {
            let mut state = self.lock_state();
            if *state == PaymentState::Processing {
                return Err(CheckoutError::AlreadyProcessing);
            }
            *state = PaymentState::Processing;
        }
        let _guard = ProcessingGuard { state: &self.state };

        let receipt = self.process(&estate, &plot, fees).await?;
        *self.lock_state() = PaymentState::Complete {
            reference: receipt.reference.clone(),
        };
        Ok(receipt)
    }

    /// Wait out the simulated payment delay, or stop early on shutdown.
    async fn pause(&self) -> CheckoutResult<()> {
        let delay = tokio::time::sleep(Duration::from_millis(self.config.simulated_delay_ms));
        match &self.shutdown {
            Some(shutdown) => tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    tracing::warn!("Payment cancelled");
                    Err(CheckoutError::Cancelled)
                }
                _ = delay => Ok(()),
            },
            None => {
                delay.await;
                Ok(())
            }
        }
    }

    async fn process(&self, estate: &Estate, plot: &Plot, fees: FeeBreakdown) -> CheckoutResult<Receipt> {
        let reference = new_reference();
        tracing::info!(reference = %reference, amount = %fees.total, "Processing payment");
        self.pause().await?;

        let synced = self.sync(estate, plot, &fees, &reference).await?;

        let transaction = Transaction {
            id: Some(EntityId::Text(reference.clone())),
            plot_id: Some(plot.id.clone()),
            estate_id: Some(estate.id.clone()),
            amount: fees.total,
            fees: Some(fees.clone()),
            reference: Some(reference.clone()),
            status: Some("completed".to_string()),
            created_at: Some(Utc::now()),
            extra: Default::default(),
        };
        self.session.push_transaction(transaction.clone())?;
        self.session.push_portfolio(PortfolioEntry {
            plot_id: plot.id.clone(),
            plot_label: plot.label(),
            estate_id: estate.id.clone(),
            estate_name: estate.name.clone(),
            amount: fees.total,
            reference: reference.clone(),
            acquired_at: Utc::now(),
        })?;
        self.session.set_payment_amount(fees.total)?;

        tracing::info!(reference = %reference, synced, "Payment complete");
        Ok(Receipt {
            reference,
            transaction,
            fees,
            synced,
        })
    }

    /// Send the purchase to the backend when possible.
    ///
    /// Cancellation propagates; other backend failures only mark it unsynced.
    async fn sync(
        &self,
        estate: &Estate,
        plot: &Plot,
        fees: &FeeBreakdown,
        reference: &str,
    ) -> CheckoutResult<bool> {
        let Some(client) = self.client.as_ref().filter(|c| c.has_token()) else {
            return Ok(false);
        };
        if !self.config.sync_with_backend {
            return Ok(false);
        }

        let body = NewTransaction {
            plot_id: plot.id.clone(),
            estate_id: estate.id.clone(),
            amount: fees.total,
            fees: fees.clone(),
            reference: reference.to_string(),
            payment_method: Some("card".to_string()),
        };
        match client.create_transaction(&body).await {
            Ok(_) => Ok(true),
            Err(ApiError::Cancelled) => Err(CheckoutError::Cancelled),
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Backend did not record transaction");
                Ok(false)
            }
        }
    }

    /// Pay the title-search fee for `estate`. Returns the amount charged,
    /// zero if it was already paid.
    pub async fn pay_search_fee(&self, estate: &Estate) -> CheckoutResult<Decimal> {
        if self.session.has_paid_search_fee(&estate.id) {
            return Ok(Decimal::ZERO);
        }
        self.pause().await?;
        self.session.add_paid_search_fee(estate.id.clone())?;
        tracing::info!(estate = %estate.slug, fee = %self.config.search_fee, "Search fee paid");
        Ok(self.config.search_fee)
    }
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout")
            .field("state", &self.state())
            .field("backend", &self.client.is_some())
            .field("shutdown", &self.shutdown.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CheckoutConfig {
        CheckoutConfig {
            simulated_delay_ms: 1,
            ..CheckoutConfig::default()
        }
    }

    fn estate() -> Estate {
        serde_json::from_value(serde_json::json!({"id": 2, "name": "Garden City", "slug": "garden-city"}))
            .unwrap()
    }

    fn plot(status: &str) -> Plot {
        serde_json::from_value(serde_json::json!({
            "id": 14, "number": "12", "blockNumber": "B3", "status": status, "price": 4000000
        }))
        .unwrap()
    }

    #[test]
    fn test_quote_rejects_sold_plot() {
        let checkout = Checkout::new(SessionStore::in_memory(), config());
        let err = checkout.quote(&plot("sold")).unwrap_err();
        assert!(matches!(err, CheckoutError::PlotUnavailable { status: PlotStatus::Sold, .. }));
    }

    #[test]
    fn test_select_hands_off_through_session() {
        let session = SessionStore::in_memory();
        let checkout = Checkout::new(session.clone(), config());
        let fees = checkout.select(&estate(), &plot("available")).unwrap();

        assert_eq!(session.selected_plot().unwrap().id, EntityId::Int(14));
        assert_eq!(session.selected_estate().unwrap().slug, "garden-city");
        assert_eq!(session.payment_amount(), Some(fees.total));
    }

    #[tokio::test]
    async fn test_pay_without_selection() {
        let checkout = Checkout::new(SessionStore::in_memory(), config());
        assert!(matches!(checkout.pay().await, Err(CheckoutError::NothingSelected)));
        assert_eq!(checkout.state(), PaymentState::Idle);
    }

    #[tokio::test]
    async fn test_pay_records_locally() {
        let session = SessionStore::in_memory();
        let checkout = Checkout::new(session.clone(), config());
        checkout.select(&estate(), &plot("available")).unwrap();

        let receipt = checkout.pay().await.unwrap();
        assert!(!receipt.synced);
        assert!(receipt.reference.starts_with("REG-"));
        assert_eq!(receipt.reference.len(), 16);
        assert_eq!(
            checkout.state(),
            PaymentState::Complete {
                reference: receipt.reference.clone()
            }
        );

        let transactions = session.transactions();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, Decimal::from(4_350_000));
        assert_eq!(session.portfolio()[0].plot_label, "B3/12");
    }

    #[tokio::test]
    async fn test_second_payment_for_same_plot_refused() {
        let session = SessionStore::in_memory();
        let checkout = Checkout::new(session.clone(), config());
        checkout.select(&estate(), &plot("available")).unwrap();
        let receipt = checkout.pay().await.unwrap();

        let err = checkout.pay().await.unwrap_err();
        assert!(matches!(err, CheckoutError::AlreadyPurchased { ref plot } if plot == "B3/12"));
        assert_eq!(session.transactions().len(), 1);
        assert_eq!(session.portfolio().len(), 1);
        assert_eq!(checkout.state(), PaymentState::Complete { reference: receipt.reference });
    }

    #[tokio::test]
    async fn test_shutdown_cancels_payment() {
        let session = SessionStore::in_memory();
        let shutdown = Shutdown::new();
        let slow = CheckoutConfig {
            simulated_delay_ms: 5_000,
            ..CheckoutConfig::default()
        };
        let checkout = Checkout::new(session.clone(), slow).with_shutdown(shutdown.clone());
        checkout.select(&estate(), &plot("available")).unwrap();

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.trigger();
        });

        let started = std::time::Instant::now();
        let err = checkout.pay().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(checkout.state(), PaymentState::Idle);
        assert!(session.transactions().is_empty());
        assert!(session.portfolio().is_empty());

        assert!(matches!(
            checkout.pay_search_fee(&estate()).await,
            Err(CheckoutError::Cancelled)
        ));
        assert!(!session.has_paid_search_fee(&EntityId::Int(2)));
    }

    #[tokio::test]
    async fn test_dropped_payment_returns_to_idle() {
        let session = SessionStore::in_memory();
        let checkout = Checkout::new(
            session.clone(),
            CheckoutConfig {
                simulated_delay_ms: 200,
                ..CheckoutConfig::default()
            },
        );
        checkout.select(&estate(), &plot("available")).unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(20), checkout.pay()).await;
        assert!(timed_out.is_err());
        assert_eq!(checkout.state(), PaymentState::Idle);
        assert!(session.transactions().is_empty());

        let receipt = checkout.pay().await.unwrap();
        assert_eq!(session.transactions().len(), 1);
        assert_eq!(checkout.state(), PaymentState::Complete { reference: receipt.reference });
    }

    #[tokio::test]
    async fn test_search_fee_charged_once() {
        let session = SessionStore::in_memory();
        let checkout = Checkout::new(session.clone(), config());
        assert_eq!(checkout.pay_search_fee(&estate()).await.unwrap(), Decimal::from(5_000));
        assert_eq!(checkout.pay_search_fee(&estate()).await.unwrap(), Decimal::ZERO);
        assert!(session.has_paid_search_fee(&EntityId::Int(2)));
    }
}
