//! Test storefront: a scripted `Storefront` that records every call.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use onboarding_core::error::StoreError;
use onboarding_core::store::{
    Offer, StorePurchaseResult, Storefront, Transaction, TransactionId, TransactionUpdates,
    VerificationResult,
};
use tokio::sync::mpsc;

type Update = VerificationResult<Transaction>;

/// A storefront whose answers are scripted up front.
///
/// Purchase results are consumed in order; once the script runs out every
/// further purchase fails with `StoreError::Failed`. Transaction updates are
/// pushed by the test through [`ScriptedStorefront::push_update`] and
/// delivered to the first subscriber only.
///
/// With [`ScriptedStorefront::with_yielding_calls`], `purchase` and `finish`
/// yield to the scheduler before answering, so concurrent callers overlap.
#[derive(Debug)]
pub struct ScriptedStorefront {
    catalog: Mutex<Result<Vec<Offer>, StoreError>>,
    purchase_results: Mutex<VecDeque<Result<StorePurchaseResult, StoreError>>>,
    purchased: Mutex<Vec<String>>,
    entitlements: Mutex<Result<Vec<Update>, StoreError>>,
    finish_error: Mutex<Option<StoreError>>,
    finished: Mutex<Vec<TransactionId>>,
    finish_attempts: Mutex<Vec<TransactionId>>,
    yielding: AtomicBool,
    updates_tx: Mutex<Option<mpsc::UnboundedSender<Update>>>,
    updates_rx: Mutex<Option<mpsc::UnboundedReceiver<Update>>>,
}

impl ScriptedStorefront {
    /// Create a storefront whose catalog lists `catalog`.
    #[must_use]
    pub fn new(catalog: Vec<Offer>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            catalog: Mutex::new(Ok(catalog)),
            purchase_results: Mutex::new(VecDeque::new()),
            purchased: Mutex::new(Vec::new()),
            entitlements: Mutex::new(Ok(Vec::new())),
            finish_error: Mutex::new(None),
            finished: Mutex::new(Vec::new()),
            finish_attempts: Mutex::new(Vec::new()),
            yielding: AtomicBool::new(false),
            updates_tx: Mutex::new(Some(tx)),
            updates_rx: Mutex::new(Some(rx)),
        }
    }

    /// Make every catalog lookup fail with `error`.
    #[must_use]
    pub fn with_catalog_error(self, error: StoreError) -> Self {
        *self.catalog.lock().unwrap() = Err(error);
        self
    }

    /// Queue the result of the next purchase call.
    #[must_use]
    pub fn with_purchase_result(self, result: Result<StorePurchaseResult, StoreError>) -> Self {
        self.purchase_results.lock().unwrap().push_back(result);
        self
    }

    /// Set the current entitlements.
    #[must_use]
    pub fn with_entitlements(self, entitlements: Vec<Update>) -> Self {
        *self.entitlements.lock().unwrap() = Ok(entitlements);
        self
    }

    /// Make entitlement listing fail with `error`.
    #[must_use]
    pub fn with_entitlements_error(self, error: StoreError) -> Self {
        *self.entitlements.lock().unwrap() = Err(error);
        self
    }

    /// Make every `finish` call fail with `error`.
    #[must_use]
    pub fn with_finish_error(self, error: StoreError) -> Self {
        *self.finish_error.lock().unwrap() = Some(error);
        self
    }

    /// Make `purchase` and `finish` yield once before answering.
    #[must_use]
    pub fn with_yielding_calls(self) -> Self {
        self.yielding.store(true, Ordering::Relaxed);
        self
    }

    /// Deliver `update` to the transaction update stream.
    ///
    /// # Panics
    ///
    /// Panics if the update stream was already closed.
    pub fn push_update(&self, update: Update) {
        self.updates_tx
            .lock()
            .unwrap()
            .as_ref()
            .expect("update stream already closed")
            .send(update)
            .ok();
    }

    /// End the transaction update stream.
    pub fn close_updates(&self) {
        self.updates_tx.lock().unwrap().take();
    }

    /// Transaction ids acknowledged through `finish`, in call order.
    pub fn finished_transactions(&self) -> Vec<TransactionId> {
        self.finished.lock().unwrap().clone()
    }

    /// Every transaction id passed to `finish`, including failed calls.
    pub fn finish_attempts(&self) -> Vec<TransactionId> {
        self.finish_attempts.lock().unwrap().clone()
    }

    /// Product ids passed to `purchase`, in call order.
    pub fn purchased_products(&self) -> Vec<String> {
        self.purchased.lock().unwrap().clone()
    }

    async fn maybe_yield(&self) {
        if self.yielding.load(Ordering::Relaxed) {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Storefront for ScriptedStorefront {
    async fn products(&self, product_ids: &[String]) -> Result<Vec<Offer>, StoreError> {
        let catalog = self.catalog.lock().unwrap().clone()?;
        Ok(catalog
            .into_iter()
            .filter(|offer| product_ids.contains(&offer.product_id))
            .collect())
    }

    async fn purchase(&self, offer: &Offer) -> Result<StorePurchaseResult, StoreError> {
        self.maybe_yield().await;
        self.purchased.lock().unwrap().push(offer.product_id.clone());
        self.purchase_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StoreError::Failed("no scripted purchase result".into())))
    }

    async fn finish(&self, transaction_id: TransactionId) -> Result<(), StoreError> {
        self.finish_attempts.lock().unwrap().push(transaction_id);
        self.maybe_yield().await;
        if let Some(error) = self.finish_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.finished.lock().unwrap().push(transaction_id);
        Ok(())
    }

    async fn current_entitlements(&self) -> Result<Vec<Update>, StoreError> {
        self.entitlements.lock().unwrap().clone()
    }

    fn transaction_updates(&self) -> TransactionUpdates {
        match self.updates_rx.lock().unwrap().take() {
            Some(rx) => stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|update| (update, rx))
            })
            .boxed(),
            None => stream::empty().boxed(),
        }
    }
}
