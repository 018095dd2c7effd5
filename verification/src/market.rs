//! One market instance: every component over a shared store.

use crate::auth::{AuthorizationPolicy, OperatorPolicy};
use crate::claims::ClaimRegistry;
use crate::commit_reveal::CommitRevealCoordinator;
use crate::lifecycle::LifecycleManager;
use crate::locks::ClaimLocks;
use crate::SharedStore;
use std::sync::Arc;
use truthmarket_reputation::ReputationLedger;
use truthmarket_settlement::SettlementProvider;
use truthmarket_store::MarketStore;
use truthmarket_types::ProtocolParams;

/// The registry, coordinator and lifecycle manager share one lock table, so
/// a sweep and a reveal on the same claim never interleave.
pub struct TruthMarket {
    pub claims: ClaimRegistry,
    pub coordinator: CommitRevealCoordinator,
    pub lifecycle: LifecycleManager,
    pub ledger: Arc<ReputationLedger>,
}

impl TruthMarket {
    /// Build a market with the default [`OperatorPolicy`] (no operators).
    pub fn new<S>(store: Arc<S>, settlement: Arc<dyn SettlementProvider>, params: ProtocolParams) -> Self
    where
        S: MarketStore + Send + Sync + 'static,
    {
        Self::with_policy(store, settlement, Arc::new(OperatorPolicy::default()), params)
    }

    pub fn with_policy<S>(
        store: Arc<S>,
        settlement: Arc<dyn SettlementProvider>,
        auth: Arc<dyn AuthorizationPolicy>,
        params: ProtocolParams,
    ) -> Self
    where
        S: MarketStore + Send + Sync + 'static,
    {
        let ledger = Arc::new(ReputationLedger::new(store.clone(), params.reputation.clone()));
        let shared: SharedStore = store;
        let locks = Arc::new(ClaimLocks::new());
        Self {
            claims: ClaimRegistry::new(shared.clone(), params.market.clone()),
            coordinator: CommitRevealCoordinator::new(shared.clone(), ledger.clone(), locks.clone()),
            lifecycle: LifecycleManager::new(shared, ledger.clone(), settlement, auth, locks, &params),
            ledger,
        }
    }
}
