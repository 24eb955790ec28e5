use crate::config::environment::AppConfig;
use crate::infra::ProtocolStore;
use crate::module::settlement::vault::VaultLedger;
use crate::module::{event, job, oracle_snapshot, settlement};
use crate::service::slot_service::{SlotClock, WallClockSlots};
use axum::Router;
use axum::http::Method;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<ProtocolStore>,
    pub vaults: Arc<VaultLedger>,
    pub clock: Arc<dyn SlotClock>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let clock = WallClockSlots {
            genesis_unix_ms: config.genesis_unix_ms,
            slot_duration_ms: config.slot_duration_ms,
        };
        Self::with_clock(config, Arc::new(clock))
    }

    pub fn with_clock(config: AppConfig, clock: Arc<dyn SlotClock>) -> Self {
        Self {
            config,
            store: Arc::new(ProtocolStore::default()),
            vaults: Arc::new(VaultLedger::default()),
            clock,
        }
    }

    pub fn current_slot(&self) -> u64 {
        self.clock.current_slot()
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().expect("valid origin"),
            "http://127.0.0.1:3000".parse().expect("valid origin"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .merge(job::route::register_routes(state.clone()))
        .merge(oracle_snapshot::route::register_routes(state.clone()))
        .merge(settlement::route::register_routes(state.clone()))
        .merge(event::route::register_routes(state))
        .layer(cors)
}
