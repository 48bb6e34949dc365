use std::sync::Arc;

use crate::application::game::{PlayerService, StockService};
use crate::application::shop::{MemberService, ProductService, PurchaseService};
use crate::application::trading::{
    AnalysisService, ListedStockService, TransactionService, UserService,
};
use crate::config::Config;
use crate::domain::ports::SessionStore;
use crate::infrastructure::persistence::Database;
use crate::infrastructure::session::InMemorySessionStore;

/// Every service of the three APIs, sharing one pool and one session store.
#[derive(Clone)]
pub struct AppServices {
    pub players: Arc<PlayerService>,
    pub game_stocks: Arc<StockService>,
    pub users: Arc<UserService>,
    pub listed_stocks: Arc<ListedStockService>,
    pub transactions: Arc<TransactionService>,
    pub analysis: Arc<AnalysisService>,
    pub members: Arc<MemberService>,
    pub products: Arc<ProductService>,
    pub purchases: Arc<PurchaseService>,
}

impl AppServices {
    pub fn new(db: &Database, config: &Config) -> Self {
        let sessions: Arc<dyn SessionStore> =
            Arc::new(InMemorySessionStore::new(config.session.ttl()));
        Self::with_sessions(db, config, sessions)
    }

    pub fn with_sessions(db: &Database, config: &Config, sessions: Arc<dyn SessionStore>) -> Self {
        let pool = db.pool.clone();
        let page_max_count = config.game.page_max_count;

        Self {
            players: Arc::new(PlayerService::new(
                pool.clone(),
                sessions,
                config.game.initial_player_money,
                page_max_count,
            )),
            game_stocks: Arc::new(StockService::new(pool.clone(), page_max_count)),
            users: Arc::new(UserService::new(pool.clone())),
            listed_stocks: Arc::new(ListedStockService::new(pool.clone())),
            transactions: Arc::new(TransactionService::new(pool.clone())),
            analysis: Arc::new(AnalysisService::new(pool.clone())),
            members: Arc::new(MemberService::new(pool.clone())),
            products: Arc::new(ProductService::new(pool.clone())),
            purchases: Arc::new(PurchaseService::new(pool)),
        }
    }
}
