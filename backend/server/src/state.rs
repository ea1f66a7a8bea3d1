use std::sync::Arc;

use ledger::Ledger;
use reqwest::Client;

use super::config::{ProxyConfig, StoreConfig};

pub struct StoreState {
    pub config: StoreConfig,
    pub ledger: Ledger,
}

impl StoreState {
    pub fn new(config: StoreConfig) -> Arc<Self> {
        let ledger = Ledger::new(&config.score_file);

        Arc::new(Self { config, ledger })
    }
}

pub struct ProxyState {
    pub config: ProxyConfig,
    pub client: Client,
}

impl ProxyState {
    pub fn new(config: ProxyConfig) -> Result<Arc<Self>, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.upstream_timeout)
            .no_proxy()
            .build()?;

        Ok(Arc::new(Self { config, client }))
    }
}
