//! Child network descriptors: canonical inbox and gateway router addresses

use crate::config::CustomNetworkConfig;
use crate::error::{BootstrapError, BootstrapResult};

use ethers::types::Address;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Canonical token bridge routers on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBridgeRouters {
    pub parent_gateway_router: Address,
    pub child_gateway_router: Address,
}

/// What the registry knows about a child chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildNetwork {
    pub name: String,
    pub chain_id: u64,
    pub parent_chain_id: u64,
    pub inbox: Address,
    pub token_bridge: Option<TokenBridgeRouters>,
}

/// A child network that can host a custom token bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNetwork {
    pub name: String,
    pub chain_id: u64,
    pub parent_chain_id: u64,
    pub inbox: Address,
    pub parent_gateway_router: Address,
    pub child_gateway_router: Address,
}

/// Lookup of child networks by chain id
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: HashMap<u64, ChildNetwork>,
}

impl NetworkRegistry {
    /// Registry with the public Arbitrum chains
    pub fn with_defaults() -> Self {
        let mut networks = HashMap::new();
        for network in builtin_networks() {
            networks.insert(network.chain_id, network);
        }
        Self { networks }
    }

    /// Defaults plus operator-supplied descriptors, which win on chain id clashes
    pub fn with_custom(custom: &[CustomNetworkConfig]) -> BootstrapResult<Self> {
        let mut registry = Self::with_defaults();
        for config in custom {
            registry.register(parse_custom(config)?);
        }
        Ok(registry)
    }

    pub fn register(&mut self, network: ChildNetwork) {
        self.networks.insert(network.chain_id, network);
    }

    /// Resolve the child chain, requiring a token bridge descriptor
    pub fn resolve(&self, chain_id: u64) -> BootstrapResult<ResolvedNetwork> {
        let network = self
            .networks
            .get(&chain_id)
            .ok_or_else(|| BootstrapError::UnsupportedNetwork {
                chain_id,
                reason: "unknown child chain; add it under [[networks]]".to_string(),
            })?;

        let routers = network
            .token_bridge
            .ok_or_else(|| BootstrapError::UnsupportedNetwork {
                chain_id,
                reason: format!("token bridge not found for network {}", network.name),
            })?;

        Ok(ResolvedNetwork {
            name: network.name.clone(),
            chain_id: network.chain_id,
            parent_chain_id: network.parent_chain_id,
            inbox: network.inbox,
            parent_gateway_router: routers.parent_gateway_router,
            child_gateway_router: routers.child_gateway_router,
        })
    }
}

fn builtin_networks() -> Vec<ChildNetwork> {
    vec![
        ChildNetwork {
            name: "Arbitrum One".to_string(),
            chain_id: 42161,
            parent_chain_id: 1,
            inbox: addr("0x4Dbd4fc535Ac27206064B68FfCf827b0A60BAB3f"),
            token_bridge: Some(TokenBridgeRouters {
                parent_gateway_router: addr("0x72Ce9c846789fdB6fC1f34aC4AD25Dd9ef7031ef"),
                child_gateway_router: addr("0x5288c571Fd7aD117beA99bF60FE0846C4E84F933"),
            }),
        },
        ChildNetwork {
            name: "Arbitrum Nova".to_string(),
            chain_id: 42170,
            parent_chain_id: 1,
            inbox: addr("0xc4448b71118c9071Bcb9734A0EAc55D18A153949"),
            token_bridge: Some(TokenBridgeRouters {
                parent_gateway_router: addr("0xC840838Bc438d73C16c2f8b22D2Ce3669963cD48"),
                child_gateway_router: addr("0x21903d3F8176b1a0c17E953Cd896610Be9fFDFa8"),
            }),
        },
        ChildNetwork {
            name: "Arbitrum Sepolia".to_string(),
            chain_id: 421614,
            parent_chain_id: 11155111,
            inbox: addr("0xaAe29B0366299461418F5324a79Afc425BE5ae21"),
            token_bridge: Some(TokenBridgeRouters {
                parent_gateway_router: addr("0xcE18836b233C83325Cc8848CA4487e94C6288264"),
                child_gateway_router: addr("0x9fDD1C4E4AA24EEc1d913FABea925594a20d43C7"),
            }),
        },
    ]
}

fn addr(s: &str) -> Address {
    Address::from_str(s).unwrap()
}

fn parse_custom(config: &CustomNetworkConfig) -> BootstrapResult<ChildNetwork> {
    let parse = |field: &str, value: &str| {
        Address::from_str(value).map_err(|e| {
            BootstrapError::Config(format!(
                "network {}: invalid {} address {}: {}",
                config.name, field, value, e
            ))
        })
    };

    let token_bridge = match (&config.parent_gateway_router, &config.child_gateway_router) {
        (Some(parent), Some(child)) => Some(TokenBridgeRouters {
            parent_gateway_router: parse("parent_gateway_router", parent)?,
            child_gateway_router: parse("child_gateway_router", child)?,
        }),
        _ => None,
    };

    Ok(ChildNetwork {
        name: config.name.clone(),
        chain_id: config.chain_id,
        parent_chain_id: config.parent_chain_id,
        inbox: parse("inbox", &config.inbox)?,
        token_bridge,
    })
}
