//! Bootstrap engine: deploy, register and bridge, in order

use super::stage::{Bridged, Deployed, Registered, Stage};
use super::wait::{wait_for_terminal, TrackedMessage, WaitPolicy};
use crate::amount;
use crate::arbitrum::{MessageStatus, ParentReceipt, RetryableMessage};
use crate::chain::{
    BridgeLink, ChainConnector, ChainRole, ChainWrite, Connections, ContractKind, DeployedContract,
};
use crate::config::{BootstrapParams, Settings};
use crate::error::{BootstrapError, BootstrapResult};
use crate::events::ProgressEvent;
use crate::state::DeploymentRecord;

use ethers::abi::Token;
use ethers::types::H256;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Outcome of a run: the terminal result plus everything recorded on the way
#[derive(Debug)]
pub struct BootstrapReport {
    pub result: BootstrapResult<()>,
    pub record: DeploymentRecord,
}

impl BootstrapReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok() && self.record.reported_success()
    }

    /// Process exit code: 0 on full success, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Validate inputs, connect and run every stage
pub async fn execute(settings: &Settings, connector: &dyn ChainConnector) -> BootstrapReport {
    let mut record = DeploymentRecord::new();

    let params = match BootstrapParams::from_settings(settings) {
        Ok(params) => params,
        Err(e) => return abort(record, e),
    };

    let connections = match connector.connect(&params).await {
        Ok(connections) => connections,
        Err(e) => return abort(record, e),
    };
    record.network = Some(connections.network.name.clone());
    record.parent_chain_id = Some(connections.parent.chain_id());
    record.child_chain_id = Some(connections.child.chain_id());

    BootstrapEngine::new(connections, params, WaitPolicy::from_config(&settings.bootstrap), record)
        .run()
        .await
}

fn abort(mut record: DeploymentRecord, e: BootstrapError) -> BootstrapReport {
    error!("Bootstrap failed before any transaction ({}): {}", e.stage_hint(), e);
    record.push_event(ProgressEvent::BootstrapFailed {
        stage: Stage::Bootstrapped.to_string(),
        error: e.to_string(),
    });
    record.finish(Stage::Failed, Some(&e));
    BootstrapReport {
        result: Err(e),
        record,
    }
}

/// Runs the stages against injected chain and bridge capabilities
pub struct BootstrapEngine {
    connections: Connections,
    params: BootstrapParams,
    wait_policy: WaitPolicy,
    stage: Stage,
    record: DeploymentRecord,
}

impl BootstrapEngine {
    pub fn new(
        connections: Connections,
        params: BootstrapParams,
        wait_policy: WaitPolicy,
        record: DeploymentRecord,
    ) -> Self {
        Self {
            connections,
            params,
            wait_policy,
            stage: Stage::Bootstrapped,
            record,
        }
    }

    pub async fn run(mut self) -> BootstrapReport {
        let result = self.run_stages().await;

        match &result {
            Ok(()) => {
                info!("Bootstrap complete: token pair registered and funds bridged");
                self.record.finish(Stage::Done, None);
            }
            Err(e) => {
                let failed_at = self.stage;
                error!("Bootstrap failed after stage {} ({}): {}", failed_at, e.stage_hint(), e);
                if let Ok(stage) = self.stage.transition(Stage::Failed) {
                    self.stage = stage;
                }
                self.emit(ProgressEvent::BootstrapFailed {
                    stage: failed_at.to_string(),
                    error: e.to_string(),
                });
                self.record.log_leftovers();
                self.record.finish(self.stage, Some(e));
            }
        }

        BootstrapReport {
            result,
            record: self.record,
        }
    }

    async fn run_stages(&mut self) -> BootstrapResult<()> {
        let network = &self.connections.network;
        info!(
            "Child network {} (ID: {}), parent chain {}",
            network.name, network.chain_id, network.parent_chain_id
        );
        let resolved = ProgressEvent::NetworkResolved {
            name: network.name.clone(),
            child_chain_id: network.chain_id,
            parent_chain_id: network.parent_chain_id,
        };
        self.emit(resolved);

        info!("### Stage 1 - Deploying contracts ###");
        let deployed = self.deploy().await?;
        self.advance(Stage::Deployed)?;

        info!("### Stage 2 - Registering the token pair ###");
        let registered = self.register(&deployed).await?;
        self.advance(Stage::Registered)?;
        debug!(
            "Bridges linked (parent {:?}, child {:?})",
            registered.parent_config_tx, registered.child_config_tx
        );
        info!(
            "Token pair registered (tx {:?}, message {:?})",
            registered.registration_tx, registered.message.retryable_creation_id
        );

        info!("### Stage 3 - Bridging tokens ###");
        let bridged = self.bridge(&deployed).await?;
        self.advance(Stage::Bridged)?;
        debug!(
            "Approval {:?}, deposit {:?}, child message {:?}",
            bridged.approve_tx, bridged.deposit_tx, bridged.message.retryable_creation_id
        );
        info!(
            "Token bridging to the child chain complete. Status: {} ({} base units, {} decimals)",
            bridged.status, bridged.amount, bridged.decimals
        );

        self.advance(Stage::Done)?;
        self.emit(ProgressEvent::BootstrapCompleted);
        Ok(())
    }

    /// Deploy the four contracts, each constructor fed by the previous addresses
    async fn deploy(&mut self) -> BootstrapResult<Deployed> {
        let network = self.connections.network.clone();

        let parent_bridge = self
            .deploy_contract(
                ContractKind::ParentBridge,
                vec![
                    Token::Address(network.parent_gateway_router),
                    Token::Address(network.inbox),
                ],
            )
            .await?;

        let child_bridge = self
            .deploy_contract(
                ContractKind::ChildBridge,
                vec![Token::Address(network.child_gateway_router)],
            )
            .await?;

        let parent_token = self
            .deploy_contract(
                ContractKind::ParentToken,
                vec![
                    Token::Address(parent_bridge.address),
                    Token::Address(network.parent_gateway_router),
                    Token::Uint(self.params.initial_supply),
                ],
            )
            .await?;

        let child_token = self
            .deploy_contract(
                ContractKind::ChildToken,
                vec![
                    Token::Address(child_bridge.address),
                    Token::Address(parent_token.address),
                ],
            )
            .await?;

        Ok(Deployed {
            parent_bridge,
            child_bridge,
            parent_token,
            child_token,
        })
    }

    async fn deploy_contract(
        &mut self,
        kind: ContractKind,
        args: Vec<Token>,
    ) -> BootstrapResult<DeployedContract> {
        let chain = self.chain(kind.role());
        info!(
            "Deploying {} on the {} chain (ID: {})",
            kind,
            chain.role(),
            chain.chain_id()
        );
        let deployed = chain
            .deploy(kind, args)
            .await
            .map_err(|e| e.into_deployment_failure(kind))?;

        info!("{} deployed to {:?}", kind, deployed.address);
        self.record.add_contract(deployed.clone());
        self.emit(ProgressEvent::ContractDeployed {
            contract: kind,
            chain_id: deployed.chain_id,
            address: deployed.address,
            tx_hash: deployed.tx_hash,
        });
        Ok(deployed)
    }

    /// Link both bridges, then register the pair and wait for the child chain to execute it
    async fn register(&mut self, deployed: &Deployed) -> BootstrapResult<Registered> {
        let parent_token = deployed.parent_token.address;
        let child_token = deployed.child_token.address;

        let parent_config_tx = self
            .configure_bridge(
                ChainRole::Parent,
                &deployed.parent_bridge,
                BridgeLink {
                    parent_token,
                    child_token,
                    counterpart_bridge: deployed.child_bridge.address,
                },
            )
            .await?;
        let child_config_tx = self
            .configure_bridge(
                ChainRole::Child,
                &deployed.child_bridge,
                BridgeLink {
                    parent_token,
                    child_token,
                    counterpart_bridge: deployed.parent_bridge.address,
                },
            )
            .await?;

        info!("Registering {:?} on the child chain gateway router", parent_token);
        let receipt = self
            .connections
            .bridger
            .register_custom_token(parent_token, child_token)
            .await?;
        self.record
            .add_transaction("register custom token", ChainRole::Parent, receipt.tx_hash);
        self.emit(ProgressEvent::RegistrationSubmitted {
            tx_hash: receipt.tx_hash,
        });
        info!("Registration confirmed on the parent chain: {:?}", receipt.tx_hash);

        let registration_tx = receipt.tx_hash;
        let message = single_message(receipt, "registerTokenOnL2")?;

        info!("Waiting for the registration to be executed on the child chain. This can take a few minutes");
        let status = self.await_message(message.clone(), "token registration").await?;
        if !status.is_redeemed() {
            return Err(BootstrapError::RegistrationNotExecuted { status });
        }
        self.emit(ProgressEvent::RegistrationExecuted {
            retryable_creation_id: message.retryable_creation_id,
        });

        Ok(Registered {
            parent_config_tx,
            child_config_tx,
            registration_tx,
            message,
        })
    }

    async fn configure_bridge(
        &mut self,
        role: ChainRole,
        bridge: &DeployedContract,
        link: BridgeLink,
    ) -> BootstrapResult<H256> {
        info!("Setting token bridge information on {}", bridge.kind);
        let tx_hash = self.chain(role).configure_bridge(bridge.address, link).await?;

        info!("Token bridge information set on {}: {:?}", bridge.kind, tx_hash);
        self.record
            .add_transaction(format!("configure {}", bridge.kind), role, tx_hash);
        self.emit(ProgressEvent::BridgeConfigured {
            chain: role,
            bridge: bridge.address,
            tx_hash,
        });
        Ok(tx_hash)
    }

    /// Approve and deposit the configured amount, then wait for the child chain credit
    async fn bridge(&mut self, deployed: &Deployed) -> BootstrapResult<Bridged> {
        let token = deployed.parent_token.address;
        let spender = deployed.parent_bridge.address;

        let decimals = self.connections.parent.token_decimals(token).await?;
        let amount = amount::scale_amount(&self.params.bridge_amount, decimals)?;
        info!(
            "Bridging {} tokens ({} base units at {} decimals)",
            self.params.bridge_amount, amount, decimals
        );

        let approve_tx = self
            .connections
            .bridger
            .approve_token(token, spender, amount)
            .await?;
        self.record
            .add_transaction("approve", ChainRole::Parent, approve_tx);
        self.emit(ProgressEvent::TokenApproved {
            token,
            spender,
            amount,
            tx_hash: approve_tx,
        });
        info!("{} allowed to spend the parent token: {:?}", ContractKind::ParentBridge, approve_tx);

        let receipt = self.connections.bridger.deposit(token, amount).await?;
        self.record
            .add_transaction("deposit", ChainRole::Parent, receipt.tx_hash);
        self.emit(ProgressEvent::DepositSubmitted {
            tx_hash: receipt.tx_hash,
            amount,
        });

        let deposit_tx = receipt.tx_hash;
        let message = receipt.messages.into_iter().next().ok_or(
            BootstrapError::UnexpectedMessageCount {
                operation: "outboundTransfer",
                expected: 1,
                actual: 0,
            },
        )?;

        info!("Token bridging initiated ({:?}). This can take a few minutes", deposit_tx);
        let status = self.await_message(message.clone(), "token deposit").await?;
        if !status.is_redeemed() {
            return Err(BootstrapError::BridgingIncomplete { status });
        }
        self.emit(ProgressEvent::DepositCompleted {
            retryable_creation_id: message.retryable_creation_id,
            status,
        });

        Ok(Bridged {
            decimals,
            amount,
            approve_tx,
            deposit_tx,
            message,
            status,
        })
    }

    async fn await_message(
        &self,
        message: RetryableMessage,
        label: &'static str,
    ) -> BootstrapResult<MessageStatus> {
        let tracked = TrackedMessage::new(self.connections.bridger.clone(), message, label);
        wait_for_terminal(&tracked, &self.wait_policy).await
    }

    fn chain(&self, role: ChainRole) -> Arc<dyn ChainWrite> {
        match role {
            ChainRole::Parent => self.connections.parent.clone(),
            ChainRole::Child => self.connections.child.clone(),
        }
    }

    fn advance(&mut self, next: Stage) -> BootstrapResult<()> {
        self.stage = self.stage.transition(next)?;
        self.record.stage = self.stage;
        Ok(())
    }

    fn emit(&mut self, event: ProgressEvent) {
        debug!(event = event.name(), "progress");
        self.record.push_event(event);
    }
}

/// The registration must produce exactly one message
fn single_message(
    receipt: ParentReceipt,
    operation: &'static str,
) -> BootstrapResult<RetryableMessage> {
    let actual = receipt.messages.len();
    if actual != 1 {
        return Err(BootstrapError::UnexpectedMessageCount {
            operation,
            expected: 1,
            actual,
        });
    }
    receipt
        .messages
        .into_iter()
        .next()
        .ok_or(BootstrapError::UnexpectedMessageCount {
            operation,
            expected: 1,
            actual,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockChainConnector;
    use crate::config::{BRIDGE_AMOUNT_ENV, CHILD_RPC_ENV, PARENT_RPC_ENV, PRIVATE_KEY_ENV, TOKEN_SUPPLY_ENV};
    use crate::coordination::testing::{self, contract_address, Call, CallLog, Scenario};
    use ethers::types::{Address, U256};
    use tokio_test::{assert_err, assert_ok};

    fn connector(scenario: Scenario, calls: &CallLog) -> MockChainConnector {
        let calls = calls.clone();
        let mut connector = MockChainConnector::new();
        connector
            .expect_connect()
            .times(1)
            .returning(move |_| Ok(scenario.connections(&calls)));
        connector
    }

    async fn run(scenario: Scenario, bridge_amount: &str) -> (BootstrapReport, CallLog) {
        let calls = CallLog::default();
        let settings = testing::settings("1000000", bridge_amount);
        let report = execute(&settings, &connector(scenario, &calls)).await;
        (report, calls)
    }

    fn deposits(calls: &CallLog) -> Vec<U256> {
        calls
            .all()
            .into_iter()
            .filter_map(|call| match call {
                Call::Deposit { amount, .. } => Some(amount),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn missing_inputs_fail_before_any_connection() {
        for name in [
            PRIVATE_KEY_ENV,
            PARENT_RPC_ENV,
            CHILD_RPC_ENV,
            TOKEN_SUPPLY_ENV,
            BRIDGE_AMOUNT_ENV,
        ] {
            let mut settings = testing::settings("1000000", "50");
            match name {
                PRIVATE_KEY_ENV => settings.wallet.private_key = None,
                PARENT_RPC_ENV => settings.parent.rpc_url = None,
                CHILD_RPC_ENV => settings.child.rpc_url = None,
                TOKEN_SUPPLY_ENV => settings.token.initial_supply = None,
                _ => settings.token.bridge_amount = None,
            }

            let mut connector = MockChainConnector::new();
            connector.expect_connect().never();

            let report = execute(&settings, &connector).await;
            assert_eq!(report.exit_code(), 1);
            match report.result {
                Err(BootstrapError::MissingParameter(missing)) => assert_eq!(missing, name),
                other => panic!("{name}: expected MissingParameter, got {other:?}"),
            }
            assert!(report.record.contracts.is_empty());
        }
    }

    #[tokio::test]
    async fn connection_failure_is_reported_without_side_effects() {
        let mut connector = MockChainConnector::new();
        connector.expect_connect().times(1).returning(|_| {
            Err(BootstrapError::UnsupportedNetwork {
                chain_id: 10,
                reason: "token bridge not found".into(),
            })
        });

        let report = execute(&testing::settings("1000000", "50"), &connector).await;
        assert_eq!(report.exit_code(), 1);
        assert!(matches!(
            report.result,
            Err(BootstrapError::UnsupportedNetwork { chain_id: 10, .. })
        ));
        assert_eq!(report.record.stage, Stage::Failed);
    }

    #[tokio::test]
    async fn end_to_end_issues_every_transaction_in_order() {
        let (report, calls) = run(Scenario::default(), "50").await;

        assert_ok!(&report.result);
        assert_eq!(report.exit_code(), 0);
        let kinds: Vec<&str> = calls
            .writes()
            .iter()
            .map(|call| match call {
                Call::Deploy { .. } => "deploy",
                Call::ConfigureBridge { .. } => "configure",
                Call::Register { .. } => "register",
                Call::Approve { .. } => "approve",
                Call::Deposit { .. } => "deposit",
                other => panic!("unexpected write {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            [
                "deploy", "deploy", "deploy", "deploy", "configure", "configure", "register",
                "approve", "deposit"
            ]
        );

        let record = &report.record;
        assert_eq!(record.stage, Stage::Done);
        assert_eq!(record.contracts.len(), 4);
        assert_eq!(record.transactions.len(), 5);
        assert!(record.reported_success());
        assert_eq!(record.child_chain_id, Some(testing::CHILD_CHAIN_ID));
    }

    #[tokio::test]
    async fn constructors_receive_previously_deployed_addresses() {
        let (report, calls) = run(Scenario::default(), "50").await;
        assert!(report.is_success());

        let network = testing::network();
        let deploys: Vec<(ContractKind, Vec<Token>)> = calls
            .all()
            .into_iter()
            .filter_map(|call| match call {
                Call::Deploy { kind, args } => Some((kind, args)),
                _ => None,
            })
            .collect();

        assert_eq!(
            deploys,
            vec![
                (
                    ContractKind::ParentBridge,
                    vec![
                        Token::Address(network.parent_gateway_router),
                        Token::Address(network.inbox)
                    ]
                ),
                (
                    ContractKind::ChildBridge,
                    vec![Token::Address(network.child_gateway_router)]
                ),
                (
                    ContractKind::ParentToken,
                    vec![
                        Token::Address(contract_address(ContractKind::ParentBridge)),
                        Token::Address(network.parent_gateway_router),
                        Token::Uint(U256::from(1_000_000u64)),
                    ]
                ),
                (
                    ContractKind::ChildToken,
                    vec![
                        Token::Address(contract_address(ContractKind::ChildBridge)),
                        Token::Address(contract_address(ContractKind::ParentToken)),
                    ]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn contracts_are_deployed_on_the_chain_of_their_role() {
        let (report, _) = run(Scenario::default(), "50").await;

        let placement: Vec<(ContractKind, u64)> = report
            .record
            .contracts
            .iter()
            .map(|c| (c.kind, c.chain_id))
            .collect();
        assert_eq!(
            placement,
            vec![
                (ContractKind::ParentBridge, testing::PARENT_CHAIN_ID),
                (ContractKind::ChildBridge, testing::CHILD_CHAIN_ID),
                (ContractKind::ParentToken, testing::PARENT_CHAIN_ID),
                (ContractKind::ChildToken, testing::CHILD_CHAIN_ID),
            ]
        );
    }

    #[tokio::test]
    async fn both_bridges_are_linked_to_the_same_pair() {
        let (_, calls) = run(Scenario::default(), "50").await;

        let links: Vec<(ChainRole, Address, BridgeLink)> = calls
            .all()
            .into_iter()
            .filter_map(|call| match call {
                Call::ConfigureBridge {
                    chain,
                    bridge,
                    link,
                } => Some((chain, bridge, link)),
                _ => None,
            })
            .collect();

        let parent_token = contract_address(ContractKind::ParentToken);
        let child_token = contract_address(ContractKind::ChildToken);
        assert_eq!(
            links,
            vec![
                (
                    ChainRole::Parent,
                    contract_address(ContractKind::ParentBridge),
                    BridgeLink {
                        parent_token,
                        child_token,
                        counterpart_bridge: contract_address(ContractKind::ChildBridge),
                    }
                ),
                (
                    ChainRole::Child,
                    contract_address(ContractKind::ChildBridge),
                    BridgeLink {
                        parent_token,
                        child_token,
                        counterpart_bridge: contract_address(ContractKind::ParentBridge),
                    }
                ),
            ]
        );
    }

    #[tokio::test]
    async fn bridge_amount_is_scaled_by_deployed_decimals() {
        for (decimals, expected) in [
            (0u8, U256::from(50u64)),
            (6, U256::from(50_000_000u64)),
            (18, U256::from(50u64) * U256::exp10(18)),
        ] {
            let scenario = Scenario {
                decimals,
                ..Scenario::default()
            };
            let (report, calls) = run(scenario, "50").await;
            assert!(report.is_success(), "decimals {decimals}: {:?}", report.result);
            assert_eq!(deposits(&calls), vec![expected], "decimals {decimals}");

            let approvals: Vec<Call> = calls
                .all()
                .into_iter()
                .filter(|call| matches!(call, Call::Approve { .. }))
                .collect();
            assert_eq!(
                approvals,
                vec![Call::Approve {
                    token: contract_address(ContractKind::ParentToken),
                    spender: contract_address(ContractKind::ParentBridge),
                    amount: expected,
                }]
            );
        }
    }

    #[tokio::test]
    async fn fractional_amounts_follow_token_decimals() {
        let scenario = Scenario {
            decimals: 6,
            ..Scenario::default()
        };
        let (report, calls) = run(scenario, "1.5").await;
        assert!(report.is_success());
        assert_eq!(deposits(&calls), vec![U256::from(1_500_000u64)]);
    }

    #[tokio::test]
    async fn registration_must_yield_exactly_one_message() {
        for count in [0usize, 2] {
            let scenario = Scenario {
                registration_messages: count,
                ..Scenario::default()
            };
            let (report, calls) = run(scenario, "50").await;

            match report.result {
                Err(BootstrapError::UnexpectedMessageCount {
                    expected, actual, ..
                }) => {
                    assert_eq!(expected, 1);
                    assert_eq!(actual, count);
                }
                other => panic!("{count} messages: expected UnexpectedMessageCount, got {other:?}"),
            }
            assert!(!calls
                .all()
                .iter()
                .any(|call| matches!(call, Call::MessageStatus { .. } | Call::Approve { .. })));
            assert_eq!(report.record.stage, Stage::Failed);
        }
    }

    #[tokio::test]
    async fn registration_must_be_redeemed() {
        for status in [
            MessageStatus::Expired,
            MessageStatus::CreationFailed,
            MessageStatus::FundsDepositedOnChild,
        ] {
            let scenario = Scenario {
                registration_statuses: vec![status],
                ..Scenario::default()
            };
            let (report, calls) = run(scenario, "50").await;

            assert!(matches!(
                report.result,
                Err(BootstrapError::RegistrationNotExecuted { status: s }) if s == status
            ));
            let last = calls.all().last().cloned();
            assert!(
                matches!(last, Some(Call::MessageStatus { .. })),
                "no calls after the failed wait, got {last:?}"
            );
        }
    }

    #[tokio::test]
    async fn incomplete_deposit_fails_without_reporting_success() {
        let scenario = Scenario {
            deposit_statuses: vec![MessageStatus::NotYetCreated, MessageStatus::FundsDepositedOnChild],
            ..Scenario::default()
        };
        let (report, calls) = run(scenario, "50").await;

        assert_eq!(report.exit_code(), 1);
        assert!(matches!(
            report.result,
            Err(BootstrapError::BridgingIncomplete {
                status: MessageStatus::FundsDepositedOnChild
            })
        ));
        assert!(!report.record.reported_success());
        assert!(matches!(
            report.record.events.last(),
            Some(ProgressEvent::BootstrapFailed { stage, .. }) if stage == "registered"
        ));
        assert_eq!(report.record.contracts.len(), 4);
        assert_eq!(deposits(&calls).len(), 1);
    }

    #[tokio::test]
    async fn deposit_without_messages_is_rejected() {
        let scenario = Scenario {
            deposit_messages: 0,
            ..Scenario::default()
        };
        let (report, _) = run(scenario, "50").await;
        assert!(matches!(
            report.result,
            Err(BootstrapError::UnexpectedMessageCount {
                operation: "outboundTransfer",
                actual: 0,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn deployment_failure_stops_the_run_and_keeps_earlier_addresses() {
        let scenario = Scenario {
            fail_deploy: Some(ContractKind::ParentToken),
            ..Scenario::default()
        };
        let (report, calls) = run(scenario, "50").await;

        match assert_err!(&report.result) {
            BootstrapError::DeploymentFailed { contract, .. } => assert_eq!(contract, "L1ERC20Token"),
            other => panic!("expected DeploymentFailed, got {other:?}"),
        }
        assert_eq!(calls.writes().len(), 3);
        assert_eq!(
            report
                .record
                .contracts
                .iter()
                .map(|c| c.kind)
                .collect::<Vec<_>>(),
            vec![ContractKind::ParentBridge, ContractKind::ChildBridge]
        );
        assert_eq!(report.record.stage, Stage::Failed);
        assert!(report.record.error.is_some());
    }

    #[test]
    fn single_message_rejects_other_counts() {
        let receipt = ParentReceipt {
            tx_hash: H256::zero(),
            messages: Vec::new(),
        };
        assert!(matches!(
            single_message(receipt, "registerTokenOnL2"),
            Err(BootstrapError::UnexpectedMessageCount { actual: 0, .. })
        ));
    }
}
