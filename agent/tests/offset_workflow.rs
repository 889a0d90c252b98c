//! End-to-end offset scenarios against in-memory collaborators.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::TxKind;
use offset_agent::{Assessor, CreditBurner, ErrorClass, OffsetAgent, OffsetError};
use offset_chain::token::{calldata, decode_burn};
use offset_chain::{ChainError, CreditToken};
use offset_crypto::{hash_transaction, sign_transaction};
use offset_nullables::{ChainStep, NullChain, NullRegionLookup, NullSigningIdentity};
use offset_types::{ChainAddress, EnergyConsumption, PrivateKey, Region};
use tracing::field::{Field, Visit};
use tracing::span;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

const SIGNER_KEY: [u8; 32] = [0x46; 32];
const TIMEOUT: Duration = Duration::from_secs(5);

fn token_address() -> ChainAddress {
    "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap()
}

struct Harness {
    agent: OffsetAgent<NullRegionLookup>,
    chain: Arc<NullChain>,
    identity: Arc<NullSigningIdentity>,
}

impl Harness {
    fn signer() -> ChainAddress {
        NullSigningIdentity::new(SIGNER_KEY).address()
    }

    /// Region "X" at 0.5 gCO2/Wh and a signer that is also the first account.
    fn new(balance: u128) -> Self {
        let signer = Self::signer();
        Self::with_chain(
            NullChain::new()
                .with_account(signer)
                .with_balance(signer, balance),
            TIMEOUT,
        )
    }

    fn with_chain(chain: NullChain, timeout: Duration) -> Self {
        let lookup = NullRegionLookup::new()
            .with_region("X", 0.5)
            .with_region("LOW", 0.005)
            .with_region("ONE", 1.0);
        let chain = Arc::new(chain);
        let identity = Arc::new(NullSigningIdentity::new(SIGNER_KEY));
        let burner = CreditBurner::new(
            identity.clone(),
            chain.clone(),
            chain.clone(),
            CreditToken::new(token_address()),
            timeout,
        );
        Self {
            agent: OffsetAgent::new(lookup, burner, timeout),
            chain,
            identity,
        }
    }

    async fn offset(&self, kwh: f64, region: &str) -> Result<(u64, offset_agent::BurnTransaction), OffsetError> {
        self.agent
            .offset_footprint(EnergyConsumption::from_kwh(kwh), &Region::from(region))
            .await
            .map(|(volume, tx)| (volume.get(), tx))
    }
}

#[tokio::test]
async fn burns_truncated_footprint() {
    let h = Harness::new(10_000);
    let (volume, tx) = h.offset(3000.0, "X").await.unwrap();

    assert_eq!(volume, 1500);
    assert_eq!(tx.volume.get(), 1500);
    assert_eq!(tx.sender, Harness::signer());
    assert!(!tx.hash.is_zero());

    let submitted = h.chain.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(hash_transaction(&submitted[0]), tx.hash);

    let estimates = h.chain.estimates();
    assert_eq!(estimates.len(), 1);
    assert_eq!(estimates[0].to, Some(TxKind::Call(token_address().into())));
    assert_eq!(estimates[0].from, Some(Harness::signer().into()));
    assert_eq!(decode_burn(calldata(&estimates[0])), Some(1500));
}

#[tokio::test]
async fn transaction_uses_fresh_chain_parameters() {
    let signer = Harness::signer();
    let chain = NullChain::new()
        .with_account(signer)
        .with_balance(signer, 5)
        .with_nonce(signer, 9)
        .with_chain_id(80001)
        .with_gas_price(1_500_000_000)
        .with_gas_estimate(48_000);
    let h = Harness::with_chain(chain, TIMEOUT);
    let (_, tx) = h.offset(4.0, "ONE").await.unwrap();

    assert_eq!(tx.nonce, 9);
    assert_eq!(tx.chain_id, 80001);
    assert_eq!(tx.gas_price, 1_500_000_000);
    assert_eq!(tx.gas_limit, 48_000);
    for step in [
        ChainStep::Accounts,
        ChainStep::Balance,
        ChainStep::GasPrice,
        ChainStep::Nonce,
        ChainStep::ChainId,
        ChainStep::EstimateGas,
        ChainStep::Submit,
    ] {
        assert_eq!(h.chain.calls(step), 1, "{step:?}");
    }
}

#[tokio::test]
async fn submitted_bytes_are_the_signed_burn() {
    let h = Harness::new(10);
    let (_, tx) = h.offset(4.0, "ONE").await.unwrap();

    let request = h.chain.estimates()[0]
        .clone()
        .with_gas_price(tx.gas_price)
        .with_nonce(tx.nonce)
        .with_chain_id(tx.chain_id)
        .with_gas_limit(tx.gas_limit);
    let expected = sign_transaction(request, &PrivateKey(SIGNER_KEY))
        .await
        .unwrap();
    assert_eq!(h.chain.submitted(), vec![expected.raw]);
    assert_eq!(expected.hash, tx.hash);
}

#[tokio::test]
async fn sub_threshold_footprint_makes_no_chain_calls() {
    let h = Harness::new(10_000);
    let err = h.offset(100.0, "LOW").await.unwrap_err();

    assert!(matches!(err, OffsetError::SubThresholdFootprint(m) if m.value() < 1.0));
    assert_eq!(err.class(), ErrorClass::Validation);
    assert_eq!(h.chain.total_calls(), 0);
    assert_eq!(h.identity.requests(), 0);
}

#[tokio::test]
async fn insufficient_balance_submits_nothing() {
    let h = Harness::new(5);
    let err = h.offset(10.0, "ONE").await.unwrap_err();

    match err {
        OffsetError::InsufficientBalance {
            requested,
            available,
        } => {
            assert_eq!(requested.get(), 10);
            assert_eq!(available, 5);
        }
        other => panic!("expected InsufficientBalance, got {other:?}"),
    }
    assert!(h.chain.submitted().is_empty());
    assert_eq!(h.chain.calls(ChainStep::GasPrice), 0);
    assert_eq!(h.chain.calls(ChainStep::Nonce), 0);
}

#[tokio::test]
async fn balance_equal_to_volume_is_enough() {
    let h = Harness::new(10);
    let (volume, _) = h.offset(10.0, "ONE").await.unwrap();
    assert_eq!(volume, 10);
    assert_eq!(h.chain.submitted().len(), 1);
}

#[tokio::test]
async fn unknown_region_stops_before_the_chain() {
    let h = Harness::new(10_000);
    let err = h.offset(3000.0, "ZZ").await.unwrap_err();

    assert!(matches!(err, OffsetError::RegionNotFound(ref r) if r.as_str() == "ZZ"));
    assert_eq!(h.agent.calculator().lookup().lookups(), 1);
    assert_eq!(h.chain.total_calls(), 0);
    assert_eq!(h.identity.requests(), 0);
}

#[tokio::test]
async fn empty_account_list_is_a_configuration_error() {
    let h = Harness::with_chain(NullChain::new(), TIMEOUT);
    let err = h.offset(3000.0, "X").await.unwrap_err();

    assert!(matches!(err, OffsetError::NoAccountsConfigured));
    assert_eq!(err.class(), ErrorClass::Configuration);
    assert_eq!(h.chain.calls(ChainStep::Balance), 0);
    assert!(h.chain.submitted().is_empty());
}

#[tokio::test]
async fn balance_is_read_for_the_first_account() {
    let signer = Harness::signer();
    let other = ChainAddress::new([0x77; 20]);
    let chain = NullChain::new()
        .with_account(other)
        .with_account(signer)
        .with_balance(other, 0)
        .with_balance(signer, 1_000_000);
    let h = Harness::with_chain(chain, TIMEOUT);
    let err = h.offset(10.0, "ONE").await.unwrap_err();
    assert!(matches!(err, OffsetError::InsufficientBalance { available: 0, .. }));
}

#[tokio::test]
async fn rejected_submission_is_uncertain_with_local_hash() {
    let h = Harness::new(10_000);
    h.chain.fail_on(
        ChainStep::Submit,
        ChainError::Rpc {
            code: -32000,
            message: "replacement transaction underpriced".into(),
        },
    );
    let err = h.offset(3000.0, "X").await.unwrap_err();

    let submitted = h.chain.submitted();
    assert_eq!(submitted.len(), 1);
    match err {
        OffsetError::SubmissionUncertain { hash, reason } => {
            assert_eq!(hash, hash_transaction(&submitted[0]));
            assert!(reason.contains("underpriced"));
        }
        other => panic!("expected SubmissionUncertain, got {other:?}"),
    }
}

#[tokio::test]
async fn submission_timeout_is_uncertain() {
    let signer = Harness::signer();
    let h = Harness::with_chain(
        NullChain::new()
            .with_account(signer)
            .with_balance(signer, 10_000),
        Duration::from_millis(50),
    );
    h.chain.delay_on(ChainStep::Submit, Duration::from_secs(5));
    let err = h.offset(3000.0, "X").await.unwrap_err();

    assert!(matches!(err, OffsetError::SubmissionUncertain { .. }));
    assert_eq!(err.class(), ErrorClass::Uncertain);
}

#[tokio::test]
async fn timeout_before_submission_is_transport() {
    let signer = Harness::signer();
    let h = Harness::with_chain(
        NullChain::new()
            .with_account(signer)
            .with_balance(signer, 10_000),
        Duration::from_millis(50),
    );
    h.chain.delay_on(ChainStep::Balance, Duration::from_secs(5));
    let err = h.offset(3000.0, "X").await.unwrap_err();

    assert!(matches!(err, OffsetError::Transport(ref m) if m.contains("balanceOf")));
    assert!(err.is_retryable());
    assert!(h.chain.submitted().is_empty());
}

#[tokio::test]
async fn gas_price_failure_is_transport() {
    let h = Harness::new(10_000);
    h.chain
        .fail_on(ChainStep::GasPrice, ChainError::Transport("connection refused".into()));
    let err = h.offset(3000.0, "X").await.unwrap_err();

    assert!(matches!(err, OffsetError::Transport(ref m) if m.contains("eth_gasPrice")));
    assert!(h.chain.submitted().is_empty());
}

#[tokio::test]
async fn unavailable_identity_fails_before_the_chain() {
    let h = Harness::new(10_000);
    h.identity.fail_with("keyfile missing");
    let err = h.offset(3000.0, "X").await.unwrap_err();

    assert!(matches!(err, OffsetError::SigningIdentity(_)));
    assert_eq!(h.chain.total_calls(), 0);
}

#[tokio::test]
async fn receipt_reports_estimated_cost() {
    let h = Harness::new(10_000);
    let receipt = h
        .agent
        .offset_with_receipt(EnergyConsumption::from_kwh(3000.0), &Region::from("X"))
        .await
        .unwrap();

    assert_eq!(receipt.assessment.footprint.value(), 1500.0);
    assert_eq!(receipt.assessment.emission_factor.value(), 0.5);
    assert_eq!(receipt.assessment.estimated_cost_usd, 1500.0 * 7.5);

    let json = serde_json::to_value(&receipt).unwrap();
    assert_eq!(json["volume"], 1500);
    assert_eq!(json["transaction"]["hash"], receipt.transaction.hash.to_string());
}

#[tokio::test]
async fn assessment_alone_never_touches_the_chain() {
    let h = Harness::new(0);
    let assessment = h
        .agent
        .assess(EnergyConsumption::from_kwh(3000.0), &Region::from("X"))
        .await
        .unwrap();
    assert_eq!(assessment.volume.get(), 1500);
    assert_eq!(h.chain.total_calls(), 0);
}

#[tokio::test]
async fn slow_region_lookup_times_out_as_transport() {
    let lookup = NullRegionLookup::new().with_region("X", 0.5);
    lookup.delay_by(Duration::from_secs(5));
    let assessor = Assessor::new(lookup, Duration::from_millis(50));

    let err = assessor
        .assess(EnergyConsumption::from_kwh(3000.0), &Region::from("X"))
        .await
        .unwrap_err();
    assert!(matches!(err, OffsetError::Transport(ref m) if m.contains("region lookup")));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn assessor_matches_the_agent() {
    let assessor = Assessor::new(NullRegionLookup::new().with_region("X", 0.5), TIMEOUT);
    let h = Harness::new(0);
    let consumption = EnergyConsumption::from_kwh(3000.0);
    let region = Region::from("X");

    assert_eq!(
        assessor.assess(consumption, &region).await.unwrap(),
        h.agent.assess(consumption, &region).await.unwrap()
    );
}

/// Collects `(span name, volume)` for every `volume` recorded after span
/// creation.
#[derive(Clone, Default)]
struct RecordedVolumes(Arc<Mutex<Vec<(&'static str, u64)>>>);

struct VolumeVisitor(Option<u64>);

impl Visit for VolumeVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "volume" {
            self.0 = Some(value);
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

impl<S> Layer<S> for RecordedVolumes
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        let mut visitor = VolumeVisitor(None);
        values.record(&mut visitor);
        if let (Some(volume), Some(span)) = (visitor.0, ctx.span(id)) {
            self.0.lock().unwrap().push((span.name(), volume));
        }
    }
}

#[tokio::test]
async fn offset_span_records_the_volume() {
    let recorded = RecordedVolumes::default();
    let subscriber = tracing_subscriber::registry().with(recorded.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let h = Harness::new(10_000);
    h.offset(3000.0, "X").await.unwrap();

    assert_eq!(*recorded.0.lock().unwrap(), vec![("offset", 1500)]);
}
