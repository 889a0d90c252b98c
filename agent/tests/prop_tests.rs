use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use offset_agent::{validate_volume, CreditBurner, OffsetError};
use offset_chain::CreditToken;
use offset_nullables::{NullChain, NullSigningIdentity};
use offset_types::{ChainAddress, CreditVolume, FootprintMass};

fn burn_against_balance(volume: u64, balance: u128) -> (Result<(), OffsetError>, usize) {
    let identity = Arc::new(NullSigningIdentity::default());
    let signer = identity.address();
    let chain = Arc::new(
        NullChain::new()
            .with_account(signer)
            .with_balance(signer, balance),
    );
    let burner = CreditBurner::new(
        identity,
        chain.clone(),
        chain.clone(),
        CreditToken::new(ChainAddress::new([0xc0; 20])),
        Duration::from_secs(5),
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let result = runtime.block_on(burner.burn(CreditVolume::new(volume).unwrap()));
    (result.map(|_| ()), chain.submitted().len())
}

proptest! {
    #[test]
    fn volume_valid_iff_truncation_reaches_one(mass in -1e6f64..1e6) {
        let result = validate_volume(FootprintMass::new(mass));
        if mass.trunc() >= 1.0 {
            prop_assert_eq!(result.unwrap().get(), mass.trunc() as u64);
        } else {
            let is_sub_threshold = matches!(result, Err(OffsetError::SubThresholdFootprint(_)));
            prop_assert!(is_sub_threshold);
        }
    }

    #[test]
    fn burn_refused_iff_volume_exceeds_balance(volume in 1u64..10_000, balance in 0u128..10_000) {
        let (result, submissions) = burn_against_balance(volume, balance);
        if u128::from(volume) > balance {
            let refused = matches!(result, Err(OffsetError::InsufficientBalance { .. }));
            prop_assert!(refused);
            prop_assert_eq!(submissions, 0);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(submissions, 1);
        }
    }
}
