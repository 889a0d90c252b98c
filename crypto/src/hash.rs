//! Transaction hashing.

use alloy::primitives::keccak256;
use offset_types::TxHash;

/// Hash a raw signed transaction to produce the `TxHash` the chain will report.
pub fn hash_transaction(raw_tx: &[u8]) -> TxHash {
    keccak256(raw_tx).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_keccak256() {
        assert_eq!(
            hash_transaction(b"").to_string(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn hash_transaction_returns_txhash() {
        let h = hash_transaction(b"raw tx bytes");
        assert!(!h.is_zero());
    }
}
