//! Property-based tests for derivation and account bookkeeping.
//!
//! Mnemonics are generated from seeded RNGs so failures shrink to a
//! reproducible seed.
//!
//! Properties:
//! - derivation is a pure function of (mnemonic, coin type, index)
//! - distinct mnemonics yield distinct seeds and keys
//! - encoded private keys decode back to the derived bytes
//! - corrupting a single word is always caught
//! - no sequence of adds and deletes empties a wallet or reuses an index

use std::collections::BTreeSet;

use hdvault_wallet::chain::decode_private_key;
use hdvault_wallet::mnemonic::is_valid_word;
use hdvault_wallet::path::HARDENED_OFFSET;
use hdvault_wallet::{
    ChainKind, DerivationPath, MnemonicPhrase, Strength, Wallet, WalletError, derive_account,
    validate_mnemonic,
};
use hdvault_tests::helpers::*;
use proptest::prelude::*;

fn strength() -> impl Strategy<Value = Strength> {
    prop_oneof![Just(Strength::Words12), Just(Strength::Words24)]
}

fn chain() -> impl Strategy<Value = ChainKind> {
    prop_oneof![Just(ChainKind::Solana), Just(ChainKind::Ethereum)]
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    Delete(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Add),
        1 => (0usize..8).prop_map(Op::Delete),
    ]
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn derivation_is_deterministic(
        rng_seed in any::<u64>(),
        strength in strength(),
        chain in chain(),
        index in 0u32..HARDENED_OFFSET,
    ) {
        let mnemonic = mnemonic_from_u64(rng_seed, strength);
        let again = MnemonicPhrase::parse(mnemonic.phrase()).unwrap();

        let a = derive_account(&mnemonic.to_seed(""), chain.coin_type(), index);
        let b = derive_account(&again.to_seed(""), chain.coin_type(), index);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(&a, &b);
                prop_assert_eq!(a.path(), DerivationPath::new(chain.coin_type(), index).unwrap());
            }
            // An out-of-range secp256k1 scalar must fail the same way twice.
            (Err(a), Err(b)) => {
                prop_assert_eq!(&a, &b);
                prop_assert!(matches!(a, WalletError::KeyDerivation(_)));
            }
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a.is_ok(), b.is_ok()),
        }
    }

    #[test]
    fn distinct_mnemonics_distinct_seeds(a in any::<u64>(), b in any::<u64>()) {
        prop_assume!(a != b);
        let ma = mnemonic_from_u64(a, Strength::Words12);
        let mb = mnemonic_from_u64(b, Strength::Words12);
        prop_assume!(ma != mb);

        let sa = ma.to_seed("");
        let sb = mb.to_seed("");
        prop_assert_ne!(sa.as_bytes(), sb.as_bytes());

        let ka = derive_account(&sa, ChainKind::Solana.coin_type(), 0).unwrap();
        let kb = derive_account(&sb, ChainKind::Solana.coin_type(), 0).unwrap();
        prop_assert_ne!(ka.public_key(), kb.public_key());
    }

    #[test]
    fn private_key_encoding_roundtrip(
        rng_seed in any::<u64>(),
        chain in chain(),
        index in 0u32..1_000,
    ) {
        let seed = mnemonic_from_u64(rng_seed, Strength::Words12).to_seed("");
        if let Ok(kp) = derive_account(&seed, chain.coin_type(), index) {
            let decoded = decode_private_key(chain, &kp.encoded_private_key()).unwrap();
            prop_assert_eq!(&decoded, kp.private_key());
        }
    }
}

// ---------------------------------------------------------------------------
// Mnemonic validation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn generated_mnemonics_validate(rng_seed in any::<u64>(), strength in strength()) {
        let m = mnemonic_from_u64(rng_seed, strength);
        prop_assert_eq!(m.word_count(), strength.word_count());
        prop_assert!(validate_mnemonic(m.phrase()));
    }

    #[test]
    fn unknown_word_rejected(
        rng_seed in any::<u64>(),
        position in 0usize..12,
        junk in "[a-z]{3,8}",
    ) {
        prop_assume!(!is_valid_word(&junk));
        let m = mnemonic_from_u64(rng_seed, Strength::Words12);
        let mut words: Vec<&str> = m.words().collect();
        words[position] = &junk;
        let candidate = words.join(" ");

        prop_assert!(!validate_mnemonic(&candidate));
        let err = MnemonicPhrase::parse(&candidate).unwrap_err();
        prop_assert!(matches!(err, WalletError::InvalidMnemonic(_)));
    }

    #[test]
    fn whitespace_and_case_are_normalized(rng_seed in any::<u64>(), upper in any::<bool>()) {
        let m = mnemonic_from_u64(rng_seed, Strength::Words12);
        let messy = format!("\t {} \n", m.words().collect::<Vec<_>>().join("   "));
        let messy = if upper { messy.to_uppercase() } else { messy };
        let parsed = MnemonicPhrase::parse(&messy).unwrap();
        prop_assert_eq!(parsed.phrase(), m.phrase());
    }
}

// ---------------------------------------------------------------------------
// Account bookkeeping
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn accounts_never_empty_and_indices_never_reused(ops in prop::collection::vec(op(), 1..12)) {
        let mut wallet = abandon_wallet();
        let mut issued = BTreeSet::from([0u32]);

        for op in ops {
            let before = wallet.len();
            let next_before = wallet.next_account_index();
            match op {
                Op::Add => {
                    let index = wallet.add_account().unwrap().account_index();
                    prop_assert_eq!(index, next_before);
                    prop_assert!(issued.insert(index), "index {} issued twice", index);
                }
                Op::Delete(position) => match wallet.delete_account(position) {
                    Ok(removed) => {
                        prop_assert!(issued.contains(&removed.account_index()));
                        prop_assert_eq!(wallet.len(), before - 1);
                    }
                    Err(WalletError::InvariantViolation(_)) => {
                        prop_assert_eq!(before, 1);
                        prop_assert_eq!(wallet.len(), 1);
                    }
                    Err(WalletError::AccountNotFound { position: p, len }) => {
                        prop_assert_eq!(p, position);
                        prop_assert_eq!(len, before);
                        prop_assert_eq!(wallet.len(), before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                },
            }
            prop_assert!(!wallet.is_empty());
            prop_assert!(wallet.next_account_index() >= next_before);

            let live: Vec<u32> = wallet.accounts().iter().map(|a| a.account_index()).collect();
            let mut sorted = live.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), live.len());
            prop_assert!(live.iter().all(|i| *i < wallet.next_account_index()));
        }
    }

    #[test]
    fn rederive_matches_every_record(adds in 0usize..5) {
        let mut wallet: Wallet = abandon_wallet();
        for _ in 0..adds {
            wallet.add_account().unwrap();
        }
        for account in wallet.accounts() {
            let again = wallet.rederive(account.account_index()).unwrap();
            prop_assert_eq!(&again, account);
        }
    }
}
