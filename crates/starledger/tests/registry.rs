//! End-to-end admission scenarios: challenge, sign, submit, query.

use std::sync::Arc;

use starledger::{
    Keypair, Ledger, ManualClock, RegistryConfig, RegistryError, Star, StarRegistry,
    WalletAddress,
};

const T0: i64 = 1_736_870_400;

fn setup() -> (StarRegistry, Arc<Ledger>, Arc<ManualClock>) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let clock = Arc::new(ManualClock::new(T0));
    let ledger = Arc::new(Ledger::with_clock(clock.clone()).unwrap());
    let registry = StarRegistry::with_clock(
        ledger.clone(),
        RegistryConfig::default(),
        clock.clone(),
    );
    (registry, ledger, clock)
}

fn orion() -> Star {
    Star {
        ra: "5h 55m 10.3s".to_string(),
        dec: "7 deg 24' 25.4".to_string(),
        story: "Betelgeuse, before it goes".to_string(),
    }
}

fn lyra() -> Star {
    Star {
        ra: "18h 36m 56.3s".to_string(),
        dec: "38 deg 47' 1.3".to_string(),
        story: "Vega for my daughter".to_string(),
    }
}

#[test]
fn fresh_challenge_is_admitted() {
    let (registry, ledger, _) = setup();
    let wallet = Keypair::from_seed(&[0x01; 32]);
    let address = wallet.address();

    let message = registry.issue_challenge(&address);
    let signature = wallet.sign(&message);

    let block = registry
        .verify_and_admit(&address, &message, &signature.to_hex(), orion())
        .unwrap();

    assert_eq!(block.height, 1);
    assert_eq!(ledger.height(), 1);
    assert_eq!(
        block.previous_hash,
        Some(ledger.block_by_height(0).unwrap().hash)
    );
    assert!(ledger.validate().is_empty());
}

#[test]
fn admitted_payload_round_trips() {
    let (registry, ledger, _) = setup();
    let wallet = Keypair::from_seed(&[0x02; 32]);
    let address = wallet.address();

    let message = registry.issue_challenge(&address);
    let signature = wallet.sign(&message);
    let block = registry
        .verify_and_admit(&address, &message, &signature.to_hex(), orion())
        .unwrap();

    let body = ledger
        .block_by_hash(&block.hash)
        .unwrap()
        .decode_body()
        .unwrap();
    let entry = body.as_entry().unwrap();
    assert_eq!(entry.address, address);
    assert_eq!(entry.message, message);
    assert_eq!(entry.signature, signature.to_hex());
    assert_eq!(entry.star, orion());
}

#[test]
fn stale_challenge_is_rejected_before_signature_checking() {
    let (registry, ledger, clock) = setup();
    let wallet = Keypair::from_seed(&[0x03; 32]);
    let address = wallet.address();

    let message = registry.issue_challenge(&address);
    let signature = wallet.sign(&message);

    clock.advance(301);

    let result = registry.verify_and_admit(&address, &message, &signature.to_hex(), orion());
    assert!(matches!(
        result,
        Err(RegistryError::ExpiredChallenge {
            elapsed_secs: 301,
            window_secs: 300,
        })
    ));
    // Nothing was appended.
    assert_eq!(ledger.height(), 0);
}

#[test]
fn challenge_at_window_edge_is_still_admitted() {
    let (registry, _, clock) = setup();
    let wallet = Keypair::from_seed(&[0x04; 32]);
    let address = wallet.address();

    let message = registry.issue_challenge(&address);
    let signature = wallet.sign(&message);

    clock.advance(300);

    registry
        .verify_and_admit(&address, &message, &signature.to_hex(), orion())
        .expect("a challenge exactly at the window edge is not expired");
}

#[test]
fn foreign_signature_is_rejected() {
    let (registry, ledger, _) = setup();
    let owner = Keypair::from_seed(&[0x05; 32]);
    let intruder = Keypair::from_seed(&[0x06; 32]);
    let address = owner.address();

    let message = registry.issue_challenge(&address);
    let forged = intruder.sign(&message);

    let result = registry.verify_and_admit(&address, &message, &forged.to_hex(), orion());
    assert!(matches!(result, Err(RegistryError::InvalidSignature)));
    assert_eq!(ledger.height(), 0);
}

#[test]
fn garbage_signature_text_is_rejected() {
    let (registry, _, _) = setup();
    let wallet = Keypair::from_seed(&[0x07; 32]);
    let address = wallet.address();
    let message = registry.issue_challenge(&address);

    let result = registry.verify_and_admit(&address, &message, "definitely-not-hex", orion());
    assert!(matches!(result, Err(RegistryError::InvalidSignature)));
}

#[test]
fn tampered_challenge_fails_signature_check() {
    let (registry, _, _) = setup();
    let wallet = Keypair::from_seed(&[0x08; 32]);
    let address = wallet.address();

    let message = registry.issue_challenge(&address);
    let signature = wallet.sign(&message);
    let tampered = message.replace("starRegistry", "starRegistrX");

    let result = registry.verify_and_admit(&address, &tampered, &signature.to_hex(), orion());
    assert!(matches!(result, Err(RegistryError::InvalidSignature)));
}

#[test]
fn unparseable_message_is_malformed() {
    let (registry, _, _) = setup();
    let wallet = Keypair::from_seed(&[0x09; 32]);
    let address = wallet.address();
    let signature = wallet.sign("just some text");

    let result =
        registry.verify_and_admit(&address, "just some text", &signature.to_hex(), orion());
    assert!(matches!(result, Err(RegistryError::MalformedChallenge)));
}

#[test]
fn two_wallets_interleaved_partition_cleanly() {
    let (registry, ledger, _) = setup();
    let alice = Keypair::from_seed(&[0x0a; 32]);
    let bob = Keypair::from_seed(&[0x0b; 32]);

    let submit = |wallet: &Keypair, star: Star| {
        let address = wallet.address();
        let message = registry.issue_challenge(&address);
        let signature = wallet.sign(&message);
        registry
            .verify_and_admit(&address, &message, &signature.to_hex(), star)
            .unwrap()
    };

    let a1 = submit(&alice, orion());
    let b1 = submit(&bob, lyra());

    assert_eq!(a1.height, 1);
    assert_eq!(b1.height, 2);

    let alice_stars = ledger.stars_by_address(&alice.address());
    assert_eq!(alice_stars, vec![orion()]);

    let bob_stars = ledger.stars_by_address(&bob.address());
    assert_eq!(bob_stars, vec![lyra()]);

    let nobody = WalletAddress::new("00".repeat(32));
    assert!(ledger.stars_by_address(&nobody).is_empty());

    assert!(ledger.validate().is_empty());
}

#[test]
fn chain_stays_linked_across_many_admissions() {
    let (registry, ledger, clock) = setup();
    let wallet = Keypair::from_seed(&[0x0c; 32]);
    let address = wallet.address();

    for i in 0..12 {
        clock.advance(7);
        let message = registry.issue_challenge(&address);
        let signature = wallet.sign(&message);
        let star = Star {
            ra: format!("{}h 0m 0.0s", i),
            dec: "0 deg 0' 0.0".to_string(),
            story: format!("star number {}", i),
        };
        registry
            .verify_and_admit(&address, &message, &signature.to_hex(), star)
            .unwrap();
    }

    assert_eq!(ledger.height(), 12);
    for height in 1..=12 {
        let block = ledger.block_by_height(height).unwrap();
        let below = ledger.block_by_height(height - 1).unwrap();
        assert_eq!(block.height, height);
        assert_eq!(block.previous_hash, Some(below.hash));
    }
    assert!(ledger.validate().is_empty());
    assert_eq!(ledger.stars_by_address(&address).len(), 12);
}
