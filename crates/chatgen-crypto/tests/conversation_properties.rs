//! Property-based tests for the conversation cipher
//!
//! These tests verify the fundamental invariants of the scheme:
//!
//! 1. **Round-trip**: decrypt(encrypt(m, a, b), a, b) == m, in either id order
//! 2. **Fresh IVs**: encrypting the same message twice gives two tokens
//! 3. **Wrong-key rejection**: another pair fails authentication, never
//!    returns plausible plaintext
//! 4. **Interop**: tokens produced by an independent PBKDF2 + AES-GCM
//!    implementation decrypt to the expected text
//!
//! Every case pays for PBKDF2 with 100k iterations, so case counts are low.

use std::sync::atomic::{AtomicU8, Ordering};

use chatgen_crypto::{
    CipherConfig, CipherError, ConversationCipher, CryptoBackend, IV_LENGTH, SystemBackend,
    is_likely_encrypted,
};
use proptest::prelude::*;

/// Backend handing out a counter as IV bytes
struct CountingIv {
    next: AtomicU8,
}

impl CountingIv {
    fn new() -> Self {
        Self { next: AtomicU8::new(0) }
    }
}

impl CryptoBackend for CountingIv {
    fn fill_random(&self, buffer: &mut [u8]) -> Result<(), CipherError> {
        buffer.fill(self.next.fetch_add(1, Ordering::Relaxed));
        Ok(())
    }
}

fn participant_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,28}"
}

#[test]
fn scenario_user1_to_user2() {
    let sender: ConversationCipher = ConversationCipher::default();
    let recipient: ConversationCipher = ConversationCipher::default();

    let token = sender.encrypt("Hello!", "user1", "user2").unwrap();
    let received = recipient.decrypt(token.as_str(), "user2", "user1").unwrap();

    assert_eq!(received, "Hello!");
}

#[test]
fn decrypts_token_from_independent_implementation() {
    // PBKDF2-HMAC-SHA256 + AES-256-GCM with IV 0xAB * 12, produced outside
    // this crate
    let token = "q6urq6urq6urq6ur5nMV6P5Uxog6QpugRaH1O6e4l7kVzt//4+fmKXc0gZMNdw==";
    let cipher: ConversationCipher = ConversationCipher::default();

    assert_eq!(cipher.decrypt(token, "user1", "user2").unwrap(), "héllo wörld 👋");
}

#[test]
fn independent_token_rejects_other_pair() {
    let token = "AAECAwQFBgcICQoLEvS9Pl1dBowbTQHYPnbVQUTKi17Y1w==";
    let cipher: ConversationCipher = ConversationCipher::default();

    assert_eq!(cipher.decrypt(token, "user1", "user3"), Err(CipherError::AuthenticationFailure));
}

#[test]
fn heuristic_boundary() {
    let cipher: ConversationCipher = ConversationCipher::default();
    let token = cipher.encrypt("hello world, this is a longer message", "a", "b").unwrap();

    assert!(!is_likely_encrypted("hi"));
    assert!(is_likely_encrypted(token.as_str()));
}

#[test]
fn injected_iv_is_used() {
    let cipher = ConversationCipher::with_backend(CountingIv::new(), CipherConfig::default());

    let first = cipher.encrypt("same", "a", "b").unwrap();
    let second = cipher.encrypt("same", "a", "b").unwrap();

    assert_ne!(first, second);
    assert!(first.as_str().starts_with("AAAAAAAAAAAAAAAA"), "first IV is all zeros");
    assert_eq!(cipher.decrypt(second.as_str(), "b", "a").unwrap(), "same");
}

#[test]
fn shared_cipher_across_threads() {
    let cipher = std::sync::Arc::new(ConversationCipher::<SystemBackend>::default());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let cipher = std::sync::Arc::clone(&cipher);
            std::thread::spawn(move || {
                let message = format!("message {i}");
                let token = cipher.encrypt(&message, "a", "b").unwrap();
                cipher.decrypt(token.as_str(), "b", "a").unwrap() == message
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(cipher.cached_keys(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_roundtrip_in_both_orders(
        plaintext in any::<String>(),
        id_a in participant_id(),
        id_b in participant_id(),
    ) {
        let cipher: ConversationCipher = ConversationCipher::default();
        let token = cipher.encrypt(&plaintext, &id_a, &id_b).unwrap();

        prop_assert_eq!(cipher.decrypt(token.as_str(), &id_a, &id_b).unwrap(), plaintext.clone());
        prop_assert_eq!(cipher.decrypt(token.as_str(), &id_b, &id_a).unwrap(), plaintext);
    }

    #[test]
    fn prop_tokens_are_not_deterministic(
        plaintext in ".{0,64}",
        id_a in participant_id(),
        id_b in participant_id(),
    ) {
        let cipher: ConversationCipher = ConversationCipher::default();

        let token1 = cipher.encrypt(&plaintext, &id_a, &id_b).unwrap();
        let token2 = cipher.encrypt(&plaintext, &id_a, &id_b).unwrap();

        prop_assert_ne!(&token1, &token2);
        prop_assert_eq!(cipher.decrypt(token1.as_str(), &id_a, &id_b).unwrap(), plaintext.clone());
        prop_assert_eq!(cipher.decrypt(token2.as_str(), &id_a, &id_b).unwrap(), plaintext);
    }

    #[test]
    fn prop_wrong_pair_fails_authentication(
        plaintext in ".{0,64}",
        id_a in participant_id(),
        id_b in participant_id(),
        id_c in participant_id(),
    ) {
        // Concatenation without separator: (a, b) and (a, c) only share a key
        // when their canonical forms match
        prop_assume!(
            chatgen_crypto::canonicalize(&id_a, &id_b) != chatgen_crypto::canonicalize(&id_a, &id_c)
        );

        let cipher: ConversationCipher = ConversationCipher::default();
        let token = cipher.encrypt(&plaintext, &id_a, &id_b).unwrap();

        prop_assert_eq!(
            cipher.decrypt(token.as_str(), &id_a, &id_c),
            Err(CipherError::AuthenticationFailure)
        );
    }

    #[test]
    fn prop_tokens_look_encrypted(plaintext in ".{0,64}") {
        let cipher: ConversationCipher = ConversationCipher::default();
        let token = cipher.encrypt(&plaintext, "a", "b").unwrap();

        prop_assert!(is_likely_encrypted(token.as_str()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_heuristic_never_panics(text in any::<String>()) {
        let _ = is_likely_encrypted(&text);
    }

    #[test]
    fn prop_short_decodings_are_malformed(bytes in prop::collection::vec(any::<u8>(), 0..IV_LENGTH)) {
        use base64::Engine as _;

        let token = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let cipher: ConversationCipher = ConversationCipher::default();

        let result = cipher.decrypt(&token, "a", "b");
        let is_malformed = matches!(result, Err(CipherError::MalformedToken { .. }));
        prop_assert!(is_malformed);
        prop_assert_eq!(cipher.cached_keys(), 0);
    }
}
