//! Fuzz target for conversation tokens
//!
//! Feeds adversarial stored bodies through the token heuristic and the
//! decrypt path, and checks encryption against arbitrary plaintext.
//!
//! # Strategy
//!
//! - Arbitrary strings as stored bodies (mostly not base64)
//! - Arbitrary bytes encoded as base64, so decoding succeeds and the
//!   length and authentication checks are reached
//! - Participant ids drawn from a small pool so derived keys stay cached
//!
//! # Invariants
//!
//! - Neither the heuristic nor decrypt ever panics
//! - Decodings shorter than the IV are rejected as malformed
//! - Encrypt/decrypt roundtrip succeeds in either id order
//! - Flipping any byte of a token fails authentication

#![no_main]

use std::sync::LazyLock;

use arbitrary::Arbitrary;
use base64::Engine as _;
use chatgen_crypto::{CipherError, ConversationCipher, IV_LENGTH, is_likely_encrypted};
use libfuzzer_sys::fuzz_target;

const PARTICIPANTS: [&str; 4] = ["user1", "user2", "alice", "bob"];

static CIPHER: LazyLock<ConversationCipher> = LazyLock::new(ConversationCipher::default);

#[derive(Debug, Arbitrary)]
enum TokenScenario {
    /// Stored body taken as-is
    RawBody { body: String, from: u8, to: u8 },
    /// Bytes encoded as a well-formed base64 token
    EncodedBytes { bytes: Vec<u8>, from: u8, to: u8 },
    /// Real token, optionally corrupted at one position
    Roundtrip { plaintext: String, from: u8, to: u8, flip: Option<(u16, u8)> },
}

fn participant(index: u8) -> &'static str {
    PARTICIPANTS[usize::from(index) % PARTICIPANTS.len()]
}

fuzz_target!(|scenario: TokenScenario| {
    match scenario {
        TokenScenario::RawBody { body, from, to } => {
            let _ = is_likely_encrypted(&body);
            let _ = CIPHER.decrypt(&body, participant(from), participant(to));
        },
        TokenScenario::EncodedBytes { bytes, from, to } => {
            let token = base64::engine::general_purpose::STANDARD.encode(&bytes);
            let result = CIPHER.decrypt(&token, participant(from), participant(to));

            if bytes.len() < IV_LENGTH {
                assert!(matches!(result, Err(CipherError::MalformedToken { .. })));
            }
        },
        TokenScenario::Roundtrip { plaintext, from, to, flip } => {
            let (a, b) = (participant(from), participant(to));
            let Some(token) = CIPHER.encrypt(&plaintext, a, b) else {
                return;
            };

            assert!(is_likely_encrypted(token.as_str()));
            assert_eq!(CIPHER.decrypt(token.as_str(), b, a).as_deref(), Ok(plaintext.as_str()));

            if let Some((position, mask)) = flip
                && mask != 0
            {
                let mut raw = base64::engine::general_purpose::STANDARD
                    .decode(token.as_str())
                    .expect("token is valid base64");
                let index = usize::from(position) % raw.len();
                raw[index] ^= mask;

                let corrupted = base64::engine::general_purpose::STANDARD.encode(&raw);
                assert_eq!(
                    CIPHER.decrypt(&corrupted, a, b),
                    Err(CipherError::AuthenticationFailure)
                );
            }
        },
    }
});
