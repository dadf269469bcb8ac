use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use blake2::{digest::consts::U32, Blake2b, Digest};
use ed25519_dalek::{Signer as _, SigningKey, SECRET_KEY_LENGTH};

use crate::{
    constants::{ADMIN_KEY_ENV, ED25519_FLAG, PRIVATE_KEY_HRP},
    error::Error,
};

type Blake2b256 = Blake2b<U32>;

// Intent prefix for user transaction signing: scope, version, app id.
const TX_INTENT: [u8; 3] = [0, 0, 0];

/// Ed25519 signer holding the admin key, decoded from the bech32
/// `suiprivkey…` format.
pub struct SuiSigner {
    key: SigningKey,
    address: String,
}

impl SuiSigner {
    pub fn from_env() -> Result<Self, Error> {
        let encoded = std::env::var(ADMIN_KEY_ENV)
            .map_err(|_| Error::configuration(format!("{ADMIN_KEY_ENV} is not set")))?;
        Self::from_bech32(&encoded)
    }

    pub fn from_bech32(encoded: &str) -> Result<Self, Error> {
        let (hrp, data) = bech32::decode(encoded)
            .map_err(|e| Error::configuration(format!("invalid private key encoding: {e}")))?;

        if hrp.as_str() != PRIVATE_KEY_HRP {
            return Err(Error::configuration(format!(
                "unexpected private key prefix: {}",
                hrp.as_str()
            )));
        }

        // flag byte followed by the 32-byte secret
        if data.len() != SECRET_KEY_LENGTH + 1 || data[0] != ED25519_FLAG {
            return Err(Error::configuration(
                "private key is not an ed25519 key".to_string(),
            ));
        }

        let mut secret = [0u8; SECRET_KEY_LENGTH];
        secret.copy_from_slice(&data[1..]);

        Ok(Self::from_secret(secret))
    }

    fn from_secret(secret: [u8; SECRET_KEY_LENGTH]) -> Self {
        let key = SigningKey::from_bytes(&secret);

        let mut hasher = Blake2b256::new();
        hasher.update([ED25519_FLAG]);
        hasher.update(key.verifying_key().as_bytes());
        let address = format!("0x{}", hex::encode(hasher.finalize()));

        Self { key, address }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Signs node-built transaction bytes (base64 BCS) under the transaction
    /// intent and returns the serialized signature the execution endpoint
    /// expects: base64(flag ‖ signature ‖ pubkey).
    pub fn sign_tx_bytes(&self, tx_bytes_b64: &str) -> Result<String, Error> {
        let tx_bytes = BASE64
            .decode(tx_bytes_b64)
            .map_err(|e| Error::submission(format!("transaction bytes are not base64: {e}")))?;

        let mut message = Vec::with_capacity(TX_INTENT.len() + tx_bytes.len());
        message.extend_from_slice(&TX_INTENT);
        message.extend_from_slice(&tx_bytes);

        let mut hasher = Blake2b256::new();
        hasher.update(&message);
        let digest = hasher.finalize();

        let signature = self.key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(self.key.verifying_key().as_bytes());

        Ok(BASE64.encode(serialized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bech32::{Bech32, Hrp};

    fn encode_key(hrp: &str, payload: &[u8]) -> String {
        bech32::encode::<Bech32>(Hrp::parse(hrp).unwrap(), payload).unwrap()
    }

    #[test]
    fn decodes_bech32_key_and_derives_address() {
        let mut payload = vec![ED25519_FLAG];
        payload.extend_from_slice(&[7u8; SECRET_KEY_LENGTH]);
        let encoded = encode_key(PRIVATE_KEY_HRP, &payload);

        let signer = SuiSigner::from_bech32(&encoded).unwrap();
        assert!(signer.address().starts_with("0x"));
        assert_eq!(signer.address().len(), 66);
    }

    #[test]
    fn rejects_wrong_prefix() {
        let mut payload = vec![ED25519_FLAG];
        payload.extend_from_slice(&[7u8; SECRET_KEY_LENGTH]);
        let encoded = encode_key("otherkey", &payload);

        assert!(matches!(
            SuiSigner::from_bech32(&encoded),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn rejects_non_ed25519_flag() {
        let mut payload = vec![0x01];
        payload.extend_from_slice(&[7u8; SECRET_KEY_LENGTH]);
        let encoded = encode_key(PRIVATE_KEY_HRP, &payload);

        assert!(matches!(
            SuiSigner::from_bech32(&encoded),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn serialized_signature_has_flag_sig_and_pubkey() {
        let signer = SuiSigner::from_secret([9u8; SECRET_KEY_LENGTH]);
        let tx_bytes = BASE64.encode(b"arbitrary transaction payload");

        let sig_b64 = signer.sign_tx_bytes(&tx_bytes).unwrap();
        let sig = BASE64.decode(sig_b64).unwrap();
        assert_eq!(sig.len(), 1 + 64 + 32);
        assert_eq!(sig[0], ED25519_FLAG);
        assert_eq!(&sig[65..], signer.key.verifying_key().as_bytes());
    }

    #[test]
    fn rejects_garbage_tx_bytes() {
        let signer = SuiSigner::from_secret([9u8; SECRET_KEY_LENGTH]);
        assert!(matches!(
            signer.sign_tx_bytes("not base64!!"),
            Err(Error::Submission(_))
        ));
    }
}
