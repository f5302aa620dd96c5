//! Agent identity: Ed25519 keypair, derived address, and BIP39 recovery.

use {
    crate::error::IdentityError,
    bip39::Mnemonic,
    ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey},
    serde::{Deserialize, Serialize},
    std::{fmt, path::Path, str::FromStr},
    zeroize::Zeroize,
};

/// A 32-byte Ed25519 public key rendered as `"0x"` + lowercase hex.
///
/// The address is simultaneously the agent's identifier and its
/// verification key; there is no separate key lookup.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 32]);

impl Address {
    pub fn from_verifying_key(vk: &VerifyingKey) -> Self {
        Self(vk.to_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `addr[0:6] + "..." + addr[-4:]`. Display only, not authoritative.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }

    /// `addr[0:10] + "@" + domain`. Display only, not authoritative.
    pub fn email(&self, domain: &str) -> String {
        let full = self.to_string();
        format!("{}@{}", &full[..10], domain)
    }

    fn verifying_key(&self) -> Option<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0).ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

/// Parse error for [`Address::from_str`]. Deliberately uninformative: the
/// protocol only ever needs to know "this wasn't a valid address".
#[derive(Debug, thiserror::Error)]
#[error("invalid address")]
pub struct AddressParseError;

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").ok_or(AddressParseError)?;
        if hex_part.len() != 64 {
            return Err(AddressParseError);
        }
        let bytes = hex::decode(hex_part).map_err(|_| AddressParseError)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| AddressParseError)?;
        Ok(Self(arr))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A local, private record tying an [`Address`] to its 32-byte signing
/// seed. The seed never leaves the identity; only the derived address
/// and signatures are meant to cross a process boundary.
pub struct Identity {
    signing_key: SigningKey,
    address: Address,
    mnemonic: Option<String>,
}

impl Identity {
    /// Generate a fresh identity: 128-bit-entropy mnemonic, standard
    /// BIP39 seed expansion, first 32 bytes as the signing seed.
    pub fn generate() -> Self {
        let mnemonic = Mnemonic::generate(12).expect("12 words is a supported word count");
        let identity = Self::from_mnemonic(&mnemonic);
        Self {
            mnemonic: Some(mnemonic.to_string()),
            ..identity
        }
    }

    /// Recover an identity from a previously captured recovery phrase.
    pub fn recover(phrase: &str) -> Result<Self, IdentityError> {
        let mnemonic = Mnemonic::parse(phrase.trim()).map_err(|_| IdentityError::InvalidMnemonic)?;
        let identity = Self::from_mnemonic(&mnemonic);
        Ok(Self {
            mnemonic: Some(mnemonic.to_string()),
            ..identity
        })
    }

    fn from_mnemonic(mnemonic: &Mnemonic) -> Self {
        let mut seed64 = mnemonic.to_seed("");
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&seed64[..32]);
        seed64.zeroize();

        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        let address = Address::from_verifying_key(&signing_key.verifying_key());

        Self {
            signing_key,
            address,
            mnemonic: None,
        }
    }

    fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let address = Address::from_verifying_key(&signing_key.verifying_key());
        Self {
            signing_key,
            address,
            mnemonic: None,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The recovery phrase, if this identity was generated or recovered
    /// in this process. `Load` never populates this.
    pub fn mnemonic(&self) -> Option<&str> {
        self.mnemonic.as_deref()
    }

    pub fn sign(&self, msg: &[u8]) -> [u8; 64] {
        self.signing_key.sign(msg).to_bytes()
    }

    /// Write `dir/keys/agent.key` (raw seed), optionally
    /// `dir/keys/recovery.txt`, and a plaintext warning file. Owner-only
    /// permissions are applied on POSIX; skipped elsewhere.
    pub fn save(&self, dir: &Path) -> Result<(), IdentityError> {
        let keys_dir = dir.join("keys");
        std::fs::create_dir_all(&keys_dir)?;

        let key_path = keys_dir.join("agent.key");
        std::fs::write(&key_path, self.signing_key.to_bytes())?;
        harden_permissions(&key_path)?;

        if let Some(phrase) = &self.mnemonic {
            let recovery_path = keys_dir.join("recovery.txt");
            std::fs::write(&recovery_path, phrase)?;
            harden_permissions(&recovery_path)?;
        }

        std::fs::write(
            keys_dir.join("DO_NOT_SHARE"),
            "This directory holds private signing material for an agent identity.\n\
             Anyone who reads agent.key or recovery.txt can impersonate this agent.\n",
        )?;

        Ok(())
    }

    /// Load an identity from `dir/keys/agent.key`. Returns `Ok(None)` if
    /// the key file does not exist; the loaded identity never carries a
    /// mnemonic, only the signing seed.
    pub fn load(dir: &Path) -> Result<Option<Self>, IdentityError> {
        let key_path = dir.join("keys").join("agent.key");
        let bytes = match std::fs::read(&key_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let len = bytes.len();
        let seed: [u8; 32] = bytes.try_into().map_err(|_| IdentityError::CorruptKey {
            path: key_path.display().to_string(),
            len,
        })?;

        Ok(Some(Self::from_seed(seed)))
    }
}

#[cfg(unix)]
fn harden_permissions(path: &Path) -> Result<(), IdentityError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn harden_permissions(_path: &Path) -> Result<(), IdentityError> {
    Ok(())
}

/// Verify a signature against an address's embedded verification key.
/// Never panics or raises: any malformed input simply fails to verify.
pub fn verify(address: &Address, msg: &[u8], sig: &[u8]) -> bool {
    let Some(vk) = address.verifying_key() else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; 64]>::try_from(sig) else {
        return false;
    };
    let signature = Signature::from_bytes(&sig_bytes);
    vk.verify_strict(msg, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verifies_against_own_address() {
        let identity = Identity::generate();
        let sig = identity.sign(b"hello");
        assert!(verify(&identity.address(), b"hello", &sig));
    }

    #[test]
    fn sign_does_not_verify_against_other_address() {
        let a = Identity::generate();
        let b = Identity::generate();
        let sig = a.sign(b"hello");
        assert!(!verify(&b.address(), b"hello", &sig));
    }

    #[test]
    fn verify_rejects_malformed_signature() {
        let identity = Identity::generate();
        assert!(!verify(&identity.address(), b"hello", b"too-short"));
    }

    #[test]
    fn address_parse_rejects_wrong_length() {
        assert!("0xnope".parse::<Address>().is_err());
        assert!("deadbeef".parse::<Address>().is_err());
    }

    #[test]
    fn address_roundtrips_through_display_and_parse() {
        let identity = Identity::generate();
        let rendered = identity.address().to_string();
        assert_eq!(rendered.len(), 66);
        let parsed: Address = rendered.parse().unwrap();
        assert_eq!(parsed, identity.address());
    }

    #[test]
    fn recovery_round_trip_preserves_address_and_signing() {
        let original = Identity::generate();
        let phrase = original.mnemonic().unwrap().to_string();
        let recovered = Identity::recover(&phrase).unwrap();
        assert_eq!(original.address(), recovered.address());

        let sig = recovered.sign(b"after recovery");
        assert!(verify(&original.address(), b"after recovery", &sig));
    }

    #[test]
    fn recover_rejects_bad_checksum() {
        let bad = "abandon abandon abandon abandon abandon abandon \
                   abandon abandon abandon abandon abandon abandon";
        assert!(matches!(
            Identity::recover(bad),
            Err(IdentityError::InvalidMnemonic)
        ));
    }

    #[test]
    fn save_then_load_round_trips_signing_seed() {
        let dir = tempfile::tempdir().unwrap();
        let original = Identity::generate();
        original.save(dir.path()).unwrap();

        let loaded = Identity::load(dir.path()).unwrap().expect("key file exists");
        assert_eq!(loaded.address(), original.address());
        assert!(loaded.mnemonic().is_none());
    }

    #[test]
    fn load_returns_none_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Identity::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn load_reports_corrupt_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("keys")).unwrap();
        std::fs::write(dir.path().join("keys").join("agent.key"), b"short").unwrap();
        assert!(matches!(
            Identity::load(dir.path()),
            Err(IdentityError::CorruptKey { len: 5, .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn save_hardens_permissions_on_unix() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        Identity::generate().save(dir.path()).unwrap();
        let mode = std::fs::metadata(dir.path().join("keys").join("agent.key"))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600);
    }
}
