use {
    crate::constants::SHA256_OUTPUT_LEN,
    hmac::{Hmac, Mac},
    sha2::{Digest, Sha256},
};

type HmacSha256 = Hmac<Sha256>;

/// Wrapper function to form a HMAC-SHA256 operation.
#[inline(always)]
pub(crate) fn hmac_sha256(key: &[u8], value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(value);
    mac.finalize().into_bytes().into()
}

#[inline(always)]
pub(crate) fn sha256(value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    Sha256::digest(value).into()
}

#[inline(always)]
pub(crate) fn sha256_hex(value: &[u8]) -> String {
    hex::encode(sha256(value))
}
