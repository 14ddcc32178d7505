//! Device identification and account-key acquisition.
//!
//! Before any signing attempt the wallet needs two things from the device:
//! the signing app's version (to gate known-incompatible firmware at the UI
//! layer) and the account-level extended public key (to reconstruct witness
//! public keys without ever touching a private key). Both travel over the
//! same open session used later for signing.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use kabuto_core::constants::{DEVICE_MODEL, DEVICE_VENDOR};
use kabuto_core::error::DeviceError;
use kabuto_core::traits::SigningDevice;
use kabuto_core::types::{DeviceVersion, ExtendedPublicKey};

use crate::path::DerivationScheme;

/// Identity and firmware details of a connected device.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HwFeatures {
    /// Vendor string.
    pub vendor: String,
    /// Device model.
    pub model: String,
    /// User-assigned label, if any.
    pub label: String,
    /// Transport identifier of the device.
    pub device_id: String,
    /// Device UI language, if reported.
    pub language: String,
    /// Signing-app major version.
    pub major_version: u32,
    /// Signing-app minor version.
    pub minor_version: u32,
    /// Signing-app patch version.
    pub patch_version: u32,
}

/// Everything the wallet persists about a paired device.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HwDeviceInfo {
    /// Account-level extended public key: public key bytes immediately
    /// followed by chain-code bytes, hex-encoded.
    pub account_public_key_hex: String,
    /// Device identity and firmware details.
    pub features: HwFeatures,
}

/// Validate and flatten the raw device responses.
///
/// The concatenated key + chain code is the account-level extended public
/// key that witness normalization later derives from, so empty halves are
/// rejected here rather than surfacing as undecodable keys mid-signing.
fn normalize_device_info(
    version: DeviceVersion,
    xpub: ExtendedPublicKey,
    device_id: String,
) -> Result<HwDeviceInfo, DeviceError> {
    if xpub.public_key_hex.is_empty() {
        return Err(DeviceError::InvalidResponse(
            "extended public key response has no public key".into(),
        ));
    }
    if xpub.chain_code_hex.is_empty() {
        return Err(DeviceError::InvalidResponse(
            "extended public key response has no chain code".into(),
        ));
    }

    Ok(HwDeviceInfo {
        account_public_key_hex: format!("{}{}", xpub.public_key_hex, xpub.chain_code_hex),
        features: HwFeatures {
            vendor: DEVICE_VENDOR.to_owned(),
            model: DEVICE_MODEL.to_owned(),
            label: String::new(),
            device_id,
            language: String::new(),
            major_version: version.major,
            minor_version: version.minor,
            patch_version: version.patch,
        },
    })
}

/// Query a connected device for its version and account-level key.
///
/// `account` is the account to fetch the key for; single-account wallets
/// pass [`DEFAULT_ACCOUNT`](kabuto_core::constants::DEFAULT_ACCOUNT).
pub async fn fetch_device_info(
    device: &dyn SigningDevice,
    scheme: &DerivationScheme,
    account: u32,
    device_id: impl Into<String>,
) -> Result<HwDeviceInfo, DeviceError> {
    let version = device.version().await?;
    debug!(version = %version, "device app version");

    let account_path = scheme.account_path(account);
    debug!(?account_path, "requesting account extended public key");
    let xpub = device.extended_public_key(&account_path).await?;

    let info = normalize_device_info(version, xpub, device_id.into())?;
    info!(device_id = %info.features.device_id, version = %version, "device ready");
    Ok(info)
}
