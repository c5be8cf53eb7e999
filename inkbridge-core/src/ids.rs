//! Decoding of SplatNet's base64-wrapped identifiers and the stable upload ids
//! derived from them.
//!
//! SplatNet ids look like `base64("VsStage-12")` or
//! `base64("VsHistoryDetail-u-xxxx:RECENT:20220915T001234_<uuid>")`.
//! Three uuid schemes are in circulation among uploaders, so dedup checks all
//! of them; new uploads always use [`IdScheme::Canonical`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::constants::{ID_TAIL_LEN, NAMESPACE_FULL, NAMESPACE_TAIL};
use crate::error::MappingError;
use crate::session::SessionKind;

/// Uuid derivation schemes understood by stat.ink uploaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdScheme {
    /// Versus sessions keyed by the id tail, coop sessions by the whole id.
    Canonical,
    /// Id tail under the coop namespace.
    TailKeyed,
    /// Whole id under the versus namespace.
    FullKeyed,
}

impl IdScheme {
    pub const ALL: [Self; 3] = [Self::Canonical, Self::TailKeyed, Self::FullKeyed];
}

/// Decode a base64 SplatNet id into its UTF-8 text.
///
/// # Errors
///
/// Returns [`MappingError::MalformedId`] if the id is not base64 or not UTF-8.
pub fn decode_native_id(id: &str) -> Result<String, MappingError> {
    let malformed = || MappingError::MalformedId { id: id.to_string() };
    let bytes = STANDARD.decode(id.trim()).map_err(|_| malformed())?;
    String::from_utf8(bytes).map_err(|_| malformed())
}

/// Decode ids like `base64("VsStage-12")` into their trailing number.
///
/// # Errors
///
/// Returns [`MappingError::MalformedId`] if the id does not end in `-<digits>`.
pub fn b64_number(id: &str) -> Result<u64, MappingError> {
    let text = decode_native_id(id)?;
    text.rsplit_once('-')
        .and_then(|(_, digits)| digits.parse().ok())
        .ok_or_else(|| MappingError::MalformedId { id: id.to_string() })
}

fn namespace(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or(Uuid::nil())
}

fn tail(decoded: &str) -> &str {
    let start = decoded
        .char_indices()
        .rev()
        .nth(ID_TAIL_LEN - 1)
        .map_or(0, |(index, _)| index);
    &decoded[start..]
}

/// Derive the upload uuid for a session id under one scheme.
///
/// # Errors
///
/// Returns [`MappingError::MalformedId`] if the id cannot be decoded.
pub fn session_uuid(kind: SessionKind, id: &str, scheme: IdScheme) -> Result<String, MappingError> {
    let decoded = decode_native_id(id)?;
    let tail_ns = namespace(NAMESPACE_TAIL);
    let full_ns = namespace(NAMESPACE_FULL);
    let uuid = match (scheme, kind) {
        (IdScheme::Canonical, SessionKind::Battle) => {
            Uuid::new_v5(&tail_ns, tail(&decoded).as_bytes())
        }
        (IdScheme::Canonical, SessionKind::Coop) => Uuid::new_v5(&full_ns, decoded.as_bytes()),
        (IdScheme::TailKeyed, _) => Uuid::new_v5(&full_ns, tail(&decoded).as_bytes()),
        (IdScheme::FullKeyed, _) => Uuid::new_v5(&tail_ns, decoded.as_bytes()),
    };
    Ok(uuid.to_string())
}

/// The uuid new uploads are filed under.
///
/// # Errors
///
/// Returns [`MappingError::MalformedId`] if the id cannot be decoded.
pub fn canonical_uuid(kind: SessionKind, id: &str) -> Result<String, MappingError> {
    session_uuid(kind, id, IdScheme::Canonical)
}

/// Every uuid a sibling uploader may already have used for this session.
///
/// # Errors
///
/// Returns [`MappingError::MalformedId`] if the id cannot be decoded.
pub fn candidate_uuids(kind: SessionKind, id: &str) -> Result<Vec<String>, MappingError> {
    IdScheme::ALL
        .iter()
        .map(|scheme| session_uuid(kind, id, *scheme))
        .collect()
}
