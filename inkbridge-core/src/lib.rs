//! Inkbridge Core
//!
//! Result normalization and upload engine for Splatoon 3 sessions. Turns a
//! SplatNet 3 versus battle or Salmon Run record into the stat.ink v3 upload
//! schema and submits it. The HTTP client is supplied by the caller through
//! [`Transport`], so this crate carries no network stack of its own.

pub mod api;
pub mod body;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod coop;
pub mod dedup;
pub mod error;
pub mod exporter;
pub mod ids;
pub mod session;
pub mod transport;
pub mod upload;
pub mod versus;

// Re-export commonly used types
pub use api::Endpoint;
pub use body::{AgentInfo, BattleBody, CoopBody, YesNo};
pub use catalog::{CatalogClient, CatalogEntry, CatalogKind};
pub use config::{ApiKey, ExporterConfig};
pub use coop::CoopMapper;
pub use dedup::DedupResolver;
pub use error::{ApiError, ConfigError, ExportError, MappingError, TransportError};
pub use exporter::{ExportOutcome, ExportStatus, MappedBody, StatInkExporter};
pub use ids::{IdScheme, candidate_uuids, canonical_uuid, session_uuid};
pub use session::{CoopSession, Session, SessionKind, VsSession};
pub use transport::{HttpRequest, HttpResponse, Transport};
pub use upload::UploadClient;
pub use versus::VersusMapper;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_decode_by_type_tag() {
        let versus: Session =
            serde_json::from_str(include_str!("../tests/fixtures/versus_turf.json")).unwrap();
        assert_eq!(versus.kind(), SessionKind::Battle);
        let coop: Session =
            serde_json::from_str(include_str!("../tests/fixtures/coop_regular.json")).unwrap();
        assert_eq!(coop.kind(), SessionKind::Coop);
        assert_ne!(versus.native_id(), coop.native_id());
    }

    #[test]
    fn canonical_uuid_is_one_of_the_candidates() {
        let session: Session =
            serde_json::from_str(include_str!("../tests/fixtures/coop_regular.json")).unwrap();
        let canonical = canonical_uuid(session.kind(), session.native_id()).unwrap();
        let candidates = candidate_uuids(session.kind(), session.native_id()).unwrap();
        assert_eq!(candidates.len(), IdScheme::ALL.len());
        assert_eq!(candidates[0], canonical);
    }
}
