//! Filters out sessions stat.ink already has, under any known uuid scheme.
use std::collections::HashSet;

use crate::api::Endpoint;
use crate::constants::{PATH_BATTLE_UUIDS, PATH_SALMON_UUIDS};
use crate::error::ExportError;
use crate::ids::candidate_uuids;
use crate::session::SessionKind;

pub struct DedupResolver {
    endpoint: Endpoint,
}

impl DedupResolver {
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// Uuids stat.ink has on file for this kind of session.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be fetched.
    pub async fn uploaded(&self, kind: SessionKind) -> Result<HashSet<String>, ExportError> {
        let path = match kind {
            SessionKind::Battle => PATH_BATTLE_UUIDS,
            SessionKind::Coop => PATH_SALMON_UUIDS,
        };
        let uuids: Vec<String> = self.endpoint.get_json(path).await?;
        Ok(uuids.into_iter().collect())
    }

    /// Keep only the ids with no uploaded counterpart.
    ///
    /// # Errors
    ///
    /// Returns an error if the uploaded list cannot be fetched.
    pub async fn not_uploaded(
        &self,
        kind: SessionKind,
        ids: &[String],
    ) -> Result<Vec<String>, ExportError> {
        let uploaded = self.uploaded(kind).await?;
        Ok(filter_not_uploaded(kind, ids, &uploaded))
    }
}

/// Pure half of [`DedupResolver::not_uploaded`].
#[must_use]
pub fn filter_not_uploaded(
    kind: SessionKind,
    ids: &[String],
    uploaded: &HashSet<String>,
) -> Vec<String> {
    ids.iter()
        .filter(|id| match candidate_uuids(kind, id) {
            Ok(candidates) => !candidates.iter().any(|uuid| uploaded.contains(uuid)),
            Err(err) => {
                log::warn!("cannot derive upload ids: {err}");
                true
            }
        })
        .cloned()
        .collect()
}
