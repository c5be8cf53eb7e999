//! Entry points the caller drives: map one session and upload it, or ask
//! which sessions stat.ink does not have yet.
use std::sync::Arc;

use serde::Serialize;

use crate::api::Endpoint;
use crate::body::{AgentInfo, BattleBody, CoopBody};
use crate::catalog::CatalogClient;
use crate::config::ExporterConfig;
use crate::coop::CoopMapper;
use crate::dedup::DedupResolver;
use crate::error::{ConfigError, ExportError};
use crate::session::{Session, SessionKind};
use crate::transport::Transport;
use crate::upload::UploadClient;
use crate::versus::VersusMapper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    pub status: ExportStatus,
    pub url: String,
}

/// A session mapped onto the body stat.ink expects for its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedBody {
    Battle(Box<BattleBody>),
    Coop(Box<CoopBody>),
}

impl MappedBody {
    #[must_use]
    pub const fn kind(&self) -> SessionKind {
        match self {
            Self::Battle(_) => SessionKind::Battle,
            Self::Coop(_) => SessionKind::Coop,
        }
    }

    #[must_use]
    pub fn uuid(&self) -> &str {
        match self {
            Self::Battle(body) => &body.uuid,
            Self::Coop(body) => &body.uuid,
        }
    }
}

pub struct StatInkExporter {
    agent: AgentInfo,
    catalog: CatalogClient,
    dedup: DedupResolver,
    upload: UploadClient,
}

impl StatInkExporter {
    /// Build an exporter from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key or endpoint is invalid.
    pub fn new(config: &ExporterConfig, transport: Arc<dyn Transport>) -> Result<Self, ConfigError> {
        let endpoint = Endpoint::new(config.endpoint()?, config.api_key()?, transport);
        log::debug!("exporting to {}", endpoint.base_url());
        Ok(Self {
            agent: AgentInfo::new(config.upload_mode.clone()),
            catalog: CatalogClient::new(endpoint.clone()),
            dedup: DedupResolver::new(endpoint.clone()),
            upload: UploadClient::new(endpoint),
        })
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// Map a session without uploading it.
    ///
    /// # Errors
    ///
    /// Returns a mapping error, or a catalog fetch error.
    pub async fn map_session(&self, session: &Session) -> Result<MappedBody, ExportError> {
        match session {
            Session::Versus(vs) => {
                let body = VersusMapper::new(&self.catalog, &self.agent).map(vs).await?;
                Ok(MappedBody::Battle(Box::new(body)))
            }
            Session::Coop(coop) => {
                let body = CoopMapper::new(&self.catalog, &self.agent).map(coop).await?;
                Ok(MappedBody::Coop(Box::new(body)))
            }
        }
    }

    /// Map and upload one session.
    ///
    /// Nothing is posted unless the whole body maps.
    ///
    /// # Errors
    ///
    /// Returns the first mapping, catalog, encoding, transport or API error.
    pub async fn export_game(&self, session: &Session) -> Result<ExportOutcome, ExportError> {
        let mapped = self.map_session(session).await?;
        log::debug!("uploading {} {}", mapped.kind(), mapped.uuid());
        let url = match &mapped {
            MappedBody::Battle(body) => self.upload.post_battle(body).await?,
            MappedBody::Coop(body) => self.upload.post_coop(body).await?,
        };
        log::info!("uploaded {} as {url}", session.kind());
        Ok(ExportOutcome {
            status: ExportStatus::Success,
            url,
        })
    }

    /// Native ids from `ids` that stat.ink has no record of.
    ///
    /// # Errors
    ///
    /// Returns an error if the uploaded-uuid list cannot be fetched.
    pub async fn not_uploaded(
        &self,
        kind: SessionKind,
        ids: &[String],
    ) -> Result<Vec<String>, ExportError> {
        self.dedup.not_uploaded(kind, ids).await
    }
}
