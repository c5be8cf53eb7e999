use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use inkbridge_core::Session;
use serde::Deserialize;

/// A session file holds either one session or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum SessionFile {
    Many(Vec<Session>),
    One(Box<Session>),
}

#[derive(Debug, Clone)]
pub struct LoadedSession {
    pub source: PathBuf,
    pub session: Session,
}

pub fn parse(raw: &str) -> serde_json::Result<Vec<Session>> {
    Ok(match serde_json::from_str(raw)? {
        SessionFile::Many(sessions) => sessions,
        SessionFile::One(session) => vec![*session],
    })
}

pub fn load_file(path: &Path) -> Result<Vec<LoadedSession>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let sessions =
        parse(&raw).with_context(|| format!("{} is not a session export", path.display()))?;
    log::debug!("{}: {} session(s)", path.display(), sessions.len());
    Ok(sessions
        .into_iter()
        .map(|session| LoadedSession {
            source: path.to_path_buf(),
            session,
        })
        .collect())
}

pub fn load_all(paths: &[PathBuf]) -> Result<Vec<LoadedSession>> {
    let mut loaded = Vec::new();
    for path in paths {
        loaded.extend(load_file(path)?);
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkbridge_core::SessionKind;

    const COOP: &str = include_str!("../../inkbridge-core/tests/fixtures/coop_regular.json");
    const TURF: &str = include_str!("../../inkbridge-core/tests/fixtures/versus_turf.json");

    #[test]
    fn single_session_file() {
        let sessions = parse(COOP).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].kind(), SessionKind::Coop);
    }

    #[test]
    fn array_file_keeps_order() {
        let raw = format!("[{TURF}, {COOP}]");
        let kinds: Vec<SessionKind> = parse(&raw).unwrap().iter().map(Session::kind).collect();
        assert_eq!(kinds, vec![SessionKind::Battle, SessionKind::Coop]);
    }

    #[test]
    fn unrelated_json_is_rejected() {
        assert!(parse(r#"{ "type": "replay" }"#).is_err());
    }
}
