//! stat.ink reference tables (stages, weapons, abilities, specials, salmon
//! weapons), fetched once per process and resolved by display name.
//!
//! A single async mutex guards every table. It is held across the fetch, so at
//! most one catalog request is in flight per client regardless of category.
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::api::Endpoint;
use crate::constants::{PATH_ABILITY, PATH_SALMON_WEAPON, PATH_SPECIAL, PATH_STAGE, PATH_WEAPON};
use crate::error::ExportError;

/// Locale code (`ja_JP`, `en_US`, ...) to display name.
pub type LocaleNameMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    #[serde(default)]
    pub name: LocaleNameMap,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CatalogEntry {
    fn has_name(&self, display_name: &str) -> bool {
        self.name.values().any(|name| name == display_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Stage,
    Weapon,
    Special,
    Ability,
    SalmonWeapon,
}

impl CatalogKind {
    const fn path(self) -> &'static str {
        match self {
            Self::Stage => PATH_STAGE,
            Self::Weapon => PATH_WEAPON,
            Self::Special => PATH_SPECIAL,
            Self::Ability => PATH_ABILITY,
            Self::SalmonWeapon => PATH_SALMON_WEAPON,
        }
    }
}

/// SplatNet spells some Japanese weapon names with an ASCII dot where stat.ink
/// uses the full-width one, and vice versa.
const DOT_ALIAS_LOCALE: &str = "ja_JP";
const FULL_WIDTH_DOT: char = '．';
const ASCII_DOT: char = '.';

#[derive(Default)]
struct CatalogCache {
    tables: HashMap<CatalogKind, Arc<Vec<CatalogEntry>>>,
    salmon_weapon_names: Option<Arc<HashMap<String, String>>>,
}

pub struct CatalogClient {
    endpoint: Endpoint,
    cache: Mutex<CatalogCache>,
}

impl CatalogClient {
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            cache: Mutex::new(CatalogCache::default()),
        }
    }

    async fn table_locked(
        &self,
        cache: &mut CatalogCache,
        kind: CatalogKind,
    ) -> Result<Arc<Vec<CatalogEntry>>, ExportError> {
        if let Some(table) = cache.tables.get(&kind) {
            return Ok(Arc::clone(table));
        }
        log::debug!("fetching {kind:?} catalog");
        let entries: Vec<CatalogEntry> = self.endpoint.get_json(kind.path()).await?;
        let table = Arc::new(entries);
        cache.tables.insert(kind, Arc::clone(&table));
        Ok(table)
    }

    /// Full table for one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the table has not been fetched yet and the fetch fails.
    pub async fn table(&self, kind: CatalogKind) -> Result<Arc<Vec<CatalogEntry>>, ExportError> {
        let mut cache = self.cache.lock().await;
        self.table_locked(&mut cache, kind).await
    }

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    pub async fn get_stage(&self) -> Result<Arc<Vec<CatalogEntry>>, ExportError> {
        self.table(CatalogKind::Stage).await
    }

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    pub async fn get_weapon(&self) -> Result<Arc<Vec<CatalogEntry>>, ExportError> {
        self.table(CatalogKind::Weapon).await
    }

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    pub async fn get_special(&self) -> Result<Arc<Vec<CatalogEntry>>, ExportError> {
        self.table(CatalogKind::Special).await
    }

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    pub async fn get_ability(&self) -> Result<Arc<Vec<CatalogEntry>>, ExportError> {
        self.table(CatalogKind::Ability).await
    }

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    pub async fn get_salmon_weapon(&self) -> Result<Arc<Vec<CatalogEntry>>, ExportError> {
        self.table(CatalogKind::SalmonWeapon).await
    }

    /// Stage key whose aliases contain the decoded SplatNet stage id.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage catalog cannot be fetched.
    pub async fn resolve_stage_key(&self, stage_id: u64) -> Result<Option<String>, ExportError> {
        let alias = stage_id.to_string();
        let stages = self.get_stage().await?;
        Ok(stages
            .iter()
            .find(|stage| stage.aliases.contains(&alias))
            .map(|stage| stage.key.clone()))
    }

    /// Ability key for a display name in any locale.
    ///
    /// # Errors
    ///
    /// Returns an error if the ability catalog cannot be fetched.
    pub async fn resolve_ability_key(&self, name: &str) -> Result<Option<String>, ExportError> {
        let abilities = self.get_ability().await?;
        Ok(abilities
            .iter()
            .find(|ability| ability.has_name(name))
            .map(|ability| ability.key.clone()))
    }

    /// Salmon weapon key for a display name in any locale.
    ///
    /// # Errors
    ///
    /// Returns an error if the salmon weapon catalog cannot be fetched.
    pub async fn resolve_salmon_weapon_key(
        &self,
        name: &str,
    ) -> Result<Option<String>, ExportError> {
        let mut cache = self.cache.lock().await;
        if cache.salmon_weapon_names.is_none() {
            let weapons = self
                .table_locked(&mut cache, CatalogKind::SalmonWeapon)
                .await?;
            cache.salmon_weapon_names = Some(Arc::new(index_salmon_weapon_names(&weapons)));
        }
        Ok(cache
            .salmon_weapon_names
            .as_ref()
            .and_then(|names| names.get(name).cloned()))
    }
}

fn insert_first(map: &mut HashMap<String, String>, name: String, key: &str) {
    match map.get(&name) {
        Some(existing) if existing != key => {
            log::warn!("salmon weapon name {name:?} maps to both {existing} and {key}; keeping {existing}");
        }
        Some(_) => {}
        None => {
            map.insert(name, key.to_string());
        }
    }
}

fn index_salmon_weapon_names(weapons: &[CatalogEntry]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for weapon in weapons {
        for (locale, name) in &weapon.name {
            insert_first(&mut map, name.clone(), &weapon.key);
            if locale == DOT_ALIAS_LOCALE {
                let ascii = name.replace(FULL_WIDTH_DOT, &ASCII_DOT.to_string());
                let full_width = name.replace(ASCII_DOT, &FULL_WIDTH_DOT.to_string());
                for alias in [ascii, full_width] {
                    if &alias != name {
                        insert_first(&mut map, alias, &weapon.key);
                    }
                }
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, names: &[(&str, &str)]) -> CatalogEntry {
        CatalogEntry {
            key: key.to_string(),
            name: names
                .iter()
                .map(|(locale, name)| ((*locale).to_string(), (*name).to_string()))
                .collect(),
            aliases: Vec::new(),
        }
    }

    #[test]
    fn salmon_index_adds_dot_alias_for_japanese_names() {
        let weapons = vec![entry(
            "sharp",
            &[("ja_JP", "シャープマーカー．改"), ("en_US", "Splash-o-matic")],
        )];
        let map = index_salmon_weapon_names(&weapons);
        assert_eq!(map.get("シャープマーカー．改").map(String::as_str), Some("sharp"));
        assert_eq!(map.get("シャープマーカー.改").map(String::as_str), Some("sharp"));
        assert_eq!(map.get("Splash-o-matic").map(String::as_str), Some("sharp"));
    }

    #[test]
    fn salmon_index_keeps_first_writer_on_collision() {
        let weapons = vec![
            entry("first", &[("en_US", "Blaster")]),
            entry("second", &[("en_US", "Blaster")]),
        ];
        let map = index_salmon_weapon_names(&weapons);
        assert_eq!(map.get("Blaster").map(String::as_str), Some("first"));
    }

    #[test]
    fn catalog_entry_decodes_without_aliases() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{ "key": "ink_saver_main", "name": { "en_US": "Ink Saver (Main)" } }"#)
                .unwrap();
        assert!(entry.aliases.is_empty());
        assert!(entry.has_name("Ink Saver (Main)"));
    }
}
