//! Salmon Run session → stat.ink salmon body.
//!
//! Besides straight field renames this module reconstructs two values the
//! source never reports: the grade held before the session (when no prior
//! snapshot was captured) and the per-wave hazard level of Eggstra Work.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::body::{AgentInfo, BossBody, CoopBody, CoopPlayerBody, WaveBody, YesNo};
use crate::catalog::CatalogClient;
use crate::constants::{
    COOP_EVENT_KEYS, COOP_MAX_WAVE, COOP_MAX_WAVE_TEAM_CONTEST, COOP_SPECIAL_HASHES,
    COOP_TIDE_KEYS, GRADE_POINT_BAND, GRADE_POINT_CAP, GRADE_POINT_DELTA, KING_SALMONID_KEYS,
    LOWEST_GRADE, RANDOM_ICON_HASHES, TEAM_CONTEST_BASE_DANGER, TEAM_CONTEST_DANGER_BONUS,
    UNSPECIFIED_KEY, lookup,
};
use crate::error::{ExportError, MappingError};
use crate::ids::{b64_number, canonical_uuid};
use crate::session::{
    CoopDetail, CoopPlayerResult, CoopRule, CoopSession, CoopWeapon, EnemyResult, SessionKind,
    WaveResult,
};
use crate::versus::map_species;

static IMAGE_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\w+)_0\.\w+").expect("image hash pattern is valid"));

#[must_use]
pub const fn max_wave(rule: CoopRule) -> u32 {
    match rule {
        CoopRule::TeamContest => COOP_MAX_WAVE_TEAM_CONTEST,
        CoopRule::Regular | CoopRule::BigRun | CoopRule::Unknown => COOP_MAX_WAVE,
    }
}

fn regular_waves(detail: &CoopDetail) -> impl Iterator<Item = &WaveResult> {
    let max = max_wave(detail.rule);
    detail
        .wave_results
        .iter()
        .filter(move |wave| wave.wave_number <= max)
}

/// Number of regular waves cleared.
///
/// A `result_wave` of zero means every wave was cleared; otherwise it names
/// the wave the team fell in, and only waves before it count.
#[must_use]
pub fn clear_waves(detail: &CoopDetail) -> u32 {
    let counted = |waves: usize| u32::try_from(waves).unwrap_or(u32::MAX);
    if detail.result_wave == 0 {
        counted(regular_waves(detail).count())
    } else {
        counted(
            regular_waves(detail)
                .filter(|wave| wave.wave_number < detail.result_wave)
                .count(),
        )
    }
}

/// `wipe_out` when the team met the final quota and still lost; the source
/// gives nothing to tell the other failure causes apart.
#[must_use]
pub fn fail_reason(detail: &CoopDetail, cleared: u32) -> Option<&'static str> {
    if cleared >= max_wave(detail.rule) {
        return None;
    }
    let last = regular_waves(detail).last()?;
    match (last.team_deliver_count, last.deliver_norm) {
        (Some(delivered), Some(quota)) if delivered >= quota => Some("wipe_out"),
        _ => None,
    }
}

/// Grade held before a session, derived from the grade after it.
///
/// Returns `(title, points)`; either may be unknown.
#[must_use]
pub fn infer_title_before(
    after_title: u64,
    after_points: i32,
    cleared: u32,
) -> (Option<String>, Option<i32>) {
    let Some(delta) = lookup(&GRADE_POINT_DELTA, cleared) else {
        return (None, None);
    };
    let same_title = Some(after_title.to_string());

    if after_points == GRADE_POINT_CAP && delta != 0 {
        return (same_title, None);
    }
    if after_points == GRADE_POINT_BAND && delta == 20 {
        return (same_title, None);
    }
    if after_points == GRADE_POINT_BAND && delta < 0 && after_title != LOWEST_GRADE {
        return (same_title, Some(after_points - delta));
    }

    let points = after_points - delta;
    if points >= 0 {
        (same_title, Some(points))
    } else {
        (after_title.checked_sub(1).map(|t| t.to_string()), None)
    }
}

fn danger_increment(previous: &WaveResult, players: usize) -> f64 {
    let (Some(quota), Some(delivered)) = (previous.deliver_norm, previous.team_deliver_count)
    else {
        return 0.0;
    };
    let Some((_, at_double, at_one_and_half)) = TEAM_CONTEST_DANGER_BONUS
        .iter()
        .find(|(count, _, _)| *count == players)
    else {
        return 0.0;
    };
    let quota = f64::from(quota);
    let delivered = f64::from(delivered);
    if delivered >= quota * 2.0 {
        *at_double
    } else if delivered >= quota * 1.5 {
        // Two players get +5 here, not +10.
        *at_one_and_half
    } else {
        0.0
    }
}

/// Hazard level of every Eggstra Work wave: 60 for the first, then raised by
/// how far the previous wave overshot its quota.
#[must_use]
pub fn team_contest_danger_rates(waves: &[&WaveResult], players: usize) -> Vec<f64> {
    let mut rates: Vec<f64> = Vec::with_capacity(waves.len());
    let mut previous: Option<(f64, &WaveResult)> = None;
    for wave in waves {
        let rate = match previous {
            None => TEAM_CONTEST_BASE_DANGER,
            Some((rate, prev)) => rate + danger_increment(prev, players),
        };
        rates.push(rate);
        previous = Some((rate, *wave));
    }
    rates
}

/// File-name hash of a SplatNet icon URL.
#[must_use]
pub fn image_hash(url: &str) -> Option<&str> {
    IMAGE_HASH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn is_random_icon(weapon: &CoopWeapon) -> bool {
    image_hash(&weapon.image.url)
        .is_some_and(|hash| RANDOM_ICON_HASHES.iter().any(|random| *random == hash))
}

/// # Errors
///
/// Returns [`MappingError::UnknownSpecial`] when the icon matches neither a
/// known special nor the random placeholder.
pub fn map_special(special: &CoopWeapon) -> Result<String, MappingError> {
    let known = image_hash(&special.image.url).and_then(|hash| lookup(&COOP_SPECIAL_HASHES, hash));
    match known {
        Some(key) => Ok(key.to_string()),
        None if is_random_icon(special) => Ok(UNSPECIFIED_KEY.to_string()),
        None => Err(MappingError::UnknownSpecial {
            name: special.name.clone(),
        }),
    }
}

/// A player with no contribution and no special never actually played.
#[must_use]
pub fn is_disconnected(result: &CoopPlayerResult) -> bool {
    let counters = [
        result.golden_deliver_count,
        result.deliver_count,
        result.rescue_count,
        result.rescued_count,
        result.defeat_enemy_count,
    ];
    counters.iter().all(|count| *count == 0) && result.special_weapon.is_none()
}

/// # Errors
///
/// Returns [`MappingError::MalformedId`] if an enemy id cannot be decoded.
pub fn map_bosses(enemies: &[EnemyResult]) -> Result<BTreeMap<String, BossBody>, MappingError> {
    enemies
        .iter()
        .map(|enemy| {
            let key = b64_number(&enemy.enemy.id)?.to_string();
            let tally = BossBody {
                appearances: enemy.pop_count,
                defeated: enemy.team_defeat_count,
                defeated_by_me: enemy.defeat_count,
            };
            Ok((key, tally))
        })
        .collect()
}

fn map_wave(wave: &WaveResult, danger_rate: Option<f64>) -> Result<WaveBody, MappingError> {
    let event = match &wave.event_wave {
        Some(event) => {
            let id = b64_number(&event.id)?;
            let key = lookup(&COOP_EVENT_KEYS, id);
            if key.is_none() {
                log::warn!("unknown salmon run event {id} in wave {}", wave.wave_number);
            }
            key.map(str::to_string)
        }
        None => None,
    };
    let mut special_uses = BTreeMap::new();
    for special in &wave.special_weapons {
        *special_uses.entry(map_special(special)?).or_insert(0) += 1;
    }
    Ok(WaveBody {
        tide: lookup(&COOP_TIDE_KEYS, wave.water_level).map(str::to_string),
        event,
        golden_quota: wave.deliver_norm,
        golden_delivered: wave.team_deliver_count,
        golden_appearances: wave.golden_pop_count,
        danger_rate,
        special_uses,
    })
}

fn map_king(detail: &CoopDetail) -> Result<Option<String>, MappingError> {
    let Some(boss) = &detail.boss_result else {
        return Ok(None);
    };
    let id = b64_number(&boss.boss.id)?;
    let key = lookup(&KING_SALMONID_KEYS, id);
    if key.is_none() {
        log::warn!("unknown king salmonid {id}");
    }
    Ok(key.map(str::to_string))
}

/// Maps coop sessions, resolving weapon names through the shared catalog.
pub struct CoopMapper<'a> {
    catalog: &'a CatalogClient,
    agent: &'a AgentInfo,
}

impl<'a> CoopMapper<'a> {
    #[must_use]
    pub const fn new(catalog: &'a CatalogClient, agent: &'a AgentInfo) -> Self {
        Self { catalog, agent }
    }

    /// Build the salmon body for one session.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for unresolvable weapons, specials or ids, or a
    /// catalog fetch error.
    pub async fn map(&self, session: &CoopSession) -> Result<CoopBody, ExportError> {
        let detail = &session.detail;
        let cleared = clear_waves(detail);
        let waves: Vec<&WaveResult> = regular_waves(detail).collect();
        let player_count = detail.players().count();

        let danger_rates: Vec<Option<f64>> = if detail.rule == CoopRule::TeamContest {
            team_contest_danger_rates(&waves, player_count)
                .into_iter()
                .map(Some)
                .collect()
        } else {
            vec![None; waves.len()]
        };
        let wave_bodies = waves
            .iter()
            .zip(danger_rates)
            .map(|(wave, rate)| map_wave(wave, rate))
            .collect::<Result<Vec<_>, _>>()?;

        let mut players = Vec::with_capacity(player_count);
        for result in detail.players() {
            players.push(self.map_player(result).await?);
        }

        let title_after = detail.after_grade.as_ref().map(|g| b64_number(&g.id)).transpose()?;
        let (title_before, title_exp_before) = match (&session.grade_before, title_after) {
            (Some(before), _) => (
                Some(b64_number(&before.grade.id)?.to_string()),
                before.point,
            ),
            (None, Some(after)) => match detail.after_grade_point {
                Some(points) => infer_title_before(after, points, cleared),
                None => (None, None),
            },
            (None, None) => (None, None),
        };

        Ok(CoopBody {
            uuid: canonical_uuid(SessionKind::Coop, &detail.id)?,
            private: session.private.into(),
            big_run: (detail.rule == CoopRule::BigRun).into(),
            eggstra_work: (detail.rule == CoopRule::TeamContest).into(),
            stage: b64_number(&detail.coop_stage.id)?.to_string(),
            danger_rate: detail.danger_rate * 100.0,
            clear_waves: cleared,
            fail_reason: fail_reason(detail, cleared).map(str::to_string),
            king_smell: detail.smell_meter,
            king_salmonid: map_king(detail)?,
            clear_extra: detail
                .boss_result
                .as_ref()
                .map(|boss| YesNo::from(boss.has_defeat_boss)),
            title_before,
            title_exp_before,
            title_after: title_after.map(|t| t.to_string()),
            title_exp_after: detail.after_grade_point,
            golden_eggs: detail.players().map(|p| p.golden_deliver_count).sum(),
            power_eggs: detail.players().map(|p| p.deliver_count).sum(),
            gold_scale: detail.scale.map(|s| s.gold),
            silver_scale: detail.scale.map(|s| s.silver),
            bronze_scale: detail.scale.map(|s| s.bronze),
            job_point: detail.job_point,
            job_score: detail.job_score,
            job_rate: detail.job_rate,
            job_bonus: detail.job_bonus,
            waves: wave_bodies,
            players,
            bosses: map_bosses(&detail.enemy_results)?,
            agent: self.agent.name(),
            agent_version: self.agent.version(),
            agent_variables: self.agent.variables(),
            automated: YesNo::Yes,
            start_at: detail.played_time.timestamp(),
        })
    }

    async fn map_weapon(&self, weapon: &CoopWeapon) -> Result<String, ExportError> {
        if let Some(key) = self.catalog.resolve_salmon_weapon_key(&weapon.name).await? {
            return Ok(key);
        }
        if is_random_icon(weapon) {
            return Ok(UNSPECIFIED_KEY.to_string());
        }
        Err(MappingError::UnknownWeapon {
            name: weapon.name.clone(),
        }
        .into())
    }

    async fn map_player(&self, result: &CoopPlayerResult) -> Result<CoopPlayerBody, ExportError> {
        let player = &result.player;
        let mut weapons = Vec::with_capacity(result.weapons.len());
        for weapon in &result.weapons {
            weapons.push(self.map_weapon(weapon).await?);
        }
        Ok(CoopPlayerBody {
            me: player.is_myself.into(),
            name: player.name.clone(),
            number: player.name_id.clone(),
            splashtag_title: player.byname.clone(),
            species: map_species(player.species).to_string(),
            uniform: b64_number(&player.uniform.id)?.to_string(),
            special: result.special_weapon.as_ref().map(map_special).transpose()?,
            weapons,
            golden_eggs: result.golden_deliver_count,
            golden_assist: result.golden_assist_count,
            power_eggs: result.deliver_count,
            rescue: result.rescue_count,
            rescued: result.rescued_count,
            defeat_boss: result.defeat_enemy_count,
            disconnected: is_disconnected(result).into(),
        })
    }
}
