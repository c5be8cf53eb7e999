//! Source session records as delivered by the SplatNet 3 history fetcher.
//!
//! Field names follow the upstream JSON (camelCase). Enumerations keep an
//! `Unknown` fallback so that new modes surface as mapping errors instead of
//! decode failures.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed session, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Session {
    Versus(VsSession),
    Coop(CoopSession),
}

impl Session {
    #[must_use]
    pub const fn kind(&self) -> SessionKind {
        match self {
            Self::Versus(_) => SessionKind::Battle,
            Self::Coop(_) => SessionKind::Coop,
        }
    }

    /// Native (base64) SplatNet id of the session.
    #[must_use]
    pub fn native_id(&self) -> &str {
        match self {
            Self::Versus(vs) => &vs.detail.id,
            Self::Coop(coop) => &coop.detail.id,
        }
    }
}

/// Which stat.ink collection a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Battle,
    Coop,
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Battle => write!(f, "battle"),
            Self::Coop => write!(f, "coop"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Species {
    Inkling,
    Octoling,
}

// Versus ---------------------------------------------------------------------

/// A versus match together with the ladder context fetched alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsSession {
    pub detail: VsDetail,
    #[serde(default)]
    pub rank_before_state: Option<RankState>,
    #[serde(default)]
    pub rank_state: Option<RankState>,
    #[serde(default)]
    pub challenge: Option<ChallengeProgress>,
    #[serde(default)]
    pub x_measurement: Option<XMeasurement>,
    #[serde(default)]
    pub last_x_power: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsDetail {
    pub id: String,
    pub vs_mode: VsModeRef,
    pub vs_rule: VsRuleRef,
    pub vs_stage: IdRef,
    pub judgement: Judgement,
    #[serde(default)]
    pub knockout: Option<Knockout>,
    pub played_time: DateTime<Utc>,
    pub duration: i64,
    pub my_team: VsTeam,
    #[serde(default)]
    pub other_teams: Vec<VsTeam>,
    #[serde(default)]
    pub awards: Vec<Award>,
    #[serde(default)]
    pub bankara_match: Option<BankaraMatch>,
    #[serde(default)]
    pub fest_match: Option<FestMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VsModeRef {
    pub mode: VsMode,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VsMode {
    Regular,
    Bankara,
    Private,
    Fest,
    XMatch,
    League,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VsRuleRef {
    pub rule: VsRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VsRule {
    TurfWar,
    Area,
    Loft,
    Goal,
    Clam,
    TriColor,
    #[serde(other)]
    Unknown,
}

impl VsRule {
    /// Rules that report painted area and team colors.
    #[must_use]
    pub const fn is_paint_rule(self) -> bool {
        matches!(self, Self::TurfWar | Self::TriColor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Judgement {
    Win,
    Lose,
    DeemedLose,
    ExemptedLose,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Knockout {
    Neither,
    Win,
    Lose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankaraMatch {
    #[serde(default)]
    pub mode: Option<BankaraMode>,
    #[serde(default)]
    pub earned_udemae_point: Option<i32>,
    #[serde(default)]
    pub bankara_power: Option<BankaraPower>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankaraMode {
    Open,
    Challenge,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankaraPower {
    #[serde(default)]
    pub power: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FestMatch {
    pub dragon_match_type: DragonMatchType,
    #[serde(default)]
    pub contribution: Option<i32>,
    #[serde(default)]
    pub my_fest_power: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DragonMatchType {
    Normal,
    Decuple,
    Dragon,
    DoubleDragon,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsTeam {
    pub color: Color,
    #[serde(default)]
    pub result: Option<TeamResult>,
    #[serde(default)]
    pub tricolor_role: Option<String>,
    #[serde(default)]
    pub fest_team_name: Option<String>,
    pub players: Vec<VsPlayer>,
}

impl VsTeam {
    #[must_use]
    pub fn inked(&self) -> i32 {
        self.players.iter().map(|p| p.paint).sum()
    }

    #[must_use]
    pub fn paint_percent(&self) -> f64 {
        self.result
            .as_ref()
            .and_then(|r| r.paint_ratio)
            .unwrap_or(0.0)
            * 100.0
    }
}

/// RGBA with every component in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResult {
    #[serde(default)]
    pub paint_ratio: Option<f64>,
    #[serde(default)]
    pub score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsPlayer {
    pub name: String,
    #[serde(default)]
    pub name_id: Option<String>,
    #[serde(default)]
    pub byname: Option<String>,
    #[serde(default)]
    pub is_myself: bool,
    pub species: Species,
    pub weapon: IdRef,
    pub paint: i32,
    #[serde(default)]
    pub crown: bool,
    #[serde(default)]
    pub result: Option<PlayerResult>,
    pub head_gear: Gear,
    pub clothing_gear: Gear,
    pub shoes_gear: Gear,
}

/// Per-player tallies. `kill` counts kills and assists together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub kill: i32,
    pub assist: i32,
    pub death: i32,
    pub special: i32,
    #[serde(default)]
    pub noroshi_try: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gear {
    #[serde(default)]
    pub name: Option<String>,
    pub primary_gear_power: GearPower,
    #[serde(default)]
    pub additional_gear_powers: Vec<GearPower>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearPower {
    pub name: String,
}

/// Ladder snapshot, e.g. `{ "rank": "S+12", "rankPoints": 340 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankState {
    pub rank: String,
    #[serde(default)]
    pub rank_points: Option<i32>,
}

/// Progress of the ranked challenge series this battle belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgress {
    #[serde(default)]
    pub is_first_battle: bool,
    #[serde(default)]
    pub is_promo: bool,
    #[serde(default)]
    pub win_count: Option<i32>,
    #[serde(default)]
    pub lose_count: Option<i32>,
    #[serde(default)]
    pub rank_after: Option<String>,
    #[serde(default)]
    pub earned_rank_points: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XMeasurement {
    pub state: MeasurementState,
    #[serde(default)]
    pub x_power_after: Option<f64>,
    #[serde(default)]
    pub is_first_battle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementState {
    Completed,
    Inprogress,
    #[serde(other)]
    Unknown,
}

// Coop -----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopSession {
    pub detail: CoopDetail,
    #[serde(default)]
    pub grade_before: Option<GradeSnapshot>,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSnapshot {
    pub grade: IdRef,
    #[serde(default)]
    pub point: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopDetail {
    pub id: String,
    pub rule: CoopRule,
    pub coop_stage: IdRef,
    pub danger_rate: f64,
    pub result_wave: u32,
    pub played_time: DateTime<Utc>,
    #[serde(default)]
    pub boss_result: Option<BossResult>,
    pub my_result: CoopPlayerResult,
    #[serde(default)]
    pub member_results: Vec<CoopPlayerResult>,
    #[serde(default)]
    pub scale: Option<Scale>,
    #[serde(default)]
    pub enemy_results: Vec<EnemyResult>,
    #[serde(default)]
    pub smell_meter: Option<i32>,
    #[serde(default)]
    pub wave_results: Vec<WaveResult>,
    #[serde(default)]
    pub after_grade: Option<IdRef>,
    #[serde(default)]
    pub after_grade_point: Option<i32>,
    #[serde(default)]
    pub job_point: Option<i32>,
    #[serde(default)]
    pub job_score: Option<i32>,
    #[serde(default)]
    pub job_rate: Option<f64>,
    #[serde(default)]
    pub job_bonus: Option<i32>,
}

impl CoopDetail {
    /// Self first, then teammates.
    pub fn players(&self) -> impl Iterator<Item = &CoopPlayerResult> {
        std::iter::once(&self.my_result).chain(self.member_results.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoopRule {
    Regular,
    BigRun,
    TeamContest,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossResult {
    pub has_defeat_boss: bool,
    pub boss: IdRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopPlayerResult {
    pub player: CoopPlayer,
    #[serde(default)]
    pub weapons: Vec<CoopWeapon>,
    #[serde(default)]
    pub special_weapon: Option<CoopWeapon>,
    pub defeat_enemy_count: i32,
    pub deliver_count: i32,
    pub golden_assist_count: i32,
    pub golden_deliver_count: i32,
    pub rescue_count: i32,
    pub rescued_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopPlayer {
    pub name: String,
    #[serde(default)]
    pub name_id: Option<String>,
    #[serde(default)]
    pub byname: Option<String>,
    #[serde(default)]
    pub is_myself: bool,
    pub species: Species,
    pub uniform: IdRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoopWeapon {
    pub name: String,
    pub image: Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    #[serde(default)]
    pub gold: i32,
    #[serde(default)]
    pub silver: i32,
    #[serde(default)]
    pub bronze: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyResult {
    pub enemy: IdRef,
    pub pop_count: i32,
    pub defeat_count: i32,
    pub team_defeat_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveResult {
    pub wave_number: u32,
    pub water_level: u32,
    #[serde(default)]
    pub event_wave: Option<IdRef>,
    #[serde(default)]
    pub deliver_norm: Option<i32>,
    #[serde(default)]
    pub golden_pop_count: i32,
    #[serde(default)]
    pub team_deliver_count: Option<i32>,
    #[serde(default)]
    pub special_weapons: Vec<CoopWeapon>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_modes_decode_to_fallback() {
        let mode: VsModeRef =
            serde_json::from_str(r#"{ "mode": "LIMITED", "id": "VnNNb2RlLTk5" }"#).unwrap();
        assert_eq!(mode.mode, VsMode::Unknown);
        let rule: VsRuleRef = serde_json::from_str(r#"{ "rule": "TURF_WAR" }"#).unwrap();
        assert!(rule.rule.is_paint_rule());
    }

    #[test]
    fn team_percent_defaults_to_zero() {
        let team: VsTeam = serde_json::from_str(
            r#"{ "color": { "r": 0.5, "g": 0.5, "b": 0.5, "a": 1.0 }, "players": [] }"#,
        )
        .unwrap();
        assert!(team.paint_percent().abs() < f64::EPSILON);
        assert_eq!(team.inked(), 0);
    }
}
