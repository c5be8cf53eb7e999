//! stat.ink v3 post bodies.
//!
//! Unset optional fields are left out of the encoded map entirely; map-valued
//! fields are ordered so that the same session always encodes to the same bytes.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{AGENT_NAME, AGENT_VERSION, UPLOAD_MODE_VARIABLE};

/// stat.ink's boolean flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearBody {
    pub primary_ability: String,
    pub secondary_abilities: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearsBody {
    pub headgear: GearBody,
    pub clothing: GearBody,
    pub shoes: GearBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBody {
    pub me: YesNo,
    pub rank_in_team: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splashtag_title: Option<String>,
    pub species: String,
    pub weapon: String,
    pub inked: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assist: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kill_or_assist: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    pub gears: GearsBody,
    pub crown: YesNo,
    pub disconnected: YesNo,
}

/// Body of `POST /api/v3/battle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BattleBody {
    pub uuid: String,
    pub lobby: String,
    pub rule: String,
    pub stage: String,
    pub weapon: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knockout: Option<YesNo>,
    pub rank_in_team: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assist: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kill_or_assist: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    pub inked: i32,
    pub medals: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_team_inked: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub their_team_inked: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_team_inked: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_team_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub their_team_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_team_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_team_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub their_team_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_team_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub their_team_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_team_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_team_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub their_team_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_team_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub our_team_theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub their_team_theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_team_theme: Option<String>,
    pub our_team_players: Vec<PlayerBody>,
    pub their_team_players: Vec<PlayerBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_team_players: Option<Vec<PlayerBody>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fest_dragon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clout_change: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fest_power: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_before_s_plus: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_before_exp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_after_s_plus: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_after_exp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_exp_change: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_up_battle: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_win: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_lose: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_power_before: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_power_after: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bankara_power_after: Option<f64>,

    pub agent: String,
    pub agent_version: String,
    pub agent_variables: BTreeMap<String, String>,
    pub automated: YesNo,
    pub start_at: i64,
    pub end_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoopPlayerBody {
    pub me: YesNo,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splashtag_title: Option<String>,
    pub species: String,
    pub uniform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
    pub weapons: Vec<String>,
    pub golden_eggs: i32,
    pub golden_assist: i32,
    pub power_eggs: i32,
    pub rescue: i32,
    pub rescued: i32,
    pub defeat_boss: i32,
    pub disconnected: YesNo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tide: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub golden_quota: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub golden_delivered: Option<i32>,
    pub golden_appearances: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger_rate: Option<f64>,
    pub special_uses: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossBody {
    pub appearances: i32,
    pub defeated: i32,
    pub defeated_by_me: i32,
}

/// Body of `POST /api/v3/salmon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoopBody {
    pub uuid: String,
    pub private: YesNo,
    pub big_run: YesNo,
    pub eggstra_work: YesNo,
    pub stage: String,
    pub danger_rate: f64,
    pub clear_waves: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub king_smell: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub king_salmonid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_extra: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_exp_before: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_exp_after: Option<i32>,
    pub golden_eggs: i32,
    pub power_eggs: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_scale: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silver_scale: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bronze_scale: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_point: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_bonus: Option<i32>,
    pub waves: Vec<WaveBody>,
    pub players: Vec<CoopPlayerBody>,
    pub bosses: BTreeMap<String, BossBody>,
    pub agent: String,
    pub agent_version: String,
    pub agent_variables: BTreeMap<String, String>,
    pub automated: YesNo,
    pub start_at: i64,
}

/// Agent identification echoed into every body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInfo {
    pub upload_mode: String,
}

impl AgentInfo {
    #[must_use]
    pub fn new(upload_mode: impl Into<String>) -> Self {
        Self {
            upload_mode: upload_mode.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        AGENT_NAME.to_string()
    }

    #[must_use]
    pub fn version(&self) -> String {
        AGENT_VERSION.to_string()
    }

    #[must_use]
    pub fn variables(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(UPLOAD_MODE_VARIABLE.to_string(), self.upload_mode.clone())])
    }
}
