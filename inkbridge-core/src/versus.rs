//! Versus battle → stat.ink battle body.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::body::{AgentInfo, BattleBody, GearBody, GearsBody, PlayerBody, YesNo};
use crate::catalog::CatalogClient;
use crate::constants::{FEST_CHALLENGE_MODE_ID, FEST_OPEN_MODE_IDS, TRICOLOR_DEFENSE_ROLE};
use crate::error::{ExportError, MappingError};
use crate::ids::{b64_number, canonical_uuid};
use crate::session::{
    BankaraMode, Color, DragonMatchType, Gear, Judgement, Knockout, MeasurementState,
    PlayerResult, SessionKind, Species, VsDetail, VsMode, VsPlayer, VsRule, VsSession, VsTeam,
};

static RANK_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][+-]?)(\d*)$").expect("rank label pattern is valid"));

/// Render an RGBA color as `rrggbbaa`.
#[must_use]
pub fn map_color(color: &Color) -> String {
    [color.r, color.g, color.b, color.a]
        .iter()
        .map(|component| {
            let scaled = (component.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("{scaled:02x}")
        })
        .collect()
}

/// Split SplatNet's combined kill-or-assist tally.
#[must_use]
pub const fn split_kills(result: &PlayerResult) -> (i32, i32, i32) {
    let kill_or_assist = result.kill;
    (kill_or_assist - result.assist, result.assist, kill_or_assist)
}

/// `S+12` → (`s+`, Some(12)); `A-` → (`a-`, None).
#[must_use]
pub fn parse_rank(label: &str) -> Option<(String, Option<u32>)> {
    let caps = RANK_LABEL.captures(label.trim())?;
    let rank = caps.get(1)?.as_str().to_lowercase();
    let sub = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some((rank, sub))
}

/// # Errors
///
/// Returns [`MappingError::UnknownLobby`] for mode combinations stat.ink has no lobby for.
pub fn map_lobby(detail: &VsDetail) -> Result<&'static str, MappingError> {
    let unknown = || MappingError::UnknownLobby {
        mode: format!("{:?}", detail.vs_mode.mode),
    };
    match detail.vs_mode.mode {
        VsMode::Regular => Ok("regular"),
        VsMode::Private => Ok("private"),
        VsMode::XMatch => Ok("xmatch"),
        VsMode::League => Ok("event"),
        VsMode::Bankara => {
            let mode = detail
                .bankara_match
                .as_ref()
                .and_then(|m| m.mode)
                .unwrap_or(BankaraMode::Unknown);
            match mode {
                BankaraMode::Open => Ok("bankara_open"),
                BankaraMode::Challenge => Ok("bankara_challenge"),
                BankaraMode::Unknown => Err(unknown()),
            }
        }
        VsMode::Fest => {
            let mode_id = b64_number(&detail.vs_mode.id)?;
            if FEST_OPEN_MODE_IDS.contains(&mode_id) {
                Ok("splatfest_open")
            } else if mode_id == FEST_CHALLENGE_MODE_ID {
                Ok("splatfest_challenge")
            } else {
                Err(unknown())
            }
        }
        VsMode::Unknown => Err(unknown()),
    }
}

/// # Errors
///
/// Returns [`MappingError::UnknownRule`] for rules stat.ink does not know.
pub fn map_rule(rule: VsRule) -> Result<&'static str, MappingError> {
    match rule {
        VsRule::TurfWar => Ok("nawabari"),
        VsRule::Area => Ok("area"),
        VsRule::Loft => Ok("yagura"),
        VsRule::Goal => Ok("hoko"),
        VsRule::Clam => Ok("asari"),
        VsRule::TriColor => Ok("tricolor"),
        VsRule::Unknown => Err(MappingError::UnknownRule {
            rule: format!("{rule:?}"),
        }),
    }
}

#[must_use]
pub const fn map_judgement(judgement: Judgement) -> &'static str {
    match judgement {
        Judgement::Win => "win",
        Judgement::Lose | Judgement::DeemedLose => "lose",
        Judgement::ExemptedLose => "exempted_lose",
        Judgement::Draw => "draw",
    }
}

const fn map_dragon(dragon: DragonMatchType) -> Option<&'static str> {
    match dragon {
        DragonMatchType::Decuple => Some("10x"),
        DragonMatchType::Dragon => Some("100x"),
        DragonMatchType::DoubleDragon => Some("333x"),
        DragonMatchType::Normal | DragonMatchType::Unknown => None,
    }
}

pub(crate) const fn map_species(species: Species) -> &'static str {
    match species {
        Species::Inkling => "inkling",
        Species::Octoling => "octoling",
    }
}

fn map_role(role: &str) -> String {
    if role == TRICOLOR_DEFENSE_ROLE {
        "defender".to_string()
    } else {
        "attacker".to_string()
    }
}

/// Maps versus sessions, resolving names through the shared catalog.
pub struct VersusMapper<'a> {
    catalog: &'a CatalogClient,
    agent: &'a AgentInfo,
}

impl<'a> VersusMapper<'a> {
    #[must_use]
    pub const fn new(catalog: &'a CatalogClient, agent: &'a AgentInfo) -> Self {
        Self { catalog, agent }
    }

    /// Build the battle body for one session.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for unresolvable required fields, or a catalog
    /// fetch error.
    pub async fn map(&self, session: &VsSession) -> Result<BattleBody, ExportError> {
        let detail = &session.detail;
        let me = detail
            .my_team
            .players
            .iter()
            .position(|p| p.is_myself)
            .ok_or(MappingError::SelfNotFound)?;
        let Some(their_team) = detail.other_teams.first() else {
            return Err(MappingError::NoOpponents.into());
        };
        let third_team = detail.other_teams.get(1);
        let self_player = &detail.my_team.players[me];
        let start_at = detail.played_time.timestamp();

        let mut body = BattleBody {
            uuid: canonical_uuid(SessionKind::Battle, &detail.id)?,
            lobby: map_lobby(detail)?.to_string(),
            rule: map_rule(detail.vs_rule.rule)?.to_string(),
            stage: self.map_stage(&detail.vs_stage.id).await?,
            weapon: b64_number(&self_player.weapon.id)?.to_string(),
            result: map_judgement(detail.judgement).to_string(),
            knockout: detail.knockout.map(|k| YesNo::from(k != Knockout::Neither)),
            rank_in_team: rank_in_team(me),
            inked: self_player.paint,
            medals: detail.awards.iter().map(|a| a.name.clone()).collect(),
            our_team_count: detail.my_team.result.as_ref().and_then(|r| r.score),
            their_team_count: their_team.result.as_ref().and_then(|r| r.score),
            our_team_players: self.map_team(&detail.my_team).await?,
            their_team_players: self.map_team(their_team).await?,
            agent: self.agent.name(),
            agent_version: self.agent.version(),
            agent_variables: self.agent.variables(),
            automated: YesNo::Yes,
            start_at,
            end_at: start_at + detail.duration,
            ..BattleBody::default()
        };

        if let Some(result) = &self_player.result {
            let (kill, assist, kill_or_assist) = split_kills(result);
            body.kill = Some(kill);
            body.assist = Some(assist);
            body.kill_or_assist = Some(kill_or_assist);
            body.death = Some(result.death);
            body.special = Some(result.special);
            body.signal = result.noroshi_try;
        }

        if detail.vs_rule.rule.is_paint_rule() {
            body.our_team_percent = Some(detail.my_team.paint_percent());
            body.their_team_percent = Some(their_team.paint_percent());
            body.our_team_inked = Some(detail.my_team.inked());
            body.their_team_inked = Some(their_team.inked());
            body.our_team_color = Some(map_color(&detail.my_team.color));
            body.their_team_color = Some(map_color(&their_team.color));
            body.our_team_theme.clone_from(&detail.my_team.fest_team_name);
            body.their_team_theme.clone_from(&their_team.fest_team_name);
            body.our_team_role = detail.my_team.tricolor_role.as_deref().map(map_role);
            body.their_team_role = their_team.tricolor_role.as_deref().map(map_role);
            if let Some(third) = third_team {
                body.third_team_percent = Some(third.paint_percent());
                body.third_team_inked = Some(third.inked());
                body.third_team_color = Some(map_color(&third.color));
                body.third_team_theme.clone_from(&third.fest_team_name);
                body.third_team_role = third.tricolor_role.as_deref().map(map_role);
                body.third_team_players = Some(self.map_team(third).await?);
            }
        }

        if let Some(fest) = &detail.fest_match {
            body.fest_dragon = map_dragon(fest.dragon_match_type).map(str::to_string);
            body.clout_change = fest.contribution;
            body.fest_power = fest.my_fest_power;
        }

        match detail.vs_mode.mode {
            VsMode::Bankara => apply_rank_progress(&mut body, session),
            VsMode::XMatch => apply_x_power(&mut body, session),
            _ => {}
        }

        Ok(body)
    }

    async fn map_stage(&self, stage_id: &str) -> Result<String, ExportError> {
        let decoded = b64_number(stage_id)?;
        self.catalog
            .resolve_stage_key(decoded)
            .await?
            .ok_or_else(|| {
                MappingError::UnknownStage {
                    stage: decoded.to_string(),
                }
                .into()
            })
    }

    async fn map_team(&self, team: &VsTeam) -> Result<Vec<PlayerBody>, ExportError> {
        let mut players = Vec::with_capacity(team.players.len());
        for (index, player) in team.players.iter().enumerate() {
            players.push(self.map_player(player, index).await?);
        }
        Ok(players)
    }

    async fn map_player(&self, player: &VsPlayer, index: usize) -> Result<PlayerBody, ExportError> {
        let mut body = PlayerBody {
            me: player.is_myself.into(),
            rank_in_team: rank_in_team(index),
            name: player.name.clone(),
            number: player.name_id.clone(),
            splashtag_title: player.byname.clone(),
            species: map_species(player.species).to_string(),
            weapon: b64_number(&player.weapon.id)?.to_string(),
            inked: player.paint,
            kill: None,
            assist: None,
            kill_or_assist: None,
            death: None,
            special: None,
            signal: None,
            gears: GearsBody {
                headgear: self.map_gear(&player.head_gear).await?,
                clothing: self.map_gear(&player.clothing_gear).await?,
                shoes: self.map_gear(&player.shoes_gear).await?,
            },
            crown: player.crown.into(),
            disconnected: player.result.is_none().into(),
        };
        if let Some(result) = &player.result {
            let (kill, assist, kill_or_assist) = split_kills(result);
            body.kill = Some(kill);
            body.assist = Some(assist);
            body.kill_or_assist = Some(kill_or_assist);
            body.death = Some(result.death);
            body.special = Some(result.special);
            body.signal = result.noroshi_try;
        }
        Ok(body)
    }

    /// Primary abilities must resolve; secondaries may come back empty.
    async fn map_gear(&self, gear: &Gear) -> Result<GearBody, ExportError> {
        let primary_name = &gear.primary_gear_power.name;
        let primary_ability = self
            .catalog
            .resolve_ability_key(primary_name)
            .await?
            .ok_or_else(|| MappingError::UnknownAbility {
                name: primary_name.clone(),
            })?;
        let mut secondary_abilities = Vec::with_capacity(gear.additional_gear_powers.len());
        for power in &gear.additional_gear_powers {
            secondary_abilities.push(self.catalog.resolve_ability_key(&power.name).await?);
        }
        Ok(GearBody {
            primary_ability,
            secondary_abilities,
        })
    }
}

fn rank_in_team(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Ranks only move at series boundaries, so "after" mirrors "before" unless
/// this battle opened a new series with a reported result.
fn apply_rank_progress(body: &mut BattleBody, session: &VsSession) {
    let detail = &session.detail;
    let before_state = session.rank_before_state.as_ref();
    let before = before_state.and_then(|state| parse_rank(&state.rank));
    let challenge = session.challenge.as_ref();

    let after = challenge
        .filter(|c| c.is_first_battle)
        .and_then(|c| c.rank_after.as_deref())
        .and_then(parse_rank)
        .or_else(|| before.clone());

    if let Some((rank, sub)) = before {
        body.rank_before = Some(rank);
        body.rank_before_s_plus = sub;
    }
    if let Some((rank, sub)) = after {
        body.rank_after = Some(rank);
        body.rank_after_s_plus = sub;
    }

    let before_points = before_state.and_then(|s| s.rank_points);
    let after_points = session.rank_state.as_ref().and_then(|s| s.rank_points);
    body.rank_before_exp = before_points;
    body.rank_after_exp = after_points;

    let is_promo = challenge.is_some_and(|c| c.is_promo);
    let reported = detail
        .bankara_match
        .as_ref()
        .and_then(|m| m.earned_udemae_point)
        .or_else(|| challenge.and_then(|c| c.earned_rank_points));
    body.rank_exp_change = reported.or_else(|| match (before_points, after_points) {
        (Some(before), Some(after)) if !is_promo => Some(after - before),
        _ => None,
    });

    if let Some(c) = challenge {
        body.rank_up_battle = Some(c.is_promo.into());
        body.challenge_win = c.win_count;
        body.challenge_lose = c.lose_count;
    }
    body.bankara_power_after = detail
        .bankara_match
        .as_ref()
        .and_then(|m| m.bankara_power.as_ref())
        .and_then(|p| p.power);
}

fn apply_x_power(body: &mut BattleBody, session: &VsSession) {
    body.x_power_before = session.last_x_power;
    body.x_power_after = session.last_x_power;
    if let Some(measurement) = &session.x_measurement
        && measurement.state == MeasurementState::Completed
        && measurement.is_first_battle
        && measurement.x_power_after.is_some()
    {
        body.x_power_after = measurement.x_power_after;
    }
}
