use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::{MatchSnapshot, PlayerSlot, StatDeltas};
use crate::pipeline::PipelineError;

/// Provenance tag attached to every snapshot this client produces
const SOURCE_TAG: &str = "pandascore";

/// Client for a PandaScore-style esports data API
pub struct PandaScoreClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Running match from the upstream API
#[derive(Debug, Deserialize)]
struct ApiMatch {
    id: Value,
    league: Option<ApiLeague>,
    #[serde(default)]
    opponents: Vec<ApiOpponentSlot>,
    serie: Option<ApiSerie>,
    #[serde(default)]
    games: Vec<ApiGame>,
}

#[derive(Debug, Deserialize)]
struct ApiLeague {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiOpponentSlot {
    opponent: Option<ApiOpponent>,
}

#[derive(Debug, Deserialize)]
struct ApiOpponent {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSerie {
    #[serde(default)]
    opponents: Vec<ApiSerieOpponent>,
}

#[derive(Debug, Deserialize)]
struct ApiSerieOpponent {
    #[serde(default)]
    wins: u32,
}

#[derive(Debug, Deserialize)]
struct ApiGame {
    #[serde(default)]
    position: u32,
    winner: Option<ApiWinner>,
    #[serde(default)]
    teams: Vec<ApiGameTeam>,
}

#[derive(Debug, Deserialize)]
struct ApiWinner {
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ApiGameTeam {
    #[serde(default)]
    players: Vec<ApiPlayer>,
    kills: Option<i64>,
    gold: Option<i64>,
    towers: Option<i64>,
    dragons: Option<i64>,
    barons: Option<i64>,
    creep_score: Option<i64>,
    wards_placed: Option<i64>,
    first_blood: Option<bool>,
    first_tower: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ApiPlayer {
    champion: Option<ApiChampion>,
}

#[derive(Debug, Deserialize)]
struct ApiChampion {
    name: Option<String>,
}

impl PandaScoreClient {
    /// Create a new client
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            token: token.to_string(),
        }
    }

    /// Fetch all currently running LoL matches and convert them to snapshots.
    ///
    /// A malformed match is logged and skipped; one bad payload never aborts
    /// the batch.
    pub async fn fetch_running_matches(&self) -> Result<Vec<MatchSnapshot>> {
        let url = format!("{}/lol/matches/running", self.base_url);

        debug!("Fetching running matches from {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to fetch running matches")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Esports API error: {} - {}", status, text);
        }

        let matches: Vec<ApiMatch> = response
            .json()
            .await
            .context("Failed to parse running matches response")?;

        let mut snapshots = Vec::new();

        for api_match in matches {
            match convert_match(api_match) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    warn!("Skipping malformed match this cycle: {}", e);
                }
            }
        }

        info!("Upstream returned {} usable running matches", snapshots.len());

        Ok(snapshots)
    }
}

/// Convert an upstream match into a snapshot.
///
/// Missing team names or a team-less active game are malformed; a missing
/// league or serie block is not (those degrade to values the pipeline
/// filters or gates on its own).
fn convert_match(data: ApiMatch) -> Result<MatchSnapshot, PipelineError> {
    let match_id = stringify_id(&data.id)
        .ok_or_else(|| PipelineError::MalformedPayload("match id missing".into()))?;

    let team_name = |idx: usize| -> Result<String, PipelineError> {
        data.opponents
            .get(idx)
            .and_then(|slot| slot.opponent.as_ref())
            .and_then(|o| o.name.clone())
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::MalformedPayload(format!("opponent {} name missing", idx + 1))
            })
    };
    let team1_name = team_name(0)?;
    let team2_name = team_name(1)?;

    let league_name = data
        .league
        .and_then(|l| l.name)
        .unwrap_or_default();

    let series_wins = match data.serie {
        Some(serie) => {
            let wins = |idx: usize| serie.opponents.get(idx).map(|o| o.wins).unwrap_or(0);
            (wins(0), wins(1))
        }
        None => (0, 0),
    };

    let finished_games = data
        .games
        .iter()
        .filter(|g| g.winner.as_ref().and_then(|w| w.id).is_some())
        .count() as u32;

    // The active game is the lowest-positioned one without a declared winner
    let active_game = data
        .games
        .iter()
        .filter(|g| g.winner.as_ref().and_then(|w| w.id).is_none())
        .min_by_key(|g| g.position);

    let (team1_slots, team2_slots, stats) = match active_game {
        Some(game) => {
            if game.teams.len() < 2 {
                return Err(PipelineError::MalformedPayload(
                    "active game has no per-team data".into(),
                ));
            }
            let t1 = &game.teams[0];
            let t2 = &game.teams[1];
            (player_slots(t1), player_slots(t2), stat_deltas(t1, t2))
        }
        // No undecided game in the payload; the already-decided gate handles it
        None => (Vec::new(), Vec::new(), StatDeltas::default()),
    };

    Ok(MatchSnapshot {
        match_id,
        league_name,
        team1_name,
        team2_name,
        series_wins,
        finished_games,
        team1_slots,
        team2_slots,
        stats,
        raw_source_tag: SOURCE_TAG.to_string(),
        fetched_at: Utc::now(),
    })
}

/// Upstream ids arrive as numbers or strings depending on provider
fn stringify_id(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn player_slots(team: &ApiGameTeam) -> Vec<PlayerSlot> {
    team.players
        .iter()
        .map(|p| PlayerSlot {
            champion: p.champion.as_ref().and_then(|c| c.name.clone()),
        })
        .collect()
}

fn stat_deltas(t1: &ApiGameTeam, t2: &ApiGameTeam) -> StatDeltas {
    let diff = |a: Option<i64>, b: Option<i64>| a.unwrap_or(0) - b.unwrap_or(0);
    let optional_diff = |a: Option<i64>, b: Option<i64>| match (a, b) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    };

    StatDeltas {
        kill_diff: diff(t1.kills, t2.kills),
        gold_diff: diff(t1.gold, t2.gold),
        tower_diff: diff(t1.towers, t2.towers),
        dragon_diff: diff(t1.dragons, t2.dragons),
        baron_diff: diff(t1.barons, t2.barons),
        cs_diff: optional_diff(t1.creep_score, t2.creep_score),
        vision_diff: optional_diff(t1.wards_placed, t2.wards_placed),
        first_blood: t1.first_blood.or(t2.first_blood),
        first_tower: t1.first_tower.or(t2.first_tower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_match(payload: serde_json::Value) -> ApiMatch {
        serde_json::from_value(payload).unwrap()
    }

    fn running_match() -> serde_json::Value {
        json!({
            "id": 48291734651i64,
            "league": { "name": "LCK" },
            "opponents": [
                { "opponent": { "name": "T1" } },
                { "opponent": { "name": "Gen.G" } }
            ],
            "serie": { "opponents": [ { "wins": 1 }, { "wins": 1 } ] },
            "games": [
                { "position": 1, "winner": { "id": 101 }, "teams": [] },
                { "position": 2, "winner": { "id": 102 }, "teams": [] },
                {
                    "position": 3,
                    "winner": { "id": null },
                    "teams": [
                        {
                            "players": [
                                { "champion": { "name": "Azir" } },
                                { "champion": { "name": "Sejuani" } },
                                { "champion": { "name": "Jinx" } },
                                { "champion": { "name": "Thresh" } },
                                { "champion": { "name": "Aatrox" } }
                            ],
                            "kills": 7, "gold": 31000, "towers": 3,
                            "dragons": 2, "barons": 1, "creep_score": 540
                        },
                        {
                            "players": [
                                { "champion": { "name": "Orianna" } },
                                { "champion": { "name": "Vi" } },
                                { "champion": { "name": "Kai'Sa" } },
                                { "champion": null },
                                {}
                            ],
                            "kills": 4, "gold": 28500, "towers": 1,
                            "dragons": 1, "barons": 0, "creep_score": 512
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn converts_nested_payload() {
        let snapshot = convert_match(api_match(running_match())).unwrap();

        assert_eq!(snapshot.match_id, "48291734651");
        assert_eq!(snapshot.league_name, "LCK");
        assert_eq!(snapshot.team1_name, "T1");
        assert_eq!(snapshot.team2_name, "Gen.G");
        assert_eq!(snapshot.series_wins, (1, 1));
        assert_eq!(snapshot.finished_games, 2);
        assert_eq!(snapshot.team1_slots.len(), 5);
        assert_eq!(snapshot.team2_slots.len(), 5);
        assert_eq!(snapshot.stats.kill_diff, 3);
        assert_eq!(snapshot.stats.gold_diff, 2500);
        assert_eq!(snapshot.stats.tower_diff, 2);
        assert_eq!(snapshot.stats.cs_diff, Some(28));
        assert_eq!(snapshot.stats.vision_diff, None);
        assert_eq!(snapshot.raw_source_tag, "pandascore");
    }

    #[test]
    fn unpicked_champions_stay_empty() {
        let snapshot = convert_match(api_match(running_match())).unwrap();
        let picked: Vec<bool> = snapshot.team2_slots.iter().map(|s| s.has_pick()).collect();
        assert_eq!(picked, vec![true, true, true, false, false]);
    }

    #[test]
    fn missing_opponent_name_is_malformed() {
        let mut payload = running_match();
        payload["opponents"][1] = json!({ "opponent": { "name": null } });
        let err = convert_match(api_match(payload)).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedPayload(_)));
    }

    #[test]
    fn string_ids_pass_through() {
        let mut payload = running_match();
        payload["id"] = json!("lck-2026-summer-f1");
        let snapshot = convert_match(api_match(payload)).unwrap();
        assert_eq!(snapshot.match_id, "lck-2026-summer-f1");
    }

    #[test]
    fn no_undecided_game_means_empty_draft() {
        let mut payload = running_match();
        payload["games"][2]["winner"] = json!({ "id": 101 });
        let snapshot = convert_match(api_match(payload)).unwrap();
        assert_eq!(snapshot.finished_games, 3);
        assert!(snapshot.team1_slots.is_empty());
    }

    #[test]
    fn missing_serie_defaults_to_first_game() {
        let mut payload = running_match();
        payload.as_object_mut().unwrap().remove("serie");
        let snapshot = convert_match(api_match(payload)).unwrap();
        assert_eq!(snapshot.series_wins, (0, 0));
    }
}
