//! Rocket League view: teams and the local player's team.

use crate::domain::color::Color;
use crate::domain::state::{GameState, Node};

/// State kind tag produced by the Rocket League integration.
pub const KIND: &str = "rocket_league";

/// One team as reported by the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    /// Usually "Blue" or "Orange"; clan and custom games rename it.
    pub name: String,
    pub goals: i64,
    /// Team colour channels in `[0, 1]`.
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Team {
    pub fn from_node(node: Node<'_>) -> Self {
        Self {
            name: node.string("name").unwrap_or_default().to_string(),
            goals: node.int("goals").unwrap_or(0),
            red: node.float("red").unwrap_or(0.0),
            green: node.float("green").unwrap_or(0.0),
            blue: node.float("blue").unwrap_or(0.0),
        }
    }

    pub fn team_color(&self) -> Color {
        Color::from_unit_rgb(self.red, self.green, self.blue)
    }
}

/// Both teams from `match.teams`, in the order the game reports them.
pub fn teams(state: &GameState) -> Vec<Team> {
    if !state.is_kind(KIND) {
        return Vec::new();
    }
    state
        .root()
        .child("match")
        .map(|m| m.items("teams").into_iter().map(Team::from_node).collect())
        .unwrap_or_default()
}

/// The team referenced by `player.team`, if the index is valid.
pub fn player_team(state: &GameState) -> Option<Team> {
    let index = state.root().child("player")?.int("team")?;
    let index = usize::try_from(index).ok()?;
    teams(state).into_iter().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(player_team: i64) -> GameState {
        GameState::from_value(
            KIND,
            json!({
                "match": { "teams": [
                    { "name": "Blue", "goals": 2, "red": 0.0, "green": 0.4, "blue": 1.0 },
                    { "name": "Orange", "goals": 1, "red": 1.0, "green": 0.5, "blue": 0.0 }
                ]},
                "player": { "team": player_team }
            }),
        )
    }

    #[test]
    fn test_team_color_converts_unit_floats() {
        let team = player_team(&state(1)).expect("orange team");
        assert_eq!(team.name, "Orange");
        assert_eq!(team.team_color(), Color::rgb(255, 127, 0));
    }

    #[test]
    fn test_invalid_player_team_is_none() {
        assert!(player_team(&state(5)).is_none());
        assert!(player_team(&state(-1)).is_none());
    }

    #[test]
    fn test_teams_empty_for_other_kind() {
        let other = GameState::from_value("dota2", json!({ "match": { "teams": [{}] } }));
        assert!(teams(&other).is_empty());
    }
}
