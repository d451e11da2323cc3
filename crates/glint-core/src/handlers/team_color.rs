//! Team colour layer for Rocket League.

use tracing::debug;

use crate::domain::key::LogicalKey;
use crate::domain::layer::EffectLayer;
use crate::domain::state::GameState;
use crate::games::rocket_league;
use crate::render::stack::LayerHandler;

/// Paints its keys with the colour of the team the local player is on.
///
/// Renders nothing outside a match or for other games.
#[derive(Debug, Clone)]
pub struct TeamColorLayerHandler {
    keys: Vec<LogicalKey>,
}

impl TeamColorLayerHandler {
    pub fn new(keys: Vec<LogicalKey>) -> Self {
        Self { keys }
    }
}

impl LayerHandler for TeamColorLayerHandler {
    fn id(&self) -> &str {
        "RocketLeagueTeamColor"
    }

    fn render(&self, state: &GameState) -> EffectLayer {
        let mut layer = EffectLayer::new("Rocket League - Team Color");

        match rocket_league::player_team(state) {
            Some(team) => layer.fill(&self.keys, team.team_color()),
            None => debug!(kind = state.kind(), "team colour layer skipped: no player team"),
        }

        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::Color;
    use serde_json::json;

    #[test]
    fn test_paints_player_team_color() {
        let state = GameState::from_value(
            rocket_league::KIND,
            json!({
                "match": { "teams": [
                    { "name": "Blue", "red": 0.0, "green": 0.0, "blue": 1.0 },
                    { "name": "Orange", "red": 1.0, "green": 0.5, "blue": 0.0 }
                ]},
                "player": { "team": 0 }
            }),
        );
        let handler = TeamColorLayerHandler::new(vec![LogicalKey::PERIPHERAL]);

        let layer = handler.render(&state);

        assert_eq!(layer.get(&LogicalKey::PERIPHERAL), Some(Color::BLUE));
    }

    #[test]
    fn test_no_match_renders_empty_layer() {
        let handler = TeamColorLayerHandler::new(vec![LogicalKey::PERIPHERAL]);
        assert!(handler.render(&GameState::empty(rocket_league::KIND)).is_empty());
        assert!(handler.render(&GameState::empty("dota2")).is_empty());
    }
}
