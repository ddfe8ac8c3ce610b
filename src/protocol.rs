//! Wire protocol for the remote player link.
//!
//! Both directions are line-delimited. The adapter sends one JSON object per
//! line (the full [`PlayerState`] snapshot); the client answers with bare
//! move tokens, one per line. There is no envelope, version field or length
//! prefix.

use crate::player::{Move, PlayerState};

/// Parse one line of client input into a move.
///
/// Leading/trailing whitespace is trimmed, then the token must match one of
/// `up`, `down`, `left`, `right`, `bomb` exactly (case-sensitive). Anything
/// else yields `None`; the caller decides whether to log and carry on.
pub fn parse_move(line: &str) -> Option<Move> {
    match line.trim() {
        "up" => Some(Move::Up),
        "down" => Some(Move::Down),
        "left" => Some(Move::Left),
        "right" => Some(Move::Right),
        "bomb" => Some(Move::PlaceBomb),
        _ => None,
    }
}

/// Serialize a state snapshot to its wire framing: JSON object + `\n`.
pub fn encode_state(state: &PlayerState) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(state)?;
    line.push('\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_valid_tokens() {
        assert_eq!(parse_move("up"), Some(Move::Up));
        assert_eq!(parse_move("down"), Some(Move::Down));
        assert_eq!(parse_move("left"), Some(Move::Left));
        assert_eq!(parse_move("right"), Some(Move::Right));
        assert_eq!(parse_move("bomb"), Some(Move::PlaceBomb));
    }

    #[test]
    fn test_parse_move_trims_whitespace() {
        assert_eq!(parse_move("  up  "), Some(Move::Up));
        assert_eq!(parse_move("left\r"), Some(Move::Left));
        assert_eq!(parse_move("\tbomb\n"), Some(Move::PlaceBomb));
    }

    #[test]
    fn test_parse_move_rejects_unknown() {
        assert_eq!(parse_move(""), None);
        assert_eq!(parse_move("jump"), None);
        assert_eq!(parse_move("UP"), None); // tokens are case-sensitive
        assert_eq!(parse_move("up down"), None);
        assert_eq!(parse_move("{\"type\":\"up\"}"), None);
    }

    #[test]
    fn test_parse_move_roundtrips_tokens() {
        for mv in [
            Move::Up,
            Move::Down,
            Move::Left,
            Move::Right,
            Move::PlaceBomb,
        ] {
            assert_eq!(parse_move(mv.token()), Some(mv));
        }
    }

    #[test]
    fn test_encode_state_is_one_json_line() {
        let mut state = PlayerState::new("gopher");
        state.turn = 7;
        state.x = 3;
        state.y = 5;

        let line = encode_state(&state).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let v: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(v["name"], "gopher");
        assert_eq!(v["turn"], 7);
        assert_eq!(v["alive"], true);
    }
}
