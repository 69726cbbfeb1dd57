use crate::PublicBall;

/// Scoreboard order: balls still playing first, fewest strokes first;
/// finished balls after, again by stroke count. Matches the classic board
/// where a sunk ball drops to the bottom with a star.
pub fn standings(balls: &[PublicBall]) -> Vec<PublicBall> {
    let mut rows = balls.to_vec();
    rows.sort_by_key(|ball| (ball.finished, ball.strokes));
    rows
}

/// Top of the scoreboard, if anyone is playing.
pub fn leader(balls: &[PublicBall]) -> Option<&PublicBall> {
    balls.iter().min_by_key(|ball| (ball.finished, ball.strokes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parloop_sim::physics::BallState;

    fn row(name: &str, strokes: u32, finished: bool) -> PublicBall {
        let mut state = BallState::new(0.0, 0.0, 0.0);
        state.finished = finished;
        state.grounded = finished;
        PublicBall {
            id: state.id,
            x: state.x,
            y: state.y,
            dx: state.dx,
            dy: state.dy,
            ts: state.ts,
            color: "gray".to_string(),
            name: Some(name.to_string()),
            strokes,
            updates: state.updates,
            grounded: state.grounded,
            finished: state.finished,
        }
    }

    fn names(rows: &[PublicBall]) -> Vec<&str> {
        rows.iter().filter_map(|b| b.name.as_deref()).collect()
    }

    #[test]
    fn playing_balls_rank_above_finished_ones() {
        let balls = vec![
            row("deep", 5, false),
            row("sunk-late", 3, true),
            row("close", 2, false),
            row("sunk-early", 1, true),
        ];
        let ranked = standings(&balls);
        assert_eq!(names(&ranked), ["close", "deep", "sunk-early", "sunk-late"]);
    }

    #[test]
    fn leader_is_the_top_of_the_board() {
        let balls = vec![
            row("b", 4, false),
            row("a", 2, false),
            row("done", 1, true),
        ];
        let leader = leader(&balls).unwrap();
        assert_eq!(leader.name.as_deref(), Some("a"));
    }

    #[test]
    fn empty_board_has_no_leader() {
        assert!(leader(&[]).is_none());
        assert!(standings(&[]).is_empty());
    }
}
