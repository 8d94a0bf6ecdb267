//! Player Subsystem
//!
//! Movement, firing, bullet advancement, damage and invulnerability.
//! Pure transforms only: each function builds a new record.

use crate::core::geom::clamp_i32;
use crate::game::input::Steer;
use crate::game::state::{Bullet, PlayerState};
use crate::SCREEN_W;

/// Cull line for player bullets: anything at or above this y is gone.
const BULLET_CULL_Y: i32 = -40;

/// Shift the ship horizontally by the steering intent, clamped to the
/// screen.
pub fn move_player(player: &PlayerState, steer: Steer) -> PlayerState {
    let x = clamp_i32(
        player.x + steer.dx() * PlayerState::MOVE_SPEED,
        0,
        SCREEN_W - PlayerState::WIDTH,
    );
    PlayerState { x, ..*player }
}

/// Append one bullet centered on the ship's top edge.
///
/// No rate limiting here - the shell owns the fire cooldown.
pub fn fire(player: &PlayerState, bullets: &[Bullet]) -> Vec<Bullet> {
    let bx = player.x + (PlayerState::WIDTH / 2 - Bullet::WIDTH / 2);
    let mut next = bullets.to_vec();
    next.push(Bullet::new(bx, player.y));
    next
}

/// Advance every bullet by its velocity and drop the ones that scrolled
/// off the top of the screen.
pub fn advance_bullets(bullets: &[Bullet]) -> Vec<Bullet> {
    bullets
        .iter()
        .map(|b| Bullet { y: b.y + b.vy, ..*b })
        .filter(|b| b.y > BULLET_CULL_Y)
        .collect()
}

/// Apply damage to the player.
///
/// No-op while invulnerability frames remain. Otherwise hearts drop by
/// `amount` (floored at zero), `alive` tracks the heart count, and a fresh
/// immunity window starts.
pub fn damage(player: &PlayerState, amount: u32, invuln_ticks: u32) -> PlayerState {
    if player.invul_frames > 0 {
        return *player;
    }
    let hearts = player.hearts.saturating_sub(amount);
    PlayerState {
        hearts,
        alive: hearts > 0,
        invul_frames: invuln_ticks,
        ..*player
    }
}

/// Count one tick off the invulnerability window.
pub fn tick_invulnerability(player: &PlayerState) -> PlayerState {
    if player.invul_frames == 0 {
        return *player;
    }
    PlayerState {
        invul_frames: player.invul_frames - 1,
        ..*player
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: i32) -> PlayerState {
        PlayerState {
            x,
            ..PlayerState::spawn()
        }
    }

    #[test]
    fn test_move_left_stops_at_zero() {
        let p = player_at(0);
        assert_eq!(move_player(&p, Steer::Left).x, 0);

        let p = player_at(3);
        assert_eq!(move_player(&p, Steer::Left).x, 0);
    }

    #[test]
    fn test_move_right_stops_at_edge() {
        let edge = SCREEN_W - PlayerState::WIDTH;
        let p = player_at(edge);
        assert_eq!(move_player(&p, Steer::Right).x, edge);

        let p = player_at(edge - 2);
        assert_eq!(move_player(&p, Steer::Right).x, edge);
    }

    #[test]
    fn test_move_none_is_identity() {
        let p = player_at(123);
        assert_eq!(move_player(&p, Steer::None), p);
    }

    #[test]
    fn test_fire_centers_bullet() {
        let p = player_at(100);
        let bullets = fire(&p, &[]);

        assert_eq!(bullets.len(), 1);
        let b = bullets[0];
        assert_eq!(b.x, 100 + PlayerState::WIDTH / 2 - Bullet::WIDTH / 2);
        assert_eq!(b.y, p.y);
        assert_eq!(b.vy, Bullet::SPEED);
    }

    #[test]
    fn test_fire_preserves_existing_bullets() {
        let p = player_at(0);
        let first = fire(&p, &[]);
        let second = fire(&p, &first);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0], first[0]);
    }

    #[test]
    fn test_advance_bullets_moves_and_culls() {
        let live = Bullet::new(100, 300);
        let dying = Bullet::new(100, -35); // next step lands at -45
        let next = advance_bullets(&[live, dying]);

        assert_eq!(next.len(), 1);
        assert_eq!(next[0].y, 300 + Bullet::SPEED);
    }

    #[test]
    fn test_cull_boundary_is_exclusive() {
        // Lands exactly on the cull line: dropped
        let b = Bullet::new(0, BULLET_CULL_Y + 10);
        assert!(advance_bullets(&[b]).is_empty());

        // Lands one pixel below the line: kept
        let b = Bullet::new(0, BULLET_CULL_Y + 11);
        assert_eq!(advance_bullets(&[b]).len(), 1);
    }

    #[test]
    fn test_damage_reduces_hearts_and_grants_immunity() {
        let p = PlayerState::spawn();
        let hit = damage(&p, 1, PlayerState::INVULN_TICKS);

        assert_eq!(hit.hearts, PlayerState::MAX_HEARTS - 1);
        assert!(hit.alive);
        assert_eq!(hit.invul_frames, PlayerState::INVULN_TICKS);
    }

    #[test]
    fn test_damage_while_invulnerable_is_noop() {
        let p = PlayerState {
            invul_frames: 10,
            ..PlayerState::spawn()
        };
        assert_eq!(damage(&p, 1, PlayerState::INVULN_TICKS), p);
    }

    #[test]
    fn test_damage_floors_at_zero_and_kills() {
        let p = PlayerState {
            hearts: 1,
            ..PlayerState::spawn()
        };
        let dead = damage(&p, 3, PlayerState::INVULN_TICKS);

        assert_eq!(dead.hearts, 0);
        assert!(!dead.alive);
    }

    #[test]
    fn test_alive_tracks_hearts_exactly() {
        let p = PlayerState {
            hearts: 2,
            ..PlayerState::spawn()
        };
        let once = damage(&p, 1, 0);
        assert!(once.alive);

        let twice = damage(&once, 1, 0);
        assert_eq!(twice.hearts, 0);
        assert!(!twice.alive);
    }

    #[test]
    fn test_tick_invulnerability_counts_down_to_zero() {
        let p = PlayerState {
            invul_frames: 2,
            ..PlayerState::spawn()
        };
        let p = tick_invulnerability(&p);
        assert_eq!(p.invul_frames, 1);
        let p = tick_invulnerability(&p);
        assert_eq!(p.invul_frames, 0);
        // Stays at zero
        let p = tick_invulnerability(&p);
        assert_eq!(p.invul_frames, 0);
    }
}
