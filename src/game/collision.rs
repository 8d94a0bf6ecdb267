//! Collision Subsystem
//!
//! Three independent passes (meteor mode, enemy mode, boss mode) plus the
//! explosion-timer advancement. Each pass is a pure transform producing a
//! new world state and any emitted events; nothing is mutated in place.
//!
//! Tie-break policy: within one tick, a bullet or entity matches at most
//! once - the first match in insertion order consumes it.

use crate::core::geom::rects_overlap;
use crate::game::events::GameEvent;
use crate::game::player::{damage, tick_invulnerability};
use crate::game::state::{
    Boss, Bullet, Enemy, EnemyBullet, Explosion, ExplosionKind, GameState, Meteor, Mode,
    PlayerState,
};

#[inline]
fn bullet_hits_meteor(b: &Bullet, m: &Meteor) -> bool {
    rects_overlap(
        b.x,
        b.y,
        Bullet::WIDTH,
        Bullet::HEIGHT,
        m.x,
        m.y,
        m.width,
        m.height,
    )
}

#[inline]
fn bullet_hits_enemy(b: &Bullet, e: &Enemy) -> bool {
    rects_overlap(
        b.x,
        b.y,
        Bullet::WIDTH,
        Bullet::HEIGHT,
        e.x,
        e.y,
        Enemy::WIDTH,
        Enemy::HEIGHT,
    )
}

#[inline]
fn bullet_hits_boss(b: &Bullet, boss: &Boss) -> bool {
    rects_overlap(
        b.x,
        b.y,
        Bullet::WIDTH,
        Bullet::HEIGHT,
        boss.x,
        boss.y,
        Boss::WIDTH,
        Boss::HEIGHT,
    )
}

#[inline]
fn meteor_hits_player(m: &Meteor, p: &PlayerState) -> bool {
    rects_overlap(
        p.x,
        p.y,
        PlayerState::WIDTH,
        PlayerState::HEIGHT,
        m.x,
        m.y,
        m.width,
        m.height,
    )
}

#[inline]
fn enemy_bullet_hits_player(b: &EnemyBullet, p: &PlayerState) -> bool {
    rects_overlap(
        p.x,
        p.y,
        PlayerState::WIDTH,
        PlayerState::HEIGHT,
        b.x,
        b.y,
        EnemyBullet::WIDTH,
        EnemyBullet::HEIGHT,
    )
}

/// Meteor-mode pass.
///
/// Player bullets destroy meteors (+10 score each, meteor explosion FX);
/// every bullet that touched any meteor is consumed; a surviving meteor
/// touching the player applies one damage unit (first contact only,
/// invulnerability respected). Emits [`GameEvent::PlayerDefeated`] on an
/// alive-to-dead transition.
pub fn resolve_meteor_collisions(state: &GameState) -> GameState {
    let mut score = state.score;
    let mut explosions = state.explosions.clone();

    // Meteors survive only if no bullet touched them
    let mut surviving: Vec<Meteor> = Vec::with_capacity(state.meteors.len());
    for m in &state.meteors {
        let hit = state.bullets.iter().any(|b| bullet_hits_meteor(b, m));
        if hit {
            score += 10;
            explosions.push(Explosion::new(
                m.x + m.width / 2,
                m.y + m.height / 2,
                ExplosionKind::Meteor,
            ));
        } else {
            surviving.push(*m);
        }
    }

    // Bullets survive only if they touched no meteor at all
    let bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .filter(|b| !state.meteors.iter().any(|m| bullet_hits_meteor(b, m)))
        .copied()
        .collect();

    // First surviving meteor touching the player deals one damage unit
    let was_alive = state.player.alive;
    let mut player = state.player;
    let mut contact = false;
    for m in &surviving {
        if meteor_hits_player(m, &player) {
            player = damage(&player, 1, PlayerState::INVULN_TICKS);
            contact = true;
            break;
        }
    }
    if !contact {
        player = tick_invulnerability(&player);
    }

    let next = GameState {
        player,
        meteors: surviving,
        bullets,
        score,
        explosions,
        ..state.clone()
    };

    if was_alive && !next.player.alive {
        next.with_events([GameEvent::PlayerDefeated])
    } else {
        next
    }
}

/// Enemy-mode pass.
///
/// Player bullets kill the first hittable enemy they touch (+50 score,
/// explosion countdown, enemy FX; the bullet is consumed). Enemy bullets
/// touching the player are always consumed; damage lands only when the
/// player is not currently invulnerable. Exploding enemies persist until
/// their countdown runs out, then disappear.
pub fn resolve_enemy_collisions(state: &GameState) -> GameState {
    let mut score = state.score;
    let mut explosions = state.explosions.clone();
    let mut enemies = state.enemies.clone();

    // Player bullets vs enemies: first hittable target consumes the bullet
    let mut bullets: Vec<Bullet> = Vec::with_capacity(state.bullets.len());
    for b in &state.bullets {
        let target = enemies
            .iter()
            .position(|e| e.can_be_hit() && bullet_hits_enemy(b, e));
        match target {
            Some(idx) => {
                let e = enemies[idx];
                enemies[idx] = Enemy {
                    alive: false,
                    exploding: true,
                    explosion_timer: Enemy::KILL_EXPLOSION_TICKS,
                    ..e
                };
                score += 50;
                explosions.push(Explosion::new(
                    e.center_x(),
                    e.y + Enemy::HEIGHT / 2,
                    ExplosionKind::Enemy,
                ));
            }
            None => bullets.push(*b),
        }
    }

    // Enemy bullets vs player: contact always consumes the bullet, damage
    // lands only outside the immunity window
    let was_alive = state.player.alive;
    let mut player = state.player;
    let mut contact = false;
    let mut enemy_bullets: Vec<EnemyBullet> = Vec::with_capacity(state.enemy_bullets.len());
    for eb in &state.enemy_bullets {
        if enemy_bullet_hits_player(eb, &player) {
            if player.invul_frames == 0 {
                player = damage(&player, 1, PlayerState::INVULN_TICKS);
            }
            contact = true;
        } else {
            enemy_bullets.push(*eb);
        }
    }
    if !contact {
        player = tick_invulnerability(&player);
    }

    // Exploding enemies count down; spent ones leave the collection
    let enemies: Vec<Enemy> = enemies
        .into_iter()
        .filter_map(|e| {
            if e.alive {
                Some(e)
            } else if e.exploding && e.explosion_timer > 0 {
                Some(Enemy {
                    explosion_timer: e.explosion_timer - 1,
                    ..e
                })
            } else {
                None
            }
        })
        .collect();

    let next = GameState {
        player,
        enemies,
        bullets,
        enemy_bullets,
        score,
        explosions,
        ..state.clone()
    };

    if was_alive && !next.player.alive {
        next.with_events([GameEvent::PlayerDefeated])
    } else {
        next
    }
}

/// Boss-mode pass.
///
/// Each player bullet touching the boss removes 10 HP (floored at zero)
/// and is consumed; the tick where HP reaches exactly zero emits
/// [`GameEvent::BossDefeated`]. Calling the pass in [`Mode::Boss`] without
/// a boss instance is a consistency violation reported via
/// [`GameEvent::InvalidState`] with the state otherwise unchanged.
pub fn resolve_boss_collisions(state: &GameState) -> GameState {
    let Some(boss) = state.boss else {
        if state.mode == Mode::Boss {
            return state.with_events([GameEvent::boss_mode_without_instance()]);
        }
        return state.clone();
    };

    if !boss.alive {
        return state.clone();
    }

    let mut hp = boss.hp;
    let mut defeated = false;
    let mut bullets: Vec<Bullet> = Vec::with_capacity(state.bullets.len());

    for b in &state.bullets {
        if bullet_hits_boss(b, &boss) {
            let next_hp = (hp - Boss::HIT_DAMAGE).max(0);
            if hp > 0 && next_hp == 0 {
                defeated = true;
            }
            hp = next_hp;
        } else {
            bullets.push(*b);
        }
    }

    let next = GameState {
        boss: Some(Boss {
            hp,
            alive: hp > 0,
            ..boss
        }),
        bullets,
        ..state.clone()
    };

    if defeated {
        next.with_events([GameEvent::BossDefeated])
    } else {
        next
    }
}

/// Count one tick off every explosion; spent explosions disappear.
pub fn advance_explosions(state: &GameState) -> GameState {
    let explosions: Vec<Explosion> = state
        .explosions
        .iter()
        .filter(|fx| fx.timer > 0)
        .map(|fx| Explosion {
            timer: fx.timer - 1,
            ..*fx
        })
        .collect();

    GameState {
        explosions,
        ..state.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::boss;

    fn empty_world() -> GameState {
        let mut state = GameState::new(1);
        state.meteors.clear();
        state
    }

    fn parked_enemy(x: i32, y: i32) -> Enemy {
        Enemy {
            x,
            y,
            speed_x: Enemy::PATROL_SPEED,
            dir: 1,
            alive: true,
            exploding: false,
            explosion_timer: 0,
            patrol_min_x: 0,
            patrol_max_x: crate::SCREEN_W - Enemy::WIDTH,
            cooldown: 0,
            spawn_protect: 0,
            entering: false,
            entry_y: Enemy::ENTRY_LINE_Y,
        }
    }

    // ---- meteor pass ----

    #[test]
    fn test_bullet_destroys_meteor_and_scores() {
        let mut state = empty_world();
        state.meteors.push(Meteor::new(100, 100, 0, 1));
        state.bullets.push(Bullet::new(100, 100));

        let next = resolve_meteor_collisions(&state);

        assert!(next.meteors.is_empty());
        assert!(next.bullets.is_empty());
        assert_eq!(next.score, 10);
        assert_eq!(next.explosions.len(), 1);
        assert_eq!(next.explosions[0].kind, ExplosionKind::Meteor);
        assert_eq!(next.explosions[0].x, 125);
        assert!(next.pending_events.is_empty());
    }

    #[test]
    fn test_missed_bullet_and_meteor_survive() {
        let mut state = empty_world();
        state.meteors.push(Meteor::new(100, 100, 0, 1));
        state.bullets.push(Bullet::new(600, 100));

        let next = resolve_meteor_collisions(&state);

        assert_eq!(next.meteors.len(), 1);
        assert_eq!(next.bullets.len(), 1);
        assert_eq!(next.score, 0);
    }

    #[test]
    fn test_meteor_damages_player_once() {
        let mut state = empty_world();
        let p = state.player;
        // Two meteors on the player; only the first contact deals damage
        state.meteors.push(Meteor::new(p.x, p.y, 0, 0));
        state.meteors.push(Meteor::new(p.x + 10, p.y, 0, 0));

        let next = resolve_meteor_collisions(&state);

        assert_eq!(next.player.hearts, PlayerState::MAX_HEARTS - 1);
        assert_eq!(next.player.invul_frames, PlayerState::INVULN_TICKS);
    }

    #[test]
    fn test_invulnerable_player_shrugs_off_meteor() {
        let mut state = empty_world();
        state.player.invul_frames = 50;
        let p = state.player;
        state.meteors.push(Meteor::new(p.x, p.y, 0, 0));

        let next = resolve_meteor_collisions(&state);

        assert_eq!(next.player.hearts, PlayerState::MAX_HEARTS);
        // Contact was made, so the immunity window did not tick down
        assert_eq!(next.player.invul_frames, 50);
    }

    #[test]
    fn test_quiet_tick_counts_down_invulnerability() {
        let mut state = empty_world();
        state.player.invul_frames = 50;

        let next = resolve_meteor_collisions(&state);
        assert_eq!(next.player.invul_frames, 49);
    }

    #[test]
    fn test_meteor_kill_emits_player_defeated() {
        let mut state = empty_world();
        state.player.hearts = 1;
        let p = state.player;
        state.meteors.push(Meteor::new(p.x, p.y, 0, 0));

        let next = resolve_meteor_collisions(&state);

        assert!(!next.player.alive);
        assert_eq!(next.pending_events, vec![GameEvent::PlayerDefeated]);
    }

    // ---- enemy pass ----

    #[test]
    fn test_bullet_kills_enemy() {
        let mut state = empty_world();
        state.mode = Mode::Enemies;
        state.enemies.push(parked_enemy(100, 100));
        state.bullets.push(Bullet::new(100, 100));

        let next = resolve_enemy_collisions(&state);

        assert_eq!(next.score, 50);
        assert!(next.bullets.is_empty());
        let e = next.enemies[0];
        assert!(!e.alive);
        assert!(e.exploding);
        assert!(e.explosion_timer > 0);
        assert_eq!(next.explosions.len(), 1);
        assert_eq!(next.explosions[0].kind, ExplosionKind::Enemy);
    }

    #[test]
    fn test_protected_enemy_is_unhittable() {
        let mut state = empty_world();
        state.mode = Mode::Enemies;
        let mut e = parked_enemy(100, 100);
        e.spawn_protect = 10;
        state.enemies.push(e);
        state.bullets.push(Bullet::new(100, 100));

        let next = resolve_enemy_collisions(&state);

        assert!(next.enemies[0].alive);
        assert_eq!(next.bullets.len(), 1, "bullet passes through");
        assert_eq!(next.score, 0);
    }

    #[test]
    fn test_one_bullet_kills_one_enemy() {
        let mut state = empty_world();
        state.mode = Mode::Enemies;
        // Two overlapping enemies; a single bullet kills only the first
        state.enemies.push(parked_enemy(100, 100));
        state.enemies.push(parked_enemy(110, 100));
        state.bullets.push(Bullet::new(110, 100));

        let next = resolve_enemy_collisions(&state);

        let killed = next.enemies.iter().filter(|e| !e.alive).count();
        assert_eq!(killed, 1);
        assert_eq!(next.score, 50);
        assert!(!next.enemies[0].alive, "first match in insertion order");
        assert!(next.enemies[1].alive);
    }

    #[test]
    fn test_enemy_bullet_hurts_player() {
        let mut state = empty_world();
        state.mode = Mode::Enemies;
        let p = state.player;
        state.enemy_bullets.push(EnemyBullet::new(p.x, p.y, 6));

        let next = resolve_enemy_collisions(&state);

        assert_eq!(next.player.hearts, PlayerState::MAX_HEARTS - 1);
        assert!(next.enemy_bullets.is_empty(), "bullet consumed");
    }

    #[test]
    fn test_enemy_bullet_consumed_even_when_no_damage_lands() {
        let mut state = empty_world();
        state.mode = Mode::Enemies;
        state.player.invul_frames = 100;
        let p = state.player;
        state.enemy_bullets.push(EnemyBullet::new(p.x, p.y, 6));

        let next = resolve_enemy_collisions(&state);

        assert_eq!(next.player.hearts, PlayerState::MAX_HEARTS);
        assert!(next.enemy_bullets.is_empty(), "wasted hit still consumes");
        assert_eq!(next.player.invul_frames, 100, "contact skips the tick-down");
    }

    #[test]
    fn test_exploding_enemy_counts_down_then_disappears() {
        let mut state = empty_world();
        state.mode = Mode::Enemies;
        let mut e = parked_enemy(100, 100);
        e.alive = false;
        e.exploding = true;
        e.explosion_timer = 2;
        state.enemies.push(e);

        let next = resolve_enemy_collisions(&state);
        assert_eq!(next.enemies.len(), 1);
        assert_eq!(next.enemies[0].explosion_timer, 1);

        let next = resolve_enemy_collisions(&next);
        assert_eq!(next.enemies[0].explosion_timer, 0);

        let next = resolve_enemy_collisions(&next);
        assert!(next.enemies.is_empty(), "spent explosion leaves the field");
    }

    #[test]
    fn test_enemy_bullet_kill_emits_player_defeated() {
        let mut state = empty_world();
        state.mode = Mode::Enemies;
        state.player.hearts = 1;
        let p = state.player;
        state.enemy_bullets.push(EnemyBullet::new(p.x, p.y, 6));

        let next = resolve_enemy_collisions(&state);

        assert!(!next.player.alive);
        assert_eq!(next.pending_events, vec![GameEvent::PlayerDefeated]);
    }

    // ---- boss pass ----

    #[test]
    fn test_bullet_chips_boss_hp() {
        let mut state = empty_world();
        state.mode = Mode::Boss;
        let mut b = boss::spawn();
        b.entering = false;
        b.y = 20;
        b.hp = 20;
        state.boss = Some(b);
        state.bullets.push(Bullet::new(b.x + 10, b.y + 10));

        let next = resolve_boss_collisions(&state);

        assert_eq!(next.boss.unwrap().hp, 10);
        assert!(next.boss.unwrap().alive);
        assert!(next.bullets.is_empty());
        assert!(next.pending_events.is_empty(), "no event above zero HP");
    }

    #[test]
    fn test_boss_death_emits_event_once() {
        let mut state = empty_world();
        state.mode = Mode::Boss;
        let mut b = boss::spawn();
        b.entering = false;
        b.y = 20;
        b.hp = 10;
        state.boss = Some(b);
        state.bullets.push(Bullet::new(b.x + 10, b.y + 10));

        let next = resolve_boss_collisions(&state);

        let after = next.boss.unwrap();
        assert_eq!(after.hp, 0);
        assert!(!after.alive);
        assert_eq!(next.pending_events, vec![GameEvent::BossDefeated]);

        // A dead boss absorbs nothing and emits nothing
        let mut again = next.clone();
        again.pending_events.clear();
        again.bullets.push(Bullet::new(b.x + 10, b.y + 10));
        let settled = resolve_boss_collisions(&again);
        assert!(settled.pending_events.is_empty());
        assert_eq!(settled.bullets.len(), 1);
    }

    #[test]
    fn test_two_bullets_twenty_damage() {
        let mut state = empty_world();
        state.mode = Mode::Boss;
        let mut b = boss::spawn();
        b.entering = false;
        b.y = 20;
        state.boss = Some(b);
        state.bullets.push(Bullet::new(b.x + 10, b.y + 10));
        state.bullets.push(Bullet::new(b.x + 50, b.y + 10));

        let next = resolve_boss_collisions(&state);
        assert_eq!(next.boss.unwrap().hp, Boss::MAX_HP - 20);
    }

    #[test]
    fn test_boss_mode_without_instance_is_reported() {
        let mut state = empty_world();
        state.mode = Mode::Boss;
        state.boss = None;
        state.bullets.push(Bullet::new(100, 100));

        let next = resolve_boss_collisions(&state);

        assert_eq!(
            next.pending_events,
            vec![GameEvent::boss_mode_without_instance()]
        );
        // Everything else is untouched
        assert_eq!(next.bullets, state.bullets);
        assert_eq!(next.score, state.score);
        assert_eq!(next.compute_hash(), state.compute_hash());
    }

    #[test]
    fn test_missing_boss_outside_boss_mode_is_fine() {
        let state = empty_world();
        let next = resolve_boss_collisions(&state);
        assert!(next.pending_events.is_empty());
    }

    // ---- explosions ----

    #[test]
    fn test_explosion_timer_counts_down_and_expires() {
        let mut state = empty_world();
        state
            .explosions
            .push(Explosion {
                timer: 2,
                ..Explosion::new(10, 10, ExplosionKind::Meteor)
            });

        let next = advance_explosions(&state);
        assert_eq!(next.explosions.len(), 1);
        assert_eq!(next.explosions[0].timer, 1);

        let next = advance_explosions(&next);
        assert_eq!(next.explosions[0].timer, 0);

        let next = advance_explosions(&next);
        assert!(next.explosions.is_empty());
    }
}
