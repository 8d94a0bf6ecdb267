//! Enemy Subsystem
//!
//! Wave layout, the entering/leader/patrol movement rules, pairwise
//! separation, and fire control. All pure transforms over the enemy
//! collection; the seed is threaded wherever a draw happens.

use crate::core::fixed::{scaled_floor, to_fixed};
use crate::core::geom::clamp_i32;
use crate::core::rng::rand_range;
use crate::game::state::{Director, Enemy, EnemyBullet, PlayerState};
use crate::{SCREEN_H, SCREEN_W};

/// Minimum center-to-center x distance before two enemies push apart.
const SEPARATION_MIN_X: i32 = Enemy::WIDTH * 4 / 5;
/// Push applied per crowded neighbour per tick.
const SEPARATION_PUSH: i32 = 1;

/// Horizontal slack outside the screen before an enemy bullet is culled.
const EBULLET_MARGIN_X: i32 = 40;
/// Vertical slack below the screen before an enemy bullet is culled.
const EBULLET_MARGIN_Y: i32 = 60;

/// Lay out a wave of `count` enemies evenly across the screen.
///
/// Each enemy starts above the screen, entering toward the entry line,
/// with a randomized patrol width and initial direction.
pub fn spawn_wave(count: u32, seed: u32) -> (Vec<Enemy>, u32) {
    let slot = SCREEN_W / (count as i32 + 1);
    let mut enemies = Vec::with_capacity(count as usize);
    let mut s = seed;

    for i in 0..count as i32 {
        let x = slot * (i + 1) - Enemy::WIDTH / 2;

        let (s1, patrol_width) = rand_range(s, 100, 140);
        let (s2, dir_roll) = rand_range(s1, 0, 1);
        s = s2;

        let patrol_min_x = clamp_i32(x - patrol_width / 2, 0, SCREEN_W - Enemy::WIDTH);
        let patrol_max_x = clamp_i32(x + patrol_width / 2, 0, SCREEN_W - Enemy::WIDTH);

        enemies.push(Enemy {
            x,
            y: -Enemy::HEIGHT,
            speed_x: Enemy::PATROL_SPEED,
            dir: if dir_roll == 0 { 1 } else { -1 },
            alive: true,
            exploding: false,
            explosion_timer: 0,
            patrol_min_x,
            patrol_max_x,
            cooldown: 0,
            spawn_protect: Enemy::SPAWN_PROTECT_TICKS,
            entering: true,
            entry_y: Enemy::ENTRY_LINE_Y,
        });
    }

    (enemies, s)
}

/// Index of the leader: the active enemy horizontally nearest the player.
///
/// Ties keep the earliest enemy in the collection.
fn leader_index(enemies: &[Enemy], player: &PlayerState) -> Option<usize> {
    let target = player.center_x();
    let mut best: Option<(usize, i32)> = None;

    for (i, e) in enemies.iter().enumerate() {
        if !e.is_active() {
            continue;
        }
        let dist = (e.center_x() - target).abs();
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }

    best.map(|(i, _)| i)
}

/// Run one tick of enemy movement.
///
/// Three stages: entering enemies descend with a small lateral drift, the
/// leader chases the player's x, everyone else patrols between its bounds;
/// then crowded pairs push apart; finally spawn protection ticks down.
pub fn update_ai(enemies: &[Enemy], player: &PlayerState, _director: &Director) -> Vec<Enemy> {
    if enemies.is_empty() {
        return Vec::new();
    }

    let leader = leader_index(enemies, player);

    // 1) base movement: entering / leader / patrol
    let mut moved: Vec<Enemy> = Vec::with_capacity(enemies.len());
    for (i, e) in enemies.iter().enumerate() {
        if !e.alive {
            moved.push(*e);
            continue;
        }

        if e.entering {
            let ny = e.y + Enemy::ENTRY_SPEED;
            let arrived = ny >= e.entry_y;
            let drift = if e.dir > 0 { 1 } else { -1 };
            let nx = clamp_i32(e.x + drift, 0, SCREEN_W - Enemy::WIDTH);
            moved.push(Enemy {
                x: nx,
                y: if arrived { e.entry_y } else { ny },
                entering: !arrived,
                ..*e
            });
            continue;
        }

        if Some(i) == leader {
            let target = clamp_i32(player.x, 0, SCREEN_W - Enemy::WIDTH);
            let dx = match target.cmp(&e.x) {
                std::cmp::Ordering::Greater => Enemy::PATROL_SPEED,
                std::cmp::Ordering::Less => -Enemy::PATROL_SPEED,
                std::cmp::Ordering::Equal => 0,
            };
            let nx = clamp_i32(e.x + dx, 0, SCREEN_W - Enemy::WIDTH);
            moved.push(Enemy { x: nx, ..*e });
        } else {
            let mut nx = e.x + e.speed_x * e.dir;
            let mut nd = e.dir;
            if nx <= e.patrol_min_x {
                nx = e.patrol_min_x;
                nd = 1;
            } else if nx >= e.patrol_max_x {
                nx = e.patrol_max_x;
                nd = -1;
            }
            moved.push(Enemy { x: nx, dir: nd, ..*e });
        }
    }

    // 2) pairwise separation so the formation does not bunch up
    let mut spread = moved.clone();
    for i in 0..moved.len() {
        let e = moved[i];
        if !(e.is_active() && !e.entering) {
            continue;
        }

        let mut push = 0;
        for (j, other) in moved.iter().enumerate() {
            if i == j || !other.is_active() {
                continue;
            }
            if (e.x - other.x).abs() < SEPARATION_MIN_X && (e.y - other.y).abs() < Enemy::HEIGHT {
                push += if e.x <= other.x { SEPARATION_PUSH } else { -SEPARATION_PUSH };
            }
        }

        if push != 0 {
            let mut nx = clamp_i32(e.x - push, 0, SCREEN_W - Enemy::WIDTH);
            // Do not pin an enemy against an edge it was already touching
            if (nx == 0 && push > 0) || (nx == SCREEN_W - Enemy::WIDTH && push < 0) {
                nx = e.x;
            }
            spread[i] = Enemy { x: nx, ..spread[i] };
        }
    }

    // 3) spawn protection ticks down for everyone
    spread
        .into_iter()
        .map(|e| Enemy {
            spawn_protect: e.spawn_protect.saturating_sub(1),
            ..e
        })
        .collect()
}

/// Run one tick of enemy fire control.
///
/// Cooldowns tick down for every active enemy. An unprotected, fully
/// entered enemy with an expired cooldown fires iff the predicted player x
/// falls inside its aim window; the window and the redrawn cooldown tighten
/// with difficulty.
pub fn enemy_fire(
    enemies: &[Enemy],
    seed: u32,
    director: &Director,
    predicted_x: i32,
) -> (Vec<Enemy>, Vec<EnemyBullet>, u32) {
    let mut updated = Vec::with_capacity(enemies.len());
    let mut shots = Vec::new();
    let mut s = seed;

    let dial = director.difficulty;
    let window = (140 - scaled_floor(dial, to_fixed(8.0))).max(40);

    for e in enemies {
        if !e.is_active() {
            updated.push(*e);
            continue;
        }

        let mut cooldown = e.cooldown.saturating_sub(1);
        let aligned = (predicted_x - e.center_x()).abs() < window;

        if cooldown == 0 && aligned && !e.entering && e.spawn_protect == 0 {
            let lo = (26 - scaled_floor(dial, to_fixed(3.0))).max(12);
            let hi = (36 - scaled_floor(dial, to_fixed(2.0))).max(lo + 2);
            let (advanced, drawn) = rand_range(s, lo, hi);
            s = advanced;
            cooldown = drawn as u32;

            let bx = e.center_x() - EnemyBullet::WIDTH / 2;
            let by = e.y + Enemy::HEIGHT - 8;
            let vy = EnemyBullet::BASE_SPEED + scaled_floor(dial, to_fixed(0.5));
            shots.push(EnemyBullet::new(bx, by, vy));
        }

        updated.push(Enemy { cooldown, ..*e });
    }

    (updated, shots, s)
}

/// Cull enemy bullets that left the play field, then advance the rest.
pub fn advance_enemy_bullets(bullets: &[EnemyBullet]) -> Vec<EnemyBullet> {
    bullets
        .iter()
        .filter(|b| {
            b.y < SCREEN_H + EBULLET_MARGIN_Y
                && b.x >= -EBULLET_MARGIN_X
                && b.x <= SCREEN_W + EBULLET_MARGIN_X
        })
        .map(|b| EnemyBullet {
            x: b.x + b.vx,
            y: b.y + b.vy,
            ..*b
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::from_int;

    fn parked_enemy(x: i32) -> Enemy {
        Enemy {
            x,
            y: Enemy::ENTRY_LINE_Y,
            speed_x: Enemy::PATROL_SPEED,
            dir: 1,
            alive: true,
            exploding: false,
            explosion_timer: 0,
            patrol_min_x: 0,
            patrol_max_x: SCREEN_W - Enemy::WIDTH,
            cooldown: 0,
            spawn_protect: 0,
            entering: false,
            entry_y: Enemy::ENTRY_LINE_Y,
        }
    }

    fn base_director() -> Director {
        Director::new()
    }

    #[test]
    fn test_spawn_wave_layout() {
        let (enemies, seed) = spawn_wave(3, 7);

        assert_eq!(enemies.len(), 3);
        assert_ne!(seed, 7);

        let slot = SCREEN_W / 4;
        for (i, e) in enemies.iter().enumerate() {
            assert_eq!(e.x, slot * (i as i32 + 1) - Enemy::WIDTH / 2);
            assert_eq!(e.y, -Enemy::HEIGHT);
            assert!(e.entering);
            assert!(e.alive && !e.exploding);
            assert_eq!(e.spawn_protect, Enemy::SPAWN_PROTECT_TICKS);
            assert_eq!(e.entry_y, Enemy::ENTRY_LINE_Y);
            assert!(e.patrol_min_x >= 0);
            assert!(e.patrol_max_x <= SCREEN_W - Enemy::WIDTH);
            assert!(e.patrol_min_x <= e.patrol_max_x);
            assert!(e.dir == 1 || e.dir == -1);
        }
    }

    #[test]
    fn test_spawn_wave_deterministic() {
        let (a, sa) = spawn_wave(5, 99);
        let (b, sb) = spawn_wave(5, 99);
        assert_eq!(a, b);
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_entering_enemy_descends_and_parks() {
        let (mut enemies, _) = spawn_wave(1, 1);
        let player = PlayerState::spawn();
        let director = base_director();

        // Descend all the way to the entry line
        let mut guard = 0;
        while enemies[0].entering {
            enemies = update_ai(&enemies, &player, &director);
            guard += 1;
            assert!(guard < 200, "entry must terminate");
        }
        assert_eq!(enemies[0].y, Enemy::ENTRY_LINE_Y);
    }

    #[test]
    fn test_leader_chases_player() {
        // Two enemies; the nearer one becomes leader and closes in
        let near = parked_enemy(300);
        let far = parked_enemy(700);
        let player = PlayerState {
            x: 200,
            ..PlayerState::spawn()
        };
        let next = update_ai(&[near, far], &player, &base_director());

        assert_eq!(next[0].x, 298, "leader steps toward the player");
    }

    #[test]
    fn test_patrol_bounces_at_bounds() {
        let mut e = parked_enemy(100);
        e.patrol_min_x = 90;
        e.patrol_max_x = 110;
        e.dir = 1;
        // A decoy leader close to the player keeps `e` patrolling
        let decoy = parked_enemy(SCREEN_W / 2 - Enemy::WIDTH / 2);
        let player = PlayerState::spawn();
        let director = base_director();

        let mut enemies = vec![decoy, e];
        let mut seen_left = false;
        let mut seen_right = false;
        for _ in 0..100 {
            enemies = update_ai(&enemies, &player, &director);
            let p = enemies[1];
            assert!(p.x >= p.patrol_min_x && p.x <= p.patrol_max_x);
            if p.x == p.patrol_min_x {
                seen_left = true;
            }
            if p.x == p.patrol_max_x {
                seen_right = true;
            }
        }
        assert!(seen_left && seen_right, "patrol reaches both bounds");
    }

    #[test]
    fn test_separation_pushes_crowded_pair_apart() {
        let a = parked_enemy(300);
        let b = parked_enemy(310);
        // Player far left so `a` is leader; both crowded
        let player = PlayerState {
            x: 0,
            ..PlayerState::spawn()
        };
        let next = update_ai(&[a, b], &player, &base_director());

        let gap_before = (a.x - b.x).abs();
        let gap_after = (next[0].x - next[1].x).abs();
        assert!(gap_after > gap_before, "crowded enemies drift apart");
    }

    #[test]
    fn test_spawn_protect_ticks_down() {
        let (enemies, _) = spawn_wave(2, 3);
        let next = update_ai(&enemies, &PlayerState::spawn(), &base_director());
        for e in &next {
            assert_eq!(e.spawn_protect, Enemy::SPAWN_PROTECT_TICKS - 1);
        }
    }

    #[test]
    fn test_dead_enemy_is_left_alone() {
        let mut e = parked_enemy(300);
        e.alive = false;
        e.exploding = true;
        e.explosion_timer = 5;
        let next = update_ai(&[e], &PlayerState::spawn(), &base_director());
        assert_eq!(next[0].x, e.x);
        assert_eq!(next[0].explosion_timer, 5);
    }

    #[test]
    fn test_aligned_enemy_fires() {
        let e = parked_enemy(400);
        let director = base_director();
        let (updated, shots, seed) = enemy_fire(&[e], 42, &director, e.center_x());

        assert_eq!(shots.len(), 1);
        let shot = shots[0];
        assert_eq!(shot.x, e.center_x() - EnemyBullet::WIDTH / 2);
        assert_eq!(shot.y, e.y + Enemy::HEIGHT - 8);
        assert_eq!(shot.vy, EnemyBullet::BASE_SPEED); // int(1.0 * 0.5) == 0
        assert!(updated[0].cooldown >= 12, "cooldown redrawn after firing");
        assert_ne!(seed, 42, "the draw consumed the seed");
    }

    #[test]
    fn test_misaligned_enemy_holds_fire() {
        let e = parked_enemy(100);
        let director = base_director();
        // Window at difficulty 1.0 is 132; aim far outside it
        let (updated, shots, seed) = enemy_fire(&[e], 42, &director, 700);

        assert!(shots.is_empty());
        assert_eq!(seed, 42, "no draw, seed untouched");
        assert_eq!(updated[0].cooldown, 0);
    }

    #[test]
    fn test_protected_and_entering_enemies_hold_fire() {
        let mut protected = parked_enemy(400);
        protected.spawn_protect = 5;
        let mut entering = parked_enemy(400);
        entering.entering = true;

        let director = base_director();
        let (_, shots, _) = enemy_fire(&[protected, entering], 1, &director, 430);
        assert!(shots.is_empty());
    }

    #[test]
    fn test_cooldown_always_ticks_down() {
        let mut e = parked_enemy(400);
        e.cooldown = 10;
        let (updated, shots, _) = enemy_fire(&[e], 1, &base_director(), e.center_x());
        assert!(shots.is_empty());
        assert_eq!(updated[0].cooldown, 9);
    }

    #[test]
    fn test_difficulty_tightens_window_and_speeds_bullets() {
        let e = parked_enemy(400);
        let mut director = base_director();
        director.difficulty = from_int(8);

        // Window: max(40, 140 - 64) = 76; aim 80 away -> no shot
        let (_, shots, _) = enemy_fire(&[e], 1, &director, e.center_x() + 80);
        assert!(shots.is_empty());

        // Dead-on aim -> faster bullet: 6 + int(8 * 0.5) = 10
        let (_, shots, _) = enemy_fire(&[e], 1, &director, e.center_x());
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].vy, 10);
    }

    #[test]
    fn test_advance_enemy_bullets_moves_and_culls() {
        let live = EnemyBullet::new(100, 100, 6);
        let below = EnemyBullet::new(100, SCREEN_H + EBULLET_MARGIN_Y, 6);
        let wide = EnemyBullet::new(SCREEN_W + EBULLET_MARGIN_X + 1, 100, 6);

        let next = advance_enemy_bullets(&[live, below, wide]);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].y, 106);
    }

    #[test]
    fn test_diagonal_enemy_bullet_translates_both_axes() {
        let mut b = EnemyBullet::new(100, 100, 6);
        b.vx = -2;
        let next = advance_enemy_bullets(&[b]);
        assert_eq!((next[0].x, next[0].y), (98, 106));
    }
}
