//! Game State Definitions
//!
//! Every entity is an immutable value record: a "mutation" builds a new
//! record with struct-update syntax, and the world state owns all entities
//! by value in insertion-ordered `Vec`s. Nothing is shared or aliased.

use serde::{Deserialize, Serialize};

use crate::core::fixed::{Fixed, DIFFICULTY_START, FIXED_ONE};
use crate::core::hash::{compute_state_hash, StateHash, StateHasher};
use crate::game::events::GameEvent;
use crate::game::meteors;
use crate::{SCREEN_H, SCREEN_W};

// =============================================================================
// PLAYER
// =============================================================================

/// The player's ship.
///
/// Invariants: `alive == (hearts > 0)`, `invul_frames >= 0` (by type).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Left edge of the ship.
    pub x: i32,
    /// Top edge of the ship.
    pub y: i32,
    /// Remaining hearts (0..=7).
    pub hearts: u32,
    /// Redundant with `hearts > 0`, kept explicit for the shell.
    pub alive: bool,
    /// Ticks of damage immunity remaining.
    pub invul_frames: u32,
}

impl PlayerState {
    /// Sprite width in pixels.
    pub const WIDTH: i32 = 60;
    /// Sprite height in pixels.
    pub const HEIGHT: i32 = 60;
    /// Hearts at the start of a run.
    pub const MAX_HEARTS: u32 = 7;
    /// Horizontal speed per steered tick.
    pub const MOVE_SPEED: i32 = 5;
    /// Immunity window granted when damage lands (~5 s at 60 Hz).
    pub const INVULN_TICKS: u32 = 300;

    /// Spawn centered near the bottom of the screen.
    pub fn spawn() -> Self {
        Self {
            x: SCREEN_W / 2,
            y: SCREEN_H - 50,
            hearts: Self::MAX_HEARTS,
            alive: true,
            invul_frames: 0,
        }
    }

    /// Horizontal center of the ship.
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + Self::WIDTH / 2
    }
}

// =============================================================================
// PROJECTILES
// =============================================================================

/// A bullet fired by the player. Travels straight up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Vertical velocity (negative = upward).
    pub vy: i32,
    /// Cleared when the bullet has hit something or left the screen.
    pub active: bool,
}

impl Bullet {
    /// Sprite width in pixels.
    pub const WIDTH: i32 = 10;
    /// Sprite height in pixels.
    pub const HEIGHT: i32 = 25;
    /// Default upward velocity.
    pub const SPEED: i32 = -10;

    /// New bullet at the given position.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            vy: Self::SPEED,
            active: true,
        }
    }
}

/// A bullet fired by an enemy or the boss. May drift horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyBullet {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal velocity.
    pub vx: i32,
    /// Vertical velocity (positive = downward).
    pub vy: i32,
    /// Cleared when the bullet has hit something or left the screen.
    pub active: bool,
}

impl EnemyBullet {
    /// Sprite width in pixels.
    pub const WIDTH: i32 = 12;
    /// Sprite height in pixels.
    pub const HEIGHT: i32 = 25;
    /// Downward velocity before difficulty scaling.
    pub const BASE_SPEED: i32 = 6;

    /// New straight-down bullet.
    pub fn new(x: i32, y: i32, vy: i32) -> Self {
        Self {
            x,
            y,
            vx: 0,
            vy,
            active: true,
        }
    }
}

// =============================================================================
// METEOR
// =============================================================================

/// A falling meteor. Never destroyed by motion - recycled to a fresh
/// off-screen position when it exits any screen edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meteor {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal velocity.
    pub vx: i32,
    /// Vertical velocity.
    pub vy: i32,
    /// Collision-box width.
    pub width: i32,
    /// Collision-box height.
    pub height: i32,
}

impl Meteor {
    /// Default square size.
    pub const SIZE: i32 = 50;

    /// New default-sized meteor.
    pub fn new(x: i32, y: i32, vx: i32, vy: i32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            width: Self::SIZE,
            height: Self::SIZE,
        }
    }
}

// =============================================================================
// ENEMY
// =============================================================================

/// A wave enemy: enters from above, then patrols (or chases, if leader).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Patrol speed in pixels per tick.
    pub speed_x: i32,
    /// Current patrol direction (-1 or +1).
    pub dir: i32,
    /// False once killed (the record persists while exploding).
    pub alive: bool,
    /// Set on kill; the enemy stays in the collection for its explosion.
    pub exploding: bool,
    /// Ticks of explosion left before removal.
    pub explosion_timer: u32,
    /// Left patrol bound.
    pub patrol_min_x: i32,
    /// Right patrol bound.
    pub patrol_max_x: i32,
    /// Ticks until this enemy may fire again.
    pub cooldown: u32,
    /// Post-spawn window during which the enemy can neither fire nor be hit.
    pub spawn_protect: u32,
    /// True while descending to the entry line.
    pub entering: bool,
    /// The y coordinate where the entry descent stops.
    pub entry_y: i32,
}

impl Enemy {
    /// Sprite width in pixels.
    pub const WIDTH: i32 = 60;
    /// Sprite height in pixels.
    pub const HEIGHT: i32 = 60;
    /// Where entering enemies park.
    pub const ENTRY_LINE_Y: i32 = 90;
    /// Spawn-protection window in ticks.
    pub const SPAWN_PROTECT_TICKS: u32 = 24;
    /// Patrol speed.
    pub const PATROL_SPEED: i32 = 2;
    /// Descent speed while entering.
    pub const ENTRY_SPEED: i32 = 2;
    /// Explosion countdown started when the enemy is killed.
    pub const KILL_EXPLOSION_TICKS: u32 = 10;

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + Self::WIDTH / 2
    }

    /// Still flying and not mid-explosion.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive && !self.exploding
    }

    /// May take a hit this tick.
    #[inline]
    pub fn can_be_hit(&self) -> bool {
        self.is_active() && self.spawn_protect == 0
    }
}

// =============================================================================
// BOSS
// =============================================================================

/// Fire-pattern phase of the boss state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Waiting out the pause between bursts.
    Rest,
    /// Emitting paired shots on a cadence.
    Burst,
}

/// The boss: entrance choreography, player tracking, rest/burst firing.
///
/// Invariants: `alive == (hp > 0)`, hp monotonically non-increasing while
/// alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boss {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Remaining hit points.
    pub hp: i32,
    /// Redundant with `hp > 0`, kept explicit for the shell.
    pub alive: bool,
    /// True while descending to the entry line.
    pub entering: bool,
    /// The y coordinate where the entrance stops.
    pub entry_y: i32,
    /// Ticks until the next shot pair while bursting.
    pub cooldown: u32,
    /// Current fire-pattern phase.
    pub phase: BossPhase,
    /// Ticks left in the resting phase.
    pub phase_timer: u32,
    /// Shot pairs emitted in the current burst.
    pub burst_shots: u32,
    /// Base ticks between shot pairs (tunable; difficulty tightens it).
    pub cadence: u32,
    /// Base ticks of rest between bursts (tunable).
    pub pause: u32,
    /// Base shot pairs per burst (tunable).
    pub burst_pairs: u32,
}

impl Boss {
    /// Sprite width in pixels.
    pub const WIDTH: i32 = 160;
    /// Sprite height in pixels.
    pub const HEIGHT: i32 = 120;
    /// Hit points at spawn.
    pub const MAX_HP: i32 = 600;
    /// Descent speed while entering.
    pub const ENTRY_SPEED: i32 = 3;
    /// Horizontal tracking speed in combat.
    pub const TRACK_SPEED: i32 = 3;
    /// Rest timer granted when the entrance finishes.
    pub const ENTRY_REST_TICKS: u32 = 30;
    /// Hit points removed per player bullet.
    pub const HIT_DAMAGE: i32 = 10;

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + Self::WIDTH / 2
    }
}

// =============================================================================
// EXPLOSION FX
// =============================================================================

/// What blew up (drives the shell's sprite/sound choice).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    /// A meteor was destroyed.
    Meteor,
    /// An enemy was destroyed.
    Enemy,
}

/// A transient explosion effect counting down to removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    /// Center x of the blast.
    pub x: i32,
    /// Center y of the blast.
    pub y: i32,
    /// What blew up.
    pub kind: ExplosionKind,
    /// Ticks left on screen.
    pub timer: u32,
}

impl Explosion {
    /// Lifetime of a fresh explosion.
    pub const LIFETIME: u32 = 18;

    /// New explosion centered at `(x, y)`.
    pub fn new(x: i32, y: i32, kind: ExplosionKind) -> Self {
        Self {
            x,
            y,
            kind,
            timer: Self::LIFETIME,
        }
    }
}

// =============================================================================
// DIFFICULTY DIRECTOR
// =============================================================================

/// The difficulty / wave-pacing controller threaded through every
/// subsystem. Not a learning system - a deterministic tunable-parameter
/// record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    /// Difficulty dial, Q16.16, 0..=10.
    pub difficulty: Fixed,
    /// Derived pacing value `1 + difficulty / 3` (Q16.16).
    pub reaction_speed: Fixed,
    /// Player x recorded by the predictor last tick.
    pub last_player_x: i32,
    /// Wave counter across the run.
    pub wave: u32,
    /// Size of the next wave to spawn.
    pub next_wave_size: u32,
    /// Ticks to wait before the next wave may spawn.
    pub wave_cooldown: u32,
    /// Score at which the run moves from enemy waves to mixed mode.
    pub mix_threshold: u32,
    /// Mixed-mode waves spawned since the last reset.
    pub mixed_waves_spawned: u32,
    /// Mixed-mode waves required before the boss shows up.
    pub mixed_rounds_target: u32,
    /// Whether the meteor population tops itself back up.
    pub respawn_meteors: bool,
    /// Ticks of quiet before the boss enters.
    pub preboss_pause: u32,
    /// Extra vertical speed given to freshly rolled meteors.
    pub meteor_bonus: i32,
    /// Boss cycles completed.
    pub cycles: u32,
}

impl Director {
    /// Default score threshold for mixed mode.
    pub const MIX_THRESHOLD: u32 = 3000;
    /// Default mixed rounds before the boss.
    pub const MIXED_ROUNDS_TARGET: u32 = 4;
    /// First wave size.
    pub const FIRST_WAVE_SIZE: u32 = 3;
    /// Meteor speed bonus ceiling.
    pub const METEOR_BONUS_MAX: i32 = 5;

    /// Baseline controller for a fresh run.
    pub fn new() -> Self {
        Self {
            difficulty: DIFFICULTY_START,
            reaction_speed: FIXED_ONE,
            last_player_x: SCREEN_W / 2,
            wave: 0,
            next_wave_size: Self::FIRST_WAVE_SIZE,
            wave_cooldown: 0,
            mix_threshold: Self::MIX_THRESHOLD,
            mixed_waves_spawned: 0,
            mixed_rounds_target: Self::MIXED_ROUNDS_TARGET,
            respawn_meteors: true,
            preboss_pause: 0,
            meteor_bonus: 0,
            cycles: 0,
        }
    }

    /// Pacing value derived from a difficulty dial: `1 + difficulty / 3`.
    #[inline]
    pub fn reaction_for(difficulty: Fixed) -> Fixed {
        FIXED_ONE + difficulty / 3
    }
}

impl Default for Director {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// MODE
// =============================================================================

/// Which update/collision passes run this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Opening phase: meteors only.
    Meteors,
    /// Enemy waves, no meteors.
    Enemies,
    /// Enemy waves with meteors, the run-up to the boss.
    Mixed,
    /// Boss fight.
    Boss,
}

impl Mode {
    /// Stable tag for hashing and logs.
    #[inline]
    pub fn tag(self) -> u8 {
        match self {
            Mode::Meteors => 0,
            Mode::Enemies => 1,
            Mode::Mixed => 2,
            Mode::Boss => 3,
        }
    }
}

// =============================================================================
// WORLD STATE
// =============================================================================

/// The single source of truth: one value owns the whole world.
///
/// Every subsystem takes a state (or sub-state) and returns a new one;
/// the boss is present only in [`Mode::Boss`] once the orchestrator has
/// settled, and the collision layer verifies that instead of assuming it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// The player's ship.
    pub player: PlayerState,
    /// Falling meteors (insertion order).
    pub meteors: Vec<Meteor>,
    /// Player bullets in flight.
    pub bullets: Vec<Bullet>,
    /// Wave enemies, including ones mid-explosion.
    pub enemies: Vec<Enemy>,
    /// Enemy and boss bullets in flight.
    pub enemy_bullets: Vec<EnemyBullet>,
    /// Accumulated score.
    pub score: u32,
    /// Current RNG seed; threaded, never reused stale.
    pub seed: u32,
    /// Active mode.
    pub mode: Mode,
    /// Difficulty / wave-pacing controller.
    pub director: Director,
    /// The boss, present during [`Mode::Boss`] only.
    pub boss: Option<Boss>,
    /// Active explosion effects.
    pub explosions: Vec<Explosion>,
    /// Events emitted this tick (drained by the tick orchestrator).
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Meteor population the opening phase maintains.
    pub const METEOR_POPULATION: usize = 8;

    /// Build the initial world: centered player, eight freshly rolled
    /// meteors, baseline director, meteors mode.
    pub fn new(seed: u32) -> Self {
        let mut meteors = Vec::with_capacity(Self::METEOR_POPULATION);
        let mut s = seed;
        for _ in 0..Self::METEOR_POPULATION {
            let (meteor, next) = meteors::roll_meteor(s, 0);
            meteors.push(meteor);
            s = next;
        }

        Self {
            player: PlayerState::spawn(),
            meteors,
            bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            score: 0,
            seed: s,
            mode: Mode::Meteors,
            director: Director::new(),
            boss: None,
            explosions: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Queue an event for the shell.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Take the pending events, leaving the queue empty.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Copy of this state with extra events appended.
    pub fn with_events(&self, events: impl IntoIterator<Item = GameEvent>) -> Self {
        let mut next = self.clone();
        next.pending_events.extend(events);
        next
    }

    /// Hash every gameplay-relevant field for replay verification.
    ///
    /// The pending-event queue is transient and excluded.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.seed, |h| {
            h.update_u32(self.score);
            h.update_u8(self.mode.tag());

            hash_player(h, &self.player);
            hash_director(h, &self.director);

            h.update_u32(self.meteors.len() as u32);
            for m in &self.meteors {
                h.update_i32(m.x);
                h.update_i32(m.y);
                h.update_i32(m.vx);
                h.update_i32(m.vy);
            }

            h.update_u32(self.bullets.len() as u32);
            for b in &self.bullets {
                h.update_i32(b.x);
                h.update_i32(b.y);
                h.update_i32(b.vy);
            }

            h.update_u32(self.enemies.len() as u32);
            for e in &self.enemies {
                h.update_i32(e.x);
                h.update_i32(e.y);
                h.update_i32(e.dir);
                h.update_bool(e.alive);
                h.update_bool(e.exploding);
                h.update_u32(e.explosion_timer);
                h.update_u32(e.cooldown);
                h.update_u32(e.spawn_protect);
                h.update_bool(e.entering);
            }

            h.update_u32(self.enemy_bullets.len() as u32);
            for b in &self.enemy_bullets {
                h.update_i32(b.x);
                h.update_i32(b.y);
                h.update_i32(b.vx);
                h.update_i32(b.vy);
            }

            h.update_bool(self.boss.is_some());
            if let Some(boss) = &self.boss {
                h.update_i32(boss.x);
                h.update_i32(boss.y);
                h.update_i32(boss.hp);
                h.update_bool(boss.alive);
                h.update_bool(boss.entering);
                h.update_u32(boss.cooldown);
                h.update_u8(matches!(boss.phase, BossPhase::Burst) as u8);
                h.update_u32(boss.phase_timer);
                h.update_u32(boss.burst_shots);
            }

            h.update_u32(self.explosions.len() as u32);
            for fx in &self.explosions {
                h.update_i32(fx.x);
                h.update_i32(fx.y);
                h.update_u8(matches!(fx.kind, ExplosionKind::Enemy) as u8);
                h.update_u32(fx.timer);
            }
        })
    }
}

fn hash_player(h: &mut StateHasher, p: &PlayerState) {
    h.update_i32(p.x);
    h.update_i32(p.y);
    h.update_u32(p.hearts);
    h.update_bool(p.alive);
    h.update_u32(p.invul_frames);
}

fn hash_director(h: &mut StateHasher, d: &Director) {
    h.update_i32(d.difficulty);
    h.update_i32(d.reaction_speed);
    h.update_i32(d.last_player_x);
    h.update_u32(d.wave);
    h.update_u32(d.next_wave_size);
    h.update_u32(d.wave_cooldown);
    h.update_u32(d.mixed_waves_spawned);
    h.update_bool(d.respawn_meteors);
    h.update_u32(d.preboss_pause);
    h.update_i32(d.meteor_bonus);
    h.update_u32(d.cycles);
}

// =============================================================================
// TESTS
// =============================================================================
