/// Pure simulation functions.
///
/// Every public function takes immutable views of the current state (and,
/// where needed, an RNG handle) and returns brand-new data. Side effects
/// are limited to the injected RNG and log lines, so tests drive the whole
/// simulation deterministically with a seeded RNG.

use log::info;
use rand::Rng;

use crate::entities::{
    Alien, Asteroid, Bullet, EnemyBullet, GameStatus, Intents, Layout, Player, SessionState,
};
use crate::records::BestRecord;

// ── Tuning constants ──────────────────────────────────────────────────────────

/// Surfaces narrower than this get the compact layout.
pub const COMPACT_BREAKPOINT: f64 = 768.0;
/// Height of the HUD band; the play field starts below it.
pub const HUD_H: f64 = 70.0;
/// Gap between the player and the bottom edge.
const PLAYER_MARGIN: f64 = 30.0;
/// Extra bottom clearance on compact layouts (room for a touch panel).
const COMPACT_BOTTOM_OFFSET: f64 = 100.0;

pub const STARTING_LIVES: u32 = 5;
pub const ASTEROID_HP: i32 = 4;
pub const ALIEN_HP: i32 = 20;
/// Damage one player bullet deals per hit.
pub const BULLET_DAMAGE: i32 = 1;
/// Frames between player shots while fire is held.
pub const SHOOT_COOLDOWN: u32 = 6;
/// Frames between alien shots.
pub const ALIEN_SHOT_INTERVAL: u32 = 60;

const BULLET_SPEED: f64 = 10.0;
const ENEMY_BULLET_SPEED: f64 = 5.0;
const ENEMY_BULLET_W: f64 = 6.0;
const ENEMY_BULLET_H: f64 = 16.0;

/// Per-tick asteroid spawn chance is SPAWN_BASE + level * SPAWN_PER_LEVEL.
const SPAWN_BASE: f64 = 0.02;
const SPAWN_PER_LEVEL: f64 = 0.003;
/// Fraction of would-be spawns kept on compact layouts.
const COMPACT_SPAWN_KEEP: f64 = 0.6;

const ASTEROID_SPEED_PER_LEVEL: f64 = 0.3;
const ALIEN_SPEED_PER_LEVEL: f64 = 0.1;

/// Tokens needed to clear level N: N * LEVEL_STEP.
pub const LEVEL_STEP: u32 = 10;
pub const TOKENS_PER_ASTEROID: u32 = 1;
pub const TOKENS_PER_ALIEN: u32 = 2;

// ── Layout ────────────────────────────────────────────────────────────────────

/// Derive entity sizes and base speeds from the current surface width.
pub fn layout(width: f64) -> Layout {
    let compact = width < COMPACT_BREAKPOINT;
    let scale = if compact { 0.6 } else { 0.85 };
    Layout {
        compact,
        ship: 64.0 * scale,
        asteroid: 72.0 * scale,
        alien_w: 140.0 * scale,
        alien_h: 90.0 * scale,
        bullet_w: 6.0 * scale,
        bullet_h: 16.0 * scale,
        player_speed: (if compact { 6.0 } else { 8.0 }) * scale,
        asteroid_base_speed: if compact { 1.5 } else { 2.6 },
        alien_base_speed: if compact { 1.0 } else { 1.8 },
        bottom_offset: if compact { COMPACT_BOTTOM_OFFSET } else { 0.0 },
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build the initial session state for a surface of the given pixel size.
/// The first alien is already on the field.
pub fn init_state(width: f64, height: f64, best: BestRecord) -> SessionState {
    let lo = layout(width);
    SessionState {
        player: Player {
            x: width / 2.0 - lo.ship / 2.0,
            y: height - lo.ship - PLAYER_MARGIN - lo.bottom_offset,
            w: lo.ship,
            h: lo.ship,
            speed: lo.player_speed,
        },
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        asteroids: Vec::new(),
        alien: Some(spawn_alien(1, width, &lo)),
        lives: STARTING_LIVES,
        tokens: 0,
        level: 1,
        shoot_cd: 0,
        status: GameStatus::Playing,
        best,
        new_record: false,
        shot_fired: false,
        frame: 0,
        width,
        height,
    }
}

// ── Spawners ──────────────────────────────────────────────────────────────────

/// One alien, centered below the HUD. Replaces any alien already alive.
pub fn spawn_alien(level: u32, width: f64, lo: &Layout) -> Alien {
    Alien {
        x: width / 2.0 - lo.alien_w / 2.0,
        y: HUD_H + 15.0,
        w: lo.alien_w,
        h: lo.alien_h,
        hp: ALIEN_HP,
        dir: 1.0,
        speed: lo.alien_base_speed + level as f64 * ALIEN_SPEED_PER_LEVEL,
        cd: ALIEN_SHOT_INTERVAL,
    }
}

/// Roll the per-tick spawn chance; on success place an asteroid at a random
/// x along the HUD boundary. Compact layouts skip part of the successes to
/// keep the density playable on a small surface.
pub fn try_spawn_asteroid(
    level: u32,
    width: f64,
    lo: &Layout,
    rng: &mut impl Rng,
) -> Option<Asteroid> {
    let chance = SPAWN_BASE + level as f64 * SPAWN_PER_LEVEL;
    if rng.gen::<f64>() >= chance {
        return None;
    }
    if lo.compact && rng.gen::<f64>() > COMPACT_SPAWN_KEEP {
        return None;
    }
    let max_x = (width - lo.asteroid).max(0.0);
    Some(Asteroid {
        x: rng.gen_range(0.0..=max_x),
        y: HUD_H,
        w: lo.asteroid,
        h: lo.asteroid,
        hp: ASTEROID_HP,
        speed: lo.asteroid_base_speed + level as f64 * ASTEROID_SPEED_PER_LEVEL,
    })
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the simulation by one frame. All randomness comes through `rng`
/// so callers control determinism (seeded RNG in tests).
///
/// Once the session is over the state comes back untouched, so stray extra
/// ticks are harmless.
pub fn tick(state: &SessionState, intents: &Intents, rng: &mut impl Rng) -> SessionState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    let frame = state.frame + 1;
    let lo = layout(state.width);

    // ── 1. Shot cooldown ─────────────────────────────────────────────────────
    let mut shoot_cd = state.shoot_cd.saturating_sub(1);

    // ── 2. Player movement, geometry refreshed from the current surface ──────
    let mut player = state.player.clone();
    player.w = lo.ship;
    player.h = lo.ship;
    player.speed = lo.player_speed;
    player.y = state.height - lo.ship - PLAYER_MARGIN - lo.bottom_offset;
    if intents.left {
        player.x -= player.speed;
    }
    if intents.right {
        player.x += player.speed;
    }
    player.x = player.x.clamp(0.0, (state.width - player.w).max(0.0));

    // ── 3. Player fire ────────────────────────────────────────────────────────
    let mut bullets = state.bullets.clone();
    let mut shot_fired = false;
    if intents.fire && shoot_cd == 0 {
        bullets.push(Bullet {
            x: player.x + player.w / 2.0 - lo.bullet_w / 2.0,
            y: player.y,
            w: lo.bullet_w,
            h: lo.bullet_h,
            speed: BULLET_SPEED,
        });
        shoot_cd = SHOOT_COOLDOWN;
        shot_fired = true;
    }

    // ── 4. Asteroid spawn ─────────────────────────────────────────────────────
    let mut asteroids = state.asteroids.clone();
    if let Some(a) = try_spawn_asteroid(state.level, state.width, &lo, rng) {
        asteroids.push(a);
    }

    // ── 5. Advance projectiles and asteroids, cull off-screen ─────────────────
    for b in &mut bullets {
        b.y -= b.speed;
    }
    bullets.retain(|b| b.y + b.h > 0.0);

    for a in &mut asteroids {
        a.y += a.speed;
    }
    asteroids.retain(|a| a.y < state.height);

    let mut enemy_bullets = state.enemy_bullets.clone();
    for b in &mut enemy_bullets {
        b.y += b.speed;
    }
    enemy_bullets.retain(|b| b.y < state.height);

    // ── 6. Alien patrol and return fire ───────────────────────────────────────
    let mut alien = state.alien.clone();
    if let Some(al) = alien.as_mut() {
        al.x += al.speed * al.dir;
        if al.x <= 0.0 || al.x + al.w >= state.width {
            al.dir = -al.dir;
        }
        al.cd = al.cd.saturating_sub(1);
        if al.cd == 0 {
            enemy_bullets.push(EnemyBullet {
                x: al.x + al.w / 2.0,
                y: al.y + al.h,
                w: ENEMY_BULLET_W,
                h: ENEMY_BULLET_H,
                speed: ENEMY_BULLET_SPEED,
            });
            al.cd = ALIEN_SHOT_INTERVAL;
        }
    }

    // ── 7. Player bullets vs asteroids and alien ──────────────────────────────
    // A bullet is consumed by its first hit and never damages a second
    // target in the same tick. Targets already at zero hp are skipped so a
    // later bullet can pass through to whatever is behind them.
    let mut tokens = state.tokens;
    let mut used_bullets: Vec<usize> = Vec::new();
    for (bi, bullet) in bullets.iter().enumerate() {
        let br = bullet.rect();
        let mut consumed = false;
        for a in asteroids.iter_mut() {
            if a.hp > 0 && br.overlaps(&a.rect()) {
                a.hp -= BULLET_DAMAGE;
                consumed = true;
                break;
            }
        }
        if !consumed {
            if let Some(al) = alien.as_mut() {
                if al.hp > 0 && br.overlaps(&al.rect()) {
                    al.hp -= BULLET_DAMAGE;
                    consumed = true;
                }
            }
        }
        if consumed {
            used_bullets.push(bi);
        }
    }
    let bullets: Vec<Bullet> = bullets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b)
        .collect();

    // Remove destroyed targets, awarding tokens at the moment of removal.
    asteroids.retain(|a| {
        if a.hp <= 0 {
            tokens += TOKENS_PER_ASTEROID;
            false
        } else {
            true
        }
    });
    if alien.as_ref().map_or(false, |al| al.hp <= 0) {
        tokens += TOKENS_PER_ALIEN;
        alien = None;
    }

    // ── 8. Hazards vs player ──────────────────────────────────────────────────
    // The player is never removed, only life-depleted.
    let mut lives = state.lives;
    let player_rect = player.rect();
    asteroids.retain(|a| {
        if a.rect().overlaps(&player_rect) {
            lives = lives.saturating_sub(1);
            false
        } else {
            true
        }
    });
    enemy_bullets.retain(|b| {
        if b.rect().overlaps(&player_rect) {
            lives = lives.saturating_sub(1);
            false
        } else {
            true
        }
    });

    // ── 9. Level-up ───────────────────────────────────────────────────────────
    let mut level = state.level;
    if tokens >= level * LEVEL_STEP {
        level += 1;
        alien = Some(spawn_alien(level, state.width, &lo));
        info!("level up: level={} tokens={}", level, tokens);
    }

    // ── 10. Game over and record check ────────────────────────────────────────
    let mut status = GameStatus::Playing;
    let mut best = state.best;
    let mut new_record = state.new_record;
    if lives == 0 {
        status = GameStatus::GameOver;
        if best.beaten_by(tokens, level) {
            best.absorb(tokens, level);
            new_record = true;
        }
        info!(
            "game over: tokens={} level={} new_record={}",
            tokens, level, new_record
        );
    }

    SessionState {
        player,
        bullets,
        enemy_bullets,
        asteroids,
        alien,
        lives,
        tokens,
        level,
        shoot_cd,
        status,
        best,
        new_record,
        shot_fired,
        frame,
        width: state.width,
        height: state.height,
    }
}
