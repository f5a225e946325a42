/// All game entity types: pure data, plus the shared AABB primitive.

use crate::records::BestRecord;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict overlap test: rectangles that merely share an edge do not hit.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ── Input intents ─────────────────────────────────────────────────────────────

/// Boolean intents read once per tick. Independent input sources (keyboard,
/// a touch panel, a test script) combine with `merge`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl Intents {
    pub fn merge(self, other: Intents) -> Intents {
        Intents {
            left: self.left || other.left,
            right: self.right || other.right,
            fire: self.fire || other.fire,
        }
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Sizes and base speeds derived from the current surface width, recomputed
/// every tick so a resize takes effect on the next frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub compact: bool,
    pub ship: f64,
    pub asteroid: f64,
    pub alien_w: f64,
    pub alien_h: f64,
    pub bullet_w: f64,
    pub bullet_h: f64,
    pub player_speed: f64,
    pub asteroid_base_speed: f64,
    pub alien_base_speed: f64,
    pub bottom_offset: f64,
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub speed: f64,
}

/// Player-fired projectile; moves upward.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub speed: f64,
}

/// Alien-fired projectile; moves downward.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBullet {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub speed: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub hp: i32,
    pub speed: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub hp: i32,
    /// Patrol direction, +1 or -1.
    pub dir: f64,
    pub speed: f64,
    /// Frames until the next shot.
    pub cd: u32,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

impl EnemyBullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

impl Asteroid {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

impl Alien {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

// ── Master session state ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// The entire per-session state. Cloneable so pure update functions can
/// return a new copy without mutating the original. A restart discards the
/// whole value; only the persisted record carries over.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub asteroids: Vec<Asteroid>,
    /// At most one alien is alive at any time.
    pub alien: Option<Alien>,
    pub lives: u32,
    /// Score currency, awarded for destroying hazards.
    pub tokens: u32,
    pub level: u32,
    /// Frames until the next allowed player shot.
    pub shoot_cd: u32,
    pub status: GameStatus,
    /// Best record loaded at session start; absorbs the session's totals
    /// at the game-over transition when they beat it.
    pub best: BestRecord,
    /// Raised exactly once, at the game-over transition, if the record fell.
    pub new_record: bool,
    /// True only on ticks where the player fired; drives the shot sound.
    pub shot_fired: bool,
    pub frame: u64,
    pub width: f64,
    pub height: f64,
}
