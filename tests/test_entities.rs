use astro_assault::entities::*;
use astro_assault::records::BestRecord;

#[test]
fn rect_overlap_edge_cases() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    // Containment counts
    assert!(a.overlaps(&Rect::new(2.0, 2.0, 2.0, 2.0)));
    // Sharing an edge does not
    assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    // Disjoint
    assert!(!a.overlaps(&Rect::new(20.0, 20.0, 5.0, 5.0)));
}

#[test]
fn intents_merge_is_boolean_or() {
    let keyboard = Intents { left: true, right: false, fire: false };
    let touch = Intents { left: false, right: false, fire: true };
    let merged = keyboard.merge(touch);
    assert_eq!(merged, Intents { left: true, right: false, fire: true });
    // Merging with nothing changes nothing
    assert_eq!(keyboard.merge(Intents::default()), keyboard);
}

#[test]
fn status_equality() {
    assert_eq!(GameStatus::Playing, GameStatus::Playing);
    assert_ne!(GameStatus::Playing, GameStatus::GameOver);
}

#[test]
fn session_state_clone_is_independent() {
    let original = SessionState {
        player: Player { x: 100.0, y: 600.0, w: 54.0, h: 54.0, speed: 6.8 },
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        asteroids: Vec::new(),
        alien: None,
        lives: 5,
        tokens: 0,
        level: 1,
        shoot_cd: 0,
        status: GameStatus::Playing,
        best: BestRecord::default(),
        new_record: false,
        shot_fired: false,
        frame: 0,
        width: 1024.0,
        height: 768.0,
    };
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 0.0;
    cloned.tokens = 99;
    cloned.asteroids.push(Asteroid {
        x: 10.0,
        y: 80.0,
        w: 40.0,
        h: 40.0,
        hp: 4,
        speed: 2.0,
    });

    assert_eq!(original.player.x, 100.0);
    assert_eq!(original.tokens, 0);
    assert!(original.asteroids.is_empty());
}
