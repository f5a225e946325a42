use astro_assault::records::*;

#[test]
fn parse_well_formed_record() {
    let b = parse_record("bestScore=15\nbestLevel=3\n");
    assert_eq!(b, BestRecord { score: 15, level: 3 });
}

#[test]
fn parse_defaults_missing_keys_to_zero() {
    assert_eq!(parse_record(""), BestRecord::default());
    assert_eq!(parse_record("bestScore=7"), BestRecord { score: 7, level: 0 });
    assert_eq!(parse_record("bestLevel=4"), BestRecord { score: 0, level: 4 });
}

#[test]
fn parse_ignores_garbage_lines() {
    let b = parse_record("??\nbestScore=abc\nbestLevel=2\nunknownKey=9\n");
    assert_eq!(b, BestRecord { score: 0, level: 2 });
}

#[test]
fn parse_tolerates_whitespace() {
    let b = parse_record("bestScore = 12\nbestLevel = 1");
    assert_eq!(b, BestRecord { score: 12, level: 1 });
}

#[test]
fn format_reads_back() {
    let b = BestRecord { score: 42, level: 5 };
    assert_eq!(parse_record(&format_record(b)), b);
}

#[test]
fn beaten_by_requires_strict_improvement_on_either_metric() {
    let b = BestRecord { score: 10, level: 2 };
    assert!(b.beaten_by(15, 2)); // score alone
    assert!(b.beaten_by(3, 3)); // level alone
    assert!(!b.beaten_by(10, 2)); // ties lose
    assert!(!b.beaten_by(5, 1)); // strictly worse
}

#[test]
fn absorb_raises_only_improved_metrics() {
    let mut b = BestRecord { score: 10, level: 2 };
    b.absorb(15, 1);
    assert_eq!(b, BestRecord { score: 15, level: 2 });
    b.absorb(12, 4);
    assert_eq!(b, BestRecord { score: 15, level: 4 });
}
