use rusqlite::Connection;

use hoopgrade::ratings_db::{append_rating, init_schema, recent_ratings};
use hoopgrade::role_params::Role;
use hoopgrade::scoring::SubScores;

fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory sqlite");
    init_schema(&conn).expect("schema init");
    conn
}

fn scores(overall_hint: i32) -> SubScores {
    SubScores {
        scoring: overall_hint,
        playmaking: 70,
        shooting: 72,
        rebounding: 65,
        defense: 68,
        isolation: 75,
        clutch: 75,
    }
}

#[test]
fn append_then_read_back_most_recent() {
    let conn = test_conn();
    append_rating(&conn, "LeBron James", Role::Wings, 91, &scores(88)).expect("append");

    let history = recent_ratings(&conn, "LeBron James", 1).expect("query");
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.player_name, "LeBron James");
    assert_eq!(entry.role, "Wings");
    assert_eq!(entry.overall, 91);
    assert_eq!(entry.sub_scores.scoring, 88);
    assert!(!entry.created_at.is_empty());
}

#[test]
fn newest_first_with_stable_tie_break() {
    let conn = test_conn();
    // Same-second appends must still come back in reverse insertion order.
    for overall in [80, 81, 82, 83] {
        append_rating(&conn, "Stephen Curry", Role::Guards, overall, &scores(overall))
            .expect("append");
    }

    let history = recent_ratings(&conn, "Stephen Curry", 10).expect("query");
    let overalls: Vec<i32> = history.iter().map(|e| e.overall).collect();
    assert_eq!(overalls, vec![83, 82, 81, 80]);
}

#[test]
fn limit_caps_the_result() {
    let conn = test_conn();
    for overall in 60..70 {
        append_rating(&conn, "Nikola Jokic", Role::Bigs, overall, &scores(overall))
            .expect("append");
    }
    let history = recent_ratings(&conn, "Nikola Jokic", 3).expect("query");
    assert_eq!(history.len(), 3);
}

#[test]
fn subjects_do_not_leak_into_each_other() {
    let conn = test_conn();
    append_rating(&conn, "Luka Doncic", Role::Guards, 94, &scores(94)).expect("append");
    append_rating(&conn, "Jayson Tatum", Role::Wings, 92, &scores(92)).expect("append");

    let history = recent_ratings(&conn, "Luka Doncic", 10).expect("query");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].overall, 94);

    assert!(recent_ratings(&conn, "Unknown Player", 10)
        .expect("query")
        .is_empty());
}
