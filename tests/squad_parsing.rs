use std::fs;
use std::path::PathBuf;

use url::Url;

use fbref_ingest::error::ScrapeError;
use fbref_ingest::fbref::{
    match_logs_url, parse_league_teams, parse_match_logs, parse_squad_page,
};

const TEAM_URL: &str = "https://fbref.com/en/squads/18bb7c10/Arsenal-Stats";

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn base() -> Url {
    Url::parse("https://fbref.com").expect("valid base url")
}

#[test]
fn squad_page_yields_one_payload_per_player() {
    let raw = read_fixture("squad_page.html");
    let page = parse_squad_page(&raw, TEAM_URL, &base()).expect("fixture should parse");
    assert_eq!(page.team_name, "Arsenal");
    assert_eq!(page.league.as_deref(), Some("Premier League"));
    assert_eq!(page.season.as_deref(), Some("2024-2025"));

    let payloads = page.into_payloads(TEAM_URL, None, "2023-2024");
    let names = payloads
        .iter()
        .map(|p| p.player_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["Bukayo Saka", "William Saliba", "Declan Rice", "Academy Player"]
    );
    assert!(payloads.iter().all(|p| p.season.as_deref() == Some("2024-2025")));
    assert!(payloads.iter().all(|p| p.team_name == "Arsenal"));
}

#[test]
fn squad_page_coerces_counters_and_age() {
    let raw = read_fixture("squad_page.html");
    let page = parse_squad_page(&raw, TEAM_URL, &base()).expect("fixture should parse");
    let payloads = page.into_payloads(TEAM_URL, None, "2024-2025");

    let saka = &payloads[0];
    assert_eq!(saka.age, Some(22));
    assert_eq!(saka.position.as_deref(), Some("FW,MF"));
    assert_eq!(saka.nationality.as_deref(), Some("eng ENG"));
    assert_eq!(saka.stats.matches_played, 35);
    assert_eq!(saka.stats.minutes_played, 2958);
    assert_eq!(saka.stats.goals, 16);
    assert_eq!(saka.stats.assists, 9);
    assert_eq!(saka.stats.yellow_cards, 4);
    assert!((saka.stats.expected_goals - 13.5).abs() < 1e-9);
    assert!((saka.stats.expected_assists - 9.8).abs() < 1e-9);

    let rice = &payloads[2];
    assert_eq!(rice.age, Some(25));
    assert_eq!(rice.stats.yellow_cards, 0);

    let academy = &payloads[3];
    assert_eq!(academy.age, None);
    assert_eq!(academy.nationality, None);
}

#[test]
fn player_links_are_absolute_and_aligned() {
    let raw = read_fixture("squad_page.html");
    let page = parse_squad_page(&raw, TEAM_URL, &base()).expect("fixture should parse");
    let payloads = page.into_payloads(TEAM_URL, None, "2024-2025");

    assert_eq!(
        payloads[0].player_url.as_deref(),
        Some("https://fbref.com/en/players/bc7dc64d/Bukayo-Saka")
    );
    assert_eq!(
        payloads[2].player_url.as_deref(),
        Some("https://fbref.com/en/players/1c7012b8/Declan-Rice")
    );
    assert_eq!(payloads[3].player_url, None);
}

#[test]
fn raw_snapshot_keeps_the_whole_row() {
    let raw = read_fixture("squad_page.html");
    let page = parse_squad_page(&raw, TEAM_URL, &base()).expect("fixture should parse");
    let payloads = page.into_payloads(TEAM_URL, None, "2024-2025");

    let snapshot = payloads[0].raw_data.as_object().expect("object snapshot");
    assert_eq!(snapshot.get("player_name").and_then(|v| v.as_str()), Some("Bukayo Saka"));
    assert_eq!(snapshot.get("minutes_played").and_then(|v| v.as_i64()), Some(2958));
    assert!(snapshot.contains_key("player_url"));
}

#[test]
fn requested_season_overrides_heading() {
    let raw = read_fixture("squad_page.html");
    let page = parse_squad_page(&raw, TEAM_URL, &base()).expect("fixture should parse");
    let payloads = page.into_payloads(TEAM_URL, Some("2023-2024"), "2022-2023");
    assert!(payloads.iter().all(|p| p.season.as_deref() == Some("2023-2024")));
}

#[test]
fn page_without_squad_table_is_an_error() {
    let html = "<html><body><h1>Nothing here</h1></body></html>";
    let err = parse_squad_page(html, TEAM_URL, &base()).expect_err("no table");
    assert!(matches!(err, ScrapeError::TableNotFound { .. }));
}

#[test]
fn team_name_falls_back_to_url_without_heading() {
    let raw = read_fixture("squad_page.html").replace("<h1>", "<h2>").replace("</h1>", "</h2>");
    let url = "https://fbref.com/en/squads/b8fd03ef/Manchester-City-Stats/";
    let page = parse_squad_page(&raw, url, &base()).expect("fixture should parse");
    assert_eq!(page.team_name, "Manchester City");
    assert_eq!(page.season, None);
    assert_eq!(page.league, None);
}

#[test]
fn league_page_lists_each_team_once() {
    let raw = read_fixture("league_page.html");
    let teams = parse_league_teams(&raw, &base()).expect("fixture should parse");
    assert_eq!(
        teams,
        vec![
            "https://fbref.com/en/squads/822bd0ba/Liverpool-Stats",
            "https://fbref.com/en/squads/18bb7c10/Arsenal-Stats",
            "https://fbref.com/en/squads/b8fd03ef/Manchester-City-Stats",
        ]
    );
}

#[test]
fn match_log_rows_carry_dates_and_counters() {
    let raw = read_fixture("match_logs.html");
    let rows = parse_match_logs(&raw, "https://fbref.com/x").expect("fixture should parse");
    assert_eq!(rows.len(), 4);

    let dated = rows.iter().filter(|r| r.match_date.is_some()).count();
    assert_eq!(dated, 3);

    let first = &rows[0];
    assert_eq!(first.match_date.map(|d| d.to_string()).as_deref(), Some("2024-08-17"));
    assert_eq!(first.competition.as_deref(), Some("Premier League"));
    assert_eq!(first.round_info.as_deref(), Some("Matchweek 1"));
    assert_eq!(first.venue.as_deref(), Some("Home"));
    assert_eq!(first.opponent.as_deref(), Some("Wolves"));
    assert_eq!(first.line.minutes_played, 90);
    assert_eq!(first.line.goals, 1);
    assert_eq!(first.line.shots, 4);
    assert!((first.line.expected_goals - 0.6).abs() < 1e-9);

    assert_eq!(rows[3].match_date, None);
}

#[test]
fn match_log_url_is_built_from_player_url() {
    let url = match_logs_url("https://fbref.com/en/players/bc7dc64d/Bukayo-Saka", "2024-2025")
        .expect("player url");
    assert_eq!(
        url,
        "https://fbref.com/en/players/bc7dc64d/matchlogs/2024-2025/Bukayo-Saka-Match-Logs"
    );
    assert!(
        match_logs_url("https://fbref.com/en/squads/18bb7c10/Arsenal-Stats", "2024-2025").is_err()
    );
}
