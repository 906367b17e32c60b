use fbref_ingest::metadata::{
    PageMetadata, infer_from_heading, resolve_team_name, team_name_from_url,
};
use fbref_ingest::models::parse_season_bounds_at;

#[test]
fn heading_gives_team_season_and_competition() {
    let meta = infer_from_heading("2024-2025 Arsenal Stats (Premier League)");
    assert_eq!(
        meta,
        PageMetadata {
            team_name: Some("Arsenal".to_string()),
            season: Some("2024-2025".to_string()),
            competition: Some("Premier League".to_string()),
        }
    );
}

#[test]
fn heading_without_season_or_competition() {
    let meta = infer_from_heading("  Real Madrid Stats ");
    assert_eq!(meta.team_name.as_deref(), Some("Real Madrid"));
    assert_eq!(meta.season, None);
    assert_eq!(meta.competition, None);
}

#[test]
fn heading_with_only_season_has_no_team() {
    let meta = infer_from_heading("2023-2024 - Stats");
    assert_eq!(meta.team_name, None);
    assert_eq!(meta.season.as_deref(), Some("2023-2024"));
}

#[test]
fn url_fallback_strips_suffix_query_and_slash() {
    assert_eq!(
        team_name_from_url("https://fbref.com/en/squads/18bb7c10/Arsenal-Stats"),
        "Arsenal"
    );
    assert_eq!(
        team_name_from_url("https://fbref.com/en/squads/b8fd03ef/Manchester-City-Stats/?lang=en"),
        "Manchester City"
    );
}

#[test]
fn heading_team_beats_url() {
    let meta = infer_from_heading("2024-2025 Arsenal Stats");
    assert_eq!(
        resolve_team_name(&meta, "https://fbref.com/en/squads/x/Other-Stats"),
        "Arsenal"
    );
    let empty = PageMetadata::default();
    assert_eq!(
        resolve_team_name(&empty, "https://fbref.com/en/squads/x/Other-Stats"),
        "Other"
    );
}

#[test]
fn season_bounds_follow_label_then_year() {
    assert_eq!(parse_season_bounds_at("2024-2025", 2030), (2024, 2025));
    assert_eq!(parse_season_bounds_at("2019/2020", 2030), (2019, 2020));
    assert_eq!(parse_season_bounds_at("2022", 2030), (2022, 2023));
    assert_eq!(parse_season_bounds_at("current", 2030), (2030, 2031));
}
