use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use url::Url;

use fbref_ingest::columns::{HeaderCell, normalize_columns};
use fbref_ingest::fbref::parse_squad_page;
use fbref_ingest::payload::PlayerPayload;

const SQUAD_HTML: &str = include_str!("../tests/fixtures/squad_page.html");
const TEAM_URL: &str = "https://fbref.com/en/squads/18bb7c10/Arsenal-Stats";

fn wide_headers() -> Vec<HeaderCell> {
    let groups = ["", "Playing Time", "Performance", "Expected", "Per 90 Minutes"];
    let leaves = ["Player", "MP", "Min", "Gls", "Ast", "xG", "xAG", "PrgC", "PrgP"];
    groups
        .iter()
        .flat_map(|group| {
            leaves
                .iter()
                .map(move |leaf| HeaderCell::Tuple(vec![group.to_string(), leaf.to_string()]))
        })
        .collect()
}

fn bench_squad_page(c: &mut Criterion) {
    let base = Url::parse("https://fbref.com").expect("valid base url");
    c.bench_function("parse_squad_page", |b| {
        b.iter(|| {
            let page = parse_squad_page(black_box(SQUAD_HTML), TEAM_URL, &base)
                .expect("fixture should parse");
            black_box(page.into_payloads(TEAM_URL, None, "2024-2025"))
        })
    });
}

fn bench_normalize_columns(c: &mut Criterion) {
    let headers = wide_headers();
    c.bench_function("normalize_columns", |b| {
        b.iter(|| black_box(normalize_columns(black_box(&headers))))
    });
}

fn bench_payload_from_json(c: &mut Criterion) {
    let value = serde_json::json!({
        "team_name": "Arsenal",
        "player_name": "Bukayo Saka",
        "season": "2024-2025",
        "Gls": "16",
        "Ast": 9,
        "Min": "2,958",
        "xG": 13.5,
        "age": "22-360"
    });
    c.bench_function("payload_from_json", |b| {
        b.iter(|| black_box(PlayerPayload::from_json(black_box(&value))))
    });
}

criterion_group!(
    benches,
    bench_squad_page,
    bench_normalize_columns,
    bench_payload_from_json
);
criterion_main!(benches);
