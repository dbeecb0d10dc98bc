use zonegrid::{
    agent::AgentRecord,
    grid::{GridSettings, ZoneGrid},
    ingest::{ingest, IngestPolicy},
    report::{EmptyZones, ScatterReport},
    Attribute, Coordinate,
};

fn scenario_records() -> Vec<AgentRecord> {
    let json = r#"[
        {"latitude": 10.4, "longitude": 20.2, "agreeableness": 0.8},
        {"latitude": 10.6, "longitude": 20.6, "agreeableness": 0.4},
        {"latitude": 50.0, "longitude": -100.0, "agreeableness": 0.9}
    ]"#;
    serde_json::from_str(json).expect("scenario records parse")
}

#[test]
fn three_records_land_in_two_zones() {
    let mut grid = ZoneGrid::new(GridSettings::default()).unwrap();
    let summary = ingest(&mut grid, scenario_records(), IngestPolicy::FailFast).unwrap();

    assert_eq!(summary.ingested, 3);
    assert_eq!(summary.populated_zones, 2);

    let shared = grid.find_zone(&Coordinate::new(20.2, 10.4)).unwrap();
    let bounds = shared.summary();
    assert_eq!((bounds.min_longitude, bounds.max_longitude), (20.0, 21.0));
    assert_eq!((bounds.min_latitude, bounds.max_latitude), (10.0, 11.0));
    assert_eq!(shared.population(), 2);
    let avg = shared.average_attribute(Attribute::Agreeableness).unwrap();
    assert!((avg - 0.6).abs() < 1e-9);

    let lone = grid.find_zone(&Coordinate::new(-100.0, 50.0)).unwrap();
    let bounds = lone.summary();
    assert_eq!((bounds.min_longitude, bounds.max_longitude), (-100.0, -99.0));
    assert_eq!((bounds.min_latitude, bounds.max_latitude), (50.0, 51.0));
    assert_eq!(lone.population(), 1);
    let avg = lone.average_attribute(Attribute::Agreeableness).unwrap();
    assert!((avg - 0.9).abs() < 1e-9);

    let empty = grid.zones().iter().filter(|zone| zone.is_empty()).count();
    assert_eq!(empty, grid.len() - 2);
}

#[test]
fn report_keeps_every_zone() {
    let mut grid = ZoneGrid::new(GridSettings::default()).unwrap();
    ingest(&mut grid, scenario_records(), IngestPolicy::FailFast).unwrap();

    let report =
        ScatterReport::density_vs_attribute(grid.zones(), Attribute::Agreeableness, EmptyZones::Include)
            .unwrap();
    assert_eq!(report.series.len(), 64_800);
    assert_eq!(report.series.x.len(), report.series.y.len());
    let zero_points = report
        .series
        .points()
        .filter(|&(x, y)| x == 0.0 && y == 0.0)
        .count();
    assert_eq!(zero_points, 64_800 - 2);

    let populated = ScatterReport::density_vs_attribute(
        grid.zones(),
        Attribute::Agreeableness,
        EmptyZones::Exclude,
    )
    .unwrap();
    assert_eq!(populated.series.len(), 2);
}

#[test]
fn missing_attribute_fails_report() {
    let mut grid = ZoneGrid::new(GridSettings::default()).unwrap();
    ingest(&mut grid, scenario_records(), IngestPolicy::FailFast).unwrap();

    let result =
        ScatterReport::density_vs_attribute(grid.zones(), Attribute::Income, EmptyZones::Include);
    assert!(result.is_err());
}
