use pyroshow::{FireworkType, HeightClass, ShowDocument, ShowTimeline, SizeClass, TrailStyle};

#[test]
fn json_fixture_loads() {
    let s = include_str!("data/demo_show.json");
    let doc: ShowDocument = serde_json::from_str(s).unwrap();
    assert_eq!(doc.version, "1.0");
    assert_eq!(doc.events.len(), 3);

    let show = ShowTimeline::from_document(&doc);
    assert_eq!(show.event_list().len(), 3);
    assert_eq!(show.launchers().len(), 3);
    assert_eq!(show.duration_ms(), 7500.0);

    let e = &show.event_list()[1];
    assert_eq!(e.firework_type, FireworkType::Saturn);
    assert_eq!(e.size, SizeClass::Large);
    assert_eq!(e.height, HeightClass::Medium);
    assert_eq!(e.trail, TrailStyle::Comet);

    let weather = show.weather.unwrap();
    assert!(weather.wind_force_px_s() < 0.0, "left wind blows negative");
}

#[test]
fn roundtrip_reproduces_events_and_launchers() {
    let s = include_str!("data/demo_show.json");
    let original = ShowTimeline::from_json(s).unwrap();

    let reloaded = ShowTimeline::from_json(&original.to_json().unwrap()).unwrap();

    assert_eq!(original.event_list(), reloaded.event_list());
    assert_eq!(original.launchers(), reloaded.launchers());
    assert_eq!(original.settings, reloaded.settings);
    assert_eq!(original.weather, reloaded.weather);
    assert_eq!(original.audio, reloaded.audio);
}

#[test]
fn triggered_state_does_not_persist() {
    let s = include_str!("data/demo_show.json");
    let mut show = ShowTimeline::from_json(s).unwrap();
    show.play();
    for _ in 0..20 {
        show.advance(0.1); // 2 s: the first two events fire
    }
    assert!(show.event_list().iter().any(|e| e.triggered));

    let reloaded = ShowTimeline::from_json(&show.to_json().unwrap()).unwrap();
    assert!(reloaded.event_list().iter().all(|e| !e.triggered));
    // Everything except the transient flags is identical.
    for (a, b) in show.event_list().iter().zip(reloaded.event_list()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.time_ms, b.time_ms);
        assert_eq!(a.firework_type, b.firework_type);
        assert_eq!(a.primary_color, b.primary_color);
    }
}
