// tests/ranking.rs
//
// End-to-end ranking behaviour through the public library API:
// field aliases -> category scores -> value score -> batch norms -> final order.

use serde_json::{json, Value};
use smartbuy_ranker::{
    rank_batch, value_one, Catalog, CatalogFilter, DeviceRecord, Mode, RankedDevice, Ranker,
    RankerConfig,
};

fn record(v: Value) -> DeviceRecord {
    DeviceRecord::try_from(v).expect("object literal")
}

fn midrange_phone(slug: &str, price: Value) -> DeviceRecord {
    record(json!({
        "slug": slug,
        "brand": "Acme",
        "soc_score": 7.2,
        "ram_gb": 8,
        "storage_gb": 256,
        "battery_mah": 5000,
        "refresh_hz": 120,
        "ppi": 400,
        "display_type": "AMOLED",
        "resolution": "1080 x 2400",
        "charging_w": 33,
        "main_mp": 50,
        "has_5g": true,
        "price_sgd": price,
    }))
}

fn slugs(out: &[RankedDevice]) -> Vec<String> {
    out.iter()
        .map(|d| d.record.slug().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn cheaper_twin_wins_in_budget_mode_regardless_of_input_order() {
    let batch = vec![
        midrange_phone("pricey", json!(900)),
        midrange_phone("cheap", json!(450)),
    ];
    let out = rank_batch(batch, Mode::Budget);
    assert_eq!(slugs(&out), ["cheap", "pricey"]);
    assert!((out[0].raw_score - out[1].raw_score).abs() < 1e-12);
    assert!(out[0].value_score > out[1].value_score);
}

#[test]
fn cheaper_twin_listed_first_wins_in_every_mode() {
    for mode in [Mode::Budget, Mode::Midrange, Mode::Flagship] {
        let batch = vec![
            midrange_phone("cheap", json!(450)),
            midrange_phone("pricey", json!(900)),
        ];
        let out = rank_batch(batch, mode);
        assert_eq!(slugs(&out), ["cheap", "pricey"], "mode {mode:?}");
    }
}

#[test]
fn single_record_scores_from_blend_defaults() {
    let out = rank_batch(vec![midrange_phone("solo", json!(500))], Mode::Midrange);
    assert_eq!(out.len(), 1);

    let raw = out[0].raw_score;
    let guard = RankerConfig::default().guardrail.multiplier(raw);
    let expected = 0.5 * 0.65 + 0.5 * (0.65 * guard).min(1.0);
    assert!(
        (out[0].score - expected).abs() < 1e-6,
        "score {} vs expected {expected}",
        out[0].score
    );
}

#[test]
fn empty_batch_returns_empty_list() {
    assert!(rank_batch(Vec::new(), Mode::Budget).is_empty());
    assert!(Ranker::default()
        .rank_entries::<DeviceRecord>(&[], Mode::Flagship)
        .is_empty());
}

#[test]
fn output_keeps_input_fields_and_adds_annotations() {
    let out = rank_batch(
        vec![
            midrange_phone("a", json!(500)),
            midrange_phone("b", json!("N/A")),
        ],
        Mode::Midrange,
    );
    for d in &out {
        let v = serde_json::to_value(d).unwrap();
        let obj = v.as_object().unwrap();
        for key in ["slug", "brand", "price_sgd", "raw_score", "smartbuy_score", "score_breakdown", "score"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        for key in ["raw_norm", "value_norm", "value_score", "price"] {
            assert!(!obj.contains_key(key), "leaked {key}");
        }
        let breakdown = obj["score_breakdown"].as_object().unwrap();
        assert_eq!(breakdown.len(), 10);
    }
    let unpriced = out.iter().find(|d| d.record.slug() == Some("b")).unwrap();
    assert_eq!(unpriced.value_score, 0.0);
}

#[test]
fn mode_aliases_rank_identically() {
    let batch = || {
        vec![
            midrange_phone("a", json!(300)),
            midrange_phone("b", json!(700)),
            record(json!({"slug": "c", "soc_score": 9.5, "ram_gb": 16, "price_sgd": 1200})),
        ]
    };
    let a = rank_batch(batch(), Mode::parse("mid"));
    let b = rank_batch(batch(), Mode::parse("MIDRANGE"));
    assert_eq!(a, b);

    let unknown = rank_batch(batch(), Mode::parse("whatever"));
    let budget = rank_batch(batch(), Mode::Budget);
    assert_eq!(unknown, budget);
}

#[test]
fn aliases_resolve_like_canonical_fields() {
    let canonical = midrange_phone("x", json!(500));
    let aliased = record(json!({
        "slug": "x",
        "brand": "Acme",
        "soc_score": "7.2",
        "ram": "8 GB",
        "storage": "256GB",
        "battery": "5000 mAh",
        "refresh_rate": "120Hz",
        "pixel_density": "400 ppi",
        "display_type": "amoled",
        "res_w": 1080,
        "res_h": 2400,
        "charging_speed": "33W",
        "camera_main_mp": "50 MP",
        "has_5g": "yes",
        "price": "500",
    }));
    let a = value_one(&canonical, Mode::Budget);
    let b = value_one(&aliased, Mode::Budget);
    assert!((a.raw_score - b.raw_score).abs() < 1e-9);
    assert!((a.value_score - b.value_score).abs() < 1e-9);
    assert_eq!(a.breakdown, b.breakdown);
}

#[test]
fn flagship_mode_prefers_quality_budget_mode_prefers_value() {
    let flagship = record(json!({
        "slug": "flagship", "brand": "Samsung",
        "soc_score": 9.6, "ram_gb": 12, "storage_gb": 512, "battery_mah": 5000,
        "refresh_hz": 120, "ppi": 505, "display_type": "oled", "resolution": "1440 x 3120",
        "charging_w": 45, "main_mp": 200, "has_ois": true,
        "camera_main_mp": "200 MP wide, 50 MP periscope telephoto",
        "has_5g": true, "has_nfc": true, "has_stereo_speakers": true,
        "glass_type": "Gorilla Glass Victus 2", "ip_rating": "IP68", "mohs": 6.0,
        "price_sgd": 1899,
    }));
    let entry = record(json!({
        "slug": "entry", "brand": "Acme",
        "soc_score": 4.5, "ram_gb": 4, "storage_gb": 64, "battery_mah": 5000,
        "refresh_hz": 60, "display_type": "lcd", "resolution": "720 x 1600",
        "charging_w": 10, "main_mp": 13, "price_sgd": 129,
    }));
    let batch = vec![entry, flagship];

    assert_eq!(slugs(&rank_batch(batch.clone(), Mode::Flagship))[0], "flagship");
    assert_eq!(slugs(&rank_batch(batch, Mode::Budget))[0], "entry");
}

#[test]
fn filtering_happens_before_normalization() {
    let cat = Catalog::from_records(vec![
        midrange_phone("a", json!(300)),
        midrange_phone("b", json!(650)),
        midrange_phone("c", json!("N/A")),
    ]);
    let filter = CatalogFilter::from_query(Some("400"), None).unwrap();
    let out = rank_batch(cat.select(&filter), Mode::Budget);
    assert_eq!(slugs(&out), ["a"]);
    // Alone in its batch: continuous norm 0.5, rank norm 1.0.
    let guard = RankerConfig::default().guardrail.multiplier(out[0].raw_score);
    let expected = 0.3 * 0.65 + 0.7 * (0.65 * guard).min(1.0);
    assert!((out[0].score - expected).abs() < 1e-6);
}

#[test]
fn shipped_catalog_loads_and_ranks() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/catalog.json");
    let cat = Catalog::load(&path).expect("sample catalog");
    assert_eq!(cat.len(), 5);
    assert_eq!(cat.skipped(), 0);

    for mode in [Mode::Budget, Mode::Midrange, Mode::Flagship] {
        let out = rank_batch(cat.records().to_vec(), mode);
        assert_eq!(out.len(), 5);
        assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(out.iter().all(|d| (0.0..=1.0).contains(&d.score)));
    }

    let capped = CatalogFilter::from_query(Some("2000"), None).unwrap();
    let selected = cat.select(&capped);
    assert_eq!(selected.len(), 4, "unpriced record must not pass max_price");
}

#[test]
fn shipped_catalog_second_sensor_earns_the_camera_bonus() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/catalog.json");
    let cat = Catalog::load(&path).expect("sample catalog");

    for slug in ["samsung-galaxy-s24-ultra", "google-pixel-8a"] {
        let shipped = cat.get(slug).expect(slug).clone();
        let main = shipped.fields()["camera_main_mp"].as_str().unwrap().to_string();
        let first = main.split(',').next().unwrap().to_string();
        let weak = shipped
            .clone()
            .with("camera_main_mp", format!("{first}, 8 MP ultrawide"));

        let a = value_one(&shipped, Mode::Flagship);
        let b = value_one(&weak, Mode::Flagship);
        assert!(
            a.breakdown.camera > b.breakdown.camera,
            "{slug}: {} vs {}",
            a.breakdown.camera,
            b.breakdown.camera
        );
        assert!(a.raw_score > b.raw_score, "{slug}");
    }

    // Second sensor below 12 MP: no bonus to lose.
    let redmi = cat.get("xiaomi-redmi-note-13-pro").unwrap().clone();
    let same = redmi.clone().with("camera_main_mp", "200 MP wide, 2 MP macro");
    let (a, _) = smartbuy_ranker::score_one(&redmi, Mode::Budget);
    let (b, _) = smartbuy_ranker::score_one(&same, Mode::Budget);
    assert!((a - b).abs() < 1e-12);
}
