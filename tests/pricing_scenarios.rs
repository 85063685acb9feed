//! End-to-end pricing scenarios through the public API

use chrono::NaiveDate;
use dmc_pricing::pricing::models::{
    AddOn, Agent, HotelStay, MarkupKind, Package, PaxComposition, QuoteOption, SeasonType, SeasonalRate,
    TierLevel, TravelDates,
};
use dmc_pricing::pricing::{price_for_date, resolve_rate, PricingConfig, PricingEngine, PricingError, QuoteDraft, QuoteUpdate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn package(base_price: Decimal, duration: i32, nights: Vec<u32>) -> Package {
    Package {
        id: "pkg-bali".to_string(),
        name: "Bali Highlights".to_string(),
        duration,
        nights,
        base_price,
        is_active: true,
    }
}

fn agent(tier: Option<TierLevel>) -> Agent {
    Agent {
        id: "agent-1".to_string(),
        company_name: "Kerala Holidays".to_string(),
        tier,
    }
}

fn hotel(price_per_night: Decimal) -> HotelStay {
    HotelStay {
        id: String::new(),
        name: "Hotel".to_string(),
        location: "Ubud".to_string(),
        price_per_night,
    }
}

fn peak_rate() -> SeasonalRate {
    SeasonalRate {
        id: "rate-peak".to_string(),
        package_id: "pkg-bali".to_string(),
        season_name: "Year End".to_string(),
        season_type: SeasonType::Peak,
        start_date: date(2024, 12, 15),
        end_date: date(2025, 1, 15),
        price_multiplier: dec!(1.5),
        fixed_price: None,
        min_stay: 1,
        is_active: true,
        created_at: None,
    }
}

fn reference_option() -> QuoteOption {
    QuoteOption {
        hotels: vec![hotel(dec!(50)), hotel(dec!(40))],
        add_ons: vec![],
        markup: dec!(10),
        markup_kind: MarkupKind::Percentage,
    }
}

#[test]
fn test_reference_quote_breakdown() {
    let engine = PricingEngine::default();
    let pricing = engine.price(
        &package(dec!(100), 3, vec![1, 2]),
        &[reference_option()],
        &PaxComposition::new(2, 0, 0),
        &agent(Some(TierLevel::Bronze)),
    )
    .unwrap();

    assert_eq!(pricing.len(), 1);
    let breakdown = &pricing[0];
    assert_eq!(breakdown.base_price, dec!(200));
    assert_eq!(breakdown.hotel_cost, dec!(130));
    assert_eq!(breakdown.vehicle_cost, dec!(105));
    assert_eq!(breakdown.addon_cost, dec!(0));
    assert_eq!(breakdown.subtotal(), dec!(435));
    assert_eq!(breakdown.tier_discount, dec!(10));
    assert_eq!(breakdown.markup, dec!(42.5));
    assert_eq!(breakdown.final_price, dec!(467.5));
}

#[test]
fn test_options_priced_in_order() {
    let engine = PricingEngine::default();
    let flat = QuoteOption {
        hotels: vec![hotel(dec!(80)), hotel(dec!(60))],
        add_ons: vec![AddOn {
            id: None,
            name: Some("Rafting".to_string()),
            price: dec!(25),
        }],
        markup: dec!(30),
        markup_kind: MarkupKind::Flat,
    };

    let pricing = engine.price(
        &package(dec!(100), 3, vec![1, 2]),
        &[reference_option(), flat],
        &PaxComposition::new(2, 0, 0),
        &agent(None),
    )
    .unwrap();

    assert_eq!(pricing.len(), 2);
    assert_eq!(pricing[0].tier_discount, dec!(0));
    // 200 + (80 + 120) + 105 + 50
    assert_eq!(pricing[1].subtotal(), dec!(555));
    assert_eq!(pricing[1].markup, dec!(30));
    assert_eq!(pricing[1].final_price, dec!(585));
}

#[test]
fn test_large_party_rooms_and_vehicle() {
    let engine = PricingEngine::default();
    let option = QuoteOption {
        hotels: vec![hotel(dec!(10))],
        add_ons: vec![],
        markup: Decimal::ZERO,
        markup_kind: MarkupKind::Flat,
    };
    // 7 bed occupants -> 4 rooms; 9 pax -> ELF
    let pricing = engine.price(
        &package(dec!(0), 2, vec![2]),
        &[option],
        &PaxComposition::new(5, 2, 2),
        &agent(None),
    )
    .unwrap();

    assert_eq!(pricing[0].hotel_cost, dec!(80));
    assert_eq!(pricing[0].vehicle_cost, dec!(130));
}

#[test]
fn test_seasonal_price_lookup() {
    let pkg = package(dec!(1000), 5, vec![2, 2]);
    let rates = vec![peak_rate()];

    let christmas = date(2024, 12, 25);
    let rate = resolve_rate(&rates, &pkg.id, christmas).unwrap();
    let price = price_for_date(&pkg, christmas, rate);
    assert_eq!(price.final_price, dec!(1500));
    assert_eq!(price.season_label(), "peak");

    let october = date(2024, 10, 15);
    let rate = resolve_rate(&rates, &pkg.id, october).unwrap();
    let price = price_for_date(&pkg, october, rate);
    assert_eq!(price.final_price, dec!(1000));
    assert_eq!(price.price_multiplier, Decimal::ONE);
    assert_eq!(price.season_label(), "regular");
}

#[test]
fn test_overlapping_active_rates_are_reported() {
    let mut second = peak_rate();
    second.id = "rate-dup".to_string();
    let rates = vec![peak_rate(), second];

    let err = resolve_rate(&rates, "pkg-bali", date(2025, 1, 1)).unwrap_err();
    match err {
        PricingError::DataIntegrityViolation { matches, .. } => assert_eq!(matches.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_quote_lifecycle() {
    let engine = PricingEngine::new(PricingConfig::default());
    let pkg = package(dec!(100), 3, vec![1, 2]);
    let bronze = agent(Some(TierLevel::Bronze));
    let pax = PaxComposition::new(2, 0, 0);
    let preview = engine.price(&pkg, &[reference_option()], &pax, &bronze).unwrap();

    let mut draft = QuoteDraft::create(&engine, &pkg, &bronze, None, pax, vec![reference_option()]).unwrap();
    assert_eq!(draft.pricing, preview);

    // Nothing pricing-relevant changed
    assert!(!draft.apply_update(QuoteUpdate::default(), &engine, &pkg, &bronze).unwrap());
    assert_eq!(draft.pricing[0].final_price, dec!(467.5));

    // Travel dates trigger a reprice, with the same result as the preview
    let update = QuoteUpdate {
        travel_dates: Some(TravelDates {
            start_date: date(2024, 12, 20),
            end_date: date(2024, 12, 23),
        }),
        ..QuoteUpdate::default()
    };
    assert!(draft.apply_update(update, &engine, &pkg, &bronze).unwrap());
    assert_eq!(draft.pricing, preview);

    let copy = draft.duplicate();
    assert_eq!(copy.pricing, draft.pricing);
}

#[test]
fn test_oversized_prices_are_rejected_instead_of_panicking() {
    let engine = PricingEngine::default();
    let option = QuoteOption {
        hotels: vec![hotel(Decimal::MAX)],
        add_ons: vec![],
        markup: Decimal::ZERO,
        markup_kind: MarkupKind::Flat,
    };

    let err = engine
        .price(
            &package(dec!(100), 3, vec![1, 2]),
            &[option],
            &PaxComposition::new(4, 0, 0),
            &agent(None),
        )
        .unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput { .. }));
}
