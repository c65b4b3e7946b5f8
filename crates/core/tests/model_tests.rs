use chrono::{NaiveDate, TimeZone, Utc};
use cashflow_metrics_core::models::metrics::{CategoryKey, DailyBucket, MetricsReport};
use cashflow_metrics_core::models::movement::{
    parse_timestamp, CategoryRef, MovementType, NormalizedMovement, RawMovement, RawValue,
};
use cashflow_metrics_core::models::query::{MetricsQuery, MovementFilter, Pagination};
use cashflow_metrics_core::models::settings::Settings;
use cashflow_metrics_core::errors::CoreError;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn normalized(id: i64, movement_type: MovementType, value: f64) -> NormalizedMovement {
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    NormalizedMovement {
        id,
        movement_type,
        value,
        date,
        date_only: date.date_naive(),
        user_id: Some(1),
        category_id: None,
        category: None,
        description: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MovementType
// ═══════════════════════════════════════════════════════════════════

mod movement_type {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(MovementType::Income.to_string(), "INCOME");
        assert_eq!(MovementType::Expense.to_string(), "EXPENSE");
    }

    #[test]
    fn serializes_screaming_case() {
        assert_eq!(serde_json::to_string(&MovementType::Income).unwrap(), "\"INCOME\"");
        assert_eq!(serde_json::to_string(&MovementType::Expense).unwrap(), "\"EXPENSE\"");
    }

    #[test]
    fn rejects_unknown_variant() {
        assert!(serde_json::from_str::<MovementType>("\"TRANSFER\"").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  RawValue
// ═══════════════════════════════════════════════════════════════════

mod raw_value {
    use super::*;

    #[test]
    fn number_is_finite() {
        assert_eq!(RawValue::Number(12.5).to_finite(), Some(12.5));
    }

    #[test]
    fn decimal_text_parses() {
        assert_eq!(RawValue::from("1500.75").to_finite(), Some(1500.75));
        assert_eq!(RawValue::from("  42 ").to_finite(), Some(42.0));
    }

    #[test]
    fn nan_and_infinity_are_rejected() {
        assert_eq!(RawValue::Number(f64::NAN).to_finite(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).to_finite(), None);
        assert_eq!(RawValue::from("NaN").to_finite(), None);
        assert_eq!(RawValue::from("inf").to_finite(), None);
    }

    #[test]
    fn garbage_text_is_rejected() {
        assert_eq!(RawValue::from("").to_finite(), None);
        assert_eq!(RawValue::from("twelve").to_finite(), None);
    }

    #[test]
    fn deserializes_number_or_text() {
        let n: RawValue = serde_json::from_str("10.5").unwrap();
        assert_eq!(n, RawValue::Number(10.5));
        let t: RawValue = serde_json::from_str("\"10.50\"").unwrap();
        assert_eq!(t, RawValue::Text("10.50".into()));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Timestamps
// ═══════════════════════════════════════════════════════════════════

mod timestamps {
    use super::*;

    #[test]
    fn rfc3339_with_offset_converts_to_utc() {
        let ts = parse_timestamp("2024-01-01T23:30:00-03:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 2, 2, 30, 0).unwrap());
        assert_eq!(ts.date_naive(), d(2024, 1, 2));
    }

    #[test]
    fn mysql_style_is_utc() {
        let ts = parse_timestamp("2024-03-10 08:15:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 10, 8, 15, 0).unwrap());
    }

    #[test]
    fn fractional_seconds_accepted() {
        let ts = parse_timestamp("2024-03-10 08:15:00.250").unwrap();
        assert_eq!(ts.date_naive(), d(2024, 3, 10));
    }

    #[test]
    fn bare_date_is_midnight() {
        let ts = parse_timestamp("2024-02-29").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn invalid_text_is_an_error() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate(_)));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn raw_movement_timestamp_is_none_when_missing() {
        let mut raw = RawMovement::income(1, 10.0, Utc::now());
        raw.date = None;
        assert!(raw.timestamp().is_none());
        raw.date = Some("not a date".into());
        assert!(raw.timestamp().is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  RawMovement
// ═══════════════════════════════════════════════════════════════════

mod raw_movement {
    use super::*;

    #[test]
    fn builders_fill_fields() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let raw = RawMovement::expense(7, 99.9, date)
            .with_category(3, "Mercado")
            .with_description("weekly groceries")
            .with_user(42);

        assert_eq!(raw.movement_type, MovementType::Expense);
        assert_eq!(raw.value, Some(RawValue::Number(99.9)));
        assert_eq!(raw.timestamp(), Some(date));
        assert_eq!(raw.category_id, Some(3));
        assert_eq!(raw.category, Some(CategoryRef::new(3, "Mercado")));
        assert_eq!(raw.description.as_deref(), Some("weekly groceries"));
        assert_eq!(raw.user_id, Some(42));
    }

    #[test]
    fn deserializes_source_json() {
        let json = r#"{
            "id": 5,
            "type": "INCOME",
            "value": "2500.00",
            "date": "2024-01-05 10:00:00",
            "categoryId": 2,
            "category": { "id": 2, "name": "Salário", "userId": 1 },
            "description": null,
            "userId": 1
        }"#;
        let raw: RawMovement = serde_json::from_str(json).unwrap();
        assert_eq!(raw.movement_type, MovementType::Income);
        assert_eq!(raw.value.unwrap().to_finite(), Some(2500.0));
        assert_eq!(raw.category.unwrap().user_id, Some(1));
    }

    #[test]
    fn missing_optional_fields_default() {
        let raw: RawMovement = serde_json::from_str(r#"{"id": 1, "type": "EXPENSE"}"#).unwrap();
        assert!(raw.value.is_none());
        assert!(raw.date.is_none());
        assert!(raw.category.is_none());
        assert!(raw.user_id.is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  CategoryKey
// ═══════════════════════════════════════════════════════════════════

mod category_key {
    use super::*;

    #[test]
    fn uncategorized_serializes_as_zero() {
        assert_eq!(serde_json::to_string(&CategoryKey::Uncategorized).unwrap(), "0");
        assert_eq!(serde_json::to_string(&CategoryKey::Assigned(9)).unwrap(), "9");
    }

    #[test]
    fn zero_deserializes_as_uncategorized() {
        let key: CategoryKey = serde_json::from_str("0").unwrap();
        assert_eq!(key, CategoryKey::Uncategorized);
        let key: CategoryKey = serde_json::from_str("4").unwrap();
        assert_eq!(key, CategoryKey::Assigned(4));
    }

    #[test]
    fn real_category_zero_is_distinct_from_uncategorized() {
        let mut m = normalized(1, MovementType::Income, 1.0);
        m.category_id = Some(0);
        assert_eq!(CategoryKey::of(&m), CategoryKey::Assigned(0));
        assert_ne!(CategoryKey::of(&m), CategoryKey::Uncategorized);
    }

    #[test]
    fn joined_category_wins_over_foreign_key() {
        let mut m = normalized(1, MovementType::Income, 1.0);
        m.category_id = Some(3);
        m.category = Some(CategoryRef::new(8, "Rent"));
        assert_eq!(CategoryKey::of(&m), CategoryKey::Assigned(8));
    }

    #[test]
    fn no_category_at_all() {
        let m = normalized(1, MovementType::Income, 1.0);
        assert_eq!(CategoryKey::of(&m), CategoryKey::Uncategorized);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  DailyBucket
// ═══════════════════════════════════════════════════════════════════

mod daily_bucket {
    use super::*;

    #[test]
    fn fold_keeps_balance_in_step() {
        let mut bucket = DailyBucket::new(d(2024, 1, 1));
        bucket.fold(&normalized(1, MovementType::Income, 100.0));
        assert_eq!(bucket.balance, 100.0);
        bucket.fold(&normalized(2, MovementType::Expense, 40.0));
        assert_eq!(bucket.income, 100.0);
        assert_eq!(bucket.outcome, 40.0);
        assert_eq!(bucket.balance, 60.0);
        assert_eq!(bucket.activity(), 140.0);
        let ids: Vec<i64> = bucket.movements.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MetricsReport
// ═══════════════════════════════════════════════════════════════════

mod metrics_report {
    use super::*;

    #[test]
    fn empty_report_shape() {
        let report = MetricsReport::empty(None, None);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["period"]["startDate"], serde_json::Value::Null);
        assert_eq!(json["period"]["totalDays"], 0);
        assert_eq!(json["totals"]["movementCount"], 0);
        assert_eq!(json["daily"], serde_json::json!([]));
        assert_eq!(json["categories"], serde_json::json!([]));
        assert_eq!(json["insights"]["biggestIncome"], serde_json::Value::Null);
        assert_eq!(json["insights"]["incomeOutcomeRatio"], serde_json::Value::Null);
        assert_eq!(json["insights"]["categoryCount"], 0);
        assert_eq!(json["chartData"]["dailyBalance"], serde_json::json!([]));
        assert_eq!(json["chartData"]["cumulativeBalance"], serde_json::json!([]));
        assert_eq!(json["chartData"]["incomeVsOutcome"], serde_json::json!([]));
    }

    #[test]
    fn empty_report_echoes_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let report = MetricsReport::empty(Some(start), None);
        assert_eq!(report.period.start_date, Some(start));
        assert_eq!(report.period.end_date, None);
    }

    #[test]
    fn json_round_trip() {
        let report = MetricsReport::empty(None, None);
        let json = serde_json::to_string(&report).unwrap();
        let back: MetricsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings & queries
// ═══════════════════════════════════════════════════════════════════

mod settings_and_queries {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.uncategorized_label, "Sem categoria");
        assert_eq!(settings.default_page_limit, 50);
    }

    #[test]
    fn settings_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"uncategorized_label": "No category"}"#).unwrap();
        assert_eq!(settings.uncategorized_label, "No category");
        assert_eq!(settings.default_page_limit, 50);
    }

    #[test]
    fn query_parse_both_bounds() {
        let q = MetricsQuery::parse(Some("2024-01-01"), Some("2024-01-31T23:59:59Z")).unwrap();
        assert_eq!(q.start_date, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(q.end_date, Some(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn query_parse_blank_is_absent() {
        let q = MetricsQuery::parse(Some("  "), None).unwrap();
        assert_eq!(q, MetricsQuery::default());
    }

    #[test]
    fn query_parse_rejects_garbage() {
        let err = MetricsQuery::parse(Some("2024-13-45"), None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate(_)));
    }

    #[test]
    fn filter_page_zero_rejected() {
        let filter = MovementFilter {
            page: 0,
            ..MovementFilter::default()
        };
        assert!(matches!(filter.validate(), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn pagination_math() {
        let filter = MovementFilter {
            limit: 10,
            page: 2,
            ..MovementFilter::default()
        };
        let p = Pagination::for_filter(&filter, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn pagination_disabled() {
        let filter = MovementFilter {
            limit: 0,
            page: 4,
            ..MovementFilter::default()
        };
        let p = Pagination::for_filter(&filter, 25);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }
}
