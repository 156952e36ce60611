#[cfg(test)]
mod tests {
    use crate::core::domain::{
        DietFlag, Dimension, MonthKey, MonthSpan, RawObservation, SalesObservation,
    };
    use crate::error::IngestError;
    use crate::store::records::RecordSet;

    fn window_2024() -> MonthSpan {
        MonthSpan::new(MonthKey::new(2024, 1), MonthKey::new(2024, 12))
    }

    fn raw(region: &str, sku: &str, month: u32, amount: f64, row: usize) -> RawObservation {
        RawObservation {
            source_row: row,
            observation: SalesObservation {
                region: region.to_string(),
                province: "Riyadh".to_string(),
                precision_area: "Riyadh City".to_string(),
                manufacturer: "AUJAN".to_string(),
                brand: "RANI".to_string(),
                flavor_segment: "COLA".to_string(),
                diet: DietFlag::Regular,
                pack_type: "CAN".to_string(),
                pack_size: "330ML".to_string(),
                sku_id: sku.to_string(),
                period: MonthKey::new(2024, month),
                sales_amount: amount,
            },
        }
    }

    #[test]
    fn test_load_accepts_clean_batch() {
        let rows = vec![
            raw("Central", "1001", 1, 120.0, 1),
            raw("Central", "1001", 2, 0.0, 1),
            raw("Eastern", "1001", 1, 40.0, 2),
            raw("Eastern", "1002", 1, 0.0, 3),
        ];

        let set = RecordSet::load(rows, window_2024()).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.zero_count(), 2);
        assert_eq!(set.window(), window_2024());
    }

    #[test]
    fn test_empty_batch_loads() {
        let set = RecordSet::load(vec![], window_2024()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_negative_amount_rejects_whole_batch() {
        let rows = vec![
            raw("Central", "1001", 1, 120.0, 1),
            raw("Central", "1002", 1, -3.0, 2),
        ];

        let err = RecordSet::load(rows, window_2024()).unwrap_err();
        assert_eq!(
            err,
            IngestError::OutOfRange {
                row: 2,
                field: "sales_amount".to_string(),
                value: "-3".to_string()
            }
        );
    }

    #[test]
    fn test_non_finite_amount_is_malformed() {
        let rows = vec![raw("Central", "1001", 1, f64::NAN, 1)];

        let err = RecordSet::load(rows, window_2024()).unwrap_err();
        assert_eq!(
            err,
            IngestError::MalformedRow {
                row: 1,
                field: "sales_amount".to_string()
            }
        );
    }

    #[test]
    fn test_period_outside_window_rejected() {
        let window = MonthSpan::new(MonthKey::new(2024, 1), MonthKey::new(2024, 6));
        let rows = vec![
            raw("Central", "1001", 3, 10.0, 1),
            raw("Central", "1001", 9, 10.0, 1),
        ];

        let err = RecordSet::load(rows, window).unwrap_err();
        assert_eq!(
            err,
            IngestError::OutOfRange {
                row: 1,
                field: "period".to_string(),
                value: "2024-09".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_triple_rejected() {
        // Same (region, SKU, period) from a different province is still a
        // duplicate; the triple is the identity.
        let mut second = raw("Central", "1001", 1, 7.0, 4);
        second.observation.province = "Qassim".to_string();

        let rows = vec![raw("Central", "1001", 1, 120.0, 1), second];

        let err = RecordSet::load(rows, window_2024()).unwrap_err();
        assert_eq!(
            err,
            IngestError::DuplicateKey {
                region: "Central".to_string(),
                sku_id: "1001".to_string(),
                period: MonthKey::new(2024, 1),
                row: 4,
            }
        );
    }

    #[test]
    fn test_same_sku_and_period_across_regions_is_fine() {
        let rows = vec![
            raw("Central", "1001", 1, 120.0, 1),
            raw("Eastern", "1001", 1, 80.0, 2),
            raw("Western", "1001", 1, 60.0, 3),
        ];

        assert!(RecordSet::load(rows, window_2024()).is_ok());
    }

    #[test]
    fn test_filter_produces_borrowing_view() {
        let rows = vec![
            raw("Central", "1001", 1, 120.0, 1),
            raw("Central", "1002", 1, 0.0, 2),
            raw("Eastern", "1001", 1, 40.0, 3),
        ];
        let set = RecordSet::load(rows, window_2024()).unwrap();

        let central = set.filter(|o| o.region == "Central");
        assert_eq!(central.len(), 2);
        assert_eq!(central.window(), set.window());

        let central_zero = central.filter(|o| o.is_zero_sale());
        assert_eq!(central_zero.len(), 1);
        assert_eq!(central_zero.iter().next().unwrap().sku_id, "1002");
    }

    #[test]
    fn test_group_by_orders_keys_lexicographically() {
        // Input order is scrambled on purpose.
        let rows = vec![
            raw("Western", "1001", 1, 1.0, 1),
            raw("Central", "1002", 1, 2.0, 2),
            raw("Eastern", "1003", 1, 3.0, 3),
            raw("Central", "1004", 2, 4.0, 4),
        ];
        let set = RecordSet::load(rows, window_2024()).unwrap();

        let groups = set.group_by(&[Dimension::Region]);
        let keys: Vec<String> = groups.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Central", "Eastern", "Western"]);
        assert_eq!(groups.values().next().unwrap().len(), 2);
    }

    #[test]
    fn test_group_by_multiple_dimensions() {
        let mut diet = raw("Central", "1002", 1, 5.0, 2);
        diet.observation.diet = DietFlag::Diet;

        let rows = vec![raw("Central", "1001", 1, 1.0, 1), diet];
        let set = RecordSet::load(rows, window_2024()).unwrap();

        let groups = set.group_by(&[Dimension::Region, Dimension::Diet]);
        let keys: Vec<String> = groups.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Central|DIET", "Central|REG"]);
    }

    #[test]
    fn test_view_group_by_matches_set_group_by() {
        let rows = vec![
            raw("Central", "1001", 1, 1.0, 1),
            raw("Eastern", "1002", 1, 0.0, 2),
        ];
        let set = RecordSet::load(rows, window_2024()).unwrap();

        let all_view = set.filter(|_| true);
        assert_eq!(
            set.group_by(&[Dimension::Region]).len(),
            all_view.group_by(&[Dimension::Region]).len()
        );
    }
}
