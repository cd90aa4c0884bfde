use proptest::prelude::*;
use spendsort_core::{
    extract_merchant, safe_divide, tokenize, train_test_split, Categorizer, Category,
    Transaction,
};

fn trained() -> Categorizer {
    let transactions = vec![
        Transaction::new("1", "2024-01-05", "Coffee at Starbucks", -5.0, "food"),
        Transaction::new("2", "2024-02-05", "Grocery Store - Whole Foods", -60.0, "food"),
        Transaction::new("3", "2024-03-05", "Uber ride downtown", -18.0, "transport"),
        Transaction::new("4", "2024-12-05", "Amazon purchase", -40.0, "shopping"),
        Transaction::new("5", "2024-12-15", "Amazon purchase", -25.0, "shopping"),
        Transaction::new("6", "not a date", "Electric bill/City Power", -90.0, "utilities"),
    ];
    let categories = vec![
        Category::new("food", "Food"),
        Category::new("transport", "Transport"),
        Category::new("shopping", "Shopping"),
        Category::new("utilities", "Utilities"),
        Category::new("other", "Other"),
    ];
    let categorizer = Categorizer::new();
    categorizer.train(&transactions, &categories);
    categorizer
}

proptest! {
    #[test]
    fn tokenize_never_returns_empty(s in ".*") {
        let tokens = tokenize(&s);
        prop_assert!(!tokens.is_empty());
        prop_assert!(tokens.iter().all(|t| !t.chars().any(char::is_whitespace)));
    }

    #[test]
    fn tokens_are_lowercase_words(s in "[A-Za-z ,.!*-]{0,60}") {
        for token in tokenize(&s) {
            prop_assert!(token.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn merchant_exists_for_non_blank(s in "[a-zA-Z][a-zA-Z0-9 ]{0,40}") {
        let lowered = s.to_lowercase();
        prop_assume!(!lowered.starts_with("payment to") && !lowered.starts_with("purchase at"));
        prop_assert!(extract_merchant(&s).is_some());
    }

    #[test]
    fn safe_divide_is_finite(a in any::<f64>(), b in any::<f64>()) {
        prop_assert!(safe_divide(a, b, 0.0).is_finite());
    }

    #[test]
    fn prediction_is_in_catalog_and_bounded(description in ".{0,80}", date in ".{0,20}") {
        let categorizer = trained();
        let prediction = categorizer.predict(&description, Some(&date)).unwrap();
        prop_assert!((0.0..=1.0).contains(&prediction.confidence));
        prop_assert!(
            ["food", "transport", "shopping", "utilities", "other"]
                .contains(&prediction.category_id.as_str())
        );
    }

    #[test]
    fn dated_prediction_is_bounded(description in "[a-z ]{0,40}", month in 1u32..=12, day in 1u32..=28) {
        let categorizer = trained();
        let date = format!("2024-{:02}-{:02}", month, day);
        let prediction = categorizer.predict(&description, Some(&date)).unwrap();
        prop_assert!((0.0..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn split_partitions_any_ratio(n in 0usize..40, ratio in -0.5f64..1.5, seed in "[a-z]{0,8}") {
        let transactions: Vec<Transaction> = (0..n)
            .map(|i| Transaction::new(format!("t{}", i), "2024-01-01", "x", -1.0, "c"))
            .collect();
        let (train, test) = train_test_split(&transactions, ratio, &seed);
        prop_assert_eq!(train.len() + test.len(), n);
        prop_assert_eq!(train.len(), ((n as f64) * ratio.clamp(0.0, 1.0)).floor() as usize);
    }
}
