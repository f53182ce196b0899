//! Property-based tests for styler composition
//!
//! Uses proptest to verify:
//! 1. Class rules are idempotent and order-preserving unions
//! 2. Style rules only touch the properties they name
//! 3. Pagination renders exactly the requested window
//! 4. Rendering never changes the row count

use proptest::prelude::*;
use polars::prelude::*;
use tablestylelib::{ClassSet, Styler, StylerExt};

fn frame(values: &[i64]) -> DataFrame {
    let doubled: Vec<i64> = values.iter().map(|v| v * 2).collect();
    df!("a" => values.to_vec(), "b" => doubled).unwrap()
}

fn token() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: adding the same classes twice renders like adding them once
    #[test]
    fn test_class_union_is_idempotent(
        values in prop::collection::vec(-50i64..50, 1..12),
        tokens in prop::collection::vec(token(), 1..4),
        threshold in -50i64..50,
    ) {
        let classes = tokens.join(" ");
        let predicate = || Some(col("a").gt(lit(threshold)));

        let mut once = frame(&values).style().unwrap();
        once.set_cell_class("a", classes.as_str(), predicate()).unwrap();

        let mut twice = frame(&values).style().unwrap();
        twice.set_cell_class("a", classes.as_str(), predicate()).unwrap();
        twice.set_cell_class("a", classes.as_str(), predicate()).unwrap();

        prop_assert_eq!(once.render().unwrap(), twice.render().unwrap());
    }

    /// Property: a cell's class attribute is the ordered union of the rules
    /// that selected it
    #[test]
    fn test_class_union_matches_class_set(
        values in prop::collection::vec(-50i64..50, 1..12),
        first in prop::collection::vec(token(), 1..4),
        second in prop::collection::vec(token(), 1..4),
    ) {
        let mut styler = frame(&values).style().unwrap();
        styler
            .set_cell_class("b", first.join(" ").as_str(), None)
            .unwrap()
            .set_cell_class("b", second.join(" ").as_str(), Some(col("a").gt_eq(lit(0))))
            .unwrap();

        let table = styler.to_table().unwrap();
        for (row, value) in table.rows.iter().zip(&values) {
            let mut expected: ClassSet = first.iter().collect();
            if *value >= 0 {
                expected.union(&second.iter().collect());
            }
            prop_assert_eq!(&row.cells[1].class, &expected.to_attr());
            prop_assert_eq!(&row.cells[0].class, "");
        }
    }

    /// Property: a gated style rule never disturbs properties it does not name
    #[test]
    fn test_style_merge_is_per_property(
        values in prop::collection::vec(-50i64..50, 1..12),
        threshold in -50i64..50,
    ) {
        let mut styler = frame(&values).style().unwrap();
        styler
            .set_column_style("a", [("color", "red")])
            .unwrap()
            .set_cell_style("a", col("a").lt(lit(threshold)), [("font-weight", "bold")])
            .unwrap();

        let table = styler.to_table().unwrap();
        for (row, value) in table.rows.iter().zip(&values) {
            let style = &row.cells[0].style;
            prop_assert!(style.contains("color: red"));
            prop_assert_eq!(style.contains("font-weight: bold"), *value < threshold);
        }
    }

    /// Property: a later rule overrides only the rows its predicate selects
    #[test]
    fn test_style_override_is_gated(
        values in prop::collection::vec(-50i64..50, 1..12),
        threshold in -50i64..50,
    ) {
        let mut styler = frame(&values).style().unwrap();
        styler
            .set_column_style("b", [("color", "red")])
            .unwrap()
            .set_cell_style("b", col("a").gt(lit(threshold)), [("color", "blue")])
            .unwrap();

        let table = styler.to_table().unwrap();
        for (row, value) in table.rows.iter().zip(&values) {
            let expected = if *value > threshold { "color: blue" } else { "color: red" };
            prop_assert_eq!(&row.cells[1].style, expected);
        }
    }

    /// Property: pagination renders rows [index * size, (index + 1) * size)
    #[test]
    fn test_pagination_window(
        values in prop::collection::vec(-50i64..50, 0..30),
        index in 0i64..6,
        size in 1i64..8,
    ) {
        let mut styler = frame(&values).style().unwrap();
        styler.paginate(index, size).unwrap();
        let table = styler.to_table().unwrap();

        let start = ((index * size) as usize).min(values.len());
        let end = (((index + 1) * size) as usize).min(values.len());
        let expected: Vec<String> = values[start..end].iter().map(|v| v.to_string()).collect();
        let rendered: Vec<String> = table.rows.iter().map(|r| r.cells[0].content.clone()).collect();

        prop_assert_eq!(rendered, expected);
    }

    /// Property: rendering keeps one row per input row and one cell per
    /// visible column
    #[test]
    fn test_render_preserves_shape(values in prop::collection::vec(-50i64..50, 0..20)) {
        let mut styler = Styler::new(frame(&values)).unwrap();
        styler
            .highlight_max("a", "yellow")
            .unwrap()
            .highlight_decrease("b", "red")
            .unwrap()
            .set_precision("b", 2)
            .unwrap();

        let table = styler.to_table().unwrap();
        prop_assert_eq!(table.rows.len(), values.len());
        prop_assert!(table.rows.iter().all(|r| r.cells.len() == 2));
        prop_assert_eq!(table.labels, vec!["a".to_string(), "b".to_string()]);
    }

    /// Property: header labels are always escaped
    #[test]
    fn test_labels_are_escaped(label in "[<>&\"' a-z]{1,12}") {
        let mut styler = frame(&[1, 2]).style().unwrap();
        styler.relabel([("a", label.as_str())]).unwrap();
        let html = styler.render().unwrap();

        let start = html.find("<th>").unwrap() + "<th>".len();
        let end = start + html[start..].find("</th>").unwrap();
        prop_assert!(!html[start..end].contains('<'));
        prop_assert!(!html[start..end].contains('>'));
    }
}
