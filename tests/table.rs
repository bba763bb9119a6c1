mod common;

use common::{generated_rows, rows};
use result_lens::{
    data::Value,
    metadata::{ColumnMetadata, SemanticType},
    table::{
        EMPTY_TABLE_MESSAGE, SortDirection, SortState, TableSettings, TableView, sort_rows,
    },
};
use serde_json::json;

fn sort(column: &str, direction: SortDirection) -> SortState {
    SortState {
        column: column.to_string(),
        direction,
    }
}

fn column_values<'a>(data: &'a [result_lens::data::Row], field: &str) -> Vec<Option<&'a Value>> {
    data.iter().map(|row| row.get(field)).collect()
}

#[test]
fn nulls_and_missing_sort_last_both_ways() {
    let data = rows(json!([
        {"name": "b", "v": 2},
        {"name": "A", "v": null},
        {"name": "c", "v": 1},
        {"name": "d"}
    ]));

    let asc = sort_rows(&data, Some(&sort("v", SortDirection::Asc)));
    let names: Vec<String> = asc.iter().map(|r| r["name"].as_display()).collect();
    assert_eq!(names, vec!["c", "b", "A", "d"]);

    let desc = sort_rows(&data, Some(&sort("v", SortDirection::Desc)));
    let names: Vec<String> = desc.iter().map(|r| r["name"].as_display()).collect();
    assert_eq!(names, vec!["b", "c", "A", "d"]);
}

#[test]
fn text_sorts_case_insensitively() {
    let data = rows(json!([{"name": "banana"}, {"name": "Apple"}, {"name": "cherry"}]));
    let sorted = sort_rows(&data, Some(&sort("name", SortDirection::Asc)));
    assert_eq!(
        column_values(&sorted, "name"),
        vec![
            Some(&Value::from("Apple")),
            Some(&Value::from("banana")),
            Some(&Value::from("cherry"))
        ]
    );
}

#[test]
fn accented_text_sorts_by_base_letter() {
    let data = rows(json!([{"name": "Zoe"}, {"name": "Émile"}, {"name": "Adam"}, {"name": "éclair"}]));
    let sorted = sort_rows(&data, Some(&sort("name", SortDirection::Asc)));
    let names: Vec<String> = sorted.iter().map(|r| r["name"].as_display()).collect();
    assert_eq!(names, vec!["Adam", "éclair", "Émile", "Zoe"]);
}

#[test]
fn unsorted_keeps_input_order() {
    let data = rows(json!([{"n": 3}, {"n": 1}, {"n": 2}]));
    assert_eq!(sort_rows(&data, None), data);
}

#[test]
fn sort_toggle_cycles_and_resets_page() {
    let start = TableSettings {
        page: 3,
        ..TableSettings::default()
    };
    let asc = start.toggle_sort("total");
    assert_eq!(asc.sort, Some(sort("total", SortDirection::Asc)));
    assert_eq!(asc.page, 1);

    let desc = asc.toggle_sort("total");
    assert_eq!(desc.sort, Some(sort("total", SortDirection::Desc)));

    let cleared = desc.toggle_sort("total");
    assert_eq!(cleared.sort, None);

    let other = desc.toggle_sort("region");
    assert_eq!(other.sort, Some(sort("region", SortDirection::Asc)));
}

#[test]
fn page_transitions_are_clamped() {
    let settings = TableSettings::default();
    assert_eq!(settings.total_pages(25), 3);
    assert_eq!(settings.with_page(9, 25).page, 3);
    assert_eq!(settings.with_page(0, 25).page, 1);
    assert_eq!(settings.previous_page(25).page, 1);
    assert_eq!(settings.next_page(25).next_page(25).next_page(25).page, 3);

    let resized = settings.with_page(3, 25).with_rows_per_page(25);
    assert_eq!(resized.page, 1);
    assert_eq!(resized.total_pages(25), 1);
}

#[test]
fn view_slices_the_requested_page() {
    let data = generated_rows(25, |i| json!({"id": i + 1, "label": format!("row {}", i + 1)}));
    let settings = TableSettings::default().with_page(3, data.len());
    let view = TableView::build(&data, &[], &settings);

    assert_eq!(view.total_rows, 25);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.cells.len(), 5);
    assert_eq!(view.cells[0], vec!["21", "row 21"]);
    assert_eq!(view.range_label(), "Showing 21 to 25 of 25 results");
    assert_eq!(view.page_label(), "Page 3 of 3");
    assert!(view.has_previous());
    assert!(!view.has_next());
}

#[test]
fn view_clamps_pages_past_the_end() {
    let data = generated_rows(25, |i| json!({"id": i + 1}));
    let settings = TableSettings {
        page: 9,
        ..TableSettings::default()
    };
    let view = TableView::build(&data, &[], &settings);
    assert_eq!(view.page, 3);
    assert_eq!(view.cells.len(), 5);
    assert_eq!(view.range_label(), "Showing 21 to 25 of 25 results");

    let huge = TableSettings {
        page: usize::MAX,
        rows_per_page: usize::MAX,
        sort: None,
    };
    let view = TableView::build(&data, &[], &huge);
    assert_eq!(view.page, 1);
    assert_eq!(view.range_label(), "Showing 1 to 25 of 25 results");
}

#[test]
fn view_formats_cells_and_flattens_rows() {
    let data = rows(json!([
        {"_id": "Acme", "orders": [{"amount": 1500, "day": "2024-03-05"}, {"amount": 99, "day": "2024-04-01"}]},
        {"_id": "Globex", "orders": [{"amount": 250.5, "day": "2024-03-21"}]}
    ]));
    let metadata = vec![
        ColumnMetadata::new("amount", SemanticType::Money),
        ColumnMetadata::new("day", SemanticType::Date),
    ];
    let settings = TableSettings::default().toggle_sort("amount").toggle_sort("amount");
    let view = TableView::build(&data, &metadata, &settings);

    assert_eq!(view.columns, vec!["group", "amount", "day"]);
    assert_eq!(view.headers, vec!["Group", "Amount", "Day"]);
    assert_eq!(view.numeric, vec![false, true, false]);
    assert_eq!(
        view.cells,
        vec![
            vec!["Acme", "$1,500.00", "5th Mar 2024"],
            vec!["Globex", "$250.50", "21st Mar 2024"],
            vec!["Acme", "$99.00", "1st Apr 2024"],
        ]
    );
}

#[test]
fn render_aligns_numbers_and_prints_footer() {
    let data = rows(json!([
        {"region": "West", "spend": 1500},
        {"region": "East", "spend": 250}
    ]));
    let metadata = vec![ColumnMetadata::new("spend", SemanticType::Money)];
    let view = TableView::build(&data, &metadata, &TableSettings::default());
    let rendered = view.render();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Region      Spend",
            "------  ---------",
            "West    $1,500.00",
            "East      $250.00",
            "",
            "Showing 1 to 2 of 2 results  |  Page 1 of 1",
        ]
    );
}

#[test]
fn sorted_header_is_marked() {
    let data = rows(json!([{"region": "West", "n": 1}, {"region": "East", "n": 2}]));
    let settings = TableSettings::default().toggle_sort("n").toggle_sort("n");
    let rendered = TableView::build(&data, &[], &settings).render();
    assert!(rendered.lines().next().unwrap_or_default().contains("N ↓"));
}

#[test]
fn empty_results_render_a_message() {
    let view = TableView::build(&[], &[], &TableSettings::default());
    assert_eq!(view.total_rows, 0);
    assert_eq!(view.total_pages, 0);
    assert_eq!(view.render().trim_end(), EMPTY_TABLE_MESSAGE);
}
