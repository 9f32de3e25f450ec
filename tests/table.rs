use hotel_booking_api::{
    error::AppError,
    routes::params::SortOrder,
    table::{Cell, Column, DataTable, TableQuery},
};

#[derive(Debug, Clone, PartialEq)]
struct Row {
    name: &'static str,
    quantity: i64,
}

fn table() -> DataTable<Row> {
    DataTable::new(vec![
        Column::new("name", "Tên", |row: &Row| Cell::text(row.name)),
        Column::new("quantity", "Số lượng", |row: &Row| Cell::Int(row.quantity)),
    ])
}

fn rows() -> Vec<Row> {
    (1..=25)
        .map(|n| Row {
            name: if n % 2 == 0 { "Khăn tắm" } else { "Dầu gội" },
            quantity: n,
        })
        .collect()
}

#[test]
fn default_page_holds_ten_rows() {
    let (page, meta) = table().apply(rows(), &TableQuery::default()).unwrap();
    assert_eq!(page.items.len(), 10);
    assert_eq!(meta.page, Some(1));
    assert_eq!(meta.per_page, Some(10));
    assert_eq!(meta.total, Some(25));
    assert_eq!(page.columns[1].key, "quantity");
    assert_eq!(page.columns[1].header, "Số lượng");
}

#[test]
fn filter_is_case_insensitive_and_counts_matches() {
    let query = TableQuery {
        q: Some("KHĂN".into()),
        ..Default::default()
    };
    let (page, meta) = table().apply(rows(), &query).unwrap();
    assert_eq!(meta.total, Some(12));
    assert!(page.items.iter().all(|row| row.name == "Khăn tắm"));
}

#[test]
fn sort_descending_then_paginate() {
    let query = TableQuery {
        page: Some(3),
        per_page: Some(10),
        sort_by: Some("quantity".into()),
        sort_order: Some(SortOrder::Desc),
        ..Default::default()
    };
    let (page, _) = table().apply(rows(), &query).unwrap();
    let quantities: Vec<i64> = page.items.iter().map(|row| row.quantity).collect();
    assert_eq!(quantities, vec![5, 4, 3, 2, 1]);
}

#[test]
fn unknown_sort_column_is_a_bad_request() {
    let query = TableQuery {
        sort_by: Some("price".into()),
        ..Default::default()
    };
    let err = table().apply(rows(), &query).err().expect("error");
    assert!(matches!(err, AppError::BadRequest(message) if message.contains("price")));
}

#[test]
fn empty_cells_sort_first() {
    use std::cmp::Ordering;
    assert_eq!(Cell::Empty.compare(&Cell::Int(0)), Ordering::Less);
    assert_eq!(
        Cell::text("apple").compare(&Cell::text("Banana")),
        Ordering::Less
    );
}

#[test]
fn far_out_pages_are_empty_not_a_crash() {
    let query = TableQuery {
        page: Some(i64::MAX),
        per_page: Some(100),
        ..Default::default()
    };
    let (page, meta) = table().apply(rows(), &query).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(meta.page, Some(i64::MAX));
    assert_eq!(meta.total, Some(25));
}

#[test]
fn pagination_offset_saturates() {
    use hotel_booking_api::routes::params::Pagination;
    let huge = Pagination {
        page: Some(i64::MAX),
        per_page: None,
    };
    assert_eq!(huge.normalize(), (i64::MAX, 10, i64::MAX));

    let negative = Pagination {
        page: Some(-4),
        per_page: Some(500),
    };
    assert_eq!(negative.normalize(), (1, 100, 0));
}
