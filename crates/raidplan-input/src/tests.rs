use super::*;

#[test]
fn test_health_suffixes_resolved() {
    let table =
        parse_health_csv("Level,A,B\n5,780K,1.5M\n6,2B,250000\n").unwrap();
    assert_eq!(table.health(0, 0), 780_000);
    assert_eq!(table.health(0, 1), 1_500_000);
    assert_eq!(table.health(1, 0), 2_000_000_000);
    assert_eq!(table.health(1, 1), 250_000);
}

#[test]
fn test_health_suffix_case_insensitive() {
    let table = parse_health_csv("Level,A\n1,3m\n2,1b\n").unwrap();
    assert_eq!(table.health(0, 0), 3_000_000);
    assert_eq!(table.health(1, 0), 1_000_000_000);
}

#[test]
fn test_unparseable_health_cell_zero_filled() {
    // The garbage cell becomes zero; the row survives because the other
    // boss has health.
    let table = parse_health_csv("Level,A,B\n1,oops,500\n").unwrap();
    assert_eq!(table.health(0, 0), 0);
    assert_eq!(table.health(0, 1), 500);
}

#[test]
fn test_all_zero_row_dropped_and_offset_moves() {
    let table = parse_health_csv("Level,A\n10,0\n11,100\n").unwrap();
    assert_eq!(table.level_count(), 1);
    assert_eq!(table.level_offset(), 11);
}

#[test]
fn test_rows_sorted_by_level() {
    let table = parse_health_csv("Level,A\n39,200\n37,100\n").unwrap();
    assert_eq!(table.level_offset(), 37);
    assert_eq!(table.health(0, 0), 100);
    assert_eq!(table.health(1, 0), 200);
}

#[test]
fn test_negative_health_zero_filled() {
    let table = parse_health_csv("Level,A,B\n1,-50,700\n").unwrap();
    assert_eq!(table.health(0, 0), 0);
}

#[test]
fn test_ragged_health_row_rejected() {
    let err = parse_health_csv("Level,A,B\n1,100\n").unwrap_err();
    assert!(matches!(err, TableError::Invalid(_)));
}

#[test]
fn test_missing_header_rejected() {
    assert!(matches!(
        parse_health_csv(""),
        Err(TableError::Invalid(_))
    ));
    assert!(matches!(
        parse_health_csv("Level\n1\n"),
        Err(TableError::Invalid(_))
    ));
}

#[test]
fn test_damage_table_parsed() {
    let table = parse_damage_csv(
        "boss,level,Ash,Birch\nIronclad,0,1000,2000\nIronclad,1,500,900\n",
    )
    .unwrap();
    assert_eq!(table.commander_names(), &["Ash", "Birch"]);
    assert_eq!(table.damage_row("Ironclad", 1), Some(&[500, 900][..]));
}

#[test]
fn test_damage_cell_decimal_tolerated() {
    let table = parse_damage_csv("boss,level,Ash\nIronclad,0,1500000.0\n").unwrap();
    assert_eq!(table.damage_row("Ironclad", 0), Some(&[1_500_000][..]));
}

#[test]
fn test_unparseable_damage_cell_zero_filled() {
    let table = parse_damage_csv("boss,level,Ash\nIronclad,0,n/a\n").unwrap();
    assert_eq!(table.damage_row("Ironclad", 0), Some(&[0][..]));
}

#[test]
fn test_damage_non_integer_level_rejected() {
    let err = parse_damage_csv("boss,level,Ash\nIronclad,first,100\n").unwrap_err();
    assert!(matches!(err, TableError::Invalid(_)));
}

#[test]
fn test_windows_line_endings() {
    let table = parse_health_csv("Level,A\r\n1,100\r\n").unwrap();
    assert_eq!(table.health(0, 0), 100);
}
