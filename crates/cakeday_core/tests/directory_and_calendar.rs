use cakeday_core::db::open_db_in_memory;
use cakeday_core::{
    CakeSize, Celebration, CelebrationRepository, Person, PersonRepository, RepoError,
    SqliteCelebrationRepository, SqlitePersonRepository,
};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn insert_if_absent_ignores_duplicate_name_and_birthday() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let john = Person::new("John Doe", date(1990, 6, 15)).unwrap();
    let jane = Person::new("Jane Smith", date(1985, 12, 25)).unwrap();
    let other_john = Person::new("John Doe", date(1991, 6, 15)).unwrap();

    assert!(repo.insert_if_absent(&john).unwrap());
    assert!(!repo.insert_if_absent(&john).unwrap());
    assert!(repo.insert_if_absent(&jane).unwrap());
    assert!(repo.insert_if_absent(&other_john).unwrap());

    assert_eq!(repo.count_people().unwrap(), 3);
    assert_eq!(repo.list_people().unwrap(), vec![john, jane, other_john]);
}

#[test]
fn insert_rejects_blank_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let blank = Person {
        name: "   ".to_string(),
        date_of_birth: date(1990, 1, 2),
    };
    let err = repo.insert_if_absent(&blank).unwrap_err();
    assert!(matches!(err, RepoError::InvalidPerson(_)));
    assert_eq!(repo.count_people().unwrap(), 0);
}

#[test]
fn batch_import_counts_new_rows_and_skips_known_ones() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let dave = Person::new("Dave", date(1986, 6, 13)).unwrap();
    let rob = Person::new("Rob", date(1950, 7, 6)).unwrap();
    repo.insert_if_absent(&dave).unwrap();

    let added = repo
        .insert_all_if_absent(&[dave.clone(), rob.clone(), rob.clone()])
        .unwrap();
    assert_eq!(added, 1);
    assert_eq!(repo.list_people().unwrap(), vec![dave, rob]);
}

#[test]
fn batch_import_with_an_invalid_person_stores_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let batch = [
        Person::new("Dave", date(1986, 6, 13)).unwrap(),
        Person {
            name: String::new(),
            date_of_birth: date(1990, 1, 2),
        },
        Person::new("Rob", date(1950, 7, 6)).unwrap(),
    ];
    let err = repo.insert_all_if_absent(&batch).unwrap_err();
    assert!(matches!(err, RepoError::InvalidPerson(_)));
    assert_eq!(repo.count_people().unwrap(), 0);
}

#[test]
fn replace_year_round_trips_in_date_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCelebrationRepository::try_new(&conn).unwrap();

    let celebrations = vec![
        Celebration::new(date(2025, 6, 16), names(&["Dave"])),
        Celebration::new(date(2025, 7, 16), names(&["Sam", "Kate"])),
        Celebration::new(date(2026, 1, 2), names(&["Eve"])),
    ];
    let mut shuffled = celebrations.clone();
    shuffled.reverse();

    repo.replace_year(2025, &shuffled).unwrap();
    let loaded = repo.list_for_year(2025).unwrap();

    assert_eq!(loaded, celebrations);
    assert_eq!(loaded[1].size, CakeSize::Large);
    assert_eq!(loaded[1].attendees, vec!["Sam", "Kate"]);
}

#[test]
fn replace_year_discards_previous_rows_of_that_year_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCelebrationRepository::try_new(&conn).unwrap();

    repo.replace_year(2024, &[Celebration::new(date(2024, 7, 15), names(&["Old"]))])
        .unwrap();
    repo.replace_year(2025, &[Celebration::new(date(2025, 6, 16), names(&["Dave"]))])
        .unwrap();
    repo.replace_year(2025, &[Celebration::new(date(2025, 3, 4), names(&["New"]))])
        .unwrap();

    let current = repo.list_for_year(2025).unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].attendees, vec!["New"]);

    let previous = repo.list_for_year(2024).unwrap();
    assert_eq!(previous.len(), 1);
    assert_eq!(previous[0].date, date(2024, 7, 15));
}

#[test]
fn invalid_celebration_leaves_stored_year_untouched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCelebrationRepository::try_new(&conn).unwrap();

    repo.replace_year(2025, &[Celebration::new(date(2025, 6, 16), names(&["Dave"]))])
        .unwrap();

    let err = repo
        .replace_year(2025, &[Celebration::new(date(2025, 6, 17), Vec::new())])
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidCelebration(_)));

    let duplicate = Celebration::new(date(2025, 8, 1), names(&["A"]));
    let err = repo
        .replace_year(2025, &[duplicate.clone(), duplicate])
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    let stored = repo.list_for_year(2025).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].attendees, vec!["Dave"]);
}

#[test]
fn corrupt_rows_are_reported_instead_of_masked() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO celebrations (year, date, cake_size, names)
         VALUES (2025, '2025-06-16', 'large', '[\"Dave\"]');",
        [],
    )
    .unwrap();
    let repo = SqliteCelebrationRepository::try_new(&conn).unwrap();

    let err = repo.list_for_year(2025).unwrap_err();
    assert!(matches!(err, RepoError::InvalidCelebration(_)));
}
