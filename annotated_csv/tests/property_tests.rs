//! Property-based tests for header/row assembly
//!
//! Output is read back with the `csv` crate; generated values avoid `"` and
//! line breaks, which are written unescaped.

use annotated_csv::{write, write_bytes, write_header, CsvRecord};
use proptest::prelude::*;

#[derive(CsvRecord, Debug, Clone)]
struct Account {
    #[csv(order = 2)]
    id: u64,
    #[csv(column_name = "Owner")]
    owner: String,
    #[csv(ignore, order = 0, column_name = "Internal", mask = "visible?")]
    internal: String,
    #[csv(mask = "****")]
    pin: Option<String>,
    note: Option<String>,
    #[csv(order = 0)]
    region: String,
}

fn cell_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,;:._-]{0,16}"
}

fn account_strategy() -> impl Strategy<Value = Account> {
    (
        any::<u64>(),
        cell_strategy(),
        cell_strategy(),
        prop::option::of(cell_strategy()),
        prop::option::of(cell_strategy()),
        cell_strategy(),
    )
        .prop_map(|(id, owner, internal, pin, note, region)| Account {
            id,
            owner,
            internal,
            pin,
            note,
            region,
        })
}

fn read_back(text: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes())
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

proptest! {
    #[test]
    fn prop_header_and_rows_have_same_arity(accounts in prop::collection::vec(account_strategy(), 1..8)) {
        let text = write(&accounts, true).unwrap();
        let lines = read_back(&text);
        prop_assert_eq!(lines.len(), accounts.len() + 1);
        for line in &lines {
            prop_assert_eq!(line.len(), lines[0].len());
        }
    }

    #[test]
    fn prop_ignored_field_never_appears(accounts in prop::collection::vec(account_strategy(), 1..8)) {
        let text = write(&accounts, true).unwrap();
        prop_assert!(!text.contains("Internal"));
        prop_assert!(!text.contains("visible?"));
        let lines = read_back(&text);
        prop_assert_eq!(&lines[0], &vec!["region", "Owner", "id", "pin", "note"]);
    }

    #[test]
    fn prop_mask_is_unconditional(accounts in prop::collection::vec(account_strategy(), 1..8)) {
        let lines = read_back(&write(&accounts, false).unwrap());
        for (line, account) in lines.iter().zip(&accounts) {
            prop_assert_eq!(&line[3], "****");
            prop_assert_eq!(&line[0], &account.region);
            prop_assert_eq!(&line[1], &account.owner);
            prop_assert_eq!(&line[2], &account.id.to_string());
            prop_assert_eq!(&line[4], account.note.as_deref().unwrap_or(""));
        }
    }

    #[test]
    fn prop_ascii_output_is_identical_in_ascii_compatible_encodings(accounts in prop::collection::vec(account_strategy(), 0..4)) {
        let text = write(&accounts, true).unwrap();
        for encoding in ["utf-8", "windows-1252", "shift_jis"] {
            prop_assert_eq!(write_bytes(&accounts, encoding, true).unwrap(), text.as_bytes().to_vec());
        }
    }
}

#[test]
fn test_header_matches_planned_order() {
    assert_eq!(
        write_header::<Account>(),
        "\"region\",\"Owner\",\"id\",\"pin\",\"note\"\n"
    );
}
