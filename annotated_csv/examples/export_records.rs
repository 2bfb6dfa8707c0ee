//! Example: Export annotated records to CSV
//!
//! Writes a few employee records, which embed a `Person` parent record, to a
//! CSV file in the given encoding.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example export_records -- [output.csv] [encoding]
//! ```

use annotated_csv::{output_to_file, write, write_header, CsvRecord};
use std::env;
use std::error::Error;
use std::path::PathBuf;

#[derive(CsvRecord)]
struct Person {
    #[csv(column_name = "Name")]
    name: String,
    #[csv(mask = "****-**-****")]
    national_id: Option<String>,
}

#[derive(CsvRecord)]
#[csv(include_parent)]
struct Employee {
    #[csv(order = 0)]
    id: u32,
    department: String,
    #[csv(ignore)]
    salary: u64,
    #[csv(parent)]
    person: Person,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 3 {
        eprintln!("Usage: {} [output.csv] [encoding]", args[0]);
        std::process::exit(1);
    }
    let output_path = PathBuf::from(args.get(1).map_or("employees.csv", String::as_str));
    let encoding = args.get(2).map_or("utf-8", String::as_str);

    let employees = vec![
        Employee {
            id: 1,
            department: "Engineering".into(),
            salary: 120_000,
            person: Person {
                name: "Ada Lovelace".into(),
                national_id: Some("123-45-6789".into()),
            },
        },
        Employee {
            id: 2,
            department: "Research".into(),
            salary: 95_000,
            person: Person {
                name: "Zoë Ångström".into(),
                national_id: None,
            },
        },
    ];
    let total_salary: u64 = employees.iter().map(|e| e.salary).sum();

    println!("Columns: {}", write_header::<Employee>().trim_end());
    let text = write(&employees, true)?;
    output_to_file(&text, &output_path, encoding)?;

    println!(
        "Exported {} employees (total salary {} not exported) to {:?} as {}",
        employees.len(),
        total_salary,
        output_path,
        encoding
    );
    println!("---");
    print!("{text}");
    println!("---");

    Ok(())
}
