// Dev utility: generate a student CSV sheet for import testing.
//
// Usage:
//   cargo run --bin generate_student_data -- [out.csv] [rows] [bad_every]
//
// bad_every > 0 makes every Nth row carry an unparseable Roll value.

use std::error::Error;
use student_roster::importer::student_sheet_headers;

const DEFAULT_ROW_COUNT: usize = 1000;
const FIRST_NAMES: [&str; 8] = ["Ada", "Alan", "Grace", "Linus", "Barbara", "Ken", "Margaret", "Dennis"];
const LAST_NAMES: [&str; 8] = ["Lovelace", "Turing", "Hopper", "Torvalds", "Liskov", "Thompson", "Hamilton", "Ritchie"];
const EDUCATIONS: [&str; 4] = ["High School", "BSc", "MSc", "PhD"];
const OCCUPATIONS: [&str; 4] = ["Engineer", "Teacher", "Analyst", "Designer"];

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let out_path = args.next().unwrap_or_else(|| "students.csv".to_string());
    let row_count = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ROW_COUNT);
    let bad_every = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(0);

    let mut writer = csv::Writer::from_path(&out_path)?;
    writer.write_record(student_sheet_headers())?;

    for i in 0..row_count {
        let first = FIRST_NAMES[i % FIRST_NAMES.len()];
        let last = LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()];
        let roll = if bad_every > 0 && (i + 1) % bad_every == 0 {
            "seven".to_string()
        } else {
            (i + 1).to_string()
        };
        let age = 18 + (i % 40);
        let gender = if i % 2 == 0 { "Female" } else { "Male" };
        let marital = if i % 3 == 0 { "Married" } else { "Single" };
        let experience = i % 20;
        let salary = format!("{}.{:02}", 30_000 + (i % 50) * 1_000, i % 100);

        writer.write_record([
            first.to_string(),
            last.to_string(),
            roll,
            age.to_string(),
            format!("0170{:07}", i % 10_000_000),
            format!("{}.{}{}@example.com", first.to_lowercase(), last.to_lowercase(), i),
            gender.to_string(),
            EDUCATIONS[i % EDUCATIONS.len()].to_string(),
            OCCUPATIONS[i % OCCUPATIONS.len()].to_string(),
            experience.to_string(),
            salary,
            marital.to_string(),
            (i % 4).to_string(),
        ])?;
    }

    writer.flush()?;
    println!("wrote {} rows to {}", row_count, out_path);
    Ok(())
}
