//! Reformat a SQL script with the different indentation styles.

use sqlindent::{FormatOptions, LetterCase, OutputFormat};

fn main() {
    let input = "select a, b as total, case when c = 1 then 'one' else 'many' end \
                 from t join u on t.id = u.id where a > 1 and b < 2 order by a; \
                 insert into t (a, b) values (1, 2), (3, 4)";

    let plain = FormatOptions::new()
        .reindent(true)
        .keyword_case(LetterCase::Upper);
    let output = sqlindent::format(input, &plain).expect("format failed");
    println!("Reindented:\n{output}\n");

    let aligned = FormatOptions::new().reindent_aligned(true);
    let output = sqlindent::format(input, &aligned).expect("format failed");
    println!("Aligned:\n{output}\n");

    let python = FormatOptions::new()
        .reindent(true)
        .output_format(OutputFormat::Python);
    let output = sqlindent::format(input, &python).expect("format failed");
    println!("As Python:\n{output}\n");

    // Rejected options surface as errors
    match sqlindent::format(input, &FormatOptions::new().truncate_strings(1)) {
        Ok(_) => println!("Formatted OK (unexpected)"),
        Err(e) => println!("Error: {e}"),
    }
}
