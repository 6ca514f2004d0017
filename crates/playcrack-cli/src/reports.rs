use playcrack_core::key::Key;

/// Prints a key as its 5x5 square.
pub fn print_square(title: &str, key: &Key) {
    println!("\n=== {title} ===");
    for row in key.rows() {
        let line: Vec<String> = row.iter().map(|&c| (c as char).to_string()).collect();
        println!("  {}", line.join(" "));
    }
    println!();
}
