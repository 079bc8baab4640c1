//! A trivial greeting program, kept around for basic build and target
//! sanity checking. No design content lives here.
use std::env;

fn main() {
    let name = env::args().nth(1).unwrap_or_else(|| "world".to_string());

    // Formal.
    println!("Hello, {name}!");
    println!("Goodbye, {name}!");

    // Informal.
    println!("Hi, {name}!");
    println!("Bye, {name}!");
}
