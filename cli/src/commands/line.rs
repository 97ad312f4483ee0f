use colored::*;

use hostsieve_core::parser;

use crate::terminal::print;

pub fn line(text: &str) {
    match parser::parse_line(text) {
        Some(domain) => print::aligned_line("Domain", domain.to_string().green().bold()),
        None => print::aligned_line("Domain", "none".red()),
    }
}
