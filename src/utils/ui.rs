use crate::core::formatter::{is_complete, normalize, CNPJ_DIGITS};
use crate::core::presenter::{render_line, Line, RecordView};
use colored::*;

pub fn print_view(view: &RecordView) {
    println!("\n{}", "Resultado da Consulta".bold().magenta());

    for section in &view.sections {
        println!("\n{}", section.title.bold().cyan());
        println!("{}", "─".repeat(section.title.chars().count()).cyan());
        for line in &section.lines {
            match line {
                Line::Badge(badge) if badge.active => {
                    println!("Situação Cadastral: {}", badge.text.green().bold())
                }
                Line::Badge(badge) => println!("Situação Cadastral: {}", badge.text.red().bold()),
                Line::Heading(heading) => println!("{}", heading.dimmed()),
                Line::Item { key, value } => println!("  {}  {}", key.yellow(), value),
                other => println!("{}", render_line(other)),
            }
        }
    }
}

pub fn print_prompt(masked: &str) {
    if masked.is_empty() {
        println!("{}", "Digite o CNPJ (00.000.000/0000-00):".bold());
    } else if is_complete(masked) {
        println!("{} {}", "CNPJ:".bold(), masked);
    } else {
        let typed = normalize(masked).len();
        println!(
            "{} {} {}",
            "CNPJ:".bold(),
            masked,
            format!("({}/{} dígitos)", typed, CNPJ_DIGITS).yellow()
        );
    }
}

pub fn print_loading(masked: &str) {
    println!("{} {}", "…".blue(), format!("Consultando {}", masked).dimmed());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}
