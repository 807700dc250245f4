use corpus_ingest::content::section_content;
use corpus_ingest::ingest::ingest_documents;
use corpus_ingest::runtime::mirror::{read_documents, MirrorSource};
use corpus_ingest::types::{Section, SourceKind};
use serde_json::{json, Value};

type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), DynError> {
    let mut args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.len() != 3 {
        eprintln!("Usage: explore <cgs|usc> <mirror_dir> <section_id_substring>");
        std::process::exit(2);
    }

    let source_arg = args.remove(0);
    let mirror_dir = args.remove(0);
    let needle = args.remove(0);

    let source =
        SourceKind::parse(&source_arg).ok_or_else(|| format!("unknown source: {source_arg}"))?;

    let documents = read_documents(&MirrorSource::new(&mirror_dir)).await?;
    let outcome = tokio::task::spawn_blocking(move || ingest_documents(source, &documents)).await?;

    println!("report: |-");
    print_indented_json(&serde_json::to_value(&outcome.report)?, 2);

    let matched = outcome
        .corpus
        .sections()
        .iter()
        .filter(|section| section.section_id.contains(&needle))
        .collect::<Vec<_>>();

    if matched.is_empty() {
        println!("matches: []");
        return Ok(());
    }

    println!("matches:");
    for section in matched {
        print_section(source, section);
    }

    Ok(())
}

fn print_section(source: SourceKind, section: &Section) {
    println!("  - section_id: {}", section.section_id);
    println!("    label: {}", section.section_label);
    let identity = json!({
        "title_id": section.title_id,
        "chapter_id": section.chapter_id,
        "section_number": section.section_number,
        "range_start": section.range_start,
        "range_end": section.range_end,
        "prev_section_id": section.prev_section_id,
        "next_section_id": section.next_section_id,
        "source_file": section.source_file,
    });
    println!("    identity_json: |-");
    print_indented_json(&identity, 6);

    let content = section_content(source, section);
    println!("    blocks:");
    for block in &content.blocks {
        println!("      - type: {}", block.kind.as_str());
        match &block.label {
            Some(label) => println!("        label: {label}"),
            None => println!("        label: null"),
        }
        println!("        content: |-");
        if block.content.is_empty() {
            println!("          ");
        } else {
            for line in block.content.lines() {
                println!("          {line}");
            }
        }
    }
    if !section.blocks.see_also.is_empty() {
        println!("    see_also: |-");
        for line in section.blocks.see_also.lines() {
            println!("      {line}");
        }
    }
}

fn print_indented_json(value: &Value, indent: usize) {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    let pad = " ".repeat(indent);
    for line in pretty.lines() {
        println!("{pad}{line}");
    }
}
