use corpus_ingest::sources::adapter_for;
use corpus_ingest::sources::cgs::parser::split_sections;
use corpus_ingest::types::{SourceDocument, SourceKind};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::{Duration, Instant};

fn count_xml_events(xml: &str) -> Result<usize, String> {
    let mut reader = Reader::from_str(xml);
    let mut count = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => count += 1,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {:?}",
                    reader.error_position(),
                    e
                ))
            }
        }
    }
    Ok(count)
}

/// Cheapest pass over the input: XML events for USLM, anchor slicing for HTML.
fn baseline(source: SourceKind, markup: &str) -> Result<usize, String> {
    match source {
        SourceKind::Usc => count_xml_events(markup),
        SourceKind::Cgs => Ok(split_sections(markup).len()),
    }
}

fn summarize(durations: &[Duration]) -> (f64, f64) {
    let secs = durations.iter().map(Duration::as_secs_f64);
    let avg = secs.clone().sum::<f64>() / durations.len().max(1) as f64;
    let min = secs.fold(f64::INFINITY, f64::min);
    (avg, min)
}

fn main() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let (Some(source_arg), Some(path)) = (args.next(), args.next()) else {
        return Err("Usage: bench_parser <cgs|usc> <file>".to_string());
    };
    let source =
        SourceKind::parse(&source_arg).ok_or_else(|| format!("unknown source: {source_arg}"))?;
    let markup =
        std::fs::read_to_string(&path).map_err(|e| format!("Failed to read {path}: {e}"))?;
    let document = SourceDocument::new(path.clone(), markup);
    let adapter = adapter_for(source);

    let iterations = 5;

    let _ = baseline(source, &document.markup)?;
    let mut baseline_durations = Vec::new();
    for i in 0..iterations {
        let start = Instant::now();
        let units = baseline(source, &document.markup)?;
        let elapsed = start.elapsed();
        baseline_durations.push(elapsed);
        println!(
            "Baseline {}: {:.3}s ({} units)",
            i + 1,
            elapsed.as_secs_f64(),
            units
        );
    }
    let (baseline_avg, baseline_min) = summarize(&baseline_durations);
    println!("Baseline avg: {:.3}s, min: {:.3}s\n", baseline_avg, baseline_min);

    let _ = adapter.extract(&document);
    let mut durations = Vec::new();
    for i in 0..iterations {
        let start = Instant::now();
        let extract = adapter.extract(&document);
        let elapsed = start.elapsed();
        durations.push(elapsed);
        println!(
            "Iteration {}: {:.3}s ({} chapters, {} sections, {} warnings)",
            i + 1,
            elapsed.as_secs_f64(),
            extract.chapters.len(),
            extract.sections.len(),
            extract.warnings.len(),
        );
    }

    let (avg, min) = summarize(&durations);
    println!("\nExtract avg: {:.3}s, min: {:.3}s", avg, min);
    println!("Overhead vs baseline: {:.1}x", avg / baseline_avg.max(f64::EPSILON));
    Ok(())
}
