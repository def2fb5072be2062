use crate::{emit_success, OutputMode};
use std::path::Path;
use std::time::{Duration, Instant};
use symcorpus::config::{write_config, CorpusConfig};
use symcorpus::ingest::{discover_inputs, ingest_files, IngestReport};
use symcorpus::ui::{
    complete, dim, header, info, member_table, phase, section, stats_table, success, summary_row, timing, warn,
    MemberRow, ProgressManager, Spinner,
};
use symcorpus::{Access, Corpus, CorpusBuilder, Symbol};

struct Loaded {
    corpus: Corpus,
    report: IngestReport,
    elapsed: Duration,
}

/// Ingest the inputs and freeze them into a corpus
fn load_corpus(output_mode: OutputMode, config: &CorpusConfig, input: &[String]) -> anyhow::Result<Loaded> {
    let patterns = if input.is_empty() { config.input.as_slice() } else { input };
    if patterns.is_empty() {
        anyhow::bail!("no inputs given (use --input or set `input` in the config file)");
    }

    let paths = discover_inputs(patterns)?;
    if paths.is_empty() {
        anyhow::bail!("no fragment files match {}", patterns.join(", "));
    }

    let start = Instant::now();
    let builder = CorpusBuilder::new();
    let threads = config.worker_threads();

    let (report, corpus) = if output_mode.is_human() {
        header("Building symbol corpus");
        info("Inputs", &format!("{} files on {} threads", paths.len(), threads));

        let (mut progress, tx) = ProgressManager::new(paths.len());
        let report = ingest_files(&paths, &builder, threads, Some(&tx));
        drop(tx);
        progress.join();
        if !report.is_consistent() {
            progress.clear();
            return Err(inconsistent(&report));
        }

        progress.start_linking();
        let corpus = builder.build();
        progress.finish_linking();
        progress.clear();
        (report, corpus?)
    } else {
        let report = ingest_files(&paths, &builder, threads, None);
        if !report.is_consistent() {
            return Err(inconsistent(&report));
        }
        (report, builder.build()?)
    };

    if output_mode.is_human() {
        for failed in &report.failed {
            warn(&format!("Skipped {}: {}", failed.path, failed.error));
        }
    }

    Ok(Loaded {
        corpus,
        report,
        elapsed: start.elapsed(),
    })
}

fn inconsistent(report: &IngestReport) -> anyhow::Error {
    let details: Vec<String> = report
        .violations
        .iter()
        .map(|v| format!("{}: {}", v.path, v.error))
        .collect();
    anyhow::anyhow!(
        "{} input file(s) hold inconsistent fragments\n  {}",
        report.violations.len(),
        details.join("\n  ")
    )
}

fn resolve<'a>(corpus: &'a Corpus, name: Option<&str>) -> anyhow::Result<&'a Symbol> {
    match name {
        Some(name) => Ok(corpus.find_by_qualified_name(name)?),
        None => Ok(corpus.global_namespace()),
    }
}

pub fn run_init(output_mode: OutputMode, path: &Path, force: bool) -> anyhow::Result<()> {
    write_config(path, &CorpusConfig::default(), force)?;
    if output_mode.is_human() {
        success(&format!("Wrote {}", path.display()));
    } else {
        emit_success(output_mode, "init", serde_json::json!({ "path": path.display().to_string() }))?;
    }
    Ok(())
}

pub fn run_build(
    output_mode: OutputMode,
    config: &CorpusConfig,
    input: &[String],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let loaded = load_corpus(output_mode, config, input)?;
    let corpus = &loaded.corpus;
    let stats = corpus.stats();

    let spinner = output_mode.is_human().then(|| Spinner::new("Computing record interfaces"));
    let interfaces = corpus.make_all_interfaces(&config.interface_options())?;
    if let Some(spinner) = &spinner {
        spinner.finish_with_message(&format!("{} interfaces", interfaces.len()));
    }

    if let Some(path) = output {
        let symbols: Vec<&Symbol> = corpus.iter().collect();
        std::fs::write(path, serde_json::to_string_pretty(&symbols)?)?;
        tracing::info!("Wrote {} symbols to {}", symbols.len(), path.display());
    }

    if !output_mode.is_human() {
        return emit_success(
            output_mode,
            "build",
            serde_json::json!({
                "ingest": loaded.report,
                "stats": stats,
                "interfaces": interfaces.len(),
                "elapsed_ms": loaded.elapsed.as_millis() as u64,
            }),
        );
    }

    complete(loaded.elapsed, loaded.report.files, loaded.report.fragments, stats.total_symbols);

    section("Symbols by kind");
    let by_kind: Vec<(&str, String)> = stats
        .by_kind
        .iter()
        .map(|(kind, count)| (kind.as_str(), count.to_string()))
        .collect();
    println!("{}", stats_table(&by_kind));

    section("Extraction");
    let by_mode: Vec<(&str, String)> = stats
        .by_extraction
        .iter()
        .map(|(mode, count)| (mode.as_str(), count.to_string()))
        .collect();
    println!("{}", stats_table(&by_mode));

    summary_row("Documented:", &format!("{} of {}", stats.documented, stats.total_symbols));
    summary_row("Record interfaces:", &interfaces.len().to_string());
    if let Some(path) = output {
        summary_row("Written to:", &path.display().to_string());
    }
    timing(&format!("{:.2?}", loaded.elapsed));
    Ok(())
}

pub fn run_interface(
    output_mode: OutputMode,
    config: &CorpusConfig,
    input: &[String],
    record: &str,
) -> anyhow::Result<()> {
    let loaded = load_corpus(output_mode, config, input)?;
    let corpus = &loaded.corpus;
    let target = corpus.find_by_qualified_name(record)?;
    let interface = corpus.make_interface_with(target.id, &config.interface_options())?;

    if !output_mode.is_human() {
        let tranches: serde_json::Map<String, serde_json::Value> = [Access::Public, Access::Protected, Access::Private]
            .into_iter()
            .filter_map(|access| interface.tranche(access).map(|t| (access, t)))
            .map(|(access, tranche)| {
                let buckets: serde_json::Map<String, serde_json::Value> = tranche
                    .buckets()
                    .into_iter()
                    .filter(|(_, ids)| !ids.is_empty())
                    .map(|(bucket, ids)| {
                        let names: Vec<String> = ids.iter().map(|id| corpus.qualified_name(*id)).collect();
                        (bucket.to_string(), serde_json::json!(names))
                    })
                    .collect();
                (access.to_string(), serde_json::Value::Object(buckets))
            })
            .collect();
        return emit_success(
            output_mode,
            "interface",
            serde_json::json!({
                "record": corpus.qualified_name(target.id),
                "id": target.id,
                "tranches": tranches,
            }),
        );
    }

    phase(&format!("Interface of {}", corpus.qualified_name(target.id)));
    if interface.is_empty() {
        println!("{}", dim("  (no members)"));
        return Ok(());
    }

    for access in [Access::Public, Access::Protected, Access::Private] {
        let Some(tranche) = interface.tranche(access) else {
            continue;
        };
        if tranche.is_empty() {
            continue;
        }
        section(access.as_str());
        for (bucket, ids) in tranche.buckets() {
            if ids.is_empty() {
                continue;
            }
            println!("{}", dim(bucket));
            let rows: Vec<MemberRow> = ids.iter().map(|id| MemberRow::new(corpus, corpus.get(*id))).collect();
            println!("{}", member_table(&rows));
        }
    }
    Ok(())
}

pub fn run_members(
    output_mode: OutputMode,
    config: &CorpusConfig,
    input: &[String],
    scope: Option<&str>,
) -> anyhow::Result<()> {
    let loaded = load_corpus(output_mode, config, input)?;
    let corpus = &loaded.corpus;
    let target = resolve(corpus, scope)?;
    if !target.is_scope() {
        anyhow::bail!("{} is a {}, not a scope", corpus.qualified_name(target.id), target.kind());
    }

    let mut members: Vec<Symbol> = Vec::new();
    if config.overloads {
        corpus.traverse_overloads(target.id, |s| members.push(s.clone()));
    } else {
        corpus.traverse(target.id, |s| members.push(s.clone()));
    }

    if !output_mode.is_human() {
        return emit_success(
            output_mode,
            "members",
            serde_json::json!({
                "scope": corpus.qualified_name(target.id),
                "members": members,
            }),
        );
    }

    let title = match scope {
        Some(_) => corpus.qualified_name(target.id),
        None => "global namespace".to_string(),
    };
    phase(&format!("Members of {}", title));
    if members.is_empty() {
        println!("{}", dim("  (empty)"));
        return Ok(());
    }
    let rows: Vec<MemberRow> = members.iter().map(|s| MemberRow::new(corpus, s)).collect();
    println!("{}", member_table(&rows));
    summary_row("Members:", &members.len().to_string());
    Ok(())
}

/// Dump is JSON in both output modes
pub fn run_dump(config: &CorpusConfig, input: &[String], symbol: Option<&str>) -> anyhow::Result<()> {
    let loaded = load_corpus(OutputMode::Json, config, input)?;
    let corpus = &loaded.corpus;

    let json = match symbol {
        Some(name) => serde_json::to_string_pretty(corpus.find_by_qualified_name(name)?)?,
        None => {
            let symbols: Vec<&Symbol> = corpus.iter().collect();
            serde_json::to_string_pretty(&symbols)?
        }
    };
    println!("{}", json);
    Ok(())
}
