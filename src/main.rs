mod cli;

use subsift::{
    config, hash,
    identity::{IdentityResolver, ProviderSet},
    matcher::Matcher,
    scanner,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use sift_core::{SubtitleInfo, VideoInfo};
use sift_parser::{detect_flags, detect_language, LanguageTable, Normalizer};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "subsift=trace,sift_parser=debug,sift_core=debug".to_string()
        } else {
            "subsift=info,sift_parser=info".to_string()
        }
    });

    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let languages = Arc::new(LanguageTable::build());

    match cli.command {
        Commands::Hash { file } => hash_file(&file),
        Commands::Normalize { names } => {
            let normalizer = Normalizer::new(languages);
            for name in names {
                println!("{}", normalizer.normalize(&name));
            }
            Ok(())
        }
        Commands::Match { video, subtitle } => {
            if !match_names(languages, &video, &subtitle) {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Detect { subtitle } => {
            detect(&languages, &subtitle);
            Ok(())
        }
        Commands::Identify {
            video,
            subtitle,
            offline,
            json,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(identify(
                &config,
                languages,
                &video,
                subtitle.as_deref(),
                offline,
                json,
            ))
        }
        Commands::Scan {
            dir,
            no_recursive,
            offline,
            json,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if no_recursive {
                config.scan.recursive = false;
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(scan(&config, languages, &dir, offline, json))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("subsift {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn hash_file(file: &Path) -> Result<()> {
    let size = std::fs::metadata(file)
        .with_context(|| format!("Cannot read {:?}", file))?
        .len();
    let fingerprint = hash::fingerprint_opt(file)?;
    let checksum = hash::checksum(file)?;

    println!("File: {}", file.display());
    println!("Size: {} bytes", size);
    match fingerprint {
        Some(fp) => println!("Fingerprint: {}", fp),
        None => println!(
            "Fingerprint: too small (need at least {} bytes)",
            hash::MIN_FINGERPRINT_SIZE
        ),
    }
    println!("MD5: {}", checksum);
    Ok(())
}

fn match_names(languages: Arc<LanguageTable>, video: &str, subtitle: &str) -> bool {
    let matcher = Matcher::new(Normalizer::new(languages));
    println!("Video key:    {:?}", matcher.key(video));
    println!("Subtitle key: {:?}", matcher.key(subtitle));
    let matched = matcher.matches(video, subtitle);
    println!("{}", if matched { "match" } else { "no match" });
    matched
}

fn detect(languages: &LanguageTable, subtitle: &str) {
    let flags = detect_flags(subtitle);
    match detect_language(languages, subtitle).and_then(|code| languages.lookup(code)) {
        Some(lang) => println!("Language: {} ({})", lang.code, lang.name),
        None => println!("Language: unknown"),
    }
    println!("Hearing impaired: {}", flags.hearing_impaired);
    println!("Forced: {}", flags.forced);
}

fn build_resolver(
    config: &config::Config,
    languages: Arc<LanguageTable>,
    offline: bool,
) -> Result<IdentityResolver> {
    let providers = if offline {
        ProviderSet::offline()
    } else {
        ProviderSet::from_config(&config.providers)?
    };
    let resolver =
        IdentityResolver::new(languages, providers).with_suggestions(config.resolver.suggestions);
    tracing::debug!("Providers: {}", resolver.providers().describe());
    Ok(resolver)
}

/// A token that fires on Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling lookups");
            child.cancel();
        }
    });
    token
}

async fn identify(
    config: &config::Config,
    languages: Arc<LanguageTable>,
    video: &Path,
    subtitle: Option<&Path>,
    offline: bool,
    json: bool,
) -> Result<()> {
    let resolver = build_resolver(config, languages, offline)?;
    let cancel = cancel_on_ctrl_c();

    let video_info = resolver
        .resolve_video(video, &cancel)
        .await
        .with_context(|| format!("Failed to resolve {:?}", video))?;
    let subtitle_info = subtitle
        .map(|s| resolver.describe_subtitle(s))
        .transpose()?;

    if json {
        let out = serde_json::json!({
            "video": video_info,
            "subtitle": subtitle_info,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_video(&video_info);
        if let Some(ref s) = subtitle_info {
            println!();
            print_subtitle(s);
        }
    }
    Ok(())
}

async fn scan(
    config: &config::Config,
    languages: Arc<LanguageTable>,
    dir: &Path,
    offline: bool,
    json: bool,
) -> Result<()> {
    let matcher = Matcher::new(Normalizer::new(languages.clone()));
    let plan = scanner::scan_directory(dir, &config.scan, &matcher)?;
    let resolver = build_resolver(config, languages, offline)?;
    let cancel = cancel_on_ctrl_c();
    let resolved =
        scanner::resolve_plan(&resolver, &plan, config.resolver.concurrency, &cancel).await?;

    if json {
        let out = serde_json::json!({
            "resolved": resolved,
            "unmatched_videos": plan
                .pairs
                .iter()
                .filter(|p| p.subtitle.is_none())
                .map(|p| &p.video)
                .collect::<Vec<_>>(),
            "orphan_subtitles": plan.orphan_subtitles,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for pair in &resolved {
        println!("{}", pair.video.display());
        println!("  subtitle: {}", pair.subtitle.display());
        match (&pair.video_info, &pair.error) {
            (Some(v), _) => println!(
                "  identity: {} ({})",
                v.imdb_id.as_ref().map(|id| id.as_str()).unwrap_or("unknown"),
                v.resolved_from
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "no evidence".into())
            ),
            (None, Some(e)) => println!("  error: {}", e),
            (None, None) => {}
        }
    }
    println!(
        "\n{} videos, {} paired, {} orphan subtitles",
        plan.pairs.len(),
        plan.matched(),
        plan.orphan_subtitles.len()
    );
    Ok(())
}

fn print_video(v: &VideoInfo) {
    println!("File: {}", v.path.display());
    println!("Size: {} bytes", v.size);
    println!("Fingerprint: {}", v.hash.as_deref().unwrap_or("-"));
    println!("Title: {}", v.title);
    if let Some(year) = v.year {
        println!("Year: {}", year);
    }
    if let (Some(s), Some(e)) = (v.season, v.episode) {
        println!("Episode: S{:02}E{:02}", s, e);
    }
    if let Some(ref group) = v.release_group {
        println!("Group: {}", group);
    }
    match (&v.imdb_id, v.resolved_from) {
        (Some(id), Some(source)) => println!("IMDb: {} (from {})", id, source),
        (Some(id), None) => println!("IMDb: {}", id),
        (None, _) => println!("IMDb: unknown"),
    }
    if let Some(ref trakt) = v.trakt_id {
        println!("Trakt: {}", trakt);
    }
}

fn print_subtitle(s: &SubtitleInfo) {
    println!("Subtitle: {}", s.path.display());
    println!("MD5: {}", s.checksum);
    println!("Language: {}", s.language.as_deref().unwrap_or("unknown"));
    println!("Format: {}", s.format);
    println!("Hearing impaired: {}", s.hearing_impaired);
    println!("Forced: {}", s.forced);
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!(
        "  OpenSubtitles: {}",
        configured(&config.providers.opensubtitles_api_key)
    );
    println!("  Trakt: {}", configured(&config.providers.trakt_client_id));
    println!("  Suggestions: {}", config.resolver.suggestions);
    println!("  Concurrency: {}", config.resolver.concurrency);
    println!("  Recursive scan: {}", config.scan.recursive);

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }
    Ok(())
}

fn configured(value: &str) -> &'static str {
    if value.is_empty() {
        "not configured"
    } else {
        "configured"
    }
}
