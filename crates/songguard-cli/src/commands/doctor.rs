use anyhow::Result;
use std::path::Path;

use songguard_core::config::Config;
use songguard_core::lexicon::{read_lines, Language, Lexicon};
use songguard_core::search::StrategyKind;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    println!("songguard configuration check\n");

    let config = match Config::load(config_path) {
        Ok(config) => {
            println!("config:          OK");
            config
        }
        Err(e) => {
            println!("config:          INVALID ({})", e);
            return Ok(());
        }
    };

    let mut all_ok = true;
    let moderation = &config.moderation;

    for (label, language, path) in [
        ("polish lexicon: ", Language::Polish, &moderation.primary_lexicon),
        ("english lexicon:", Language::English, &moderation.secondary_lexicon),
    ] {
        let lexicon = Lexicon::load(language, path);
        if lexicon.is_empty() {
            println!("{} EMPTY OR MISSING ({})", label, path.display());
            all_ok = false;
        } else {
            println!("{} OK ({} terms)", label, lexicon.len());
        }
    }

    let blacklist = read_lines(&moderation.title_blacklist);
    if blacklist.is_empty() {
        println!("title blacklist: EMPTY OR MISSING ({})", moderation.title_blacklist.display());
        println!("                 Lexicon terms still apply to titles");
    } else {
        println!("title blacklist: OK ({} terms)", blacklist.len());
    }

    let unknown: Vec<_> = config
        .search
        .strategies
        .iter()
        .filter(|name| StrategyKind::parse(name).is_none())
        .collect();
    if unknown.is_empty() {
        println!("strategies:      OK ({})", config.search.strategies.join(", "));
    } else {
        println!("strategies:      UNKNOWN {:?}", unknown);
        all_ok = false;
    }

    if let Some(cookies) = &config.sources.cookies_file {
        if cookies.exists() {
            println!("cookies file:    OK ({})", cookies.display());
        } else {
            println!("cookies file:    NOT FOUND ({})", cookies.display());
            all_ok = false;
        }
    }

    if config.sentiment.endpoints.is_empty() {
        println!("endpoints:       NONE");
        println!("                 Set SONGGUARD_ENDPOINTS to a comma-separated list");
        all_ok = false;
    } else {
        println!("endpoints:       OK ({})", config.sentiment.endpoints.len());
    }

    if config.sentiment.shared_key.is_empty() {
        println!("shared key:      NOT SET");
        println!("                 Set SONGGUARD_SHARED_KEY");
        all_ok = false;
    } else {
        println!("shared key:      OK");
    }

    // Only needed when this host runs `songguard backend`
    if config.backend.credentials.is_empty() {
        println!("credentials:     NONE (backend instances cannot classify)");
    } else {
        println!("credentials:     OK ({})", config.backend.credentials.len());
    }

    println!();
    if all_ok {
        println!("All checks passed!");
    } else {
        println!("Some checks failed. See above for details.");
    }

    Ok(())
}
