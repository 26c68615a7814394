use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use hoopgrade::pipeline::{self, SourceKind};
use hoopgrade::ratings_db;
use hoopgrade::role_params::Role;
use hoopgrade::scoring::ManualInputs;

const DEFAULT_HISTORY_LIMIT: usize = 7;

struct Cli {
    player_name: String,
    role: Role,
    inputs: ManualInputs,
    db_path: Option<PathBuf>,
    history_limit: usize,
    no_save: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cli = parse_cli()?;

    let report = pipeline::compute_rating(&cli.player_name, cli.role, cli.inputs);

    if report.source == SourceKind::Synthetic {
        let reason = report
            .degradation_reason
            .as_deref()
            .unwrap_or("switched to synthetic baseline");
        eprintln!("[WARN] {reason}");
    }
    if report.stats.insufficient_sample {
        eprintln!("[WARN] small sample: fewer than 10 games or 15 minutes per game");
    }

    println!("{}  [{}]", report.player_name, report.role);
    println!("OVR {}  tier {}", report.overall, report.tier);
    let s = report.sub_scores;
    println!("  Scoring     {}", s.scoring);
    println!("  Playmaking  {}", s.playmaking);
    println!("  Shooting    {}", s.shooting);
    println!("  Rebounding  {}", s.rebounding);
    println!("  Defense     {}", s.defense);
    println!("  Isolation   {}", s.isolation);
    println!("  Clutch      {}", s.clutch);
    println!(
        "stats: PTS {:.1}  TS {:.3}  AST% {:.3}  REB% {:.3}",
        report.stats.points_per_game,
        report.stats.true_shooting_pct,
        report.stats.assist_pct,
        report.stats.rebound_pct
    );

    if cli.no_save {
        return Ok(());
    }

    let db_path = cli
        .db_path
        .clone()
        .or_else(ratings_db::default_db_path)
        .context("unable to resolve sqlite path")?;
    let conn = ratings_db::open_db(&db_path)?;
    ratings_db::append_rating(
        &conn,
        &cli.player_name,
        cli.role,
        report.overall,
        &report.sub_scores,
    )?;

    let mut history = ratings_db::recent_ratings(&conn, &cli.player_name, cli.history_limit)?;
    if !history.is_empty() {
        // Stored newest-first; display chronologically.
        history.reverse();
        println!();
        println!("history ({}):", history.len());
        for entry in &history {
            println!(
                "  {}  OVR {}  [{}]",
                entry.created_at, entry.overall, entry.role
            );
        }
    }

    Ok(())
}

fn parse_cli() -> Result<Cli> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        return Err(anyhow!(
            "usage: hoopgrade <player name> [--role guards|wings|bigs] [--iso N] [--def N] \
             [--clutch N] [--db PATH] [--history N] [--no-save]"
        ));
    }

    let mut name_parts: Vec<String> = Vec::new();
    let mut role = Role::Guards;
    let mut inputs = ManualInputs::default();
    let mut db_path = None;
    let mut history_limit = DEFAULT_HISTORY_LIMIT;
    let mut no_save = false;

    let mut idx = 0usize;
    while idx < args.len() {
        let arg = &args[idx];
        if let Some(value) = flag_value(&args, &mut idx, "--role")? {
            role = value.parse::<Role>()?;
        } else if let Some(value) = flag_value(&args, &mut idx, "--iso")? {
            inputs.isolation = parse_slider("--iso", &value)?;
        } else if let Some(value) = flag_value(&args, &mut idx, "--def")? {
            inputs.defense_eye_test = parse_slider("--def", &value)?;
        } else if let Some(value) = flag_value(&args, &mut idx, "--clutch")? {
            inputs.clutch = parse_slider("--clutch", &value)?;
        } else if let Some(value) = flag_value(&args, &mut idx, "--db")? {
            db_path = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(&args, &mut idx, "--history")? {
            history_limit = value
                .parse::<usize>()
                .with_context(|| format!("invalid --history value '{value}'"))?
                .clamp(1, 50);
        } else if arg == "--no-save" {
            no_save = true;
            idx += 1;
        } else if arg.starts_with("--") {
            return Err(anyhow!("unknown flag '{arg}'"));
        } else {
            name_parts.push(arg.clone());
            idx += 1;
        }
    }

    let player_name = name_parts.join(" ").trim().to_string();
    if player_name.is_empty() {
        return Err(anyhow!("no player name given"));
    }

    Ok(Cli {
        player_name,
        role,
        inputs,
        db_path,
        history_limit,
        no_save,
    })
}

/// Accepts both `--flag value` and `--flag=value`; advances the cursor
/// past whatever it consumed.
fn flag_value(args: &[String], idx: &mut usize, flag: &str) -> Result<Option<String>> {
    let arg = &args[*idx];
    if let Some(value) = arg.strip_prefix(flag)
        && let Some(value) = value.strip_prefix('=')
    {
        *idx += 1;
        return Ok(Some(value.to_string()));
    }
    if arg == flag {
        let Some(next) = args.get(*idx + 1) else {
            return Err(anyhow!("missing value for {flag}"));
        };
        *idx += 2;
        return Ok(Some(next.clone()));
    }
    Ok(None)
}

fn parse_slider(flag: &str, value: &str) -> Result<i32> {
    let parsed = value
        .parse::<i32>()
        .with_context(|| format!("invalid {flag} value '{value}'"))?;
    Ok(parsed.clamp(0, 99))
}
