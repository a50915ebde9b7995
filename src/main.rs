//! Headless driver: plays one economy with the greedy autoplayer on a
//! simulated frame clock and prints a summary.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use idle_economy::games::clicker::{autoplay, save};
use idle_economy::{
    create_game, create_game_from_config, format_number, EconomyError, GameConfig, GameView,
    Intent, IntentQueue, Outcome, TickClock, Variant,
};

struct Args {
    variant: Variant,
    config: Option<PathBuf>,
    seconds: u32,
    fps: u32,
    clicks_per_sec: f64,
    save: Option<PathBuf>,
    load: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        variant: Variant::Bakery,
        config: None,
        seconds: 600,
        fps: 60,
        clicks_per_sec: 5.0,
        save: None,
        load: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = || it.next().with_context(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "--variant" => args.variant = value()?.parse().map_err(anyhow::Error::msg)?,
            "--config" => args.config = Some(value()?.into()),
            "--seconds" => args.seconds = value()?.parse().context("--seconds")?,
            "--fps" => args.fps = value()?.parse().context("--fps")?,
            "--clicks-per-sec" => args.clicks_per_sec = value()?.parse().context("--clicks-per-sec")?,
            "--save" => args.save = Some(value()?.into()),
            "--load" => args.load = Some(value()?.into()),
            other => bail!("unknown argument '{other}'"),
        }
    }
    if args.fps == 0 {
        bail!("--fps must be at least 1");
    }
    if !(args.clicks_per_sec.is_finite() && args.clicks_per_sec >= 0.0) {
        bail!("--clicks-per-sec must be a non-negative number");
    }
    Ok(args)
}

#[derive(Default)]
struct Tally {
    clicks: u64,
    purchases: u32,
    bonuses: u32,
    prestiges: u32,
    rejected: u32,
}

impl Tally {
    fn record(&mut self, outcome: &Result<Outcome, EconomyError>) {
        match outcome {
            Ok(Outcome::Clicked(_)) => self.clicks += 1,
            Ok(Outcome::Purchased(_)) => self.purchases += 1,
            Ok(Outcome::BonusApplied) => self.bonuses += 1,
            Ok(Outcome::Prestiged(_)) => self.prestiges += 1,
            Err(_) => self.rejected += 1,
        }
    }
}

fn save_game(game: &dyn GameView, clock: &TickClock, path: &Path) -> Result<()> {
    save::save_to_path(game.state(), Some(clock.last_tick()), path)
        .with_context(|| format!("saving to {}", path.display()))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args()?;

    let mut game = match &args.config {
        Some(path) => {
            let config = GameConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            create_game_from_config(config)?
        }
        None => create_game(args.variant)?,
    };

    let mut start = 0.0;
    if let Some(path) = &args.load {
        let ts = save::load_from_path(game.state_mut(), path)
            .with_context(|| format!("loading save {}", path.display()))?;
        start = ts.unwrap_or(0.0);
    }

    info!(
        game = %game.state().name,
        seconds = args.seconds,
        fps = args.fps,
        clicks_per_sec = args.clicks_per_sec,
        "starting session"
    );

    let mut clock = TickClock::new(start);
    let mut queue = IntentQueue::new();
    let mut tally = Tally::default();
    let mut click_budget = 0.0;
    let mut last_save = 0.0;
    let frame = 1.0 / args.fps as f64;
    let frames = u64::from(args.seconds) * u64::from(args.fps);

    for n in 1..=frames {
        let now = start + n as f64 * frame;
        if let Err(e) = clock.advance(game.as_mut(), now) {
            debug!(error = %e, "frame tick dropped");
        }

        click_budget += args.clicks_per_sec * frame;
        while click_budget >= 1.0 {
            queue.push(Intent::Click);
            click_budget -= 1.0;
        }
        if autoplay::wants_prestige(game.state()) {
            queue.push(Intent::Prestige);
        } else if let Some(intent) = autoplay::best_purchase(game.state()) {
            queue.push(intent);
        }
        for outcome in queue.process(game.as_mut()) {
            tally.record(&outcome);
        }

        if let Some(path) = &args.save {
            if clock.total_elapsed - last_save >= save::AUTOSAVE_INTERVAL_SECS {
                save_game(&*game, &clock, path)?;
                last_save = clock.total_elapsed;
            }
        }
    }

    if let Some(path) = &args.save {
        save_game(&*game, &clock, path)?;
    }

    let snap = game.snapshot();
    let p = &snap.progress;
    println!(
        "{} | {:.0}s simulated | {}: {} | rate: {}/s | all-time: {}",
        snap.name,
        clock.total_elapsed,
        snap.currency_name,
        format_number(p.currency),
        format_number(snap.production_rate),
        format_number(p.currency_all_time)
    );
    println!(
        "clicks: {} | upgrades bought: {} | bonuses: {} | prestiges: {} | points: {} | x{:.1} | rejected: {}",
        tally.clicks,
        tally.purchases,
        tally.bonuses,
        tally.prestiges,
        p.prestige_points,
        p.global_multiplier,
        tally.rejected
    );
    if let Some(l) = &p.leveling {
        println!(
            "level {} | xp {}/{} | per click: {}",
            l.level,
            l.xp,
            l.xp_to_next_level,
            format_number(p.currency_per_click)
        );
    }
    let owned: Vec<String> = snap
        .upgrades
        .iter()
        .filter(|u| u.purchase_count > 0)
        .map(|u| format!("{}:{}", u.id, u.purchase_count))
        .collect();
    if !owned.is_empty() {
        println!("owned: {}", owned.join("  "));
    }

    Ok(())
}
