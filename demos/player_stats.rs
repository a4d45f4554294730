use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use step_hash::Error;
use step_hash::HashMap;
use tracing_subscriber::EnvFilter;

const STATISTICS: &[&str] = &[
    "GOALS",
    "ASSISTS",
    "SHOTS",
    "SAVES",
    "TACKLES",
    "INTERCEPTIONS",
    "YELLOW_CARDS",
    "RED_CARDS",
    "GAMES_PLAYED",
];

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'p', long = "players", default_value_t = 3)]
    players: usize,
    #[arg(short = 'g', long = "games", default_value_t = 10)]
    games: u32,
    #[arg(short = 's', long = "seed", default_value_t = 7)]
    seed: u64,
}

struct Player {
    name: String,
    statistics: HashMap<&'static str, u32>,
}

impl Player {
    fn new(name: String) -> Result<Self, Error> {
        let mut statistics = HashMap::new();
        for &statistic in STATISTICS {
            statistics.insert(statistic, 0)?;
        }
        Ok(Player { name, statistics })
    }

    fn record(&mut self, statistic: &str, amount: u32) -> Result<(), Error> {
        *self.statistics.get_mut(statistic)? += amount;
        Ok(())
    }

    fn reset_stats(&mut self) {
        for value in self.statistics.values_mut() {
            *value = 0;
        }
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut rng = SmallRng::seed_from_u64(args.seed);

    let mut roster: HashMap<String, Player> = HashMap::new();
    for i in 0..args.players {
        let name = format!("player_{i}");
        roster.insert(name.clone(), Player::new(name)?)?;
    }

    for _ in 0..args.games {
        for player in roster.values_mut() {
            player.record("GAMES_PLAYED", 1)?;
            for &statistic in &STATISTICS[..STATISTICS.len() - 1] {
                if rng.random_bool(0.3) {
                    player.record(statistic, 1)?;
                }
            }
        }
    }

    let mut names: Vec<&String> = roster.keys().collect();
    names.sort();
    for name in names {
        let player = roster.get(name)?;
        println!("{}:", player.name);
        print!("{}", player.statistics);
    }

    println!(
        "roster: {} players in a table of {} slots",
        roster.len(),
        roster.capacity()
    );

    if let Some(name) = roster.keys().next().cloned() {
        roster.get_mut(&name)?.reset_stats();
        println!("reset {name}: {:?}", roster.get(&name)?.statistics);
        roster.remove(&name)?;
        println!("removed {name}, {} players left", roster.len());
    }

    Ok(())
}
