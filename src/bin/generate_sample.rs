//! Writes a synthetic attendance file and a championship file in the layout
//! the dashboard reads, including historical team names and a few values
//! that cannot be parsed.
//!
//! Usage: `generate_sample [output-dir]`

use std::path::PathBuf;

use anyhow::{Context, Result};

const FIRST_SEASON: i32 = 2000;
const LAST_SEASON: i32 = 2025;
const HOME_GAMES: f64 = 81.0;

const ATTENDANCE_FILE: &str = "MLB_attendance_data_2000-2025.csv";
const CHAMPIONSHIP_FILE: &str = "MLB Wolrd Series Winners 2000-25.csv";

/// Current name and relative market size.
const TEAMS: &[(&str, f64)] = &[
    ("Arizona Diamondbacks", 0.95),
    ("Atlanta Braves", 1.10),
    ("Baltimore Orioles", 0.90),
    ("Boston Red Sox", 1.15),
    ("Chicago Cubs", 1.20),
    ("Chicago White Sox", 0.85),
    ("Cincinnati Reds", 0.85),
    ("Cleveland Guardians", 0.85),
    ("Colorado Rockies", 1.05),
    ("Detroit Tigers", 0.95),
    ("Houston Astros", 1.05),
    ("Kansas City Royals", 0.75),
    ("Los Angeles Angels", 1.10),
    ("Los Angeles Dodgers", 1.35),
    ("Miami Marlins", 0.55),
    ("Milwaukee Brewers", 0.95),
    ("Minnesota Twins", 0.90),
    ("New York Mets", 1.10),
    ("New York Yankees", 1.35),
    ("Oakland Athletics", 0.65),
    ("Philadelphia Phillies", 1.15),
    ("Pittsburgh Pirates", 0.75),
    ("San Diego Padres", 1.05),
    ("San Francisco Giants", 1.15),
    ("Seattle Mariners", 0.95),
    ("St. Louis Cardinals", 1.20),
    ("Tampa Bay Rays", 0.55),
    ("Texas Rangers", 1.00),
    ("Toronto Blue Jays", 1.00),
    ("Washington Nationals", 0.80),
];

/// Season, winner, loser, games, spelled as the source of the period did.
const WORLD_SERIES: &[(i32, &str, &str, &str)] = &[
    (2000, "New York Yankees", "New York Mets", "4-1"),
    (2001, "Arizona Diamondbacks", "New York Yankees", "4-3"),
    (2002, "Anaheim Angels", "San Francisco Giants", "4-3"),
    (2003, "Florida Marlins", "New York Yankees", "4-2"),
    (2004, "Boston Red Sox", "St. Louis Cardinals", "4-0"),
    (2005, "Chicago White Sox", "Houston Astros", "4-0"),
    (2006, "St. Louis Cardinals", "Detroit Tigers", "4-1"),
    (2007, "Boston Red Sox", "Colorado Rockies", "4-0"),
    (2008, "Philadelphia Phillies", "Tampa Bay Rays", "4-1"),
    (2009, "New York Yankees", "Philadelphia Phillies", "4-2"),
    (2010, "San Francisco Giants", "Texas Rangers", "4-1"),
    (2011, "St. Louis Cardinals", "Texas Rangers", "4-3"),
    (2012, "San Francisco Giants", "Detroit Tigers", "4-0"),
    (2013, "Boston Red Sox", "St. Louis Cardinals", "4-2"),
    (2014, "San Francisco Giants", "Kansas City Royals", "4-3"),
    (2015, "Kansas City Royals", "New York Mets", "4-1"),
    (2016, "Chicago Cubs", "Cleveland Indians", "4-3"),
    (2017, "Houston Astros", "Los Angeles Dodgers", "4-3"),
    (2018, "Boston Red Sox", "Los Angeles Dodgers", "4-1"),
    (2019, "Washington Nationals", "Houston Astros", "4-3"),
    (2020, "Los Angeles Dodgers", "Tampa Bay Rays", "4-2"),
    (2021, "Atlanta Braves", "Houston Astros", "4-2"),
    (2022, "Houston Astros", "Philadelphia Phillies", "4-2"),
    (2023, "Texas Rangers", "Arizona Diamondbacks", "4-1"),
    (2024, "Los Angeles Dodgers", "New York Yankees", "4-1"),
    (2025, "Los Angeles Dodgers", "Toronto Blue Jays", "4-3"),
];

/// The name a franchise played under in a given season.
fn historical_name(team: &str, season: i32) -> &str {
    match team {
        "Los Angeles Angels" if season <= 2004 => "Anaheim Angels",
        "Los Angeles Angels" if season <= 2015 => "Los Angeles Angels of Anaheim",
        "Miami Marlins" if season <= 2011 => "Florida Marlins",
        "Tampa Bay Rays" if season <= 2007 => "Tampa Bay Devil Rays",
        "Washington Nationals" if season <= 2004 => "Montreal Expos",
        "Cleveland Guardians" if season <= 2021 => "Cleveland Indians",
        other => other,
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Attendance and payroll for one team-season. 2020 was played without fans.
fn team_season(rng: &mut SimpleRng, market: f64, season: i32) -> (f64, f64) {
    let years = f64::from(season - FIRST_SEASON);
    let payroll = (55_000_000.0 + 4_500_000.0 * years) * market * rng.gauss(1.0, 0.18).max(0.35);
    if season == 2020 {
        return (0.0, payroll);
    }
    // Spending buys some attendance on top of market size.
    let per_game = 26_000.0 * market + payroll / 12_000.0 + rng.gauss(0.0, 3_500.0);
    let per_game = per_game.clamp(8_000.0, 52_000.0);
    (per_game * HOME_GAMES, payroll)
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let attendance_path = out_dir.join(ATTENDANCE_FILE);
    let mut writer = csv::Writer::from_path(&attendance_path)
        .with_context(|| format!("creating {}", attendance_path.display()))?;
    writer.write_record(["team", "Season", "attendance", "Attend/G", "Est. Payroll"])?;

    let mut rows = 0usize;
    for season in FIRST_SEASON..=LAST_SEASON {
        for (i, &(team, market)) in TEAMS.iter().enumerate() {
            let (attendance, payroll) = team_season(&mut rng, market, season);
            let attendance = attendance.round();
            let per_game = (attendance / HOME_GAMES).round();

            // A handful of rows carry values the loader has to cope with.
            let payroll = match (season, i) {
                (2001, 3) | (2013, 17) => "NA".to_string(),
                (2008, 9) => "unknown".to_string(),
                _ => format!("{:.0}", payroll),
            };
            let per_game = if (season, i) == (2010, 21) {
                String::new()
            } else {
                format!("{per_game:.0}")
            };

            let season_text = season.to_string();
            let attendance = format!("{attendance:.0}");
            writer.write_record([
                historical_name(team, season),
                season_text.as_str(),
                attendance.as_str(),
                per_game.as_str(),
                payroll.as_str(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;
    println!("Wrote {rows} team-seasons to {}", attendance_path.display());

    let championship_path = out_dir.join(CHAMPIONSHIP_FILE);
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&championship_path)
        .with_context(|| format!("creating {}", championship_path.display()))?;
    writer.write_record(["MLB World Series Winners 2000-2025"])?;
    writer.write_record(["Season", "Winner", "Loser", "Series"])?;
    for &(season, winner, loser, series) in WORLD_SERIES {
        writer.write_record([season.to_string().as_str(), winner, loser, series])?;
    }
    writer.flush()?;
    println!(
        "Wrote {} championships to {}",
        WORLD_SERIES.len(),
        championship_path.display()
    );

    Ok(())
}
