use serde::Serialize;

/// One row of the synthetic `nba_players.csv`.
#[derive(Debug, Serialize)]
struct SampleRow {
    player_name: String,
    team_abbreviation: &'static str,
    age: u32,
    gp: u32,
    pts: f64,
    reb: f64,
    ast: f64,
    season: String,
}

const TEAMS: [&str; 10] = [
    "ATL", "BOS", "CHI", "DAL", "DEN", "GSW", "LAL", "MIA", "NYK", "SAS",
];

/// Peak-at-27 aging curve, never below 35% of peak.
fn age_factor(age: u32) -> f64 {
    let d = (f64::from(age) - 27.0) / 12.0;
    (1.0 - d * d).max(0.35)
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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % u64::from(hi - lo + 1)) as u32
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round1(v: f64) -> f64 {
    (v.max(0.0) * 10.0).round() / 10.0
}

fn main() -> anyhow::Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "nba_players.csv".to_string());
    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)?;

    let mut rows = 0usize;
    for player in 0..450 {
        // Per-player talent: scorer / big / playmaker mix.
        let scoring = rng.gauss(11.0, 5.0).max(2.0);
        let rebounding = rng.gauss(4.5, 2.0).max(0.8);
        let playmaking = rng.gauss(2.6, 1.6).max(0.3);
        let team = TEAMS[rng.range(0, TEAMS.len() as u32 - 1) as usize];

        let rookie_age = rng.range(19, 23);
        let career_len = rng.range(1, 16);
        let first_season = rng.range(1996, 2020);

        for year in 0..career_len {
            let age = rookie_age + year;
            if age > 42 {
                break;
            }
            let f = age_factor(age);
            let season = first_season + year;
            writer.serialize(SampleRow {
                player_name: format!("Player {player:03}"),
                team_abbreviation: team,
                age,
                gp: rng.range(4, 82),
                pts: round1(rng.gauss(scoring * f, 1.5)),
                reb: round1(rng.gauss(rebounding * f, 0.7)),
                ast: round1(rng.gauss(playmaking * f, 0.5)),
                season: format!("{season}-{:02}", (season + 1) % 100),
            })?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} player seasons to {output_path}");
    Ok(())
}
